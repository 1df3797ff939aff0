use std::sync::Arc;

use crate::config::portal::PortalConfig;
use crate::db::DbConn;
use crate::services::{
    AccountDirectory, ApplicationStore, EnquiryHandler, IntakeHandler, NotificationService,
    RedemptionHandler, ReviewHandler,
};

/// Shared application state.
///
/// Everything here is cheap to clone and holds no per-request data; the
/// caller's identity travels in the request extensions instead.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub notification: NotificationService,
    pub store: ApplicationStore,
    pub intake: IntakeHandler,
    pub review: ReviewHandler,
    pub redemption: RedemptionHandler,
    pub enquiries: EnquiryHandler,
}

impl AppState {
    pub fn new(
        db: DbConn,
        notification: NotificationService,
        directory: Arc<dyn AccountDirectory>,
        portal: &PortalConfig,
    ) -> Self {
        let store = ApplicationStore::new(db.clone());

        Self {
            intake: IntakeHandler::new(store.clone(), directory, notification.clone()),
            review: ReviewHandler::new(
                store.clone(),
                notification.clone(),
                portal.invite_validity_days,
                portal.site_url.clone(),
            ),
            redemption: RedemptionHandler::new(store.clone()),
            enquiries: EnquiryHandler::new(notification.clone()),
            store,
            notification,
            db,
        }
    }
}
