pub mod accounts;
pub mod applications;
pub mod directory;
pub mod enquiries;
pub mod notification;
pub mod security;
pub mod validation;

pub use applications::{
    ApplicationError, ApplicationStore, IntakeHandler, RedemptionHandler, ReviewHandler,
};
pub use directory::{AccountDirectory, DbAccountDirectory};
pub use enquiries::{EnquiryError, EnquiryHandler};
pub use notification::NotificationService;
pub use security::*;
