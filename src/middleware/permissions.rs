//! Role checks as typed extractors
//!
//! Usage in handlers:
//! ```ignore
//! async fn stats(
//!     Authorized(ctx, ..): Authorized<AdminOnly>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<StatsResponse>> {
//!     // Role already verified
//! }
//! ```

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::middleware::RequestContext;
use crate::models::account::AccountRole;

/// Marker types naming the role a route requires
pub trait RoleRequirement: Send + Sync + 'static {
    const ROLE: AccountRole;
}

macro_rules! define_roles {
    ($($(#[$meta:meta])* $name:ident => $role:expr),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl RoleRequirement for $name {
                const ROLE: AccountRole = $role;
            }
        )*
    };
}

define_roles! {
    /// Dashboard and review actions
    AdminOnly => AccountRole::Admin,
    /// Partner self-service
    PartnerOnly => AccountRole::Partner,
}

/// Extractor that requires the caller to hold role `R`.
///
/// Missing context (route not behind `require_auth`) is a 401; a caller with
/// another role gets a 403.
#[derive(Debug, Clone)]
pub struct Authorized<R: RoleRequirement>(pub RequestContext, pub PhantomData<R>);

impl<R: RoleRequirement> Authorized<R> {
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl<S, R> FromRequestParts<S> for Authorized<R>
where
    S: Send + Sync,
    R: RoleRequirement,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestContext>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if ctx.account.role != R::ROLE {
            return Err(AppError::Forbidden(format!(
                "{} access required",
                R::ROLE.as_str()
            )));
        }

        Ok(Authorized(ctx.clone(), PhantomData))
    }
}
