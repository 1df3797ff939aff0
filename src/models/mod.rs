pub mod account;
pub mod partner_application;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::account::{self, Entity as Account};
    pub use super::partner_application::{self, Entity as PartnerApplication};
}
