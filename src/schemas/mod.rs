pub mod account;
pub mod application;

pub use account::*;
pub use application::*;
