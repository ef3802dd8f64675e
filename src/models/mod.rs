pub mod common;
pub mod entitlement;
pub mod pagination;
pub mod purchase;
pub mod reward;
pub mod wallet;

pub use common::*;
pub use entitlement::*;
pub use pagination::*;
pub use purchase::*;
pub use reward::*;
pub use wallet::*;
