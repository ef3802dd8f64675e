pub mod balance_service;
pub mod entitlement_service;
pub mod ledger_service;
pub mod purchase_service;
pub mod reward_service;

pub use balance_service::*;
pub use entitlement_service::*;
pub use ledger_service::*;
pub use purchase_service::*;
pub use reward_service::*;
