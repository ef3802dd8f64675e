pub mod activity_events;
pub mod coin_transactions;
pub mod entitlement_packs;
pub mod purchases;
pub mod unlocks;

pub use activity_events as activity_event_entity;
pub use coin_transactions as coin_transaction_entity;
pub use entitlement_packs as entitlement_pack_entity;
pub use purchases as purchase_entity;
pub use unlocks as unlock_entity;

pub use activity_events::ActivityAction;
pub use coin_transactions::TransactionKind;
pub use entitlement_packs::{PackStatus, PackType};
pub use purchases::PurchaseState;
