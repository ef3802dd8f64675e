pub mod packs;
pub mod spin;
pub mod store;
pub mod vote;
pub mod wallet;

pub use packs::packs_config;
pub use spin::spin_config;
pub use store::store_config;
pub use vote::vote_config;
pub use wallet::wallet_config;
