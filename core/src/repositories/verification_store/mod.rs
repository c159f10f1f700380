//! Verification store: transactional, lock-holding access to users,
//! email addresses, confirmations, and the per-address attempt counter.

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockVerificationStore;
pub use r#trait::{VerificationStore, VerificationTxn};
