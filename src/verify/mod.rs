//! Verification module containing the reconciliation store and report derivation

pub mod report;
pub mod store;

pub use report::*;
pub use store::*;
