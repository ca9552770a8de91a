//! Command implementations.

mod check;
mod owners;

pub use check::{execute_check, run_check};
pub use owners::execute_owners;
