//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PostgresOtpStore, ServerDeps, WigalAdapter};
pub use test_dependencies::{InMemoryOtpStore, MockSmsFailure, MockSmsProvider, TestDependencies};
pub use traits::*;
