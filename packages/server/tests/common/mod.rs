// Common test utilities

pub mod harness;
pub mod http;

pub use harness::*;
pub use http::*;
