// HostelHQ - API Core
//
// Phone-based login for the HostelHQ platform: OTP issuance and verification
// through the Wigal SMS gateway, with a dev mode that never sends SMS.
//
// Activities live per-domain in domains/*/activities/

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
