// HTTP routes
pub mod admin;
pub mod health;
pub mod otp;
pub mod sms;

pub use admin::*;
pub use health::*;
pub use otp::*;
pub use sms::*;
