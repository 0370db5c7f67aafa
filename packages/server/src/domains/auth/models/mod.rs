mod admin_phone;
mod otp_verification;

pub use admin_phone::is_admin_phone;
pub use otp_verification::{NewOtpVerification, OtpVerification};
