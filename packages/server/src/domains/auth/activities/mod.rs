//! Auth domain activities - business logic functions
//!
//! Activities take `ServerDeps` and return typed results; HTTP routes call
//! them directly and map `AppError` to a response.

mod manage_records;
mod send_otp;
mod verify_otp;

pub use manage_records::{
    delete_otp_record, delete_otp_records, list_otp_records, purge_expired_otp_records,
};
pub use send_otp::send_otp;
pub use verify_otp::verify_otp;
