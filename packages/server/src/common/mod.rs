// Common types and utilities shared across the application

pub mod error;
pub mod phone;

pub use error::AppError;
pub use phone::PhoneNumber;
