// HTTP middleware
pub mod admin;
pub mod jwt_auth;

pub use admin::*;
pub use jwt_auth::*;
