pub mod auth;
pub mod handlers;
pub mod jwt;
pub mod revocation;
