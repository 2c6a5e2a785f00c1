pub mod auth;
pub mod companies;
pub mod members;
pub mod themes;
