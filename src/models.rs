pub mod auth;
pub mod base;
pub mod company;
pub mod member;
pub mod theme;
