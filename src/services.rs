pub mod auth;
pub mod company_service;
pub mod member_service;
pub mod password;
pub mod permissions;
pub mod theme_service;
pub mod token;
