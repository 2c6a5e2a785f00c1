pub mod user_repo;
pub use user_repo::UserRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod member_repo;
pub use member_repo::MemberRepository;
pub mod theme_repo;
pub use theme_repo::ThemeRepository;
pub mod token_repo;
pub use token_repo::TokenRepository;
