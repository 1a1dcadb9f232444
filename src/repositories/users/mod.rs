pub mod oauth_account_repo;
pub mod user_repo;

pub use oauth_account_repo::*;
pub use user_repo::*;
