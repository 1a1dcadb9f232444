pub mod oauth_account;
pub mod user;

pub use oauth_account::OAuthAccount;
pub use user::{Role, User};
