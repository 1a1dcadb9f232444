pub mod token;

pub use token::{AccessClaims, RefreshClaims, TokenClaims, TokenPair};
