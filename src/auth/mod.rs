pub mod token;
pub mod token_store;

pub use token::{LoginResponse, RefreshResponse};
pub use token_store::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
