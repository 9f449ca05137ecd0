pub mod access_token;
pub mod account;

pub use access_token::{IssuedToken, TokenRecord};
pub use account::{Account, AccountView, NewAccount, normalize_identifier};
