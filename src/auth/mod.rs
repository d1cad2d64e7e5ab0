pub mod extract;
pub mod password;
pub mod token;

pub use extract::CurrentUser;
pub use token::{Claims, TokenPair, TokenService};
