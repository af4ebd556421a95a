//! Authentication primitives: password hashing, scope resolution, and
//! signed access tokens.

pub mod password;
pub mod scopes;
pub mod token;

pub use scopes::Scope;
pub use token::{Claims, TokenError, TokenIssuer};
