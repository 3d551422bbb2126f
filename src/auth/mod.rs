mod key;
mod middleware;

pub use key::{KeyGenerator, parse_key};
pub use middleware::{AuthError, MaybeAuth, RequireAdmin, RequireAuth};
