pub mod authority;
pub mod cache;
pub mod invalidation;
pub mod resolver;
pub mod types;

pub use authority::{AuthorityError, HttpSessionAuthority, SessionAuthority};
pub use cache::{SessionCache, SweeperHandle};
pub use invalidation::SessionInvalidator;
pub use resolver::{Rejected, SessionResolver};
pub use types::{Session, User};
