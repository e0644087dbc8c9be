//! HTTP Basic authentication and the role table guarding customer writes.

pub mod credentials;
pub mod middleware;
pub mod policy;

pub use credentials::{Account, Principal};
pub use middleware::authorize;
pub use policy::{PathPattern, Role, Rule, SecurityPolicy};
