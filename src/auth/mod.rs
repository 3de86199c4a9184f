pub mod claims;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod utils;

pub use claims::{Claims, Session};
pub use identity::{IdentityProvider, JwtIdentityProvider, SessionChange};
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser, BearerToken};
pub use utils::require_owner;
