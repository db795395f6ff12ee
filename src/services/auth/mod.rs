pub mod claims;
pub mod clock;
pub mod keys;
pub mod token_service;

pub use claims::{Claims, UserId};
pub use clock::{Clock, SystemClock};
pub use keys::{KeyLoadError, KeyPair, KeySource};
pub use token_service::{SigningError, TokenInvalid, TokenPolicy, TokenService, TokenVerifier};
