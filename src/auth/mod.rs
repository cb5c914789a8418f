//! Authentication for lazydav.
//!
//! This module decides which credential scheme a session uses (bearer
//! token, explicit login, `.netrc` login or anonymous) and applies it to
//! every outgoing request. Logins start with Basic and switch to Digest
//! when the server challenges for it.

pub mod authenticator;
pub mod credentials;
pub mod digest;
pub mod netrc;
pub mod resolver;

pub use authenticator::{Authenticator, Authorizer, BasicAuth, BearerAuth, NoAuth};
pub use credentials::{Credentials, Login};
pub use digest::{DigestAlgorithm, DigestAuth, DigestChallenge, DigestState};
pub use resolver::CredentialResolver;
