//! Credential record produced by the resolver.

use super::authenticator::Authenticator;
use std::fmt;

/// A username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Login {
    pub username: String,
    pub password: String,
}

impl Login {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Where the credentials for a session came from, reduced to what the
/// authenticator needs. Consumed right away, never stored.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Pre-issued bearer token.
    Token(String),
    /// Username and password, scheme negotiated with the server.
    Login(Login),
    /// Nothing usable was found.
    Anonymous,
}

impl Credentials {
    pub fn token(token: impl Into<String>) -> Self {
        Credentials::Token(token.into())
    }

    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Login(Login::new(username, password))
    }

    pub fn anonymous() -> Self {
        Credentials::Anonymous
    }

    /// Build the authenticator for this record.
    ///
    /// A login starts out sending Basic and switches to Digest if the
    /// server asks for it.
    pub fn into_authenticator(self) -> Authenticator {
        match self {
            Credentials::Token(token) => Authenticator::bearer(token),
            Credentials::Login(login) => Authenticator::basic(login.username, login.password),
            Credentials::Anonymous => Authenticator::none(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token([REDACTED])"),
            Credentials::Login(login) => f.debug_tuple("Login").field(login).finish(),
            Credentials::Anonymous => f.write_str("Anonymous"),
        }
    }
}
