//! Authenticator variants and the capability they share.

use super::digest::{DigestAuth, DigestChallenge};
use crate::config::BEARER_IDENTITY;
use base64::Engine;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::fmt;
use tracing::warn;

/// Capability every credential scheme exposes to the client.
pub trait Authorizer {
    /// Stable scheme identifier, used in logs and for challenge matching.
    fn kind(&self) -> &'static str;

    /// Identity associated with the credential.
    fn user(&self) -> &str;

    /// Secret material. Never log this.
    fn pass(&self) -> &str;

    /// Decorate an outgoing request. Never fails: a value that cannot be
    /// used as a header is dropped and the server rejects the request.
    fn authorize(&self, headers: &mut HeaderMap, method: &Method, path: &str);
}

/// Insert an `Authorization` header marked as sensitive.
pub(crate) fn set_authorization(headers: &mut HeaderMap, value: &str, kind: &str) {
    match HeaderValue::from_str(value) {
        Ok(mut value) => {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Err(_) => {
            warn!(kind, "credential is not a valid header value, sending without it");
        }
    }
}

/// Anonymous access.
#[derive(Debug, Clone, Default)]
pub struct NoAuth;

impl Authorizer for NoAuth {
    fn kind(&self) -> &'static str {
        "NoAuth"
    }

    fn user(&self) -> &str {
        ""
    }

    fn pass(&self) -> &str {
        ""
    }

    fn authorize(&self, _headers: &mut HeaderMap, _method: &Method, _path: &str) {}
}

/// HTTP Basic Authentication (username:password encoded in base64).
#[derive(Clone)]
pub struct BasicAuth {
    user: String,
    pass: String,
}

impl BasicAuth {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Get the Authorization header value for this credential.
    pub fn header_value(&self) -> String {
        let combined = format!("{}:{}", self.user, self.pass);
        let encoded = base64::engine::general_purpose::STANDARD.encode(&combined);
        format!("Basic {}", encoded)
    }
}

impl Authorizer for BasicAuth {
    fn kind(&self) -> &'static str {
        "BasicAuth"
    }

    fn user(&self) -> &str {
        &self.user
    }

    fn pass(&self) -> &str {
        &self.pass
    }

    fn authorize(&self, headers: &mut HeaderMap, _method: &Method, _path: &str) {
        set_authorization(headers, &self.header_value(), self.kind());
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .finish()
    }
}

/// Bearer token authentication, the token is sent verbatim.
#[derive(Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authorizer for BearerAuth {
    fn kind(&self) -> &'static str {
        "BearerAuth"
    }

    fn user(&self) -> &str {
        BEARER_IDENTITY
    }

    fn pass(&self) -> &str {
        &self.token
    }

    fn authorize(&self, headers: &mut HeaderMap, _method: &Method, _path: &str) {
        set_authorization(headers, &format!("Bearer {}", self.token), self.kind());
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// The credential scheme currently applied to requests.
#[derive(Debug)]
pub enum Authenticator {
    NoAuth(NoAuth),
    Basic(BasicAuth),
    Digest(DigestAuth),
    Bearer(BearerAuth),
}

impl Authenticator {
    pub fn none() -> Self {
        Authenticator::NoAuth(NoAuth)
    }

    pub fn basic(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Authenticator::Basic(BasicAuth::new(user, pass))
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Authenticator::Bearer(BearerAuth::new(token))
    }

    fn inner(&self) -> &dyn Authorizer {
        match self {
            Authenticator::NoAuth(auth) => auth,
            Authenticator::Basic(auth) => auth,
            Authenticator::Digest(auth) => auth,
            Authenticator::Bearer(auth) => auth,
        }
    }

    /// Whether this session was opened with a username/password pair and
    /// may therefore switch between Basic and Digest on a challenge.
    pub fn negotiates(&self) -> bool {
        matches!(self, Authenticator::Basic(_) | Authenticator::Digest(_))
    }

    /// Pick the authenticator that answers a 401 challenge.
    ///
    /// Returns `None` when this session has nothing to negotiate with
    /// (anonymous or bearer). A Digest challenge that cannot be parsed falls
    /// back to Basic.
    pub fn answer_challenge<'a, I>(&self, challenges: I) -> Option<Authenticator>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.negotiates() {
            return None;
        }

        let parsed = challenges.into_iter().find_map(DigestChallenge::parse);
        let next = match parsed {
            Some(challenge) => Authenticator::Digest(DigestAuth::challenged(
                self.user(),
                self.pass(),
                challenge,
            )),
            None => Authenticator::basic(self.user(), self.pass()),
        };
        Some(next)
    }
}

impl Authorizer for Authenticator {
    fn kind(&self) -> &'static str {
        self.inner().kind()
    }

    fn user(&self) -> &str {
        self.inner().user()
    }

    fn pass(&self) -> &str {
        self.inner().pass()
    }

    fn authorize(&self, headers: &mut HeaderMap, method: &Method, path: &str) {
        self.inner().authorize(headers, method, path)
    }
}
