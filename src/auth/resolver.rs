//! Chooses the credential scheme for a session.

use super::authenticator::{Authenticator, Authorizer};
use super::credentials::{Credentials, Login};
use super::netrc;
use reqwest::Url;
use std::path::PathBuf;
use tracing::{debug, info};

/// Explicit credential inputs plus the netrc fallback location.
#[derive(Clone, Default)]
pub struct CredentialResolver {
    token: String,
    username: String,
    password: String,
    netrc_file: Option<PathBuf>,
}

impl CredentialResolver {
    /// Create a resolver. Empty strings mean "not supplied".
    pub fn new(
        token: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            password: password.into(),
            netrc_file: None,
        }
    }

    /// Consult this machine-credentials file when no password is given.
    pub fn with_netrc_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.netrc_file = Some(path.into());
        self
    }

    /// Decide which credentials apply to `endpoint`.
    ///
    /// First match wins:
    /// 1. a token, ignoring any username/password
    /// 2. an explicit password with the given username
    /// 3. a complete netrc entry for the endpoint host
    /// 4. anonymous
    ///
    /// Lookup failures are not errors; they end in `Anonymous` and show up
    /// later as a 401 from the server.
    pub fn resolve(&self, endpoint: &Url) -> Credentials {
        if !self.token.is_empty() {
            debug!("Using bearer token");
            return Credentials::token(self.token.as_str());
        }

        if !self.password.is_empty() {
            debug!("Using explicit login for user {}", self.username);
            return Credentials::login(self.username.as_str(), self.password.as_str());
        }

        if let Some(login) = self.lookup_netrc(endpoint) {
            debug!("Using netrc login for user {}", login.username);
            return Credentials::Login(login);
        }

        debug!("No credentials found, continuing anonymously");
        Credentials::anonymous()
    }

    /// Resolve and build the authenticator in one step.
    pub fn authenticator(&self, endpoint: &Url) -> Authenticator {
        let authenticator = self.resolve(endpoint).into_authenticator();
        info!(
            kind = authenticator.kind(),
            user = authenticator.user(),
            "Selected authenticator"
        );
        authenticator
    }

    fn lookup_netrc(&self, endpoint: &Url) -> Option<Login> {
        let path = self.netrc_file.as_deref()?;
        let host = endpoint.host_str()?;

        let with_port = endpoint.port().map(|port| format!("{}:{}", host, port));
        let mut hosts = Vec::with_capacity(2);
        if let Some(with_port) = with_port.as_deref() {
            hosts.push(with_port);
        }
        hosts.push(host);

        netrc::lookup(path, &hosts)
    }
}
