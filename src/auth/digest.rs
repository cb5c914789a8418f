//! HTTP Digest authentication (RFC 7616).
//!
//! A [`DigestAuth`] starts unchallenged and sends nothing. Once the client
//! has seen a `WWW-Authenticate: Digest ...` challenge it builds a
//! challenged authenticator carrying realm, nonce and algorithm, and every
//! request after that gets a computed `Authorization: Digest ...` header.

use super::authenticator::{Authorizer, set_authorization};
use reqwest::Method;
use reqwest::header::HeaderMap;
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Hash algorithms accepted in a Digest challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Md5Sess,
    Sha256,
    Sha256Sess,
}

impl DigestAlgorithm {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "MD5" => Some(Self::Md5),
            "MD5-SESS" => Some(Self::Md5Sess),
            "SHA-256" => Some(Self::Sha256),
            "SHA-256-SESS" => Some(Self::Sha256Sess),
            _ => None,
        }
    }

    /// Token used in the `algorithm=` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Md5Sess => "MD5-sess",
            Self::Sha256 => "SHA-256",
            Self::Sha256Sess => "SHA-256-sess",
        }
    }

    fn is_session(&self) -> bool {
        matches!(self, Self::Md5Sess | Self::Sha256Sess)
    }

    fn hash(&self, data: &str) -> String {
        match self {
            Self::Md5 | Self::Md5Sess => format!("{:x}", md5::compute(data.as_bytes())),
            Self::Sha256 | Self::Sha256Sess => format!("{:x}", Sha256::digest(data.as_bytes())),
        }
    }
}

/// Parameters captured from a server's Digest challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub algorithm: DigestAlgorithm,
    pub opaque: Option<String>,
    pub qop: Vec<String>,
    pub stale: bool,
}

impl DigestChallenge {
    /// Parse a `WWW-Authenticate` header value.
    ///
    /// The Digest scheme may appear after other schemes in the same value.
    /// Returns `None` when there is no Digest scheme, when realm or nonce is
    /// missing, or when the algorithm is not supported.
    pub fn parse(header: &str) -> Option<Self> {
        let params = parse_params(digest_section(header)?);

        let mut realm = None;
        let mut nonce = None;
        let mut algorithm = DigestAlgorithm::Md5;
        let mut opaque = None;
        let mut qop = Vec::new();
        let mut stale = false;

        for (key, value) in params {
            match key.as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "algorithm" => algorithm = DigestAlgorithm::parse(&value)?,
                "opaque" => opaque = Some(value),
                "qop" => {
                    qop = value
                        .split(',')
                        .map(|q| q.trim().to_ascii_lowercase())
                        .filter(|q| !q.is_empty())
                        .collect();
                }
                "stale" => stale = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        Some(Self {
            realm: realm?,
            nonce: nonce.filter(|n| !n.is_empty())?,
            algorithm,
            opaque,
            qop,
            stale,
        })
    }

    fn offers_auth_qop(&self) -> bool {
        self.qop.iter().any(|q| q == "auth")
    }

    /// Compute the `response=` value.
    ///
    /// `qop` carries the nonce count and client nonce when the `auth`
    /// quality of protection is in use.
    fn response(
        &self,
        user: &str,
        pass: &str,
        method: &str,
        uri: &str,
        qop: Option<(&str, &str)>,
    ) -> String {
        let alg = self.algorithm;
        let mut ha1 = alg.hash(&format!("{}:{}:{}", user, self.realm, pass));
        if alg.is_session() {
            let cnonce = qop.map(|(_, cnonce)| cnonce).unwrap_or_default();
            ha1 = alg.hash(&format!("{}:{}:{}", ha1, self.nonce, cnonce));
        }
        let ha2 = alg.hash(&format!("{}:{}", method, uri));

        match qop {
            Some((nc, cnonce)) => alg.hash(&format!(
                "{}:{}:{}:{}:auth:{}",
                ha1, self.nonce, nc, cnonce, ha2
            )),
            None => alg.hash(&format!("{}:{}:{}", ha1, self.nonce, ha2)),
        }
    }
}

/// Locate the parameter list following the `Digest` scheme token.
fn digest_section(header: &str) -> Option<&str> {
    const SCHEME: &str = "digest";
    let lower = header.to_ascii_lowercase();
    let mut from = 0;

    while let Some(pos) = lower[from..].find(SCHEME) {
        let start = from + pos;
        let end = start + SCHEME.len();
        let at_boundary = start == 0 || lower[..start].trim_end().ends_with(',');
        let followed_by_space = lower[end..].starts_with(char::is_whitespace);
        if at_boundary && followed_by_space {
            return Some(&header[end..]);
        }
        from = end;
    }
    None
}

/// Parse `key=value` / `key="quoted value"` pairs.
///
/// Stops at the first token that is not followed by `=`, which is where the
/// next auth scheme starts.
fn parse_params(input: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && *c != ',' && !c.is_whitespace()) {
            key.push(c);
        }
        if key.is_empty() {
            break;
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next_if_eq(&'=').is_none() {
            break;
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'"').is_some() {
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => value.push(c),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| *c != ',' && !c.is_whitespace()) {
                value.push(c);
            }
        }

        params.push((key.to_ascii_lowercase(), value));
    }

    params
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Lifecycle of a [`DigestAuth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestState {
    /// No challenge seen yet; requests go out without a header.
    Unchallenged,
    /// Realm and nonce captured; requests carry a computed response.
    Challenged,
}

/// Digest credentials plus the challenge they answer.
pub struct DigestAuth {
    user: String,
    pass: String,
    challenge: Option<DigestChallenge>,
    nonce_count: AtomicU32,
}

impl DigestAuth {
    /// Create an unchallenged authenticator.
    ///
    /// Resolved logins start as Basic and only reach Digest through a
    /// challenge, so this state exists for callers that pick Digest up front.
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
            challenge: None,
            nonce_count: AtomicU32::new(0),
        }
    }

    /// Create an authenticator already seeded with a server challenge.
    pub fn challenged(
        user: impl Into<String>,
        pass: impl Into<String>,
        challenge: DigestChallenge,
    ) -> Self {
        Self {
            challenge: Some(challenge),
            ..Self::new(user, pass)
        }
    }

    pub fn state(&self) -> DigestState {
        match self.challenge {
            Some(_) => DigestState::Challenged,
            None => DigestState::Unchallenged,
        }
    }

    pub fn challenge(&self) -> Option<&DigestChallenge> {
        self.challenge.as_ref()
    }

    fn header_value(&self, method: &str, uri: &str, cnonce: &str) -> Option<String> {
        let challenge = self.challenge.as_ref()?;

        let nc;
        let qop = if challenge.offers_auth_qop() {
            let count = self.nonce_count.fetch_add(1, Ordering::SeqCst) + 1;
            nc = format!("{:08x}", count);
            Some((nc.as_str(), cnonce))
        } else {
            None
        };

        let response = challenge.response(&self.user, &self.pass, method, uri, qop);

        let mut header = format!(
            "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", algorithm={}, response=\"{}\"",
            quote(&self.user),
            quote(&challenge.realm),
            quote(&challenge.nonce),
            quote(uri),
            challenge.algorithm.as_str(),
            response
        );
        if let Some((nc, cnonce)) = qop {
            header.push_str(&format!(", qop=auth, nc={}, cnonce=\"{}\"", nc, cnonce));
        }
        if let Some(opaque) = &challenge.opaque {
            header.push_str(&format!(", opaque=\"{}\"", quote(opaque)));
        }
        Some(header)
    }
}

impl Authorizer for DigestAuth {
    fn kind(&self) -> &'static str {
        "DigestAuth"
    }

    fn user(&self) -> &str {
        &self.user
    }

    fn pass(&self) -> &str {
        &self.pass
    }

    fn authorize(&self, headers: &mut HeaderMap, method: &Method, path: &str) {
        let cnonce = format!("{:016x}", rand::random::<u64>());
        if let Some(value) = self.header_value(method.as_str(), path, &cnonce) {
            set_authorization(headers, &value, self.kind());
        }
    }
}

impl fmt::Debug for DigestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestAuth")
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .field("challenge", &self.challenge)
            .finish()
    }
}
