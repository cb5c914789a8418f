//! WebDAV client.
//!
//! Every request goes through [`WebDavClient::send`], which decorates it with
//! the active authenticator. A `401` lets a login session switch to the
//! scheme the server asked for and retry once.

pub mod propfind;

use crate::auth::{Authenticator, Authorizer};
use crate::error::{DavError, Result};
use reqwest::header::{CONTENT_TYPE, HeaderMap, WWW_AUTHENTICATE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub use propfind::FileInfo;

/// Settings handed to the HTTP transport.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Accept invalid TLS certificates.
    pub insecure: bool,
    /// Per-request timeout; none by default.
    pub timeout: Option<Duration>,
}

/// Client for a WebDAV endpoint.
#[derive(Debug)]
pub struct WebDavClient {
    http: reqwest::Client,
    root: Url,
    auth: RwLock<Authenticator>,
}

impl WebDavClient {
    /// Create a client for `root` using `authenticator` for every request.
    pub fn new(root: &str, authenticator: Authenticator, config: &TransportConfig) -> Result<Self> {
        let mut root =
            Url::parse(root).map_err(|e| DavError::InvalidEndpoint(format!("{root}: {e}")))?;
        if !matches!(root.scheme(), "http" | "https") || root.cannot_be_a_base() {
            return Err(DavError::InvalidEndpoint(root.to_string()));
        }
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(config.insecure);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        debug!(root = %root, kind = authenticator.kind(), "Created WebDAV client");

        Ok(Self {
            http: builder.build()?,
            root,
            auth: RwLock::new(authenticator),
        })
    }

    /// The normalized endpoint, always ending in `/`.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Scheme of the authenticator currently in use.
    pub async fn authenticator_kind(&self) -> &'static str {
        self.auth.read().await.kind()
    }

    /// Resolve a remote path against the endpoint.
    ///
    /// Segments are percent-encoded; a trailing `/` is kept.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let mut url = self.root.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| DavError::InvalidEndpoint(self.root.to_string()))?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            if path.ends_with('/') {
                segments.push("");
            }
        }
        Ok(url)
    }

    /// Send a request, authorizing it and answering one challenge.
    ///
    /// `decorate` adds headers and body; it runs again for the retry.
    pub async fn send<F>(&self, method: Method, path: &str, decorate: F) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url_for(path)?;
        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let mut retried = false;
        loop {
            let mut headers = HeaderMap::new();
            self.auth.read().await.authorize(&mut headers, &method, &uri);

            debug!(%method, %url, "Sending request");
            let request = self
                .http
                .request(method.clone(), url.clone())
                .headers(headers);
            let response = decorate(request).send().await?;

            let status = response.status();
            if status != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }
            if retried {
                warn!(%method, %url, "Credentials rejected after retry");
                return Err(DavError::Unauthorized { status });
            }

            let challenges: Vec<String> = response
                .headers()
                .get_all(WWW_AUTHENTICATE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .map(str::to_string)
                .collect();

            if !self.answer_challenge(&challenges).await {
                return Err(DavError::Unauthorized { status });
            }
            retried = true;
        }
    }

    /// Swap in the authenticator that answers `challenges`.
    async fn answer_challenge(&self, challenges: &[String]) -> bool {
        let mut auth = self.auth.write().await;
        match auth.answer_challenge(challenges.iter().map(String::as_str)) {
            Some(next) => {
                info!(
                    from = auth.kind(),
                    to = next.kind(),
                    "Server requested authentication, switching scheme"
                );
                *auth = next;
                true
            }
            None => {
                debug!(kind = auth.kind(), "Challenge cannot be answered");
                false
            }
        }
    }

    /// List the entries of a collection, excluding the collection itself.
    pub async fn read_dir(&self, path: &str) -> Result<Vec<FileInfo>> {
        let dir = collection(path);
        let own = self.url_for(&dir)?;
        let mut files = self.propfind(&dir, "1", "ReadDir").await?;

        let own_path = decode_path(own.path());
        files.retain(|file| file.path.trim_end_matches('/') != own_path.trim_end_matches('/'));
        for file in &mut files {
            file.path = self.relative(&file.path);
        }
        Ok(files)
    }

    /// Properties of a single resource.
    pub async fn stat(&self, path: &str) -> Result<FileInfo> {
        let mut files = self.propfind(path, "0", "Stat").await?;
        if files.is_empty() {
            return Err(DavError::Xml(format!("no entry for {path}")));
        }
        let mut file = files.swap_remove(0);
        file.path = self.relative(&file.path);
        Ok(file)
    }

    async fn propfind(&self, path: &str, depth: &str, op: &'static str) -> Result<Vec<FileInfo>> {
        let response = self
            .send(dav_method("PROPFIND")?, path, |request| {
                request
                    .header("Depth", depth)
                    .header(CONTENT_TYPE, "application/xml; charset=utf-8")
                    .body(propfind::PROPFIND_BODY)
            })
            .await?;

        let status = response.status();
        if status != StatusCode::MULTI_STATUS {
            return Err(status_error(op, path, status));
        }
        let body = response.text().await?;
        propfind::parse_multistatus(&body)
    }

    /// Download a file.
    pub async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(Method::GET, path, |request| request).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(status_error("Read", path, status));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Upload a file, creating missing parent collections on `409`.
    pub async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut status = self.put(path, data).await?;
        if status == StatusCode::CONFLICT
            && let Some(parent) = parent(path)
        {
            debug!("Parent of {} is missing, creating it", path);
            self.mkdir_all(parent).await?;
            status = self.put(path, data).await?;
        }

        match status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            status => Err(status_error("Write", path, status)),
        }
    }

    async fn put(&self, path: &str, data: &[u8]) -> Result<StatusCode> {
        let response = self
            .send(Method::PUT, path, |request| request.body(data.to_vec()))
            .await?;
        Ok(response.status())
    }

    /// Delete a resource. A missing resource counts as deleted.
    pub async fn remove(&self, path: &str) -> Result<()> {
        let response = self.send(Method::DELETE, path, |request| request).await?;
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(()),
            status => Err(status_error("Remove", path, status)),
        }
    }

    /// Create a single collection.
    pub async fn mkdir(&self, path: &str) -> Result<()> {
        match self.mkcol(path).await? {
            StatusCode::CREATED => Ok(()),
            status => Err(status_error("Mkdir", path, status)),
        }
    }

    /// Create a collection and any missing ancestors.
    pub async fn mkdir_all(&self, path: &str) -> Result<()> {
        let status = self.mkcol(path).await?;
        if matches!(status, StatusCode::CREATED | StatusCode::METHOD_NOT_ALLOWED) {
            return Ok(());
        }
        if status != StatusCode::CONFLICT {
            return Err(status_error("MkdirAll", path, status));
        }

        let mut current = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            let status = self.mkcol(&current).await?;
            if !matches!(status, StatusCode::CREATED | StatusCode::METHOD_NOT_ALLOWED) {
                return Err(status_error("MkdirAll", &current, status));
            }
        }
        Ok(())
    }

    async fn mkcol(&self, path: &str) -> Result<StatusCode> {
        let response = self
            .send(dav_method("MKCOL")?, &collection(path), |request| request)
            .await?;
        Ok(response.status())
    }

    /// Move `old` to `new`.
    pub async fn rename(&self, old: &str, new: &str, overwrite: bool) -> Result<()> {
        self.copy_move("Rename", "MOVE", old, new, overwrite).await
    }

    /// Copy `old` to `new`.
    pub async fn copy(&self, old: &str, new: &str, overwrite: bool) -> Result<()> {
        self.copy_move("Copy", "COPY", old, new, overwrite).await
    }

    async fn copy_move(
        &self,
        op: &'static str,
        method: &'static str,
        old: &str,
        new: &str,
        overwrite: bool,
    ) -> Result<()> {
        let method = dav_method(method)?;
        let destination = self.url_for(new)?;
        let overwrite = if overwrite { "T" } else { "F" };

        let mut status = self
            .transfer(&method, old, destination.as_str(), overwrite)
            .await?;
        if status == StatusCode::CONFLICT
            && let Some(parent) = parent(new)
        {
            debug!("Parent of {} is missing, creating it", new);
            self.mkdir_all(parent).await?;
            status = self
                .transfer(&method, old, destination.as_str(), overwrite)
                .await?;
        }

        match status {
            StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            status => Err(status_error(op, old, status)),
        }
    }

    async fn transfer(
        &self,
        method: &Method,
        old: &str,
        destination: &str,
        overwrite: &'static str,
    ) -> Result<StatusCode> {
        let response = self
            .send(method.clone(), old, |request| {
                request
                    .header("Destination", destination)
                    .header("Overwrite", overwrite)
            })
            .await?;
        Ok(response.status())
    }

    /// Strip the endpoint prefix from a decoded server path.
    fn relative(&self, path: &str) -> String {
        let root = decode_path(self.root.path());
        match path.strip_prefix(root.trim_end_matches('/')) {
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => path.to_string(),
        }
    }
}

fn dav_method(name: &'static str) -> Result<Method> {
    Method::from_bytes(name.as_bytes()).map_err(|_| DavError::UnsupportedMethod(name.to_string()))
}

fn status_error(op: &'static str, path: &str, status: StatusCode) -> DavError {
    DavError::Status {
        op,
        path: path.to_string(),
        status,
    }
}

fn decode_path(path: &str) -> String {
    urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Same path with a trailing slash, as collections expect.
fn collection(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Parent collection of `path`, `None` at the top level.
fn parent(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DigestAuth;
    use httpmock::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn client(server: &MockServer, authenticator: Authenticator) -> WebDavClient {
        WebDavClient::new(&server.base_url(), authenticator, &TransportConfig::default()).unwrap()
    }

    /// Matches only the first `method` request for `path`. Mocks are tried in
    /// creation order, so a later mock for the same path answers the retry.
    fn first_request(
        method: &'static str,
        path: &'static str,
    ) -> impl Fn(&HttpMockRequest) -> bool + Send + Sync + 'static {
        let seen = AtomicBool::new(false);
        move |req| {
            req.method_str() == method
                && req.uri().path() == path
                && !seen.swap(true, Ordering::SeqCst)
        }
    }

    fn legacy_digest(user: &str, realm: &str, pass: &str, nonce: &str, uri: &str) -> String {
        let ha1 = format!("{:x}", md5::compute(format!("{user}:{realm}:{pass}")));
        let ha2 = format!("{:x}", md5::compute(format!("GET:{uri}")));
        let response = format!("{:x}", md5::compute(format!("{ha1}:{nonce}:{ha2}")));
        format!(
            "Digest username=\"{user}\", realm=\"{realm}\", nonce=\"{nonce}\", uri=\"{uri}\", algorithm=MD5, response=\"{response}\""
        )
    }

    #[test]
    fn test_url_for() {
        let client = WebDavClient::new(
            "https://dav.example.com/remote.php/webdav",
            Authenticator::none(),
            &TransportConfig::default(),
        )
        .unwrap();

        assert_eq!(client.root().path(), "/remote.php/webdav/");
        assert_eq!(
            client.url_for("/docs/my notes.txt").unwrap().path(),
            "/remote.php/webdav/docs/my%20notes.txt"
        );
        assert_eq!(
            client.url_for("docs/").unwrap().path(),
            "/remote.php/webdav/docs/"
        );
        assert_eq!(client.url_for("").unwrap().path(), "/remote.php/webdav");
        assert_eq!(client.url_for("/").unwrap().path(), "/remote.php/webdav/");
    }

    #[test]
    fn test_rejects_non_http_root() {
        let err = WebDavClient::new(
            "ftp://files.example.com/",
            Authenticator::none(),
            &TransportConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DavError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("/a/b/c.txt"), Some("/a/b"));
        assert_eq!(parent("/a/b/"), Some("/a"));
        assert_eq!(parent("/c.txt"), None);
        assert_eq!(parent("c.txt"), None);
    }

    #[tokio::test]
    async fn test_basic_then_digest_upgrade() {
        let server = MockServer::start_async().await;
        let basic = server.mock(|when, then| {
            when.method(GET)
                .path("/file.txt")
                .header("authorization", "Basic YWxpY2U6c2VjcmV0");
            then.status(401)
                .header("WWW-Authenticate", r#"Digest realm="x", nonce="y""#);
        });
        let digest = server.mock(|when, then| {
            when.method(GET).path("/file.txt").header(
                "authorization",
                legacy_digest("alice", "x", "secret", "y", "/file.txt"),
            );
            then.status(200).body("hello");
        });

        let client = client(&server, Authenticator::basic("alice", "secret"));
        let data = client.read("/file.txt").await.unwrap();

        assert_eq!(data, b"hello");
        basic.assert();
        digest.assert();
        assert_eq!(client.authenticator_kind().await, "DigestAuth");
    }

    #[tokio::test]
    async fn test_unchallenged_digest_answers_first_challenge() {
        let server = MockServer::start_async().await;
        let digest = server.mock(|when, then| {
            when.method(GET).path("/file.txt").header(
                "authorization",
                legacy_digest("alice", "x", "secret", "y", "/file.txt"),
            );
            then.status(200).body("hello");
        });
        let challenge = server.mock(|when, then| {
            when.method(GET)
                .path("/file.txt")
                .header_missing("authorization");
            then.status(401)
                .header("WWW-Authenticate", r#"Digest realm="x", nonce="y""#);
        });

        let client = client(
            &server,
            Authenticator::Digest(DigestAuth::new("alice", "secret")),
        );
        assert_eq!(client.read("/file.txt").await.unwrap(), b"hello");

        challenge.assert_calls(1);
        digest.assert_calls(1);
        assert_eq!(client.authenticator_kind().await, "DigestAuth");
    }

    #[tokio::test]
    async fn test_two_challenges_stop_retrying() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/file.txt");
            then.status(401).header("WWW-Authenticate", r#"Basic realm="x""#);
        });

        let client = client(&server, Authenticator::basic("alice", "wrong"));
        let err = client.read("/file.txt").await.unwrap_err();

        assert!(matches!(
            err,
            DavError::Unauthorized {
                status: StatusCode::UNAUTHORIZED
            }
        ));
        assert!(err.to_string().contains("401"));
        mock.assert_calls(2);
    }

    #[tokio::test]
    async fn test_bearer_is_not_renegotiated() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/file.txt")
                .header("authorization", "Bearer tok en/+=");
            then.status(401)
                .header("WWW-Authenticate", r#"Digest realm="x", nonce="y""#);
        });

        let client = client(&server, Authenticator::bearer("tok en/+="));
        let err = client.read("/file.txt").await.unwrap_err();

        assert!(matches!(err, DavError::Unauthorized { .. }));
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_anonymous_sends_no_header() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/public.txt")
                .header_missing("authorization");
            then.status(200).body("open");
        });

        let client = client(&server, Authenticator::none());
        assert_eq!(client.read("/public.txt").await.unwrap(), b"open");
        mock.assert();
    }

    #[tokio::test]
    async fn test_read_dir_skips_self() {
        let server = MockServer::start_async().await;
        let body = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>/dav/docs/</d:href>
    <d:propstat><d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
    <d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>
  <d:response><d:href>/dav/docs/a.txt</d:href>
    <d:propstat><d:prop><d:resourcetype/><d:getcontentlength>5</d:getcontentlength></d:prop>
    <d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>
</d:multistatus>"#;
        let mock = server.mock(|when, then| {
            when.path("/dav/docs/").header("depth", "1");
            then.status(207)
                .header("content-type", "application/xml")
                .body(body);
        });

        let client = client_at(&server, "/dav");
        let files = client.read_dir("/docs").await.unwrap();

        mock.assert();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "/docs/a.txt");
        assert_eq!(files[0].size, 5);
    }

    fn client_at(server: &MockServer, root: &str) -> WebDavClient {
        WebDavClient::new(
            &server.url(root),
            Authenticator::none(),
            &TransportConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_stat_not_found() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.path("/missing.txt").header("depth", "0");
            then.status(404);
        });

        let client = client(&server, Authenticator::none());
        let err = client.stat("/missing.txt").await.unwrap_err();
        assert_eq!(err.to_string(), "Stat /missing.txt: 404 Not Found");
    }

    #[tokio::test]
    async fn test_write_uploads_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/up.txt").body("payload");
            then.status(201);
        });

        let client = client(&server, Authenticator::none());
        client.write("/up.txt", b"payload").await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/gone.txt");
            then.status(404);
        });

        let client = client(&server, Authenticator::none());
        client.remove("/gone.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_mkdir_all_existing_is_ok() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/a/b/");
            then.status(405);
        });

        let client = client(&server, Authenticator::none());
        client.mkdir_all("/a/b").await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_mkdir_reports_status() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.path("/a/b/");
            then.status(409);
        });

        let client = client(&server, Authenticator::none());
        let err = client.mkdir("/a/b").await.unwrap_err();
        assert!(matches!(
            err,
            DavError::Status {
                status: StatusCode::CONFLICT,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_copy_sends_destination() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/a.txt")
                .header("destination", server.url("/b.txt"))
                .header("overwrite", "T");
            then.status(201);
        });

        let client = client(&server, Authenticator::none());
        client.copy("/a.txt", "/b.txt", true).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_rename_without_overwrite() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/a.txt").header("overwrite", "F");
            then.status(412);
        });

        let client = client(&server, Authenticator::none());
        let err = client.rename("/a.txt", "/b.txt", false).await.unwrap_err();
        assert!(err.to_string().starts_with("Rename /a.txt: 412"));
        mock.assert();
    }

    #[tokio::test]
    async fn test_write_creates_missing_parents() {
        let server = MockServer::start_async().await;
        let put_conflict = server.mock(|when, then| {
            when.is_true(first_request("PUT", "/a/b/f.txt"));
            then.status(409);
        });
        let mkcol_conflict = server.mock(|when, then| {
            when.is_true(first_request("MKCOL", "/a/b/"));
            then.status(409);
        });
        let mkcol_a = server.mock(|when, then| {
            when.path("/a/");
            then.status(201);
        });
        let mkcol_b = server.mock(|when, then| {
            when.path("/a/b/");
            then.status(201);
        });
        let put = server.mock(|when, then| {
            when.method(PUT).path("/a/b/f.txt").body("payload");
            then.status(201);
        });

        let client = client(&server, Authenticator::none());
        client.write("/a/b/f.txt", b"payload").await.unwrap();

        put_conflict.assert_calls(1);
        mkcol_conflict.assert_calls(1);
        mkcol_a.assert_calls(1);
        mkcol_b.assert_calls(1);
        put.assert_calls(1);
    }

    #[tokio::test]
    async fn test_write_conflict_after_retry() {
        let server = MockServer::start_async().await;
        let put = server.mock(|when, then| {
            when.method(PUT).path("/a/f.txt");
            then.status(409);
        });
        let mkcol = server.mock(|when, then| {
            when.path("/a/");
            then.status(201);
        });

        let client = client(&server, Authenticator::none());
        let err = client.write("/a/f.txt", b"payload").await.unwrap_err();

        assert!(matches!(
            err,
            DavError::Status {
                op: "Write",
                status: StatusCode::CONFLICT,
                ..
            }
        ));
        put.assert_calls(2);
        mkcol.assert_calls(1);
    }

    #[tokio::test]
    async fn test_mkdir_all_walks_ancestors() {
        let server = MockServer::start_async().await;
        let conflict = server.mock(|when, then| {
            when.is_true(first_request("MKCOL", "/a/b/c/"));
            then.status(409);
        });
        let a = server.mock(|when, then| {
            when.path("/a/");
            then.status(405);
        });
        let b = server.mock(|when, then| {
            when.path("/a/b/");
            then.status(201);
        });
        let c = server.mock(|when, then| {
            when.path("/a/b/c/");
            then.status(201);
        });

        let client = client(&server, Authenticator::none());
        client.mkdir_all("/a/b/c").await.unwrap();

        conflict.assert_calls(1);
        a.assert_calls(1);
        b.assert_calls(1);
        c.assert_calls(1);
    }

    #[tokio::test]
    async fn test_mkdir_all_stops_at_failed_ancestor() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.path("/a/b/c/");
            then.status(409);
        });
        server.mock(|when, then| {
            when.path("/a/");
            then.status(403);
        });
        let b = server.mock(|when, then| {
            when.path("/a/b/");
            then.status(201);
        });

        let client = client(&server, Authenticator::none());
        let err = client.mkdir_all("/a/b/c").await.unwrap_err();

        match err {
            DavError::Status { op, path, status } => {
                assert_eq!(op, "MkdirAll");
                assert_eq!(path, "/a");
                assert_eq!(status, StatusCode::FORBIDDEN);
            }
            other => panic!("unexpected error: {other}"),
        }
        b.assert_calls(0);
    }

    #[tokio::test]
    async fn test_copy_creates_missing_parent() {
        let server = MockServer::start_async().await;
        let conflict = server.mock(|when, then| {
            when.is_true(first_request("COPY", "/a.txt"));
            then.status(409);
        });
        let mkcol = server.mock(|when, then| {
            when.path("/x/y/");
            then.status(201);
        });
        let copy = server.mock(|when, then| {
            when.path("/a.txt")
                .header("destination", server.url("/x/y/b.txt"))
                .header("overwrite", "F");
            then.status(201);
        });

        let client = client(&server, Authenticator::none());
        client.copy("/a.txt", "/x/y/b.txt", false).await.unwrap();

        conflict.assert_calls(1);
        mkcol.assert_calls(1);
        copy.assert_calls(1);
    }
}
