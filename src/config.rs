//! Defaults and environment variable names.

use std::path::PathBuf;

/// Environment variable holding the WebDAV endpoint.
pub const ENV_ROOT: &str = "ROOT";

/// Environment variable holding the username.
pub const ENV_USER: &str = "USER";

/// Environment variable holding the password.
pub const ENV_PASSWORD: &str = "PASSWORD";

/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "TOKEN";

/// Environment variable that disables TLS certificate validation.
pub const ENV_INSECURE: &str = "INSECURE";

/// File name of the machine-credentials file inside the home directory.
pub const NETRC_FILE_NAME: &str = ".netrc";

/// Identity reported by bearer sessions, the token carries no username.
pub const BEARER_IDENTITY: &str = "jwt-token";

/// Default location of the machine-credentials file (`~/.netrc`).
///
/// Falls back to a relative `.netrc` when no home directory is known.
pub fn default_netrc_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(NETRC_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(NETRC_FILE_NAME))
}
