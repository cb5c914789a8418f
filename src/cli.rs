//! Clap config
use crate::commands::OutputFormat;
use crate::config::{ENV_INSECURE, ENV_PASSWORD, ENV_ROOT, ENV_TOKEN, ENV_USER, default_netrc_path};
use clap::Parser;
use clap::error::{Error, ErrorKind};
use std::path::PathBuf;

/// lazydav - command-line client for WebDAV servers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// WebDAV endpoint
    #[arg(long, env = ENV_ROOT)]
    pub root: String,

    /// User
    #[arg(long, env = ENV_USER, default_value = "")]
    pub user: String,

    /// Password
    #[arg(long = "pw", env = ENV_PASSWORD, default_value = "", hide_env_values = true)]
    pub password: String,

    /// Bearer token, takes precedence over user and password
    #[arg(long, env = ENV_TOKEN, default_value = "", hide_env_values = true)]
    pub token: String,

    /// Read the login from this netrc file when no password is given
    #[arg(long = "netrc-file", default_value_os_t = default_netrc_path())]
    pub netrc_file: PathBuf,

    /// Method: LS, STAT, MKDIR, MKDIRALL, GET, PUT, MV, CP, DEL
    #[arg(short = 'X', long = "method", default_value = "")]
    pub method: String,

    /// Accept invalid TLS certificates
    #[arg(long, env = ENV_INSECURE)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output format for LS and STAT
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// <PATH> [<FILE>|<NEW>]
    #[arg(required = true, num_args = 1..=2)]
    pub paths: Vec<String>,
}

/// Help and version output, which clap prints and exits 0 for.
pub fn is_display_request(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}
