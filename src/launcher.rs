//! Application init

use crate::auth::CredentialResolver;
use crate::cli::Args;
use crate::client::{TransportConfig, WebDavClient};
use crate::commands::Command;
use crate::error::{DavError, Result};
use reqwest::Url;
use std::time::Duration;

/// Build the client from `args` and run the requested command.
///
/// The verb is checked before anything else, so an unknown verb never
/// reaches the network. Returns the report to print.
pub async fn start(args: Args) -> Result<String> {
    let command: Command = args.method.parse()?;

    let (p0, p1) = match args.paths.as_slice() {
        [p0] => (p0.as_str(), ""),
        [p0, p1] => (p0.as_str(), p1.as_str()),
        _ => return Err(DavError::UnsupportedArguments),
    };

    let endpoint = Url::parse(&args.root)
        .map_err(|e| DavError::InvalidEndpoint(format!("{}: {}", args.root, e)))?;
    let authenticator = CredentialResolver::new(
        args.token.as_str(),
        args.user.as_str(),
        args.password.as_str(),
    )
    .with_netrc_file(&args.netrc_file)
    .authenticator(&endpoint);

    let transport = TransportConfig {
        insecure: args.insecure,
        timeout: args.timeout.map(Duration::from_secs),
    };
    let client = WebDavClient::new(&args.root, authenticator, &transport)?;

    command.run(&client, p0, p1, args.output).await
}
