//! Verb lookup and the glue between a verb and the client.

use crate::client::{FileInfo, WebDavClient};
use crate::error::{DavError, Result};
use clap::ValueEnum;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// How `list` and `stat` print their results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// The operations reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Stat,
    Read,
    Write,
    Delete,
    Mkdir,
    MkdirAll,
    Rename,
    Copy,
}

impl FromStr for Command {
    type Err = DavError;

    /// Case-insensitive; unknown verbs name themselves in the error.
    fn from_str(verb: &str) -> Result<Self> {
        let command = match verb.to_ascii_uppercase().as_str() {
            "LS" | "LIST" | "PROPFIND" => Command::List,
            "STAT" => Command::Stat,
            "GET" | "PULL" | "READ" => Command::Read,
            "DELETE" | "RM" | "DEL" => Command::Delete,
            "MKCOL" | "MKDIR" => Command::Mkdir,
            "MKCOLALL" | "MKDIRALL" | "MKDIRP" => Command::MkdirAll,
            "RENAME" | "MV" | "MOVE" => Command::Rename,
            "COPY" | "CP" => Command::Copy,
            "PUT" | "PUSH" | "WRITE" => Command::Write,
            _ => return Err(DavError::UnsupportedMethod(verb.to_string())),
        };
        Ok(command)
    }
}

impl Command {
    /// Run against `client` with the remote path `p0` and the optional
    /// second argument `p1` (local file or destination, empty if absent).
    ///
    /// Returns the report to print.
    pub async fn run(
        self,
        client: &WebDavClient,
        p0: &str,
        p1: &str,
        output: OutputFormat,
    ) -> Result<String> {
        debug!(command = ?self, p0, p1, "Running command");
        match self {
            Command::List => {
                let files = client.read_dir(p0).await?;
                list_report(p0, &files, output)
            }
            Command::Stat => {
                let file = client.stat(p0).await?;
                match output {
                    OutputFormat::Text => Ok(format!("{file}\n")),
                    OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&file)?)),
                }
            }
            Command::Read => {
                let data = client.read(p0).await?;
                let target = local_path(p0, p1);
                write_local(&target, &data).await?;
                Ok(format!(
                    "Written {} bytes to: {}\n",
                    data.len(),
                    target.display()
                ))
            }
            Command::Write => {
                let source = local_path(p0, p1);
                let data = read_local(&source).await?;
                client.write(p0, &data).await?;
                Ok(format!("Put: {} -> {}\n", source.display(), p0))
            }
            Command::Delete => {
                client.remove(p0).await?;
                Ok(format!("Remove: {p0}\n"))
            }
            Command::Mkdir => {
                client.mkdir(p0).await?;
                Ok(format!("Mkdir: {p0}\n"))
            }
            Command::MkdirAll => {
                client.mkdir_all(p0).await?;
                Ok(format!("MkdirAll: {p0}\n"))
            }
            Command::Rename => {
                client.rename(p0, p1, true).await?;
                Ok(format!("Rename: {p0} -> {p1}\n"))
            }
            Command::Copy => {
                client.copy(p0, p1, true).await?;
                Ok(format!("Copy: {p0} -> {p1}\n"))
            }
        }
    }
}

fn list_report(p0: &str, files: &[FileInfo], output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(files)?));
    }

    let mut report = format!("ReadDir: '{}' entries: {}\n", p0, files.len());
    for file in files {
        // writing to a String cannot fail
        let _ = writeln!(report, "{file}");
    }
    Ok(report)
}

/// Local counterpart of a remote path: `p1` when given, else `./<p0>`.
fn local_path(p0: &str, p1: &str) -> PathBuf {
    if p1.is_empty() {
        Path::new(".").join(p0.trim_start_matches('/'))
    } else {
        PathBuf::from(p1)
    }
}

async fn write_local(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, data).await?;
    Ok(())
}

async fn read_local(path: &Path) -> Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.is_dir() {
        return Err(DavError::IsDirectory(path.to_path_buf()));
    }
    Ok(tokio::fs::read(path).await?)
}
