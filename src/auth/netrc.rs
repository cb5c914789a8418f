//! Machine-credentials (`.netrc`) lookup.
//!
//! ```text
//! machine dav.example.com
//!   login alice
//!   password secret
//! ```
//!
//! Lookup never fails loudly: a missing or unreadable file, or one with no
//! usable entry for the host, yields `None`.

use super::credentials::Login;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default)]
struct Entry {
    machine: Option<String>,
    login: Option<String>,
    password: Option<String>,
}

/// Find the login for `host` in the netrc file at `path`.
///
/// `hosts` are matched against `machine` names case-insensitively, in order,
/// so callers pass `host:port` before `host` when a port is explicit.
pub fn lookup(path: &Path, hosts: &[&str]) -> Option<Login> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Cannot read netrc file {}: {}", path.display(), e);
            return None;
        }
    };

    let found = find(&content, hosts);
    if found.is_none() {
        debug!("No netrc entry for {:?} in {}", hosts, path.display());
    }
    found
}

/// Parse netrc `content` and return the first complete entry for the
/// earliest of `hosts` that has one.
pub fn find(content: &str, hosts: &[&str]) -> Option<Login> {
    let entries = parse(content);

    hosts.iter().find_map(|host| {
        entries
            .iter()
            .filter(|entry| {
                entry
                    .machine
                    .as_deref()
                    .is_some_and(|machine| machine.eq_ignore_ascii_case(host))
            })
            .find_map(|entry| match (&entry.login, &entry.password) {
                (Some(login), Some(password)) if !login.is_empty() && !password.is_empty() => {
                    Some(Login::new(login.as_str(), password.as_str()))
                }
                _ => None,
            })
    })
}

fn parse(content: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current: Option<Entry> = None;
    let mut tokens = tokens(content).into_iter();

    while let Some(token) = tokens.next() {
        match token {
            "machine" => {
                entries.extend(current.take());
                current = Some(Entry {
                    machine: tokens.next().map(str::to_string),
                    ..Entry::default()
                });
            }
            "default" => {
                entries.extend(current.take());
                current = Some(Entry::default());
            }
            "login" => {
                let value = tokens.next().map(str::to_string);
                if let Some(entry) = current.as_mut() {
                    entry.login = value;
                }
            }
            "password" => {
                let value = tokens.next().map(str::to_string);
                if let Some(entry) = current.as_mut() {
                    entry.password = value;
                }
            }
            "account" => {
                tokens.next();
            }
            "macdef" => {
                entries.extend(current.take());
            }
            _ => {}
        }
    }

    entries.extend(current);
    entries
}

/// Whitespace-separated tokens, newlines included, with `macdef` bodies
/// removed. A macro body runs until the next blank line.
fn tokens(content: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut in_macro = false;

    for line in content.lines() {
        if in_macro {
            in_macro = !line.trim().is_empty();
            continue;
        }
        for word in line.split_whitespace() {
            tokens.push(word);
            if word == "macdef" {
                in_macro = true;
                break;
            }
        }
    }
    tokens
}
