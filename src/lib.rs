//! lazydav - command-line client for WebDAV servers.

pub mod auth;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod launcher;
