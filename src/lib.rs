//! Pick a host from an SSH config and connect to it.
//!
//! Config entries are parsed ([`ssh_config`]), normalized into a host list
//! ([`hosts`]), filtered by a search query ([`filter`]) and browsed with a
//! wrapping cursor ([`selection`]). The chosen host is handed to
//! [`connection::launch`].

pub mod app;
pub mod connection;
pub mod error;
pub mod event;
pub mod filter;
pub mod handler;
pub mod hosts;
pub mod logging;
pub mod selection;
pub mod ssh_config;
pub mod tui;
pub mod ui;
