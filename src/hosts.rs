//! Turns raw config entries into the host list shown by the picker.

use std::net::IpAddr;

use tracing::debug;

use crate::ssh_config::model::{DEFAULT_PORT, Host, RawEntry};

/// Build the host list from raw entries.
///
/// Entries without a name, or without any way to connect, are dropped.
/// Duplicates (same name, user, hostname, proxy command and port) keep their
/// first occurrence. With `sort_by_name` the result is stably sorted by name,
/// ignoring case.
pub fn normalize(entries: &[RawEntry], sort_by_name: bool) -> Vec<Host> {
    let mut hosts: Vec<Host> = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(host) = to_host(entry) else {
            continue;
        };
        if hosts.iter().any(|h| h.identity() == host.identity()) {
            debug!(name = %host.display_name, "Dropping duplicate host");
            continue;
        }
        hosts.push(host);
    }

    if sort_by_name {
        hosts.sort_by_cached_key(|h| h.display_name.to_lowercase());
    }
    hosts
}

fn to_host(entry: &RawEntry) -> Option<Host> {
    let display_name = display_name(&entry.patterns);
    if display_name.is_empty() {
        debug!(patterns = ?entry.patterns, "Dropping host without a name");
        return None;
    }

    let mut host_name = entry.host_name.clone().unwrap_or_default();
    let proxy_command = entry.proxy_command.clone().unwrap_or_default();
    if host_name.is_empty() && proxy_command.is_empty() {
        if !is_valid_address(&display_name) {
            debug!(name = %display_name, "Dropping host without HostName or ProxyCommand");
            return None;
        }
        host_name.clone_from(&display_name);
    }

    Some(Host {
        patterns: entry.patterns.clone(),
        display_name,
        user: entry.user.clone().unwrap_or_default(),
        host_name,
        proxy_command,
        port: entry.port.unwrap_or(DEFAULT_PORT),
    })
}

/// Join patterns with a space and strip one pair of surrounding quotes.
pub fn display_name(patterns: &[String]) -> String {
    let joined = patterns.join(" ");
    match joined
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.to_string(),
        None => joined,
    }
}

/// Whether `name` is an IP literal or a syntactically valid DNS name.
pub fn is_valid_address(name: &str) -> bool {
    name.parse::<IpAddr>().is_ok() || is_dns_name(name)
}

fn is_dns_name(name: &str) -> bool {
    if name.is_empty() || name.chars().filter(|&c| c != '.').count() > 255 {
        return false;
    }
    let name = name.strip_suffix('.').unwrap_or(name);
    !name.is_empty() && name.split('.').all(is_dns_label)
}

fn is_dns_label(label: &str) -> bool {
    let mut chars = label.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    label.len() <= 63
        && (first.is_ascii_alphanumeric() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
