use std::path::PathBuf;

use tracing::warn;

use super::pattern;

/// Port used when an entry does not set one.
pub const DEFAULT_PORT: u16 = 22;

/// An SSH config file reduced to the entries the host picker cares about.
#[derive(Debug, Clone)]
pub struct SshConfigFile {
    pub path: PathBuf,
    /// Host blocks in file order, with Include directives spliced in place.
    pub entries: Vec<RawEntry>,
}

/// A single `Host` block as written, before normalization.
///
/// Directives are `None` until the block (or a global default) sets them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    /// Tokens from the `Host` line. Quoted tokens keep their quotes.
    pub patterns: Vec<String>,
    pub host_name: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub proxy_command: Option<String>,
}

impl RawEntry {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns,
            ..Default::default()
        }
    }

    /// Record a directive for this block. The first value given wins, as in
    /// OpenSSH. Unknown keys are ignored.
    pub fn apply(&mut self, key: &str, value: &str) {
        match key.to_ascii_lowercase().as_str() {
            "hostname" => set_once(&mut self.host_name, value.to_string()),
            "user" => set_once(&mut self.user, value.to_string()),
            "proxycommand" => {
                // "ProxyCommand none" disables an inherited proxy.
                let value = if value.eq_ignore_ascii_case("none") {
                    String::new()
                } else {
                    value.to_string()
                };
                set_once(&mut self.proxy_command, value);
            }
            "port" => match value.parse::<u16>() {
                Ok(port) if port != 0 => set_once(&mut self.port, port),
                _ => warn!(port = value, "Ignoring invalid Port value"),
            },
            _ => {}
        }
    }

    /// Whether this is a pattern block (`Host *`, `Host *.prod`,
    /// `Host !bastion`) that configures other hosts instead of naming one.
    pub fn is_wildcard(&self) -> bool {
        self.patterns.iter().any(|p| pattern::is_wildcard(p))
    }

    /// Whether the pattern block `self` selects any of `host`'s names.
    pub fn applies_to(&self, host: &RawEntry) -> bool {
        host.patterns
            .iter()
            .any(|name| pattern::selects(&self.patterns, pattern::unquote(name)))
    }

    /// Fill the directives this block left unset from `defaults`, a pattern
    /// block or the pre-Host directives.
    pub fn inherit(&mut self, defaults: &RawEntry) {
        if self.host_name.is_none() {
            self.host_name.clone_from(&defaults.host_name);
        }
        if self.user.is_none() {
            self.user.clone_from(&defaults.user);
        }
        if self.port.is_none() {
            self.port = defaults.port;
        }
        if self.proxy_command.is_none() {
            self.proxy_command.clone_from(&defaults.proxy_command);
        }
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// A normalized host: what the table shows and what a connection uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Raw pattern tokens the host was built from.
    pub patterns: Vec<String>,
    pub display_name: String,
    pub user: String,
    pub host_name: String,
    pub proxy_command: String,
    pub port: u16,
}

impl Host {
    /// The tuple two hosts must share to count as duplicates.
    pub fn identity(&self) -> (&str, &str, &str, &str, u16) {
        (
            &self.display_name,
            &self.user,
            &self.host_name,
            &self.proxy_command,
            self.port,
        )
    }

    /// Turn the host back into a raw entry, field for field.
    pub fn to_raw_entry(&self) -> RawEntry {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawEntry {
            patterns: self.patterns.clone(),
            host_name: non_empty(&self.host_name),
            user: non_empty(&self.user),
            port: Some(self.port),
            proxy_command: non_empty(&self.proxy_command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_wins() {
        let mut entry = RawEntry::new(vec!["a".to_string()]);
        entry.apply("HostName", "first.example.com");
        entry.apply("hostname", "second.example.com");
        entry.apply("USER", "root");
        entry.apply("User", "admin");
        assert_eq!(entry.host_name.as_deref(), Some("first.example.com"));
        assert_eq!(entry.user.as_deref(), Some("root"));
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut entry = RawEntry::default();
        entry.apply("Port", "ssh");
        assert_eq!(entry.port, None);
        entry.apply("Port", "0");
        assert_eq!(entry.port, None);
        entry.apply("Port", "2222");
        assert_eq!(entry.port, Some(2222));
    }

    #[test]
    fn proxy_command_none_clears() {
        let mut entry = RawEntry::default();
        entry.apply("ProxyCommand", "none");
        assert_eq!(entry.proxy_command.as_deref(), Some(""));
    }

    #[test]
    fn inherit_only_fills_gaps() {
        let mut defaults = RawEntry::default();
        defaults.apply("User", "deploy");
        defaults.apply("Port", "2200");
        let mut entry = RawEntry::new(vec!["web".to_string()]);
        entry.apply("Port", "22");
        entry.inherit(&defaults);
        assert_eq!(entry.user.as_deref(), Some("deploy"));
        assert_eq!(entry.port, Some(22));
    }

    #[test]
    fn wildcard_block_applies_by_name() {
        let star_prod = RawEntry::new(vec!["*.prod".to_string(), "!db.prod".to_string()]);
        assert!(star_prod.is_wildcard());
        assert!(star_prod.applies_to(&RawEntry::new(vec!["web.prod".to_string()])));
        assert!(!star_prod.applies_to(&RawEntry::new(vec!["db.prod".to_string()])));
        assert!(star_prod.applies_to(&RawEntry::new(vec![
            "db.prod".to_string(),
            "api.prod".to_string(),
        ])));
        assert!(!star_prod.applies_to(&RawEntry::new(Vec::new())));
        assert!(!RawEntry::new(vec!["web".to_string()]).is_wildcard());
    }
}
