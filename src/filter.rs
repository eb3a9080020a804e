use crate::ssh_config::model::Host;

/// Column titles of the host table.
pub const HEADER: [&str; 4] = ["Hostname", "User", "Target", "Port"];

/// Shown as the target of proxied hosts unless full commands are requested.
pub const PROXY_PLACEHOLDER: &str = "(Proxy)";

/// A host as it appears in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    /// Position of the host in the full host list.
    pub host_index: usize,
    pub display_name: String,
    pub user: String,
    pub target: String,
    pub port: u16,
}

impl VisibleRow {
    /// The displayed values. Two rows showing the same values are the same
    /// row for selection purposes, wherever they sit in the list.
    pub fn values(&self) -> (&str, &str, &str, u16) {
        (&self.display_name, &self.user, &self.target, self.port)
    }

    /// Cell texts in header order.
    pub fn cells(&self) -> [String; 4] {
        [
            self.display_name.clone(),
            self.user.clone(),
            self.target.clone(),
            self.port.to_string(),
        ]
    }
}

/// The address shown for a host: its HostName, else its ProxyCommand (or
/// the placeholder). `None` when the host has neither.
pub fn target(host: &Host, display_full_proxy: bool) -> Option<String> {
    if !host.host_name.is_empty() {
        Some(host.host_name.clone())
    } else if host.proxy_command.is_empty() {
        None
    } else if display_full_proxy {
        Some(host.proxy_command.clone())
    } else {
        Some(PROXY_PLACEHOLDER.to_string())
    }
}

/// Rows for the hosts whose name or target contains `query`, ignoring case.
/// An empty query matches everything.
pub fn visible(hosts: &[Host], query: &str, display_full_proxy: bool) -> Vec<VisibleRow> {
    let query = query.to_lowercase();
    hosts
        .iter()
        .enumerate()
        .filter_map(|(host_index, host)| {
            let target = target(host, display_full_proxy)?;
            let matches = query.is_empty()
                || host.display_name.to_lowercase().contains(&query)
                || target.to_lowercase().contains(&query);
            matches.then(|| VisibleRow {
                host_index,
                display_name: host.display_name.clone(),
                user: host.user.clone(),
                target,
                port: host.port,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosts::normalize;
    use crate::ssh_config::model::SshConfigFile;
    use proptest::prelude::*;

    fn host(name: &str, host_name: &str, proxy: &str) -> Host {
        Host {
            patterns: vec![name.to_string()],
            display_name: name.to_string(),
            user: String::new(),
            host_name: host_name.to_string(),
            proxy_command: proxy.to_string(),
            port: 22,
        }
    }

    fn sample() -> Vec<Host> {
        vec![
            host("web", "web.example.com", ""),
            host("Database", "10.0.0.5", ""),
            host("bastion", "", "ssh -W %h:%p gw.example.com"),
            host("mail", "MX.example.org", ""),
            host("orphan", "", ""),
        ]
    }

    fn names(rows: &[VisibleRow]) -> Vec<&str> {
        rows.iter().map(|r| r.display_name.as_str()).collect()
    }

    #[test]
    fn empty_query_shows_every_connectable_host() {
        let rows = visible(&sample(), "", false);
        assert_eq!(names(&rows), vec!["web", "Database", "bastion", "mail"]);
        assert_eq!(rows[3].host_index, 3);
    }

    #[test]
    fn matches_name_or_target_ignoring_case() {
        assert_eq!(names(&visible(&sample(), "DATA", false)), vec!["Database"]);
        assert_eq!(names(&visible(&sample(), "mx.EX", false)), vec!["mail"]);
        assert_eq!(
            names(&visible(&sample(), "example", false)),
            vec!["web", "mail"]
        );
    }

    #[test]
    fn proxy_target_follows_display_option() {
        let hidden = visible(&sample(), "bastion", false);
        assert_eq!(hidden[0].target, "(Proxy)");
        let shown = visible(&sample(), "bastion", true);
        assert_eq!(shown[0].target, "ssh -W %h:%p gw.example.com");
        // The proxy command is searchable only when displayed.
        assert!(visible(&sample(), "gw.example", false).is_empty());
        assert_eq!(names(&visible(&sample(), "gw.example", true)), vec!["bastion"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(visible(&sample(), "zzz", false).is_empty());
    }

    #[test]
    fn appending_a_character_never_grows_the_result() {
        let hosts = sample();
        let queries = ["", "e", "ex", "a", "ba", "(p", "1", "10.", "m"];
        for query in queries {
            let before = visible(&hosts, query, false);
            for c in ['e', 'x', '.', 'a', 'm', ' ', '(', 'P', '0'] {
                let narrowed = visible(&hosts, &format!("{query}{c}"), false);
                for row in &narrowed {
                    assert!(before.contains(row), "{query:?}+{c:?} added {row:?}");
                }
            }
        }
    }

    #[test]
    fn end_to_end_rows() {
        let content = "\
Host \"Web\"
  HostName web.example.com
  User root
  Port 22

Host bastion
  ProxyCommand ssh -W %h:%p gw.example.com
";
        let hosts = normalize(&SshConfigFile::parse_content(content), false);

        let rows: Vec<[String; 4]> = visible(&hosts, "", false)
            .iter()
            .map(VisibleRow::cells)
            .collect();
        assert_eq!(
            rows,
            vec![
                ["Web", "root", "web.example.com", "22"].map(String::from),
                ["bastion", "", "(Proxy)", "22"].map(String::from),
            ]
        );

        let full = visible(&hosts, "", true);
        assert_eq!(full[1].target, "ssh -W %h:%p gw.example.com");
    }

    #[test]
    fn wildcard_block_values_reach_the_table() {
        let content = "\
Host web
  HostName web.example.com

Host *
  User deploy
  Port 2200
";
        let hosts = normalize(&SshConfigFile::parse_content(content), false);
        let rows: Vec<[String; 4]> = visible(&hosts, "", false)
            .iter()
            .map(VisibleRow::cells)
            .collect();
        assert_eq!(
            rows,
            vec![["web", "deploy", "web.example.com", "2200"].map(String::from)]
        );
    }

    prop_compose! {
        fn arb_host()(
            display_name in "[a-cA-C. ]{1,5}",
            user in "[a-c]{0,2}",
            host_name in "([a-c0-9.]{1,5})?",
            proxy_command in "(nc [a-c]{1,3} %p)?",
            port in 1u16..4,
        ) -> Host {
            Host {
                patterns: vec![display_name.clone()],
                display_name,
                user,
                host_name,
                proxy_command,
                port,
            }
        }
    }

    proptest! {
        #[test]
        fn prop_appending_a_character_never_grows_the_result(
            hosts in proptest::collection::vec(arb_host(), 0..10),
            query in "[a-cA-C0-9. (]{0,3}",
            c in proptest::sample::select(vec!['a', 'B', 'c', '.', ' ', '(', 'P', '0', 'x', '\u{e9}']),
            full in any::<bool>(),
        ) {
            let before = visible(&hosts, &query, full);
            let narrowed = visible(&hosts, &format!("{query}{c}"), full);
            for row in &narrowed {
                prop_assert!(before.contains(row), "{:?}+{:?} added {:?}", query, c, row);
            }
        }

        #[test]
        fn prop_empty_query_shows_every_connectable_host(
            hosts in proptest::collection::vec(arb_host(), 0..10),
        ) {
            let rows = visible(&hosts, "", false);
            let connectable = hosts
                .iter()
                .filter(|h| !h.host_name.is_empty() || !h.proxy_command.is_empty())
                .count();
            prop_assert_eq!(rows.len(), connectable);
        }
    }
}
