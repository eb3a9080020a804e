use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::model::{RawEntry, SshConfigFile};
use super::path::expand_tilde;
use crate::error::ConfigError;

const MAX_INCLUDE_DEPTH: usize = 5;

/// The block that directive lines currently belong to.
enum Block {
    /// Before the first Host line: directives become defaults.
    Global,
    Host(RawEntry),
    /// Inside a Match block: directives are skipped.
    Match,
}

/// Entries and pre-Host defaults collected from one file.
#[derive(Default)]
struct Parsed {
    defaults: RawEntry,
    entries: Vec<RawEntry>,
}

impl Parsed {
    fn flush(&mut self, block: Block) {
        if let Block::Host(entry) = block {
            self.entries.push(entry);
        }
    }

    /// Fill each concrete host from the pattern blocks that select it, in
    /// file order, then from the pre-Host defaults. Pattern blocks are
    /// consumed.
    fn finish(self) -> Vec<RawEntry> {
        let Parsed { defaults, entries } = self;
        let (wildcards, mut entries): (Vec<RawEntry>, Vec<RawEntry>) =
            entries.into_iter().partition(RawEntry::is_wildcard);
        for entry in &mut entries {
            for wildcard in &wildcards {
                if wildcard.applies_to(entry) {
                    entry.inherit(wildcard);
                }
            }
            entry.inherit(&defaults);
        }
        debug!(
            hosts = entries.len(),
            patterns = wildcards.len(),
            "Applied pattern blocks"
        );
        entries
    }
}

impl SshConfigFile {
    /// Read and parse the config at `path`. Include directives are resolved
    /// relative to the file's directory.
    pub fn parse(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::from_read(path.to_path_buf(), e))?;
        let entries = Self::parse_content_with_includes(&content, path.parent(), 0).finish();
        debug!(path = %path.display(), entries = entries.len(), "Parsed SSH config");
        Ok(SshConfigFile {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Parse config text without resolving Include directives.
    pub fn parse_content(content: &str) -> Vec<RawEntry> {
        Self::parse_content_with_includes(content, None, MAX_INCLUDE_DEPTH).finish()
    }

    fn parse_content_with_includes(
        content: &str,
        config_dir: Option<&Path>,
        depth: usize,
    ) -> Parsed {
        let mut parsed = Parsed::default();
        let mut block = Block::Global;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = Self::parse_directive(trimmed) else {
                continue;
            };

            if key.eq_ignore_ascii_case("host") {
                parsed.flush(std::mem::replace(
                    &mut block,
                    Block::Host(RawEntry::new(Self::split_patterns(value))),
                ));
                continue;
            }

            if key.eq_ignore_ascii_case("match") {
                parsed.flush(std::mem::replace(&mut block, Block::Match));
                continue;
            }

            if key.eq_ignore_ascii_case("include") {
                // An indented Include stays with its Host block, which this
                // picker does not evaluate. A flush-left one ends the block.
                let is_indented = line.starts_with([' ', '\t']);
                if is_indented && !matches!(block, Block::Global) {
                    debug!(pattern = value, "Skipping Include inside a host block");
                    continue;
                }
                parsed.flush(std::mem::replace(&mut block, Block::Global));
                if depth >= MAX_INCLUDE_DEPTH {
                    warn!(pattern = value, "Include nested too deeply, skipping");
                    continue;
                }
                for included in Self::resolve_include(value, config_dir, depth) {
                    parsed.defaults.inherit(&included.defaults);
                    parsed.entries.extend(included.entries);
                }
                continue;
            }

            match &mut block {
                Block::Global => parsed.defaults.apply(key, value),
                Block::Host(entry) => entry.apply(key, value),
                Block::Match => {}
            }
        }

        parsed.flush(block);
        parsed
    }

    /// Resolve an Include pattern and parse every file it matches, in
    /// sorted order.
    fn resolve_include(pattern: &str, config_dir: Option<&Path>, depth: usize) -> Vec<Parsed> {
        let Ok(expanded) = expand_tilde(pattern) else {
            return Vec::new();
        };
        let glob_pattern = if expanded.is_absolute() {
            expanded
        } else if let Some(dir) = config_dir {
            dir.join(expanded)
        } else {
            return Vec::new();
        };

        let paths = match glob::glob(&glob_pattern.to_string_lossy()) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(pattern, error = %e, "Invalid Include pattern");
                return Vec::new();
            }
        };
        let mut matched: Vec<PathBuf> = paths.filter_map(|p| p.ok()).collect();
        matched.sort();

        let mut files = Vec::new();
        for path in matched.into_iter().filter(|p| p.is_file()) {
            match std::fs::read_to_string(&path) {
                Ok(content) => files.push(Self::parse_content_with_includes(
                    &content,
                    path.parent(),
                    depth + 1,
                )),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable include"),
            }
        }
        files
    }

    /// Split a Host line's value into pattern tokens. Whitespace separates
    /// tokens except inside double quotes; the quotes stay in the token.
    pub(crate) fn split_patterns(value: &str) -> Vec<String> {
        let mut patterns = Vec::new();
        let mut current = String::new();
        let mut quoted = false;

        for c in value.chars() {
            if c == '"' {
                quoted = !quoted;
                current.push(c);
            } else if c.is_whitespace() && !quoted {
                if !current.is_empty() {
                    patterns.push(std::mem::take(&mut current));
                }
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            patterns.push(current);
        }
        patterns
    }

    /// Parse a "Key Value" or "Key=Value" directive line.
    fn parse_directive(trimmed: &str) -> Option<(&str, &str)> {
        let key_end = trimmed
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(trimmed.len());
        let key = &trimmed[..key_end];
        if key.is_empty() {
            return None;
        }
        let rest = trimmed[key_end..].trim_start();
        let value = rest.strip_prefix('=').unwrap_or(rest).trim();
        Some((key, Self::strip_inline_comment(value)))
    }

    /// Cut the value at an inline comment: a `#` that starts a
    /// whitespace-separated token outside double quotes.
    fn strip_inline_comment(value: &str) -> &str {
        let mut quoted = false;
        let mut token_start = true;
        for (pos, c) in value.char_indices() {
            match c {
                '"' => quoted = !quoted,
                '#' if token_start && !quoted => return value[..pos].trim_end(),
                _ => {}
            }
            token_start = c.is_whitespace();
        }
        value
    }
}
