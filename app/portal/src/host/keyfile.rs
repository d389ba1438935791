//! Minimal reader for the freedesktop key-file format.
//!
//! Desktop entries and `mimeapps.list` share this `[Group]` / `Key=Value`
//! syntax. Parsing is lenient: malformed lines are skipped, since a single
//! bad line in a system file must not hide the rest of the registry.

use std::path::Path;

#[derive(Debug, Clone, Default)]
struct Group {
    name: String,
    entries: Vec<(String, String)>,
}

/// A parsed key file.
#[derive(Debug, Clone, Default)]
pub struct KeyFile {
    groups: Vec<Group>,
}

impl KeyFile {
    /// Parses key-file text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut groups: Vec<Group> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
                groups.push(Group {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            // Entries before the first group header are invalid
            let Some(group) = groups.last_mut() else {
                continue;
            };

            if let Some((key, value)) = line.split_once('=') {
                group.entries.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        Self { groups }
    }

    /// Reads and parses a key file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not UTF-8.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    /// Returns whether a group with this name exists.
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool { self.groups.iter().any(|g| g.name == group) }

    /// Returns the raw value of `key` in the first matching group.
    ///
    /// Localized variants (`Name[fr]`) are distinct keys and never match `Name`.
    #[must_use]
    pub fn raw(&self, group: &str, key: &str) -> Option<&str> {
        self.groups
            .iter()
            .filter(|g| g.name == group)
            .flat_map(|g| g.entries.iter())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the unescaped string value of `key`.
    #[must_use]
    pub fn string(&self, group: &str, key: &str) -> Option<String> {
        self.raw(group, key).map(unescape)
    }

    /// Returns a boolean value; anything but `true`/`false` is `None`.
    #[must_use]
    pub fn boolean(&self, group: &str, key: &str) -> Option<bool> {
        match self.raw(group, key)? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Returns a `;`-separated list value with empty items removed.
    #[must_use]
    pub fn list(&self, group: &str, key: &str) -> Vec<String> {
        self.raw(group, key).map(split_list).unwrap_or_default()
    }

    /// Iterates over every key/value pair in all groups with this name.
    pub fn entries<'a>(&'a self, group: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.groups
            .iter()
            .filter(move |g| g.name == group)
            .flat_map(|g| g.entries.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Expands the key-file escape sequences `\s`, `\n`, `\t`, `\r` and `\\`.
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Splits a list value on unescaped `;`.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(';') => current.push(';'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ';' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| unescape(item.trim()))
        .filter(|item| !item.is_empty())
        .collect()
}
