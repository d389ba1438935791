//! Shared-mime-info type hierarchy.
//!
//! Reads the `aliases` and `subclasses` files shared-mime-info installs in
//! each `<data dir>/mime/` directory. A handler lookup that finds nothing for
//! a class retries with the classes [`MimeHierarchy::lineage`] returns:
//! canonical name, declared parents, `text/plain` for textual classes and
//! finally `application/octet-stream`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::core::constants::content_class;

/// Extension-table names whose shared-mime-info canonical name differs.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("application/x-sh", "application/x-shellscript"),
    ("application/x-yaml", "application/yaml"),
    ("text/x-markdown", "text/markdown"),
];

/// Textual `application/*` classes, for hosts without a mime database.
const BUILTIN_PARENTS: &[(&str, &str)] = &[
    ("application/x-shellscript", content_class::PLAIN_TEXT),
    ("application/json", content_class::PLAIN_TEXT),
    ("application/xml", content_class::PLAIN_TEXT),
    ("application/yaml", content_class::PLAIN_TEXT),
    ("application/toml", content_class::PLAIN_TEXT),
    ("application/javascript", content_class::PLAIN_TEXT),
];

/// Alias and subclass tables merged across all `mime` directories.
#[derive(Debug, Default, Clone)]
pub struct MimeHierarchy {
    aliases: HashMap<String, String>,
    parents: HashMap<String, Vec<String>>,
}

impl MimeHierarchy {
    /// Loads the tables from `mime_dirs`; earlier directories win on conflicting aliases.
    #[must_use]
    pub fn load(mime_dirs: &[PathBuf]) -> Self {
        let mut hierarchy = Self::default();

        for dir in mime_dirs {
            for (alias, canonical) in read_pairs(&dir.join("aliases")) {
                hierarchy.aliases.entry(alias).or_insert(canonical);
            }
            for (child, parent) in read_pairs(&dir.join("subclasses")) {
                let parents = hierarchy.parents.entry(child).or_default();
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
        }

        hierarchy
    }

    /// Returns the canonical name of `class`.
    #[must_use]
    pub fn canonical<'a>(&'a self, class: &'a str) -> &'a str {
        self.aliases
            .get(class)
            .map_or_else(|| canonical_name(class), String::as_str)
    }

    fn parents_of(&self, class: &str) -> Vec<String> {
        let mut parents = self.parents.get(class).cloned().unwrap_or_default();
        parents.extend(builtin(BUILTIN_PARENTS, class).map(str::to_string));
        parents
    }

    /// Returns `class` followed by every class a handler may be borrowed from,
    /// nearest first.
    #[must_use]
    pub fn lineage(&self, class: &str) -> Vec<String> {
        let class = class.to_ascii_lowercase();
        let mut seen = HashSet::new();
        let mut lineage = Vec::new();
        let mut queue = VecDeque::from([class.clone()]);

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            let canonical = self.canonical(&next);
            if canonical != next {
                queue.push_front(canonical.to_string());
            }
            queue.extend(self.parents_of(&next));
            lineage.push(next);
        }

        if lineage.iter().any(|member| member.starts_with("text/")) {
            push_unique(&mut lineage, content_class::PLAIN_TEXT);
        }
        if !class.starts_with("inode/") {
            push_unique(&mut lineage, content_class::OCTET_STREAM);
        }

        lineage
    }
}

/// Returns the shared-mime-info name for a class produced by an extension table.
#[must_use]
pub fn canonical_name(class: &str) -> &str { builtin(BUILTIN_ALIASES, class).next().unwrap_or(class) }

fn builtin<'a>(
    table: &'static [(&'static str, &'static str)],
    class: &'a str,
) -> impl Iterator<Item = &'static str> + 'a {
    table.iter().filter(move |(key, _)| *key == class).map(|&(_, value)| value)
}

fn push_unique(lineage: &mut Vec<String>, class: &str) {
    if !lineage.iter().any(|member| member == class) {
        lineage.push(class.to_string());
    }
}

/// Reads a whitespace-separated two-column table. Missing files are empty.
fn read_pairs(path: &Path) -> Vec<(String, String)> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            tracing::debug!("skipping {}: {err}", path.display());
            return Vec::new();
        }
    };

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            Some((columns.next()?.to_ascii_lowercase(), columns.next()?.to_ascii_lowercase()))
        })
        .collect()
}
