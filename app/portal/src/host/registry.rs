//! Default handler lookup following the freedesktop MIME-apps specification.
//!
//! Every query rescans `mimeapps.list`, the desktop entries and the
//! shared-mime-info hierarchy; default assignments can change between two
//! portal calls and must be honoured. A class with no usable handler borrows
//! the handlers of its parent classes, nearest first.

use std::collections::{HashMap, HashSet};

use super::desktop_entry::{DesktopEntry, scan_applications};
use super::keyfile::KeyFile;
use super::mime_db::MimeHierarchy;
use super::traits::AppRegistry;
use super::xdg::XdgDirs;
use crate::portal::HandlerCandidate;

const DEFAULT_GROUP: &str = "Default Applications";
const ADDED_GROUP: &str = "Added Associations";
const REMOVED_GROUP: &str = "Removed Associations";

/// Associations for one content class, merged across all `mimeapps.list` files.
///
/// A removal hides an application in its own file and every lower-precedence
/// file, never in files read before it.
#[derive(Debug, Default)]
struct Associations {
    defaults: Vec<String>,
    added: Vec<String>,
    removed: HashSet<String>,
}

impl Associations {
    fn collect(lists: &[KeyFile], content_class: &str) -> Self {
        let mut associations = Self::default();

        for file in lists {
            associations.removed.extend(list_for(file, REMOVED_GROUP, content_class));
            let Self { defaults, added, removed } = &mut associations;

            let visible = |id: &String| !removed.contains(id);
            defaults.extend(list_for(file, DEFAULT_GROUP, content_class).into_iter().filter(visible));
            added.extend(list_for(file, ADDED_GROUP, content_class).into_iter().filter(visible));
        }

        associations
    }
}

/// Everything one query reads from disk.
struct Snapshot {
    lists: Vec<KeyFile>,
    entries: Vec<DesktopEntry>,
    hierarchy: MimeHierarchy,
}

impl Snapshot {
    /// Returns the usable handlers registered for exactly `content_class`.
    fn ranked(&self, content_class: &str) -> Vec<HandlerCandidate> {
        let associations = Associations::collect(&self.lists, content_class);
        let by_id: HashMap<&str, &DesktopEntry> =
            self.entries.iter().map(|entry| (entry.id.as_str(), entry)).collect();

        let listed = associations.defaults.iter().chain(&associations.added).map(String::as_str);
        let declared = self
            .entries
            .iter()
            .filter(|entry| entry.handles(content_class))
            .map(|entry| entry.id.as_str())
            .filter(|id| !associations.removed.contains(*id));

        let mut seen = HashSet::new();
        let mut ranked = Vec::new();

        for id in listed.chain(declared) {
            let Some(entry) = by_id.get(id).copied().filter(|entry| !entry.hidden) else {
                continue;
            };
            if seen.insert(entry.id.clone()) {
                ranked.push(entry.to_candidate());
            }
        }

        ranked
    }
}

/// Application registry backed by XDG desktop entries.
#[derive(Debug, Clone)]
pub struct XdgAppRegistry {
    dirs: XdgDirs,
}

impl XdgAppRegistry {
    /// Creates a registry over the given search paths.
    #[must_use]
    pub const fn new(dirs: XdgDirs) -> Self { Self { dirs } }

    fn snapshot(&self) -> Snapshot {
        let lists = self
            .dirs
            .mimeapps_lists()
            .into_iter()
            .filter_map(|path| match KeyFile::load(&path) {
                Ok(file) => Some(file),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
                Err(err) => {
                    tracing::debug!("skipping {}: {err}", path.display());
                    None
                }
            })
            .collect();

        Snapshot {
            lists,
            entries: scan_applications(&self.dirs.application_dirs()),
            hierarchy: MimeHierarchy::load(&self.dirs.mime_dirs()),
        }
    }

    /// Returns the handlers for `content_class` and its parent classes, in
    /// preference order.
    fn ranked(&self, content_class: &str) -> Vec<HandlerCandidate> {
        let snapshot = self.snapshot();
        let mut seen = HashSet::new();
        let mut ranked = Vec::new();

        for class in snapshot.hierarchy.lineage(content_class) {
            let handlers = snapshot.ranked(&class);
            if ranked.is_empty() && !handlers.is_empty() && !class.eq_ignore_ascii_case(content_class) {
                tracing::debug!("{content_class}: no handler, using handlers for {class}");
            }
            for handler in handlers {
                if seen.insert(handler.id.clone()) {
                    ranked.push(handler);
                }
            }
        }

        ranked
    }
}

impl AppRegistry for XdgAppRegistry {
    fn default_handler(&self, content_class: &str) -> Option<HandlerCandidate> {
        self.ranked(content_class).into_iter().next()
    }

    fn all_handlers(&self, content_class: &str) -> Vec<HandlerCandidate> { self.ranked(content_class) }
}

/// Looks up a MIME key case-insensitively within a group.
fn list_for(file: &KeyFile, group: &str, content_class: &str) -> Vec<String> {
    file.entries(group)
        .filter(|(key, _)| key.eq_ignore_ascii_case(content_class))
        .flat_map(|(_, value)| super::keyfile::split_list(value))
        .collect()
}
