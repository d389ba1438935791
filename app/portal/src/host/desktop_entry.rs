//! Desktop entry loading.
//!
//! Only `Type=Application` entries are considered. Ids follow the
//! freedesktop rule: the path below an `applications` directory with `/`
//! replaced by `-` (`kde/dolphin.desktop` → `kde-dolphin.desktop`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::keyfile::KeyFile;
use crate::core::constants::UNKNOWN_APPLICATION;
use crate::portal::HandlerCandidate;

const GROUP: &str = "Desktop Entry";
const EXTENSION: &str = "desktop";

/// An installed application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Desktop file id, e.g. `org.gnome.Nautilus.desktop`.
    pub id: String,
    /// Where the entry was loaded from.
    pub path: PathBuf,
    pub name: Option<String>,
    pub exec: Option<String>,
    pub try_exec: Option<String>,
    pub icon: Option<String>,
    pub terminal: bool,
    /// `Hidden=true` means the entry is deleted for this user.
    pub hidden: bool,
    pub no_display: bool,
    pub mime_types: Vec<String>,
}

impl DesktopEntry {
    /// Parses an entry; returns `None` for non-application entries.
    #[must_use]
    pub fn parse(id: &str, path: &Path, text: &str) -> Option<Self> {
        let file = KeyFile::parse(text);
        if !file.has_group(GROUP) {
            return None;
        }
        if file.raw(GROUP, "Type").is_some_and(|kind| kind != "Application") {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            path: path.to_path_buf(),
            name: file.string(GROUP, "Name"),
            exec: file.string(GROUP, "Exec"),
            try_exec: file.string(GROUP, "TryExec"),
            icon: file.string(GROUP, "Icon"),
            terminal: file.boolean(GROUP, "Terminal").unwrap_or(false),
            hidden: file.boolean(GROUP, "Hidden").unwrap_or(false),
            no_display: file.boolean(GROUP, "NoDisplay").unwrap_or(false),
            mime_types: file.list(GROUP, "MimeType"),
        })
    }

    /// Reads an entry from disk. Unreadable files yield `None`.
    #[must_use]
    pub fn load(id: &str, path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(id, path, &text),
            Err(err) => {
                tracing::debug!("skipping unreadable desktop entry {}: {err}", path.display());
                None
            }
        }
    }

    /// Returns the display name, falling back to a generic label.
    #[must_use]
    pub fn display_name(&self) -> &str { self.name.as_deref().unwrap_or(UNKNOWN_APPLICATION) }

    /// Returns whether the entry lists `content_class` in `MimeType`.
    #[must_use]
    pub fn handles(&self, content_class: &str) -> bool {
        self.mime_types.iter().any(|mime| mime.eq_ignore_ascii_case(content_class))
    }

    /// Converts the entry into the candidate handed to the pipeline.
    #[must_use]
    pub fn to_candidate(&self) -> HandlerCandidate {
        HandlerCandidate::new(self.id.clone(), self.display_name())
    }
}

/// Derives the desktop file id of `path` inside `applications_dir`.
#[must_use]
pub fn desktop_file_id(applications_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(applications_dir).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("-"))
}

/// Loads every application entry from `dirs`.
///
/// Earlier directories shadow later ones: an id seen once is never loaded
/// again, even if the first occurrence was hidden or unparseable.
#[must_use]
pub fn scan_applications(dirs: &[PathBuf]) -> Vec<DesktopEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for dir in dirs {
        let mut files = Vec::new();
        collect_desktop_files(dir, &mut files);
        files.sort();

        for path in files {
            let Some(id) = desktop_file_id(dir, &path) else {
                continue;
            };
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(entry) = DesktopEntry::load(&id, &path) {
                entries.push(entry);
            }
        }
    }

    entries
}

/// Finds the entry with `id`, honouring directory precedence.
#[must_use]
pub fn find_entry(dirs: &[PathBuf], id: &str) -> Option<DesktopEntry> {
    for dir in dirs {
        let direct = dir.join(id);
        if direct.is_file() {
            return DesktopEntry::load(id, &direct);
        }

        // Prefixed ids (kde-foo.desktop) live in subdirectories
        if id.contains('-') {
            let mut files = Vec::new();
            collect_desktop_files(dir, &mut files);
            if let Some(path) =
                files.into_iter().find(|path| desktop_file_id(dir, path).as_deref() == Some(id))
            {
                return DesktopEntry::load(id, &path);
            }
        }
    }

    None
}

fn collect_desktop_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in read_dir.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_desktop_files(&path, out);
        } else if path.extension().is_some_and(|ext| ext == EXTENSION) {
            out.push(path);
        }
    }
}
