//! XDG base directory resolution.
//!
//! Only the parts the registry and launcher need: the config and data
//! search paths, the shared-mime-info directories and the current desktop
//! names used for `<desktop>-mimeapps.list`.

use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_CONFIG_DIRS: &str = "/etc/xdg";
const DEFAULT_DATA_DIRS: &str = "/usr/local/share:/usr/share";

/// Resolved XDG search paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgDirs {
    /// `$XDG_CONFIG_HOME`, default `~/.config`.
    pub config_home: PathBuf,
    /// `$XDG_CONFIG_DIRS`, default `/etc/xdg`.
    pub config_dirs: Vec<PathBuf>,
    /// `$XDG_DATA_HOME`, default `~/.local/share`.
    pub data_home: PathBuf,
    /// `$XDG_DATA_DIRS`, default `/usr/local/share:/usr/share`.
    pub data_dirs: Vec<PathBuf>,
    /// `$XDG_CURRENT_DESKTOP`, lower-cased and split on `:`.
    pub current_desktops: Vec<String>,
}

impl XdgDirs {
    /// Reads the search paths from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));

        Self {
            config_home: single_dir("XDG_CONFIG_HOME").unwrap_or_else(|| home.join(".config")),
            config_dirs: dir_list("XDG_CONFIG_DIRS", DEFAULT_CONFIG_DIRS),
            data_home: single_dir("XDG_DATA_HOME")
                .unwrap_or_else(|| home.join(".local").join("share")),
            data_dirs: dir_list("XDG_DATA_DIRS", DEFAULT_DATA_DIRS),
            current_desktops: std::env::var("XDG_CURRENT_DESKTOP")
                .map(|value| split_desktops(&value))
                .unwrap_or_default(),
        }
    }

    /// Builds search paths rooted below a single directory.
    ///
    /// Layout: `<root>/config`, `<root>/etc`, `<root>/data`, `<root>/usr`.
    /// Used to run the registry against a throwaway tree.
    #[must_use]
    pub fn rooted(root: &std::path::Path) -> Self {
        Self {
            config_home: root.join("config"),
            config_dirs: vec![root.join("etc")],
            data_home: root.join("data"),
            data_dirs: vec![root.join("usr")],
            current_desktops: Vec::new(),
        }
    }

    /// Returns the `mimeapps.list` files in lookup order.
    #[must_use]
    pub fn mimeapps_lists(&self) -> Vec<PathBuf> {
        let mut lists = Vec::new();

        for config_dir in std::iter::once(&self.config_home).chain(&self.config_dirs) {
            for desktop in &self.current_desktops {
                lists.push(config_dir.join(format!("{desktop}-mimeapps.list")));
            }
            lists.push(config_dir.join("mimeapps.list"));
        }

        for data_dir in std::iter::once(&self.data_home).chain(&self.data_dirs) {
            lists.push(data_dir.join("applications").join("mimeapps.list"));
        }

        lists
    }

    /// Returns the `applications` directories in precedence order.
    #[must_use]
    pub fn application_dirs(&self) -> Vec<PathBuf> {
        std::iter::once(&self.data_home)
            .chain(&self.data_dirs)
            .map(|dir| dir.join("applications"))
            .collect()
    }

    /// Returns the shared-mime-info `mime` directories in precedence order.
    #[must_use]
    pub fn mime_dirs(&self) -> Vec<PathBuf> {
        std::iter::once(&self.data_home)
            .chain(&self.data_dirs)
            .map(|dir| dir.join("mime"))
            .collect()
    }
}

/// Reads an absolute directory from `var`; relative values are ignored.
fn single_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
}

fn dir_list(var: &str, default: &str) -> Vec<PathBuf> {
    let value = std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| OsString::from(default));

    std::env::split_paths(&value).filter(|path| path.is_absolute()).collect()
}

fn split_desktops(value: &str) -> Vec<String> {
    value
        .split(':')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase)
        .collect()
}
