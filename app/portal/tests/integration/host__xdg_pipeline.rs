//! Integration tests running the dispatcher on the real Linux host services.
//!
//! Descriptors are resolved through `/proc/self/fd`, files are sniffed and
//! handlers come from a throwaway XDG tree. Only the launcher is faked so no
//! process is started.

use std::fs::{self, File};
use std::os::fd::AsFd;
use std::path::Path;
use std::sync::Arc;

use termappchooser_lib::host::content_type::MimeSniffer;
use termappchooser_lib::host::proc_fd::ProcSelfFd;
use termappchooser_lib::host::registry::XdgAppRegistry;
use termappchooser_lib::host::xdg::XdgDirs;
use termappchooser_lib::host::HostServices;
use termappchooser_lib::portal::{CallContext, FirstCandidate, NotificationEmitter, PortalDispatcher};
use termappchooser_lib::testing::FakeLauncher;

use crate::common::*;

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn install(root: &Path, id: &str, name: &str, mime: &str) {
    write(
        &root.join("usr").join("applications").join(id),
        &format!("[Desktop Entry]\nType=Application\nName={name}\nExec={name} %u\nMimeType={mime};\n"),
    );
}

fn dispatcher(root: &Path) -> (PortalDispatcher, Arc<FakeLauncher>) {
    let launcher = Arc::new(FakeLauncher::default());
    let host = HostServices {
        descriptors: Arc::new(ProcSelfFd),
        classifier: Arc::new(MimeSniffer),
        registry: Arc::new(XdgAppRegistry::new(XdgDirs::rooted(root))),
        launcher: launcher.clone(),
    };
    (PortalDispatcher::new(host, Box::new(FirstCandidate), NotificationEmitter::disabled()), launcher)
}

fn call() -> CallContext { CallContext::new("/org/freedesktop/portal/desktop/request/1_9/x", "org.example.Viewer", "") }

#[test]
fn test_open_real_html_file_uses_mimeapps_default() {
    let tree = tempfile::tempdir().unwrap();
    install(tree.path(), "firefox.desktop", "firefox", "text/html");
    install(tree.path(), "qutebrowser.desktop", "qutebrowser", "text/html");
    write(
        &tree.path().join("config").join("mimeapps.list"),
        "[Default Applications]\ntext/html=qutebrowser.desktop\n",
    );

    let page = tree.path().join("page.html");
    fs::write(&page, "<!DOCTYPE html><html><body>hi</body></html>").unwrap();
    let file = File::open(&page).unwrap();

    let (dispatcher, launcher) = dispatcher(tree.path());
    let reply = dispatcher.open_file(&call(), file.as_fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Success);
    let launches = launcher.launches();
    assert_eq!(launches[0].handler.id, "qutebrowser.desktop");
    assert!(launches[0].uris[0].starts_with("file:///"));
    assert!(launches[0].uris[0].ends_with("/page.html"));
}

#[test]
fn test_open_real_directory_uses_file_manager() {
    let tree = tempfile::tempdir().unwrap();
    install(tree.path(), "yazi.desktop", "yazi", "inode/directory");
    let pictures = tree.path().join("Pictures");
    fs::create_dir_all(&pictures).unwrap();
    let dir = File::open(&pictures).unwrap();

    let (dispatcher, launcher) = dispatcher(tree.path());
    let reply = dispatcher.open_directory(&call(), dir.as_fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Success);
    assert_eq!(launcher.launches()[0].handler.display_name, "yazi");
}

#[test]
fn test_deleted_file_is_rejected() {
    let tree = tempfile::tempdir().unwrap();
    install(tree.path(), "helix.desktop", "helix", "text/plain");
    let file = tempfile::tempfile().unwrap();

    let (dispatcher, launcher) = dispatcher(tree.path());
    let reply = dispatcher.open_file(&call(), file.as_fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Failure);
    assert!(launcher.launches().is_empty());
}

#[test]
fn test_uri_without_installed_handler_fails() {
    let tree = tempfile::tempdir().unwrap();
    let (dispatcher, launcher) = dispatcher(tree.path());

    let reply = dispatcher.open_uri(&call(), "https://example.com", &Options::new());

    assert_eq!(reply.response, ResponseCode::Failure);
    assert!(launcher.launches().is_empty());
}

#[test]
fn test_non_utf8_file_name_reaches_launcher_intact() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tree = tempfile::tempdir().unwrap();
    install(tree.path(), "helix.desktop", "helix", "text/plain");
    let path = tree.path().join(OsStr::from_bytes(b"caf\xE9.txt"));
    fs::write(&path, "bonjour\n").unwrap();
    let file = File::open(&path).unwrap();

    let (dispatcher, launcher) = dispatcher(tree.path());
    let reply = dispatcher.open_file(&call(), file.as_fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Success);
    let launched = &launcher.launches()[0].uris[0];
    assert!(launched.ends_with("/caf%E9.txt"), "{launched}");
    let back = url::Url::parse(launched).unwrap().to_file_path().unwrap();
    assert_eq!(back, path.canonicalize().unwrap());
}

#[test]
fn test_text_files_open_with_plain_text_editor() {
    let tree = tempfile::tempdir().unwrap();
    install(tree.path(), "helix.desktop", "helix", "text/plain");

    let files = [
        ("run.sh", "#!/bin/sh\necho hi\n"),
        ("main.rs", "fn main() {}\n"),
        ("notes.md", "# Notes\n"),
        ("data.csv", "a,b\n1,2\n"),
        ("README", "plain words\n"),
    ];
    let (dispatcher, launcher) = dispatcher(tree.path());

    for (name, text) in files {
        let path = tree.path().join(name);
        fs::write(&path, text).unwrap();
        let file = File::open(&path).unwrap();

        let reply = dispatcher.open_file(&call(), file.as_fd(), &Options::new());
        assert_eq!(reply.response, ResponseCode::Success, "{name}");
    }

    let launches = launcher.launches();
    assert_eq!(launches.len(), files.len());
    assert!(launches.iter().all(|launch| launch.handler.id == "helix.desktop"));
}
