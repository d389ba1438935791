//! Starting desktop entries.
//!
//! The launcher resolves a handler id back to its desktop entry, expands
//! `Exec` for the target list and spawns the program detached from the
//! portal: own process group, no stdin. Children are handed to a single
//! shared reaper thread so finished handlers never linger as zombies, no
//! matter how many are still running.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, mpsc};
use std::time::Duration;

use super::desktop_entry::{DesktopEntry, find_entry};
use super::exec::{self, FieldSource};
use super::traits::{AppLauncher, HostLaunchError};
use crate::portal::{HandlerCandidate, LaunchContext};

/// Launches handlers described by XDG desktop entries.
#[derive(Debug, Clone)]
pub struct DesktopEntryLauncher {
    application_dirs: Vec<PathBuf>,
    terminal: Vec<String>,
}

impl DesktopEntryLauncher {
    /// Creates a launcher searching `application_dirs`.
    ///
    /// `terminal` is the command prefix for `Terminal=true` entries.
    #[must_use]
    pub const fn new(application_dirs: Vec<PathBuf>, terminal: Vec<String>) -> Self {
        Self { application_dirs, terminal }
    }

    /// Builds the argument vector for `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`HostLaunchError::Refused`] when the entry cannot be run
    /// (hidden, no `Exec`, `TryExec` missing) and [`HostLaunchError::Failed`]
    /// when `Exec` is malformed.
    pub fn command_line(
        &self,
        entry: &DesktopEntry,
        uris: &[String],
    ) -> Result<Vec<OsString>, HostLaunchError> {
        if entry.hidden {
            return Err(HostLaunchError::Refused);
        }

        if let Some(try_exec) = entry.try_exec.as_deref() {
            if !binary_exists(try_exec) {
                tracing::debug!("{}: TryExec {try_exec} not found", entry.id);
                return Err(HostLaunchError::Refused);
            }
        }

        let Some(exec) = entry.exec.as_deref().filter(|exec| !exec.trim().is_empty()) else {
            return Err(HostLaunchError::Refused);
        };

        let location = entry.path.display().to_string();
        let source = FieldSource {
            name: entry.display_name(),
            icon: entry.icon.as_deref(),
            location: &location,
        };

        let argv = exec::expand(exec, &source, uris).map_err(|err| {
            HostLaunchError::Failed(format!("invalid Exec in {}: {err}", entry.id))
        })?;

        if entry.terminal {
            return Ok(self.terminal.iter().map(OsString::from).chain(argv).collect());
        }

        Ok(argv)
    }
}

impl AppLauncher for DesktopEntryLauncher {
    fn launch(
        &self,
        handler: &HandlerCandidate,
        uris: &[String],
        context: &LaunchContext,
    ) -> Result<(), HostLaunchError> {
        let entry = find_entry(&self.application_dirs, &handler.id).ok_or_else(|| {
            HostLaunchError::Failed(format!("desktop entry {} is not installed", handler.id))
        })?;

        let argv = self.command_line(&entry, uris)?;
        let Some((program, args)) = argv.split_first() else {
            return Err(HostLaunchError::Refused);
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .env_remove("DESKTOP_STARTUP_ID")
            .env_remove("XDG_ACTIVATION_TOKEN");

        if let Some(token) = context.activation_token.as_deref() {
            command.env("XDG_ACTIVATION_TOKEN", token).env("DESKTOP_STARTUP_ID", token);
        }

        detach(&mut command);

        let child = command.spawn().map_err(|err| {
            HostLaunchError::Failed(format!("failed to launch {}: {err}", program.to_string_lossy()))
        })?;

        let pid = child.id();
        let running = Reaper::shared().map_or(0, |reaper| {
            reaper.track(child);
            reaper.pending()
        });
        tracing::debug!(
            "launched {} (pid {pid}) for {}, {running} handlers running",
            handler.id,
            context.requester_app
        );
        Ok(())
    }
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn detach(_command: &mut Command) {}

/// How often the reaper polls children while any are outstanding.
const REAP_INTERVAL: Duration = Duration::from_millis(500);

/// Owns spawned handlers until they exit.
///
/// One thread serves every launch. It blocks on its channel while nothing is
/// running and polls `try_wait` otherwise.
#[derive(Debug)]
struct Reaper {
    sender: mpsc::Sender<Child>,
    pending: Arc<AtomicUsize>,
}

impl Reaper {
    /// Returns the process-wide reaper, starting it on first use.
    fn shared() -> Option<&'static Self> {
        static SHARED: OnceLock<Option<Reaper>> = OnceLock::new();
        SHARED
            .get_or_init(|| {
                Self::spawn()
                    .map_err(|err| tracing::warn!("failed to start child reaper: {err}"))
                    .ok()
            })
            .as_ref()
    }

    fn spawn() -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let counter = pending.clone();

        std::thread::Builder::new()
            .name("reaper".to_string())
            .spawn(move || reap_loop(&receiver, &counter))?;

        Ok(Self { sender, pending })
    }

    fn track(&self, child: Child) {
        let pid = child.id();
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(child).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!("child reaper is gone, pid {pid} will not be reaped");
        }
    }

    /// Number of children not yet reaped.
    fn pending(&self) -> usize { self.pending.load(Ordering::SeqCst) }
}

fn reap_loop(receiver: &mpsc::Receiver<Child>, pending: &AtomicUsize) {
    let mut children: Vec<Child> = Vec::new();

    loop {
        let next = if children.is_empty() {
            receiver.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected)
        } else {
            receiver.recv_timeout(REAP_INTERVAL)
        };

        match next {
            Ok(child) => children.push(child),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => return,
        }

        children.retain_mut(|child| {
            let done = match child.try_wait() {
                Ok(Some(status)) => {
                    tracing::debug!("pid {} exited: {status}", child.id());
                    true
                }
                Ok(None) => false,
                Err(err) => {
                    tracing::debug!("failed to wait for pid {}: {err}", child.id());
                    true
                }
            };
            if done {
                pending.fetch_sub(1, Ordering::SeqCst);
            }
            !done
        });
    }
}

/// Resolves `TryExec`: absolute paths are checked directly, names via `$PATH`.
fn binary_exists(program: &str) -> bool {
    let path = Path::new(program);
    if path.is_absolute() {
        return path.is_file();
    }

    std::env::var_os("PATH")
        .is_some_and(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
}
