//! Descriptor-to-path resolution through `/proc/self/fd`.

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};
use std::path::PathBuf;

use super::traits::DescriptorResolver;

/// Suffix the kernel appends to links of unlinked files.
const DELETED_SUFFIX: &str = " (deleted)";

/// Reads the backing path of a descriptor from `/proc/self/fd/<n>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcSelfFd;

impl DescriptorResolver for ProcSelfFd {
    fn resolve_descriptor_to_path(&self, fd: BorrowedFd<'_>) -> io::Result<PathBuf> {
        let link = PathBuf::from(format!("/proc/self/fd/{}", fd.as_raw_fd()));
        let target = std::fs::read_link(&link).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("failed to read file descriptor {}: {err}", fd.as_raw_fd()),
            )
        })?;
        validate_target(target)
    }
}

/// Rejects link targets that are not usable filesystem paths.
fn validate_target(target: PathBuf) -> io::Result<PathBuf> {
    // pipe:[123], socket:[456], anon_inode:[eventfd]
    if !target.is_absolute() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("descriptor does not refer to a file: {}", target.display()),
        ));
    }

    let deleted = target
        .to_str()
        .is_some_and(|path| path.ends_with(DELETED_SUFFIX));
    if deleted && !target.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file behind descriptor was deleted: {}", target.display()),
        ));
    }

    Ok(target)
}
