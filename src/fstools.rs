use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::containers::Container;

pub enum DirEntryCategory {
    DoesNotExist,
    RegularFile,
    SymbolicLink,
    Directory,
    Unknown,
}

pub fn classify_file(path: &Path) -> DirEntryCategory {
    match fs::symlink_metadata(path) {
        Ok(metadata) => {
            if metadata.is_symlink() {
                match fs::metadata(path) {
                    Ok(target) if target.is_file() => DirEntryCategory::RegularFile,
                    Ok(_) => DirEntryCategory::SymbolicLink,
                    Err(_) => DirEntryCategory::DoesNotExist,
                }
            } else if metadata.is_file() {
                DirEntryCategory::RegularFile
            } else if metadata.is_dir() {
                DirEntryCategory::Directory
            } else {
                DirEntryCategory::Unknown
            }
        },
        Err(_) => DirEntryCategory::DoesNotExist,
    }
}

pub fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().map(|m| m.len())
}

/// `<stem>_compressed.<ext>` next to the input.
pub fn generate_output_filename(path: &Path, container: Container) -> PathBuf {
    match path.file_stem() {
        Some(file_stem) => {
            let mut name = file_stem.to_os_string();
            name.push("_compressed.");
            name.push(container.extension());
            path.with_file_name(name)
        },
        None => path.with_extension(container.extension()),
    }
}

/// Removes `path` if present. Failures are logged and reported, never raised.
pub fn remove_best_effort(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("removed {:?}", path);
            true
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => true,
        Err(err) => {
            warn!("could not remove {:?}: {}", path, err);
            false
        },
    }
}
