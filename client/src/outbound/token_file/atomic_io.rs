//! Atomic file write operations.
//!
//! The token is written to a hidden temporary file in the same directory and
//! renamed over the target, so a crash mid-write never leaves a truncated
//! token behind.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::TokenStoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Owner read/write only; the file holds a bearer credential.
#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

/// Write `contents` to `path` inside `dir` via temp file and rename.
pub(super) fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &str) -> Result<(), TokenStoreError> {
    let file_name = single_file_name(path)?;
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    write_to_temp_file(dir, &tmp_name, contents)?;
    if let Err(err) = rename_temp_to_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(TokenStoreError::io(format!("replace {path}: {err}")));
    }
    sync_parent_directory(dir);
    Ok(())
}

/// Reject anything but a bare file name, so the store cannot escape `dir`.
pub(super) fn single_file_name(path: &Utf8Path) -> Result<&str, TokenStoreError> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(file_name)), None) => Ok(file_name),
        _ => Err(TokenStoreError::io(format!(
            "token path must be a plain file name, got {path}"
        ))),
    }
}

fn write_to_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> Result<(), TokenStoreError> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use cap_std::fs::OpenOptionsExt;
        options.mode(TOKEN_FILE_MODE);
    }
    let mut file = dir
        .open_with(tmp_name, &options)
        .map_err(|err| TokenStoreError::io(format!("create {tmp_name}: {err}")))?;

    let written = file.write_all(contents.as_bytes()).and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(TokenStoreError::io(format!("write {tmp_name}: {err}")));
    }
    Ok(())
}

#[cfg(windows)]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_parent_directory(parent: &Dir) {
    // Best effort; the rename has already happened.
    drop(parent.open(".").and_then(|dir| dir.sync_all()));
}
