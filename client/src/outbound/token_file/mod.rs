//! File-backed token store.
//!
//! The bearer token lives in one file inside the configured state directory.
//! All access goes through a `cap_std` directory handle, so the store can
//! only touch its own file.

mod atomic_io;

use std::io;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::AccessToken;
use crate::domain::ports::{TokenStore, TokenStoreError};

/// [`TokenStore`] persisting the token to `<state_dir>/<file_name>`.
#[derive(Debug)]
pub struct FileTokenStore {
    dir: Dir,
    file_name: Utf8PathBuf,
}

impl FileTokenStore {
    /// Open (creating if needed) `state_dir` and bind the store to
    /// `file_name` inside it.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Io`] when the directory cannot be created
    /// or opened, or when `file_name` is not a plain file name.
    pub fn open(state_dir: &Utf8Path, file_name: &Utf8Path) -> Result<Self, TokenStoreError> {
        Dir::create_ambient_dir_all(state_dir, ambient_authority())
            .map_err(|err| TokenStoreError::io(format!("create {state_dir}: {err}")))?;
        let dir = Dir::open_ambient_dir(state_dir, ambient_authority())
            .map_err(|err| TokenStoreError::io(format!("open {state_dir}: {err}")))?;
        Self::from_dir(dir, file_name)
    }

    /// Bind the store to `file_name` inside an already opened directory.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Io`] when `file_name` is not a plain file
    /// name.
    pub fn from_dir(dir: Dir, file_name: &Utf8Path) -> Result<Self, TokenStoreError> {
        atomic_io::single_file_name(file_name)?;
        Ok(Self {
            dir,
            file_name: file_name.to_owned(),
        })
    }

    /// Name of the token file inside the state directory.
    pub fn file_name(&self) -> &Utf8Path {
        &self.file_name
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match self.dir.read_to_string(&self.file_name) {
            Ok(raw) => Ok(Some(raw.trim_end_matches(['\r', '\n']).to_owned())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => Err(TokenStoreError::corrupt(
                format!("{} is not UTF-8", self.file_name),
            )),
            Err(err) => Err(TokenStoreError::io(format!(
                "read {}: {err}",
                self.file_name
            ))),
        }
    }

    async fn save(&self, token: &AccessToken) -> Result<(), TokenStoreError> {
        atomic_io::write_atomic(&self.dir, &self.file_name, &format!("{}\n", token.expose()))?;
        debug!(file = %self.file_name, "access token persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match self.dir.remove_file(&self.file_name) {
            Ok(()) => {
                debug!(file = %self.file_name, "access token removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TokenStoreError::io(format!(
                "remove {}: {err}",
                self.file_name
            ))),
        }
    }
}
