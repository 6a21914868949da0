use crate::{path::sanitize_filename, session::Session, FTPError};
use async_std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    prelude::*,
};
use log::{debug, info};

/// Writes remote files into one flat local directory.
#[derive(Debug, Clone)]
pub struct Downloader {
    local_dir: PathBuf,
}

impl Downloader {
    pub fn new(local_dir: impl Into<PathBuf>) -> Self {
        Downloader {
            local_dir: local_dir.into(),
        }
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Where `remote_path` lands locally.
    pub fn local_path(&self, remote_path: &str) -> PathBuf {
        self.local_dir.join(sanitize_filename(remote_path))
    }

    /// Retrieves `remote_path` into the local directory, creating it first
    /// if needed. A failed transfer leaves the partial file behind.
    pub async fn download<S: Session>(
        &self,
        session: &mut S,
        remote_path: &str,
    ) -> Result<PathBuf, FTPError> {
        fs::create_dir_all(&self.local_dir).await?;

        let to = self.local_path(remote_path);
        let mut output = BufWriter::new(File::create(&to).await?);

        info!("Downloading file: {} -> {}", remote_path, to.display());

        let retrieved = session.retrieve(remote_path, &mut output).await;
        let flushed = output.flush().await;
        let count = retrieved?;
        flushed?;

        debug!("Wrote {} bytes to {}", count, to.display());

        Ok(to)
    }
}
