//! File/directory classification of remote paths.
//!
//! FTP has no portable stat, so the server is probed: a path the server
//! reports a size for is a file, a path it lets us `CWD` into is a
//! directory.

use crate::session::Session;
use log::{debug, error, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    /// Neither probe succeeded, e.g. a dangling link.
    Unknown,
}

pub async fn classify<S: Session>(session: &mut S, path: &str) -> PathKind {
    if is_file(session, path).await {
        PathKind::File
    } else if is_directory(session, path).await {
        PathKind::Directory
    } else {
        PathKind::Unknown
    }
}

async fn is_file<S: Session>(session: &mut S, path: &str) -> bool {
    match session.size(path).await {
        Ok(_) => true,
        // Many servers refuse SIZE on directories.
        Err(e) if e.is_protocol() => {
            trace!("SIZE {} refused: {}", path, e);
            false
        }
        Err(e) => {
            error!("Unexpected error in is_file checking {}: {}", path, e);
            false
        }
    }
}

/// Leaves the working directory where it was found.
async fn is_directory<S: Session>(session: &mut S, path: &str) -> bool {
    let current = match session.pwd().await {
        Ok(current) => current,
        Err(e) => {
            error!("Cannot read working directory while probing {}: {}", path, e);
            return false;
        }
    };

    if let Err(e) = session.cwd(path).await {
        trace!("CWD {} refused: {}", path, e);
        return false;
    }

    match session.cwd(&current).await {
        Ok(()) => true,
        Err(e) => {
            debug!("Cannot return to {} after probing {}: {}", current, path, e);
            false
        }
    }
}
