use crate::{
    classify::{classify, PathKind},
    download::Downloader,
    path::{is_pdf, is_pseudo_entry, join_remote},
    session::Session,
};
use log::{debug, error, info};
use std::vec;

/// A listed directory whose entries are still being worked through.
struct Frame {
    dir: String,
    entries: vec::IntoIter<String>,
}

/// Walks a remote tree depth-first and downloads every PDF it meets.
#[derive(Debug)]
pub struct Harvester<S> {
    session: S,
    downloader: Downloader,
}

impl<S: Session> Harvester<S> {
    pub fn new(session: S, downloader: Downloader) -> Self {
        Harvester {
            session,
            downloader,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// Entries are visited in listing order, and a directory is finished
    /// as soon as it is met, before its later siblings. Failures are logged
    /// and only ever cost the entry or subtree they happen in.
    pub async fn harvest(&mut self, root: &str) {
        let mut stack = Vec::new();
        stack.extend(self.open(root).await);

        while let Some(frame) = stack.last_mut() {
            let name = match frame.entries.next() {
                Some(name) => name,
                None => {
                    stack.pop();
                    continue;
                }
            };
            if is_pseudo_entry(&name) {
                continue;
            }

            let remote_path = join_remote(&frame.dir, &name);

            match classify(&mut self.session, &remote_path).await {
                PathKind::File if is_pdf(&name) => {
                    if let Err(e) = self.downloader.download(&mut self.session, &remote_path).await
                    {
                        error!("Error processing {}: {}", remote_path, e);
                    }
                }
                PathKind::File => debug!("Skipping non-PDF file: {}", remote_path),
                PathKind::Directory => {
                    info!("Entering directory: {}", remote_path);
                    stack.extend(self.open(&remote_path).await);
                }
                PathKind::Unknown => debug!("Skipping unknown type: {}", remote_path),
            }
        }
    }

    async fn open(&mut self, dir: &str) -> Option<Frame> {
        let listing = match self.session.cwd(dir).await {
            Ok(()) => self.session.nlst().await,
            Err(e) => Err(e),
        };

        match listing {
            Ok(entries) => Some(Frame {
                dir: dir.to_owned(),
                entries: entries.into_iter(),
            }),
            Err(e) => {
                error!("Failed to list directory: {} - {}", dir, e);
                None
            }
        }
    }
}
