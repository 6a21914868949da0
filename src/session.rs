use crate::{connection::FTPConnection, FTPError};
use futures::AsyncWrite;

/// The remote operations the harvester needs from a logged-in server.
///
/// Every call is a blocking round trip on one control connection, so a
/// session has exactly one caller at a time.
#[allow(async_fn_in_trait)]
pub trait Session {
    /// Current working directory on the server.
    async fn pwd(&mut self) -> Result<String, FTPError>;

    async fn cwd(&mut self, path: &str) -> Result<(), FTPError>;

    /// Entry names of the current working directory, in server order.
    async fn nlst(&mut self) -> Result<Vec<String>, FTPError>;

    async fn size(&mut self, path: &str) -> Result<u64, FTPError>;

    /// Binary retrieval of `path` into `out`. Bytes written before a
    /// failure stay written.
    async fn retrieve<W>(&mut self, path: &str, out: &mut W) -> Result<u64, FTPError>
    where
        W: AsyncWrite + Unpin + ?Sized;
}

impl Session for FTPConnection {
    async fn pwd(&mut self) -> Result<String, FTPError> {
        FTPConnection::pwd(self).await
    }

    async fn cwd(&mut self, path: &str) -> Result<(), FTPError> {
        FTPConnection::cwd(self, path).await
    }

    async fn nlst(&mut self) -> Result<Vec<String>, FTPError> {
        FTPConnection::nlst(self).await
    }

    async fn size(&mut self, path: &str) -> Result<u64, FTPError> {
        FTPConnection::size(self, path).await
    }

    async fn retrieve<W>(&mut self, path: &str, out: &mut W) -> Result<u64, FTPError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        FTPConnection::retrieve(self, path, out).await
    }
}
