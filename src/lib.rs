use thiserror::Error;

pub mod classify;
pub mod connection;
pub mod download;
pub mod logging;
pub mod path;
pub mod session;
pub mod target;
pub mod walker;


#[derive(Error, Debug)]
pub enum FTPError {
    #[error("Unexpected EOF from server")]
    UnexpectedEOF,

    #[error("Bad host")]
    BadHost,

    #[error("Invalid Response from server")]
    InvalidResponse,

    #[error("Bad status code {0} from server: {1}")]
    BadStatus(u16, String),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl FTPError {
    /// Whether the server answered, just not with what was asked for.
    pub fn is_protocol(&self) -> bool {
        matches!(self, FTPError::BadStatus(..) | FTPError::InvalidResponse)
    }
}

/// Splits a control channel line into its status code and text.
///
/// The flag is set when the line opens a multi-line reply (`NNN-text`).
/// A bare `NNN` line is accepted with empty text.
pub fn parse_line(line: &str) -> Option<(u16, bool, &str)> {
    let code = line.get(0..3)?;
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code = code.parse::<u16>().ok()?;

    match line.as_bytes().get(3) {
        None => Some((code, false, "")),
        Some(b' ') => Some((code, false, &line[4..])),
        Some(b'-') => Some((code, true, &line[4..])),
        Some(_) => None,
    }
}
