use crate::{parse_line, FTPError};
use async_std::{
    io::{self, BufReader, Lines, Read, Write},
    net::{Ipv4Addr, SocketAddr, TcpStream},
    prelude::*,
};
use log::{debug, info, trace};
use std::fmt;

const BUF_SIZE: usize = 8000;

#[derive(Debug)]
pub struct Credentials {
    user: String,
    pass: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials {
            user: "anonymous".to_owned(),
            pass: "anonymous".to_owned(),
        }
    }
}

#[derive(Debug)]
pub struct FTPConnection {
    socket: TcpStream,
    lines: Lines<BufReader<TcpStream>>,
}

impl FTPConnection {
    async fn expect<C: AsRef<[u8]> + fmt::Display>(
        &mut self,
        command: C,
        expected: u16,
    ) -> Result<String, FTPError> {
        self.expect_any(command, &[expected]).await
    }

    async fn expect_any<C: AsRef<[u8]> + fmt::Display>(
        &mut self,
        command: C,
        expected: &[u16],
    ) -> Result<String, FTPError> {
        let (status, msg) = self.command(command).await?;
        if expected.contains(&status) {
            Ok(msg)
        } else {
            Err(FTPError::BadStatus(status, msg))
        }
    }

    async fn command<C: AsRef<[u8]> + fmt::Display>(
        &mut self,
        command: C,
    ) -> Result<(u16, String), FTPError> {
        debug!("> {}", &command);

        let buf = [command.as_ref(), "\r\n".as_bytes()].concat();

        self.socket.write_all(&buf).await?;

        let res = self.getline().await?;

        debug!("< {} - {}", res.0, res.1);

        Ok(res)
    }

    async fn next_line(&mut self) -> Result<String, FTPError> {
        match self.lines.next().await {
            Some(Ok(line)) => Ok(line),
            Some(Err(e)) => Err(e.into()),
            None => Err(FTPError::UnexpectedEOF),
        }
    }

    async fn getline(&mut self) -> Result<(u16, String), FTPError> {
        // Read server message
        // Format: <status code> <message>
        // Example: 220 FTP server 1.0.0 ready.
        // Multi-line replies open with "220-" and end at the first "220 " line.
        let line = self.next_line().await?;
        let (code, more, msg) = parse_line(&line).ok_or(FTPError::InvalidResponse)?;
        let msg = msg.to_owned();

        if more {
            let end = format!("{} ", code);
            loop {
                let line = self.next_line().await?;
                trace!("< {}", line);
                if line.starts_with(&end) || line == code.to_string() {
                    break;
                }
            }
        }

        Ok((code, msg))
    }

    async fn passive(&mut self) -> Result<TcpStream, FTPError> {
        let msg = self.expect("PASV", 227).await?;
        let addr = parse_pasv(&msg)?;

        debug!("Passive mode listen address is {}", addr);

        Ok(TcpStream::connect(addr).await?)
    }

    /// Opens a passive data connection and issues a transfer command on it.
    async fn open_data<C: AsRef<[u8]> + fmt::Display>(
        &mut self,
        command: C,
    ) -> Result<TcpStream, FTPError> {
        let data = self.passive().await?;
        let (status, msg) = self.command(command).await?;
        if !(100..200).contains(&status) {
            return Err(FTPError::BadStatus(status, msg));
        }
        Ok(data)
    }

    async fn finish_transfer(&mut self) -> Result<(), FTPError> {
        let (status, msg) = self.getline().await?;
        debug!("< {} - {}", status, msg);
        match status {
            226 | 250 => Ok(()),
            _ => Err(FTPError::BadStatus(status, msg)),
        }
    }

    pub async fn pwd(&mut self) -> Result<String, FTPError> {
        let msg = self.expect("PWD", 257).await?;
        parse_quoted_path(&msg).ok_or(FTPError::InvalidResponse)
    }

    pub async fn cwd(&mut self, path: &str) -> Result<(), FTPError> {
        self.expect_any(["CWD ", path].concat(), &[200, 250]).await?;
        Ok(())
    }

    pub async fn size(&mut self, path: &str) -> Result<u64, FTPError> {
        self.expect(["SIZE ", path].concat(), 213)
            .await?
            .trim()
            .parse::<u64>()
            .map_err(|_| FTPError::InvalidResponse)
    }

    /// Name listing of the current working directory.
    pub async fn nlst(&mut self) -> Result<Vec<String>, FTPError> {
        let data = self.open_data("NLST").await?;

        let mut names = Vec::new();
        let mut lines = BufReader::new(data).lines();
        let listed = loop {
            match lines.next().await {
                Some(Ok(line)) => {
                    let name = line.trim_end_matches('\r');
                    if !name.is_empty() {
                        names.push(name.to_owned());
                    }
                }
                Some(Err(e)) => break Err(e),
                None => break Ok(()),
            }
        };
        drop(lines);

        // The completion reply is pending even when the data side failed.
        let done = self.finish_transfer().await;
        listed?;
        done?;

        trace!("Listed {} entries", names.len());

        Ok(names)
    }

    /// Streams the remote file into `out`, returning the number of bytes written.
    pub async fn retrieve<W>(&mut self, from: &str, out: &mut W) -> Result<u64, FTPError>
    where
        W: Write + Unpin + ?Sized,
    {
        let mut data = self.open_data(["RETR ", from].concat()).await?;

        let copied = copy_chunks(&mut data, out).await;
        drop(data);

        let done = self.finish_transfer().await;
        let count = copied?;
        done?;

        debug!("{} - {} bytes", from, count);

        Ok(count)
    }

    pub async fn quit(mut self) -> Result<(), FTPError> {
        self.expect_any("QUIT", &[200, 221]).await?;
        Ok(())
    }

    pub async fn login(host: &str, port: u16) -> Result<Self, FTPError> {
        let socket = TcpStream::connect((host, port)).await?;
        let mut conn = FTPConnection {
            lines: BufReader::new(socket.clone()).lines(),
            socket,
        };

        let (status, msg) = conn.getline().await?;
        if status != 220 {
            return Err(FTPError::BadStatus(status, msg));
        }

        let credentials = Credentials::default();
        let (status, msg) = conn.command(["USER ", credentials.user.as_str()].concat()).await?;
        match status {
            230 => {}
            331 => {
                conn.expect_any(["PASS ", credentials.pass.as_str()].concat(), &[202, 230])
                    .await?;
            }
            _ => return Err(FTPError::BadStatus(status, msg)),
        }

        conn.expect("TYPE I", 200).await?;

        info!("Logged in to {}:{} as {}", host, port, credentials.user);

        Ok(conn)
    }
}

async fn copy_chunks<R, W>(from: &mut R, to: &mut W) -> io::Result<u64>
where
    R: Read + Unpin,
    W: Write + Unpin + ?Sized,
{
    let mut buf = [0u8; BUF_SIZE];
    let mut total = 0u64;

    loop {
        let count = from.read(&mut buf).await?;
        if count == 0 {
            break;
        }
        trace!("Writing {} bytes...", count);
        to.write_all(&buf[..count]).await?;
        total += count as u64;
    }

    to.flush().await?;

    Ok(total)
}

// msg = Entering Passive Mode (145,24,145,107,207,235).
// IP = 145.24.145.107
// Port = 53227 (207 * 256 + 235)
fn parse_pasv(msg: &str) -> Result<SocketAddr, FTPError> {
    let lparen = msg.find('(').ok_or(FTPError::InvalidResponse)?;
    let rparen = msg.rfind(')').ok_or(FTPError::InvalidResponse)?;
    if rparen < lparen {
        return Err(FTPError::InvalidResponse);
    }

    let addr = msg[lparen + 1..rparen]
        .split(',')
        .map(|n| n.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| FTPError::InvalidResponse)?;
    if addr.len() != 6 {
        return Err(FTPError::InvalidResponse);
    }

    let host = Ipv4Addr::new(addr[0], addr[1], addr[2], addr[3]);
    let port = (addr[4] as u16) * 256 + (addr[5] as u16);

    Ok(SocketAddr::new(host.into(), port))
}

// msg = "/pub/dir" is the current directory
// Embedded quotes are doubled.
fn parse_quoted_path(msg: &str) -> Option<String> {
    let start = msg.find('"')?;
    let mut path = String::new();
    let mut chars = msg[start + 1..].chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                path.push('"');
            } else {
                return Some(path);
            }
        } else {
            path.push(c);
        }
    }

    None
}
