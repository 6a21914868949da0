//! A single-connection FTP server over a fixed in-memory tree.

use async_std::{
    io::BufReader,
    net::{TcpListener, TcpStream},
    prelude::*,
    task,
};

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Entry {
    Dir,
    File(&'static [u8]),
    /// Listed, but refuses both SIZE and CWD.
    Broken,
    /// Enterable, but NLST fails.
    Unlistable,
}

/// Serves `entries` (absolute paths, listing order) to one client and
/// returns the control port.
pub async fn serve(entries: Vec<(&'static str, Entry)>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    task::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        session(stream, entries).await;
    });

    port
}

fn lookup<'a>(entries: &'a [(&'static str, Entry)], path: &str) -> Option<&'a Entry> {
    entries.iter().find(|(p, _)| *p == path).map(|(_, e)| e)
}

fn resolve(cwd: &str, arg: &str) -> String {
    let path = if arg.starts_with('/') {
        arg.to_owned()
    } else {
        format!("{}/{}", cwd, arg).replace("//", "/")
    };
    match path.trim_end_matches('/') {
        "" => "/".to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

fn children(entries: &[(&'static str, Entry)], dir: &str) -> Vec<String> {
    entries
        .iter()
        .filter_map(|(p, _)| {
            let (parent, name) = p.rsplit_once('/')?;
            let parent = if parent.is_empty() { "/" } else { parent };
            (parent == dir).then(|| name.to_owned())
        })
        .collect()
}

async fn send_data(listener: Option<TcpListener>, payload: &[u8]) {
    if let Some(listener) = listener {
        let (mut data, _) = listener.accept().await.unwrap();
        data.write_all(payload).await.unwrap();
    }
}

async fn session(stream: TcpStream, entries: Vec<(&'static str, Entry)>) {
    let mut writer = stream.clone();
    let mut lines = BufReader::new(stream).lines();
    let mut cwd = "/".to_owned();
    let mut pasv: Option<TcpListener> = None;

    writer
        .write_all(b"220-Scripted FTP server\r\n220 Ready.\r\n")
        .await
        .unwrap();

    while let Some(Ok(line)) = lines.next().await {
        let (cmd, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        let path = resolve(&cwd, arg);

        let reply = match cmd {
            "USER" => "331 Password required.".to_owned(),
            "PASS" => "230 Logged in.".to_owned(),
            "TYPE" => "200 Type set.".to_owned(),
            "PWD" => format!("257 \"{}\" is the current directory.", cwd),
            "CWD" => match lookup(&entries, &path) {
                _ if path == "/" => {
                    cwd = path.clone();
                    "250 OK.".to_owned()
                }
                Some(Entry::Dir) | Some(Entry::Unlistable) => {
                    cwd = path.clone();
                    "250 OK.".to_owned()
                }
                _ => "550 No such directory.".to_owned(),
            },
            "SIZE" => match lookup(&entries, &path) {
                Some(Entry::File(body)) => format!("213 {}", body.len()),
                _ => "550 Not a plain file.".to_owned(),
            },
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                let port = listener.local_addr().unwrap().port();
                pasv = Some(listener);
                format!(
                    "227 Entering Passive Mode (127,0,0,1,{},{}).",
                    port / 256,
                    port % 256
                )
            }
            "NLST" => {
                let listener = pasv.take();
                if let Some(Entry::Unlistable) = lookup(&entries, &cwd) {
                    "450 Cannot list.".to_owned()
                } else {
                    writer.write_all(b"150 Listing.\r\n").await.unwrap();
                    let names = children(&entries, &cwd);
                    let mut listing = String::from(".\r\n..\r\n");
                    for name in names {
                        listing.push_str(&name);
                        listing.push_str("\r\n");
                    }
                    send_data(listener, listing.as_bytes()).await;
                    "226 Transfer complete.".to_owned()
                }
            }
            "RETR" => {
                let listener = pasv.take();
                match lookup(&entries, &path) {
                    Some(Entry::File(body)) => {
                        writer.write_all(b"150 Sending.\r\n").await.unwrap();
                        send_data(listener, body).await;
                        "226 Transfer complete.".to_owned()
                    }
                    _ => "550 No such file.".to_owned(),
                }
            }
            "QUIT" => {
                writer.write_all(b"221 Bye.\r\n").await.unwrap();
                break;
            }
            _ => "502 Not implemented.".to_owned(),
        };

        writer.write_all(format!("{}\r\n", reply).as_bytes()).await.unwrap();
    }
}
