//! A scripted, single-user FTP server for tests. It understands just enough of the protocol for the relay's client:
//! USER, PASS, CWD, TYPE, PASV, STOR and QUIT. Files are stored under a temporary root directory.
use std::{
    fs,
    io::{self, BufRead, BufReader, Read, Write},
    net::{TcpListener, TcpStream},
    path::{Path, PathBuf},
    thread,
};

use order_ftp_engine::db_types::FtpCredentials;
use tempfile::TempDir;

pub const USERNAME: &str = "merchant";
pub const PASSWORD: &str = "s3cret";

pub struct FakeFtpServer {
    port: u16,
    root: TempDir,
}

impl FakeFtpServer {
    /// Start a server. If `with_upload_dir` is false, the `in` directory does not exist.
    pub fn start(with_upload_dir: bool) -> Self {
        let root = tempfile::tempdir().expect("Could not create FTP root");
        if with_upload_dir {
            fs::create_dir(root.path().join("in")).expect("Could not create upload dir");
        }
        let listener = TcpListener::bind("127.0.0.1:0").expect("Could not bind FTP listener");
        let port = listener.local_addr().unwrap().port();
        let root_path = root.path().to_path_buf();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let root = root_path.clone();
                thread::spawn(move || {
                    let _ = serve(stream, &root);
                });
            }
        });
        Self { port, root }
    }

    pub fn credentials(&self) -> FtpCredentials {
        FtpCredentials::new("127.0.0.1", self.port, USERNAME, PASSWORD)
    }

    pub fn credentials_with_password(&self, password: &str) -> FtpCredentials {
        FtpCredentials::new("127.0.0.1", self.port, USERNAME, password)
    }

    /// `(file name, contents)` of everything in the upload directory.
    pub fn uploaded_files(&self) -> Vec<(String, String)> {
        let Ok(entries) = fs::read_dir(self.root.path().join("in")) else {
            return vec![];
        };
        let mut files = entries
            .flatten()
            .map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let contents = fs::read_to_string(e.path()).unwrap_or_default();
                (name, contents)
            })
            .collect::<Vec<_>>();
        files.sort();
        files
    }
}

/// A port on which nothing is listening.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn reply(out: &mut TcpStream, msg: &str) -> io::Result<()> {
    out.write_all(format!("{msg}\r\n").as_bytes())?;
    out.flush()
}

fn serve(stream: TcpStream, root: &Path) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut out = stream;
    reply(&mut out, "220 Fake FTP server ready")?;
    let mut user: Option<String> = None;
    let mut logged_in = false;
    let mut cwd: PathBuf = root.to_path_buf();
    let mut passive: Option<TcpListener> = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim_end();
        let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
        let cmd = cmd.to_ascii_uppercase();
        match cmd.as_str() {
            "QUIT" => {
                reply(&mut out, "221 Goodbye")?;
                return Ok(());
            },
            "USER" => {
                user = Some(arg.to_string());
                reply(&mut out, "331 Password required")?;
            },
            "PASS" => {
                logged_in = user.as_deref() == Some(USERNAME) && arg == PASSWORD;
                if logged_in {
                    reply(&mut out, "230 Logged in")?;
                } else {
                    reply(&mut out, "530 Login incorrect")?;
                }
            },
            _ if !logged_in => reply(&mut out, "530 Not logged in")?,
            "CWD" => {
                let target = cwd.join(arg);
                if target.is_dir() {
                    cwd = target;
                    reply(&mut out, "250 Directory changed")?;
                } else {
                    reply(&mut out, "550 No such directory")?;
                }
            },
            "TYPE" => reply(&mut out, "200 Type set")?,
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0")?;
                let p = listener.local_addr()?.port();
                reply(&mut out, &format!("227 Entering Passive Mode (127,0,0,1,{},{})", p / 256, p % 256))?;
                passive = Some(listener);
            },
            "STOR" => match passive.take() {
                None => reply(&mut out, "425 Use PASV first")?,
                Some(listener) => {
                    reply(&mut out, "150 Ok to send data")?;
                    let (mut data, _) = listener.accept()?;
                    let mut buf = Vec::new();
                    data.read_to_end(&mut buf)?;
                    fs::write(cwd.join(arg), buf)?;
                    reply(&mut out, "226 Transfer complete")?;
                },
            },
            _ => reply(&mut out, "502 Command not implemented")?,
        }
    }
}
