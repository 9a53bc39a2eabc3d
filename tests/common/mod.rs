#![allow(dead_code)]

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use webserv::config::Config;
use webserv::server::Server;
use webserv::server::listener::Accept;
use webserv::server::status::ServerStatus;
use webserv::tls::SecureTransport;

pub const INDEX_HTML: &[u8] = b"<html><body>index</body></html>\n";
pub const ERROR_HTML: &[u8] = b"<html><body>404 - not here</body></html>\n";
pub const SUB_INDEX_HTML: &[u8] = b"<html><body>sub index</body></html>\n";

pub const MIME_TABLE: &str = "4\n.html\ttext/html\n.css\ttext/css\n.txt\ttext/plain\n.png\timage/png\n";

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A throwaway server root under the system temp directory.
pub struct Fixture {
    pub root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!("webserv-test-{}-{}", std::process::id(), id));
        std::fs::create_dir_all(root.join("sub")).unwrap();

        std::fs::write(root.join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(root.join("error.html"), ERROR_HTML).unwrap();
        std::fs::write(root.join("sub/index.html"), SUB_INDEX_HTML).unwrap();
        std::fs::write(root.join("mime-types.tsv"), MIME_TABLE).unwrap();

        Self { root }
    }

    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn mime_table(&self) -> PathBuf {
        self.root.join("mime-types.tsv")
    }

    /// Loopback config on an ephemeral port, serving this fixture.
    pub fn config(&self) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            root: self.root.clone(),
            mime_table: self.mime_table(),
            ..Config::default()
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Deterministic, non-repeating-looking bytes.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u32).wrapping_mul(31).wrapping_add(seed as u32) as u8)
        .collect()
}

/// Starts `server` in the background and waits until it is listening.
pub async fn start<T: SecureTransport>(server: Server<T>) -> (SocketAddr, ServerStatus) {
    let status = server.status();
    tokio::spawn(server.run());

    for _ in 0..200 {
        if let Some(port) = status.snapshot().await.listening_port {
            return (SocketAddr::from(([127, 0, 0, 1], port)), status);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("server did not start listening");
}

/// Sends raw request bytes over plain TCP and reads until the server closes.
pub async fn fetch(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    out
}

pub async fn get(addr: SocketAddr, target: &str) -> Vec<u8> {
    fetch(addr, format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", target).as_bytes()).await
}

/// Splits a response into its header block (without the blank line) and body.
pub fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
    (head, raw[end + 4..].to_vec())
}

pub fn header_for(code: u16, mime: &str) -> String {
    let reason = if code == 200 { "OK" } else { "Not Found" };
    format!("HTTP/1.1 {} {}\r\nContent-Type: {}", code, reason, mime)
}

/// A base port whose whole default recovery range fits below 65535.
pub fn pick_base() -> u16 {
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    port.min(65_000) - 1
}

/// A listener whose accepts all fail when `refuse` is set.
pub struct RefusingListener {
    inner: TcpListener,
    refuse: bool,
}

impl Accept for RefusingListener {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        async move {
            if self.refuse {
                Err(io::Error::other("accept refused"))
            } else {
                self.inner.accept().await
            }
        }
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}

/// Ports of every listener handed to a layer, in order.
pub type SeenPorts = Arc<Mutex<Vec<u16>>>;

/// A listener layer whose first `refusals` listeners fail their accepts.
pub fn refusing_layer(
    refusals: usize,
    seen: SeenPorts,
) -> impl FnMut(TcpListener) -> RefusingListener + Send + 'static {
    move |inner| {
        let mut ports = seen.lock().unwrap();
        ports.push(inner.local_addr().unwrap().port());
        RefusingListener {
            inner,
            refuse: ports.len() <= refusals,
        }
    }
}

/// Waits until `seen` holds at least `count` ports and the status reports
/// the last of them, then returns them all.
pub async fn wait_for_listener(seen: &SeenPorts, status: &ServerStatus, count: usize) -> Vec<u16> {
    for _ in 0..200 {
        let ports = seen.lock().unwrap().clone();
        if ports.len() >= count && status.snapshot().await.listening_port == ports.last().copied() {
            return ports;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no listener after {} accept failures", count - 1);
}
