use rcgen::{generate_simple_self_signed, CertifiedKey};
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{ServerConfig, ServerConnection, StreamOwned};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Local server on an ephemeral port that answers every request with
/// `200 OK` and records the request line it saw. Speaks plain HTTP, or
/// HTTPS with a freshly generated self-signed certificate.
pub struct CountingServer {
    scheme: &'static str,
    port: u16,
    request_lines: Arc<Mutex<Vec<String>>>,
}

impl CountingServer {
    pub fn start() -> Self {
        Self::spawn("http", None)
    }

    /// HTTPS server whose certificate no client trusts.
    pub fn start_tls() -> Self {
        Self::spawn("https", Some(self_signed_config()))
    }

    fn spawn(scheme: &'static str, tls: Option<Arc<ServerConfig>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let port = listener.local_addr().expect("local addr").port();
        let request_lines = Arc::new(Mutex::new(Vec::new()));

        let lines = Arc::clone(&request_lines);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let lines = Arc::clone(&lines);
                let tls = tls.clone();
                thread::spawn(move || match tls {
                    Some(config) => serve_tls(config, stream, &lines),
                    None => {
                        let mut stream = stream;
                        handle_connection(&mut stream, &lines);
                    }
                });
            }
        });

        Self {
            scheme,
            port,
            request_lines,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}://127.0.0.1:{}{}", self.scheme, self.port, path)
    }

    pub fn request_count(&self) -> usize {
        self.request_lines.lock().unwrap().len()
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

fn self_signed_config() -> Arc<ServerConfig> {
    let CertifiedKey { cert, key_pair } =
        generate_simple_self_signed(vec!["localhost".to_string(), "127.0.0.1".to_string()])
            .expect("generate self-signed certificate");
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let config =
        ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .expect("protocol versions")
            .with_no_client_auth()
            .with_single_cert(vec![cert.der().clone()], key)
            .expect("server certificate");
    Arc::new(config)
}

fn serve_tls(config: Arc<ServerConfig>, stream: TcpStream, lines: &Mutex<Vec<String>>) {
    let Ok(conn) = ServerConnection::new(config) else {
        return;
    };
    // The handshake runs on first read; a client that rejects the
    // certificate fails there and is never counted.
    let mut tls = StreamOwned::new(conn, stream);
    handle_connection(&mut tls, lines);
    tls.conn.send_close_notify();
    let _ = tls.flush();
}

fn handle_connection<S: Read + Write>(stream: &mut S, lines: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next().unwrap_or_default().to_string();
    // Record before replying so the count is complete once the client returns.
    lines.lock().unwrap().push(request_line);

    let _ = stream.write_all(
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
    );
    let _ = stream.flush();
}

/// A localhost URL that refuses connections: bind an ephemeral port, then
/// release it.
pub fn refused_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}{path}")
}

/// Whether `program --version` runs successfully on this machine.
pub fn program_available(program: &str) -> bool {
    std::process::Command::new(program)
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
