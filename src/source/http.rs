//! `http` and `https` locations, fetched with a single GET.
//!
//! Each request runs to completion on its own current-thread runtime, so the
//! handler stays synchronous like the rest of the resolver. Redirects are not
//! followed and any status outside `2xx` fails the request. The body is
//! decoded according to the `charset` parameter of `Content-Type`; UTF-8 is
//! assumed when none is given and ISO-8859-1 is also understood.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::{CONTENT_TYPE, HOST, USER_AGENT};
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use log::{debug, warn};
use rustls::pki_types::{InvalidDnsNameError, ServerName};
use rustls::{ClientConfig, RootCertStore};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use url::Url;

use super::{ProtocolHandler, ReaderSource};
use crate::tokenizer::{CharSource, IterSource};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),
    #[error("invalid request: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),
    #[error("invalid server name: {0}")]
    ServerName(#[from] InvalidDnsNameError),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("URL has no host")]
    MissingHost,
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("unsupported charset '{0}'")]
    UnsupportedCharset(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Utf8,
    Latin1,
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

fn charset(content_type: Option<&str>) -> Result<Charset, FetchError> {
    let Some(label) = content_type.and_then(charset_param) else {
        return Ok(Charset::Utf8);
    };
    match label.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" | "us-ascii" | "ascii" => Ok(Charset::Utf8),
        "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" => Ok(Charset::Latin1),
        other => Err(FetchError::UnsupportedCharset(other.to_owned())),
    }
}

fn decode(content_type: Option<&str>, body: Bytes) -> Result<Box<dyn CharSource>, FetchError> {
    Ok(match charset(content_type)? {
        Charset::Utf8 => Box::new(ReaderSource::new(io::Cursor::new(body))),
        Charset::Latin1 => Box::new(IterSource::new(body.into_iter().map(char::from))),
    })
}

fn tls_connector() -> Result<TlsConnector, FetchError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth();
    Ok(TlsConnector::from(Arc::new(config)))
}

struct Fetched {
    content_type: Option<String>,
    body: Bytes,
}

async fn fetch(url: &Url) -> Result<Fetched, FetchError> {
    let host = url.host_str().ok_or(FetchError::MissingHost)?;
    let port = url.port_or_known_default().ok_or(FetchError::MissingHost)?;
    let addr_host = host.trim_start_matches('[').trim_end_matches(']');
    let tcp = TcpStream::connect((addr_host, port)).await?;
    if url.scheme() == "https" {
        let name = ServerName::try_from(addr_host.to_owned())?;
        let tls = tls_connector()?.connect(name, tcp).await?;
        get(url, tls).await
    } else {
        get(url, tcp).await
    }
}

async fn get<S>(url: &Url, stream: S) -> Result<Fetched, FetchError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, connection) =
        hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            debug!("connection closed with error: {err}");
        }
    });

    let host = url.host_str().ok_or(FetchError::MissingHost)?;
    let authority = url
        .port()
        .map_or_else(|| host.to_owned(), |port| format!("{host}:{port}"));
    let target = url
        .query()
        .map_or_else(|| url.path().to_owned(), |q| format!("{}?{q}", url.path()));
    let request = Request::get(target)
        .header(HOST, authority)
        .header(USER_AGENT, concat!("tokeval/", env!("CARGO_PKG_VERSION")))
        .body(Empty::<Bytes>::new())?;

    let response = sender.send_request(request).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = response.into_body().collect().await?.to_bytes();
    debug!("fetched {} bytes from {url}", body.len());
    Ok(Fetched { content_type, body })
}

/// Serves `http://` and `https://` URLs.
#[derive(Debug, Clone, Copy)]
pub struct HttpHandler {
    timeout: Duration,
}

impl Default for HttpHandler {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on a request that has not completed within `timeout`.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub fn timeout(self) -> Duration {
        self.timeout
    }

    fn load(&self, url: &Url) -> Result<Box<dyn CharSource>, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let timeout = self.timeout;
        let fetched = runtime.block_on(async { tokio::time::timeout(timeout, fetch(url)).await });
        let Fetched { content_type, body } =
            fetched.map_err(|_| FetchError::Timeout(timeout))??;
        decode(content_type.as_deref(), body)
    }
}

impl ProtocolHandler for HttpHandler {
    fn schemes(&self) -> &[&str] {
        &["http", "https"]
    }

    fn open(&self, url: &Url) -> Option<Box<dyn CharSource>> {
        match self.load(url) {
            Ok(source) => Some(source),
            Err(err) => {
                warn!("could not fetch {url}: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread::{self, JoinHandle};

    use rstest::rstest;

    use super::*;
    use crate::error::Error;
    use crate::source::SourceResolver;

    fn drain(source: &mut dyn CharSource) -> String {
        let mut out = String::new();
        while let Ok(Some(ch)) = source.next_char() {
            out.push(ch);
        }
        out
    }

    fn response(status: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        out.extend_from_slice(body);
        out
    }

    /// Answer one request with `reply` after `delay`, handing back the
    /// request head that was received.
    fn serve_once(reply: Vec<u8>, delay: Duration) -> (SocketAddr, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap_or_else(|e| panic!("bind: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("local addr: {e}"));
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap_or_else(|e| panic!("accept: {e}"));
            let mut head = Vec::new();
            let mut buf = [0_u8; 512];
            while !head.ends_with(b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap_or_else(|e| panic!("read: {e}"));
                if n == 0 {
                    break;
                }
                head.extend_from_slice(buf.get(..n).unwrap_or_default());
            }
            thread::sleep(delay);
            // The client may already have given up.
            let _ = stream.write_all(&reply);
            String::from_utf8_lossy(&head).into_owned()
        });
        (addr, handle)
    }

    #[test]
    fn fetches_utf8_body_with_get() {
        let body = "2x + π";
        let reply = response("200 OK", "text/plain; charset=utf-8", body.as_bytes());
        let (addr, server) = serve_once(reply, Duration::ZERO);

        let resolver = SourceResolver::new();
        let mut source = resolver
            .resolve(&format!("http://{addr}/expr.txt?v=1"))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(drain(source.as_mut()), body);

        let head = server
            .join()
            .unwrap_or_else(|_| panic!("server thread panicked"))
            .to_ascii_lowercase();
        assert!(head.starts_with("get /expr.txt?v=1 http/1.1\r\n"), "{head}");
        assert!(head.contains(&format!("host: {addr}\r\n")), "{head}");
    }

    #[test]
    fn latin1_body_is_transcoded() {
        let reply = response("200 OK", "text/plain; charset=ISO-8859-1", &[b'c', 0xE9]);
        let (addr, server) = serve_once(reply, Duration::ZERO);
        let url = Url::parse(&format!("http://{addr}/"))
            .unwrap_or_else(|e| panic!("{e}"));
        let mut source = HttpHandler::new()
            .open(&url)
            .unwrap_or_else(|| panic!("no source for {url}"));
        assert_eq!(drain(source.as_mut()), "cé");
        let _ = server.join();
    }

    #[rstest]
    #[case::not_found(response("404 Not Found", "text/plain", b"gone"))]
    #[case::unsupported_charset(response("200 OK", "text/plain; charset=utf-16", b"1"))]
    fn failed_fetch_is_invalid_argument(#[case] reply: Vec<u8>) {
        let (addr, server) = serve_once(reply, Duration::ZERO);
        let result = SourceResolver::new().resolve(&format!("http://{addr}/doc.json"));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        let _ = server.join();
    }

    #[test]
    fn slow_server_times_out() {
        let reply = response("200 OK", "text/plain", b"1");
        let (addr, server) = serve_once(reply, Duration::from_millis(500));
        let url = Url::parse(&format!("http://{addr}/")).unwrap_or_else(|e| panic!("{e}"));
        let handler = HttpHandler::with_timeout(Duration::from_millis(50));
        assert!(handler.open(&url).is_none());
        let _ = server.join();
    }

    #[rstest]
    #[case(None, Some(Charset::Utf8))]
    #[case(Some("text/plain"), Some(Charset::Utf8))]
    #[case(Some("application/json; charset=\"UTF-8\""), Some(Charset::Utf8))]
    #[case(Some("text/plain;charset=us-ascii"), Some(Charset::Utf8))]
    #[case(Some("text/plain; format=flowed; charset=Latin1"), Some(Charset::Latin1))]
    #[case(Some("text/plain; charset=windows-1252"), None)]
    fn charset_from_content_type(#[case] content_type: Option<&str>, #[case] expected: Option<Charset>) {
        assert_eq!(charset(content_type).ok(), expected);
    }
}
