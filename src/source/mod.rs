//! Resolution of locations into character sources.
//!
//! A location is first parsed as a URL. The first registered
//! [`ProtocolHandler`] that claims the URL's scheme is asked to open it; when
//! none does, the location is opened as a plain filesystem path. The `file`
//! scheme is always handled; `http` and `https` are handled by
//! [`HttpHandler`] when the `http` feature is enabled, which it is by default.
//! Callers can [`register`](SourceResolver::register) handlers of their own.
//!
//! Handlers hand back an already decoded [`CharSource`]; [`ReaderSource`]
//! performs UTF-8 decoding for anything implementing [`Read`].

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::tokenizer::CharSource;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpHandler;

/// Decodes UTF-8 from a byte reader one character at a time.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: BufReader<R>,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap `reader`, buffering it internally.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0_u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(byte.first().copied()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}

fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream is not valid UTF-8")
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let width = utf8_width(lead).ok_or_else(invalid_utf8)?;
        let mut buf = Vec::with_capacity(width);
        buf.push(lead);
        while buf.len() < width {
            let byte = self.read_byte()?.ok_or_else(invalid_utf8)?;
            buf.push(byte);
        }
        let text = std::str::from_utf8(&buf).map_err(|_| invalid_utf8())?;
        Ok(text.chars().next())
    }
}

/// Opens the contents behind URLs of particular schemes.
pub trait ProtocolHandler {
    /// Schemes served by this handler, compared case-insensitively.
    fn schemes(&self) -> &[&str];

    /// Open `url`, or return `None` when this handler cannot serve it.
    fn open(&self, url: &Url) -> Option<Box<dyn CharSource>>;
}

/// Serves `file://` URLs from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileHandler;

impl ProtocolHandler for FileHandler {
    fn schemes(&self) -> &[&str] {
        &["file"]
    }

    fn open(&self, url: &Url) -> Option<Box<dyn CharSource>> {
        let path = url.to_file_path().ok()?;
        open_path(&path)
    }
}

fn open_path(path: &Path) -> Option<Box<dyn CharSource>> {
    match File::open(path) {
        Ok(file) => Some(Box::new(ReaderSource::new(file))),
        Err(err) => {
            debug!("could not open {}: {err}", path.display());
            None
        }
    }
}

/// Ordered collection of protocol handlers.
pub struct SourceResolver {
    handlers: Vec<Box<dyn ProtocolHandler>>,
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self {
            handlers: vec![
                Box::new(FileHandler),
                #[cfg(feature = "http")]
                Box::new(HttpHandler::new()),
            ],
        }
    }
}

impl std::fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schemes: Vec<&str> = self
            .handlers
            .iter()
            .flat_map(|h| h.schemes().iter().copied())
            .collect();
        f.debug_struct("SourceResolver")
            .field("schemes", &schemes)
            .finish()
    }
}

impl SourceResolver {
    /// A resolver with the built-in handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Earlier handlers win when schemes overlap.
    pub fn register(&mut self, handler: impl ProtocolHandler + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Open `location` as a character source.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if neither a handler nor the
    /// filesystem fallback can open the location.
    pub fn resolve(&self, location: &str) -> Result<Box<dyn CharSource>, Error> {
        if let Ok(url) = Url::parse(location) {
            let scheme = url.scheme();
            let opened = self
                .handlers
                .iter()
                .filter(|h| h.schemes().iter().any(|s| s.eq_ignore_ascii_case(scheme)))
                .find_map(|h| h.open(&url));
            if let Some(source) = opened {
                return Ok(source);
            }
        }
        open_path(Path::new(location)).ok_or_else(|| {
            warn!("no handler could open '{location}'");
            Error::InvalidArgument(format!("cannot open '{location}'"))
        })
    }
}
