//! Character cursor over an arbitrary character source.
//!
//! The [`Cursor`] gives the grammar layers single-character lookahead,
//! consumption, whitespace skipping and pushback. Pushed-back text is kept in
//! a queue that is always drained before the underlying source is read again,
//! so a rule that over-reads can hand characters back without the source
//! needing to support seeking.
//!
//! I/O failures never reach the grammar: they are logged and treated as end
//! of input.

use std::collections::VecDeque;
use std::io;

use log::{debug, warn};

use crate::error::Error;
use crate::source::SourceResolver;

/// A pull-based producer of decoded characters.
///
/// Returning `Ok(None)` signals end of input. The cursor drops the source the
/// first time that happens, which releases whatever the source holds.
pub trait CharSource {
    /// Produce the next character, `None` at end of input.
    ///
    /// # Errors
    /// Returns an I/O error if the underlying transport fails or yields data
    /// that cannot be decoded.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

/// Adapts any `char` iterator into a [`CharSource`].
#[derive(Debug, Clone)]
pub struct IterSource<I>(I);

impl<I> IterSource<I>
where
    I: Iterator<Item = char>,
{
    /// Wrap a character iterator.
    #[must_use]
    pub fn new(iter: I) -> Self {
        Self(iter)
    }
}

impl<I> CharSource for IterSource<I>
where
    I: Iterator<Item = char>,
{
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.0.next())
    }
}

/// Single-character lookahead cursor with an injection queue.
///
/// Characters passed to [`Cursor::inject`] are returned by `peek`/`pop`
/// before anything further from the underlying source.
pub struct Cursor {
    source: Option<Box<dyn CharSource>>,
    lookahead: Option<char>,
    injected: VecDeque<char>,
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("open", &self.source.is_some())
            .field("lookahead", &self.lookahead)
            .field("injected", &self.injected)
            .finish()
    }
}

impl Cursor {
    /// Create a cursor over `source` and prime the lookahead character.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tokeval::tokenizer::{Cursor, IterSource};
    ///
    /// let mut cursor = Cursor::new(IterSource::new("ab".chars()));
    /// assert_eq!(cursor.pop(), Some('a'));
    /// assert_eq!(cursor.peek(), Some('b'));
    /// ```
    #[must_use]
    pub fn new(source: impl CharSource + 'static) -> Self {
        let mut cursor = Self {
            source: Some(Box::new(source)),
            lookahead: None,
            injected: VecDeque::new(),
        };
        cursor.lookahead = cursor.read_source();
        cursor
    }

    /// Create a cursor over a boxed source that may be absent.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when `source` is `None`.
    pub fn from_source(source: Option<Box<dyn CharSource>>) -> Result<Self, Error> {
        let source =
            source.ok_or_else(|| Error::InvalidArgument("character source is absent".into()))?;
        let mut cursor = Self {
            source: Some(source),
            lookahead: None,
            injected: VecDeque::new(),
        };
        cursor.lookahead = cursor.read_source();
        Ok(cursor)
    }

    /// Resolve `location` through `resolver` and create a cursor over it.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when no handler can open the
    /// location.
    pub fn open(location: &str, resolver: &SourceResolver) -> Result<Self, Error> {
        Self::from_source(Some(resolver.resolve(location)?))
    }

    /// Look at the current character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.injected.front().copied().or(self.lookahead)
    }

    /// Consume and return the current character.
    ///
    /// Once the end of input is reached every further call returns `None`.
    pub fn pop(&mut self) -> Option<char> {
        if let Some(ch) = self.injected.pop_front() {
            return Some(ch);
        }
        let current = self.lookahead;
        self.lookahead = self.read_source();
        current
    }

    /// Queue `text` to be read before any further source characters.
    ///
    /// Successive injections are read back in the order they were made.
    pub fn inject(&mut self, text: &str) {
        self.injected.extend(text.chars());
    }

    /// Skip whitespace, then consume `expected` if it is next.
    ///
    /// Returns `false` and leaves the cursor on the first non-whitespace
    /// character when it does not match.
    pub fn is_next(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pop();
            true
        } else {
            false
        }
    }

    /// Consume characters while they are Unicode whitespace.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pop();
        }
    }

    /// Whether nothing remains to be read.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.peek().is_none()
    }

    fn read_source(&mut self) -> Option<char> {
        let source = self.source.as_mut()?;
        match source.next_char() {
            Ok(Some(ch)) => Some(ch),
            Ok(None) => {
                debug!("character source exhausted; releasing it");
                self.source = None;
                None
            }
            Err(err) => {
                warn!("read failed, treating as end of input: {err}");
                self.source = None;
                None
            }
        }
    }
}

impl From<&str> for Cursor {
    fn from(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self::new(IterSource::new(chars.into_iter()))
    }
}

impl From<String> for Cursor {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use rstest::rstest;

    use super::*;

    /// Counts how often it is dropped and fails after yielding its text.
    struct Tracked {
        chars: std::vec::IntoIter<char>,
        fail: bool,
        drops: Rc<Cell<usize>>,
    }

    impl CharSource for Tracked {
        fn next_char(&mut self) -> io::Result<Option<char>> {
            match self.chars.next() {
                Some(ch) => Ok(Some(ch)),
                None if self.fail => Err(io::Error::other("boom")),
                None => Ok(None),
            }
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn tracked(text: &str, fail: bool) -> (Cursor, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        let source = Tracked {
            chars: text.chars().collect::<Vec<_>>().into_iter(),
            fail,
            drops: Rc::clone(&drops),
        };
        (Cursor::new(source), drops)
    }

    #[test]
    fn pop_past_end_is_idempotent() {
        let mut cursor = Cursor::from("a");
        assert_eq!(cursor.pop(), Some('a'));
        assert_eq!(cursor.pop(), None);
        assert_eq!(cursor.pop(), None);
        assert_eq!(cursor.peek(), None);
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn source_released_once_at_end(#[case] fail: bool) {
        let (mut cursor, drops) = tracked("xy", fail);
        assert_eq!(cursor.pop(), Some('x'));
        assert_eq!(drops.get(), 0);
        assert_eq!(cursor.pop(), Some('y'));
        assert_eq!(drops.get(), 1);
        assert_eq!(cursor.pop(), None);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn empty_source_is_released_while_priming() {
        let (cursor, drops) = tracked("", false);
        assert_eq!(cursor.peek(), None);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn injected_text_precedes_source() {
        let mut cursor = Cursor::from("cd");
        cursor.inject("a");
        cursor.inject("b");
        let read: String = std::iter::from_fn(|| cursor.pop()).collect();
        assert_eq!(read, "abcd");
    }

    #[test]
    fn injection_after_end_is_readable() {
        let mut cursor = Cursor::from("");
        cursor.inject("-");
        assert_eq!(cursor.peek(), Some('-'));
        assert_eq!(cursor.pop(), Some('-'));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn empty_injection_is_noop() {
        let mut cursor = Cursor::from("z");
        cursor.inject("");
        assert_eq!(cursor.pop(), Some('z'));
    }

    #[rstest]
    #[case(" \t\n(", '(', true)]
    #[case("\u{00a0}\u{2003}(", '(', true)]
    #[case("  )", '(', false)]
    #[case("", '(', false)]
    fn is_next_skips_whitespace(#[case] src: &str, #[case] ch: char, #[case] expected: bool) {
        let mut cursor = Cursor::from(src);
        assert_eq!(cursor.is_next(ch), expected);
        if !expected {
            assert_ne!(cursor.peek().map(char::is_whitespace), Some(true));
        }
    }

    #[test]
    fn absent_source_is_invalid_argument() {
        let result = Cursor::from_source(None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
