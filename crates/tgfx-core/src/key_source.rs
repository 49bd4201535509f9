#![forbid(unsafe_code)]

//! Keyboard sources: where logical keys come from.
//!
//! A [`KeySource`] hides whether keys are decoded from a byte stream
//! ([`ByteKeySource`]) or translated from platform event records
//! ([`EventKeySource`]).

use std::io;
use std::time::Duration;

use crate::event_record::translate_event;
use crate::key::Key;
use crate::key_decoder::{ByteSource, DecoderState, KeyDecoder, ReadMode};

/// A source of logical keys.
pub trait KeySource {
    /// Return the next key if one is pending, without suspending.
    ///
    /// # Errors
    ///
    /// Fails only on I/O errors from the underlying input; "nothing
    /// pending" is `Ok(None)`.
    fn poll_key(&mut self) -> io::Result<Option<Key>>;

    /// Suspend until a key is available and return it.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, including input that can never produce
    /// another key (closed terminal, exhausted in-memory source).
    fn wait_key(&mut self) -> io::Result<Key>;
}

impl<K: KeySource + ?Sized> KeySource for Box<K> {
    fn poll_key(&mut self) -> io::Result<Option<Key>> {
        (**self).poll_key()
    }

    fn wait_key(&mut self) -> io::Result<Key> {
        (**self).wait_key()
    }
}

/// Keys decoded from a raw byte stream by a [`KeyDecoder`].
#[derive(Debug)]
pub struct ByteKeySource<S> {
    source: S,
    decoder: KeyDecoder,
}

impl<S: ByteSource> ByteKeySource<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            decoder: KeyDecoder::new(),
        }
    }

    /// Current decoder state.
    #[must_use]
    pub fn decoder_state(&self) -> DecoderState {
        self.decoder.state()
    }

    /// The wrapped byte source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: ByteSource> KeySource for ByteKeySource<S> {
    fn poll_key(&mut self) -> io::Result<Option<Key>> {
        self.decoder
            .next_key(&mut self.source, ReadMode::NonBlocking)
    }

    fn wait_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = self
                .decoder
                .next_key(&mut self.source, ReadMode::Blocking)?
            {
                return Ok(key);
            }
        }
    }
}

/// Keys translated from `crossterm` event records.
///
/// Requires the terminal to be in raw mode, which
/// [`crate::terminal_session::TerminalSession`] arranges.
#[derive(Debug, Default)]
pub struct EventKeySource {
    _private: (),
}

impl EventKeySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for EventKeySource {
    fn poll_key(&mut self) -> io::Result<Option<Key>> {
        while crossterm::event::poll(Duration::ZERO)? {
            if let Some(key) = translate_event(&crossterm::event::read()?) {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }

    fn wait_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = translate_event(&crossterm::event::read()?) {
                return Ok(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_source::SliceSource;

    #[test]
    fn poll_returns_none_when_idle() {
        let mut keys = ByteKeySource::new(SliceSource::new());
        assert_eq!(keys.poll_key().unwrap(), None);
    }

    #[test]
    fn wait_key_drives_the_same_decoder() {
        let mut keys = ByteKeySource::new(SliceSource::from(&b"\x1b[Bz"[..]));
        assert_eq!(keys.wait_key().unwrap(), Key::Down);
        assert_eq!(keys.poll_key().unwrap(), Some(Key::Char(b'z')));
    }

    #[test]
    fn poll_and_wait_share_partial_state() {
        let mut keys = ByteKeySource::new(SliceSource::from(&b"\x1b"[..]));
        assert_eq!(keys.poll_key().unwrap(), None);
        assert_eq!(keys.decoder_state(), DecoderState::SawEscape);
        keys.source_mut().push(b"q");
        assert_eq!(keys.wait_key().unwrap(), Key::Char(0x1B));
        assert_eq!(keys.wait_key().unwrap(), Key::Char(b'q'));
    }

    #[test]
    fn boxed_sources_forward() {
        let mut keys: Box<dyn KeySource> =
            Box::new(ByteKeySource::new(SliceSource::from(&b"k"[..])));
        assert_eq!(keys.poll_key().unwrap(), Some(Key::Char(b'k')));
    }
}
