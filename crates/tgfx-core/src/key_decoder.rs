#![forbid(unsafe_code)]

//! Byte-stream key decoder.
//!
//! Turns raw terminal input into [`Key`]s, one call at a time.
//!
//! # Design
//!
//! The decoder is a four-state machine:
//!
//! | State | Input | Action |
//! |-------|-------|--------|
//! | `Normal` | ESC | queue it, go to `SawEscape` |
//! | `Normal` | other | return `Char(byte)` |
//! | `SawEscape` | `[` | queue it, go to `SawEscapeBracket` |
//! | `SawEscape` | other | queue it, go to `Draining` |
//! | `SawEscapeBracket` | `A` `B` `C` `D` | drop the prefix, return Up/Down/Right/Left |
//! | `SawEscapeBracket` | other | queue it, go to `Draining` |
//! | `Draining` | n/a | return one queued byte per call; `Normal` once empty |
//!
//! # Invariants
//!
//! 1. No input byte is lost or duplicated: every byte is either part of a
//!    complete arrow sequence or eventually returned as `Key::Char`.
//! 2. The queue never holds more than [`MAX_SEQUENCE_LEN`] bytes, well
//!    below [`QUEUE_CAPACITY`].
//! 3. State persists across calls; an ESC at the end of the available
//!    input leaves the decoder in `SawEscape` until more input arrives.

use std::io;

use crate::key::Key;

/// ASCII escape.
pub const ESCAPE: u8 = 0x1B;

/// Longest recognized sequence (`ESC [ A`).
pub const MAX_SEQUENCE_LEN: usize = 3;

/// Queue capacity: one more than the longest recognized sequence.
pub const QUEUE_CAPACITY: usize = MAX_SEQUENCE_LEN + 1;

/// How a [`ByteSource`] should behave when no byte is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Report `None` immediately.
    NonBlocking,
    /// Suspend the caller until at least one byte is available.
    Blocking,
}

/// A source of raw input bytes.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(None)` when no byte is currently available. In
    /// [`ReadMode::Blocking`] implementations may still return `Ok(None)`
    /// after a spurious wakeup; callers retry.
    fn read_byte(&mut self, mode: ReadMode) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self, mode: ReadMode) -> io::Result<Option<u8>> {
        (**self).read_byte(mode)
    }
}

/// Decoder state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// Plain byte pass-through.
    #[default]
    Normal,
    /// After ESC.
    SawEscape,
    /// After ESC `[`.
    SawEscapeBracket,
    /// Returning queued bytes of an unrecognized sequence.
    Draining,
}

/// Fixed-size FIFO for the bytes of a partially matched sequence.
#[derive(Debug, Clone, Default)]
struct ByteQueue {
    bytes: [u8; QUEUE_CAPACITY],
    head: usize,
    len: usize,
}

impl ByteQueue {
    fn push(&mut self, byte: u8) {
        debug_assert!(self.len < QUEUE_CAPACITY, "key queue overflow");
        if self.len == QUEUE_CAPACITY {
            return;
        }
        let tail = (self.head + self.len) % QUEUE_CAPACITY;
        self.bytes[tail] = byte;
        self.len += 1;
    }

    fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        let byte = self.bytes[self.head];
        self.head = (self.head + 1) % QUEUE_CAPACITY;
        self.len -= 1;
        Some(byte)
    }

    fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Escape-aware key decoder.
///
/// ```
/// use tgfx_core::byte_source::SliceSource;
/// use tgfx_core::key::Key;
/// use tgfx_core::key_decoder::{KeyDecoder, ReadMode};
///
/// let mut decoder = KeyDecoder::new();
/// let mut input = SliceSource::from(&b"\x1b[Aq"[..]);
/// assert_eq!(decoder.next_key(&mut input, ReadMode::NonBlocking)?, Some(Key::Up));
/// assert_eq!(decoder.next_key(&mut input, ReadMode::NonBlocking)?, Some(Key::Char(b'q')));
/// assert_eq!(decoder.next_key(&mut input, ReadMode::NonBlocking)?, None);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyDecoder {
    state: DecoderState,
    queue: ByteQueue,
}

impl KeyDecoder {
    /// Create a decoder in the `Normal` state with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Number of bytes held back while matching or draining a sequence.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Decode the next key, pulling bytes from `source` as needed.
    ///
    /// Returns `Ok(None)` when the source runs dry before a key is
    /// complete; partially matched bytes stay queued for the next call.
    ///
    /// # Errors
    ///
    /// Propagates read errors from `source`. Decoder state is left as it
    /// was before the failing read.
    pub fn next_key<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
        mode: ReadMode,
    ) -> io::Result<Option<Key>> {
        loop {
            if self.state == DecoderState::Draining
                && let Some(key) = self.drain_one()
            {
                return Ok(Some(key));
            }

            let Some(byte) = source.read_byte(mode)? else {
                return Ok(None);
            };

            if let Some(key) = self.advance(byte) {
                return Ok(Some(key));
            }
        }
    }

    /// Process one byte; returns a key when one completes.
    /// Never called while `Draining`: `next_key` empties the queue first,
    /// and `drain_one` returns to `Normal` once it is empty.
    fn advance(&mut self, byte: u8) -> Option<Key> {
        debug_assert_ne!(self.state, DecoderState::Draining);
        match self.state {
            DecoderState::Normal | DecoderState::Draining => {
                if byte == ESCAPE {
                    self.queue.push(byte);
                    self.state = DecoderState::SawEscape;
                    None
                } else {
                    Some(Key::Char(byte))
                }
            }
            DecoderState::SawEscape => {
                self.queue.push(byte);
                self.state = if byte == b'[' {
                    DecoderState::SawEscapeBracket
                } else {
                    self.start_drain()
                };
                None
            }
            DecoderState::SawEscapeBracket => {
                let key = match byte {
                    b'A' => Key::Up,
                    b'B' => Key::Down,
                    b'C' => Key::Right,
                    b'D' => Key::Left,
                    _ => {
                        self.queue.push(byte);
                        self.state = self.start_drain();
                        return None;
                    }
                };
                self.queue.clear();
                self.state = DecoderState::Normal;
                Some(key)
            }
        }
    }

    fn start_drain(&self) -> DecoderState {
        #[cfg(feature = "tracing")]
        tracing::trace!(pending = self.queue.len(), "unrecognized escape sequence, draining");
        DecoderState::Draining
    }

    /// Pop one queued byte; leaves `Draining` when the queue empties.
    fn drain_one(&mut self) -> Option<Key> {
        let byte = self.queue.pop();
        if self.queue.is_empty() {
            self.state = DecoderState::Normal;
        }
        byte.map(Key::Char)
    }
}
