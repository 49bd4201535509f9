#![forbid(unsafe_code)]

//! Concrete [`ByteSource`]s: the controlling terminal and an in-memory queue.

use std::collections::VecDeque;
use std::io;

use crate::key_decoder::{ByteSource, ReadMode};

/// In-memory byte queue.
///
/// Used by headless consoles and tests. A blocking read on an empty
/// queue fails with [`io::ErrorKind::UnexpectedEof`] since nothing could
/// ever arrive.
#[derive(Debug, Clone, Default)]
pub struct SliceSource {
    bytes: VecDeque<u8>,
}

impl SliceSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes to the end of the queue.
    pub fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().copied());
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl From<&[u8]> for SliceSource {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().collect(),
        }
    }
}

impl ByteSource for SliceSource {
    fn read_byte(&mut self, mode: ReadMode) -> io::Result<Option<u8>> {
        match (self.bytes.pop_front(), mode) {
            (Some(byte), _) => Ok(Some(byte)),
            (None, ReadMode::NonBlocking) => Ok(None),
            (None, ReadMode::Blocking) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "blocking read on an exhausted in-memory source",
            )),
        }
    }
}

/// Byte reader on the controlling terminal (`/dev/tty`).
///
/// Readiness is checked with `poll(2)`: a zero timeout for
/// [`ReadMode::NonBlocking`], no timeout for [`ReadMode::Blocking`]. The
/// descriptor itself is never switched to `O_NONBLOCK`, so there is no
/// file status flag to restore afterwards.
#[cfg(unix)]
#[derive(Debug)]
pub struct TtySource {
    tty: std::fs::File,
}

#[cfg(unix)]
impl TtySource {
    /// Open the controlling terminal for reading.
    ///
    /// # Errors
    ///
    /// Fails when the process has no controlling terminal.
    pub fn open() -> io::Result<Self> {
        Ok(Self {
            tty: std::fs::File::open("/dev/tty")?,
        })
    }

    /// Read from an already-open file (pipes and sockets work too).
    #[must_use]
    pub fn from_file(tty: std::fs::File) -> Self {
        Self { tty }
    }

    fn wait_readable(&self, mode: ReadMode) -> io::Result<bool> {
        use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
        use std::os::fd::AsFd;

        let timeout = match mode {
            ReadMode::NonBlocking => PollTimeout::ZERO,
            ReadMode::Blocking => PollTimeout::NONE,
        };
        let mut poll_fds = [PollFd::new(self.tty.as_fd(), PollFlags::POLLIN)];
        match poll(&mut poll_fds, timeout) {
            Ok(n) => Ok(n > 0),
            Err(nix::errno::Errno::EINTR) => Ok(false),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

#[cfg(unix)]
impl ByteSource for TtySource {
    fn read_byte(&mut self, mode: ReadMode) -> io::Result<Option<u8>> {
        use std::io::Read;

        if !self.wait_readable(mode)? {
            return Ok(None);
        }

        let mut buf = [0u8; 1];
        match self.tty.read(&mut buf) {
            Ok(0) if mode == ReadMode::Blocking => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "terminal input closed",
            )),
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(ref e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_yields_in_order() {
        let mut src = SliceSource::from(&b"xy"[..]);
        assert_eq!(src.read_byte(ReadMode::NonBlocking).unwrap(), Some(b'x'));
        assert_eq!(src.read_byte(ReadMode::Blocking).unwrap(), Some(b'y'));
        assert_eq!(src.read_byte(ReadMode::NonBlocking).unwrap(), None);
    }

    #[cfg(unix)]
    fn pipe_pair() -> (std::fs::File, std::os::unix::net::UnixStream) {
        use std::os::unix::net::UnixStream;
        let (a, b) = UnixStream::pair().unwrap();
        let reader: std::fs::File = std::os::fd::OwnedFd::from(a).into();
        (reader, b)
    }

    #[cfg(unix)]
    #[test]
    fn tty_source_polls_without_blocking() {
        let (reader, _writer) = pipe_pair();
        let mut src = TtySource::from_file(reader);
        assert_eq!(src.read_byte(ReadMode::NonBlocking).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn tty_source_reads_written_bytes() {
        use std::io::Write;
        let (reader, mut writer) = pipe_pair();
        let mut src = TtySource::from_file(reader);
        writer.write_all(b"\x1b[A").unwrap();
        assert_eq!(src.read_byte(ReadMode::Blocking).unwrap(), Some(0x1B));
        assert_eq!(src.read_byte(ReadMode::NonBlocking).unwrap(), Some(b'['));
        assert_eq!(src.read_byte(ReadMode::NonBlocking).unwrap(), Some(b'A'));
        assert_eq!(src.read_byte(ReadMode::NonBlocking).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn tty_source_reports_closed_input_when_blocking() {
        let (reader, writer) = pipe_pair();
        drop(writer);
        let mut src = TtySource::from_file(reader);
        let err = src.read_byte(ReadMode::Blocking).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
