use std::io;
use std::str;

/// The size of the byte buffer used by `IoSource`.
const BUF_SIZE: usize = 1024 * 64;

/// The longest UTF-8 encoding of a single character.
const MAX_UTF8_LEN: usize = 4;

/// A source of characters for a CSV [`Reader`](struct.Reader.html).
///
/// A source only needs to hand out characters one at a time. The reader keeps
/// its own lookahead, so sources never need to support peeking or pushback.
pub trait CharSource {
    /// Read the next character, or `None` at end of input.
    ///
    /// Once `None` has been returned, the reader never calls this again.
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

impl<'a> CharSource for str::Chars<'a> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

impl<'a, S: CharSource + ?Sized> CharSource for &'a mut S {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        (**self).read_char()
    }
}

/// A character source that decodes UTF-8 from an `io::Read`.
///
/// Input is buffered, so there is no need to wrap the reader in a
/// `BufReader`. Invalid UTF-8 (including a truncated character at the end of
/// input) is reported as an `io::Error` of kind `InvalidData`.
#[derive(Debug)]
pub struct IoSource<R> {
    rdr: R,
    buf: Vec<u8>,
    pos: usize,
    len: usize,
    eof: bool,
    byte: u64,
}

impl<R: io::Read> IoSource<R> {
    /// Create a new source reading from `rdr`.
    pub fn new(rdr: R) -> IoSource<R> {
        IoSource::with_capacity(BUF_SIZE, rdr)
    }

    /// Create a new source with a buffer of at least `capacity` bytes.
    pub fn with_capacity(capacity: usize, rdr: R) -> IoSource<R> {
        IoSource {
            rdr,
            buf: vec![0; capacity.max(MAX_UTF8_LEN)],
            pos: 0,
            len: 0,
            eof: false,
            byte: 0,
        }
    }

    /// The number of bytes decoded so far.
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.rdr
    }

    /// Unwraps this source, returning the underlying reader.
    ///
    /// Any buffered but undecoded input is lost.
    pub fn into_inner(self) -> R {
        self.rdr
    }

    // Moves unread bytes to the front of the buffer and reads until at least
    // one whole character is available or the reader is exhausted.
    fn fill(&mut self) -> io::Result<()> {
        self.buf.copy_within(self.pos..self.len, 0);
        self.len -= self.pos;
        self.pos = 0;
        while self.len < MAX_UTF8_LEN && !self.eof {
            match self.rdr.read(&mut self.buf[self.len..]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.len += n,
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

impl<R: io::Read> CharSource for IoSource<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        if self.len - self.pos < MAX_UTF8_LEN && !self.eof {
            self.fill()?;
        }
        if self.pos == self.len {
            return Ok(None);
        }
        let (ch, size) = bstr::decode_utf8(&self.buf[self.pos..self.len]);
        match ch {
            Some(ch) => {
                self.pos += size;
                self.byte += size as u64;
                Ok(Some(ch))
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid UTF-8 at byte {}", self.byte),
            )),
        }
    }
}
