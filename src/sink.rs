use std::io::{self, Write};

/// A sink of characters for a CSV [`Writer`](struct.Writer.html).
pub trait CharSink {
    /// Write a single character.
    fn write_char(&mut self, ch: char) -> io::Result<()>;

    /// Write every character of `s`.
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        for ch in s.chars() {
            self.write_char(ch)?;
        }
        Ok(())
    }

    /// Flush anything buffered to its final destination.
    fn flush(&mut self) -> io::Result<()>;
}

impl CharSink for String {
    fn write_char(&mut self, ch: char) -> io::Result<()> {
        self.push(ch);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a, S: CharSink + ?Sized> CharSink for &'a mut S {
    fn write_char(&mut self, ch: char) -> io::Result<()> {
        (**self).write_char(ch)
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        (**self).write_str(s)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// A character sink that writes UTF-8 to an `io::Write`.
///
/// Output is buffered, so there is no need to wrap the writer in a
/// `BufWriter`.
#[derive(Debug)]
pub struct IoSink<W: io::Write> {
    wtr: io::BufWriter<W>,
}

impl<W: io::Write> IoSink<W> {
    /// Create a new sink writing to `wtr`.
    pub fn new(wtr: W) -> IoSink<W> {
        IoSink { wtr: io::BufWriter::new(wtr) }
    }

    /// Gets a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.wtr.get_ref()
    }

    /// Flush the buffer and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.wtr.into_inner().map_err(|err| err.into_error())
    }
}

impl<W: io::Write> CharSink for IoSink<W> {
    fn write_char(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0; 4];
        self.wtr.write_all(ch.encode_utf8(&mut buf).as_bytes())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.wtr.write_all(s.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }
}
