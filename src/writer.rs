use std::io;

use csv_fsm_core::{Escaper, RECORD_TERMINATOR};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::Result;
#[cfg(feature = "serde")]
use crate::serializer::serialize;
use crate::sink::{CharSink, IoSink};

/// Builds a CSV writer with various configuration knobs.
///
/// # Example
///
/// ```
/// use csv_fsm::WriterBuilder;
///
/// let mut wtr = WriterBuilder::new()
///     .separator(';')
///     .quote_limit(-1)
///     .from_memory();
/// wtr.write_record(&["a", "b;c"]).unwrap();
/// assert_eq!(wtr.as_str(), "\"a\";\"b;c\"");
/// ```
#[derive(Debug, Default)]
pub struct WriterBuilder {
    escaper: Escaper,
}

impl WriterBuilder {
    /// Create a new builder with `,` as the separator, `"` as the quote and a
    /// quote limit of `1000`.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// The field separator to use when writing CSV.
    ///
    /// The default is `','`.
    pub fn separator(&mut self, separator: char) -> &mut WriterBuilder {
        self.escaper.set_separator(separator);
        self
    }

    /// The quote character to use when writing CSV.
    ///
    /// The default is `'"'`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.escaper.set_quote(quote);
        self
    }

    /// Fields longer than this many characters are always quoted.
    ///
    /// A negative limit puts quotes around every field, including empty ones.
    /// The default is `1000`.
    pub fn quote_limit(&mut self, quote_limit: i64) -> &mut WriterBuilder {
        self.escaper.set_quote_limit(quote_limit);
        self
    }

    /// Build a CSV writer from this configuration that writes to `sink`.
    pub fn from_sink<W: CharSink>(&self, sink: W) -> Writer<W> {
        Writer::new(self, sink)
    }

    /// Build a CSV writer from this configuration that writes UTF-8 to
    /// `wtr`.
    ///
    /// The writer is buffered for you automatically.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> Writer<IoSink<W>> {
        Writer::new(self, IoSink::new(wtr))
    }

    /// Build a CSV writer from this configuration that writes to a `String`.
    pub fn from_memory(&self) -> Writer<String> {
        Writer::new(self, String::new())
    }
}

/// A CSV writer.
///
/// Fields are quoted only when they need it: when they contain the
/// separator, the quote, `\n` or `\r`, or when they are longer than the quote
/// limit. Quotes inside a quoted field are doubled. Records are separated by
/// `\r\n`, and no terminator follows the last record.
///
/// A record with a single empty field is written as `""`, so that it is not
/// lost when the output is read back.
///
/// `write_field`, `write_record`, `write_document` and `serialize` each flush
/// the sink exactly once, however many nested writes they make.
///
/// # Example
///
/// ```
/// use csv_fsm::Writer;
///
/// let mut wtr = Writer::from_memory();
/// wtr.write_record(&["name", "quote"]).unwrap();
/// wtr.write_record(&["Jo", "say \"hi\""]).unwrap();
/// assert_eq!(wtr.as_str(), "name,quote\r\nJo,\"say \"\"hi\"\"\"");
/// ```
#[derive(Debug)]
pub struct Writer<W> {
    sink: W,
    escaper: Escaper,
    /// Fields written in the current record.
    fields: usize,
    /// Records started so far.
    records: u64,
    last_empty: bool,
    /// Public write calls in progress. Only the outermost one flushes.
    depth: usize,
}

impl Writer<String> {
    /// Create a new CSV writer with a default configuration that writes to a
    /// `String`.
    pub fn from_memory() -> Writer<String> {
        WriterBuilder::new().from_memory()
    }

    /// The CSV written so far.
    pub fn as_str(&self) -> &str {
        &self.sink
    }
}

impl<W: io::Write> Writer<IoSink<W>> {
    /// Create a new CSV writer with a default configuration that writes UTF-8
    /// to `wtr`.
    pub fn from_writer(wtr: W) -> Writer<IoSink<W>> {
        WriterBuilder::new().from_writer(wtr)
    }
}

impl<W: CharSink> Writer<W> {
    fn new(builder: &WriterBuilder, sink: W) -> Writer<W> {
        Writer {
            sink,
            escaper: builder.escaper,
            fields: 0,
            records: 0,
            last_empty: false,
            depth: 0,
        }
    }

    /// Create a new CSV writer with a default configuration that writes to
    /// any character sink.
    pub fn from_sink(sink: W) -> Writer<W> {
        WriterBuilder::new().from_sink(sink)
    }

    /// Write a single field to the current record.
    ///
    /// A separator is written first unless this is the first field of the
    /// record. If no record has been started yet, this starts the first one.
    pub fn write_field<T: AsRef<str>>(&mut self, field: T) -> Result<()> {
        self.outermost(|wtr| wtr.write_field_unflushed(field.as_ref()))
    }

    /// Write a single record.
    ///
    /// A record terminator is written first unless this is the first record.
    ///
    /// # Example
    ///
    /// ```
    /// use csv_fsm::Writer;
    ///
    /// let mut wtr = Writer::from_memory();
    /// wtr.write_record(vec!["a", "b"]).unwrap();
    /// wtr.write_record(&[""]).unwrap();
    /// wtr.write_record(&["c"]).unwrap();
    /// assert_eq!(wtr.as_str(), "a,b\r\n\"\"\r\nc");
    /// ```
    pub fn write_record<I, T>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.outermost(|wtr| {
            wtr.start_record()?;
            for field in record {
                wtr.write_field(field)?;
            }
            wtr.end_record()
        })
    }

    /// Write every record of a document.
    pub fn write_document<I, R, T>(&mut self, document: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.outermost(|wtr| {
            for record in document {
                wtr.write_record(record)?;
            }
            Ok(())
        })
    }

    /// Write a single record by serializing any flat `Serialize` value.
    ///
    /// Sequences, tuples and structs map to one field per element, in order.
    /// Scalars map to a single field. `None` and `()` map to an empty field,
    /// unit enum variants to their name, and newtype variants to their value.
    /// Maps are rejected with `Error::Serialize`, and so are tuple and struct
    /// enum variants.
    ///
    /// # Example
    ///
    /// ```
    /// use csv_fsm::Writer;
    ///
    /// let mut wtr = Writer::from_memory();
    /// wtr.serialize(("x", 1, Some(2.5), None::<u8>)).unwrap();
    /// assert_eq!(wtr.as_str(), "x,1,2.5,");
    /// ```
    #[cfg(feature = "serde")]
    pub fn serialize<S: Serialize>(&mut self, record: S) -> Result<()> {
        self.outermost(|wtr| {
            wtr.start_record()?;
            serialize(wtr, &record)?;
            wtr.end_record()
        })
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// The field separator.
    pub fn separator(&self) -> char {
        self.escaper.separator()
    }

    /// Set the field separator for subsequent writes.
    pub fn set_separator(&mut self, separator: char) {
        self.escaper.set_separator(separator);
    }

    /// The quote character.
    pub fn quote(&self) -> char {
        self.escaper.quote()
    }

    /// Set the quote character for subsequent writes.
    pub fn set_quote(&mut self, quote: char) {
        self.escaper.set_quote(quote);
    }

    /// The length, in characters, beyond which a field is always quoted.
    pub fn quote_limit(&self) -> i64 {
        self.escaper.quote_limit()
    }

    /// Set the quote limit for subsequent writes. A negative limit quotes
    /// every field.
    pub fn set_quote_limit(&mut self, quote_limit: i64) {
        self.escaper.set_quote_limit(quote_limit);
    }

    /// Gets a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Unwraps this writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    // Runs `write`, then flushes if no other public write is in progress.
    fn outermost<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut Writer<W>) -> Result<()>,
    {
        self.depth += 1;
        let res = write(self);
        self.depth -= 1;
        res?;
        if self.depth == 0 {
            self.sink.flush()?;
            tracing::trace!(records = self.records, "flushed sink");
        }
        Ok(())
    }

    fn start_record(&mut self) -> Result<()> {
        if self.records > 0 {
            self.sink.write_str(RECORD_TERMINATOR)?;
        }
        self.records += 1;
        self.fields = 0;
        self.last_empty = false;
        Ok(())
    }

    fn end_record(&mut self) -> Result<()> {
        if self.fields == 1 && self.last_empty && !self.escaper.is_forced() {
            let quote = self.escaper.quote();
            self.sink.write_char(quote)?;
            self.sink.write_char(quote)?;
        }
        Ok(())
    }

    fn write_field_unflushed(&mut self, field: &str) -> Result<()> {
        if self.records == 0 {
            self.records = 1;
        }
        if self.fields > 0 {
            self.sink.write_char(self.escaper.separator())?;
        }
        for c in self.escaper.escape(field) {
            self.sink.write_char(c)?;
        }
        self.fields += 1;
        self.last_empty = field.is_empty();
        Ok(())
    }
}
