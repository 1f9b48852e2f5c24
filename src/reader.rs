use std::collections::VecDeque;
use std::io;
use std::mem;
use std::str;

use csv_fsm_core::{Action, Grammar, Input, State, Transition};

use crate::error::{new_parse_error, Result};
use crate::record::{Document, Record};
use crate::source::{CharSource, IoSource};

/// Builds a CSV reader with various configuration knobs.
///
/// The separator and quote can also be changed on a `Reader` after it has
/// been built.
///
/// # Example
///
/// ```
/// use csv_fsm::ReaderBuilder;
///
/// let mut rdr = ReaderBuilder::new().separator(';').from_text("a;b\nc;d");
/// let doc = rdr.read_all().unwrap().unwrap();
/// assert_eq!(doc[0], vec!["a", "b"]);
/// assert_eq!(doc[1], vec!["c", "d"]);
/// ```
#[derive(Debug, Default)]
pub struct ReaderBuilder {
    grammar: Grammar,
}

impl ReaderBuilder {
    /// Create a new builder with `,` as the separator and `"` as the quote.
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// The field separator to use when parsing CSV.
    ///
    /// The default is `','`.
    pub fn separator(&mut self, separator: char) -> &mut ReaderBuilder {
        self.grammar.set_separator(separator);
        self
    }

    /// The quote character to use when parsing CSV.
    ///
    /// The default is `'"'`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.grammar.set_quote(quote);
        self
    }

    /// Build a CSV reader from this configuration that reads from `src`.
    pub fn from_source<S: CharSource>(&self, src: S) -> Reader<S> {
        Reader::new(self, src)
    }

    /// Build a CSV reader from this configuration that reads from a string.
    pub fn from_text<'a>(&self, text: &'a str) -> Reader<str::Chars<'a>> {
        Reader::new(self, text.chars())
    }

    /// Build a CSV reader from this configuration that reads UTF-8 from
    /// `rdr`.
    ///
    /// The reader is buffered for you automatically.
    pub fn from_reader<R: io::Read>(&self, rdr: R) -> Reader<IoSource<R>> {
        Reader::new(self, IoSource::new(rdr))
    }
}

/// A CSV reader.
///
/// The reader runs the state machine of [`Grammar`](struct.Grammar.html)
/// over a character source
/// and offers three granularities of read:
///
/// * `read_field` returns one field of the current record.
/// * `read_record` returns one record.
/// * `read_all` returns every remaining record.
///
/// These may be interleaved. Each call picks up exactly where the previous
/// one stopped, and nothing is handed out twice.
///
/// When the input runs out, every read returns `Ok(None)`. An empty input is
/// still one record with one empty field, and so is every empty line. An
/// empty line after the final line break does not count as a record.
///
/// # Example
///
/// ```
/// use csv_fsm::Reader;
///
/// let mut rdr = Reader::from_text("a,\"b\nc\"\r\nx,y\n");
/// assert_eq!(rdr.read_field().unwrap(), Some("a".to_string()));
/// assert_eq!(rdr.read_record().unwrap().unwrap(), vec!["b\nc"]);
/// assert_eq!(rdr.read_all().unwrap().unwrap(), vec![vec!["x", "y"]]);
/// assert_eq!(rdr.read_all().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct Reader<S> {
    src: S,
    grammar: Grammar,
    state: State,
    /// A character read from the source but not yet consumed. Only used to
    /// pair `\r` with a following `\n`.
    lookahead: Option<char>,
    eof: bool,
    /// The field being accumulated.
    field: String,
    /// Completed fields of the record in progress that have not been handed
    /// out by `read_field`.
    fields: Vec<String>,
    /// The number of fields saved in the record in progress, including those
    /// already handed out.
    record_len: usize,
    /// Completed records that have not been handed out.
    records: VecDeque<Record>,
    /// The number of records completed so far.
    nrecords: u64,
    line: u64,
}

impl<'a> Reader<str::Chars<'a>> {
    /// Create a new CSV reader with a default configuration that reads from
    /// a string.
    pub fn from_text(text: &'a str) -> Reader<str::Chars<'a>> {
        ReaderBuilder::new().from_text(text)
    }
}

impl<R: io::Read> Reader<IoSource<R>> {
    /// Create a new CSV reader with a default configuration that reads UTF-8
    /// from `rdr`.
    pub fn from_reader(rdr: R) -> Reader<IoSource<R>> {
        ReaderBuilder::new().from_reader(rdr)
    }
}

impl<S: CharSource> Reader<S> {
    fn new(builder: &ReaderBuilder, src: S) -> Reader<S> {
        Reader {
            src,
            grammar: builder.grammar,
            state: State::Start,
            lookahead: None,
            eof: false,
            field: String::new(),
            fields: vec![],
            record_len: 0,
            records: VecDeque::new(),
            nrecords: 0,
            line: 1,
        }
    }

    /// Create a new CSV reader with a default configuration that reads from
    /// any character source.
    pub fn from_source(src: S) -> Reader<S> {
        ReaderBuilder::new().from_source(src)
    }

    /// Read the next field of the current record.
    ///
    /// Returns `Ok(None)` if the end of the current record was already
    /// reached before this call. Calling `read_field` again then continues
    /// with the first field of the next record. At the end of the document,
    /// `Ok(None)` is returned forever.
    ///
    /// # Example
    ///
    /// ```
    /// use csv_fsm::Reader;
    ///
    /// let mut rdr = Reader::from_text("a,b\nc");
    /// let mut fields = vec![];
    /// while let Some(field) = rdr.read_field().unwrap() {
    ///     fields.push(field);
    /// }
    /// assert_eq!(fields, vec!["a", "b"]);
    /// assert_eq!(rdr.read_field().unwrap(), Some("c".to_string()));
    /// assert_eq!(rdr.read_field().unwrap(), None);
    /// ```
    pub fn read_field(&mut self) -> Result<Option<String>> {
        if self.state >= State::EndOfRecord {
            if self.state == State::EndOfRecord {
                self.state = State::Start;
            }
            return Ok(None);
        }
        self.advance_until(State::EndOfField)?;
        if let Some(rec) = self.records.front_mut() {
            let field = rec.remove_first();
            if rec.is_empty() {
                self.records.pop_front();
            }
            return Ok(field);
        }
        if self.fields.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.fields.remove(0)))
        }
    }

    /// Read the next record.
    ///
    /// If `read_field` already handed out some fields of the current record,
    /// only its remaining fields are returned.
    ///
    /// Returns `Ok(None)` at the end of the document.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        if self.records.is_empty() {
            self.advance_until(State::EndOfRecord)?;
        }
        let rec = self.records.pop_front();
        if rec.is_some() && self.state == State::EndOfRecord {
            self.state = State::Start;
        }
        Ok(rec)
    }

    /// Read every remaining record.
    ///
    /// Returns `Ok(None)` if the end of the document was already reached and
    /// nothing is left to hand out.
    pub fn read_all(&mut self) -> Result<Option<Document>> {
        self.advance_until(State::EndOfDocument)?;
        if self.records.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.records.drain(..).collect()))
    }

    /// Returns an iterator over the remaining records.
    ///
    /// The iterator stops after the last record, or after yielding the first
    /// error.
    pub fn records(&mut self) -> RecordsIter<S> {
        RecordsIter { rdr: self, done: false }
    }

    /// The field separator.
    pub fn separator(&self) -> char {
        self.grammar.separator()
    }

    /// Set the field separator. It applies to the next character read.
    pub fn set_separator(&mut self, separator: char) {
        self.grammar.set_separator(separator);
    }

    /// The quote character.
    pub fn quote(&self) -> char {
        self.grammar.quote()
    }

    /// Set the quote character. It applies to the next character read.
    pub fn set_quote(&mut self, quote: char) {
        self.grammar.set_quote(quote);
    }

    /// The current state of the tokenizer.
    pub fn state(&self) -> State {
        self.state
    }

    /// The current line number, starting at `1`.
    ///
    /// Every line break counts, including those inside quoted fields. A
    /// `\r\n` pair counts once.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns true once the whole input has been tokenized and every record
    /// has been handed out.
    pub fn is_done(&self) -> bool {
        self.state == State::EndOfDocument
            && self.records.is_empty()
            && self.fields.is_empty()
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.src
    }

    /// Gets a mutable reference to the underlying source.
    ///
    /// Reading from it directly skips characters the tokenizer has not seen.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.src
    }

    /// Unwraps this reader, returning the underlying source.
    ///
    /// Any buffered fields or records are lost.
    pub fn into_inner(self) -> S {
        self.src
    }

    /// Step the state machine until its state is at least `target`, or the
    /// document ends.
    ///
    /// At least one character (or end of input) is consumed unless the
    /// document has already ended.
    fn advance_until(&mut self, target: State) -> Result<()> {
        while self.state != State::EndOfDocument {
            let input = self.read_char()?.map_or(Input::End, Input::Char);
            let trans = match self.grammar.step(self.state, input) {
                Ok(trans) => trans,
                Err(stuck) => {
                    tracing::debug!(
                        state = stuck.state.name(),
                        line = self.line,
                        "no transition for input"
                    );
                    return Err(new_parse_error(stuck, self.line));
                }
            };
            self.apply(trans, input)?;
            self.state = trans.next;
            if self.state >= target {
                break;
            }
        }
        Ok(())
    }

    fn apply(&mut self, trans: Transition, input: Input) -> Result<()> {
        let mut crlf = false;
        if trans.is_line_break() {
            crlf = input == Input::Char('\r')
                && self.peek_char()? == Some('\n');
            if crlf {
                self.lookahead = None;
            }
            self.line += 1;
        }
        match trans.action {
            Action::Nothing => {}
            Action::Append => {
                if let Input::Char(c) = input {
                    self.field.push(c);
                }
            }
            Action::AppendLineBreak => {
                if let Input::Char(c) = input {
                    self.field.push(c);
                }
                if crlf {
                    self.field.push('\n');
                }
            }
            Action::SaveField => self.save_field(),
            Action::SaveRecord => {
                // End of input straight after a line break is an empty final
                // line, not a record. Empty input is still one record.
                let trailing = self.state.epsilon().unwrap_or(self.state)
                    == State::Start
                    && input == Input::End
                    && self.record_len == 0
                    && self.nrecords > 0;
                if !trailing {
                    self.save_record();
                }
            }
        }
        Ok(())
    }

    fn save_field(&mut self) {
        let field = mem::replace(&mut self.field, String::new());
        self.fields.push(field);
        self.record_len += 1;
    }

    fn save_record(&mut self) {
        self.save_field();
        let fields = mem::replace(&mut self.fields, vec![]);
        self.records.push_back(Record::from(fields));
        self.record_len = 0;
        self.nrecords += 1;
        tracing::trace!(
            record = self.nrecords,
            line = self.line,
            "record completed"
        );
    }

    fn read_char(&mut self) -> Result<Option<char>> {
        if let Some(c) = self.lookahead.take() {
            return Ok(Some(c));
        }
        if self.eof {
            return Ok(None);
        }
        let c = self.src.read_char()?;
        if c.is_none() {
            self.eof = true;
        }
        Ok(c)
    }

    fn peek_char(&mut self) -> Result<Option<char>> {
        if self.lookahead.is_none() && !self.eof {
            self.lookahead = self.src.read_char()?;
            if self.lookahead.is_none() {
                self.eof = true;
            }
        }
        Ok(self.lookahead)
    }
}

/// An iterator over the remaining records of a reader.
///
/// Created by [`Reader::records`](struct.Reader.html#method.records).
#[derive(Debug)]
pub struct RecordsIter<'r, S> {
    rdr: &'r mut Reader<S>,
    done: bool,
}

impl<'r, S> RecordsIter<'r, S> {
    /// Return a reference to the underlying reader.
    pub fn reader(&self) -> &Reader<S> {
        &self.rdr
    }
}

impl<'r, S: CharSource> Iterator for RecordsIter<'r, S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        if self.done {
            return None;
        }
        match self.rdr.read_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
