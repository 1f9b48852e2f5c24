use std::error;
use std::fmt;
use std::io;
use std::result;

use csv_fsm_core::{Input, State, Stuck};

/// A type alias for `Result<T, csv_fsm::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when reading or writing CSV data.
///
/// Running out of input is not an error. The read methods on
/// [`Reader`](struct.Reader.html) return `Ok(None)` for that.
#[derive(Debug)]
pub enum Error {
    /// An I/O error from the underlying character source or sink.
    ///
    /// This includes invalid UTF-8 found by an
    /// [`IoSource`](struct.IoSource.html).
    Io(io::Error),
    /// The tokenizer found input that no rule of the grammar accepts.
    ///
    /// This is fatal. The reader is left in an unspecified position and
    /// should not be used for further reads.
    Parse {
        /// The state the tokenizer was in.
        state: State,
        /// The offending character, or `None` for end of input.
        found: Option<char>,
        /// The line on which the character was found, starting at `1`.
        line: u64,
    },
    /// A value given to `Writer::serialize` does not map to a flat record.
    Serialize(String),
}

/// Create a parse error from a failed step of the grammar.
pub fn new_parse_error(stuck: Stuck, line: u64) -> Error {
    let found = match stuck.input {
        Input::Char(c) => Some(c),
        Input::End => None,
    };
    Error::Parse { state: stuck.state, found, line }
}

impl Error {
    /// Returns true if this is a parse error.
    pub fn is_parse_error(&self) -> bool {
        match *self {
            Error::Parse { .. } => true,
            _ => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Parse { .. } => None,
            Error::Serialize(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Parse { state, found: Some(c), line } => write!(
                f,
                "CSV parse error: line {}: unexpected {:?} in state {}",
                line, c, state
            ),
            Error::Parse { state, found: None, line } => write!(
                f,
                "CSV parse error: line {}: unexpected end of input \
                 in state {}",
                line, state
            ),
            Error::Serialize(ref msg) => {
                write!(f, "CSV serialize error: {}", msg)
            }
        }
    }
}
