/*!
The `csv-fsm` crate reads and writes CSV one character at a time.

Reading is done by an explicit finite state machine (see the
[`csv-fsm-core`](../csv_fsm_core/index.html) crate) that understands quoted
fields spanning several lines, doubled quotes, and `\n`, `\r` or `\r\n` line
breaks. A [`Reader`](struct.Reader.html) can hand out a single field, a single
record or the rest of the document, and the three may be freely interleaved.

Writing is done by a [`Writer`](struct.Writer.html) that quotes a field only
when it has to (or always, if asked), so that reading its output gives back
exactly the records that were written.

Readers pull characters from a [`CharSource`](trait.CharSource.html) and
writers push them into a [`CharSink`](trait.CharSink.html). Strings and
`std::io` readers and writers are supported out of the box.

# Example

```
use csv_fsm::{Reader, Writer};

# fn example() -> csv_fsm::Result<()> {
let mut rdr = Reader::from_text("city,pop\n\"Boston, MA\",4628910\n");
let doc = rdr.read_all()?.unwrap_or_default();
assert_eq!(doc.len(), 2);
assert_eq!(doc[1], vec!["Boston, MA", "4628910"]);

let mut wtr = Writer::from_memory();
wtr.write_document(&doc)?;
assert_eq!(wtr.as_str(), "city,pop\r\n\"Boston, MA\",4628910");
# Ok(())
# }
# example().unwrap();
```

# Logging

This crate emits [`tracing`](https://docs.rs/tracing) events: a `trace`
event whenever a record is completed or the writer flushes, and a `debug`
event when the tokenizer hits input it cannot parse. No subscriber is
installed.
*/

#![deny(missing_docs)]

pub use csv_fsm_core::{
    Escaper, Grammar, Input, State, Stuck, DEFAULT_QUOTE_LIMIT,
    RECORD_TERMINATOR,
};

pub use crate::error::{Error, Result};
pub use crate::reader::{Reader, ReaderBuilder, RecordsIter};
pub use crate::record::{Document, Record, RecordIter};
pub use crate::sink::{CharSink, IoSink};
pub use crate::source::{CharSource, IoSource};
pub use crate::writer::{Writer, WriterBuilder};

mod error;
mod reader;
mod record;
#[cfg(feature = "serde")]
mod serializer;
mod sink;
mod source;
#[cfg(test)]
mod tests;
mod writer;
