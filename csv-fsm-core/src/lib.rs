/*!
`csv-fsm-core` is the grammar behind `csv-fsm`: a character-level finite state
machine for reading CSV, and the quoting rules for writing it.

Nothing in this crate allocates or performs I/O. A tokenizer is built by
feeding characters to [`Grammar::step`](struct.Grammar.html#method.step) and
carrying out the [`Action`](enum.Action.html) of each
[`Transition`](struct.Transition.html) it returns. A writer asks an
[`Escaper`](struct.Escaper.html) whether a field needs quotes and streams the
characters of [`Escaper::escape`](struct.Escaper.html#method.escape).

# Example

This drives the state machine by hand over a single record.

```
use csv_fsm_core::{Action, Grammar, Input, State};

let grammar = Grammar::new();
let mut state = State::Start;
let mut fields = 0;
let mut chars = "a,\"b,c\"".chars();
while state != State::EndOfDocument {
    let input = chars.next().map_or(Input::End, Input::Char);
    let trans = grammar.step(state, input).unwrap();
    match trans.action {
        Action::SaveField | Action::SaveRecord => fields += 1,
        _ => {}
    }
    state = trans.next;
}
assert_eq!(fields, 2);
```
*/

#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

pub use crate::reader::{
    Action, Class, Grammar, Input, State, Stuck, Transition,
};
pub use crate::writer::{
    Escape, Escaper, DEFAULT_QUOTE_LIMIT, RECORD_TERMINATOR,
};

mod reader;
mod writer;
