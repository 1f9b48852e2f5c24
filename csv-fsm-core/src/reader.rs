use core::fmt;

/// A state of the CSV tokenizer.
///
/// States are ordered by how far a read has progressed. In particular,
/// `EndOfField < EndOfRecord < EndOfDocument`, which lets a driver loop run
/// "until the state is at least X" for each read granularity.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum State {
    /// At the beginning of a field. Nothing of it has been read yet.
    Start = 0,
    /// Inside an unquoted field.
    Field = 1,
    /// Inside a quoted field.
    Quoted = 2,
    /// A quote was seen inside a quoted field. It either closes the field or
    /// is the first half of a doubled quote.
    QuoteInQuoted = 3,
    /// Skipping whitespace between a field and its separator.
    ///
    /// No transition leads here yet. Its rules exist so that trimming can be
    /// wired in without touching the rest of the table.
    SkipTrailingSpace = 4,
    /// A field was just completed.
    EndOfField = 5,
    /// A record was just completed.
    EndOfRecord = 6,
    /// The input is exhausted. This state is terminal.
    EndOfDocument = 7,
}

impl State {
    /// A short, stable name for this state.
    pub fn name(&self) -> &'static str {
        match *self {
            State::Start => "Start",
            State::Field => "Field",
            State::Quoted => "Quoted",
            State::QuoteInQuoted => "QuoteInQuoted",
            State::SkipTrailingSpace => "SkipTrailingSpace",
            State::EndOfField => "EndOfField",
            State::EndOfRecord => "EndOfRecord",
            State::EndOfDocument => "EndOfDocument",
        }
    }

    /// Returns the state reached by an epsilon transition, if this state has
    /// one.
    ///
    /// `EndOfField` and `EndOfRecord` fall back to `Start` without consuming
    /// anything.
    pub fn epsilon(&self) -> Option<State> {
        match *self {
            State::EndOfField | State::EndOfRecord => Some(State::Start),
            _ => None,
        }
    }
}

impl Default for State {
    fn default() -> State {
        State::Start
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single unit of input to the state machine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Input {
    /// A character read from the source.
    Char(char),
    /// The source is exhausted.
    End,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Input::Char(c) => write!(f, "{:?}", c),
            Input::End => f.write_str("end of input"),
        }
    }
}

/// A class of input that a rule can match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// The configured field separator.
    Separator,
    /// The configured quote character.
    Quote,
    /// `\n` or `\r`. When `\r` is followed by `\n`, the driver consumes the
    /// `\n` as part of the same match.
    LineBreak,
    /// Whitespace other than a line break.
    Whitespace,
    /// End of input.
    End,
    /// Any character (but not end of input).
    Any,
}

/// What a driver must do when it takes a transition.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    /// Nothing.
    Nothing,
    /// Append the matched character to the pending field.
    Append,
    /// Append the matched line break to the pending field verbatim. A `\r\n`
    /// pair is appended as both characters.
    AppendLineBreak,
    /// Complete the pending field and add it to the current record.
    SaveField,
    /// Complete the pending field, then complete the current record.
    SaveRecord,
}

/// One row of the transition table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Transition {
    /// The class of input this row matches.
    pub class: Class,
    /// The action to carry out.
    pub action: Action,
    /// The state to move to.
    pub next: State,
}

impl Transition {
    /// Whether this transition matched a line break, in which case a `\r`
    /// may need to be paired with a following `\n`.
    pub fn is_line_break(&self) -> bool {
        self.class == Class::LineBreak
    }
}

const fn rule(class: Class, action: Action, next: State) -> Transition {
    Transition { class, action, next }
}

const START: &[Transition] = &[
    rule(Class::Separator, Action::SaveField, State::EndOfField),
    rule(Class::Quote, Action::Nothing, State::Quoted),
    rule(Class::LineBreak, Action::SaveRecord, State::EndOfRecord),
    rule(Class::End, Action::SaveRecord, State::EndOfDocument),
    rule(Class::Any, Action::Append, State::Field),
];

const FIELD: &[Transition] = &[
    rule(Class::Separator, Action::SaveField, State::EndOfField),
    rule(Class::LineBreak, Action::SaveRecord, State::EndOfRecord),
    rule(Class::End, Action::SaveRecord, State::EndOfDocument),
    rule(Class::Any, Action::Append, State::Field),
];

const QUOTED: &[Transition] = &[
    rule(Class::Quote, Action::Nothing, State::QuoteInQuoted),
    rule(Class::End, Action::SaveRecord, State::EndOfDocument),
    rule(Class::LineBreak, Action::AppendLineBreak, State::Quoted),
    rule(Class::Any, Action::Append, State::Quoted),
];

// A quote right after a quote is the doubled-quote escape. Anything that is
// not a quote or a field/record boundary has no rule.
const QUOTE_IN_QUOTED: &[Transition] = &[
    rule(Class::Quote, Action::Append, State::Quoted),
    rule(Class::End, Action::SaveRecord, State::EndOfDocument),
    rule(Class::Separator, Action::SaveField, State::EndOfField),
    rule(Class::LineBreak, Action::SaveRecord, State::EndOfRecord),
];

const SKIP_TRAILING_SPACE: &[Transition] = &[
    rule(Class::End, Action::SaveRecord, State::EndOfDocument),
    rule(Class::Separator, Action::SaveField, State::EndOfField),
    rule(Class::LineBreak, Action::SaveRecord, State::EndOfRecord),
    rule(Class::Whitespace, Action::Nothing, State::SkipTrailingSpace),
];

/// The error returned when no rule matches the current state and input.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Stuck {
    /// The state the machine was in, after epsilon transitions.
    pub state: State,
    /// The input that no rule matched.
    pub input: Input,
}

impl fmt::Display for Stuck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unexpected {} in state {}", self.input, self.state)
    }
}

/// The CSV grammar: a separator, a quote and the transition table.
///
/// A `Grammar` holds no parsing state. It maps a `(State, Input)` pair to the
/// transition to take, so the same grammar can drive any number of readers.
/// The separator and quote may be changed at any time, and the change applies
/// to the next call to `step`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Grammar {
    separator: char,
    quote: char,
}

impl Default for Grammar {
    fn default() -> Grammar {
        Grammar { separator: ',', quote: '"' }
    }
}

impl Grammar {
    /// Create a grammar with `,` as the separator and `"` as the quote.
    pub fn new() -> Grammar {
        Grammar::default()
    }

    /// The field separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Set the field separator.
    pub fn set_separator(&mut self, separator: char) {
        self.separator = separator;
    }

    /// The quote character.
    pub fn quote(&self) -> char {
        self.quote
    }

    /// Set the quote character.
    pub fn set_quote(&mut self, quote: char) {
        self.quote = quote;
    }

    /// The rules of `state`, in priority order.
    ///
    /// States with only an epsilon transition, and the terminal state, have
    /// no rules.
    pub fn rules(state: State) -> &'static [Transition] {
        match state {
            State::Start => START,
            State::Field => FIELD,
            State::Quoted => QUOTED,
            State::QuoteInQuoted => QUOTE_IN_QUOTED,
            State::SkipTrailingSpace => SKIP_TRAILING_SPACE,
            State::EndOfField | State::EndOfRecord | State::EndOfDocument => {
                &[]
            }
        }
    }

    /// Whether `input` belongs to `class` under this grammar.
    pub fn matches(&self, class: Class, input: Input) -> bool {
        let c = match input {
            Input::End => return class == Class::End,
            Input::Char(c) => c,
        };
        match class {
            Class::Separator => c == self.separator,
            Class::Quote => c == self.quote,
            Class::LineBreak => c == '\n' || c == '\r',
            Class::Whitespace => c.is_whitespace(),
            Class::End => false,
            Class::Any => true,
        }
    }

    /// Find the transition for `input` in `state`.
    ///
    /// Epsilon transitions are followed first, and `input` is matched against
    /// the state they lead to. The first rule whose class matches wins.
    ///
    /// If no rule matches, the error names the state (after epsilon
    /// transitions) and the input.
    pub fn step(
        &self,
        state: State,
        input: Input,
    ) -> Result<Transition, Stuck> {
        let mut state = state;
        while let Some(next) = state.epsilon() {
            state = next;
        }
        Grammar::rules(state)
            .iter()
            .find(|rule| self.matches(rule.class, input))
            .copied()
            .ok_or(Stuck { state, input })
    }
}
