use core::str::Chars;

use memchr::{memchr, memchr3};

/// The default `quote_limit` of an [`Escaper`](struct.Escaper.html).
pub const DEFAULT_QUOTE_LIMIT: i64 = 1000;

/// The record separator written between records, on every platform.
pub const RECORD_TERMINATOR: &str = "\r\n";

/// Decides which fields need quotes and escapes them.
///
/// A field is quoted when it is longer than `quote_limit` characters, or when
/// it contains the separator, the quote, `\n` or `\r`. A negative
/// `quote_limit` quotes every field, including empty ones.
///
/// Long fields skip the scan entirely, which makes `quote_limit` a cheap way
/// to write large text without looking at every character first.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Escaper {
    separator: char,
    quote: char,
    quote_limit: i64,
}

impl Default for Escaper {
    fn default() -> Escaper {
        Escaper {
            separator: ',',
            quote: '"',
            quote_limit: DEFAULT_QUOTE_LIMIT,
        }
    }
}

impl Escaper {
    /// Create an escaper with `,` as the separator, `"` as the quote and the
    /// default quote limit.
    pub fn new() -> Escaper {
        Escaper::default()
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

    /// The length, in characters, beyond which a field is always quoted.
    pub fn quote_limit(&self) -> i64 {
        self.quote_limit
    }

    /// Set the quote limit. A negative limit quotes every field.
    pub fn set_quote_limit(&mut self, quote_limit: i64) {
        self.quote_limit = quote_limit;
    }

    /// Whether every field is quoted regardless of its contents.
    pub fn is_forced(&self) -> bool {
        self.quote_limit < 0
    }

    /// Whether `c` forces a field containing it to be quoted.
    pub fn is_escape_char(&self, c: char) -> bool {
        c == self.separator || c == self.quote || c == '\n' || c == '\r'
    }

    /// Whether `field` must be written inside quotes.
    pub fn needs_quotes(&self, field: &str) -> bool {
        if self.is_forced() {
            return true;
        }
        let limit = self.quote_limit as u64;
        // A field never has more characters than bytes.
        if field.len() as u64 > limit && field.chars().count() as u64 > limit
        {
            return true;
        }
        if self.separator.is_ascii() && self.quote.is_ascii() {
            let bytes = field.as_bytes();
            memchr3(self.separator as u8, self.quote as u8, b'\n', bytes)
                .is_some()
                || memchr(b'\r', bytes).is_some()
        } else {
            field.chars().any(|c| self.is_escape_char(c))
        }
    }

    /// Returns the characters to write for `field`.
    ///
    /// If the field needs quotes, it is wrapped in the quote character and
    /// every quote inside it is doubled. Otherwise it is returned as is.
    pub fn escape<'a>(&self, field: &'a str) -> Escape<'a> {
        let quote =
            if self.needs_quotes(field) { Some(self.quote) } else { None };
        Escape {
            chars: field.chars(),
            quote,
            opened: false,
            doubled: false,
            closed: false,
        }
    }
}

/// An iterator over the escaped characters of a field.
///
/// Created by [`Escaper::escape`](struct.Escaper.html#method.escape).
#[derive(Clone, Debug)]
pub struct Escape<'a> {
    chars: Chars<'a>,
    quote: Option<char>,
    opened: bool,
    doubled: bool,
    closed: bool,
}

impl<'a> Escape<'a> {
    /// Whether the field is written inside quotes.
    pub fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }
}

impl<'a> Iterator for Escape<'a> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let quote = match self.quote {
            None => return self.chars.next(),
            Some(quote) => quote,
        };
        if !self.opened {
            self.opened = true;
            return Some(quote);
        }
        if self.doubled {
            self.doubled = false;
            return Some(quote);
        }
        match self.chars.next() {
            Some(c) => {
                if c == quote {
                    self.doubled = true;
                }
                Some(c)
            }
            None if !self.closed => {
                self.closed = true;
                Some(quote)
            }
            None => None,
        }
    }
}
