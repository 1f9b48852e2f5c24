use std::iter::FromIterator;
use std::ops;
use std::slice;
use std::vec;

/// A full CSV document: an ordered sequence of records.
pub type Document = Vec<Record>;

/// A single CSV record: an ordered sequence of text fields.
///
/// Records produced by a [`Reader`](struct.Reader.html) always have at least
/// one field. An empty line is a record with one empty field.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Record(Vec<String>);

impl Record {
    /// Create a new empty record.
    pub fn new() -> Record {
        Record(vec![])
    }

    /// Create a new empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Record {
        Record(Vec::with_capacity(capacity))
    }

    /// Returns the number of fields in this record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the field at index `i`, if it exists.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(|field| &**field)
    }

    /// Add a field to the end of this record.
    pub fn push_field(&mut self, field: &str) {
        self.0.push(field.to_string());
    }

    /// Returns an iterator over the fields of this record.
    pub fn iter(&self) -> RecordIter {
        RecordIter(self.0.iter())
    }

    /// Returns the fields of this record as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume this record and return its fields.
    pub fn into_fields(self) -> Vec<String> {
        self.0
    }

    pub(crate) fn remove_first(&mut self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Record {
        Record(fields)
    }
}

impl<'a> From<Vec<&'a str>> for Record {
    fn from(fields: Vec<&'a str>) -> Record {
        fields.into_iter().collect()
    }
}

impl<T: Into<String>> FromIterator<T> for Record {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Record {
        Record(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>> Extend<T> for Record {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl ops::Index<usize> for Record {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        &self.0[i]
    }
}

impl<T: AsRef<str>> PartialEq<Vec<T>> for Record {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.0.len() == other.len()
            && self.0.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<T: AsRef<str>> PartialEq<[T]> for Record {
    fn eq(&self, other: &[T]) -> bool {
        self.0.len() == other.len()
            && self.0.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<'r> IntoIterator for &'r Record {
    type IntoIter = RecordIter<'r>;
    type Item = &'r str;

    fn into_iter(self) -> RecordIter<'r> {
        self.iter()
    }
}

impl IntoIterator for Record {
    type IntoIter = vec::IntoIter<String>;
    type Item = String;

    fn into_iter(self) -> vec::IntoIter<String> {
        self.0.into_iter()
    }
}

/// An iterator over the fields of a record.
///
/// The `'r` lifetime refers to the lifetime of the `Record` being iterated.
#[derive(Clone, Debug)]
pub struct RecordIter<'r>(slice::Iter<'r, String>);

impl<'r> Iterator for RecordIter<'r> {
    type Item = &'r str;

    fn next(&mut self) -> Option<&'r str> {
        self.0.next().map(|field| &**field)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'r> DoubleEndedIterator for RecordIter<'r> {
    fn next_back(&mut self) -> Option<&'r str> {
        self.0.next_back().map(|field| &**field)
    }
}

impl<'r> ExactSizeIterator for RecordIter<'r> {}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    use super::Record;

    impl Serialize for Record {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for field in self {
                seq.serialize_element(field)?;
            }
            seq.end()
        }
    }

    impl<'de> Deserialize<'de> for Record {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Record, D::Error> {
            struct RecordVisitor;

            impl<'de> Visitor<'de> for RecordVisitor {
                type Value = Record;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a sequence of strings")
                }

                fn visit_seq<A: SeqAccess<'de>>(
                    self,
                    mut seq: A,
                ) -> Result<Record, A::Error> {
                    let mut record =
                        Record::with_capacity(seq.size_hint().unwrap_or(0));
                    while let Some(field) = seq.next_element::<String>()? {
                        record.0.push(field);
                    }
                    Ok(record)
                }
            }

            deserializer.deserialize_seq(RecordVisitor)
        }
    }
}
