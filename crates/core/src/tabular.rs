//! Header-first comma-separated snapshots addressed by column position.

use std::io::Read;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What to do with a numeric field that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericParsing {
    /// Fail the whole run with a malformed input error.
    #[default]
    Strict,
    /// Substitute zero and keep going (legacy behavior).
    Permissive,
}

impl NumericParsing {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Permissive
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Reader that has already consumed the header record.
///
/// Records must all have the same number of fields as the header.
pub(crate) struct TabularReader<R> {
    inner: csv::Reader<R>,
    record: StringRecord,
    parsing: NumericParsing,
}

impl<R: Read> TabularReader<R> {
    /// Opens the stream and discards its header record.
    pub(crate) fn open(reader: R, parsing: NumericParsing) -> Result<Self> {
        let mut inner = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::None)
            .from_reader(reader);

        let mut header = StringRecord::new();
        if !inner.read_record(&mut header)? {
            return Err(Error::malformed(1, "missing header record"));
        }

        Ok(Self {
            inner,
            record: StringRecord::new(),
            parsing,
        })
    }

    /// Next data row, or `None` once the stream is exhausted.
    pub(crate) fn next_row(&mut self) -> Result<Option<Row<'_>>> {
        if !self.inner.read_record(&mut self.record)? {
            return Ok(None);
        }
        let line = self.record.position().map(|p| p.line()).unwrap_or(0);
        Ok(Some(Row {
            record: &self.record,
            line,
            parsing: self.parsing,
        }))
    }
}

/// One data row.
pub(crate) struct Row<'a> {
    record: &'a StringRecord,
    line: u64,
    parsing: NumericParsing,
}

impl Row<'_> {
    pub(crate) fn line(&self) -> u64 {
        self.line
    }

    /// Parses the integer at `column`.
    ///
    /// A missing column is always an error; an unparsable value is an error
    /// only under [`NumericParsing::Strict`].
    pub(crate) fn int<T>(&self, column: usize, name: &'static str) -> Result<T>
    where
        T: FromStr + Default,
    {
        let raw = self.record.get(column).ok_or_else(|| {
            Error::malformed(
                self.line,
                format!(
                    "expected column {} ({}), row has {} fields",
                    column,
                    name,
                    self.record.len()
                ),
            )
        })?;

        match raw.parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) if self.parsing.is_strict() => Err(Error::malformed(
                self.line,
                format!("column {} ({}): invalid integer {:?}", column, name, raw),
            )),
            Err(_) => Ok(T::default()),
        }
    }
}
