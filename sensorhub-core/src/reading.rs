//! Formatted readings
//!
//! A reading is one self-contained text record terminated by a single
//! newline, e.g.
//!
//! ```text
//! HTS221: temperature=23.450 C, humidity=41.200 %
//! ```
//!
//! Values are carried as milli-units so formatting never touches floats.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::MAX_READING_LEN;
use crate::traits::SensorError;

/// One formatted reading, always newline-terminated
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading(String<MAX_READING_LEN>);

impl Reading {
    /// Build a reading from an already formatted line
    ///
    /// Interior newlines are rejected so that one write stays one record.
    /// A missing trailing newline is appended.
    pub fn from_line(line: &str) -> Result<Self, SensorError> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        if line.contains('\n') {
            return Err(SensorError::FormatOverflow);
        }
        let mut buf = String::new();
        buf.push_str(line).map_err(|_| SensorError::FormatOverflow)?;
        buf.push('\n').map_err(|_| SensorError::FormatOverflow)?;
        Ok(Self(buf))
    }

    /// Reading for a digital input
    pub fn digital(name: &str, active: bool) -> Result<Self, SensorError> {
        ReadingBuilder::new(name)
            .text("state", if active { "pressed" } else { "released" })
            .finish()
    }

    /// Copy of this reading with `prefix` and a space in front
    ///
    /// Used to tag motion records, e.g. `[TAP]` or `[STEP 12]`.
    pub fn prefixed(&self, prefix: &str) -> Result<Self, SensorError> {
        let mut buf = String::new();
        buf.push_str(prefix).map_err(|_| SensorError::FormatOverflow)?;
        buf.push(' ').map_err(|_| SensorError::FormatOverflow)?;
        buf.push_str(self.0.as_str())
            .map_err(|_| SensorError::FormatOverflow)?;
        Ok(Self(buf))
    }

    /// The record text, including the trailing newline
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Record length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a reading holds at least its newline
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Incremental reading formatter
///
/// Errors are latched and reported once by [`ReadingBuilder::finish`], so
/// drivers can chain fields without checking each one.
pub struct ReadingBuilder {
    buf: String<MAX_READING_LEN>,
    fields: usize,
    overflow: bool,
}

impl ReadingBuilder {
    /// Start a reading; the label is upper-cased
    pub fn new(label: &str) -> Self {
        let mut builder = Self {
            buf: String::new(),
            fields: 0,
            overflow: false,
        };
        for c in label.chars() {
            builder.push_char(c.to_ascii_uppercase());
        }
        builder.push_char(':');
        builder
    }

    /// Add a fixed-point field, `milli` in thousandths of `unit`
    pub fn field(mut self, name: &str, milli: i32, unit: &str) -> Self {
        self.separator(name);
        let sign = if milli < 0 { "-" } else { "" };
        let abs = milli.unsigned_abs();
        if write!(self.buf, "{}{}.{:03}", sign, abs / 1000, abs % 1000).is_err() {
            self.overflow = true;
        }
        if !unit.is_empty() {
            self.push_char(' ');
            self.push_str(unit);
        }
        self
    }

    /// Add an integer field without a unit
    pub fn count(mut self, name: &str, value: u32) -> Self {
        self.separator(name);
        if write!(self.buf, "{}", value).is_err() {
            self.overflow = true;
        }
        self
    }

    /// Add a text field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.separator(name);
        self.push_str(value);
        self
    }

    /// Terminate the record
    pub fn finish(mut self) -> Result<Reading, SensorError> {
        self.push_char('\n');
        if self.overflow {
            return Err(SensorError::FormatOverflow);
        }
        Ok(Reading(self.buf))
    }

    fn separator(&mut self, name: &str) {
        if self.fields > 0 {
            self.push_char(',');
        }
        self.fields += 1;
        self.push_char(' ');
        self.push_str(name);
        self.push_char('=');
    }

    fn push_char(&mut self, c: char) {
        if self.buf.push(c).is_err() {
            self.overflow = true;
        }
    }

    fn push_str(&mut self, s: &str) {
        if self.buf.push_str(s).is_err() {
            self.overflow = true;
        }
    }
}
