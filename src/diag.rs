//! Non-fatal parse diagnostics.
//!
//! Reserved fields that carry an unexpected value do not fail a parse. The
//! mismatch is recorded here, and mirrored to `tracing` for anyone listening.

use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub field: &'static str,
    /// Bit offset of the field from the start of the parsed buffer.
    pub bit_position: usize,
    pub expected: u64,
    pub actual: u64,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reserved field '{}' at bit {}: expected {:#x}, got {:#x}",
            self.field, self.bit_position, self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn reserved_mismatch(&mut self, field: &'static str, bit_position: usize, expected: u64, actual: u64) {
        warn!(
            field,
            bit_position,
            expected,
            actual,
            "reserved field mismatch, continuing"
        );
        self.entries.push(Diagnostic {
            field,
            bit_position,
            expected,
            actual,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
