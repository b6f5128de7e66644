// Structures produced by the RPN parser.

use core::ops::Range;

use ecow::EcoString;
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self(start..end)
    }

    pub fn str_of<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.0.clone()).unwrap_or("")
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(s: pest::Span<'_>) -> Self {
        Self(s.start()..s.end())
    }
}

/// One non-empty source line: a command and its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpnLine {
    /// 1-based line number.
    pub number: usize,
    /// Byte range of the instruction, without separators or annotation.
    pub span: Span,
    pub command: EcoString,
    pub params: SmallVec<[EcoString; 3]>,
}

impl RpnLine {
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(EcoString::as_str)
    }
}
