//! Composite status flags shared by the compiler and the executor.
//!
//! A [`Status`] is a bit set: several conditions can be reported at once, and
//! the executor accumulates numeric flags across a whole run.

use core::fmt;

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct Status: u16 {
        /// Malformed RPN line, or a reserved opcode written in source.
        const SYNTAX_ERROR = 1;
        /// Missing or extra argument, or a second write to the same output.
        const ILLEGAL_OPERATION = 1 << 1;
        /// Non-numeric type, unknown operator signature, untyped variable.
        const UNSUPPORTED_FEATURE = 1 << 2;
        /// Read of an output that is not written yet, or code left unexecuted.
        const NOT_COMPLETED = 1 << 3;
        /// Narrowing conversion lost magnitude, or stack pointer out of bounds.
        const OUT_OF_RANGE = 1 << 4;
        const OVERFLOW = 1 << 5;
        const UNDERFLOW = 1 << 6;
        /// Literal conversion failure, type stack exhausted.
        const FATAL_ERROR = 1 << 7;
        /// Broken invariant: leftover types after compile, unbalanced stack.
        const INTERNAL_SETUP_ERROR = 1 << 8;
        /// Bad call parameters, e.g. tracing without a sink.
        const PARAMETERS_ERROR = 1 << 9;
        /// Reserved for collaborators; never raised by the evaluator.
        const TIMEOUT = 1 << 10;

        /// Flags raised by operators on questionable values. They never stop
        /// the dispatch loop.
        const NUMERIC = Self::OUT_OF_RANGE.bits() | Self::OVERFLOW.bits() | Self::UNDERFLOW.bits();
    }
}

impl Status {
    pub fn is_ok(self) -> bool {
        self.is_empty()
    }

    /// True when something other than a numeric flag is set.
    pub fn is_fatal(self) -> bool {
        !(self - Status::NUMERIC).is_empty()
    }

    fn flag_name(flag: Status) -> &'static str {
        match flag {
            Status::SYNTAX_ERROR => "syntaxError",
            Status::ILLEGAL_OPERATION => "illegalOperation",
            Status::UNSUPPORTED_FEATURE => "unsupportedFeature",
            Status::NOT_COMPLETED => "notCompleted",
            Status::OUT_OF_RANGE => "outOfRange",
            Status::OVERFLOW => "overflow",
            Status::UNDERFLOW => "underflow",
            Status::FATAL_ERROR => "fatalError",
            Status::INTERNAL_SETUP_ERROR => "internalSetupError",
            Status::PARAMETERS_ERROR => "parametersError",
            Status::TIMEOUT => "timeout",
            _ => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("ok");
        }
        let mut first = true;
        for flag in self.iter() {
            if flag == Status::NUMERIC {
                continue;
            }
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(Status::flag_name(flag))?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_flags() {
        assert_eq!(Status::empty().to_string(), "ok");
        assert_eq!(
            (Status::OVERFLOW | Status::OUT_OF_RANGE).to_string(),
            "outOfRange | overflow"
        );
    }

    #[test]
    fn test_numeric_flags_are_not_fatal() {
        assert!(!(Status::OVERFLOW | Status::UNDERFLOW).is_fatal());
        assert!(!Status::OUT_OF_RANGE.is_fatal());
        assert!((Status::OVERFLOW | Status::NOT_COMPLETED).is_fatal());
    }
}
