//! Code generators: stateful sequences of candidate error codes.
//!
//! A [`Domain`](crate::Domain) asks its generator for a fresh code whenever a
//! descriptor is created without an explicit one. Every call advances the
//! sequence, including calls whose result the domain discards because the
//! code is already taken.
//!
//! # Termination
//!
//! The domain keeps probing until the generator yields a code it does not
//! hold. A generator that can never produce a fresh code (for example a
//! sequence with `step == 0` once its single code is taken) makes
//! [`Domain::create`](crate::Domain::create) loop forever. Avoiding that is
//! the caller's responsibility.

use std::fmt;

use serde_json::Value;

use crate::format::format_message;
use crate::ErrorCode;

/// Produces candidate error codes on demand.
///
/// Implemented for every `FnMut() -> ErrorCode` closure, so ad-hoc
/// generators need no dedicated type.
pub trait CodeGenerator: Send {
    /// Returns the next code in the sequence.
    fn next_code(&mut self) -> ErrorCode;
}

impl<F> CodeGenerator for F
where
    F: FnMut() -> ErrorCode + Send,
{
    fn next_code(&mut self) -> ErrorCode {
        self()
    }
}

/// Raw numeric sequence shared by the standard generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumberSequence {
    current: i64,
    step: i64,
}

impl NumberSequence {
    const fn new(start: i64, step: i64) -> Self {
        Self {
            current: start,
            step,
        }
    }

    /// Returns the current number and advances by `step`, wrapping on overflow.
    fn advance(&mut self) -> i64 {
        let result = self.current;
        self.current = self.current.wrapping_add(self.step);
        result
    }
}

/// Sequential numeric codes: `start`, `start + step`, `start + 2 * step`, ...
///
/// The default sequence starts at 1 with step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementNumber {
    numbers: NumberSequence,
}

impl IncrementNumber {
    /// Creates a sequence starting at `start` and advancing by `step`.
    ///
    /// A zero step is accepted and always yields the same code.
    pub const fn new(start: i64, step: i64) -> Self {
        Self {
            numbers: NumberSequence::new(start, step),
        }
    }
}

impl Default for IncrementNumber {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl CodeGenerator for IncrementNumber {
    fn next_code(&mut self) -> ErrorCode {
        ErrorCode::from(self.numbers.advance())
    }
}

/// How a [`FormatCode`] turns a number into a code.
pub enum CodeFormat {
    /// A template with one numeric placeholder, e.g. `"WOO_%d"`.
    Template(String),
    /// An arbitrary number-to-string function.
    Func(Box<dyn Fn(i64) -> String + Send>),
}

impl CodeFormat {
    fn apply(&self, n: i64) -> String {
        match self {
            Self::Template(template) => format_message(template, &[Value::from(n)]),
            Self::Func(func) => func(n),
        }
    }
}

impl fmt::Debug for CodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for CodeFormat {
    fn from(template: &str) -> Self {
        Self::Template(template.to_string())
    }
}

impl From<String> for CodeFormat {
    fn from(template: String) -> Self {
        Self::Template(template)
    }
}

/// Sequential codes passed through a formatter, e.g. `WOO_1`, `WOO_2`, ...
#[derive(Debug)]
pub struct FormatCode {
    format: CodeFormat,
    numbers: NumberSequence,
}

impl FormatCode {
    /// Creates a formatted sequence starting at 1 with step 1.
    pub fn new(format: impl Into<CodeFormat>) -> Self {
        Self::with_sequence(format, 1, 1)
    }

    /// Creates a formatted sequence with an explicit start and step.
    pub fn with_sequence(format: impl Into<CodeFormat>, start: i64, step: i64) -> Self {
        Self {
            format: format.into(),
            numbers: NumberSequence::new(start, step),
        }
    }

    /// Creates a sequence formatted by an arbitrary function.
    pub fn with_fn<F>(func: F, start: i64, step: i64) -> Self
    where
        F: Fn(i64) -> String + Send + 'static,
    {
        Self::with_sequence(CodeFormat::Func(Box::new(func)), start, step)
    }
}

impl CodeGenerator for FormatCode {
    fn next_code(&mut self) -> ErrorCode {
        let n = self.numbers.advance();
        ErrorCode::new(self.format.apply(n))
    }
}

/// Returns a generator emitting `start`, `start + step`, ... as decimal codes.
pub fn increment_number(start: i64, step: i64) -> IncrementNumber {
    IncrementNumber::new(start, step)
}

/// Returns a generator emitting formatted sequential codes.
///
/// `format` is either a template string with one numeric placeholder or a
/// [`CodeFormat::Func`].
pub fn format_code(format: impl Into<CodeFormat>, start: i64, step: i64) -> FormatCode {
    FormatCode::with_sequence(format, start, step)
}
