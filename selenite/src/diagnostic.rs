//! Diagnostics produced by every stage of the pipeline.
//!
//! Malformed user input never stops a stage; instead, each problem is recorded
//! as a [`Diagnostic`] and processing carries on with a best effort tree, so a
//! single pass surfaces as many independent problems as possible.

use crate::{ast::lexer::TokenKind, text::SequenceRange};
use std::{
	error::Error as STDError,
	fmt::{Display, Formatter, Result as FMTResult},
	ops::Deref
};

/// Displays an optional character, using `<eof>` for the end of input.
struct EofChar(Option<char>);

impl Display for EofChar {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		match self.0 {
			Some(character) => write!(f, "{}", character.escape_debug()),
			None => write!(f, "<eof>")
		}
	}
}

/// What went wrong, without where.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DiagnosticKind {
	// Lexical
	UnterminatedString,
	UnterminatedLongString,
	UnterminatedLongComment,
	InvalidLongStringDelimiter,
	BadCharacter(char),
	InvalidEscapeSequence(Option<char>),
	UnterminatedEscapeSequence,
	IncompleteEscapeSequence,
	ExpectedCharacter {
		actual: Option<char>,
		expected: char
	},
	DecimalEscapeTooLarge,
	Utf8ValueTooLarge,
	MalformedNumber,

	// Syntactic
	UnexpectedToken {
		expected: TokenKind,
		actual: TokenKind
	},
	ExpectedExpression {
		actual: TokenKind
	},
	InvalidAssignmentTarget,

	// Binding
	UndefinedLabel(Box<str>),
	DuplicateLabel(Box<str>),
	UnexpectedBreak,
	VarargOutsideVarargFunction,
	UnknownAttribute(Box<str>),
	MultipleToBeClosed,
	AssignToConstant(Box<str>)
}

impl Display for DiagnosticKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		match self {
			// Lexical
			Self::UnterminatedString => write!(f, "Unterminated string literal."),
			Self::UnterminatedLongString =>
				write!(f, "Unterminated long string literal."),
			Self::UnterminatedLongComment => write!(f, "Unterminated long comment."),
			Self::InvalidLongStringDelimiter =>
				write!(f, "Invalid long string delimiter."),
			Self::BadCharacter(character) =>
				write!(f, "Bad character input '{}'.", EofChar(Some(*character))),
			Self::InvalidEscapeSequence(character) =>
				write!(f, "Invalid escape sequence '\\{}'.", EofChar(*character)),
			Self::UnterminatedEscapeSequence =>
				write!(f, "Unterminated escape sequence."),
			Self::IncompleteEscapeSequence => write!(f, "Incomplete escape sequence."),
			Self::ExpectedCharacter {actual, expected} =>
				write!(f, "Unexpected character '{}', expected '{}'.",
					EofChar(*actual), EofChar(Some(*expected))),
			Self::DecimalEscapeTooLarge => write!(f, "Decimal escape too large."),
			Self::Utf8ValueTooLarge => write!(f, "UTF-8 value too large."),
			Self::MalformedNumber => write!(f, "Malformed number."),

			// Syntactic
			Self::UnexpectedToken {expected, actual} =>
				write!(f, "Unexpected token <{:?}>, expected <{:?}>.", actual, expected),
			Self::ExpectedExpression {actual} =>
				write!(f, "Unexpected token <{:?}>, expected <expression>.", actual),
			Self::InvalidAssignmentTarget =>
				write!(f, "Expression cannot be assigned to."),

			// Binding
			Self::UndefinedLabel(name) => write!(f, "Undefined label '{}'.", name),
			Self::DuplicateLabel(name) =>
				write!(f, "Label '{}' already defined.", name),
			Self::UnexpectedBreak =>
				write!(f, "Unexpected break statement outside of loop."),
			Self::VarargOutsideVarargFunction =>
				write!(f, "Cannot use '...' outside a vararg function."),
			Self::UnknownAttribute(name) =>
				write!(f, "Unknown attribute '{}'.", name),
			Self::MultipleToBeClosed =>
				write!(f, "Multiple to-be-closed variables in local list."),
			Self::AssignToConstant(name) =>
				write!(f, "Attempt to assign to const variable '{}'.", name)
		}
	}
}

impl STDError for DiagnosticKind {}

/// A single problem, and the range of source text it concerns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
	pub location: SequenceRange,
	pub kind: DiagnosticKind
}

impl Diagnostic {
	pub fn new(location: SequenceRange, kind: DiagnosticKind) -> Self {
		Self {location, kind}
	}

	/// The human readable message of this diagnostic.
	pub fn message(&self) -> String {
		self.kind.to_string()
	}
}

impl STDError for Diagnostic {}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		write!(f, "{}: {}", self.location, self.kind)
	}
}

/// An append only, ordered collection of diagnostics for one compilation unit.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticBag(Vec<Diagnostic>);

impl DiagnosticBag {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn report(&mut self, location: SequenceRange, kind: DiagnosticKind) {
		log::trace!("diagnostic at {}: {}", location, kind);
		self.0.push(Diagnostic::new(location, kind));
	}

	pub fn into_vec(self) -> Vec<Diagnostic> {
		self.0
	}
}

impl Deref for DiagnosticBag {
	type Target = [Diagnostic];

	fn deref(&self) -> &[Diagnostic] {
		&self.0
	}
}

impl IntoIterator for DiagnosticBag {
	type Item = Diagnostic;
	type IntoIter = std::vec::IntoIter<Diagnostic>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
