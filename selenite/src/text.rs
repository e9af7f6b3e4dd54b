//! Source text storage, positions and ranges.
//!
//! Source text may arrive as a single string or as a sequence of chunks (for
//! example, lines read one at a time by a REPL). [`SourceText`] keeps the
//! chunks as they are and never concatenates them. A [`Cursor`] walks across
//! chunk boundaries transparently, so a token may start in one chunk and end
//! in another.

use std::{
	borrow::Cow,
	fmt::{Display, Formatter, Result as FMTResult}
};

/// An opaque position within a [`SourceText`].
///
/// Positions are totally ordered, and a position obtained from one source text
/// is meaningless for any other.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SequencePosition(usize);

impl SequencePosition {
	/// The absolute byte offset of this position from the start of the text.
	pub fn offset(self) -> usize {
		self.0
	}
}

/// An immutable span between two positions, used as the location of every
/// token and syntax node.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SequenceRange {
	pub start: SequencePosition,
	pub end: SequencePosition
}

impl SequenceRange {
	pub fn new(start: SequencePosition, end: SequencePosition) -> Self {
		Self {start, end}
	}

	/// A zero width range sitting at `position`.
	pub fn empty(position: SequencePosition) -> Self {
		Self {start: position, end: position}
	}

	/// Whether `other` lies entirely within `self`.
	pub fn contains(self, other: Self) -> bool {
		self.start <= other.start && other.end <= self.end
	}
}

impl Display for SequenceRange {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		write!(f, "{}..{}", self.start.0, self.end.0)
	}
}

/// A possibly segmented, immutable buffer of Lua source text.
///
/// Examples
/// --------
/// ```rust
/// # use selenite::text::{SequenceRange, SourceText};
/// let text = SourceText::from_segments(["local greet", "ing = 1"]);
/// let mut cursor = text.cursor();
/// for _ in 0..6 {cursor.advance();}
/// let start = cursor.position();
/// for _ in 0..8 {cursor.advance();}
///
/// let range = SequenceRange::new(start, cursor.position());
/// assert_eq!(text.slice(range), "greeting");
/// ```
#[derive(Clone, Debug, Default)]
pub struct SourceText {
	segments: Vec<Box<str>>,
	starts: Vec<usize>,
	length: usize
}

impl SourceText {
	pub fn new(text: impl Into<Box<str>>) -> Self {
		Self::from_segments(Some(text.into()))
	}

	/// Builds a source text from chunks, in order. Empty chunks are dropped.
	pub fn from_segments<I, S>(segments: I) -> Self
			where I: IntoIterator<Item = S>, S: Into<Box<str>> {
		let mut text = Self::default();

		segments.into_iter()
			.map(Into::into)
			.filter(|segment| !segment.is_empty())
			.for_each(|segment| {
				text.starts.push(text.length);
				text.length += segment.len();
				text.segments.push(segment);
			});

		text
	}

	/// The length of the text, in bytes.
	pub fn len(&self) -> usize {
		self.length
	}

	pub fn is_empty(&self) -> bool {
		self.length == 0
	}

	pub fn start(&self) -> SequencePosition {
		SequencePosition(0)
	}

	pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
		self.segments.iter().map(|segment| &**segment)
	}

	pub fn cursor(&self) -> Cursor<'_> {
		Cursor {text: self, segment: 0, index: 0, position: 0}
	}

	/// Returns the text covered by `range`.
	///
	/// Borrows when the range lies within a single segment, and only allocates
	/// when it straddles segments.
	pub fn slice(&self, range: SequenceRange) -> Cow<'_, str> {
		let start = range.start.0.min(self.length);
		let end = range.end.0.min(self.length);
		if start >= end {return Cow::Borrowed("")}

		let first = self.segment_of(start);
		let base = self.starts[first];
		let segment = &self.segments[first];
		if end - base <= segment.len() {
			return Cow::Borrowed(&segment[start - base..end - base])
		}

		let mut owned = String::with_capacity(end - start);
		self.segments.iter().zip(&self.starts).skip(first)
			.take_while(|(_, base)| **base < end)
			.for_each(|(segment, &base)| {
				let from = start.saturating_sub(base);
				let to = (end - base).min(segment.len());
				owned.push_str(&segment[from..to]);
			});
		Cow::Owned(owned)
	}

	/// Maps a position to a one based line number and a zero based column,
	/// counted in characters.
	pub fn line_column(&self, position: SequencePosition) -> (usize, usize) {
		let mut cursor = self.cursor();
		let (mut line, mut column) = (1, 0);

		while cursor.position() < position {
			match cursor.advance() {
				Some('\n') => {line += 1; column = 0},
				Some(_) => column += 1,
				None => break
			}
		}

		(line, column)
	}

	fn segment_of(&self, offset: usize) -> usize {
		self.starts.partition_point(|&start| start <= offset).saturating_sub(1)
	}
}

impl From<&str> for SourceText {
	fn from(text: &str) -> Self {
		Self::new(text)
	}
}

impl From<String> for SourceText {
	fn from(text: String) -> Self {
		Self::new(text)
	}
}

impl From<Box<str>> for SourceText {
	fn from(text: Box<str>) -> Self {
		Self::new(text)
	}
}

/// A forward only reader over the characters of a [`SourceText`].
///
/// Cursors are cheap to clone; cloning one is how callers look more than one
/// character ahead.
#[derive(Clone, Debug)]
pub struct Cursor<'s> {
	text: &'s SourceText,
	segment: usize,
	index: usize,
	position: usize
}

impl<'s> Cursor<'s> {
	pub fn text(&self) -> &'s SourceText {
		self.text
	}

	pub fn position(&self) -> SequencePosition {
		SequencePosition(self.position)
	}

	/// Peeks the next character, if any.
	pub fn peek(&self) -> Option<char> {
		self.text.segments.get(self.segment)?[self.index..].chars().next()
	}

	/// Peeks the character after the next one, if any.
	pub fn peek_second(&self) -> Option<char> {
		let mut ahead = self.clone();
		ahead.advance()?;
		ahead.peek()
	}

	/// Consumes and returns the next character, if any.
	pub fn advance(&mut self) -> Option<char> {
		let segment = self.text.segments.get(self.segment)?;
		let character = segment[self.index..].chars().next()?;

		self.index += character.len_utf8();
		self.position += character.len_utf8();
		if self.index >= segment.len() {
			self.segment += 1;
			self.index = 0;
		}

		Some(character)
	}
}
