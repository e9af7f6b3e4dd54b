use crate::{
	diagnostic::{DiagnosticBag, DiagnosticKind},
	text::{Cursor, SequencePosition, SequenceRange, SourceText}
};
use std::fmt::{Display, Formatter, Result as FMTResult};

/// Tokenizes Lua source text, character by character.
///
/// The lexer never fails. Malformed input is reported to its
/// [`DiagnosticBag`], and a best effort token is produced anyway, so callers
/// can simply call [`lex`](Self::lex) until [`TokenKind::EndOfFile`] shows up.
/// The lexer can also be iterated over, yielding every token before the end
/// of the file.
///
/// Examples
/// --------
/// Below is an example of lexing one line of Lua.
/// ```rust
/// # use selenite::{ast::lexer::{Lexer, TokenKind}, text::SourceText};
/// let text = SourceText::from("print('hello world!')");
/// let kinds = Lexer::new(&text).map(|token| token.kind).collect::<Vec<_>>();
///
/// assert_eq!(kinds, [
/// 	TokenKind::Name,
/// 	TokenKind::OpenParenthesis,
/// 	TokenKind::LiteralString,
/// 	TokenKind::CloseParenthesis
/// ]);
/// ```
pub struct Lexer<'s> {
	source: Cursor<'s>,
	diagnostics: DiagnosticBag,
	finished: bool
}

/// The private Lexer API.
///
/// Includes many convenience methods for internal implementation.
impl<'s> Lexer<'s> {
	/// Eats a character, disposing of it.
	fn eat(&mut self) {
		self.source.advance();
	}

	/// Eats the next character if it is `expected`, returning whether it did.
	fn eat_if(&mut self, expected: char) -> bool {
		let matched = self.peek() == Some(expected);
		if matched {self.eat()}
		matched
	}

	/// Peeks the next character, if any.
	fn peek(&self) -> Option<char> {
		self.source.peek()
	}

	fn here(&self) -> SequencePosition {
		self.source.position()
	}

	/// Reports a diagnostic spanning from `start` up to the current position.
	fn report(&mut self, start: SequencePosition, kind: DiagnosticKind) {
		let location = SequenceRange::new(start, self.here());
		self.diagnostics.report(location, kind);
	}

	fn token(&self, kind: TokenKind, start: SequencePosition, value: TokenValue)
			-> Token {
		Token::new(kind, SequenceRange::new(start, self.here()), value)
	}

	/// Eats one line ending, treating `\r\n` and `\n\r` as a single one.
	/// Assumes the next character is `\r` or `\n`.
	fn eat_newline(&mut self) {
		if let Some(first) = self.source.advance() {
			match self.peek() {
				Some(second @ ('\n' | '\r')) if second != first => self.eat(),
				_ => ()
			}
		}
	}

	/// Checks, without consuming anything, whether an opening long bracket
	/// (`[`, any number of `=`, `[`) comes next, and returns its level.
	fn long_bracket_level(&self) -> Option<usize> {
		let mut ahead = self.source.clone();
		if ahead.advance()? != '[' {return None}

		let mut level = 0;
		loop {
			match ahead.advance()? {
				'=' => level += 1,
				'[' => break Some(level),
				_ => break None
			}
		}
	}

	/// Checks, without consuming anything, whether a closing long bracket of
	/// the given level comes next.
	fn closes_long_bracket(&self, level: usize) -> bool {
		let mut ahead = self.source.clone();
		if ahead.advance() != Some(']') {return false}
		(0..level).all(|_| ahead.advance() == Some('=')) && ahead.advance() == Some(']')
	}

	/// Reads the body of a long bracket, whose opening bracket was already
	/// consumed, up to and including its closing bracket. Returns whether the
	/// closing bracket was found.
	///
	/// A newline immediately following the opening bracket is skipped, and all
	/// line endings are normalized to `\n`.
	fn read_long_body(&mut self, level: usize, mut body: Option<&mut Vec<u8>>)
			-> bool {
		if let Some('\n' | '\r') = self.peek() {self.eat_newline()}

		loop {
			match self.peek() {
				None => break false,
				Some(']') if self.closes_long_bracket(level) => {
					(0..level + 2).for_each(|_| self.eat());
					break true
				},
				Some('\n' | '\r') => {
					self.eat_newline();
					if let Some(body) = body.as_deref_mut() {body.push(b'\n')}
				},
				Some(character) => {
					self.eat();
					if let Some(body) = body.as_deref_mut() {push_char(body, character)}
				}
			}
		}
	}

	/// Skips a comment. Assumes the leading `--` *was* consumed.
	fn skip_comment(&mut self, start: SequencePosition) {
		match self.long_bracket_level() {
			Some(level) => {
				(0..level + 2).for_each(|_| self.eat());
				if !self.read_long_body(level, None) {
					self.report(start, DiagnosticKind::UnterminatedLongComment)
				}
			},
			None => while let Some(character) = self.peek() {
				if let '\n' | '\r' = character {break}
				self.eat()
			}
		}
	}

	/// Lexes an identifier or keyword.
	fn lex_identifier(&mut self, start: SequencePosition) -> Token {
		let mut identifier = String::new();
		while let Some(character @ ('a'..='z' | 'A'..='Z' | '0'..='9' | '_')) =
			self.peek() {identifier.push(character); self.eat()}

		match TokenKind::keyword(&identifier) {
			Some(keyword) => self.token(keyword, start, TokenValue::None),
			None => self.token(TokenKind::Name, start,
				TokenValue::Name(identifier.into_boxed_str()))
		}
	}

	/// Lexes a quoted string. Assumes the opening quote *was not* consumed.
	fn lex_string(&mut self, start: SequencePosition) -> Token {
		let delimiter = self.source.advance();
		let mut string = Vec::new();

		loop {
			match self.peek() {
				None | Some('\n' | '\r') => {
					self.report(start, DiagnosticKind::UnterminatedString);
					break
				},
				character if character == delimiter => {self.eat(); break},
				Some('\\') => self.lex_escape(&mut string),
				Some(character) => {self.eat(); push_char(&mut string, character)}
			}
		}

		self.token(TokenKind::LiteralString, start,
			TokenValue::String(string.into_boxed_slice()))
	}

	/// Lexes an escape sequence into `string`. Assumes the backslash *was not*
	/// consumed.
	fn lex_escape(&mut self, string: &mut Vec<u8>) {
		let start = self.here();
		self.eat();

		let byte = match self.peek() {
			None => {
				self.report(start, DiagnosticKind::UnterminatedEscapeSequence);
				return
			},

			Some('a') => b'\x07',
			Some('b') => b'\x08',
			Some('f') => b'\x0C',
			Some('n') => b'\n',
			Some('r') => b'\r',
			Some('t') => b'\t',
			Some('v') => b'\x0B',
			Some('\\') => b'\\',
			Some('"') => b'"',
			Some('\'') => b'\'',

			// Line continuation.
			Some('\n' | '\r') => {self.eat_newline(); string.push(b'\n'); return},

			// Skips all following whitespace, including newlines.
			Some('z') => {
				self.eat();
				while let Some(' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C') = self.peek()
					{self.eat()}
				return
			},

			Some('x') => {
				self.eat();
				let mut value = 0;
				for _ in 0..2 {
					match self.peek().and_then(|character| character.to_digit(16)) {
						Some(digit) => {self.eat(); value = value * 16 + digit},
						None => {
							self.report(start, DiagnosticKind::IncompleteEscapeSequence);
							return
						}
					}
				}
				string.push(value as u8);
				return
			},

			Some('0'..='9') => {
				let mut value = 0;
				for _ in 0..3 {
					match self.peek().and_then(|character| character.to_digit(10)) {
						Some(digit) => {self.eat(); value = value * 10 + digit},
						None => break
					}
				}
				match u8::try_from(value) {
					Ok(value) => string.push(value),
					Err(_) => self.report(start, DiagnosticKind::DecimalEscapeTooLarge)
				}
				return
			},

			Some('u') => {self.eat(); self.lex_utf8_escape(start, string); return},

			Some(character) => {
				self.eat();
				self.report(start, DiagnosticKind::InvalidEscapeSequence(Some(character)));
				return
			}
		};

		self.eat();
		string.push(byte)
	}

	/// Lexes the `{XXX}` part of a `\u{XXX}` escape sequence.
	///
	/// Lua permits any value below 2^31, including surrogates and values past
	/// the end of Unicode, so this is encoded by hand rather than through
	/// [`char`].
	fn lex_utf8_escape(&mut self, start: SequencePosition, string: &mut Vec<u8>) {
		if !self.eat_if('{') {
			let actual = self.peek();
			self.report(start, DiagnosticKind::ExpectedCharacter {actual, expected: '{'});
			return
		}

		let (mut value, mut digits) = (0u64, 0);
		while let Some(digit) = self.peek().and_then(|character| character.to_digit(16)) {
			self.eat();
			value = (value * 16 + u64::from(digit)).min(u64::from(u32::MAX));
			digits += 1;
		}

		if digits == 0 {
			self.report(start, DiagnosticKind::IncompleteEscapeSequence);
			return
		}

		if !self.eat_if('}') {
			let actual = self.peek();
			self.report(start, DiagnosticKind::ExpectedCharacter {actual, expected: '}'});
			return
		}

		match u32::try_from(value) {
			Ok(value) if value <= 0x7FFF_FFFF => push_utf8(string, value),
			_ => self.report(start, DiagnosticKind::Utf8ValueTooLarge)
		}
	}

	/// Lexes a long bracketed string. Assumes the first character was a `[`, and
	/// *was not* consumed.
	fn lex_long_string(&mut self, start: SequencePosition) -> Token {
		let level = match self.long_bracket_level() {
			Some(level) => level,
			None => {
				self.eat();
				while self.eat_if('=') {}
				self.report(start, DiagnosticKind::InvalidLongStringDelimiter);
				return self.token(TokenKind::BadToken, start, TokenValue::None)
			}
		};

		(0..level + 2).for_each(|_| self.eat());
		let mut string = Vec::new();
		if !self.read_long_body(level, Some(&mut string)) {
			self.report(start, DiagnosticKind::UnterminatedLongString)
		}

		self.token(TokenKind::LiteralString, start,
			TokenValue::String(string.into_boxed_slice()))
	}

	/// Lexes a numeral. Assumes the first character *was not* consumed.
	///
	/// Like the reference implementation, this greedily reads every character
	/// that could belong to a numeral, and only then decides whether the whole
	/// thing makes sense.
	fn lex_number(&mut self, start: SequencePosition) -> Token {
		let mut numeral = String::new();
		let hexadecimal = self.peek() == Some('0')
			&& matches!(self.source.peek_second(), Some('x' | 'X'));
		let exponent = if hexadecimal {
			numeral.push_str("0x");
			self.eat(); self.eat();
			['p', 'P']
		} else {['e', 'E']};

		loop {
			match self.peek() {
				Some(character) if exponent.contains(&character) => {
					self.eat(); numeral.push(character);
					if let Some(sign @ ('+' | '-')) = self.peek()
						{self.eat(); numeral.push(sign)}
				},
				Some(character) if character.is_ascii_hexdigit() || character == '.' =>
					{self.eat(); numeral.push(character)},
				_ => break
			}
		}

		let mut malformed = false;
		while let Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_') = self.peek()
			{self.eat(); malformed = true}

		match convert_numeral(&numeral) {
			Some(value) if !malformed => {
				let kind = match value {
					TokenValue::Integer(_) => TokenKind::IntegerConstant,
					_ => TokenKind::FloatConstant
				};
				self.token(kind, start, value)
			},
			_ => {
				self.report(start, DiagnosticKind::MalformedNumber);
				self.token(TokenKind::IntegerConstant, start, TokenValue::Integer(0))
			}
		}
	}
}

/// The public Lexer API.
impl<'s> Lexer<'s> {
	pub fn new(text: &'s SourceText) -> Self {
		Self {source: text.cursor(), diagnostics: DiagnosticBag::new(), finished: false}
	}

	pub fn diagnostics(&self) -> &DiagnosticBag {
		&self.diagnostics
	}

	/// Lets later stages append their own diagnostics to this lexer's bag.
	pub fn diagnostics_mut(&mut self) -> &mut DiagnosticBag {
		&mut self.diagnostics
	}

	pub fn into_diagnostics(self) -> DiagnosticBag {
		self.diagnostics
	}

	/// Skips whitespace and comments, then lexes a single token.
	///
	/// Once the end of input is reached, every further call returns an
	/// [`EndOfFile`](TokenKind::EndOfFile) token.
	pub fn lex(&mut self) -> Token {
		loop {
			let start = self.here();
			let character = match self.peek() {
				Some(character) => character,
				None => break self.token(TokenKind::EndOfFile, start, TokenValue::None)
			};

			let kind = match character {
				' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C' => {self.eat(); continue},

				// Single character token Minus (-)
				// OR Multiple character Comment (--[[]])
				'-' => match {self.eat(); self.peek()} {
					Some('-') => {self.eat(); self.skip_comment(start); continue},
					_ => TokenKind::Minus
				},

				// Single character token OpenBracket ([)
				// OR Multiple character token LiteralString ([[]])
				'[' => match self.source.peek_second() {
					Some('[' | '=') => break self.lex_long_string(start),
					_ => {self.eat(); TokenKind::OpenBracket}
				},

				// Single character token Equals (=)
				// OR Double character token EqualsEquals (==)
				'=' => match {self.eat(); self.peek()} {
					Some('=') => {self.eat(); TokenKind::EqualsEquals},
					_ => TokenKind::Equals
				},

				// Single character token Less (<)
				// OR Double character tokens LessEquals (<=) and LessLess (<<)
				'<' => match {self.eat(); self.peek()} {
					Some('=') => {self.eat(); TokenKind::LessEquals},
					Some('<') => {self.eat(); TokenKind::LessLess},
					_ => TokenKind::Less
				},

				// Single character token Greater (>)
				// OR Double character tokens GreaterEquals (>=) and GreaterGreater (>>)
				'>' => match {self.eat(); self.peek()} {
					Some('=') => {self.eat(); TokenKind::GreaterEquals},
					Some('>') => {self.eat(); TokenKind::GreaterGreater},
					_ => TokenKind::Greater
				},

				// Single character token Tilde (~)
				// OR Double character token TildeEquals (~=)
				'~' => match {self.eat(); self.peek()} {
					Some('=') => {self.eat(); TokenKind::TildeEquals},
					_ => TokenKind::Tilde
				},

				// Single character token Slash (/)
				// OR Double character token SlashSlash (//)
				'/' => match {self.eat(); self.peek()} {
					Some('/') => {self.eat(); TokenKind::SlashSlash},
					_ => TokenKind::Slash
				},

				// Single character token Colon (:)
				// OR Double character token ColonColon (::)
				':' => match {self.eat(); self.peek()} {
					Some(':') => {self.eat(); TokenKind::ColonColon},
					_ => TokenKind::Colon
				},

				// Numbers starting with a period (.5)
				// OR Single character token Dot (.)
				// OR Double character token DotDot (..)
				// OR Triple character token DotDotDot (...)
				'.' => match self.source.peek_second() {
					Some('0'..='9') => break self.lex_number(start),
					_ => match {self.eat(); self.peek()} {
						Some('.') => match {self.eat(); self.peek()} {
							Some('.') => {self.eat(); TokenKind::DotDotDot},
							_ => TokenKind::DotDot
						},
						_ => TokenKind::Dot
					}
				},

				// Arithmetic
				'+' => {self.eat(); TokenKind::Plus},
				'*' => {self.eat(); TokenKind::Asterisk},
				'%' => {self.eat(); TokenKind::Percent},
				'^' => {self.eat(); TokenKind::Caret},
				'#' => {self.eat(); TokenKind::Hash},

				// Bitwise
				'&' => {self.eat(); TokenKind::Ampersand},
				'|' => {self.eat(); TokenKind::Pipe},

				// Other
				';' => {self.eat(); TokenKind::Semicolon},
				',' => {self.eat(); TokenKind::Comma},

				// Sectioning
				'(' => {self.eat(); TokenKind::OpenParenthesis},
				')' => {self.eat(); TokenKind::CloseParenthesis},
				'{' => {self.eat(); TokenKind::OpenBrace},
				'}' => {self.eat(); TokenKind::CloseBrace},
				']' => {self.eat(); TokenKind::CloseBracket},

				// Literals
				'"' | '\'' => break self.lex_string(start),
				'0'..='9' => break self.lex_number(start),
				'a'..='z' | 'A'..='Z' | '_' => break self.lex_identifier(start),

				character => {
					self.eat();
					self.report(start, DiagnosticKind::BadCharacter(character));
					TokenKind::BadToken
				}
			};

			break self.token(kind, start, TokenValue::None)
		}
	}
}

/// Iterates over every token before the end of the file.
impl Iterator for Lexer<'_> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		if self.finished {return None}

		let token = self.lex();
		match token.kind {
			TokenKind::EndOfFile => {self.finished = true; None},
			_ => Some(token)
		}
	}
}

fn push_char(string: &mut Vec<u8>, character: char) {
	let mut buffer = [0; 4];
	string.extend_from_slice(character.encode_utf8(&mut buffer).as_bytes())
}

/// Encodes `value` with the original, up to six byte, UTF-8 scheme.
fn push_utf8(string: &mut Vec<u8>, value: u32) {
	if value < 0x80 {return string.push(value as u8)}

	let mut buffer = [0u8; 6];
	let (mut value, mut first_max, mut length) = (value, 0x3Fu32, 0);
	loop {
		length += 1;
		buffer[buffer.len() - length] = 0x80 | (value & 0x3F) as u8;
		value >>= 6;
		first_max >>= 1;
		if value <= first_max {break}
	}
	length += 1;
	buffer[buffer.len() - length] = ((!first_max << 1) | value) as u8;

	string.extend_from_slice(&buffer[buffer.len() - length..])
}

/// Converts the text of a numeral into its value, or `None` if it is
/// malformed.
fn convert_numeral(numeral: &str) -> Option<TokenValue> {
	match numeral.strip_prefix("0x") {
		Some(hexadecimal) => convert_hexadecimal(hexadecimal),
		None if numeral.bytes().all(|byte| byte.is_ascii_digit()) =>
			Some(match numeral.parse() {
				Ok(integer) => TokenValue::Integer(integer),
				// Too large for an integer, so it becomes a float.
				Err(_) => TokenValue::Float(numeral.parse().ok()?)
			}),
		None => numeral.parse().ok().map(TokenValue::Float)
	}
}

/// Converts a hexadecimal numeral, without its `0x` prefix.
///
/// Integers wrap around on overflow. Floats may have a fraction, and a binary
/// exponent introduced by `p`.
fn convert_hexadecimal(numeral: &str) -> Option<TokenValue> {
	let (mantissa, exponent) = match numeral.find(['p', 'P']) {
		Some(index) => (&numeral[..index], Some(&numeral[index + 1..])),
		None => (numeral, None)
	};
	let (whole, fraction) = match mantissa.split_once('.') {
		Some((whole, fraction)) => (whole, Some(fraction)),
		None => (mantissa, None)
	};

	let digits = whole.chars().chain(fraction.unwrap_or("").chars())
		.map(|character| character.to_digit(16))
		.collect::<Option<Vec<_>>>()?;
	if digits.is_empty() {return None}

	if fraction.is_none() && exponent.is_none() {
		let integer = digits.iter()
			.fold(0u64, |integer, &digit| integer.wrapping_mul(16) + u64::from(digit));
		return Some(TokenValue::Integer(integer as i64))
	}

	let mut scale = match exponent {
		Some(exponent) => {
			let (negative, magnitude) = match exponent.as_bytes().first() {
				Some(b'-') => (true, &exponent[1..]),
				Some(b'+') => (false, &exponent[1..]),
				_ => (false, exponent)
			};
			if magnitude.is_empty() || !magnitude.bytes().all(|byte| byte.is_ascii_digit())
				{return None}
			let magnitude = magnitude.parse::<i32>().unwrap_or(i32::MAX / 2);
			if negative {-magnitude} else {magnitude}
		},
		None => 0
	};
	scale = scale.saturating_sub(4 * fraction.map_or(0, str::len) as i32);

	// Only the leading significant digits fit in the mantissa; the rest only
	// affect the scale.
	let mut significand = 0u64;
	for digit in digits {
		if significand >> 56 == 0 {
			significand = significand * 16 + u64::from(digit)
		} else {
			scale = scale.saturating_add(4)
		}
	}

	Some(TokenValue::Float(significand as f64 * 2f64.powi(scale)))
}

/// The payload carried by a [`Token`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
	None,

	/// The value of an [`IntegerConstant`](TokenKind::IntegerConstant).
	Integer(i64),

	/// The value of a [`FloatConstant`](TokenKind::FloatConstant).
	Float(f64),

	/// The decoded bytes of a [`LiteralString`](TokenKind::LiteralString). Lua
	/// strings are byte strings, and need not be valid UTF-8.
	String(Box<[u8]>),

	/// The text of a [`Name`](TokenKind::Name).
	Name(Box<str>)
}

/// A single syntactical unit of Lua code.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	pub location: SequenceRange,
	pub value: TokenValue,

	/// Whether this token was synthesized by error recovery, in place of an
	/// expected token that was absent. Missing tokens are always zero width.
	pub missing: bool
}

impl Token {
	pub fn new(kind: TokenKind, location: SequenceRange, value: TokenValue) -> Self {
		Self {kind, location, value, missing: false}
	}

	/// Creates a zero width placeholder for an expected but absent token.
	pub fn missing(kind: TokenKind, position: SequencePosition) -> Self {
		Self {
			kind,
			location: SequenceRange::empty(position),
			value: TokenValue::None,
			missing: true
		}
	}

	/// The text of this token if it is a name, otherwise an empty string.
	pub fn name(&self) -> &str {
		match &self.value {
			TokenValue::Name(name) => name,
			_ => ""
		}
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		match &self.value {
			TokenValue::None => write!(f, "{}", self.kind),
			TokenValue::Integer(integer) => write!(f, "{}", integer),
			TokenValue::Float(float) => write!(f, "{:?}", float),
			TokenValue::String(string) =>
				write!(f, "{:?}", String::from_utf8_lossy(string)),
			TokenValue::Name(name) => write!(f, "{}", name)
		}
	}
}

/// The kind of a [`Token`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
	/// The end of the source text.
	EndOfFile,

	/// Input that does not form any valid token.
	BadToken,

	// Literals

	/// An identifier, excluding keywords.
	///
	/// Example
	/// -------
	/// Valid Identifiers
	/// - `whatLanguageDo`
	/// - `you_like_better`
	/// - `__luaOr_rust12345`
	///
	/// Invalid Identifiers
	/// - `69imMatureIPromise` - Cannot start with a digit
	/// - `what_am!i_supposed` - Includes a non word character
	Name,

	/// A quoted or long bracketed string.
	LiteralString,

	/// A numeral that fits in a 64 bit integer.
	IntegerConstant,

	/// A numeral with a fraction or exponent, or too large for an integer.
	FloatConstant,

	// Keywords

	/// The `and` keyword.
	And,

	/// The `break` keyword.
	Break,

	/// The `do` keyword.
	Do,

	/// The `else` keyword.
	Else,

	/// The `elseif` keyword.
	ElseIf,

	/// The `end` keyword.
	End,

	/// The `false` keyword.
	False,

	/// The `for` keyword.
	For,

	/// The `function` keyword.
	Function,

	/// The `goto` keyword.
	Goto,

	/// The `if` keyword.
	If,

	/// The `in` keyword.
	In,

	/// The `local` keyword.
	Local,

	/// The `nil` keyword.
	Nil,

	/// The `not` keyword.
	Not,

	/// The `or` keyword.
	Or,

	/// The `repeat` keyword.
	Repeat,

	/// The `return` keyword.
	Return,

	/// The `then` keyword.
	Then,

	/// The `true` keyword.
	True,

	/// The `until` keyword.
	Until,

	/// The `while` keyword.
	While,

	// Arithmetic

	/// The `+` symbol.
	Plus,

	/// The `-` symbol.
	Minus,

	/// The `*` symbol.
	Asterisk,

	/// The `/` symbol.
	Slash,

	/// The `//` symbol.
	SlashSlash,

	/// The `%` symbol.
	Percent,

	/// The `^` symbol.
	Caret,

	/// The `#` symbol.
	Hash,

	// Bitwise

	/// The `&` symbol.
	Ampersand,

	/// The `~` symbol.
	Tilde,

	/// The `|` symbol.
	Pipe,

	/// The `<<` symbol.
	LessLess,

	/// The `>>` symbol.
	GreaterGreater,

	// Relational

	/// The `==` symbol.
	EqualsEquals,

	/// The `~=` symbol.
	TildeEquals,

	/// The `<=` symbol.
	LessEquals,

	/// The `>=` symbol.
	GreaterEquals,

	/// The `<` symbol.
	Less,

	/// The `>` symbol.
	Greater,

	// Other

	/// The `=` symbol.
	Equals,

	/// The `::` symbol.
	ColonColon,

	/// The `;` symbol.
	Semicolon,

	/// The `:` symbol.
	Colon,

	/// The `,` symbol.
	Comma,

	/// The `.` symbol.
	Dot,

	/// The `..` symbol.
	DotDot,

	/// The `...` symbol.
	DotDotDot,

	// Sectioning

	/// The `(` symbol.
	OpenParenthesis,

	/// The `)` symbol.
	CloseParenthesis,

	/// The `{` symbol.
	OpenBrace,

	/// The `}` symbol.
	CloseBrace,

	/// The `[` symbol.
	OpenBracket,

	/// The `]` symbol.
	CloseBracket
}

impl TokenKind {
	/// Classifies an identifier as a keyword, if it is one.
	///
	/// No keyword is longer than eight characters, so longer identifiers are
	/// rejected before any comparison.
	pub fn keyword(identifier: &str) -> Option<Self> {
		if identifier.len() > 8 {return None}

		Some(match identifier {
			"and" => Self::And,
			"break" => Self::Break,
			"do" => Self::Do,
			"else" => Self::Else,
			"elseif" => Self::ElseIf,
			"end" => Self::End,
			"false" => Self::False,
			"for" => Self::For,
			"function" => Self::Function,
			"goto" => Self::Goto,
			"if" => Self::If,
			"in" => Self::In,
			"local" => Self::Local,
			"nil" => Self::Nil,
			"not" => Self::Not,
			"or" => Self::Or,
			"repeat" => Self::Repeat,
			"return" => Self::Return,
			"then" => Self::Then,
			"true" => Self::True,
			"until" => Self::Until,
			"while" => Self::While,
			_ => return None
		})
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		f.write_str(match self {
			Self::EndOfFile => "<eof>",
			Self::BadToken => "<bad>",

			// Literals
			Self::Name => "<name>",
			Self::LiteralString => "<string>",
			Self::IntegerConstant => "<integer>",
			Self::FloatConstant => "<float>",

			// Keywords
			Self::And => "and",
			Self::Break => "break",
			Self::Do => "do",
			Self::Else => "else",
			Self::ElseIf => "elseif",
			Self::End => "end",
			Self::False => "false",
			Self::For => "for",
			Self::Function => "function",
			Self::Goto => "goto",
			Self::If => "if",
			Self::In => "in",
			Self::Local => "local",
			Self::Nil => "nil",
			Self::Not => "not",
			Self::Or => "or",
			Self::Repeat => "repeat",
			Self::Return => "return",
			Self::Then => "then",
			Self::True => "true",
			Self::Until => "until",
			Self::While => "while",

			// Arithmetic
			Self::Plus => "+",
			Self::Minus => "-",
			Self::Asterisk => "*",
			Self::Slash => "/",
			Self::SlashSlash => "//",
			Self::Percent => "%",
			Self::Caret => "^",
			Self::Hash => "#",

			// Bitwise
			Self::Ampersand => "&",
			Self::Tilde => "~",
			Self::Pipe => "|",
			Self::LessLess => "<<",
			Self::GreaterGreater => ">>",

			// Relational
			Self::EqualsEquals => "==",
			Self::TildeEquals => "~=",
			Self::LessEquals => "<=",
			Self::GreaterEquals => ">=",
			Self::Less => "<",
			Self::Greater => ">",

			// Other
			Self::Equals => "=",
			Self::ColonColon => "::",
			Self::Semicolon => ";",
			Self::Colon => ":",
			Self::Comma => ",",
			Self::Dot => ".",
			Self::DotDot => "..",
			Self::DotDotDot => "...",

			// Sectioning
			Self::OpenParenthesis => "(",
			Self::CloseParenthesis => ")",
			Self::OpenBrace => "{",
			Self::CloseBrace => "}",
			Self::OpenBracket => "[",
			Self::CloseBracket => "]"
		})
	}
}
