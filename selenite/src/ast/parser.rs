use self::super::{
	lexer::{Lexer, Token, TokenKind, TokenValue},
	syntax::{
		BinaryOperator, Block, Chunk, ElseIf, Expression, Field, FunctionBody,
		FunctionName, Literal, LocalDeclaration, Name, ReturnStatement, Statement,
		UnaryOperator
	}
};
use crate::{
	diagnostic::{DiagnosticBag, DiagnosticKind},
	text::{SequencePosition, SequenceRange, SourceText}
};
use std::mem::replace;

/*
	Operator Precedence

	or
	and
	< > <= >= ~= ==
	|
	~
	&
	<< >>
	.. (right)
	+ -
	* / // %
	not # - ~
	^ (right)
*/

/// What a prefix expression turned out to be, once all of its suffixes were
/// consumed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrefixShape {
	/// A bare `(exp)`, which is neither callable as a statement nor assignable.
	Parenthesized,

	/// A name, index, or dotted access.
	Variable,

	/// A function or method call.
	Call
}

/// A single pass, recursive descent parser over the tokens of a [`Lexer`].
///
/// Like the lexer, the parser never fails. Unexpected input is reported to the
/// lexer's [`DiagnosticBag`], and missing tokens are synthesized so that a
/// complete tree is always produced.
pub struct Parser<'s> {
	lexer: Lexer<'s>,
	current: Token,
	peek: Option<Token>,

	/// The end of the last consumed (or synthesized) token.
	previous_end: SequencePosition
}

/// The private Parser API.
///
/// Includes many convenience methods for internal implementation.
impl<'s> Parser<'s> {
	/// Consumes the current token, returning it.
	fn eat(&mut self) -> Token {
		let next = match self.peek.take() {
			Some(token) => token,
			None => self.lexer.lex()
		};

		self.previous_end = self.previous_end.max(self.current.location.end);
		replace(&mut self.current, next)
	}

	/// Consumes the current token if it is of the given kind.
	fn eat_if(&mut self, kind: TokenKind) -> Option<Token> {
		if self.current.kind == kind {Some(self.eat())} else {None}
	}

	fn kind(&self) -> TokenKind {
		self.current.kind
	}

	/// The kind of the token after the current one.
	fn peek_kind(&mut self) -> TokenKind {
		let lexer = &mut self.lexer;
		self.peek.get_or_insert_with(|| lexer.lex()).kind
	}

	fn start(&self) -> SequencePosition {
		self.current.location.start
	}

	/// The range from `start` to the end of the last consumed token.
	fn range_from(&self, start: SequencePosition) -> SequenceRange {
		SequenceRange::new(start, self.previous_end.max(start))
	}

	/// Reports a diagnostic, unless one was just reported for the very same
	/// range, so that a single bad token does not cascade.
	fn report(&mut self, location: SequenceRange, kind: DiagnosticKind) {
		let diagnostics = self.lexer.diagnostics_mut();
		if diagnostics.last().map_or(false, |last| last.location == location) {return}
		diagnostics.report(location, kind)
	}

	/// Synthesizes a zero width token at the current position, without
	/// consuming anything.
	fn missing(&mut self, kind: TokenKind) -> Token {
		let position = self.start().max(self.previous_end);
		self.previous_end = position;
		log::trace!("synthesized missing {:?} at {}", kind, position.offset());
		Token::missing(kind, position)
	}

	/// Consumes a token of the given kind, or reports a diagnostic and
	/// synthesizes one if the current token is anything else.
	fn match_token(&mut self, kind: TokenKind) -> Token {
		if let Some(token) = self.eat_if(kind) {return token}

		let actual = self.kind();
		self.report(self.current.location, DiagnosticKind::UnexpectedToken {expected: kind, actual});
		self.missing(kind)
	}

	fn name(&mut self) -> Name {
		let token = self.match_token(TokenKind::Name);
		let value = match token.value {
			TokenValue::Name(name) => name,
			_ => "".into()
		};

		Name {value, location: token.location}
	}

	fn expression_list(&mut self) -> Vec<Expression> {
		let mut expressions = vec![self.parse_expression()];
		while self.eat_if(TokenKind::Comma).is_some()
			{expressions.push(self.parse_expression())}
		expressions
	}

	/// Whether a token may start a statement, or end a block.
	fn starts_statement(kind: TokenKind) -> bool {
		matches!(kind, TokenKind::Name | TokenKind::OpenParenthesis | TokenKind::Semicolon
			| TokenKind::If | TokenKind::While | TokenKind::Do | TokenKind::For
			| TokenKind::Repeat | TokenKind::Function | TokenKind::Local | TokenKind::Return
			| TokenKind::Goto | TokenKind::Break | TokenKind::ColonColon | TokenKind::End
			| TokenKind::Until | TokenKind::Else | TokenKind::ElseIf | TokenKind::EndOfFile)
	}

	/// Whether the current token ends a block.
	fn at_block_end(&self) -> bool {
		matches!(self.kind(), TokenKind::EndOfFile | TokenKind::End | TokenKind::Until
			| TokenKind::Else | TokenKind::ElseIf)
	}
}

/// The public Parser API.
impl<'s> Parser<'s> {
	pub fn new(text: &'s SourceText) -> Self {
		let mut lexer = Lexer::new(text);
		let current = lexer.lex();
		Self {lexer, current, peek: None, previous_end: text.start()}
	}

	/// Hands over every diagnostic reported so far, lexical and syntactic.
	pub fn into_diagnostics(self) -> DiagnosticBag {
		self.lexer.into_diagnostics()
	}

	/// Parses a whole source file.
	///
	/// Tokens left over after the top level block are reported, and parsing
	/// resumes after them, so that later errors surface too.
	pub fn parse_chunk(&mut self) -> Chunk {
		let mut block = self.parse_block();

		while self.kind() != TokenKind::EndOfFile {
			let actual = self.kind();
			self.report(self.current.location,
				DiagnosticKind::UnexpectedToken {expected: TokenKind::EndOfFile, actual});
			self.eat();

			let rest = self.parse_block();
			block.statements.extend(rest.statements);
			block.r#return = block.r#return.or(rest.r#return);
			block.location = self.range_from(block.location.start);
		}

		let location = SequenceRange::new(SequencePosition::default(), self.current.location.end);
		Chunk {block, location}
	}

	/// Parses statements until the end of a block, including its optional
	/// return statement.
	pub fn parse_block(&mut self) -> Block {
		let start = self.start();
		let mut statements = Vec::new();

		let r#return = loop {
			match self.kind() {
				_ if self.at_block_end() => break None,
				TokenKind::Return => break Some(self.parse_return()),
				TokenKind::Semicolon => {self.eat();},
				_ => {
					let before = self.start();
					if let Some(statement) = self.parse_statement() {statements.push(statement)}

					if self.start() == before && self.kind() != TokenKind::EndOfFile {
						log::trace!("forcing progress past {:?} at {}", self.kind(), before.offset());
						self.eat();
					}
				}
			}
		};

		// An empty block sits right after whatever opened it.
		let location = match self.start() == start {
			true => SequenceRange::empty(self.previous_end.min(start)),
			false => self.range_from(start)
		};
		Block {statements, r#return, location}
	}

	fn parse_return(&mut self) -> ReturnStatement {
		let start = self.start();
		self.match_token(TokenKind::Return);

		let values = match self.kind() {
			_ if self.at_block_end() => Vec::new(),
			TokenKind::Semicolon => Vec::new(),
			_ => self.expression_list()
		};
		self.eat_if(TokenKind::Semicolon);

		ReturnStatement {values, location: self.range_from(start)}
	}

	/// Parses a single statement, or returns `None` after skipping tokens that
	/// cannot start one.
	pub fn parse_statement(&mut self) -> Option<Statement> {
		let start = self.start();

		Some(match self.kind() {
			TokenKind::If => self.parse_if(),
			TokenKind::For => self.parse_for(),
			TokenKind::Function => self.parse_function_statement(),
			TokenKind::Local => self.parse_local(),
			TokenKind::Name | TokenKind::OpenParenthesis => self.parse_expression_statement(),

			// while condition do block end
			TokenKind::While => {
				self.eat();
				let condition = self.parse_expression();
				self.match_token(TokenKind::Do);
				let block = self.parse_block();
				self.match_token(TokenKind::End);

				Statement::While {condition, block, location: self.range_from(start)}
			},

			// repeat block until condition
			TokenKind::Repeat => {
				self.eat();
				let block = self.parse_block();
				self.match_token(TokenKind::Until);
				let condition = self.parse_expression();

				Statement::Repeat {block, condition, location: self.range_from(start)}
			},

			// do block end
			TokenKind::Do => {
				self.eat();
				let block = self.parse_block();
				self.match_token(TokenKind::End);

				Statement::Do {block, location: self.range_from(start)}
			},

			// ::name::
			TokenKind::ColonColon => {
				self.eat();
				let name = self.name();
				self.match_token(TokenKind::ColonColon);

				Statement::Label {name, location: self.range_from(start)}
			},

			// goto name
			TokenKind::Goto => {
				self.eat();
				let label = self.name();

				Statement::Goto {label, location: self.range_from(start)}
			},

			// break
			TokenKind::Break => {
				self.eat();
				Statement::Break {location: self.range_from(start)}
			},

			// Skips ahead to something that looks like a statement.
			actual => {
				self.report(self.current.location, DiagnosticKind::ExpectedExpression {actual});
				self.eat();
				while !Self::starts_statement(self.kind()) {self.eat();}
				return None
			}
		})
	}

	fn parse_if(&mut self) -> Statement {
		let start = self.start();
		self.match_token(TokenKind::If);
		let condition = self.parse_expression();
		self.match_token(TokenKind::Then);
		let block = self.parse_block();

		let mut else_ifs = Vec::new();
		while self.kind() == TokenKind::ElseIf {
			let start = self.start();
			self.eat();
			let condition = self.parse_expression();
			self.match_token(TokenKind::Then);
			let block = self.parse_block();

			else_ifs.push(ElseIf {condition, block, location: self.range_from(start)})
		}

		let r#else = match self.eat_if(TokenKind::Else) {
			Some(_) => Some(self.parse_block()),
			None => None
		};
		self.match_token(TokenKind::End);

		Statement::If {condition, block, else_ifs, r#else, location: self.range_from(start)}
	}

	fn parse_for(&mut self) -> Statement {
		let start = self.start();
		self.match_token(TokenKind::For);
		let first = self.name();

		match self.kind() {
			// for name = initial, limit[, step] do block end
			TokenKind::Equals => {
				self.eat();
				let initial = self.parse_expression();
				self.match_token(TokenKind::Comma);
				let limit = self.parse_expression();
				let step = match self.eat_if(TokenKind::Comma) {
					Some(_) => Some(self.parse_expression()),
					None => None
				};
				self.match_token(TokenKind::Do);
				let block = self.parse_block();
				self.match_token(TokenKind::End);

				Statement::NumericFor {
					variable: first, initial, limit, step, block,
					location: self.range_from(start)
				}
			},

			// for name, ... in values do block end
			_ => {
				let mut variables = vec![first];
				while self.eat_if(TokenKind::Comma).is_some() {variables.push(self.name())}
				self.match_token(TokenKind::In);
				let values = self.expression_list();
				self.match_token(TokenKind::Do);
				let block = self.parse_block();
				self.match_token(TokenKind::End);

				Statement::GenericFor {variables, values, block, location: self.range_from(start)}
			}
		}
	}

	fn parse_function_statement(&mut self) -> Statement {
		let start = self.start();
		self.match_token(TokenKind::Function);

		let name_start = self.start();
		let mut path = vec![self.name()];
		while self.eat_if(TokenKind::Dot).is_some() {path.push(self.name())}
		let method = match self.eat_if(TokenKind::Colon) {
			Some(_) => Some(self.name()),
			None => None
		};
		let name = FunctionName {path, method, location: self.range_from(name_start)};

		let body = self.parse_function_body();
		Statement::Function {name, body, location: self.range_from(start)}
	}

	fn parse_local(&mut self) -> Statement {
		let start = self.start();
		self.match_token(TokenKind::Local);

		// local function name body
		if self.eat_if(TokenKind::Function).is_some() {
			let name = self.name();
			let body = self.parse_function_body();
			return Statement::LocalFunction {name, body, location: self.range_from(start)}
		}

		// local name [<attribute>], ... [= values]
		let mut declarations = Vec::new();
		loop {
			let start = self.start();
			let name = self.name();
			let attribute = match self.eat_if(TokenKind::Less) {
				Some(_) => {
					let attribute = self.name();
					self.match_token(TokenKind::Greater);
					Some(attribute)
				},
				None => None
			};
			declarations.push(LocalDeclaration {name, attribute, location: self.range_from(start)});

			if self.eat_if(TokenKind::Comma).is_none() {break}
		}

		let values = match self.eat_if(TokenKind::Equals) {
			Some(_) => self.expression_list(),
			None => Vec::new()
		};

		Statement::Local {declarations, values, location: self.range_from(start)}
	}

	/// Parses a call statement, or an assignment.
	fn parse_expression_statement(&mut self) -> Statement {
		let start = self.start();
		let (expression, shape) = self.parse_prefix_expression();
		if let PrefixShape::Call = shape
			{return Statement::Call {call: expression, location: self.range_from(start)}}

		let mut targets = vec![self.assignment_target(expression)];
		while self.eat_if(TokenKind::Comma).is_some() {
			let (target, _) = self.parse_prefix_expression();
			targets.push(self.assignment_target(target));
		}

		self.match_token(TokenKind::Equals);
		let values = self.expression_list();

		Statement::Assignment {targets, values, location: self.range_from(start)}
	}

	/// Reports `target` if it cannot be assigned to. The target is kept either
	/// way.
	fn assignment_target(&mut self, target: Expression) -> Expression {
		if !target.is_variable()
			{self.report(target.location(), DiagnosticKind::InvalidAssignmentTarget)}
		target
	}

	/// Parses a parameter list and block, starting at the opening parenthesis,
	/// and ending with `end`.
	fn parse_function_body(&mut self) -> FunctionBody {
		let start = self.start();
		self.match_token(TokenKind::OpenParenthesis);

		let (mut parameters, mut vararg) = (Vec::new(), false);
		if self.kind() != TokenKind::CloseParenthesis {
			loop {
				match self.eat_if(TokenKind::DotDotDot) {
					Some(_) => {vararg = true; break},
					None => parameters.push(self.name())
				}

				if self.eat_if(TokenKind::Comma).is_none() {break}
			}
		}

		self.match_token(TokenKind::CloseParenthesis);
		let block = self.parse_block();
		self.match_token(TokenKind::End);

		FunctionBody {parameters, vararg, block, location: self.range_from(start)}
	}

	/// Parses an expression.
	pub fn parse_expression(&mut self) -> Expression {
		self.parse_binary_expression(0)
	}

	/// Parses an expression whose binary operators all bind tighter than
	/// `parent`, by precedence climbing.
	fn parse_binary_expression(&mut self, parent: u8) -> Expression {
		let start = self.start();
		let mut left = match UnaryOperator::from_token(self.kind()) {
			Some(operator) => {
				self.eat();
				let operand = self.parse_binary_expression(UnaryOperator::PRECEDENCE);

				Expression::Unary {
					operator,
					operand: Box::new(operand),
					location: self.range_from(start)
				}
			},
			None => self.parse_primary_expression()
		};

		while let Some(operator) = BinaryOperator::from_token(self.kind()) {
			let precedence = operator.precedence();
			// Note the right associativity of `^` and `..`.
			if precedence < parent || (precedence == parent && !operator.is_right_associative())
				{break}

			self.eat();
			let right = self.parse_binary_expression(precedence);
			left = Expression::Binary {
				left: Box::new(left),
				operator,
				right: Box::new(right),
				location: self.range_from(start)
			};
		}

		left
	}

	fn parse_primary_expression(&mut self) -> Expression {
		let start = self.start();

		match self.kind() {
			TokenKind::Nil | TokenKind::True | TokenKind::False | TokenKind::IntegerConstant
				| TokenKind::FloatConstant | TokenKind::LiteralString => self.parse_literal(),

			TokenKind::DotDotDot => {
				self.eat();
				Expression::Vararg {location: self.range_from(start)}
			},

			TokenKind::Function => {
				self.eat();
				let body = self.parse_function_body();
				Expression::Function {body, location: self.range_from(start)}
			},

			TokenKind::OpenBrace => self.parse_table(),

			_ => self.parse_prefix_expression().0
		}
	}

	/// Consumes a literal token as an expression.
	fn parse_literal(&mut self) -> Expression {
		let token = self.eat();
		let value = match (token.kind, token.value) {
			(TokenKind::True, _) => Literal::True,
			(TokenKind::False, _) => Literal::False,
			(_, TokenValue::Integer(integer)) => Literal::Integer(integer),
			(_, TokenValue::Float(float)) => Literal::Float(float),
			(_, TokenValue::String(string)) => Literal::String(string),
			_ => Literal::Nil
		};

		Expression::Literal {value, location: token.location}
	}

	/// Parses a prefix expression: a name or parenthesized expression, followed
	/// by any number of indexes and calls.
	///
	/// This never backtracks; the returned shape tells the caller what was
	/// parsed, for deciding between a call statement and an assignment.
	pub fn parse_prefix_expression(&mut self) -> (Expression, PrefixShape) {
		let start = self.start();

		let (mut expression, mut shape) = match self.kind() {
			TokenKind::Name => (Expression::Name(self.name()), PrefixShape::Variable),

			TokenKind::OpenParenthesis => {
				self.eat();
				let inner = self.parse_expression();
				self.match_token(TokenKind::CloseParenthesis);

				let location = self.range_from(start);
				(Expression::Parenthesized {inner: Box::new(inner), location},
					PrefixShape::Parenthesized)
			},

			actual => {
				self.report(self.current.location, DiagnosticKind::ExpectedExpression {actual});
				let token = self.missing(TokenKind::Name);
				let name = Name {value: "".into(), location: token.location};
				(Expression::Name(name), PrefixShape::Variable)
			}
		};

		loop {
			expression = match self.kind() {
				// .name
				TokenKind::Dot => {
					self.eat();
					let name = self.name();
					shape = PrefixShape::Variable;

					Expression::DottedAccess {
						target: Box::new(expression),
						name,
						location: self.range_from(start)
					}
				},

				// [index]
				TokenKind::OpenBracket => {
					self.eat();
					let index = self.parse_expression();
					self.match_token(TokenKind::CloseBracket);
					shape = PrefixShape::Variable;

					Expression::Index {
						target: Box::new(expression),
						index: Box::new(index),
						location: self.range_from(start)
					}
				},

				// :method arguments
				TokenKind::Colon => {
					self.eat();
					let method = self.name();
					let arguments = self.parse_arguments();
					shape = PrefixShape::Call;

					Expression::Call {
						receiver: Box::new(expression),
						method: Some(method),
						arguments,
						location: self.range_from(start)
					}
				},

				// (arguments) "string" {table}
				TokenKind::OpenParenthesis | TokenKind::LiteralString | TokenKind::OpenBrace => {
					let arguments = self.parse_arguments();
					shape = PrefixShape::Call;

					Expression::Call {
						receiver: Box::new(expression),
						method: None,
						arguments,
						location: self.range_from(start)
					}
				},

				_ => break (expression, shape)
			}
		}
	}

	fn parse_arguments(&mut self) -> Vec<Expression> {
		match self.kind() {
			TokenKind::LiteralString => vec![self.parse_literal()],
			TokenKind::OpenBrace => vec![self.parse_table()],
			_ => {
				self.match_token(TokenKind::OpenParenthesis);
				let arguments = match self.kind() {
					TokenKind::CloseParenthesis => Vec::new(),
					_ => self.expression_list()
				};
				self.match_token(TokenKind::CloseParenthesis);
				arguments
			}
		}
	}

	/// Parses a table constructor.
	fn parse_table(&mut self) -> Expression {
		let start = self.start();
		self.match_token(TokenKind::OpenBrace);

		let mut fields = Vec::new();
		while !matches!(self.kind(), TokenKind::CloseBrace | TokenKind::EndOfFile) {
			let start = self.start();
			let named = self.kind() == TokenKind::Name && self.peek_kind() == TokenKind::Equals;

			fields.push(match self.kind() {
				// [key] = value
				TokenKind::OpenBracket => {
					self.eat();
					let key = self.parse_expression();
					self.match_token(TokenKind::CloseBracket);
					self.match_token(TokenKind::Equals);
					let value = self.parse_expression();

					Field::Keyed {key, value, location: self.range_from(start)}
				},

				// name = value
				TokenKind::Name if named => {
					let name = self.name();
					self.eat();
					let value = self.parse_expression();

					Field::Named {name, value, location: self.range_from(start)}
				},

				// value
				_ => {
					let value = self.parse_expression();
					Field::Positional {value, location: self.range_from(start)}
				}
			});

			match self.kind() {
				TokenKind::Comma | TokenKind::Semicolon => {self.eat();},
				_ => break
			}
		}

		self.match_token(TokenKind::CloseBrace);
		Expression::Table {fields, location: self.range_from(start)}
	}
}
