//! The immutable syntax tree produced by the [parser](super::parser).
//!
//! Every node records the [`SequenceRange`] it was parsed from, which runs from
//! its first consumed token to its last. Nodes synthesized by error recovery
//! are zero width.

use crate::{ast::lexer::TokenKind, text::SequenceRange};
use itertools::Itertools;
use std::fmt::{Display, Formatter, Result as FMTResult, Write};

/// An identifier, along with where it was written.
#[derive(Clone, Debug, PartialEq)]
pub struct Name {
	pub value: Box<str>,
	pub location: SequenceRange
}

impl Display for Name {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		write!(f, "{}", self.value)
	}
}

/// A whole source file.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
	pub block: Block,
	pub location: SequenceRange
}

impl Chunk {
	/// Writes this chunk as an indented tree, one node per line.
	pub fn write_to(&self, out: &mut impl Write) -> FMTResult {
		write_tree(out, Node::Chunk(self), "", None)
	}
}

impl Display for Chunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		self.write_to(f)
	}
}

/// A sequence of statements, optionally ended by a return statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
	pub statements: Vec<Statement>,
	pub r#return: Option<ReturnStatement>,
	pub location: SequenceRange
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStatement {
	pub values: Vec<Expression>,
	pub location: SequenceRange
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElseIf {
	pub condition: Expression,
	pub block: Block,
	pub location: SequenceRange
}

/// The name of a function declaration, such as `a.b.c:m`.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionName {
	/// The dotted path, which always has at least one element.
	pub path: Vec<Name>,

	/// The method name following a colon, if any.
	pub method: Option<Name>,

	pub location: SequenceRange
}

impl Display for FunctionName {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		write!(f, "{}", self.path.iter().join("."))?;
		match &self.method {
			Some(method) => write!(f, ":{}", method),
			None => Ok(())
		}
	}
}

/// The parameters and body shared by every kind of function.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionBody {
	pub parameters: Vec<Name>,

	/// Whether the parameter list ends in `...`.
	pub vararg: bool,

	pub block: Block,
	pub location: SequenceRange
}

/// One name of a local declaration, with its attribute, as in `x <const>`.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalDeclaration {
	pub name: Name,
	pub attribute: Option<Name>,
	pub location: SequenceRange
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
	// Assignment

	/// An assignment to one or more variables.
	Assignment {
		/// The assigned variables. Each is a name, index, or dotted access,
		/// unless a diagnostic was reported.
		targets: Vec<Expression>,
		values: Vec<Expression>,
		location: SequenceRange
	},

	/// A local variable declaration, such as `local a <const>, b = 1, 2`.
	Local {
		declarations: Vec<LocalDeclaration>,
		values: Vec<Expression>,
		location: SequenceRange
	},

	/// A function call, used as a statement.
	Call {
		/// Always an [`Expression::Call`].
		call: Expression,
		location: SequenceRange
	},

	// Control

	/// An if statement, with any number of elseif clauses.
	If {
		condition: Expression,
		block: Block,
		else_ifs: Vec<ElseIf>,
		r#else: Option<Block>,
		location: SequenceRange
	},

	While {
		condition: Expression,
		block: Block,
		location: SequenceRange
	},

	/// A repeat loop. The condition can see the locals declared in the block.
	Repeat {
		block: Block,
		condition: Expression,
		location: SequenceRange
	},

	/// A numeric for loop, such as `for i = 1, 10, 2 do end`.
	NumericFor {
		variable: Name,
		initial: Expression,
		limit: Expression,
		step: Option<Expression>,
		block: Block,
		location: SequenceRange
	},

	/// A for in loop.
	GenericFor {
		variables: Vec<Name>,
		values: Vec<Expression>,
		block: Block,
		location: SequenceRange
	},

	Do {
		block: Block,
		location: SequenceRange
	},

	Break {
		location: SequenceRange
	},

	Goto {
		label: Name,
		location: SequenceRange
	},

	Label {
		name: Name,
		location: SequenceRange
	},

	// Functions

	/// A function declaration, such as `function a.b:c() end`.
	Function {
		name: FunctionName,
		body: FunctionBody,
		location: SequenceRange
	},

	LocalFunction {
		name: Name,
		body: FunctionBody,
		location: SequenceRange
	}
}

impl Statement {
	pub fn location(&self) -> SequenceRange {
		match self {
			Self::Assignment {location, ..} | Self::Local {location, ..}
				| Self::Call {location, ..} | Self::If {location, ..}
				| Self::While {location, ..} | Self::Repeat {location, ..}
				| Self::NumericFor {location, ..} | Self::GenericFor {location, ..}
				| Self::Do {location, ..} | Self::Break {location}
				| Self::Goto {location, ..} | Self::Label {location, ..}
				| Self::Function {location, ..}
				| Self::LocalFunction {location, ..} => *location
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
	Nil,
	True,
	False,
	Integer(i64),
	Float(f64),

	/// A string literal's decoded bytes.
	String(Box<[u8]>)
}

impl Display for Literal {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		match self {
			Self::Nil => write!(f, "nil"),
			Self::True => write!(f, "true"),
			Self::False => write!(f, "false"),
			Self::Integer(integer) => write!(f, "{}", integer),
			Self::Float(float) => write!(f, "{:?}", float),
			Self::String(string) => write!(f, "{:?}", String::from_utf8_lossy(string))
		}
	}
}

/// A field of a table constructor.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
	/// A field without a key, such as `{value}`.
	Positional {
		value: Expression,
		location: SequenceRange
	},

	/// A field keyed by an identifier, such as `{name = value}`.
	Named {
		name: Name,
		value: Expression,
		location: SequenceRange
	},

	/// A field keyed by an expression, such as `{[key] = value}`.
	Keyed {
		key: Expression,
		value: Expression,
		location: SequenceRange
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
	// Literals

	Literal {
		value: Literal,
		location: SequenceRange
	},

	/// The `...` expression.
	Vararg {
		location: SequenceRange
	},

	/// A function literal.
	Function {
		body: FunctionBody,
		location: SequenceRange
	},

	/// A table constructor.
	Table {
		fields: Vec<Field>,
		location: SequenceRange
	},

	// Operations

	Unary {
		operator: UnaryOperator,
		operand: Box<Expression>,
		location: SequenceRange
	},

	Binary {
		left: Box<Expression>,
		operator: BinaryOperator,
		right: Box<Expression>,
		location: SequenceRange
	},

	/// An expression wrapped in parentheses, which truncates multiple results
	/// to one, and is never assignable.
	Parenthesized {
		inner: Box<Expression>,
		location: SequenceRange
	},

	/// A call of something, such as `f(a)`, `f "a"`, or `object:method {a}`.
	Call {
		receiver: Box<Expression>,
		method: Option<Name>,
		arguments: Vec<Expression>,
		location: SequenceRange
	},

	// Variables

	/// A reference to a variable.
	Name(Name),

	/// An index operation, such as `a[b]`.
	Index {
		target: Box<Expression>,
		index: Box<Expression>,
		location: SequenceRange
	},

	/// A period index operation, such as `a.b`.
	DottedAccess {
		target: Box<Expression>,
		name: Name,
		location: SequenceRange
	}
}

impl Expression {
	pub fn location(&self) -> SequenceRange {
		match self {
			Self::Name(name) => name.location,
			Self::Literal {location, ..} | Self::Vararg {location}
				| Self::Function {location, ..} | Self::Table {location, ..}
				| Self::Unary {location, ..} | Self::Binary {location, ..}
				| Self::Parenthesized {location, ..} | Self::Call {location, ..}
				| Self::Index {location, ..}
				| Self::DottedAccess {location, ..} => *location
		}
	}

	/// Whether this expression can be assigned to.
	pub fn is_variable(&self) -> bool {
		matches!(self, Self::Name(_) | Self::Index {..} | Self::DottedAccess {..})
	}
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOperator {
	// Arithmetic
	Add,
	Subtract,
	Multiply,
	Divide,
	FloorDivide,
	Modulo,
	Exponent,

	// Bitwise
	BitwiseAnd,
	BitwiseOr,
	BitwiseXOr,
	ShiftLeft,
	ShiftRight,

	// Relational
	Equal,
	NotEqual,
	LessThan,
	LessThanOrEqual,
	GreaterThan,
	GreaterThanOrEqual,

	// Logical
	LogicalAnd,
	LogicalOr,

	// Other
	Concat
}

impl BinaryOperator {
	pub fn from_token(kind: TokenKind) -> Option<Self> {
		Some(match kind {
			TokenKind::Plus => Self::Add,
			TokenKind::Minus => Self::Subtract,
			TokenKind::Asterisk => Self::Multiply,
			TokenKind::Slash => Self::Divide,
			TokenKind::SlashSlash => Self::FloorDivide,
			TokenKind::Percent => Self::Modulo,
			TokenKind::Caret => Self::Exponent,
			TokenKind::Ampersand => Self::BitwiseAnd,
			TokenKind::Pipe => Self::BitwiseOr,
			TokenKind::Tilde => Self::BitwiseXOr,
			TokenKind::LessLess => Self::ShiftLeft,
			TokenKind::GreaterGreater => Self::ShiftRight,
			TokenKind::EqualsEquals => Self::Equal,
			TokenKind::TildeEquals => Self::NotEqual,
			TokenKind::Less => Self::LessThan,
			TokenKind::LessEquals => Self::LessThanOrEqual,
			TokenKind::Greater => Self::GreaterThan,
			TokenKind::GreaterEquals => Self::GreaterThanOrEqual,
			TokenKind::And => Self::LogicalAnd,
			TokenKind::Or => Self::LogicalOr,
			TokenKind::DotDot => Self::Concat,
			_ => return None
		})
	}

	/// How tightly this operator binds; higher binds tighter.
	pub fn precedence(self) -> u8 {
		match self {
			Self::Exponent => 12,
			Self::Multiply | Self::Divide | Self::FloorDivide | Self::Modulo => 10,
			Self::Add | Self::Subtract => 9,
			Self::Concat => 8,
			Self::ShiftLeft | Self::ShiftRight => 7,
			Self::BitwiseAnd => 6,
			Self::BitwiseXOr => 5,
			Self::BitwiseOr => 4,
			Self::Equal | Self::NotEqual | Self::LessThan | Self::LessThanOrEqual
				| Self::GreaterThan | Self::GreaterThanOrEqual => 3,
			Self::LogicalAnd => 2,
			Self::LogicalOr => 1
		}
	}

	pub fn is_right_associative(self) -> bool {
		matches!(self, Self::Exponent | Self::Concat)
	}
}

impl Display for BinaryOperator {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		f.write_str(match self {
			// Arithmetic
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
			Self::FloorDivide => "//",
			Self::Modulo => "%",
			Self::Exponent => "^",

			// Bitwise
			Self::BitwiseAnd => "&",
			Self::BitwiseOr => "|",
			Self::BitwiseXOr => "~",
			Self::ShiftLeft => "<<",
			Self::ShiftRight => ">>",

			// Relational
			Self::Equal => "==",
			Self::NotEqual => "~=",
			Self::LessThan => "<",
			Self::LessThanOrEqual => "<=",
			Self::GreaterThan => ">",
			Self::GreaterThanOrEqual => ">=",

			// Logical
			Self::LogicalAnd => "and",
			Self::LogicalOr => "or",

			// Other
			Self::Concat => ".."
		})
	}
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UnaryOperator {
	Negate,
	BitwiseNot,
	LogicalNot,
	Length
}

impl UnaryOperator {
	/// Unary operators all bind tighter than every binary operator but `^`.
	pub const PRECEDENCE: u8 = 11;

	pub fn from_token(kind: TokenKind) -> Option<Self> {
		Some(match kind {
			TokenKind::Minus => Self::Negate,
			TokenKind::Tilde => Self::BitwiseNot,
			TokenKind::Not => Self::LogicalNot,
			TokenKind::Hash => Self::Length,
			_ => return None
		})
	}
}

impl Display for UnaryOperator {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		f.write_str(match self {
			Self::Negate => "-",
			Self::BitwiseNot => "~",
			Self::LogicalNot => "not",
			Self::Length => "#"
		})
	}
}

/// A borrowed view of any syntax node, used to walk the tree generically.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
	Chunk(&'a Chunk),
	Block(&'a Block),
	Statement(&'a Statement),
	Return(&'a ReturnStatement),
	ElseIf(&'a ElseIf),
	Else(&'a Block),
	Expression(&'a Expression),
	Field(&'a Field),
	FunctionName(&'a FunctionName),
	FunctionBody(&'a FunctionBody),
	LocalDeclaration(&'a LocalDeclaration),
	Name(&'a Name)
}

impl<'a> Node<'a> {
	pub fn location(&self) -> SequenceRange {
		match self {
			Self::Chunk(chunk) => chunk.location,
			Self::Block(block) | Self::Else(block) => block.location,
			Self::Statement(statement) => statement.location(),
			Self::Return(r#return) => r#return.location,
			Self::ElseIf(else_if) => else_if.location,
			Self::Expression(expression) => expression.location(),
			Self::Field(Field::Positional {location, ..} | Field::Named {location, ..}
				| Field::Keyed {location, ..}) => *location,
			Self::FunctionName(name) => name.location,
			Self::FunctionBody(body) => body.location,
			Self::LocalDeclaration(declaration) => declaration.location,
			Self::Name(name) => name.location
		}
	}

	/// The direct children of this node, in source order.
	pub fn children(&self) -> Vec<Node<'a>> {
		fn expressions(expressions: &[Expression]) -> impl Iterator<Item = Node<'_>> {
			expressions.iter().map(Node::Expression)
		}

		match *self {
			Self::Chunk(chunk) => vec![Node::Block(&chunk.block)],
			Self::Block(block) | Self::Else(block) => block.statements.iter()
				.map(Node::Statement)
				.chain(block.r#return.iter().map(Node::Return))
				.collect(),
			Self::Return(r#return) => expressions(&r#return.values).collect(),
			Self::ElseIf(else_if) =>
				vec![Node::Expression(&else_if.condition), Node::Block(&else_if.block)],

			Self::Statement(statement) => match statement {
				Statement::Assignment {targets, values, ..} =>
					expressions(targets).chain(expressions(values)).collect(),
				Statement::Local {declarations, values, ..} => declarations.iter()
					.map(Node::LocalDeclaration)
					.chain(expressions(values))
					.collect(),
				Statement::Call {call, ..} => vec![Node::Expression(call)],
				Statement::If {condition, block, else_ifs, r#else, ..} =>
					[Node::Expression(condition), Node::Block(block)].into_iter()
						.chain(else_ifs.iter().map(Node::ElseIf))
						.chain(r#else.iter().map(Node::Else))
						.collect(),
				Statement::While {condition, block, ..} =>
					vec![Node::Expression(condition), Node::Block(block)],
				Statement::Repeat {block, condition, ..} =>
					vec![Node::Block(block), Node::Expression(condition)],
				Statement::NumericFor {variable, initial, limit, step, block, ..} =>
					[Node::Name(variable), Node::Expression(initial), Node::Expression(limit)]
						.into_iter()
						.chain(step.iter().map(Node::Expression))
						.chain(Some(Node::Block(block)))
						.collect(),
				Statement::GenericFor {variables, values, block, ..} => variables.iter()
					.map(Node::Name)
					.chain(expressions(values))
					.chain(Some(Node::Block(block)))
					.collect(),
				Statement::Do {block, ..} => vec![Node::Block(block)],
				Statement::Break {..} => Vec::new(),
				Statement::Goto {label, ..} => vec![Node::Name(label)],
				Statement::Label {name, ..} => vec![Node::Name(name)],
				Statement::Function {name, body, ..} =>
					vec![Node::FunctionName(name), Node::FunctionBody(body)],
				Statement::LocalFunction {name, body, ..} =>
					vec![Node::Name(name), Node::FunctionBody(body)]
			},

			Self::Expression(expression) => match expression {
				Expression::Literal {..} | Expression::Vararg {..}
					| Expression::Name(_) => Vec::new(),
				Expression::Function {body, ..} => vec![Node::FunctionBody(body)],
				Expression::Table {fields, ..} => fields.iter().map(Node::Field).collect(),
				Expression::Unary {operand, ..} => vec![Node::Expression(operand)],
				Expression::Binary {left, right, ..} =>
					vec![Node::Expression(left), Node::Expression(right)],
				Expression::Parenthesized {inner, ..} => vec![Node::Expression(inner)],
				Expression::Call {receiver, arguments, ..} =>
					Some(Node::Expression(&**receiver)).into_iter()
						.chain(expressions(arguments))
						.collect(),
				Expression::Index {target, index, ..} =>
					vec![Node::Expression(target), Node::Expression(index)],
				Expression::DottedAccess {target, ..} => vec![Node::Expression(target)]
			},

			Self::Field(field) => match field {
				Field::Positional {value, ..} | Field::Named {value, ..} =>
					vec![Node::Expression(value)],
				Field::Keyed {key, value, ..} =>
					vec![Node::Expression(key), Node::Expression(value)]
			},

			Self::FunctionBody(body) => body.parameters.iter()
				.map(Node::Name)
				.chain(Some(Node::Block(&body.block)))
				.collect(),

			Self::FunctionName(_) | Self::LocalDeclaration(_) | Self::Name(_) =>
				Vec::new()
		}
	}
}

/// Writes a node's label, such as `BinaryExpression + 0..5`.
impl Display for Node<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		match self {
			Self::Chunk(_) => write!(f, "Chunk"),
			Self::Block(_) => write!(f, "Block"),
			Self::Else(_) => write!(f, "ElseClause"),
			Self::Return(_) => write!(f, "ReturnStatement"),
			Self::ElseIf(_) => write!(f, "ElseIfClause"),

			Self::Statement(statement) => f.write_str(match statement {
				Statement::Assignment {..} => "AssignmentStatement",
				Statement::Local {..} => "LocalStatement",
				Statement::Call {..} => "CallStatement",
				Statement::If {..} => "IfStatement",
				Statement::While {..} => "WhileStatement",
				Statement::Repeat {..} => "RepeatStatement",
				Statement::NumericFor {..} => "NumericForStatement",
				Statement::GenericFor {..} => "GenericForStatement",
				Statement::Do {..} => "DoStatement",
				Statement::Break {..} => "BreakStatement",
				Statement::Goto {..} => "GotoStatement",
				Statement::Label {..} => "LabelStatement",
				Statement::Function {..} => "FunctionStatement",
				Statement::LocalFunction {..} => "LocalFunctionStatement"
			}),

			Self::Expression(expression) => match expression {
				Expression::Literal {value, ..} => write!(f, "LiteralExpression {}", value),
				Expression::Vararg {..} => write!(f, "VarargExpression"),
				Expression::Function {..} => write!(f, "FunctionExpression"),
				Expression::Table {..} => write!(f, "TableExpression"),
				Expression::Unary {operator, ..} => write!(f, "UnaryExpression {}", operator),
				Expression::Binary {operator, ..} =>
					write!(f, "BinaryExpression {}", operator),
				Expression::Parenthesized {..} => write!(f, "ParenthesizedExpression"),
				Expression::Call {method: Some(method), ..} =>
					write!(f, "CallExpression :{}", method),
				Expression::Call {method: None, ..} => write!(f, "CallExpression"),
				Expression::Name(name) => write!(f, "NameExpression {}", name),
				Expression::Index {..} => write!(f, "IndexExpression"),
				Expression::DottedAccess {name, ..} =>
					write!(f, "DottedAccessExpression .{}", name)
			},

			Self::Field(Field::Positional {..}) => write!(f, "PositionalField"),
			Self::Field(Field::Named {name, ..}) => write!(f, "NamedField {}", name),
			Self::Field(Field::Keyed {..}) => write!(f, "KeyedField"),

			Self::FunctionName(name) => write!(f, "FunctionName {}", name),
			Self::FunctionBody(body) => write!(f, "FunctionBody{}",
				if body.vararg {" ..."} else {""}),
			Self::LocalDeclaration(LocalDeclaration {name, attribute: Some(attribute), ..}) =>
				write!(f, "LocalDeclaration {} <{}>", name, attribute),
			Self::LocalDeclaration(LocalDeclaration {name, attribute: None, ..}) =>
				write!(f, "LocalDeclaration {}", name),
			Self::Name(name) => write!(f, "Name {}", name)
		}?;

		write!(f, " {}", self.location())
	}
}

/// Writes `node` and its descendants depth first, drawing the branches that
/// connect them.
fn write_tree<W>(out: &mut W, node: Node, prefix: &str, last: Option<bool>)
		-> FMTResult where W: Write {
	let prefix = match last {
		None => {writeln!(out, "{}", node)?; String::new()},
		Some(last) => {
			let (branch, indent) = if last {("└── ", "    ")} else {("├── ", "│   ")};
			writeln!(out, "{}{}{}", prefix, branch, node)?;
			format!("{}{}", prefix, indent)
		}
	};

	let children = node.children();
	let count = children.len();
	children.into_iter().enumerate()
		.try_for_each(|(index, child)| write_tree(out, child, &prefix, Some(index + 1 == count)))
}
