//! The bound tree: a syntax tree with every name resolved to a symbol.
//!
//! Variables are [`LocalSymbol`]s, globals are explicit indexes of `_ENV`,
//! `break` is a goto, and function declarations are plain assignments. The
//! [`Goto`](BoundStatement::Goto),
//! [`ConditionalGoto`](BoundStatement::ConditionalGoto) and
//! [`Label`](BoundStatement::Label) statements are all that remain of control
//! flow once a tree is [lowered](crate::lower).

use self::super::symbol::{LabelSymbol, LocalSymbol};
use crate::{
	ast::{lexer::TokenKind, syntax::{BinaryOperator, Literal, UnaryOperator}},
	diagnostic::Diagnostic
};
use itertools::Itertools;
use std::fmt::{Display, Formatter, Result as FMTResult};

/// A bound source file, along with every diagnostic reported while lexing,
/// parsing, and binding it.
#[derive(Clone, Debug)]
pub struct BoundChunk {
	pub body: BoundBlock,
	pub diagnostics: Vec<Diagnostic>
}

impl Display for BoundChunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		self.body.fmt(f)
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundBlock {
	pub statements: Vec<BoundStatement>
}

impl BoundBlock {
	pub fn new(statements: Vec<BoundStatement>) -> Self {
		Self {statements}
	}

	fn write(&self, f: &mut Formatter<'_>, depth: usize) -> FMTResult {
		self.statements.iter().try_for_each(|statement| statement.write(f, depth))
	}
}

impl Display for BoundBlock {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		self.write(f, 0)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundElseIf {
	pub condition: BoundExpression,
	pub block: BoundBlock
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoundStatement {
	/// An expression evaluated for its side effects, or an error placeholder.
	Expression(BoundExpression),

	Assignment {
		targets: Vec<BoundExpression>,
		values: Vec<BoundExpression>
	},

	Local {
		variables: Vec<LocalSymbol>,
		values: Vec<BoundExpression>
	},

	Return {
		values: Vec<BoundExpression>
	},

	// Control

	If {
		condition: BoundExpression,
		block: BoundBlock,
		else_ifs: Vec<BoundElseIf>,
		r#else: Option<BoundBlock>
	},

	While {
		condition: BoundExpression,
		block: BoundBlock,
		break_label: LabelSymbol
	},

	Repeat {
		block: BoundBlock,
		condition: BoundExpression,
		break_label: LabelSymbol
	},

	NumericFor {
		variable: LocalSymbol,
		initial: BoundExpression,
		limit: BoundExpression,
		step: BoundExpression,
		block: BoundBlock,
		break_label: LabelSymbol
	},

	GenericFor {
		variables: Vec<LocalSymbol>,
		values: Vec<BoundExpression>,
		block: BoundBlock,
		break_label: LabelSymbol
	},

	Do {
		block: BoundBlock
	},

	// Lowered control

	Goto {
		label: LabelSymbol
	},

	/// Jumps to `label` when `condition` is truthy, or when it is falsy if
	/// `jump_if_true` is false.
	ConditionalGoto {
		label: LabelSymbol,
		condition: BoundExpression,
		jump_if_true: bool
	},

	Label {
		label: LabelSymbol
	}
}

impl BoundStatement {
	pub fn goto(label: LabelSymbol) -> Self {
		Self::Goto {label}
	}

	pub fn goto_if(label: LabelSymbol, condition: BoundExpression) -> Self {
		Self::ConditionalGoto {label, condition, jump_if_true: true}
	}

	pub fn goto_unless(label: LabelSymbol, condition: BoundExpression) -> Self {
		Self::ConditionalGoto {label, condition, jump_if_true: false}
	}

	pub fn label(label: LabelSymbol) -> Self {
		Self::Label {label}
	}

	pub fn local(variables: Vec<LocalSymbol>, values: Vec<BoundExpression>) -> Self {
		Self::Local {variables, values}
	}

	pub fn assignment(target: BoundExpression, value: BoundExpression) -> Self {
		Self::Assignment {targets: vec![target], values: vec![value]}
	}

	/// Whether this is one of the structured control flow statements that
	/// lowering removes.
	pub fn is_structured(&self) -> bool {
		matches!(self, Self::If {..} | Self::While {..} | Self::Repeat {..}
			| Self::NumericFor {..} | Self::GenericFor {..})
	}

	fn write(&self, f: &mut Formatter<'_>, depth: usize) -> FMTResult {
		let indent = "\t".repeat(depth);
		write!(f, "{}", indent)?;

		match self {
			Self::Expression(expression) => expression.write(f, depth)?,

			Self::Assignment {targets, values} => {
				write_list(f, targets, depth)?;
				write!(f, " = ")?;
				write_list(f, values, depth)?;
			},

			Self::Local {variables, values} => {
				write!(f, "local {}", variables.iter().map(|variable| match variable {
					variable if variable.is_to_be_closed() => format!("{} <close>", variable),
					variable if variable.is_constant() => format!("{} <const>", variable),
					variable => variable.to_string()
				}).join(", "))?;
				if !values.is_empty() {
					write!(f, " = ")?;
					write_list(f, values, depth)?;
				}
			},

			Self::Return {values} => {
				write!(f, "return")?;
				if !values.is_empty() {
					write!(f, " ")?;
					write_list(f, values, depth)?;
				}
			},

			Self::If {condition, block, else_ifs, r#else} => {
				write!(f, "if ")?;
				condition.write(f, depth)?;
				writeln!(f, " then")?;
				block.write(f, depth + 1)?;

				for BoundElseIf {condition, block} in else_ifs {
					write!(f, "{}elseif ", indent)?;
					condition.write(f, depth)?;
					writeln!(f, " then")?;
					block.write(f, depth + 1)?;
				}

				if let Some(r#else) = r#else {
					writeln!(f, "{}else", indent)?;
					r#else.write(f, depth + 1)?;
				}

				write!(f, "{}end", indent)?;
			},

			Self::While {condition, block, break_label} => {
				write!(f, "while ")?;
				condition.write(f, depth)?;
				writeln!(f, " do -- {}", break_label)?;
				block.write(f, depth + 1)?;
				write!(f, "{}end", indent)?;
			},

			Self::Repeat {block, condition, break_label} => {
				writeln!(f, "repeat -- {}", break_label)?;
				block.write(f, depth + 1)?;
				write!(f, "{}until ", indent)?;
				condition.write(f, depth)?;
			},

			Self::NumericFor {variable, initial, limit, step, block, break_label} => {
				write!(f, "for {} = ", variable)?;
				write_list(f, [initial, limit, step], depth)?;
				writeln!(f, " do -- {}", break_label)?;
				block.write(f, depth + 1)?;
				write!(f, "{}end", indent)?;
			},

			Self::GenericFor {variables, values, block, break_label} => {
				write!(f, "for {} in ", variables.iter().join(", "))?;
				write_list(f, values, depth)?;
				writeln!(f, " do -- {}", break_label)?;
				block.write(f, depth + 1)?;
				write!(f, "{}end", indent)?;
			},

			Self::Do {block} => {
				writeln!(f, "do")?;
				block.write(f, depth + 1)?;
				write!(f, "{}end", indent)?;
			},

			Self::Goto {label} => write!(f, "goto {}", label)?,

			Self::ConditionalGoto {label, condition, jump_if_true} => {
				write!(f, "goto {} {} ", label, if *jump_if_true {"if"} else {"unless"})?;
				condition.write(f, depth)?;
			},

			Self::Label {label} => write!(f, "::{}::", label)?
		}

		writeln!(f)
	}
}

impl Display for BoundStatement {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		self.write(f, 0)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoundField {
	/// A field without a key, numbered by its position among the other
	/// positional fields, counting from zero.
	Positional {
		position: i64,
		value: BoundExpression
	},

	Keyed {
		key: BoundExpression,
		value: BoundExpression
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoundExpression {
	Literal(Literal),

	/// A reference to a local variable.
	Name(LocalSymbol),

	Vararg,

	Function {
		parameters: Vec<LocalSymbol>,
		vararg: bool,
		body: BoundBlock
	},

	Table {
		fields: Vec<BoundField>
	},

	Unary {
		operator: UnaryOperator,
		operand: Box<BoundExpression>
	},

	Binary {
		left: Box<BoundExpression>,
		operator: BinaryOperator,
		right: Box<BoundExpression>
	},

	Parenthesized(Box<BoundExpression>),

	Call {
		receiver: Box<BoundExpression>,
		method: Option<Box<str>>,
		arguments: Vec<BoundExpression>
	},

	Index {
		target: Box<BoundExpression>,
		index: Box<BoundExpression>
	},

	/// Stands in for anything that failed to bind.
	Error
}

impl BoundExpression {
	pub fn integer(integer: i64) -> Self {
		Self::Literal(Literal::Integer(integer))
	}

	pub fn string(string: &str) -> Self {
		Self::Literal(Literal::String(string.as_bytes().into()))
	}

	pub fn nil() -> Self {
		Self::Literal(Literal::Nil)
	}

	pub fn binary(left: Self, operator: BinaryOperator, right: Self) -> Self {
		Self::Binary {left: Box::new(left), operator, right: Box::new(right)}
	}

	pub fn index(target: Self, index: Self) -> Self {
		Self::Index {target: Box::new(target), index: Box::new(index)}
	}

	pub fn call(receiver: Self, arguments: Vec<Self>) -> Self {
		Self::Call {receiver: Box::new(receiver), method: None, arguments}
	}

	fn write(&self, f: &mut Formatter<'_>, depth: usize) -> FMTResult {
		match self {
			Self::Literal(literal) => write!(f, "{}", literal),
			Self::Name(symbol) => write!(f, "{}", symbol),
			Self::Vararg => write!(f, "..."),

			Self::Function {parameters, vararg, body} => {
				let parameters = parameters.iter().map(ToString::to_string)
					.chain(vararg.then(|| "...".to_string()))
					.join(", ");
				writeln!(f, "function({})", parameters)?;
				body.write(f, depth + 1)?;
				write!(f, "{}end", "\t".repeat(depth))
			},

			Self::Table {fields} => {
				write!(f, "{{")?;
				fields.iter().enumerate().try_for_each(|(index, field)| {
					if index != 0 {write!(f, ", ")?}
					match field {
						BoundField::Positional {value, ..} => value.write(f, depth),
						BoundField::Keyed {key, value} => {
							write!(f, "[")?;
							key.write(f, depth)?;
							write!(f, "] = ")?;
							value.write(f, depth)
						}
					}
				})?;
				write!(f, "}}")
			},

			Self::Unary {operator: UnaryOperator::LogicalNot, operand} => {
				write!(f, "not ")?;
				operand.write(f, depth)
			},

			Self::Unary {operator, operand} => {
				write!(f, "{}", operator)?;
				operand.write(f, depth)
			},

			Self::Binary {left, operator, right} => {
				write!(f, "(")?;
				left.write(f, depth)?;
				write!(f, " {} ", operator)?;
				right.write(f, depth)?;
				write!(f, ")")
			},

			Self::Parenthesized(inner) => {
				write!(f, "(")?;
				inner.write(f, depth)?;
				write!(f, ")")
			},

			Self::Call {receiver, method, arguments} => {
				receiver.write(f, depth)?;
				if let Some(method) = method {write!(f, ":{}", method)?}
				write!(f, "(")?;
				write_list(f, arguments, depth)?;
				write!(f, ")")
			},

			Self::Index {target, index} => {
				target.write(f, depth)?;
				match &**index {
					Self::Literal(Literal::String(key)) if is_identifier(key) =>
						write!(f, ".{}", String::from_utf8_lossy(key)),
					index => {
						write!(f, "[")?;
						index.write(f, depth)?;
						write!(f, "]")
					}
				}
			},

			Self::Error => write!(f, "<error>")
		}
	}
}

impl Display for BoundExpression {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		self.write(f, 0)
	}
}

fn write_list<'e>(f: &mut Formatter<'_>,
		expressions: impl IntoIterator<Item = &'e BoundExpression>, depth: usize) -> FMTResult {
	expressions.into_iter().enumerate().try_for_each(|(index, expression)| {
		if index != 0 {write!(f, ", ")?}
		expression.write(f, depth)
	})
}

fn is_identifier(key: &[u8]) -> bool {
	matches!(key.first(), Some(b'a'..=b'z' | b'A'..=b'Z' | b'_'))
		&& key.iter().all(|byte| byte.is_ascii_alphanumeric() || *byte == b'_')
		&& std::str::from_utf8(key).map_or(false, |key| TokenKind::keyword(key).is_none())
}
