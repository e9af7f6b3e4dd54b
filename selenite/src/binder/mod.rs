//! Name resolution.
//!
//! The [`Binder`] walks a [`SyntaxTree`] once, top down, resolving every name
//! against the chain of lexical scopes enclosing it, and every goto against
//! the labels visible from it. The result is a [`BoundChunk`].

pub mod bound;
pub mod scope;
pub mod symbol;
#[cfg(test)]
pub mod tests;

use self::{
	bound::{BoundBlock, BoundChunk, BoundElseIf, BoundExpression, BoundField, BoundStatement},
	scope::ScopeStack,
	symbol::{LabelSymbol, LocalSymbol}
};
use crate::{
	ast::{
		SyntaxTree,
		syntax::{
			Block, Expression, Field, FunctionBody, LocalDeclaration, Name, ReturnStatement,
			Statement
		}
	},
	diagnostic::{DiagnosticBag, DiagnosticKind}
};
use std::mem::{replace, take};

/// The name of the implicit upvalue through which globals are accessed.
pub const ENVIRONMENT: &str = "_ENV";

/// Resolves the names of a syntax tree, producing a bound tree.
///
/// Examples
/// --------
/// ```rust
/// # use selenite::{ast::SyntaxTree, binder::Binder};
/// let tree = SyntaxTree::parse("local x = 1 y = x");
/// let bound = Binder::bind_chunk(&tree);
///
/// assert!(bound.diagnostics.is_empty());
/// assert_eq!(bound.to_string(), "local x = 1\n_ENV.y = x\n");
/// ```
pub struct Binder {
	scopes: ScopeStack,
	diagnostics: DiagnosticBag,

	/// The break labels of the loops enclosing the current node, innermost
	/// last. Reset for every function body.
	break_labels: Vec<LabelSymbol>,
	break_count: usize,

	/// Whether the current function accepts `...`.
	vararg: bool,
	environment: LocalSymbol
}

impl Binder {
	fn new() -> Self {
		Self {
			scopes: ScopeStack::new(),
			diagnostics: DiagnosticBag::new(),
			break_labels: Vec::new(),
			break_count: 0,
			// The main chunk is always a vararg function.
			vararg: true,
			environment: LocalSymbol::new(ENVIRONMENT)
		}
	}

	/// Binds a whole syntax tree.
	///
	/// The diagnostics of the result are those of the tree, followed by any
	/// reported while binding.
	pub fn bind_chunk(tree: &SyntaxTree) -> BoundChunk {
		let mut binder = Self::new();

		binder.scopes.push(true);
		binder.scopes.declare_variable(binder.environment.clone());
		let body = binder.bind_statements(&tree.root().block);
		binder.scopes.pop();

		let mut diagnostics = tree.diagnostics().to_vec();
		log::debug!("bound chunk with {} binding diagnostics", binder.diagnostics.len());
		diagnostics.extend(binder.diagnostics);

		BoundChunk {body, diagnostics}
	}

	/// Binds a block in a new scope of its own.
	fn bind_block(&mut self, block: &Block) -> BoundBlock {
		self.scopes.push(false);
		let block = self.bind_statements(block);
		self.scopes.pop();
		block
	}

	/// Binds the statements of a block in the current scope.
	///
	/// Every label of the block is declared up front, so that gotos may jump
	/// forward to them.
	fn bind_statements(&mut self, block: &Block) -> BoundBlock {
		block.statements.iter()
			.filter_map(|statement| match statement {
				Statement::Label {name, ..} => Some(name),
				_ => None
			})
			.for_each(|name| {
				if self.scopes.label_clashes(&name.value, name.location.start) {
					self.diagnostics.report(name.location,
						DiagnosticKind::DuplicateLabel(name.value.clone()))
				}
				self.scopes.declare_label(LabelSymbol::new(&*name.value), name.location.start);
			});

		let mut statements = block.statements.iter()
			.map(|statement| self.bind_statement(statement))
			.collect::<Vec<_>>();
		if let Some(ReturnStatement {values, ..}) = &block.r#return
			{statements.push(BoundStatement::Return {values: self.bind_expressions(values)})}

		BoundBlock::new(statements)
	}

	/// Pushes a fresh break label, for a loop about to be bound.
	fn push_break_label(&mut self) -> LabelSymbol {
		self.break_count += 1;
		let label = LabelSymbol::new(format!("break#{}", self.break_count));
		self.break_labels.push(label.clone());
		label
	}

	fn declare(&mut self, name: &Name) -> LocalSymbol {
		let symbol = LocalSymbol::new(&*name.value);
		self.scopes.declare_variable(symbol.clone());
		symbol
	}

	fn bind_statement(&mut self, statement: &Statement) -> BoundStatement {
		match statement {
			Statement::Assignment {targets, values, ..} => {
				let targets = targets.iter()
					.map(|target| self.bind_assignment_target(target))
					.collect();
				let values = self.bind_expressions(values);

				BoundStatement::Assignment {targets, values}
			},

			Statement::Local {declarations, values, ..} => {
				// Values are bound first; `local x = x` refers to the outer x.
				let values = self.bind_expressions(values);
				let mut closed = false;

				let variables = declarations.iter()
					.map(|LocalDeclaration {name, attribute, location}| {
						let (constant, to_be_closed) = match attribute.as_ref().map(|name| &*name.value) {
							None => (false, false),
							Some("const") => (true, false),
							Some("close") => {
								if replace(&mut closed, true)
									{self.diagnostics.report(*location, DiagnosticKind::MultipleToBeClosed)}
								(false, true)
							},
							Some(other) => {
								let location = attribute.as_ref().map_or(*location, |name| name.location);
								self.diagnostics.report(location, DiagnosticKind::UnknownAttribute(other.into()));
								(false, false)
							}
						};

						LocalSymbol::with_attributes(&*name.value, constant, to_be_closed)
					})
					.collect::<Vec<_>>();
				variables.iter().for_each(|variable| self.scopes.declare_variable(variable.clone()));

				BoundStatement::Local {variables, values}
			},

			Statement::Call {call, ..} => BoundStatement::Expression(self.bind_expression(call)),

			Statement::If {condition, block, else_ifs, r#else, ..} => BoundStatement::If {
				condition: self.bind_expression(condition),
				block: self.bind_block(block),
				else_ifs: else_ifs.iter()
					.map(|else_if| BoundElseIf {
						condition: self.bind_expression(&else_if.condition),
						block: self.bind_block(&else_if.block)
					})
					.collect(),
				r#else: r#else.as_ref().map(|block| self.bind_block(block))
			},

			Statement::While {condition, block, ..} => {
				let condition = self.bind_expression(condition);
				let break_label = self.push_break_label();
				let block = self.bind_block(block);
				self.break_labels.pop();

				BoundStatement::While {condition, block, break_label}
			},

			Statement::Repeat {block, condition, ..} => {
				let break_label = self.push_break_label();
				// The condition can see the block's locals, so they share a scope.
				self.scopes.push(false);
				let block = self.bind_statements(block);
				let condition = self.bind_expression(condition);
				self.scopes.pop();
				self.break_labels.pop();

				BoundStatement::Repeat {block, condition, break_label}
			},

			Statement::NumericFor {variable, initial, limit, step, block, ..} => {
				let initial = self.bind_expression(initial);
				let limit = self.bind_expression(limit);
				let step = match step {
					Some(step) => self.bind_expression(step),
					None => BoundExpression::integer(1)
				};

				let break_label = self.push_break_label();
				self.scopes.push(false);
				let variable = self.declare(variable);
				let block = self.bind_statements(block);
				self.scopes.pop();
				self.break_labels.pop();

				BoundStatement::NumericFor {variable, initial, limit, step, block, break_label}
			},

			Statement::GenericFor {variables, values, block, ..} => {
				let values = self.bind_expressions(values);

				let break_label = self.push_break_label();
				self.scopes.push(false);
				let variables = variables.iter().map(|name| self.declare(name)).collect();
				let block = self.bind_statements(block);
				self.scopes.pop();
				self.break_labels.pop();

				BoundStatement::GenericFor {variables, values, block, break_label}
			},

			Statement::Do {block, ..} => BoundStatement::Do {block: self.bind_block(block)},

			Statement::Break {location} => match self.break_labels.last() {
				Some(label) => BoundStatement::goto(label.clone()),
				None => {
					self.diagnostics.report(*location, DiagnosticKind::UnexpectedBreak);
					BoundStatement::Expression(BoundExpression::Error)
				}
			},

			Statement::Goto {label, ..} => match self.scopes.lookup_label(&label.value) {
				Some(symbol) => BoundStatement::goto(symbol.clone()),
				None => {
					self.diagnostics.report(label.location,
						DiagnosticKind::UndefinedLabel(label.value.clone()));
					BoundStatement::Expression(BoundExpression::Error)
				}
			},

			Statement::Label {name, ..} => {
				let label = self.scopes.local_label(name.location.start).cloned()
					.unwrap_or_else(|| LabelSymbol::new(&*name.value));
				BoundStatement::label(label)
			},

			// function a.b.c:m() end
			// is
			// a.b.c.m = function(self) end
			Statement::Function {name, body, ..} => {
				let (first, rest) = match name.path.split_first() {
					Some(split) => split,
					None => return BoundStatement::Expression(BoundExpression::Error)
				};

				let mut target = if rest.is_empty() && name.method.is_none() {
					self.bind_assignment_target(&Expression::Name(first.clone()))
				} else {self.bind_name(first)};
				for key in rest.iter().chain(&name.method) {
					target = BoundExpression::index(target, BoundExpression::string(&key.value))
				}

				let function = self.bind_function(body, name.method.is_some());
				BoundStatement::assignment(target, function)
			},

			Statement::LocalFunction {name, body, ..} => {
				// Declared first, so that the function can call itself.
				let symbol = self.declare(name);
				let function = self.bind_function(body, false);
				BoundStatement::local(vec![symbol], vec![function])
			}
		}
	}

	fn bind_expressions(&mut self, expressions: &[Expression]) -> Vec<BoundExpression> {
		expressions.iter().map(|expression| self.bind_expression(expression)).collect()
	}

	/// Binds an expression being assigned to, reporting assignments to
	/// constant locals.
	fn bind_assignment_target(&mut self, target: &Expression) -> BoundExpression {
		let bound = self.bind_expression(target);
		if let (Expression::Name(name), BoundExpression::Name(symbol)) = (target, &bound) {
			if symbol.is_constant() {
				self.diagnostics.report(name.location,
					DiagnosticKind::AssignToConstant(name.value.clone()))
			}
		}
		bound
	}

	/// Resolves a name to a local, or to a field of `_ENV` if no such local is
	/// visible.
	fn bind_name(&mut self, name: &Name) -> BoundExpression {
		if let Some(symbol) = self.scopes.lookup_variable(&name.value)
			{return BoundExpression::Name(symbol.clone())}

		let environment = self.scopes.lookup_variable(ENVIRONMENT)
			.unwrap_or(&self.environment)
			.clone();
		BoundExpression::index(BoundExpression::Name(environment),
			BoundExpression::string(&name.value))
	}

	fn bind_function(&mut self, body: &FunctionBody, method: bool) -> BoundExpression {
		let break_labels = take(&mut self.break_labels);
		let vararg = replace(&mut self.vararg, body.vararg);
		self.scopes.push(true);

		let mut parameters = Vec::with_capacity(body.parameters.len() + method as usize);
		if method {
			let symbol = LocalSymbol::new("self");
			self.scopes.declare_variable(symbol.clone());
			parameters.push(symbol);
		}
		parameters.extend(body.parameters.iter().map(|name| self.declare(name)));
		let block = self.bind_statements(&body.block);

		self.scopes.pop();
		self.vararg = vararg;
		self.break_labels = break_labels;

		BoundExpression::Function {parameters, vararg: body.vararg, body: block}
	}

	fn bind_expression(&mut self, expression: &Expression) -> BoundExpression {
		match expression {
			Expression::Literal {value, ..} => BoundExpression::Literal(value.clone()),

			Expression::Vararg {location} => if self.vararg {BoundExpression::Vararg} else {
				self.diagnostics.report(*location, DiagnosticKind::VarargOutsideVarargFunction);
				BoundExpression::Error
			},

			Expression::Function {body, ..} => self.bind_function(body, false),

			Expression::Table {fields, ..} => {
				let mut position = 0;
				let fields = fields.iter().map(|field| match field {
					Field::Positional {value, ..} => {
						let value = self.bind_expression(value);
						position += 1;
						BoundField::Positional {position: position - 1, value}
					},
					Field::Named {name, value, ..} => BoundField::Keyed {
						key: BoundExpression::string(&name.value),
						value: self.bind_expression(value)
					},
					Field::Keyed {key, value, ..} => BoundField::Keyed {
						key: self.bind_expression(key),
						value: self.bind_expression(value)
					}
				}).collect();

				BoundExpression::Table {fields}
			},

			Expression::Unary {operator, operand, ..} => BoundExpression::Unary {
				operator: *operator,
				operand: Box::new(self.bind_expression(operand))
			},

			Expression::Binary {left, operator, right, ..} => BoundExpression::binary(
				self.bind_expression(left), *operator, self.bind_expression(right)),

			Expression::Parenthesized {inner, ..} =>
				BoundExpression::Parenthesized(Box::new(self.bind_expression(inner))),

			Expression::Call {receiver, method, arguments, ..} => BoundExpression::Call {
				receiver: Box::new(self.bind_expression(receiver)),
				method: method.as_ref().map(|method| method.value.clone()),
				arguments: self.bind_expressions(arguments)
			},

			Expression::Name(name) => self.bind_name(name),

			Expression::Index {target, index, ..} => BoundExpression::index(
				self.bind_expression(target), self.bind_expression(index)),

			Expression::DottedAccess {target, name, ..} => BoundExpression::index(
				self.bind_expression(target), BoundExpression::string(&name.value))
		}
	}
}
