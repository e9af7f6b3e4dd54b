//! Lowering of structured control flow.
//!
//! The [`Lowerer`] rewrites every `if`, `while`, `repeat` and `for` of a bound
//! tree into a flat sequence of labels, gotos and conditional gotos. Other
//! statements, including user written `do` blocks, are kept.

pub mod rewriter;
#[cfg(test)]
pub mod tests;

use self::rewriter::BoundTreeRewriter;
use crate::{
	ast::syntax::BinaryOperator,
	binder::{
		bound::{BoundBlock, BoundChunk, BoundElseIf, BoundExpression, BoundStatement},
		symbol::{LabelSymbol, LocalSymbol}
	}
};
use std::iter::once;

/// Lowers bound trees into goto form.
///
/// Generated labels and hidden locals are named after a counter private to
/// each lowerer, as in `label#3` or `limit#4`. Names containing `#` can never
/// clash with a Lua identifier, and identity comes from the symbol anyway.
///
/// Examples
/// --------
/// ```rust
/// # use selenite::{ast::SyntaxTree, binder::Binder, lower::Lowerer};
/// let tree = SyntaxTree::parse("while x do f() end");
/// let lowered = Lowerer::lower(Binder::bind_chunk(&tree));
///
/// assert_eq!(lowered.to_string(), "\
/// ::label#1::
/// goto break#1 unless _ENV.x
/// _ENV.f()
/// goto label#1
/// ::break#1::
/// ");
/// ```
#[derive(Debug, Default)]
pub struct Lowerer {
	counter: usize
}

impl Lowerer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Lowers a whole chunk, keeping its diagnostics.
	pub fn lower(chunk: BoundChunk) -> BoundChunk {
		let BoundChunk {body, diagnostics} = chunk;
		let mut lowerer = Self::new();
		let body = lowerer.rewrite_block(body);

		log::debug!("lowered chunk, generating {} symbols", lowerer.counter);
		BoundChunk {body, diagnostics}
	}

	pub fn lower_block(block: BoundBlock) -> BoundBlock {
		Self::new().rewrite_block(block)
	}

	fn label(&mut self) -> LabelSymbol {
		self.counter += 1;
		LabelSymbol::new(format!("label#{}", self.counter))
	}

	fn local(&mut self, name: &str) -> LocalSymbol {
		self.counter += 1;
		LocalSymbol::new(format!("{}#{}", name, self.counter))
	}

	/// Wraps lowered statements, for [`rewrite_block`](Self::rewrite_block) to
	/// splice into the enclosing block.
	fn lowered(statements: Vec<BoundStatement>) -> BoundStatement {
		BoundStatement::Do {block: BoundBlock::new(statements)}
	}
}

impl BoundTreeRewriter for Lowerer {
	/// Rewrites a block, splicing the statements of lowered control flow
	/// directly into it, so that lowered blocks come out flat.
	fn rewrite_block(&mut self, block: BoundBlock) -> BoundBlock {
		let mut statements = Vec::with_capacity(block.statements.len());

		for statement in block.statements {
			let structured = statement.is_structured();
			match self.rewrite_statement(statement) {
				BoundStatement::Do {block} if structured => statements.extend(block.statements),
				statement => statements.push(statement)
			}
		}

		BoundBlock::new(statements)
	}

	// if a then A elseif b then B else C end
	// is
	// goto next#1 unless a; A; goto end; ::next#1::
	// goto next#2 unless b; B; goto end; ::next#2::
	// C
	// ::end::
	fn rewrite_if(&mut self, condition: BoundExpression, block: BoundBlock,
			else_ifs: Vec<BoundElseIf>, r#else: Option<BoundBlock>) -> BoundStatement {
		let end = self.label();
		let mut statements = Vec::new();

		let branches = once((condition, block))
			.chain(else_ifs.into_iter().map(|BoundElseIf {condition, block}| (condition, block)));
		for (condition, block) in branches {
			let next = self.label();
			let condition = self.rewrite_expression(condition);

			statements.push(BoundStatement::goto_unless(next.clone(), condition));
			statements.extend(self.rewrite_block(block).statements);
			statements.push(BoundStatement::goto(end.clone()));
			statements.push(BoundStatement::label(next));
		}

		if let Some(r#else) = r#else
			{statements.extend(self.rewrite_block(r#else).statements)}
		statements.push(BoundStatement::label(end));

		Self::lowered(statements)
	}

	// while a do A end
	// is
	// ::check::; goto break unless a; A; goto check; ::break::
	fn rewrite_while(&mut self, condition: BoundExpression, block: BoundBlock,
			break_label: LabelSymbol) -> BoundStatement {
		let check = self.label();
		let condition = self.rewrite_expression(condition);

		let mut statements = vec![
			BoundStatement::label(check.clone()),
			BoundStatement::goto_unless(break_label.clone(), condition)
		];
		statements.extend(self.rewrite_block(block).statements);
		statements.push(BoundStatement::goto(check));
		statements.push(BoundStatement::label(break_label));

		Self::lowered(statements)
	}

	// repeat A until a
	// is
	// ::start::; A; goto start unless a; ::break::
	fn rewrite_repeat(&mut self, block: BoundBlock, condition: BoundExpression,
			break_label: LabelSymbol) -> BoundStatement {
		let start = self.label();

		let mut statements = vec![BoundStatement::label(start.clone())];
		statements.extend(self.rewrite_block(block).statements);
		let condition = self.rewrite_expression(condition);
		statements.push(BoundStatement::goto_unless(start, condition));
		statements.push(BoundStatement::label(break_label));

		Self::lowered(statements)
	}

	// for i = a, b, c do A end
	// is
	// local i, limit, step = a, b, c
	// ::start::
	// goto break unless (step > 0 and i <= limit) or (step <= 0 and i >= limit)
	// A; i = i + step; goto start; ::break::
	fn rewrite_numeric_for(&mut self, variable: LocalSymbol, initial: BoundExpression,
			limit: BoundExpression, step: BoundExpression, block: BoundBlock,
			break_label: LabelSymbol) -> BoundStatement {
		let start = self.label();
		let limit_symbol = self.local("limit");
		let step_symbol = self.local("step");

		let values = vec![
			self.rewrite_expression(initial),
			self.rewrite_expression(limit),
			self.rewrite_expression(step)
		];

		let name = |symbol: &LocalSymbol| BoundExpression::Name(symbol.clone());
		let zero = || BoundExpression::integer(0);
		let ascending = BoundExpression::binary(
			BoundExpression::binary(name(&step_symbol), BinaryOperator::GreaterThan, zero()),
			BinaryOperator::LogicalAnd,
			BoundExpression::binary(name(&variable), BinaryOperator::LessThanOrEqual,
				name(&limit_symbol))
		);
		let descending = BoundExpression::binary(
			BoundExpression::binary(name(&step_symbol), BinaryOperator::LessThanOrEqual, zero()),
			BinaryOperator::LogicalAnd,
			BoundExpression::binary(name(&variable), BinaryOperator::GreaterThanOrEqual,
				name(&limit_symbol))
		);
		let condition = BoundExpression::binary(ascending, BinaryOperator::LogicalOr, descending);
		let increment = BoundStatement::assignment(name(&variable),
			BoundExpression::binary(name(&variable), BinaryOperator::Add, name(&step_symbol)));

		let mut statements = vec![
			BoundStatement::local(vec![variable, limit_symbol, step_symbol], values),
			BoundStatement::label(start.clone()),
			BoundStatement::goto_unless(break_label.clone(), condition)
		];
		statements.extend(self.rewrite_block(block).statements);
		statements.push(increment);
		statements.push(BoundStatement::goto(start));
		statements.push(BoundStatement::label(break_label));

		Self::lowered(statements)
	}

	// for a, b in e do A end
	// is
	// local iterator, state, control = e
	// ::start::
	// local a, b = iterator(state, control)
	// goto break if a == nil
	// control = a; A; goto start; ::break::
	fn rewrite_generic_for(&mut self, variables: Vec<LocalSymbol>,
			values: Vec<BoundExpression>, block: BoundBlock, break_label: LabelSymbol)
			-> BoundStatement {
		let start = self.label();
		let iterator = self.local("iterator");
		let state = self.local("state");
		let control = self.local("control");
		let values = self.rewrite_expressions(values);

		let name = |symbol: &LocalSymbol| BoundExpression::Name(symbol.clone());
		let call = BoundExpression::call(name(&iterator), vec![name(&state), name(&control)]);

		let mut statements = vec![
			BoundStatement::local(vec![iterator.clone(), state.clone(), control.clone()], values),
			BoundStatement::label(start.clone())
		];

		// The first variable always exists, unless the parser recovered from an
		// error.
		if let Some(first) = variables.first().cloned() {
			statements.push(BoundStatement::local(variables, vec![call]));
			statements.push(BoundStatement::goto_if(break_label.clone(), BoundExpression::binary(
				name(&first), BinaryOperator::Equal, BoundExpression::nil())));
			statements.push(BoundStatement::assignment(name(&control), name(&first)));
		} else {
			statements.push(BoundStatement::Expression(call));
		}

		statements.extend(self.rewrite_block(block).statements);
		statements.push(BoundStatement::goto(start));
		statements.push(BoundStatement::label(break_label));

		Self::lowered(statements)
	}
}
