use crate::{
	ast::syntax::{BinaryOperator, Literal, UnaryOperator},
	binder::{
		bound::{BoundBlock, BoundElseIf, BoundExpression, BoundField, BoundStatement},
		symbol::{LabelSymbol, LocalSymbol}
	}
};

/// A transformation of bound trees.
///
/// Every method defaults to rebuilding its node from its rewritten children,
/// so an implementation only overrides the nodes it cares about. Nodes are
/// passed by value, and reused where nothing changes.
pub trait BoundTreeRewriter {
	fn rewrite_block(&mut self, block: BoundBlock) -> BoundBlock {
		BoundBlock::new(block.statements.into_iter()
			.map(|statement| self.rewrite_statement(statement))
			.collect())
	}

	fn rewrite_statement(&mut self, statement: BoundStatement) -> BoundStatement {
		match statement {
			BoundStatement::Expression(expression) =>
				self.rewrite_expression_statement(expression),
			BoundStatement::Assignment {targets, values} =>
				self.rewrite_assignment(targets, values),
			BoundStatement::Local {variables, values} => self.rewrite_local(variables, values),
			BoundStatement::Return {values} => self.rewrite_return(values),
			BoundStatement::If {condition, block, else_ifs, r#else} =>
				self.rewrite_if(condition, block, else_ifs, r#else),
			BoundStatement::While {condition, block, break_label} =>
				self.rewrite_while(condition, block, break_label),
			BoundStatement::Repeat {block, condition, break_label} =>
				self.rewrite_repeat(block, condition, break_label),
			BoundStatement::NumericFor {variable, initial, limit, step, block, break_label} =>
				self.rewrite_numeric_for(variable, initial, limit, step, block, break_label),
			BoundStatement::GenericFor {variables, values, block, break_label} =>
				self.rewrite_generic_for(variables, values, block, break_label),
			BoundStatement::Do {block} => self.rewrite_do(block),
			BoundStatement::Goto {label} => self.rewrite_goto(label),
			BoundStatement::ConditionalGoto {label, condition, jump_if_true} =>
				self.rewrite_conditional_goto(label, condition, jump_if_true),
			BoundStatement::Label {label} => self.rewrite_label(label)
		}
	}

	fn rewrite_expression_statement(&mut self, expression: BoundExpression)
			-> BoundStatement {
		BoundStatement::Expression(self.rewrite_expression(expression))
	}

	fn rewrite_assignment(&mut self, targets: Vec<BoundExpression>,
			values: Vec<BoundExpression>) -> BoundStatement {
		BoundStatement::Assignment {
			targets: self.rewrite_expressions(targets),
			values: self.rewrite_expressions(values)
		}
	}

	fn rewrite_local(&mut self, variables: Vec<LocalSymbol>, values: Vec<BoundExpression>)
			-> BoundStatement {
		BoundStatement::Local {variables, values: self.rewrite_expressions(values)}
	}

	fn rewrite_return(&mut self, values: Vec<BoundExpression>) -> BoundStatement {
		BoundStatement::Return {values: self.rewrite_expressions(values)}
	}

	fn rewrite_if(&mut self, condition: BoundExpression, block: BoundBlock,
			else_ifs: Vec<BoundElseIf>, r#else: Option<BoundBlock>) -> BoundStatement {
		BoundStatement::If {
			condition: self.rewrite_expression(condition),
			block: self.rewrite_block(block),
			else_ifs: else_ifs.into_iter()
				.map(|BoundElseIf {condition, block}| BoundElseIf {
					condition: self.rewrite_expression(condition),
					block: self.rewrite_block(block)
				})
				.collect(),
			r#else: r#else.map(|block| self.rewrite_block(block))
		}
	}

	fn rewrite_while(&mut self, condition: BoundExpression, block: BoundBlock,
			break_label: LabelSymbol) -> BoundStatement {
		BoundStatement::While {
			condition: self.rewrite_expression(condition),
			block: self.rewrite_block(block),
			break_label
		}
	}

	fn rewrite_repeat(&mut self, block: BoundBlock, condition: BoundExpression,
			break_label: LabelSymbol) -> BoundStatement {
		BoundStatement::Repeat {
			block: self.rewrite_block(block),
			condition: self.rewrite_expression(condition),
			break_label
		}
	}

	fn rewrite_numeric_for(&mut self, variable: LocalSymbol, initial: BoundExpression,
			limit: BoundExpression, step: BoundExpression, block: BoundBlock,
			break_label: LabelSymbol) -> BoundStatement {
		BoundStatement::NumericFor {
			variable,
			initial: self.rewrite_expression(initial),
			limit: self.rewrite_expression(limit),
			step: self.rewrite_expression(step),
			block: self.rewrite_block(block),
			break_label
		}
	}

	fn rewrite_generic_for(&mut self, variables: Vec<LocalSymbol>,
			values: Vec<BoundExpression>, block: BoundBlock, break_label: LabelSymbol)
			-> BoundStatement {
		BoundStatement::GenericFor {
			variables,
			values: self.rewrite_expressions(values),
			block: self.rewrite_block(block),
			break_label
		}
	}

	fn rewrite_do(&mut self, block: BoundBlock) -> BoundStatement {
		BoundStatement::Do {block: self.rewrite_block(block)}
	}

	fn rewrite_goto(&mut self, label: LabelSymbol) -> BoundStatement {
		BoundStatement::Goto {label}
	}

	fn rewrite_conditional_goto(&mut self, label: LabelSymbol, condition: BoundExpression,
			jump_if_true: bool) -> BoundStatement {
		BoundStatement::ConditionalGoto {
			label,
			condition: self.rewrite_expression(condition),
			jump_if_true
		}
	}

	fn rewrite_label(&mut self, label: LabelSymbol) -> BoundStatement {
		BoundStatement::Label {label}
	}

	fn rewrite_expressions(&mut self, expressions: Vec<BoundExpression>)
			-> Vec<BoundExpression> {
		expressions.into_iter()
			.map(|expression| self.rewrite_expression(expression))
			.collect()
	}

	fn rewrite_expression(&mut self, expression: BoundExpression) -> BoundExpression {
		match expression {
			BoundExpression::Literal(literal) => self.rewrite_literal(literal),
			BoundExpression::Name(symbol) => self.rewrite_name(symbol),
			BoundExpression::Vararg => self.rewrite_vararg(),
			BoundExpression::Function {parameters, vararg, body} =>
				self.rewrite_function(parameters, vararg, body),
			BoundExpression::Table {fields} => self.rewrite_table(fields),
			BoundExpression::Unary {operator, operand} => self.rewrite_unary(operator, *operand),
			BoundExpression::Binary {left, operator, right} =>
				self.rewrite_binary(*left, operator, *right),
			BoundExpression::Parenthesized(inner) => self.rewrite_parenthesized(*inner),
			BoundExpression::Call {receiver, method, arguments} =>
				self.rewrite_call(*receiver, method, arguments),
			BoundExpression::Index {target, index} => self.rewrite_index(*target, *index),
			BoundExpression::Error => self.rewrite_error()
		}
	}

	fn rewrite_literal(&mut self, literal: Literal) -> BoundExpression {
		BoundExpression::Literal(literal)
	}

	fn rewrite_name(&mut self, symbol: LocalSymbol) -> BoundExpression {
		BoundExpression::Name(symbol)
	}

	fn rewrite_vararg(&mut self) -> BoundExpression {
		BoundExpression::Vararg
	}

	fn rewrite_function(&mut self, parameters: Vec<LocalSymbol>, vararg: bool,
			body: BoundBlock) -> BoundExpression {
		BoundExpression::Function {parameters, vararg, body: self.rewrite_block(body)}
	}

	fn rewrite_table(&mut self, fields: Vec<BoundField>) -> BoundExpression {
		let fields = fields.into_iter().map(|field| match field {
			BoundField::Positional {position, value} =>
				BoundField::Positional {position, value: self.rewrite_expression(value)},
			BoundField::Keyed {key, value} => BoundField::Keyed {
				key: self.rewrite_expression(key),
				value: self.rewrite_expression(value)
			}
		}).collect();

		BoundExpression::Table {fields}
	}

	fn rewrite_unary(&mut self, operator: UnaryOperator, operand: BoundExpression)
			-> BoundExpression {
		BoundExpression::Unary {operator, operand: Box::new(self.rewrite_expression(operand))}
	}

	fn rewrite_binary(&mut self, left: BoundExpression, operator: BinaryOperator,
			right: BoundExpression) -> BoundExpression {
		let left = self.rewrite_expression(left);
		let right = self.rewrite_expression(right);
		BoundExpression::binary(left, operator, right)
	}

	fn rewrite_parenthesized(&mut self, inner: BoundExpression) -> BoundExpression {
		BoundExpression::Parenthesized(Box::new(self.rewrite_expression(inner)))
	}

	fn rewrite_call(&mut self, receiver: BoundExpression, method: Option<Box<str>>,
			arguments: Vec<BoundExpression>) -> BoundExpression {
		BoundExpression::Call {
			receiver: Box::new(self.rewrite_expression(receiver)),
			method,
			arguments: self.rewrite_expressions(arguments)
		}
	}

	fn rewrite_index(&mut self, target: BoundExpression, index: BoundExpression)
			-> BoundExpression {
		let target = self.rewrite_expression(target);
		let index = self.rewrite_expression(index);
		BoundExpression::index(target, index)
	}

	fn rewrite_error(&mut self) -> BoundExpression {
		BoundExpression::Error
	}
}
