use self::super::{Lowerer, rewriter::BoundTreeRewriter};
use crate::{
	ast::{SyntaxTree, syntax::Literal},
	binder::{
		Binder,
		bound::{BoundBlock, BoundChunk, BoundExpression, BoundField, BoundStatement}
	}
};

fn lower(source: &str) -> BoundChunk {
	Lowerer::lower(Binder::bind_chunk(&SyntaxTree::parse(source)))
}

/// Lowers source that is expected to be well formed, and prints it.
fn print(source: &str) -> String {
	let chunk = lower(source);
	assert!(chunk.diagnostics.is_empty(), "{:?}", chunk.diagnostics);
	chunk.to_string()
}

/// Whether any structured control flow is left anywhere in `block`, including
/// in the bodies of functions.
fn structured(block: &BoundBlock) -> bool {
	fn nested(expression: &BoundExpression) -> bool {
		match expression {
			BoundExpression::Function {body, ..} => structured(body),
			BoundExpression::Table {fields} => fields.iter().any(|field| match field {
				BoundField::Positional {value, ..} => nested(value),
				BoundField::Keyed {key, value} => nested(key) || nested(value)
			}),
			BoundExpression::Unary {operand, ..} => nested(operand),
			BoundExpression::Binary {left, right, ..} => nested(left) || nested(right),
			BoundExpression::Parenthesized(inner) => nested(inner),
			BoundExpression::Call {receiver, arguments, ..} =>
				nested(receiver) || arguments.iter().any(nested),
			BoundExpression::Index {target, index} => nested(target) || nested(index),
			_ => false
		}
	}

	block.statements.iter().any(|statement| statement.is_structured() || match statement {
		BoundStatement::Do {block} => structured(block),
		BoundStatement::Expression(expression) => nested(expression),
		BoundStatement::Assignment {targets, values} => targets.iter().chain(values).any(nested),
		BoundStatement::Local {values, ..} | BoundStatement::Return {values} =>
			values.iter().any(nested),
		BoundStatement::ConditionalGoto {condition, ..} => nested(condition),
		_ => false
	})
}

#[test]
fn lower_while() {
	assert_eq!(print("while a do f() end"), "\
::label#1::
goto break#1 unless _ENV.a
_ENV.f()
goto label#1
::break#1::
");
}

#[test]
fn lower_while_break() {
	let chunk = lower("while a do break end");

	assert_eq!(chunk.to_string(), "\
::label#1::
goto break#1 unless _ENV.a
goto break#1
goto label#1
::break#1::
");
	match &chunk.body.statements[..] {
		[_, BoundStatement::ConditionalGoto {label: exit, ..},
			BoundStatement::Goto {label: broken}, _, BoundStatement::Label {label}] => {
			assert_eq!(exit, label);
			assert_eq!(broken, label);
		},
		statements => panic!("unexpected statements {:?}", statements)
	}
}

/// Every loop gets labels of its own.
#[test]
fn lower_sibling_loops() {
	assert_eq!(print("while a do end while b do end"), "\
::label#1::
goto break#1 unless _ENV.a
goto label#1
::break#1::
::label#2::
goto break#2 unless _ENV.b
goto label#2
::break#2::
");
}

#[test]
fn lower_if() {
	assert_eq!(print("if a then f() elseif b then g() else h() end"), "\
goto label#2 unless _ENV.a
_ENV.f()
goto label#1
::label#2::
goto label#3 unless _ENV.b
_ENV.g()
goto label#1
::label#3::
_ENV.h()
::label#1::
");
}

#[test]
fn lower_repeat() {
	assert_eq!(print("repeat local x = f() until x"), "\
::label#1::
local x = _ENV.f()
goto label#1 unless x
::break#1::
");
}

#[test]
fn lower_numeric_for() {
	assert_eq!(print("for i = 1, 3 do f(i) end"), "\
local i, limit#2, step#3 = 1, 3, 1
::label#1::
goto break#1 unless (((step#3 > 0) and (i <= limit#2)) or ((step#3 <= 0) and (i >= limit#2)))
_ENV.f(i)
i = (i + step#3)
goto label#1
::break#1::
");
}

#[test]
fn lower_generic_for() {
	assert_eq!(print("for k, v in pairs(t) do end"), "\
local iterator#2, state#3, control#4 = _ENV.pairs(_ENV.t)
::label#1::
local k, v = iterator#2(state#3, control#4)
goto break#1 if (k == nil)
control#4 = k
goto label#1
::break#1::
");
}

#[test]
fn lower_keeps_do_blocks() {
	assert_eq!(print("do local x = 1 end"), "do\n\tlocal x = 1\nend\n");
}

#[test]
fn lower_function_bodies() {
	assert_eq!(print("local f = function() while a do end end"), "\
local f = function()
	::label#1::
	goto break#1 unless _ENV.a
	goto label#1
	::break#1::
end
");
}

#[test]
fn lower_leaves_no_structured_statements() {
	let chunk = lower("\
		local function f(n)\n\
			for i = 1, n do\n\
				if i % 2 == 0 then\n\
					repeat n = n - 1 until n < i\n\
				else\n\
					for k, v in next, {} do print(k, v) end\n\
				end\n\
			end\n\
			return function() while n > 0 do n = n - 1 end end\n\
		end\n\
		do if f(1) then end end\n\
	");

	assert!(chunk.diagnostics.is_empty(), "{:?}", chunk.diagnostics);
	assert!(!structured(&chunk.body), "{}", chunk);
}

#[test]
fn lower_keeps_diagnostics() {
	let chunk = lower("break while x do end");

	assert_eq!(chunk.diagnostics.len(), 1);
	assert_eq!(chunk.body.statements[0], BoundStatement::Expression(BoundExpression::Error));
}

/// Doubles every integer literal, and nothing else.
struct Doubler;

impl BoundTreeRewriter for Doubler {
	fn rewrite_literal(&mut self, literal: Literal) -> BoundExpression {
		match literal {
			Literal::Integer(integer) => BoundExpression::integer(integer * 2),
			literal => BoundExpression::Literal(literal)
		}
	}
}

#[test]
fn rewriter_visits_everything() {
	let chunk = Binder::bind_chunk(&SyntaxTree::parse(
		"local x = {1, f(2)} if x then return 3 elseif x[4] then end"));
	let block = Doubler.rewrite_block(chunk.body);

	assert_eq!(block.to_string(), "\
local x = {2, _ENV.f(4)}
if x then
	return 6
elseif x[8] then
end
");
}
