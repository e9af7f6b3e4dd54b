use self::super::{
	Binder,
	bound::{BoundChunk, BoundExpression, BoundField, BoundStatement}
};
use crate::{ast::SyntaxTree, diagnostic::DiagnosticKind};

fn bind(source: &str) -> BoundChunk {
	Binder::bind_chunk(&SyntaxTree::parse(source))
}

fn diagnostics(source: &str) -> Vec<DiagnosticKind> {
	bind(source).diagnostics.into_iter().map(|diagnostic| diagnostic.kind).collect()
}

/// Binds source that is expected to be well formed, and prints it.
fn print(source: &str) -> String {
	let chunk = bind(source);
	assert!(chunk.diagnostics.is_empty(), "{:?}", chunk.diagnostics);
	chunk.to_string()
}

#[test]
fn bind_globals_through_environment() {
	assert_eq!(print("x = y"), "_ENV.x = _ENV.y\n");
	assert_eq!(print("print('hi')"), "_ENV.print(\"hi\")\n");
}

/// A local named `_ENV` changes where globals are looked up.
#[test]
fn bind_local_environment() {
	let chunk = bind("local _ENV = {} x = 1");

	match &chunk.body.statements[..] {
		[BoundStatement::Local {variables, ..}, BoundStatement::Assignment {targets, ..}] =>
			match &targets[0] {
				BoundExpression::Index {target, ..} =>
					assert_eq!(**target, BoundExpression::Name(variables[0].clone())),
				target => panic!("unexpected target {:?}", target)
			},
		statements => panic!("unexpected statements {:?}", statements)
	}
}

#[test]
fn bind_shadowing() {
	let chunk = bind("local x = 1 do local x = x end");
	assert_eq!(chunk.to_string(), "local x = 1\ndo\n\tlocal x = x\nend\n");

	match &chunk.body.statements[..] {
		[BoundStatement::Local {variables: outer, ..}, BoundStatement::Do {block}] =>
			match &block.statements[0] {
				BoundStatement::Local {variables: inner, values} => {
					assert_eq!(values[0], BoundExpression::Name(outer[0].clone()));
					assert_ne!(inner[0], outer[0]);
				},
				statement => panic!("unexpected statement {:?}", statement)
			},
		statements => panic!("unexpected statements {:?}", statements)
	}
}

/// Locals are only visible after the statement declaring them.
#[test]
fn bind_local_after_declaration() {
	assert_eq!(print("local x = x"), "local x = _ENV.x\n");
	assert_eq!(print("do local y end y = 1"), "do\n\tlocal y\nend\n_ENV.y = 1\n");
}

#[test]
fn bind_local_function_recursion() {
	let chunk = bind("local function f() return f() end");

	match &chunk.body.statements[0] {
		BoundStatement::Local {variables, values} => match &values[0] {
			BoundExpression::Function {body, ..} => match &body.statements[0] {
				BoundStatement::Return {values: returned} => assert_eq!(returned[0],
					BoundExpression::call(BoundExpression::Name(variables[0].clone()), vec![])),
				statement => panic!("unexpected statement {:?}", statement)
			},
			value => panic!("unexpected value {:?}", value)
		},
		statement => panic!("unexpected statement {:?}", statement)
	}
}

#[test]
fn bind_function_statements() {
	assert_eq!(print("function f() end"), "_ENV.f = function()\nend\n");
	assert_eq!(print("function a.b:c(x) return self end"),
		"_ENV.a.b.c = function(self, x)\n\treturn self\nend\n");
	assert_eq!(print("local t function t.f(...) return ... end"),
		"local t\nt.f = function(...)\n\treturn ...\nend\n");
}

#[test]
fn bind_loop_scopes() {
	assert_eq!(print("for i = i, 2 do end"), "for i = _ENV.i, 2, 1 do -- break#1\nend\n");
	assert_eq!(print("for k in k do end"), "for k in _ENV.k do -- break#1\nend\n");
	assert_eq!(print("repeat local y = 1 until y"),
		"repeat -- break#1\n\tlocal y = 1\nuntil y\n");
}

#[test]
fn bind_break() {
	assert_eq!(print("while true do break end"),
		"while true do -- break#1\n\tgoto break#1\nend\n");
	assert_eq!(print("while a do while b do end break end"), "\
while _ENV.a do -- break#1
	while _ENV.b do -- break#2
	end
	goto break#1
end
");
}

#[test]
fn bind_break_outside_loop() {
	let chunk = bind("break");

	assert_eq!(chunk.body.statements, [BoundStatement::Expression(BoundExpression::Error)]);
	assert_eq!(chunk.diagnostics.len(), 1);
	assert_eq!(chunk.diagnostics[0].kind, DiagnosticKind::UnexpectedBreak);
	assert_eq!(chunk.diagnostics[0].location.to_string(), "0..5");
}

/// A break in a function is not in the loop around the function.
#[test]
fn bind_break_in_function_in_loop() {
	assert_eq!(diagnostics("while true do local f = function() break end end"),
		[DiagnosticKind::UnexpectedBreak]);
}

#[test]
fn bind_forward_goto() {
	let chunk = bind("goto done ::done::");
	assert!(chunk.diagnostics.is_empty(), "{:?}", chunk.diagnostics);

	match &chunk.body.statements[..] {
		[BoundStatement::Goto {label: from}, BoundStatement::Label {label: to}] =>
			assert_eq!(from, to),
		statements => panic!("unexpected statements {:?}", statements)
	}
}

#[test]
fn bind_goto_out_of_block() {
	assert_eq!(print("::top:: do goto top end"), "::top::\ndo\n\tgoto top\nend\n");
}

#[test]
fn bind_undefined_label() {
	assert_eq!(diagnostics("goto nowhere"),
		[DiagnosticKind::UndefinedLabel("nowhere".into())]);
	assert_eq!(diagnostics("do ::inner:: end goto inner"),
		[DiagnosticKind::UndefinedLabel("inner".into())]);
	assert_eq!(diagnostics("::outer:: local f = function() goto outer end"),
		[DiagnosticKind::UndefinedLabel("outer".into())]);
}

#[test]
fn bind_duplicate_label() {
	assert_eq!(diagnostics("::a:: ::a::"), [DiagnosticKind::DuplicateLabel("a".into())]);
	assert_eq!(diagnostics("::a:: do ::a:: end"), [DiagnosticKind::DuplicateLabel("a".into())]);
	assert!(diagnostics("do ::a:: end do ::a:: end").is_empty());
	assert!(diagnostics("::a:: local f = function() ::a:: end").is_empty());

	// An inner label is gone by the time a later outer label is declared.
	assert!(diagnostics("do ::a:: end ::a::").is_empty());
	assert!(diagnostics("while x do ::continue:: end ::continue::").is_empty());
	assert_eq!(diagnostics("do ::a:: end ::a:: ::a::"), [DiagnosticKind::DuplicateLabel("a".into())]);
}

/// A repeated label is still a label of its own, and gotos find the first.
#[test]
fn bind_duplicate_label_identity() {
	let chunk = bind("goto a ::a:: ::a::");

	match &chunk.body.statements[..] {
		[BoundStatement::Goto {label: from}, BoundStatement::Label {label: first},
			BoundStatement::Label {label: second}] => {
			assert_eq!(from, first);
			assert_ne!(first, second);
		},
		statements => panic!("unexpected statements {:?}", statements)
	}
}

#[test]
fn bind_vararg() {
	assert!(diagnostics("return ...").is_empty());
	assert!(diagnostics("local function f(...) return ... end").is_empty());

	let chunk = bind("local f = function() return ... end");
	assert_eq!(chunk.diagnostics.iter().map(|diagnostic| &diagnostic.kind).collect::<Vec<_>>(),
		[&DiagnosticKind::VarargOutsideVarargFunction]);
	assert_eq!(chunk.to_string(), "local f = function()\n\treturn <error>\nend\n");
}

#[test]
fn bind_attributes() {
	assert_eq!(print("local a <const>, b <close> = 1, 2"), "local a <const>, b <close> = 1, 2\n");
	assert_eq!(diagnostics("local a <close>, b <close> = f()"),
		[DiagnosticKind::MultipleToBeClosed]);
	assert_eq!(diagnostics("local a <shiny> = 1"),
		[DiagnosticKind::UnknownAttribute("shiny".into())]);
}

#[test]
fn bind_assign_to_constant() {
	assert_eq!(diagnostics("local a <const> = 1 a = 2"),
		[DiagnosticKind::AssignToConstant("a".into())]);
	assert_eq!(diagnostics("local a <close> = f() a = 2"),
		[DiagnosticKind::AssignToConstant("a".into())]);
	assert!(diagnostics("local a <const> = {} a.x = 2").is_empty());
}

#[test]
fn bind_table_positions() {
	let chunk = bind("t = {10, x = 1, 20, [5] = 3}");
	let fields = match &chunk.body.statements[0] {
		BoundStatement::Assignment {values, ..} => match &values[0] {
			BoundExpression::Table {fields} => fields.clone(),
			value => panic!("unexpected value {:?}", value)
		},
		statement => panic!("unexpected statement {:?}", statement)
	};

	assert_eq!(fields, [
		BoundField::Positional {position: 0, value: BoundExpression::integer(10)},
		BoundField::Keyed {key: BoundExpression::string("x"), value: BoundExpression::integer(1)},
		BoundField::Positional {position: 1, value: BoundExpression::integer(20)},
		BoundField::Keyed {key: BoundExpression::integer(5), value: BoundExpression::integer(3)}
	]);
}

#[test]
fn bind_expressions() {
	assert_eq!(print("local t = {} return t.x, t['y z'], t:m(1), not t, -t, (t)"),
		"local t = {}\nreturn t.x, t[\"y z\"], t:m(1), not t, -t, (t)\n");
	assert_eq!(print("return 1 + 2 * 3"), "return (1 + (2 * 3))\n");
}

/// Syntax diagnostics come before binding diagnostics.
#[test]
fn bind_keeps_syntax_diagnostics() {
	let kinds = diagnostics("goto nowhere x = = 1");

	assert!(matches!(kinds[..], [
		DiagnosticKind::ExpectedExpression {..},
		DiagnosticKind::UndefinedLabel(_)
	]));
}
