use self::super::{
	SyntaxTree,
	lexer::{Lexer, Token, TokenKind, TokenValue},
	syntax::{Expression, Field, Literal, Node, Statement}
};
use crate::{diagnostic::DiagnosticKind, text::SourceText};
use itertools::Itertools;

fn lex(source: &str) -> (Vec<Token>, Vec<DiagnosticKind>) {
	let text = SourceText::from(source);
	let mut lexer = Lexer::new(&text);
	let tokens = lexer.by_ref().collect();
	let diagnostics = lexer.into_diagnostics().into_vec().into_iter()
		.map(|diagnostic| diagnostic.kind)
		.collect();
	(tokens, diagnostics)
}

fn values(source: &str) -> Vec<TokenValue> {
	let (tokens, diagnostics) = lex(source);
	assert!(diagnostics.is_empty(), "{:?}", diagnostics);
	tokens.into_iter().map(|token| token.value).collect()
}

fn messages(tree: &SyntaxTree) -> Vec<String> {
	tree.diagnostics().iter().map(|diagnostic| diagnostic.message()).collect()
}

/// Parses `source` as the values of a return statement.
fn expression(source: &str) -> Expression {
	let tree = SyntaxTree::parse(format!("return {}", source));
	assert_eq!(messages(&tree), Vec::<String>::new());
	tree.root().block.r#return.clone().unwrap().values.remove(0)
}

/// Writes an expression with every operation parenthesized.
fn render(expression: &Expression) -> String {
	match expression {
		Expression::Literal {value, ..} => value.to_string(),
		Expression::Name(name) => name.to_string(),
		Expression::Vararg {..} => "...".into(),
		Expression::Unary {operator, operand, ..} =>
			format!("({} {})", operator, render(operand)),
		Expression::Binary {left, operator, right, ..} =>
			format!("({} {} {})", render(left), operator, render(right)),
		Expression::Parenthesized {inner, ..} => format!("[{}]", render(inner)),
		Expression::Call {receiver, method, arguments, ..} => format!("{}{}({})",
			render(receiver),
			method.as_ref().map_or(String::new(), |method| format!(":{}", method)),
			arguments.iter().map(render).join(", ")),
		Expression::Index {target, index, ..} =>
			format!("{}[{}]", render(target), render(index)),
		Expression::DottedAccess {target, name, ..} => format!("{}.{}", render(target), name),
		Expression::Function {..} => "function".into(),
		Expression::Table {..} => "table".into()
	}
}

fn assert_contained(node: Node) {
	for child in node.children() {
		assert!(node.location().contains(child.location()),
			"{} does not contain {}", node, child);
		assert_contained(child);
	}
}

#[test]
fn lex_every_operator() {
	let (tokens, diagnostics) = lex("+ - * / // % ^ # & ~ | << >> == ~= <= >= < > = :: ; : , . .. ...");
	let kinds = tokens.into_iter().map(|token| token.kind).collect::<Vec<_>>();

	assert!(diagnostics.is_empty(), "{:?}", diagnostics);
	assert_eq!(kinds, [
		TokenKind::Plus, TokenKind::Minus, TokenKind::Asterisk, TokenKind::Slash,
		TokenKind::SlashSlash, TokenKind::Percent, TokenKind::Caret, TokenKind::Hash,
		TokenKind::Ampersand, TokenKind::Tilde, TokenKind::Pipe, TokenKind::LessLess,
		TokenKind::GreaterGreater, TokenKind::EqualsEquals, TokenKind::TildeEquals,
		TokenKind::LessEquals, TokenKind::GreaterEquals, TokenKind::Less, TokenKind::Greater,
		TokenKind::Equals, TokenKind::ColonColon, TokenKind::Semicolon, TokenKind::Colon,
		TokenKind::Comma, TokenKind::Dot, TokenKind::DotDot, TokenKind::DotDotDot
	]);
}

#[test]
fn lex_keywords_and_names() {
	let (tokens, _) = lex("local functional function _ENV");
	let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();

	assert_eq!(kinds, [TokenKind::Local, TokenKind::Name, TokenKind::Function, TokenKind::Name]);
	assert_eq!(tokens[1].name(), "functional");
	assert_eq!(tokens[3].name(), "_ENV");
	assert_eq!(TokenKind::keyword("elseif"), Some(TokenKind::ElseIf));
	assert_eq!(TokenKind::keyword("functions"), None);
}

#[test]
fn lex_token_locations() {
	let (tokens, _) = lex("local x  = 10");
	let locations = tokens.iter().map(|token| token.location.to_string()).collect::<Vec<_>>();

	assert_eq!(locations, ["0..5", "6..7", "9..10", "11..13"]);
}

#[test]
fn lex_numerals() {
	assert_eq!(values("10 10.0 0x1F 1e2 .5 0x.8p1 0xA.8"), [
		TokenValue::Integer(10),
		TokenValue::Float(10.0),
		TokenValue::Integer(31),
		TokenValue::Float(100.0),
		TokenValue::Float(0.5),
		TokenValue::Float(1.0),
		TokenValue::Float(10.5)
	]);
}

/// Every numeral lexes back to the same value once written out again. Integers
/// are written in hexadecimal, as a wrapped negative like `0x8000000000000000`
/// has no decimal numeral of its own.
#[test]
fn lex_numeral_round_trip() {
	let source = "0 10 0x1F 9223372036854775807 0x8000000000000000 0xFFFFFFFFFFFFFFFF \
		10.0 1e2 .5 2.5e-3 1e300 0x.8p1 0xA.8 9223372036854775808";

	for value in values(source) {
		let numeral = match &value {
			TokenValue::Integer(integer) => format!("0x{:X}", *integer as u64),
			TokenValue::Float(float) => format!("{:?}", float),
			value => panic!("unexpected value {:?}", value)
		};

		assert_eq!(values(&numeral), [value], "{}", numeral);
	}
}

/// Decimal integers too large for an i64 become floats, while hexadecimal
/// integers wrap around.
#[test]
fn lex_numeral_overflow() {
	assert_eq!(values("9223372036854775807 9223372036854775808 0xFFFFFFFFFFFFFFFF"), [
		TokenValue::Integer(i64::MAX),
		TokenValue::Float(9223372036854775808.0),
		TokenValue::Integer(-1)
	]);
}

#[test]
fn lex_malformed_numeral() {
	let (tokens, diagnostics) = lex("3x 4");

	assert_eq!(diagnostics, [DiagnosticKind::MalformedNumber]);
	assert_eq!(tokens[0].kind, TokenKind::IntegerConstant);
	assert_eq!(tokens[0].location.to_string(), "0..2");
	assert_eq!(tokens[1].value, TokenValue::Integer(4));
}

#[test]
fn lex_escape_sequences() {
	assert_eq!(values(r#""a\x41b" 'tab\tnew\nline' "\65\066" "\u{48}\u{E9}""#), [
		TokenValue::String(b"aAb".to_vec().into()),
		TokenValue::String(b"tab\tnew\nline".to_vec().into()),
		TokenValue::String(b"AB".to_vec().into()),
		TokenValue::String(b"H\xC3\xA9".to_vec().into())
	]);
}

#[test]
fn lex_extended_utf8_escape() {
	assert_eq!(values(r#""\u{7FFFFFFF}""#),
		[TokenValue::String(b"\xFD\xBF\xBF\xBF\xBF\xBF".to_vec().into())]);
}

#[test]
fn lex_skip_whitespace_escape() {
	assert_eq!(values("'a\\z  \n   b'"), [TokenValue::String(b"ab".to_vec().into())]);
}

#[test]
fn lex_long_strings() {
	assert_eq!(values("[[plain]] [==[\nline]]still]==]"), [
		TokenValue::String(b"plain".to_vec().into()),
		TokenValue::String(b"line]]still".to_vec().into())
	]);
}

/// Every line ending style becomes a single `\n` inside long brackets.
#[test]
fn lex_long_string_line_endings() {
	assert_eq!(values("[[\r\na\r\nb\n\rc\rd]]"),
		[TokenValue::String(b"a\nb\nc\nd".to_vec().into())]);
}

/// A backslash right before a line ending continues the string on the next
/// line, keeping a single `\n`.
#[test]
fn lex_line_continuation() {
	assert_eq!(values("'a\\\nb' \"c\\\r\nd\""), [
		TokenValue::String(b"a\nb".to_vec().into()),
		TokenValue::String(b"c\nd".to_vec().into())
	]);
}

#[test]
fn lex_comments() {
	let (tokens, diagnostics) = lex("--[[ long\ncomment ]] x -- line comment\ny --[==[ ]] ]==]");
	let names = tokens.iter().map(Token::name).collect::<Vec<_>>();

	assert!(diagnostics.is_empty(), "{:?}", diagnostics);
	assert_eq!(names, ["x", "y"]);
}

#[test]
fn lex_diagnostics() {
	assert_eq!(lex("\"abc").1, [DiagnosticKind::UnterminatedString]);
	assert_eq!(lex("'abc\n'").1,
		[DiagnosticKind::UnterminatedString, DiagnosticKind::UnterminatedString]);
	assert_eq!(lex("[[abc").1, [DiagnosticKind::UnterminatedLongString]);
	assert_eq!(lex("--[[abc").1, [DiagnosticKind::UnterminatedLongComment]);
	assert_eq!(lex("[=x").1, [DiagnosticKind::InvalidLongStringDelimiter]);
	assert_eq!(lex("@").1, [DiagnosticKind::BadCharacter('@')]);
	assert_eq!(lex(r#""\q""#).1, [DiagnosticKind::InvalidEscapeSequence(Some('q'))]);
	assert_eq!(lex(r#""\300""#).1, [DiagnosticKind::DecimalEscapeTooLarge]);
	assert_eq!(lex(r#""\xG1""#).1, [DiagnosticKind::IncompleteEscapeSequence]);
	assert_eq!(lex(r#""\u{80000000}""#).1, [DiagnosticKind::Utf8ValueTooLarge]);
	assert_eq!(lex(r#""\u48""#).1,
		[DiagnosticKind::ExpectedCharacter {actual: Some('4'), expected: '{'}]);
}

/// A bad token is still a token, and lexing carries on after it.
#[test]
fn lex_after_bad_character() {
	let (tokens, _) = lex("a $ b");
	let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();

	assert_eq!(kinds, [TokenKind::Name, TokenKind::BadToken, TokenKind::Name]);
}

#[test]
fn lex_across_segments() {
	let text = SourceText::from_segments(["local gree", "ting = 'h", "i'"]);
	let tokens = Lexer::new(&text).collect::<Vec<_>>();

	assert_eq!(tokens[1].name(), "greeting");
	assert_eq!(tokens[3].value, TokenValue::String(b"hi".to_vec().into()));
	assert_eq!(text.slice(tokens[1].location), "greeting");
}

#[test]
fn parse_precedence() {
	let cases = [
		("1 + 2 * 3", "(1 + (2 * 3))"),
		("1 - 2 - 3", "((1 - 2) - 3)"),
		("2 ^ 3 ^ 2", "(2 ^ (3 ^ 2))"),
		("a .. b .. c", "(a .. (b .. c))"),
		("-2 ^ 2", "(- (2 ^ 2))"),
		("2 ^ -3", "(2 ^ (- 3))"),
		("not a == b", "((not a) == b)"),
		("a or b and c", "(a or (b and c))"),
		("1 << 2 + 3", "(1 << (2 + 3))"),
		("a < b | c & d", "(a < (b | (c & d)))"),
		("#t + 1", "((# t) + 1)")
	];

	for (source, expected) in cases {
		assert_eq!(render(&expression(source)), expected, "while parsing {}", source)
	}
}

#[test]
fn parse_prefix_expressions() {
	assert_eq!(render(&expression("a.b[c](d):e 'f'")), "a.b[c](d):e(\"f\")");
	assert_eq!(render(&expression("(f)(x)")), "[f](x)");
	assert_eq!(render(&expression("f{}")), "f(table)");
}

#[test]
fn parse_literals() {
	let values = ["nil", "true", "false", "7", "7.5", "'s'"].iter()
		.map(|source| match expression(source) {
			Expression::Literal {value, ..} => value,
			_ => panic!("{} is not a literal", source)
		})
		.collect::<Vec<_>>();

	assert_eq!(values, [
		Literal::Nil, Literal::True, Literal::False, Literal::Integer(7), Literal::Float(7.5),
		Literal::String(b"s".to_vec().into())
	]);
}

#[test]
fn parse_table_fields() {
	let fields = match expression("{1, x = 2, [3] = 4; f()}") {
		Expression::Table {fields, ..} => fields,
		_ => panic!("not a table")
	};

	assert!(matches!(fields[0], Field::Positional {..}));
	assert!(matches!(&fields[1], Field::Named {name, ..} if &*name.value == "x"));
	assert!(matches!(fields[2], Field::Keyed {..}));
	assert!(matches!(fields[3], Field::Positional {value: Expression::Call {..}, ..}));
}

#[test]
fn parse_statements() {
	let tree = SyntaxTree::parse("\
		local a <const>, b = 1\n\
		a.b, c[1] = 2, 3\n\
		f(x)\n\
		obj:method()\n\
		if a then elseif b then else end\n\
		while a do break end\n\
		repeat local y until y\n\
		for i = 1, 10, 2 do end\n\
		for k, v in pairs(t) do end\n\
		do goto done end\n\
		::done::\n\
		function a.b:c(...) end\n\
		local function g() end\n\
		return 1, 2\n\
	");
	let statements = &tree.root().block.statements;

	assert_eq!(messages(&tree), Vec::<String>::new());
	assert!(matches!(&statements[0], Statement::Local {declarations, values, ..}
		if declarations.len() == 2 && values.len() == 1
			&& declarations[0].attribute.as_ref().map(|name| &*name.value) == Some("const")));
	assert!(matches!(&statements[1], Statement::Assignment {targets, values, ..}
		if targets.len() == 2 && values.len() == 2));
	assert!(matches!(statements[2], Statement::Call {..}));
	assert!(matches!(statements[3], Statement::Call {..}));
	assert!(matches!(&statements[4], Statement::If {else_ifs, r#else: Some(_), ..}
		if else_ifs.len() == 1));
	assert!(matches!(statements[5], Statement::While {..}));
	assert!(matches!(statements[6], Statement::Repeat {..}));
	assert!(matches!(statements[7], Statement::NumericFor {step: Some(_), ..}));
	assert!(matches!(&statements[8], Statement::GenericFor {variables, ..}
		if variables.len() == 2));
	assert!(matches!(statements[9], Statement::Do {..}));
	assert!(matches!(statements[10], Statement::Label {..}));
	assert!(matches!(&statements[11], Statement::Function {name, body, ..}
		if name.to_string() == "a.b:c" && body.vararg));
	assert!(matches!(statements[12], Statement::LocalFunction {..}));
	assert_eq!(statements.len(), 13);
	assert_eq!(tree.root().block.r#return.as_ref().map(|r#return| r#return.values.len()),
		Some(2));
}

#[test]
fn parse_invalid_assignment_target() {
	let tree = SyntaxTree::parse("(a) = 1");
	assert_eq!(messages(&tree), ["Expression cannot be assigned to."]);
	assert_eq!(tree.diagnostics()[0].location.to_string(), "0..3");
	assert!(matches!(tree.root().block.statements[0], Statement::Assignment {..}));

	let tree = SyntaxTree::parse("a, f() = 1, 2");
	assert_eq!(messages(&tree), ["Expression cannot be assigned to."]);
}

/// A bare parenthesized expression is neither a call nor an assignment.
#[test]
fn parse_lone_parenthesized_expression() {
	let tree = SyntaxTree::parse("(f)");

	assert_eq!(messages(&tree), [
		"Expression cannot be assigned to.",
		"Unexpected token <EndOfFile>, expected <Equals>."
	]);
}

#[test]
fn parse_missing_end() {
	let tree = SyntaxTree::parse("if x then");

	assert_eq!(messages(&tree), ["Unexpected token <EndOfFile>, expected <End>."]);
	assert!(matches!(tree.root().block.statements[0], Statement::If {..}));
}

#[test]
fn parse_trailing_tokens() {
	let tree = SyntaxTree::parse("local x = 1 end local y = 2");

	assert_eq!(messages(&tree), ["Unexpected token <End>, expected <EndOfFile>."]);
	assert_eq!(tree.root().block.statements.len(), 2);
}

#[test]
fn parse_recovers_after_bad_statement() {
	let tree = SyntaxTree::parse("x = = 1\ny = 2");

	assert_eq!(messages(&tree), ["Unexpected token <Equals>, expected <expression>."]);
	assert!(matches!(&tree.root().block.statements[..],
		[Statement::Assignment {..}, Statement::Assignment {..}]));
}

/// Missing tokens are synthesized with zero width, where they should have
/// been.
#[test]
fn parse_missing_name() {
	let tree = SyntaxTree::parse("a. = 1");

	match &tree.root().block.statements[0] {
		Statement::Assignment {targets, ..} => match &targets[0] {
			Expression::DottedAccess {name, ..} => {
				assert_eq!(&*name.value, "");
				assert_eq!(name.location.to_string(), "3..3");
			},
			target => panic!("unexpected target {:?}", target)
		},
		statement => panic!("unexpected statement {:?}", statement)
	}
	assert_eq!(messages(&tree), ["Unexpected token <Equals>, expected <Name>."]);
}

#[test]
fn parse_empty_source() {
	let tree = SyntaxTree::parse("  -- nothing\n");

	assert!(tree.diagnostics().is_empty());
	assert!(tree.root().block.statements.is_empty());
	assert_eq!(tree.root().location.to_string(), "0..13");
}

#[test]
fn parse_locations_nest() {
	let sources = [
		"local function f(a, ...) return a, ... end",
		"t = {1, x = 2, [3] = 4; f()}",
		"for i = 1, 10, 2 do print(i) end",
		"if a then elseif b then else end",
		"x = = 1",
		"a.",
		"local x <const> = (1",
		"f(",
		"repeat until",
		"function a.b:c( end"
	];

	for source in sources {
		let tree = SyntaxTree::parse(source);
		let root = Node::Chunk(tree.root());
		assert_eq!(root.location().to_string(), format!("0..{}", source.len()));
		assert_contained(root);
	}
}

/// Empty blocks sit right after the keyword opening them.
#[test]
fn parse_empty_block_locations() {
	let tree = SyntaxTree::parse("if a then elseif b then else end");

	match &tree.root().block.statements[..] {
		[Statement::If {block, else_ifs, r#else: Some(r#else), ..}] => {
			assert_eq!(block.location.to_string(), "9..9");
			assert_eq!(else_ifs[0].block.location.to_string(), "23..23");
			assert_eq!(r#else.location.to_string(), "28..28");
		},
		statements => panic!("unexpected statements {:?}", statements)
	}
}

#[test]
fn print_tree() {
	let tree = SyntaxTree::parse("local x = 1");

	assert_eq!(tree.to_string(), "\
Chunk 0..11
└── Block 0..11
    └── LocalStatement 0..11
        ├── LocalDeclaration x 6..7
        └── LiteralExpression 1 10..11
");
}

#[test]
fn print_tree_branches() {
	let tree = SyntaxTree::parse("f(a + 1)\nreturn");

	assert_eq!(tree.to_string(), "\
Chunk 0..15
└── Block 0..15
    ├── CallStatement 0..8
    │   └── CallExpression 0..8
    │       ├── NameExpression f 0..1
    │       └── BinaryExpression + 2..7
    │           ├── NameExpression a 2..3
    │           └── LiteralExpression 1 6..7
    └── ReturnStatement 9..15
");
}
