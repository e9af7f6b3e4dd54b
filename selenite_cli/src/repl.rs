use self::super::{handle_io, print_diagnostics};
use selenite::{
	ast::{SyntaxTree, lexer::TokenKind},
	binder::Binder,
	diagnostic::{Diagnostic, DiagnosticKind},
	text::SourceText
};
use std::{io::{BufRead, Write, stdin, stdout}, iter::once};

/// Whether `diagnostics` show that the input simply ended too soon, and more
/// lines might complete it.
fn unfinished(diagnostics: &[Diagnostic]) -> bool {
	diagnostics.iter().any(|diagnostic| matches!(diagnostic.kind,
		DiagnosticKind::UnexpectedToken {actual: TokenKind::EndOfFile, ..}
			| DiagnosticKind::ExpectedExpression {actual: TokenKind::EndOfFile}
			| DiagnosticKind::UnterminatedLongString
			| DiagnosticKind::UnterminatedLongComment))
}

/// Reads one line of input, after showing a prompt. Returns `None` at the end
/// of input.
fn read_line(continuation: bool) -> Option<String> {
	let stdin = stdin();
	let stdout = stdout();
	let mut stdin = stdin.lock();
	let mut stdout = stdout.lock();

	let prompt: &[u8] = if continuation {b">> "} else {b"> "};
	handle_io(stdout.write_all(prompt));
	handle_io(stdout.flush());

	let mut line = String::with_capacity(80);
	match handle_io(stdin.read_line(&mut line)) {
		0 => None,
		_ => Some(line)
	}
}

/// Checks Lua a statement at a time, printing the bound tree of each, or its
/// diagnostics.
///
/// Each line is kept as a segment of its own, so a statement spanning several
/// lines is never copied into one buffer.
pub fn repl() {
	loop {
		let mut lines = Vec::new();

		let tree = loop {
			match read_line(!lines.is_empty()) {
				Some(line) => lines.push(line),
				None => return
			}

			// Like the standalone interpreter, try the input as an expression first.
			let expression = SyntaxTree::parse(SourceText::from_segments(
				once("return ".to_string()).chain(lines.iter().cloned())));
			if expression.diagnostics().is_empty() {break expression}

			let statement = SyntaxTree::parse(SourceText::from_segments(lines.iter().cloned()));
			if !unfinished(statement.diagnostics()) {break statement}
		};

		let bound = Binder::bind_chunk(&tree);
		match bound.diagnostics.is_empty() {
			true => print!("{}", bound),
			false => print_diagnostics("stdin", tree.text(), &bound.diagnostics)
		}
	}
}
