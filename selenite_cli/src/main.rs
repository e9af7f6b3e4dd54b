mod arguments;
mod repl;

use self::{
	arguments::{HELP, Arguments, ExecutionType, Source},
	repl::repl
};
use log::{LevelFilter, Log, Metadata, Record};
use selenite::{
	ast::{SyntaxTree, lexer::Lexer},
	binder::Binder,
	diagnostic::Diagnostic,
	lower::Lowerer,
	text::SourceText
};
use std::{io::Error as IOError, process::exit};

pub static VERSION: &str = "\
Selenite 0.1.0 Beta
Targeting Lua 5.4";

fn main() {
	match Arguments::from_env() {
		Ok(Arguments::ShowHelp) => eprintln!("{}", HELP),
		Ok(Arguments::ShowVersion) => eprintln!("{}", VERSION),
		Ok(Arguments::Run {source, execution, verbose}) => {
			if verbose {init_logger()}

			match (source, execution) {
				(None, _) => repl(),
				(Some(source), ExecutionType::CheckInteractively) => {
					check(source);
					repl()
				},
				(Some(source), execution) => if !run(source, execution) {exit(2)}
			}
		},
		Err(error) => {
			eprintln!("argument error: {}\n\n{}", error, HELP);
			exit(1);
		}
	}
}

fn handle_io<T>(result: Result<T, IOError>) -> T {
	match result {
		Ok(value) => value,
		Err(error) => {
			eprintln!("io error: {}", error);
			exit(3);
		}
	}
}

/// Runs every stage on `source`, printing whatever `execution` asks for, and
/// then its diagnostics. Returns whether there were no diagnostics.
fn run(source: Source, execution: ExecutionType) -> bool {
	let name = source.name();
	let tree = SyntaxTree::parse(handle_io(source.read()));

	match execution {
		ExecutionType::ShowTokens => show_tokens(tree.text()),
		ExecutionType::ShowSyntaxTree => print!("{}", tree),
		_ => ()
	}

	let bound = Binder::bind_chunk(&tree);
	let chunk = match execution {
		ExecutionType::ShowLoweredTree => Lowerer::lower(bound),
		_ => bound
	};

	match execution {
		ExecutionType::ShowBoundTree | ExecutionType::ShowLoweredTree => print!("{}", chunk),
		_ => ()
	}

	print_diagnostics(&name, tree.text(), &chunk.diagnostics);
	chunk.diagnostics.is_empty()
}

/// Checks `source`, printing its diagnostics, before an interactive session.
fn check(source: Source) {
	run(source, ExecutionType::Check);
}

fn show_tokens(text: &SourceText) {
	Lexer::new(text).for_each(|token|
		println!("{:<10} {:<16} {}", token.location.to_string(), format!("{:?}", token.kind), token))
}

/// Prints each diagnostic to standard error, with the line it concerns and an
/// underline beneath the offending text.
pub fn print_diagnostics(name: &str, text: &SourceText, diagnostics: &[Diagnostic]) {
	if diagnostics.is_empty() {return}
	let source = text.segments().collect::<String>();

	diagnostics.iter().for_each(|diagnostic| {
		let (line, column) = text.line_column(diagnostic.location.start);
		let content = source.split('\n').nth(line - 1).unwrap_or("").trim_end_matches('\r');

		// Tabs are kept, so that the underline lines up however they render.
		let indent = content.chars().take(column)
			.map(|character| if character == '\t' {'\t'} else {' '})
			.collect::<String>();
		let width = text.slice(diagnostic.location).chars()
			.take_while(|&character| character != '\n')
			.count();

		eprintln!("{}:{}:{}: {}", name, line, column + 1, diagnostic.message());
		eprintln!("\t{}", content);
		eprintln!("\t{}^{}", indent, "~".repeat(width.saturating_sub(1)));
	});

	eprintln!("{} diagnostic{}", diagnostics.len(), if diagnostics.len() == 1 {""} else {"s"});
}

/// Writes every log record to standard error.
struct StandardErrorLogger;

impl Log for StandardErrorLogger {
	fn enabled(&self, _: &Metadata) -> bool {
		true
	}

	fn log(&self, record: &Record) {
		eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args())
	}

	fn flush(&self) {}
}

static LOGGER: StandardErrorLogger = StandardErrorLogger;

fn init_logger() {
	match log::set_logger(&LOGGER) {
		Ok(()) => log::set_max_level(LevelFilter::Trace),
		Err(error) => eprintln!("logger error: {}", error)
	}
}
