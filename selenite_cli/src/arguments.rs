pub use pico_args::Error;
use pico_args::Arguments as Parser;
use std::{
	fs::read_to_string,
	io::Error as IOError,
	path::PathBuf
};

pub static HELP: &str = "\
Lua 5.4 Front End

Selenite is licensed under GPL-3.0.
The Lua programming language is owned and copyrighted by PUC-Rio.

SYNOPSIS:
	selenite [OPTIONS] [SOURCE]

DESCRIPTION:
	selenite is a standalone Lua checker. It lexes, parses and binds Lua source code, reporting every problem it finds along the way, without running anything.

	SOURCE is either checked directly, if -e is passed, otherwise the file named SOURCE is loaded and checked. Rather than only reporting diagnostics, the tokens, syntax tree, bound tree or lowered tree of SOURCE may be shown instead. If SOURCE is not provided, or -i is passed, an interactive prompt starts.

	Passing -v will print verbose information to standard error.

OPTIONS:
	-h, --help        Displays this and quits
	-V, --version     Displays version information
	-v, --verbose     Runs with verbose output
	-i, --interactive Runs in interactive mode, after checking SOURCE
	-e, --evaluate    Treats source as direct source code, rather than a file
	-t, --tokens      Shows tokens rather than diagnostics
	-s, --ast         Shows the syntax tree rather than diagnostics
	-b, --bound       Shows the bound tree rather than diagnostics
	-l, --lowered     Shows the lowered tree rather than diagnostics";

#[derive(Debug)]
pub enum Arguments {
	ShowHelp,
	ShowVersion,
	Run {
		source: Option<Source>,
		execution: ExecutionType,
		verbose: bool
	}
}

#[derive(Debug)]
pub enum Source {
	File(PathBuf),
	Code(String)
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExecutionType {
	Check,
	CheckInteractively,
	ShowTokens,
	ShowSyntaxTree,
	ShowBoundTree,
	ShowLoweredTree
}

impl Arguments {
	pub fn from_env() -> Result<Self, Error> {
		let mut parser = Parser::from_env();

		if parser.contains(["-h", "--help"]) {return Ok(Self::ShowHelp)}
		if parser.contains(["-V", "--version"]) {return Ok(Self::ShowVersion)}

		let verbose = parser.contains(["-v", "--verbose"]);
		let interactive = parser.contains(["-i", "--interactive"]);
		let tokens = parser.contains(["-t", "--tokens"]);
		let syntax_tree = parser.contains(["-s", "--ast"]);
		let bound_tree = parser.contains(["-b", "--bound"]);
		let lowered_tree = parser.contains(["-l", "--lowered"]);

		let source = if parser.contains(["-e", "--evaluate"])
				{Some(Source::Code(parser.free_from_str()?))}
			else {parser.opt_free_from_str()?.map(Source::File)};

		let execution = if interactive || source.is_none() {
			ExecutionType::CheckInteractively
		} else if tokens {
			ExecutionType::ShowTokens
		} else if syntax_tree {
			ExecutionType::ShowSyntaxTree
		} else if bound_tree {
			ExecutionType::ShowBoundTree
		} else if lowered_tree {
			ExecutionType::ShowLoweredTree
		} else {
			ExecutionType::Check
		};

		Ok(Self::Run {source, execution, verbose})
	}
}

impl Source {
	/// Reads this source's code, loading it from disk if it is a file.
	pub fn read(self) -> Result<String, IOError> {
		match self {
			Self::Code(code) => Ok(code),
			Self::File(file) => read_to_string(file)
		}
	}

	/// A name for this source, to show in diagnostics.
	pub fn name(&self) -> String {
		match self {
			Self::Code(_) => "(command line)".to_string(),
			Self::File(file) => file.display().to_string()
		}
	}
}
