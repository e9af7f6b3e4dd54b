// This file builds integration tests for each file in the lua directory. The
// test is to check that a well formed Lua source file makes it through every
// stage of Selenite without a single diagnostic, and parses the same whether it
// is read whole or a line at a time. A file may also have a sibling .lowered
// file, holding the expected output of the lowered tree's pretty printer.

use std::{path::Path, fs::{File, create_dir_all, read_dir}, io::{Error, Write}};

static HEADER: &str = r#"use selenite::{
	ast::SyntaxTree,
	binder::Binder,
	diagnostic::Diagnostic,
	lower::Lowerer,
	text::SourceText
};
use diff::{Result as Diff, lines};

/// Prints every diagnostic of [name], returning whether there were any.
fn report(name: &str, text: &SourceText, diagnostics: &[Diagnostic]) -> bool {
	diagnostics.iter().for_each(|diagnostic| {
		let (line, column) = text.line_column(diagnostic.location.start);
		eprintln!("{}:{}:{}: {}", name, line, column + 1, diagnostic.message());
	});

	!diagnostics.is_empty()
}

/// Prints a line diff of [expected] and [actual], returning whether they
/// differ.
fn compare(what: &str, expected: &str, actual: &str) -> bool {
	if expected == actual {return false}

	eprintln!("The {} differs from what was expected.", what);
	lines(expected, actual).into_iter()
		.for_each(|result| match result {
			Diff::Left(left) => eprintln!("\x1B[31m-{}\x1B[0m", left),
			Diff::Right(right) => eprintln!("\x1B[32m+{}\x1B[0m", right),
			Diff::Both(both, _) => eprintln!(" {}", both)
		});
	true
}
"#;

fn manufacture_test(name: &str, lua: &Path, lowered: Option<&Path>) -> String {
	let golden = match lowered {
		Some(lowered) => format!("
	static LOWERED: &str = include_str!({:?});
	failed |= compare(\"lowered tree\", LOWERED, &lowered.to_string());
", lowered),
		None => String::new()
	};

	format!("
#[test]
fn {name}() -> Result<(), ()> {{
	static CODE: &str = include_str!({lua:?});

	let tree = SyntaxTree::parse(CODE);
	let lowered = Lowerer::lower(Binder::bind_chunk(&tree));
	let mut failed = report({file:?}, tree.text(), &lowered.diagnostics);

	let segmented = SyntaxTree::parse(SourceText::from_segments(CODE.split_inclusive('\\n')));
	failed |= compare(\"syntax tree of the segmented source\",
		&tree.to_string(), &segmented.to_string());
{golden}
	if failed {{Err(())}} else {{Ok(())}}
}}
",
		name = name, lua = lua, golden = golden,
		file = lua.file_name().unwrap_or_default().to_string_lossy())
}

fn snake_case(camel_case: &str) -> String {
	let mut snake_case = String::with_capacity(
		(camel_case.len() as f32 * 1.25) as usize);

	camel_case.chars().for_each(|char| {
		if char.is_uppercase() {snake_case.push('_')};
		char.to_lowercase().for_each(|char| snake_case.push(char))
	});

	snake_case
}

pub fn build(working: &Path, output: &Path) {
	println!("cargo:rerun-if-changed={}", working.join("lua").to_string_lossy());

	let file = read_dir(working.join("lua")).unwrap()
		.map(|file| {
			let file = file?;
			let path = file.path();

			if !file.file_type()?.is_file() || path.extension().map_or(true, |extension| extension != "lua")
				{return Ok(String::new())}

			let function = match path.file_stem().and_then(|stem| stem.to_str()) {
				Some(stem) => snake_case(stem),
				None => return Ok(String::new())
			};
			let lowered = path.with_extension("lowered");
			let lowered = if lowered.is_file() {Some(lowered.as_path())} else {None};

			Ok(manufacture_test(&function, &path, lowered))
		})
		.collect::<Result<String, Error>>()
		.unwrap();

	let file = format!("{}{}", HEADER, file);
	create_dir_all(output.join("codegen")).unwrap();
	File::create(output.join("codegen/selenite-tests-no_diagnostics-main")).unwrap()
		.write_all(file.as_bytes()).unwrap();
}
