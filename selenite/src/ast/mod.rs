pub mod lexer;
pub mod parser;
pub mod syntax;
#[cfg(test)]
pub mod tests;

use self::{parser::Parser, syntax::Chunk};
use crate::{diagnostic::Diagnostic, text::SourceText};
use std::{
	fmt::{Display, Formatter, Result as FMTResult},
	fs::read_to_string,
	io::Result as IOResult,
	path::Path
};

/// A parsed source file: its text, its syntax tree, and every diagnostic
/// reported while lexing and parsing it.
///
/// Parsing never fails. A tree is always produced, and
/// [`diagnostics`](Self::diagnostics) is empty exactly when the source was well
/// formed.
///
/// Examples
/// --------
/// ```rust
/// # use selenite::ast::{SyntaxTree, syntax::Statement};
/// let tree = SyntaxTree::parse("local x = 1 print(x)");
///
/// assert!(tree.diagnostics().is_empty());
/// assert!(matches!(tree.root().block.statements[1], Statement::Call {..}));
/// ```
#[derive(Clone, Debug)]
pub struct SyntaxTree {
	text: SourceText,
	root: Chunk,
	diagnostics: Vec<Diagnostic>
}

impl SyntaxTree {
	pub fn parse(text: impl Into<SourceText>) -> Self {
		let text = text.into();
		let mut parser = Parser::new(&text);
		let root = parser.parse_chunk();
		let diagnostics = parser.into_diagnostics().into_vec();

		log::debug!("parsed {} bytes with {} diagnostics", text.len(), diagnostics.len());
		Self {text, root, diagnostics}
	}

	/// Reads and parses the file at `path`. Only reading the file can fail.
	pub fn load(path: impl AsRef<Path>) -> IOResult<Self> {
		let path = path.as_ref();
		log::trace!("loading {}", path.display());
		Ok(Self::parse(read_to_string(path)?))
	}

	pub fn text(&self) -> &SourceText {
		&self.text
	}

	pub fn root(&self) -> &Chunk {
		&self.root
	}

	pub fn diagnostics(&self) -> &[Diagnostic] {
		&self.diagnostics
	}
}

impl Display for SyntaxTree {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		self.root.fmt(f)
	}
}
