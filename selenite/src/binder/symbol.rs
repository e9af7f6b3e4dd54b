use std::{
	fmt::{Display, Formatter, Result as FMTResult},
	hash::{Hash, Hasher},
	sync::Arc
};

#[derive(Debug)]
struct LocalData {
	name: Box<str>,
	constant: bool,
	to_be_closed: bool
}

/// A local variable.
///
/// Symbols are compared by identity, not by name; two locals named `x` in
/// different scopes are different symbols, and a redeclared `x` shadows the
/// previous one. Cloning a symbol only clones a handle to it.
#[derive(Clone, Debug)]
pub struct LocalSymbol(Arc<LocalData>);

impl LocalSymbol {
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self::with_attributes(name, false, false)
	}

	/// Creates a local declared with `<const>`, `<close>`, or neither.
	pub fn with_attributes(name: impl Into<Box<str>>, constant: bool, to_be_closed: bool)
			-> Self {
		Self(Arc::new(LocalData {name: name.into(), constant, to_be_closed}))
	}

	pub fn name(&self) -> &str {
		&self.0.name
	}

	/// Whether this local may not be assigned to after its declaration. True
	/// for both `<const>` and `<close>` locals.
	pub fn is_constant(&self) -> bool {
		self.0.constant || self.0.to_be_closed
	}

	pub fn is_to_be_closed(&self) -> bool {
		self.0.to_be_closed
	}
}

impl PartialEq for LocalSymbol {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for LocalSymbol {}

impl Hash for LocalSymbol {
	fn hash<H: Hasher>(&self, state: &mut H) {
		Arc::as_ptr(&self.0).hash(state)
	}
}

impl Display for LocalSymbol {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		write!(f, "{}", self.0.name)
	}
}

/// A goto target, either written by the user or generated for a loop.
///
/// Like [`LocalSymbol`], labels are compared by identity.
#[derive(Clone, Debug)]
pub struct LabelSymbol(Arc<str>);

impl LabelSymbol {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self(name.into())
	}

	pub fn name(&self) -> &str {
		&self.0
	}
}

impl PartialEq for LabelSymbol {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for LabelSymbol {}

impl Hash for LabelSymbol {
	fn hash<H: Hasher>(&self, state: &mut H) {
		Arc::as_ptr(&self.0).cast::<u8>().hash(state)
	}
}

impl Display for LabelSymbol {
	fn fmt(&self, f: &mut Formatter<'_>) -> FMTResult {
		write!(f, "{}", self.0)
	}
}
