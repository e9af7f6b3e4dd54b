use self::super::symbol::{LabelSymbol, LocalSymbol};
use crate::text::SequencePosition;
use hashbrown::HashMap;

/// An index into a [`ScopeStack`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct DeclaredLabel {
	symbol: LabelSymbol,
	start: SequencePosition
}

/// One lexical scope, holding the locals and labels declared directly in it.
#[derive(Debug, Default)]
pub struct Scope {
	parent: Option<ScopeId>,
	variables: HashMap<Box<str>, LocalSymbol>,

	/// In source order. A name may repeat, in malformed code.
	labels: Vec<DeclaredLabel>,

	/// Whether label lookups end at this scope. Set for function bodies, as a
	/// goto cannot leave the function it is in.
	stop_label_search: bool
}

impl Scope {
	pub fn variable(&self, name: &str) -> Option<&LocalSymbol> {
		self.variables.get(name)
	}

	/// The first label of this name declared directly in this scope.
	pub fn label(&self, name: &str) -> Option<&LabelSymbol> {
		self.labels.iter()
			.find(|label| label.symbol.name() == name)
			.map(|label| &label.symbol)
	}
}

/// The chain of scopes enclosing the node being bound.
///
/// Scopes live in an arena that follows the block structure exactly; pushing
/// a scope makes it the current one, and popping drops it for good.
#[derive(Debug, Default)]
pub struct ScopeStack {
	scopes: Vec<Scope>
}

impl ScopeStack {
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a new scope inside the current one, and makes it current.
	pub fn push(&mut self, stop_label_search: bool) -> ScopeId {
		let parent = self.current();
		self.scopes.push(Scope {parent, stop_label_search, ..Scope::default()});
		ScopeId(self.scopes.len() - 1)
	}

	/// Closes the current scope, discarding everything declared in it.
	pub fn pop(&mut self) {
		self.scopes.pop();
	}

	pub fn current(&self) -> Option<ScopeId> {
		self.scopes.len().checked_sub(1).map(ScopeId)
	}

	pub fn get(&self, id: ScopeId) -> Option<&Scope> {
		self.scopes.get(id.0)
	}

	/// Walks from the current scope outward through its parents.
	fn chain(&self) -> impl Iterator<Item = &Scope> + '_ {
		let mut next = self.current();
		std::iter::from_fn(move || {
			let scope = self.get(next?)?;
			next = scope.parent;
			Some(scope)
		})
	}

	/// The scopes a label lookup may search: the current scope outward, up to
	/// and including the nearest function boundary.
	fn label_chain(&self) -> impl Iterator<Item = &Scope> + '_ {
		let mut stopped = false;
		self.chain().take_while(move |scope| {
			let take = !stopped;
			stopped |= scope.stop_label_search;
			take
		})
	}

	/// Declares a local in the current scope, shadowing any visible local of
	/// the same name.
	pub fn declare_variable(&mut self, symbol: LocalSymbol) {
		if let Some(scope) = self.scopes.last_mut()
			{scope.variables.insert(symbol.name().into(), symbol);}
	}

	pub fn lookup_variable(&self, name: &str) -> Option<&LocalSymbol> {
		self.chain().find_map(|scope| scope.variable(name))
	}

	/// Declares a label in the current scope, found at `start` in the source.
	pub fn declare_label(&mut self, symbol: LabelSymbol, start: SequencePosition) {
		if let Some(scope) = self.scopes.last_mut()
			{scope.labels.push(DeclaredLabel {symbol, start})}
	}

	/// Whether a label named `name`, found at `start`, would clash with one
	/// already active there. That is one declared before it, either in the
	/// current scope or in an enclosing scope of the same function.
	pub fn label_clashes(&self, name: &str, start: SequencePosition) -> bool {
		self.label_chain().any(|scope| scope.labels.iter()
			.any(|label| label.start < start && label.symbol.name() == name))
	}

	/// Finds a label visible from the current scope, without leaving the
	/// current function.
	pub fn lookup_label(&self, name: &str) -> Option<&LabelSymbol> {
		self.label_chain().find_map(|scope| scope.label(name))
	}

	/// Finds the label declared directly in the current scope at `start`.
	pub fn local_label(&self, start: SequencePosition) -> Option<&LabelSymbol> {
		self.scopes.last()?.labels.iter()
			.find(|label| label.start == start)
			.map(|label| &label.symbol)
	}
}
