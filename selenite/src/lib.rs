#![forbid(
	// Rationale: A compiler front end handles untrusted source text, and has no
	// business doing anything the borrow checker cannot vouch for.
	unsafe_code
)]
#![warn(
	// Rationale: Malformed input must surface as diagnostics, never as panics,
	// and situations where panics are intentional should be well documented
	// (requiring an allow attribute to signal complete documentation).
	clippy::unwrap_used,
	clippy::panic,

	// Rationale: These should not be in production code.
	clippy::todo,
	clippy::unimplemented
)]
#![allow(
	// Rationale: Tabs are superior, don't at me.
	clippy::tabs_in_doc_comments
)]
//! Selenite is a front end for Lua 5.4, written entirely in safe Rust. Selenite
//! is a mineral named after the moon, which is what lua means in portugese.
//!
//! This project is made of four components, each feeding the next.
//! - [ast::lexer] - The Lua lexer, responsible for tokenizing Lua source text
//! - [ast::parser] - The Lua parser, responsible for building a
//!   [syntax tree](ast::syntax) from tokens
//! - [binder] - The binder, responsible for resolving every name and label to
//!   a symbol
//! - [lower] - The lowerer, responsible for rewriting structured control flow
//!   into labels and gotos
//!
//! None of these stages fail. Problems with the source text are collected as
//! [diagnostics](diagnostic), and every stage carries on with a best effort
//! tree.
//!
//! Examples
//! --------
//! Checking Lua source text only requires stringing each stage together.
//! ```rust
//! use selenite::{ast::SyntaxTree, binder::Binder, lower::Lowerer};
//!
//! // Parse our source code into a syntax tree.
//! let tree = SyntaxTree::parse("for i = 1, 3 do print(i) end");
//! // Resolve its names...
//! let bound = Binder::bind_chunk(&tree);
//! // And flatten its control flow.
//! let lowered = Lowerer::lower(bound);
//!
//! assert!(lowered.diagnostics.is_empty());
//! ```
//! Malformed code still produces a tree, along with diagnostics explaining
//! what went wrong.
//! ```rust
//! use selenite::ast::SyntaxTree;
//!
//! let tree = SyntaxTree::parse("x = = 1");
//! let messages = tree.diagnostics().iter()
//! 	.map(|diagnostic| diagnostic.message())
//! 	.collect::<Vec<_>>();
//!
//! assert_eq!(messages, ["Unexpected token <Equals>, expected <expression>."]);
//! ```

pub mod ast;
pub mod binder;
pub mod diagnostic;
pub mod lower;
pub mod text;
