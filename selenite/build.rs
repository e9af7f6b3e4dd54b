//! This file mainly just runs different build scripts for integration tests.

use self::tests::no_diagnostics;

pub mod tests {
	use std::env::{current_dir, var};

	pub mod no_diagnostics {
		include!("./tests/no_diagnostics/build.rs");
	}

	pub fn no_diagnostics() {
		let build = var("OUT_DIR").unwrap();
		let current = current_dir().unwrap().join("tests/no_diagnostics/");
		no_diagnostics::build(&current, build.as_ref());
	}
}

fn main() {
	no_diagnostics();
}
