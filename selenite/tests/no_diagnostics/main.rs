//! Every file in the lua directory must parse, bind and lower cleanly. The
//! tests themselves are generated by the build script.

include!(concat!(env!("OUT_DIR"), "/codegen/selenite-tests-no_diagnostics-main"));
