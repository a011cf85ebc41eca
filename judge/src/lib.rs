//! This crate implements the core logic of the judge: the comparator registry, the output
//! truncator, the per-case judge and the batch judge. Sandboxed execution itself lives in the
//! `sandbox` crate.
//!

#[macro_use]
extern crate error_chain;
extern crate log;
extern crate sandbox;

pub mod batch;
pub mod comparators;
pub mod per_case;
pub mod truncate;
pub mod types;

pub use batch::{judge_program, judge_program_cancellable};
pub use comparators::Comparator;
pub use per_case::judge_one;
pub use truncate::truncate;
pub use types::{BatchResult, ExerciseSpec, IoBlock, TestCase, TestCaseResult, Verdict};

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    links {
        Sandbox(::sandbox::Error, ::sandbox::ErrorKind);
    }

    errors {
        /// The exercise specification is missing a required field, names an unknown comparator,
        /// or is otherwise malformed.
        ConfigurationError(message: String) {
            description("invalid exercise configuration")
            display("{}", message)
        }
    }
}
