//! Assignment engine: the rules for acquiring, declining, and grading tasks.

pub mod machine;
pub mod outcome;

pub use machine::AssignmentEngine;
pub use outcome::{
    AcceptOutcome, DeclineOutcome, GradeOutcome, RequestOutcome, TaskPage, Verdict,
};
