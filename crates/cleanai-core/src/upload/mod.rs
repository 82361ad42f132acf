//! Upload intake: per-file acceptance rules applied before files enter the
//! session.

mod validator;

pub use validator::{BatchReport, FileValidator, Rejection, Verdict};
