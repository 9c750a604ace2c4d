//! Operations over built trees

mod diff;

pub use diff::diff;
