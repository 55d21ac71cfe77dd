//! ASK Local Mirror
//!
//! Keeps a working copy of the upstream OurAirports data repository on disk
//! and reports the commit it currently sits on.

pub mod error;
pub mod git;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::MirrorError;
pub use git::{DEFAULT_UPSTREAM_URL, GitMirror};
pub use source::{CommitInfo, MirrorSnapshot, MirrorSource};
