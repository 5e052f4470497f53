//! Data model for dependency maintenance scans.
//!
//! A scan turns immutable [`DependencyCoordinate`]s into
//! [`DependencyRecord`]s, classified by a [`ScanPolicy`] and collected into a
//! [`ScanResult`].

mod dependency;
mod policy;
mod result;

pub use dependency::*;
pub use policy::*;
pub use result::*;
