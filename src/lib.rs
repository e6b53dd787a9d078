//! Binding generator for annotated engine interface headers.
//!
//! Scans C++ headers carrying `/*--urge(...)--*/` annotations into a typed
//! schema, then emits the MRI (Ruby) binding translation units, the aggregate
//! init header and a JSON dump of the schema. The pipeline is a single pass
//! per header followed by whole-schema generation:
//!
//! 1. [`scanner`] turns one header into schema entities plus diagnostics;
//! 2. [`dependency`] extracts the handle-reference set of each entity;
//! 3. [`generator`] renders the C++ units from the merged [`schema::Schema`];
//! 4. [`discovery`] drives the directory walk, the rayon fan-out and output
//!    writing, with an incremental skip from [`cache`].

pub mod annotation;
pub mod cache;
pub mod dependency;
pub mod diagnostics;
pub mod discovery;
pub mod generator;
pub mod registry;
pub mod scanner;
pub mod schema;
pub mod types;

#[cfg(test)]
mod scanner_tests;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use discovery::{run, BindgenError, RunOptions, RunReport};
pub use scanner::{scan_header, ScanOutput};
pub use schema::{Entity, Schema};
