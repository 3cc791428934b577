//! Backport target schema.
//!
//! A target file is a YAML sequence of package entries:
//!
//! ```yaml
//! - package: nova
//! - package: cinder
//!   suffix: ~cloud1
//!   reason: LP#2051234
//! ```
//!
//! - `PackageRecord`: one entry; `suffix` defaults to [`DEFAULT_SUFFIX`]
//! - `TargetFile`: the whole file, with unique package names
//! - `SchemaError` / `Violation`: what went wrong when a document is rejected

pub mod error;
pub mod package;
pub mod target;

pub use error::{SchemaError, Violation};
pub use package::{PackageRecord, DEFAULT_SUFFIX};
pub use target::TargetFile;
