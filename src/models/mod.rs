//! Domain models for pbxsplice.
//!
//! # Core Concepts
//!
//! ## Document structure
//!
//! - [`Section`]: a `/* Begin <Name> section */ … /* End <Name> section */` span
//!   holding every record of one kind.
//! - [`ObjectRecord`]: one `<id> /* <comment> */ = { isa = …; … };` entry.
//! - [`ReferenceList`]: the ordered `( id /* comment */, … )` value of a
//!   record's `children`, `files`, `buildPhases` or similar field.
//!
//! ## Requests and results
//!
//! - [`ChangeSet`]: what a caller wants done to one manifest.
//! - [`RunReport`]: what actually happened, one [`OperationOutcome`] per request.

mod change;
mod file_kind;
mod list;
mod record;
mod report;
mod section;
mod span;

pub use change::*;
pub use file_kind::*;
pub use list::*;
pub use record::*;
pub use report::*;
pub use section::*;
pub use span::*;
