//! Edit Xcode project manifests (`project.pbxproj`) in place.
//!
//! The crate reads the manifest as text, locates the records and reference
//! lists it needs, splices new text in, and writes the result back atomically.
//! It is not a full parser of the format: anything it does not touch is kept
//! byte for byte.

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod models;
pub mod mutation;
pub mod render;

pub use error::{Error, Result};
