//! Cartridge packaging engine.
//!
//! This crate turns a set of declared component packages into archives and
//! merges cartridge metadata into the Maven and Ivy descriptors that publish
//! them. The host orchestrator populates a [`package_set::PackageSet`],
//! freezes it, and hands it to [`pipeline::run`].
//!
//! # Modules
//!
//! - [`archive`] - Archive planning and zip assembly with static-lib exclusion
//! - [`descriptor`] - Descriptor element tree, XML I/O, and metadata merges
//! - [`error`] - Crate-wide error type
//! - [`layout`] - Conventional cartridge directory layout
//! - [`metadata`] - Project metadata with defaults
//! - [`naming`] - Artifact identity resolution and classifier composition
//! - [`package`] - Component package model and name-derived defaults
//! - [`package_set`] - Package registry, static libs, and the frozen view
//! - [`pipeline`] - Validate, resolve, archive, and synthesize in order
//! - [`probe`] - Filesystem probing abstraction
//! - [`publication`] - Publication registry and artifact attachment
//! - [`validate`] - Cross-check of declared packages against files on disk

pub mod archive;
mod archive_error;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod naming;
pub mod package;
pub mod package_set;
pub mod pipeline;
pub mod probe;
pub mod publication;
pub mod validate;

pub use error::{PackagerError, Result};
