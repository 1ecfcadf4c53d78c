//! # wicket-std
//!
//! Standard implementations for the wicket request dispatcher.
//!
//! This crate provides:
//! - **Pattern compilation**: [`pattern::CompiledRoute`], [`pattern::template_to_regex`]
//! - **Route table**: [`table::RouteTableBuilder`], [`table::RouteTable`]
//! - **Composition**: [`compose::Chain`], [`compose::Compose`], [`compose!`] macro
//! - **Response pipeline**: [`deferral::drain`], [`finalize::finalize`]
//! - **Error text**: [`status::StatusText`]
//! - **Standard handlers**: Logging, Traced, Timeout
//! - **Testing**: [`testing::Recorder`], [`testing::request`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core contracts
pub use wicket_core;

// Modules
pub mod compose;
pub mod deferral;
pub mod finalize;
pub mod handlers;
pub mod pattern;
pub mod status;
pub mod table;
pub mod testing;
