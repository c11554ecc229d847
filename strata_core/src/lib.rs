// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core data model for strata.
//!
//! - [`Table`]s of typed [`Value`]s, addressed by column name.
//! - [`Key`]s: hashable categorical values used for grouping and joins.
//! - [`Scene`]s: fully resolved draw primitives handed to a renderer.
//! - The shared error taxonomy ([`ParseError`], [`SchemaError`], [`DataShapeError`], [`Error`]).
//!
//! With the `std` feature, [`TableLoader`] parses delimited text into a [`Table`].

#![no_std]

extern crate alloc;

mod error;
#[cfg(feature = "std")]
mod loader;
mod scene;
mod table;
mod value;

pub use error::{DataShapeError, Error, ParseError, SchemaError};
#[cfg(feature = "std")]
pub use loader::TableLoader;
pub use scene::{
    Fill, Primitive, Scene, Shape, Stroke, Style, TextAnchor, TextBaseline, TextShape,
};
pub use table::{Row, Table};
pub use value::{Key, Value};

// Re-exported so downstream crates name geometry and color types through one path.
pub use kurbo;
pub use peniko;
