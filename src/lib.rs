#![doc(html_root_url = "https://docs.rs/patchwork-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Incremental attribute reconciliation for live DOM trees.
//!
//! A tree cursor opens each element of a render pass and streams its attribute declarations into a [`Reconciler`],
//! then finalizes the element before moving on to its children. The [`Reconciler`] converges the live element to those declarations
//! with minimal mutations, without materialising either the old or the new attribute set.
//!
//! Live trees are accessed through the [`Dom`] trait. This crate implements it for real browser elements ([`web::WebDom`])
//! and for an in-memory arena ([`memory::MemoryDom`]).

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod classify;
pub mod cursor;
pub mod dom;
mod error;
pub mod load;
pub mod memory;
pub mod reconciler;
pub mod record;
pub mod style;
mod value;
pub mod web;

pub use classify::{classify, Strategy};
pub use cursor::ElementStack;
pub use dom::{Dom, PropertyValue, TreeCursor};
pub use error::Error;
pub use reconciler::{Mutator, Reconciler};
pub use record::{Applied, AttributeRecord};
pub use value::{StyleMap, Value};
