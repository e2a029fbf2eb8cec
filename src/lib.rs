//! Core entry point for the docx_helper crate.
//!
//! Documents are described as an [`model::Outline`] of sections and blocks,
//! built with the constructors in [`elements`], resolved against a
//! [`style::StyleRegistry`] and written by a [`assembler::DocumentAssembler`].

pub mod assembler;
pub mod builder;
pub mod documents;
pub mod docx;
pub mod elements;
pub mod error;
pub mod model;
pub mod render;
pub mod richtext;
pub mod style;

pub use error::{Error, Result};
