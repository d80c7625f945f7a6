//! Glyphboard Core Model
//!
//! This crate provides the in-memory model of a Glyphboard text-mode UI
//! layout. It includes:
//!
//! - **Elements**: Boxes, text, lines, freehand art and groups ([`element`] module)
//! - **Screens and projects**: Ordered, uniquely named containers ([`screen`], [`project`])
//! - **Assets**: A library of reusable element templates ([`asset::AssetLibrary`])
//! - **Colors**: The fixed 32-entry terminal palette ([`color::Color`])
//! - **Conventions**: Names shared by code generation and parsing ([`conventions::Conventions`])
//!
//! Every mutator validates its input and fails with
//! [`error::ValidationError`] without changing anything.

pub mod asset;
pub mod color;
pub mod conventions;
pub mod element;
pub mod error;
pub mod geometry;
pub mod identifier;
pub mod project;
pub mod screen;
