//! Paint model shared between the stage and renderers.
//!
//! Colors are linear premultiplied RGBA. Scenes mostly author colors as
//! `0xRRGGBB` literals and go through [`Color::from_hex`].

pub mod color;

pub use color::Color;
