//! `hb-defs` — definitions: per-option constants, compiled in or loaded.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`source`]      | `DefinitionSource` trait, `DirSource`, `MemorySource`, `NoSource` |
//! | [`key_values`]  | `KeyValues`, the line-oriented `key: value` format         |
//! | [`definitions`] | `Definitions` trait, `DefinitionLoader`                   |
//! | [`error`]       | `DefsError`, `DefsResult<T>`                              |
//!
//! # Resource format
//!
//! One resource per option, named after the option.  `DirSource` maps the
//! option `striker` to the file `striker.cfg`:
//!
//! ```text
//! lead_distance: 8
//! lane_y: 11
//! ```
//!
//! Every line, including the last, must end with a newline.  A missing key,
//! a line without a `:` separator, or a value that does not parse is a hard
//! failure when the block is built.

pub mod definitions;
pub mod error;
pub mod key_values;
pub mod source;


pub use definitions::{DefinitionLoader, Definitions};
pub use error::{DefsError, DefsResult};
pub use key_values::KeyValues;
pub use source::{DefinitionSource, DirSource, MemorySource, NoSource};
