//! Second-resolution, Snowflake-style 64-bit identifiers.
//!
//! Every ID packs three fields into the low 63 bits of a `u64`:
//!
//! ```text
//!  Bit Index:  63    62 ........ 10+S   9+S ...... S    S-1 ..... 0
//!              +----+-----------------+---------------+--------------+
//!  Field:      | 0  | timestamp (53-S)| instance (10) | sequence (S) |
//!              +----+-----------------+---------------+--------------+
//! ```
//!
//! where `S` is the configured sequence width (1 to 32 bits). The timestamp
//! is whole seconds since the Unix epoch, folded into its field.
//!
//! ```
//! use secflake::IdCreator;
//!
//! let creator = IdCreator::new(5, 16, 0);
//! let a = creator.create();
//! let b = creator.create();
//! assert!(a < b);
//!
//! let parts = creator.layout().decompose(b);
//! assert_eq!(parts.instance_id, 5);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod generator;
#[cfg(feature = "global")]
mod global;
mod layout;
mod rand;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
#[cfg_attr(docsrs, doc(cfg(feature = "global")))]
#[cfg(feature = "global")]
pub use crate::global::*;
pub use crate::layout::*;
pub use crate::rand::*;
pub use crate::time::*;
