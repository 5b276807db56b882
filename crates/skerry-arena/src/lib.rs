//! Call-scoped memory for island discovery.
//!
//! Two regions back every decomposition call:
//!
//! ```text
//! ScratchStack (LIFO, grows on demand up to a hard limit)
//! ├── ScratchFrame: scope guard, releases to its mark on drop
//! └── ScratchSpan[]: transient index buffers
//!
//! OutputArena (fixed capacity, bump allocated)
//! ├── ArenaMark: checkpoint taken before allocation
//! └── ArenaSpan[]: the call's persistent outputs
//! ```
//!
//! Both regions store `i32` index slots. Spans are plain `(offset, len)`
//! handles; several spans can be borrowed mutably at once through
//! `disjoint_mut`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod scratch;

pub use arena::{ArenaMark, ArenaSpan, OutputArena};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use scratch::{ScratchFrame, ScratchMark, ScratchSpan, ScratchStack};

/// Size in bytes of one index slot.
pub const SLOT_BYTES: usize = std::mem::size_of::<i32>();
