//! # Quire Model
//!
//! The in-memory block tree for one open page.
//!
//! ## Two shapes of the same tree
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Block: nested, serializable                 │
//! │  - persistence, clipboard, rendering input  │
//! └─────────────────────────────────────────────┘
//!                     ↕
//! ┌─────────────────────────────────────────────┐
//! │ Page: arena of BlockNode indexed by id      │
//! │  - containers hold ordered id lists         │
//! │  - every tree algorithm walks the arena     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The model is pure data. It knows nothing about keystrokes, focus or
//! history; those live in `quire-editor`.

mod block;
mod error;
mod id;
mod kind;
mod page;

pub use block::{Block, BlockNode};
pub use error::{ModelError, ModelResult};
pub use id::BlockId;
pub use kind::BlockKind;
pub use page::Page;
