//! # Pagesmith Editor
//!
//! Document editing engine for the page studio.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ author action (add, move, restyle, ...)     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ content tree: action → Mutation             │
//! │  - Pure apply over a HistorySnapshot        │
//! │  - Unknown ids are no-ops                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ history: bounded undo/redo, batching        │
//! │  - Written through to a keyed store         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pagesmith_common::{BlockType, HistorySnapshot};
//! use pagesmith_editor::ContentTree;
//!
//! let mut tree = ContentTree::in_memory("draft", HistorySnapshot::default());
//! let header = tree.add_block(BlockType::Header);
//! let buttons = tree.add_block(BlockType::ButtonGroup);
//!
//! // Drag the buttons above the header
//! tree.reorder(&buttons, Some(&header));
//! assert_eq!(tree.blocks()[0].id, buttons);
//!
//! tree.undo();
//! assert_eq!(tree.blocks()[0].id, header);
//! ```

mod content_tree;
mod errors;
mod history;
mod mutations;
mod persistence;
mod scroll;

pub use content_tree::ContentTree;
pub use errors::PersistError;
pub use history::{History, HistoryState, SetStateOptions, DEFAULT_CAPACITY};
pub use mutations::{Mutation, MutationError};
pub use persistence::{FileHistoryStore, HistoryStore, MemoryHistoryStore, PersistentHistory};
pub use scroll::{Panel, ScrollArbiter, ScrollOwnership};
