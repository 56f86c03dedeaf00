//! # mediatree-core - Core Domain Types
//!
//! Foundation crate for mediatree. Provides the domain model for remote
//! media-server objects, the engine's event surface, error handling, and
//! logging bootstrap.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`node`)
//! - [`MediaNode`] - One remote object (container or item) plus its property bag
//! - [`NodeKind`] - Container, Audio, or Video
//! - [`SlotId`] - Opaque handle into the consumer's tree structure
//!
//! ### Events (`events`)
//! - [`RetrievalEvent`] - The single event surface toward the consumer
//! - [`NodeBatch`] - Ordered nodes produced by one discovery/expansion step
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use mediatree_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod node;
pub mod prelude;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{NodeBatch, RetrievalEvent};
pub use node::{
    MediaNode, NodeKind, SlotId, ALBUM_PROPERTY, ARTIST_PROPERTY, AUDIO_TYPE, CONTAINER_TYPE,
    DEFAULT_MAX_CHILDREN, DURATION_PROPERTY, NAME_PROPERTY, PATH_PROPERTY, TRACKED_ITEM_PROPERTIES,
    TYPE_PROPERTY, URLS_PROPERTY, VIDEO_TYPE,
};
