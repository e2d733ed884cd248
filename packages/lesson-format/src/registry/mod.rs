//! Content kind registry and the per-node serialization contract.
//!
//! Each content kind is registered under the tag name of its element. The
//! loader resolves a kind by tag, instantiates it through the registered
//! factory and hands the reader over to the instance, which consumes exactly
//! its own subtree.

mod config;
mod core;
pub mod kinds;
mod node;
mod types;

pub use config::create_content_registry;
pub use core::{ContentFactory, ContentRegistry};
pub use node::{read_text_content, SerializableNode};
pub use types::NodeContext;
