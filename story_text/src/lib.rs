//! # Story Text
//!
//! Plain-text persistence for story graphs. A story file reads, in order:
//!
//! ```text
//! "<story name>"
//! [ "<status name>" <int> ... ]
//! {
//! [ <decision> ]
//! }
//! {
//! C<k> [ D<j> ... ]
//! }
//! C<initial choice index>
//! ```
//!
//! Choice and decision indices come from [`story_graph::StoryNodes`], so exporting a story,
//! importing it and exporting again yields the same text.
//!
//! ## Core Components
//!
//! - **token**: whitespace tokenizer with quoted strings
//! - **import**: recursive-descent parser producing a fresh [`story_graph::StoryGame`]
//! - **export**: serializer over the breadth-first node numbering
//! - **config**: where exported files go by default

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod token;

pub use config::*;
pub use error::*;
pub use export::*;
pub use import::*;
pub use token::*;
