//! # Story Graph
//!
//! The model crate for choose-your-own-adventure stories. A story is a directed, possibly cyclic
//! graph of choices whose options (decisions) lead to further choices, plus a table of named
//! integer statuses that decisions may read and update.
//!
//! ## Core Components
//!
//! - **status**: The status table, status updates and decision effects
//! - **decision**: Decision variants and outcome determiners
//! - **graph**: Choices, the node arena, and the breadth-first node numbering used for serialization
//! - **game**: The play runtime (cursor, live statuses, restart)
//! - **builder**: The authoring layer used to assemble and edit stories
//! - **text**: Which names and descriptions can be written to a story file
//!
//! ## Design Philosophy
//!
//! - **Handles, not references**: Nodes live in an arena and refer to each other by id, so cycles
//!   are just ids pointing backwards
//! - **Closed variants**: Decisions, determiners and updates are sum types matched exhaustively
//! - **Explicit state**: The status table is passed by mutable reference into resolution

pub mod builder;
pub mod decision;
pub mod error;
pub mod game;
pub mod graph;
pub mod status;
pub mod text;

pub use builder::*;
pub use decision::*;
pub use error::*;
pub use game::*;
pub use graph::*;
pub use status::*;
