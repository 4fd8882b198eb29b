//! The note graph subsystem: link extraction, connection resolution,
//! graph building, force simulation, and the interactive canvas view.

mod builder;
mod component;
mod connections;
mod links;
mod render;
mod simulation;
mod state;
mod theme;
mod types;

pub use component::NoteGraphCanvas;
pub use connections::{combine_connections, resolve_connections};
pub use links::{extract_link_titles, extract_references, reference_display, resolve_link_ids};
pub use types::{Connection, ConnectionKind, Note, ReferenceToken};
