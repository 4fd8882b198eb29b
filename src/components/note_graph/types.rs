//! Data types shared across the note graph subsystem.

/// A snapshot of one note as handed over by the host application.
///
/// The graph subsystem only reads these; it never writes back. `links`
/// holds the persisted numeric link list when the host has one stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
	pub id: String,
	pub title: String,
	pub content: String,
	pub links: Option<Vec<i64>>,
}

impl Note {
	pub fn new(
		id: impl Into<String>,
		title: impl Into<String>,
		content: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			content: content.into(),
			links: None,
		}
	}
}

/// One parsed `[[Target]]` or `[[Target|Display]]` occurrence.
///
/// Recomputed from content on every pass, never persisted. The byte span
/// covers the whole token including brackets, for in-place decoration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceToken {
	pub target: String,
	pub display: Option<String>,
	pub span: (usize, usize),
}

/// Provenance of a resolved connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionKind {
	/// Persisted per-note link list (explicitly authored).
	Manual,
	/// One note's content mentions the other's title.
	Reference,
	/// Two notes share enough meaningful words.
	Similar,
	/// Synthesized fallback when nothing else produced an edge.
	Random,
}

/// A resolved, undirected edge between two notes.
///
/// (A,B) and (B,A) are the same connection; merging is the resolver's
/// job and downstream code may assume one entry per unordered pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub source_id: String,
	pub target_id: String,
	pub strength: u32,
	pub kind: ConnectionKind,
}

impl Connection {
	pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
		Self {
			source_id: source_id.into(),
			target_id: target_id.into(),
			strength: 1,
			kind: ConnectionKind::Manual,
		}
	}

	pub fn with_kind(mut self, kind: ConnectionKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn with_strength(mut self, strength: u32) -> Self {
		self.strength = strength;
		self
	}

	/// Order-independent identity for dedup and merging.
	pub fn pair_key(&self) -> (String, String) {
		if self.source_id <= self.target_id {
			(self.source_id.clone(), self.target_id.clone())
		} else {
			(self.target_id.clone(), self.source_id.clone())
		}
	}
}

/// One note as a point mass in the layout.
///
/// Owned by the simulation for the lifetime of one run. `fx`/`fy` are the
/// pin fields: while set, forces do not move the node. `link_count` is the
/// degree, recomputed from scratch on every build.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub title: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	pub link_count: u32,
}

impl GraphNode {
	pub fn pinned(&self) -> bool {
		self.fx.is_some() && self.fy.is_some()
	}
}

/// An edge between two nodes, addressed by arena index into
/// [`GraphData::nodes`]. String ids are resolved once at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: usize,
	pub target: usize,
}

/// The positioned working set handed to the simulation.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}
