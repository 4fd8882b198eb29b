//! Connection resolution: turning a note collection into one deduplicated,
//! undirected edge list.
//!
//! Sources are tried in a declared order and the first non-empty result
//! wins outright:
//!
//! 1. persisted per-note link lists (authoritative when present),
//! 2. content heuristics (title mentions + shared keywords, merged),
//! 3. random fallback edges so the view is never a disconnected scatter.

use std::collections::{HashMap, HashSet};

use super::types::{Connection, ConnectionKind, Note};

/// Words too common to indicate relatedness.
const STOPWORDS: &[&str] = &[
	"the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Minimum distinct shared keywords for a similarity edge.
const MIN_SHARED_WORDS: usize = 2;

/// Hard cap on synthesized fallback edges.
const MAX_RANDOM_EDGES: usize = 30;

/// Fallback edge count scales with node count up to the cap.
const RANDOM_EDGES_PER_NODE: f64 = 1.5;

/// The resolution strategies, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConnectionSource {
	Stored,
	Heuristic,
	RandomFallback,
}

const PIPELINE: &[ConnectionSource] = &[
	ConnectionSource::Stored,
	ConnectionSource::Heuristic,
	ConnectionSource::RandomFallback,
];

/// Resolve the active connection list for a note collection.
///
/// `use_real_connections` gates the content heuristics; stored links and
/// the random fallback apply regardless. `rng` must yield uniform values
/// in `[0, 1)` and is only consulted by the fallback.
pub fn resolve_connections(
	notes: &[Note],
	use_real_connections: bool,
	rng: &mut dyn FnMut() -> f64,
) -> Vec<Connection> {
	for &source in PIPELINE {
		let connections = match source {
			ConnectionSource::Stored => stored_connections(notes),
			ConnectionSource::Heuristic if use_real_connections => combine_connections(vec![
				reference_connections(notes),
				similarity_connections(notes),
			]),
			ConnectionSource::Heuristic => Vec::new(),
			ConnectionSource::RandomFallback => random_connections(notes, rng),
		};
		if !connections.is_empty() {
			return connections;
		}
	}
	Vec::new()
}

/// Edges from the persisted numeric link lists.
///
/// Targets that no longer exist in the collection are dropped, as are
/// self-links; the unordered pair is deduplicated across notes (A storing
/// B and B storing A is one edge).
pub fn stored_connections(notes: &[Note]) -> Vec<Connection> {
	let mut connections: Vec<Connection> = Vec::new();

	for note in notes {
		let Some(links) = &note.links else {
			continue;
		};
		for &target_id in links {
			let Some(target) = notes
				.iter()
				.find(|n| n.id.trim().parse::<i64>() == Ok(target_id))
			else {
				continue;
			};
			if target.id == note.id {
				continue;
			}
			let duplicate = connections.iter().any(|c| {
				(c.source_id == note.id && c.target_id == target.id)
					|| (c.source_id == target.id && c.target_id == note.id)
			});
			if !duplicate {
				connections.push(Connection::new(&note.id, &target.id));
			}
		}
	}

	connections
}

/// Title-mention heuristic: for every ordered pair of distinct notes, an
/// edge when the source content contains the target title
/// (case-insensitive). Strength 1 per direction; the merge step sums the
/// two directions into one edge.
pub fn reference_connections(notes: &[Note]) -> Vec<Connection> {
	let mut connections = Vec::new();

	for source in notes {
		let content = source.content.to_lowercase();
		for target in notes {
			if source.id == target.id {
				continue;
			}
			let title = target.title.trim().to_lowercase();
			if title.is_empty() {
				continue;
			}
			if content.contains(&title) {
				connections.push(
					Connection::new(&source.id, &target.id)
						.with_kind(ConnectionKind::Reference),
				);
			}
		}
	}

	connections
}

/// Shared-keyword heuristic: notes sharing at least [`MIN_SHARED_WORDS`]
/// meaningful words get an edge with strength equal to the shared count.
pub fn similarity_connections(notes: &[Note]) -> Vec<Connection> {
	let keyword_sets: Vec<HashSet<String>> =
		notes.iter().map(|n| keywords(&n.content)).collect();
	let mut connections = Vec::new();

	for (i, source) in notes.iter().enumerate() {
		for (j, target) in notes.iter().enumerate() {
			if i == j || source.id == target.id {
				continue;
			}
			let shared = keyword_sets[i].intersection(&keyword_sets[j]).count();
			if shared >= MIN_SHARED_WORDS {
				connections.push(
					Connection::new(&source.id, &target.id)
						.with_kind(ConnectionKind::Similar)
						.with_strength(shared as u32),
				);
			}
		}
	}

	connections
}

// Lowercase words with punctuation stripped, minus stopwords and anything
// three characters or shorter.
fn keywords(content: &str) -> HashSet<String> {
	content
		.to_lowercase()
		.split(|c: char| !c.is_alphanumeric())
		.filter(|w| w.len() > 3 && !STOPWORDS.contains(w))
		.map(str::to_string)
		.collect()
}

/// Merge connection lists into one edge per unordered pair.
///
/// On collision strengths add; the first-seen orientation and kind are
/// kept, so the result is insensitive to source ordering apart from
/// which direction an edge happens to point. Self-edges never survive.
pub fn combine_connections(sources: Vec<Vec<Connection>>) -> Vec<Connection> {
	let mut merged: Vec<Connection> = Vec::new();
	let mut index: HashMap<(String, String), usize> = HashMap::new();

	for connection in sources.into_iter().flatten() {
		if connection.source_id == connection.target_id {
			continue;
		}
		let key = connection.pair_key();
		match index.get(&key) {
			Some(&slot) => merged[slot].strength += connection.strength,
			None => {
				index.insert(key, merged.len());
				merged.push(connection);
			}
		}
	}

	merged
}

/// Synthesize fallback edges between randomly chosen distinct notes.
///
/// Produces at most `min(30, floor(1.5 n))` edges, never a self-edge and
/// never a duplicate unordered pair; stops early once the pair space is
/// exhausted. Meaningless beyond layout, so callers regenerate rather
/// than reuse these.
pub fn random_connections(notes: &[Note], rng: &mut dyn FnMut() -> f64) -> Vec<Connection> {
	let n = notes.len();
	if n < 2 {
		return Vec::new();
	}

	let target = MAX_RANDOM_EDGES.min((n as f64 * RANDOM_EDGES_PER_NODE).floor() as usize);
	let pair_space = n * (n - 1) / 2;
	let wanted = target.min(pair_space);

	let mut chosen: HashSet<(usize, usize)> = HashSet::new();
	let mut connections = Vec::new();
	// Rejection sampling; the attempt cap keeps a pathological rng from spinning.
	let mut attempts = wanted * 30 + 100;

	while connections.len() < wanted && attempts > 0 {
		attempts -= 1;
		let i = (rng() * n as f64) as usize % n;
		let j = (rng() * n as f64) as usize % n;
		if i == j {
			continue;
		}
		let key = (i.min(j), i.max(j));
		if !chosen.insert(key) {
			continue;
		}
		connections.push(
			Connection::new(&notes[i].id, &notes[j].id).with_kind(ConnectionKind::Random),
		);
	}

	connections
}
