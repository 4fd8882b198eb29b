//! Wiki-style link extraction and title resolution.
//!
//! Notes reference each other inline with `[[Title]]` or
//! `[[Title|Display]]`. Extraction is a pure function of the content
//! string, cheap enough for every debounce tick; resolution turns titles
//! into the numeric id list the host persists alongside the note.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{Note, ReferenceToken};

// Unterminated brackets never match; the target group excludes `]` and `|`
// so `[[a]] b]]` yields exactly one token.
static REFERENCE_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").unwrap());

/// Parse all reference tokens out of note content.
///
/// Tokens are returned in source order, de-duplicated case-insensitively
/// by target title. Titles that trim to nothing are skipped.
pub fn extract_references(content: &str) -> Vec<ReferenceToken> {
	let mut seen = HashSet::new();
	let mut tokens = Vec::new();

	for caps in REFERENCE_RE.captures_iter(content) {
		let whole = caps.get(0).unwrap();
		let target = caps.get(1).unwrap().as_str().trim();
		if target.is_empty() {
			continue;
		}
		if !seen.insert(target.to_lowercase()) {
			continue;
		}
		let display = caps
			.get(2)
			.map(|m| m.as_str().trim())
			.filter(|d| !d.is_empty())
			.map(str::to_string);
		tokens.push(ReferenceToken {
			target: target.to_string(),
			display,
			span: (whole.start(), whole.end()),
		});
	}

	tokens
}

/// Referenced titles only, in source order, case preserved.
pub fn extract_link_titles(content: &str) -> Vec<String> {
	extract_references(content)
		.into_iter()
		.map(|t| t.target)
		.collect()
}

/// Text to show for a token: the display override when present,
/// otherwise the target title itself.
pub fn reference_display(token: &ReferenceToken) -> &str {
	token.display.as_deref().unwrap_or(&token.target)
}

/// Resolve the titles referenced by `note` against the full collection,
/// producing the numeric link list to persist.
///
/// Matching is case-insensitive and whitespace-trimmed. Self-references
/// and titles with no matching note are dropped silently; this is a
/// soft-link model, not referential integrity. When several notes share
/// a title, the lowest id wins.
pub fn resolve_link_ids(note: &Note, all_notes: &[Note]) -> Vec<i64> {
	let mut ids = Vec::new();

	for title in extract_link_titles(&note.content) {
		let wanted = title.trim().to_lowercase();
		let matched = all_notes
			.iter()
			.filter(|n| n.id != note.id && n.title.trim().to_lowercase() == wanted)
			.min_by(|a, b| id_order(&a.id, &b.id));
		if let Some(target) = matched {
			if let Ok(id) = target.id.trim().parse::<i64>() {
				if !ids.contains(&id) {
					ids.push(id);
				}
			}
		}
	}

	ids
}

// Numeric order when both ids parse, lexicographic otherwise.
fn id_order(a: &str, b: &str) -> Ordering {
	match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
		(Ok(x), Ok(y)) => x.cmp(&y),
		_ => a.cmp(b),
	}
}
