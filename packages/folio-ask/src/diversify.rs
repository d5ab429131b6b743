//! Greedy diversification over ranked candidates. Keeps the top of the list
//! from being dominated by one document or one topic while preserving the
//! score order produced by ranking.

use std::collections::HashMap;

use folio_domain::TopicGroup;

use crate::rank::RankedChunk;

/// How many chunks the lexical path hands to answer assembly.
pub const LEXICAL_TARGET: usize = 10;

#[derive(Clone, Copy, Debug)]
pub struct DiversityCaps {
	pub max_per_doc: usize,
	pub max_per_group: usize,
}

impl DiversityCaps {
	/// Website-intent queries legitimately concentrate on one document, so the
	/// caps relax there.
	pub fn for_intents(intents: folio_domain::QueryIntents) -> Self {
		if intents.website {
			Self { max_per_doc: 3, max_per_group: 5 }
		} else {
			Self { max_per_doc: 2, max_per_group: 4 }
		}
	}
}

/// Walks candidates in rank order, skipping any that would exceed a cap, and
/// stops once `target` survivors are collected. Never pads: if the caps
/// exhaust the list early the result is simply shorter.
pub fn select_diverse(
	candidates: &[RankedChunk],
	caps: DiversityCaps,
	target: usize,
) -> Vec<RankedChunk> {
	let mut per_doc = <HashMap<&str, usize>>::new();
	let mut per_group = <HashMap<TopicGroup, usize>>::new();
	let mut selected = Vec::new();

	for candidate in candidates {
		if selected.len() == target {
			break;
		}

		let doc_count = per_doc.entry(candidate.chunk.doc_id.as_str()).or_insert(0);
		let group_count = per_group.entry(candidate.chunk.topic_group()).or_insert(0);

		if *doc_count == caps.max_per_doc || *group_count == caps.max_per_group {
			continue;
		}

		*doc_count += 1;
		*group_count += 1;

		selected.push(candidate.clone());
	}

	selected
}

/// Per-document cap without the topic dimension. The vector path applies this
/// after blending, where topic spread is already shaped by the index.
pub fn cap_per_doc(
	candidates: &[RankedChunk],
	max_per_doc: usize,
	target: usize,
) -> Vec<RankedChunk> {
	let mut per_doc = <HashMap<&str, usize>>::new();
	let mut selected = Vec::new();

	for candidate in candidates {
		if selected.len() == target {
			break;
		}

		let doc_count = per_doc.entry(candidate.chunk.doc_id.as_str()).or_insert(0);

		if *doc_count == max_per_doc {
			continue;
		}

		*doc_count += 1;

		selected.push(candidate.clone());
	}

	selected
}

#[cfg(test)]
mod tests {
	use super::*;
	use folio_domain::{Chunk, Lang, QueryIntents, Visibility};

	fn ranked(doc_id: &str, section_id: &str, score: f32) -> RankedChunk {
		RankedChunk {
			chunk: Chunk {
				doc_id: doc_id.to_string(),
				title: "Title".to_string(),
				href: None,
				section_id: section_id.to_string(),
				lang: Lang::En,
				visibility: Visibility::Public,
				content: "content".to_string(),
			},
			score,
		}
	}

	#[test]
	fn caps_chunks_per_document() {
		let candidates = vec![
			ranked("case_study:a", "summary", 5.0),
			ranked("case_study:a", "problem", 4.0),
			ranked("case_study:a", "solution", 3.0),
			ranked("case_study:b", "summary", 2.0),
		];
		let caps = DiversityCaps { max_per_doc: 2, max_per_group: 4 };
		let selected = select_diverse(&candidates, caps, LEXICAL_TARGET);

		assert_eq!(selected.len(), 3);
		assert_eq!(selected[2].chunk.doc_id, "case_study:b");
	}

	#[test]
	fn caps_chunks_per_topic_group() {
		let candidates = vec![
			ranked("case_study:a", "summary", 6.0),
			ranked("case_study:b", "summary", 5.0),
			ranked("case_study:c", "summary", 4.0),
			ranked("case_study:d", "summary", 3.0),
			ranked("case_study:e", "summary", 2.0),
			ranked("thesis:main", "summary", 1.0),
		];
		let caps = DiversityCaps { max_per_doc: 2, max_per_group: 4 };
		let selected = select_diverse(&candidates, caps, LEXICAL_TARGET);

		assert_eq!(selected.len(), 5);
		assert_eq!(selected[4].chunk.doc_id, "thesis:main");
	}

	#[test]
	fn website_intent_relaxes_the_caps() {
		let intents = QueryIntents { website: true, ..QueryIntents::default() };
		let caps = DiversityCaps::for_intents(intents);
		let candidates = vec![
			ranked("case_study:portfolio-website", "summary", 5.0),
			ranked("case_study:portfolio-website", "problem", 4.0),
			ranked("case_study:portfolio-website", "solution", 3.0),
		];
		let selected = select_diverse(&candidates, caps, LEXICAL_TARGET);

		assert_eq!(selected.len(), 3);
	}

	#[test]
	fn never_pads_past_eligible_candidates() {
		let candidates = vec![
			ranked("case_study:a", "summary", 5.0),
			ranked("case_study:a", "problem", 4.0),
			ranked("case_study:a", "solution", 3.0),
		];
		let selected = cap_per_doc(&candidates, 2, 8);

		assert_eq!(selected.len(), 2);
	}

	#[test]
	fn stops_at_the_target() {
		let candidates: Vec<_> =
			(0..20).map(|i| ranked(&format!("case_study:{i}"), "summary", 20.0 - i as f32)).collect();
		let caps = DiversityCaps { max_per_doc: 2, max_per_group: 100 };
		let selected = select_diverse(&candidates, caps, 4);

		assert_eq!(selected.len(), 4);
	}
}
