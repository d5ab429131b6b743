//! Lexical ranking over the flattened corpus. Scores every chunk against the
//! tokenized query without calling any external service; serves as both the
//! no-LLM primary path and the fallback when vector retrieval yields nothing.

use std::cmp::Ordering;

use folio_domain::{Chunk, QueryIntents, TopicGroup, intent, tokenize};

/// A chunk plus its per-query score. Produced per request, never persisted.
#[derive(Clone, Debug)]
pub struct RankedChunk {
	pub chunk: Chunk,
	pub score: f32,
}

const EXACT_WEIGHT: f32 = 2.0;
const PARTIAL_WEIGHT: f32 = 0.75;
const EXACT_RATIO_WEIGHT: f32 = 1.1;
const PARTIAL_RATIO_WEIGHT: f32 = 0.45;
const HREF_BONUS: f32 = 0.1;
const LONG_TEXT_PENALTY: f32 = 0.2;
const LONG_TEXT_CHARS: usize = 1_600;

/// Chunks scoring at or below this are discarded.
pub const SCORE_FLOOR: f32 = 0.35;

// Intent boosts. Hand-tuned against the known corpus; re-tune here, nowhere
// else.
const SKILLS_DOC_BOOST: f32 = 3.2;
const SKILLS_EXPERIENCE_BOOST: f32 = 1.1;
const SKILLS_CERTIFICATE_TEXT_BOOST: f32 = 2.0;
const THESIS_DOC_BOOST: f32 = 3.0;
const WEBSITE_DOC_BOOST: f32 = 2.2;
const WEBSITE_DOC_PENALTY: f32 = 1.3;
const PROFILE_DOC_BOOST: f32 = 1.8;
const PROFILE_EXPERIENCE_BOOST: f32 = 1.2;
const PROFILE_ABOUT_BOOST: f32 = 1.0;
const STEP_SECTION_BOOST: f32 = 0.9;

const WEBSITE_DOC_MARKERS: &[&str] = &["website", "portfolio"];
const STEP_SECTIONS: &[&str] = &["solution", "architecture", "methods"];

/// Scores the corpus and returns survivors sorted by descending score. Ties
/// keep corpus insertion order, which makes ranking deterministic for a given
/// snapshot.
pub fn rank_corpus(query: &str, corpus: &[Chunk]) -> (Vec<RankedChunk>, QueryIntents) {
	let intents = intent::classify(query);
	let tokens = tokenize::tokenize(query);

	if tokens.is_empty() {
		return (Vec::new(), intents);
	}

	let mut scored = Vec::new();

	for chunk in corpus {
		let score = score_chunk(&tokens, chunk, intents);

		if score > SCORE_FLOOR {
			scored.push(RankedChunk { chunk: chunk.clone(), score });
		}
	}

	// Vec::sort_by is stable, so equal scores keep insertion order.
	scored.sort_by(|a, b| cmp_f32_desc(a.score, b.score));

	(scored, intents)
}

fn score_chunk(tokens: &[String], chunk: &Chunk, intents: QueryIntents) -> f32 {
	let chunk_terms = tokenize::token_set(&chunk.content);
	let mut exact = 0_usize;
	let mut partial = 0_usize;

	for token in tokens {
		if chunk_terms.contains(token.as_str()) {
			exact += 1;
		} else if chunk_terms
			.iter()
			.any(|term| term.starts_with(token.as_str()) || token.starts_with(term.as_str()))
		{
			partial += 1;
		}
	}

	let total = tokens.len() as f32;
	let mut score = exact as f32 * EXACT_WEIGHT
		+ partial as f32 * PARTIAL_WEIGHT
		+ (exact as f32 / total) * EXACT_RATIO_WEIGHT
		+ (partial as f32 / total) * PARTIAL_RATIO_WEIGHT;

	if chunk.href.is_some() {
		score += HREF_BONUS;
	}

	score += intent_boost(chunk, intents);

	if chunk.content.chars().count() > LONG_TEXT_CHARS {
		score -= LONG_TEXT_PENALTY;
	}

	score
}

fn intent_boost(chunk: &Chunk, intents: QueryIntents) -> f32 {
	let group = chunk.topic_group();
	let mut boost = 0.0_f32;

	if intents.skills {
		if group == TopicGroup::Skills {
			boost += SKILLS_DOC_BOOST;
		}
		if group == TopicGroup::Experience {
			boost += SKILLS_EXPERIENCE_BOOST;
		}
		if intent::mentions_certificates(&chunk.content) {
			boost += SKILLS_CERTIFICATE_TEXT_BOOST;
		}
	}
	if intents.thesis && group == TopicGroup::Thesis {
		boost += THESIS_DOC_BOOST;
	}
	// The self-referential case study about the site is boosted only when the
	// query is actually about the site; otherwise it is pushed down so it
	// cannot ride along on generic overlap.
	if is_website_doc(chunk) {
		boost += if intents.website { WEBSITE_DOC_BOOST } else { -WEBSITE_DOC_PENALTY };
	}
	if intents.profile {
		if chunk.doc_id.starts_with("profile:") {
			boost += PROFILE_DOC_BOOST;
		}
		if group == TopicGroup::Experience {
			boost += PROFILE_EXPERIENCE_BOOST;
		}
		if group == TopicGroup::Landing && chunk.section_id == "about" {
			boost += PROFILE_ABOUT_BOOST;
		}
	}
	if intents.step_by_step && STEP_SECTIONS.contains(&chunk.section_id.as_str()) {
		boost += STEP_SECTION_BOOST;
	}

	boost
}

pub fn is_website_doc(chunk: &Chunk) -> bool {
	chunk.topic_group() == TopicGroup::CaseStudy
		&& WEBSITE_DOC_MARKERS.iter().any(|marker| chunk.doc_id.contains(marker))
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use folio_domain::{Lang, Visibility};

	fn chunk(doc_id: &str, section_id: &str, content: &str, href: Option<&str>) -> Chunk {
		Chunk {
			doc_id: doc_id.to_string(),
			title: "Title".to_string(),
			href: href.map(|href| href.to_string()),
			section_id: section_id.to_string(),
			lang: Lang::En,
			visibility: Visibility::Public,
			content: content.to_string(),
		}
	}

	#[test]
	fn exact_overlap_outranks_partial_overlap() {
		let corpus = vec![
			chunk("case_study:a", "summary", "Monitoring dashboards for payments.", None),
			chunk("case_study:b", "summary", "A fraud detection platform.", None),
		];
		let (ranked, _) = rank_corpus("fraud detection", &corpus);

		assert_eq!(ranked[0].chunk.doc_id, "case_study:b");
	}

	#[test]
	fn low_overlap_chunks_are_discarded() {
		let corpus =
			vec![chunk("case_study:a", "summary", "Completely unrelated gardening notes.", None)];
		let (ranked, _) = rank_corpus("fraud detection platform", &corpus);

		assert!(ranked.is_empty());
	}

	#[test]
	fn website_doc_is_penalized_without_website_intent() {
		let content = "A fraud detection platform built for this purpose.";
		let corpus = vec![
			chunk("case_study:portfolio-website", "summary", content, None),
			chunk("case_study:risk", "summary", content, None),
		];
		let (ranked, intents) = rank_corpus("fraud detection", &corpus);

		assert!(!intents.website);
		assert_eq!(ranked[0].chunk.doc_id, "case_study:risk");
		assert!(ranked[0].score - ranked[1].score > 1.0);
	}

	#[test]
	fn skills_intent_lifts_barely_overlapping_skill_chunks() {
		let corpus = vec![chunk(
			"skills:data",
			"certificates",
			"AWS Certified Data Analytics certificate",
			None,
		)];
		let (ranked, intents) = rank_corpus("Welche Zertifikate hast du?", &corpus);

		assert!(intents.skills);
		assert_eq!(ranked.len(), 1);
		assert!(ranked[0].score > SCORE_FLOOR);
	}

	#[test]
	fn overlong_chunks_are_penalized() {
		let short = chunk("case_study:a", "summary", "fraud detection", None);
		let long_content = format!("fraud detection {}", "filler ".repeat(300));
		let long = chunk("case_study:b", "summary", &long_content, None);
		let (ranked, _) = rank_corpus("fraud detection", &[short, long]);

		assert_eq!(ranked[0].chunk.doc_id, "case_study:a");
	}

	#[test]
	fn ties_keep_corpus_insertion_order() {
		let corpus = vec![
			chunk("case_study:first", "summary", "fraud detection", None),
			chunk("case_study:second", "summary", "fraud detection", None),
		];
		let (ranked, _) = rank_corpus("fraud detection", &corpus);

		assert_eq!(ranked[0].chunk.doc_id, "case_study:first");
		assert_eq!(ranked[1].chunk.doc_id, "case_study:second");
	}
}
