//! Vector retrieval with blended scoring. Cosine similarity from the index is
//! mixed with lexical overlap so that a semantically close hit with zero term
//! overlap cannot outrank a hit the visitor's own words appear in.

use tracing::debug;

use folio_config::{CANDIDATES_K_RANGE, TOP_K_RANGE};
use folio_domain::{Lang, Visibility, tokenize};
use folio_storage::VectorHit;

use crate::{
	AskService, Error, Result,
	diversify,
	rank::{RankedChunk, cmp_f32_desc},
};

const COSINE_WEIGHT: f32 = 0.72;
const LEXICAL_WEIGHT: f32 = 0.28;
const HREF_BONUS: f32 = 0.02;

impl AskService {
	/// Embeds the query, searches the index and returns blended, per-document
	/// capped results. Errors here never reach the visitor; the tier loop
	/// falls back to lexical ranking instead.
	pub(crate) async fn vector_rank(
		&self,
		query: &str,
		lang: Lang,
		visibilities: &[Visibility],
	) -> Result<Vec<RankedChunk>> {
		let Some(index) = &self.vector else {
			return Err(Error::Vector { message: "No vector index is configured.".to_string() });
		};
		let embedding_cfg = &self.cfg.providers.embedding;
		let vector = self.providers.embedding.embed(embedding_cfg, query).await?;
		let expected_dim = self.cfg.storage.qdrant.vector_dim as usize;

		if vector.len() != expected_dim {
			return Err(Error::Vector {
				message: format!(
					"Embedding dimension mismatch, expected {expected_dim} got {}.",
					vector.len()
				),
			});
		}

		let candidates_k =
			self.cfg.retrieval.candidates_k.clamp(CANDIDATES_K_RANGE.0, CANDIDATES_K_RANGE.1);
		let hits = index.search(vector, lang, candidates_k, visibilities).await?;

		if hits.is_empty() {
			return Err(Error::EmptyRetrieval);
		}

		debug!(hits = hits.len(), candidates_k, "vector search returned candidates");

		let query_tokens = tokenize::tokenize(query);

		guard_years(query, &hits)?;

		let mut ranked = Vec::new();

		for hit in &hits {
			let cosine = 1. - hit.cosine_distance;
			let hit_rate = tokenize::hit_rate(&query_tokens, &hit.chunk.content);

			// A low-similarity hit survives the floor only when the visitor's
			// own terms actually appear in it.
			if let Some(min_similarity) = self.cfg.retrieval.min_similarity
				&& cosine < min_similarity
				&& hit_rate < self.cfg.retrieval.lexical_keep_floor
			{
				continue;
			}

			let mut score = cosine * COSINE_WEIGHT + hit_rate * LEXICAL_WEIGHT;

			if hit.chunk.href.is_some() {
				score += HREF_BONUS;
			}

			ranked.push(RankedChunk { chunk: hit.chunk.clone(), score });
		}

		if ranked.is_empty() {
			return Err(Error::EmptyRetrieval);
		}

		ranked.sort_by(|a, b| cmp_f32_desc(a.score, b.score));

		let top_k = self.cfg.retrieval.top_k.clamp(TOP_K_RANGE.0, TOP_K_RANGE.1) as usize;

		Ok(diversify::cap_per_doc(&ranked, self.cfg.retrieval.max_per_doc as usize, top_k))
	}
}

/// If the query names specific years, at least one raw hit must mention one
/// of them; otherwise the whole vector result is rejected before blending so
/// the lexical tier can try instead. Surviving on similarity alone while
/// missing an explicitly requested year produces confidently wrong answers.
fn guard_years(query: &str, hits: &[VectorHit]) -> Result<()> {
	let years = tokenize::year_tokens(query);

	if years.is_empty() {
		return Ok(());
	}

	let mentioned = hits.iter().any(|hit| {
		years.iter().any(|year| {
			hit.chunk.content.contains(year.as_str())
				|| hit.chunk.title.contains(year.as_str())
				|| hit.chunk.section_id.contains(year.as_str())
		})
	});

	if mentioned { Ok(()) } else { Err(Error::TemporalMismatch) }
}

#[cfg(test)]
mod tests {
	use super::*;
	use folio_domain::Chunk;

	fn hit(content: &str, cosine_distance: f32) -> VectorHit {
		VectorHit {
			chunk: Chunk {
				doc_id: "case_study:a".to_string(),
				title: "Title".to_string(),
				href: None,
				section_id: "summary".to_string(),
				lang: Lang::En,
				visibility: Visibility::Public,
				content: content.to_string(),
			},
			cosine_distance,
		}
	}

	#[test]
	fn year_guard_passes_without_years_in_the_query() {
		let hits = vec![hit("fraud detection", 0.1)];

		assert!(guard_years("fraud detection", &hits).is_ok());
	}

	#[test]
	fn year_guard_rejects_when_no_hit_mentions_the_year() {
		let hits = vec![hit("fraud detection at scale", 0.1)];

		assert!(matches!(guard_years("fraud work in 2021", &hits), Err(Error::TemporalMismatch)));
	}

	#[test]
	fn year_guard_accepts_when_any_hit_mentions_any_year() {
		let hits = vec![hit("fraud detection", 0.1), hit("Shipped in 2021 for a retail bank.", 0.4)];

		assert!(guard_years("fraud work in 2019 or 2021", &hits).is_ok());
	}
}
