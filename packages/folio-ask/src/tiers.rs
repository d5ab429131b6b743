//! Tiered answering. Each request walks the eligible tiers in order of
//! capability and falls through on any error, so a broken vector store or a
//! flaky provider degrades the answer instead of failing the request.

use tracing::warn;

use folio_domain::{Lang, Visibility};

use crate::{
	AskService, Error, Result,
	answer::{self, AskResponse},
	diversify::{self, DiversityCaps, LEXICAL_TARGET},
	rank::{self, RankedChunk},
};

/// Answer strategies in descending order of capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
	/// Vector retrieval plus LLM synthesis.
	Vector,
	/// LLM synthesis over the lexical ranking.
	LlmCorpus,
	/// Templated answer from the lexical ranking, no external calls.
	LocalCorpus,
}

impl Tier {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Vector => "vector",
			Self::LlmCorpus => "llm_corpus",
			Self::LocalCorpus => "local_corpus",
		}
	}
}

impl AskService {
	/// Answers a query, degrading across tiers as needed. Only errors when
	/// even the local tier fails, which requires the content source itself to
	/// be broken.
	pub async fn answer(&self, query: &str, lang: Lang) -> Result<AskResponse> {
		for tier in self.eligible_tiers() {
			match self.attempt(tier, query, lang).await {
				Ok(response) => return Ok(response),
				Err(error) => {
					warn!(
						tier = tier.as_str(),
						query_len = query.len(),
						%error,
						"tier failed, falling through",
					);
				},
			}
		}

		Err(Error::TiersExhausted)
	}

	pub fn eligible_tiers(&self) -> Vec<Tier> {
		let mut tiers = Vec::new();

		if self.cfg.features.vector_enabled && self.cfg.features.llm_enabled && self.vector.is_some()
		{
			tiers.push(Tier::Vector);
		}
		if self.cfg.features.llm_enabled {
			tiers.push(Tier::LlmCorpus);
		}

		tiers.push(Tier::LocalCorpus);

		tiers
	}

	async fn attempt(&self, tier: Tier, query: &str, lang: Lang) -> Result<AskResponse> {
		match tier {
			Tier::Vector =>
				self.answer_vector(query, lang, &[Visibility::Public, Visibility::Private]).await,
			Tier::LlmCorpus => self.answer_with_llm(query, lang).await,
			Tier::LocalCorpus => self.answer_local(query, lang).await,
		}
	}

	/// Lexical pipeline shared by the non-vector tiers: snapshot, corpus,
	/// ranking, diversification.
	pub(crate) async fn lexical_rank(&self, query: &str, lang: Lang) -> Result<Vec<RankedChunk>> {
		let snapshot = self.content.snapshot().await?;
		let corpus = folio_content::build_corpus(&snapshot, lang);
		let (ranked, intents) = rank::rank_corpus(query, &corpus);
		let caps = DiversityCaps::for_intents(intents);

		Ok(diversify::select_diverse(&ranked, caps, LEXICAL_TARGET))
	}

	/// Lexical-only path, no external calls.
	pub async fn answer_local(&self, query: &str, lang: Lang) -> Result<AskResponse> {
		let ranked = self.lexical_rank(query, lang).await?;

		if ranked.is_empty() {
			return Ok(answer::empty_answer(lang));
		}

		Ok(answer::local_answer(
			&ranked,
			lang,
			self.cfg.answer.max_citations as usize,
			self.cfg.answer.max_links as usize,
		))
	}

	/// Lexical ranking grounded through the completion provider, degrading to
	/// the local template on provider failure.
	pub async fn answer_with_llm(&self, query: &str, lang: Lang) -> Result<AskResponse> {
		let ranked = self.lexical_rank(query, lang).await?;

		if ranked.is_empty() {
			return Ok(answer::empty_answer(lang));
		}

		Ok(self.grounded_or_local(query, lang, &ranked).await)
	}

	/// Vector path. Errors on infrastructure failure, empty retrieval or a
	/// temporal-guard trip; callers fall back to [`Self::answer_with_llm`] or
	/// [`Self::answer_local`].
	pub async fn answer_vector(
		&self,
		query: &str,
		lang: Lang,
		visibilities: &[Visibility],
	) -> Result<AskResponse> {
		let ranked = self.vector_rank(query, lang, visibilities).await?;

		Ok(self.grounded_or_local(query, lang, &ranked).await)
	}

	/// Asks the completion provider for a grounded answer; on any provider
	/// error the same ranked chunks feed the local template, so citations and
	/// links stay identical either way.
	pub(crate) async fn grounded_or_local(
		&self,
		query: &str,
		lang: Lang,
		ranked: &[RankedChunk],
	) -> AskResponse {
		let max_citations = self.cfg.answer.max_citations as usize;
		let max_links = self.cfg.answer.max_links as usize;
		let sources = answer::sources_block(ranked, self.cfg.answer.source_clamp_chars as usize);
		let system = answer::system_prompt(lang);
		let user = answer::user_prompt(query, &sources);

		match self
			.providers
			.completion
			.complete(&self.cfg.providers.completion, &system, &user)
			.await
		{
			Ok(text) => AskResponse {
				answer: text,
				citations: answer::citations_from(ranked, max_citations),
				suggested_links: answer::suggested_links_from(ranked, max_links),
			},
			Err(error) => {
				warn!(%error, "completion failed, degrading to the local template");

				answer::local_answer(ranked, lang, max_citations, max_links)
			},
		}
	}
}
