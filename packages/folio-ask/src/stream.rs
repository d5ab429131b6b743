//! Streaming protocol over the same tier machinery. The contract with the
//! client: exactly one `meta` event first, then zero or more `delta` events,
//! then exactly one terminal event (`done` or `error`). Once `meta` is out,
//! every failure degrades into locally templated deltas rather than an error
//! event, so the stream a client started reading always finishes.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use folio_domain::Lang;

use crate::{
	AskService, Tier,
	answer::{self, Citation, SuggestedLink},
	rank::RankedChunk,
};

/// One line of the NDJSON stream.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AskEvent {
	Meta { citations: Vec<Citation>, suggested_links: Vec<SuggestedLink> },
	Delta { text: String },
	Done,
	Error { error: String },
}

impl AskEvent {
	pub fn to_ndjson(&self) -> serde_json::Result<String> {
		Ok(format!("{}\n", serde_json::to_string(self)?))
	}
}

impl AskService {
	/// Streams an answer into `tx`. Returns nothing: every failure is
	/// expressed inside the protocol, and a closed `tx` means the client is
	/// gone, in which case the stream is silently abandoned.
	pub async fn stream_answer(&self, query: &str, lang: Lang, tx: mpsc::Sender<AskEvent>) {
		let ranked = match self.ranked_for_stream(query, lang).await {
			Ok(ranked) => ranked,
			Err(error) => {
				warn!(%error, "streaming retrieval failed before meta");

				let _ = tx.send(AskEvent::Error { error: error.to_string() }).await;

				return;
			},
		};
		let max_citations = self.cfg.answer.max_citations as usize;
		let max_links = self.cfg.answer.max_links as usize;

		if ranked.is_empty() {
			let empty = answer::empty_answer(lang);
			let meta = AskEvent::Meta {
				citations: empty.citations.clone(),
				suggested_links: empty.suggested_links.clone(),
			};

			if tx.send(meta).await.is_err() {
				return;
			}
			if !self.emit_sliced(&empty.answer, &tx).await {
				return;
			}

			let _ = tx.send(AskEvent::Done).await;

			return;
		}

		let meta = AskEvent::Meta {
			citations: answer::citations_from(&ranked, max_citations),
			suggested_links: answer::suggested_links_from(&ranked, max_links),
		};

		if tx.send(meta).await.is_err() {
			return;
		}

		if self.cfg.features.llm_enabled && self.stream_grounded(query, lang, &ranked, &tx).await {
			let _ = tx.send(AskEvent::Done).await;

			return;
		}

		// Degraded path. The citations already sent stay valid because the
		// template is built from the same ranked chunks.
		let local = answer::local_answer(&ranked, lang, max_citations, max_links);

		if self.emit_sliced(&local.answer, &tx).await {
			let _ = tx.send(AskEvent::Done).await;
		}
	}

	/// Retrieval for the streaming path. The vector tier is tried when
	/// eligible but never surfaces its error; only a lexical failure, which
	/// means the content source is down, aborts the stream.
	async fn ranked_for_stream(&self, query: &str, lang: Lang) -> crate::Result<Vec<RankedChunk>> {
		if self.eligible_tiers().contains(&Tier::Vector) {
			match self
				.vector_rank(query, lang, &[folio_domain::Visibility::Public, folio_domain::Visibility::Private])
				.await
			{
				Ok(ranked) => return Ok(ranked),
				Err(error) => {
					warn!(%error, "vector retrieval failed, streaming from the lexical ranking");
				},
			}
		}

		self.lexical_rank(query, lang).await
	}

	/// Streams model output, forwarding provider deltas as they arrive.
	/// Returns whether the provider produced a usable stream; `false` asks
	/// the caller to degrade.
	async fn stream_grounded(
		&self,
		query: &str,
		lang: Lang,
		ranked: &[RankedChunk],
		tx: &mpsc::Sender<AskEvent>,
	) -> bool {
		let sources = answer::sources_block(ranked, self.cfg.answer.source_clamp_chars as usize);
		let system = answer::system_prompt(lang);
		let user = answer::user_prompt(query, &sources);
		let (delta_tx, mut delta_rx) = mpsc::channel::<String>(32);
		let provider = self.providers.completion.complete_stream(
			&self.cfg.providers.completion,
			&system,
			&user,
			delta_tx,
		);
		let forward = async {
			let mut sent = 0_usize;
			let mut client_gone = false;

			while let Some(text) = delta_rx.recv().await {
				if client_gone {
					continue;
				}
				if tx.send(AskEvent::Delta { text }).await.is_err() {
					client_gone = true;

					// Closing the channel fails the provider's next send, so
					// it stops generating instead of parking on a full buffer
					// nobody reads. Buffered deltas are drained and discarded.
					delta_rx.close();
				} else {
					sent += 1;
				}
			}

			(sent, client_gone)
		};
		let (provider_result, (sent, client_gone)) = futures::future::join(provider, forward).await;

		if client_gone {
			// Nothing left to degrade to; the caller's sends will fail too.
			return true;
		}

		match provider_result {
			Ok(()) if sent > 0 => true,
			Ok(()) => {
				warn!("completion stream closed without deltas, degrading");

				false
			},
			Err(error) => {
				if sent > 0 {
					// Mid-stream failure after visible output. Appending the
					// template now would duplicate content, so finish what we
					// have.
					warn!(%error, sent, "completion stream failed mid-answer");

					return true;
				}

				warn!(%error, "completion stream failed before any delta, degrading");

				false
			},
		}
	}

	/// Emits a templated answer as fixed-size grapheme slices so degraded
	/// streams look like streams. Returns `false` when the client went away.
	async fn emit_sliced(&self, text: &str, tx: &mpsc::Sender<AskEvent>) -> bool {
		let slice_len = (self.cfg.answer.stream_slice_chars as usize).max(1);
		let graphemes: Vec<&str> = text.graphemes(true).collect();

		for slice in graphemes.chunks(slice_len) {
			let event = AskEvent::Delta { text: slice.concat() };

			if tx.send(event).await.is_err() {
				return false;
			}
		}

		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn events_serialize_with_a_type_tag() {
		let meta = AskEvent::Meta { citations: Vec::new(), suggested_links: Vec::new() };
		let line = meta.to_ndjson().unwrap();

		assert!(line.starts_with("{\"type\":\"meta\""));
		assert!(line.ends_with('\n'));

		let done = AskEvent::Done.to_ndjson().unwrap();

		assert_eq!(done, "{\"type\":\"done\"}\n");
	}

	#[test]
	fn delta_round_trips() {
		let event = AskEvent::Delta { text: "hello".to_string() };
		let line = event.to_ndjson().unwrap();
		let parsed: AskEvent = serde_json::from_str(line.trim()).unwrap();

		assert_eq!(parsed, event);
	}
}
