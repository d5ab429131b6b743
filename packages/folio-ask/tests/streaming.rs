//! Protocol tests for the NDJSON streaming path: one meta first, deltas in
//! the middle, exactly one terminal event, and degradation that never breaks
//! a stream a client already started reading.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;
use unicode_segmentation::UnicodeSegmentation;

use folio_ask::{AskEvent, AskService, Providers};
use folio_domain::Lang;
use folio_testkit::{
	FailingCompletion, FailingContent, FixedEmbedding, ScriptedCompletion, StaticContent,
	test_config,
};

async fn collect_events(service: &AskService, query: &str, lang: Lang) -> Vec<AskEvent> {
	let (tx, mut rx) = mpsc::channel(256);

	service.stream_answer(query, lang, tx).await;

	let mut events = Vec::new();

	while let Some(event) = rx.recv().await {
		events.push(event);
	}

	events
}

fn delta_text(events: &[AskEvent]) -> String {
	events
		.iter()
		.filter_map(|event| match event {
			AskEvent::Delta { text } => Some(text.as_str()),
			_ => None,
		})
		.collect()
}

fn assert_protocol_shape(events: &[AskEvent]) {
	assert!(matches!(events.first(), Some(AskEvent::Meta { .. })), "meta must come first");
	assert!(matches!(events.last(), Some(AskEvent::Done)), "the stream must end with done");

	let metas = events.iter().filter(|event| matches!(event, AskEvent::Meta { .. })).count();
	let terminals = events
		.iter()
		.filter(|event| matches!(event, AskEvent::Done | AskEvent::Error { .. }))
		.count();

	assert_eq!(metas, 1);
	assert_eq!(terminals, 1);
}

#[tokio::test]
async fn local_stream_emits_meta_deltas_done() {
	let service = AskService::new(test_config(), StaticContent::fixture());
	let events =
		collect_events(&service, "How does the fraud detection engine work?", Lang::En).await;

	assert_protocol_shape(&events);
	assert!(events.len() > 2, "expected at least one delta");
	assert!(delta_text(&events).starts_with("Here is what I found in the portfolio:"));

	let AskEvent::Meta { citations, .. } = &events[0] else {
		unreachable!();
	};

	assert!(!citations.is_empty());
}

#[tokio::test]
async fn scripted_llm_stream_forwards_every_delta() {
	let mut cfg = test_config();

	cfg.features.llm_enabled = true;

	let service = AskService::new(cfg, StaticContent::fixture()).with_providers(Providers::new(
		Arc::new(FixedEmbedding),
		ScriptedCompletion::new(&["The fraud engine ", "cut false positives."]),
	));
	let events =
		collect_events(&service, "How does the fraud detection engine work?", Lang::En).await;

	assert_protocol_shape(&events);
	assert_eq!(delta_text(&events), "The fraud engine cut false positives.");
}

#[tokio::test]
async fn failing_llm_stream_degrades_to_template_deltas() {
	let mut cfg = test_config();

	cfg.features.llm_enabled = true;

	let service = AskService::new(cfg, StaticContent::fixture())
		.with_providers(Providers::new(Arc::new(FixedEmbedding), Arc::new(FailingCompletion)));
	let events =
		collect_events(&service, "How does the fraud detection engine work?", Lang::En).await;

	assert_protocol_shape(&events);
	assert!(delta_text(&events).starts_with("Here is what I found in the portfolio:"));
}

#[tokio::test]
async fn out_of_scope_stream_carries_the_canonical_answer() {
	let service = AskService::new(test_config(), StaticContent::fixture());
	let events = collect_events(&service, "zzz qqq vvv", Lang::En).await;

	assert_protocol_shape(&events);

	let AskEvent::Meta { citations, suggested_links } = &events[0] else {
		unreachable!();
	};

	assert!(citations.is_empty());
	assert_eq!(suggested_links.len(), 4);
	assert!(delta_text(&events).contains("could not find anything"));
}

#[tokio::test]
async fn broken_content_source_yields_a_single_error_event() {
	let service = AskService::new(test_config(), Arc::new(FailingContent));
	let events = collect_events(&service, "anything", Lang::En).await;

	assert_eq!(events.len(), 1);
	assert!(matches!(events[0], AskEvent::Error { .. }));
}

#[tokio::test]
async fn client_disconnect_stops_the_stream_promptly() {
	let mut cfg = test_config();

	cfg.features.llm_enabled = true;

	// Enough deltas to overrun the internal forwarding buffer if the provider
	// were left running after the client went away.
	let deltas: Vec<String> = (0..64).map(|index| format!("delta {index} ")).collect();
	let delta_refs: Vec<&str> = deltas.iter().map(String::as_str).collect();
	let service = AskService::new(cfg, StaticContent::fixture()).with_providers(Providers::new(
		Arc::new(FixedEmbedding),
		ScriptedCompletion::new(&delta_refs),
	));
	let (tx, mut rx) = mpsc::channel(1);
	let handle = tokio::spawn(async move {
		service.stream_answer("How does the fraud detection engine work?", Lang::En, tx).await;
	});

	assert!(matches!(rx.recv().await, Some(AskEvent::Meta { .. })));

	drop(rx);

	tokio::time::timeout(Duration::from_secs(2), handle)
		.await
		.expect("The coordinator kept running after the client disconnected.")
		.expect("The stream task panicked.");
}

#[tokio::test]
async fn deltas_respect_the_configured_slice_size() {
	let mut cfg = test_config();

	cfg.answer.stream_slice_chars = 10;

	let service = AskService::new(cfg, StaticContent::fixture());
	let events =
		collect_events(&service, "How does the fraud detection engine work?", Lang::En).await;

	for event in &events[1..events.len() - 1] {
		let AskEvent::Delta { text } = event else {
			panic!("expected only deltas between meta and done");
		};

		assert!(text.graphemes(true).count() <= 10, "slice too large: {text:?}");
	}
}
