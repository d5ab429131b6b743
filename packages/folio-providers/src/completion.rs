use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{Error, Result};

const DONE_SENTINEL: &str = "[DONE]";

/// One-shot grounded completion against a chat-completions endpoint.
pub async fn complete(
	cfg: &folio_config::CompletionProviderConfig,
	system: &str,
	user: &str,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = request_body(cfg, system, user, false);

	tracing::debug!(model = cfg.model.as_str(), "Sending completion request.");

	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_response(json)
}

/// Streaming completion. Content deltas are forwarded through `tx` in arrival
/// order; the function returns once the upstream stream terminates. A closed
/// receiver aborts the read loop, which drops the upstream connection.
pub async fn complete_stream(
	cfg: &folio_config::CompletionProviderConfig,
	system: &str,
	user: &str,
	tx: mpsc::Sender<String>,
) -> Result<()> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = request_body(cfg, system, user, true);

	tracing::debug!(model = cfg.model.as_str(), "Sending streaming completion request.");

	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?
		.error_for_status()?;
	let mut byte_stream = res.bytes_stream();
	let mut line_buffer = String::new();

	while let Some(chunk) = byte_stream.next().await {
		let chunk = chunk?;

		line_buffer.push_str(&String::from_utf8_lossy(&chunk));

		while let Some(newline_pos) = line_buffer.find('\n') {
			let line = line_buffer[..newline_pos].trim().to_string();

			line_buffer.drain(..=newline_pos);

			if !forward_sse_line(&line, &tx).await? {
				return Ok(());
			}
		}
	}

	let remaining = line_buffer.trim().to_string();

	if !remaining.is_empty() {
		forward_sse_line(&remaining, &tx).await?;
	}

	Ok(())
}

/// Returns `Ok(false)` when the stream should stop (sentinel reached or the
/// receiver went away).
async fn forward_sse_line(line: &str, tx: &mpsc::Sender<String>) -> Result<bool> {
	if line.is_empty() || line.starts_with("event:") {
		return Ok(true);
	}

	let Some(data) = line.strip_prefix("data:") else { return Ok(true) };
	let data = data.trim();

	if data == DONE_SENTINEL {
		return Ok(false);
	}

	let json: Value = match serde_json::from_str(data) {
		Ok(json) => json,
		Err(err) => {
			tracing::warn!(error = %err, "Skipping unparseable completion stream chunk.");

			return Ok(true);
		},
	};

	if let Some(delta) = parse_stream_delta(&json)
		&& !delta.is_empty()
		&& tx.send(delta).await.is_err()
	{
		return Ok(false);
	}

	Ok(true)
}

fn request_body(
	cfg: &folio_config::CompletionProviderConfig,
	system: &str,
	user: &str,
	stream: bool,
) -> Value {
	serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"stream": stream,
		"messages": [
			{ "role": "system", "content": system },
			{ "role": "user", "content": user },
		],
	})
}

fn parse_completion_response(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|message| message.get("content"))
		.and_then(|content| content.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing message content.".to_string(),
		})?;
	let trimmed = content.trim();

	if trimmed.is_empty() {
		return Err(Error::EmptyCompletion);
	}

	Ok(trimmed.to_string())
}

fn parse_stream_delta(json: &Value) -> Option<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("delta"))
		.and_then(|delta| delta.get("content"))
		.and_then(|content| content.as_str())
		.map(|content| content.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_completion_content() {
		let json = serde_json::json!({
			"choices": [ { "message": { "content": " An answer. " } } ]
		});

		assert_eq!(parse_completion_response(json).unwrap(), "An answer.");
	}

	#[test]
	fn empty_content_is_an_error() {
		let json = serde_json::json!({
			"choices": [ { "message": { "content": "   " } } ]
		});

		assert!(matches!(parse_completion_response(json), Err(Error::EmptyCompletion)));
	}

	#[test]
	fn parses_stream_delta_content() {
		let json = serde_json::json!({
			"choices": [ { "delta": { "content": "tok" } } ]
		});

		assert_eq!(parse_stream_delta(&json).as_deref(), Some("tok"));
	}

	#[tokio::test]
	async fn sentinel_stops_the_stream() {
		let (tx, mut rx) = mpsc::channel(4);

		assert!(forward_sse_line("data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}", &tx)
			.await
			.unwrap());
		assert!(!forward_sse_line("data: [DONE]", &tx).await.unwrap());
		assert_eq!(rx.recv().await.as_deref(), Some("hi"));
	}
}
