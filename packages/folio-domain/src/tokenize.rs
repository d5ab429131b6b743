use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Bilingual stopword list. Both languages are always filtered because
/// queries routinely mix German and English vocabulary.
const STOPWORDS: &[&str] = &[
	// German
	"aber", "als", "auch", "auf", "aus", "bei", "bin", "bis", "bist", "das", "dass", "dem", "den",
	"der", "des", "die", "dir", "doch", "du", "ein", "eine", "einem", "einen", "einer", "eines",
	"er", "es", "für", "gibt", "hab", "habe", "haben", "hat", "hatte", "ich", "ihr", "im", "in",
	"ist", "ja", "kann", "kein", "keine", "mal", "mein", "meine", "mich", "mir", "mit", "nach",
	"nicht", "noch", "nur", "ob", "oder", "schon", "sich", "sie", "sind", "so", "über", "um",
	"und", "uns", "vom", "von", "vor", "war", "waren", "was", "welche", "welcher", "welches",
	"wenn", "wer", "wie", "wir", "wird", "wurde", "zu", "zum", "zur",
	// English
	"about", "an", "and", "any", "are", "at", "be", "been", "but", "by", "can", "could", "did",
	"do", "does", "for", "from", "had", "has", "have", "he", "her", "his", "how", "if", "into",
	"is", "it", "its", "me", "my", "no", "not", "of", "on", "or", "our", "she", "should", "some",
	"that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "to",
	"was", "we", "were", "what", "when", "where", "which", "who", "why", "will", "with", "would",
	"you", "your",
];

fn is_stopword(token: &str) -> bool {
	STOPWORDS.contains(&token)
}

fn normalize(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for ch in text.nfc() {
		if ch.is_alphanumeric() {
			out.extend(ch.to_lowercase());
		} else {
			out.push(' ');
		}
	}

	out
}

/// Query tokenization: lowercase, alphanumeric-only, minimum length 2,
/// stopwords dropped, duplicates dropped preserving first-seen order.
pub fn tokenize(text: &str) -> Vec<String> {
	let normalized = normalize(text);
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for token in normalized.split_whitespace() {
		if token.chars().count() < 2 || is_stopword(token) {
			continue;
		}
		if seen.insert(token) {
			out.push(token.to_string());
		}
	}

	out
}

/// Chunk-side tokenization with the same pipeline, as a membership set.
pub fn token_set(text: &str) -> HashSet<String> {
	let normalized = normalize(text);
	let mut out = HashSet::new();

	for token in normalized.split_whitespace() {
		if token.chars().count() < 2 || is_stopword(token) {
			continue;
		}

		out.insert(token.to_string());
	}

	out
}

/// Fraction of query tokens literally present in `text`.
pub fn hit_rate(query_tokens: &[String], text: &str) -> f32 {
	if query_tokens.is_empty() {
		return 0.0;
	}

	let terms = token_set(text);

	if terms.is_empty() {
		return 0.0;
	}

	let mut matched = 0_usize;

	for token in query_tokens {
		if terms.contains(token.as_str()) {
			matched += 1;
		}
	}

	matched as f32 / query_tokens.len() as f32
}

/// Explicit 4-digit year tokens (1900-2099) mentioned in the query.
pub fn year_tokens(text: &str) -> Vec<String> {
	let normalized = normalize(text);
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for token in normalized.split_whitespace() {
		if token.len() != 4 || !token.chars().all(|ch| ch.is_ascii_digit()) {
			continue;
		}
		if !(token.starts_with("19") || token.starts_with("20")) {
			continue;
		}
		if seen.insert(token) {
			out.push(token.to_string());
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn drops_stopwords_short_tokens_and_duplicates() {
		let tokens = tokenize("What is the thesis about? The thesis!");

		assert_eq!(tokens, vec!["thesis".to_string()]);
	}

	#[test]
	fn keeps_german_umlauts() {
		let tokens = tokenize("Prüfung: Ökonometrie");

		assert_eq!(tokens, vec!["prüfung".to_string(), "ökonometrie".to_string()]);
	}

	#[test]
	fn hit_rate_is_fraction_of_query_tokens() {
		let tokens = tokenize("fraud detection pipeline");

		assert!((hit_rate(&tokens, "A fraud scoring engine.") - 1.0 / 3.0).abs() < f32::EPSILON);
		assert_eq!(hit_rate(&tokens, ""), 0.0);
	}

	#[test]
	fn extracts_plausible_year_tokens_only() {
		assert_eq!(year_tokens("What happened in 2021 and 2023?"), vec!["2021", "2023"]);
		assert!(year_tokens("Room 1234, ticket 0042").is_empty());
	}
}
