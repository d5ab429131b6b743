use std::sync::OnceLock;

use regex::Regex;

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}";
const PHONE_PATTERN: &str = r"\+?\d[\d\s\-/().]{6,}\d";

fn email_re() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();

	RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

fn phone_re() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();

	RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

/// Replaces email addresses and phone-like digit runs. Applied to every
/// snippet derived from private-visibility content before it leaves the core.
pub fn redact_pii(text: &str) -> String {
	let without_emails = email_re().replace_all(text, "[redacted-email]");

	phone_re().replace_all(&without_emails, "[redacted-phone]").into_owned()
}

pub fn contains_pii(text: &str) -> bool {
	email_re().is_match(text) || phone_re().is_match(text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn redacts_emails() {
		let out = redact_pii("Reach me at jane.doe+site@example.org for details.");

		assert_eq!(out, "Reach me at [redacted-email] for details.");
	}

	#[test]
	fn redacts_phone_numbers_with_separators() {
		let out = redact_pii("Call +49 151 234 567 89 anytime.");

		assert!(out.contains("[redacted-phone]"));
		assert!(!out.contains("151"));
	}

	#[test]
	fn leaves_ordinary_text_alone() {
		let text = "Shipped in 2021 with a 40% latency win.";

		assert_eq!(redact_pii(text), text);
		assert!(!contains_pii(text));
	}
}
