//! Validated record types for the published content snapshot, plus the corpus
//! builder that flattens them into retrievable chunks.
//!
//! Validation happens once, here, at deserialization time; downstream code
//! trusts these records and never re-validates.

mod corpus;

pub use corpus::build_corpus;

use serde::Deserialize;

use folio_domain::Lang;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to parse content snapshot.")]
	Parse(#[from] serde_json::Error),
}

/// A pair of language renditions. Content is authored per language, never
/// machine-translated at query time.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Localized {
	pub de: String,
	pub en: String,
}
impl Localized {
	pub fn get(&self, lang: Lang) -> &str {
		match lang {
			Lang::De => &self.de,
			Lang::En => &self.en,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalizedList {
	pub de: Vec<String>,
	pub en: Vec<String>,
}
impl LocalizedList {
	pub fn get(&self, lang: Lang) -> &[String] {
		match lang {
			Lang::De => &self.de,
			Lang::En => &self.en,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.de.is_empty() && self.en.is_empty()
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseStudy {
	pub slug: String,
	pub title: Localized,
	pub href: Option<Localized>,
	pub summary: Localized,
	pub problem: Localized,
	pub solution: LocalizedList,
	pub impact: LocalizedList,
	pub constraints: Option<Localized>,
	pub role: Localized,
	pub architecture: Option<Localized>,
	pub learnings: Option<Localized>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thesis {
	pub title: Localized,
	pub href: Option<Localized>,
	#[serde(rename = "abstract")]
	pub abstract_text: Localized,
	pub methods: LocalizedList,
	pub findings: LocalizedList,
	#[serde(default)]
	pub pdf_excerpts: Vec<PdfExcerpt>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PdfExcerpt {
	pub page: u32,
	pub text: Localized,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperienceItem {
	pub company: String,
	pub role: Localized,
	pub period: String,
	pub summary: Localized,
	pub highlights: LocalizedList,
	pub href: Option<Localized>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillCategory {
	pub slug: String,
	pub title: Localized,
	pub skills: LocalizedList,
	#[serde(default)]
	pub certificates: LocalizedList,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Principle {
	pub title: Localized,
	pub text: Localized,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandingCopy {
	pub about: Localized,
	pub ask_intro: Localized,
}

/// Restricted personal profile text. Chunks built from it are
/// private-visibility and subject to PII redaction on the way out.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivateProfile {
	pub text: Localized,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentSnapshot {
	#[serde(default)]
	pub case_studies: Vec<CaseStudy>,
	#[serde(default)]
	pub thesis: Option<Thesis>,
	#[serde(default)]
	pub experience: Vec<ExperienceItem>,
	#[serde(default)]
	pub skills: Vec<SkillCategory>,
	#[serde(default)]
	pub principles: Vec<Principle>,
	#[serde(default)]
	pub landing: LandingCopy,
	#[serde(default)]
	pub profile: Option<PrivateProfile>,
}
impl ContentSnapshot {
	pub fn from_json(value: serde_json::Value) -> Result<Self> {
		Ok(serde_json::from_value(value)?)
	}

	pub fn from_str(raw: &str) -> Result<Self> {
		Ok(serde_json::from_str(raw)?)
	}
}
