use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
	De,
	En,
}
impl Lang {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::De => "de",
			Self::En => "en",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"de" => Some(Self::De),
			"en" => Some(Self::En),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
	Public,
	Private,
}
impl Visibility {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::Private => "private",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"public" => Some(Self::Public),
			"private" => Some(Self::Private),
			_ => None,
		}
	}
}

/// Coarse classification of a `doc_id` prefix, used to cap how many chunks of
/// one content family survive diversification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TopicGroup {
	Skills,
	Thesis,
	CaseStudy,
	Experience,
	Landing,
	Principles,
	Other,
}
impl TopicGroup {
	pub fn of_doc_id(doc_id: &str) -> Self {
		let prefix = doc_id.split(':').next().unwrap_or_default();

		match prefix {
			"skills" => Self::Skills,
			"thesis" => Self::Thesis,
			"case_study" => Self::CaseStudy,
			"experience" => Self::Experience,
			"landing" => Self::Landing,
			"principles" => Self::Principles,
			_ => Self::Other,
		}
	}
}

/// Atomic retrievable unit: one section of one document in one language.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
	pub doc_id: String,
	pub title: String,
	pub href: Option<String>,
	pub section_id: String,
	pub lang: Lang,
	pub visibility: Visibility,
	pub content: String,
}
impl Chunk {
	/// Identity key of a chunk. Content changes do not change the key; the
	/// ingestion side upserts by key and skips unchanged content by hash.
	pub fn key(&self) -> (&str, &str, Lang, Visibility) {
		(self.doc_id.as_str(), self.section_id.as_str(), self.lang, self.visibility)
	}

	pub fn content_hash(&self) -> String {
		blake3::hash(self.content.as_bytes()).to_hex().to_string()
	}

	pub fn topic_group(&self) -> TopicGroup {
		TopicGroup::of_doc_id(&self.doc_id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn doc_id_prefix_maps_to_topic_group() {
		assert_eq!(TopicGroup::of_doc_id("case_study:risk-engine"), TopicGroup::CaseStudy);
		assert_eq!(TopicGroup::of_doc_id("skills:data"), TopicGroup::Skills);
		assert_eq!(TopicGroup::of_doc_id("thesis:pdf"), TopicGroup::Thesis);
		assert_eq!(TopicGroup::of_doc_id("profile:private"), TopicGroup::Other);
	}

	#[test]
	fn content_hash_changes_with_content() {
		let mut chunk = Chunk {
			doc_id: "landing:main".to_string(),
			title: "About".to_string(),
			href: None,
			section_id: "about".to_string(),
			lang: Lang::En,
			visibility: Visibility::Public,
			content: "Hello.".to_string(),
		};
		let before = chunk.content_hash();
		let original = chunk.clone();

		chunk.content = "Hello!".to_string();

		// The identity key is content-independent.
		assert_eq!(chunk.key(), original.key());
		assert_ne!(before, chunk.content_hash());
	}

	#[test]
	fn lang_round_trips_through_serde() {
		let json = serde_json::to_string(&Lang::De).unwrap();

		assert_eq!(json, "\"de\"");
		assert_eq!(serde_json::from_str::<Lang>("\"en\"").unwrap(), Lang::En);
	}
}
