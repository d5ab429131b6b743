use std::collections::HashMap;

use qdrant_client::qdrant::{
	Condition, Filter, Query, QueryPointsBuilder, ScoredPoint, Value, value::Kind,
};

use folio_domain::{Chunk, Lang, Visibility};

use crate::Result;

/// One similarity-search hit. `cosine_distance` is `1 - score` under the
/// collection's cosine similarity metric.
#[derive(Clone, Debug)]
pub struct VectorHit {
	pub chunk: Chunk,
	pub cosine_distance: f32,
}

/// Read-only handle to the chunk collection. Constructed once at process
/// start and shared across requests; this core never writes to it (the
/// ingestion pipeline owns upserts).
pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
}
impl QdrantStore {
	pub fn new(cfg: &folio_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone() })
	}

	pub async fn search(
		&self,
		vector: Vec<f32>,
		lang: Lang,
		limit: u32,
		visibilities: &[Visibility],
	) -> Result<Vec<VectorHit>> {
		let allowed: Vec<String> =
			visibilities.iter().map(|visibility| visibility.as_str().to_string()).collect();
		let filter = Filter::all([
			Condition::matches("lang", lang.as_str().to_string()),
			Condition::matches("visibility", allowed),
		]);
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.filter(filter)
			.limit(limit as u64)
			.with_payload(true);
		let response = self.client.query(search).await?;

		Ok(response.result.iter().filter_map(hit_from_point).collect())
	}
}

fn hit_from_point(point: &ScoredPoint) -> Option<VectorHit> {
	let payload = &point.payload;
	let Some(doc_id) = payload_string(payload, "doc_id") else {
		tracing::warn!("Vector hit missing doc_id.");

		return None;
	};
	let Some(title) = payload_string(payload, "title") else {
		tracing::warn!(doc_id = doc_id.as_str(), "Vector hit missing title.");

		return None;
	};
	let Some(section_id) = payload_string(payload, "section_id") else {
		tracing::warn!(doc_id = doc_id.as_str(), "Vector hit missing section_id.");

		return None;
	};
	let Some(content) = payload_string(payload, "content") else {
		tracing::warn!(doc_id = doc_id.as_str(), "Vector hit missing content.");

		return None;
	};
	let Some(lang) = payload_string(payload, "lang").as_deref().and_then(Lang::parse) else {
		tracing::warn!(doc_id = doc_id.as_str(), "Vector hit has an unknown lang tag.");

		return None;
	};
	let Some(visibility) =
		payload_string(payload, "visibility").as_deref().and_then(Visibility::parse)
	else {
		tracing::warn!(doc_id = doc_id.as_str(), "Vector hit has an unknown visibility.");

		return None;
	};
	let href = payload_string(payload, "href").filter(|href| !href.trim().is_empty());

	Some(VectorHit {
		chunk: Chunk { doc_id, title, href, section_id, lang, visibility, content },
		cosine_distance: 1.0 - point.score,
	})
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.to_string()),
		_ => None,
	}
}
