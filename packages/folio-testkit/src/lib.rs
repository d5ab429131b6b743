//! Test fixtures and fake providers for the ask pipeline. Everything here is
//! deterministic and in-memory; no network, no clock, no randomness.

use std::sync::Arc;

use tokio::sync::mpsc;

use folio_ask::{BoxFuture, CompletionProvider, ContentSource, EmbeddingProvider, VectorIndex};
use folio_config::{
	Answer, CompletionProviderConfig, Config, EmbeddingProviderConfig, Features, Providers, Qdrant,
	Retrieval, Storage,
};
use folio_content::ContentSnapshot;
use folio_domain::{Chunk, Lang, Visibility};
use folio_storage::VectorHit;

/// A small but representative content snapshot: two case studies (one of them
/// the self-referential site write-up), a thesis with a PDF excerpt,
/// experience, skills with certificates, principles, landing copy and a
/// private profile containing PII.
pub fn fixture_snapshot() -> ContentSnapshot {
	let raw = serde_json::json!({
		"case_studies": [
			{
				"slug": "risk-engine",
				"title": { "de": "Risiko-Engine", "en": "Risk Engine" },
				"href": { "de": "/de/projekte/risk-engine", "en": "/en/projects/risk-engine" },
				"summary": {
					"de": "Eine Betrugserkennung für Zahlungen, 2021 bei einer Retail-Bank eingeführt.",
					"en": "A fraud detection engine for payments, rolled out at a retail bank in 2021."
				},
				"problem": {
					"de": "Regelbasierte Betrugserkennung erzeugte zu viele Fehlalarme.",
					"en": "Rule based fraud screening produced too many false positives."
				},
				"solution": {
					"de": ["Feature-Pipeline über Transaktionsdaten.", "Gradient-Boosting-Modell mit Schwellwert-Kalibrierung."],
					"en": ["Feature pipeline over transaction data.", "Gradient boosting model with threshold calibration."]
				},
				"impact": {
					"de": ["40 Prozent weniger Fehlalarme."],
					"en": ["40 percent fewer false positives."]
				},
				"role": {
					"de": "Data Scientist im Betrugsteam.",
					"en": "Data scientist on the fraud team."
				},
				"architecture": {
					"de": "Batch-Scoring neben einem Streaming-Pfad für Echtzeitfälle.",
					"en": "Batch scoring next to a streaming path for real time cases."
				}
			},
			{
				"slug": "portfolio-website",
				"title": { "de": "Diese Website", "en": "This Website" },
				"href": { "de": "/de/projekte/website", "en": "/en/projects/website" },
				"summary": {
					"de": "Das Portfolio selbst, mit einer Ask-Funktion über den eigenen Inhalten.",
					"en": "The portfolio itself, with an ask feature grounded in its own content."
				},
				"problem": {
					"de": "Statische Seiten beantworten keine konkreten Besucherfragen.",
					"en": "Static pages do not answer concrete visitor questions."
				},
				"solution": {
					"de": ["Korpus aus den Seiteninhalten, Ranking und Zitate."],
					"en": ["A corpus built from the page content, ranking and citations."]
				},
				"impact": {
					"de": ["Besucher finden Antworten ohne zu suchen."],
					"en": ["Visitors find answers without searching."]
				},
				"role": {
					"de": "Alles selbst gebaut.",
					"en": "Built end to end by me."
				}
			}
		],
		"thesis": {
			"title": { "de": "Ökonometrie-Thesis", "en": "Econometrics Thesis" },
			"href": { "de": "/de/thesis", "en": "/en/thesis" },
			"abstract": {
				"de": "Panelregressionen zu Kreditausfällen kleiner Unternehmen.",
				"en": "Panel regressions on credit defaults of small businesses."
			},
			"methods": {
				"de": ["Fixed-Effects-Regression mit robusten Standardfehlern."],
				"en": ["Fixed effects regression with robust standard errors."]
			},
			"findings": {
				"de": ["Liquiditätspuffer dominieren Branchen-Effekte."],
				"en": ["Liquidity buffers dominate industry effects."]
			},
			"pdf_excerpts": [
				{
					"page": 12,
					"text": {
						"de": "Tabelle 4 zeigt die Fixed-Effects-Schätzungen über alle Spezifikationen.",
						"en": "Table 4 reports the fixed effects estimates across specifications."
					}
				}
			]
		},
		"experience": [
			{
				"company": "Example Bank",
				"role": { "de": "Data Scientist", "en": "Data Scientist" },
				"period": "2019-2022",
				"summary": {
					"de": "Betrugsanalytik und Modellbetrieb für das Zahlungsgeschäft.",
					"en": "Fraud analytics and model operations for the payments business."
				},
				"highlights": {
					"de": ["Echtzeit-Scoring eingeführt."],
					"en": ["Introduced real time scoring."]
				},
				"href": { "de": "/de/erfahrung", "en": "/en/experience" }
			},
			{
				"company": "Analytik GmbH",
				"role": { "de": "Werkstudent", "en": "Working student" },
				"period": "2017-2019",
				"summary": {
					"de": "Reporting-Automatisierung mit Python.",
					"en": "Reporting automation with Python."
				},
				"highlights": {
					"de": ["Monatsreports automatisiert."],
					"en": ["Automated the monthly reports."]
				},
				"href": { "de": "/de/erfahrung", "en": "/en/experience" }
			}
		],
		"skills": [
			{
				"slug": "data",
				"title": { "de": "Daten & ML", "en": "Data & ML" },
				"skills": {
					"de": ["Python", "SQL", "scikit-learn"],
					"en": ["Python", "SQL", "scikit-learn"]
				},
				"certificates": {
					"de": ["AWS Certified Data Analytics Zertifikat", "IHK Datenschutz Zertifikat"],
					"en": ["AWS Certified Data Analytics certificate", "Professional Scrum Master certificate"]
				}
			}
		],
		"principles": [
			{
				"title": { "de": "Messbar liefern", "en": "Ship measurably" },
				"text": {
					"de": "Jede Änderung braucht eine Metrik, die sich bewegen soll.",
					"en": "Every change needs a metric it is supposed to move."
				}
			}
		],
		"landing": {
			"about": {
				"de": "Data Scientist mit Schwerpunkt Betrugserkennung und Ökonometrie.",
				"en": "Data scientist focused on fraud detection and econometrics."
			},
			"ask_intro": {
				"de": "Stell dem Portfolio eine Frage.",
				"en": "Ask the portfolio a question."
			}
		},
		"profile": {
			"text": {
				"de": "Direktkontakt: jane.doe@example.com oder +49 151 2345678. Gehaltsvorstellung auf Anfrage.",
				"en": "Direct contact: jane.doe@example.com or +49 151 2345678. Salary expectations on request."
			}
		}
	});

	ContentSnapshot::from_json(raw).expect("the fixture snapshot is valid")
}

/// A config with both feature flags off, tiny but consistent vector
/// dimensions and placeholder credentials. Tests flip the flags they need.
pub fn test_config() -> Config {
	Config {
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test-embedding".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-embed".to_string(),
				dimensions: 8,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
			completion: CompletionProviderConfig {
				provider_id: "test-completion".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-chat".to_string(),
				temperature: 0.2,
				max_tokens: 512,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "folio_test".to_string(),
				vector_dim: 8,
			},
		},
		retrieval: Retrieval::default(),
		answer: Answer::default(),
		features: Features::default(),
	}
}

/// Serves a fixed snapshot.
pub struct StaticContent {
	pub snapshot: ContentSnapshot,
}
impl StaticContent {
	pub fn fixture() -> Arc<Self> {
		Arc::new(Self { snapshot: fixture_snapshot() })
	}
}
impl ContentSource for StaticContent {
	fn snapshot<'a>(&'a self) -> BoxFuture<'a, folio_content::Result<ContentSnapshot>> {
		Box::pin(async { Ok(self.snapshot.clone()) })
	}
}

/// Always fails, standing in for an unreachable content backend.
pub struct FailingContent;
impl ContentSource for FailingContent {
	fn snapshot<'a>(&'a self) -> BoxFuture<'a, folio_content::Result<ContentSnapshot>> {
		Box::pin(async { ContentSnapshot::from_str("not json") })
	}
}

/// Returns the same vector for every input, sized to the configured
/// dimensions.
pub struct FixedEmbedding;
impl EmbeddingProvider for FixedEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		_text: &'a str,
	) -> BoxFuture<'a, folio_providers::Result<Vec<f32>>> {
		Box::pin(async { Ok(vec![0.1; cfg.dimensions as usize]) })
	}
}

/// Plays back a fixed list of deltas; `complete` returns their concatenation.
pub struct ScriptedCompletion {
	pub deltas: Vec<String>,
}
impl ScriptedCompletion {
	pub fn new(deltas: &[&str]) -> Arc<Self> {
		Arc::new(Self { deltas: deltas.iter().map(|delta| delta.to_string()).collect() })
	}
}
impl CompletionProvider for ScriptedCompletion {
	fn complete<'a>(
		&'a self,
		_cfg: &'a CompletionProviderConfig,
		_system: &'a str,
		_user: &'a str,
	) -> BoxFuture<'a, folio_providers::Result<String>> {
		Box::pin(async { Ok(self.deltas.concat()) })
	}

	fn complete_stream<'a>(
		&'a self,
		_cfg: &'a CompletionProviderConfig,
		_system: &'a str,
		_user: &'a str,
		tx: mpsc::Sender<String>,
	) -> BoxFuture<'a, folio_providers::Result<()>> {
		Box::pin(async move {
			for delta in &self.deltas {
				if tx.send(delta.clone()).await.is_err() {
					break;
				}
			}

			Ok(())
		})
	}
}

/// Fails every call, standing in for an unreachable completion service.
pub struct FailingCompletion;
impl CompletionProvider for FailingCompletion {
	fn complete<'a>(
		&'a self,
		_cfg: &'a CompletionProviderConfig,
		_system: &'a str,
		_user: &'a str,
	) -> BoxFuture<'a, folio_providers::Result<String>> {
		Box::pin(async {
			Err(folio_providers::Error::InvalidResponse {
				message: "completion service unavailable".to_string(),
			})
		})
	}

	fn complete_stream<'a>(
		&'a self,
		_cfg: &'a CompletionProviderConfig,
		_system: &'a str,
		_user: &'a str,
		_tx: mpsc::Sender<String>,
	) -> BoxFuture<'a, folio_providers::Result<()>> {
		Box::pin(async {
			Err(folio_providers::Error::InvalidResponse {
				message: "completion service unavailable".to_string(),
			})
		})
	}
}

/// Serves scripted hits, honoring the language, visibility and limit
/// arguments the way the real store would.
pub struct ScriptedIndex {
	pub hits: Vec<VectorHit>,
}
impl ScriptedIndex {
	pub fn new(hits: Vec<VectorHit>) -> Arc<Self> {
		Arc::new(Self { hits })
	}
}
impl VectorIndex for ScriptedIndex {
	fn search<'a>(
		&'a self,
		_vector: Vec<f32>,
		lang: Lang,
		limit: u32,
		visibilities: &'a [Visibility],
	) -> BoxFuture<'a, folio_storage::Result<Vec<VectorHit>>> {
		Box::pin(async move {
			Ok(self
				.hits
				.iter()
				.filter(|hit| {
					hit.chunk.lang == lang && visibilities.contains(&hit.chunk.visibility)
				})
				.take(limit as usize)
				.cloned()
				.collect())
		})
	}
}

/// Builds a public English vector hit for scripted indexes.
pub fn vector_hit(
	doc_id: &str,
	title: &str,
	section_id: &str,
	content: &str,
	cosine_distance: f32,
) -> VectorHit {
	VectorHit {
		chunk: Chunk {
			doc_id: doc_id.to_string(),
			title: title.to_string(),
			href: Some(format!("/en/{}", doc_id.replace(':', "/"))),
			section_id: section_id.to_string(),
			lang: Lang::En,
			visibility: Visibility::Public,
			content: content.to_string(),
		},
		cosine_distance,
	}
}
