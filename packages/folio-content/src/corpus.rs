use folio_domain::{Chunk, Lang, Visibility};

use crate::{ContentSnapshot, Localized};

/// Flattens the published snapshot into the retrievable corpus for one
/// language. One document yields one chunk per populated logical section;
/// optional sections are omitted rather than emitted empty. Chunk order is
/// stable across calls and serves as the ranking tie-break.
pub fn build_corpus(snapshot: &ContentSnapshot, lang: Lang) -> Vec<Chunk> {
	let mut out = Vec::new();

	for study in &snapshot.case_studies {
		let doc_id = format!("case_study:{}", study.slug);
		let title = study.title.get(lang);
		let href = localized_href(study.href.as_ref(), lang);
		let mut push = |section_id: &str, content: String| {
			push_chunk(&mut out, &doc_id, title, href.clone(), section_id, lang, Visibility::Public, content);
		};

		push("summary", study.summary.get(lang).to_string());
		push("problem", study.problem.get(lang).to_string());
		push("solution", study.solution.get(lang).join("\n"));
		push("impact", study.impact.get(lang).join("\n"));

		if let Some(constraints) = study.constraints.as_ref() {
			push("constraints", constraints.get(lang).to_string());
		}

		push("role", study.role.get(lang).to_string());

		if let Some(architecture) = study.architecture.as_ref() {
			push("architecture", architecture.get(lang).to_string());
		}
		if let Some(learnings) = study.learnings.as_ref() {
			push("learnings", learnings.get(lang).to_string());
		}
	}

	if let Some(thesis) = snapshot.thesis.as_ref() {
		let title = thesis.title.get(lang);
		let href = localized_href(thesis.href.as_ref(), lang);

		push_chunk(
			&mut out,
			"thesis:main",
			title,
			href.clone(),
			"summary",
			lang,
			Visibility::Public,
			thesis.abstract_text.get(lang).to_string(),
		);
		push_chunk(
			&mut out,
			"thesis:main",
			title,
			href.clone(),
			"methods",
			lang,
			Visibility::Public,
			thesis.methods.get(lang).join("\n"),
		);
		push_chunk(
			&mut out,
			"thesis:main",
			title,
			href.clone(),
			"findings",
			lang,
			Visibility::Public,
			thesis.findings.get(lang).join("\n"),
		);

		for excerpt in &thesis.pdf_excerpts {
			push_chunk(
				&mut out,
				"thesis:pdf",
				title,
				href.clone(),
				&format!("pdf:{}", excerpt.page),
				lang,
				Visibility::Public,
				excerpt.text.get(lang).to_string(),
			);
		}
	}

	for (index, item) in snapshot.experience.iter().enumerate() {
		let doc_id = format!("experience:{index}");
		let title = format!("{} · {}", item.role.get(lang), item.company);
		let href = localized_href(item.href.as_ref(), lang);

		push_chunk(
			&mut out,
			&doc_id,
			&title,
			href.clone(),
			"summary",
			lang,
			Visibility::Public,
			format!("{} ({})", item.summary.get(lang), item.period),
		);
		push_chunk(
			&mut out,
			&doc_id,
			&title,
			href,
			"highlights",
			lang,
			Visibility::Public,
			item.highlights.get(lang).join("\n"),
		);
	}

	for category in &snapshot.skills {
		let doc_id = format!("skills:{}", category.slug);
		let title = category.title.get(lang);

		push_chunk(
			&mut out,
			&doc_id,
			title,
			None,
			"skills",
			lang,
			Visibility::Public,
			category.skills.get(lang).join("\n"),
		);

		if !category.certificates.is_empty() {
			push_chunk(
				&mut out,
				&doc_id,
				title,
				None,
				"certificates",
				lang,
				Visibility::Public,
				category.certificates.get(lang).join("\n"),
			);
		}
	}

	for (index, principle) in snapshot.principles.iter().enumerate() {
		push_chunk(
			&mut out,
			"principles:main",
			principle.title.get(lang),
			None,
			&format!("principle:{index}"),
			lang,
			Visibility::Public,
			format!("{}\n{}", principle.title.get(lang), principle.text.get(lang)),
		);
	}

	let landing_title = match lang {
		Lang::De => "Über diese Seite",
		Lang::En => "About this site",
	};

	push_chunk(
		&mut out,
		"landing:main",
		landing_title,
		None,
		"about",
		lang,
		Visibility::Public,
		snapshot.landing.about.get(lang).to_string(),
	);
	push_chunk(
		&mut out,
		"landing:main",
		landing_title,
		None,
		"ask",
		lang,
		Visibility::Public,
		snapshot.landing.ask_intro.get(lang).to_string(),
	);

	if let Some(profile) = snapshot.profile.as_ref() {
		let profile_title = match lang {
			Lang::De => "Profil",
			Lang::En => "Profile",
		};

		push_chunk(
			&mut out,
			"profile:private",
			profile_title,
			None,
			"profile",
			lang,
			Visibility::Private,
			profile.text.get(lang).to_string(),
		);
	}

	out
}

fn localized_href(href: Option<&Localized>, lang: Lang) -> Option<String> {
	let href = href?;
	let value = href.get(lang).trim();

	if value.is_empty() { None } else { Some(value.to_string()) }
}

#[allow(clippy::too_many_arguments)]
fn push_chunk(
	out: &mut Vec<Chunk>,
	doc_id: &str,
	title: &str,
	href: Option<String>,
	section_id: &str,
	lang: Lang,
	visibility: Visibility,
	content: String,
) {
	let trimmed = content.trim();

	if trimmed.is_empty() {
		return;
	}

	out.push(Chunk {
		doc_id: doc_id.to_string(),
		title: title.to_string(),
		href,
		section_id: section_id.to_string(),
		lang,
		visibility,
		content: trimmed.to_string(),
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{CaseStudy, Localized, LocalizedList};

	fn study(slug: &str, architecture: Option<&str>) -> CaseStudy {
		CaseStudy {
			slug: slug.to_string(),
			title: Localized { de: "Titel".to_string(), en: "Title".to_string() },
			href: Some(Localized {
				de: format!("/de/projekte/{slug}"),
				en: format!("/en/projects/{slug}"),
			}),
			summary: Localized { de: "Kurzfassung.".to_string(), en: "Summary.".to_string() },
			problem: Localized { de: "Problem.".to_string(), en: "Problem.".to_string() },
			solution: LocalizedList {
				de: vec!["Schritt eins.".to_string(), "Schritt zwei.".to_string()],
				en: vec!["Step one.".to_string(), "Step two.".to_string()],
			},
			impact: LocalizedList { de: vec![], en: vec![] },
			constraints: None,
			role: Localized { de: "Rolle.".to_string(), en: "Role.".to_string() },
			architecture: architecture.map(|text| Localized {
				de: text.to_string(),
				en: text.to_string(),
			}),
			learnings: None,
		}
	}

	#[test]
	fn omits_unpopulated_sections() {
		let snapshot =
			ContentSnapshot { case_studies: vec![study("demo", None)], ..Default::default() };
		let corpus = build_corpus(&snapshot, Lang::En);
		let sections: Vec<&str> =
			corpus.iter().map(|chunk| chunk.section_id.as_str()).collect();

		// No impact, constraints, architecture, or learnings chunks.
		assert!(sections.contains(&"summary"));
		assert!(sections.contains(&"problem"));
		assert!(sections.contains(&"solution"));
		assert!(sections.contains(&"role"));
		assert!(!sections.contains(&"impact"));
		assert!(!sections.contains(&"architecture"));
	}

	#[test]
	fn joins_list_sections_with_newlines() {
		let snapshot =
			ContentSnapshot { case_studies: vec![study("demo", None)], ..Default::default() };
		let corpus = build_corpus(&snapshot, Lang::En);
		let solution = corpus.iter().find(|chunk| chunk.section_id == "solution").unwrap();

		assert_eq!(solution.content, "Step one.\nStep two.");
	}

	#[test]
	fn uses_language_specific_hrefs() {
		let snapshot = ContentSnapshot {
			case_studies: vec![study("demo", Some("Services."))],
			..Default::default()
		};
		let de = build_corpus(&snapshot, Lang::De);
		let en = build_corpus(&snapshot, Lang::En);

		assert_eq!(de[0].href.as_deref(), Some("/de/projekte/demo"));
		assert_eq!(en[0].href.as_deref(), Some("/en/projects/demo"));
		assert!(en.iter().any(|chunk| chunk.section_id == "architecture"));
	}
}
