/// Independent boolean classification of a query's topical focus. A small,
/// known corpus routes better with explicit disambiguation than with generic
/// term statistics: skills, the thesis, and the self-referential case study
/// about the site itself are easily confused by naive token overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryIntents {
	pub skills: bool,
	pub thesis: bool,
	pub website: bool,
	pub profile: bool,
	pub step_by_step: bool,
}

const SKILLS_PHRASES: &[&str] = &[
	"abschluss",
	"aws certified",
	"certificate",
	"certificates",
	"certification",
	"degree",
	"examen",
	"exam",
	"ihk",
	"prüfung",
	"qualifikation",
	"qualification",
	"scrum master",
	"skill",
	"skills",
	"zertifikat",
	"zertifikate",
	"zertifizierung",
];

const THESIS_PHRASES: &[&str] = &[
	"abschlussarbeit",
	"bachelorarbeit",
	"econometric",
	"econometrics",
	"hypothese",
	"hypothesis",
	"masterarbeit",
	"ökonometrie",
	"regression",
	"thesis",
];

const WEBSITE_PHRASES: &[&str] = &[
	"diese seite",
	"diese website",
	"dieses portfolio",
	"this portfolio",
	"this site",
	"this website",
	"webseite gebaut",
	"website built",
	"website selbst",
	"website itself",
];

const PROFILE_PHRASES: &[&str] = &[
	"background",
	"career",
	"erfahrung",
	"experience",
	"laufbahn",
	"lebenslauf",
	"wer bist du",
	"werdegang",
	"who are you",
	"worked at",
];

const STEP_BY_STEP_PHRASES: &[&str] = &[
	"ansatz",
	"approach",
	"how did",
	"how do",
	"how does",
	"method",
	"methode",
	"schritt",
	"step by step",
	"vorgehen",
	"wie funktioniert",
	"wie hast du",
];

pub fn classify(query: &str) -> QueryIntents {
	let lowered = query.to_lowercase();
	let hit = |phrases: &[&str]| phrases.iter().any(|phrase| lowered.contains(phrase));

	QueryIntents {
		skills: hit(SKILLS_PHRASES),
		thesis: hit(THESIS_PHRASES),
		website: hit(WEBSITE_PHRASES),
		profile: hit(PROFILE_PHRASES),
		step_by_step: hit(STEP_BY_STEP_PHRASES),
	}
}

/// Certificate vocabulary used for an extra in-text boost on skills queries.
pub const CERTIFICATE_TERMS: &[&str] =
	&["aws certified", "certificate", "certification", "ihk", "scrum", "zertifikat", "zertifizierung"];

pub fn mentions_certificates(text: &str) -> bool {
	let lowered = text.to_lowercase();

	CERTIFICATE_TERMS.iter().any(|term| lowered.contains(term))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classifies_skills_queries_in_both_languages() {
		assert!(classify("Which certificates do you hold?").skills);
		assert!(classify("Welche Zertifikate hast du?").skills);
		assert!(!classify("Tell me about fraud detection").skills);
	}

	#[test]
	fn website_intent_needs_a_self_referential_phrase() {
		assert!(classify("How was this website built?").website);
		assert!(classify("Wie ist diese Website entstanden?").website);
		assert!(!classify("Which website frameworks do you know?").website);
	}

	#[test]
	fn intents_are_independent() {
		let intents = classify("How did you approach the econometrics thesis?");

		assert!(intents.thesis);
		assert!(intents.step_by_step);
		assert!(!intents.website);
	}
}
