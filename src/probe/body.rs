// src/probe/body.rs
// =============================================================================
// Classifies a probe response from its status code and page body.
//
// The survey host answers unknown identifiers with a normal 200 page that says
// the survey was not found, so the status code alone proves nothing. A page
// counts as a real form only when it is a 200 and its body mentions both the
// platform and a form or survey, and does not carry the not-found text.
//
// All matching is case-insensitive: the body is lowercased once and the
// markers are stored lowercase.
// =============================================================================

use super::ProbeOutcome;
use scraper::{Html, Selector};

/// Text markers used to tell a form page from an error page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyMarkers {
    /// Any of these means the identifier does not exist
    pub not_found: Vec<String>,
    /// Must appear for the page to count as the platform's own
    pub platform: String,
    /// At least one of these must appear as well
    pub form: Vec<String>,
}

impl Default for BodyMarkers {
    fn default() -> Self {
        Self {
            not_found: vec!["survey not found".to_string()],
            platform: "qualtrics".to_string(),
            form: vec!["form".to_string(), "survey".to_string()],
        }
    }
}

impl BodyMarkers {
    /// Default markers with a different platform name
    pub fn for_platform(platform: &str) -> Self {
        Self {
            platform: platform.to_lowercase(),
            ..Self::default()
        }
    }
}

/// Classifies one response
///
/// Returns Valid only for a 200 whose body passes the marker checks. The
/// title is extracted from the original (not lowercased) body.
pub fn classify(status: u16, body: &str, markers: &BodyMarkers) -> ProbeOutcome {
    if status != 200 {
        return ProbeOutcome::Invalid { status };
    }

    let text = body.to_lowercase();

    if markers.not_found.iter().any(|m| text.contains(m.as_str())) {
        return ProbeOutcome::NotFound;
    }

    let has_platform = text.contains(markers.platform.as_str());
    let has_form = markers.form.iter().any(|m| text.contains(m.as_str()));

    if has_platform && has_form {
        ProbeOutcome::Valid {
            title: page_title(body),
        }
    } else {
        ProbeOutcome::Invalid { status }
    }
}

/// Pulls the trimmed text of the first <title> element, if any
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>();
    let title = title.trim();

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
