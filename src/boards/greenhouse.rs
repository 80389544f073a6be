use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use super::{BoardError, PostingId};
use crate::jobs::JobRecord;
use crate::registry::CompanyConfig;

/// `GET {api}/{board_id}/jobs`
#[derive(Debug, Deserialize)]
struct ListingResponse {
    jobs: Vec<Posting>,
}

#[derive(Debug, Deserialize)]
struct Posting {
    #[serde(default)]
    id: Option<PostingId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    location: Option<Named>,
    #[serde(default)]
    offices: Option<Vec<Named>>,
    #[serde(default)]
    absolute_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

impl Posting {
    /// Primary location, falling back to the first named office
    fn location(&self) -> String {
        self.location
            .as_ref()
            .and_then(|l| l.name.clone())
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                self.offices
                    .iter()
                    .flatten()
                    .filter_map(|office| office.name.clone())
                    .find(|name| !name.trim().is_empty())
            })
            .unwrap_or_default()
    }
}

/// Normalize a Greenhouse listing body into job records.
///
/// `board_base` is the public board host used to absolutize relative links.
pub fn normalize(
    body: &str,
    company: &CompanyConfig,
    board_base: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<JobRecord>, BoardError> {
    let listing: ListingResponse = serde_json::from_str(body)?;

    let mut jobs = Vec::with_capacity(listing.jobs.len());
    for posting in listing.jobs {
        let Some(upstream_id) = posting.id.as_ref().map(ToString::to_string) else {
            warn!("Greenhouse posting for {} has no id, skipping", company.board_id);
            continue;
        };

        let location = posting.location();
        let url = resolve_url(
            board_base,
            &company.board_id,
            posting.absolute_url.as_deref().unwrap_or_default(),
        );

        jobs.push(JobRecord::new(
            company,
            &upstream_id,
            posting.title.unwrap_or_default(),
            location,
            url,
            fetched_at,
        ));
    }

    Ok(jobs)
}

/// Turn an apply link into an absolute URL on the public board
pub fn resolve_url(board_base: &str, board_id: &str, link: &str) -> String {
    let link = link.trim();
    let base = board_base.trim_end_matches('/');

    if link.is_empty() || link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else if let Some(rest) = link.strip_prefix("//") {
        format!("https://{}", rest)
    } else if link.starts_with('/') {
        format!("{}{}", base, link)
    } else {
        format!("{}/{}/{}", base, board_id, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BoardType;

    const BOARD: &str = "https://boards.greenhouse.io";

    fn stripe() -> CompanyConfig {
        CompanyConfig::new("Stripe", BoardType::Greenhouse, "stripe")
    }

    #[test]
    fn normalizes_postings() {
        let body = r#"{
            "jobs": [
                {
                    "id": 5012,
                    "title": "Backend Engineer",
                    "location": {"name": "Seattle, WA"},
                    "absolute_url": "https://stripe.com/jobs/5012"
                },
                {
                    "id": 5013,
                    "title": "Designer",
                    "location": null,
                    "offices": [{"name": "Dublin"}],
                    "absolute_url": "/stripe/jobs/5013"
                }
            ],
            "meta": {"total": 2}
        }"#;

        let jobs = normalize(body, &stripe(), BOARD, Utc::now()).unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "gh_stripe_5012");
        assert_eq!(jobs[0].title, "Backend Engineer");
        assert_eq!(jobs[0].location, "Seattle, WA");
        assert_eq!(jobs[0].url, "https://stripe.com/jobs/5012");
        assert_eq!(jobs[1].location, "Dublin");
        assert_eq!(jobs[1].url, "https://boards.greenhouse.io/stripe/jobs/5013");
    }

    #[test]
    fn missing_fields_become_empty_strings() {
        let body = r#"{"jobs": [{"id": 7}]}"#;
        let jobs = normalize(body, &stripe(), BOARD, Utc::now()).unwrap();

        assert_eq!(jobs[0].title, "");
        assert_eq!(jobs[0].location, "");
        assert_eq!(jobs[0].url, "");
        assert_eq!(jobs[0].company, "Stripe");
    }

    #[test]
    fn blank_office_names_are_ignored() {
        let body = r#"{"jobs": [
            {"id": 1, "location": {"name": " "}, "offices": [{"name": ""}, {"name": "  "}, {"name": "Toronto"}]},
            {"id": 2, "offices": [{"name": ""}]}
        ]}"#;
        let jobs = normalize(body, &stripe(), BOARD, Utc::now()).unwrap();

        assert_eq!(jobs[0].location, "Toronto");
        assert_eq!(jobs[1].location, "");
    }

    #[test]
    fn posting_without_id_is_skipped() {
        let body = r#"{"jobs": [{"title": "Ghost"}, {"id": 1, "title": "Real"}]}"#;
        let jobs = normalize(body, &stripe(), BOARD, Utc::now()).unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Real");
    }

    #[test]
    fn empty_board_is_not_an_error() {
        let jobs = normalize(r#"{"jobs": []}"#, &stripe(), BOARD, Utc::now()).unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn wrong_shape_is_malformed() {
        for body in [r#"[]"#, r#"{"postings": []}"#, "<html>", r#"{"jobs": {"id": 1}}"#] {
            let err = normalize(body, &stripe(), BOARD, Utc::now()).unwrap_err();
            assert!(matches!(err, BoardError::Malformed(_)), "body: {body}");
        }
    }

    #[test]
    fn resolves_relative_links() {
        assert_eq!(
            resolve_url(BOARD, "stripe", "jobs/1"),
            "https://boards.greenhouse.io/stripe/jobs/1"
        );
        assert_eq!(
            resolve_url("https://boards.greenhouse.io/", "stripe", "/stripe/jobs/1"),
            "https://boards.greenhouse.io/stripe/jobs/1"
        );
        assert_eq!(
            resolve_url(BOARD, "stripe", "//example.com/apply"),
            "https://example.com/apply"
        );
        assert_eq!(resolve_url(BOARD, "stripe", ""), "");
    }
}
