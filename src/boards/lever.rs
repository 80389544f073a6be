use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use super::{BoardError, PostingId};
use crate::jobs::JobRecord;
use crate::registry::CompanyConfig;

/// One element of `GET {api}/{company_id}`, which returns a bare array
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Posting {
    #[serde(default)]
    id: Option<PostingId>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    categories: Option<Categories>,
    #[serde(default)]
    hosted_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Categories {
    #[serde(default)]
    location: Option<String>,
}

/// Normalize a Lever postings body into job records.
/// Lever's hosted URLs are already absolute.
pub fn normalize(
    body: &str,
    company: &CompanyConfig,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<JobRecord>, BoardError> {
    let postings: Vec<Posting> = serde_json::from_str(body)?;

    let mut jobs = Vec::with_capacity(postings.len());
    for posting in postings {
        let Some(upstream_id) = posting.id.as_ref().map(ToString::to_string) else {
            warn!("Lever posting for {} has no id, skipping", company.board_id);
            continue;
        };

        let location = posting
            .categories
            .and_then(|c| c.location)
            .unwrap_or_default();

        jobs.push(JobRecord::new(
            company,
            &upstream_id,
            posting.text.unwrap_or_default(),
            location,
            posting.hosted_url.unwrap_or_default(),
            fetched_at,
        ));
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BoardType;

    fn netflix() -> CompanyConfig {
        CompanyConfig::new("Netflix", BoardType::Lever, "netflix")
    }

    #[test]
    fn normalizes_postings() {
        let body = r#"[
            {
                "id": "8d1f-22",
                "text": "Senior Data Engineer",
                "categories": {"location": "Los Gatos, California", "team": "Data"},
                "hostedUrl": "https://jobs.lever.co/netflix/8d1f-22",
                "createdAt": 1700000000000
            }
        ]"#;

        let jobs = normalize(body, &netflix(), Utc::now()).unwrap();

        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.id, "lv_netflix_8d1f-22");
        assert_eq!(job.title, "Senior Data Engineer");
        assert_eq!(job.location, "Los Gatos, California");
        assert_eq!(job.region, "US West");
        assert_eq!(job.url, "https://jobs.lever.co/netflix/8d1f-22");
        assert_eq!(job.source, BoardType::Lever);
    }

    #[test]
    fn missing_categories_leave_location_empty() {
        let jobs = normalize(r#"[{"id": "x", "text": "Recruiter"}]"#, &netflix(), Utc::now()).unwrap();
        assert_eq!(jobs[0].location, "");
        assert_eq!(jobs[0].url, "");
    }

    #[test]
    fn posting_without_id_is_skipped() {
        let jobs = normalize(r#"[{"text": "No id"}]"#, &netflix(), Utc::now()).unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn object_instead_of_array_is_malformed() {
        let err = normalize(r#"{"ok": false, "error": "Document not found"}"#, &netflix(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, BoardError::Malformed(_)));
    }
}
