//! Wiki article client.
//!
//! [`WikiClient::describe`] never fails: a missing page, an empty article, a
//! transport error or an unusable URL all degrade to fallback text so that one
//! entity's enrichment can never take down a pipeline run.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use holocron_shared::{HolocronError, Result};

use crate::extract::{ExtractRules, extract_lead_paragraphs};

/// Separator placed between kept paragraphs.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Prefix of the fallback text produced for transport errors.
pub const ERROR_PREFIX: &str = "Wiki Error: ";

// ---------------------------------------------------------------------------
// WikiText
// ---------------------------------------------------------------------------

/// Enrichment text for one entity. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiText {
    /// Cleaned lead paragraphs joined by a blank line.
    Article(String),
    /// The kind's "not found" text (non-success status, no container, no paragraphs).
    NotFound(String),
    /// `Wiki Error: <cause>` for transport or URL failures.
    Error(String),
}

impl WikiText {
    /// Whether real article content was found.
    pub fn is_article(&self) -> bool {
        matches!(self, Self::Article(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Article(s) | Self::NotFound(s) | Self::Error(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Article(s) | Self::NotFound(s) | Self::Error(s) => s,
        }
    }
}

impl fmt::Display for WikiText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extraction thresholds plus the text used when nothing qualifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichPolicy {
    pub rules: ExtractRules,
    pub fallback_text: String,
}

// ---------------------------------------------------------------------------
// WikiClient
// ---------------------------------------------------------------------------

/// Fetches wiki articles by slug.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    base_url: String,
}

impl WikiClient {
    /// Create a client for `base_url` identifying itself with `user_agent`.
    ///
    /// No timeout is set unless `timeout` is given.
    pub fn new(base_url: &str, user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HolocronError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full article URL for a slug.
    pub fn article_url(&self, slug: &str) -> Result<Url> {
        let raw = format!("{}/{slug}", self.base_url);
        Url::parse(&raw).map_err(|e| HolocronError::validation(format!("bad article URL {raw}: {e}")))
    }

    /// Fetch an article body. `Ok(None)` means the wiki answered with a non-success status.
    pub async fn fetch_article(&self, slug: &str) -> Result<Option<String>> {
        let url = self.article_url(slug)?;
        debug!(%url, "fetching wiki article");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| HolocronError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "wiki article unavailable");
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| HolocronError::Network(format!("{url}: body read failed: {e}")))?;
        Ok(Some(body))
    }

    /// Fetch and extract the lead paragraphs for `slug`, degrading to fallback text.
    pub async fn describe(&self, slug: &str, policy: &EnrichPolicy) -> WikiText {
        let body = match self.fetch_article(slug).await {
            Ok(Some(body)) => body,
            Ok(None) => return WikiText::NotFound(policy.fallback_text.clone()),
            Err(e) => {
                warn!(slug, error = %e, "wiki request failed");
                return WikiText::Error(format!("{ERROR_PREFIX}{e}"));
            }
        };

        match extract_lead_paragraphs(&body, &policy.rules) {
            Some(paragraphs) if !paragraphs.is_empty() => {
                WikiText::Article(paragraphs.join(PARAGRAPH_SEPARATOR))
            }
            Some(_) => {
                debug!(slug, "no qualifying paragraphs");
                WikiText::NotFound(policy.fallback_text.clone())
            }
            None => {
                debug!(slug, "article container missing");
                WikiText::NotFound(policy.fallback_text.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

    fn policy() -> EnrichPolicy {
        EnrichPolicy {
            rules: ExtractRules {
                min_len: 40,
                max_paragraphs: 2,
            },
            fallback_text: "Description not found on Wiki.".into(),
        }
    }

    fn article(paragraphs: &[&str]) -> String {
        let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
        format!(r#"<html><body><div class="mw-parser-output">{body}</div></body></html>"#)
    }

    #[test]
    fn article_url_joins_slug() {
        let client = WikiClient::new("https://starwars.fandom.com/wiki/", UA, None).unwrap();
        let url = client.article_url("TIE/ln_space_superiority_starfighter").unwrap();
        assert_eq!(
            url.as_str(),
            "https://starwars.fandom.com/wiki/TIE/ln_space_superiority_starfighter"
        );
    }

    #[tokio::test]
    async fn describe_joins_paragraphs_up_to_cap() {
        let server = MockServer::start().await;
        let first = "Luke Skywalker was a Force-sensitive human male who became a Jedi Master.";
        let second = "He was the son of the Jedi Knight Anakin Skywalker and Senator Padmé Amidala.";
        let third = "A third paragraph that would pass the filter but exceeds the configured cap.";

        Mock::given(method("GET"))
            .and(path("/wiki/Luke_Skywalker"))
            .and(header("user-agent", UA))
            .respond_with(ResponseTemplate::new(200).set_body_string(article(&[first, second, third])))
            .mount(&server)
            .await;

        let client = WikiClient::new(&format!("{}/wiki", server.uri()), UA, None).unwrap();
        let text = client.describe("Luke_Skywalker", &policy()).await;

        assert!(text.is_article());
        assert_eq!(text.as_str(), format!("{first}\n\n{second}"));
    }

    #[tokio::test]
    async fn describe_missing_page_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = WikiClient::new(&server.uri(), UA, None).unwrap();
        let text = client.describe("Nobody", &policy()).await;
        assert_eq!(text, WikiText::NotFound("Description not found on Wiki.".into()));
    }

    #[tokio::test]
    async fn describe_empty_article_uses_fallback_not_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(article(&["short"])))
            .mount(&server)
            .await;

        let client = WikiClient::new(&server.uri(), UA, None).unwrap();
        let text = client.describe("Stub", &policy()).await;
        assert!(!text.as_str().is_empty());
        assert_eq!(text.as_str(), "Description not found on Wiki.");
    }

    #[tokio::test]
    async fn describe_transport_error_embeds_cause() {
        // Nothing listens on port 1.
        let client = WikiClient::new("http://127.0.0.1:1/wiki", UA, None).unwrap();
        let text = client.describe("Anyone", &policy()).await;
        assert!(matches!(text, WikiText::Error(_)));
        assert!(text.as_str().starts_with(ERROR_PREFIX));
        assert!(text.as_str().len() > ERROR_PREFIX.len());
    }
}
