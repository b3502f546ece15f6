//! Wikipedia text source: MediaWiki Action API client.
//!
//! For each person two queries are made: the intro extract (summary)
//! and the full plain-text extract together with outbound article
//! links. The assembled content is summary plus a capped prefix of the
//! body, keeping LLM input bounded; links become extraction hints.

use crate::crawl::{PageText, TextSource};
use crate::error::{Result, ScigraphError};
use crate::llm::truncate_chars;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Cap on the article body appended after the summary.
const MAX_BODY_CHARS: usize = 25_000;

/// Cap on link hints collected per page.
const MAX_LINKS: usize = 500;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<PageBody>,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    title: Option<String>,
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
    #[serde(default)]
    links: Vec<LinkBody>,
}

#[derive(Debug, Deserialize)]
struct LinkBody {
    #[serde(default)]
    ns: i32,
    title: String,
}

pub struct WikipediaClient {
    client: Client,
    api_url: String,
}

impl WikipediaClient {
    pub fn new(language: &str, user_agent: &str) -> Self {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_url: format!("https://{}.wikipedia.org/w/api.php", language),
        }
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Option<PageBody>> {
        let base = [
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("redirects", "1"),
        ];
        let response = self
            .client
            .get(&self.api_url)
            .query(&base)
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse = response.json().await?;
        let page = body
            .query
            .ok_or_else(|| ScigraphError::Fetch("response has no query body".to_string()))?
            .pages
            .into_iter()
            .next();
        Ok(page)
    }
}

#[async_trait]
impl TextSource for WikipediaClient {
    async fn fetch(&self, name: &str) -> Result<Option<PageText>> {
        // Intro extract first: cheap, and tells us whether the page exists
        let intro = self
            .query(&[
                ("titles", name),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("exintro", "1"),
            ])
            .await?;

        let intro = match intro {
            Some(page) if !page.missing => page,
            _ => return Ok(None),
        };

        // Full plain-text extract plus outbound article links as hints
        let full = self
            .query(&[
                ("titles", name),
                ("prop", "extracts|links"),
                ("explaintext", "1"),
                ("plnamespace", "0"),
                ("pllimit", "max"),
            ])
            .await?
            .filter(|page| !page.missing);

        let title = intro.title.as_deref().unwrap_or(name);
        let summary = intro.extract.as_deref().unwrap_or_default();
        let (body, links) = match &full {
            Some(page) => (
                page.extract.as_deref().unwrap_or_default(),
                hint_links(&page.links),
            ),
            None => ("", Vec::new()),
        };

        Ok(Some(PageText {
            content: build_content(title, summary, body),
            links,
        }))
    }
}

/// Summary plus capped body prefix; reading whole articles is slow and
/// blows the extraction context anyway.
fn build_content(title: &str, summary: &str, body: &str) -> String {
    format!(
        "Title: {}\n\nSummary:\n{}\n\nDetails:\n{}",
        title,
        summary,
        truncate_chars(body, MAX_BODY_CHARS)
    )
}

/// Article-namespace link titles, order-preserving, capped.
fn hint_links(links: &[LinkBody]) -> Vec<String> {
    links
        .iter()
        .filter(|l| l.ns == 0)
        .take(MAX_LINKS)
        .map(|l| l.title.clone())
        .collect()
}
