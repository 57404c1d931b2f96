//! AustLII case search and result-page extraction.

use std::future::Future;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, Jurisdiction};

/// Maximum characters kept from the text surrounding a case link.
const SUMMARY_MAX_CHARS: usize = 500;

/// Link text fragments that mark a search hit as a case rather than navigation.
const CASE_MARKERS: &[&str] = &["[", "v ", "Police", "R v", "DPP"];

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#).expect("valid anchor regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(20\d{2}|19\d{2})\b").expect("valid year regex"));

/// A case found on AustLII.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    pub title: String,
    pub citation: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub summary: String,
}

/// Source of related cases for a research query.
pub trait CaseSearch {
    /// Search for cases. Never fails; an unreachable source yields a placeholder or nothing.
    fn search(&self, query: &str, jurisdiction: &Jurisdiction) -> impl Future<Output = Vec<CaseRecord>> + Send;
}

/// Searches AustLII's sinosrch CGI and scrapes case links from the result pages.
pub struct AustLiiSearcher {
    http: reqwest::Client, // Client with per-page timeout
    primary: String,       // www host, also used to absolutize relative links
    mirror: String,        // www7 host for the auto-method search
    limit: usize,          // Maximum cases returned
}

impl AustLiiSearcher {
    /// Create a new searcher.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.search_timeout()).build().context("Failed to create AustLII HTTP client")?;

        Ok(Self {
            http,
            primary: config.austlii_url.trim_end_matches('/').to_string(),
            mirror: config.austlii_mirror_url.trim_end_matches('/').to_string(),
            limit: config.case_limit,
        })
    }

    /// The search pages tried, in order: relevance-ranked within the jurisdiction's case
    /// databases, an auto-method search on the mirror, and a recent-years search.
    pub fn search_urls(&self, query: &str, jurisdiction: &Jurisdiction) -> Vec<String> {
        let q = urlencoding::encode(query);
        let name = urlencoding::encode(jurisdiction.name);

        vec![
            format!(
                "{}/cgi-bin/sinosrch.cgi?query={}&results=50&submit=Search&rank=on&callback=on&legisopt=&view=relevance&max=50&meta=%2Fau%2Fcases%2F{}%2F",
                self.primary, q, jurisdiction.code
            ),
            format!("{}/cgi-bin/sinosrch.cgi?method=auto&query={}+{}&results=20", self.mirror, q, name),
            format!("{}/cgi-bin/sinosrch.cgi?query={}+{}+2023+OR+2024&results=20", self.primary, q, name),
        ]
    }

    async fn fetch(&self, url: &str) -> reqwest::Result<String> {
        self.http.get(url).send().await?.error_for_status()?.text().await
    }

    fn placeholder(&self, query: &str, jurisdiction: &Jurisdiction) -> CaseRecord {
        CaseRecord {
            title: format!("Search for \"{}\" cases in {}", query, jurisdiction.name),
            citation: "Pending search refinement".to_string(),
            url: format!("{}/cgi-bin/sinosrch.cgi?query={}", self.primary, urlencoding::encode(query)),
            year: None,
            summary: "Please refine your search or check AustLII directly for specific cases.".to_string(),
        }
    }
}

impl CaseSearch for AustLiiSearcher {
    async fn search(&self, query: &str, jurisdiction: &Jurisdiction) -> Vec<CaseRecord> {
        let mut cases = Vec::new();

        for url in self.search_urls(query, jurisdiction) {
            if cases.len() >= self.limit {
                break;
            }

            debug!("Fetching {}", url);
            match self.fetch(&url).await {
                Ok(html) => {
                    let before = cases.len();
                    extract_cases(&html, &self.primary, query, self.limit, &mut cases);
                    debug!("Extracted {} new case(s)", cases.len() - before);
                }
                Err(e) => warn!("AustLII search page failed: {}", e),
            }
        }

        if cases.is_empty() {
            info!("No AustLII cases found, returning search placeholder");
            cases.push(self.placeholder(query, jurisdiction));
        }

        cases.truncate(self.limit);
        cases
    }
}

/// Extract case links from a result page into `cases`, skipping titles already present
/// and stopping once `limit` cases are held.
pub fn extract_cases(html: &str, base_url: &str, query: &str, limit: usize, cases: &mut Vec<CaseRecord>) {
    let lower = html.to_ascii_lowercase();

    for caps in ANCHOR_RE.captures_iter(html) {
        if cases.len() >= limit {
            break;
        }

        let (Some(whole), Some(href), Some(inner)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let href = href.as_str();
        let title = html_text(inner.as_str());

        if !href.contains("/cases/") || !CASE_MARKERS.iter().any(|m| title.contains(m)) {
            continue;
        }
        if cases.iter().any(|c| c.title == title) {
            continue;
        }

        let url = if href.starts_with("http") { href.to_string() } else { format!("{}{}", base_url, href) };
        let summary = enclosing_item(html, &lower, whole.start(), whole.end())
            .map(|item| html_text(item).chars().take(SUMMARY_MAX_CHARS).collect())
            .unwrap_or_else(|| format!("Case involving {}", query));

        cases.push(CaseRecord { citation: citation_of(&title), year: year_of(&title), url, summary, title });
    }
}

/// First bracketed citation in a title, e.g. `[2023] VSC 12` yields `[2023]`.
fn citation_of(title: &str) -> String {
    title
        .find('[')
        .and_then(|start| title[start..].find(']').map(|len| title[start..=start + len].to_string()))
        .unwrap_or_else(|| "Citation pending".to_string())
}

fn year_of(title: &str) -> Option<String> {
    YEAR_RE.find(title).map(|m| m.as_str().to_string())
}

/// The `<li>` element containing the byte range `start..end`, if any.
fn enclosing_item<'a>(html: &'a str, lower: &str, start: usize, end: usize) -> Option<&'a str> {
    // "<li" followed by '>' or whitespace, so <link> does not count
    let open = lower[..start]
        .rmatch_indices("<li")
        .map(|(i, _)| i)
        .find(|&i| lower.as_bytes().get(i + 3).is_some_and(|b| *b == b'>' || b.is_ascii_whitespace()))?;
    if lower[open..start].contains("</li") {
        return None;
    }
    let close = lower[end..].find("</li").map(|i| end + i).unwrap_or(html.len());
    Some(&html[open..close])
}

/// Visible text of an HTML fragment: tags dropped, common entities decoded, whitespace collapsed.
fn html_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
