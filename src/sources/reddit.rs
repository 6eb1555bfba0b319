use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Utc;
use feed_rs::parser;
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::config::FeedConfig;
use crate::domain::Post;
use crate::errors::{ScoutError, ScoutResult};
use crate::sources::traits::FeedClient;

const USER_AGENT: &str = "TrichoScout/1.0 (keyword monitor)";

/// Markers that open the real document, checked in order
const DOCUMENT_MARKERS: &[&str] = &["<?xml", "<feed", "<rss"];

static FULLNAME_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"t3_([a-z0-9]+)").expect("fullname pattern"));
static PERMALINK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/comments/([a-z0-9]+)/").expect("permalink pattern"));

pub struct RedditSource {
    client: Client,
    config: FeedConfig,
}

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: ThingData,
}

#[derive(Debug, Deserialize)]
struct ThingData {
    id: String,
    num_comments: u64,
}

impl RedditSource {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.timeout)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    fn page_url(&self, cursor: Option<&str>) -> ScoutResult<Url> {
        let mut url = Url::parse(&format!(
            "{}/r/{}/new.rss",
            self.config.base_url, self.config.subreddit
        ))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.config.page_size.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("after", &format!("t3_{}", cursor));
            }
        }
        Ok(url)
    }

    fn comments_url(&self, ids: &[String]) -> ScoutResult<Url> {
        let fullnames = ids
            .iter()
            .map(|id| format!("t3_{}", id))
            .collect::<Vec<_>>()
            .join(",");
        Ok(Url::parse(&format!(
            "{}/by_id/{}.json",
            self.config.base_url, fullnames
        ))?)
    }

    fn try_fetch_page(&self, cursor: Option<&str>) -> ScoutResult<Vec<Post>> {
        let url = self.page_url(cursor)?;
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        parse_feed(&body)
    }

    fn try_fetch_comment_counts(&self, ids: &[String]) -> ScoutResult<HashMap<String, u64>> {
        let url = self.comments_url(ids)?;
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        parse_comment_counts(&body)
    }
}

impl FeedClient for RedditSource {
    fn fetch_page(&self, cursor: Option<&str>) -> Vec<Post> {
        match self.try_fetch_page(cursor) {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("Fetch error: {}", e);
                Vec::new()
            }
        }
    }

    fn fetch_comment_counts(&self, ids: &[String]) -> HashMap<String, u64> {
        if ids.is_empty() {
            return HashMap::new();
        }

        match self.try_fetch_comment_counts(ids) {
            Ok(counts) => counts,
            Err(e) => {
                tracing::error!("Comment count fetch error: {}", e);
                HashMap::new()
            }
        }
    }

    fn page_size(&self) -> usize {
        self.config.page_size
    }
}

/// Decode an Atom/RSS document into posts, skipping any junk before the document start
pub fn parse_feed(text: &str) -> ScoutResult<Vec<Post>> {
    let document = DOCUMENT_MARKERS
        .iter()
        .find_map(|marker| text.find(marker))
        .map_or(text, |start| &text[start..]);

    let feed = parser::parse(document.as_bytes())
        .map_err(|e| ScoutError::FeedParse(e.to_string()))?;

    let posts = feed
        .entries
        .into_iter()
        .map(|entry| {
            let raw_id = entry.id.trim().to_string();

            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "(no title)".to_string());

            let author = entry
                .authors
                .first()
                .map(|person| normalize_author(&person.name))
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "unknown".to_string());

            let url = entry
                .links
                .iter()
                .find(|link| link.rel.as_deref() == Some("alternate"))
                .or_else(|| entry.links.first())
                .map(|link| link.href.trim().to_string())
                .unwrap_or_default();

            let content = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content))
                .map(|body| body.trim().to_string())
                .unwrap_or_default();

            let id = extract_post_id(&raw_id, &url)
                .unwrap_or_else(|| Utc::now().timestamp_millis().to_string());

            Post::new(id, title)
                .with_url(url)
                .with_author(author)
                .with_published(entry.published)
                .with_content(content)
        })
        .collect();

    Ok(posts)
}

/// Derive the dedup key: fullname in the opaque id, then permalink id in the URL,
/// then the tail of the opaque id
pub fn extract_post_id(raw_id: &str, url: &str) -> Option<String> {
    if let Some(caps) = FULLNAME_ID.captures(raw_id) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = PERMALINK_ID.captures(url) {
        return Some(caps[1].to_string());
    }

    let chars: Vec<char> = raw_id.chars().collect();
    if chars.is_empty() {
        return None;
    }
    let tail_start = chars.len().saturating_sub(8);
    Some(chars[tail_start..].iter().collect())
}

fn normalize_author(name: &str) -> String {
    let name = name.trim();
    name.strip_prefix("/u/")
        .or_else(|| name.strip_prefix("u/"))
        .unwrap_or(name)
        .to_string()
}

/// Read `data.children[*].data.{id,num_comments}`, skipping children that don't fit
fn parse_comment_counts(body: &str) -> ScoutResult<HashMap<String, u64>> {
    let listing: Listing = serde_json::from_str(body)?;

    let counts = listing
        .data
        .children
        .into_iter()
        .filter_map(|child| serde_json::from_value::<Thing>(child).ok())
        .map(|thing| (thing.data.id, thing.data.num_comments))
        .collect();

    Ok(counts)
}
