use chrono::{DateTime, Utc};
use scraper::Html;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub url: String,
    pub author: String,
    pub published: Option<DateTime<Utc>>,
    pub content: String,
    pub comment_count: Option<u64>,
    pub matched_keywords: Vec<String>,
}

impl Post {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            url: String::new(),
            author: "unknown".to_string(),
            published: None,
            content: String::new(),
            comment_count: None,
            matched_keywords: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = url;
        self
    }

    pub fn with_author(mut self, author: String) -> Self {
        self.author = author;
        self
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = content;
        self
    }

    /// Lowercased title and body, the text both filters run against
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.content).to_lowercase()
    }

    /// Whether the post falls inside a lookback window starting at `cutoff`.
    ///
    /// Posts without a usable timestamp are kept.
    pub fn is_within(&self, cutoff: DateTime<Utc>) -> bool {
        self.published.map_or(true, |published| published >= cutoff)
    }

    /// Whether the post is strictly older than `cutoff`; undated posts count as older
    pub fn is_older_than(&self, cutoff: DateTime<Utc>) -> bool {
        self.published.map_or(true, |published| published < cutoff)
    }

    /// Plain-text excerpt of the body, at most `max_len` bytes plus an ellipsis
    pub fn excerpt(&self, max_len: usize) -> String {
        truncate_at_word(&html_to_text(&self.content), max_len)
    }
}

/// Extract plain text from HTML content, preserving word boundaries between blocks
fn html_to_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "br" | "div" | "li" | "td" => text.push(' '),
                _ => {}
            }
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_at_word(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    match text[..end].rfind(' ') {
        Some(pos) => format!("{}...", &text[..pos]),
        None => format!("{}...", &text[..end]),
    }
}
