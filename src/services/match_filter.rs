use regex::{Regex, RegexBuilder};

use crate::config::FilterConfig;
use crate::domain::Post;
use crate::errors::{ScoutError, ScoutResult};

pub struct MatchFilter {
    keywords: Vec<String>,
    exclusions: Vec<(String, Regex)>,
    exclude_enabled: bool,
}

impl MatchFilter {
    pub fn new(config: &FilterConfig) -> ScoutResult<Self> {
        let exclusions = config
            .exclude_terms
            .iter()
            .map(|term| {
                RegexBuilder::new(&whole_word_pattern(term))
                    .case_insensitive(true)
                    .build()
                    .map(|re| (term.clone(), re))
                    .map_err(|e| ScoutError::Config(format!("Bad exclusion term {:?}: {}", term, e)))
            })
            .collect::<ScoutResult<Vec<_>>>()?;

        Ok(Self {
            keywords: config.keywords.clone(),
            exclusions,
            exclude_enabled: config.exclude_enabled,
        })
    }

    /// Whether an exclusion term appears as a whole word in the title or body
    pub fn is_excluded(&self, post: &Post) -> bool {
        self.excluded_by(post).is_some()
    }

    /// The first exclusion term found in the post, if exclusion is enabled
    pub fn excluded_by(&self, post: &Post) -> Option<&str> {
        if !self.exclude_enabled {
            return None;
        }
        let text = post.searchable_text();
        self.exclusions
            .iter()
            .find(|(_, re)| re.is_match(&text))
            .map(|(term, _)| term.as_str())
    }

    /// Configured keywords found anywhere in the title or body, in configured order
    pub fn match_keywords(&self, post: &Post) -> Vec<String> {
        let text = post.searchable_text();
        self.keywords
            .iter()
            .filter(|kw| text.contains(&kw.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Drop excluded posts and keep those with at least one keyword, in order
    pub fn select(&self, posts: Vec<Post>) -> Vec<Post> {
        posts
            .into_iter()
            .filter_map(|mut post| {
                if let Some(term) = self.excluded_by(&post) {
                    tracing::info!(
                        "Skipping excluded ({}): {}",
                        term,
                        preview(&post.title, 60)
                    );
                    return None;
                }

                let matched = self.match_keywords(&post);
                if matched.is_empty() {
                    return None;
                }

                tracing::info!(
                    "Match: {} (kw: {})",
                    preview(&post.title, 70),
                    matched.join(", ")
                );
                post.matched_keywords = matched;
                Some(post)
            })
            .collect()
    }
}

/// `\b` is added only at ends of the term that are word characters
fn whole_word_pattern(term: &str) -> String {
    let term = term.to_lowercase();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if term.starts_with(is_word) { r"\b" } else { "" };
    let trail = if term.ends_with(is_word) { r"\b" } else { "" };
    format!("{}{}{}", lead, regex::escape(&term), trail)
}

fn preview(title: &str, max_chars: usize) -> String {
    title.chars().take(max_chars).collect()
}
