use chrono::Local;

use super::Post;

/// Rendered email digest for one cycle's matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub text: String,
    pub html: String,
}

const EXCERPT_LEN: usize = 200;

const BADGE_STYLE: &str = "background:#1d2e1d;border:1px solid #2a3d2a;padding:2px 8px;border-radius:4px;font-size:12px;color:#5ddf6e";
const CARD_STYLE: &str =
    "background:#111811;border:1px solid #5ddf6e;border-radius:10px;padding:16px;margin-bottom:12px";

impl Digest {
    pub fn from_matches(matches: &[Post], subreddit: &str) -> Self {
        Self {
            subject: format!("🌵 Tricho Scout: {} new match(es)!", matches.len()),
            text: Self::format_text(matches),
            html: Self::format_html(matches, subreddit),
        }
    }

    fn format_text(matches: &[Post]) -> String {
        let mut lines = vec![format!(
            "🌵 Tricho Scout found {} new match(es)!\n",
            matches.len()
        )];

        for post in matches {
            lines.push(format!("• {}", post.title));
            lines.push(format!("  Author:   u/{}", post.author));
            lines.push(format!("  Posted:   {}", format_published(post)));
            lines.push(format!("  Keywords: {}", post.matched_keywords.join(", ")));
            if let Some(count) = post.comment_count {
                lines.push(format!("  💬 {} comments", count));
            }
            lines.push(format!("  Link:     {}", post.url));

            let excerpt = post.excerpt(EXCERPT_LEN);
            if !excerpt.is_empty() {
                lines.push(format!("  {}", excerpt));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }

    fn format_html(matches: &[Post], subreddit: &str) -> String {
        let mut cards = String::new();

        for post in matches {
            let comments = post
                .comment_count
                .map(|count| format!(" &nbsp;·&nbsp; 💬 {}", count))
                .unwrap_or_default();

            let badges = post
                .matched_keywords
                .iter()
                .map(|kw| format!(r#"<span style="{}">{}</span>"#, BADGE_STYLE, escape_html(kw)))
                .collect::<Vec<_>>()
                .join(" ");

            cards.push_str(&format!(
                r#"
        <div style="{card}">
            <div style="font-size:15px;font-weight:600;margin-bottom:6px">
                <a href="{url}" style="color:#ffffff;text-decoration:none">{title}</a>
            </div>
            <div style="font-size:12px;color:#5a7a5c;margin-bottom:8px">
                u/{author} &nbsp;·&nbsp; {published}{comments}
            </div>
            <div>{badges}</div>
        </div>"#,
                card = CARD_STYLE,
                url = escape_html(&post.url),
                title = escape_html(&post.title),
                author = escape_html(&post.author),
                published = format_published(post),
                comments = comments,
                badges = badges,
            ));
        }

        format!(
            r#"
    <html><body style="background:#0a0f0a;color:#d8f0da;font-family:monospace;padding:24px">
        <h2 style="color:#5ddf6e">🌵 Tricho Scout: {count} new match(es)</h2>
        {cards}
        <p style="color:#5a7a5c;font-size:11px;margin-top:24px">Sent by Tricho Scout · r/{subreddit}</p>
    </body></html>"#,
            count = matches.len(),
            cards = cards,
            subreddit = escape_html(subreddit),
        )
    }
}

fn format_published(post: &Post) -> String {
    post.published
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %I:%M %p").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched_post() -> Post {
        let mut post = Post::new("abc123".to_string(), "Pachanoi cuttings".to_string())
            .with_url("https://www.reddit.com/r/sanpedrocactusforsale/comments/abc123/x/".to_string())
            .with_author("grower".to_string())
            .with_content("<p>Two rooted cuttings</p>".to_string());
        post.matched_keywords = vec!["pachanoi".to_string(), "crest".to_string()];
        post
    }

    #[test]
    fn test_subject_counts_matches() {
        let digest = Digest::from_matches(&[matched_post(), matched_post()], "sanpedrocactusforsale");
        assert_eq!(digest.subject, "🌵 Tricho Scout: 2 new match(es)!");
    }

    #[test]
    fn test_text_part_lists_post_fields() {
        let digest = Digest::from_matches(&[matched_post()], "sanpedrocactusforsale");

        assert!(digest.text.contains("• Pachanoi cuttings"));
        assert!(digest.text.contains("Author:   u/grower"));
        assert!(digest.text.contains("Posted:   unknown"));
        assert!(digest.text.contains("Keywords: pachanoi, crest"));
        assert!(digest.text.contains("Two rooted cuttings"));
        assert!(!digest.text.contains("💬"));
    }

    #[test]
    fn test_comment_count_shown_when_known() {
        let mut post = matched_post();
        post.comment_count = Some(7);

        let digest = Digest::from_matches(&[post], "sanpedrocactusforsale");

        assert!(digest.text.contains("💬 7 comments"));
        assert!(digest.html.contains("💬 7"));
    }

    #[test]
    fn test_html_part_escapes_title() {
        let mut post = matched_post();
        post.title = "Crest <b>&</b> pup".to_string();

        let digest = Digest::from_matches(&[post], "sanpedrocactusforsale");

        assert!(digest.html.contains("Crest &lt;b&gt;&amp;&lt;/b&gt; pup"));
        assert!(digest.html.contains("r/sanpedrocactusforsale"));
        assert!(digest.html.contains(">pachanoi</span>"));
    }
}
