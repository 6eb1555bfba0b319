use std::collections::HashMap;

use crate::domain::Post;

/// A paginated source of posts.
///
/// Implementations never fail: transport and decode problems are logged and
/// surface as empty results so a cycle can carry on.
pub trait FeedClient {
    /// Fetch one page of the newest posts, resuming after `cursor` (a post id) when given
    fn fetch_page(&self, cursor: Option<&str>) -> Vec<Post>;

    /// Look up comment counts for the given ids; unknown ids are left out
    fn fetch_comment_counts(&self, ids: &[String]) -> HashMap<String, u64>;

    /// Number of posts a full page holds
    fn page_size(&self) -> usize;
}
