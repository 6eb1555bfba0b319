use std::collections::HashSet;
use std::thread;

use chrono::{DateTime, Duration, Utc};

use crate::config::PollConfig;
use crate::domain::{Post, SeenSet};
use crate::services::match_filter::MatchFilter;
use crate::services::notification_service::Notifier;
use crate::sources::FeedClient;
use crate::storage::SeenStore;

/// Outcome of one poll cycle
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Page requests made while scanning, not counting the front-page refresh
    pub pages_scanned: usize,
    pub new_posts: usize,
    pub matches: Vec<Post>,
    pub notified: bool,
}

/// Posts collected by the scan phase
struct Scan {
    posts: Vec<Post>,
    pages: usize,
}

/// Runs poll cycles: scan, refresh the seen-set, filter, enrich, notify
pub struct PollService<C: FeedClient, S: SeenStore, N: Notifier> {
    client: C,
    store: S,
    notifier: N,
    filter: MatchFilter,
    config: PollConfig,
}

/// Start of the lookback window, if any
pub fn lookback_cutoff(now: DateTime<Utc>, lookback_hours: f64) -> Option<DateTime<Utc>> {
    if !lookback_hours.is_finite() || lookback_hours <= 0.0 {
        return None;
    }
    let millis = (lookback_hours * 3_600_000.0) as i64;
    Duration::try_milliseconds(millis).and_then(|window| now.checked_sub_signed(window))
}

impl<C: FeedClient, S: SeenStore, N: Notifier> PollService<C, S, N> {
    pub fn new(client: C, store: S, notifier: N, filter: MatchFilter, config: PollConfig) -> Self {
        Self {
            client,
            store,
            notifier,
            filter,
            config,
        }
    }

    pub fn run_cycle(&self, lookback_hours: f64) -> CycleReport {
        self.run_cycle_at(Utc::now(), lookback_hours)
    }

    pub fn run_cycle_at(&self, now: DateTime<Utc>, lookback_hours: f64) -> CycleReport {
        let mut seen = self.store.load();

        let cutoff = lookback_cutoff(now, lookback_hours);
        if cutoff.is_some() {
            tracing::info!("Running with {}h lookback...", lookback_hours);
        }

        let scan = self.scan(&seen, cutoff);

        self.refresh_front_page(&mut seen, &scan.posts);
        if let Err(e) = self.store.save(&seen) {
            tracing::error!("Could not save seen ids: {}", e);
        }

        let new_posts = scan.posts.len();
        tracing::info!("{} new post(s) to check.", new_posts);

        let mut matches = self.filter.select(scan.posts);
        let mut report = CycleReport {
            pages_scanned: scan.pages,
            new_posts,
            ..CycleReport::default()
        };

        if matches.is_empty() {
            tracing::info!("No matches this cycle.");
            return report;
        }

        self.enrich(&mut matches);

        tracing::info!("{} match(es) found, sending digest...", matches.len());
        report.notified = match self.notifier.notify(&matches) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Email error: {}", e);
                false
            }
        };
        report.matches = matches;
        report
    }

    /// Page through the feed collecting unseen posts.
    ///
    /// Without a cutoff only the first page is read. With one, paging continues
    /// while full pages stay inside the window.
    fn scan(&self, seen: &SeenSet, cutoff: Option<DateTime<Utc>>) -> Scan {
        let page_size = self.client.page_size();
        let mut posts = Vec::new();
        let mut collected = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = self.client.fetch_page(cursor.as_deref());
            pages += 1;

            let Some(oldest) = page.last() else {
                break;
            };
            let oldest_id = oldest.id.clone();
            let past_cutoff = cutoff.map_or(true, |cutoff| oldest.is_older_than(cutoff));
            let exhausted = page.len() < page_size;

            for post in page {
                if seen.contains(&post.id) {
                    continue;
                }
                if let Some(cutoff) = cutoff {
                    if !post.is_within(cutoff) {
                        continue;
                    }
                }
                if collected.insert(post.id.clone()) {
                    posts.push(post);
                }
            }

            if cutoff.is_none() || past_cutoff || exhausted {
                break;
            }
            if pages >= self.config.max_pages {
                tracing::warn!("Stopping lookback after {} pages", pages);
                break;
            }

            tracing::debug!("Fetching page {} after {}", pages + 1, oldest_id);
            cursor = Some(oldest_id);
            thread::sleep(self.config.page_delay);
        }

        Scan { posts, pages }
    }

    /// Mark the current front page and every collected post as seen.
    ///
    /// The front page is re-read regardless of lookback, so after a cycle its
    /// ids are always in the seen-set.
    fn refresh_front_page(&self, seen: &mut SeenSet, collected: &[Post]) {
        for post in self.client.fetch_page(None) {
            seen.insert(post.id);
        }
        for post in collected {
            seen.insert(post.id.clone());
        }
    }

    /// Attach comment counts where the lookup has them
    fn enrich(&self, matches: &mut [Post]) {
        let ids: Vec<String> = matches.iter().map(|p| p.id.clone()).collect();
        let counts = self.client.fetch_comment_counts(&ids);

        for post in matches.iter_mut() {
            post.comment_count = counts.get(&post.id).copied();
        }
    }
}
