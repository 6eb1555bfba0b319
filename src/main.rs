use std::thread;
use std::time::Duration;

use clap::Parser;

use tricho_scout::cli::Cli;
use tricho_scout::config::Config;
use tricho_scout::errors::ScoutResult;
use tricho_scout::logging;
use tricho_scout::services::{ConsoleNotifier, EmailNotifier, MatchFilter, Notifier, PollService};
use tricho_scout::sources::RedditSource;
use tricho_scout::storage::JsonSeenStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> ScoutResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    logging::init(&config.log_level);

    let filter = MatchFilter::new(&config.filter)?;
    let client = RedditSource::new(config.feed.clone());
    let store = JsonSeenStore::new(&config.state_path);

    if cli.dry_run {
        let notifier = ConsoleNotifier::new(&config.feed.subreddit);
        let service = PollService::new(client, store, notifier, filter, config.poll.clone());
        drive(&service, &cli, &config);
    } else {
        let notifier = EmailNotifier::new(config.email.as_ref(), &config.feed.subreddit)?;
        if !notifier.is_enabled() {
            tracing::info!("Email disabled; matches will only be logged.");
        }
        let service = PollService::new(client, store, notifier, filter, config.poll.clone());
        drive(&service, &cli, &config);
    }

    Ok(())
}

fn drive<N: Notifier>(
    service: &PollService<RedditSource, JsonSeenStore, N>,
    cli: &Cli,
    config: &Config,
) {
    if cli.watch {
        cmd_watch(service, cli.interval, cli.lookback, config);
    } else {
        cmd_check(service, cli.lookback, config);
    }
}

fn cmd_check<N: Notifier>(
    service: &PollService<RedditSource, JsonSeenStore, N>,
    lookback_hours: f64,
    config: &Config,
) {
    tracing::info!("Checking r/{}...", config.feed.subreddit);
    service.run_cycle(lookback_hours);
}

/// Run forever; only the first cycle looks back
fn cmd_watch<N: Notifier>(
    service: &PollService<RedditSource, JsonSeenStore, N>,
    interval_minutes: u64,
    lookback_hours: f64,
    config: &Config,
) {
    tracing::info!(
        "Tricho Scout started, checking r/{} every {} min.",
        config.feed.subreddit,
        interval_minutes
    );

    let mut lookback = lookback_hours;
    loop {
        cmd_check(service, lookback, config);
        lookback = 0.0;

        tracing::info!("Sleeping {} min...", interval_minutes);
        thread::sleep(Duration::from_secs(interval_minutes * 60));
    }
}
