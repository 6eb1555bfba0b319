use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tricho-scout")]
#[command(about = "Watches a subreddit for keyword matches and emails a digest")]
#[command(version)]
pub struct Cli {
    /// Run continuously, checking every --interval minutes
    #[arg(long)]
    pub watch: bool,

    /// Minutes between checks in watch mode
    #[arg(
        long,
        default_value_t = 5,
        env = "SCOUT_INTERVAL_MINUTES",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// On the first check, scan this many hours back (e.g. --lookback 24)
    #[arg(long, default_value_t = 0.0, env = "SCOUT_LOOKBACK_HOURS")]
    pub lookback: f64,

    /// Print the digest instead of emailing it
    #[arg(long)]
    pub dry_run: bool,
}
