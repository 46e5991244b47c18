use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Result};
use clap::Parser;
use tw_extractor::config::{default_config_path, Config};
use tw_extractor::extractor::{self, Exclude, ExtractOptions, ExtractRequest, Mode};
use tw_extractor::reporter::{self, OutputType};
use tw_extractor::{credentials, logging};
use twitter::{Auth, TwitterClient};

/// Extract Twitter users and tweets into CSV, JSON, SQLite or Excel
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Config file location
    #[clap(long, value_parser)]
    config: Option<PathBuf>,

    /// Act as the account owning the API keys (bearer token) instead of a
    /// delegated account
    #[clap(long)]
    forme: bool,

    /// Username to extract
    #[clap(short, long)]
    user: Option<String>,

    /// Comma separated usernames to look up in bulk
    #[clap(long, value_delimiter = ',')]
    users: Option<Vec<String>>,

    /// Accounts followed by the user
    #[clap(long)]
    friends: bool,

    /// Followers of the user
    #[clap(long)]
    followers: bool,

    /// Tweets of the user
    #[clap(long)]
    user_tweets: bool,

    /// Search recent tweets by keyword
    #[clap(short, long)]
    search: Option<String>,

    /// Maximum number of tweets to extract
    #[clap(long)]
    tweet_count: Option<usize>,

    /// Comma separated tweet kinds to skip: retweets, replies
    #[clap(short, long, default_value = "retweets")]
    excludes: String,

    #[clap(short = 't', long, value_enum)]
    output_type: Option<OutputType>,

    #[clap(short, long, value_parser)]
    output_file: Option<PathBuf>,

    /// Log every extracted record
    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let log_guard = logging::init(args.verbose);

    let code = match run(args).await {
        Ok(_) => 0,
        Err(err) => {
            tracing::debug!("run failed: {:#}", err);
            eprintln!("{:#}", err);
            1
        }
    };

    // Flush the log file before exiting
    drop(log_guard);
    process::exit(code);
}

async fn run(args: Args) -> Result<()> {
    let conf = match args.config.as_ref() {
        Some(path) => Config::read(path)?,
        None => match default_config_path() {
            Some(path) => Config::read_optional(path)?,
            None => Config::default(),
        },
    };

    let mode = Mode::select(&ExtractRequest {
        user: args.user,
        users: args.users,
        friends: args.friends,
        followers: args.followers,
        user_tweets: args.user_tweets,
        search: args.search,
    })?;
    let options = ExtractOptions {
        tweet_count: args.tweet_count,
        excludes: Exclude::parse_list(&args.excludes)?,
    };
    let output_type = args
        .output_type
        .or(conf.output.output_type)
        .unwrap_or_default();
    let output_file = args
        .output_file
        .or(conf.output.output_file)
        .unwrap_or_else(|| output_type.default_file());

    let client = if args.forme {
        let token = conf
            .twitter
            .bearer_token()
            .ok_or_else(|| anyhow!("Missing bearer token, set TWITTER_BEARER_TOKEN"))?;
        TwitterClient::new(Auth::Bearer(token))?
    } else {
        let consumer = conf.twitter.consumer().ok_or_else(|| {
            anyhow!("Missing consumer keys, set TWITTER_CONSUMER_KEY and TWITTER_CONSUMER_SECRET")
        })?;
        let http = twitter::http_client()?;
        let access =
            credentials::load_or_authorize(&http, &consumer, &conf.twitter.credentials_file)
                .await?;
        let client = TwitterClient::with_client(http, Auth::User { consumer, access });
        let me = client.me().await?;
        tracing::info!("Acting as @{}", me.username);
        client
    };

    let extraction = extractor::extract(&client, &mode, &options).await?;
    let mut sink = reporter::create(output_type, &output_file, extraction.data_type)?;
    let summary = reporter::save(sink.as_mut(), extraction).await?;

    if summary.skipped > 0 {
        tracing::info!("{} records already existed", summary.skipped);
    }

    Ok(())
}
