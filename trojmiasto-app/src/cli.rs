//! Command-line surface: resolve listing URLs, fetch pages, decode contacts.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use trojmiasto_config::TrojmiastoConfig;
use trojmiasto_http::{Fetcher, HttpClient, ResponseCache};
use trojmiasto_search::{FilterSet, FilterValue, SearchClient};

#[derive(Parser)]
#[command(
    name = "trojmiasto",
    about = "Search-URL builder and page fetcher for ogloszenia.trojmiasto.pl"
)]
pub struct Cli {
    /// Optional configuration file (YAML); TROJMIASTO__* env vars override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve the listing URL for a category, region, and filters.
    Url {
        /// Search category, e.g. "Dom" or "Mieszkanie".
        category: String,
        /// Region path segment, e.g. "gdansk".
        #[arg(long)]
        region: Option<String>,
        /// Filter as KEY=VALUE or KEY=MIN..MAX (either bound optional).
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },
    /// Fetch a page and print its body.
    Fetch { url: String },
    /// Decode an obfuscated contact hash using a session cookie.
    Decode {
        hash: String,
        /// Session cookie as "name=value".
        #[arg(long)]
        cookie: String,
    },
}

pub fn run(args: Cli, cfg: &TrojmiastoConfig) -> Result<()> {
    let http =
        HttpClient::new()?.with_timeout(Duration::from_secs(cfg.http.timeout_secs));

    match args.command {
        Command::Url {
            category,
            region,
            filters,
        } => {
            let filters = parse_filters(&filters)?;
            let url = SearchClient::new(http).resolve_url(&category, region.as_deref(), &filters)?;
            println!("{url}");
        }
        Command::Fetch { url } => {
            let mut fetcher = Fetcher::new(http);
            if cfg.debug {
                fetcher = fetcher.with_cache(ResponseCache::new(cfg.cache.resolved_dir()));
            }
            match fetcher.fetch(&url)? {
                Some(response) => println!("{}", response.body),
                None => bail!("no content for {url}"),
            }
        }
        Command::Decode { hash, cookie } => {
            match SearchClient::new(http).decode_contact(&hash, &cookie)? {
                Some(response) => println!("{}", response.body),
                None => bail!("decode request for {hash} was rejected"),
            }
        }
    }
    Ok(())
}

fn parse_filters(raw: &[String]) -> Result<FilterSet> {
    let mut filters = FilterSet::new();
    for item in raw {
        let (key, value) = item
            .split_once('=')
            .with_context(|| format!("filter `{item}` is not KEY=VALUE"))?;
        let value = parse_filter_value(value)
            .with_context(|| format!("filter `{item}` has an invalid range bound"))?;
        filters.push(key, value);
    }
    Ok(filters)
}

fn parse_filter_value(raw: &str) -> Result<FilterValue> {
    match raw.split_once("..") {
        Some((min, max)) => Ok(FilterValue::range(parse_bound(min)?, parse_bound(max)?)),
        None => Ok(FilterValue::value(raw)),
    }
}

fn parse_bound(raw: &str) -> Result<Option<i64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let bound = raw
        .parse::<i64>()
        .with_context(|| format!("`{raw}` is not a number"))?;
    Ok(Some(bound))
}
