use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use newsroom::commands;
use newsroom::config::Config;
use newsroom::correct::FallbackPolicy;
use newsroom::{Category, NewRelease, NewsQuery};

#[derive(Parser)]
#[command(name = "newsroom")]
#[command(
  about = "Newsroom - Press Release Ingestion\nTurns a CSV of press releases into a queryable JSON news store"
)]
#[command(version)]
struct Cli {
  /// Configuration file (defaults to .newsroom.json or newsroom.json if present)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Raise library logging to debug (newsroom=debug) unless RUST_LOG is set
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Filters and pagination for list
#[derive(Args)]
struct QueryArgs {
  /// Page number, starting at 1
  #[arg(short, long, default_value = "1")]
  page: usize,
  /// Releases per page (defaults to the configured page size)
  #[arg(short, long)]
  limit: Option<usize>,
  /// Only releases in this category
  #[arg(short, long)]
  category: Option<Category>,
  /// Only releases carrying this tag
  #[arg(short, long)]
  tag: Option<String>,
  /// Case-insensitive text to find in title or content
  #[arg(short, long)]
  search: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
  /// Parse the press release CSV and replace the news store
  Import {
    /// CSV file to read instead of the configured one
    #[arg(long)]
    csv: Option<PathBuf>,
  },
  /// Re-derive release dates from overrides and content
  FixDates {
    /// What to do when no date can be found
    #[arg(long, value_enum)]
    fallback: Option<FallbackPolicy>,
  },
  /// List releases, newest first
  List {
    #[command(flatten)]
    query: QueryArgs,
    /// Print the page as JSON
    #[arg(long)]
    json: bool,
  },
  /// Show a single release by slug
  Get {
    slug: String,
    /// Print the release as JSON
    #[arg(long)]
    json: bool,
  },
  /// Add a release directly to the store
  Add {
    /// Release title
    title: String,
    /// Release body (HTML)
    #[arg(long)]
    content: Option<String>,
    /// Category; derived from the text when omitted
    #[arg(long)]
    category: Option<Category>,
    /// Tag to attach, repeatable; derived from the text when omitted
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Preview text; derived from the content when omitted
    #[arg(long)]
    excerpt: Option<String>,
    /// Print the stored release as JSON
    #[arg(long)]
    json: bool,
  },
  /// Show counts per category and tag
  Stats,
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("newsroom=debug,warn")
    } else {
      EnvFilter::new("newsroom=warn,warn")
    }
  });

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(filter)
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = Config::load(cli.config.as_deref())?;

  match cli.command {
    Commands::Import { csv } => {
      commands::import_news(&config, csv.as_deref())?;
    }
    Commands::FixDates { fallback } => {
      commands::fix_dates(&config, fallback)?;
    }
    Commands::List { query, json } => {
      let query = NewsQuery {
        page: query.page,
        limit: query.limit.unwrap_or(config.page_size),
        category: query.category,
        tag: query.tag,
        search: query.search,
        slug: None,
      };
      commands::list_news(&config, &query, json)?;
    }
    Commands::Get { slug, json } => {
      commands::get_news(&config, &slug, json)?;
    }
    Commands::Add { title, content, category, tags, excerpt, json } => {
      let input = NewRelease {
        title,
        content,
        category,
        tags: if tags.is_empty() { None } else { Some(tags) },
        excerpt,
      };
      commands::add_news(&config, input, json)?;
    }
    Commands::Stats => {
      commands::stats(&config)?;
    }
  }

  Ok(())
}
