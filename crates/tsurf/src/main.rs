//! tsurf - fuzzy search over ctags output
//!
//! Usage:
//!     ctags -f - src/*.rs | tsurf --tags - parse
//!     tsurf --tags tags --line 120 '%'
//!     tsurf --backend reference --json '#Finder'

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tsurf::{format_json, format_text, load_config, logging, read_tags, SearchRequest};
use tsurf_core::Backend;

#[derive(Parser, Debug)]
#[command(name = "tsurf")]
#[command(about = "Fuzzy tag search with smart case and word-boundary scoring")]
#[command(version)]
struct Args {
    /// Query, optionally prefixed with a scope modifier ('%' buffer, '#' project)
    #[arg(default_value = "")]
    query: String,

    /// Tags file in ctags format ('-' reads stdin)
    #[arg(short, long, default_value = "tags")]
    tags: PathBuf,

    /// JSON finder configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Filetype selecting kinds map and exclusions from the config
    #[arg(short, long)]
    filetype: Option<String>,

    /// Uppercase query characters match only uppercase tag characters
    #[arg(long, overrides_with = "ignore_case")]
    smart_case: bool,

    /// Match case-insensitively everywhere
    #[arg(long, overrides_with = "smart_case")]
    ignore_case: bool,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Cursor line; orders results for an empty query
    #[arg(short, long)]
    line: Option<usize>,

    /// Matching backend (native, reference)
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn run(args: Args) -> tsurf::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.smart_case {
        config.smart_matching = true;
    } else if args.ignore_case {
        config.smart_matching = false;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if args.max_results.is_some() {
        config.max_results = args.max_results;
    }

    let text = read_tags(&args.tags)?;
    let request = SearchRequest::new(args.query)
        .with_filetype(args.filetype)
        .with_cursor_line(args.line);

    let tags = request.parse(&config, &text);
    info!(tags = tags.len(), path = %args.tags.display(), "loaded tags");
    let (_, matches) = request.rank(&config, &tags);

    let out = if args.json {
        format_json(&matches)? + "\n"
    } else {
        format_text(&matches)
    };
    io::stdout().lock().write_all(out.as_bytes())?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_with_filter(&args.log_level);

    run(args)?;
    Ok(())
}
