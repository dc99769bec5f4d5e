// ABOUTME: CLI binary for the gleaner note scraper.
// ABOUTME: Scrapes share text / URLs or a saved HTML file and prints markdown or JSON.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use gleaner_core::{ExtractionResult, LeadingMediaPolicy, Scraper};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(about = "Extract title, author, content and images from a Xiaohongshu note")]
struct Args {
    /// Output as JSON instead of markdown
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Saved HTML file to extract from (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL the saved HTML was fetched from (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// Drop the first collected image (some page variants lead with a banner)
    #[arg(long = "skip-first-media")]
    skip_first_media: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Share text or note URLs to scrape
    #[arg()]
    inputs: Vec<String>,
}

/// What the CLI was asked to scrape.
#[derive(Debug, PartialEq)]
enum Source<'a> {
    SavedPage { path: &'a Path, url: &'a str },
    Shares(&'a [String]),
}

impl Args {
    fn source(&self) -> Result<Source<'_>, &'static str> {
        match (&self.html, &self.url, self.inputs.is_empty()) {
            (Some(_), None, _) => Err("--url is required when using --html"),
            (Some(_), Some(_), false) => Err("cannot use both --html and positional inputs"),
            (Some(path), Some(url), true) => Ok(Source::SavedPage {
                path: path.as_path(),
                url: url.as_str(),
            }),
            (None, _, true) => Err("at least one input is required, or use --html with --url"),
            (None, _, false) => Ok(Source::Shares(&self.inputs)),
        }
    }

    fn media_policy(&self) -> LeadingMediaPolicy {
        if self.skip_first_media {
            LeadingMediaPolicy::SkipFirst
        } else {
            LeadingMediaPolicy::Keep
        }
    }
}

/// Scrapes every requested note. Failures are reported on stderr and the rest still run.
async fn gather(scraper: &Scraper, source: Source<'_>) -> (Vec<ExtractionResult>, usize) {
    let mut results = Vec::new();
    let mut failures = 0;
    match source {
        Source::SavedPage { path, url } => {
            let outcome = fs::read_to_string(path)
                .map_err(|e| format!("error reading file {:?}: {}", path, e))
                .and_then(|html| {
                    scraper
                        .scrape_html(&html, url)
                        .map_err(|e| format!("error extracting HTML: {}", e))
                });
            match outcome {
                Ok(result) => results.push(result),
                Err(msg) => {
                    eprintln!("{}", msg);
                    failures += 1;
                }
            }
        }
        Source::Shares(inputs) => {
            for input in inputs {
                match scraper.scrape(input).await {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        eprintln!("error scraping {}: {}", input, e);
                        failures += 1;
                    }
                }
            }
        }
    }
    (results, failures)
}

fn render(results: &[ExtractionResult], json_output: bool) -> serde_json::Result<String> {
    match (json_output, results) {
        (true, [single]) => serde_json::to_string_pretty(single),
        (true, many) => serde_json::to_string_pretty(many),
        (false, _) => Ok(results
            .iter()
            .map(ExtractionResult::format_markdown)
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

fn emit(rendered: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("error writing to {:?}", path)),
        None => {
            println!("{}", rendered);
            Ok(())
        }
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let source = match args.source() {
        Ok(source) => source,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::from(1);
        }
    };

    let scraper = match Scraper::builder()
        .timeout(Duration::from_secs(args.timeout))
        .media_policy(args.media_policy())
        .build()
    {
        Ok(scraper) => scraper,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let start = Instant::now();
    let (results, mut failures) = gather(&scraper, source).await;
    let elapsed = start.elapsed();

    if !results.is_empty() {
        let written = render(&results, args.json_output)
            .context("error serializing output")
            .and_then(|rendered| emit(&rendered, args.output.as_deref()));
        if let Err(e) = written {
            eprintln!("{:#}", e);
            failures += 1;
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if failures > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
