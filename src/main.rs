// Command-line front end: validate product pages and print the results.
//
// URLs come from the command line and/or a file (one per line, `#` starts a
// comment). Results go to stdout as a JSON array or CSV; progress and the run
// summary go to stderr. Ctrl-C stops the run after the in-flight batch.

use anyhow::{Context, Result, bail};
use product_schema_validator::run_engine::CSV_COLUMNS;
use product_schema_validator::{
    ChromiumSessionFactory, ProgressEvent, RunController, RunHandle, StatusPolicy,
    ValidationSettings, filter_valid_urls,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
usage: product-schema-validator [options] [URL...]

options:
  -f, --file <path>        read URLs from a file, one per line
  -s, --settings <path>    load settings from a JSON file
  -c, --concurrency <n>    URLs processed in parallel per batch
      --format <json|csv>  output format (default: json)
      --headful            show the browser window
      --no-stealth         disable fingerprint countermeasures
      --no-block           load images, fonts, media and stylesheets
      --lenient            report valid pages with warnings as success
  -h, --help               print this help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug)]
struct Cli {
    urls: Vec<String>,
    url_file: Option<PathBuf>,
    settings_file: Option<PathBuf>,
    concurrency: Option<usize>,
    format: OutputFormat,
    headful: bool,
    no_stealth: bool,
    no_block: bool,
    lenient: bool,
}

impl Cli {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>> {
        let mut cli = Cli {
            urls: Vec::new(),
            url_file: None,
            settings_file: None,
            concurrency: None,
            format: OutputFormat::Json,
            headful: false,
            no_stealth: false,
            no_block: false,
            lenient: false,
        };

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .with_context(|| format!("{name} needs a value"))
            };
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "-f" | "--file" => cli.url_file = Some(PathBuf::from(value("--file")?)),
                "-s" | "--settings" => cli.settings_file = Some(PathBuf::from(value("--settings")?)),
                "-c" | "--concurrency" => {
                    let raw = value("--concurrency")?;
                    cli.concurrency = Some(
                        raw.parse()
                            .with_context(|| format!("invalid concurrency: {raw}"))?,
                    );
                }
                "--format" => {
                    cli.format = match value("--format")?.as_str() {
                        "json" => OutputFormat::Json,
                        "csv" => OutputFormat::Csv,
                        other => bail!("unknown format: {other}"),
                    };
                }
                "--headful" => cli.headful = true,
                "--no-stealth" => cli.no_stealth = true,
                "--no-block" => cli.no_block = true,
                "--lenient" => cli.lenient = true,
                flag if flag.starts_with('-') => bail!("unknown option: {flag}"),
                url => cli.urls.push(url.to_string()),
            }
        }

        Ok(Some(cli))
    }

    fn settings(&self) -> Result<ValidationSettings> {
        let base = match &self.settings_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str::<ValidationSettings>(&raw)
                    .with_context(|| format!("invalid settings in {}", path.display()))?
            }
            None => ValidationSettings::default(),
        };

        let mut builder = base.into_builder();
        if let Some(limit) = self.concurrency {
            builder = builder.concurrency_limit(limit);
        }
        if self.headful {
            builder = builder.headless(false);
        }
        if self.no_stealth {
            builder = builder.stealth_mode(false);
        }
        if self.no_block {
            builder = builder.block_resources(false);
        }
        if self.lenient {
            builder = builder.status_policy(StatusPolicy::Lenient);
        }
        Ok(builder.build()?)
    }

    fn urls(&self) -> Result<Vec<String>> {
        let mut raw = self.urls.clone();
        if let Some(path) = &self.url_file {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            raw.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(str::to_string),
            );
        }
        Ok(filter_valid_urls(raw))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(cli) = Cli::parse(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let settings = cli.settings()?;
    let urls = cli.urls()?;
    if urls.is_empty() {
        bail!("no valid URLs given\n\n{USAGE}");
    }

    let handle = RunHandle::new();
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Stopping after the current batch...");
                handle.stop();
            }
        });
    }

    let progress = |event: &ProgressEvent| {
        eprintln!(
            "[{}/{}] {} {}",
            event.processed_count, event.total_count, event.result.status, event.url
        );
    };

    let controller = RunController::new(ChromiumSessionFactory::new());
    let report = controller.run(urls, settings, &handle, &progress).await?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report.results)?);
        }
        OutputFormat::Csv => {
            println!("{}", CSV_COLUMNS.join(","));
            for result in &report.results {
                println!("{}", result.csv_line());
            }
        }
    }

    eprintln!("{}", serde_json::to_string_pretty(&report.summary)?);
    Ok(())
}
