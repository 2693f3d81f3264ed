use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use pdl::{Downloader, DEFAULT_PART_SIZE};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL to download
    url: String,

    /// Output file path (defaults to the last segment of the URL path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Size of each part in bytes
    #[arg(short = 's', long, default_value_t = DEFAULT_PART_SIZE)]
    part_size: u64,

    /// HTTP connect timeout in seconds
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let output = match args.output {
        Some(path) => path,
        None => filename_from_url(&args.url)?,
    };

    let client = reqwest::Client::builder()
        .user_agent(concat!("pdl/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(args.connect_timeout))
        .build()
        .context("failed to build HTTP client")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        Downloader::new(client)
            .with_part_size(args.part_size)
            .download(&args.url, &output)
            .await
    })
    .with_context(|| format!("download of {} failed", args.url))?;

    println!("Saved {}", output.display());
    Ok(())
}

fn filename_from_url(raw: &str) -> Result<PathBuf> {
    let url = Url::parse(raw).context("invalid URL")?;

    let name = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(sanitize_filename)
        .unwrap_or_else(|| "download.bin".to_string());

    Ok(PathBuf::from(name))
}

fn sanitize_filename(filename: &str) -> String {
    filename.replace(
        |c: char| !c.is_alphanumeric() && c != '.' && c != '-' && c != '_',
        "_",
    )
}
