use anyhow::{Context, Result};
use clap::Parser;
use fixture_loader::{Dom, Fetcher, Fixtures, HttpFetcher, MemoryDom, Payload, SetupOptions};
use log::info;
use reqwest::Url;

/// Load fixtures the way a test would and show what the loader makes of them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Fixture paths, relative to the base path
    #[arg(required = true)]
    paths: Vec<String>,

    /// JSON file with `basePath` and/or `containerId`
    #[arg(long)]
    config: Option<String>,

    /// Base path prepended to every fixture path
    #[arg(long)]
    base_path: Option<String>,

    /// Id of the element receiving HTML fixtures
    #[arg(long)]
    container_id: Option<String>,

    /// Origin for relative fixture URLs, e.g. http://localhost:9876/
    #[arg(long, conflicts_with = "root")]
    origin: Option<String>,

    /// Read fixtures from this directory instead of over HTTP
    #[arg(long)]
    root: Option<String>,

    /// Inject the fixtures into a document and print it (.css files go to
    /// the head, everything else to the container)
    #[arg(long)]
    render: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.root {
        Some(root) => {
            info!("Reading fixtures from {}", root);
            run(&cli, Fixtures::from_dir(root, MemoryDom::new()))
        }
        None => {
            let fetcher = match &cli.origin {
                Some(origin) => {
                    let origin = Url::parse(origin)
                        .with_context(|| format!("Invalid origin: {}", origin))?;
                    HttpFetcher::with_origin(origin)
                }
                None => HttpFetcher::new(),
            };
            run(&cli, Fixtures::new(fetcher, MemoryDom::new()))
        }
    }
}

fn run<F: Fetcher>(cli: &Cli, mut fixtures: Fixtures<F, MemoryDom>) -> Result<()> {
    if let Some(path) = &cli.config {
        let options = SetupOptions::from_json_file(path)?;
        fixtures.setup(Some(options));
    }
    let config = fixtures.setup(Some(SetupOptions {
        base_path: cli.base_path.clone(),
        container_id: cli.container_id.clone(),
    }));
    println!(
        "Base path: {}  Container: #{}",
        config.base_path, config.container_id
    );

    if cli.render {
        for path in &cli.paths {
            if path.ends_with(".css") {
                fixtures.append_css(path)?;
            } else {
                fixtures.append_html(path)?;
            }
        }
        println!("{}", fixtures.dom().to_html());
        let container = fixtures.dom().inner_html(&config.container_id);
        info!(
            "Container holds {} bytes of markup",
            container.map_or(0, |html| html.len())
        );
        return Ok(());
    }

    fixtures.preload(cli.paths.as_slice())?;
    for path in &cli.paths {
        let url = config.resolve(path);
        let payload = fixtures.read(path)?;
        println!("\n{} ({})", url, payload.kind());
        match payload {
            Payload::Text(text) => println!("{}", text),
            Payload::Json(value) => println!(
                "{}",
                serde_json::to_string_pretty(value).context("Failed to format JSON fixture")?
            ),
            Payload::Document(document) => {
                let root = document.root();
                println!("<{}> with {} child elements", root.name, root.elements().count());
                println!("{}", document.source());
            }
        }
        println!("{}", "-".repeat(50));
    }
    println!("\n{} fixtures cached", fixtures.cache().len());

    Ok(())
}
