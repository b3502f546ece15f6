use anyhow::Result;
use clap::Parser;
use scigraph::crawl::CrawlOutcome;
use scigraph::graph::save_graph;
use scigraph::llm::LlmExtractor;
use scigraph::wiki::WikipediaClient;
use scigraph::{Config, Crawler};
use std::path::PathBuf;
use std::sync::atomic::Ordering;

#[derive(Parser, Debug)]
#[command(name = "scigraph")]
#[command(about = "Crawl Wikipedia and build a directed influence graph of scientists")]
struct Args {
    /// Path to config.toml (default: SCIGRAPH_CONFIG env var, then ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the seed scientist from the config
    #[arg(long)]
    seed: Option<String>,

    /// Override the maximum BFS depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Override the maximum number of scientists visited
    #[arg(long)]
    max_scientists: Option<usize>,

    /// Override the output graph file path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    log::info!("Starting Scigraph v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // CLI overrides; the resulting config is immutable for the run
    if let Some(seed) = args.seed {
        config.crawl.seed = seed;
    }
    if let Some(max_depth) = args.max_depth {
        config.crawl.max_depth = max_depth;
    }
    if let Some(max_scientists) = args.max_scientists {
        config.crawl.max_scientists = max_scientists;
    }
    if let Some(output) = args.output {
        config.crawl.output_path = output;
    }

    let extractor = LlmExtractor::from_config(&config.llm);
    log::info!("LLM cascade: {}", extractor.provider_names().join(" -> "));

    // The crawl is useless without a working LLM; refuse to start
    if !extractor.check_connection().await {
        anyhow::bail!(
            "No reachable LLM provider. If using Ollama, make sure it is installed and \
             running (`ollama serve`); if using a hosted provider, check the API key in \
             your .env file or environment."
        );
    }

    let source = WikipediaClient::new(&config.wikipedia.language, &config.wikipedia.user_agent);

    let output_path = config.crawl.output_path.clone();
    let mut crawler = Crawler::new(source, extractor, config.crawl);

    // Ctrl-C flips the stop flag; the loop finishes its current node
    // and exits cleanly so the partial graph can be saved.
    let stop = crawler.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Ctrl-C received; finishing current node then saving");
            stop.store(true, Ordering::Relaxed);
        }
    });

    let outcome = crawler.run().await;

    // Every terminal state persists whatever was accumulated
    if crawler.graph().is_empty() {
        log::error!("No nodes collected. Check your internet connection and configuration.");
    } else {
        save_graph(crawler.graph(), &output_path)?;
    }

    match outcome {
        CrawlOutcome::Done => {
            log::info!("Finished successfully");
            Ok(())
        }
        CrawlOutcome::Interrupted => {
            log::warn!("Run interrupted; partial graph saved");
            Ok(())
        }
        CrawlOutcome::Failed(e) => {
            log::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
