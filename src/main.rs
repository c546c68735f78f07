mod api;
mod llm;
mod server;

use clap::{Args, Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use focus_reco::config::EngineConfig;
use focus_reco::context::NicheContext;
use focus_reco::{recommend, recommend_with_generator, Metrics};

#[derive(Parser)]
#[command(name = "focus-reco", about = "Creator content focus recommender")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Recommend(RecommendArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct RecommendArgs {
    #[arg(long)]
    niche: String,
    #[arg(long)]
    platform: Option<String>,
    #[arg(long, value_delimiter = ',')]
    specialties: Vec<String>,
    #[arg(long)]
    followers: Option<u64>,
    #[arg(long)]
    impressions: Option<u64>,
    #[arg(long)]
    reach: Option<u64>,
    #[arg(long)]
    clicks: Option<u64>,
    #[arg(long)]
    conversions: Option<u64>,
    #[arg(long)]
    likes: Option<u64>,
    #[arg(long)]
    shares: Option<u64>,
    #[arg(long)]
    saves: Option<u64>,
    #[arg(long)]
    comments: Option<u64>,
    #[arg(long)]
    ctr: Option<f64>,
    #[arg(long)]
    retention: Option<f64>,
    #[arg(long)]
    avg_watch_pct: Option<f64>,
    #[arg(long)]
    completion_rate: Option<f64>,
    #[arg(long)]
    freq: Option<f64>,
    #[arg(long)]
    ai: bool,
    #[arg(long)]
    temperature: Option<f64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long, default_value = "frontend")]
    web_root: String,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, _) = EngineConfig::load(None)?;

    match cli.command {
        Command::Recommend(args) => run_recommend(args, config).await,
        Command::Serve(args) => server::serve(args, config).await,
    }
}

async fn run_recommend(args: RecommendArgs, config: EngineConfig) -> Result<(), String> {
    let metrics = Metrics {
        platform: args.platform.clone(),
        niche: args.niche.clone(),
        format: None,
        followers: args.followers,
        impressions: args.impressions,
        reach: args.reach,
        clicks: args.clicks,
        conversions: args.conversions,
        likes: args.likes,
        shares: args.shares,
        saves: args.saves,
        comments: args.comments,
        followers_change: None,
        ctr: args.ctr,
        retention: args.retention,
        avg_watch_pct: args.avg_watch_pct,
        completion_rate: args.completion_rate,
        freq: args.freq,
    };

    let output = if args.ai {
        let client = llm::OllamaClient::from_config(&config.generator)?;
        let temperature = args.temperature.unwrap_or(config.generator.temperature);
        recommend_with_generator(
            &metrics,
            &args.specialties,
            &client,
            &NicheContext::default(),
            temperature,
            &config,
        )
        .await
    } else {
        recommend(&metrics, &args.specialties, &config)
    };

    if args.json {
        let payload = serde_json::to_string_pretty(&output)
            .map_err(|err| format!("failed to serialize output: {}", err))?;
        println!("{}", payload);
        return Ok(());
    }

    println!("Focus: {}", output.focus.label());
    println!(
        "Scores: discovery {:.3} | retention {:.3} | conversion {:.3}",
        output.scores.discovery, output.scores.retention, output.scores.conversion
    );
    println!("\nRecommendation: {}", output.recommendation);
    println!("\nReason:\n{}", output.reason);

    println!("\nIdeas:");
    for (index, idea) in output.ideas.iter().enumerate() {
        let tags = output
            .hashtags_for_ideas
            .get(index)
            .map(|row| row.join(" "))
            .unwrap_or_default();
        if tags.is_empty() {
            println!("- {}", idea);
        } else {
            println!("- {} [{}]", idea, tags);
        }
    }

    if !output.fully_valid {
        println!("\nNote: draft kept with partial fixes after one repair round.");
    }

    Ok(())
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
