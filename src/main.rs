mod cli;

use clap::Parser;
use cli::{Cli, Commands, ResolveArgs};

use mediaflow::addon::demo_addon;
use mediaflow::api;
use mediaflow::api::models::ResolveResponse;
use mediaflow::config::Config;
use mediaflow::context::{RequestContext, build_http_client};
use mediaflow::engine::{ResolutionEngine, ResolvePolicy};
use mediaflow::model::Source;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => api::run(args.address).await?,
        Commands::Resolve(args) => resolve_once(args).await?,
    }

    Ok(())
}

/// One-shot resolution against the demo addon, printed as JSON.
async fn resolve_once(args: ResolveArgs) -> Result<(), AnyError> {
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    let mut engine_config = config.engine.clone();
    if let Some(max_depth) = args.max_depth {
        engine_config.max_resolve_depth = max_depth;
    }

    let addon = demo_addon()?;
    let engine = ResolutionEngine::new(addon.resolvers().clone(), engine_config);
    let ctx = RequestContext::new(build_http_client(&config.http)?);

    let source = Source::url("cli", args.url);
    let policy = ResolvePolicy {
        trust_direct: args.trust_direct,
    };
    let resolution = engine.resolve_with(&source, policy, &ctx).await?;

    let response = ResolveResponse::from(resolution);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
