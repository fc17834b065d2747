use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "mediaflow")]
#[command(about = "mediaflow CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
    /// Resolve a single URL against the demo addon and print the outcome
    Resolve(ResolveArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub address: SocketAddr,
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// URL to resolve
    pub url: String,

    /// Override the maximum resolver chain depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Trust the URL as a direct link and skip resolution
    #[arg(long)]
    pub trust_direct: bool,
}
