use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vnpay-gateway")]
#[command(about = "VNPAY hosted-checkout redirect builder and callback verifier", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Validate configuration and print the resolved, redacted settings
    Config,
}
