use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::fetch::ResourceArg;

#[derive(Parser)]
#[command(name = "eventhub")]
#[command(about = "EventHub CLI - sign in and browse events, prizes and schedules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in through an identity provider (schoology, google)
    Login {
        /// Provider to sign in with; prompts when omitted
        provider: Option<String>,
    },
    /// Sign in with a guest email and password
    GuestLogin {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a guest account and sign in with it
    Register {
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the current session
    Logout,
    /// Show whether a session is active
    Status,
    /// Fetch a resource and print it as JSON
    Fetch {
        #[arg(value_enum)]
        resource: ResourceArg,
        /// Post id, required for `post`
        #[arg(long)]
        id: Option<u64>,
        /// Follow pagination and print every result
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    eventhub_cli::logging::init();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let ctx = eventhub_cli::AppContext::from_env().await?;

    match command {
        Commands::Login { provider } => cli::auth::login_command(&ctx, provider.as_deref()).await,
        Commands::GuestLogin { email } => cli::auth::guest_login_command(&ctx, email).await,
        Commands::Register { email } => cli::auth::register_command(&ctx, email).await,
        Commands::Logout => cli::auth::logout_command(&ctx).await,
        Commands::Status => cli::auth::status_command(&ctx).await,
        Commands::Fetch { resource, id, all } => {
            cli::fetch::fetch_command(&ctx, resource, id, all).await
        }
    }
}
