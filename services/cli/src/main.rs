use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use feed::SortOption;

/// Terminal client for Cinema Reviews
#[derive(Parser, Debug)]
#[command(name = "cinema", about = "Cinema Reviews client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Search and sort flags shared by listings that offer them
#[derive(clap::Args, Debug, Clone)]
struct FeedArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Sort order: date_desc, date_asc or likes_desc
    #[arg(long, default_value_t = SortOption::DateDesc)]
    sort: SortOption,
    /// Search in review and movie titles
    #[arg(long, default_value = "")]
    search: String,
}

/// Review fields for create and edit
#[derive(clap::Args, Debug, Clone)]
struct ReviewArgs {
    #[arg(long)]
    title: String,
    /// Title of the reviewed movie
    #[arg(long)]
    movie: String,
    /// Review text
    #[arg(long)]
    content: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CINEMA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in with an existing account
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CINEMA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Approved reviews from everyone
    Feed {
        #[command(flatten)]
        args: FeedArgs,
        /// Only reviews by this user
        #[arg(long)]
        author: Option<i64>,
    },

    /// Your own reviews
    My {
        #[command(flatten)]
        args: FeedArgs,
    },

    /// Reviews waiting for moderation
    Moderation {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show a single review
    Show {
        id: String,
        /// Open the review for moderation
        #[arg(long)]
        moderate: bool,
    },

    /// Like or unlike a review on a page of the public feed
    Like {
        id: String,
        #[command(flatten)]
        args: FeedArgs,
    },

    /// Write a new review
    Create {
        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Edit one of your reviews
    Edit {
        id: String,
        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Delete one of your reviews
    Delete { id: String },

    /// Approve a pending review
    Approve { id: String },

    /// Reject a pending review
    Reject { id: String },

    /// Show a user and their reviews
    User {
        id: i64,
        #[command(flatten)]
        args: FeedArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {:?}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut app = commands::App::connect().await?;

    match cli.command {
        Command::Register { username, password } => app.register(&username, &password).await,
        Command::Login { username, password } => app.login(&username, &password).await,
        Command::Logout => app.logout(),
        Command::Whoami => app.whoami(),
        Command::Feed { args, author } => app.public_feed(&args, author).await,
        Command::My { args } => app.my_reviews(&args).await,
        Command::Moderation { page } => app.moderation(page).await,
        Command::Show { id, moderate } => app.show(&id, moderate).await,
        Command::Like { id, args } => app.like(&id, &args).await,
        Command::Create { review } => app.create(&review).await,
        Command::Edit { id, review } => app.edit(&id, &review).await,
        Command::Delete { id } => app.delete(&id).await,
        Command::Approve { id } => app.approve(&id).await,
        Command::Reject { id } => app.reject(&id).await,
        Command::User { id, args } => app.user(id, &args).await,
    }
}
