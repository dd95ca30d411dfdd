use anyhow::Result;
use clap::{Parser, Subcommand};
use fitforum_client::cli;
use fitforum_client::config::ForumConfig;
use fitforum_client::telemetry;
use fitforum_client::thread::ThreadSession;
use fitforum_client::ApiClient;

#[derive(Parser)]
#[command(author, version, about = "Command-line client for the FitForum community board")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all forum posts
    List,
    /// Show a post and its replies
    Show {
        post_id: String,
        /// Expand every reply that has nested replies
        #[arg(long)]
        expand_all: bool,
    },
    /// Create a new forum post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
    },
    /// Reply to a post, or to one of its replies with --parent
    Reply {
        post_id: String,
        body: String,
        #[arg(long)]
        parent: Option<String>,
    },
}

fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = Args::parse();
    let config = ForumConfig::from_env()?;
    let client = ApiClient::from_config(&config)?;
    tracing::debug!(base_url = %client.base_url(), "using forum API");

    let output = match args.command {
        Command::List => cli::list_posts(&client)?,
        Command::Show {
            post_id,
            expand_all,
        } => {
            let mut session = ThreadSession::new(post_id, config.response_ordering);
            cli::show_post(&client, &mut session, expand_all)?
        }
        Command::Create { title, body } => cli::create_post(&client, &title, &body)?,
        Command::Reply {
            post_id,
            body,
            parent,
        } => {
            let mut session = ThreadSession::new(post_id, config.response_ordering);
            cli::reply(&client, &mut session, &body, parent.as_deref())?
        }
    };
    print!("{output}");
    Ok(())
}
