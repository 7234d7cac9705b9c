use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kindred::application::ports::{BlockRepository, MembershipStore};
use kindred::{
    AppConfig, ConnectionPool, DirectConversationService, LikeOutcome, LikeService, Repository,
    SqliteRepository, UserId, init_logging,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "kindred-admin")]
#[command(about = "Maintenance tool for Kindred direct conversations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database URL
    #[arg(long, env = "KINDRED_DATABASE_URL")]
    database_url: Option<String>,

    /// Enable JSON logging (`KINDRED_LOG_JSON` is read through the app config)
    #[arg(long)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations
    Migrate,
    /// Find or create the direct conversation between two users
    Resolve {
        #[arg(long)]
        user: String,
        #[arg(long)]
        other: String,
    },
    /// Attach a conversation to a match
    BindMatch {
        #[arg(long)]
        match_id: String,
        #[arg(long)]
        user_a: String,
        #[arg(long)]
        user_b: String,
    },
    /// Record that `user` blocks `target`
    Block {
        #[arg(long)]
        user: String,
        #[arg(long)]
        target: String,
    },
    /// Remove a block
    Unblock {
        #[arg(long)]
        user: String,
        #[arg(long)]
        target: String,
    },
    /// Record a like, matching when it is reciprocated
    Like {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// List conversations with fewer than two members
    Audit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(url) = cli.database_url.clone() {
        config.database.url = url;
    }
    config.logging.json |= cli.json_logs;
    init_logging(&config.logging);

    let pool = ConnectionPool::from_config(&config.database)
        .await
        .with_context(|| format!("failed to open {}", config.database.url))?;
    let repository = Arc::new(SqliteRepository::new(pool.clone()));
    repository
        .initialize()
        .await
        .context("failed to apply migrations")?;

    let output = run(cli.command, &config, repository).await;
    pool.close().await;

    println!("{}", serde_json::to_string_pretty(&output?)?);
    Ok(())
}

async fn run(
    command: Commands,
    config: &AppConfig,
    repository: Arc<SqliteRepository>,
) -> Result<serde_json::Value> {
    let service = DirectConversationService::new(
        repository.clone(),
        repository.clone(),
        repository.clone(),
        config.resolver.clone(),
    );

    let value = match command {
        Commands::Migrate => {
            info!("Migrations applied");
            json!({ "status": "ok" })
        }
        Commands::Resolve { user, other } => {
            let conversation_id = service
                .resolve_direct_conversation(&user, &other)
                .await
                .context("resolve failed")?;
            json!({ "conversation_id": conversation_id })
        }
        Commands::BindMatch {
            match_id,
            user_a,
            user_b,
        } => {
            let conversation_id = service
                .bind_match_conversation(&match_id, &user_a, &user_b)
                .await
                .context("bind failed")?;
            json!({ "match_id": match_id, "conversation_id": conversation_id })
        }
        Commands::Block { user, target } => {
            repository
                .block_user(&parse_user(&user)?, &parse_user(&target)?)
                .await?;
            json!({ "blocked": true })
        }
        Commands::Unblock { user, target } => {
            repository
                .unblock_user(&parse_user(&user)?, &parse_user(&target)?)
                .await?;
            json!({ "blocked": false })
        }
        Commands::Like { from, to } => {
            let likes = LikeService::new(
                repository.clone(),
                repository.clone(),
                repository.clone(),
                repository.clone(),
            );
            match likes.like(&from, &to).await.context("like failed")? {
                LikeOutcome::Pending => json!({ "matched": false }),
                LikeOutcome::Matched {
                    match_record,
                    conversation_id,
                } => json!({
                    "matched": true,
                    "match": match_record,
                    "conversation_id": conversation_id,
                }),
            }
        }
        Commands::Audit => {
            let conversations = repository.list_underpopulated_conversations().await?;
            json!({ "underpopulated": conversations })
        }
    };

    Ok(value)
}

fn parse_user(raw: &str) -> Result<UserId> {
    UserId::new(raw).map_err(anyhow::Error::msg)
}
