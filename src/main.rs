//! cachectl - admin CLI for the cache facade
//!
//! Inspects and invalidates cache entries through the same facade the
//! application uses, so keys, prefixes and encryption behave identically.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_facade::{CacheModule, CachedValue, Config, GetOptions, KeyBuilder, SetOptions};

#[derive(Debug, Parser)]
#[command(name = "cachectl", version, about = "Inspect and invalidate cache entries")]
struct Cli {
    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", global = true)]
    redis_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read a key
    Get {
        key: String,
        /// Decrypt the stored payload
        #[arg(long)]
        decrypt: bool,
    },
    /// Write a key; the value is parsed as JSON when possible
    Set {
        key: String,
        value: String,
        /// Expiry in seconds
        #[arg(long)]
        ttl: Option<u64>,
        /// Encrypt the payload
        #[arg(long)]
        encrypt: bool,
    },
    /// Delete a key
    Del { key: String },
    /// Check whether a key exists
    Exists { key: String },
    /// List keys matching a glob pattern
    Keys { pattern: String },
    /// Atomically delete every key matching any of the patterns
    Invalidate {
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Remove every key in the store
    Flush {
        /// Confirm the flush
        #[arg(long)]
        yes: bool,
    },
    /// Print the key built from segments with the configured prefix
    Key { segments: Vec<String> },
    /// Print the truncated SHA-256 hash of the input
    Hash {
        data: String,
        #[arg(long, default_value_t = cache_facade::key::DEFAULT_HASH_LENGTH)]
        length: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_facade=info,cachectl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = cli.redis_url {
        config.redis_url = url;
    }

    let command = match cli.command {
        Command::Key { segments } => {
            let mut keys = KeyBuilder::default();
            keys.configure(config.key_config());
            println!("{}", keys.build(&segments));
            return Ok(());
        }
        Command::Hash { data, length } => {
            println!("{}", KeyBuilder::hash(&data, length));
            return Ok(());
        }
        command => command,
    };

    let module = connect(config).await?;
    let cache = module.facade();

    match command {
        Command::Get { key, decrypt } => match cache.get(&key, GetOptions { decrypt }).await? {
            Some(CachedValue::Parsed(value)) => {
                println!("{}", serde_json::to_string_pretty(&value)?)
            }
            Some(CachedValue::Raw(raw)) => println!("{}", raw),
            None => bail!("key not found: {}", key),
        },
        Command::Set {
            key,
            value,
            ttl,
            encrypt,
        } => {
            let data = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
            let ack = cache.set(&key, &data, SetOptions { ttl, encrypt }).await?;
            println!("{}", ack);
        }
        Command::Del { key } => println!("{}", cache.del(&key).await?),
        Command::Exists { key } => println!("{}", cache.exists(&key).await?),
        Command::Keys { pattern } => {
            for key in cache.keys(&pattern).await? {
                println!("{}", key);
            }
        }
        Command::Invalidate { patterns } => {
            cache.delete_all_matching(&patterns).await?;
            info!(?patterns, "Invalidated matching keys");
        }
        Command::Flush { yes } => {
            if !yes {
                bail!("refusing to flush without --yes");
            }
            println!("{}", cache.flush_all().await?);
        }
        Command::Key { .. } | Command::Hash { .. } => {}
    }

    Ok(())
}

/// Wires the configured store and cipher into a cache module.
async fn connect(config: Config) -> anyhow::Result<CacheModule> {
    CacheModule::register(config.into_options())
        .await
        .context("failed to wire cache module")
}
