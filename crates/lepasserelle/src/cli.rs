// CLI Interface
//
// This module provides the command-line interface for LeConseil.

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE, ENV_LOG_LEVEL};
use crate::conseil::LeConseil;
use anyhow::{Context, Result as AnyhowResult};
use clap::{Parser, Subcommand};
use leconseil::{ContentItem, Recommendations};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// LeConseil - Related Content Recommender
#[derive(Parser, Debug)]
#[command(name = "leconseil")]
#[command(author = "LeConseil Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Store articles and recommend related reading", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(global = true, long = "config", short = 'c', default_value = DEFAULT_CONFIG_FILE)]
    pub config_path: PathBuf,

    /// Database path (overrides configuration and environment)
    #[arg(global = true, long = "db")]
    pub db_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import articles from a JSON array file
    Import {
        /// JSON file containing an array of articles
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List the most recently published articles
    List {
        /// Maximum number of articles to list
        #[arg(long = "limit", short = 'n', default_value = "20")]
        limit: usize,
    },

    /// Show one article
    Show {
        /// Article id
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Recommend articles related to a stored article
    Recommend {
        /// Id of the article being read
        #[arg(value_name = "ID")]
        id: String,

        /// Number of recommendations (defaults to the configured limit)
        #[arg(long = "limit", short = 'n')]
        limit: Option<usize>,

        /// Print recommendations as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Record a view of an article
    View {
        /// Article id
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete an article
    Delete {
        /// Article id
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config path
        #[arg(long = "write")]
        write: bool,
    },
}

impl Cli {
    /// Resolve the effective configuration.
    ///
    /// File values are overridden by environment variables, which are
    /// overridden by command-line flags.
    pub fn effective_config(&self) -> AnyhowResult<AppConfig> {
        let config = AppConfig::load(&self.config_path)?;
        Ok(self.apply_flags(config.with_env_overrides()))
    }

    fn apply_flags(&self, mut config: AppConfig) -> AppConfig {
        if let Some(db_path) = &self.db_path {
            config.storage.db_path = db_path.display().to_string();
        }
        config
    }

    /// Run the CLI
    pub async fn run(self) -> AnyhowResult<()> {
        let file_config = AppConfig::load(&self.config_path)?;

        // env override warnings need the subscriber installed first
        let level = std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| file_config.logging.level.clone());
        init_logging_impl(self.verbose, &level);

        let config = self.apply_flags(file_config.with_env_overrides());
        config.validate().context("Invalid configuration")?;

        match self.command {
            Commands::Config { write } => cmd_config_impl(&config, &self.config_path, write),
            command => {
                let conseil = LeConseil::open(config).context("Failed to open article database")?;
                let outcome = run_command(&conseil, command).await;
                conseil.close().context("Failed to close article database")?;
                outcome
            }
        }
    }
}

/// Initialize logging implementation
///
/// `--verbose` forces debug output. Otherwise `RUST_LOG` wins over the
/// configured level.
fn init_logging_impl(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

async fn run_command(conseil: &LeConseil, command: Commands) -> AnyhowResult<()> {
    match command {
        Commands::Import { file } => cmd_import_impl(conseil, file),
        Commands::List { limit } => cmd_list_impl(conseil, limit),
        Commands::Show { id } => cmd_show_impl(conseil, &id),
        Commands::Recommend { id, limit, json } => {
            cmd_recommend_impl(conseil, &id, limit, json).await
        }
        Commands::View { id } => cmd_view_impl(conseil, &id),
        Commands::Delete { id } => cmd_delete_impl(conseil, &id),
        Commands::Config { .. } => Ok(()),
    }
}

/// Import command implementation
fn cmd_import_impl(conseil: &LeConseil, file: PathBuf) -> AnyhowResult<()> {
    info!("Importing articles from: {}", file.display());

    let summary = conseil
        .import_file(&file)
        .with_context(|| format!("Import of {} failed", file.display()))?;

    println!("\n✓ Import complete!");
    println!("  Articles read: {}", summary.total);
    println!("  Created: {}", summary.created);
    println!("  Updated: {}", summary.updated);

    Ok(())
}

/// List command implementation
fn cmd_list_impl(conseil: &LeConseil, limit: usize) -> AnyhowResult<()> {
    let items = conseil.list(limit).context("Listing articles failed")?;

    if items.is_empty() {
        println!("No articles stored. Run 'leconseil import <FILE>' first.");
        return Ok(());
    }

    for item in &items {
        println!("{}", summary_line(item));
    }

    Ok(())
}

/// Show command implementation
fn cmd_show_impl(conseil: &LeConseil, id: &str) -> AnyhowResult<()> {
    let item = conseil.show(id).context("Lookup failed")?;

    println!("\n{}\n", item.title);
    println!("  ID: {}", item.id);
    println!("  Category: {}", item.category);
    println!("  Published: {}", item.published_at.format("%Y-%m-%d"));
    println!("  Views: {}", item.view_count);
    if item.is_featured {
        println!("  Featured");
    }
    if let Some(summary) = &item.summary {
        println!("\n{}", summary);
    }

    Ok(())
}

/// Recommend command implementation
async fn cmd_recommend_impl(
    conseil: &LeConseil,
    id: &str,
    limit: Option<usize>,
    json: bool,
) -> AnyhowResult<()> {
    info!("Recommending articles related to: {}", id);

    let ranked = conseil
        .recommend(id, limit)
        .await
        .context("Recommendation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        print!("{}", format_recommendations(id, &ranked));
    }

    Ok(())
}

/// View command implementation
fn cmd_view_impl(conseil: &LeConseil, id: &str) -> AnyhowResult<()> {
    let views = conseil.record_view(id).context("Recording view failed")?;
    println!("{}: {} view(s)", id, views);
    Ok(())
}

/// Delete command implementation
fn cmd_delete_impl(conseil: &LeConseil, id: &str) -> AnyhowResult<()> {
    conseil.delete(id).context("Delete failed")?;
    println!("✓ Deleted {}", id);
    Ok(())
}

/// Config command implementation
fn cmd_config_impl(config: &AppConfig, path: &Path, write: bool) -> AnyhowResult<()> {
    if write {
        config.save(path)?;
        println!("✓ Configuration written to {}", path.display());
    } else {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

fn summary_line(item: &ContentItem) -> String {
    format!(
        "{}  {:<24} {:<18} {:>7} views  {}",
        item.published_at.format("%Y-%m-%d"),
        item.id,
        item.category.as_str(),
        item.view_count,
        item.title
    )
}

/// Render ranked recommendations for the terminal
pub fn format_recommendations(id: &str, ranked: &Recommendations) -> String {
    if ranked.is_empty() {
        return format!("No recommendations for: {}\n", id);
    }

    let mut out = format!(
        "\nFound {} recommendation(s) for '{}' ({:?} pool)\n\n",
        ranked.len(),
        id,
        ranked.source
    );
    for candidate in &ranked.candidates {
        let score = &candidate.score;
        out.push_str(&format!(
            "{}. {} ({})\n",
            candidate.rank, candidate.item.title, candidate.item.id
        ));
        out.push_str(&format!("   Overall Score: {:.2}\n", score.overall));
        out.push_str(&format!(
            "   Explanation: [Category: {:.0}, Keywords: {:.2}, Recency: {:.0}, Popularity: {:.0}]\n\n",
            score.category, score.keyword_overlap, score.recency, score.popularity
        ));
    }
    out
}

/// Main entry point for the CLI
pub async fn main() -> AnyhowResult<()> {
    let cli = Cli::parse();
    cli.run().await
}
