// src/main.rs

//! Harvester CLI
//!
//! Crawls product catalogs described by declarative site profiles.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use harvester::error::{AppError, Result};
use harvester::models::{CrawlConfig, SiteProfile};
use harvester::pipeline::run_crawl;
use harvester::storage::LocalStorage;

/// Harvester - profile-driven product catalog crawler
#[derive(Parser, Debug)]
#[command(name = "harvest", version, about = "Profile-driven product catalog crawler")]
struct Cli {
    /// Path to the crawl configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and write the record snapshot
    Crawl {
        /// Name of a built-in site profile
        #[arg(long, conflicts_with = "profile_file")]
        profile: Option<String>,

        /// Path to a site profile JSON file
        #[arg(long)]
        profile_file: Option<PathBuf>,

        /// Override the configured page limit
        #[arg(long)]
        max_pages: Option<u32>,

        /// Use humanized pacing
        #[arg(long)]
        humanize: bool,

        /// Raise renderer verbosity
        #[arg(long)]
        visual_debug: bool,

        /// Override the output directory
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List built-in site profiles
    Profiles,

    /// Validate configuration and a site profile
    Validate {
        /// Name of a built-in site profile
        #[arg(long, conflicts_with = "profile_file")]
        profile: Option<String>,

        /// Path to a site profile JSON file
        #[arg(long)]
        profile_file: Option<PathBuf>,
    },
}

/// Resolve a profile from a built-in name or an external file.
fn resolve_profile(name: Option<&str>, file: Option<&PathBuf>) -> Result<SiteProfile> {
    match (name, file) {
        (Some(name), _) => SiteProfile::builtin(name).ok_or_else(|| {
            AppError::config(format!(
                "Unknown profile '{name}'. Known profiles: {}",
                SiteProfile::builtin_names().join(", ")
            ))
        }),
        (None, Some(path)) => SiteProfile::load(path),
        (None, None) => Err(AppError::config(
            "Either --profile or --profile-file is required",
        )),
    }
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .init();

    match cli.command {
        Command::Crawl {
            profile,
            profile_file,
            max_pages,
            humanize,
            visual_debug,
            output,
        } => {
            let mut config = CrawlConfig::load_or_default(&cli.config);
            if let Some(pages) = max_pages {
                config.max_pages = pages;
            }
            if humanize {
                config.humanize = true;
            }
            if visual_debug {
                config.visual_debug = true;
            }
            if let Some(dir) = output {
                config.output_dir = dir;
            }

            let profile = resolve_profile(profile.as_deref(), profile_file.as_ref())?;
            let storage = LocalStorage::new(&config.output_dir);
            run_crawl(&config, &profile, &storage).await?;
        }

        Command::Profiles => {
            for name in SiteProfile::builtin_names() {
                println!("{name}");
            }
        }

        Command::Validate {
            profile,
            profile_file,
        } => {
            let config = CrawlConfig::load_or_default(&cli.config);
            config.validate()?;
            let profile = resolve_profile(profile.as_deref(), profile_file.as_ref())?;
            profile.validate()?;
            println!("OK: profile '{}' and configuration are valid", profile.site_name);
        }
    }

    Ok(())
}
