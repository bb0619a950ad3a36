mod db;
mod documents;
mod error;
mod loting;
mod parser;
mod record;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use settings::Settings;
use tracing::info;

#[derive(Parser)]
#[command(name = "middelbare", about = "Amsterdam secondary school data: page extraction and lottery updates")]
struct Cli {
    /// Directory holding html/, json/ and the databases
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract resultaten-/tevredenheid- pages into JSON artifacts
    Parse,
    /// Rebuild scholen.sqlite from the JSON artifacts
    Load,
    /// Apply the yearly matching/placement files to the lottery database
    Update {
        /// Year to update (default from configuration)
        #[arg(short, long)]
        year: Option<i64>,
    },
    /// parse + load + update
    Build {
        #[arg(short, long)]
        year: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let year = match &cli.command {
        Commands::Update { year } | Commands::Build { year } => *year,
        _ => None,
    };
    let settings = Settings::load(cli.base_dir.as_deref(), year)?;
    info!(?settings, "configuration loaded");

    match cli.command {
        Commands::Parse => parse(&settings)?,
        Commands::Load => load(&settings)?,
        Commands::Update { .. } => update(&settings)?,
        Commands::Build { .. } => {
            parse(&settings)?;
            println!();
            load(&settings)?;
            println!();
            update(&settings)?;
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
    println!();
}

fn parse(settings: &Settings) -> anyhow::Result<()> {
    banner("Parsing school pages");
    let counts = documents::parse_all(&settings.html_dir, &settings.json_dir)?;
    println!(
        "\nSaved {} artifacts to {} ({} failed).",
        counts.saved,
        settings.json_dir.display(),
        counts.failed
    );
    Ok(())
}

fn load(settings: &Settings) -> anyhow::Result<()> {
    banner("Creating scholen database");
    db::load(&settings.json_dir, &settings.scholen_db)
}

fn update(settings: &Settings) -> anyhow::Result<()> {
    let name = settings
        .loting_db
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    banner(&format!("Updating {} from JSON files", name));

    let summary = loting::update_store(
        &settings.loting_db,
        &settings.update_dir,
        settings.update_year,
    )?;
    summary.print(settings.update_year);
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Duration;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn year_flag_on_update() {
        let cli = Cli::try_parse_from(["middelbare", "--base-dir", "/data", "update", "-y", "2024"]).unwrap();
        assert_eq!(cli.base_dir, Some(PathBuf::from("/data")));
        assert!(matches!(cli.command, Commands::Update { year: Some(2024) }));
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
