//! Season stats CLI
//!
//! Batch pipeline turning cached game feeds into site-ready JSON.

use boxscore::{Config, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "boxscore")]
#[command(about = "Turn raw basketball game feeds into site-ready season stats", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild all site artifacts from cached raw feeds
    Build,
    /// Fetch missing feeds from the sources file, then rebuild
    Sync {
        /// Skip the network and rebuild from cached feeds only
        #[arg(long)]
        offline: bool,
    },
    /// Create a default config and the data directory layout
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Build => commands::build(&config),
        Commands::Sync { offline } => commands::sync(&config, offline),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use boxscore::feed::{self, fetch::FeedFetcher};
    use boxscore::stats::{self, SeasonTotals};
    use boxscore::{links, publish, schedule};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.paths.raw_dir)?;
        std::fs::create_dir_all(&config.paths.processed_dir)?;
        std::fs::create_dir_all(&config.paths.site_data_dir)?;
        println!("Created data and site directories");

        println!("\nNext steps:");
        println!("  1. Set team.tracked_team_id in {}", config_path);
        println!("  2. List feed URLs in {}", config.paths.sources_file);
        println!("  3. Run 'boxscore sync' to fetch feeds and build the site data");

        Ok(())
    }

    pub fn build(config: &Config) -> Result<()> {
        let games = feed::load_raw_games(&config.paths.raw_dir)?;
        println!("Loaded {} raw feeds from {}", games.len(), config.paths.raw_dir);

        let mut schedule_entries =
            schedule::load_schedule(&config.paths.schedule_file, &config.season)?;
        let site_links = links::load_links(&config.paths.links_file)?;

        let tracked = config.tracked_team();
        let mut season = SeasonTotals::new(tracked);
        let mut processed = Vec::new();
        let mut all_metrics = Vec::new();

        for game in &games {
            let teams = stats::build_box_scores(&game.feed);
            publish::write_game_summary(config, game, &teams)?;
            season.absorb_game(&teams);
            processed.push(game.id);

            match stats::compute_game_metrics(game.id, &teams, tracked) {
                Some(metrics) => {
                    schedule::apply_metrics(&mut schedule_entries, &metrics);
                    all_metrics.push(metrics);
                }
                None => log::warn!(
                    "Game {}: tracked team or opponent not found; published without metrics",
                    game.id
                ),
            }
        }

        publish::publish_players(config, &season)?;
        publish::publish_metadata(config, &processed, &season, &all_metrics)?;
        publish::publish_schedule(config, &schedule_entries)?;
        publish::publish_links(config, &site_links)?;

        println!(
            "Published {} games, {} players -> {}",
            processed.len(),
            season.players_tracked(),
            config.paths.site_data_dir
        );
        Ok(())
    }

    pub fn sync(config: &Config, offline: bool) -> Result<()> {
        if offline {
            println!("Offline mode: using cached feeds only");
        } else {
            let fetcher = FeedFetcher::new();
            let fetched = fetcher.sync(config)?;
            if fetched > 0 {
                println!("Fetched {} new feeds", fetched);
            } else {
                println!("No new feeds fetched; using cached data");
            }
        }

        build(config)
    }
}
