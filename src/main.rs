use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use grid_snake::persistence::HighScoreStore;
use grid_snake::telemetry;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a grid, faster every level")]
struct Cli {
    /// JSON file with game settings; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where the best score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Append logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Ring the terminal bell on eat, level-up and game over
    #[arg(long)]
    bell: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if self.width.is_some() || self.height.is_some() {
            let width = self.width.unwrap_or(config.grid_width);
            let height = self.height.unwrap_or(config.grid_height);
            config = config.with_size(width, height);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_logging(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    let high_scores = HighScoreStore::open(&cli.high_score_file).with_context(|| {
        format!(
            "Failed to read best score from {:?}",
            cli.high_score_file
        )
    })?;

    let mut human_mode = HumanMode::new(config, high_scores, !cli.bell);
    human_mode.run().await?;

    Ok(())
}
