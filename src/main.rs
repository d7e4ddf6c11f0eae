use anyhow::Result;
use clap::{Parser, ValueEnum};
use serpent::game::{Difficulty, GameConfig};
use serpent::modes::HumanMode;

#[derive(Parser)]
#[command(name = "serpent")]
#[command(version, about = "Classic grid snake for the terminal")]
struct Cli {
    /// Number of grid columns
    #[arg(long, default_value = "60")]
    columns: usize,

    /// Number of grid rows
    #[arg(long, default_value = "35")]
    rows: usize,

    /// Difficulty preset
    #[arg(long, default_value = "hard")]
    difficulty: DifficultyArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GameConfig::new(cli.columns, cli.rows, cli.difficulty.into());

    let mut session = HumanMode::new(config)?;
    session.run().await
}
