use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;

use model_zoo::{ModelConfig, models, specs::Shape, summarize, validation};

/// Builds and inspects declarative model recipes.
#[derive(Parser, Debug)]
#[command(name = "model_zoo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the registered models
    List,

    /// Print a model's config as JSON
    Show {
        /// Registered model name
        name: String,

        #[command(flatten)]
        shapes: ShapeArgs,

        /// Write the config to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print a model's output shapes and parameter counts
    Summary {
        /// Registered model name
        name: String,

        #[command(flatten)]
        shapes: ShapeArgs,
    },

    /// Validate a JSON config file and print its summary
    Check {
        /// Path to the config
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ShapeArgs {
    /// Sequence length
    #[arg(long, default_value_t = 1000)]
    length: usize,

    /// Channels per position
    #[arg(long, default_value_t = 4)]
    channels: usize,

    /// Number of output labels
    #[arg(long)]
    labels: usize,
}

impl ShapeArgs {
    fn build(&self, name: &str) -> Result<ModelConfig> {
        let input = Shape::sequence(self.length, self.channels);
        let output = Shape::labels(self.labels);

        let config = models::build(name, &input, &output)?;
        config.validate()?;
        validation::validate_output(&config.layers, &output)?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::List => {
            for name in models::names() {
                println!("{name}");
            }
        }
        Commands::Show { name, shapes, out } => {
            let config = shapes.build(&name)?;
            match out {
                Some(path) => config
                    .save_json(&path)
                    .with_context(|| format!("cannot write '{}'", path.display()))?,
                None => println!("{}", config.to_json_string()?),
            }
        }
        Commands::Summary { name, shapes } => {
            let config = shapes.build(&name)?;
            println!("{}", summarize(&config.layers)?);
        }
        Commands::Check { path } => {
            let config = ModelConfig::load_json(&path)
                .with_context(|| format!("invalid config '{}'", path.display()))?;
            println!("{}", summarize(&config.layers)?);
        }
    }

    Ok(())
}
