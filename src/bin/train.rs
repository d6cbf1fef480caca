use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gradnet::config::TrainingConfig;
use gradnet::feed_forward::Network;

type Example = (Vec<f64>, Vec<f64>);

#[derive(Parser, Debug)]
#[command(name = "train")]
#[command(about = "Train a sigmoid network to map (a, b) to (|1 - a|, |1 - b|)")]
struct Args {
    /// JSON training configuration; missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a stored network instead of a random one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the trained network to this file as JSON
    #[arg(long)]
    export: Option<PathBuf>,

    /// Seed for parameter initialization and data generation
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Override the batch size
    #[arg(long)]
    batch_size: Option<usize>,
}

/// Generates pairs of inputs rounded to hundredths, each labelled with
/// the distance of every input from one.
fn generate_data<R: Rng>(rng: &mut R, num_samples: usize) -> Vec<Example> {
    (0..num_samples)
        .map(|_| {
            let first = (rng.gen::<f64>() * 100.0).round() / 100.0;
            let second = (rng.gen::<f64>() * 100.0).round() / 100.0;
            (
                vec![first, second],
                vec![(1.0 - first).abs(), (1.0 - second).abs()],
            )
        })
        .collect()
}

fn probe(network: &Network, input: &[f64], expected: &[f64]) -> Result<()> {
    let output = network.run(input)?;
    println!("==== Test ===");
    println!("Input: {:?}", input);
    println!("Output: {:?}", output);
    println!("Expected Output: {:?}", expected);
    println!("=============");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TrainingConfig::default(),
    };
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let network: Network = match &args.load {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("reading network from {}", path.display()))?
        }
        None => config.build_network(&mut rng)?,
    };
    info!(
        inputs = network.input_len(),
        outputs = network.output_len(),
        layers = network.layers().len(),
        "network ready"
    );

    if network.input_len() != 2 || network.output_len() != 2 {
        anyhow::bail!(
            "the synthetic task needs 2 inputs and 2 outputs, but the network has {} and {}",
            network.input_len(),
            network.output_len()
        );
    }

    let examples = generate_data(&mut rng, config.examples);
    let network = config.trainer(network)?.train(&examples)?;

    probe(&network, &[1.0, 0.0], &[0.0, 1.0])?;
    probe(&network, &[0.0, 1.0], &[1.0, 0.0])?;
    probe(&network, &[0.5, 0.75], &[0.5, 0.25])?;

    if let Some(path) = &args.export {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &network)
            .with_context(|| format!("writing network to {}", path.display()))?;
        info!(path = %path.display(), "exported network");
    }
    Ok(())
}
