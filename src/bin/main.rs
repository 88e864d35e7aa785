use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use graphica_curves::path::Path;
use graphica_curves::serialization::DEFAULT_REDUCED_DIGITS;

#[derive(Parser)]
#[command(version, about = "Inspect a cubic bezier path")]
struct Cli {
    /// File with the path, read from stdin if missing
    file: Option<String>,

    /// Input is a flat number list instead of structured JSON
    #[arg(long)]
    reduced: bool,

    /// Close the loop when reading a flat number list
    #[arg(long)]
    circular: bool,

    /// Start fraction of a sub-path to print
    #[arg(long, requires = "to")]
    from: Option<f64>,

    /// End fraction of a sub-path to print
    #[arg(long, requires = "from")]
    to: Option<f64>,

    /// Print this many points spread evenly along the path
    #[arg(long)]
    samples: Option<usize>,

    /// Fractional digits used when printing flat number lists
    #[arg(long, default_value_t = DEFAULT_REDUCED_DIGITS)]
    digits: u32,
}

fn read_input(file: &Option<String>) -> Result<String> {
    match file {
        Some(file) => fs::read_to_string(file).with_context(|| format!("Failed to read {}", file)),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = read_input(&cli.file)?;
    let path = if cli.reduced {
        Path::from_reduced_list_representation(&text, cli.circular).context("Invalid reduced list")?
    } else {
        Path::from_json(&text).context("Invalid path")?
    };
    info!("Loaded path with {} curves", path.curve_count());

    println!("curves: {}", path.curve_count());
    println!("circular: {}", path.adjust_circular());
    println!("length: {}", path.length());
    if let Some(bounds) = path.bounds() {
        println!(
            "bounds: ({}, {}) - ({}, {})",
            bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y
        );
    }

    if let (Some(from), Some(to)) = (cli.from, cli.to) {
        if from.is_nan() || to.is_nan() {
            bail!("Sub-path bounds must be numbers");
        }
        let sub = path.sub_path(from, to)?;
        println!("sub-path: {}", sub.to_reduced_list_representation(cli.digits)?);
    }

    if let Some(samples) = cli.samples {
        for p in path.even_distribution_vertices(samples)? {
            println!("{} {}", p.x, p.y);
        }
    }

    Ok(())
}
