//! tsimg CLI for converting time series files into images.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tsimg_core::{io, MethodKind, SequenceBatch};
use tsimg_transforms::{plot_image, render_ascii, Colormap, Origin, PlotConfig, TransformRegistry};

#[derive(Parser)]
#[command(name = "tsimg")]
#[command(author, version)]
#[command(about = "Convert time series into images (GASF, GADF, MTF, RP)")]
#[command(long_about = "tsimg: encode time series as square images.

Input files hold one sample per row: a 2D .npy array, or a headerless .csv
with comma-separated values.

EXAMPLES:
  # List available methods
  tsimg methods

  # Gramian Angular Summation Field, reduced to 32x32
  tsimg apply --method gasf --input series.npy --options '{\"image_size\": 32}' --output gasf.npy

  # Markov Transition Field with options from a file, written as JSON
  tsimg apply --method mtf --input series.csv --options-file mtf.json --output mtf.json

  # Preview a recurrence plot and save it as PNG
  tsimg plot --method rp --input series.csv --options '{\"threshold\": \"point\"}' --save rp.png

AVAILABLE METHODS:
  gasf - Gramian Angular Summation Field
  gadf - Gramian Angular Difference Field
  mtf  - Markov Transition Field
  rp   - Recurrence Plot")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Method options, inline or from a file.
#[derive(clap::Args)]
struct OptionsArgs {
    /// Method options as a JSON object
    #[arg(long, value_name = "JSON", conflicts_with = "options_file")]
    options: Option<String>,

    /// Path to a JSON file holding method options
    #[arg(long, value_name = "PATH")]
    options_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available imaging methods
    Methods,
    /// Apply a method to every sample of a file
    Apply {
        /// Imaging method: gasf, gadf, mtf, rp
        #[arg(long, value_name = "METHOD")]
        method: String,

        /// Input batch (.npy or .csv)
        #[arg(long, value_name = "PATH")]
        input: PathBuf,

        #[command(flatten)]
        options: OptionsArgs,

        /// Output file (.npy or .json)
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
    },
    /// Apply a method and preview one resulting image
    Plot {
        /// Imaging method: gasf, gadf, mtf, rp
        #[arg(long, value_name = "METHOD")]
        method: String,

        /// Input batch (.npy or .csv)
        #[arg(long, value_name = "PATH")]
        input: PathBuf,

        #[command(flatten)]
        options: OptionsArgs,

        /// Index of the sample to plot
        #[arg(long, default_value = "0", value_name = "N")]
        index: usize,

        /// Colormap
        #[arg(long, value_enum, default_value_t = CmapArg::Greys)]
        cmap: CmapArg,

        /// Where row 0 of the image is drawn
        #[arg(long, value_enum, default_value_t = OriginArg::Lower)]
        origin: OriginArg,

        /// Save the image to this path (format from extension, e.g. .png)
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,

        /// Width of the ASCII preview
        #[arg(long, default_value = "60", value_name = "COLS")]
        width: usize,

        /// Height of the ASCII preview
        #[arg(long, default_value = "30", value_name = "ROWS")]
        height: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CmapArg {
    Greys,
    Gray,
}

#[derive(Clone, Copy, ValueEnum)]
enum OriginArg {
    Lower,
    Upper,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    match cli.command {
        Commands::Methods => handle_methods(),
        Commands::Apply {
            method,
            input,
            options,
            output,
        } => handle_apply(&method, &input, &options, &output),
        Commands::Plot {
            method,
            input,
            options,
            index,
            cmap,
            origin,
            save,
            width,
            height,
        } => {
            let config = PlotConfig::default()
                .with_cmap(match cmap {
                    CmapArg::Greys => Colormap::Greys,
                    CmapArg::Gray => Colormap::Gray,
                })
                .with_origin(match origin {
                    OriginArg::Lower => Origin::Lower,
                    OriginArg::Upper => Origin::Upper,
                });
            handle_plot(
                &method,
                &input,
                &options,
                index,
                &config,
                save.as_deref(),
                (width, height),
            )
        }
    }
}

fn handle_methods() -> Result<()> {
    println!("Available imaging methods:\n");
    for kind in TransformRegistry::new().methods() {
        println!("  {:<6} {}", kind.as_str(), kind.description());
    }
    Ok(())
}

fn handle_apply(method: &str, input: &Path, options: &OptionsArgs, output: &Path) -> Result<()> {
    let registry = TransformRegistry::new();
    let data = load_batch(input)?;
    let options = load_options(options)?;

    let images = registry
        .apply(method, &data, &options)
        .with_context(|| format!("Failed to apply '{}' to {}", method, input.display()))?;

    io::write_images(output, &images)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let (n, h, w) = images.shape();
    tracing::info!(method, n, h, w, "wrote {}", output.display());
    println!("Wrote {} image(s) of {}x{} to {}", n, h, w, output.display());
    Ok(())
}

fn handle_plot(
    method: &str,
    input: &Path,
    options: &OptionsArgs,
    index: usize,
    config: &PlotConfig,
    save: Option<&Path>,
    (width, height): (usize, usize),
) -> Result<()> {
    let kind: MethodKind = method.parse()?;
    let registry = TransformRegistry::new();
    let data = load_batch(input)?;
    let options = load_options(options)?;

    let images = registry
        .apply_kind(kind, &data, &options)
        .with_context(|| format!("Failed to apply '{}' to {}", kind, input.display()))?;

    let Some(image) = images.image(index) else {
        bail!(
            "Sample index {} out of range: {} holds {} sample(s)",
            index,
            input.display(),
            images.len()
        );
    };

    println!("{} of sample {} ({}x{}):\n", kind.description(), index, image.nrows(), image.ncols());
    let preview = render_ascii(image, config, width, height).context("Failed to render preview")?;
    print!("{}", preview);

    if let Some(path) = save {
        plot_image(image, config, Some(path))
            .with_context(|| format!("Failed to save {}", path.display()))?;
        println!("\nSaved to {}", path.display());
    }

    Ok(())
}

fn load_batch(path: &Path) -> Result<SequenceBatch> {
    let data = io::read_batch(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let (n_samples, n_timestamps) = data.shape();
    tracing::info!(n_samples, n_timestamps, "loaded {}", path.display());
    Ok(data)
}

fn load_options(args: &OptionsArgs) -> Result<Value> {
    let text = match (&args.options, &args.options_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?,
        (None, None) => return Ok(Value::Null),
    };

    serde_json::from_str(&text).context("Options are not valid JSON")
}
