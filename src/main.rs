//! Visual query stream graph - command line entry point
//!
//! Reads a visual query result document, renders the stream graph to SVG and
//! optionally writes the export document next to it.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vq_streamgraph::pipeline::{self, RenderInputs, RenderRequest};
use vq_streamgraph::stream::properties::{registry, PropertyReader};
use vq_streamgraph::stream::ClassificationThresholds;
use vq_streamgraph::StreamGraphConfig;

#[derive(Parser)]
#[command(name = "vq_streamgraph")]
#[command(about = "Classify visual query streams and render them as a stream graph")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a visual query result document
    Render {
        /// JSON document with `stream_data` and `date_data`
        #[arg(long)]
        input: PathBuf,
        /// SVG output path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the export document (values, categories, colors) here
        #[arg(long)]
        export: Option<PathBuf>,
        /// Property override, `name=value`; repeatable
        #[arg(long = "property", value_name = "NAME=VALUE")]
        properties: Vec<String>,
        /// JSON object of property overrides, applied before `--property`
        #[arg(long = "properties")]
        properties_file: Option<PathBuf>,
        /// Derive thresholds and value domain from the raster value range
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
        raster_range: Option<Vec<f64>>,
        /// Print the SVG as a base64 data URI instead of raw markup
        #[arg(long, default_value_t = false)]
        data_uri: bool,
    },
    /// List the supported properties and their defaults
    Properties,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            input,
            output,
            export,
            properties,
            properties_file,
            raster_range,
            data_uri,
        } => {
            let mut reader = PropertyReader::new();
            if let Some(path) = properties_file {
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading properties {}", path.display()))?;
                reader.merge_json(&json)?;
            }
            for assignment in &properties {
                reader.set_assignment(assignment)?;
            }

            let mut config = StreamGraphConfig::from_properties(&reader);
            if let Some(range) = raster_range {
                let [min, max] = range.as_slice() else {
                    bail!("--raster-range takes exactly two values");
                };
                config.thresholds = ClassificationThresholds::from_raster_range(*min, *max);
            }

            let request = RenderRequest::from_file(&input)
                .with_context(|| format!("reading input {}", input.display()))?;
            let inputs = RenderInputs::from_request(request, &config)?;
            let rendered = pipeline::render(&inputs, &config)?;

            let body = if data_uri {
                rendered.data_uri()
            } else {
                rendered.svg.clone()
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, body)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Wrote stream graph");
                }
                None => println!("{}", body),
            }

            if let Some(path) = export {
                std::fs::write(&path, rendered.export.to_json()?)
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::info!(path = %path.display(), "Wrote export document");
            }
        }
        Command::Properties => {
            for def in registry().definitions() {
                match &def.valid_values {
                    Some(values) => println!(
                        "{:<26} {:<6} {:<10} [{}]  {}",
                        def.name,
                        def.kind,
                        def.default_value,
                        values.join("|"),
                        def.description
                    ),
                    None => println!(
                        "{:<26} {:<6} {:<10} {}",
                        def.name, def.kind, def.default_value, def.description
                    ),
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
