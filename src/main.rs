use anyhow::Context;
use clap::{Parser, Subcommand};
use labelpress::{LabelPipeline, OutputFormat, Settings, TemplateRegistry, render_batch};
use labelpress_template::TemplateSource;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Render asset labels from the inventory", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the label for one asset.
    Render {
        id: u64,
        /// Label type: default, medium, datamatrix or cable_flag.
        #[arg(long = "type", default_value = "default")]
        label_type: String,
        /// pdf or png.
        #[arg(long, default_value = "pdf")]
        format: String,
        /// Output path; the suggested filename when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render several assets into one merged PDF.
    Batch {
        #[arg(required = true)]
        ids: Vec<u64>,
        #[arg(long = "type", default_value = "default")]
        label_type: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the label layouts and their placeholders.
    Templates {
        /// Directory of `<label_type>.xml` overrides.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "labelpress=info");
        }
    }
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Command::Render { id, label_type, format, output } => {
            let format = OutputFormat::parse(&format)
                .with_context(|| format!("unknown output format '{}'", format))?;
            let pipeline = LabelPipeline::from_settings(Settings::load()?)?;
            let label = pipeline.render_one(id, &label_type, format).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&label.filename));
            fs::write(&path, &label.artifact.bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} ({} bytes)", path.display(), label.artifact.len());
        }
        Command::Batch { ids, label_type, output } => {
            let pipeline = LabelPipeline::from_settings(Settings::load()?)?;
            let batch = render_batch(&pipeline, ids, &label_type).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&batch.filename));
            fs::write(&path, &batch.artifact.bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} ({})", path.display(), batch.report());
            for failure in &batch.failures {
                println!("  skipped {}", failure);
            }
        }
        Command::Templates { dir } => {
            let source = dir.map(TemplateSource::Directory).unwrap_or_default();
            let registry = TemplateRegistry::load(&source)?;
            for spec in registry.iter() {
                let size = spec.size();
                let names: Vec<&str> = spec.placeholders().iter().map(|p| p.name()).collect();
                println!(
                    "{:<12} {:>4} x {:<4} mm  {}",
                    spec.label_type().as_str(),
                    size.width_mm,
                    size.height_mm,
                    names.join(", ")
                );
            }
        }
    }
    Ok(())
}
