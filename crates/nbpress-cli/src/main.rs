//! nbpress CLI — publish Jupyter notebooks as markdown posts.
//!
//! Commands: convert (notebook file or folder → markdown + media),
//! index (markdown corpus → JSON search index).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nbpress_export::exporter::resolve_destination;
use nbpress_export::{BatchExporter, Exporter, NbConvert, DEFAULT_CONVERTER};
use nbpress_index::{build_index, write_index, IndexConfig};

mod config;
use config::SiteConfig;

#[derive(Parser)]
#[command(name = "nbpress")]
#[command(version)]
#[command(about = "Jupyter notebook to Markdown publisher for static sites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Convert a notebook file, or recursively a folder of notebooks
    Convert {
        /// Input notebook file or directory root
        #[arg(short = 'i', long)]
        input_file: PathBuf,

        /// Destination markdown file or folder
        #[arg(short = 'o', long, default_value = "exported")]
        output_file: PathBuf,

        /// Folder for generated media, if any
        #[arg(short = 'm', long, default_value = "exported/media")]
        media_folder: PathBuf,

        /// Converter program to invoke
        #[arg(long)]
        converter: Option<String>,

        /// Prefix local image links in exported files with this URL
        #[arg(long)]
        asset_prefix: Option<String>,
    },

    /// Build the JSON search index from converted markdown
    Index {
        /// Root of the converted markdown corpus
        #[arg(long)]
        content_root: Option<PathBuf>,

        /// Public URL prefix for entry links
        #[arg(long)]
        base_url: Option<String>,

        /// Index output path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let site = SiteConfig::load(Path::new("."))?;

    match cli.command {
        Commands::Convert {
            input_file,
            output_file,
            media_folder,
            converter,
            asset_prefix,
        } => {
            let program = converter
                .or(site.converter)
                .unwrap_or_else(|| DEFAULT_CONVERTER.to_string());
            info!(input = %input_file.display(), output = %output_file.display(),
                  media = %media_folder.display(), %program, "converting");

            if input_file.is_dir() {
                convert_folder(
                    &input_file,
                    &output_file,
                    &media_folder,
                    program,
                    asset_prefix,
                )
            } else {
                convert_file(
                    &input_file,
                    &output_file,
                    &media_folder,
                    program,
                    asset_prefix,
                )
            }
        }
        Commands::Index {
            content_root,
            base_url,
            output,
        } => {
            let config = IndexConfig {
                content_root: content_root
                    .or(site.content_root)
                    .context("--content-root is required (or set content_root in nbpress.toml)")?,
                base_url: base_url
                    .or(site.base_url)
                    .context("--base-url is required (or set base_url in nbpress.toml)")?,
                output: output
                    .or(site.index_output)
                    .unwrap_or_else(|| PathBuf::from("index.json")),
            };
            build_site_index(&config)
        }
    }
}

fn convert_file(
    input: &Path,
    output: &Path,
    media: &Path,
    program: String,
    asset_prefix: Option<String>,
) -> anyhow::Result<ExitCode> {
    let exporter = Exporter::new(NbConvert::new(program));

    match exporter.export(input, output, Some(media)) {
        Ok(()) => {
            let destination = resolve_destination(input, output);
            if let Some(prefix) = asset_prefix {
                nbpress_export::rewrite_asset_links(&destination, &prefix)?;
            }
            println!("Exported {}", destination.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_draft() => {
            println!("Skipped draft {}", input.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Err(e).with_context(|| format!("failed to export {}", input.display())),
    }
}

fn convert_folder(
    input: &Path,
    output: &Path,
    media: &Path,
    program: String,
    asset_prefix: Option<String>,
) -> anyhow::Result<ExitCode> {
    let mut batch = BatchExporter::new(NbConvert::new(program), output, media);
    if let Some(prefix) = asset_prefix {
        batch = batch.with_asset_prefix(prefix);
    }

    let report = batch
        .convert_tree(input)
        .with_context(|| format!("failed to walk {}", input.display()))?;

    println!(
        "{} exported, {} drafts skipped, {} failed",
        report.exported.len(),
        report.skipped_drafts,
        report.failures.len()
    );
    for (path, error) in &report.failures {
        eprintln!("  {}: {}", path.display(), error);
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn build_site_index(config: &IndexConfig) -> anyhow::Result<ExitCode> {
    let entries = build_index(config)
        .with_context(|| format!("failed to index {}", config.content_root.display()))?;
    write_index(&entries, &config.output)?;
    println!(
        "Indexed {} posts into {}",
        entries.len(),
        config.output.display()
    );
    Ok(ExitCode::SUCCESS)
}
