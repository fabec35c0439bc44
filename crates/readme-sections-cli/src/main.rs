//! Command-line interface for readme-sections
//!
//! Usage:
//!   readme-sections [--file `<path>` | --url `<url>`]   - Print the heading outline
//!   readme-sections [...] --section `<n>`               - Print one section's markdown
//!   readme-sections [...] --all                         - Print every section
//!
//! Without `--file` or `--url` the source comes from the config file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use readme_sections::{
    DocumentCache, DocumentSource, FileSource, HttpSource, Section, SourceConfig,
};

#[derive(Debug, Parser)]
#[command(name = "readme-sections", version, about = "Split a README into heading-anchored sections")]
struct Args {
    /// Read the document from a local file
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Fetch the document from a URL
    #[arg(long)]
    url: Option<String>,

    /// Config file (defaults to ~/.config/readme-sections/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the markdown of the section at this index
    #[arg(long, conflicts_with = "all")]
    section: Option<usize>,

    /// Print the markdown of every section
    #[arg(long)]
    all: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();

    if let Some(path) = &args.file {
        return run(DocumentCache::new(FileSource::new(path)), &args);
    }

    let config = load_config(&args)?;
    let url = match &args.url {
        Some(url) => url.clone(),
        None => config
            .document_url()
            .context("pass --file or --url, or configure a source")?,
    };
    log::info!("document url: {url}");

    let source = HttpSource::new(url, config.timeout());
    let cache = match config.revalidate_after() {
        Some(max_age) => DocumentCache::with_max_age(source, max_age),
        None => DocumentCache::new(source),
    };
    run(cache, &args)
}

fn load_config(args: &Args) -> Result<SourceConfig> {
    let loaded = match &args.config {
        Some(path) => SourceConfig::load_from_path(path)?
            .with_context(|| format!("config file {} not found", path.display()))?,
        None => SourceConfig::load()?.unwrap_or_default(),
    };
    Ok(loaded)
}

fn run<S: DocumentSource>(cache: DocumentCache<S>, args: &Args) -> Result<()> {
    let sections = cache
        .sections()
        .with_context(|| format!("{} is unavailable", cache.source().name()))?;

    if let Some(index) = args.section {
        let Some(section) = sections.get(index) else {
            bail!(
                "no section {index}: the document has {} sections",
                sections.len()
            );
        };
        print_section(section);
    } else if args.all {
        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_section(section);
        }
    } else {
        for (i, section) in sections.iter().enumerate() {
            println!(
                "{:<12} h{}  {}",
                Section::anchor(i),
                section.level,
                section.heading_text()
            );
        }
    }
    Ok(())
}

fn print_section(section: &Section) {
    if !section.is_synthetic() {
        println!(
            "{} {}",
            "#".repeat(usize::from(section.level)),
            section.heading_text()
        );
        println!();
    }
    println!("{}", section.markdown());
}
