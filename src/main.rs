use clap::Parser;
use product_harvest::config::{HarvestConfig, PageErrorPolicy};
use product_harvest::export::{self, ExportFormat};
use product_harvest::filter::{FileFilter, FileFilterConfig};
use product_harvest::{Collector, Extraction, Extractor, Harvest};
use std::error::Error;
use std::io;
use std::path::PathBuf;

mod args;
use args::{Args, CollectArgs, Command, ExtractOptions};

/// File name stem for spreadsheets when no keyword is known
const DEFAULT_STEM: &str = "products";

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    };
    config.apply_env();

    match args.command {
        Command::Collect(collect) => {
            apply_collect_overrides(&mut config, &collect);
            print_webdriver_note();

            let start_time = std::time::Instant::now();
            let summary = Collector::webdriver(config.collector)
                .run(&collect.keyword, collect.pages, &collect.data_dir)
                .await?;
            ::log::info!(
                "Collected {} product files in {:.2} seconds",
                summary.saved,
                start_time.elapsed().as_secs_f64()
            );
        }
        Command::Extract(extract) => {
            let mut filter_config = FileFilterConfig::from(&config.extractor);
            filter_config.keyword = extract.keyword.clone();
            let extractor =
                Extractor::new(&config.extractor)?.with_filter(FileFilter::new(filter_config)?);

            let extraction = extractor.extract(&extract.data_dir, extract.options.fields())?;
            let stem = extract.keyword.as_deref().unwrap_or(DEFAULT_STEM);
            write_outputs(&extraction, &extract.options, stem)?;
        }
        Command::Run { collect, extract } => {
            apply_collect_overrides(&mut config, &collect);
            print_webdriver_note();

            let report = Harvest::new(&collect.keyword)
                .with_pages(collect.pages)
                .with_data_dir(&collect.data_dir)
                .with_fields(extract.fields())
                .with_config(config)
                .run()
                .await?;
            ::log::info!("Collected {} product files", report.collected.saved);
            write_outputs(&report.extraction, &extract, &collect.keyword)?;
        }
    }

    Ok(())
}

fn apply_collect_overrides(config: &mut HarvestConfig, collect: &CollectArgs) {
    if let Some(url) = &collect.webdriver_url {
        config.collector.webdriver_url = url.clone();
    }
    if collect.skip_failed_pages {
        config.collector.on_page_error = PageErrorPolicy::Skip;
    }
}

fn print_webdriver_note() {
    println!("Note: Collecting requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );
}

fn write_outputs(
    extraction: &Extraction,
    options: &ExtractOptions,
    stem: &str,
) -> Result<(), Box<dyn Error>> {
    let format = ExportFormat::from(options.format);

    // Binary output never goes to the terminal
    let output = match &options.output {
        Some(path) => Some(path.clone()),
        None if !format.is_text() => Some(PathBuf::from(export::default_file_name(stem, format))),
        None => None,
    };

    match output {
        Some(path) => {
            export::export_extraction(&path, extraction, format)?;
            eprintln!("Wrote {}", path.display());
        }
        None => export::write_records(io::stdout().lock(), &extraction.records, format)?,
    }

    if let Some(path) = &options.stats {
        export::export_stats(path, &extraction.stats)?;
    }

    let stats = &extraction.stats;
    eprintln!(
        "Extracted {} products from {} files ({} errors)",
        extraction.records.len(),
        stats.total_files,
        stats.errors
    );
    Ok(())
}
