use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use log::{LevelFilter, info, warn};
use raspisanie::{
    ClassIdValidator, ExtractedImage, Extractor, LinkDiscovery, PdfiumRasterizer, RegionCatalog,
    RequestClient, ScheduleStore, config::ScrapingConfig, save_all,
};

#[derive(Parser)]
#[command(about = "Crops per-class timetables out of published school schedules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the schedule documents currently published.
    Links,
    /// Show every class the catalog knows about.
    Classes,
    /// Crop one class's timetable out of every published document.
    Extract {
        class_id: String,
        #[arg(short, long, default_value = "schedules")]
        out: PathBuf,
        /// Record extracted dates in the schedule store.
        #[arg(long)]
        record: bool,
    },
    /// Crop every class that has a rectangle configured.
    ExtractAll {
        #[arg(short, long, default_value = "schedules")]
        out: PathBuf,
        #[arg(long)]
        record: bool,
    },
}

async fn list_links(config: &ScrapingConfig, client: &RequestClient) -> anyhow::Result<()> {
    let links = LinkDiscovery::new(client, config.page_url())?
        .discover_links()
        .await?;
    for link in links {
        println!("{}\t{}", link.date_token, link.url);
    }
    Ok(())
}

fn list_classes(catalog: &RegionCatalog) {
    for spec in catalog.specs() {
        match spec.rect.map(|r| r.corners()) {
            Some((x0, y0, x1, y1)) => {
                println!("{}\tpage {}\t({x0}, {y0}, {x1}, {y1})", spec.class_id, spec.page_index)
            }
            None => println!("{}\tpage {}\t-", spec.class_id, spec.page_index),
        }
    }
}

fn finish(
    config: &ScrapingConfig,
    images: &[ExtractedImage],
    out: &Path,
    record: bool,
) -> anyhow::Result<()> {
    let saved = save_all(images, out).context("failed to save extracted images")?;
    for image in &saved {
        println!("{}", image.path.display());
    }

    if record {
        let mut store = ScheduleStore::load(&config.store_path)?;
        let year = Local::now().year();
        let mut added = 0;
        for image in images {
            if store.record(year, image.date_token.as_str(), &image.class_id)? {
                added += 1;
            }
        }
        store.save()?;
        info!("Recorded {added} new row(s) in {}", store.path().display());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = ScrapingConfig::new()?;
    let catalog = RegionCatalog::builtin();

    if let Command::Classes = cli.command {
        list_classes(&catalog);
        return Ok(());
    }

    let client = RequestClient::new(config.http_timeout)?;
    if let Command::Links = cli.command {
        return list_links(&config, &client).await;
    }

    let rasterizer = PdfiumRasterizer::new(config.pdfium_library_dir.as_deref())
        .context("couldn't load pdfium, set PDFIUM_LIBRARY_DIR")?;
    let extractor = Extractor::new(
        &client,
        &rasterizer,
        &catalog,
        config.page_url(),
    );

    match cli.command {
        Command::Extract {
            class_id,
            out,
            record,
        } => {
            if !ClassIdValidator::new()?.is_well_formed(&class_id) {
                bail!("`{class_id}` is not a class id, expected e.g. 11.1 or 9.5.2");
            }
            let images = extractor
                .extract(&class_id)
                .await
                .with_context(|| format!("failed to extract schedules for {class_id}"))?;
            if images.is_empty() {
                warn!("No schedules are published right now");
            }
            finish(&config, &images, &out, record)
        }
        Command::ExtractAll { out, record } => {
            let images = extractor
                .extract_all()
                .await
                .context("failed to extract schedules")?;
            finish(&config, &images, &out, record)
        }
        Command::Links | Command::Classes => Ok(()),
    }
}
