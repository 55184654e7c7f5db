//! The `import` subcommand: parse, detect, map, confirm, run, summarize.

use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use atelier_core::{AppConfig, CandidateRecords, ImportStats};
use atelier_csv::{
    detect_format, group_by_handle, normalize_shopify_groups, normalize_standard_rows, read_csv,
    DestinationField, FieldMapping, ImportFormat,
};
use atelier_import::{run_import, ProgressEvent, ProgressSink};
use atelier_media::MediaClient;

#[derive(Debug, clap::Args)]
pub struct ImportArgs {
    /// Path to the CSV file.
    pub file: PathBuf,

    /// Override format detection.
    #[arg(long, value_parser = ["standard", "shopify"])]
    pub format: Option<String>,

    /// Mapping overrides as SOURCE=DEST pairs, e.g. --map "Product Name=name".
    /// DEST is one of: name, description, price, category, image_url, featured.
    #[arg(long = "map", value_name = "SRC=DEST")]
    pub map: Vec<String>,

    /// Skip the mapping confirmation prompt.
    #[arg(long)]
    pub yes: bool,

    /// Override the configured batch size.
    #[arg(long)]
    pub batch_size: Option<usize>,
}

pub(crate) fn build_media_client(config: &AppConfig) -> anyhow::Result<MediaClient> {
    MediaClient::new(
        &config.media_upload_url,
        &config.media_host,
        config.request_timeout_secs,
        &config.media_user_agent,
        config.image_max_retries,
        config.image_retry_delay_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build media client: {e}"))
}

pub async fn run(pool: &sqlx::PgPool, config: &AppConfig, args: ImportArgs) -> anyhow::Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("could not open {}", args.file.display()))?;
    let parsed = read_csv(file).context("could not parse CSV file")?;

    let format = match args.format.as_deref() {
        Some("standard") => ImportFormat::Standard,
        Some("shopify") => ImportFormat::Shopify,
        Some(other) => anyhow::bail!("unrecognized format override: {other}"),
        None => detect_format(&parsed.headers),
    };
    println!(
        "detected format: {format} ({} data row(s))",
        parsed.rows.len()
    );

    let mut mapping = FieldMapping::for_format(format);
    for pair in &args.map {
        let (source, dest) = pair
            .split_once('=')
            .with_context(|| format!("--map takes SRC=DEST, got \"{pair}\""))?;
        let dest = DestinationField::parse(dest.trim())
            .with_context(|| format!("unknown destination field \"{dest}\""))?;
        mapping.set(source.trim(), dest);
    }
    if mapping.is_empty() {
        anyhow::bail!(
            "no field mapping: unrecognized file shapes need --map SRC=DEST pairs"
        );
    }

    println!("column mapping:");
    for (source, dest) in mapping.pairs() {
        println!("  {source} -> {dest}");
    }

    // The only decline point: once the batches start, the run goes to
    // completion.
    if !args.yes && !confirm("proceed with this mapping?")? {
        println!("import cancelled");
        return Ok(());
    }

    let records: CandidateRecords = match format {
        ImportFormat::Shopify => {
            let groups = group_by_handle(parsed.rows);
            normalize_shopify_groups(&groups, &mapping)?
        }
        ImportFormat::Standard | ImportFormat::Unknown => {
            normalize_standard_rows(&parsed.rows, &mapping)?
        }
    };

    let mut run_config = config.clone();
    if let Some(batch_size) = args.batch_size {
        run_config.batch_size = batch_size;
    }

    let media = build_media_client(&run_config)?;
    let source_file = args
        .file
        .file_name()
        .map_or_else(|| args.file.display().to_string(), |n| n.to_string_lossy().into_owned());

    let stats = run_import(
        pool,
        &media,
        &run_config,
        &records,
        &source_file,
        format.as_str(),
        &ConsoleSink,
    )
    .await?;

    print_summary(&stats);
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_summary(stats: &ImportStats) {
    println!();
    println!("import finished:");
    println!("  candidates:         {}", stats.total_candidates);
    println!("  products created:   {}", stats.products_created);
    println!("  products updated:   {}", stats.products_updated);
    println!("  records failed:     {}", stats.records_failed);
    println!("  records dropped:    {}", stats.records_dropped);
    println!("  variations created: {}", stats.variations_created);
    println!("  variations updated: {}", stats.variations_updated);
    println!("  variations pruned:  {}", stats.variations_pruned);
    println!(
        "  images:             {} processed, {} uploaded, {} failed",
        stats.images_processed, stats.images_uploaded, stats.images_failed
    );
    println!("  categories created: {}", stats.categories_created);

    if !stats.warnings.is_empty() {
        println!();
        println!("warnings:");
        for warning in &stats.warnings {
            println!("  - {warning}");
        }
    }
    if !stats.errors.is_empty() {
        println!();
        println!("errors:");
        for error in &stats.errors {
            println!("  - {error}");
        }
    }
}

/// Progress sink for the terminal: batch percentages on stdout, image
/// events left to the structured log.
struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::BatchCompleted {
                completed_batches,
                total_batches,
                percent,
            } => {
                println!("  {percent}% ({completed_batches}/{total_batches} batches)");
            }
            ProgressEvent::ImageProcessed {
                source_row,
                succeeded,
            } => {
                tracing::debug!(source_row, succeeded, "image processed");
            }
        }
    }
}
