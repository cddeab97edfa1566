use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use specimen_roi::{
    save_png, BatchJob, FileImageSource, PipelineConfig, RoiPipeline, YamlMetadataStore,
};

/// Extract the specimen region of grayscale photographs and suppress the background
#[derive(Parser, Debug)]
#[command(name = "roi-extract")]
#[command(about = "Extract specimen ROIs using per-image metadata", long_about = None)]
struct Args {
    /// Image identifiers; each resolves to `<data-dir>/<name>.<extension>`
    #[arg(required = true)]
    names: Vec<String>,

    /// Metadata file keyed by image identifier
    #[arg(short, long, default_value = "data.yaml")]
    metadata: PathBuf,

    /// Directory holding the input images
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Input image extension
    #[arg(long, default_value = "jpg")]
    extension: String,

    /// Directory the results are written to as `<name>.png`
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Optional YAML pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Background-estimate kernel radius (overrides the config file)
    #[arg(short, long)]
    kernel_radius: Option<usize>,

    /// Consider every contour, including the first, when picking the region
    #[arg(long)]
    no_skip_first: bool,

    /// Save intermediate rasters (cropped, binary, composite) next to the result
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(radius) = args.kernel_radius {
        config.kernel_radius = radius;
    }
    if args.no_skip_first {
        config.skip_first_contour = false;
    }
    info!("pipeline config: {config:?}");

    let store = YamlMetadataStore::from_path(&args.metadata)
        .with_context(|| format!("loading metadata {}", args.metadata.display()))?;
    let pipeline = RoiPipeline::new(config).context("invalid pipeline config")?;

    let jobs: Vec<BatchJob> = args
        .names
        .iter()
        .map(|name| {
            let path = args.data_dir.join(format!("{name}.{}", args.extension));
            BatchJob::new(name.as_str(), path)
        })
        .collect();

    if args.debug {
        for job in &jobs {
            run_debug(&pipeline, &store, job, &args.output)?;
        }
        return Ok(());
    }

    let results = pipeline.run_batch(&store, &FileImageSource, &jobs);
    let mut failed = 0;
    for (job, result) in jobs.iter().zip(results) {
        let written = result
            .map_err(anyhow::Error::from)
            .and_then(|raster| {
                let path = args.output.join(format!("{}.png", job.id));
                save_png(&raster, &path)?;
                Ok(path)
            })
            .with_context(|| format!("processing `{}`", job.id));
        match written {
            Ok(path) => info!("wrote {}", path.display()),
            Err(err) => {
                error!("{err:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} image(s) failed", jobs.len());
    }
    Ok(())
}

fn run_debug(
    pipeline: &RoiPipeline,
    store: &YamlMetadataStore,
    job: &BatchJob,
    output: &std::path::Path,
) -> Result<()> {
    use specimen_roi::{ImageSource, MetadataSource};

    let metadata = store.lookup(&job.id)?;
    let image = FileImageSource.load(&job.path)?;
    let result = pipeline
        .run_detailed(&image, &metadata)
        .with_context(|| format!("processing `{}`", job.id))?;
    info!(
        "`{}`: {} contour(s), picked #{} with a {}-vertex hull",
        job.id,
        result.contours.len(),
        result.selected,
        result.hull.len()
    );

    for (suffix, raster) in [
        ("cropped", &result.cropped),
        ("binary", &result.binary),
        ("composite", &result.composite),
    ] {
        save_png(raster, &output.join(format!("{}_{suffix}.png", job.id)))?;
    }
    let path = output.join(format!("{}.png", job.id));
    save_png(&result.output, &path)?;
    info!("wrote {}", path.display());
    Ok(())
}
