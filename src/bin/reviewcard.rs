use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reviewcard", version)]
struct Cli {
    /// Log crop and render diagnostics (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crop an image, fill in the review and export the card as a PNG.
    Export(ExportArgs),
    /// Crop an image and write the finalized JPEG.
    Crop(CropArgs),
    /// Validate a review form without rendering.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct CropSelection {
    /// Input image (any format the image crate decodes).
    #[arg(long)]
    image: PathBuf,

    /// Crop region over the displayed image as `x,y,width,height`. Defaults to the largest
    /// centered region of the configured aspect ratio.
    #[arg(long)]
    crop: Option<String>,

    /// Unit of `--crop`.
    #[arg(long, value_enum, default_value_t = UnitChoice::Px)]
    unit: UnitChoice,

    /// Composer config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Review form JSON (title, releaseInfo, tags, score, reviewText).
    #[arg(long)]
    form: PathBuf,

    #[command(flatten)]
    selection: CropSelection,

    /// Output directory; the file name comes from the config.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CropArgs {
    #[command(flatten)]
    selection: CropSelection,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Review form JSON.
    #[arg(long)]
    form: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UnitChoice {
    Px,
    Percent,
}

impl From<UnitChoice> for reviewcard::CropUnit {
    fn from(u: UnitChoice) -> Self {
        match u {
            UnitChoice::Px => reviewcard::CropUnit::Px,
            UnitChoice::Percent => reviewcard::CropUnit::Percent,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Crop(args) => cmd_crop(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "reviewcard=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<reviewcard::ComposerConfig> {
    match path {
        Some(p) => Ok(reviewcard::ComposerConfig::from_path(p)?),
        None => Ok(reviewcard::ComposerConfig::default()),
    }
}

/// Stage the image, open the cropper, apply the selection and confirm it.
fn run_crop(
    composer: &mut reviewcard::Composer,
    sel: &CropSelection,
) -> anyhow::Result<reviewcard::ImageHandle> {
    let ticket = composer.select_file();
    let read = std::fs::read(&sel.image)
        .with_context(|| format!("read image '{}'", sel.image.display()))
        .map_err(reviewcard::ReviewError::from);
    let default_region = composer.file_loaded(ticket, read)?.with_context(|| {
        format!(
            "could not load image '{}' (see log for details)",
            sel.image.display()
        )
    })?;

    let region = match &sel.crop {
        Some(spec) => {
            let requested = reviewcard::CropRegion::parse_xywh(spec, sel.unit.into())?;
            composer.adjust_crop(requested)?
        }
        None => default_region,
    };
    eprintln!(
        "crop region: x={} y={} width={} height={} (display px)",
        region.x, region.y, region.width, region.height
    );

    Ok(composer.complete_crop()?)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let config = load_config(args.selection.config.as_deref())?;
    let rasterizer = reviewcard::CardRasterizer::new(config.fonts_dir.as_deref());
    let mut composer = reviewcard::Composer::new(config)?;

    let form = reviewcard::ReviewForm::from_path(&args.form)?;
    composer.apply_form(&form);
    run_crop(&mut composer, &args.selection)?;

    let mut sink = reviewcard::DirSink::new(&args.out);
    let result = composer.request_export(&rasterizer, &mut sink);
    print_notifications(&mut composer);

    match result {
        Ok(report) => {
            eprintln!(
                "wrote {} ({}x{})",
                args.out.join(&report.filename).display(),
                report.size.width,
                report.size.height
            );
            Ok(())
        }
        Err(err) => {
            print_field_errors(err.field_errors());
            Err(err.into())
        }
    }
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let config = load_config(args.selection.config.as_deref())?;
    let mut composer = reviewcard::Composer::new(config)?;
    run_crop(&mut composer, &args.selection)?;

    let image = composer
        .draft()
        .image
        .as_ref()
        .context("crop finished without an image (bug)")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, image.bytes())
        .with_context(|| format!("write jpeg '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        image.size().width,
        image.size().height
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let form = reviewcard::ReviewForm::from_path(&args.form)?;
    let draft = form.apply(reviewcard::ReviewDraft::default());

    eprintln!("review text: {}", draft.char_counter());
    eprintln!("tags: {:?}", draft.tag_list());
    eprintln!("stars: {}/{}", draft.filled_stars(), reviewcard::STAR_COUNT);

    let errors = reviewcard::field_errors(&draft);
    if errors.is_empty() {
        eprintln!("form is valid");
        return Ok(());
    }
    print_field_errors(&errors);
    anyhow::bail!("{} invalid field(s)", errors.len())
}

fn print_notifications(composer: &mut reviewcard::Composer) {
    for n in composer.drain_notifications() {
        eprintln!("[{:?}] {}: {}", n.severity, n.title, n.description);
    }
}

fn print_field_errors(errors: &[reviewcard::FieldError]) {
    for e in errors {
        eprintln!("  {}: {}", e.field, e.message);
    }
}
