use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use facemark_core::detection::infrastructure::replay_face_detector::ReplayFaceDetector;
use facemark_core::detection::infrastructure::replay_landmark_detector::replay_catalog;
use facemark_core::detection::infrastructure::replay_pupil_locator::ReplayPupilLocator;
use facemark_core::io::image_file::{load_image, save_image};
use facemark_core::io::json_store::{read_recording, read_results, write_results};
use facemark_core::pipeline::detect_landmarks_use_case::{DetectLandmarksUseCase, FailurePolicy};
use facemark_core::pipeline::infrastructure::threaded_face_executor::ThreadedFaceExecutor;
use facemark_core::pipeline::pipeline_config::PipelineConfig;
use facemark_core::pipeline::pipeline_context::PipelineContext;
use facemark_core::pipeline::pipeline_logger::LogPipelineLogger;
use facemark_core::render::domain::render_sink::RenderSink;
use facemark_core::render::infrastructure::marker_renderer::{FaceShape, MarkerRenderer};

/// Face, pupil and facial landmark detection.
#[derive(Parser)]
#[command(name = "facemark", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the landmark pipeline on an image using recorded classifier answers.
    Detect(DetectArgs),

    /// Draw stored detection results onto an image.
    Render {
        /// Source image.
        image: PathBuf,
        /// Results JSON written by `detect`.
        results: PathBuf,
        /// Output image (format from extension).
        output: PathBuf,
        /// Outline drawn around each face.
        #[arg(long, value_enum, default_value_t = FaceShapeArg::Circle)]
        face_shape: FaceShapeArg,
    },

    /// Print the effective pipeline configuration as JSON.
    Config {
        /// Config file (defaults to the per-user config file).
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DetectArgs {
    /// Input image file.
    image: PathBuf,

    /// Classifier recording (JSON) to replay.
    #[arg(long)]
    recording: PathBuf,

    /// Pipeline config file (defaults to the per-user config file).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write an overlay image with the detected markers.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write detection results as JSON (printed to stdout when neither
    /// --output nor --results is given).
    #[arg(long)]
    results: Option<PathBuf>,

    /// Worker threads for per-face refinement (1 = sequential, 0 = one per CPU).
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Outline drawn around each face in the overlay.
    #[arg(long, value_enum, default_value_t = FaceShapeArg::Circle)]
    face_shape: FaceShapeArg,

    /// Skip faces whose refinement fails instead of aborting the image.
    #[arg(long)]
    isolate_faces: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FaceShapeArg {
    Circle,
    Square,
}

impl From<FaceShapeArg> for FaceShape {
    fn from(arg: FaceShapeArg) -> Self {
        match arg {
            FaceShapeArg::Circle => FaceShape::Circle,
            FaceShapeArg::Square => FaceShape::Square,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    match cli.command {
        Command::Detect(args) => run_detect(&args),
        Command::Render {
            image,
            results,
            output,
            face_shape,
        } => run_render(&image, &results, &output, face_shape),
        Command::Config { path } => run_config(path.as_deref()),
    }
}

fn run_detect(args: &DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(args.config.as_deref())?;
    let recording = Arc::new(read_recording(&args.recording)?);
    let context = PipelineContext::new(
        Box::new(ReplayFaceDetector::new(recording.clone())),
        Box::new(ReplayPupilLocator::new(recording.clone())),
        replay_catalog(&recording)?,
        config,
    )?;

    let policy = if args.isolate_faces {
        FailurePolicy::IsolateFace
    } else {
        FailurePolicy::AbortRun
    };
    let mut use_case = DetectLandmarksUseCase::new(context)
        .with_logger(Box::new(LogPipelineLogger::new()))
        .with_failure_policy(policy);
    if let Some(executor) = threaded_executor(args.threads)? {
        log::debug!("Refining faces on {} threads", executor.workers());
        use_case = use_case.with_executor(Box::new(executor));
    }

    let mut loaded = load_image(&args.image)?;
    let results = use_case.execute(&loaded.gray)?;
    use_case.summary();
    log::info!(
        "{} faces, {} accepted",
        results.len(),
        results.iter().filter(|r| r.accepted).count()
    );

    if let Some(path) = &args.results {
        write_results(path, &results)?;
        log::info!("Results written to {}", path.display());
    }
    if let Some(path) = &args.output {
        renderer(args.face_shape).render(&mut loaded.canvas, &results)?;
        save_image(path, &loaded.canvas)?;
        log::info!("Overlay written to {}", path.display());
    }
    if args.results.is_none() && args.output.is_none() {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    Ok(())
}

fn run_render(
    image: &Path,
    results: &Path,
    output: &Path,
    face_shape: FaceShapeArg,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut loaded = load_image(image)?;
    let results = read_results(results)?;
    renderer(face_shape).render(&mut loaded.canvas, &results)?;
    save_image(output, &loaded.canvas)?;
    log::info!("Overlay written to {}", output.display());
    Ok(())
}

fn run_config(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// `None` keeps the sequential executor; 0 means one worker per CPU.
fn threaded_executor(
    threads: usize,
) -> Result<Option<ThreadedFaceExecutor>, Box<dyn std::error::Error>> {
    match threads {
        0 => Ok(Some(ThreadedFaceExecutor::with_available_parallelism())),
        1 => Ok(None),
        n => Ok(Some(ThreadedFaceExecutor::new(n)?)),
    }
}

fn renderer(face_shape: FaceShapeArg) -> MarkerRenderer {
    MarkerRenderer::default().with_face_shape(face_shape.into())
}

/// An explicit path must exist; the per-user file is optional.
fn resolve_config(path: Option<&Path>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => PipelineConfig::load(p)?,
        None => PipelineConfig::load_or_default(PipelineConfig::default_path().as_deref())?,
    };
    Ok(config)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Detect(args) => {
            require_file(&args.image, "Input image")?;
            require_file(&args.recording, "Recording")?;
        }
        Command::Render { image, results, .. } => {
            require_file(image, "Input image")?;
            require_file(results, "Results file")?;
        }
        Command::Config { .. } => {}
    }
    Ok(())
}

fn require_file(path: &Path, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("{what} not found: {}", path.display()).into());
    }
    Ok(())
}
