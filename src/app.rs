use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use framegrade_core::{EffectsState, Frame, Pipeline};
use framegrade_worker::{EffectWorker, FrameProcessor, WorkerConfig};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "framegrade")]
#[command(version, about = "Apply a color grade and effects stack to an image")]
pub struct Cli {
    /// Image to grade (any format the decoder understands)
    #[arg(short, long, required_unless_present = "print_default_snapshot")]
    pub input: Option<PathBuf>,

    /// Where to write the graded image; format follows the extension
    #[arg(short, long, required_unless_present = "print_default_snapshot")]
    pub output: Option<PathBuf>,

    /// Effects snapshot JSON. Defaults to the bypass snapshot
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Run the pipeline on the calling thread instead of the worker
    #[arg(long)]
    pub inline: bool,

    /// Warn when the worker takes longer than this per frame
    #[arg(long, value_name = "MS")]
    pub frame_budget_ms: Option<u64>,

    /// Print the bypass snapshot as JSON and exit
    #[arg(long, exclusive = true)]
    pub print_default_snapshot: bool,
}

pub async fn run(cli: Cli) -> Result<()> {
    if cli.print_default_snapshot {
        println!("{}", serde_json::to_string_pretty(&EffectsState::default())?);
        return Ok(());
    }

    let (Some(input), Some(output)) = (cli.input.as_deref(), cli.output.as_deref()) else {
        bail!("--input and --output are required");
    };

    let snapshot = load_snapshot(cli.snapshot.as_deref()).await?;
    let frame = load_frame(input).await?;

    let t0 = Instant::now();
    let (w, h) = (frame.width, frame.height);
    let graded = if cli.inline {
        Pipeline::new()
            .process_cpu(frame, &snapshot)
            .context("pipeline failed")?
    } else {
        let mut config = WorkerConfig::default();
        if cli.frame_budget_ms.is_some() {
            config.frame_budget_ms = cli.frame_budget_ms;
        }
        grade_offloaded(frame, snapshot, &config).await?
    };
    info!(elapsed_ms = t0.elapsed().as_millis(), w, h, inline = cli.inline, "frame graded");

    save_frame(graded, output)?;
    info!(path = %output.display(), "saved");
    Ok(())
}

async fn load_snapshot(path: Option<&Path>) -> Result<EffectsState> {
    let Some(path) = path else {
        return Ok(EffectsState::default());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))
}

async fn load_frame(path: &Path) -> Result<Frame> {
    let owned = path.to_path_buf();
    let img = tokio::task::spawn_blocking(move || image::open(&owned))
        .await
        .context("image decode task failed")?
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    info!(path = %path.display(), w = width, h = height, "image loaded");
    Ok(Frame::from_data(width, height, img.into_raw())?)
}

async fn grade_offloaded(frame: Frame, snapshot: EffectsState, config: &WorkerConfig) -> Result<Frame> {
    let processor = FrameProcessor::new(EffectWorker::spawn(config)?);
    if !processor.wait_ready().await {
        bail!("effect worker exited before becoming ready");
    }
    let graded = processor.process(frame, snapshot).await;
    processor.terminate();
    Ok(graded?)
}

fn save_frame(frame: Frame, path: &Path) -> Result<()> {
    let Frame {
        width,
        height,
        data,
    } = frame;
    let rgba = RgbaImage::from_raw(width, height, data)
        .context("frame buffer does not match its dimensions")?;
    let img = DynamicImage::ImageRgba8(rgba);

    // JPEG has no alpha channel.
    let img = match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn write_test_png(path: &Path) {
        let img = RgbaImage::from_fn(8, 6, |x, y| {
            image::Rgba([(x * 30) as u8, (y * 40) as u8, 90, 255])
        });
        img.save(path).unwrap();
    }

    fn cli(input: &Path, output: &Path) -> Cli {
        Cli {
            input: Some(input.to_path_buf()),
            output: Some(output.to_path_buf()),
            snapshot: None,
            inline: false,
            frame_budget_ms: None,
            print_default_snapshot: false,
        }
    }

    fn inverting_snapshot(dir: &Path) -> PathBuf {
        let mut state = EffectsState::default();
        state.color_inversion = true;
        let path = dir.join("snapshot.json");
        std::fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();
        path
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn input_required_without_print_flag() {
        assert!(Cli::try_parse_from(["framegrade", "--output", "x.png"]).is_err());
        assert!(Cli::try_parse_from(["framegrade", "--print-default-snapshot"]).is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn worker_and_inline_agree() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        write_test_png(&input);
        let snapshot = inverting_snapshot(dir.path());

        let offloaded = dir.path().join("worker.png");
        let mut args = cli(&input, &offloaded);
        args.snapshot = Some(snapshot.clone());
        run(args).await.unwrap();

        let inline = dir.path().join("inline.png");
        let mut args = cli(&input, &inline);
        args.snapshot = Some(snapshot);
        args.inline = true;
        run(args).await.unwrap();

        let a = image::open(&offloaded).unwrap().to_rgba8();
        let b = image::open(&inline).unwrap().to_rgba8();
        assert_eq!(a, b);

        let original = image::open(&input).unwrap().to_rgba8();
        let px = original.get_pixel(3, 2);
        let inv = a.get_pixel(3, 2);
        assert_eq!(inv[0], 255 - px[0]);
        assert_eq!(inv[1], 255 - px[1]);
        assert_eq!(inv[2], 255 - px[2]);
        assert_eq!(inv[3], px[3]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn default_snapshot_is_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_test_png(&input);

        run(cli(&input, &output)).await.unwrap();

        let a = image::open(&input).unwrap().to_rgba8();
        let b = image::open(&output).unwrap().to_rgba8();
        assert_eq!(a, b);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn partial_snapshot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        write_test_png(&input);
        let snapshot = dir.path().join("partial.json");
        std::fs::write(&snapshot, r#"{"colorInversion": true}"#).unwrap();

        let mut args = cli(&input, &dir.path().join("out.png"));
        args.snapshot = Some(snapshot);
        let err = run(args).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse snapshot"), "{err:#}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn jpeg_output_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.jpg");
        write_test_png(&input);

        run(cli(&input, &output)).await.unwrap();
        let img = image::open(&output).unwrap();
        assert_eq!((img.width(), img.height()), (8, 6));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_input_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nope.png");
        let err = run(cli(&input, &dir.path().join("out.png")))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("nope.png"));
    }
}
