use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use livegate_core::capture::domain::capture_trigger::CapturedPhoto;
use livegate_core::capture::infrastructure::jpeg_capture::JpegCaptureTrigger;
use livegate_core::pose::domain::head_pose::HeadPose;
use livegate_core::pose::domain::pose_classifier::PoseObservation;
use livegate_core::pose::domain::pose_estimator::PoseEstimator;
use livegate_core::pose::infrastructure::landmark_pose_classifier::LandmarkPoseClassifier;
use livegate_core::pose::infrastructure::scripted_detector::ScriptedDetector;
use livegate_core::session::session_config::SessionConfig;
use livegate_core::session::session_observer::{LogSessionObserver, SessionObserver};
use livegate_core::session::session_runner::SessionRunner;
use livegate_core::session::session_state::{PoseSequence, SessionStatus};
use livegate_core::video::infrastructure::scripted_frame_source::ScriptedFrameSource;

/// Runs a scripted liveness-verification session and saves the captured photo.
#[derive(Parser)]
#[command(name = "livegate")]
struct Cli {
    /// Pose script: one observation per line (center, left, right, unknown,
    /// none). Lines starting with '#' are comments.
    script: PathBuf,

    /// Where to write the captured photo.
    #[arg(long, default_value = "capture.jpg")]
    output: PathBuf,

    /// Required pose sequence, comma-separated.
    #[arg(long, default_value = "center,left,right,center")]
    sequence: String,

    /// Classification interval in milliseconds.
    #[arg(long, default_value = "300")]
    interval_ms: u64,

    /// Whole-sequence timeout in milliseconds.
    #[arg(long, default_value = "20000")]
    timeout_ms: u64,

    /// Hold-still delay before capture, in milliseconds.
    #[arg(long, default_value = "750")]
    capture_delay_ms: u64,

    /// Success-flash duration in milliseconds.
    #[arg(long, default_value = "400")]
    feedback_ms: u64,

    /// Consecutive matching ticks required per step.
    #[arg(long, default_value = "2")]
    hold_checks: u32,

    /// Pause between steps, in milliseconds.
    #[arg(long, default_value = "600")]
    transition_ms: u64,

    /// L/R ratio above which the head counts as turned left.
    #[arg(long, default_value = "1.4")]
    ratio_high: f64,

    /// L/R ratio below which the head counts as turned right.
    #[arg(long, default_value = "0.7")]
    ratio_low: f64,

    /// Minimum detector confidence for a face to count.
    #[arg(long, default_value = "0.6")]
    min_confidence: f32,

    /// Synthesized frame width.
    #[arg(long, default_value = "640")]
    width: u32,

    /// Synthesized frame height.
    #[arg(long, default_value = "480")]
    height: u32,

    /// Report progress through the logger instead of stdout.
    #[arg(long, short)]
    quiet: bool,
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

    let script = parse_script(&fs::read_to_string(&cli.script)?)?;
    let sequence = parse_sequence(&cli.sequence)?;

    let config = SessionConfig {
        sequence,
        check_interval: Duration::from_millis(cli.interval_ms),
        sequence_timeout: Duration::from_millis(cli.timeout_ms),
        capture_delay: Duration::from_millis(cli.capture_delay_ms),
        feedback_duration: Duration::from_millis(cli.feedback_ms),
        hold_checks: cli.hold_checks,
        transition_delay: Duration::from_millis(cli.transition_ms),
    };

    let classifier = LandmarkPoseClassifier::new(
        Box::new(ScriptedDetector::with_min_confidence(
            script,
            cli.min_confidence,
        )),
        PoseEstimator::new(cli.ratio_high, cli.ratio_low),
    );

    let (mut runner, _stop) = SessionRunner::new(
        config,
        Box::new(classifier),
        Box::new(JpegCaptureTrigger::default()),
    );
    let mut source = ScriptedFrameSource::unlimited(cli.width, cli.height);
    let mut observer: Box<dyn SessionObserver> = if cli.quiet {
        Box::new(LogSessionObserver)
    } else {
        Box::new(ConsoleObserver)
    };

    match runner.run(&mut source, observer.as_mut())? {
        Some(photo) => {
            fs::write(&cli.output, &photo.data)?;
            log::info!("photo written to {}", cli.output.display());
            if !cli.quiet {
                println!("Photo saved to {}", cli.output.display());
            }
            Ok(())
        }
        None => Err("liveness check did not complete (timed out or stopped)".into()),
    }
}

fn parse_sequence(raw: &str) -> Result<PoseSequence, Box<dyn std::error::Error>> {
    let mut poses = Vec::new();
    for token in raw.split(',') {
        let pose = HeadPose::parse(token).ok_or_else(|| format!("invalid pose: {token:?}"))?;
        poses.push(pose);
    }
    Ok(PoseSequence::new(poses)?)
}

fn parse_script(raw: &str) -> Result<Vec<PoseObservation>, Box<dyn std::error::Error>> {
    let mut script = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let observation = if token.eq_ignore_ascii_case("none") {
            PoseObservation::NoFace
        } else {
            HeadPose::parse(token)
                .map(PoseObservation::Face)
                .ok_or_else(|| format!("line {}: invalid observation {token:?}", line_no + 1))?
        };
        script.push(observation);
    }
    if script.is_empty() {
        return Err("script contains no observations".into());
    }
    Ok(script)
}

struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn status_changed(&mut self, status: SessionStatus, guidance: &str) {
        println!("[{status}] {guidance}");
    }

    fn feedback_flash(&mut self, visible: bool) {
        if visible {
            println!("        pose held!");
        }
    }

    fn photo_captured(&mut self, photo: &CapturedPhoto) {
        println!(
            "Captured {}x{} {} photo ({} bytes)",
            photo.width,
            photo.height,
            photo.format,
            photo.data.len()
        );
    }

    fn session_ended(&mut self, final_status: SessionStatus) {
        log::debug!("session ended in status {final_status}");
    }
}
