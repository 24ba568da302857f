//! CLI for classifying recorded landmark frames.
//!
//! Usage:
//!   gesture-mirror <frames.jsonl>                 # Human-readable output
//!   gesture-mirror <frames.jsonl> --json          # JSON output
//!   gesture-mirror <frames.json> -o result.json   # Save to file
//!   gesture-mirror --list-gestures                # Show supported gestures

use clap::Parser;
use gesture_mirror::{
    load_frames, BoundingBox, Config, DisplayTracker, Gesture, GestureClassifier, OverlaySet,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "gesture-mirror")]
#[command(
    author,
    version,
    about = "Classify face and hand gestures from landmark recordings",
    long_about = None
)]
struct Args {
    /// Landmark recording: JSON array of frames or one JSON frame per line
    #[arg(required_unless_present = "list_gestures")]
    frames: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (default: gesture-mirror.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overlay image directory (overrides `[overlays] dir` in the config);
    /// gestures without an overlay are displayed as normal
    #[arg(long)]
    overlays: Option<PathBuf>,

    /// Only report frames where the displayed gesture changes
    #[arg(long)]
    changes_only: bool,

    /// List supported gestures and exit
    #[arg(long)]
    list_gestures: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Output {
    input: String,
    frames_read: usize,
    results: Vec<FrameOutput>,
    /// Detected gesture -> number of frames
    summary: BTreeMap<&'static str, usize>,
}

#[derive(Serialize)]
struct FrameOutput {
    /// Frame index (0-based)
    index: usize,
    face_detected: bool,
    hands_detected: usize,
    /// Classifier output
    gesture: Gesture,
    /// Rule that matched, if any
    rule: Option<&'static str>,
    /// Gesture on display after this frame
    displayed: Gesture,
    changed: bool,
    face_center_px: Option<f32>,
    /// Face bounding box in pixels
    face_box_px: Option<BoundingBox>,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.list_gestures {
        println!("{}", format_gesture_list());
        return Ok(());
    }
    let frames_path = args.frames.as_ref().ok_or("No frames file given")?;

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &args.overlays {
        config.overlays.dir = Some(dir.clone());
    }

    let classifier = GestureClassifier::with_thresholds(config.thresholds)?;
    let overlays = OverlaySet::from_config(&config.overlays)?;

    info!("Reading frames from {:?}", frames_path);
    let frames = load_frames(frames_path)?;
    debug!("Read {} frame(s)", frames.len());

    let mut tracker = DisplayTracker::new();
    let mut summary = BTreeMap::new();
    let mut results = Vec::new();

    for (index, frame) in frames.iter().enumerate() {
        let classification = classifier.evaluate_frame(frame);
        *summary.entry(classification.gesture.as_str()).or_insert(0) += 1;

        let change = tracker.update(classification.gesture, |g| {
            overlays.as_ref().map_or(true, |o| o.contains(g))
        });
        if args.changes_only && change.is_none() && index > 0 {
            continue;
        }

        results.push(FrameOutput {
            index,
            face_detected: frame.primary_face().is_some(),
            hands_detected: frame.hands().len(),
            gesture: classification.gesture,
            rule: classification.rule,
            displayed: tracker.current(),
            changed: change.is_some(),
            face_center_px: frame.primary_face().map(|f| frame.face_center_px(f)),
            face_box_px: frame.face_box_px(),
        });
    }

    let output = Output {
        input: frames_path.display().to_string(),
        frames_read: frames.len(),
        results,
        summary,
    };

    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        info!("Output written to {:?}", path);
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn format_gesture_list() -> String {
    let mut s = String::from("Supported gestures:\n");
    for gesture in Gesture::ALL {
        s.push_str(&format!(
            "  {:<24} {:<24} {}\n",
            gesture.as_str(),
            gesture.display_name(),
            gesture.hint()
        ));
    }
    s
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!("Input: {}\n", output.input));
    s.push_str(&format!("Frames read: {}\n", output.frames_read));

    if output.results.is_empty() {
        s.push_str("\nNo frames to report.\n");
        return s;
    }

    s.push('\n');
    for frame in &output.results {
        let marker = if frame.changed { "*" } else { " " };
        let face = if frame.face_detected { "face" } else { "no face" };
        s.push_str(&format!(
            "{} frame {:>5}  {:<24} ({}, {} hand(s))",
            marker,
            frame.index,
            frame.displayed.display_name(),
            face,
            frame.hands_detected
        ));
        if let Some(b) = &frame.face_box_px {
            s.push_str(&format!(
                "  face at ({:.0}, {:.0}) {:.0}x{:.0}",
                b.x, b.y, b.width, b.height
            ));
        }
        if frame.gesture != frame.displayed {
            s.push_str(&format!("  [detected {}, no overlay]", frame.gesture));
        }
        s.push('\n');
    }

    s.push_str("\nSummary:\n");
    for (gesture, count) in &output.summary {
        s.push_str(&format!("  {:<24} {}\n", gesture, count));
    }

    s
}
