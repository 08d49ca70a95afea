//! Headless driver: runs the blob for a couple of seconds at the tick
//! cadence and prints the draw list of the last frame as JSON.
//!
//! `cargo run --example frames -- ambient` uses the small ambient preset.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use blob::{BlobRenderer, BlobState, Presentation, PresenceDetector, RecordingCanvas};

const FRAMES: u32 = 120;
/// The tracker runs at camera rate, slower than the render tick.
const CAMERA_INTERVAL: Duration = Duration::from_millis(33);
const CAMERA_FRAMES: u32 = 72;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let presentation = match std::env::args().nth(1).as_deref() {
        Some("ambient") => Presentation::Ambient,
        _ => Presentation::Active,
    };
    let (width, height) = presentation.surface_size();
    let renderer = BlobRenderer::for_presentation(presentation)?;
    let mut ctx = renderer.new_context();

    // Stand-in for a face tracker: sweeps the face across the frame on its
    // own thread and reports visibility over a channel.
    let face = ctx.face_handle();
    let (visible_tx, visible_rx) = mpsc::channel();
    let tracker = thread::spawn(move || {
        for step in 0..CAMERA_FRAMES {
            let t = step as f32 / CAMERA_FRAMES as f32;
            let visible = (12..54).contains(&step);
            if visible {
                face.update(t, 0.5 + 0.2 * (t * 6.0).sin());
            } else {
                face.reset();
            }
            if visible_tx.send(visible).is_err() {
                break;
            }
            thread::sleep(CAMERA_INTERVAL);
        }
    });

    let mut detector = PresenceDetector::new();
    let mut canvas = RecordingCanvas::new();
    let tick = renderer.tick_interval();
    let mut elapsed = Duration::ZERO;

    for frame in 0..FRAMES {
        // Never wait on the tracker; only its latest report matters.
        if let Some(visible) = visible_rx.try_iter().last() {
            if let Some(event) = detector.observe(visible) {
                ctx.handle_presence(event);
            }
        }
        match frame {
            40 => ctx.request_state(BlobState::Thinking),
            60 => ctx.request_state(BlobState::Success),
            100 => ctx.request_state_named("error"),
            _ => {}
        }

        renderer.tick(&mut ctx);
        canvas.clear();
        let summary = renderer.paint_at(&mut ctx, &mut canvas, width, height, elapsed)?;
        elapsed += tick;
        thread::sleep(tick);

        if frame % 10 == 0 {
            let centroid = summary.contour.centroid();
            let (face, eyes) = (summary.face, summary.eyes);
            log::info!(
                "frame {frame:3} {:<9} face ({:.2}, {:.2}) centroid ({:.1}, {:.1})",
                summary.state.name(),
                face.x,
                face.y,
                centroid.x,
                centroid.y,
            );
            log::debug!(
                "eyes at x {:.1} / {:.1}",
                eyes.left.center.x,
                eyes.right.center.x
            );
        }
    }

    if tracker.join().is_err() {
        log::error!("face tracker thread panicked");
    }

    println!("{}", canvas.to_json()?);
    Ok(())
}
