use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use glimpse_ocr::LoadedImage;
use glimpse_types::{AppEvent, IntrinsicRect, JobSource, JobStatus};
use image::{ImageFormat, Rgba, RgbaImage};
use tokio::sync::Notify;
use tokio::time::timeout;

use super::{Script, ScriptedEngine, png, wait_for_terminal};
use crate::coordinator::{JobOutcome, RecognitionCoordinator, RecognitionSource};

const PLACEHOLDER: &str = "(no text detected)";

fn coordinator(
    engine: Arc<ScriptedEngine>,
) -> (RecognitionCoordinator, kanal::AsyncReceiver<AppEvent>) {
    let (tx, rx) = kanal::unbounded_async();
    (
        RecognitionCoordinator::new(engine, PLACEHOLDER.to_string(), tx),
        rx,
    )
}

fn image(width: u32, height: u32) -> LoadedImage {
    LoadedImage::from_bytes("test.png".into(), png(width, height)).unwrap()
}

#[tokio::test]
async fn test_whitespace_result_shows_placeholder() {
    let engine = ScriptedEngine::new([Script::reply("  \n\t \n")]);
    let (coordinator, rx) = coordinator(engine);

    let handle = coordinator
        .start(RecognitionSource::FullImage(image(20, 10)), "eng".to_string())
        .await;
    let (job, _) = wait_for_terminal(&rx, handle.generation).await;

    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.status_label(), "done");
    assert_eq!(job.result_text.as_deref(), Some(PLACEHOLDER));
    assert_eq!(job.progress_percent, 100);
    assert_eq!(job.error_message, None);
    assert_eq!(handle.outcome().await.unwrap(), JobOutcome::Finished(job));
}

#[tokio::test]
async fn test_engine_failure_becomes_error_text() {
    let engine = ScriptedEngine::new([Script::Fail("network timeout".to_string())]);
    let (coordinator, rx) = coordinator(engine);

    let handle = coordinator
        .start(RecognitionSource::FullImage(image(20, 10)), "eng".to_string())
        .await;
    let (job, _) = wait_for_terminal(&rx, handle.generation).await;

    assert_eq!(job.status, JobStatus::Error);
    let text = job.result_text.unwrap();
    assert!(text.contains("network timeout"), "{text}");
    assert!(text.starts_with("Recognition failed"), "{text}");
    assert_eq!(job.error_message.as_deref(), Some("network timeout"));
}

#[tokio::test]
async fn test_progress_is_applied_in_order() {
    let engine = ScriptedEngine::new([Script::Reply {
        text: "Hello world\n".to_string(),
        stages: vec![
            ("loading tesseract core", Some(0.0)),
            ("initializing api", None),
            ("recognizing text", Some(0.333)),
            ("recognizing text", Some(0.666)),
        ],
    }]);
    let (coordinator, rx) = coordinator(engine);

    let handle = coordinator
        .start(RecognitionSource::FullImage(image(20, 10)), "eng".to_string())
        .await;
    let (job, events) = wait_for_terminal(&rx, handle.generation).await;

    let timeline: Vec<(String, u8)> = events
        .iter()
        .filter_map(|event| match event {
            AppEvent::JobUpdate(job) => Some((job.status_label().to_string(), job.progress_percent)),
            _ => None,
        })
        .collect();

    assert_eq!(
        timeline,
        [
            ("running".to_string(), 0),
            ("loading tesseract core".to_string(), 0),
            ("initializing api".to_string(), 0),
            ("recognizing text".to_string(), 33),
            ("recognizing text".to_string(), 67),
            ("done".to_string(), 100),
        ]
    );
    assert_eq!(job.result_text.as_deref(), Some("Hello world\n"));
}

#[tokio::test]
async fn test_new_job_clears_previous_result() {
    let release = Arc::new(Notify::new());
    let engine = ScriptedEngine::new([
        Script::Fail("boom".to_string()),
        Script::Gated {
            release: release.clone(),
            text: "later".to_string(),
        },
    ]);
    let (coordinator, rx) = coordinator(engine);

    let first = coordinator
        .start(RecognitionSource::FullImage(image(20, 10)), "eng".to_string())
        .await;
    wait_for_terminal(&rx, first.generation).await;

    let second = coordinator
        .start(RecognitionSource::FullImage(image(20, 10)), "eng".to_string())
        .await;

    let running = coordinator.snapshot().await;
    assert_eq!(running.generation, second.generation);
    assert_eq!(running.status, JobStatus::Running);
    assert_eq!(running.result_text, None);
    assert_eq!(running.error_message, None);

    release.notify_one();
    let (job, _) = wait_for_terminal(&rx, second.generation).await;
    assert_eq!(job.result_text.as_deref(), Some("later"));
}

#[tokio::test]
async fn test_superseded_job_never_overwrites_newer_state() {
    let release = Arc::new(Notify::new());
    let engine = ScriptedEngine::new([
        Script::Gated {
            release: release.clone(),
            text: "stale full image text".to_string(),
        },
        Script::reply("region text"),
    ]);
    let (coordinator, rx) = coordinator(engine.clone());
    let source = image(800, 600);

    let first = coordinator
        .start(RecognitionSource::FullImage(source.clone()), "eng".to_string())
        .await;

    // Let the first job get into the engine before superseding it
    let mut events = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        let in_engine = matches!(
            &event,
            AppEvent::JobUpdate(job) if job.stage.as_deref() == Some("loading image")
        );
        events.push(event);
        if in_engine {
            break;
        }
    }

    let rect = IntrinsicRect::new(200, 100, 400, 300);
    let second = coordinator
        .start(
            RecognitionSource::Region {
                image: source,
                rect,
            },
            "eng".to_string(),
        )
        .await;
    let second_generation = second.generation;
    release.notify_one();

    let (job, rest) = wait_for_terminal(&rx, second_generation).await;
    events.extend(rest);

    assert_eq!(job.source, JobSource::Region(rect));
    assert_eq!(job.result_text.as_deref(), Some("region text"));
    assert_eq!(first.outcome().await.unwrap(), JobOutcome::Superseded);
    assert_eq!(
        second.outcome().await.unwrap(),
        JobOutcome::Finished(job.clone())
    );

    // Give any straggler from the first job a chance to show up
    tokio::time::sleep(Duration::from_millis(50)).await;
    while let Ok(Some(event)) = rx.try_recv() {
        events.push(event);
    }

    let generations: Vec<u64> = events
        .iter()
        .filter_map(|event| match event {
            AppEvent::JobUpdate(job) => Some(job.generation),
            _ => None,
        })
        .collect();
    let first_of_second = generations
        .iter()
        .position(|g| *g == second_generation)
        .unwrap();
    assert!(
        generations[first_of_second..]
            .iter()
            .all(|g| *g == second_generation),
        "{generations:?}"
    );

    assert_eq!(coordinator.snapshot().await, job);
}

#[tokio::test]
async fn test_undecodable_region_fails_without_calling_engine() {
    let engine = ScriptedEngine::new([Script::reply("unreachable")]);
    let (coordinator, rx) = coordinator(engine.clone());

    // Header intact, pixel data cut off halfway
    let noise = RgbaImage::from_fn(64, 64, |x, y| {
        Rgba([((x * 31 + y * 17) ^ (x * y)) as u8, (x * y) as u8, (x + y) as u8, 255])
    });
    let mut buffer = Cursor::new(Vec::new());
    noise.write_to(&mut buffer, ImageFormat::Png).unwrap();
    let mut bytes = buffer.into_inner();
    bytes.truncate(bytes.len() / 2);
    let broken = LoadedImage::from_bytes("broken.png".into(), bytes).unwrap();

    let handle = coordinator
        .start(
            RecognitionSource::Region {
                image: broken,
                rect: IntrinsicRect::new(0, 0, 8, 8),
            },
            "eng".to_string(),
        )
        .await;
    let (job, _) = wait_for_terminal(&rx, handle.generation).await;

    assert_eq!(job.status, JobStatus::Error);
    assert!(
        job.result_text.as_deref().unwrap().contains("Failed to load image"),
        "{:?}",
        job.result_text
    );
    assert!(engine.received.lock().unwrap().is_empty());
}
