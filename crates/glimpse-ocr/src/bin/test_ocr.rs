//! Whole-image OCR check - run with: cargo run -p glimpse-ocr --bin test_ocr -- <image> [lang]

use anyhow::{Context, Result};
use glimpse_core::{ProgressSink, RecognitionEngine};
use glimpse_ocr::{LoadedImage, TesseractEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: test_ocr <image> [lang]")?;
    let language = args.next().unwrap_or_else(|| "eng".to_string());

    let engine = TesseractEngine::default();

    // 1. Installed languages
    match engine.list_languages().await {
        Ok(languages) => tracing::info!("languages: {}", languages.join(", ")),
        Err(e) => tracing::warn!("could not list languages: {}", e),
    }

    // 2. Load
    let image = LoadedImage::open(&path).await?;
    tracing::info!(
        "loaded {} ({}x{})",
        path,
        image.natural().width,
        image.natural().height
    );

    // 3. Recognize, echoing progress
    let (sink, progress_rx) = ProgressSink::channel();
    let printer = tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            tracing::info!("  {} {:?}", progress.stage, progress.fraction);
        }
    });

    let start = std::time::Instant::now();
    let recognized = engine.recognize(image.bytes(), &language, &sink).await?;
    drop(sink);
    let _ = printer.await;

    tracing::info!(
        "{:?} - {} chars",
        start.elapsed(),
        recognized.text.trim().len()
    );
    for line in recognized.text.lines().take(5) {
        tracing::info!("  > {}", line);
    }

    Ok(())
}
