use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use glimpse_ocr::TesseractEngine;
use glimpse_types::AppEvent;
use tokio::signal;

pub mod cli;
pub mod controller;
pub mod coordinator;
pub mod events;
pub mod io;
pub mod logging;
pub mod ocr_context;
pub mod profile;
pub mod session;
pub mod state;
pub mod status;
pub mod ui;

#[cfg(test)]
mod tests;

use self::cli::Args;
use self::controller::AppController;
use self::state::AppState;
use self::ui::DisplayMode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let (mut config, profile_name) = profile::load_config(args.config.as_deref())?;
    args.apply(&mut config);
    logging::init(&config.log_filter, config.log_json)?;
    if let Some(name) = profile_name {
        tracing::info!("Using profile '{}'", name);
    }

    let engine = TesseractEngine::new(config.ocr.tesseract_path.clone())
        .with_page_seg_mode(config.ocr.page_seg_mode);
    let state = Arc::new(AppState::new(config, Arc::new(engine)));

    let controller = AppController::new(state).await;
    let mode = if args.interactive {
        DisplayMode::Interactive
    } else {
        DisplayMode::OneShot
    };
    let mut tasks = controller.spawn_tasks(Some(mode));

    let input = controller.input();
    if let Some(image) = &args.image {
        input.send(AppEvent::LoadImage(image.clone())).await?;
    }

    // Outside the join set: stdin ending only queues `Shutdown`, the event
    // loop finishing is what ends the run
    let reader = if args.interactive {
        Some(tokio::spawn(io::stdin_commands(
            input,
            controller.cancel_token(),
        )))
    } else {
        if let Some(drag) = args.select {
            input.send(AppEvent::PointerDown(drag.from)).await?;
            input.send(AppEvent::PointerMove(drag.to)).await?;
            input.send(AppEvent::PointerUp(drag.to)).await?;
        } else {
            input.send(AppEvent::RecognizeFullImage).await?;
        }
        None
    };

    let result = tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            Ok(())
        }
        Some(joined) = tasks.join_next() => {
            let result = joined.context("task panicked")?;
            if result.is_ok() && args.interactive {
                // Let the job started by the last command finish and reach the display
                let coordinator = controller.coordinator();
                tokio::select! {
                    _ = signal::ctrl_c() => tracing::info!("Shutdown requested"),
                    job = coordinator.settled() => {
                        tracing::debug!("last job settled as {}", job.status_label());
                    }
                }
            }
            result
        }
    };

    controller.shutdown();
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined.context("task panicked").and_then(|r| r) {
            tracing::warn!("task exited with error: {e:#}");
        }
    }
    if let Some(reader) = reader {
        reader.abort();
    }

    result
}
