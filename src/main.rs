use std::{env, str::FromStr, sync::Arc};

use dotenv::dotenv;
use tokio::time;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::FmtSubscriber;

use wedding_companion::{
    common::app_state::AppState,
    config::config::CONFIG,
    photo::{
        carousel::{AUTO_PLAY_INTERVAL, PhotoCarousel},
        db as photo_db,
    },
    rehearsal::driver::Rehearsal,
};

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let level = LevelFilter::from_str(&CONFIG.log_level).unwrap_or(LevelFilter::DEBUG);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state
    let state = AppState::from_config(&CONFIG).unwrap_or_else(|e| panic!("{}", e));

    let mode = env::args().nth(1).unwrap_or_else(|| "quiz".into());
    info!("Projector starting in {} mode", mode);

    tokio::select! {
        _ = run(mode, state) => {},
        _ = tokio::signal::ctrl_c() => info!("Projector shutting down"),
    }
}

async fn run(mode: String, state: Arc<AppState>) {
    if CONFIG.rehearsal.enabled {
        spawn_rehearsal(&mode, state.clone());
    }

    match mode.as_str() {
        "quiz" => quiz_projector(state).await,
        "photos" => photo_projector(state).await,
        other => error!("Unknown projector mode: {}", other),
    }
}

// Drives the quiz or the gallery on the same store the projector watches.
fn spawn_rehearsal(mode: &str, state: Arc<AppState>) {
    let mut rehearsal = match Rehearsal::new(state, &CONFIG.rehearsal) {
        Ok(rehearsal) => rehearsal,
        Err(e) => {
            error!("Failed to start rehearsal: {}", e);
            return;
        }
    };

    let photos = mode == "photos";
    tokio::spawn(async move {
        let result = if photos {
            rehearsal.run_photos().await.map(|_| ())
        } else {
            rehearsal.run_quiz().await
        };

        if let Err(e) = result {
            error!("Rehearsal stopped: {}", e);
        }
    });
}

async fn quiz_projector(state: Arc<AppState>) {
    let mut projector = state.projector();
    println!("{}", projector.frame());

    while let Some(frame) = projector.next_frame().await {
        match frame {
            Ok(frame) => println!("{}", frame),
            Err(e) => warn!("Projector update failed: {}", e),
        }
    }
}

async fn photo_projector(state: Arc<AppState>) {
    let mut photos = photo_db::subscribe_photos(state.get_store().as_ref(), true);
    let mut carousel = PhotoCarousel::default();
    carousel.toggle_auto_play();

    let mut interval = time::interval(AUTO_PLAY_INTERVAL);
    loop {
        tokio::select! {
            push = photos.next() => match push {
                Some(Ok(rows)) => carousel.replace(photo_db::photo_views(&rows, true)),
                Some(Err(e)) => warn!("Photo listener failed: {}", e),
                None => break,
            },
            _ = interval.tick() => carousel.tick(),
        }

        match carousel.current() {
            Some(photo) => println!(
                "[{}/{}] {} - {}",
                carousel.index() + 1,
                carousel.len(),
                photo.alt,
                photo.src
            ),
            None => println!("No photos uploaded yet"),
        }
    }
}
