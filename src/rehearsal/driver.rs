use std::{sync::Arc, time::Duration};

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::time;
use tracing::{info, warn};

use crate::{
    auth::models::Identity,
    common::{app_state::AppState, error::AppError},
    config::config::RehearsalConfig,
    photo::{
        db as photo_db,
        models::{Photo, PhotoStatus},
        moderation::PhotoModeration,
    },
    quiz::{
        admin::AdminQuizControl,
        guest::{GuestQuizSession, VoteOutcome},
        models::OPTION_COUNT,
    },
    system_log::models::LogAction,
};

const REHEARSAL_ADMIN: &str = "rehearsal-admin";

/// Plays the admin and a room of guests against the shared store, so the
/// projector has live data without any other client connected.
pub struct Rehearsal {
    state: Arc<AppState>,
    admin: AdminQuizControl,
    moderation: PhotoModeration,
    guests: Vec<GuestQuizSession>,
    rng: ChaCha8Rng,
    pace: Duration,
    photo_urls: Vec<String>,
}

impl Rehearsal {
    pub fn new(state: Arc<AppState>, config: &RehearsalConfig) -> Result<Self, AppError> {
        let admin = Identity::admin(REHEARSAL_ADMIN);
        let guests = (1..=config.guests)
            .map(|n| state.guest_quiz(Some(Identity::guest(format!("rehearsal-guest-{}", n)))))
            .collect();

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        Ok(Self {
            admin: state.admin_quiz(admin.clone())?,
            moderation: state.photo_moderation(admin)?,
            guests,
            rng,
            pace: Duration::from_millis(config.pace_ms),
            photo_urls: config.photo_urls.clone(),
            state,
        })
    }

    /// Puts question `index` live and lets every guest vote once, spread over
    /// one pace interval. Returns the number of votes recorded.
    pub async fn play_question(&mut self, index: usize) -> Result<usize, AppError> {
        let quiz_state = self.admin.select_question(index).await?;
        let correct = self
            .state
            .get_bank()
            .question(index)
            .map(|q| q.correct_option_index)
            .unwrap_or(0);

        let step = self.pace / self.guests.len().max(1) as u32;
        let mut recorded = 0;

        for guest in self.guests.iter_mut() {
            guest.apply_state(quiz_state);

            // Guests lean towards the right answer.
            let option = if self.rng.random_bool(0.5) {
                correct
            } else {
                self.rng.random_range(0..OPTION_COUNT)
            };

            match guest.cast_vote(option).await {
                Ok(VoteOutcome::Recorded) => recorded += 1,
                Ok(outcome) => warn!("Rehearsal vote not recorded: {:?}", outcome),
                Err(e) => warn!("Rehearsal vote failed: {}", e),
            }

            time::sleep(step).await;
        }

        Ok(recorded)
    }

    /// Walks the whole bank: show, let guests vote, reveal, and close at the end.
    pub async fn run_quiz(&mut self) -> Result<(), AppError> {
        self.state
            .syslog()
            .system()
            .action(LogAction::Other)
            .function("run_quiz")
            .description("Quiz rehearsal started")
            .log_async();

        for index in 0..self.state.get_bank().len() {
            let votes = self.play_question(index).await?;
            info!("Rehearsal question {} got {} votes", index + 1, votes);
            time::sleep(self.pace).await;

            self.admin.reveal().await?;
            time::sleep(self.pace).await;
        }

        self.admin.close().await?;
        info!("Quiz rehearsal finished");
        Ok(())
    }

    /// Submits each configured image as a guest photo and approves it.
    /// The images are already hosted, so approval never uploads.
    pub async fn run_photos(&self) -> Result<usize, AppError> {
        let store = self.state.get_store();
        let mut approved = 0;

        for (n, url) in self.photo_urls.iter().enumerate() {
            let photo = Photo {
                id: String::new(),
                url: url.clone(),
                file_name: Some(format!("Rehearsal photo {}", n + 1)),
                uploaded_at: Utc::now(),
                vetted: false,
                hosted_url: Some(url.clone()),
                public_id: None,
                status: PhotoStatus::Hosted,
            };

            let id = photo_db::save_photo(store.as_ref(), &photo).await?;
            self.moderation.approve_photo(&id).await?;
            approved += 1;

            time::sleep(self.pace).await;
        }

        info!("Photo rehearsal approved {} photos", approved);
        Ok(approved)
    }
}
