use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::{
    auth::models::{Identity, ProviderClaims},
    client::image_host_client::{CloudinaryClient, ImageHost},
    common::error::AppError,
    config::config::AppConfig,
    message::handlers::{MessageModeration, MessageWall},
    photo::moderation::PhotoModeration,
    quiz::{
        admin::AdminQuizControl,
        feed::LiveQuiz,
        guest::GuestQuizSession,
        models::QuestionBank,
        practice::PracticeQuiz,
        projector::QuizProjector,
    },
    store::{document_store::DocumentStore, memory::InMemoryStore},
    system_log::builder::SystemLogBuilder,
};

pub struct AppState {
    store: Arc<dyn DocumentStore>,
    image_host: Arc<dyn ImageHost>,
    bank: QuestionBank,
    admin_email: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        image_host: Arc<dyn ImageHost>,
        bank: QuestionBank,
        admin_email: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            image_host,
            bank,
            admin_email: admin_email.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>, AppError> {
        let bank = match &config.quiz.questions_path {
            Some(path) => QuestionBank::load(path)?,
            None => QuestionBank::builtin(),
        };

        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let image_host: Arc<dyn ImageHost> =
            Arc::new(CloudinaryClient::new(Client::new(), &config.image_host));

        info!("App state ready with {} quiz questions", bank.len());
        Ok(Self::new(store, image_host, bank, &config.admin_email))
    }

    pub fn get_store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn get_bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn identity(&self, claims: &ProviderClaims) -> Identity {
        Identity::from_claims(claims, &self.admin_email)
    }

    pub fn syslog(&self) -> SystemLogBuilder {
        SystemLogBuilder::new(self.store.clone())
    }

    pub fn admin_quiz(&self, admin: Identity) -> Result<AdminQuizControl, AppError> {
        AdminQuizControl::new(self.store.clone(), self.bank.clone(), admin)
    }

    pub fn guest_quiz(&self, identity: Option<Identity>) -> GuestQuizSession {
        GuestQuizSession::new(self.store.clone(), self.bank.clone(), identity)
    }

    pub fn projector(&self) -> QuizProjector {
        QuizProjector::new(LiveQuiz::open(self.store.clone(), self.bank.clone()))
    }

    pub fn practice_quiz(&self) -> PracticeQuiz {
        PracticeQuiz::new(self.bank.clone())
    }

    pub fn photo_moderation(&self, admin: Identity) -> Result<PhotoModeration, AppError> {
        PhotoModeration::new(self.store.clone(), self.image_host.clone(), admin)
    }

    pub fn message_wall(&self) -> MessageWall {
        MessageWall::new(self.store.clone())
    }

    pub fn message_moderation(&self, admin: Identity) -> Result<MessageModeration, AppError> {
        MessageModeration::new(self.store.clone(), admin)
    }
}
