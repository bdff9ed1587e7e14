use std::time::Duration;

use crate::photo::models::PhotoView;

pub const AUTO_PLAY_INTERVAL: Duration = Duration::from_secs(3);

/// Slideshow position over a list of photos that may change underneath it.
#[derive(Debug, Clone, Default)]
pub struct PhotoCarousel {
    photos: Vec<PhotoView>,
    index: usize,
    auto_play: bool,
}

impl PhotoCarousel {
    pub fn new(photos: Vec<PhotoView>, start_index: usize) -> Self {
        let mut carousel = Self {
            photos,
            index: start_index,
            auto_play: false,
        };
        carousel.clamp();
        carousel
    }

    /// Swaps in a fresh photo list and keeps the index in bounds.
    pub fn replace(&mut self, photos: Vec<PhotoView>) {
        self.photos = photos;
        self.clamp();
    }

    fn clamp(&mut self) {
        if self.photos.is_empty() {
            self.index = 0;
        } else if self.index >= self.photos.len() {
            self.index = self.photos.len() - 1;
        }
    }

    pub fn current(&self) -> Option<&PhotoView> {
        self.photos.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn next(&mut self) {
        if self.photos.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.photos.len();
    }

    pub fn previous(&mut self) {
        if self.photos.is_empty() {
            return;
        }
        self.index = (self.index + self.photos.len() - 1) % self.photos.len();
    }

    pub fn toggle_auto_play(&mut self) -> bool {
        self.auto_play = !self.auto_play;
        self.auto_play
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play
    }

    /// Called on every auto-play interval. Advances only with more than one photo.
    pub fn tick(&mut self) {
        if self.auto_play && self.photos.len() > 1 {
            self.next();
        }
    }

    /// Removes a photo that was deleted elsewhere.
    pub fn remove(&mut self, id: &str) {
        self.photos.retain(|photo| photo.id != id);
        self.clamp();
    }
}
