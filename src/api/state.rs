//! Application state for the API server

use crate::{Config, MediaGallery};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the gallery instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The main MediaGallery instance
    pub gallery: Arc<MediaGallery>,

    /// Configuration (for read access)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(gallery: Arc<MediaGallery>, config: Arc<Config>) -> Self {
        Self { gallery, config }
    }
}
