use std::sync::Arc;

use server_api::HotelActions;

use crate::{config::Settings, session::SessionKeys};

/// Immutable per-process state handed to every handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) actions: Arc<dyn HotelActions>,
    pub(crate) sessions: SessionKeys,
    pub(crate) login_route: String,
    pub(crate) max_body_bytes: usize,
}

impl AppState {
    pub(crate) fn new(actions: Arc<dyn HotelActions>, settings: &Settings) -> Self {
        Self {
            actions,
            sessions: SessionKeys::new(&settings.session_secret, settings.session_ttl_seconds),
            login_route: settings.login_route.clone(),
            max_body_bytes: settings.max_body_bytes,
        }
    }
}
