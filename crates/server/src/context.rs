use std::{convert::Infallible, sync::Arc};

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use crate::{
    app_state::AppState,
    layout::{self, Chrome},
    pipeline::PageExit,
    session::{login_redirect, session_from_headers, Session},
};

/// Per-request view of who is asking and where.
#[derive(Debug, Clone)]
pub(crate) struct RequestContext {
    pub(crate) path: String,
    pub(crate) path_and_query: String,
    pub(crate) session: Option<Session>,
    login_route: String,
}

impl RequestContext {
    pub(crate) fn new(path_and_query: &str, session: Option<Session>, login_route: &str) -> Self {
        let path = path_and_query
            .split_once('?')
            .map_or(path_and_query, |(path, _)| path);
        Self {
            path: path.to_string(),
            path_and_query: path_and_query.to_string(),
            session,
            login_route: login_route.to_string(),
        }
    }

    /// Session gate: without a session the page redirects to login.
    pub(crate) fn require_session(&self) -> Result<&Session, PageExit> {
        match &self.session {
            Some(session) => Ok(session),
            None => {
                debug!(path = %self.path, "no session, redirecting to login");
                Err(PageExit::Redirect(login_redirect(
                    &self.login_route,
                    &self.path_and_query,
                )))
            }
        }
    }

    /// Session gate for the management sections.
    pub(crate) fn require_staff(&self) -> Result<&Session, PageExit> {
        let session = self.require_session()?;
        if !session.role.is_staff() {
            warn!(user = %session.user_id, path = %self.path, "guest denied staff section");
            return Err(PageExit::Redirect("/dashboard".to_string()));
        }
        Ok(session)
    }

    pub(crate) fn chrome(&self) -> Chrome {
        layout::select_chrome(
            layout::is_dashboard_route(&self.path),
            self.session.is_some(),
        )
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let path_and_query = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
        let session = session_from_headers(&parts.headers, &state.sessions);
        Ok(Self::new(path_and_query, session, &state.login_route))
    }
}
