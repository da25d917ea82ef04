//! Data loading and result validation shared by every page.
//!
//! Handlers return `Result<_, PageExit>` so a missing session or a failed
//! required fetch ends rendering with `?`.

use std::future::Future;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use futures::future::join;
use shared::protocol::ActionResult;
use thiserror::Error;
use tracing::{debug, warn};

use crate::views;

/// Early exits from a page handler.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum PageExit {
    #[error("redirect to {0}")]
    Redirect(String),
    #[error("not found")]
    NotFound,
}

impl IntoResponse for PageExit {
    fn into_response(self) -> Response {
        match self {
            PageExit::Redirect(location) => Redirect::to(&location).into_response(),
            PageExit::NotFound => {
                (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
            }
        }
    }
}

/// Hard policy: anything but data ends the page with not-found.
pub(crate) fn require<T>(what: &'static str, result: ActionResult<T>) -> Result<T, PageExit> {
    match result {
        ActionResult::Ok(value) => Ok(value),
        ActionResult::NotFound => {
            debug!(what, "required record missing");
            Err(PageExit::NotFound)
        }
        ActionResult::Failed(reason) => {
            warn!(what, %reason, "required load failed");
            Err(PageExit::NotFound)
        }
    }
}

/// Soft policy for collections: a failed list renders as empty.
pub(crate) fn or_empty<T>(what: &'static str, result: ActionResult<Vec<T>>) -> Vec<T> {
    match result {
        ActionResult::Ok(values) => values,
        other => {
            warn!(what, reason = other.message().unwrap_or_default(), "list load failed, showing none");
            Vec::new()
        }
    }
}

/// Runs two independent fetches concurrently and waits for both.
pub(crate) async fn load_pair<A, B>(
    first: impl Future<Output = ActionResult<A>>,
    second: impl Future<Output = ActionResult<B>>,
) -> (ActionResult<A>, ActionResult<B>) {
    join(first, second).await
}

/// Both results are required; either failing is a not-found page.
pub(crate) fn require_both<A, B>(
    what: (&'static str, &'static str),
    results: (ActionResult<A>, ActionResult<B>),
) -> Result<(A, B), PageExit> {
    let first = require(what.0, results.0)?;
    let second = require(what.1, results.1)?;
    Ok((first, second))
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
