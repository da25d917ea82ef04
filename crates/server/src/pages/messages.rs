use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use shared::{
    domain::MessageId,
    protocol::{ActionResult, MessageInput},
};
use tracing::{info, warn};

use super::{dashboard_page, notice_href, NoticeQuery};
use crate::{
    app_state::AppState,
    context::RequestContext,
    pipeline::{or_empty, PageExit},
    session::Session,
    views::{escape, Field, FieldKind, FormMode, FormView, ListRow, ListView},
};

const MESSAGES: &str = "/dashboard/messages";

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(MESSAGES, get(list).post(create))
        .route("/dashboard/messages/new", get(new_form))
        .route("/dashboard/messages/:id/delete", post(delete))
}

/// Staff read every message; guests read their own.
async fn list(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, PageExit> {
    let session = ctx.require_session()?;
    let staff = session.role.is_staff();
    let author = (!staff).then_some(&session.user_id);
    let messages = or_empty("messages", state.actions.get_messages(author).await);

    let view = ListView {
        heading: "Messages".to_string(),
        new_href: Some(format!("{MESSAGES}/new")),
        columns: vec!["Subject", "Message", "Sent"],
        rows: messages
            .iter()
            .map(|message| ListRow {
                cells: vec![
                    escape(&message.subject),
                    escape(&message.body),
                    message.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ],
                edit_href: None,
                delete_href: staff.then(|| format!("{MESSAGES}/{}/delete", message.id)),
            })
            .collect(),
        empty_text: "No messages yet.".to_string(),
        notice: query.notice,
    };
    Ok(dashboard_page(&ctx, session, "messages", "Messages", &view.render()).into_response())
}

async fn new_form(ctx: RequestContext) -> Result<Response, PageExit> {
    let session = ctx.require_session()?;
    Ok(render_form(&ctx, session, None, None, StatusCode::OK))
}

async fn create(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    form: Result<Form<MessageInput>, FormRejection>,
) -> Result<Response, PageExit> {
    let session = ctx.require_session()?;
    let (input, result) = match form {
        Ok(Form(input)) => {
            let result = state.actions.create_message(&session.user_id, &input).await;
            (Some(input), result)
        }
        Err(rejection) => (None, ActionResult::failed(rejection.body_text())),
    };

    match result {
        ActionResult::Ok(message) => {
            info!(user = %session.user_id, message = %message.id, "message sent");
            Ok(Redirect::to(MESSAGES).into_response())
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => {
            warn!(user = %session.user_id, %reason, "message rejected");
            Ok(render_form(
                &ctx,
                session,
                input.as_ref(),
                Some(reason),
                StatusCode::UNPROCESSABLE_ENTITY,
            ))
        }
    }
}

async fn delete(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Redirect, PageExit> {
    let session = ctx.require_staff()?;
    let id = MessageId(id);
    match state.actions.delete_message(&id).await {
        ActionResult::Ok(()) => {
            info!(user = %session.user_id, message = %id, "message deleted");
            Ok(Redirect::to(MESSAGES))
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => Ok(Redirect::to(&notice_href(MESSAGES, &reason))),
    }
}

fn render_form(
    ctx: &RequestContext,
    session: &Session,
    values: Option<&MessageInput>,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    let view = FormView {
        entity: "Message",
        mode: FormMode::Create,
        description: "Write to the front desk. We usually answer within the hour.".to_string(),
        action: MESSAGES.to_string(),
        cancel_href: MESSAGES.to_string(),
        fields: vec![
            Field::new("user_id", "", FieldKind::Hidden).value(session.user_id.as_str()),
            Field::new("subject", "Subject", FieldKind::Text)
                .value_from(values, |v| v.subject.clone()),
            Field::new("body", "Message", FieldKind::TextArea)
                .value_from(values, |v| v.body.clone()),
        ],
        error,
    };
    let page = dashboard_page(ctx, session, "messages", &view.heading(), &view.render());
    (status, page).into_response()
}
