use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use shared::{
    domain::User,
    protocol::{ActionResult, LoginInput, RegisterInput},
};
use tracing::{error, info, warn};

use crate::{
    app_state::AppState,
    context::RequestContext,
    layout::render_page,
    session::{clear_cookie, safe_callback},
    views::{Field, FieldKind, FormMode, FormView},
};

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/register", get(register_form).post(register))
        .route("/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    callback_url: Option<String>,
}

async fn login_form(ctx: RequestContext, Query(query): Query<LoginQuery>) -> Response {
    if ctx.session.is_some() {
        return Redirect::to(&safe_callback(query.callback_url.as_deref())).into_response();
    }
    let values = LoginInput {
        callback_url: query.callback_url,
        ..LoginInput::default()
    };
    render_login(&ctx, &values, None, StatusCode::OK)
}

async fn login(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Form(input): Form<LoginInput>,
) -> Response {
    match state.actions.authenticate(&input.email, &input.password).await {
        ActionResult::Ok(user) => {
            let target = safe_callback(input.callback_url.as_deref());
            sign_in(&state, &user, &target)
        }
        ActionResult::NotFound => {
            render_login(&ctx, &input, Some("invalid email or password".to_string()), StatusCode::UNAUTHORIZED)
        }
        ActionResult::Failed(reason) => {
            render_login(&ctx, &input, Some(reason), StatusCode::UNAUTHORIZED)
        }
    }
}

async fn register_form(ctx: RequestContext) -> Response {
    if ctx.session.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    render_register(&ctx, &RegisterInput::default(), None, StatusCode::OK)
}

async fn register(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Form(input): Form<RegisterInput>,
) -> Response {
    match state.actions.register_user(&input).await {
        ActionResult::Ok(user) => sign_in(&state, &user, "/dashboard"),
        other => {
            let reason = other.message().unwrap_or("registration failed").to_string();
            warn!(email = %input.email, %reason, "registration rejected");
            render_register(&ctx, &input, Some(reason), StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

async fn logout(ctx: RequestContext) -> Response {
    if let Some(session) = &ctx.session {
        info!(user = %session.user_id, "signed out");
    }
    ([(header::SET_COOKIE, clear_cookie())], Redirect::to("/")).into_response()
}

fn sign_in(state: &AppState, user: &User, target: &str) -> Response {
    match state.sessions.issue(user) {
        Ok(token) => {
            info!(user = %user.id, role = %user.role, "signed in");
            (
                [(header::SET_COOKIE, state.sessions.set_cookie(&token))],
                Redirect::to(target),
            )
                .into_response()
        }
        Err(err) => {
            error!(user = %user.id, error = %err, "failed to issue session token");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn render_login(
    ctx: &RequestContext,
    values: &LoginInput,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    let view = FormView {
        entity: "Session",
        mode: FormMode::Action {
            heading: "Sign in",
            submit: "Sign in",
        },
        description: "Sign in to manage your stay.".to_string(),
        action: "/login".to_string(),
        cancel_href: "/".to_string(),
        fields: vec![
            Field::new("callbackUrl", "", FieldKind::Hidden)
                .value(values.callback_url.clone().unwrap_or_default()),
            Field::new("email", "Email", FieldKind::Email).value(values.email.clone()),
            Field::new("password", "Password", FieldKind::Password),
        ],
        error,
    };
    let body = format!(
        "{}\n<p>New here? <a href=\"/register\">Create an account</a>.</p>",
        view.render()
    );
    (status, render_page(ctx, "Sign in", &body)).into_response()
}

fn render_register(
    ctx: &RequestContext,
    values: &RegisterInput,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    let view = FormView {
        entity: "Account",
        mode: FormMode::Action {
            heading: "Create an account",
            submit: "Register",
        },
        description: "Create an account to book rooms and message the front desk.".to_string(),
        action: "/register".to_string(),
        cancel_href: "/".to_string(),
        fields: vec![
            Field::new("name", "Full name", FieldKind::Text).value(values.name.clone()),
            Field::new("email", "Email", FieldKind::Email).value(values.email.clone()),
            Field::new("password", "Password", FieldKind::Password),
        ],
        error,
    };
    (status, render_page(ctx, "Register", &view.render())).into_response()
}
