use shared::{
    domain::{Role, User},
    protocol::{ActionResult, RegisterInput},
};
use tracing::{info, warn};

use crate::{internal, ApiContext};

pub async fn authenticate(ctx: &ApiContext, email: &str, password: &str) -> ActionResult<User> {
    if email.trim().is_empty() || password.is_empty() {
        return ActionResult::failed("email and password are required");
    }

    match ctx.storage.verify_credentials(email, password).await {
        Ok(Some(user)) => {
            info!(user_id = %user.id, role = %user.role, "user signed in");
            ActionResult::Ok(user)
        }
        Ok(None) => {
            warn!(email = %email.trim(), "rejected sign-in attempt");
            ActionResult::failed("invalid email or password")
        }
        Err(err) => internal("sign in", err),
    }
}

/// Self-service sign-up always creates a guest account.
pub async fn register_user(ctx: &ApiContext, input: &RegisterInput) -> ActionResult<User> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    match ctx.storage.email_taken(&input.email).await {
        Ok(true) => return ActionResult::failed("an account with this email already exists"),
        Ok(false) => {}
        Err(err) => return internal("register", err),
    }

    match ctx
        .storage
        .create_user(&input.email, &input.name, Role::Guest, &input.password)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "guest account registered");
            ActionResult::Ok(user)
        }
        Err(err) => internal("register", err),
    }
}
