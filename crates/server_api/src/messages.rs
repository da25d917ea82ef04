use shared::{
    domain::{Message, MessageId, UserId},
    protocol::{ActionResult, MessageInput},
};
use tracing::info;

use crate::{internal, listing, removal, ApiContext};

pub async fn get_messages(ctx: &ApiContext, author: Option<&UserId>) -> ActionResult<Vec<Message>> {
    listing("list messages", ctx.storage.list_messages(author).await)
}

pub async fn create_message(
    ctx: &ApiContext,
    user_id: &UserId,
    input: &MessageInput,
) -> ActionResult<Message> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    match ctx.storage.insert_message(user_id, input).await {
        Ok(message) => {
            info!(message_id = %message.id, user_id = %user_id, "message received");
            ActionResult::Ok(message)
        }
        Err(err) => internal("send message", err),
    }
}

pub async fn delete_message(ctx: &ApiContext, id: &MessageId) -> ActionResult<()> {
    removal("delete message", ctx.storage.delete_message(id).await)
}
