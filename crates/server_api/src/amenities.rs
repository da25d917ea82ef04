use shared::{
    domain::{Activity, ActivityId, Service, ServiceId},
    protocol::{ActionResult, ActivityInput, ServiceInput},
};
use tracing::info;

use crate::{internal, listing, lookup, removal, ApiContext};

pub async fn get_activity_by_id(ctx: &ApiContext, id: &ActivityId) -> ActionResult<Activity> {
    lookup("load activity", ctx.storage.load_activity(id).await)
}

pub async fn get_all_activities(ctx: &ApiContext) -> ActionResult<Vec<Activity>> {
    listing("list activities", ctx.storage.list_activities().await)
}

pub async fn create_activity(ctx: &ApiContext, input: &ActivityInput) -> ActionResult<Activity> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    match ctx.storage.insert_activity(input).await {
        Ok(activity) => {
            info!(activity_id = %activity.id, starts_at = %activity.starts_at, "activity scheduled");
            ActionResult::Ok(activity)
        }
        Err(err) => internal("create activity", err),
    }
}

pub async fn update_activity(
    ctx: &ApiContext,
    id: &ActivityId,
    input: &ActivityInput,
) -> ActionResult<Activity> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    lookup("update activity", ctx.storage.update_activity(id, input).await)
}

pub async fn delete_activity(ctx: &ApiContext, id: &ActivityId) -> ActionResult<()> {
    removal("delete activity", ctx.storage.delete_activity(id).await)
}

pub async fn get_service_by_id(ctx: &ApiContext, id: &ServiceId) -> ActionResult<Service> {
    lookup("load service", ctx.storage.load_service(id).await)
}

pub async fn get_all_services(ctx: &ApiContext) -> ActionResult<Vec<Service>> {
    listing("list services", ctx.storage.list_services().await)
}

pub async fn create_service(ctx: &ApiContext, input: &ServiceInput) -> ActionResult<Service> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    match ctx.storage.insert_service(input).await {
        Ok(service) => {
            info!(service_id = %service.id, "service created");
            ActionResult::Ok(service)
        }
        Err(err) => internal("create service", err),
    }
}

pub async fn update_service(
    ctx: &ApiContext,
    id: &ServiceId,
    input: &ServiceInput,
) -> ActionResult<Service> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    lookup("update service", ctx.storage.update_service(id, input).await)
}

pub async fn delete_service(ctx: &ApiContext, id: &ServiceId) -> ActionResult<()> {
    removal("delete service", ctx.storage.delete_service(id).await)
}
