use utoipa::OpenApi;

pub const HEALTH_TAG: &str = "Health";
pub const NOTIFICATION_TAG: &str = "Notifications";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "pushnote",
        description = "Push notification dispatch over Firebase Cloud Messaging",
    ),
    tags(
        (name = HEALTH_TAG, description = "Liveness endpoint"),
        (name = NOTIFICATION_TAG, description = "Notification dispatch endpoints"),
    )
)]
pub struct ApiDoc;
