//! Broadcast notifications, gated by the role/audience matrices in `authz`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::authz::{can_create_notification, can_view_notification};
use crate::error::ApiError;
use crate::middleware::Actor;
use crate::models::Notification;
use crate::store::prelude::*;
use crate::types::RecipientType;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationInput {
    pub recipient_type: RecipientType,
    pub subject: String,
    pub message: String,
    pub schedule: Option<DateTime<Utc>>,
}

pub async fn create(
    store: &dyn Store,
    actor: &Actor,
    input: CreateNotificationInput,
) -> Result<Notification, ApiError> {
    if !can_create_notification(actor.role, input.recipient_type) {
        return Err(ApiError::forbidden(format!(
            "{} may not send notifications to this audience",
            actor.role
        )));
    }
    if input.subject.trim().is_empty() {
        return Err(ApiError::validation("subject is required"));
    }
    if input.message.trim().is_empty() {
        return Err(ApiError::validation("message is required"));
    }

    let notification = Notification {
        id: Uuid::new_v4(),
        recipient_type: input.recipient_type,
        subject: input.subject.trim().to_string(),
        message: input.message.trim().to_string(),
        schedule: input.schedule,
        created_by: actor.account,
        created_by_role: actor.role,
        created_at: Utc::now(),
    };
    store.insert_notification(&notification).await?;
    Ok(notification)
}

/// Everything visible to the caller, newest first.
pub async fn list(store: &dyn Store, actor: &Actor) -> Result<Vec<Notification>, ApiError> {
    let visible = store
        .list_notifications()
        .await?
        .into_iter()
        .filter(|n| can_view_notification(actor.role, actor.account, n))
        .collect();
    Ok(visible)
}

pub async fn get(store: &dyn Store, actor: &Actor, id: Uuid) -> Result<Notification, ApiError> {
    let notification = store
        .notification(id)
        .await?
        .ok_or_else(|| ApiError::not_found("notification not found"))?;
    if !can_view_notification(actor.role, actor.account, &notification) {
        return Err(ApiError::forbidden("this notification is not addressed to you"));
    }
    Ok(notification)
}
