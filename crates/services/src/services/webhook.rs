//! Ingestion of messaging-platform webhook deliveries.
//!
//! Each delivery carries a batch of events. Events are processed under their
//! own error boundary so one bad event cannot take down the batch, and the
//! endpoint can always acknowledge receipt. Seen users and groups are
//! deduplicated in the database, keyed by their platform id.

use chrono::{DateTime, Utc};
use db::models::line_contact::{ContactKind, LineContact};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
pub struct WebhookPayload {
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: Option<EventSource>,
    pub message: Option<EventMessage>,
    /// Milliseconds since epoch, per the platform's wire format.
    pub timestamp: Option<i64>,
    #[serde(rename = "replyToken")]
    pub reply_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "groupId")]
    pub group_id: Option<String>,
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub id: Option<String>,
    pub text: Option<String>,
}

/// Summary returned in the webhook acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct WebhookSummary {
    pub processed: u32,
    pub new_users: u32,
    pub new_groups: u32,
    pub updated: u32,
    pub skipped: u32,
    pub failed: u32,
}

enum EventOutcome {
    NewUser,
    NewGroup,
    Updated,
    Skipped,
}

pub struct WebhookService;

impl WebhookService {
    /// Process a webhook delivery. Never fails as a whole: per-event errors
    /// are counted and logged, everything else still goes through.
    pub async fn process(pool: &SqlitePool, payload: &WebhookPayload) -> WebhookSummary {
        let mut summary = WebhookSummary::default();

        for event in &payload.events {
            match Self::handle_event(pool, event).await {
                Ok(EventOutcome::NewUser) => {
                    summary.processed += 1;
                    summary.new_users += 1;
                }
                Ok(EventOutcome::NewGroup) => {
                    summary.processed += 1;
                    summary.new_groups += 1;
                }
                Ok(EventOutcome::Updated) => {
                    summary.processed += 1;
                    summary.updated += 1;
                }
                Ok(EventOutcome::Skipped) => {
                    summary.skipped += 1;
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        event_type = %event.event_type,
                        error = %e,
                        "webhook: failed to process event"
                    );
                }
            }
        }

        debug!(
            processed = summary.processed,
            new_users = summary.new_users,
            new_groups = summary.new_groups,
            skipped = summary.skipped,
            failed = summary.failed,
            "webhook: delivery handled"
        );
        summary
    }

    async fn handle_event(
        pool: &SqlitePool,
        event: &WebhookEvent,
    ) -> Result<EventOutcome, sqlx::Error> {
        // Only message and follow events carry contact information we track.
        if event.event_type != "message" && event.event_type != "follow" {
            return Ok(EventOutcome::Skipped);
        }

        let Some(source) = &event.source else {
            return Ok(EventOutcome::Skipped);
        };

        let (kind, platform_id) = match source.source_type.as_str() {
            "user" => match &source.user_id {
                Some(id) => (ContactKind::User, id.as_str()),
                None => return Ok(EventOutcome::Skipped),
            },
            // Rooms are multi-member chats like groups; track them together.
            "group" | "room" => match source.group_id.as_deref().or(source.room_id.as_deref()) {
                Some(id) => (ContactKind::Group, id),
                None => return Ok(EventOutcome::Skipped),
            },
            _ => return Ok(EventOutcome::Skipped),
        };

        let last_message = event
            .message
            .as_ref()
            .and_then(|m| m.text.as_deref())
            .filter(|t| !t.is_empty());

        let seen_at = event
            .timestamp
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_else(Utc::now);

        let (_, was_new) =
            LineContact::upsert_seen(pool, kind, platform_id, None, last_message, seen_at).await?;

        Ok(match (was_new, kind) {
            (true, ContactKind::User) => EventOutcome::NewUser,
            (true, ContactKind::Group) => EventOutcome::NewGroup,
            (false, _) => EventOutcome::Updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;

    use super::*;

    fn message_event(source_type: &str, id: &str, text: &str) -> serde_json::Value {
        let id_field = if source_type == "user" { "userId" } else { "groupId" };
        serde_json::json!({
            "type": "message",
            "source": { "type": source_type, id_field: id },
            "message": { "type": "text", "id": "m1", "text": text },
            "timestamp": 1700000000000i64
        })
    }

    async fn process(pool: &SqlitePool, events: Vec<serde_json::Value>) -> WebhookSummary {
        let payload: WebhookPayload =
            serde_json::from_value(serde_json::json!({ "events": events })).unwrap();
        WebhookService::process(pool, &payload).await
    }

    #[tokio::test]
    async fn new_user_is_collected_once() {
        let db = DBService::new_in_memory().await.unwrap();

        let summary = process(&db.pool, vec![message_event("user", "U1", "hi")]).await;
        assert_eq!(summary.new_users, 1);
        assert_eq!(summary.processed, 1);

        // Second message from the same user updates, no new row.
        let summary = process(&db.pool, vec![message_event("user", "U1", "again")]).await;
        assert_eq!(summary.new_users, 0);
        assert_eq!(summary.updated, 1);

        let contacts = LineContact::find_by_kind(&db.pool, ContactKind::User)
            .await
            .unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].last_message.as_deref(), Some("again"));
    }

    #[tokio::test]
    async fn rooms_count_as_groups_and_unknown_types_skip() {
        let db = DBService::new_in_memory().await.unwrap();

        let room_event = serde_json::json!({
            "type": "message",
            "source": { "type": "room", "roomId": "R7" },
            "message": { "type": "text", "id": "m2", "text": "room hello" }
        });
        let unfollow = serde_json::json!({
            "type": "unfollow",
            "source": { "type": "user", "userId": "U2" }
        });

        let summary = process(&db.pool, vec![room_event, unfollow]).await;
        assert_eq!(summary.new_groups, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);

        assert_eq!(
            LineContact::count_by_kind(&db.pool, ContactKind::Group).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn follow_event_without_message_is_collected() {
        let db = DBService::new_in_memory().await.unwrap();

        let follow = serde_json::json!({
            "type": "follow",
            "source": { "type": "user", "userId": "U3" },
            "timestamp": 1700000000000i64
        });

        let summary = process(&db.pool, vec![follow]).await;
        assert_eq!(summary.new_users, 1);

        let contact = LineContact::find_by_platform_id(&db.pool, ContactKind::User, "U3")
            .await
            .unwrap()
            .unwrap();
        assert!(contact.last_message.is_none());
    }

    // A storage error on one event must be counted, not abort the batch:
    // the remaining events still get handled and a summary still comes back.
    #[tokio::test]
    async fn failing_event_is_counted_without_aborting_batch() {
        let db = DBService::new_in_memory().await.unwrap();
        sqlx::query("DROP TABLE line_contacts")
            .execute(&db.pool)
            .await
            .unwrap();

        let unfollow = serde_json::json!({
            "type": "unfollow",
            "source": { "type": "user", "userId": "U4" }
        });

        let summary = process(
            &db.pool,
            vec![
                message_event("user", "U5", "hello"),
                unfollow,
                message_event("group", "G5", "hello group"),
            ],
        )
        .await;

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.new_users, 0);
        assert_eq!(summary.new_groups, 0);
    }

    #[tokio::test]
    async fn empty_delivery_yields_empty_summary() {
        let db = DBService::new_in_memory().await.unwrap();
        let summary = process(&db.pool, vec![]).await;
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.failed, 0);
    }
}
