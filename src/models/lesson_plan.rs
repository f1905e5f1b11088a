use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of time slots per weekend day.
pub const TIME_SLOTS: usize = 5;
/// Number of topic cells in the plan grid.
pub const TOPIC_CELLS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanHead {
    pub banner_title: String,
    pub program_name: String,
    pub week_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonCell {
    pub text: String,
}

/// A weekend lesson plan grid: 5 Saturday slots, 5 Sunday slots, 10 topic
/// cells. Never hard-deleted; `is_active = false` hides it from lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub id: Uuid,
    /// Account id of the creator; plans are creator-scoped.
    pub created_by: Uuid,
    pub head: LessonPlanHead,
    pub times_sat: Vec<String>,
    pub times_sun: Vec<String>,
    pub cells: Vec<LessonCell>,
    pub is_active: bool,
    pub saved_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
