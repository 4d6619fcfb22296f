use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A travel group; `members` is filled in by the store after the row is read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub group_id: String,
    pub name: String,
    /// Set by the frontend once it has played the "questions ready" animation
    pub questions_generated_animation: bool,
    pub created_at: DateTime<Utc>,
}

/// A member's answers to the trip questionnaire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: String,
    pub member_id: String,
    pub group_id: String,
    pub budget: i64,
    pub trip_length: i64,
    pub eco_priority: i64,
    pub interests: Vec<String>,
    /// Swipe-deck answers, stored as the client sent them
    pub deck_responses: Value,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a voting round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    Open,
    Closed,
    /// Closed without consensus; the winner was drawn at random
    CoinToss,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VotingRound {
    pub id: String,
    pub group_id: String,
    /// 1-based position of the round within its group
    pub number: i64,
    pub status: RoundStatus,
    pub winner: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// One member's yes/no on one place in one round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub member_id: String,
    pub group_id: String,
    pub round_id: String,
    pub place: String,
    pub value: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of closing a round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    pub round_id: String,
    pub number: i64,
    pub status: RoundStatus,
    pub winner: Option<String>,
}

/// Request bodies. Required fields are `Option` so a missing one is reported
/// with the endpoint's own 400 message rather than a deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub group_name: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Body of a rename or add-member request
#[derive(Debug, Default, Deserialize)]
pub struct NameRequest {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub questions_generated_animation: Option<bool>,
}

impl MemberUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.questions_generated_animation.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireRequest {
    pub budget: Option<i64>,
    pub trip_length: Option<i64>,
    pub deck_responses: Option<Value>,
    #[serde(default)]
    pub eco_priority: i64,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Validated questionnaire answers, ready to store
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestionnaire {
    pub budget: i64,
    pub trip_length: i64,
    pub eco_priority: i64,
    pub interests: Vec<String>,
    pub deck_responses: Value,
}

impl QuestionnaireRequest {
    /// `None` when budget or trip length is missing, or the deck responses
    /// are not an object or array
    pub fn validate(self) -> Option<NewQuestionnaire> {
        Some(NewQuestionnaire {
            budget: self.budget?,
            trip_length: self.trip_length?,
            deck_responses: self
                .deck_responses
                .filter(|v| v.is_object() || v.is_array())?,
            eco_priority: self.eco_priority,
            interests: self.interests,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub member_id: Option<String>,
    pub place: Option<String>,
    pub value: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    pub member_id: Option<String>,
}
