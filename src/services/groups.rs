use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Group, Member, MemberUpdate, NewQuestionnaire, Questionnaire, RoundOutcome, RoundStatus,
        Vote, VotingRound,
    },
    services::voting::decide_round,
};

const DUPLICATE_GROUP_NAME: &str = "A group with that name already exists";

/// Questionnaire row as stored; list and object columns hold JSON text
#[derive(sqlx::FromRow)]
struct QuestionnaireRow {
    id: String,
    member_id: String,
    group_id: String,
    budget: i64,
    trip_length: i64,
    eco_priority: i64,
    interests: String,
    deck_responses: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuestionnaireRow> for Questionnaire {
    type Error = AppError;

    fn try_from(row: QuestionnaireRow) -> Result<Self, Self::Error> {
        let corrupt = |e: serde_json::Error| {
            AppError::Internal(format!("Corrupt questionnaire {}: {}", row.id, e))
        };
        let interests = serde_json::from_str(&row.interests).map_err(corrupt)?;
        let deck_responses = serde_json::from_str(&row.deck_responses).map_err(corrupt)?;

        Ok(Questionnaire {
            id: row.id,
            member_id: row.member_id,
            group_id: row.group_id,
            budget: row.budget,
            trip_length: row.trip_length,
            eco_priority: row.eco_priority,
            interests,
            deck_responses,
            created_at: row.created_at,
        })
    }
}

/// Maps a unique-constraint failure on the group name to a 400
fn name_conflict(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return AppError::InvalidInput(DUPLICATE_GROUP_NAME.to_string());
        }
    }
    AppError::Database(error)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Persistence for groups, members, questionnaires and voting rounds
///
/// Lookups scoped to a group return `Ok(None)` when the group, member or
/// round does not exist (or belongs to another group), leaving the 404 to
/// the caller.
#[derive(Clone)]
pub struct GroupStore {
    pool: SqlitePool,
}

impl GroupStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a group together with its initial members, in one transaction
    pub async fn create_group(&self, name: &str, member_names: &[String]) -> AppResult<Group> {
        let group_id = new_id();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO trip_groups (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&group_id)
            .bind(name)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(name_conflict)?;

        for member_name in member_names {
            sqlx::query(
                "INSERT INTO members (id, group_id, name, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(new_id())
            .bind(&group_id)
            .bind(member_name)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(group_id = %group_id, members = member_names.len(), "Group created");

        self.get_group(&group_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Group {} vanished after insert", group_id)))
    }

    /// Groups the member belongs to, newest first
    pub async fn groups_for_member(&self, member_id: &str) -> AppResult<Vec<Group>> {
        let mut groups: Vec<Group> = sqlx::query_as(
            "SELECT g.id, g.name, g.created_at FROM trip_groups g \
             WHERE EXISTS (SELECT 1 FROM members m WHERE m.group_id = g.id AND m.id = ?) \
             ORDER BY g.rowid DESC",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        for group in &mut groups {
            group.members = self.members_of(&group.id).await?;
        }

        Ok(groups)
    }

    pub async fn get_group(&self, group_id: &str) -> AppResult<Option<Group>> {
        let group: Option<Group> =
            sqlx::query_as("SELECT id, name, created_at FROM trip_groups WHERE id = ?")
                .bind(group_id)
                .fetch_optional(&self.pool)
                .await?;

        match group {
            Some(mut group) => {
                group.members = self.members_of(&group.id).await?;
                Ok(Some(group))
            }
            None => Ok(None),
        }
    }

    pub async fn rename_group(&self, group_id: &str, name: &str) -> AppResult<Option<Group>> {
        let result = sqlx::query("UPDATE trip_groups SET name = ? WHERE id = ?")
            .bind(name)
            .bind(group_id)
            .execute(&self.pool)
            .await
            .map_err(name_conflict)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_group(group_id).await
    }

    /// Members of a group in the order they joined
    async fn members_of(&self, group_id: &str) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as(
            "SELECT id, group_id, name, questions_generated_animation, created_at \
             FROM members WHERE group_id = ? ORDER BY rowid",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn get_member(&self, group_id: &str, member_id: &str) -> AppResult<Option<Member>> {
        let member = sqlx::query_as(
            "SELECT id, group_id, name, questions_generated_animation, created_at \
             FROM members WHERE id = ? AND group_id = ?",
        )
        .bind(member_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Every member of every group, by name
    pub async fn all_members(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as(
            "SELECT id, group_id, name, questions_generated_animation, created_at \
             FROM members ORDER BY name ASC, rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn add_member(&self, group_id: &str, name: &str) -> AppResult<Option<Member>> {
        if self.get_group(group_id).await?.is_none() {
            return Ok(None);
        }

        let member_id = new_id();
        sqlx::query("INSERT INTO members (id, group_id, name, created_at) VALUES (?, ?, ?, ?)")
            .bind(&member_id)
            .bind(group_id)
            .bind(name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        tracing::info!(group_id = %group_id, member_id = %member_id, "Member added");

        self.get_member(group_id, &member_id).await
    }

    /// Applies the fields present in `update`
    pub async fn update_member(
        &self,
        group_id: &str,
        member_id: &str,
        update: &MemberUpdate,
    ) -> AppResult<Option<Member>> {
        // COALESCE keeps the current value for fields left out of the update
        let result = sqlx::query(
            "UPDATE members SET \
             name = COALESCE(?, name), \
             questions_generated_animation = COALESCE(?, questions_generated_animation) \
             WHERE id = ? AND group_id = ?",
        )
        .bind(update.name.as_deref())
        .bind(update.questions_generated_animation)
        .bind(member_id)
        .bind(group_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_member(group_id, member_id).await
    }

    /// Removes a member along with their questionnaires and votes
    pub async fn delete_member(&self, group_id: &str, member_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = ? AND group_id = ?")
            .bind(member_id)
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn save_questionnaire(
        &self,
        group_id: &str,
        member_id: &str,
        answers: &NewQuestionnaire,
    ) -> AppResult<Option<Questionnaire>> {
        if self.get_member(group_id, member_id).await?.is_none() {
            return Ok(None);
        }

        let encode = |e: serde_json::Error| AppError::Internal(e.to_string());
        let interests = serde_json::to_string(&answers.interests).map_err(encode)?;
        let deck_responses = serde_json::to_string(&answers.deck_responses).map_err(encode)?;

        let row: QuestionnaireRow = sqlx::query_as(
            "INSERT INTO questionnaires \
             (id, member_id, group_id, budget, trip_length, eco_priority, interests, deck_responses, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(new_id())
        .bind(member_id)
        .bind(group_id)
        .bind(answers.budget)
        .bind(answers.trip_length)
        .bind(answers.eco_priority)
        .bind(interests)
        .bind(deck_responses)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Questionnaire::try_from(row).map(Some)
    }

    /// The member's most recent questionnaire, if any
    pub async fn latest_questionnaire(
        &self,
        group_id: &str,
        member_id: &str,
    ) -> AppResult<Option<Questionnaire>> {
        let row: Option<QuestionnaireRow> = sqlx::query_as(
            "SELECT * FROM questionnaires WHERE member_id = ? AND group_id = ? \
             ORDER BY rowid DESC LIMIT 1",
        )
        .bind(member_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Questionnaire::try_from).transpose()
    }

    pub async fn rounds(&self, group_id: &str) -> AppResult<Vec<VotingRound>> {
        let rounds = sqlx::query_as("SELECT * FROM voting_rounds WHERE group_id = ? ORDER BY number ASC")
            .bind(group_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rounds)
    }

    async fn get_round(&self, group_id: &str, round_id: &str) -> AppResult<Option<VotingRound>> {
        let round = sqlx::query_as("SELECT * FROM voting_rounds WHERE id = ? AND group_id = ?")
            .bind(round_id)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(round)
    }

    /// Opens the next round, numbered one past the group's latest
    pub async fn start_round(&self, group_id: &str) -> AppResult<Option<VotingRound>> {
        if self.get_group(group_id).await?.is_none() {
            return Ok(None);
        }

        let round: VotingRound = sqlx::query_as(
            "INSERT INTO voting_rounds (id, group_id, number, status, started_at) \
             VALUES (?, ?, (SELECT COALESCE(MAX(number), 0) + 1 FROM voting_rounds WHERE group_id = ?), ?, ?) \
             RETURNING *",
        )
        .bind(new_id())
        .bind(group_id)
        .bind(group_id)
        .bind(RoundStatus::Open)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(group_id = %group_id, round = round.number, "Voting round started");

        Ok(Some(round))
    }

    /// Votes of a round in the order they were first cast
    pub async fn votes(&self, group_id: &str, round_id: &str) -> AppResult<Vec<Vote>> {
        let votes = sqlx::query_as(
            "SELECT id, member_id, group_id, round_id, place, value, created_at \
             FROM votes WHERE round_id = ? AND group_id = ? ORDER BY rowid",
        )
        .bind(round_id)
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(votes)
    }

    /// Records a member's vote on a place; voting again replaces the value
    pub async fn cast_vote(
        &self,
        group_id: &str,
        round_id: &str,
        member_id: &str,
        place: &str,
        value: bool,
    ) -> AppResult<Option<Vote>> {
        if self.get_round(group_id, round_id).await?.is_none() {
            return Ok(None);
        }
        if self.get_member(group_id, member_id).await?.is_none() {
            return Err(AppError::InvalidInput(
                "Member does not belong to this group".to_string(),
            ));
        }

        let vote = sqlx::query_as(
            "INSERT INTO votes (id, member_id, group_id, round_id, place, value, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (member_id, round_id, place) \
             DO UPDATE SET value = excluded.value, created_at = excluded.created_at \
             RETURNING id, member_id, group_id, round_id, place, value, created_at",
        )
        .bind(new_id())
        .bind(member_id)
        .bind(group_id)
        .bind(round_id)
        .bind(place)
        .bind(value)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(vote))
    }

    /// Closes a round and records its winner, see [`decide_round`]
    pub async fn close_round(&self, group_id: &str, round_id: &str) -> AppResult<Option<RoundOutcome>> {
        let Some(round) = self.get_round(group_id, round_id).await? else {
            return Ok(None);
        };

        let votes = self.votes(group_id, round_id).await?;
        let member_ids: Vec<String> = self
            .members_of(group_id)
            .await?
            .into_iter()
            .map(|member| member.id)
            .collect();

        // The thread-local rng is dropped before the next await
        let decision = decide_round(round.number, &votes, &member_ids, &mut rand::rng());

        sqlx::query("UPDATE voting_rounds SET status = ?, winner = ?, ended_at = ? WHERE id = ?")
            .bind(decision.status)
            .bind(decision.winner.as_deref())
            .bind(Utc::now())
            .bind(round_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(
            group_id = %group_id,
            round = round.number,
            status = ?decision.status,
            winner = ?decision.winner,
            "Voting round closed"
        );

        Ok(Some(RoundOutcome {
            round_id: round.id,
            number: round.number,
            status: decision.status,
            winner: decision.winner,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use serde_json::json;

    async fn store() -> GroupStore {
        GroupStore::new(create_pool("sqlite::memory:").await.unwrap())
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_create_group_with_members() {
        let store = store().await;

        let group = store.create_group("Lisbon crew", &names(&["Ana", "Ben"])).await.unwrap();

        assert_eq!(group.name, "Lisbon crew");
        let members: Vec<&str> = group.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(members, vec!["Ana", "Ben"]);
        assert!(group.members.iter().all(|m| m.group_id == group.id));
        assert!(!group.members[0].questions_generated_animation);
    }

    #[tokio::test]
    async fn test_duplicate_group_name() {
        let store = store().await;
        store.create_group("Crew", &names(&["Ana"])).await.unwrap();

        let error = store.create_group("Crew", &names(&["Ben"])).await.unwrap_err();

        assert!(matches!(error, AppError::InvalidInput(ref msg) if msg == DUPLICATE_GROUP_NAME));
        // the failed insert left no stray members behind
        assert_eq!(store.all_members().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_groups_for_member_newest_first() {
        let store = store().await;
        let first = store.create_group("First", &names(&["Ana"])).await.unwrap();
        let ana = first.members[0].id.clone();
        store.create_group("Other", &names(&["Ben"])).await.unwrap();

        let groups = store.groups_for_member(&ana).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, first.id);

        assert!(store.groups_for_member("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_missing_group() {
        let store = store().await;
        assert!(store.rename_group("missing", "New").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_member_keeps_unset_fields() {
        let store = store().await;
        let group = store.create_group("Crew", &names(&["Ana"])).await.unwrap();
        let ana = &group.members[0];

        let update = MemberUpdate {
            name: None,
            questions_generated_animation: Some(true),
        };
        let updated = store.update_member(&group.id, &ana.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "Ana");
        assert!(updated.questions_generated_animation);
    }

    #[tokio::test]
    async fn test_member_scoped_to_group() {
        let store = store().await;
        let crew = store.create_group("Crew", &names(&["Ana"])).await.unwrap();
        let other = store.create_group("Other", &names(&["Ben"])).await.unwrap();

        let deleted = store.delete_member(&other.id, &crew.members[0].id).await.unwrap();

        assert!(!deleted);
        assert!(store.delete_member(&crew.id, &crew.members[0].id).await.unwrap());
    }

    #[tokio::test]
    async fn test_latest_questionnaire_wins() {
        let store = store().await;
        let group = store.create_group("Crew", &names(&["Ana"])).await.unwrap();
        let ana = &group.members[0].id;
        let mut answers = NewQuestionnaire {
            budget: 800,
            trip_length: 4,
            eco_priority: 2,
            interests: names(&["beach"]),
            deck_responses: json!({ "sushi": true }),
        };

        assert!(store.latest_questionnaire(&group.id, ana).await.unwrap().is_none());
        store.save_questionnaire(&group.id, ana, &answers).await.unwrap();
        answers.budget = 1200;
        store.save_questionnaire(&group.id, ana, &answers).await.unwrap();

        let latest = store.latest_questionnaire(&group.id, ana).await.unwrap().unwrap();
        assert_eq!(latest.budget, 1200);
        assert_eq!(latest.interests, vec!["beach"]);
        assert_eq!(latest.deck_responses, json!({ "sushi": true }));
    }

    #[tokio::test]
    async fn test_rounds_are_numbered_per_group() {
        let store = store().await;
        let crew = store.create_group("Crew", &names(&["Ana"])).await.unwrap();
        let other = store.create_group("Other", &names(&["Ben"])).await.unwrap();

        store.start_round(&crew.id).await.unwrap();
        let second = store.start_round(&crew.id).await.unwrap().unwrap();
        let elsewhere = store.start_round(&other.id).await.unwrap().unwrap();

        assert_eq!(second.number, 2);
        assert_eq!(second.status, RoundStatus::Open);
        assert_eq!(elsewhere.number, 1);
        assert!(store.start_round("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revote_replaces_value() {
        let store = store().await;
        let group = store.create_group("Crew", &names(&["Ana"])).await.unwrap();
        let ana = &group.members[0].id;
        let round = store.start_round(&group.id).await.unwrap().unwrap();

        store.cast_vote(&group.id, &round.id, ana, "Lima", true).await.unwrap();
        store.cast_vote(&group.id, &round.id, ana, "Lima", false).await.unwrap();

        let votes = store.votes(&group.id, &round.id).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert!(!votes[0].value);
    }

    #[tokio::test]
    async fn test_close_round_records_winner() {
        let store = store().await;
        let group = store.create_group("Crew", &names(&["Ana", "Ben"])).await.unwrap();
        let round = store.start_round(&group.id).await.unwrap().unwrap();
        for member in &group.members {
            store.cast_vote(&group.id, &round.id, &member.id, "Quito", true).await.unwrap();
        }

        let outcome = store.close_round(&group.id, &round.id).await.unwrap().unwrap();
        assert_eq!(outcome.status, RoundStatus::Closed);
        assert_eq!(outcome.winner.as_deref(), Some("Quito"));

        let stored = &store.rounds(&group.id).await.unwrap()[0];
        assert_eq!(stored.status, RoundStatus::Closed);
        assert_eq!(stored.winner.as_deref(), Some("Quito"));
        assert!(stored.ended_at.is_some());
    }

    #[tokio::test]
    async fn test_close_missing_round() {
        let store = store().await;
        let group = store.create_group("Crew", &names(&["Ana"])).await.unwrap();

        assert!(store.close_round(&group.id, "missing").await.unwrap().is_none());
    }
}
