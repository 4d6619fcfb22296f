use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{
        CreateGroupRequest, Group, Member, MemberQuery, MemberUpdate, NameRequest, Questionnaire,
        QuestionnaireRequest, RoundOutcome, Vote, VoteRequest, VotingRound,
    },
    routes::{extract::AppJson, AppState},
};

/// Treats a missing or empty string as absent
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn group_not_found() -> AppError {
    AppError::NotFound("Group not found".to_string())
}

fn member_not_found() -> AppError {
    AppError::NotFound("Member not found".to_string())
}

fn round_not_found() -> AppError {
    AppError::NotFound("Round not found".to_string())
}

/// Lists the groups a member belongs to; no `memberId` means no groups
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MemberQuery>,
) -> AppResult<Json<Vec<Group>>> {
    let Some(member_id) = required(query.member_id) else {
        return Ok(Json(Vec::new()));
    };

    let groups = state.groups.groups_for_member(&member_id).await?;
    Ok(Json(groups))
}

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<CreateGroupRequest>,
) -> AppResult<Json<Group>> {
    let name = required(request.group_name)
        .filter(|_| !request.members.is_empty())
        .ok_or_else(|| AppError::InvalidInput("groupName and members are required".to_string()))?;

    let group = state.groups.create_group(&name, &request.members).await?;

    tracing::info!(request_id = %request_id, group_id = %group.id, "Group created via API");

    Ok(Json(group))
}

pub async fn get_group(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> AppResult<Json<Group>> {
    let group = state.groups.get_group(&group_id).await?.ok_or_else(group_not_found)?;
    Ok(Json(group))
}

pub async fn rename_group(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
    AppJson(request): AppJson<NameRequest>,
) -> AppResult<Json<Group>> {
    let name = required(request.name)
        .ok_or_else(|| AppError::InvalidInput("Name is required".to_string()))?;

    let group = state
        .groups
        .rename_group(&group_id, &name)
        .await?
        .ok_or_else(group_not_found)?;

    Ok(Json(group))
}

pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
    AppJson(request): AppJson<NameRequest>,
) -> AppResult<Json<Member>> {
    let name = required(request.name)
        .ok_or_else(|| AppError::InvalidInput("Member name is required".to_string()))?;

    let member = state
        .groups
        .add_member(&group_id, &name)
        .await?
        .ok_or_else(group_not_found)?;

    Ok(Json(member))
}

pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path((group_id, member_id)): Path<(String, String)>,
    AppJson(update): AppJson<MemberUpdate>,
) -> AppResult<Json<Member>> {
    if update.is_empty() {
        return Err(AppError::InvalidInput("Nothing to update".to_string()));
    }

    let member = state
        .groups
        .update_member(&group_id, &member_id, &update)
        .await?
        .ok_or_else(member_not_found)?;

    Ok(Json(member))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path((group_id, member_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    if !state.groups.delete_member(&group_id, &member_id).await? {
        return Err(member_not_found());
    }

    Ok(Json(json!({ "success": true })))
}

/// Every member across all groups, sorted by name
pub async fn list_users(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Member>>> {
    let members = state.groups.all_members().await?;
    Ok(Json(members))
}

pub async fn save_questionnaire(
    State(state): State<Arc<AppState>>,
    Path((group_id, member_id)): Path<(String, String)>,
    AppJson(request): AppJson<QuestionnaireRequest>,
) -> AppResult<Json<Questionnaire>> {
    let answers = request.validate().ok_or_else(|| {
        AppError::InvalidInput("budget, tripLength and deckResponses are required".to_string())
    })?;

    let questionnaire = state
        .groups
        .save_questionnaire(&group_id, &member_id, &answers)
        .await?
        .ok_or_else(member_not_found)?;

    Ok(Json(questionnaire))
}

/// The member's latest questionnaire, or 204 when they have not answered yet
pub async fn get_questionnaire(
    State(state): State<Arc<AppState>>,
    Path((group_id, member_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let response = match state.groups.latest_questionnaire(&group_id, &member_id).await? {
        Some(questionnaire) => Json(questionnaire).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

pub async fn list_rounds(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> AppResult<Json<Vec<VotingRound>>> {
    let rounds = state.groups.rounds(&group_id).await?;
    Ok(Json(rounds))
}

pub async fn start_round(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(group_id): Path<String>,
) -> AppResult<Json<VotingRound>> {
    let round = state.groups.start_round(&group_id).await?.ok_or_else(group_not_found)?;

    tracing::info!(request_id = %request_id, round = round.number, "Round opened via API");

    Ok(Json(round))
}

pub async fn list_votes(
    State(state): State<Arc<AppState>>,
    Path((group_id, round_id)): Path<(String, String)>,
) -> AppResult<Json<Vec<Vote>>> {
    let votes = state.groups.votes(&group_id, &round_id).await?;
    Ok(Json(votes))
}

pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Path((group_id, round_id)): Path<(String, String)>,
    AppJson(request): AppJson<VoteRequest>,
) -> AppResult<Json<Vote>> {
    let missing = || AppError::InvalidInput("memberId, place, and value are required".to_string());
    let member_id = required(request.member_id).ok_or_else(missing)?;
    let place = required(request.place).ok_or_else(missing)?;
    let value = request.value.ok_or_else(missing)?;

    let vote = state
        .groups
        .cast_vote(&group_id, &round_id, &member_id, &place, value)
        .await?
        .ok_or_else(round_not_found)?;

    Ok(Json(vote))
}

/// Closes a round: unanimous place wins, later rounds fall back to a coin toss
pub async fn close_round(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((group_id, round_id)): Path<(String, String)>,
) -> AppResult<Json<RoundOutcome>> {
    let outcome = state
        .groups
        .close_round(&group_id, &round_id)
        .await?
        .ok_or_else(round_not_found)?;

    tracing::info!(
        request_id = %request_id,
        round_id = %outcome.round_id,
        status = ?outcome.status,
        "Round closed via API"
    );

    Ok(Json(outcome))
}
