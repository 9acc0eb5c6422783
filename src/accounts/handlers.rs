use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRef, Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    commands::{
        CreateAccountCommand, CreateAccountHandler, DeleteAccountCommand, DeleteAccountHandler,
        SetAccountActiveCommand, SetAccountActiveHandler, UpdateAccountCommand,
        UpdateAccountHandler,
    },
    dto::{AccountResponse, CreateAccountRequest, UpdateAccountRequest},
    queries::{GetAccountHandler, GetAccountQuery, GetAccountsHandler, GetAccountsQuery},
};
use crate::{auth::jwt::AuthUser, errors::AppResult, state::AppState};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_account).get(list_accounts))
        .route(
            "/users/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/users/:id/activate", post(activate_account))
        .route("/users/:id/deactivate", post(deactivate_account))
}

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let payload = payload.validate()?;
    let account = CreateAccountHandler::from_ref(&state)
        .execute(CreateAccountCommand {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    let location = format!("/users/{}", account.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(AccountResponse::from(account)),
    ))
}

#[instrument(skip(state, _auth))]
pub async fn list_accounts(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<AccountResponse>>> {
    let accounts = GetAccountsHandler::from_ref(&state)
        .execute(GetAccountsQuery)
        .await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

#[instrument(skip_all)]
pub async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<AccountResponse>> {
    let Path(id) = path?;
    let account = GetAccountHandler::from_ref(&state)
        .execute(GetAccountQuery { id })
        .await?;
    Ok(Json(account.into()))
}

#[instrument(skip(state, path, payload), fields(caller = %auth.id))]
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> AppResult<Json<AccountResponse>> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let payload = payload.validate()?;
    let account = UpdateAccountHandler::from_ref(&state)
        .execute(UpdateAccountCommand {
            id,
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;
    Ok(Json(account.into()))
}

#[instrument(skip(state, path), fields(caller = %auth.id))]
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    DeleteAccountHandler::from_ref(&state)
        .execute(DeleteAccountCommand { id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_active(state: &AppState, id: Uuid, active: bool) -> AppResult<Json<AccountResponse>> {
    let account = SetAccountActiveHandler::from_ref(state)
        .execute(SetAccountActiveCommand { id, active })
        .await?;
    Ok(Json(account.into()))
}

#[instrument(skip(state, path), fields(caller = %auth.id))]
pub async fn activate_account(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<AccountResponse>> {
    let Path(id) = path?;
    set_active(&state, id, true).await
}

#[instrument(skip(state, path), fields(caller = %auth.id))]
pub async fn deactivate_account(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<AccountResponse>> {
    let Path(id) = path?;
    set_active(&state, id, false).await
}
