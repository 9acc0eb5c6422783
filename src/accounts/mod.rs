use crate::state::AppState;
use axum::Router;

pub mod commands;
pub mod dto;
pub mod entity;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod pg;
pub mod queries;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::account_routes())
}
