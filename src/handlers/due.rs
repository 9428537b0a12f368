use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::badge_label;
use crate::source::{WordFilter, WordSource};
use crate::srs::{summarize, DueSummary};
use crate::state::AppState;

use super::ApiError;

#[derive(Debug, Serialize)]
pub struct DueResponse {
  #[serde(flatten)]
  pub summary: DueSummary,
  pub due_total: usize,
  pub badge: String,
}

/// GET /due - Counts per due bucket for today
pub async fn due_summary(State(state): State<AppState>) -> Result<Json<DueResponse>, ApiError> {
  let words = state.words.fetch_learning_set(WordFilter::All, None)?;
  let now = state.clock.now_in(state.config.utc_offset);
  let summary = summarize(&words, &now);
  let due_total = summary.due_total();

  Ok(Json(DueResponse {
    summary,
    due_total,
    badge: badge_label(due_total, state.config.badge_cap),
  }))
}
