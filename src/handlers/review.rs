//! Review session endpoints.
//!
//! The session itself lives in the in-memory store; the browser only carries
//! its id in the `review_session` cookie.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

use crate::domain::{FrontSide, GradeResult, ReviewEntry, StudyMode, Word, WordId};
use crate::session::generate_session_id;
use crate::source::{WordFilter, WordSource};
use crate::srs::{due_today, Phase, ReviewSession, SessionError, SessionSummary};
use crate::state::AppState;

use super::ApiError;

pub const REVIEW_COOKIE_NAME: &str = "review_session";

// ==================== Request bodies ====================

#[derive(Debug, Deserialize)]
pub struct StartRequest {
  #[serde(default)]
  pub mode: StudyMode,
  #[serde(default)]
  pub front_side: FrontSide,
  #[serde(default)]
  pub filter: WordFilter,
  pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
  pub card_id: WordId,
  pub result: GradeResult,
  /// Defaults to the session's own flip state
  pub was_flipped: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
  pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct ReconfigureRequest {
  pub mode: Option<StudyMode>,
  pub front_side: Option<FrontSide>,
}

// ==================== Responses ====================

#[derive(Debug, Serialize)]
pub struct CardView {
  pub id: WordId,
  pub prompt: String,
  /// Hidden until the card is flipped or a miss is being acknowledged
  pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
  pub phase: Phase,
  pub mode: StudyMode,
  pub front_side: FrontSide,
  pub round: u32,
  pub completed: usize,
  pub total: usize,
  pub is_flipped: bool,
  pub pending_answer: String,
  pub card: Option<CardView>,
  /// Most recent grade this round
  pub last: Option<ReviewEntry>,
  pub summary: Option<SessionSummary>,
}

impl From<&ReviewSession> for SessionView {
  fn from(session: &ReviewSession) -> Self {
    let reveal = session.is_flipped() || session.phase() == Phase::AwaitingRetryAck;
    let (completed, total) = session.progress();
    Self {
      phase: session.phase(),
      mode: session.mode(),
      front_side: session.front_side(),
      round: session.round(),
      completed,
      total,
      is_flipped: session.is_flipped(),
      pending_answer: session.pending_answer().to_string(),
      card: session.current_card().map(|card| CardView {
        id: card.id,
        prompt: card.prompt.clone(),
        answer: reveal.then(|| card.answer.clone()),
      }),
      last: session.log().last().cloned(),
      summary: session.summary(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ExitResponse {
  pub summary: Option<SessionSummary>,
}

// ==================== Helpers ====================

fn session_id(jar: &CookieJar) -> Result<String, ApiError> {
  jar
    .get(REVIEW_COOKIE_NAME)
    .map(|c| c.value().to_string())
    .ok_or(ApiError::NoSession)
}

/// Apply `f` to the cookie's session and render the result
fn update<F>(state: &AppState, jar: &CookieJar, f: F) -> Result<Json<SessionView>, ApiError>
where
  F: FnOnce(&mut ReviewSession) -> Result<(), SessionError>,
{
  let id = session_id(jar)?;
  let view = state
    .sessions
    .with_session(&id, |session| -> Result<SessionView, SessionError> {
      f(session)?;
      Ok(SessionView::from(&*session))
    })
    .ok_or(ApiError::NoSession)??;
  Ok(Json(view))
}

/// Learning set for a new session. Scheduled words are narrowed to those due today.
fn learning_set(state: &AppState, filter: WordFilter, limit: Option<usize>) -> Result<Vec<Word>, ApiError> {
  if filter != WordFilter::Scheduled {
    return Ok(state.words.fetch_learning_set(filter, limit)?);
  }

  let words = state.words.fetch_learning_set(filter, None)?;
  let now = state.clock.now_in(state.config.utc_offset);
  let mut due: Vec<Word> = due_today(&words, &now).into_iter().cloned().collect();
  if let Some(limit) = limit {
    due.truncate(limit);
  }
  Ok(due)
}

// ==================== Handlers ====================

/// POST /session/start - Build a deck and open a new session
pub async fn start_session(
  State(state): State<AppState>,
  jar: CookieJar,
  Json(request): Json<StartRequest>,
) -> Result<(CookieJar, Json<SessionView>), ApiError> {
  // Give previously failed result writes another chance
  state.recorder.flush();

  let words = learning_set(&state, request.filter, request.limit)?;
  let session = ReviewSession::start(&words, request.mode, request.front_side, state.collaborators())?;
  let view = SessionView::from(&session);

  if let Ok(old_id) = session_id(&jar) {
    state.sessions.remove(&old_id);
  }
  let id = generate_session_id();
  state.sessions.insert(&id, session);

  let cookie = Cookie::build((REVIEW_COOKIE_NAME, id))
    .path("/")
    .http_only(true)
    .build();

  Ok((jar.add(cookie), Json(view)))
}

/// GET /session - Current session state
pub async fn get_session(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<Json<SessionView>, ApiError> {
  update(&state, &jar, |_| Ok(()))
}

/// POST /session/flip
pub async fn flip(State(state): State<AppState>, jar: CookieJar) -> Result<Json<SessionView>, ApiError> {
  update(&state, &jar, |session| {
    session.flip();
    Ok(())
  })
}

/// POST /session/grade - Self-graded flashcard result (flashcard mode only)
pub async fn grade(
  State(state): State<AppState>,
  jar: CookieJar,
  Json(request): Json<GradeRequest>,
) -> Result<Json<SessionView>, ApiError> {
  update(&state, &jar, |session| {
    let was_flipped = request.was_flipped.unwrap_or(session.is_flipped());
    session.grade(request.card_id, request.result, was_flipped)?;
    Ok(())
  })
}

/// POST /session/answer - Typed answer in writing mode
pub async fn answer(
  State(state): State<AppState>,
  jar: CookieJar,
  Json(request): Json<AnswerRequest>,
) -> Result<Json<SessionView>, ApiError> {
  update(&state, &jar, |session| {
    session.set_pending_answer(&request.input);
    session.submit_answer()?;
    Ok(())
  })
}

/// POST /session/next - Acknowledge a missed card
pub async fn next(State(state): State<AppState>, jar: CookieJar) -> Result<Json<SessionView>, ApiError> {
  update(&state, &jar, |session| {
    session.next()?;
    Ok(())
  })
}

/// POST /session/retry - Start a new round over missed cards
pub async fn retry(State(state): State<AppState>, jar: CookieJar) -> Result<Json<SessionView>, ApiError> {
  update(&state, &jar, |session| {
    *session = session.restart_with_incorrect()?;
    Ok(())
  })
}

/// POST /session/reconfigure - Switch mode or front side, restarting the deck
pub async fn reconfigure(
  State(state): State<AppState>,
  jar: CookieJar,
  Json(request): Json<ReconfigureRequest>,
) -> Result<Json<SessionView>, ApiError> {
  update(&state, &jar, |session| {
    let mode = request.mode.unwrap_or(session.mode());
    let front_side = request.front_side.unwrap_or(session.front_side());
    *session = session.reconfigure(mode, front_side)?;
    Ok(())
  })
}

/// POST /session/exit - Drop the session
pub async fn exit_session(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<(CookieJar, Json<ExitResponse>), ApiError> {
  let id = session_id(&jar)?;
  let session = state.sessions.remove(&id).ok_or(ApiError::NoSession)?;
  let summary = session.exit();

  let cookie = Cookie::build((REVIEW_COOKIE_NAME, "")).path("/").build();
  Ok((jar.remove(cookie), Json(ExitResponse { summary })))
}
