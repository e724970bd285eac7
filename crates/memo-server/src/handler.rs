//! Request handlers for the `/api` routes.
//!
//! Every successful response carries `201 Created`, reads included; clients
//! of the original API rely on that status.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use memo_types::{NoteList, Word, WordList};
use tracing::info;

use crate::error::ServerResult;
use crate::state::AppState;

type Created<T> = (StatusCode, Json<T>);

fn created<T>(value: T) -> Created<T> {
    (StatusCode::CREATED, Json(value))
}

/// `GET /api/word`
pub async fn list_words(State(state): State<AppState>) -> ServerResult<Created<WordList>> {
    let words = state.run(|m| m.load::<WordList>()).await?;
    Ok(created(words))
}

/// `POST /api/word`
pub async fn add_word(
    State(state): State<AppState>,
    payload: Result<Json<Word>, JsonRejection>,
) -> ServerResult<Created<WordList>> {
    let Json(word) = payload?;
    let words = state
        .run(move |m| {
            m.apply::<WordList, _>(|list| {
                if list.add_if_absent(word.clone()) {
                    info!(word = %word, "word added");
                }
            })
        })
        .await?;
    Ok(created(words))
}

/// `DELETE /api/word`
pub async fn remove_word(
    State(state): State<AppState>,
    payload: Result<Json<Word>, JsonRejection>,
) -> ServerResult<Created<WordList>> {
    let Json(word) = payload?;
    let words = state
        .run(move |m| {
            m.apply::<WordList, _>(|list| {
                let removed = list.remove_matching(&word.name);
                if removed > 0 {
                    info!(word = %word, removed, "word removed");
                }
            })
        })
        .await?;
    Ok(created(words))
}

/// `GET /api/note`
pub async fn list_notes(State(state): State<AppState>) -> ServerResult<Created<NoteList>> {
    let notes = state.run(|m| m.load::<NoteList>()).await?;
    Ok(created(notes))
}

/// `PUT /api/note` with the whole note set as blank-line separated text.
///
/// Invalid UTF-8 in the body is replaced with U+FFFD rather than rejected.
pub async fn replace_notes(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Created<NoteList>> {
    let body = body?;
    let notes = NoteList::from_text(&String::from_utf8_lossy(&body));
    let count = notes.len();
    let notes = state.run(move |m| m.replace(notes)).await?;
    info!(count, "notes replaced");
    Ok(created(notes))
}
