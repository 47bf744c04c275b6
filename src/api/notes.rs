use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::notes::Note;
use crate::notes::NoteValues;
use crate::notes::validate;
use crate::storage::Storage;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NoteResponse {
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    fn from_note_multiple(notes: Vec<Note>) -> Vec<Self> {
        notes.into_iter().map(Self::from_note).collect::<Vec<Self>>()
    }
}

/// Payload to create or update a note
///
/// A missing title is reported by the validation, not by the JSON parsing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteForm {
    title: Option<String>,
    content: Option<String>,
}

impl NoteForm {
    fn validate(&self) -> Result<NoteValues, Error> {
        validate(self.title.as_deref(), self.content.as_deref()).map_err(|err| {
            tracing::debug!("Note rejected: {err}");

            Error::bad_request(err)
        })
    }
}

pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let notes = storage.find_all_notes();

    tracing::debug!("Listing {} notes", notes.len());

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<NoteResponse>, Error> {
    let note_id = parse_note_id(&note_id)?;

    get_note(&storage, &note_id).map(|note| Success::ok(NoteResponse::from_note(note)))
}

pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<NoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let values = form.validate()?;

    let note = storage.create_note(&values);

    tracing::info!("Created note: {}", note.id);

    let location = format!("/api/notes/{}", note.id);

    Ok(Success::created(NoteResponse::from_note(note)).with_location(location))
}

pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<String>,
    Form(form): Form<NoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let note_id = parse_note_id(&note_id)?;

    // an unknown note wins over an invalid payload
    let note = get_note(&storage, &note_id)?;

    let values = form.validate()?;

    let note = storage
        .update_note(&note.id, &values)
        .ok_or_else(note_not_found)?;

    tracing::info!("Updated note: {}", note.id);

    Ok(Success::ok(NoteResponse::from_note(note)))
}

pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<&'static str>, Error> {
    let note_id = parse_note_id(&note_id)?;

    let note = storage
        .delete_note(&note_id)
        .ok_or_else(note_not_found)?;

    tracing::info!("Deleted note: {}", note.id);

    Ok(Success::<&'static str>::no_content())
}

fn get_note<S: Storage>(storage: &S, note_id: &Uuid) -> Result<Note, Error> {
    tracing::debug!("Looking for note: {note_id}");

    storage
        .find_single_note_by_id(note_id)
        .ok_or_else(note_not_found)
}

/// Parse the ID of a note from the path
///
/// Anything that is not a UUID can never be a stored note, so it is not found
fn parse_note_id(note_id: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(note_id).map_err(|err| {
        tracing::debug!("Note ID is not a UUID: {err}");

        note_not_found()
    })
}

fn note_not_found() -> Error {
    Error::not_found("Note not found")
}
