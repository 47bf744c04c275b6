//! All things related to the storage of notes

use uuid::Uuid;

use crate::notes::Note;
use crate::notes::NoteValues;
use crate::notes::validate;

pub use memory::Memory;

mod memory;

/// Title of the note seeded at startup
pub const SAMPLE_NOTE_TITLE: &str = "Welcome Note";

/// Content of the note seeded at startup
pub const SAMPLE_NOTE_CONTENT: &str = "This is a sample note created at startup.";

/// Storage configuration
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Seed the storage with a single welcome note
    pub seed_sample_note: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_sample_note: true,
        }
    }
}

/// Setup the storage
pub fn setup(config: Config) -> Memory {
    let storage = Memory::new();

    if config.seed_sample_note {
        let values = validate(Some(SAMPLE_NOTE_TITLE), Some(SAMPLE_NOTE_CONTENT))
            .expect("Valid sample note");

        let note = storage.create_note(&values);

        tracing::debug!("Seeded sample note: {}", note.id);
    }

    storage
}

/// Storage with all supported operations
///
/// Safe to share between concurrent requests, none of the operations need
/// external locking. Missing notes are reported as `None`, never as an error.
pub trait Storage: Clone + Send + Sync + 'static {
    /// Snapshot of all notes, most recently updated first
    fn find_all_notes(&self) -> Vec<Note>;

    /// Find a single note by its ID
    fn find_single_note_by_id(&self, id: &Uuid) -> Option<Note>;

    /// Create a note with a fresh ID
    fn create_note(&self, values: &NoteValues) -> Note;

    /// Replace title and content of a note
    ///
    /// `None` when the note does not exist, nothing is changed in that case
    fn update_note(&self, id: &Uuid, values: &NoteValues) -> Option<Note>;

    /// Remove a note for good
    ///
    /// Returns the removed note, `None` when there was nothing to remove
    fn delete_note(&self, id: &Uuid) -> Option<Note>;
}
