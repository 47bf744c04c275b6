//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::notes::Note;
use crate::notes::NoteValues;

use super::Storage;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
///
/// Clones share the same notes. Reads and writes go through a single
/// read/write lock, every write holds the write lock for its full
/// read-modify-write.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All notes in storage
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for Memory {
    fn find_all_notes(&self) -> Vec<Note> {
        let mut notes = self
            .notes
            .read()
            .values()
            .cloned()
            .collect::<Vec<Note>>();

        // sort outside of the lock, the snapshot is ours
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        notes
    }

    fn find_single_note_by_id(&self, id: &Uuid) -> Option<Note> {
        self.notes.read().get(id).cloned()
    }

    fn create_note(&self, values: &NoteValues) -> Note {
        let now = Utc::now();

        let mut notes = self.notes.write();

        loop {
            // a v4 collision is next to impossible, but a live ID is never reused
            if let Entry::Vacant(entry) = notes.entry(Uuid::new_v4()) {
                let note = Note {
                    id: *entry.key(),
                    title: values.title().to_string(),
                    content: values.content().map(ToString::to_string),
                    created_at: now,
                    updated_at: now,
                };

                return entry.insert(note).clone();
            }
        }
    }

    fn update_note(&self, id: &Uuid, values: &NoteValues) -> Option<Note> {
        self.notes.write().get_mut(id).map(|note| {
            note.title = values.title().to_string();
            note.content = values.content().map(ToString::to_string);

            // never move backwards, even when the wall clock does
            note.updated_at = Utc::now().max(note.updated_at);

            note.clone()
        })
    }

    fn delete_note(&self, id: &Uuid) -> Option<Note> {
        self.notes.write().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use crate::notes::validate;

    use super::*;

    fn values(title: &str, content: Option<&str>) -> NoteValues {
        validate(Some(title), content).unwrap()
    }

    #[test]
    fn test_create_and_find() {
        let storage = Memory::new();

        let note = storage.create_note(&values("  A  ", Some("B")));
        assert_eq!("A", note.title);
        assert_eq!(Some("B".to_string()), note.content);
        assert_eq!(note.created_at, note.updated_at);

        let found = storage.find_single_note_by_id(&note.id).unwrap();
        assert_eq!(note, found);
    }

    #[test]
    fn test_unknown_id_changes_nothing() {
        let storage = Memory::new();
        storage.create_note(&values("One", None));
        storage.create_note(&values("Two", Some("content")));

        let before = storage.find_all_notes();

        let unknown = Uuid::new_v4();
        assert_eq!(None, storage.find_single_note_by_id(&unknown));
        assert_eq!(None, storage.update_note(&unknown, &values("Three", None)));
        assert_eq!(None, storage.delete_note(&unknown));

        let after = storage.find_all_notes();
        assert_eq!(before.len(), after.len());
        for note in &before {
            assert!(after.contains(note));
        }
    }

    #[test]
    fn test_update_keeps_identity() {
        let storage = Memory::new();
        let note = storage.create_note(&values("Title", Some("content")));

        let updated = storage
            .update_note(&note.id, &values(" New title ", None))
            .unwrap();
        assert_eq!(note.id, updated.id);
        assert_eq!(note.created_at, updated.created_at);
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!("New title", updated.title);
        assert_eq!(None, updated.content);

        assert_eq!(Some(updated), storage.find_single_note_by_id(&note.id));
    }

    #[test]
    fn test_find_all_is_sorted_by_updated_at() {
        let storage = Memory::new();

        let first = storage.create_note(&values("First", None));
        thread::sleep(std::time::Duration::from_millis(5));
        let second = storage.create_note(&values("Second", None));
        thread::sleep(std::time::Duration::from_millis(5));
        let third = storage.create_note(&values("Third", None));

        let ids = storage
            .find_all_notes()
            .iter()
            .map(|note| note.id)
            .collect::<Vec<Uuid>>();
        assert_eq!(vec![third.id, second.id, first.id], ids);

        // touching the oldest note moves it to the front
        thread::sleep(std::time::Duration::from_millis(5));
        storage.update_note(&first.id, &values("First again", None));

        let notes = storage.find_all_notes();
        assert_eq!(first.id, notes[0].id);
        assert!(
            notes
                .windows(2)
                .all(|pair| pair[0].updated_at >= pair[1].updated_at)
        );
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_writes() {
        let storage = Memory::new();
        let note = storage.create_note(&values("Title", None));

        let snapshot = storage.find_all_notes();

        storage.update_note(&note.id, &values("Changed", None));
        storage.create_note(&values("Another", None));

        assert_eq!(1, snapshot.len());
        assert_eq!("Title", snapshot[0].title);
    }

    #[test]
    fn test_delete_only_once() {
        let storage = Memory::new();
        let note = storage.create_note(&values("Title", None));

        assert_eq!(Some(note.clone()), storage.delete_note(&note.id));
        assert_eq!(None, storage.delete_note(&note.id));
        assert_eq!(None, storage.find_single_note_by_id(&note.id));
        assert_eq!(None, storage.update_note(&note.id, &values("Back", None)));
        assert!(storage.find_all_notes().is_empty());
    }

    #[test]
    fn test_concurrent_creates() {
        let storage = Memory::new();

        let threads = 8;
        let per_thread = 50;

        let ids = thread::scope(|scope| {
            let handles = (0..threads)
                .map(|t| {
                    let storage = storage.clone();
                    scope.spawn(move || {
                        (0..per_thread)
                            .map(|n| {
                                storage
                                    .create_note(&values(&format!("Note {t}-{n}"), None))
                                    .id
                            })
                            .collect::<Vec<Uuid>>()
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect::<Vec<Uuid>>()
        });

        let unique = ids.iter().copied().collect::<HashSet<Uuid>>();
        assert_eq!(threads * per_thread, unique.len());

        let listed = storage
            .find_all_notes()
            .iter()
            .map(|note| note.id)
            .collect::<HashSet<Uuid>>();
        assert_eq!(unique, listed);
    }

    #[test]
    fn test_concurrent_updates_are_never_torn() {
        let storage = Memory::new();
        let id = storage.create_note(&values("0", Some("0"))).id;

        thread::scope(|scope| {
            for t in 0..4 {
                let storage = storage.clone();
                scope.spawn(move || {
                    for n in 0..100 {
                        let marker = format!("{t}-{n}");
                        storage.update_note(&id, &values(&marker, Some(&marker)));
                    }
                });
            }

            let storage = storage.clone();
            scope.spawn(move || {
                for _ in 0..200 {
                    let seen = storage.find_single_note_by_id(&id).unwrap();
                    assert_eq!(Some(seen.title.clone()), seen.content);
                }
            });
        });
    }
}
