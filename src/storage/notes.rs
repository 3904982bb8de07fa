//! Saved lesson sections
//!
//! All notes live in one JSON array under [`storage_keys::NOTES`]; every
//! mutation rewrites the whole blob.

use chrono::Utc;

use super::database::SharedDatabase;
use crate::constants::storage_keys;
use crate::types::{Level, Note, Result, SectionType};

/// What the learner chose to save
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub topic_id: String,
    pub topic_title: String,
    pub level: Level,
    pub section_type: SectionType,
    pub section_title: String,
    pub content: String,
}

pub struct NoteBook {
    db: SharedDatabase,
}

impl NoteBook {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// All notes, oldest first
    pub fn list(&self) -> Result<Vec<Note>> {
        Ok(self
            .db
            .get_json::<Vec<Note>>(storage_keys::NOTES)?
            .unwrap_or_default())
    }

    pub fn for_topic(&self, topic_id: &str) -> Result<Vec<Note>> {
        let mut notes = self.list()?;
        notes.retain(|n| n.topic_id == topic_id);
        Ok(notes)
    }

    pub fn add(&self, draft: NoteDraft) -> Result<Note> {
        let saved_at = Utc::now();
        let note = Note {
            id: format!(
                "{}-{}-{}-{}",
                draft.topic_id,
                draft.level,
                draft.section_type,
                saved_at.timestamp_millis()
            ),
            topic_id: draft.topic_id,
            topic_title: draft.topic_title,
            level: draft.level,
            section_type: draft.section_type,
            section_title: draft.section_title,
            content: draft.content,
            saved_at,
        };

        let mut notes = self.list()?;
        notes.push(note.clone());
        self.save(&notes)?;
        Ok(note)
    }

    /// Returns true when a note with this id existed
    pub fn remove(&self, note_id: &str) -> Result<bool> {
        let mut notes = self.list()?;
        let before = notes.len();
        notes.retain(|n| n.id != note_id);
        if notes.len() == before {
            return Ok(false);
        }
        self.save(&notes)?;
        Ok(true)
    }

    pub fn find(
        &self,
        topic_id: &str,
        level: Level,
        section_type: &SectionType,
    ) -> Result<Option<Note>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|n| n.matches(topic_id, level, section_type)))
    }

    pub fn is_saved(&self, topic_id: &str, level: Level, section_type: &SectionType) -> Result<bool> {
        Ok(self.find(topic_id, level, section_type)?.is_some())
    }

    /// Save the section if it is not saved yet, otherwise remove it.
    ///
    /// Returns true when the note was added.
    pub fn toggle(&self, draft: NoteDraft) -> Result<bool> {
        match self.find(&draft.topic_id, draft.level, &draft.section_type)? {
            Some(existing) => {
                self.remove(&existing.id)?;
                Ok(false)
            }
            None => {
                self.add(draft)?;
                Ok(true)
            }
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }

    fn save(&self, notes: &[Note]) -> Result<()> {
        self.db.set_json(storage_keys::NOTES, notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use std::sync::Arc;

    fn notebook() -> NoteBook {
        NoteBook::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn draft(topic: &str, level: Level, kind: SectionType) -> NoteDraft {
        NoteDraft {
            topic_id: topic.to_string(),
            topic_title: "Value Equation".to_string(),
            level,
            section_type: kind,
            section_title: "Key Concept".to_string(),
            content: "Dream outcome x likelihood".to_string(),
        }
    }

    #[test]
    fn test_add_builds_id_and_persists() {
        let book = notebook();
        let note = book
            .add(draft("m0-t2", Level::Basic, SectionType::Concept))
            .unwrap();

        assert!(note.id.starts_with("m0-t2-basic-concept-"));
        assert_eq!(book.list().unwrap(), vec![note]);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let book = notebook();
        let d = draft("m0-t2", Level::Advanced, SectionType::CaseStudy);

        assert!(book.toggle(d.clone()).unwrap());
        assert!(book
            .is_saved("m0-t2", Level::Advanced, &SectionType::CaseStudy)
            .unwrap());
        // Same section at the other level is a different note
        assert!(!book
            .is_saved("m0-t2", Level::Basic, &SectionType::CaseStudy)
            .unwrap());

        assert!(!book.toggle(d).unwrap());
        assert!(book.list().unwrap().is_empty());
    }

    #[test]
    fn test_filters_and_remove() {
        let book = notebook();
        let a = book
            .add(draft("m0-t1", Level::Basic, SectionType::Concept))
            .unwrap();
        book.add(draft("m0-t1", Level::Basic, SectionType::Why))
            .unwrap();
        book.add(draft("m3-t2", Level::Basic, SectionType::Concept))
            .unwrap();

        assert_eq!(book.for_topic("m0-t1").unwrap().len(), 2);
        assert_eq!(
            book.find("m3-t2", Level::Basic, &SectionType::Concept)
                .unwrap()
                .map(|n| n.topic_id),
            Some("m3-t2".to_string())
        );

        assert!(book.remove(&a.id).unwrap());
        assert!(!book.remove(&a.id).unwrap());
        assert_eq!(book.for_topic("m0-t1").unwrap().len(), 1);
    }

    #[test]
    fn test_clear() {
        let book = notebook();
        book.add(draft("m0-t1", Level::Basic, SectionType::Concept))
            .unwrap();
        book.clear().unwrap();
        assert!(book.list().unwrap().is_empty());
    }
}
