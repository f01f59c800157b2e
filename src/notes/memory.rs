/// Process-lifetime note store
use super::types::DrugInteractionNote;
use super::NoteRepository;
use crate::logger::{self, LogTag};
use crate::signals::pair::{canonicalize, DrugPairKey};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryNoteRepository {
    notes: RwLock<HashMap<DrugPairKey, DrugInteractionNote>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.read().is_empty()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn get_interaction(&self, drug_a: &str, drug_b: &str) -> Option<DrugInteractionNote> {
        self.notes
            .read()
            .get(&DrugPairKey::new(drug_a, drug_b))
            .cloned()
    }

    async fn upsert_interaction(
        &self,
        drug_a: &str,
        drug_b: &str,
        note: &str,
    ) -> DrugInteractionNote {
        let key = DrugPairKey::new(drug_a, drug_b);
        let now = Utc::now();
        let mut notes = self.notes.write();

        match notes.get_mut(&key) {
            Some(existing) => {
                existing.note = note.to_string();
                existing.updated_at = now;
                logger::debug(LogTag::Notes, &format!("Updated note for {}", key));
                existing.clone()
            }
            None => {
                let (first, second) = canonicalize(drug_a, drug_b);
                let created = DrugInteractionNote {
                    drug_a: first.to_string(),
                    drug_b: second.to_string(),
                    note: note.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                logger::debug(LogTag::Notes, &format!("Created note for {}", key));
                notes.insert(key, created.clone());
                created
            }
        }
    }
}
