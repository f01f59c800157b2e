/// Drug interaction notes
///
/// Notes are keyed by the same canonical pair as signal analyses, so
/// `(a, b)` and `(B, A)` address one note.
mod memory;
mod types;

pub use memory::InMemoryNoteRepository;
pub use types::DrugInteractionNote;

use async_trait::async_trait;

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn get_interaction(&self, drug_a: &str, drug_b: &str) -> Option<DrugInteractionNote>;

    /// Create the note or replace its text, returning the stored record
    async fn upsert_interaction(&self, drug_a: &str, drug_b: &str, note: &str)
        -> DrugInteractionNote;
}
