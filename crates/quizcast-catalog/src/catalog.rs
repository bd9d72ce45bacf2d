//! The in-memory catalog and its edit operations.

use rand::Rng;

use quizcast_protocol::{OPTION_COUNT, Question, QuestionDraft, QuestionId};

use crate::{CatalogError, CatalogStore};

/// The full question catalog.
///
/// Gameplay reads `active_questions()`; only the edit methods below
/// mutate. Every successful edit is persisted through the store before
/// it returns; persistence failures are logged loudly and the
/// in-memory state stays authoritative (the version simply doesn't
/// advance until a save succeeds).
pub struct Catalog<S> {
    questions: Vec<Question>,
    version: u64,
    store: S,
}

impl<S: CatalogStore> Catalog<S> {
    /// Loads the catalog from the store.
    pub fn load(store: S) -> Result<Self, CatalogError> {
        let snapshot = store.load()?;
        tracing::info!(
            total = snapshot.questions.len(),
            active = snapshot.questions.iter().filter(|q| q.active).count(),
            version = snapshot.version,
            "catalog loaded"
        );
        Ok(Self {
            questions: snapshot.questions,
            version: snapshot.version,
            store,
        })
    }

    /// The full catalog, active or not, in insertion order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Version of the last persisted snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The gameplay subset: active questions, catalog order preserved.
    /// Cloned so a round can freeze its own copy (mid-round edits must
    /// not shift a live round's question pointer).
    pub fn active_questions(&self) -> Vec<Question> {
        self.questions.iter().filter(|q| q.active).cloned().collect()
    }

    pub fn active_count(&self) -> usize {
        self.questions.iter().filter(|q| q.active).count()
    }

    // -- Edits --------------------------------------------------------------

    /// Adds a validated draft as a new active question.
    pub fn add(&mut self, draft: QuestionDraft) -> Result<QuestionId, CatalogError> {
        validate(&draft)?;
        let id = QuestionId(rand::rng().random());
        self.questions.push(Question {
            id,
            text: draft.text,
            options: draft.options,
            correct: draft.correct,
            explanation: draft.explanation,
            active: true,
        });
        self.persist();
        tracing::info!(%id, total = self.questions.len(), "question added");
        Ok(id)
    }

    /// Replaces the content of the question at `index`, preserving its
    /// id and active flag. Returns `false` for an out-of-range index
    /// (not an error; stale admin panels send these).
    pub fn update(&mut self, index: usize, draft: QuestionDraft) -> Result<bool, CatalogError> {
        validate(&draft)?;
        let Some(q) = self.questions.get_mut(index) else {
            tracing::debug!(index, "update ignored: index out of range");
            return Ok(false);
        };
        q.text = draft.text;
        q.options = draft.options;
        q.correct = draft.correct;
        q.explanation = draft.explanation;
        self.persist();
        Ok(true)
    }

    /// Removes the question at `index`. Returns `false` if out of range.
    pub fn delete(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            tracing::debug!(index, "delete ignored: index out of range");
            return false;
        }
        let removed = self.questions.remove(index);
        self.persist();
        tracing::info!(id = %removed.id, total = self.questions.len(), "question deleted");
        true
    }

    /// Flips the active flag at `index`. Returns the new state, or
    /// `None` if out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let q = self.questions.get_mut(index)?;
        q.active = !q.active;
        let now_active = q.active;
        self.persist();
        tracing::info!(
            index,
            active = now_active,
            active_total = self.active_count(),
            "question toggled"
        );
        Some(now_active)
    }

    /// Activates or deactivates every question at once.
    pub fn bulk_toggle(&mut self, activate_all: bool) {
        for q in &mut self.questions {
            q.active = activate_all;
        }
        self.persist();
        tracing::info!(activate_all, total = self.questions.len(), "bulk toggle applied");
    }

    /// Persists the current state. Failures are logged, not propagated:
    /// the edit has already been acknowledged against the in-memory
    /// state, and the version stays put until a save lands.
    fn persist(&mut self) {
        match self.store.save(&self.questions) {
            Ok(version) => self.version = version,
            Err(e) => {
                tracing::error!(error = %e, version = self.version, "catalog save failed");
            }
        }
    }
}

/// Draft validation: exactly four options, correct index in range,
/// non-empty question text.
fn validate(draft: &QuestionDraft) -> Result<(), CatalogError> {
    if draft.text.is_empty() {
        return Err(CatalogError::Validation("question text is empty".into()));
    }
    if draft.options.len() != OPTION_COUNT {
        return Err(CatalogError::Validation(format!(
            "expected {OPTION_COUNT} options, got {}",
            draft.options.len()
        )));
    }
    if draft.correct >= OPTION_COUNT {
        return Err(CatalogError::Validation(format!(
            "correct index {} out of range",
            draft.correct
        )));
    }
    Ok(())
}

// =========================================================================
// Tests
// =========================================================================
