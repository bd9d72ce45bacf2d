//! The question catalog data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LocalizedText;

/// Every question has exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

/// Opaque question identifier, assigned once when the question enters
/// the catalog and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q-{}", self.0)
    }
}

/// A catalog entry.
///
/// Never mutated by gameplay; only catalog-edit commands touch these,
/// and `active` is toggled independently of the content fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// The question text itself.
    #[serde(rename = "question")]
    pub text: LocalizedText,
    /// Always [`OPTION_COUNT`] entries; enforced at edit time.
    pub options: Vec<LocalizedText>,
    /// Index into `options` of the correct answer.
    pub correct: usize,
    #[serde(default)]
    pub explanation: Option<LocalizedText>,
    /// Eligible for gameplay. Inactive questions stay in the catalog
    /// but are excluded from every round.
    pub active: bool,
}

/// An incoming question body for catalog-add / catalog-update.
///
/// Carries no `id` or `active` flag; those are owned by the catalog
/// (update preserves both, add assigns fresh ones). Validation happens
/// in the catalog crate before a draft becomes a [`Question`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(rename = "question")]
    pub text: LocalizedText,
    pub options: Vec<LocalizedText>,
    pub correct: usize,
    #[serde(default)]
    pub explanation: Option<LocalizedText>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_json_uses_question_key_for_text() {
        let q = Question {
            id: QuestionId(7),
            text: "Who won?".into(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct: 2,
            explanation: Some("Because.".into()),
            active: true,
        };
        let json: serde_json::Value = serde_json::to_value(&q).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["question"], "Who won?");
        assert_eq!(json["correct"], 2);
        assert_eq!(json["active"], true);
    }

    #[test]
    fn test_draft_explanation_defaults_to_none() {
        let json = r#"{
            "question": "Who won?",
            "options": ["A", "B", "C", "D"],
            "correct": 0
        }"#;
        let draft: QuestionDraft = serde_json::from_str(json).unwrap();
        assert!(draft.explanation.is_none());
        assert_eq!(draft.options.len(), OPTION_COUNT);
    }

    #[test]
    fn test_question_round_trip() {
        let q = Question {
            id: QuestionId(1),
            text: "t".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: 0,
            explanation: None,
            active: false,
        };
        let bytes = serde_json::to_vec(&q).unwrap();
        let decoded: Question = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(q, decoded);
    }
}
