use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Ordinal response to a diagnostic question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    No,
    Partial,
    Yes,
}

impl Answer {
    pub const MAX_POINTS: u32 = 2;

    pub const fn points(self) -> u32 {
        match self {
            Self::No => 0,
            Self::Partial => 1,
            Self::Yes => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::No => "No",
            Self::Partial => "Partial",
            Self::Yes => "Yes",
        }
    }

    /// Case-insensitive parse of the persisted or typed form.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Some(Self::Yes),
            "partial" | "p" => Some(Self::Partial),
            "no" | "n" => Some(Self::No),
            _ => None,
        }
    }
}

/// Unanswered is kept apart from [`Answer::No`]: both score zero but only
/// one of them counts towards completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    Answered(Answer),
}

impl AnswerState {
    pub const fn points(self) -> u32 {
        match self {
            Self::Unanswered => 0,
            Self::Answered(answer) => answer.points(),
        }
    }

    pub const fn is_answered(self) -> bool {
        matches!(self, Self::Answered(_))
    }
}

/// Question id to answer mapping. Missing keys are unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    answers: BTreeMap<String, Answer>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, question_id: &str) -> AnswerState {
        match self.answers.get(question_id) {
            Some(answer) => AnswerState::Answered(*answer),
            None => AnswerState::Unanswered,
        }
    }

    pub fn set(&mut self, question_id: impl Into<String>, answer: Answer) -> Option<Answer> {
        self.answers.insert(question_id.into(), answer)
    }

    pub fn clear(&mut self, question_id: &str) -> Option<Answer> {
        self.answers.remove(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Answer)> for AnswerSheet {
    fn from_iter<T: IntoIterator<Item = (K, Answer)>>(iter: T) -> Self {
        Self {
            answers: iter
                .into_iter()
                .map(|(question_id, answer)| (question_id.into(), answer))
                .collect(),
        }
    }
}

// Entries whose value is not a recognizable answer are dropped so they read
// as unanswered instead of invalidating the whole sheet.
impl<'de> Deserialize<'de> for AnswerSheet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let total = raw.len();
        let answers: BTreeMap<String, Answer> = raw
            .into_iter()
            .filter_map(|(question_id, value)| {
                value
                    .as_str()
                    .and_then(Answer::parse)
                    .map(|answer| (question_id, answer))
            })
            .collect();

        if answers.len() < total {
            debug!(
                dropped = total - answers.len(),
                "ignoring unrecognized answer values"
            );
        }

        Ok(Self { answers })
    }
}

/// Where the user is in the diagnostic flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStep {
    #[default]
    Answering,
    Results,
}

/// Persisted diagnostic state: answers plus workflow step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticRecord {
    pub answers: AnswerSheet,
    pub step: DiagnosticStep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unanswered_scores_like_no_but_is_not_answered() {
        let mut sheet = AnswerSheet::new();
        sheet.set("a1", Answer::No);

        assert_eq!(sheet.state("a1").points(), 0);
        assert!(sheet.state("a1").is_answered());
        assert_eq!(sheet.state("a2"), AnswerState::Unanswered);
        assert_eq!(sheet.state("a2").points(), 0);
        assert!(!sheet.state("a2").is_answered());
    }

    #[test]
    fn malformed_answer_values_read_as_unanswered() {
        let sheet: AnswerSheet =
            serde_json::from_str(r#"{"a1":"yes","a2":"maybe","a3":7,"a4":"PARTIAL"}"#)
                .expect("sheet parses");

        assert_eq!(sheet.state("a1"), AnswerState::Answered(Answer::Yes));
        assert_eq!(sheet.state("a2"), AnswerState::Unanswered);
        assert_eq!(sheet.state("a3"), AnswerState::Unanswered);
        assert_eq!(sheet.state("a4"), AnswerState::Answered(Answer::Partial));
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn diagnostic_record_fills_missing_fields() {
        let record: DiagnosticRecord =
            serde_json::from_str(r#"{"answers":{"s1":"no"}}"#).expect("record parses");
        assert_eq!(record.step, DiagnosticStep::Answering);
        assert_eq!(record.answers.state("s1"), AnswerState::Answered(Answer::No));
    }
}
