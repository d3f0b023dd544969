use serde::Serialize;
use std::collections::HashSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
}

/// A group of questions mapped to one external reference standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub label: String,
    pub norm: String,
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new<'a>(
        id: &str,
        label: &str,
        norm: &str,
        questions: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            norm: norm.to_string(),
            questions: questions
                .into_iter()
                .map(|(id, prompt)| Question {
                    id: id.to_string(),
                    prompt: prompt.to_string(),
                })
                .collect(),
        }
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|question| question.id.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuestionnaireError {
    #[error("section id '{0}' is defined more than once")]
    DuplicateSection(String),
    #[error("question id '{0}' is defined more than once")]
    DuplicateQuestion(String),
}

/// Ordered, static set of sections. Question ids are unique across sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Questionnaire {
    sections: Vec<Section>,
}

impl Questionnaire {
    pub fn new(sections: Vec<Section>) -> Result<Self, QuestionnaireError> {
        let mut section_ids = HashSet::new();
        let mut question_ids = HashSet::new();

        for section in &sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(QuestionnaireError::DuplicateSection(section.id.clone()));
            }
            for id in section.question_ids() {
                if !question_ids.insert(id) {
                    return Err(QuestionnaireError::DuplicateQuestion(id.to_string()));
                }
            }
        }

        Ok(Self { sections })
    }

    /// The built-in 20 question ESG battery.
    pub fn reference() -> &'static Questionnaire {
        static REFERENCE: OnceLock<Questionnaire> = OnceLock::new();
        REFERENCE.get_or_init(|| Questionnaire {
            sections: reference_sections(),
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn question_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.questions.len())
            .sum()
    }

    pub fn contains_question(&self, question_id: &str) -> bool {
        self.section_of(question_id).is_some()
    }

    pub fn section_of(&self, question_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.question_ids().any(|id| id == question_id))
    }
}

fn reference_sections() -> Vec<Section> {
    vec![
        Section::new(
            "environmental",
            "Environmental",
            "ISO 14001",
            [
                ("a1", "Are significant environmental aspects and impacts identified?"),
                ("a2", "Is there a documented and communicated environmental policy?"),
                ("a3", "Are GHG emissions (Scope 1 and 2) measured and recorded?"),
                ("a4", "Are there carbon reduction objectives with annual targets?"),
                ("a5", "Are hazardous and non-hazardous wastes managed and documented?"),
                ("a6", "Are internal environmental audits run at least once a year?"),
            ],
        ),
        Section::new(
            "social",
            "Social",
            "GRI 400",
            [
                ("s1", "Is there a diversity, equity and inclusion policy?"),
                ("s2", "Is a psychosocial risk assessment carried out (NOM-035)?"),
                ("s3", "Is there a documented occupational health and safety program?"),
                ("s4", "Are employee satisfaction and turnover measured?"),
                ("s5", "Is there an anonymous ethics reporting channel?"),
            ],
        ),
        Section::new(
            "governance",
            "Governance",
            "GRI 200",
            [
                ("g1", "Is a Code of Ethics approved by management and published?"),
                ("g2", "Are there anti-corruption and anti-bribery policies?"),
                ("g3", "Is ESG due diligence performed on suppliers?"),
                ("g4", "Are sustainability reports published in line with GRI or CSRD?"),
                ("g5", "Does senior management hold formal ESG responsibilities?"),
            ],
        ),
        Section::new(
            "quality",
            "Quality",
            "ISO 9001",
            [
                ("q1", "Is there a documented quality management system?"),
                ("q2", "Are document and record versions and approvals controlled?"),
                ("q3", "Are nonconformities handled with corrective action plans?"),
                ("q4", "Are periodic management reviews held?"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_battery_is_valid_and_has_twenty_questions() {
        let rebuilt = Questionnaire::new(reference_sections()).expect("reference is valid");
        assert_eq!(&rebuilt, Questionnaire::reference());
        assert_eq!(rebuilt.question_count(), 20);

        let ids: Vec<&str> = rebuilt.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["environmental", "social", "governance", "quality"]);
        assert_eq!(rebuilt.sections()[0].questions.len(), 6);
    }

    #[test]
    fn rejects_question_ids_shared_between_sections() {
        let err = Questionnaire::new(vec![
            Section::new("one", "One", "X", [("q1", "first")]),
            Section::new("two", "Two", "Y", [("q1", "again")]),
        ])
        .expect_err("duplicate question id");

        assert_eq!(err, QuestionnaireError::DuplicateQuestion("q1".to_string()));
    }

    #[test]
    fn rejects_duplicate_section_ids() {
        let err = Questionnaire::new(vec![
            Section::new("one", "One", "X", [("a", "first")]),
            Section::new("one", "Again", "Y", [("b", "second")]),
        ])
        .expect_err("duplicate section id");

        assert_eq!(err, QuestionnaireError::DuplicateSection("one".to_string()));
    }

    #[test]
    fn locates_the_owning_section() {
        let questionnaire = Questionnaire::reference();
        assert_eq!(
            questionnaire.section_of("g4").map(|s| s.id.as_str()),
            Some("governance")
        );
        assert!(!questionnaire.contains_question("z9"));
    }
}
