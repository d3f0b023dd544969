//! ESG scoring engine.
//!
//! Every function here is total: partial or empty answer sheets, empty
//! sections and empty questionnaires all produce defined results.

use super::answers::{Answer, AnswerSheet};
use super::questionnaire::Questionnaire;
use serde::Serialize;

/// `part / whole` as a whole percentage, rounded half up. Zero when `whole`
/// is zero.
pub fn percentage(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    ((200 * part + whole) / (2 * whole)) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    Initial,
    Developing,
    Advanced,
}

impl MaturityLevel {
    pub const fn from_percentage(percentage: u8) -> Self {
        if percentage >= 75 {
            Self::Advanced
        } else if percentage >= 50 {
            Self::Developing
        } else {
            Self::Initial
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Developing => "Developing",
            Self::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Maintain,
}

impl Priority {
    pub const fn from_percentage(percentage: u8) -> Self {
        if percentage < 50 {
            Self::High
        } else if percentage < 75 {
            Self::Medium
        } else {
            Self::Maintain
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High priority",
            Self::Medium => "Medium priority",
            Self::Maintain => "Maintain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionScore {
    pub id: String,
    pub label: String,
    pub norm: String,
    pub points: u32,
    pub max_points: u32,
    pub percentage: u8,
}

impl SectionScore {
    pub fn level(&self) -> MaturityLevel {
        MaturityLevel::from_percentage(self.percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlobalScore {
    pub points: u32,
    pub max_points: u32,
    pub percentage: u8,
    pub level: MaturityLevel,
    pub level_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadmapEntry {
    pub rank: usize,
    pub section_id: String,
    pub label: String,
    pub norm: String,
    pub percentage: u8,
    pub priority: Priority,
    pub priority_label: &'static str,
    pub level: MaturityLevel,
    pub level_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionCompletion {
    pub section_id: String,
    pub answered: usize,
    pub total: usize,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub answered: usize,
    pub total: usize,
    pub percentage: u8,
    pub sections: Vec<SectionCompletion>,
}

/// Everything the diagnostic, dashboard and report surfaces derive from an
/// answer sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub sections: Vec<SectionScore>,
    pub global: GlobalScore,
    pub roadmap: Vec<RoadmapEntry>,
    pub completion: Completion,
}

pub fn compute_section_scores(
    questionnaire: &Questionnaire,
    answers: &AnswerSheet,
) -> Vec<SectionScore> {
    questionnaire
        .sections()
        .iter()
        .map(|section| {
            let points = section
                .question_ids()
                .map(|id| answers.state(id).points())
                .sum();
            let max_points = section.questions.len() as u32 * Answer::MAX_POINTS;

            SectionScore {
                id: section.id.clone(),
                label: section.label.clone(),
                norm: section.norm.clone(),
                points,
                max_points,
                percentage: percentage(points, max_points),
            }
        })
        .collect()
}

pub fn compute_global_score(section_scores: &[SectionScore]) -> GlobalScore {
    let points = section_scores.iter().map(|score| score.points).sum();
    let max_points = section_scores.iter().map(|score| score.max_points).sum();
    let pct = percentage(points, max_points);
    let level = MaturityLevel::from_percentage(pct);

    GlobalScore {
        points,
        max_points,
        percentage: pct,
        level,
        level_label: level.label(),
    }
}

/// Sections ordered weakest first. The sort is stable, so equal percentages
/// keep questionnaire order.
pub fn compute_roadmap(section_scores: &[SectionScore]) -> Vec<RoadmapEntry> {
    let mut ordered: Vec<&SectionScore> = section_scores.iter().collect();
    ordered.sort_by_key(|score| score.percentage);

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, score)| {
            let priority = Priority::from_percentage(score.percentage);
            let level = score.level();
            RoadmapEntry {
                rank: index + 1,
                section_id: score.id.clone(),
                label: score.label.clone(),
                norm: score.norm.clone(),
                percentage: score.percentage,
                priority,
                priority_label: priority.label(),
                level,
                level_label: level.label(),
            }
        })
        .collect()
}

/// Only ids that belong to the questionnaire count as answered.
pub fn compute_completion(questionnaire: &Questionnaire, answers: &AnswerSheet) -> Completion {
    let sections: Vec<SectionCompletion> = questionnaire
        .sections()
        .iter()
        .map(|section| {
            let answered = section
                .question_ids()
                .filter(|id| answers.state(id).is_answered())
                .count();
            let total = section.questions.len();
            SectionCompletion {
                section_id: section.id.clone(),
                answered,
                total,
                complete: total > 0 && answered == total,
            }
        })
        .collect();

    let answered = sections.iter().map(|section| section.answered).sum();
    let total = questionnaire.question_count();

    Completion {
        answered,
        total,
        percentage: percentage(answered as u32, total as u32),
        sections,
    }
}

pub fn assess(questionnaire: &Questionnaire, answers: &AnswerSheet) -> Assessment {
    let sections = compute_section_scores(questionnaire, answers);
    let global = compute_global_score(&sections);
    let roadmap = compute_roadmap(&sections);
    let completion = compute_completion(questionnaire, answers);

    Assessment {
        sections,
        global,
        roadmap,
        completion,
    }
}
