use std::collections::HashMap;

use csv::StringRecord;
use tracing::debug;

use crate::error::{LoadError, MissingColumn};
use crate::models::Skill;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    RepresentativeName,
    RepresentativeEmail,
    OverallScore,
    WritingScore,
    WritingExplanation,
    AccuracyScore,
    AccuracyExplanation,
    EmpathyScore,
    EmpathyExplanation,
    CxRating,
    FeedbackOverall,
}

impl CanonicalField {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::RepresentativeName => "representative_name",
            CanonicalField::RepresentativeEmail => "representative_email",
            CanonicalField::OverallScore => "overall_score",
            CanonicalField::WritingScore => "writing_score",
            CanonicalField::WritingExplanation => "writing_explanation",
            CanonicalField::AccuracyScore => "accuracy_score",
            CanonicalField::AccuracyExplanation => "accuracy_explanation",
            CanonicalField::EmpathyScore => "empathy_score",
            CanonicalField::EmpathyExplanation => "empathy_explanation",
            CanonicalField::CxRating => "cx_rating",
            CanonicalField::FeedbackOverall => "feedback_overall",
        }
    }

    pub fn skill_score(skill: Skill) -> Self {
        match skill {
            Skill::Writing => CanonicalField::WritingScore,
            Skill::Accuracy => CanonicalField::AccuracyScore,
            Skill::Empathy => CanonicalField::EmpathyScore,
        }
    }

    pub fn skill_explanation(skill: Skill) -> Self {
        match skill {
            Skill::Writing => CanonicalField::WritingExplanation,
            Skill::Accuracy => CanonicalField::AccuracyExplanation,
            Skill::Empathy => CanonicalField::EmpathyExplanation,
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }
}

/// Recognized header spellings per field, highest priority first.
/// "Hepfulness" is a misspelling found in real exports.
pub static ALIASES: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::RepresentativeName,
        &["Representative Name", "Agent Name", "Rep Name", "Name"],
    ),
    (
        CanonicalField::RepresentativeEmail,
        &["Representative Email", "Agent Email", "Rep Email", "Email"],
    ),
    (
        CanonicalField::OverallScore,
        &["Score", "Overall Score", "QA Score", "Overall QA Score"],
    ),
    (
        CanonicalField::WritingScore,
        &["Writing style (Score)", "Writing Score", "Writing (Score)"],
    ),
    (
        CanonicalField::WritingExplanation,
        &[
            "Writing style (Explanation)",
            "Writing Explanation",
            "Writing (Explanation)",
        ],
    ),
    (
        CanonicalField::AccuracyScore,
        &["Accuracy (Score)", "Accuracy Score"],
    ),
    (
        CanonicalField::AccuracyExplanation,
        &["Accuracy (Explanation)", "Accuracy Explanation"],
    ),
    (
        CanonicalField::EmpathyScore,
        &[
            "Empathy & Hepfulness (Score)",
            "Empathy Score",
            "Empathy (Score)",
            "Empathy & Helpfulness (Score)",
        ],
    ),
    (
        CanonicalField::EmpathyExplanation,
        &[
            "Empathy & Hepfulness (Explanation)",
            "Empathy Explanation",
            "Empathy (Explanation)",
            "Empathy & Helpfulness (Explanation)",
        ],
    ),
    (
        CanonicalField::CxRating,
        &[
            "Customer Experience (CX) rating",
            "CX Rating",
            "CX Score",
            "Customer Experience Rating",
        ],
    ),
    (
        CanonicalField::FeedbackOverall,
        &["Feedback Focus Areas", "Overall Feedback", "Feedback", "Focus Areas"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallSource {
    Column(usize),
    /// Mean of the three skill score columns.
    SkillMean,
}

#[derive(Debug, Clone)]
pub struct ColumnMap {
    bindings: HashMap<CanonicalField, usize>,
    pub overall: OverallSource,
}

impl ColumnMap {
    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.bindings.get(&field).copied()
    }

    /// Cell for `field` in `row`, trimmed; `None` when the column is unbound,
    /// the row is short, or the cell is blank.
    pub fn cell<'r>(&self, row: &'r StringRecord, field: CanonicalField) -> Option<&'r str> {
        let value = row.get(self.index(field)?)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Binds every canonical field to the first of its aliases present in `headers`.
///
/// Matching is exact and case-sensitive; header names are compared after
/// trimming surrounding whitespace.
pub fn resolve_columns(headers: &StringRecord) -> Result<ColumnMap, LoadError> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        positions.entry(name.trim()).or_insert(idx);
    }

    let mut bindings = HashMap::new();
    for (field, aliases) in ALIASES {
        if let Some(idx) = aliases.iter().find_map(|alias| positions.get(alias)) {
            debug!(field = field.as_str(), column = idx, "resolved column");
            bindings.insert(*field, *idx);
        }
    }

    let mut missing = Vec::new();
    for field in [
        CanonicalField::RepresentativeName,
        CanonicalField::RepresentativeEmail,
    ] {
        if !bindings.contains_key(&field) {
            missing.push(MissingColumn {
                field,
                aliases: field.aliases(),
            });
        }
    }

    let overall = match bindings.get(&CanonicalField::OverallScore) {
        Some(idx) => Some(OverallSource::Column(*idx)),
        None if Skill::ALL
            .iter()
            .all(|skill| bindings.contains_key(&CanonicalField::skill_score(*skill))) =>
        {
            debug!("overall score derived from skill scores");
            Some(OverallSource::SkillMean)
        }
        None => {
            missing.push(MissingColumn {
                field: CanonicalField::OverallScore,
                aliases: CanonicalField::OverallScore.aliases(),
            });
            None
        }
    };

    match overall {
        Some(overall) if missing.is_empty() => Ok(ColumnMap { bindings, overall }),
        _ => Err(LoadError::MissingColumns(missing)),
    }
}
