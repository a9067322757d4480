use csv::{ByteRecord, StringRecord};
use tracing::{debug, warn};

use crate::columns::{resolve_columns, CanonicalField, ColumnMap, OverallSource};
use crate::error::LoadError;
use crate::models::{PerSkill, ReviewRecord, Skill};
use crate::team::TeamAssigner;

/// Parses CSV bytes into team-labelled review records.
///
/// Rows with neither an agent name nor an overall score are skipped.
/// Unparseable numbers become missing values for that row only.
pub fn load_records(bytes: &[u8], assigner: &TeamAssigner) -> Result<Vec<ReviewRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = decode_lossy(0, reader.byte_headers()?);
    if headers.iter().all(|name| name.trim().is_empty()) {
        return Err(LoadError::EmptyDataset);
    }
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (idx, result) in reader.byte_records().enumerate() {
        let row = decode_lossy(idx + 1, &result?);
        let record = parse_row(idx + 1, &row, &columns, assigner);

        if record.agent_name.is_empty() && record.overall_score.is_none() {
            debug!(row = record.row, "skipping row without name or score");
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    debug!(loaded = records.len(), skipped, "parsed review rows");

    if records.is_empty() {
        return Err(LoadError::EmptyDataset);
    }
    Ok(records)
}

fn parse_row(
    row_number: usize,
    row: &StringRecord,
    columns: &ColumnMap,
    assigner: &TeamAssigner,
) -> ReviewRecord {
    let text = |field| columns.cell(row, field).map(str::to_string);
    let number = |field| parse_score(row_number, field, columns.cell(row, field));

    let mut skill_scores = PerSkill::default();
    let mut skill_explanations = PerSkill::default();
    for skill in Skill::ALL {
        *skill_scores.get_mut(skill) = number(CanonicalField::skill_score(skill));
        *skill_explanations.get_mut(skill) = text(CanonicalField::skill_explanation(skill));
    }

    let overall_score = match columns.overall {
        OverallSource::Column(_) => number(CanonicalField::OverallScore),
        OverallSource::SkillMean => skill_mean(&skill_scores),
    };

    let agent_email = text(CanonicalField::RepresentativeEmail).unwrap_or_default();
    let team = assigner.assign(&agent_email);

    ReviewRecord {
        row: row_number,
        agent_name: text(CanonicalField::RepresentativeName).unwrap_or_default(),
        agent_email,
        overall_score,
        cx_score: number(CanonicalField::CxRating),
        skill_scores,
        skill_explanations,
        feedback: text(CanonicalField::FeedbackOverall),
        team,
    }
}

/// Invalid UTF-8 is replaced rather than failing the whole file.
fn decode_lossy(row: usize, record: &ByteRecord) -> StringRecord {
    record
        .iter()
        .map(|field| {
            let text = String::from_utf8_lossy(field);
            if let std::borrow::Cow::Owned(_) = text {
                warn!(row, "replacing invalid UTF-8 in cell");
            }
            text
        })
        .collect()
}

fn parse_score(row: usize, field: CanonicalField, value: Option<&str>) -> Option<f64> {
    let value = value?;
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed),
        _ => {
            warn!(row, field = field.as_str(), value, "ignoring non-numeric score");
            None
        }
    }
}

/// Mean of the three skill scores, only when all three are present.
fn skill_mean(scores: &PerSkill<Option<f64>>) -> Option<f64> {
    let mut total = 0.0;
    for skill in Skill::ALL {
        total += (*scores.get(skill))?;
    }
    Some(total / Skill::ALL.len() as f64)
}
