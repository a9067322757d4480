use crate::columns::CanonicalField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    pub field: CanonicalField,
    pub aliases: &'static [&'static str],
}

impl std::fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (looking for: {})",
            self.field.as_str(),
            self.aliases.join(", ")
        )
    }
}

/// Failures while turning an uploaded CSV into a record set.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("missing required columns: {}", join_missing(.0))]
    MissingColumns(Vec<MissingColumn>),

    #[error("no data: the file contains no usable review rows")]
    EmptyDataset,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    /// Missing columns and empty files are shown to the user rather than
    /// aborting the command.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LoadError::MissingColumns(_) | LoadError::EmptyDataset)
    }
}

fn join_missing(missing: &[MissingColumn]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
