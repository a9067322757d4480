use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

pub const UNKNOWN_TEAM: &str = "Unknown";

/// Derives team labels from agent emails, with optional per-email overrides.
#[derive(Debug, Clone, Default)]
pub struct TeamAssigner {
    overrides: HashMap<String, String>,
}

impl TeamAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides<I, E, T>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (E, T)>,
        E: AsRef<str>,
        T: Into<String>,
    {
        let overrides = overrides
            .into_iter()
            .map(|(email, team)| {
                let team: String = team.into();
                (normalize_email(email.as_ref()), team.trim().to_string())
            })
            .filter(|(email, team)| !email.is_empty() && !team.is_empty())
            .collect();
        Self { overrides }
    }

    /// Reads an `email,team` CSV file.
    pub fn from_csv(path: &Path) -> anyhow::Result<Self> {
        #[derive(serde::Deserialize)]
        struct OverrideRow {
            email: String,
            team: String,
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("failed to open team map {}", path.display()))?;

        let mut rows = Vec::new();
        for result in reader.deserialize::<OverrideRow>() {
            let row = result.with_context(|| format!("invalid row in {}", path.display()))?;
            rows.push((row.email, row.team));
        }

        debug!(path = %path.display(), overrides = rows.len(), "loaded team map");
        Ok(Self::with_overrides(rows))
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub fn assign(&self, email: &str) -> String {
        if let Some(team) = self.overrides.get(&normalize_email(email)) {
            return team.clone();
        }
        team_from_email(email).unwrap_or_else(|| UNKNOWN_TEAM.to_string())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `jane@acme.co.uk` -> `Acme`. `None` when there is no `@` or the first
/// domain label is empty.
pub fn team_from_email(email: &str) -> Option<String> {
    let (_, domain) = email.trim().split_once('@')?;
    let label = domain.split('.').next().unwrap_or_default();
    if label.is_empty() {
        return None;
    }
    Some(title_case(&label.to_lowercase()))
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                output.extend(ch.to_uppercase());
            } else {
                output.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            output.push(ch);
            at_word_start = true;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_is_title_cased_domain_label() {
        let assigner = TeamAssigner::new();
        assert_eq!(assigner.assign("john@company.com"), "Company");
        assert_eq!(assigner.assign("jane@ACME.co.uk"), "Acme");
        assert_eq!(assigner.assign("kai@north-star.io"), "North-Star");
    }

    #[test]
    fn missing_or_unparseable_email_is_unknown() {
        let assigner = TeamAssigner::new();
        assert_eq!(assigner.assign(""), UNKNOWN_TEAM);
        assert_eq!(assigner.assign("not-an-email"), UNKNOWN_TEAM);
        assert_eq!(assigner.assign("someone@.com"), UNKNOWN_TEAM);
        assert_eq!(assigner.assign("someone@"), UNKNOWN_TEAM);
    }

    #[test]
    fn overrides_win_and_ignore_case() {
        let assigner = TeamAssigner::with_overrides([("Jane@Acme.com", "Escalations")]);
        assert_eq!(assigner.assign("jane@acme.com "), "Escalations");
        assert_eq!(assigner.assign("john@acme.com"), "Acme");
        assert_eq!(assigner.override_count(), 1);
    }

    #[test]
    fn blank_override_entries_are_dropped() {
        let assigner = TeamAssigner::with_overrides([("", "Tier 2"), ("a@b.com", " ")]);
        assert_eq!(assigner.override_count(), 0);
    }

    #[test]
    fn title_case_handles_digits_and_separators() {
        assert_eq!(title_case("acme"), "Acme");
        assert_eq!(title_case("team2go"), "Team2Go");
        assert_eq!(title_case("foo_bar"), "Foo_Bar");
    }

    #[test]
    fn loads_overrides_from_csv() {
        let path = std::env::temp_dir().join("qa_dashboard_team_map_test.csv");
        std::fs::write(&path, "email,team\n mia@corp.com , Billing\n").unwrap();

        let assigner = TeamAssigner::from_csv(&path).unwrap();
        assert_eq!(assigner.assign("mia@corp.com"), "Billing");

        std::fs::remove_file(&path).unwrap();
    }
}
