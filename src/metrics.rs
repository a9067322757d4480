use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::insights::{extract_all, MAX_INSIGHTS};
use crate::models::{AgentSummary, PerSkill, ReviewRecord, ScoreSummary, Skill, TeamSummary};

#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    total: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.total += value;
            self.count += 1;
        }
    }

    /// `None` when no value was present.
    fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total / self.count as f64)
        }
    }
}

/// Conversation count and means over present values.
pub fn summarize_scores<'a, I>(records: I) -> ScoreSummary
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    let mut conversations = 0usize;
    let mut overall = Mean::default();
    let mut cx = Mean::default();
    let mut skills: PerSkill<Mean> = PerSkill::default();

    for record in records {
        conversations += 1;
        overall.add(record.overall_score);
        cx.add(record.cx_score);
        for skill in Skill::ALL {
            skills.get_mut(skill).add(*record.skill_scores.get(skill));
        }
    }

    ScoreSummary {
        conversations,
        overall: overall.value(),
        cx: cx.value(),
        skills: PerSkill {
            writing: skills.writing.value(),
            accuracy: skills.accuracy.value(),
            empathy: skills.empathy.value(),
        },
    }
}

/// One summary per agent key, in first-seen record order.
pub fn summarize_agents(records: &[ReviewRecord]) -> Vec<AgentSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<&ReviewRecord>> = HashMap::new();

    for record in records {
        let key = record.agent_key();
        grouped
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(record);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let members = grouped.remove(&key)?;
            let first = members.first()?;
            Some(AgentSummary {
                name: first.display_name().to_string(),
                email: first.agent_email.clone(),
                team: first.team.clone(),
                scores: summarize_scores(members.iter().copied()),
                insights: extract_all(
                    members.iter().flat_map(|r| r.feedback_texts()),
                    MAX_INSIGHTS,
                ),
                key,
            })
        })
        .collect()
}

/// Aggregates `records` under the label `team`.
pub fn summarize_team<'a, I>(team: &str, records: I) -> TeamSummary
where
    I: IntoIterator<Item = &'a ReviewRecord> + Clone,
{
    let agent_count = records
        .clone()
        .into_iter()
        .map(ReviewRecord::agent_key)
        .collect::<HashSet<_>>()
        .len();

    TeamSummary {
        team: team.to_string(),
        agent_count,
        scores: summarize_scores(records.clone()),
        insights: extract_all(
            records.into_iter().flat_map(|r| r.feedback_texts()),
            MAX_INSIGHTS,
        ),
    }
}

/// One summary per team label, sorted by team name.
pub fn summarize_teams(records: &[ReviewRecord]) -> Vec<TeamSummary> {
    let mut grouped: BTreeMap<&str, Vec<&ReviewRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.team.as_str()).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(team, members)| summarize_team(team, members.iter().copied()))
        .collect()
}

/// Mean overall score descending, undefined scores last, then name and key ascending.
pub fn compare_agents(a: &AgentSummary, b: &AgentSummary) -> Ordering {
    let by_score = match (a.scores.overall, b.scores.overall) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_score
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.key.cmp(&b.key))
}

pub fn rank_agents<'a, I>(agents: I) -> Vec<&'a AgentSummary>
where
    I: IntoIterator<Item = &'a AgentSummary>,
{
    let mut ranked: Vec<&AgentSummary> = agents.into_iter().collect();
    ranked.sort_by(|a, b| compare_agents(a, b));
    ranked
}
