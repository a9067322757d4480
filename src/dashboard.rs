use tracing::debug;

use crate::error::LoadError;
use crate::load::load_records;
use crate::metrics::{rank_agents, summarize_agents, summarize_team, summarize_teams};
use crate::models::{AgentSummary, ReviewRecord, TeamSummary};
use crate::team::TeamAssigner;

pub const ALL_TEAMS: &str = "All Teams";

/// Everything computed from one uploaded file.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub records: Vec<ReviewRecord>,
    pub overview: TeamSummary,
    pub teams: Vec<TeamSummary>,
    pub agents: Vec<AgentSummary>,
}

/// The slice of a [`Dashboard`] selected by a team filter.
#[derive(Debug)]
pub struct DashboardView<'a> {
    pub title: &'a str,
    pub overview: &'a TeamSummary,
    pub teams: Vec<&'a TeamSummary>,
    agents: &'a [AgentSummary],
}

impl Dashboard {
    pub fn from_csv(bytes: &[u8], assigner: &TeamAssigner) -> Result<Self, LoadError> {
        let records = load_records(bytes, assigner)?;
        Ok(Self::build(records))
    }

    pub fn build(records: Vec<ReviewRecord>) -> Self {
        let overview = summarize_team(ALL_TEAMS, records.iter());
        let teams = summarize_teams(&records);
        let agents = summarize_agents(&records);
        debug!(
            records = records.len(),
            teams = teams.len(),
            agents = agents.len(),
            "dashboard built"
        );
        Self {
            records,
            overview,
            teams,
            agents,
        }
    }

    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(|t| t.team.as_str())
    }

    /// `None` selects every team; an unknown team name yields `None`.
    pub fn view(&self, team: Option<&str>) -> Option<DashboardView<'_>> {
        match team {
            None => Some(DashboardView {
                title: ALL_TEAMS,
                overview: &self.overview,
                teams: self.teams.iter().collect(),
                agents: &self.agents,
            }),
            Some(name) if name == ALL_TEAMS => self.view(None),
            Some(name) => {
                let summary = self.teams.iter().find(|t| t.team == name)?;
                Some(DashboardView {
                    title: summary.team.as_str(),
                    overview: summary,
                    teams: vec![summary],
                    agents: &self.agents,
                })
            }
        }
    }
}

impl<'a> DashboardView<'a> {
    /// Agents of `team` in first-seen order.
    pub fn agents_in(&self, team: &'a str) -> impl Iterator<Item = &'a AgentSummary> + 'a {
        let agents = self.agents;
        agents.iter().filter(move |a| a.team == team)
    }

    /// Agents of every team in the view, best first.
    pub fn ranked_agents(&self) -> Vec<&'a AgentSummary> {
        let agents = self.agents;
        let teams = &self.teams;
        rank_agents(
            agents
                .iter()
                .filter(|a| teams.iter().any(|t| t.team == a.team)),
        )
    }
}
