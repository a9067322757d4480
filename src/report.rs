use std::fmt::Write;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::dashboard::{Dashboard, DashboardView};
use crate::models::{AgentSummary, InsightSet, Polarity, ScoreSummary, Skill, TeamSummary};

pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}"),
        None => "N/A".to_string(),
    }
}

/// Formats a score against its scale maximum, e.g. `4.2/5.0`.
pub fn format_scaled(value: Option<f64>, max: f64) -> String {
    match value {
        Some(value) => format!("{value:.1}/{max:.1}"),
        None => "N/A".to_string(),
    }
}

/// One-line agent header used by the terminal summary.
pub fn agent_line(agent: &AgentSummary) -> String {
    format!(
        "{} ({}, {}) - QA: {} | CX: {} | Conversations: {}",
        agent.name,
        if agent.email.is_empty() { "no email" } else { agent.email.as_str() },
        agent.team,
        format_score(agent.scores.overall),
        format_score(agent.scores.cx),
        agent.scores.conversations
    )
}

pub fn overview_lines(summary: &TeamSummary) -> Vec<String> {
    vec![
        format!("Average QA Score: {}", format_score(summary.scores.overall)),
        format!("Average CX Score: {}", format_scaled(summary.scores.cx, 5.0)),
        format!("Total Conversations: {}", summary.scores.conversations),
        format!("Team Members: {}", summary.agent_count),
    ]
}

/// Team listing for the `teams` command.
pub fn team_lines(dashboard: &Dashboard) -> Vec<String> {
    let mut lines = vec![format!(
        "Teams ({} conversations loaded):",
        dashboard.records.len()
    )];
    for summary in dashboard.teams.iter() {
        lines.push(format!(
            "- {}: {} agents, {} conversations, avg QA {}",
            summary.team,
            summary.agent_count,
            summary.scores.conversations,
            format_score(summary.scores.overall)
        ));
    }
    lines
}

/// `QA_Report_All_Teams_20260118_093000.md`
pub fn report_file_name(title: &str, generated: NaiveDateTime) -> PathBuf {
    let slug: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    PathBuf::from(format!(
        "QA_Report_{}_{}.md",
        slug,
        generated.format("%Y%m%d_%H%M%S")
    ))
}

pub fn build_report(view: &DashboardView<'_>, generated: NaiveDateTime) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# QA Report - {}", view.title);
    let _ = writeln!(output);
    write_overview(&mut output, &view.overview.scores, view.overview.agent_count);
    let _ = writeln!(
        output,
        "- **Report Generated:** {}",
        generated.format("%Y-%m-%d %H:%M:%S")
    );

    for team in view.teams.iter().copied() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Team: {}", team.team);
        let _ = writeln!(output);
        let _ = writeln!(output, "### Team Overview");
        write_overview(&mut output, &team.scores, team.agent_count);

        let _ = writeln!(output);
        let _ = writeln!(output, "### Team Strengths");
        write_insights(
            &mut output,
            &team.insights,
            Polarity::Positive,
            "No specific positive patterns identified in feedback.",
        );

        let _ = writeln!(output);
        let _ = writeln!(output, "### Areas for Improvement");
        write_insights(
            &mut output,
            &team.insights,
            Polarity::Improvement,
            "No specific improvement areas identified in feedback.",
        );

        let _ = writeln!(output);
        let _ = writeln!(output, "### Individual Agent Analysis");

        let mut any_agent = false;
        for agent in view.agents_in(team.team.as_str()) {
            any_agent = true;
            let _ = writeln!(output);
            write_agent(&mut output, agent);
        }
        if !any_agent {
            let _ = writeln!(output, "No agents recorded for this team.");
        }
    }

    output
}

fn write_overview(output: &mut String, scores: &ScoreSummary, agent_count: usize) {
    let _ = writeln!(
        output,
        "- **Average QA Score:** {}",
        format_score(scores.overall)
    );
    let _ = writeln!(
        output,
        "- **Average CX Score:** {}",
        format_scaled(scores.cx, 5.0)
    );
    let _ = writeln!(output, "- **Total Conversations:** {}", scores.conversations);
    let _ = writeln!(output, "- **Team Members:** {}", agent_count);
}

fn write_insights(output: &mut String, insights: &InsightSet, polarity: Polarity, fallback: &str) {
    let snippets = insights.list(polarity);
    if snippets.is_empty() {
        let _ = writeln!(output, "{fallback}");
        return;
    }
    for snippet in snippets {
        let _ = writeln!(output, "- {snippet}");
    }
}

fn write_agent(output: &mut String, agent: &AgentSummary) {
    let _ = writeln!(output, "#### {}", agent.name);
    let _ = writeln!(output);
    let _ = writeln!(output, "**Overall Performance:**");
    let _ = writeln!(output, "- QA Score: {}", format_score(agent.scores.overall));
    let _ = writeln!(output, "- CX Score: {}", format_scaled(agent.scores.cx, 5.0));
    let _ = writeln!(output, "- Conversations: {}", agent.scores.conversations);
    let _ = writeln!(output);

    let _ = writeln!(output, "**Skill Breakdown:**");
    for skill in Skill::ALL {
        let _ = writeln!(
            output,
            "- {}: {}",
            skill.label(),
            format_scaled(*agent.scores.skills.get(skill), 3.0)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "**Strengths:**");
    write_insights(
        output,
        &agent.insights,
        Polarity::Positive,
        "Continue current good practices.",
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "**Improvement Areas:**");
    write_insights(
        output,
        &agent.insights,
        Polarity::Improvement,
        "Performance meets expectations.",
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "---");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DEMO_CSV;
    use crate::team::TeamAssigner;
    use chrono::NaiveDate;

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 18)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    const WITH_FEEDBACK: &str = "Name,Email,Score,CX Rating,Feedback\n\
        Ana,ana@acme.com,90,5,Ana gave a clear and professional answer.\n\
        Bo,bo@acme.com,70,,Bo needs to confirm account details first.\n\
        Cy,cy@globex.com,,3,\n";

    fn dashboard(csv: &str) -> Dashboard {
        Dashboard::from_csv(csv.as_bytes(), &TeamAssigner::new()).unwrap()
    }

    #[test]
    fn formats_missing_scores_as_na() {
        assert_eq!(format_score(None), "N/A");
        assert_eq!(format_score(Some(85.0)), "85.0");
        assert_eq!(format_scaled(Some(4.333), 5.0), "4.3/5.0");
        assert_eq!(format_scaled(None, 3.0), "N/A");
    }

    #[test]
    fn demo_report_has_team_and_agents() {
        let dashboard = dashboard(DEMO_CSV);
        let report = build_report(&dashboard.view(None).unwrap(), generated());

        assert!(report.starts_with("# QA Report - All Teams\n"));
        assert!(report.contains("- **Report Generated:** 2026-01-18 09:30:00"));
        assert!(report.contains("## Team: Company"));
        assert!(report.contains("- **Average QA Score:** 85.0"));
        assert!(report.contains("- **Team Members:** 3"));
        assert!(report.contains("#### Jane Smith"));
        assert!(report.contains("- Empathy & Helpfulness: 3.0/3.0"));
        assert!(report.contains("No specific positive patterns identified in feedback."));
    }

    #[test]
    fn team_report_lists_insights_and_only_its_agents() {
        let dashboard = dashboard(WITH_FEEDBACK);
        let report = build_report(&dashboard.view(Some("Acme")).unwrap(), generated());

        assert!(report.starts_with("# QA Report - Acme\n"));
        assert!(report.contains("- Ana gave a clear and professional answer."));
        assert!(report.contains("- Bo needs to confirm account details first."));
        assert!(report.contains("#### Bo"));
        assert!(!report.contains("#### Cy"));
        assert!(!report.contains("## Team: Globex"));
    }

    #[test]
    fn undefined_agent_metrics_render_as_na() {
        let dashboard = dashboard(WITH_FEEDBACK);
        let report = build_report(&dashboard.view(Some("Globex")).unwrap(), generated());

        assert!(report.contains("- QA Score: N/A"));
        assert!(report.contains("- CX Score: 3.0/5.0"));
        assert!(report.contains("Continue current good practices."));
        assert!(report.contains("Performance meets expectations."));
    }

    #[test]
    fn team_lines_count_loaded_rows() {
        let dashboard = dashboard(WITH_FEEDBACK);
        let lines = team_lines(&dashboard);
        assert_eq!(lines[0], "Teams (3 conversations loaded):");
        assert_eq!(lines[1], "- Acme: 2 agents, 2 conversations, avg QA 80.0");
        assert_eq!(lines[2], "- Globex: 1 agents, 1 conversations, avg QA N/A");
    }

    #[test]
    fn file_name_is_slugged_and_timestamped() {
        assert_eq!(
            report_file_name("All Teams", generated()),
            PathBuf::from("QA_Report_All_Teams_20260118_093000.md")
        );
    }

    #[test]
    fn agent_line_mentions_scores() {
        let dashboard = dashboard(DEMO_CSV);
        let line = agent_line(&dashboard.agents[0]);
        assert_eq!(
            line,
            "John Doe (john@company.com, Company) - QA: 85.0 | CX: 4.0 | Conversations: 1"
        );
    }
}
