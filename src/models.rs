use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Writing,
    Accuracy,
    Empathy,
}

impl Skill {
    pub const ALL: [Skill; 3] = [Skill::Writing, Skill::Accuracy, Skill::Empathy];

    pub fn label(self) -> &'static str {
        match self {
            Skill::Writing => "Writing Style",
            Skill::Accuracy => "Accuracy",
            Skill::Empathy => "Empathy & Helpfulness",
        }
    }
}

/// One value per skill, addressed by [`Skill`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerSkill<T> {
    pub writing: T,
    pub accuracy: T,
    pub empathy: T,
}

impl<T> PerSkill<T> {
    pub fn get(&self, skill: Skill) -> &T {
        match skill {
            Skill::Writing => &self.writing,
            Skill::Accuracy => &self.accuracy,
            Skill::Empathy => &self.empathy,
        }
    }

    pub fn get_mut(&mut self, skill: Skill) -> &mut T {
        match skill {
            Skill::Writing => &mut self.writing,
            Skill::Accuracy => &mut self.accuracy,
            Skill::Empathy => &mut self.empathy,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewRecord {
    pub row: usize,
    pub agent_name: String,
    pub agent_email: String,
    pub overall_score: Option<f64>,
    pub cx_score: Option<f64>,
    pub skill_scores: PerSkill<Option<f64>>,
    pub skill_explanations: PerSkill<Option<String>>,
    pub feedback: Option<String>,
    pub team: String,
}

impl ReviewRecord {
    /// Grouping key for the agent: email, then name, then "Unknown".
    pub fn agent_key(&self) -> String {
        let email = self.agent_email.trim();
        if !email.is_empty() {
            return email.to_lowercase();
        }
        let name = self.agent_name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        "Unknown".to_string()
    }

    pub fn display_name(&self) -> &str {
        let name = self.agent_name.trim();
        if !name.is_empty() {
            return name;
        }
        let email = self.agent_email.trim();
        if !email.is_empty() {
            email
        } else {
            "Unknown"
        }
    }

    /// Free-text fields in reading order: skill explanations, then general feedback.
    pub fn feedback_texts(&self) -> impl Iterator<Item = &str> {
        Skill::ALL
            .into_iter()
            .filter_map(move |skill| self.skill_explanations.get(skill).as_deref())
            .chain(self.feedback.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Improvement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub polarity: Polarity,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsightSet {
    pub positive: Vec<String>,
    pub improvement: Vec<String>,
}

impl InsightSet {
    pub fn list(&self, polarity: Polarity) -> &[String] {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Improvement => &self.improvement,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.improvement.is_empty()
    }

    pub fn insights(&self) -> impl Iterator<Item = Insight> + '_ {
        let positive = self.positive.iter().map(|snippet| Insight {
            polarity: Polarity::Positive,
            snippet: snippet.clone(),
        });
        let improvement = self.improvement.iter().map(|snippet| Insight {
            polarity: Polarity::Improvement,
            snippet: snippet.clone(),
        });
        positive.chain(improvement)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub conversations: usize,
    pub overall: Option<f64>,
    pub cx: Option<f64>,
    pub skills: PerSkill<Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub key: String,
    pub name: String,
    pub email: String,
    pub team: String,
    pub scores: ScoreSummary,
    pub insights: InsightSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub team: String,
    pub agent_count: usize,
    pub scores: ScoreSummary,
    pub insights: InsightSet,
}
