//! Per-instance dashboard session: chat history, the current analysis and
//! the static side panels.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::{Analysis, AnalysisEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Canned requests behind the quick-action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    Flood,
    Fire,
    Population,
    Farming,
    Demo,
}

impl QuickAction {
    pub const ALL: [QuickAction; 5] = [
        QuickAction::Flood,
        QuickAction::Fire,
        QuickAction::Population,
        QuickAction::Farming,
        QuickAction::Demo,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.slug() == slug)
    }

    pub fn slug(self) -> &'static str {
        match self {
            QuickAction::Flood => "flood",
            QuickAction::Fire => "fire",
            QuickAction::Population => "population",
            QuickAction::Farming => "farming",
            QuickAction::Demo => "demo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::Flood => "🌊 Flood Risk Areas",
            QuickAction::Fire => "🔥 Fire Danger Zones",
            QuickAction::Population => "👥 Population Density",
            QuickAction::Farming => "🌾 Best Farming Areas",
            QuickAction::Demo => "🚀 Try Demo: Create Sample Map",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            QuickAction::Flood => "Show me flood risk areas in Kerala with rainfall data",
            QuickAction::Fire => "Create a fire danger map for California forests",
            QuickAction::Population => "Map population density in Mumbai city",
            QuickAction::Farming => "Find best farming areas in Punjab with soil data",
            QuickAction::Demo => "Show me elevation data for a sample area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressStep {
    pub title: &'static str,
    pub status: StepStatus,
}

const PROGRESS_TITLES: [&str; 4] = [
    "🔍 Understanding Request",
    "📡 Collecting Satellite Data",
    "🧠 Smart Analysis",
    "🎨 Creating Map",
];

#[derive(Debug, Clone, Serialize)]
pub struct DataSource {
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const DATA_SOURCES: [DataSource; 6] = [
    DataSource {
        icon: "🛰️",
        name: "Live Satellite Images",
        description: "Real-time space data",
    },
    DataSource {
        icon: "🏔️",
        name: "Elevation Data",
        description: "OpenTopography API",
    },
    DataSource {
        icon: "🗺️",
        name: "Street Maps",
        description: "Roads, buildings, rivers",
    },
    DataSource {
        icon: "🌡️",
        name: "Weather Data",
        description: "Climate & rainfall info",
    },
    DataSource {
        icon: "👥",
        name: "Population Data",
        description: "Census & demographic",
    },
    DataSource {
        icon: "🌾",
        name: "Land Use",
        description: "Agriculture & urban",
    },
];

pub const CAPABILITIES: [&str; 7] = [
    "Flood Risk Analysis",
    "Fire Danger Mapping",
    "Population Density",
    "Agricultural Suitability",
    "Elevation Analysis",
    "Slope Stability",
    "Watershed Analysis",
];

#[derive(Default)]
pub struct Session {
    messages: Vec<ChatMessage>,
    current: Option<Analysis>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn current(&self) -> Option<&Analysis> {
        self.current.as_ref()
    }

    /// Handle one user message. Blank input is dropped without a trace.
    pub fn submit(&mut self, engine: &mut AnalysisEngine, text: &str) -> Option<&Analysis> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::new(Role::User, text));
        let analysis = engine.analyze(text);
        self.messages
            .push(ChatMessage::new(Role::Assistant, analysis.reply()));
        self.current = Some(analysis);
        self.current.as_ref()
    }

    pub fn quick_action(
        &mut self,
        engine: &mut AnalysisEngine,
        action: QuickAction,
    ) -> Option<&Analysis> {
        self.submit(engine, action.prompt())
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.current = None;
    }

    /// Understanding the request is always shown as done; the remaining
    /// steps complete once a map exists.
    pub fn progress(&self) -> Vec<ProgressStep> {
        let done = self.current.is_some();
        PROGRESS_TITLES
            .into_iter()
            .enumerate()
            .map(|(index, title)| ProgressStep {
                title,
                status: if index == 0 || done {
                    StepStatus::Completed
                } else {
                    StepStatus::Pending
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisSettings;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(AnalysisSettings {
            seed: Some(11),
            ..AnalysisSettings::default()
        })
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut engine = engine();
        let mut session = Session::new();
        assert!(session.submit(&mut engine, "   \n").is_none());
        assert!(session.messages().is_empty());
        assert!(session.current().is_none());
    }

    #[test]
    fn submission_appends_user_then_assistant() {
        let mut engine = engine();
        let mut session = Session::new();
        session.quick_action(&mut engine, QuickAction::Fire);
        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(session.messages()[0].content, QuickAction::Fire.prompt());
        assert_eq!(session.current().unwrap().request.place.name, "California");
    }

    #[test]
    fn progress_tracks_current_map() {
        let mut engine = engine();
        let mut session = Session::new();
        let statuses: Vec<StepStatus> = session.progress().iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                StepStatus::Completed,
                StepStatus::Pending,
                StepStatus::Pending,
                StepStatus::Pending
            ]
        );

        session.submit(&mut engine, "elevation");
        assert!(session
            .progress()
            .iter()
            .all(|step| step.status == StepStatus::Completed));

        session.reset();
        assert!(session.messages().is_empty());
        assert_eq!(session.progress()[3].status, StepStatus::Pending);
    }

    #[test]
    fn quick_action_slugs_round_trip() {
        for action in QuickAction::ALL {
            assert_eq!(QuickAction::from_slug(action.slug()), Some(action));
        }
        assert_eq!(QuickAction::from_slug("weather"), None);
    }
}
