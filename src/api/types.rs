use std::collections::BTreeMap;

use chrono::{
    DateTime,
    NaiveDateTime,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

use crate::core::{
    character::Character,
    ids::ItemId,
    plot_tools::{
        PlotItem,
        PlotList,
    },
    profile::{
        StoryDetails,
        StoryProfile,
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Ready,
    Working,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentStatus {
    pub agent_name: String,
    pub status: AgentState,
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub started_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentsResponse {
    pub agents: Vec<AgentStatus>,
    pub total_agents: usize,
    pub system_ready: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub session_id: String,
    pub message: String,
    pub estimated_time_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPhase {
    Initialized,
    Orchestration,
    Worldbuilding,
    CharacterDevelopment,
    PlotStructuring,
    StoryGeneration,
    SequentialValidation,
    DocumentFormatting,
    Completed,
    Error,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl GenerationPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationPhase::Completed | GenerationPhase::Error | GenerationPhase::Cancelled)
    }

    pub fn label(self) -> &'static str {
        match self {
            GenerationPhase::Initialized => "Starting up",
            GenerationPhase::Orchestration => "Planning the book",
            GenerationPhase::Worldbuilding => "Building the world",
            GenerationPhase::CharacterDevelopment => "Developing characters",
            GenerationPhase::PlotStructuring => "Structuring the plot",
            GenerationPhase::StoryGeneration => "Writing chapters",
            GenerationPhase::SequentialValidation => "Checking continuity",
            GenerationPhase::DocumentFormatting => "Formatting the manuscript",
            GenerationPhase::Completed => "Completed",
            GenerationPhase::Error => "Failed",
            GenerationPhase::Cancelled => "Cancelled",
            GenerationPhase::Unknown => "Working",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressResponse {
    pub session_id: String,
    pub current_phase: GenerationPhase,
    /// Percent, 0 to 100.
    pub progress: f32,
    #[serde(default)]
    pub agent_statuses: Vec<AgentStatus>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub estimated_completion_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ProgressResponse {
    pub fn error(&self) -> Option<&str> {
        self.error_message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub id: String,
    pub chapter_number: u32,
    pub title: String,
    pub content: String,
    pub word_count: u32,
    #[serde(default)]
    pub character_focus: Vec<String>,
    #[serde(default)]
    pub plot_elements_used: Vec<String>,
    #[serde(default)]
    pub validation_status: String,
    #[serde(default)]
    pub validation_feedback: Option<String>,
    #[serde(default)]
    pub revision_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewResponse {
    pub session_id: String,
    pub chapters: Vec<Chapter>,
    pub total_word_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadInfo {
    pub session_id: String,
    pub download_url: String,
    pub file_name: String,
    pub total_chapters: u32,
    pub total_words: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

/// Accepts naive ISO timestamps (what the backend emits) and offset ones.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(stamp.naive_utc()));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(Some)
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Serialize)]
pub struct PlotElement<'a> {
    pub id: ItemId,
    pub content: &'a str,
    pub category: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PlotTwist<'a> {
    pub id: ItemId,
    pub twist: &'a str,
    pub role: &'a str,
}

/// The `story_data` object of a generation request.
#[derive(Debug, Serialize)]
pub struct StoryPayload<'a> {
    #[serde(flatten)]
    pub details: &'a StoryDetails,
    pub characters: &'a [Character],
    #[serde(flatten)]
    pub plot_elements: BTreeMap<&'static str, Vec<PlotElement<'a>>>,
    pub plot_twists_by_role: Vec<PlotTwist<'a>>,
    pub total_chapters: u32,
    pub min_words_per_chapter: u32,
}

impl<'a> StoryPayload<'a> {
    /// Blank plot items are left out.
    pub fn from_profile(profile: &'a StoryProfile) -> Self {
        let tools = &profile.plot_tools;
        let filled = |list: PlotList| tools.items(list).iter().filter(|item| !item.is_blank());

        let plot_elements: BTreeMap<_, Vec<_>> = PlotList::ALL
            .iter()
            .filter(|list| **list != PlotList::PlotTwistsByRole)
            .map(|list| {
                let items = filled(*list).map(|item| plot_element(*list, item));
                (list.key(), items.collect::<Vec<_>>())
            })
            .collect();

        let plot_twists_by_role = filled(PlotList::PlotTwistsByRole)
            .map(|item| PlotTwist { id: item.id, twist: &item.content, role: &item.detail })
            .collect();

        Self {
            details: &profile.details,
            characters: &profile.characters,
            plot_elements,
            plot_twists_by_role,
            total_chapters: profile.total_chapters,
            min_words_per_chapter: profile.min_words_per_chapter,
        }
    }
}

fn plot_element(list: PlotList, item: &PlotItem) -> PlotElement<'_> {
    let category = if item.detail.trim().is_empty() { list.key() } else { item.detail.as_str() };
    PlotElement { id: item.id, content: &item.content, category }
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub story_data: StoryPayload<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_backend_shapes() {
        let mut profile = StoryProfile::default();
        profile.details.central_theme = "Loss".to_string();
        profile.plot_tools.timebombs = vec![
            PlotItem { id: ItemId(1), content: "Dam breaks".to_string(), detail: "ch. 9".to_string() },
            PlotItem::new(ItemId(2)),
        ];
        profile.plot_tools.foreshadowing_seeds =
            vec![PlotItem { id: ItemId(3), content: "A cracked bell".to_string(), detail: String::new() }];
        profile.plot_tools.plot_twists_by_role = vec![PlotItem {
            id: ItemId(4),
            content: "The mentor is the thief".to_string(),
            detail: "loyalties".to_string(),
        }];

        let json = serde_json::to_value(GenerateRequest { story_data: StoryPayload::from_profile(&profile) })
            .unwrap();
        let data = &json["story_data"];

        assert_eq!(data["central_theme"], "Loss");
        assert_eq!(data["timebombs"].as_array().unwrap().len(), 1);
        assert_eq!(data["timebombs"][0]["category"], "ch. 9");
        assert_eq!(data["foreshadowing_seeds"][0]["category"], "foreshadowing_seeds");
        assert_eq!(data["foreshadowing_seeds"][0]["id"], "3");
        assert_eq!(data["plot_twists_by_role"][0]["twist"], "The mentor is the thief");
        assert_eq!(data["plot_twists_by_role"][0]["role"], "loyalties");
        assert_eq!(data["red_herrings"], serde_json::json!([]));
        assert_eq!(data["total_chapters"], 10);
        assert!(data["timebombs"][0].get("detail").is_none());
    }

    #[test]
    fn progress_parses_backend_output() {
        let body = r#"{
            "session_id": "abc",
            "current_phase": "character_development",
            "progress": 30.0,
            "agent_statuses": [
                {"agent_name": "Character Agent", "status": "working", "progress": 0.4, "message": "",
                 "started_at": "2024-05-01T10:00:00.123456", "completed_at": null}
            ],
            "estimated_completion_time": null,
            "error_message": ""
        }"#;
        let progress: ProgressResponse = serde_json::from_str(body).unwrap();
        assert_eq!(progress.current_phase, GenerationPhase::CharacterDevelopment);
        assert!(!progress.current_phase.is_terminal());
        assert_eq!(progress.agent_statuses[0].status, AgentState::Working);
        assert!(progress.agent_statuses[0].started_at.is_some());
        assert!(progress.error().is_none());
    }

    #[test]
    fn terminal_phases() {
        for (raw, terminal) in [
            ("\"completed\"", true),
            ("\"error\"", true),
            ("\"cancelled\"", true),
            ("\"story_generation\"", false),
            ("\"something_new\"", false),
        ] {
            let phase: GenerationPhase = serde_json::from_str(raw).unwrap();
            assert_eq!(phase.is_terminal(), terminal, "{raw}");
        }
    }
}
