use serde::{
    Deserialize,
    Serialize,
};

use super::{
    character::Character,
    fields::text_record,
    ids::ItemId,
    plot_tools::PlotTools,
};

const TECHNOLOGY_LEVELS: &[&str] = &[
    "Stone age",
    "Bronze / iron age",
    "Medieval",
    "Renaissance",
    "Industrial",
    "Modern",
    "Near future",
    "Far future",
    "Mixed / uneven",
];

const SURVEILLANCE_LEVELS: &[&str] =
    &["None", "Local gossip", "Watchful state", "Pervasive digital", "Total"];

const INTERNET_ACCESS: &[&str] =
    &["Not invented", "Elite only", "Restricted", "Widespread", "Ubiquitous / implanted"];

const HONOR_VS_SURVIVAL: &[&str] =
    &["Honor above all", "Leaning honor", "Balanced", "Leaning survival", "Survival above all"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorySection {
    CoreIdea,
    WorldContext,
    WorldStructure,
    Society,
    Conflict,
    Mindset,
    ModernTech,
    WorldThemes,
    PhysicalDetail,
    StoryUtility,
}

impl StorySection {
    pub const ALL: &'static [StorySection] = &[
        StorySection::CoreIdea,
        StorySection::WorldContext,
        StorySection::WorldStructure,
        StorySection::Society,
        StorySection::Conflict,
        StorySection::Mindset,
        StorySection::ModernTech,
        StorySection::WorldThemes,
        StorySection::PhysicalDetail,
        StorySection::StoryUtility,
    ];

    pub fn title(self) -> &'static str {
        match self {
            StorySection::CoreIdea => "Core Story Idea",
            StorySection::WorldContext => "Worldbuilding Context",
            StorySection::WorldStructure => "Core World Structure",
            StorySection::Society => "Society & Culture",
            StorySection::Conflict => "Conflict & Power Dynamics",
            StorySection::Mindset => "Cultural Mindset & Psychology",
            StorySection::ModernTech => "Modern / Tech World Specifics",
            StorySection::WorldThemes => "World Themes & Emotional Tone",
            StorySection::PhysicalDetail => "Physical Detail Ideas",
            StorySection::StoryUtility => "Story Utility",
        }
    }

    pub fn is_required(self) -> bool {
        self == StorySection::CoreIdea
    }
}

text_record! {
    /// Scalar text fields of a story profile.
    pub struct StoryDetails;
    pub enum StoryField in StorySection {
        CentralTheme => central_theme, "Central theme", CoreIdea, Area;
        MainPremise => main_premise, "Main premise", CoreIdea, Area;
        NegativePrompt => negative_prompt, "Things to avoid", CoreIdea, Area;

        WorldSummary => world_summary, "World summary", WorldContext, Area;
        Genres => genres, "Genres", WorldContext, Line;
        TimePeriodSetting => time_period_setting, "Time period / setting", WorldContext, Line;
        CulturalInfluences => cultural_influences, "Cultural influences", WorldContext, Line;

        Geography => geography, "Geography", WorldStructure, Area;
        Climate => climate, "Climate", WorldStructure, Line;
        TimePeriod => time_period, "Time period", WorldStructure, Line;
        TechnologyLevel => technology_level, "Technology level", WorldStructure, Choice(TECHNOLOGY_LEVELS);
        MagicRules => magic_rules, "Magic rules", WorldStructure, Area;
        PhysicsRules => physics_rules, "Physics rules", WorldStructure, Area;

        Governance => governance, "Governance", Society, Area;
        LawsJustice => laws_justice, "Laws & justice", Society, Area;
        EconomicSystem => economic_system, "Economic system", Society, Line;
        CulturalNorms => cultural_norms, "Cultural norms", Society, Area;
        Religions => religions, "Religions", Society, Area;
        Festivals => festivals, "Festivals", Society, Line;
        SocialHierarchy => social_hierarchy, "Social hierarchy", Society, Line;
        Languages => languages, "Languages", Society, Line;

        CurrentConflict => current_conflict, "Current conflict", Conflict, Area;
        Factions => factions, "Factions", Conflict, Area;
        HiddenPowers => hidden_powers, "Hidden powers", Conflict, Area;
        LawEnforcement => law_enforcement, "Law enforcement", Conflict, Line;
        WeaponsCombat => weapons_combat, "Weapons & combat", Conflict, Line;

        ViewOfDeath => view_of_death, "View of death", Mindset, Line;
        ViewOfTime => view_of_time, "View of time", Mindset, Line;
        HonorVsSurvival => honor_vs_survival, "Honor vs survival", Mindset, Choice(HONOR_VS_SURVIVAL);
        IndividualVsCollective => individual_vs_collective, "Individual vs collective", Mindset, Line;
        EmotionExpression => emotion_expression, "Emotional expression", Mindset, Line;

        MediaPropaganda => media_propaganda, "Media & propaganda", ModernTech, Area;
        SurveillanceLevel => surveillance_level, "Surveillance level", ModernTech, Choice(SURVEILLANCE_LEVELS);
        InternetAccess => internet_access, "Internet access", ModernTech, Choice(INTERNET_ACCESS);
        PopularCulture => popular_culture, "Popular culture", ModernTech, Line;

        EmotionalVibe => emotional_vibe, "Emotional vibe", WorldThemes, Line;
        SymbolicMotifs => symbolic_motifs, "Symbolic motifs", WorldThemes, Line;
        HistoricalTrauma => historical_trauma, "Historical trauma", WorldThemes, Area;
        PowerOverTruth => power_over_truth, "Who controls the truth", WorldThemes, Line;

        ArchitectureStyle => architecture_style, "Architecture style", PhysicalDetail, Line;
        FashionTrends => fashion_trends, "Fashion trends", PhysicalDetail, Line;
        Transportation => transportation, "Transportation", PhysicalDetail, Line;
        FoodCulture => food_culture, "Food culture", PhysicalDetail, Line;
        StreetSounds => street_sounds, "Street sounds", PhysicalDetail, Line;

        WorldChallenges => world_challenges, "World challenges", StoryUtility, Area;
        WorldRewards => world_rewards, "World rewards", StoryUtility, Area;
        DeathTriggers => death_triggers, "Death triggers", StoryUtility, Line;
        WorldChanges => world_changes, "How the world changes", StoryUtility, Area;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberField {
    TotalChapters,
    MinWordsPerChapter,
}

impl NumberField {
    pub fn label(self) -> &'static str {
        match self {
            NumberField::TotalChapters => "Total chapters",
            NumberField::MinWordsPerChapter => "Minimum words per chapter",
        }
    }

    pub fn range(self) -> std::ops::RangeInclusive<u32> {
        match self {
            NumberField::TotalChapters => 1..=100,
            NumberField::MinWordsPerChapter => 100..=10_000,
        }
    }

    pub fn default_value(self) -> u32 {
        match self {
            NumberField::TotalChapters => 10,
            NumberField::MinWordsPerChapter => 900,
        }
    }

    fn clamp(self, value: u32) -> u32 {
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }
}

/// Everything the user enters for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryProfile {
    #[serde(flatten)]
    pub details: StoryDetails,
    pub characters: Vec<Character>,
    #[serde(flatten)]
    pub plot_tools: PlotTools,
    pub total_chapters: u32,
    pub min_words_per_chapter: u32,
}

impl Default for StoryProfile {
    fn default() -> Self {
        Self {
            details: StoryDetails::default(),
            characters: Vec::new(),
            plot_tools: PlotTools::default(),
            total_chapters: NumberField::TotalChapters.default_value(),
            min_words_per_chapter: NumberField::MinWordsPerChapter.default_value(),
        }
    }
}

impl StoryProfile {
    pub fn number(&self, field: NumberField) -> u32 {
        match field {
            NumberField::TotalChapters => self.total_chapters,
            NumberField::MinWordsPerChapter => self.min_words_per_chapter,
        }
    }

    pub fn set_number(&mut self, field: NumberField, value: u32) {
        let value = field.clamp(value);
        match field {
            NumberField::TotalChapters => self.total_chapters = value,
            NumberField::MinWordsPerChapter => self.min_words_per_chapter = value,
        }
    }

    pub fn estimated_word_count(&self) -> u64 {
        self.total_chapters as u64 * self.min_words_per_chapter as u64
    }

    /// Blank fields of the required core-idea section.
    pub fn missing_required(&self) -> Vec<StoryField> {
        StorySection::ALL
            .iter()
            .filter(|section| section.is_required())
            .flat_map(|section| StoryField::in_group(*section))
            .filter(|field| self.details.get(*field).trim().is_empty())
            .collect()
    }

    pub fn character(&self, id: ItemId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Every identifier held by the profile, characters and plot items alike.
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.characters.iter().map(|c| c.id).chain(self.plot_tools.item_ids())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_a_distinct_key() {
        let mut keys: Vec<_> = StoryField::ALL.iter().map(|f| f.key()).collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 48);
    }

    #[test]
    fn every_field_belongs_to_a_listed_section() {
        let grouped: usize =
            StorySection::ALL.iter().map(|s| StoryField::in_group(*s).count()).sum();
        assert_eq!(grouped, StoryField::ALL.len());
    }

    #[test]
    fn defaults_match_generation_settings() {
        let profile = StoryProfile::default();
        assert_eq!(profile.total_chapters, 10);
        assert_eq!(profile.min_words_per_chapter, 900);
        assert_eq!(profile.estimated_word_count(), 9000);
    }

    #[test]
    fn numbers_are_clamped_to_their_range() {
        let mut profile = StoryProfile::default();
        profile.set_number(NumberField::TotalChapters, 0);
        assert_eq!(profile.total_chapters, 1);
        profile.set_number(NumberField::MinWordsPerChapter, 50_000);
        assert_eq!(profile.min_words_per_chapter, 10_000);
    }

    #[test]
    fn core_idea_is_required() {
        let mut profile = StoryProfile::default();
        assert_eq!(
            profile.missing_required(),
            vec![StoryField::CentralTheme, StoryField::MainPremise, StoryField::NegativePrompt]
        );

        profile.details.central_theme = "Grief".to_string();
        profile.details.main_premise = "  ".to_string();
        profile.details.negative_prompt = "Gore".to_string();
        profile.details.geography = String::new();
        assert_eq!(profile.missing_required(), vec![StoryField::MainPremise]);
    }

    #[test]
    fn serializes_to_flat_backend_keys() {
        let mut profile = StoryProfile::default();
        profile.details.set(StoryField::CentralTheme, "Grief".to_string());

        let json = serde_json::to_value(&profile).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object["central_theme"], "Grief");
        assert_eq!(object["total_chapters"], 10);
        assert!(object.contains_key("street_sounds"));
        assert!(object.contains_key("characters"));
        assert!(object.contains_key("foreshadowing_seeds"));
        assert!(object.contains_key("plot_twists_by_role"));
        assert!(!object.contains_key("details"));
        assert!(!object.contains_key("plot_tools"));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let profile: StoryProfile =
            serde_json::from_str(r#"{"main_premise": "A lighthouse keeper", "extra": 1}"#)
                .unwrap();
        assert_eq!(profile.details.main_premise, "A lighthouse keeper");
        assert_eq!(profile.total_chapters, 10);
        assert!(profile.characters.is_empty());
    }
}
