use std::collections::BTreeSet;

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    fields::text_record,
    ids::ItemId,
};

const ARCHETYPES: &[&str] = &[
    "Hero",
    "Mentor",
    "Ally",
    "Herald",
    "Trickster",
    "Shapeshifter",
    "Guardian",
    "Shadow",
    "Anti-hero",
    "Everyman",
    "Rebel",
    "Lover",
    "Caregiver",
    "Ruler",
    "Innocent",
];

const LOVE_LANGUAGES: &[&str] =
    &["Words of affirmation", "Acts of service", "Gifts", "Quality time", "Physical touch"];

const LOYALTY_LEVELS: &[&str] =
    &["Unbreakable", "Loyal with limits", "Transactional", "Self first", "Treacherous"];

const ARC_TYPES: &[&str] =
    &["Positive change", "Negative change", "Flat", "Corruption", "Redemption", "Disillusionment"];

const ATTACHMENT_TYPES: &[&str] = &["Secure", "Anxious", "Avoidant", "Disorganized"];

const FIGHT_FLIGHT: &[&str] = &["Fight", "Flight", "Freeze", "Fawn"];

const PLOT_ROLES: &[&str] = &[
    "Protagonist",
    "Antagonist",
    "Deuteragonist",
    "Love interest",
    "Confidant",
    "Foil",
    "Catalyst",
    "Supporting",
];

/// Options offered for a character's mental-health tags.
pub const MENTAL_HEALTH_TAGS: &[&str] = &[
    "Anxiety",
    "Depression",
    "PTSD",
    "OCD",
    "Bipolar",
    "ADHD",
    "Autism spectrum",
    "Dissociation",
    "Addiction",
    "Eating disorder",
    "Complicated grief",
    "Insomnia",
    "Paranoia",
    "Phobia",
    "Borderline traits",
    "Narcissistic traits",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharacterGroup {
    Basics,
    Conflicts,
    EmotionalCore,
    History,
    Morality,
    Social,
    Quirks,
    Arc,
    DeepPsychology,
    InnerWorld,
    PlotPlacement,
}

impl CharacterGroup {
    pub const ALL: &'static [CharacterGroup] = &[
        CharacterGroup::Basics,
        CharacterGroup::Conflicts,
        CharacterGroup::EmotionalCore,
        CharacterGroup::History,
        CharacterGroup::Morality,
        CharacterGroup::Social,
        CharacterGroup::Quirks,
        CharacterGroup::Arc,
        CharacterGroup::DeepPsychology,
        CharacterGroup::InnerWorld,
        CharacterGroup::PlotPlacement,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CharacterGroup::Basics => "Character Basics",
            CharacterGroup::Conflicts => "Conflicts & Connections",
            CharacterGroup::EmotionalCore => "Emotional Core",
            CharacterGroup::History => "History & Background",
            CharacterGroup::Morality => "Moral Boundaries",
            CharacterGroup::Social => "Social Behavior",
            CharacterGroup::Quirks => "Quirks & Voice",
            CharacterGroup::Arc => "Arc & Symbolism",
            CharacterGroup::DeepPsychology => "Deep Psychology",
            CharacterGroup::InnerWorld => "Inner World & Mental Health",
            CharacterGroup::PlotPlacement => "Plot Placement",
        }
    }
}

text_record! {
    /// Scalar text fields of a character.
    pub struct CharacterSheet;
    pub enum CharacterField in CharacterGroup {
        Name => name, "Name", Basics, Line;
        Archetype => archetype, "Archetype", Basics, Choice(ARCHETYPES);
        BackstoryOneSentence => backstory_one_sentence, "Backstory in one sentence", Basics, Area;

        InternalConflict => internal_conflict, "Internal conflict", Conflicts, Area;
        ExternalConflict => external_conflict, "External conflict", Conflicts, Area;
        RelationshipsMap => relationships_map, "Relationships map", Conflicts, Area;
        PersonalSymbol => personal_symbol, "Personal symbol", Conflicts, Line;

        CoreBelief => core_belief, "Core belief", EmotionalCore, Line;
        EmotionalTriggers => emotional_triggers, "Emotional triggers", EmotionalCore, Line;
        ComfortZones => comfort_zones, "Comfort zones", EmotionalCore, Line;
        CopingMechanism => coping_mechanism, "Coping mechanism", EmotionalCore, Line;
        DesireVsNeed => desire_vs_need, "Desire vs need", EmotionalCore, Area;
        BiggestRegret => biggest_regret, "Biggest regret", EmotionalCore, Line;
        EmotionalArmor => emotional_armor, "Emotional armor", EmotionalCore, Line;

        DefiningChildhoodMoment => defining_childhood_moment, "Defining childhood moment", History, Area;
        FirstMajorBetrayal => first_major_betrayal, "First major betrayal", History, Area;
        PastLoveOrLoss => past_love_or_loss, "Past love or loss", History, Area;
        FamilyRole => family_role, "Family role", History, Line;
        EducationStreetSmarts => education_street_smarts, "Education / street smarts", History, Line;
        CriminalRecord => criminal_record, "Criminal record", History, Line;

        LineNeverCross => line_never_cross, "Line they will never cross", Morality, Line;
        WorstThingDone => worst_thing_done, "Worst thing they have done", Morality, Area;
        JustificationWrongdoing => justification_wrongdoing, "How they justify wrongdoing", Morality, Area;
        VillainOrigin => villain_origin, "Villain origin", Morality, Area;
        SelfDestructTrait => self_destruct_trait, "Self-destructive trait", Morality, Line;

        PublicVsPrivate => public_vs_private, "Public vs private self", Social, Area;
        RoleInGroup => role_in_group, "Role in a group", Social, Line;
        LoveLanguage => love_language, "Love language", Social, Choice(LOVE_LANGUAGES);
        TreatmentOfWeak => treatment_of_weak, "Treatment of the weak", Social, Line;
        JealousyTriggers => jealousy_triggers, "Jealousy triggers", Social, Line;
        LoyaltyLevel => loyalty_level, "Loyalty level", Social, Choice(LOYALTY_LEVELS);

        WeirdHabit => weird_habit, "Weird habit", Quirks, Line;
        PhysicalTics => physical_tics, "Physical tics", Quirks, Line;
        Obsessions => obsessions, "Obsessions", Quirks, Line;
        VoicePattern => voice_pattern, "Voice pattern", Quirks, Line;
        WhatMakesLaugh => what_makes_laugh, "What makes them laugh", Quirks, Line;
        WhatMakesCry => what_makes_cry, "What makes them cry", Quirks, Line;

        SymbolMotif => symbol_motif, "Symbol / motif", Arc, Line;
        ArcInOneWord => arc_in_one_word, "Arc in one word", Arc, Line;
        ThemeConnection => theme_connection, "Connection to the theme", Arc, Area;
        PeakCollapse => peak_collapse, "Peak collapse", Arc, Area;
        EndingFeeling => ending_feeling, "Ending feeling", Arc, Line;
        CoreWound => core_wound, "Core wound", Arc, Area;
        Fear => fear, "Fear", Arc, Line;
        MaskVsTrueSelf => mask_vs_true_self, "Mask vs true self", Arc, Area;
        ArcType => arc_type, "Arc type", Arc, Choice(ARC_TYPES);

        NeverAdmitOutLoud => never_admit_out_loud, "Would never admit out loud", DeepPsychology, Line;
        BeliefAboutSelf => belief_about_self, "Belief about self", DeepPsychology, Line;
        BeliefAboutWorld => belief_about_world, "Belief about the world", DeepPsychology, Line;
        PrimaryCoping => primary_coping, "Primary coping strategy", DeepPsychology, Line;
        EmotionalBlindSpot => emotional_blind_spot, "Emotional blind spot", DeepPsychology, Line;
        TriggerPoints => trigger_points, "Trigger points", DeepPsychology, Line;
        EmotionalDefense => emotional_defense, "Emotional defense", DeepPsychology, Line;
        MoralDilemma => moral_dilemma, "Moral dilemma", DeepPsychology, Area;
        UnconsciousFear => unconscious_fear, "Unconscious fear", DeepPsychology, Line;
        SourceOfShame => source_of_shame, "Source of shame", DeepPsychology, Line;
        RecurringNegativeThought => recurring_negative_thought, "Recurring negative thought", DeepPsychology, Line;
        GreatestInsecurity => greatest_insecurity, "Greatest insecurity", DeepPsychology, Line;
        SelfSabotage => self_sabotage, "Self-sabotage", DeepPsychology, Line;
        PretendToBe => pretend_to_be, "Pretends to be", DeepPsychology, Line;
        CantForgiveThemselves => cant_forgive_themselves, "Can't forgive themselves for", DeepPsychology, Line;
        PersonalHell => personal_hell, "Personal hell", DeepPsychology, Area;
        ValueMostDeepDown => value_most_deep_down, "Values most deep down", DeepPsychology, Line;
        BreaksSpiritually => breaks_spiritually, "What breaks them spiritually", DeepPsychology, Line;
        CoreMotivationUnderneath => core_motivation_underneath, "Core motivation underneath", DeepPsychology, Line;
        SeekFromOthers => seek_from_others, "Seeks from others", DeepPsychology, Line;
        HowHandleLoss => how_handle_loss, "How they handle loss", DeepPsychology, Line;
        RespondToAuthority => respond_to_authority, "Response to authority", DeepPsychology, Line;
        PainHideMost => pain_hide_most, "Pain they hide most", DeepPsychology, Line;
        AttachmentType => attachment_type, "Attachment type", DeepPsychology, Choice(ATTACHMENT_TYPES);
        FightFlightResponse => fight_flight_response, "Threat response", DeepPsychology, Choice(FIGHT_FLIGHT);
        DealWithBoredom => deal_with_boredom, "How they deal with boredom", DeepPsychology, Line;
        ReactToPraise => react_to_praise, "Reaction to praise", DeepPsychology, Line;
        DieToProtect => die_to_protect, "Would die to protect", DeepPsychology, Line;
        FearBecoming => fear_becoming, "Fears becoming", DeepPsychology, Line;

        TraumaResponseStyle => trauma_response_style, "Trauma response style", InnerWorld, Line;
        MemoryTriggers => memory_triggers, "Memory triggers", InnerWorld, Line;
        InnerMonologueStyle => inner_monologue_style, "Inner monologue style", InnerWorld, Area;

        ChapterRange => chapter_range, "Chapter range", PlotPlacement, Line;
        PlotRole => plot_role, "Plot role", PlotPlacement, Choice(PLOT_ROLES);
        Secrets => secrets, "Secrets", PlotPlacement, Area;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: ItemId,
    #[serde(flatten)]
    pub sheet: CharacterSheet,
    #[serde(default)]
    pub mental_health_tags: BTreeSet<String>,
}

impl Character {
    pub fn new(id: ItemId) -> Self {
        Self { id, sheet: CharacterSheet::default(), mental_health_tags: BTreeSet::new() }
    }

    pub fn display_name(&self) -> &str {
        let name = self.sheet.name.trim();
        if name.is_empty() {
            "Unnamed character"
        } else {
            name
        }
    }

    /// Flips one tag; returns whether the tag is now present.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.mental_health_tags.remove(tag) {
            false
        } else {
            self.mental_health_tags.insert(tag.to_string());
            true
        }
    }
}
