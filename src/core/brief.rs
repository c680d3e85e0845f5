use super::{
    character::Character,
    profile::StoryProfile,
};

/// Renders the profile as the plain-text context block the generation agents
/// work from. Empty fields are left out; the target line is always present.
pub fn story_brief(profile: &StoryProfile) -> String {
    let details = &profile.details;
    let mut parts = Vec::new();

    for (heading, value) in [
        ("CENTRAL THEME", &details.central_theme),
        ("MAIN PREMISE", &details.main_premise),
        ("THINGS TO AVOID", &details.negative_prompt),
        ("GENRES", &details.genres),
        ("WORLD", &details.world_summary),
    ] {
        let value = value.trim();
        if !value.is_empty() {
            parts.push(format!("{heading}: {value}"));
        }
    }

    let cast: Vec<String> = profile.characters.iter().filter_map(character_line).collect();
    if !cast.is_empty() {
        parts.push(format!("CHARACTERS:\n{}", cast.join("\n")));
    }

    parts.push(format!(
        "TARGET: {} chapters, {} words per chapter minimum",
        profile.total_chapters, profile.min_words_per_chapter
    ));

    parts.join("\n\n")
}

fn character_line(character: &Character) -> Option<String> {
    let sheet = &character.sheet;
    let name = sheet.name.trim();
    if name.is_empty() {
        return None;
    }

    let mut line = format!("- {name}");
    if !sheet.archetype.trim().is_empty() {
        line.push_str(&format!(" ({})", sheet.archetype.trim()));
    }
    if !sheet.backstory_one_sentence.trim().is_empty() {
        line.push_str(&format!(": {}", sheet.backstory_one_sentence.trim()));
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::ItemId;

    #[test]
    fn empty_profile_only_has_target() {
        let brief = story_brief(&StoryProfile::default());
        assert_eq!(brief, "TARGET: 10 chapters, 900 words per chapter minimum");
    }

    #[test]
    fn renders_filled_fields_and_named_characters() {
        let mut profile = StoryProfile::default();
        profile.details.central_theme = "Memory".to_string();
        profile.details.genres = " gothic ".to_string();

        let mut mara = Character::new(ItemId(1));
        mara.sheet.name = "Mara".to_string();
        mara.sheet.archetype = "Mentor".to_string();
        mara.sheet.backstory_one_sentence = "Burned the archive.".to_string();
        let mut nameless = Character::new(ItemId(2));
        nameless.sheet.archetype = "Shadow".to_string();
        let mut tomas = Character::new(ItemId(3));
        tomas.sheet.name = "Tomas".to_string();
        profile.characters = vec![mara, nameless, tomas];
        profile.total_chapters = 12;

        let expected = "CENTRAL THEME: Memory\n\n\
                        GENRES: gothic\n\n\
                        CHARACTERS:\n- Mara (Mentor): Burned the archive.\n- Tomas\n\n\
                        TARGET: 12 chapters, 900 words per chapter minimum";
        assert_eq!(story_brief(&profile), expected);
    }
}
