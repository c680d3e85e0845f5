use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};

use crate::core::{
    profile::StoryProfile,
    BookgenError,
};

const APP_NAME: &str = "bookgen";
pub const SETTINGS_FILE: &str = "settings.json";
pub const DRAFT_EXTENSION: &str = "json";
const DRAFT_VERSION: u32 = 1;

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json_to<T: Serialize>(data: &T, path: &Path) -> Result<(), BookgenError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    tracing::debug!("Data saved to: {}", path.display());
    Ok(())
}

/// Reads `path`, or returns `T::default()` when the file does not exist.
pub fn load_json_from<T: DeserializeOwned + Default>(path: &Path) -> Result<T, BookgenError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let json = fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    tracing::debug!("Data loaded from: {}", path.display());
    Ok(data)
}

pub fn save_json<T: Serialize>(data: &T, filename: &str) -> Result<(), BookgenError> {
    save_json_to(data, &get_data_file_path(filename))
}

pub fn load_json_or_default<T: DeserializeOwned + Default>(filename: &str) -> T {
    match load_json_from::<T>(&get_data_file_path(filename)) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}. Using defaults.", filename, e);
            T::default()
        }
    }
}

/// UI preferences kept between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub dark_mode: bool,
    pub last_draft_dir: Option<PathBuf>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { dark_mode: true, last_draft_dir: None }
    }
}

impl UiSettings {
    pub fn load() -> Self {
        load_json_or_default(SETTINGS_FILE)
    }

    pub fn save(&self) -> Result<(), BookgenError> {
        save_json(self, SETTINGS_FILE)
    }

    pub fn remember_draft_path(&mut self, path: &Path) {
        self.last_draft_dir = path.parent().map(Path::to_path_buf);
    }
}

#[derive(Serialize)]
struct DraftRef<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    profile: &'a StoryProfile,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DraftFile {
    Wrapped { profile: StoryProfile },
    Request { story_data: StoryProfile },
    Bare(StoryProfile),
}

pub fn save_draft(profile: &StoryProfile, path: &Path) -> Result<(), BookgenError> {
    let draft = DraftRef { version: DRAFT_VERSION, saved_at: Utc::now(), profile };
    save_json_to(&draft, path)?;
    tracing::info!("Draft saved to {}", path.display());
    Ok(())
}

/// Loads a draft written by `save_draft`, a generation request body
/// (`{"story_data": ...}`), or a bare profile object.
pub fn load_draft(path: &Path) -> Result<StoryProfile, BookgenError> {
    let json = fs::read_to_string(path)?;
    let mut profile = match serde_json::from_str::<DraftFile>(&json) {
        Ok(DraftFile::Wrapped { profile })
        | Ok(DraftFile::Request { story_data: profile })
        | Ok(DraftFile::Bare(profile)) => profile,
        Err(e) => {
            return Err(BookgenError::Custom(format!(
                "{} is not a story draft: {e}",
                path.display()
            )))
        }
    };
    profile.plot_tools.clear_list_categories();
    tracing::info!("Draft loaded from {}", path.display());
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::types::{
            GenerateRequest,
            StoryPayload,
        },
        core::{
            character::Character,
            ids::ItemId,
            plot_tools::PlotItem,
        },
    };

    #[test]
    fn draft_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harbor.json");

        let mut profile = StoryProfile::default();
        profile.details.main_premise = "A harbor town sinks an inch a year".to_string();
        let mut keeper = Character::new(ItemId(11));
        keeper.sheet.name = "Odile".to_string();
        keeper.toggle_tag("Insomnia");
        profile.characters.push(keeper);
        profile.plot_tools.timebombs.push(PlotItem::new(ItemId(12)));
        profile.total_chapters = 30;

        save_draft(&profile, &path).unwrap();
        assert_eq!(load_draft(&path).unwrap(), profile);
    }

    #[test]
    fn bare_profile_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        fs::write(&path, r#"{"central_theme": "Debt", "total_chapters": 4}"#).unwrap();

        let profile = load_draft(&path).unwrap();
        assert_eq!(profile.details.central_theme, "Debt");
        assert_eq!(profile.total_chapters, 4);
    }

    #[test]
    fn request_body_loads_back_into_the_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");

        let mut profile = StoryProfile::default();
        profile.details.central_theme = "Debt".to_string();
        let mut keeper = Character::new(ItemId(3));
        keeper.sheet.name = "Odile".to_string();
        profile.characters.push(keeper);
        profile.plot_tools.plot_twists_by_role = vec![PlotItem {
            id: ItemId(4),
            content: "Mentor is thief".to_string(),
            detail: "loyalties".to_string(),
        }];
        profile.plot_tools.timebombs = vec![PlotItem {
            id: ItemId(5),
            content: "Dam".to_string(),
            detail: "ch 9".to_string(),
        }];
        profile.plot_tools.foreshadowing_seeds = vec![PlotItem {
            id: ItemId(6),
            content: "A cracked bell".to_string(),
            detail: String::new(),
        }];

        let request = GenerateRequest { story_data: StoryPayload::from_profile(&profile) };
        save_json_to(&request, &path).unwrap();

        assert_eq!(load_draft(&path).unwrap(), profile);
    }

    #[test]
    fn non_object_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(load_draft(&path).is_err());
    }

    #[test]
    fn missing_settings_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings: UiSettings = load_json_from(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, UiSettings::default());
        assert!(settings.dark_mode);
    }

    #[test]
    fn settings_round_trip_and_remember_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let mut settings = UiSettings { dark_mode: false, last_draft_dir: None };
        settings.remember_draft_path(&dir.path().join("drafts").join("one.json"));
        save_json_to(&settings, &path).unwrap();

        let loaded: UiSettings = load_json_from(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.last_draft_dir, Some(dir.path().join("drafts")));
    }
}
