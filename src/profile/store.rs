// Profile store - one JSON file per user under the profiles directory

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::{Profile, RatingRecord};

/// Loads and saves [`Profile`] records, one `<name>.json` file per user.
pub struct ProfileStore {
    profiles_dir: PathBuf,
}

impl ProfileStore {
    pub fn new(profiles_dir: PathBuf) -> Self {
        Self { profiles_dir }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{}.json", name))
    }

    /// Load the profile for `name`, bumping its visit count in the
    /// returned value, or create a fresh one if no record exists.
    ///
    /// A missing file is not an error; an unparsable one is.
    pub fn load_or_create(&self, name: &str) -> Result<Profile> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(Profile::new(name));
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))?;
        let file: ProfileFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse profile: {}", path.display()))?;

        let mut profile = file
            .into_profile()
            .with_context(|| format!("Malformed profile record: {}", path.display()))?;
        profile.visits += 1;
        Ok(profile)
    }

    /// Persist the full profile, creating the profiles directory if
    /// absent. Writes a sibling temp file and renames it over the
    /// target so a failed save leaves any prior record intact.
    pub fn save(&self, profile: &Profile) -> Result<()> {
        fs::create_dir_all(&self.profiles_dir).with_context(|| {
            format!(
                "Failed to create profiles directory: {}",
                self.profiles_dir.display()
            )
        })?;

        let payload = serde_json::to_string_pretty(&ProfileFile::from_profile(profile))
            .context("Failed to serialize profile")?;

        let path = self.path_for(&profile.name);
        let tmp = self.profiles_dir.join(format!("{}.json.tmp", profile.name));
        fs::write(&tmp, payload)
            .with_context(|| format!("Failed to write profile: {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace profile: {}", path.display()))?;
        Ok(())
    }
}

/// On-disk shape: `Ratings` is a map of `Rating<N>` keys, N being the
/// visit number active during the rated session.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Visits")]
    visits: u32,
    #[serde(rename = "Ratings")]
    ratings: BTreeMap<String, RatingFile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RatingFile {
    #[serde(rename = "Accuracy")]
    accuracy: u32,
    #[serde(rename = "Detail")]
    detail: u32,
    #[serde(rename = "Recommended")]
    recommended: u32,
    #[serde(rename = "Overall")]
    overall: u32,
}

impl ProfileFile {
    fn from_profile(profile: &Profile) -> Self {
        let ratings = profile
            .ratings
            .iter()
            .map(|r| {
                (
                    format!("Rating{}", r.visit),
                    RatingFile {
                        accuracy: r.accuracy,
                        detail: r.detail,
                        recommended: r.recommended,
                        overall: r.overall,
                    },
                )
            })
            .collect();

        Self {
            name: profile.name.clone(),
            visits: profile.visits,
            ratings,
        }
    }

    fn into_profile(self) -> Result<Profile> {
        if self.visits == 0 {
            bail!("visit count must be positive");
        }

        let mut ratings = Vec::with_capacity(self.ratings.len());
        for (key, rating) in self.ratings {
            let visit: u32 = key
                .strip_prefix("Rating")
                .and_then(|n| n.parse().ok())
                .with_context(|| format!("Bad rating key: {}", key))?;

            for (field, value) in [
                ("Accuracy", rating.accuracy),
                ("Detail", rating.detail),
                ("Recommended", rating.recommended),
                ("Overall", rating.overall),
            ] {
                if !(1..=10).contains(&value) {
                    bail!("{} out of range in {}: {}", field, key, value);
                }
            }

            ratings.push(RatingRecord {
                visit,
                accuracy: rating.accuracy,
                detail: rating.detail,
                recommended: rating.recommended,
                overall: rating.overall,
            });
        }

        // Map keys are unique; order them by visit number, not lexically.
        ratings.sort_by_key(|r| r.visit);

        Ok(Profile {
            name: self.name,
            visits: self.visits,
            ratings,
        })
    }
}
