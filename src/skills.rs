//! Static skill descriptors shown in the skill tooltip.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

const BUNDLED_SKILLS: &str = include_str!("../assets/skills.json");

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SkillDescriptor {
    pub name: String,
    pub level: String,
    pub description: String,
    pub experience: String,
}

impl SkillDescriptor {
    /// Percentage embedded in the level label, e.g. `92` for `"Expert (92%)"`.
    pub fn percent(&self) -> Option<u8> {
        let open = self.level.rfind('(')?;
        let inner = self.level[open + 1..].strip_suffix(')')?;
        inner
            .trim()
            .strip_suffix('%')?
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|value| *value <= 100)
    }
}

#[derive(Debug, Error)]
pub enum SkillDataError {
    #[error("skill data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("skill `{0}` is listed more than once")]
    DuplicateName(String),
    #[error("skill `{name}` has no percentage in level `{level}`")]
    MissingPercentage { name: String, level: String },
}

#[derive(Clone, Debug, Default)]
pub struct SkillCatalog {
    by_name: HashMap<String, SkillDescriptor>,
}

impl SkillCatalog {
    pub fn from_json(raw: &str) -> Result<Self, SkillDataError> {
        let descriptors: Vec<SkillDescriptor> = serde_json::from_str(raw)?;
        Self::from_descriptors(descriptors)
    }

    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = SkillDescriptor>,
    ) -> Result<Self, SkillDataError> {
        let mut by_name = HashMap::new();

        for descriptor in descriptors {
            if descriptor.percent().is_none() {
                return Err(SkillDataError::MissingPercentage {
                    name: descriptor.name,
                    level: descriptor.level,
                });
            }

            if by_name.contains_key(&descriptor.name) {
                return Err(SkillDataError::DuplicateName(descriptor.name));
            }

            by_name.insert(descriptor.name.clone(), descriptor);
        }

        Ok(Self { by_name })
    }

    /// The table shipped in `assets/skills.json`.
    pub fn bundled() -> Result<Self, SkillDataError> {
        Self::from_json(BUNDLED_SKILLS)
    }

    /// Exact-match lookup; labels are not trimmed or case-folded.
    pub fn get(&self, name: &str) -> Option<&SkillDescriptor> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
