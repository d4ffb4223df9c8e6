use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::Result;

/// Gender variant of a vocabulary source.
///
/// Variants are ordered so that pooling visits male, female, then neutral.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Neutral => "neutral",
        }
    }

    /// File name suffix for this variant; neutral sources carry none
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Gender::Male => Some("male"),
            Gender::Female => Some("female"),
            Gender::Neutral => None,
        }
    }
}

/// Ancestry of the character, driving adjectives, nouns and postfixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Aquatic,
    Desert,
    Mountain,
    Tundra,
    Urban,
    Forest,
    Air,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Aquatic => "aquatic",
            Origin::Desert => "desert",
            Origin::Mountain => "mountain",
            Origin::Tundra => "tundra",
            Origin::Urban => "urban",
            Origin::Forest => "forest",
            Origin::Air => "air",
        }
    }
}

/// Cultural bank forenames are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NameBank {
    American,
    Dwarf,
    French,
    Gaelic,
    Germanic,
    Orc,
    Portuguese,
}

impl NameBank {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameBank::American => "american",
            NameBank::Dwarf => "dwarf",
            NameBank::French => "french",
            NameBank::Gaelic => "gaelic",
            NameBank::Germanic => "germanic",
            NameBank::Orc => "orc",
            NameBank::Portuguese => "portuguese",
        }
    }
}

/// Ordering of forename and surname in the core of the name.
///
/// Values that cannot be recognised are kept as `Unrecognized` so the grammar
/// builder can report them and fall back to Western.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NameOrder {
    ForenameOnly,
    SurnameOnly,
    Eastern,
    Western,
    Unrecognized(String),
}

impl NameOrder {
    pub fn as_str(&self) -> &str {
        match self {
            NameOrder::ForenameOnly => "forename_only",
            NameOrder::SurnameOnly => "surname_only",
            NameOrder::Eastern => "eastern",
            NameOrder::Western => "western",
            NameOrder::Unrecognized(value) => value,
        }
    }
}

impl From<&str> for NameOrder {
    fn from(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "forenameonly" | "forename" => NameOrder::ForenameOnly,
            "surnameonly" | "surname" => NameOrder::SurnameOnly,
            "eastern" => NameOrder::Eastern,
            "western" => NameOrder::Western,
            _ => NameOrder::Unrecognized(value.to_string()),
        }
    }
}

impl From<String> for NameOrder {
    fn from(value: String) -> Self {
        NameOrder::from(value.as_str())
    }
}

impl From<NameOrder> for String {
    fn from(order: NameOrder) -> Self {
        order.as_str().to_string()
    }
}

impl fmt::Display for NameOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a name generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    /// Requested gender variants; empty means neutral
    pub genders: BTreeSet<Gender>,
    /// Prefix the name with a title drawn from the positions vocabulary
    pub has_title_prefix: bool,
    /// Append "of <place>" drawn from the origin's postfixes
    pub has_origin_postfix: bool,
    /// Allow the title and postfix segments to expand to nothing
    pub optional_segments: bool,
    pub origin: Origin,
    pub name_bank: NameBank,
    pub order: NameOrder,
}

impl Default for NameConfig {
    fn default() -> Self {
        NameConfig {
            genders: BTreeSet::from([Gender::Male]),
            has_title_prefix: true,
            has_origin_postfix: true,
            optional_segments: false,
            origin: Origin::Mountain,
            name_bank: NameBank::Dwarf,
            order: NameOrder::Western,
        }
    }
}

impl NameConfig {
    /// Create a config with no gender selected and no title
    pub fn new(origin: Origin, name_bank: NameBank) -> Self {
        NameConfig {
            genders: BTreeSet::new(),
            has_title_prefix: false,
            origin,
            name_bank,
            ..NameConfig::default()
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.genders.insert(gender);
        self
    }

    pub fn with_order(mut self, order: impl Into<NameOrder>) -> Self {
        self.order = order.into();
        self
    }

    pub fn with_title_prefix(mut self, enabled: bool) -> Self {
        self.has_title_prefix = enabled;
        self
    }

    pub fn with_origin_postfix(mut self, enabled: bool) -> Self {
        self.has_origin_postfix = enabled;
        self
    }

    pub fn with_optional_segments(mut self, enabled: bool) -> Self {
        self.optional_segments = enabled;
        self
    }

    /// Whether any gender flag is set
    pub fn has_gender_selection(&self) -> bool {
        !self.genders.is_empty()
    }

    /// Gender variants to draw gendered vocabulary from, in pooling order.
    ///
    /// An empty selection resolves to exactly the neutral variant.
    pub fn gender_variants(&self) -> Vec<Gender> {
        if self.genders.is_empty() {
            vec![Gender::Neutral]
        } else {
            self.genders.iter().copied().collect()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
