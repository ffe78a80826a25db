// src/types/profile.rs
//! Profile payload as delivered by the extraction dataset. Everything is
//! optional: an absent field flattens to an empty CSV value, never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Numeric profile id; arrives as a JSON number or string depending on
    /// the dataset version, so it is kept loose until flattening.
    pub linkedin_num_id: Option<Value>,
    pub linkedin_id: Option<String>,
    pub url: Option<String>,
    pub input_url: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub position: Option<String>,
    pub city: Option<String>,
    pub about: Option<String>,
    pub current_company: Option<CurrentCompany>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub languages: Option<Vec<LanguageEntry>>,
    pub skills: Option<Vec<SkillEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentCompany {
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub description_html: Option<String>,
    /// Several roles held at the same organization. When present and
    /// non-empty, each position becomes its own flattened experience slot.
    pub positions: Option<Vec<PositionEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionEntry {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub description_html: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    pub title: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_year: Option<Value>,
    pub end_year: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: Option<String>,
}
