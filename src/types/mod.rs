// src/types/mod.rs
pub mod profile;

pub use profile::{
    CurrentCompany, EducationEntry, ExperienceEntry, LanguageEntry, PositionEntry, ProfileRecord,
    SkillEntry,
};
