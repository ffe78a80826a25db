// src/flatten/columns.rs
use std::sync::LazyLock;

pub const EXPERIENCE_SLOTS: usize = 10;
pub const EDUCATION_SLOTS: usize = 3;
pub const LANGUAGE_SLOTS: usize = 3;

/// 11 scalars + 10x7 experience + 3x5 education + 3x2 language + 2 summaries.
pub const COLUMN_COUNT: usize = 104;

const SCALAR_COLUMNS: [&str; 11] = [
    "id",
    "id_type",
    "public_id",
    "profile_url",
    "full_name",
    "first_name",
    "last_name",
    "avatar",
    "headline",
    "location_name",
    "summary",
];

/// The fixed, ordered CSV schema. Every output row has exactly these
/// columns in this order, whatever shape the input profile had.
pub static COLUMNS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut columns: Vec<String> = SCALAR_COLUMNS.iter().map(|c| c.to_string()).collect();

    for i in 1..=EXPERIENCE_SLOTS {
        columns.push(format!("organization_{}", i));
        columns.push(format!("organization_id_{}", i));
        columns.push(format!("organization_url_{}", i));
        columns.push(format!("organization_title_{}", i));
        columns.push(format!("organization_start_{}", i));
        columns.push(format!("organization_end_{}", i));
        columns.push(format!("organization_description_{}", i));
    }

    for i in 1..=EDUCATION_SLOTS {
        columns.push(format!("education_{}", i));
        columns.push(format!("education_degree_{}", i));
        columns.push(format!("education_fos_{}", i));
        columns.push(format!("education_start_{}", i));
        columns.push(format!("education_end_{}", i));
    }

    for i in 1..=LANGUAGE_SLOTS {
        columns.push(format!("language_{}", i));
        columns.push(format!("language_proficiency_{}", i));
    }

    columns.push("languages".to_string());
    columns.push("skills".to_string());

    debug_assert_eq!(columns.len(), COLUMN_COUNT);
    columns
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_and_order() {
        assert_eq!(COLUMNS.len(), COLUMN_COUNT);
        assert_eq!(COLUMNS[0], "id");
        assert_eq!(COLUMNS[10], "summary");
        assert_eq!(COLUMNS[11], "organization_1");
        assert_eq!(COLUMNS[17], "organization_description_1");
        assert_eq!(COLUMNS[81], "education_1");
        assert_eq!(COLUMNS[96], "language_1");
        assert_eq!(COLUMNS[102], "languages");
        assert_eq!(COLUMNS[103], "skills");
    }
}
