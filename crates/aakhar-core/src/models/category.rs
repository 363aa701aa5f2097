use serde::{Deserialize, Serialize};

use crate::utils::capitalize;

/// A vocabulary category listed in the manifest (`_categories.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
}

impl Category {
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let title = title_from_id(&id);
        Self { id, title }
    }
}

/// "common_words" -> "Common Words"
pub fn title_from_id(id: &str) -> String {
    id.split('_').map(capitalize).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_id() {
        assert_eq!(title_from_id("common_words"), "Common Words");
        assert_eq!(title_from_id("relations"), "Relations");
        assert_eq!(title_from_id("days_of_the_week"), "Days Of The Week");
    }

    #[test]
    fn test_category_from_id_keeps_id() {
        let category = Category::from_id("common_phrases");
        assert_eq!(category.id, "common_phrases");
        assert_eq!(category.title, "Common Phrases");
    }
}
