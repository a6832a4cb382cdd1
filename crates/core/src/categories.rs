//! Category and task pool provider

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::models::TaskKind;

const EMBEDDED_CATEGORIES: &str = include_str!("../data/categories.json");

/// A named pool of truths and dares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub truths: Vec<String>,
    /// Dares
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Category {
    pub fn pool(&self, kind: TaskKind) -> &[String] {
        match kind {
            TaskKind::Truth => &self.truths,
            TaskKind::Dare => &self.actions,
        }
    }
}

pub fn parse_categories(json: &str) -> Result<Vec<Category>> {
    serde_json::from_str(json).map_err(|e| GameError::Config(format!("Invalid categories: {}", e)))
}

/// Categories shipped with the crate
pub fn embedded_categories() -> Vec<Category> {
    match parse_categories(EMBEDDED_CATEGORIES) {
        Ok(categories) => categories,
        Err(e) => {
            tracing::warn!("Embedded categories rejected: {}", e);
            Vec::new()
        }
    }
}

pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Result<&'a Category> {
    categories
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| GameError::UnknownCategory(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_categories_have_tasks() {
        let categories = embedded_categories();
        assert!(!categories.is_empty());
        let classic = find_category(&categories, "classic").unwrap();
        assert!(!classic.pool(TaskKind::Truth).is_empty());
        assert!(!classic.pool(TaskKind::Dare).is_empty());
    }

    #[test]
    fn test_missing_pools_default_to_empty() {
        let categories = parse_categories(r#"[{"id": "x", "name": "X"}]"#).unwrap();
        assert!(categories[0].pool(TaskKind::Dare).is_empty());
    }

    #[test]
    fn test_unknown_category() {
        let categories = embedded_categories();
        assert_eq!(
            find_category(&categories, "nope").unwrap_err(),
            GameError::UnknownCategory("nope".to_string())
        );
    }
}
