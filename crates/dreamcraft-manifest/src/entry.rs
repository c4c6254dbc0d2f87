//! Manifest records.

use serde::{Deserialize, Serialize};

use crate::encode::portfolio_src;

/// One discovered portfolio image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioImageEntry {
    /// Position in discovery order, starting at 1
    pub id: u64,

    /// Lower-cased name of the category directory
    pub category: String,

    /// Public URL of the image
    pub src: String,

    /// Human-readable label
    pub alt: String,
}

impl PortfolioImageEntry {
    /// Build the entry for `filename` inside the category directory named
    /// `dir_name` (as it appears on disk).
    pub fn new(id: u64, dir_name: &str, filename: &str) -> Self {
        // Labels run one ahead of ids; published manifests carry this numbering.
        Self {
            id,
            category: dir_name.to_lowercase(),
            src: portfolio_src(dir_name, filename),
            alt: format!("{} project {}", dir_name, id + 1),
        }
    }
}

/// The ordered list of portfolio images, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<PortfolioImageEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<PortfolioImageEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PortfolioImageEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PortfolioImageEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PortfolioImageEntry> {
        self.entries.iter()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(&entry.category);
            }
        }
        seen
    }

    /// Entries whose category equals `category` exactly, in manifest order.
    pub fn in_category(&self, category: &str) -> Vec<&PortfolioImageEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Parse a manifest document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize with two-space indentation and no trailing newline.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl From<Vec<PortfolioImageEntry>> for Manifest {
    fn from(entries: Vec<PortfolioImageEntry>) -> Self {
        Self::new(entries)
    }
}

impl IntoIterator for Manifest {
    type Item = PortfolioImageEntry;
    type IntoIter = std::vec::IntoIter<PortfolioImageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a PortfolioImageEntry;
    type IntoIter = std::slice::Iter<'a, PortfolioImageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Manifest {
        Manifest::new(vec![
            PortfolioImageEntry::new(1, "kitchens", "a.jpg"),
            PortfolioImageEntry::new(2, "bedrooms", "b.jpg"),
            PortfolioImageEntry::new(3, "kitchens", "c.jpg"),
            PortfolioImageEntry::new(4, "office space", "d.jpg"),
        ])
    }

    #[test]
    fn builds_entry_fields() {
        let entry = PortfolioImageEntry::new(1, "Kitchens", "image1.jpg");

        assert_eq!(entry.category, "kitchens");
        assert_eq!(entry.src, "/portfolio/Kitchens/image1.jpg");
        assert_eq!(entry.alt, "Kitchens project 2");
    }

    #[test]
    fn serializes_as_bare_array() {
        let manifest = Manifest::new(vec![PortfolioImageEntry::new(1, "kitchens", "image1.jpg")]);

        let json = manifest.to_json_pretty().unwrap();

        assert_eq!(
            json,
            r#"[
  {
    "id": 1,
    "category": "kitchens",
    "src": "/portfolio/kitchens/image1.jpg",
    "alt": "kitchens project 2"
  }
]"#
        );
    }

    #[test]
    fn empty_manifest_is_empty_array() {
        assert_eq!(Manifest::default().to_json_pretty().unwrap(), "[]");
    }

    #[test]
    fn parses_published_manifest() {
        let json = r#"[{"id":7,"category":"bedrooms","src":"/portfolio/bedrooms/x.png","alt":"bedrooms project 8"}]"#;

        let manifest = Manifest::from_json(json).unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries()[0].id, 7);
    }

    #[test]
    fn rejects_documents_that_are_not_arrays() {
        assert!(Manifest::from_json(r#"{"images": []}"#).is_err());
    }

    #[test]
    fn filters_by_exact_category_in_order() {
        let manifest = sample();

        let kitchens: Vec<u64> = manifest.in_category("kitchens").iter().map(|e| e.id).collect();

        assert_eq!(kitchens, vec![1, 3]);
        assert!(manifest.in_category("kitchen").is_empty());
    }

    #[test]
    fn lists_categories_once() {
        assert_eq!(
            sample().categories(),
            vec!["kitchens", "bedrooms", "office space"]
        );
    }
}
