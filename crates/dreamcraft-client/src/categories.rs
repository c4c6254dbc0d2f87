//! Portfolio categories and filtering.

use url::form_urlencoded;

use dreamcraft_manifest::PortfolioImageEntry;

/// A category offered as a gallery filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Value matched against entry categories
    pub id: &'static str,
    /// Button text
    pub label: &'static str,
}

/// Id of the unfiltered pseudo-category.
pub const ALL: &str = "all";

/// Filters shown on the gallery page, in display order.
pub const GALLERY_CATEGORIES: &[Category] = &[
    Category {
        id: ALL,
        label: "All Projects",
    },
    Category {
        id: "kitchens",
        label: "Modular Kitchens",
    },
    Category {
        id: "bedrooms",
        label: "Bedrooms & Wardrobes",
    },
    Category {
        id: "office space",
        label: "Office Spaces",
    },
];

/// Look up a gallery category by id.
pub fn find_category(id: &str) -> Option<&'static Category> {
    GALLERY_CATEGORIES.iter().find(|c| c.id == id)
}

/// The active category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Build a filter from an id; `"all"` selects everything.
    pub fn from_id(id: &str) -> Self {
        if id == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(id.to_string())
        }
    }

    /// Read the initial filter from a `category` query value.
    ///
    /// Only the known gallery categories are honored; anything else selects all.
    pub fn from_query_value(value: Option<&str>) -> Self {
        match value {
            Some(id) if id != ALL && find_category(id).is_some() => {
                CategoryFilter::Only(id.to_string())
            }
            _ => CategoryFilter::All,
        }
    }

    /// Read the initial filter from a raw query string such as `?category=office%20space`.
    pub fn from_query_string(query: &str) -> Self {
        let value = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .find(|(key, _)| key == "category")
            .map(|(_, value)| value);
        Self::from_query_value(value.as_deref())
    }

    pub fn id(&self) -> &str {
        match self {
            CategoryFilter::All => ALL,
            CategoryFilter::Only(id) => id,
        }
    }

    pub fn matches(&self, entry: &PortfolioImageEntry) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => entry.category == *id,
        }
    }

    /// Entries passing the filter, in their original order.
    pub fn apply<'a>(&self, entries: &'a [PortfolioImageEntry]) -> Vec<&'a PortfolioImageEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }

    /// Caption shown in the lightbox footer.
    pub fn caption(&self) -> &str {
        match self {
            CategoryFilter::All => "Portfolio",
            CategoryFilter::Only(id) => find_category(id).map(|c| c.label).unwrap_or(id.as_str()),
        }
    }
}
