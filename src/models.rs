use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub city: String,
    pub description: String,
    pub category: Category,
    pub requirements: Vec<String>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Music,
    Business,
    Tech,
    Art,
    Social,
    Sports,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Music,
        Category::Business,
        Category::Tech,
        Category::Art,
        Category::Social,
        Category::Sports,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Music => "Music",
            Category::Business => "Business",
            Category::Tech => "Tech",
            Category::Art => "Art",
            Category::Social => "Social",
            Category::Sports => "Sports",
            Category::Other => "Other",
        }
    }

    /// Exact, case-sensitive match on the recognized names; anything else is `Other`.
    pub fn coerce(raw: &str) -> Category {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == raw)
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the supported cities. Selection equality is by `slug`.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct City {
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
}

impl City {
    pub fn same_as(&self, other: &City) -> bool {
        self.slug == other.slug
    }
}
