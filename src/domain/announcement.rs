use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{lenient_timestamp, Resource, SyncPolicy};
use crate::search::Searchable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "createdBy")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl Announcement {
    pub fn category_label(&self) -> &str {
        self.category.as_deref().filter(|c| !c.is_empty()).unwrap_or("General")
    }

    pub fn priority_label(&self) -> String {
        self.priority
            .map(|p| p.as_str().to_uppercase())
            .unwrap_or_else(|| "GENERAL".to_string())
    }

    pub fn author_label(&self) -> &str {
        self.author.as_deref().filter(|a| !a.is_empty()).unwrap_or("Admin")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDraft {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(rename = "createdBy")]
    #[validate(length(min = 1))]
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Resource for Announcement {
    type Draft = AnnouncementDraft;

    const PATH: &'static str = "announcements";
    const NAME: &'static str = "announcement";
    const SYNC: SyncPolicy = SyncPolicy::Merge;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> AnnouncementDraft {
        AnnouncementDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone().unwrap_or_default(),
            category: self.category.clone(),
            priority: self.priority,
        }
    }
}

impl Searchable for Announcement {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            Some(self.content.as_str()),
            self.author.as_deref(),
            self.category.as_deref(),
        ]
    }
}
