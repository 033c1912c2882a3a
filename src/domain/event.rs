use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{parse_date, Resource, SyncPolicy};
use crate::search::Searchable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Expected attendance, as entered by the organiser.
    #[serde(default)]
    pub attendees: i64,
}

impl Event {
    pub fn day(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
    #[validate(length(min = 1))]
    pub location: String,
    /// Optional in the form; the server files it under its own default.
    pub category: String,
    #[validate(range(min = 0))]
    pub attendees: i64,
}

impl Resource for Event {
    type Draft = EventDraft;

    const PATH: &'static str = "events";
    const NAME: &'static str = "event";
    const SYNC: SyncPolicy = SyncPolicy::Merge;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            time: self.time.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            category: self.category.clone(),
            attendees: self.attendees,
        }
    }
}

impl Searchable for Event {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            Some(self.description.as_str()),
            self.location.as_deref(),
            Some(self.category.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_default() {
        let event: Event =
            serde_json::from_str(r#"{"_id":"e1","title":"Hackathon","date":"2024-05-10"}"#)
                .unwrap();
        assert_eq!(event.attendees, 0);
        assert!(event.location.is_none());
        assert_eq!(event.day(), NaiveDate::from_ymd_opt(2024, 5, 10));
    }

    #[test]
    fn test_to_draft_fills_blanks() {
        let event = Event {
            id: "e1".into(),
            title: "Hackathon".into(),
            description: "48h".into(),
            date: "2024-05-10".into(),
            time: None,
            location: Some("Hall B".into()),
            category: "Competition".into(),
            attendees: 120,
        };
        let draft = event.to_draft();
        assert_eq!(draft.time, "");
        assert_eq!(draft.location, "Hall B");
        // time is required, so this edit cannot be submitted as-is
        assert!(draft.validate().is_err());
    }
}
