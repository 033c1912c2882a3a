use std::collections::BTreeMap;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{parse_date, Attachable, Resource, SyncPolicy, UploadedFile};
use crate::search::Searchable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub lecture_hall: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub file_url: Option<String>,
}

impl TimetableEntry {
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        let date = parse_date(&self.date)?;
        let time = NaiveTime::parse_from_str(&self.start_time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&self.start_time, "%H:%M:%S"))
            .ok()?;
        Some(date.and_time(time))
    }
}

/// Group entries by level, each group in chronological order.
///
/// Entries whose date or start time cannot be read keep their relative
/// order at the end of their group.
pub fn group_by_level<'a, I>(entries: I) -> BTreeMap<&'a str, Vec<&'a TimetableEntry>>
where
    I: IntoIterator<Item = &'a TimetableEntry>,
{
    let mut groups: BTreeMap<&str, Vec<&TimetableEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.level.as_str()).or_default().push(entry);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|entry| {
            let at = entry.starts_at();
            (at.is_none(), at)
        });
    }
    groups
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimetableDraft {
    #[validate(length(min = 1))]
    pub level: String,
    #[validate(length(min = 1))]
    pub course_code: String,
    #[validate(length(min = 1))]
    pub course_title: String,
    #[validate(length(min = 1))]
    pub lecture_hall: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub start_time: String,
    #[validate(length(min = 1))]
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl Resource for TimetableEntry {
    type Draft = TimetableDraft;

    const PATH: &'static str = "timetables";
    const NAME: &'static str = "timetable";
    const SYNC: SyncPolicy = SyncPolicy::Refetch;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> TimetableDraft {
        TimetableDraft {
            level: self.level.clone(),
            course_code: self.course_code.clone(),
            course_title: self.course_title.clone(),
            lecture_hall: self.lecture_hall.clone(),
            date: self.date.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            file_url: self.file_url.clone(),
        }
    }
}

impl Attachable for TimetableDraft {
    const UPLOAD_PATH: &'static str = "timetables/upload";

    fn attach(&mut self, file: &UploadedFile) {
        self.file_url = Some(file.file_url.clone());
    }
}

impl Searchable for TimetableEntry {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.course_code.as_str()),
            Some(self.course_title.as_str()),
            Some(self.level.as_str()),
            Some(self.lecture_hall.as_str()),
        ]
    }
}
