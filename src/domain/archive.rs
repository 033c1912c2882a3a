use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    Announcement, Attachable, Event, Resource, SyncPolicy, UploadedFile,
};
use crate::search::Searchable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Raw type tag as stored by the server (`pdf`, `jpg`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Zip,
    Xlsx,
    Image,
    Video,
    Other,
}

impl FileType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "zip" => FileType::Zip,
            "xlsx" | "xls" => FileType::Xlsx,
            "image" | "jpg" | "jpeg" | "png" => FileType::Image,
            "video" | "mp4" => FileType::Video,
            _ => FileType::Other,
        }
    }
}

impl ArchiveItem {
    pub fn file_type(&self) -> FileType {
        FileType::from_tag(&self.kind)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveDraft {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    #[validate(length(min = 1))]
    pub category: String,
    pub file_url: String,
}

impl Resource for ArchiveItem {
    type Draft = ArchiveDraft;

    const PATH: &'static str = "archives";
    const NAME: &'static str = "archive item";
    const SYNC: SyncPolicy = SyncPolicy::Refetch;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> ArchiveDraft {
        ArchiveDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            kind: self.kind.clone(),
            size: self.size.clone().unwrap_or_default(),
            category: self.category.clone(),
            file_url: self.file_url.clone().unwrap_or_default(),
        }
    }
}

impl Attachable for ArchiveDraft {
    const UPLOAD_PATH: &'static str = "upload";

    fn attach(&mut self, file: &UploadedFile) {
        self.file_url = file.file_url.clone();
        self.size = file.size_label().unwrap_or_default();
    }
}

impl Searchable for ArchiveItem {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.title.as_str()), Some(self.category.as_str())]
    }
}

/// Where an entry of the unified archive listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveSource {
    Archive,
    Event,
    Announcement,
}

/// One row of the unified archive: real archive items plus read-only
/// projections of events and announcements.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveEntry {
    Archive(ArchiveItem),
    Event(Event),
    Announcement(Announcement),
}

/// The fields every archive entry can display.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveView<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub date: Cow<'a, str>,
    pub category: &'a str,
    pub kind: &'a str,
}

impl ArchiveEntry {
    /// Concatenate archives, events, then announcements.
    pub fn merge(
        archives: Vec<ArchiveItem>,
        events: Vec<Event>,
        announcements: Vec<Announcement>,
    ) -> Vec<ArchiveEntry> {
        let mut entries = Vec::with_capacity(archives.len() + events.len() + announcements.len());
        entries.extend(archives.into_iter().map(ArchiveEntry::Archive));
        entries.extend(events.into_iter().map(ArchiveEntry::Event));
        entries.extend(announcements.into_iter().map(ArchiveEntry::Announcement));
        entries
    }

    pub fn id(&self) -> &str {
        match self {
            ArchiveEntry::Archive(item) => &item.id,
            ArchiveEntry::Event(event) => &event.id,
            ArchiveEntry::Announcement(announcement) => &announcement.id,
        }
    }

    pub fn source(&self) -> ArchiveSource {
        match self {
            ArchiveEntry::Archive(_) => ArchiveSource::Archive,
            ArchiveEntry::Event(_) => ArchiveSource::Event,
            ArchiveEntry::Announcement(_) => ArchiveSource::Announcement,
        }
    }

    /// Only genuine archive items may be sent to update/delete.
    pub fn is_editable(&self) -> bool {
        self.source() == ArchiveSource::Archive
    }

    pub fn as_archive(&self) -> Option<&ArchiveItem> {
        match self {
            ArchiveEntry::Archive(item) => Some(item),
            _ => None,
        }
    }

    pub fn view(&self) -> ArchiveView<'_> {
        match self {
            ArchiveEntry::Archive(item) => ArchiveView {
                title: &item.title,
                description: &item.description,
                date: Cow::Borrowed(&item.date),
                category: &item.category,
                kind: &item.kind,
            },
            ArchiveEntry::Event(event) => ArchiveView {
                title: &event.title,
                description: &event.description,
                date: Cow::Borrowed(&event.date),
                category: "Events",
                kind: "Event",
            },
            ArchiveEntry::Announcement(announcement) => ArchiveView {
                title: &announcement.title,
                description: &announcement.content,
                date: announcement
                    .created_at
                    .map(|at| Cow::Owned(at.format("%Y-%m-%d").to_string()))
                    .unwrap_or(Cow::Borrowed("")),
                category: "Announcements",
                kind: "Announcement",
            },
        }
    }
}

impl Searchable for ArchiveEntry {
    fn search_fields(&self) -> Vec<Option<&str>> {
        let view = self.view();
        vec![Some(view.title), Some(view.category)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::filter;

    fn item(id: &str, title: &str, category: &str) -> ArchiveItem {
        ArchiveItem {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: category.into(),
            kind: "pdf".into(),
            size: None,
            date: "2024-01-15".into(),
            file_url: None,
        }
    }

    #[test]
    fn test_file_type_tags() {
        assert_eq!(FileType::from_tag("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_tag("xls"), FileType::Xlsx);
        assert_eq!(FileType::from_tag("jpeg"), FileType::Image);
        assert_eq!(FileType::from_tag("mp4"), FileType::Video);
        assert_eq!(FileType::from_tag("docx"), FileType::Other);
    }

    #[test]
    fn test_budget_query_matches_first_item_only() {
        let items = vec![
            item("1", "Budget Report", "Financial"),
            item("2", "Minutes Q1", "Minutes"),
        ];
        let found = filter(&items, "budget");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[test]
    fn test_merged_entries_are_tagged() {
        let event: Event =
            serde_json::from_str(r#"{"_id":"e1","title":"Budget Town Hall","date":"2024-02-01"}"#)
                .unwrap();
        let announcement: Announcement = serde_json::from_str(
            r#"{"_id":"n1","title":"Fees","content":"Pay by Friday","createdAt":"2024-03-01T09:30:00Z"}"#,
        )
        .unwrap();

        let entries = ArchiveEntry::merge(
            vec![item("1", "Budget Report", "Financial")],
            vec![event],
            vec![announcement],
        );

        let sources: Vec<_> = entries.iter().map(|e| e.source()).collect();
        assert_eq!(
            sources,
            vec![ArchiveSource::Archive, ArchiveSource::Event, ArchiveSource::Announcement]
        );
        assert!(entries[0].is_editable());
        assert!(!entries[1].is_editable());
        assert!(!entries[2].is_editable());

        assert_eq!(entries[1].view().category, "Events");
        assert_eq!(entries[2].view().description, "Pay by Friday");
        assert_eq!(entries[2].view().date, "2024-03-01");

        let found = filter(&entries, "budget");
        assert_eq!(found.len(), 2);
        assert_eq!(filter(&entries, "announcements").len(), 1);
    }

    #[test]
    fn test_attach_sets_url_and_size() {
        let mut draft = ArchiveDraft::default();
        draft.attach(&UploadedFile {
            file_url: "https://cdn/minutes.pdf".into(),
            size_bytes: 2 * 1024 * 1024,
        });
        assert_eq!(draft.file_url, "https://cdn/minutes.pdf");
        assert_eq!(draft.size, "2.00 MB");
    }
}
