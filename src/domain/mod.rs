use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

pub mod announcement;
pub mod event;
pub mod archive;
pub mod timetable;
pub mod user;

pub use announcement::*;
pub use event::*;
pub use archive::*;
pub use timetable::*;
pub use user::*;

/// How a manager brings its local collection back in line after a
/// successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Patch the local collection with the server's response.
    Merge,
    /// Discard the local collection and list again.
    Refetch,
}

/// A REST collection the portal reads and writes.
///
/// Entities always carry a server-assigned identifier; anything not yet
/// saved lives in the companion [`Resource::Draft`].
pub trait Resource: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    type Draft: Serialize + Validate + Default + Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Collection path under the API base. Also the envelope key some
    /// list responses wrap the array in.
    const PATH: &'static str;
    /// Singular name used in logs and confirmation prompts.
    const NAME: &'static str;
    const SYNC: SyncPolicy;

    fn id(&self) -> &str;

    /// Current field values as an editable draft.
    fn to_draft(&self) -> Self::Draft;
}

/// Drafts that accept an uploaded file.
pub trait Attachable {
    /// Upload endpoint under the API base.
    const UPLOAD_PATH: &'static str;

    fn attach(&mut self, file: &UploadedFile);
}

/// Response of the multipart upload endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_url: String,
    /// Byte length of what was sent; not part of the payload.
    #[serde(skip)]
    pub size_bytes: u64,
}

impl UploadedFile {
    /// Size label shown next to archive files, e.g. `1.50 MB`.
    pub fn size_label(&self) -> Option<String> {
        if self.size_bytes == 0 {
            return None;
        }
        Some(format!("{:.2} MB", self.size_bytes as f64 / (1024.0 * 1024.0)))
    }
}

/// Take the calendar date from either `2024-03-01` or a full ISO timestamp.
pub(crate) fn parse_date(raw: &str) -> Option<chrono::NaiveDate> {
    let head = raw.get(..10).unwrap_or(raw);
    chrono::NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Read a creation timestamp that may be a full ISO timestamp, a bare
/// date, or junk. Junk becomes `None` rather than failing the record.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(raw)) => parse_timestamp(&raw),
        _ => None,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .ok()
        .or_else(|| Some(parse_date(raw)?.and_hms_opt(0, 0, 0)?.and_utc()))
}
