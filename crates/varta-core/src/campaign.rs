//! # Campaigns
//!
//! Campaign records, the CSV upload form, and the response export.
//!
//! ## Upload
//!
//! A campaign is created by posting a multipart form to
//! `/campaigns/upload-csv`. The CSV is sent as opaque bytes; the backend
//! parses it and fans out the messages.
//!
//! ```rust
//! use varta_core::CampaignUpload;
//!
//! let upload = CampaignUpload::new("Diwali promo", "tmpl-1", "contacts.csv", b"phone\n9198".to_vec())
//!     .expect("valid upload");
//! assert_eq!(upload.uploaded_by(), varta_core::campaign::ANONYMOUS_UPLOADER);
//! ```

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{ApiError, ApiResult};
use crate::time::to_iso;

/// Uploader sent when the session has no user id.
pub const ANONYMOUS_UPLOADER: &str = "00000000-0000-0000-0000-000000000000";

/// Campaign lifecycle status. Unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CampaignStatus {
    /// Waiting to start.
    #[default]
    Pending,
    /// Sending.
    Running,
    /// Finished.
    Completed,
    /// Aborted.
    Failed,
    /// Any other status reported by the backend.
    Other(String),
}

impl CampaignStatus {
    /// Wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for CampaignStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<CampaignStatus> for String {
    fn from(value: CampaignStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A campaign as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Campaign ID.
    pub id: String,
    /// Campaign name.
    pub name: String,
    /// Status.
    #[serde(default)]
    pub status: CampaignStatus,
    /// Scheduled start; absent means immediate.
    #[serde(default)]
    pub scheduled_at: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Contacts in the uploaded CSV.
    #[serde(default)]
    pub total_contacts: Option<u64>,
    /// Contacts processed so far.
    #[serde(default)]
    pub processed_contacts: Option<u64>,
}

impl Campaign {
    /// Progress in percent, clamped to `0..=100`.
    ///
    /// Zero when the total is zero or unknown.
    ///
    /// ```rust
    /// # use varta_core::Campaign;
    /// # let mut c: Campaign = serde_json::from_str(r#"{"id":"1","name":"n"}"#).unwrap();
    /// c.total_contacts = Some(10);
    /// c.processed_contacts = Some(5);
    /// assert_eq!(c.progress_percent(), 50.0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        let total = self.total_contacts.unwrap_or(0);
        if total == 0 {
            return 0.0;
        }
        let processed = self.processed_contacts.unwrap_or(0);
        (processed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// `processed/total` with missing counts as 0.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!(
            "{}/{}",
            self.processed_contacts.unwrap_or(0),
            self.total_contacts.unwrap_or(0)
        )
    }

    /// Scheduled time for display, or `"Immediate"`.
    #[must_use]
    pub fn schedule_label(&self) -> String {
        match self.scheduled_at.as_deref().filter(|s| !s.is_empty()) {
            Some(at) => crate::time::display_datetime(at),
            None => "Immediate".to_string(),
        }
    }
}

/// Acknowledgement returned by `POST /campaigns/upload-csv`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CampaignCreated {
    /// New campaign ID.
    #[serde(default)]
    pub id: String,
    /// Campaign name.
    #[serde(default)]
    pub name: String,
    /// Initial status.
    #[serde(default)]
    pub status: CampaignStatus,
}

/// A validated campaign upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignUpload {
    name: String,
    template_id: String,
    file_name: String,
    csv: Vec<u8>,
    scheduled_at: Option<DateTime<Utc>>,
    uploaded_by: Option<String>,
}

impl CampaignUpload {
    /// Creates an upload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when the CSV is empty or no
    /// template is selected.
    pub fn new(
        name: impl Into<String>,
        template_id: impl Into<String>,
        file_name: impl Into<String>,
        csv: Vec<u8>,
    ) -> ApiResult<Self> {
        if csv.is_empty() {
            return Err(ApiError::invalid_input("file", "Please upload a CSV file."));
        }
        let template_id = template_id.into();
        if template_id.trim().is_empty() {
            return Err(ApiError::invalid_input(
                "templateId",
                "Please select a message template.",
            ));
        }
        Ok(Self {
            name: name.into(),
            template_id,
            file_name: file_name.into(),
            csv,
            scheduled_at: None,
            uploaded_by: None,
        })
    }

    /// Reads the CSV from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] for a blank path or any of the
    /// errors of [`CampaignUpload::new`], and [`ApiError::Io`] when the file
    /// cannot be read.
    pub fn from_path(
        name: impl Into<String>,
        template_id: impl Into<String>,
        path: &Path,
    ) -> ApiResult<Self> {
        if path.as_os_str().is_empty() {
            return Err(ApiError::invalid_input("file", "Please upload a CSV file."));
        }
        let csv = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "contacts.csv".to_string(), |n| n.to_string_lossy().into_owned());
        Self::new(name, template_id, file_name, csv)
    }

    /// Schedules the campaign.
    #[must_use]
    pub fn scheduled_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.scheduled_at = at;
        self
    }

    /// Records the uploading user.
    #[must_use]
    pub fn uploaded_by_user(mut self, user_id: Option<String>) -> Self {
        self.uploaded_by = user_id.filter(|id| !id.is_empty());
        self
    }

    /// Uploader id sent to the backend.
    #[must_use]
    pub fn uploaded_by(&self) -> &str {
        self.uploaded_by.as_deref().unwrap_or(ANONYMOUS_UPLOADER)
    }

    /// Campaign name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text fields of the form in send order, without the file.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("templateId", self.template_id.clone()),
        ];
        if let Some(at) = &self.scheduled_at {
            fields.push(("scheduledAt", to_iso(at)));
        }
        fields.push(("uploadedBy", self.uploaded_by().to_string()));
        fields
    }

    /// Builds the multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the MIME type cannot be set.
    pub fn into_form(self) -> ApiResult<Form> {
        let fields = self.fields();
        let part = Part::bytes(self.csv)
            .file_name(self.file_name)
            .mime_str("text/csv")?;
        Ok(fields
            .into_iter()
            .fold(Form::new().part("file", part), |form, (key, value)| {
                form.text(key, value)
            }))
    }
}

/// A downloaded response export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignExport {
    /// File name to save under.
    pub filename: String,
    /// CSV bytes.
    pub bytes: Vec<u8>,
}

impl CampaignExport {
    /// File name used when the response does not name one.
    #[must_use]
    pub fn default_filename(campaign_id: &str) -> String {
        format!("campaign-{campaign_id}-responses.csv")
    }

    /// Writes the export into `dir`, returning the full path.
    ///
    /// An existing file is never replaced; the name gets a ` (n)` suffix
    /// before the extension instead.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] if the directory or file cannot be written.
    pub fn save_to(&self, dir: &Path) -> ApiResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let (stem, ext) = match self.filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
            _ => (self.filename.as_str(), String::new()),
        };

        for n in 0..MAX_EXPORT_COPIES {
            let path = if n == 0 {
                dir.join(&self.filename)
            } else {
                dir.join(format!("{stem} ({n}){ext}"))
            };
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&self.bytes)?;
                    tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Saved campaign export");
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("too many copies of {} in {}", self.filename, dir.display()),
        )
        .into())
    }
}

/// Upper bound on ` (n)` suffixes tried by [`CampaignExport::save_to`].
const MAX_EXPORT_COPIES: u32 = 1000;

static DISPOSITION_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|;)\s*filename\s*=\s*(?:"((?:[^"\\]|\\.)*)"|([^;]*))"#)
        .expect("Invalid regex")
});

/// Extracts the file name from a `Content-Disposition` header.
///
/// Accepts `filename="..."` and bare `filename=...`, case-insensitively.
/// Directory components are stripped; an empty result is `None`.
///
/// ```rust
/// use varta_core::campaign::filename_from_disposition;
///
/// assert_eq!(
///     filename_from_disposition(r#"attachment; filename="foo.csv""#).as_deref(),
///     Some("foo.csv")
/// );
/// assert_eq!(filename_from_disposition("attachment"), None);
/// ```
#[must_use]
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let caps = DISPOSITION_FILENAME.captures(header)?;
    let value = match (caps.get(1), caps.get(2)) {
        (Some(quoted), _) => unescape_quoted(quoted.as_str()),
        (None, Some(bare)) => bare.as_str().trim().to_string(),
        (None, None) => return None,
    };

    let name = value
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    (!name.is_empty() && name != "." && name != "..").then(|| name.to_string())
}

/// Resolves `\x` escapes inside a quoted header value.
fn unescape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn campaign(processed: Option<u64>, total: Option<u64>) -> Campaign {
        Campaign {
            id: "c-1".into(),
            name: "Promo".into(),
            status: CampaignStatus::Pending,
            scheduled_at: None,
            created_at: None,
            total_contacts: total,
            processed_contacts: processed,
        }
    }

    #[test]
    fn progress_is_zero_guarded_and_clamped() {
        assert!(campaign(Some(5), Some(0)).progress_percent().abs() < f64::EPSILON);
        assert!(campaign(Some(5), None).progress_percent().abs() < f64::EPSILON);
        assert!((campaign(Some(5), Some(10)).progress_percent() - 50.0).abs() < f64::EPSILON);
        assert!((campaign(Some(15), Some(10)).progress_percent() - 100.0).abs() < f64::EPSILON);
        assert_eq!(campaign(None, Some(3)).progress_label(), "0/3");
    }

    #[test]
    fn schedule_label_defaults_to_immediate() {
        assert_eq!(campaign(None, None).schedule_label(), "Immediate");
        let mut c = campaign(None, None);
        c.scheduled_at = Some(String::new());
        assert_eq!(c.schedule_label(), "Immediate");
    }

    #[test]
    fn status_preserves_unknown_values() {
        let c: Campaign =
            serde_json::from_str(r#"{"id":"1","name":"n","status":"PAUSED"}"#).unwrap();
        assert_eq!(c.status, CampaignStatus::Other("PAUSED".into()));
        assert_eq!(serde_json::to_value(&c.status).unwrap(), "PAUSED");

        let c: Campaign =
            serde_json::from_str(r#"{"id":"1","name":"n","status":"RUNNING"}"#).unwrap();
        assert_eq!(c.status, CampaignStatus::Running);
    }

    #[test]
    fn upload_validation_messages() {
        let err = CampaignUpload::new("n", "t", "a.csv", Vec::new()).unwrap_err();
        assert_eq!(err.user_message(), "Please upload a CSV file.");

        let err = CampaignUpload::new("n", " ", "a.csv", b"x".to_vec()).unwrap_err();
        assert_eq!(err.user_message(), "Please select a message template.");
    }

    #[test]
    fn upload_fields_in_order() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let upload = CampaignUpload::new("Promo", "t-1", "a.csv", b"phone\n1".to_vec())
            .unwrap()
            .scheduled_at(Some(at))
            .uploaded_by_user(Some("u-7".into()));

        assert_eq!(
            upload.fields(),
            vec![
                ("name", "Promo".to_string()),
                ("templateId", "t-1".to_string()),
                ("scheduledAt", "2025-03-01T09:30:00.000Z".to_string()),
                ("uploadedBy", "u-7".to_string()),
            ]
        );
    }

    #[test]
    fn anonymous_uploader_without_user() {
        let upload = CampaignUpload::new("n", "t", "a.csv", b"x".to_vec())
            .unwrap()
            .uploaded_by_user(Some(String::new()));
        assert_eq!(upload.uploaded_by(), ANONYMOUS_UPLOADER);
        assert!(upload.fields().iter().all(|(k, _)| *k != "scheduledAt"));
    }

    #[test]
    fn from_path_reads_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.csv");
        std::fs::write(&path, "phone\n919800000001\n").unwrap();

        let upload = CampaignUpload::from_path("n", "t", &path).unwrap();
        assert_eq!(upload.file_name, "leads.csv");

        let missing = CampaignUpload::from_path("n", "t", &dir.path().join("nope.csv"));
        assert!(matches!(missing, Err(ApiError::Io(_))));
    }

    #[test]
    fn disposition_variants() {
        let cases = [
            (r#"attachment; filename="foo.csv""#, Some("foo.csv")),
            ("attachment; filename=bar.csv", Some("bar.csv")),
            (r#"attachment; FILENAME="Baz Report.csv""#, Some("Baz Report.csv")),
            (r#"attachment; filename="../../etc/passwd""#, Some("passwd")),
            (r#"attachment; filename="""#, None),
            (r#"attachment; filename="a;b.csv""#, Some("a;b.csv")),
            (r#"attachment; filename="say \"hi\".csv"; size=10"#, Some(r#"say "hi".csv"#)),
            (r#"attachment; filename*=UTF-8''x.csv; filename="y.csv""#, Some("y.csv")),
            ("inline", None),
        ];
        for (header, expected) in cases {
            assert_eq!(filename_from_disposition(header).as_deref(), expected, "{header}");
        }
    }

    #[test]
    fn export_saves_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let export = CampaignExport {
            filename: CampaignExport::default_filename("c-9"),
            bytes: b"a,b\n".to_vec(),
        };
        let path = export.save_to(&dir.path().join("downloads")).unwrap();
        assert!(path.ends_with("campaign-c-9-responses.csv"));
        assert_eq!(std::fs::read(path).unwrap(), b"a,b\n");
    }

    #[test]
    fn export_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let export = CampaignExport {
            filename: "responses.csv".into(),
            bytes: b"new\n".to_vec(),
        };
        std::fs::write(dir.path().join("responses.csv"), "old\n").unwrap();

        let first = export.save_to(dir.path()).unwrap();
        let second = export.save_to(dir.path()).unwrap();

        assert!(first.ends_with("responses (1).csv"));
        assert!(second.ends_with("responses (2).csv"));
        assert_eq!(std::fs::read(dir.path().join("responses.csv")).unwrap(), b"old\n");
        assert_eq!(std::fs::read(second).unwrap(), b"new\n");
    }
}
