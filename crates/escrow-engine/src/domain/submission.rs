//! The deliverable-review sub-protocol attached to a funded milestone.
//!
//! A submission exists only once its milestone is paid. Rejection does not
//! delete it; the freelancer's next delivery replaces the payload in place
//! (a new version of the same record), and the client's last remark stays
//! readable until the next review decision overwrites or clears it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::EscrowError;

/// Opaque reference to a stored attachment, as returned by the attachment
/// store. The engine never inspects the content behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentRef(String);

impl AttachmentRef {
    /// Wraps an opaque reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Delivered content: an uploaded document or a URL, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPayload {
    /// Reference into the attachment store.
    Document(AttachmentRef),
    /// Link to externally hosted work.
    Url(String),
}

impl SubmissionPayload {
    /// Whether this is an uploaded document (vs. a URL).
    pub const fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}

/// Submission payload as it arrives on the wire: two optional fields, of
/// which exactly one must be present.
///
/// The create/update-submission API accepts either an uploaded file or a
/// `file_url` field; this DTO preserves that shape and the conversion into
/// [`SubmissionPayload`] enforces mutual exclusivity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSubmissionPayload {
    /// Attachment-store reference for an uploaded document.
    #[serde(default)]
    pub document: Option<AttachmentRef>,
    /// URL of externally hosted work.
    #[serde(default)]
    pub file_url: Option<String>,
}

impl RawSubmissionPayload {
    /// A document payload.
    pub fn document(reference: AttachmentRef) -> Self {
        Self {
            document: Some(reference),
            file_url: None,
        }
    }

    /// A URL payload.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            document: None,
            file_url: Some(url.into()),
        }
    }
}

impl TryFrom<RawSubmissionPayload> for SubmissionPayload {
    type Error = EscrowError;

    fn try_from(raw: RawSubmissionPayload) -> Result<Self, Self::Error> {
        match (raw.document, raw.file_url) {
            (Some(_), Some(_)) => Err(EscrowError::InvalidPayload {
                reason: "submission must carry a document or a URL, not both".into(),
            }),
            (None, None) => Err(EscrowError::InvalidPayload {
                reason: "submission must carry a document or a URL".into(),
            }),
            (Some(document), None) => {
                if document.as_str().trim().is_empty() {
                    return Err(EscrowError::InvalidPayload {
                        reason: "document reference is empty".into(),
                    });
                }
                Ok(Self::Document(document))
            }
            (None, Some(url)) => {
                let url = url.trim().to_string();
                if url.is_empty() {
                    return Err(EscrowError::InvalidPayload {
                        reason: "submission URL is empty".into(),
                    });
                }
                Ok(Self::Url(url))
            }
        }
    }
}

/// Review state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// Delivered, awaiting the client's decision.
    PendingReview,
    /// Accepted; terminal (the milestone becomes verified).
    Approved,
    /// Rejected with a remark; the freelancer may resubmit.
    Rejected,
}

/// A freelancer's delivered-work record for one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// The delivered content.
    pub payload: SubmissionPayload,
    /// Freelancer notes accompanying the delivery.
    pub notes: String,
    /// Review state.
    pub status: SubmissionStatus,
    /// The client's remark from the most recent rejection. Retained across
    /// a resubmission; cleared on approval.
    pub client_remark: Option<String>,
    /// When the current version was delivered.
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Creates a first-version submission in `PendingReview`.
    pub fn new(payload: SubmissionPayload, notes: String, now: DateTime<Utc>) -> Self {
        Self {
            payload,
            notes,
            status: SubmissionStatus::PendingReview,
            client_remark: None,
            submitted_at: now,
        }
    }

    /// Whether this submission is awaiting review.
    pub const fn is_pending_review(&self) -> bool {
        matches!(self.status, SubmissionStatus::PendingReview)
    }

    /// Replaces the delivered content after a rejection, returning the
    /// record to `PendingReview`. The prior remark is retained until the
    /// next review decision.
    pub fn resubmit(&mut self, payload: SubmissionPayload, notes: String, now: DateTime<Utc>) {
        debug_assert!(matches!(self.status, SubmissionStatus::Rejected));
        self.payload = payload;
        self.notes = notes;
        self.status = SubmissionStatus::PendingReview;
        self.submitted_at = now;
        // client_remark deliberately retained
    }

    /// Marks the submission approved and clears the remark.
    pub fn approve(&mut self) {
        self.status = SubmissionStatus::Approved;
        self.client_remark = None;
    }

    /// Marks the submission rejected, overwriting any prior remark.
    pub fn reject(&mut self, remark: String) {
        self.status = SubmissionStatus::Rejected;
        self.client_remark = Some(remark);
    }
}
