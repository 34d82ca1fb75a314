use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

/// Identifier wrapper for contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionId(pub i64);

/// Identifier wrapper for user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Identifier wrapper for file type registry rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTypeId(pub i64);

/// Identifier wrapper for editing tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub i64);

/// Identifier wrapper for editables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditableId(pub i64);

/// Identifier wrapper for revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(pub i64);

/// Identifier wrapper for revision comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub i64);

/// Account subset carried around for attribution and permission checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub avatar_bg_color: String,
}

/// Event scope for the editing workflow, including the accounts holding the
/// `paper_editing` management permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub editing_managers: BTreeSet<UserId>,
}

impl Event {
    pub fn can_manage_editing(&self, user: Option<&User>) -> bool {
        user.map(|user| self.editing_managers.contains(&user.id))
            .unwrap_or(false)
    }
}

/// Contribution an editable is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub id: ContributionId,
    pub event_id: EventId,
    pub title: String,
    pub friendly_id: u32,
}

/// Editable categories, exposed as URL segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableType {
    Paper,
    Slides,
    Poster,
}

impl EditableType {
    pub const fn name(self) -> &'static str {
        match self {
            EditableType::Paper => "paper",
            EditableType::Slides => "slides",
            EditableType::Poster => "poster",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "paper" => Some(EditableType::Paper),
            "slides" => Some(EditableType::Slides),
            "poster" => Some(EditableType::Poster),
            _ => None,
        }
    }
}

/// Per-event registry row describing one kind of file accepted for editing
/// submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditingFileType {
    pub id: FileTypeId,
    pub event_id: EventId,
    pub name: String,
    pub extensions: Vec<String>,
    pub allow_multiple_files: bool,
    pub required: bool,
    pub publishable: bool,
}

impl EditingFileType {
    pub fn new(id: FileTypeId, event_id: EventId, name: impl Into<String>) -> Self {
        Self {
            id,
            event_id,
            name: name.into(),
            extensions: Vec::new(),
            allow_multiple_files: false,
            required: false,
            publishable: false,
        }
    }

    /// Key for the per-event unique index: names collide ignoring case.
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Labeled marker applicable to revisions. System tags are managed by the
/// workflow itself rather than event organizers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditingTag {
    pub id: TagId,
    pub event_id: EventId,
    pub code: String,
    pub title: String,
    pub color: String,
    pub system: bool,
}

impl EditingTag {
    /// Human-facing label combining code and title.
    pub fn verbose_title(&self) -> String {
        format!("{}: {}", self.code, self.title)
    }
}

/// State a revision enters the timeline in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialRevisionState {
    New,
    ReadyForReview,
    NeedsSubmitterConfirmation,
}

impl InitialRevisionState {
    pub const fn title(self) -> &'static str {
        match self {
            InitialRevisionState::New => "New",
            InitialRevisionState::ReadyForReview => "Ready for review",
            InitialRevisionState::NeedsSubmitterConfirmation => "Needs confirmation",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            InitialRevisionState::New => "new",
            InitialRevisionState::ReadyForReview => "ready_for_review",
            InitialRevisionState::NeedsSubmitterConfirmation => "needs_submitter_confirmation",
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            InitialRevisionState::New => "",
            InitialRevisionState::ReadyForReview => "ready",
            InitialRevisionState::NeedsSubmitterConfirmation => "highlight",
        }
    }
}

/// Terminal state recorded once a revision has been dealt with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalRevisionState {
    Replaced,
    NeedsSubmitterChanges,
    Accepted,
    Rejected,
}

impl FinalRevisionState {
    pub const fn title(self) -> &'static str {
        match self {
            FinalRevisionState::Replaced => "Replaced",
            FinalRevisionState::NeedsSubmitterChanges => "Needs changes",
            FinalRevisionState::Accepted => "Accepted",
            FinalRevisionState::Rejected => "Rejected",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FinalRevisionState::Replaced => "replaced",
            FinalRevisionState::NeedsSubmitterChanges => "needs_submitter_changes",
            FinalRevisionState::Accepted => "accepted",
            FinalRevisionState::Rejected => "rejected",
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            FinalRevisionState::Replaced => "replaced",
            FinalRevisionState::NeedsSubmitterChanges => "warning",
            FinalRevisionState::Accepted => "success",
            FinalRevisionState::Rejected => "danger",
        }
    }
}

/// File attached to a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditingRevisionFile {
    pub uuid: Uuid,
    pub filename: String,
    pub size: u64,
    pub content_type: String,
    pub file_type_id: FileTypeId,
}

/// Comment on a revision. `internal` restricts visibility to editing managers;
/// `system` marks notes generated by the workflow itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditingRevisionComment {
    pub id: CommentId,
    pub revision_id: RevisionId,
    pub author: Option<User>,
    pub created_dt: DateTime<Utc>,
    pub modified_dt: Option<DateTime<Utc>>,
    pub internal: bool,
    pub system: bool,
    pub text: String,
}

impl EditingRevisionComment {
    /// Authors may edit their own comments and editing managers may edit any;
    /// system notes are immutable.
    pub fn can_modify(&self, user: Option<&User>, event: &Event) -> bool {
        if self.system {
            return false;
        }
        let Some(user) = user else {
            return false;
        };
        if event.can_manage_editing(Some(user)) {
            return true;
        }
        self.author
            .as_ref()
            .map(|author| author.id == user.id)
            .unwrap_or(false)
    }
}

/// One submitted version of an editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditingRevision {
    pub id: RevisionId,
    pub editable_id: EditableId,
    pub submitter: User,
    pub editor: Option<User>,
    pub created_dt: DateTime<Utc>,
    pub comment: String,
    pub files: Vec<EditingRevisionFile>,
    pub comments: Vec<EditingRevisionComment>,
    pub tag_ids: BTreeSet<TagId>,
    pub initial_state: InitialRevisionState,
    pub final_state: Option<FinalRevisionState>,
}

impl EditingRevision {
    /// A confirmation is outstanding while the revision awaits the submitter
    /// and nothing final has been recorded.
    pub fn awaits_submitter_confirmation(&self) -> bool {
        self.initial_state == InitialRevisionState::NeedsSubmitterConfirmation
            && self.final_state.is_none()
    }
}

/// Aggregate tying a contribution to its review timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editable {
    pub id: EditableId,
    pub contribution_id: ContributionId,
    pub event_id: EventId,
    pub editable_type: EditableType,
    pub editor: Option<User>,
    pub revisions: Vec<EditingRevision>,
}

impl Editable {
    pub fn latest_revision(&self) -> Option<&EditingRevision> {
        self.revisions.last()
    }

    /// Submitters, the assigned editor, and editing managers may comment.
    pub fn can_comment(&self, user: Option<&User>, event: &Event) -> bool {
        let Some(user) = user else {
            return false;
        };
        if event.can_manage_editing(Some(user)) {
            return true;
        }
        if self
            .editor
            .as_ref()
            .map(|editor| editor.id == user.id)
            .unwrap_or(false)
        {
            return true;
        }
        self.revisions
            .iter()
            .any(|revision| revision.submitter.id == user.id)
    }
}
