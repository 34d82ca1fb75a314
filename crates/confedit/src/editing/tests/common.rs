use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::editing::domain::{
    CommentId, Contribution, ContributionId, Editable, EditableId, EditableType, EditingFileType,
    EditingRevision, EditingRevisionComment, EditingRevisionFile, EditingTag, Event, EventId,
    FileTypeId, FinalRevisionState, InitialRevisionState, RevisionId, TagId, User, UserId,
};
use crate::editing::repository::{EditableRepository, FileTypeRepository, RepositoryError};
use crate::editing::service::EditingService;

pub(super) const EVENT: EventId = EventId(1);
pub(super) const CONTRIB_READY: ContributionId = ContributionId(10);
pub(super) const CONTRIB_CONFIRMING: ContributionId = ContributionId(11);
pub(super) const CONTRIB_BARE: ContributionId = ContributionId(12);
pub(super) const EDITABLE_READY: EditableId = EditableId(100);
pub(super) const EDITABLE_CONFIRMING: EditableId = EditableId(101);

pub(super) fn manager() -> User {
    User {
        id: UserId(1),
        full_name: "Ada Cole".to_string(),
        avatar_bg_color: "#7a3433".to_string(),
    }
}

pub(super) fn assigned_editor() -> User {
    User {
        id: UserId(2),
        full_name: "Clara Jung".to_string(),
        avatar_bg_color: "#2d6a4f".to_string(),
    }
}

pub(super) fn submitter() -> User {
    User {
        id: UserId(3),
        full_name: "Ben Ortiz".to_string(),
        avatar_bg_color: "#1d3557".to_string(),
    }
}

pub(super) fn outsider() -> User {
    User {
        id: UserId(4),
        full_name: "Olga Marin".to_string(),
        avatar_bg_color: "#6c757d".to_string(),
    }
}

pub(super) fn event() -> Event {
    Event {
        id: EVENT,
        title: "Computational Plasma Workshop".to_string(),
        editing_managers: BTreeSet::from([manager().id]),
    }
}

pub(super) fn contribution(id: ContributionId, title: &str, friendly_id: u32) -> Contribution {
    Contribution {
        id,
        event_id: EVENT,
        title: title.to_string(),
        friendly_id,
    }
}

pub(super) fn tags() -> Vec<EditingTag> {
    vec![
        EditingTag {
            id: TagId(1),
            event_id: EVENT,
            code: "S10".to_string(),
            title: "Item 10".to_string(),
            color: "blue".to_string(),
            system: false,
        },
        EditingTag {
            id: TagId(2),
            event_id: EVENT,
            code: "S2".to_string(),
            title: "Item 2".to_string(),
            color: "orange".to_string(),
            system: true,
        },
    ]
}

pub(super) fn paper_file(file_type_id: FileTypeId) -> EditingRevisionFile {
    EditingRevisionFile {
        uuid: Uuid::new_v4(),
        filename: "paper.pdf".to_string(),
        size: 184_201,
        content_type: "application/pdf".to_string(),
        file_type_id,
    }
}

fn timestamp(hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 9, hour, 0, 0).single().expect("valid timestamp")
}

/// Editable whose single revision is ready for an editor's review. Its comment
/// list carries one public and one internal comment.
pub(super) fn editable_ready_for_review() -> Editable {
    let revision_id = RevisionId(1);
    Editable {
        id: EDITABLE_READY,
        contribution_id: CONTRIB_READY,
        event_id: EVENT,
        editable_type: EditableType::Paper,
        editor: Some(assigned_editor()),
        revisions: vec![EditingRevision {
            id: revision_id,
            editable_id: EDITABLE_READY,
            submitter: submitter(),
            editor: None,
            created_dt: timestamp(9),
            comment: "Initial upload with <raw> markup".to_string(),
            files: vec![paper_file(FileTypeId(900))],
            comments: vec![
                EditingRevisionComment {
                    id: CommentId(501),
                    revision_id,
                    author: Some(submitter()),
                    created_dt: timestamp(10),
                    modified_dt: None,
                    internal: false,
                    system: false,
                    text: "Figures are in the appendix".to_string(),
                },
                EditingRevisionComment {
                    id: CommentId(502),
                    revision_id,
                    author: Some(manager()),
                    created_dt: timestamp(11),
                    modified_dt: None,
                    internal: true,
                    system: false,
                    text: "Check the plagiarism report first".to_string(),
                },
            ],
            tag_ids: BTreeSet::from([TagId(1), TagId(2)]),
            initial_state: InitialRevisionState::ReadyForReview,
            final_state: None,
        }],
    }
}

/// Editable whose latest revision awaits the submitter's confirmation.
pub(super) fn editable_awaiting_confirmation() -> Editable {
    let first = RevisionId(1);
    let second = RevisionId(2);
    Editable {
        id: EDITABLE_CONFIRMING,
        contribution_id: CONTRIB_CONFIRMING,
        event_id: EVENT,
        editable_type: EditableType::Paper,
        editor: Some(assigned_editor()),
        revisions: vec![
            EditingRevision {
                id: first,
                editable_id: EDITABLE_CONFIRMING,
                submitter: submitter(),
                editor: Some(assigned_editor()),
                created_dt: timestamp(9),
                comment: "First draft".to_string(),
                files: vec![paper_file(FileTypeId(900))],
                comments: Vec::new(),
                tag_ids: BTreeSet::new(),
                initial_state: InitialRevisionState::ReadyForReview,
                final_state: Some(FinalRevisionState::Replaced),
            },
            EditingRevision {
                id: second,
                editable_id: EDITABLE_CONFIRMING,
                submitter: submitter(),
                editor: Some(assigned_editor()),
                created_dt: timestamp(14),
                comment: "Fixed the bibliography".to_string(),
                files: vec![paper_file(FileTypeId(900))],
                comments: Vec::new(),
                tag_ids: BTreeSet::new(),
                initial_state: InitialRevisionState::NeedsSubmitterConfirmation,
                final_state: None,
            },
        ],
    }
}

pub(super) fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    store.put_event(event());
    store.put_contribution(contribution(CONTRIB_READY, "Dust grain charging", 3));
    store.put_contribution(contribution(CONTRIB_CONFIRMING, "Magnetic reconnection", 4));
    store.put_contribution(contribution(CONTRIB_BARE, "Poster session notes", 5));
    for user in [manager(), assigned_editor(), submitter(), outsider()] {
        store.put_user(user);
    }
    store.put_tags(EVENT, tags());
    store
        .insert_file_type(EditingFileType {
            id: FileTypeId(900),
            event_id: EVENT,
            name: "Paper".to_string(),
            extensions: vec!["pdf".to_string()],
            allow_multiple_files: false,
            required: true,
            publishable: true,
        })
        .expect("file type seeds");
    store
        .insert_editable(editable_ready_for_review())
        .expect("editable seeds");
    store
        .insert_editable(editable_awaiting_confirmation())
        .expect("editable seeds");
    store
}

pub(super) fn build_service() -> (Arc<EditingService<MemoryStore>>, Arc<MemoryStore>) {
    let store = seeded_store();
    (Arc::new(EditingService::new(store.clone())), store)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    events: Mutex<HashMap<EventId, Event>>,
    contributions: Mutex<HashMap<(EventId, ContributionId), Contribution>>,
    users: Mutex<HashMap<UserId, User>>,
    tags: Mutex<HashMap<EventId, Vec<EditingTag>>>,
    file_types: Mutex<HashMap<FileTypeId, EditingFileType>>,
    editables: Mutex<HashMap<EditableId, Editable>>,
}

impl MemoryStore {
    pub(super) fn put_event(&self, event: Event) {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .insert(event.id, event);
    }

    pub(super) fn put_contribution(&self, contribution: Contribution) {
        self.contributions
            .lock()
            .expect("contribution mutex poisoned")
            .insert((contribution.event_id, contribution.id), contribution);
    }

    pub(super) fn put_user(&self, user: User) {
        self.users
            .lock()
            .expect("user mutex poisoned")
            .insert(user.id, user);
    }

    pub(super) fn put_tags(&self, event_id: EventId, tags: Vec<EditingTag>) {
        self.tags
            .lock()
            .expect("tag mutex poisoned")
            .insert(event_id, tags);
    }
}

impl FileTypeRepository for MemoryStore {
    fn insert_file_type(
        &self,
        file_type: EditingFileType,
    ) -> Result<EditingFileType, RepositoryError> {
        let mut guard = self.file_types.lock().expect("file type mutex poisoned");
        let clash = guard.values().any(|existing| {
            existing.event_id == file_type.event_id
                && existing.name_key() == file_type.name_key()
        });
        if clash || guard.contains_key(&file_type.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(file_type.id, file_type.clone());
        Ok(file_type)
    }

    fn update_file_type(&self, file_type: EditingFileType) -> Result<(), RepositoryError> {
        let mut guard = self.file_types.lock().expect("file type mutex poisoned");
        if !guard.contains_key(&file_type.id) {
            return Err(RepositoryError::NotFound);
        }
        let clash = guard.values().any(|existing| {
            existing.event_id == file_type.event_id
                && existing.id != file_type.id
                && existing.name_key() == file_type.name_key()
        });
        if clash {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(file_type.id, file_type);
        Ok(())
    }

    fn delete_file_type(&self, event_id: EventId, id: FileTypeId) -> Result<(), RepositoryError> {
        let mut guard = self.file_types.lock().expect("file type mutex poisoned");
        match guard.get(&id) {
            Some(existing) if existing.event_id == event_id => {
                guard.remove(&id);
                Ok(())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    fn file_type(
        &self,
        event_id: EventId,
        id: FileTypeId,
    ) -> Result<Option<EditingFileType>, RepositoryError> {
        let guard = self.file_types.lock().expect("file type mutex poisoned");
        Ok(guard
            .get(&id)
            .filter(|existing| existing.event_id == event_id)
            .cloned())
    }

    fn file_types_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EditingFileType>, RepositoryError> {
        let guard = self.file_types.lock().expect("file type mutex poisoned");
        Ok(guard
            .values()
            .filter(|file_type| file_type.event_id == event_id)
            .cloned()
            .collect())
    }
}

impl EditableRepository for MemoryStore {
    fn event(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        Ok(self
            .events
            .lock()
            .expect("event mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn contribution(
        &self,
        event_id: EventId,
        id: ContributionId,
    ) -> Result<Option<Contribution>, RepositoryError> {
        Ok(self
            .contributions
            .lock()
            .expect("contribution mutex poisoned")
            .get(&(event_id, id))
            .cloned())
    }

    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .expect("user mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn tags_for_event(&self, event_id: EventId) -> Result<Vec<EditingTag>, RepositoryError> {
        Ok(self
            .tags
            .lock()
            .expect("tag mutex poisoned")
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }

    fn insert_editable(&self, editable: Editable) -> Result<Editable, RepositoryError> {
        let mut guard = self.editables.lock().expect("editable mutex poisoned");
        let clash = guard.values().any(|existing| {
            existing.event_id == editable.event_id
                && existing.contribution_id == editable.contribution_id
                && existing.editable_type == editable.editable_type
        });
        if clash || guard.contains_key(&editable.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(editable.id, editable.clone());
        Ok(editable)
    }

    fn update_editable(&self, editable: Editable) -> Result<(), RepositoryError> {
        let mut guard = self.editables.lock().expect("editable mutex poisoned");
        if !guard.contains_key(&editable.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(editable.id, editable);
        Ok(())
    }

    fn editable_for_contribution(
        &self,
        event_id: EventId,
        contribution_id: ContributionId,
        editable_type: EditableType,
    ) -> Result<Option<Editable>, RepositoryError> {
        let guard = self.editables.lock().expect("editable mutex poisoned");
        Ok(guard
            .values()
            .find(|editable| {
                editable.event_id == event_id
                    && editable.contribution_id == contribution_id
                    && editable.editable_type == editable_type
            })
            .cloned())
    }
}
