use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use confedit::editing::{
    CommentId, Contribution, ContributionId, Editable, EditableId, EditableRepository,
    EditableType, EditingFileType, EditingRevision, EditingRevisionComment, EditingRevisionFile,
    EditingService, EditingServiceError, EditingTag, Event, EventId, FileTypeArgs,
    FileTypeId, FileTypeRepository, FinalRevisionState, InitialRevisionState, RepositoryError,
    RevisionId, TagId, User, UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryEditingStore {
    events: Mutex<HashMap<EventId, Event>>,
    contributions: Mutex<HashMap<(EventId, ContributionId), Contribution>>,
    users: Mutex<HashMap<UserId, User>>,
    tags: Mutex<HashMap<EventId, Vec<EditingTag>>>,
    file_types: Mutex<HashMap<FileTypeId, EditingFileType>>,
    editables: Mutex<HashMap<EditableId, Editable>>,
}

impl InMemoryEditingStore {
    pub(crate) fn put_event(&self, event: Event) {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .insert(event.id, event);
    }

    pub(crate) fn put_contribution(&self, contribution: Contribution) {
        self.contributions
            .lock()
            .expect("contribution mutex poisoned")
            .insert((contribution.event_id, contribution.id), contribution);
    }

    pub(crate) fn put_user(&self, user: User) {
        self.users
            .lock()
            .expect("user mutex poisoned")
            .insert(user.id, user);
    }

    pub(crate) fn put_tags(&self, event_id: EventId, tags: Vec<EditingTag>) {
        self.tags
            .lock()
            .expect("tag mutex poisoned")
            .insert(event_id, tags);
    }
}

impl FileTypeRepository for InMemoryEditingStore {
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

impl EditableRepository for InMemoryEditingStore {
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

/// Handles into the seeded demo data, for the demo command and tests.
pub(crate) struct DemoSeed {
    pub(crate) event_id: EventId,
    pub(crate) contribution_id: ContributionId,
    pub(crate) editable_type: EditableType,
    pub(crate) manager: User,
    pub(crate) submitter: User,
}

fn demo_file(filename: &str, size: u64, file_type_id: FileTypeId) -> EditingRevisionFile {
    EditingRevisionFile {
        uuid: Uuid::new_v4(),
        filename: filename.to_string(),
        size,
        content_type: mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string(),
        file_type_id,
    }
}

/// Populate the store with one event, a contribution, and an editable whose
/// latest revision awaits submitter confirmation.
pub(crate) fn seed_demo_event(
    store: &InMemoryEditingStore,
    service: &EditingService<InMemoryEditingStore>,
) -> Result<DemoSeed, EditingServiceError> {
    let event_id = EventId(1);
    let contribution_id = ContributionId(101);

    let manager = User {
        id: UserId(1),
        full_name: "Ada Cole".to_string(),
        avatar_bg_color: "#7a3433".to_string(),
    };
    let submitter = User {
        id: UserId(2),
        full_name: "Ben Ortiz".to_string(),
        avatar_bg_color: "#1d3557".to_string(),
    };

    store.put_event(Event {
        id: event_id,
        title: "Interstellar Medium Workshop".to_string(),
        editing_managers: BTreeSet::from([manager.id]),
    });
    store.put_contribution(Contribution {
        id: contribution_id,
        event_id,
        title: "Dust polarization maps of Taurus".to_string(),
        friendly_id: 7,
    });
    store.put_user(manager.clone());
    store.put_user(submitter.clone());
    store.put_tags(
        event_id,
        vec![
            EditingTag {
                id: TagId(1),
                event_id,
                code: "S10".to_string(),
                title: "Layout approved".to_string(),
                color: "blue".to_string(),
                system: true,
            },
            EditingTag {
                id: TagId(2),
                event_id,
                code: "S2".to_string(),
                title: "References checked".to_string(),
                color: "teal".to_string(),
                system: true,
            },
        ],
    );

    let paper = service.create_file_type(
        event_id,
        FileTypeArgs {
            name: "Paper".to_string(),
            extensions: vec!["pdf".to_string()],
            allow_multiple_files: false,
            required: true,
            publishable: true,
        },
    )?;
    service.create_file_type(
        event_id,
        FileTypeArgs {
            name: "Source archive".to_string(),
            extensions: vec!["zip".to_string(), "tar.gz".to_string()],
            allow_multiple_files: true,
            required: false,
            publishable: false,
        },
    )?;

    let editable_id = EditableId(1001);
    let now = Utc::now();
    let first = EditingRevision {
        id: RevisionId(1),
        editable_id,
        submitter: submitter.clone(),
        editor: Some(manager.clone()),
        created_dt: now - Duration::hours(30),
        comment: "First submission".to_string(),
        files: vec![demo_file("taurus-maps.pdf", 412_048, paper.id)],
        comments: vec![
            EditingRevisionComment {
                id: CommentId(501),
                revision_id: RevisionId(1),
                author: Some(submitter.clone()),
                created_dt: now - Duration::hours(28),
                modified_dt: None,
                internal: false,
                system: false,
                text: "High-resolution maps are in the appendix".to_string(),
            },
            EditingRevisionComment {
                id: CommentId(502),
                revision_id: RevisionId(1),
                author: Some(manager.clone()),
                created_dt: now - Duration::hours(26),
                modified_dt: None,
                internal: true,
                system: false,
                text: "Awaiting the license confirmation before publishing".to_string(),
            },
        ],
        tag_ids: BTreeSet::from([TagId(1), TagId(2)]),
        initial_state: InitialRevisionState::ReadyForReview,
        final_state: Some(FinalRevisionState::Replaced),
    };
    let second = EditingRevision {
        id: RevisionId(2),
        editable_id,
        submitter: submitter.clone(),
        editor: Some(manager.clone()),
        created_dt: now - Duration::hours(2),
        comment: "Normalized citations and rebuilt figures".to_string(),
        files: vec![demo_file("taurus-maps.pdf", 415_913, paper.id)],
        comments: Vec::new(),
        tag_ids: BTreeSet::from([TagId(2)]),
        initial_state: InitialRevisionState::NeedsSubmitterConfirmation,
        final_state: None,
    };

    store.insert_editable(Editable {
        id: editable_id,
        contribution_id,
        event_id,
        editable_type: EditableType::Paper,
        editor: Some(manager.clone()),
        revisions: vec![first, second],
    })?;

    Ok(DemoSeed {
        event_id,
        contribution_id,
        editable_type: EditableType::Paper,
        manager,
        submitter,
    })
}
