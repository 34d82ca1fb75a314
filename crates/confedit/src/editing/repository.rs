use super::domain::{
    Contribution, ContributionId, Editable, EditableType, EditingFileType, EditingTag, Event,
    EventId, FileTypeId, User, UserId,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage seam for the per-event file type registry.
///
/// Implementations must enforce the `file_types` unique index: within one
/// event, two rows whose names differ only in case cannot both exist.
pub trait FileTypeRepository: Send + Sync {
    fn insert_file_type(
        &self,
        file_type: EditingFileType,
    ) -> Result<EditingFileType, RepositoryError>;
    fn update_file_type(&self, file_type: EditingFileType) -> Result<(), RepositoryError>;
    fn delete_file_type(&self, event_id: EventId, id: FileTypeId) -> Result<(), RepositoryError>;
    fn file_type(
        &self,
        event_id: EventId,
        id: FileTypeId,
    ) -> Result<Option<EditingFileType>, RepositoryError>;
    fn file_types_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EditingFileType>, RepositoryError>;
}

/// Storage seam for editables and the directory data the handlers resolve
/// against (events, contributions, users, tags).
pub trait EditableRepository: Send + Sync {
    fn event(&self, id: EventId) -> Result<Option<Event>, RepositoryError>;
    fn contribution(
        &self,
        event_id: EventId,
        id: ContributionId,
    ) -> Result<Option<Contribution>, RepositoryError>;
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn tags_for_event(&self, event_id: EventId) -> Result<Vec<EditingTag>, RepositoryError>;

    fn insert_editable(&self, editable: Editable) -> Result<Editable, RepositoryError>;
    fn update_editable(&self, editable: Editable) -> Result<(), RepositoryError>;
    fn editable_for_contribution(
        &self,
        event_id: EventId,
        contribution_id: ContributionId,
        editable_type: EditableType,
    ) -> Result<Option<Editable>, RepositoryError>;
}
