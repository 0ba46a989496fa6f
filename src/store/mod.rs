pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Event, UpdateEvent};

pub use memory::InMemoryStore;
pub use postgres::PgEventStore;

/// Backing-store boundary for event records. The repository is handed an
/// implementation at construction, so tests can inject [`InMemoryStore`]
/// instead of a live database.
///
/// Ownership of a record is part of the store's access policy: `update` and
/// `delete` take the acting owner and refuse to touch rows owned by anyone
/// else (reported as "no matching row", not as a distinct error).
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Minimal bounded read used as the availability probe. Succeeds iff
    /// the backend answered; no retries.
    async fn probe(&self) -> Result<()>;

    async fn insert(&self, event: &Event) -> Result<()>;

    async fn fetch(&self, id: Uuid) -> Result<Option<Event>>;

    /// All events ascending by date. `search` matches case-insensitively
    /// against title, description, location and category.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Event>>;

    /// Events on or after `from`, ascending by date, at most `limit`.
    async fn list_upcoming(&self, from: NaiveDate, limit: i64) -> Result<Vec<Event>>;

    /// Events on or after `from`, descending by attendee count, at most `limit`.
    async fn list_featured(&self, from: NaiveDate, limit: i64) -> Result<Vec<Event>>;

    /// Events owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Event>>;

    /// Applies the patch to the row if it exists and belongs to `owner`.
    async fn update(&self, id: Uuid, owner: Uuid, patch: &UpdateEvent) -> Result<Option<Event>>;

    /// Removes the row if it exists and belongs to `owner`.
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool>;

    /// Conditionally increments the attendee count. Returns the updated row,
    /// or `None` when the row is missing or already at capacity. The guard
    /// and the increment are a single atomic operation, so concurrent
    /// registrations can never push `attendees` past `capacity`.
    async fn increment_attendees(&self, id: Uuid) -> Result<Option<Event>>;
}
