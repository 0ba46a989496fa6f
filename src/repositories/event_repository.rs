use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::EventError;
use crate::fallback::MockCatalog;
use crate::models::{CreateEvent, Event, UpdateEvent};
use crate::store::EventStore;

/// Data-access layer over event records.
///
/// Every operation probes the backing store first. Writes fail fast with
/// [`EventError::BackendUnavailable`]; reads recover by answering from the
/// bundled catalog, except own-event listings (empty instead, a user's own
/// events cannot be faked) and lookups of ids the catalog does not carry.
///
/// The store handle is injected at construction so callers can swap in a
/// test double.
#[derive(Clone)]
pub struct EventRepository {
    store: Arc<dyn EventStore>,
    catalog: Arc<MockCatalog>,
}

impl EventRepository {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self::with_catalog(store, MockCatalog::bundled())
    }

    pub fn with_catalog(store: Arc<dyn EventStore>, catalog: MockCatalog) -> Self {
        Self {
            store,
            catalog: Arc::new(catalog),
        }
    }

    /// Point-in-time availability check. Never cached: backend health can
    /// change between calls.
    pub async fn backend_available(&self) -> bool {
        self.store.probe().await.is_ok()
    }

    async fn ensure_available(&self) -> Result<(), EventError> {
        self.store.probe().await.map_err(|err| {
            warn!("Backend probe failed: {}", err);
            EventError::BackendUnavailable
        })
    }

    pub async fn create(
        &self,
        input: CreateEvent,
        user: Option<&AuthUser>,
    ) -> Result<Event, EventError> {
        self.ensure_available().await?;

        let user = user.ok_or(EventError::AuthRequired)?;
        let event = Event::new(input, user.id).map_err(EventError::Validation)?;

        self.store.insert(&event).await?;
        info!("Created event {} for user {}", event.id, user.id);

        Ok(event)
    }

    /// All events ascending by date, optionally filtered by a
    /// case-insensitive substring match over title, description, location
    /// and category. The same filter applies on the fallback path.
    pub async fn list(&self, search: Option<&str>) -> Vec<Event> {
        match self.live_list(search).await {
            Ok(events) => events,
            Err(err) => {
                warn!("Failed to fetch events, serving bundled catalog: {}", err);
                self.catalog.list(search)
            }
        }
    }

    async fn live_list(&self, search: Option<&str>) -> Result<Vec<Event>> {
        self.store.probe().await?;
        self.store.list(search).await
    }

    /// Events dated today or later, soonest first, at most `limit`.
    pub async fn upcoming(&self, limit: i64) -> Vec<Event> {
        let today = Utc::now().date_naive();

        let live = async {
            self.store.probe().await?;
            self.store.list_upcoming(today, limit).await
        };

        match live.await {
            Ok(events) => events,
            Err(err) => {
                warn!(
                    "Failed to fetch upcoming events, serving bundled catalog: {}",
                    err
                );
                self.catalog.upcoming(today, limit.max(0) as usize)
            }
        }
    }

    /// Events dated today or later, busiest first, at most `limit`.
    pub async fn featured(&self, limit: i64) -> Vec<Event> {
        let today = Utc::now().date_naive();

        let live = async {
            self.store.probe().await?;
            self.store.list_featured(today, limit).await
        };

        match live.await {
            Ok(events) => events,
            Err(err) => {
                warn!(
                    "Failed to fetch featured events, serving bundled catalog: {}",
                    err
                );
                self.catalog.featured(today, limit.max(0) as usize)
            }
        }
    }

    /// Single record lookup. A missing id is `NotFound` on both paths; the
    /// catalog never fabricates a record it does not carry.
    pub async fn get(&self, id: Uuid) -> Result<Event, EventError> {
        let live = async {
            self.store.probe().await?;
            self.store.fetch(id).await
        };

        match live.await {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(EventError::NotFound(id)),
            Err(err) => {
                warn!("Failed to fetch event {}, trying bundled catalog: {}", id, err);
                self.catalog.find(id).ok_or(EventError::NotFound(id))
            }
        }
    }

    /// Applies a partial update. A shrunk capacity may never undercut the
    /// seats already taken, so a `capacity` patch is checked against the
    /// row's current attendee count before the store is touched.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateEvent,
        user: Option<&AuthUser>,
    ) -> Result<Event, EventError> {
        self.ensure_available().await?;

        let user = user.ok_or(EventError::AuthRequired)?;
        patch.validate().map_err(EventError::Validation)?;

        if let Some(capacity) = patch.capacity {
            if let Some(current) = self.store.fetch(id).await? {
                if capacity < current.attendees {
                    return Err(EventError::Validation(format!(
                        "Capacity cannot be below the {} attendees already registered",
                        current.attendees
                    )));
                }
            }
        }

        match self.store.update(id, user.id, &patch).await? {
            Some(event) => {
                info!("Updated event {}", id);
                Ok(event)
            }
            None => Err(EventError::NotFound(id)),
        }
    }

    pub async fn delete(&self, id: Uuid, user: Option<&AuthUser>) -> Result<(), EventError> {
        self.ensure_available().await?;

        let user = user.ok_or(EventError::AuthRequired)?;

        if self.store.delete(id, user.id).await? {
            info!("Deleted event {}", id);
            Ok(())
        } else {
            Err(EventError::NotFound(id))
        }
    }

    /// Events owned by the acting user, newest first. Falls back to an
    /// empty list: there is no meaningful substitute for a user's own
    /// events.
    pub async fn list_for_user(&self, user: Option<&AuthUser>) -> Result<Vec<Event>, EventError> {
        let user = user.ok_or(EventError::AuthRequired)?;

        let live = async {
            self.store.probe().await?;
            self.store.list_by_owner(user.id).await
        };

        match live.await {
            Ok(events) => Ok(events),
            Err(err) => {
                warn!("Failed to fetch events for user {}: {}", user.id, err);
                Ok(Vec::new())
            }
        }
    }

    /// Registers one attendee. The capacity guard and the increment are a
    /// single conditional update in the store, so two near-simultaneous
    /// registrations for the last seat cannot both succeed.
    pub async fn register(&self, id: Uuid) -> Result<Event, EventError> {
        self.ensure_available().await?;

        let current = self
            .store
            .fetch(id)
            .await?
            .ok_or(EventError::NotFound(id))?;

        if current.is_full() {
            return Err(EventError::AtCapacity(id));
        }

        match self.store.increment_attendees(id).await? {
            Some(event) => {
                info!(
                    "Registered attendee for event {} ({}/{})",
                    id, event.attendees, event.capacity
                );
                Ok(event)
            }
            // the seat was taken (or the row removed) between the read and
            // the guarded increment
            None => {
                if self.store.fetch(id).await?.is_some() {
                    Err(EventError::AtCapacity(id))
                } else {
                    Err(EventError::NotFound(id))
                }
            }
        }
    }
}
