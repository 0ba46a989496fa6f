use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Event, UpdateEvent};
use crate::store::EventStore;

/// In-process event store with the same query semantics as
/// [`PgEventStore`](crate::store::PgEventStore). Used as the injected test
/// double and for running the service without a database.
#[derive(Default)]
pub struct InMemoryStore {
    events: RwLock<HashMap<Uuid, Event>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sorted_by_date(mut events: Vec<Event>) -> Vec<Event> {
        events.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
        events
    }
}

fn matches_search(event: &Event, query: &str) -> bool {
    let query = query.to_lowercase();
    [
        &event.title,
        &event.description,
        &event.location,
        &event.category,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn probe(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, event: &Event) -> Result<()> {
        self.events
            .write()
            .unwrap()
            .insert(event.id, event.clone());
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events.read().unwrap().get(&id).cloned())
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Event>> {
        let events = self
            .events
            .read()
            .unwrap()
            .values()
            .filter(|event| search.map_or(true, |q| matches_search(event, q)))
            .cloned()
            .collect();

        Ok(Self::sorted_by_date(events))
    }

    async fn list_upcoming(&self, from: NaiveDate, limit: i64) -> Result<Vec<Event>> {
        let events: Vec<Event> = self
            .events
            .read()
            .unwrap()
            .values()
            .filter(|event| event.date >= from)
            .cloned()
            .collect();

        let mut events = Self::sorted_by_date(events);
        events.truncate(limit.max(0) as usize);
        Ok(events)
    }

    async fn list_featured(&self, from: NaiveDate, limit: i64) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .unwrap()
            .values()
            .filter(|event| event.date >= from)
            .cloned()
            .collect();

        events.sort_by(|a, b| b.attendees.cmp(&a.attendees));
        events.truncate(limit.max(0) as usize);
        Ok(events)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .unwrap()
            .values()
            .filter(|event| event.user_id == owner)
            .cloned()
            .collect();

        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn update(&self, id: Uuid, owner: Uuid, patch: &UpdateEvent) -> Result<Option<Event>> {
        let mut events = self.events.write().unwrap();

        let Some(event) = events.get_mut(&id).filter(|e| e.user_id == owner) else {
            return Ok(None);
        };

        // same rejection the Postgres CHECK constraint produces
        if let Some(capacity) = patch.capacity {
            if capacity < event.attendees {
                bail!(
                    "capacity {} is below current attendees {}",
                    capacity,
                    event.attendees
                );
            }
        }

        if let Some(title) = &patch.title {
            event.title = title.clone();
        }
        if let Some(description) = &patch.description {
            event.description = description.clone();
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(time) = patch.time {
            event.time = time;
        }
        if let Some(location) = &patch.location {
            event.location = location.clone();
        }
        if let Some(category) = &patch.category {
            event.category = category.clone();
        }
        if let Some(price) = patch.price {
            event.price = price;
        }
        if let Some(image_url) = &patch.image_url {
            event.image_url = image_url.clone();
        }
        if let Some(capacity) = patch.capacity {
            event.capacity = capacity;
        }
        event.updated_at = Utc::now();

        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool> {
        let mut events = self.events.write().unwrap();

        match events.get(&id) {
            Some(event) if event.user_id == owner => {
                events.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn increment_attendees(&self, id: Uuid) -> Result<Option<Event>> {
        let mut events = self.events.write().unwrap();

        let Some(event) = events.get_mut(&id).filter(|e| e.attendees < e.capacity) else {
            return Ok(None);
        };

        event.attendees += 1;
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }
}
