use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Event, UpdateEvent};
use crate::store::EventStore;

/// Postgres-backed event store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn probe(&self) -> Result<()> {
        sqlx::query_as::<_, (Uuid,)>("SELECT id FROM events LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert(&self, event: &Event) -> Result<()> {
        sqlx::query(
            "INSERT INTO events (id, title, description, date, time, location, category, price, image_url, user_id, attendees, capacity, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.time)
        .bind(&event.location)
        .bind(&event.category)
        .bind(event.price)
        .bind(&event.image_url)
        .bind(event.user_id)
        .bind(event.attendees)
        .bind(event.capacity)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Event>> {
        let pattern = search.map(|q| format!("%{}%", q));

        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events
             WHERE $1::text IS NULL
                OR title ILIKE $1 OR description ILIKE $1
                OR location ILIKE $1 OR category ILIKE $1
             ORDER BY date ASC, time ASC",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn list_upcoming(&self, from: NaiveDate, limit: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE date >= $1 ORDER BY date ASC, time ASC LIMIT $2",
        )
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn list_featured(&self, from: NaiveDate, limit: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE date >= $1 ORDER BY attendees DESC LIMIT $2",
        )
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn update(&self, id: Uuid, owner: Uuid, patch: &UpdateEvent) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                date = COALESCE($3, date),
                time = COALESCE($4, time),
                location = COALESCE($5, location),
                category = COALESCE($6, category),
                price = COALESCE($7, price),
                image_url = COALESCE($8, image_url),
                capacity = COALESCE($9, capacity),
                updated_at = NOW()
             WHERE id = $10 AND user_id = $11
             RETURNING *",
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.date)
        .bind(patch.time)
        .bind(&patch.location)
        .bind(&patch.category)
        .bind(patch.price)
        .bind(&patch.image_url)
        .bind(patch.capacity)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_attendees(&self, id: Uuid) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events SET attendees = attendees + 1, updated_at = NOW()
             WHERE id = $1 AND attendees < capacity
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }
}
