use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_CAPACITY: i32 = 100;

/// Canonical event record. All defaulting and coercion happens in
/// [`Event::new`]; once constructed, a record satisfies every invariant
/// (non-empty title/description, non-negative price, attendees within
/// capacity, image always resolved).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,

    pub date: NaiveDate,
    pub time: NaiveTime,

    pub location: String,
    pub category: String,

    pub price: f64,
    pub image_url: String,

    /// Owning user. Immutable after creation.
    pub user_id: Uuid,

    pub attendees: i32,
    pub capacity: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub category: String,
    /// Accepts a JSON number or a numeric string; absent means free.
    #[serde(default, deserialize_with = "price::deserialize")]
    pub price: f64,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
}

/// Partial update. `id`, `user_id`, `attendees` and the server timestamps
/// are deliberately not patchable.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "price::deserialize_opt")]
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
}

impl Event {
    pub fn new(create: CreateEvent, owner: Uuid) -> Result<Self, String> {
        if create.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if create.description.trim().is_empty() {
            return Err("Description cannot be empty".to_string());
        }
        if !create.price.is_finite() || create.price < 0.0 {
            return Err("Price must be a non-negative number".to_string());
        }

        let capacity = create.capacity.unwrap_or(DEFAULT_CAPACITY);
        if capacity < 1 {
            return Err("Capacity must be at least 1".to_string());
        }

        let image_url = create
            .image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| placeholder_image(&create.category).to_string());

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: create.title,
            description: create.description,
            date: create.date,
            time: create.time,
            location: create.location,
            category: create.category,
            price: create.price,
            image_url,
            user_id: owner,
            attendees: 0,
            capacity,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_full(&self) -> bool {
        self.attendees >= self.capacity
    }
}

impl UpdateEvent {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("Title cannot be empty".to_string());
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                return Err("Description cannot be empty".to_string());
            }
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err("Price must be a non-negative number".to_string());
            }
        }
        if let Some(capacity) = self.capacity {
            if capacity < 1 {
                return Err("Capacity must be at least 1".to_string());
            }
        }
        Ok(())
    }
}

/// Stock imagery keyed on category, used whenever an event is created
/// without its own image.
pub fn placeholder_image(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "music" => "https://images.unsplash.com/photo-1500673922987-e212871fec22",
        "technology" | "education" => {
            "https://images.unsplash.com/photo-1518770660439-4636190af475"
        }
        "arts" | "health" => "https://images.unsplash.com/photo-1506744038136-46273834b3fb",
        "business" => "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b",
        "sports" | "food" => "https://images.unsplash.com/photo-1649972904349-6e44c42644a7",
        _ => "https://images.unsplash.com/photo-1519389950473-47ba0277781c",
    }
}

mod price {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn normalize<E: serde::de::Error>(raw: Raw) -> Result<f64, E> {
        let value = match raw {
            Raw::Number(n) => n,
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("price '{}' is not a number", s)))?,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(E::custom("price must be a non-negative number"));
        }
        Ok(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        normalize(Raw::deserialize(deserializer)?)
    }

    pub fn deserialize_opt<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<Raw>::deserialize(deserializer)?
            .map(normalize)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_fixture() -> CreateEvent {
        serde_json::from_value(serde_json::json!({
            "title": "Rust Meetup",
            "description": "Monthly get-together",
            "date": "2026-10-01",
            "time": "18:30:00",
            "location": "Berlin",
            "category": "technology",
            "price": 12.5
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults_applied_on_creation() {
        let event = Event::new(create_fixture(), Uuid::new_v4()).unwrap();

        assert_eq!(event.attendees, 0);
        assert_eq!(event.capacity, DEFAULT_CAPACITY);
        assert_eq!(event.image_url, placeholder_image("technology"));
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn test_price_accepts_numeric_string() {
        let create: CreateEvent = serde_json::from_value(serde_json::json!({
            "title": "t", "description": "d",
            "date": "2026-10-01", "time": "18:30:00",
            "location": "l", "category": "music",
            "price": "19.99"
        }))
        .unwrap();

        assert_eq!(create.price, 19.99);
    }

    #[test]
    fn test_price_defaults_to_zero_when_absent() {
        let create: CreateEvent = serde_json::from_value(serde_json::json!({
            "title": "t", "description": "d",
            "date": "2026-10-01", "time": "18:30:00",
            "location": "l", "category": "music"
        }))
        .unwrap();

        assert_eq!(create.price, 0.0);
    }

    #[test]
    fn test_price_rejects_garbage_and_negatives() {
        for bad in [serde_json::json!("twenty"), serde_json::json!(-5)] {
            let result: Result<CreateEvent, _> =
                serde_json::from_value(serde_json::json!({
                    "title": "t", "description": "d",
                    "date": "2026-10-01", "time": "18:30:00",
                    "location": "l", "category": "music",
                    "price": bad
                }));
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut create = create_fixture();
        create.title = "   ".to_string();

        assert!(Event::new(create, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut create = create_fixture();
        create.capacity = Some(0);

        assert!(Event::new(create, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_placeholder_is_category_insensitive() {
        assert_eq!(placeholder_image("Music"), placeholder_image("music"));
        assert_eq!(
            placeholder_image("something-else"),
            placeholder_image("unknown")
        );
    }

    #[test]
    fn test_own_image_kept() {
        let mut create = create_fixture();
        create.image_url = Some("https://example.com/banner.png".to_string());

        let event = Event::new(create, Uuid::new_v4()).unwrap();
        assert_eq!(event.image_url, "https://example.com/banner.png");
    }

    #[test]
    fn test_update_validation() {
        let patch = UpdateEvent {
            title: Some("".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = UpdateEvent {
            capacity: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = UpdateEvent {
            title: Some("New title".to_string()),
            price: Some(0.0),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }
}
