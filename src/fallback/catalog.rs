use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use uuid::{uuid, Uuid};

use crate::models::Event;

/// Owner recorded on projected sample events. Not a real account; own-event
/// listings never fall back to the catalog.
pub const SAMPLE_OWNER: Uuid = uuid!("00000000-0000-0000-0000-0000000000aa");

/// Sample record in its authored shape: location is nested and the image
/// field is named differently from the canonical record.
#[derive(Debug, Clone)]
pub struct SampleEvent {
    pub id: Uuid,
    pub title: &'static str,
    pub description: &'static str,
    /// Days relative to today, so upcoming/featured fallbacks stay useful.
    pub date_offset: i64,
    pub time: &'static str,
    pub location: SampleLocation,
    pub category: &'static str,
    pub price: f64,
    pub image: &'static str,
    pub attendees: i32,
    pub capacity: i32,
}

#[derive(Debug, Clone)]
pub struct SampleLocation {
    pub venue: &'static str,
    pub city: &'static str,
}

impl SampleEvent {
    /// Pure projection into the canonical record shape: `location.city`
    /// flattens to `location`, `image` becomes `image_url`.
    pub fn project(&self, today: NaiveDate, now: DateTime<Utc>) -> Event {
        let date = if self.date_offset >= 0 {
            today + Days::new(self.date_offset as u64)
        } else {
            today - Days::new(self.date_offset.unsigned_abs())
        };

        Event {
            id: self.id,
            title: self.title.to_string(),
            description: self.description.to_string(),
            date,
            time: self
                .time
                .parse::<NaiveTime>()
                .unwrap_or_else(|_| NaiveTime::from_hms_opt(18, 0, 0).unwrap()),
            location: self.location.city.to_string(),
            category: self.category.to_string(),
            price: self.price,
            image_url: self.image.to_string(),
            user_id: SAMPLE_OWNER,
            attendees: self.attendees,
            capacity: self.capacity,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn sample_events() -> Vec<SampleEvent> {
    vec![
        SampleEvent {
            id: uuid!("a1b2c3d4-0001-4000-8000-000000000001"),
            title: "Indie Night at the Warehouse",
            description: "Four local bands, one stage, doors at seven.",
            date_offset: -3,
            time: "19:00:00",
            location: SampleLocation {
                venue: "The Warehouse",
                city: "Portland",
            },
            category: "music",
            price: 15.0,
            image: "https://images.unsplash.com/photo-1501386761578-eac5c94b800a",
            attendees: 180,
            capacity: 200,
        },
        SampleEvent {
            id: uuid!("a1b2c3d4-0002-4000-8000-000000000002"),
            title: "Intro to Embedded Rust",
            description: "Hands-on workshop flashing firmware onto dev boards.",
            date_offset: 2,
            time: "10:00:00",
            location: SampleLocation {
                venue: "Makers Hall",
                city: "Seattle",
            },
            category: "technology",
            price: 0.0,
            image: "https://images.unsplash.com/photo-1518770660439-4636190af475",
            attendees: 42,
            capacity: 60,
        },
        SampleEvent {
            id: uuid!("a1b2c3d4-0003-4000-8000-000000000003"),
            title: "Riverside Food Truck Rally",
            description: "Twenty trucks along the promenade, live music all day.",
            date_offset: 5,
            time: "12:00:00",
            location: SampleLocation {
                venue: "Riverside Promenade",
                city: "Austin",
            },
            category: "food",
            price: 5.0,
            image: "https://images.unsplash.com/photo-1555396273-367ea4eb4db5",
            attendees: 310,
            capacity: 500,
        },
        SampleEvent {
            id: uuid!("a1b2c3d4-0004-4000-8000-000000000004"),
            title: "Founders Breakfast",
            description: "Early-stage founders swap war stories over coffee.",
            date_offset: 9,
            time: "08:30:00",
            location: SampleLocation {
                venue: "Harbor House",
                city: "Boston",
            },
            category: "business",
            price: 25.0,
            image: "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b",
            attendees: 18,
            capacity: 40,
        },
        SampleEvent {
            id: uuid!("a1b2c3d4-0005-4000-8000-000000000005"),
            title: "Gallery Opening: New Voices",
            description: "Group show featuring twelve emerging painters.",
            date_offset: 14,
            time: "18:00:00",
            location: SampleLocation {
                venue: "Corner Gallery",
                city: "Chicago",
            },
            category: "arts",
            price: 0.0,
            image: "https://images.unsplash.com/photo-1506744038136-46273834b3fb",
            attendees: 95,
            capacity: 120,
        },
        SampleEvent {
            id: uuid!("a1b2c3d4-0006-4000-8000-000000000006"),
            title: "City Half Marathon",
            description: "Flat and fast course through the old town.",
            date_offset: 30,
            time: "07:00:00",
            location: SampleLocation {
                venue: "Old Town Square",
                city: "Denver",
            },
            category: "sports",
            price: 45.0,
            image: "https://images.unsplash.com/photo-1552674605-db6ffd4facb5",
            attendees: 850,
            capacity: 1000,
        },
    ]
}

/// Static catalog substituted for the live backend when it is unreachable.
/// Read-only; answers the same queries with the same ordering rules as the
/// live store.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    events: Vec<Event>,
}

impl MockCatalog {
    pub fn bundled() -> Self {
        let now = Utc::now();
        let today = now.date_naive();

        let mut events: Vec<Event> = sample_events()
            .iter()
            .map(|sample| sample.project(today, now))
            .collect();
        events.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));

        Self { events }
    }

    pub fn list(&self, search: Option<&str>) -> Vec<Event> {
        match search {
            None => self.events.clone(),
            Some(query) => {
                let query = query.to_lowercase();
                self.events
                    .iter()
                    .filter(|event| {
                        [
                            &event.title,
                            &event.description,
                            &event.location,
                            &event.category,
                        ]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&query))
                    })
                    .cloned()
                    .collect()
            }
        }
    }

    pub fn upcoming(&self, from: NaiveDate, limit: usize) -> Vec<Event> {
        self.events
            .iter()
            .filter(|event| event.date >= from)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn featured(&self, from: NaiveDate, limit: usize) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|event| event.date >= from)
            .cloned()
            .collect();

        events.sort_by(|a, b| b.attendees.cmp(&a.attendees));
        events.truncate(limit);
        events
    }

    pub fn find(&self, id: Uuid) -> Option<Event> {
        self.events.iter().find(|event| event.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_is_total_and_valid() {
        let catalog = MockCatalog::bundled();
        assert_eq!(catalog.len(), sample_events().len());

        for event in catalog.list(None) {
            assert!(!event.title.trim().is_empty());
            assert!(!event.description.trim().is_empty());
            assert!(!event.location.trim().is_empty());
            assert!(!event.image_url.is_empty());
            assert!(event.price >= 0.0);
            assert!(event.attendees >= 0);
            assert!(event.attendees <= event.capacity);
            assert_eq!(event.user_id, SAMPLE_OWNER);
        }
    }

    #[test]
    fn test_projection_flattens_nested_fields() {
        let sample = &sample_events()[0];
        let now = Utc::now();
        let event = sample.project(now.date_naive(), now);

        assert_eq!(event.location, sample.location.city);
        assert_eq!(event.image_url, sample.image);
    }

    #[test]
    fn test_projection_is_repeatable() {
        let sample = &sample_events()[1];
        let now = Utc::now();
        let today = now.date_naive();

        let first = sample.project(today, now);
        let second = sample.project(today, now);

        assert_eq!(first.id, second.id);
        assert_eq!(first.date, second.date);
        assert_eq!(first.attendees, second.attendees);
    }

    #[test]
    fn test_list_sorted_ascending_by_date() {
        let events = MockCatalog::bundled().list(None);
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_search_filters_across_fields() {
        let catalog = MockCatalog::bundled();

        let by_city = catalog.list(Some("seattle"));
        assert_eq!(by_city.len(), 1);
        assert_eq!(by_city[0].title, "Intro to Embedded Rust");

        let by_category = catalog.list(Some("MUSIC"));
        assert!(!by_category.is_empty());

        assert!(catalog.list(Some("no-such-thing")).is_empty());
    }

    #[test]
    fn test_upcoming_excludes_past_events() {
        let catalog = MockCatalog::bundled();
        let today = Utc::now().date_naive();

        let upcoming = catalog.upcoming(today, 10);
        assert!(upcoming.iter().all(|event| event.date >= today));
        // one sample event is in the past
        assert_eq!(upcoming.len(), catalog.len() - 1);

        assert_eq!(catalog.upcoming(today, 2).len(), 2);
    }

    #[test]
    fn test_featured_sorted_by_attendance() {
        let catalog = MockCatalog::bundled();
        let today = Utc::now().date_naive();

        let featured = catalog.featured(today, 3);
        assert_eq!(featured.len(), 3);
        assert!(featured
            .windows(2)
            .all(|w| w[0].attendees >= w[1].attendees));
    }

    #[test]
    fn test_find_by_id() {
        let catalog = MockCatalog::bundled();
        let known = sample_events()[2].id;

        assert!(catalog.find(known).is_some());
        assert!(catalog.find(Uuid::new_v4()).is_none());
    }
}
