//! SQLite-backed event store.

use std::str::FromStr;

use anyhow::{ensure, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::event::{Event, NewEvent};
use crate::tier::Tier;

const CREATE_EVENTS: &str = "\
CREATE TABLE IF NOT EXISTS events (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    event_date  TEXT NOT NULL,
    image_url   TEXT,
    tier        TEXT NOT NULL CHECK (tier IN ('free', 'silver', 'gold', 'platinum')),
    created_at  TEXT NOT NULL
)";

const SELECT_EVENTS: &str =
    "SELECT id, title, description, event_date, image_url, tier, created_at FROM events";

/// Handle over the events table. Cheap to clone; constructed once and passed
/// into the CLI commands and HTTP state rather than held as a module global.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open the database at `url`, creating the file if missing.
    pub async fn connect(url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // A single long-lived connection: the table is read-mostly with one
        // logical caller per session, and `sqlite::memory:` databases must
        // not be split across pool connections.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    /// Create the events table if it does not already exist.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_EVENTS).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a new event, assigning its identifier and creation timestamp.
    pub async fn insert(&self, new: NewEvent) -> Result<Event> {
        ensure!(!new.title.trim().is_empty(), "event title must not be empty");
        let event = Event {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            event_date: new.event_date,
            image_url: new.image_url,
            tier: new.tier,
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO events (id, title, description, event_date, image_url, tier, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(&event.image_url)
        .bind(event.tier)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(event)
    }

    /// All events, ascending by event date. Diagnostic surface only; the
    /// gated product path goes through [`Store::list_for_tier`].
    pub async fn list_all(&self) -> Result<Vec<Event>> {
        let sql = format!("{SELECT_EVENTS} ORDER BY event_date ASC");
        let events = sqlx::query_as::<_, Event>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    /// Events whose required tier falls within `tier`'s entitlement prefix,
    /// ascending by event date. Ties in event date keep the store's stable
    /// order.
    pub async fn list_for_tier(&self, tier: Tier) -> Result<Vec<Event>> {
        let tiers = tier.entitled();
        let placeholders = vec!["?"; tiers.len()].join(", ");
        let sql = format!("{SELECT_EVENTS} WHERE tier IN ({placeholders}) ORDER BY event_date ASC");
        let mut query = sqlx::query_as::<_, Event>(&sql);
        for t in tiers {
            query = query.bind(*t);
        }
        let events = query.fetch_all(&self.pool).await?;
        Ok(events)
    }
}
