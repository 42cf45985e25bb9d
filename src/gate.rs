//! Entitlement checks shared by the listing filter and the render projection.
//!
//! The same rule is applied twice: authoritatively when the store builds the
//! tier filter, and defensively when an event is projected for display. The
//! defensive pass exists for events that arrive outside entitlement (stale
//! cache, direct probing of the unfiltered endpoint) and obscures everything
//! but the title and tier badge.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::event::Event;
use crate::tier::Tier;

/// Whether a member at `caller` may access content gated at `required`.
pub fn can_access(caller: Tier, required: Tier) -> bool {
    required.rank() <= caller.rank()
}

/// Per-item view handed to the display layer.
///
/// Locked items keep the title and tier badge visible to motivate an upgrade;
/// description, date, and image never leave the server for a non-entitled
/// event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub tier: Tier,
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}

impl EventView {
    /// Project `event` for a caller at `caller`, locking it when the caller
    /// is not entitled.
    pub fn for_member(event: Event, caller: Tier) -> Self {
        let unlocked = can_access(caller, event.tier);
        Self {
            id: event.id,
            title: event.title,
            tier: event.tier,
            locked: !unlocked,
            description: unlocked.then_some(event.description),
            event_date: unlocked.then_some(event.event_date),
            image_url: unlocked.then_some(event.image_url),
        }
    }
}
