//! Bundled sample catalog: two events per tier, dated in ascending order.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::event::NewEvent;
use crate::tier::Tier;

const SAMPLE_EVENTS: [(&str, &str, &str, &str, Tier); 8] = [
    (
        "Community Meetup",
        "Join us for a casual community meetup where you can network with fellow enthusiasts and share your experiences.",
        "2024-02-15T18:00:00Z",
        "https://images.unsplash.com/photo-1515187029135-18ee286d815b?w=400&h=300&fit=crop",
        Tier::Free,
    ),
    (
        "Introduction to Web Development",
        "Learn the basics of web development in this beginner-friendly workshop. No prior experience required!",
        "2024-02-20T14:00:00Z",
        "https://images.unsplash.com/photo-1461749280684-dccba630e2f6?w=400&h=300&fit=crop",
        Tier::Free,
    ),
    (
        "Advanced JavaScript Workshop",
        "Deep dive into modern JavaScript features including ES6+, async/await, and functional programming concepts.",
        "2024-02-25T10:00:00Z",
        "https://images.unsplash.com/photo-1555066931-4365d14bab8c?w=400&h=300&fit=crop",
        Tier::Silver,
    ),
    (
        "UI/UX Design Principles",
        "Master the fundamentals of user interface and user experience design with hands-on exercises and real-world examples.",
        "2024-03-01T15:00:00Z",
        "https://images.unsplash.com/photo-1561070791-2526d30994b5?w=400&h=300&fit=crop",
        Tier::Silver,
    ),
    (
        "Full-Stack Development Bootcamp",
        "Intensive 3-day bootcamp covering frontend, backend, and database development with modern technologies.",
        "2024-03-10T09:00:00Z",
        "https://images.unsplash.com/photo-1516321318423-f06f85e504b3?w=400&h=300&fit=crop",
        Tier::Gold,
    ),
    (
        "Cloud Architecture Summit",
        "Learn about cloud-native architecture, microservices, and deployment strategies from industry experts.",
        "2024-03-15T11:00:00Z",
        "https://images.unsplash.com/photo-1451187580459-43490279c0fa?w=400&h=300&fit=crop",
        Tier::Gold,
    ),
    (
        "Executive Technology Leadership Forum",
        "Exclusive event for technology leaders to discuss industry trends, innovation strategies, and future technologies.",
        "2024-03-20T08:00:00Z",
        "https://images.unsplash.com/photo-1552664730-d307ca884978?w=400&h=300&fit=crop",
        Tier::Platinum,
    ),
    (
        "VIP Innovation Workshop",
        "Private workshop with industry pioneers focusing on cutting-edge technologies and breakthrough innovations.",
        "2024-03-25T13:00:00Z",
        "https://images.unsplash.com/photo-1522202176988-66273c2fd55f?w=400&h=300&fit=crop",
        Tier::Platinum,
    ),
];

/// The eight sample events inserted by `marquee seed`.
pub fn sample_events() -> Result<Vec<NewEvent>> {
    let mut events = Vec::with_capacity(SAMPLE_EVENTS.len());
    for (title, description, date, image_url, tier) in SAMPLE_EVENTS {
        events.push(NewEvent {
            title: title.to_string(),
            description: description.to_string(),
            event_date: DateTime::parse_from_rfc3339(date)?.with_timezone(&Utc),
            image_url: Some(image_url.to_string()),
            tier,
        });
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::ORDER;

    #[test]
    fn two_events_per_tier_in_ascending_date_order() {
        let events = sample_events().unwrap();
        assert_eq!(events.len(), 8);
        for tier in ORDER {
            assert_eq!(events.iter().filter(|e| e.tier == tier).count(), 2);
        }
        assert!(events.windows(2).all(|w| w[0].event_date < w[1].event_date));
    }
}
