//! Ordering rules for the operational queues.

use std::cmp::Ordering;

use crate::models::QueueEntry;

/// Total order for a queue: priority descending, then scheduled time
/// ascending. Ties keep insertion order.
pub fn queue_order(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.scheduled_time.cmp(&b.scheduled_time))
}

/// Re-establish the total order after a mutation.
pub fn sort_entries(entries: &mut [QueueEntry]) {
    entries.sort_by(queue_order);
}

/// Whether a flight already appears among `entries`.
pub fn contains_flight(entries: &[QueueEntry], flight_id: &str) -> bool {
    entries.iter().any(|e| e.flight_id == flight_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueueKind;
    use chrono::NaiveTime;

    fn entry(flight_id: &str, h: u32, m: u32, priority: i32) -> QueueEntry {
        QueueEntry {
            flight_id: flight_id.into(),
            scheduled_time: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            priority,
            preferred_runway: "10/28".into(),
            kind: QueueKind::Departure,
        }
    }

    #[test]
    fn higher_priority_sorts_first() {
        let mut entries = vec![
            entry("AZ100", 8, 0, 1),
            entry("AZ200", 9, 0, 5),
            entry("AZ300", 7, 0, 3),
        ];
        sort_entries(&mut entries);
        let ids: Vec<_> = entries.iter().map(|e| e.flight_id.as_str()).collect();
        assert_eq!(ids, ["AZ200", "AZ300", "AZ100"]);
    }

    #[test]
    fn equal_priority_orders_by_scheduled_time() {
        let mut entries = vec![
            entry("AZ100", 9, 30, 2),
            entry("AZ200", 8, 15, 2),
            entry("AZ300", 8, 45, 2),
        ];
        sort_entries(&mut entries);
        let ids: Vec<_> = entries.iter().map(|e| e.flight_id.as_str()).collect();
        assert_eq!(ids, ["AZ200", "AZ300", "AZ100"]);
    }

    #[test]
    fn full_ties_keep_insertion_order() {
        let mut entries = vec![
            entry("AZ100", 8, 0, 2),
            entry("AZ200", 8, 0, 2),
            entry("AZ300", 8, 0, 2),
        ];
        sort_entries(&mut entries);
        let ids: Vec<_> = entries.iter().map(|e| e.flight_id.as_str()).collect();
        assert_eq!(ids, ["AZ100", "AZ200", "AZ300"]);
    }

    #[test]
    fn contains_flight_matches_exact_id() {
        let entries = vec![entry("AZ100", 8, 0, 1)];
        assert!(contains_flight(&entries, "AZ100"));
        assert!(!contains_flight(&entries, "AZ10"));
    }
}
