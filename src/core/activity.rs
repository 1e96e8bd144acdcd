//! Activity and idle tracking
//!
//! Tracks whether the user is active, idle or away and buffers
//! [`ActivityEvent`]s until they are reported in a batch. The clock is passed
//! in by the caller so the state machine runs the same in the browser and in
//! tests.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Oldest events are dropped past this many unreported events
pub const MAX_PENDING_EVENTS: usize = 500;

/// User activity status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// User is actively working
    Active,
    /// No input for 30 seconds
    Idle,
    /// Page hidden, or no input for 10 minutes
    Away,
}

impl ActivityStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ActivityStatus::Active)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityStatus::Active => "Active",
            ActivityStatus::Idle => "Idle",
            ActivityStatus::Away => "Away",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    PageView,
    Action,
    StatusChange,
}

/// One entry of the activity log sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    pub at: DateTime<Utc>,
}

impl ActivityEvent {
    fn new(kind: ActivityKind, page: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            page: page.to_string(),
            detail: None,
            status: None,
            at,
        }
    }
}

pub struct ActivityTracker {
    last_activity: DateTime<Utc>,
    status: ActivityStatus,
    idle_threshold: TimeDelta,
    away_threshold: TimeDelta,
    page: String,
    pending: Vec<ActivityEvent>,
}

impl ActivityTracker {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_activity: now,
            status: ActivityStatus::Active,
            idle_threshold: TimeDelta::seconds(30),
            away_threshold: TimeDelta::seconds(600),
            page: String::new(),
            pending: Vec::new(),
        }
    }

    pub fn with_thresholds(mut self, idle: TimeDelta, away: TimeDelta) -> Self {
        self.idle_threshold = idle;
        self.away_threshold = away;
        self
    }

    pub fn status(&self) -> ActivityStatus {
        self.status
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn elapsed_since_activity(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.last_activity
    }

    /// Navigation to `page`; counts as activity
    pub fn page_view(&mut self, page: &str, now: DateTime<Utc>) {
        self.page = page.to_string();
        self.record_activity(now);
        self.push(ActivityEvent::new(ActivityKind::PageView, page, now));
    }

    /// A named user action on the current page; counts as activity
    pub fn action(&mut self, detail: &str, now: DateTime<Utc>) {
        self.record_activity(now);
        let mut event = ActivityEvent::new(ActivityKind::Action, &self.page, now);
        event.detail = Some(detail.to_string());
        self.push(event);
    }

    /// Mouse or keyboard input
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
        self.set_status(ActivityStatus::Active, now);
    }

    pub fn record_page_hidden(&mut self, now: DateTime<Utc>) {
        self.set_status(ActivityStatus::Away, now);
    }

    pub fn record_page_visible(&mut self, now: DateTime<Utc>) {
        if self.status == ActivityStatus::Away {
            self.record_activity(now);
        }
    }

    /// Re-evaluate idle state at `now`. Returns true if the status changed.
    pub fn update(&mut self, now: DateTime<Utc>) -> bool {
        // Hidden pages stay away until they are visible again
        if self.status == ActivityStatus::Away {
            return false;
        }

        let elapsed = self.elapsed_since_activity(now);
        let status = if elapsed >= self.away_threshold {
            ActivityStatus::Away
        } else if elapsed >= self.idle_threshold {
            ActivityStatus::Idle
        } else {
            ActivityStatus::Active
        };

        self.set_status(status, now)
    }

    fn set_status(&mut self, status: ActivityStatus, now: DateTime<Utc>) -> bool {
        if status == self.status {
            return false;
        }
        tracing::debug!(
            "Activity status {} -> {}",
            self.status.display_name(),
            status.display_name()
        );
        self.status = status;

        let mut event = ActivityEvent::new(ActivityKind::StatusChange, &self.page, now);
        event.status = Some(status);
        self.push(event);
        true
    }

    fn push(&mut self, event: ActivityEvent) {
        self.pending.push(event);
        if self.pending.len() > MAX_PENDING_EVENTS {
            let excess = self.pending.len() - MAX_PENDING_EVENTS;
            self.pending.drain(..excess);
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Take every buffered event for reporting
    pub fn drain(&mut self) -> Vec<ActivityEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Put back a batch that failed to report, ahead of newer events
    pub fn requeue(&mut self, mut events: Vec<ActivityEvent>) {
        events.append(&mut self.pending);
        self.pending = events;
        if self.pending.len() > MAX_PENDING_EVENTS {
            let excess = self.pending.len() - MAX_PENDING_EVENTS;
            self.pending.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn after(secs: i64) -> DateTime<Utc> {
        start() + TimeDelta::seconds(secs)
    }

    #[test]
    fn test_initial_status() {
        let tracker = ActivityTracker::new(start());
        assert_eq!(tracker.status(), ActivityStatus::Active);
        assert_eq!(tracker.pending_len(), 0);
    }

    #[test]
    fn test_active_idle_away_transitions() {
        let mut tracker = ActivityTracker::new(start());

        assert!(!tracker.update(after(29)));
        assert_eq!(tracker.status(), ActivityStatus::Active);

        assert!(tracker.update(after(30)));
        assert_eq!(tracker.status(), ActivityStatus::Idle);

        assert!(!tracker.update(after(300)));
        assert!(tracker.update(after(600)));
        assert_eq!(tracker.status(), ActivityStatus::Away);
    }

    #[test]
    fn test_activity_resets_to_active() {
        let mut tracker = ActivityTracker::new(start());
        tracker.update(after(45));
        assert_eq!(tracker.status(), ActivityStatus::Idle);

        tracker.record_activity(after(50));
        assert_eq!(tracker.status(), ActivityStatus::Active);
        assert!(!tracker.update(after(70)));
    }

    #[test]
    fn test_page_hidden_is_away_until_visible() {
        let mut tracker = ActivityTracker::new(start());
        tracker.record_page_hidden(after(1));
        assert_eq!(tracker.status(), ActivityStatus::Away);

        assert!(!tracker.update(after(5)));
        assert_eq!(tracker.status(), ActivityStatus::Away);

        tracker.record_page_visible(after(10));
        assert_eq!(tracker.status(), ActivityStatus::Active);
        assert_eq!(tracker.elapsed_since_activity(after(10)), TimeDelta::zero());
    }

    #[test]
    fn test_events_are_buffered_and_drained() {
        let mut tracker = ActivityTracker::new(start());
        tracker.page_view("/student/dashboard", after(0));
        tracker.action("enroll:CS101", after(2));
        tracker.update(after(40));

        let events = tracker.drain();
        assert_eq!(tracker.pending_len(), 0);

        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ActivityKind::PageView, ActivityKind::Action, ActivityKind::StatusChange]
        );
        assert_eq!(events[1].page, "/student/dashboard");
        assert_eq!(events[1].detail.as_deref(), Some("enroll:CS101"));
        assert_eq!(events[2].status, Some(ActivityStatus::Idle));
        assert_ne!(events[0].id, events[1].id);
    }

    #[test]
    fn test_requeue_keeps_order_and_cap() {
        let mut tracker = ActivityTracker::new(start());
        tracker.page_view("/a", after(0));
        let batch = tracker.drain();
        tracker.page_view("/b", after(1));

        tracker.requeue(batch);
        let pages: Vec<_> = tracker.drain().into_iter().map(|e| e.page).collect();
        assert_eq!(pages, vec!["/a", "/b"]);

        for i in 0..(MAX_PENDING_EVENTS + 10) {
            tracker.action("click", after(i as i64));
        }
        assert_eq!(tracker.pending_len(), MAX_PENDING_EVENTS);
    }

    #[test]
    fn test_event_serializes_with_snake_case_kind() {
        let mut tracker = ActivityTracker::new(start());
        tracker.record_page_hidden(after(3));
        let event = tracker.drain().remove(0);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], serde_json::json!("status_change"));
        assert_eq!(json["status"], serde_json::json!("away"));
        assert!(json.get("detail").is_none());
    }
}
