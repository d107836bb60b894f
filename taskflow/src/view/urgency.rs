//! Due-date urgency badges.

use std::cmp::Ordering;

use chrono::{DateTime, TimeZone, Utc};

/// Display classification of a task's due date relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    /// Due before today started.
    Overdue,
    /// Due at some point today.
    Today,
    /// Due after today, or no due date. No badge.
    None,
}

impl Urgency {
    /// Classifies `due` against the calendar day of `now`.
    ///
    /// Day boundaries are taken in `now`'s time zone.
    #[must_use]
    pub fn classify<Tz: TimeZone>(due: Option<&DateTime<Utc>>, now: &DateTime<Tz>) -> Self {
        let Some(due) = due else {
            return Self::None;
        };
        let due_day = due.with_timezone(&now.timezone()).date_naive();
        match due_day.cmp(&now.date_naive()) {
            Ordering::Less => Self::Overdue,
            Ordering::Equal => Self::Today,
            Ordering::Greater => Self::None,
        }
    }

    /// Short label for a badge, or `None` when no badge is shown.
    #[must_use]
    pub const fn label(&self) -> Option<&'static str> {
        match self {
            Self::Overdue => Some("overdue"),
            Self::Today => Some("today"),
            Self::None => None,
        }
    }
}
