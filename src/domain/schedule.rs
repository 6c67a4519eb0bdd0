//! Trading session schedule.
//!
//! The exchange trades on weekdays in two local time windows separated by
//! an auction pause. Gating is evaluated against the wall clock before any
//! port is touched; a closed session means a long backoff and nothing else.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};

/// One trading session window, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    /// Session opening time (local).
    pub open: NaiveTime,
    /// Session closing time (local).
    pub close: NaiveTime,
}

impl SessionWindow {
    /// Whether `time` falls inside the window, both ends inclusive.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.open <= time && time <= self.close
    }
}

/// Weekday-only schedule over a set of session windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSchedule {
    sessions: Vec<SessionWindow>,
}

impl SessionSchedule {
    /// Build a schedule, rejecting empty or inverted windows.
    pub fn new(sessions: Vec<SessionWindow>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !sessions.is_empty(),
            "at least one session window must be configured"
        );
        for window in &sessions {
            anyhow::ensure!(
                window.open < window.close,
                "session window must open before it closes ({} >= {})",
                window.open,
                window.close
            );
        }
        Ok(Self { sessions })
    }

    /// Whether trading is open at the given local date-time.
    ///
    /// Open iff the day is Monday–Friday and the time-of-day falls inside
    /// one of the session windows. Seconds are ignored so a window closing
    /// at 18:45 still admits 18:45:59, matching minute-granular config.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        if at.weekday().number_from_monday() > 5 {
            return false;
        }
        let minute = at.time().with_second(0).and_then(|t| t.with_nanosecond(0));
        let Some(minute) = minute else {
            return false;
        };
        self.sessions.iter().any(|w| w.contains(minute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn schedule() -> SessionSchedule {
        // Main session plus evening session with an auction gap between.
        SessionSchedule::new(vec![
            SessionWindow {
                open: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                close: NaiveTime::from_hms_opt(18, 45, 0).unwrap(),
            },
            SessionWindow {
                open: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                close: NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
            },
        ])
        .unwrap()
    }

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    #[test]
    fn test_saturday_is_closed() {
        // 2024-06-15 is a Saturday.
        assert!(!schedule().is_open_at(at(2024, 6, 15, 12, 0)));
    }

    #[test]
    fn test_weekday_gap_between_sessions_is_closed() {
        // 2024-06-14 is a Friday; 18:50 sits in the auction pause.
        assert!(!schedule().is_open_at(at(2024, 6, 14, 18, 50)));
    }

    #[test]
    fn test_weekday_session_open_bound_is_open() {
        assert!(schedule().is_open_at(at(2024, 6, 14, 10, 0)));
    }

    #[test]
    fn test_weekday_late_evening_is_open() {
        assert!(schedule().is_open_at(at(2024, 6, 14, 23, 58)));
    }

    #[test]
    fn test_session_close_bound_is_open() {
        assert!(schedule().is_open_at(at(2024, 6, 14, 18, 45)));
    }

    #[test]
    fn test_before_open_is_closed() {
        assert!(!schedule().is_open_at(at(2024, 6, 14, 9, 59)));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = SessionSchedule::new(vec![SessionWindow {
            open: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            close: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_schedule_rejected() {
        assert!(SessionSchedule::new(vec![]).is_err());
    }
}
