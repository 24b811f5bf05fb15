use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::time::Time;

/// A record addressed by 1-based line number in the list text
pub trait LineAddressed {
    fn line(&self) -> usize;
    fn set_line(&mut self, line: usize);
}

/// Which task is being timed, and since when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub line: usize,
    pub node_id: NodeId,
    pub is_tracking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_start: Option<DateTime<Utc>>,
    /// Time recorded by this record so far
    #[serde(default)]
    pub elapsed: Time,
}

impl TrackingRecord {
    pub fn started(line: usize, node_id: NodeId, start: DateTime<Utc>) -> Self {
        TrackingRecord {
            line,
            node_id,
            is_tracking: true,
            tracking_start: Some(start),
            elapsed: Time::default(),
        }
    }
}

/// A calendar event linked to a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLine {
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    pub event_id: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AlarmError {
    #[error("alarm for line {0} needs a delay in minutes or an absolute time")]
    NoBasis(usize),
    #[error("alarm for line {0} is out of range")]
    OutOfRange(usize),
}

/// A reminder scheduled for a line, either relative or absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRule {
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    /// Minutes after `created`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
}

impl AlarmRule {
    pub fn new(
        line: usize,
        minutes: Option<i64>,
        when: Option<DateTime<Utc>>,
        created: DateTime<Utc>,
    ) -> Result<Self, AlarmError> {
        if minutes.is_none() && when.is_none() {
            return Err(AlarmError::NoBasis(line));
        }
        let rule = AlarmRule {
            line,
            node_id: None,
            minutes,
            when,
            created,
        };
        if rule.fires_at().is_none() {
            return Err(AlarmError::OutOfRange(line));
        }
        Ok(rule)
    }

    /// When the alarm fires. An absolute time wins over a delay. None when
    /// the delay falls outside the representable date range.
    pub fn fires_at(&self) -> Option<DateTime<Utc>> {
        match (self.when, self.minutes) {
            (Some(when), _) => Some(when),
            (None, Some(minutes)) => chrono::Duration::try_minutes(minutes)
                .and_then(|delay| self.created.checked_add_signed(delay)),
            (None, None) => Some(self.created),
        }
    }
}

impl LineAddressed for TrackingRecord {
    fn line(&self) -> usize {
        self.line
    }
    fn set_line(&mut self, line: usize) {
        self.line = line;
    }
}

impl LineAddressed for EventLine {
    fn line(&self) -> usize {
        self.line
    }
    fn set_line(&mut self, line: usize) {
        self.line = line;
    }
}

impl LineAddressed for AlarmRule {
    fn line(&self) -> usize {
        self.line
    }
    fn set_line(&mut self, line: usize) {
        self.line = line;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_alarm_needs_basis() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        assert_eq!(AlarmRule::new(3, None, None, now), Err(AlarmError::NoBasis(3)));
    }

    #[test]
    fn test_alarm_fires_at() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let relative = AlarmRule::new(1, Some(25), None, now).unwrap();
        assert_eq!(relative.fires_at(), Utc.with_ymd_and_hms(2025, 1, 1, 8, 25, 0).single());

        let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let absolute = AlarmRule::new(1, Some(25), Some(at), now).unwrap();
        assert_eq!(absolute.fires_at(), Some(at));
    }

    #[test]
    fn test_alarm_delay_out_of_range() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        assert_eq!(
            AlarmRule::new(1, Some(i64::MAX / 2), None, now),
            Err(AlarmError::OutOfRange(1))
        );
        assert_eq!(
            AlarmRule::new(1, Some(i64::MAX), None, now),
            Err(AlarmError::OutOfRange(1))
        );

        // a stored rule with a bad delay has no firing time
        let stored = AlarmRule {
            line: 1,
            node_id: None,
            minutes: Some(i64::MAX / 2),
            when: None,
            created: now,
        };
        assert_eq!(stored.fires_at(), None);
    }
}
