use std::cmp;

use crate::api::{CommentId, Time};

/// How new comment ids are picked
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum IdScheme {
    /// Milliseconds since the unix epoch at creation time
    #[default]
    Clock,

    /// 1, 2, 3...
    Sequential,
}

/// Hands out strictly increasing ids, never reusing one
#[derive(Clone, Debug)]
pub struct IdAllocator {
    scheme: IdScheme,
    last: u64,
}

impl IdAllocator {
    pub fn new(scheme: IdScheme) -> IdAllocator {
        IdAllocator { scheme, last: 0 }
    }

    pub fn scheme(&self) -> IdScheme {
        self.scheme
    }

    pub fn next(&mut self, now: &Time) -> CommentId {
        let wanted = match self.scheme {
            // dates before the epoch fall back to the sequence
            IdScheme::Clock => u64::try_from(now.timestamp_millis()).unwrap_or(0),
            IdScheme::Sequential => 0,
        };
        // two comments in the same millisecond, or a clock going backwards
        let id = cmp::max(wanted, self.last.saturating_add(1));
        self.last = id;
        CommentId(id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[test]
    fn sequential_ids() {
        let mut ids = IdAllocator::new(IdScheme::Sequential);
        let now = Utc::now();
        assert_eq!(ids.next(&now), CommentId(1));
        assert_eq!(ids.next(&now), CommentId(2));
        assert_eq!(ids.next(&now), CommentId(3));
    }

    #[test]
    fn clock_ids_follow_time() {
        let mut ids = IdAllocator::new(IdScheme::Clock);
        let t = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(ids.next(&t), CommentId(1_700_000_000_000));
        let later = t + Duration::milliseconds(250);
        assert_eq!(ids.next(&later), CommentId(1_700_000_000_250));
    }

    #[test]
    fn clock_ids_stay_increasing() {
        let mut ids = IdAllocator::new(IdScheme::Clock);
        let t = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let a = ids.next(&t);
        let b = ids.next(&t);
        let c = ids.next(&(t - Duration::seconds(10)));
        assert!(a < b && b < c, "{a:?} {b:?} {c:?}");
    }
}
