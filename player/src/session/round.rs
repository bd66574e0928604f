use chrono::{DateTime, Utc};

/// One timed word-elicitation period of a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundInfo {
    /// The word every participant associates with, it can never be submitted itself
    pub keyword: String,
    pub start_time: DateTime<Utc>,
}

impl RoundInfo {
    pub fn new(keyword: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        RoundInfo {
            keyword: keyword.into(),
            start_time,
        }
    }

    pub fn starting_now(keyword: impl Into<String>) -> Self {
        RoundInfo::new(keyword, Utc::now())
    }

    /// Milliseconds between the round start and `at`
    pub fn elapsed_ms(&self, at: DateTime<Utc>) -> i64 {
        (at - self.start_time).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_elapsed_ms() {
        let start = Utc::now();
        let round = RoundInfo::new("apple", start);

        assert_eq!(round.elapsed_ms(start + Duration::milliseconds(1500)), 1500);
        assert_eq!(round.elapsed_ms(start), 0);
    }
}
