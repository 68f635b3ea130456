/// Tool feedback
///
/// The feedback set has its own file (`feedback.json`) that is created on
/// init, but no handler persists to it: submitted feedback is validated and
/// echoed back only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted rating
pub const MIN_RATING: f64 = 1.0;

/// Highest accepted rating
pub const MAX_RATING: f64 = 5.0;

/// Error type for feedback validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeedbackError {
    /// Rating outside 1..=5, fractions allowed
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange(f64),
}

/// Feedback left by a user on a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Tool identifier
    pub tool_name: String,

    /// Rating between 1 and 5
    pub rating: f64,

    /// Free-text comment
    pub comment: Option<String>,

    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Builds a feedback entry stamped with the current time
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::RatingOutOfRange` unless `1 <= rating <= 5`.
    pub fn new(
        tool_name: impl Into<String>,
        rating: f64,
        comment: Option<String>,
    ) -> Result<Self, FeedbackError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(FeedbackError::RatingOutOfRange(rating));
        }

        Ok(Self {
            tool_name: tool_name.into(),
            rating,
            comment,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Feedback::new("translation", 1.0, None).is_ok());
        assert!(Feedback::new("translation", 5.0, None).is_ok());
        assert_eq!(
            Feedback::new("translation", 0.0, None),
            Err(FeedbackError::RatingOutOfRange(0.0))
        );
        assert_eq!(
            Feedback::new("translation", 5.5, None),
            Err(FeedbackError::RatingOutOfRange(5.5))
        );
    }

    #[test]
    fn test_fractional_rating_in_range() {
        let feedback = Feedback::new("translation", 4.5, None).unwrap();
        assert_eq!(feedback.rating, 4.5);
    }

    #[test]
    fn test_keeps_comment() {
        let feedback = Feedback::new("code-assistant", 4.0, Some("handy".to_string())).unwrap();
        assert_eq!(feedback.rating, 4.0);
        assert_eq!(feedback.comment.as_deref(), Some("handy"));
    }
}
