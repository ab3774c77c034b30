//! Ballots cast by users.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

/// A recorded vote. At most one exists per `(question_id, voter)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub id: Uuid,
    pub question_id: Uuid,
    pub choice_id: Uuid,
    pub voter: UserId,
    pub cast_at: DateTime<Utc>,
}
