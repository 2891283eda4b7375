//! Rental domain entity and status vocabulary

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Rental status vocabulary, addressed by id over the API.
///
/// Every status is reachable from every other status; transitions are
/// admin-driven with no terminal enforcement. The only guard on a
/// transition is vocabulary membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalStatus {
    Pending,
    Accepted,
    Rejected,
    Active,
    Completed,
    Cancelled,
}

impl RentalStatus {
    pub fn id(&self) -> i64 {
        match self {
            Self::Pending => 1,
            Self::Accepted => 2,
            Self::Rejected => 3,
            Self::Active => 4,
            Self::Completed => 5,
            Self::Cancelled => 6,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Pending),
            2 => Some(Self::Accepted),
            3 => Some(Self::Rejected),
            4 => Some(Self::Active),
            5 => Some(Self::Completed),
            6 => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn all() -> [RentalStatus; 6] {
        [
            Self::Pending,
            Self::Accepted,
            Self::Rejected,
            Self::Active,
            Self::Completed,
            Self::Cancelled,
        ]
    }
}

/// One immutable entry in a rental's status audit log.
///
/// Owned by its rental, written once per transition, deleted only when the
/// rental itself is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub status: RentalStatus,
    pub recorded_at: DateTime<Utc>,
}

/// A booking of one vehicle by one renter over an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    pub id: i64,
    pub vehicle_id: i64,
    pub renter_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Always `(inclusive days) * vehicle.daily_rate` as of the last
    /// creation or date edit; never settable directly.
    pub price: i64,
    pub status: RentalStatus,
    history: Vec<StatusHistoryEntry>,
}

impl Rental {
    /// A new rental starts Pending with a single history entry timestamped
    /// at creation. Callers validate the date range and compute the price
    /// beforehand.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        vehicle_id: i64,
        renter_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        created_at: DateTime<Utc>,
        price: i64,
        initial_entry_id: i64,
    ) -> Self {
        Self {
            id,
            vehicle_id,
            renter_id,
            start_date,
            end_date,
            created_at,
            price,
            status: RentalStatus::Pending,
            history: vec![StatusHistoryEntry {
                id: initial_entry_id,
                status: RentalStatus::Pending,
                recorded_at: created_at,
            }],
        }
    }

    /// Move to `status`, appending exactly one history entry.
    pub fn record_status(&mut self, entry_id: i64, status: RentalStatus, at: DateTime<Utc>) {
        self.history.push(StatusHistoryEntry {
            id: entry_id,
            status,
            recorded_at: at,
        });
        self.status = status;
    }

    /// Change the date range and the recomputed price. Status and history
    /// are untouched.
    pub fn reschedule(&mut self, start_date: NaiveDate, end_date: NaiveDate, price: i64) {
        self.start_date = start_date;
        self.end_date = end_date;
        self.price = price;
    }

    /// Append-only view of the audit log, in recording order.
    pub fn history(&self) -> &[StatusHistoryEntry] {
        &self.history
    }

    /// Whether `date` falls inside the inclusive rental range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_rental() -> Rental {
        Rental::new(
            1,
            7,
            Uuid::new_v4(),
            date(2024, 5, 1),
            date(2024, 5, 3),
            Utc::now(),
            300,
            1,
        )
    }

    #[test]
    fn new_rental_is_pending_with_one_history_entry() {
        let rental = sample_rental();
        assert_eq!(rental.status, RentalStatus::Pending);
        assert_eq!(rental.history().len(), 1);
        assert_eq!(rental.history()[0].status, RentalStatus::Pending);
        assert_eq!(rental.history()[0].recorded_at, rental.created_at);
    }

    #[test]
    fn record_status_appends_and_updates() {
        let mut rental = sample_rental();
        let at = Utc::now();
        rental.record_status(2, RentalStatus::Accepted, at);

        assert_eq!(rental.status, RentalStatus::Accepted);
        assert_eq!(rental.history().len(), 2);
        let last = rental.history().last().unwrap();
        assert_eq!(last.status, RentalStatus::Accepted);
        assert_eq!(last.recorded_at, at);
    }

    #[test]
    fn last_history_entry_always_matches_current_status() {
        let mut rental = sample_rental();
        for (i, status) in [
            RentalStatus::Accepted,
            RentalStatus::Active,
            RentalStatus::Completed,
            // Permissive machine: leaving a terminal status is allowed
            RentalStatus::Pending,
        ]
        .into_iter()
        .enumerate()
        {
            rental.record_status(i as i64 + 2, status, Utc::now());
            assert_eq!(rental.history().last().unwrap().status, rental.status);
        }
        assert_eq!(rental.history().len(), 5);
    }

    #[test]
    fn history_preserves_call_order() {
        let mut rental = sample_rental();
        rental.record_status(2, RentalStatus::Accepted, Utc::now());
        rental.record_status(3, RentalStatus::Cancelled, Utc::now());

        let statuses: Vec<_> = rental.history().iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                RentalStatus::Pending,
                RentalStatus::Accepted,
                RentalStatus::Cancelled
            ]
        );
    }

    #[test]
    fn reschedule_leaves_status_and_history_alone() {
        let mut rental = sample_rental();
        rental.record_status(2, RentalStatus::Accepted, Utc::now());

        rental.reschedule(date(2024, 6, 1), date(2024, 6, 10), 1000);

        assert_eq!(rental.start_date, date(2024, 6, 1));
        assert_eq!(rental.end_date, date(2024, 6, 10));
        assert_eq!(rental.price, 1000);
        assert_eq!(rental.status, RentalStatus::Accepted);
        assert_eq!(rental.history().len(), 2);
    }

    #[test]
    fn covers_is_inclusive_of_both_endpoints() {
        let rental = sample_rental();
        assert!(rental.covers(date(2024, 5, 1)));
        assert!(rental.covers(date(2024, 5, 2)));
        assert!(rental.covers(date(2024, 5, 3)));
        assert!(!rental.covers(date(2024, 4, 30)));
        assert!(!rental.covers(date(2024, 5, 4)));
    }

    #[test]
    fn status_roundtrip() {
        for status in RentalStatus::all() {
            assert_eq!(RentalStatus::from_id(status.id()), Some(status));
        }
        assert!(RentalStatus::from_id(0).is_none());
        assert!(RentalStatus::from_id(7).is_none());
    }
}
