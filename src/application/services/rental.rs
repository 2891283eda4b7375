//! Rental lifecycle service
//!
//! Creates bookings against the live vehicle rate, drives status
//! transitions with their append-only audit log, and answers the
//! read-side queries. Price is always derived, never accepted from the
//! caller.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::{rental_price, DomainError, DomainResult, Rental, RentalStatus};
use crate::infrastructure::storage::FleetStore;

#[derive(Clone)]
pub struct RentalService {
    store: Arc<FleetStore>,
}

impl RentalService {
    pub fn new(store: Arc<FleetStore>) -> Self {
        Self { store }
    }

    /// Book a vehicle for an inclusive date range. The price is computed
    /// from the vehicle's current daily rate at booking time.
    pub async fn create(
        &self,
        vehicle_id: i64,
        renter_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Rental> {
        let mut t = self.store.write().await;
        let daily_rate = t
            .vehicle(vehicle_id)
            .map(|v| v.daily_rate)
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", vehicle_id.to_string()))?;
        if !t.user_exists(renter_id) {
            return Err(DomainError::not_found("User", "id", renter_id.to_string()));
        }
        let price = rental_price(start_date, end_date, daily_rate)?;

        let id = t.next_rental_id();
        let entry_id = t.next_history_id();
        let rental = Rental::new(
            id, vehicle_id, renter_id, start_date, end_date, created_at, price, entry_id,
        );
        t.insert_rental(rental.clone());

        info!(rental_id = id, vehicle_id, price, "Rental created");
        Ok(rental)
    }

    /// Move a rental to the status with the given id, appending one
    /// history entry. Any status in the vocabulary is a valid target.
    pub async fn change_status(
        &self,
        rental_id: i64,
        status_id: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<Rental> {
        let status =
            RentalStatus::from_id(status_id).ok_or(DomainError::UnknownStatus(status_id))?;

        let mut t = self.store.write().await;
        if !t.rental_exists(rental_id) {
            return Err(DomainError::not_found("Rental", "id", rental_id.to_string()));
        }
        let entry_id = t.next_history_id();
        let rental = match t.rental_mut(rental_id) {
            Some(r) => {
                r.record_status(entry_id, status, at);
                r.clone()
            }
            None => {
                return Err(DomainError::not_found("Rental", "id", rental_id.to_string()))
            }
        };

        info!(rental_id, status = status.as_str(), "Rental status changed");
        Ok(rental)
    }

    /// Change the booked date range and recompute the price from the
    /// vehicle's current rate. Status and history are untouched.
    pub async fn edit_dates(
        &self,
        rental_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<Rental> {
        let mut t = self.store.write().await;
        let vehicle_id = t
            .rental(rental_id)
            .map(|r| r.vehicle_id)
            .ok_or_else(|| DomainError::not_found("Rental", "id", rental_id.to_string()))?;
        let daily_rate = t
            .vehicle(vehicle_id)
            .map(|v| v.daily_rate)
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", vehicle_id.to_string()))?;
        let price = rental_price(start_date, end_date, daily_rate)?;

        let rental = match t.rental_mut(rental_id) {
            Some(r) => {
                r.reschedule(start_date, end_date, price);
                r.clone()
            }
            None => {
                return Err(DomainError::not_found("Rental", "id", rental_id.to_string()))
            }
        };

        info!(rental_id, price, "Rental rescheduled");
        Ok(rental)
    }

    /// Delete a rental together with its history entries.
    pub async fn delete(&self, rental_id: i64) -> DomainResult<()> {
        let mut t = self.store.write().await;
        t.remove_rental(rental_id)
            .ok_or_else(|| DomainError::not_found("Rental", "id", rental_id.to_string()))?;
        info!(rental_id, "Rental deleted");
        Ok(())
    }

    pub async fn get(&self, rental_id: i64) -> DomainResult<Rental> {
        let t = self.store.read().await;
        t.rental(rental_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Rental", "id", rental_id.to_string()))
    }

    pub async fn list_all(&self) -> Vec<Rental> {
        let t = self.store.read().await;
        let mut rentals: Vec<_> = t.rentals().cloned().collect();
        rentals.sort_by_key(|r| r.id);
        rentals
    }

    pub async fn list_by_renter(&self, renter_id: Uuid) -> DomainResult<Vec<Rental>> {
        let t = self.store.read().await;
        if !t.user_exists(renter_id) {
            return Err(DomainError::not_found("User", "id", renter_id.to_string()));
        }
        let mut rentals = t.rentals_by_renter(renter_id);
        rentals.sort_by_key(|r| r.id);
        Ok(rentals)
    }

    pub async fn history(&self, rental_id: i64) -> DomainResult<Rental> {
        self.get(rental_id).await
    }

    /// The status reference table.
    pub fn statuses() -> [RentalStatus; 6] {
        RentalStatus::all()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::{User, UserRole, Vehicle, FuelType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (RentalService, i64, Uuid) {
        let store = Arc::new(FleetStore::new());
        let svc = RentalService::new(store.clone());
        let mut t = store.write().await;
        let vid = t.next_vehicle_id();
        t.insert_vehicle(Vehicle::new(
            vid,
            1,
            1,
            2020,
            30000,
            FuelType::Diesel,
            150,
            "2.0 TDI",
            100,
        ));
        let user = User::new("renter", "renter@example.com", "hash", UserRole::Renter);
        let uid = user.id;
        t.insert_user(user);
        drop(t);
        (svc, vid, uid)
    }

    #[tokio::test]
    async fn create_prices_inclusive_days_at_current_rate() {
        let (svc, vid, uid) = setup().await;
        let rental = svc
            .create(vid, uid, date(2024, 1, 1), date(2024, 1, 3), Utc::now())
            .await
            .unwrap();

        // 3 inclusive days at 100/day.
        assert_eq!(rental.price, 300);
        assert_eq!(rental.status, RentalStatus::Pending);
        assert_eq!(rental.history().len(), 1);
    }

    #[tokio::test]
    async fn create_same_day_rental_costs_one_day() {
        let (svc, vid, uid) = setup().await;
        let rental = svc
            .create(vid, uid, date(2024, 1, 1), date(2024, 1, 1), Utc::now())
            .await
            .unwrap();
        assert_eq!(rental.price, 100);
    }

    #[tokio::test]
    async fn create_rejects_inverted_range_without_writing() {
        let (svc, vid, uid) = setup().await;
        let err = svc
            .create(vid, uid, date(2024, 1, 5), date(2024, 1, 1), Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidRange { .. }));
        assert!(svc.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn create_requires_vehicle_and_user() {
        let (svc, vid, uid) = setup().await;
        let err = svc
            .create(99, uid, date(2024, 1, 1), date(2024, 1, 2), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("Vehicle", "id", "99"));

        let ghost = Uuid::new_v4();
        let err = svc
            .create(vid, ghost, date(2024, 1, 1), date(2024, 1, 2), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("User", "id", ghost.to_string()));
    }

    #[tokio::test]
    async fn change_status_appends_ordered_history() {
        let (svc, vid, uid) = setup().await;
        let rental = svc
            .create(vid, uid, date(2024, 1, 1), date(2024, 1, 3), Utc::now())
            .await
            .unwrap();

        svc.change_status(rental.id, RentalStatus::Accepted.id(), Utc::now())
            .await
            .unwrap();
        let updated = svc
            .change_status(rental.id, RentalStatus::Active.id(), Utc::now())
            .await
            .unwrap();

        assert_eq!(updated.status, RentalStatus::Active);
        let statuses: Vec<_> = updated.history().iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![RentalStatus::Pending, RentalStatus::Accepted, RentalStatus::Active]
        );
    }

    #[tokio::test]
    async fn change_status_rejects_unknown_id_without_history_entry() {
        let (svc, vid, uid) = setup().await;
        let rental = svc
            .create(vid, uid, date(2024, 1, 1), date(2024, 1, 3), Utc::now())
            .await
            .unwrap();

        let err = svc.change_status(rental.id, 42, Utc::now()).await.unwrap_err();
        assert_eq!(err, DomainError::UnknownStatus(42));
        assert_eq!(svc.get(rental.id).await.unwrap().history().len(), 1);
    }

    #[tokio::test]
    async fn edit_dates_recomputes_price_from_current_rate() {
        let (svc, vid, uid) = setup().await;
        let rental = svc
            .create(vid, uid, date(2024, 1, 1), date(2024, 1, 3), Utc::now())
            .await
            .unwrap();
        assert_eq!(rental.price, 300);

        // Raise the vehicle rate, then reschedule.
        {
            let mut t = svc.store.write().await;
            if let Some(v) = t.vehicle_mut(vid) {
                v.daily_rate = 200;
            }
        }
        let updated = svc
            .edit_dates(rental.id, date(2024, 1, 1), date(2024, 1, 2))
            .await
            .unwrap();

        assert_eq!(updated.price, 400);
        assert_eq!(updated.history().len(), 1);
    }

    #[tokio::test]
    async fn edit_dates_rejects_inverted_range_keeping_rental() {
        let (svc, vid, uid) = setup().await;
        let rental = svc
            .create(vid, uid, date(2024, 1, 1), date(2024, 1, 3), Utc::now())
            .await
            .unwrap();

        let err = svc
            .edit_dates(rental.id, date(2024, 2, 5), date(2024, 2, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange { .. }));

        let unchanged = svc.get(rental.id).await.unwrap();
        assert_eq!(unchanged.start_date, date(2024, 1, 1));
        assert_eq!(unchanged.price, 300);
    }

    #[tokio::test]
    async fn delete_removes_rental_and_history() {
        let (svc, vid, uid) = setup().await;
        let rental = svc
            .create(vid, uid, date(2024, 1, 1), date(2024, 1, 3), Utc::now())
            .await
            .unwrap();
        svc.change_status(rental.id, RentalStatus::Cancelled.id(), Utc::now())
            .await
            .unwrap();

        svc.delete(rental.id).await.unwrap();
        assert!(svc.get(rental.id).await.is_err());
        assert_eq!(
            svc.delete(rental.id).await.unwrap_err(),
            DomainError::not_found("Rental", "id", rental.id.to_string())
        );
    }

    #[tokio::test]
    async fn list_by_renter_filters_and_requires_user() {
        let (svc, vid, uid) = setup().await;
        svc.create(vid, uid, date(2024, 1, 1), date(2024, 1, 3), Utc::now())
            .await
            .unwrap();

        let other = {
            let mut t = svc.store.write().await;
            let user = User::new("other", "other@example.com", "hash", UserRole::Renter);
            let id = user.id;
            t.insert_user(user);
            id
        };
        svc.create(vid, other, date(2024, 2, 1), date(2024, 2, 3), Utc::now())
            .await
            .unwrap();

        assert_eq!(svc.list_by_renter(uid).await.unwrap().len(), 1);
        assert_eq!(svc.list_all().await.len(), 2);
        assert!(svc.list_by_renter(Uuid::new_v4()).await.is_err());
    }

    #[test]
    fn status_table_is_stable() {
        let statuses = RentalService::statuses();
        assert_eq!(statuses.len(), 6);
        assert_eq!(statuses[0], RentalStatus::Pending);
        assert_eq!(statuses[5], RentalStatus::Cancelled);
    }
}
