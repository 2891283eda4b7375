//! In-memory aggregate store
//!
//! All fleet tables live behind one `tokio::sync::RwLock`. Services take a
//! single write guard per mutating operation, so every read-decide-write
//! sequence (availability toggle, orphan cleanup, cascade deletion, rental
//! transition) is one serializable critical section and a failed
//! precondition check leaves the tables untouched.

use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::domain::{Make, Rental, RentalStatus, User, Vehicle, VehicleModel};

/// Every aggregate table plus the id counters.
#[derive(Debug, Default)]
pub struct Tables {
    vehicles: HashMap<i64, Vehicle>,
    makes: HashMap<i64, Make>,
    models: HashMap<i64, VehicleModel>,
    rentals: HashMap<i64, Rental>,
    users: HashMap<Uuid, User>,
    vehicle_seq: i64,
    make_seq: i64,
    model_seq: i64,
    rental_seq: i64,
    history_seq: i64,
}

impl Tables {
    // ── Vehicles ────────────────────────────────────────────────

    pub fn next_vehicle_id(&mut self) -> i64 {
        self.vehicle_seq += 1;
        self.vehicle_seq
    }

    pub fn vehicle(&self, id: i64) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicle_mut(&mut self, id: i64) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(&id)
    }

    pub fn vehicle_exists(&self, id: i64) -> bool {
        self.vehicles.contains_key(&id)
    }

    pub fn insert_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.insert(vehicle.id, vehicle);
    }

    pub fn remove_vehicle(&mut self, id: i64) -> Option<Vehicle> {
        self.vehicles.remove(&id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Live reference count for a make, by query over current vehicles.
    pub fn count_vehicles_by_make(&self, make_id: i64) -> usize {
        self.vehicles.values().filter(|v| v.make_id == make_id).count()
    }

    /// Live reference count for a model, by query over current vehicles.
    pub fn count_vehicles_by_model(&self, model_id: i64) -> usize {
        self.vehicles
            .values()
            .filter(|v| v.model_id == model_id)
            .count()
    }

    // ── Makes / Models (deduplicated by name) ───────────────────

    pub fn make(&self, id: i64) -> Option<&Make> {
        self.makes.get(&id)
    }

    pub fn model(&self, id: i64) -> Option<&VehicleModel> {
        self.models.get(&id)
    }

    pub fn find_make_by_name(&self, name: &str) -> Option<&Make> {
        self.makes.values().find(|m| m.name == name)
    }

    pub fn find_model_by_name(&self, name: &str) -> Option<&VehicleModel> {
        self.models.values().find(|m| m.name == name)
    }

    /// Lazy dedup: reuse the live record for `name` or create one.
    pub fn find_or_create_make(&mut self, name: &str) -> i64 {
        if let Some(make) = self.find_make_by_name(name) {
            return make.id;
        }
        self.make_seq += 1;
        let id = self.make_seq;
        self.makes.insert(
            id,
            Make {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn find_or_create_model(&mut self, name: &str) -> i64 {
        if let Some(model) = self.find_model_by_name(name) {
            return model.id;
        }
        self.model_seq += 1;
        let id = self.model_seq;
        self.models.insert(
            id,
            VehicleModel {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn remove_make(&mut self, id: i64) -> Option<Make> {
        self.makes.remove(&id)
    }

    pub fn remove_model(&mut self, id: i64) -> Option<VehicleModel> {
        self.models.remove(&id)
    }

    pub fn make_count(&self) -> usize {
        self.makes.len()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    // ── Rentals ─────────────────────────────────────────────────

    pub fn next_rental_id(&mut self) -> i64 {
        self.rental_seq += 1;
        self.rental_seq
    }

    pub fn next_history_id(&mut self) -> i64 {
        self.history_seq += 1;
        self.history_seq
    }

    pub fn rental(&self, id: i64) -> Option<&Rental> {
        self.rentals.get(&id)
    }

    pub fn rental_mut(&mut self, id: i64) -> Option<&mut Rental> {
        self.rentals.get_mut(&id)
    }

    pub fn rental_exists(&self, id: i64) -> bool {
        self.rentals.contains_key(&id)
    }

    pub fn insert_rental(&mut self, rental: Rental) {
        self.rentals.insert(rental.id, rental);
    }

    /// Removes the rental together with its owned history entries.
    pub fn remove_rental(&mut self, id: i64) -> Option<Rental> {
        self.rentals.remove(&id)
    }

    pub fn rentals(&self) -> impl Iterator<Item = &Rental> {
        self.rentals.values()
    }

    pub fn rentals_by_renter(&self, renter_id: Uuid) -> Vec<Rental> {
        self.rentals
            .values()
            .filter(|r| r.renter_id == renter_id)
            .cloned()
            .collect()
    }

    pub fn any_rental_for_vehicle(&self, vehicle_id: i64) -> bool {
        self.rentals.values().any(|r| r.vehicle_id == vehicle_id)
    }

    /// An accepted rental of this vehicle whose inclusive range contains
    /// `date`. Used by the availability toggle conflict check.
    pub fn vehicle_has_accepted_rental_on(&self, vehicle_id: i64, date: NaiveDate) -> bool {
        self.rentals.values().any(|r| {
            r.vehicle_id == vehicle_id && r.status == RentalStatus::Accepted && r.covers(date)
        })
    }

    // ── Users ───────────────────────────────────────────────────

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_exists(&self, id: Uuid) -> bool {
        self.users.contains_key(&id)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

/// The shared aggregate store.
pub struct FleetStore {
    tables: RwLock<Tables>,
}

impl FleetStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Shared guard for queries.
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Exclusive guard; one acquisition spans a whole read-decide-write
    /// operation.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FuelType, UserRole};

    #[tokio::test]
    async fn make_dedup_reuses_live_record() {
        let store = FleetStore::new();
        let mut t = store.write().await;

        let a = t.find_or_create_make("Toyota");
        let b = t.find_or_create_make("Toyota");
        let c = t.find_or_create_make("Honda");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(t.make_count(), 2);
    }

    #[tokio::test]
    async fn vehicle_reference_counts_are_live_queries() {
        let store = FleetStore::new();
        let mut t = store.write().await;

        let make = t.find_or_create_make("Skoda");
        let model = t.find_or_create_model("Octavia");
        for _ in 0..2 {
            let id = t.next_vehicle_id();
            t.insert_vehicle(Vehicle::new(
                id,
                make,
                model,
                2020,
                10000,
                FuelType::Diesel,
                150,
                "2.0 TDI",
                200,
            ));
        }

        assert_eq!(t.count_vehicles_by_make(make), 2);
        t.remove_vehicle(1);
        assert_eq!(t.count_vehicles_by_make(make), 1);
        t.remove_vehicle(2);
        assert_eq!(t.count_vehicles_by_make(make), 0);
    }

    #[tokio::test]
    async fn user_lookup_by_username_and_email() {
        let store = FleetStore::new();
        let mut t = store.write().await;

        let user = User::new("alice", "alice@example.com", "hash", UserRole::Admin);
        let id = user.id;
        t.insert_user(user);

        assert!(t.user_exists(id));
        assert!(t.find_user_by_username("alice").is_some());
        assert!(t.find_user_by_email("alice@example.com").is_some());
        assert!(t.find_user_by_username("bob").is_none());
    }
}
