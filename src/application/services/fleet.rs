//! Fleet management service
//!
//! Every mutating operation takes one write guard on the store, runs all
//! precondition checks first, then applies its mutations. Make, model and
//! image records are reference-managed: a vehicle edit or deletion that
//! drops the last reference removes the orphaned record in the same
//! critical section.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{DomainError, DomainResult, FuelType, Vehicle, DEFAULT_IMAGE_ID};
use crate::infrastructure::storage::{FleetStore, ImageStore, Tables};

/// Input for vehicle registration. Make and model arrive by name and are
/// resolved (or created) inside the operation.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub fuel_type_id: i64,
    pub horsepower: i32,
    pub capacity: String,
    pub daily_rate: i64,
}

/// Partial update for a vehicle. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub mileage: Option<i32>,
    pub fuel_type_id: Option<i64>,
    pub horsepower: Option<i32>,
    pub capacity: Option<String>,
    pub daily_rate: Option<i64>,
}

/// A vehicle joined with the names its make/model/image ids resolve to.
#[derive(Debug, Clone)]
pub struct VehicleView {
    pub vehicle: Vehicle,
    pub make_name: String,
    pub model_name: String,
}

#[derive(Clone)]
pub struct FleetService {
    store: Arc<FleetStore>,
    images: Arc<ImageStore>,
}

impl FleetService {
    pub fn new(store: Arc<FleetStore>, images: Arc<ImageStore>) -> Self {
        Self { store, images }
    }

    /// Register a new vehicle. Reuses live make/model records by name,
    /// creating them when absent.
    pub async fn add_vehicle(&self, input: NewVehicle) -> DomainResult<Vehicle> {
        let fuel_type = FuelType::from_id(input.fuel_type_id).ok_or_else(|| {
            DomainError::not_found("FuelType", "id", input.fuel_type_id.to_string())
        })?;

        let mut t = self.store.write().await;
        let make_id = t.find_or_create_make(&input.make);
        let model_id = t.find_or_create_model(&input.model);
        let id = t.next_vehicle_id();
        let vehicle = Vehicle::new(
            id,
            make_id,
            model_id,
            input.year,
            input.mileage,
            fuel_type,
            input.horsepower,
            input.capacity,
            input.daily_rate,
        );
        t.insert_vehicle(vehicle.clone());

        info!(vehicle_id = id, make = %input.make, model = %input.model, "Vehicle registered");
        Ok(vehicle)
    }

    /// Apply a partial edit. Switching make or model re-points the vehicle
    /// at the record for the new name and deletes the old record if this
    /// vehicle was its last reference.
    pub async fn edit_vehicle(&self, id: i64, changes: VehicleChanges) -> DomainResult<Vehicle> {
        // Resolve the fuel type outside the lock; it needs no table state.
        let fuel_type = match changes.fuel_type_id {
            Some(fid) => Some(
                FuelType::from_id(fid)
                    .ok_or_else(|| DomainError::not_found("FuelType", "id", fid.to_string()))?,
            ),
            None => None,
        };

        let mut t = self.store.write().await;
        let current = t
            .vehicle(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", id.to_string()))?;

        let new_make_id = match &changes.make {
            Some(name) => Some(t.find_or_create_make(name)),
            None => None,
        };
        let new_model_id = match &changes.model {
            Some(name) => Some(t.find_or_create_model(name)),
            None => None,
        };

        if let Some(v) = t.vehicle_mut(id) {
            if let Some(make_id) = new_make_id {
                v.make_id = make_id;
            }
            if let Some(model_id) = new_model_id {
                v.model_id = model_id;
            }
            if let Some(year) = changes.year {
                v.year = year;
            }
            if let Some(mileage) = changes.mileage {
                v.mileage = mileage;
            }
            if let Some(ft) = fuel_type {
                v.fuel_type = ft;
            }
            if let Some(hp) = changes.horsepower {
                v.horsepower = hp;
            }
            if let Some(capacity) = changes.capacity {
                v.capacity = capacity;
            }
            if let Some(rate) = changes.daily_rate {
                v.daily_rate = rate;
            }
        }

        // Orphan cleanup, same critical section as the re-point.
        if let Some(make_id) = new_make_id {
            if make_id != current.make_id && t.count_vehicles_by_make(current.make_id) == 0 {
                t.remove_make(current.make_id);
                info!(make_id = current.make_id, "Removed orphaned make");
            }
        }
        if let Some(model_id) = new_model_id {
            if model_id != current.model_id && t.count_vehicles_by_model(current.model_id) == 0 {
                t.remove_model(current.model_id);
                info!(model_id = current.model_id, "Removed orphaned model");
            }
        }

        let updated = t
            .vehicle(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", id.to_string()))?;
        info!(vehicle_id = id, "Vehicle updated");
        Ok(updated)
    }

    /// Replace the vehicle's photo. The previous image is deleted unless it
    /// is the shared default. Returns the new image id.
    pub async fn change_image(&self, id: i64, bytes: Vec<u8>) -> DomainResult<i64> {
        let mut t = self.store.write().await;
        let old_image_id = t
            .vehicle(id)
            .map(|v| v.image_id)
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", id.to_string()))?;

        let new_image_id = self.images.store(bytes);
        if let Some(v) = t.vehicle_mut(id) {
            v.image_id = new_image_id;
        }
        if old_image_id != DEFAULT_IMAGE_ID {
            self.images.delete(old_image_id);
        }

        info!(vehicle_id = id, image_id = new_image_id, "Vehicle image replaced");
        Ok(new_image_id)
    }

    pub async fn vehicle_image(&self, id: i64) -> DomainResult<Vec<u8>> {
        let t = self.store.read().await;
        let image_id = t
            .vehicle(id)
            .map(|v| v.image_id)
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", id.to_string()))?;
        self.images
            .get(image_id)
            .ok_or_else(|| DomainError::not_found("Image", "id", image_id.to_string()))
    }

    /// Flip the availability flag. Refused while the vehicle has an
    /// accepted rental whose date range covers `today`.
    pub async fn toggle_availability(&self, id: i64, today: NaiveDate) -> DomainResult<bool> {
        let mut t = self.store.write().await;
        if !t.vehicle_exists(id) {
            return Err(DomainError::not_found("Vehicle", "id", id.to_string()));
        }
        if t.vehicle_has_accepted_rental_on(id, today) {
            return Err(DomainError::ActiveRentalConflict(id));
        }

        let available = match t.vehicle_mut(id) {
            Some(v) => {
                v.available = !v.available;
                v.available
            }
            None => return Err(DomainError::not_found("Vehicle", "id", id.to_string())),
        };

        info!(vehicle_id = id, available, "Vehicle availability toggled");
        Ok(available)
    }

    /// Remove a vehicle and everything only it references: its image
    /// (unless default), and its make/model when it held the last
    /// reference. Refused while any rental still points at the vehicle.
    pub async fn delete_vehicle(&self, id: i64) -> DomainResult<()> {
        let mut t = self.store.write().await;
        let vehicle = t
            .vehicle(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", id.to_string()))?;
        if t.any_rental_for_vehicle(id) {
            return Err(DomainError::RentalConflict(id));
        }

        t.remove_vehicle(id);
        if t.count_vehicles_by_make(vehicle.make_id) == 0 {
            t.remove_make(vehicle.make_id);
        }
        if t.count_vehicles_by_model(vehicle.model_id) == 0 {
            t.remove_model(vehicle.model_id);
        }
        if !vehicle.has_default_image() {
            self.images.delete(vehicle.image_id);
        }

        info!(vehicle_id = id, "Vehicle deleted");
        Ok(())
    }

    pub async fn get_vehicle(&self, id: i64) -> DomainResult<VehicleView> {
        let t = self.store.read().await;
        let vehicle = t
            .vehicle(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", id.to_string()))?;
        Ok(Self::view(&t, vehicle))
    }

    pub async fn list_vehicles(&self) -> Vec<VehicleView> {
        let t = self.store.read().await;
        let mut views: Vec<_> = t
            .vehicles()
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|v| Self::view(&t, v))
            .collect();
        views.sort_by_key(|v| v.vehicle.id);
        views
    }

    pub async fn list_available(&self) -> Vec<VehicleView> {
        let t = self.store.read().await;
        let mut views: Vec<_> = t
            .vehicles()
            .filter(|v| v.available)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|v| Self::view(&t, v))
            .collect();
        views.sort_by_key(|v| v.vehicle.id);
        views
    }

    fn view(t: &Tables, vehicle: Vehicle) -> VehicleView {
        let make_name = t
            .make(vehicle.make_id)
            .map(|m| m.name.clone())
            .unwrap_or_default();
        let model_name = t
            .model(vehicle.model_id)
            .map(|m| m.name.clone())
            .unwrap_or_default();
        VehicleView {
            vehicle,
            make_name,
            model_name,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::{Rental, RentalStatus, User, UserRole};

    fn service() -> FleetService {
        FleetService::new(Arc::new(FleetStore::new()), Arc::new(ImageStore::new()))
    }

    fn new_vehicle(make: &str, model: &str) -> NewVehicle {
        NewVehicle {
            make: make.to_string(),
            model: model.to_string(),
            year: 2020,
            mileage: 30000,
            fuel_type_id: 2,
            horsepower: 150,
            capacity: "2.0 TDI".to_string(),
            daily_rate: 250,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_rental(
        svc: &FleetService,
        vehicle_id: i64,
        status: RentalStatus,
        start: NaiveDate,
        end: NaiveDate,
    ) -> i64 {
        let mut t = svc.store.write().await;
        let renter = User::new("renter", "renter@example.com", "hash", UserRole::Renter);
        let renter_id = renter.id;
        t.insert_user(renter);
        let id = t.next_rental_id();
        let entry = t.next_history_id();
        let mut rental = Rental::new(id, vehicle_id, renter_id, start, end, Utc::now(), 750, entry);
        if status != RentalStatus::Pending {
            let entry = t.next_history_id();
            rental.record_status(entry, status, Utc::now());
        }
        t.insert_rental(rental);
        id
    }

    #[tokio::test]
    async fn add_vehicle_reuses_make_and_model_by_name() {
        let svc = service();
        let a = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        let b = svc.add_vehicle(new_vehicle("Skoda", "Fabia")).await.unwrap();

        assert_eq!(a.make_id, b.make_id);
        assert_ne!(a.model_id, b.model_id);
        let t = svc.store.read().await;
        assert_eq!(t.make_count(), 1);
        assert_eq!(t.model_count(), 2);
    }

    #[tokio::test]
    async fn add_vehicle_rejects_unknown_fuel_type() {
        let svc = service();
        let mut input = new_vehicle("Skoda", "Octavia");
        input.fuel_type_id = 42;

        let err = svc.add_vehicle(input).await.unwrap_err();
        assert_eq!(err, DomainError::not_found("FuelType", "id", "42"));
        // Nothing was created.
        let t = svc.store.read().await;
        assert_eq!(t.make_count(), 0);
        assert_eq!(t.model_count(), 0);
    }

    #[tokio::test]
    async fn edit_switching_make_removes_orphan() {
        let svc = service();
        let v = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();

        let updated = svc
            .edit_vehicle(
                v.id,
                VehicleChanges {
                    make: Some("Toyota".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.make_id, v.make_id);
        let t = svc.store.read().await;
        assert!(t.make(v.make_id).is_none());
        assert!(t.find_make_by_name("Toyota").is_some());
        assert_eq!(t.make_count(), 1);
    }

    #[tokio::test]
    async fn edit_switching_make_keeps_shared_record() {
        let svc = service();
        let a = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        let _b = svc.add_vehicle(new_vehicle("Skoda", "Fabia")).await.unwrap();

        svc.edit_vehicle(
            a.id,
            VehicleChanges {
                make: Some("Toyota".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let t = svc.store.read().await;
        // Still referenced by the second vehicle.
        assert!(t.make(a.make_id).is_some());
        assert_eq!(t.make_count(), 2);
    }

    #[tokio::test]
    async fn edit_to_same_make_name_is_a_noop_on_the_record() {
        let svc = service();
        let v = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();

        let updated = svc
            .edit_vehicle(
                v.id,
                VehicleChanges {
                    make: Some("Skoda".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.make_id, v.make_id);
        let t = svc.store.read().await;
        assert_eq!(t.make_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_edits_off_a_shared_model_remove_it_once() {
        let svc = service();
        let a = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        let b = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        assert_eq!(a.model_id, b.model_id);

        let s1 = svc.clone();
        let s2 = svc.clone();
        let h1 = tokio::spawn(async move {
            s1.edit_vehicle(
                a.id,
                VehicleChanges {
                    model: Some("Fabia".to_string()),
                    ..Default::default()
                },
            )
            .await
        });
        let h2 = tokio::spawn(async move {
            s2.edit_vehicle(
                b.id,
                VehicleChanges {
                    model: Some("Superb".to_string()),
                    ..Default::default()
                },
            )
            .await
        });
        h1.await.unwrap().unwrap();
        h2.await.unwrap().unwrap();

        let t = svc.store.read().await;
        assert!(t.find_model_by_name("Octavia").is_none());
        assert!(t.find_model_by_name("Fabia").is_some());
        assert!(t.find_model_by_name("Superb").is_some());
        assert_eq!(t.model_count(), 2);
    }

    #[tokio::test]
    async fn change_image_deletes_old_but_never_default() {
        let svc = service();
        let v = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();

        let first = svc.change_image(v.id, vec![1, 2, 3]).await.unwrap();
        assert!(svc.images.contains(DEFAULT_IMAGE_ID));
        assert!(svc.images.contains(first));

        let second = svc.change_image(v.id, vec![4, 5, 6]).await.unwrap();
        assert!(!svc.images.contains(first));
        assert!(svc.images.contains(second));
        assert_eq!(svc.vehicle_image(v.id).await.unwrap(), vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn toggle_blocked_by_accepted_rental_covering_today() {
        let svc = service();
        let v = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        let today = date(2024, 5, 2);
        seed_rental(&svc, v.id, RentalStatus::Accepted, date(2024, 5, 1), date(2024, 5, 3)).await;

        let err = svc.toggle_availability(v.id, today).await.unwrap_err();
        assert_eq!(err, DomainError::ActiveRentalConflict(v.id));
        // Flag unchanged.
        assert!(svc.get_vehicle(v.id).await.unwrap().vehicle.available);
    }

    #[tokio::test]
    async fn toggle_ignores_other_vehicles_and_other_statuses() {
        let svc = service();
        let v = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        let other = svc.add_vehicle(new_vehicle("Toyota", "Yaris")).await.unwrap();
        let today = date(2024, 5, 2);
        // Accepted rental on a different vehicle, pending rental on this one.
        seed_rental(&svc, other.id, RentalStatus::Accepted, date(2024, 5, 1), date(2024, 5, 3)).await;
        seed_rental(&svc, v.id, RentalStatus::Pending, date(2024, 5, 1), date(2024, 5, 3)).await;

        let available = svc.toggle_availability(v.id, today).await.unwrap();
        assert!(!available);
        let available = svc.toggle_availability(v.id, today).await.unwrap();
        assert!(available);
    }

    #[tokio::test]
    async fn delete_vehicle_refused_while_rentals_reference_it() {
        let svc = service();
        let v = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        seed_rental(&svc, v.id, RentalStatus::Completed, date(2024, 1, 1), date(2024, 1, 2)).await;

        let err = svc.delete_vehicle(v.id).await.unwrap_err();
        assert_eq!(err, DomainError::RentalConflict(v.id));
        assert!(svc.get_vehicle(v.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_vehicle_cascades_orphans_and_image() {
        let svc = service();
        let v = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        let image_id = svc.change_image(v.id, vec![7, 8]).await.unwrap();

        svc.delete_vehicle(v.id).await.unwrap();

        let t = svc.store.read().await;
        assert!(t.vehicle(v.id).is_none());
        assert_eq!(t.make_count(), 0);
        assert_eq!(t.model_count(), 0);
        assert!(!svc.images.contains(image_id));
        assert!(svc.images.contains(DEFAULT_IMAGE_ID));
    }

    #[tokio::test]
    async fn delete_vehicle_keeps_shared_make_and_default_image() {
        let svc = service();
        let a = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        let _b = svc.add_vehicle(new_vehicle("Skoda", "Fabia")).await.unwrap();

        svc.delete_vehicle(a.id).await.unwrap();

        let t = svc.store.read().await;
        assert!(t.find_make_by_name("Skoda").is_some());
        assert!(t.find_model_by_name("Octavia").is_none());
        assert!(svc.images.contains(DEFAULT_IMAGE_ID));
    }

    #[tokio::test]
    async fn available_listing_filters_unavailable() {
        let svc = service();
        let a = svc.add_vehicle(new_vehicle("Skoda", "Octavia")).await.unwrap();
        let _b = svc.add_vehicle(new_vehicle("Toyota", "Yaris")).await.unwrap();
        svc.toggle_availability(a.id, date(2024, 1, 1)).await.unwrap();

        assert_eq!(svc.list_vehicles().await.len(), 2);
        let available = svc.list_available().await;
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].make_name, "Toyota");
        assert_eq!(available[0].model_name, "Yaris");
    }
}
