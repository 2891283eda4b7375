//! Rental DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Rental, RentalStatus, StatusHistoryEntry};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRentalRequest {
    pub vehicle_id: i64,
    /// Renter to book for. Admins may book on behalf of any user;
    /// everyone else books for themselves.
    pub user_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EditRentalDatesRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeStatusRequest {
    pub status_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RentalDto {
    pub id: i64,
    pub vehicle_id: i64,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub price: i64,
    pub status_id: i64,
    pub status: String,
}

impl From<&Rental> for RentalDto {
    fn from(r: &Rental) -> Self {
        Self {
            id: r.id,
            vehicle_id: r.vehicle_id,
            user_id: r.renter_id,
            start_date: r.start_date,
            end_date: r.end_date,
            created_at: r.created_at,
            price: r.price,
            status_id: r.status.id(),
            status: r.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryDto {
    pub id: i64,
    pub status_id: i64,
    pub status: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<&StatusHistoryEntry> for StatusHistoryDto {
    fn from(e: &StatusHistoryEntry) -> Self {
        Self {
            id: e.id,
            status_id: e.status.id(),
            status: e.status.as_str().to_string(),
            recorded_at: e.recorded_at,
        }
    }
}

/// Rental status reference entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RentalStatusDto {
    pub id: i64,
    pub name: String,
}

impl From<RentalStatus> for RentalStatusDto {
    fn from(s: RentalStatus) -> Self {
        Self {
            id: s.id(),
            name: s.as_str().to_string(),
        }
    }
}
