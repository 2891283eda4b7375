//! Vehicle domain entities

/// Image id of the permanent default photo assigned to new vehicles.
/// Protected from deletion on every path that removes images.
pub const DEFAULT_IMAGE_ID: i64 = 1;

/// Fuel type vocabulary, addressed by id over the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
    Lpg,
}

impl FuelType {
    pub fn id(&self) -> i64 {
        match self {
            Self::Gasoline => 1,
            Self::Diesel => 2,
            Self::Hybrid => 3,
            Self::Electric => 4,
            Self::Lpg => 5,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Gasoline),
            2 => Some(Self::Diesel),
            3 => Some(Self::Hybrid),
            4 => Some(Self::Electric),
            5 => Some(Self::Lpg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gasoline => "Gasoline",
            Self::Diesel => "Diesel",
            Self::Hybrid => "Hybrid",
            Self::Electric => "Electric",
            Self::Lpg => "LPG",
        }
    }

    pub fn all() -> [FuelType; 5] {
        [
            Self::Gasoline,
            Self::Diesel,
            Self::Hybrid,
            Self::Electric,
            Self::Lpg,
        ]
    }
}

/// Vehicle make, deduplicated by name (at most one live record per name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Make {
    pub id: i64,
    pub name: String,
}

/// Vehicle model, deduplicated by name (at most one live record per name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleModel {
    pub id: i64,
    pub name: String,
}

/// A fleet vehicle available for rental
///
/// Make, model and image are shared-by-reference: multiple vehicles may
/// point at the same record. A vehicle always has exactly one of each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub id: i64,
    pub make_id: i64,
    pub model_id: i64,
    pub year: i32,
    pub mileage: i32,
    pub fuel_type: FuelType,
    pub horsepower: i32,
    /// Engine descriptor, e.g. "1.9 TDI"
    pub capacity: String,
    /// Rental rate per day in the smallest currency unit
    pub daily_rate: i64,
    pub available: bool,
    pub image_id: i64,
}

impl Vehicle {
    /// New vehicles start available and carry the default image.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        make_id: i64,
        model_id: i64,
        year: i32,
        mileage: i32,
        fuel_type: FuelType,
        horsepower: i32,
        capacity: impl Into<String>,
        daily_rate: i64,
    ) -> Self {
        Self {
            id,
            make_id,
            model_id,
            year,
            mileage,
            fuel_type,
            horsepower,
            capacity: capacity.into(),
            daily_rate,
            available: true,
            image_id: DEFAULT_IMAGE_ID,
        }
    }

    pub fn has_default_image(&self) -> bool {
        self.image_id == DEFAULT_IMAGE_ID
    }
}

// ── Tests ──────────────────────────────────────────────────────
