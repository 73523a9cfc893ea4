//! Vehicle model for invoice-service.

use serde::{Deserialize, Serialize};

/// Vehicle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    Car,
    Bike,
    Scooter,
    Truck,
    Van,
}

impl VehicleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "car",
            VehicleCategory::Bike => "bike",
            VehicleCategory::Scooter => "scooter",
            VehicleCategory::Truck => "truck",
            VehicleCategory::Van => "van",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "Car",
            VehicleCategory::Bike => "Bike",
            VehicleCategory::Scooter => "Scooter",
            VehicleCategory::Truck => "Truck",
            VehicleCategory::Van => "Van",
        }
    }

    /// Case-insensitive parse; unknown categories yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Some(VehicleCategory::Car),
            "bike" | "motorcycle" => Some(VehicleCategory::Bike),
            "scooter" => Some(VehicleCategory::Scooter),
            "truck" => Some(VehicleCategory::Truck),
            "van" => Some(VehicleCategory::Van),
            _ => None,
        }
    }
}

/// Vehicle serviced on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: Option<String>,
    pub registration: String,
    pub category: Option<VehicleCategory>,
}

impl Vehicle {
    /// "Make Model", or just the make when no model was recorded.
    pub fn display_name(&self) -> String {
        match &self.model {
            Some(model) => format!("{} {}", self.make, model),
            None => self.make.clone(),
        }
    }
}
