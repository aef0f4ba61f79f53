// foodshare-core/src/domain/entity/mod.rs

pub mod fields;

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::domain::report::Cell;
use crate::domain::schema::TableName;

// --- ENUMS (value domains mirrored by CHECK constraints) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodType {
    Vegetarian,
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
    Vegan,
}

impl FoodType {
    pub const ALL: [FoodType; 3] = [FoodType::Vegetarian, FoodType::NonVegetarian, FoodType::Vegan];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Vegetarian => "Vegetarian",
            FoodType::NonVegetarian => "Non-Vegetarian",
            FoodType::Vegan => "Vegan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snacks => "Snacks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Pending,
    Completed,
    Cancelled,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 3] = [
        ClaimStatus::Pending,
        ClaimStatus::Completed,
        ClaimStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Completed => "Completed",
            ClaimStatus::Cancelled => "Cancelled",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(FoodType, MealType, ClaimStatus);

// --- RECORD CONTRACT ---

/// A row type that can be read from its CSV source and written to its table.
pub trait TableRecord: DeserializeOwned + Validate {
    const TABLE: TableName;

    fn primary_key(&self) -> i32;

    /// Values in the order of `TableName::insert_columns`.
    fn to_row(&self) -> Vec<Cell>;
}

// --- ENTITIES ---

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Provider {
    pub provider_id: i32,
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type cannot be empty"))]
    pub provider_type: String,
    pub address: String,
    #[validate(length(min = 1, message = "city cannot be empty"))]
    pub city: String,
    #[serde(default, deserialize_with = "fields::empty_if_missing")]
    pub contact: String,
}

impl TableRecord for Provider {
    const TABLE: TableName = TableName::Providers;

    fn primary_key(&self) -> i32 {
        self.provider_id
    }

    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.provider_id),
            Cell::from(self.name.as_str()),
            Cell::from(self.provider_type.as_str()),
            Cell::from(self.address.as_str()),
            Cell::from(self.city.as_str()),
            Cell::from(self.contact.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Receiver {
    pub receiver_id: i32,
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type cannot be empty"))]
    pub receiver_type: String,
    #[validate(length(min = 1, message = "city cannot be empty"))]
    pub city: String,
    #[serde(default, deserialize_with = "fields::empty_if_missing")]
    pub contact: String,
}

impl TableRecord for Receiver {
    const TABLE: TableName = TableName::Receivers;

    fn primary_key(&self) -> i32 {
        self.receiver_id
    }

    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.receiver_id),
            Cell::from(self.name.as_str()),
            Cell::from(self.receiver_type.as_str()),
            Cell::from(self.city.as_str()),
            Cell::from(self.contact.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct FoodListing {
    pub food_id: i32,
    #[validate(length(min = 1, message = "food_name cannot be empty"))]
    pub food_name: String,
    #[validate(range(min = 1, message = "quantity must be positive"))]
    pub quantity: i32,
    #[serde(deserialize_with = "fields::date")]
    pub expiry_date: NaiveDate,
    pub provider_id: i32,
    pub provider_type: String,
    pub location: String,
    pub food_type: FoodType,
    pub meal_type: MealType,
    #[serde(
        default = "fields::available_by_default",
        deserialize_with = "fields::flag"
    )]
    pub is_available: bool,
}

impl TableRecord for FoodListing {
    const TABLE: TableName = TableName::FoodListings;

    fn primary_key(&self) -> i32 {
        self.food_id
    }

    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.food_id),
            Cell::from(self.food_name.as_str()),
            Cell::from(self.quantity),
            Cell::Date(self.expiry_date),
            Cell::from(self.provider_id),
            Cell::from(self.provider_type.as_str()),
            Cell::from(self.location.as_str()),
            Cell::from(self.food_type.as_str()),
            Cell::from(self.meal_type.as_str()),
            Cell::Bool(self.is_available),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Claim {
    pub claim_id: i32,
    pub food_id: i32,
    pub receiver_id: i32,
    pub status: ClaimStatus,
    #[serde(deserialize_with = "fields::timestamp")]
    pub timestamp: NaiveDateTime,
}

impl TableRecord for Claim {
    const TABLE: TableName = TableName::Claims;

    fn primary_key(&self) -> i32 {
        self.claim_id
    }

    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.claim_id),
            Cell::from(self.food_id),
            Cell::from(self.receiver_id),
            Cell::from(self.status.as_str()),
            Cell::Timestamp(self.timestamp),
        ]
    }
}
