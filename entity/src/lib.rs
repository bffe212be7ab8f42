//! Entity models for the retail admin schema.
//!
//! Five tables (`stores`, `users`, `products`, `orders`, `order_items`) plus
//! the two Postgres enums they share. Models serialize straight to the JSON
//! wire shape (camelCase keys), so route handlers can return rows as-is.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub mod order_items;
pub mod orders;
pub mod products;
pub mod stores;
pub mod users;

/// Lifecycle status shared by stores, products, and orders.
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "status")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "archived")]
    Archived,
}

#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "store_manager")]
    StoreManager,
    #[sea_orm(string_value = "store_staff")]
    StoreStaff,
}
