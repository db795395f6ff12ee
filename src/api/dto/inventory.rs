use serde::{Deserialize, Serialize};

use crate::repos::store::{InventoryRow, InventoryView, NewInventory};
use crate::services::auth::UserId;

#[derive(Debug, Deserialize)]
pub struct CreateInventoryRequest {
    pub item_name: String,
    pub quantity: i32,
    #[serde(default)]
    pub category: String,
    pub cost_per_item: f64,
}

impl CreateInventoryRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.item_name.trim().is_empty() {
            return Err("item_name is required");
        }
        if self.quantity <= 0 {
            return Err("quantity must be positive");
        }
        if !self.cost_per_item.is_finite() || self.cost_per_item < 0.0 {
            return Err("cost_per_item must be a non-negative number");
        }
        Ok(())
    }

    pub fn into_new_inventory(self) -> NewInventory {
        NewInventory {
            item_name: self.item_name.trim().to_string(),
            quantity: self.quantity,
            category: self.category.trim().to_string(),
            cost_per_item: self.cost_per_item,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub id: i64,
    pub item_name: String,
    pub quantity: i32,
    pub category: String,
    pub cost_per_item: f64,
    pub user_id: UserId,
}

impl From<InventoryRow> for InventoryResponse {
    fn from(row: InventoryRow) -> Self {
        Self {
            id: row.id,
            item_name: row.item_name,
            quantity: row.quantity,
            category: row.category,
            cost_per_item: row.cost_per_item,
            user_id: row.user_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryListResponse {
    pub inv: Vec<InventoryResponse>,
    pub total_cost: f64,
}

impl From<InventoryView> for InventoryListResponse {
    fn from(view: InventoryView) -> Self {
        Self {
            inv: view.items.into_iter().map(Into::into).collect(),
            total_cost: view.total_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(item_name: &str, quantity: i32, cost_per_item: f64) -> CreateInventoryRequest {
        CreateInventoryRequest {
            item_name: item_name.into(),
            quantity,
            category: "shirts".into(),
            cost_per_item,
        }
    }

    #[test]
    fn validation_rules() {
        assert!(req("shirt", 1, 0.0).validate().is_ok());
        assert!(req("", 1, 1.0).validate().is_err());
        assert!(req("shirt", 0, 1.0).validate().is_err());
        assert!(req("shirt", 1, -1.0).validate().is_err());
        assert!(req("shirt", 1, f64::NAN).validate().is_err());
    }
}
