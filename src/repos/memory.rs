//! In-process Store for development runs without `DATABASE_URL`, and for tests.
//! Data is lost on restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::error::{StoreError, StoreResult};
use crate::repos::store::{InventoryRow, NewInventory, NewUser, Store, UserRow};
use crate::services::auth::UserId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRow>,
    inventory: Vec<InventoryRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<UserRow> {
        let mut tables = self.inner.write().await;
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let row = UserRow {
            id: tables.users.len() as UserId + 1,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_inventory(
        &self,
        new_inventory: NewInventory,
        owner: UserId,
    ) -> StoreResult<InventoryRow> {
        let mut tables = self.inner.write().await;
        let row = InventoryRow {
            id: tables.inventory.len() as i64 + 1,
            user_id: owner,
            item_name: new_inventory.item_name,
            quantity: new_inventory.quantity,
            category: new_inventory.category,
            cost_per_item: new_inventory.cost_per_item,
        };
        tables.inventory.push(row.clone());
        Ok(row)
    }

    async fn list_inventory(&self, owner: UserId) -> StoreResult<Vec<InventoryRow>> {
        let tables = self.inner.read().await;
        Ok(tables
            .inventory
            .iter()
            .filter(|i| i.user_id == owner)
            .cloned()
            .collect())
    }
}
