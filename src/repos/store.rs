/*
 * Responsibility
 * - Store capability used by handlers (users + inventory)
 * - Row types shared by every backend
 * - Credential check lives here once, backends only look users up
 */
use async_trait::async_trait;

use crate::repos::error::{StoreError, StoreResult};
use crate::services::auth::UserId;
use crate::services::{inventory, password};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewInventory {
    pub item_name: String,
    pub quantity: i32,
    pub category: String,
    pub cost_per_item: f64,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct InventoryRow {
    pub id: i64,
    pub user_id: UserId,
    pub item_name: String,
    pub quantity: i32,
    pub category: String,
    pub cost_per_item: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryView {
    pub items: Vec<InventoryRow>,
    pub total_cost: f64,
}

#[async_trait]
pub trait Store: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn create_user(&self, new_user: NewUser) -> StoreResult<UserRow>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>>;

    async fn create_inventory(
        &self,
        new_inventory: NewInventory,
        owner: UserId,
    ) -> StoreResult<InventoryRow>;

    async fn list_inventory(&self, owner: UserId) -> StoreResult<Vec<InventoryRow>>;

    /// Unknown email and wrong password both yield `InvalidCredentials`.
    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<UserRow> {
        let user = self
            .find_user_by_email(email)
            .await?
            .ok_or(StoreError::InvalidCredentials)?;

        if password::verify(password.to_owned(), user.password_hash.clone()).await? {
            Ok(user)
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }

    async fn view_inventory(&self, owner: UserId) -> StoreResult<InventoryView> {
        let items = self.list_inventory(owner).await?;
        let total_cost = inventory::total_cost(&items);
        Ok(InventoryView { items, total_cost })
    }
}
