/*
 * Responsibility
 * - PostgreSQL-backed Store (sqlx)
 * - Schema bootstrap at startup (migrations/0001_init.sql, idempotent)
 */
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::repos::error::StoreResult;
use crate::repos::store::{InventoryRow, NewInventory, NewUser, Store, UserRow};
use crate::services::auth::UserId;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_inventory(
        &self,
        new_inventory: NewInventory,
        owner: UserId,
    ) -> StoreResult<InventoryRow> {
        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            INSERT INTO inventory (user_id, item_name, quantity, category, cost_per_item)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, item_name, quantity, category, cost_per_item
            "#,
        )
        .bind(owner)
        .bind(&new_inventory.item_name)
        .bind(new_inventory.quantity)
        .bind(&new_inventory.category)
        .bind(new_inventory.cost_per_item)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_inventory(&self, owner: UserId) -> StoreResult<Vec<InventoryRow>> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT id, user_id, item_name, quantity, category, cost_per_item
            FROM inventory
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
