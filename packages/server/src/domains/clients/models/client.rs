use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::common::ClientId;
use crate::domains::orders::Order;

/// A person who has ordered at least once, keyed by Telegram username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub phone: String,
    pub telegram_username: String,
    pub email: Option<String>,
    pub total_orders: i32,
    pub total_spent: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create the client on their first order, otherwise bump the order count.
    ///
    /// Contact details are taken from the first order and kept; an email is
    /// filled in later only if none was stored.
    pub async fn record_order(order: &Order, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO clients (id, name, phone, telegram_username, email, total_orders)
            VALUES ($1, $2, $3, $4, $5, 1)
            ON CONFLICT (telegram_username) DO UPDATE SET
                total_orders = clients.total_orders + 1,
                email = COALESCE(clients.email, EXCLUDED.email),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(ClientId::new())
        .bind(&order.client_name)
        .bind(&order.phone)
        .bind(&order.telegram_username)
        .bind(Some(order.email.as_str()).filter(|e| !e.is_empty()))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Most recently active first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM clients ORDER BY updated_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_telegram_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM clients WHERE telegram_username = $1")
            .bind(username.trim_start_matches('@'))
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Replace the admin notes; `None` clears them.
    pub async fn update_notes(
        id: ClientId,
        notes: Option<&str>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE clients SET notes = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(notes)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
