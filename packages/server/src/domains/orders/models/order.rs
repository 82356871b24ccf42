use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::common::{OrderId, ServiceId};

/// A client request for one of the catalogue services.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub telegram_username: String,
    pub service_id: ServiceId,
    pub details: String,
    pub budget: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where an order is in the admin workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    InProgress,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "new" => Ok(OrderStatus::New),
            "in_progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            other => bail!("Invalid order status: {}", other),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order form payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub telegram_username: String,
    pub service_id: ServiceId,
    pub details: String,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl CreateOrder {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("clientName", &self.client_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("telegramUsername", &self.telegram_username),
            ("details", &self.details),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl Order {
    pub async fn create(input: &CreateOrder, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO orders (
                id, client_name, email, phone, telegram_username,
                service_id, details, budget, deadline
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(OrderId::new())
        .bind(input.client_name.trim())
        .bind(input.email.trim())
        .bind(input.phone.trim())
        .bind(input.telegram_username.trim().trim_start_matches('@'))
        .bind(input.service_id)
        .bind(&input.details)
        .bind(&input.budget)
        .bind(input.deadline)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: OrderId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Admin edit. Absent values keep what is stored.
    pub async fn update_admin(
        id: OrderId,
        status: Option<OrderStatus>,
        admin_notes: Option<&str>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE orders SET
                status = COALESCE($2, status),
                admin_notes = COALESCE($3, admin_notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.map(|s| s.as_str()))
        .bind(admin_notes)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_payload_with_optional_fields() {
        let json = r#"{
            "clientName": "Aziz",
            "email": "aziz@example.uz",
            "phone": "+998901234567",
            "telegramUsername": "@aziz",
            "serviceId": "0190a000-0000-7000-8000-000000000002",
            "details": "Bot kerak"
        }"#;
        let input: CreateOrder = serde_json::from_str(json).unwrap();
        assert!(input.budget.is_none());
        assert!(input.deadline.is_none());
        assert!(input.missing_fields().is_empty());
    }

    #[test]
    fn blank_fields_are_reported() {
        let input = CreateOrder {
            client_name: " ".to_string(),
            email: "a@b.uz".to_string(),
            phone: String::new(),
            telegram_username: "x".to_string(),
            service_id: ServiceId::new(),
            details: "d".to_string(),
            budget: None,
            deadline: None,
        };
        assert_eq!(input.missing_fields(), vec!["clientName", "phone"]);
    }

    #[test]
    fn status_parses_workflow_values_only() {
        assert_eq!("in_progress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!(OrderStatus::Completed.to_string(), "completed");
        assert!("cancelled".parse::<OrderStatus>().is_err());
        assert!("In Progress".parse::<OrderStatus>().is_err());
    }
}
