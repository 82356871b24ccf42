//! Order intake: validate, store, record the client, tell the admin channel.

use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::domains::clients::Client;
use crate::domains::orders::{CreateOrder, Order};
use crate::domains::services::Service;
use crate::kernel::ServerDeps;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("missing required fields: {0}")]
    Invalid(String),

    #[error("service not found")]
    UnknownService,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub async fn submit_order(
    input: CreateOrder,
    pool: &PgPool,
    deps: &ServerDeps,
) -> Result<Order, OrderError> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(OrderError::Invalid(missing.join(", ")));
    }

    let service = Service::find_active_by_id(input.service_id, pool)
        .await?
        .ok_or(OrderError::UnknownService)?;

    let order = Order::create(&input, pool).await?;
    info!(order_id = %order.id, service = %service.title, "Order received");

    // The order is stored by now, so a client record failure is only logged.
    if let Err(e) = Client::record_order(&order, pool).await {
        warn!(order_id = %order.id, error = %e, "Client record update failed");
    }

    notify_admin(deps, &order, &service.title).await;
    Ok(order)
}

/// Best effort: a missing channel or failed send is only logged.
async fn notify_admin(deps: &ServerDeps, order: &Order, service_title: &str) {
    let Some(channel) = deps.publishing.admin_channel_id.as_deref() else {
        warn!(order_id = %order.id, "Admin channel not configured, order notification skipped");
        return;
    };

    let message = admin_message(order, service_title);
    if let Err(e) = deps.notifier.send(channel, &message, None).await {
        warn!(order_id = %order.id, error = %e, "Order notification failed");
    }
}

pub fn admin_message(order: &Order, service_title: &str) -> String {
    let username = escape_html(&order.telegram_username);
    format!(
        "🔔 <b>Yangi buyurtma!</b>\n\n👤 Mijoz: {client}\n📱 Telegram: @{username}\n🛍 Xizmat: {service}\n📝 Tafsil: {details}\n📧 Buyurtma ID: <code>{id}</code>\n\n<i>Mijoz bilan @{username} orqali bog'laning</i>",
        client = escape_html(&order.client_name),
        service = escape_html(service_title),
        details = escape_html(&order.details),
        id = order.id,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{OrderId, ServiceId};
    use chrono::Utc;

    #[test]
    fn admin_message_lists_client_and_service() {
        let order = Order {
            id: OrderId::new(),
            client_name: "Aziz <Admin>".to_string(),
            email: "aziz@example.uz".to_string(),
            phone: "+998901234567".to_string(),
            telegram_username: "aziz".to_string(),
            service_id: ServiceId::new(),
            details: "Bot kerak".to_string(),
            budget: None,
            deadline: None,
            status: "new".to_string(),
            admin_notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let message = admin_message(&order, "Telegram botlar");
        assert!(message.contains("Mijoz: Aziz &lt;Admin&gt;"));
        assert!(message.contains("Telegram: @aziz"));
        assert!(message.contains("Xizmat: Telegram botlar"));
        assert!(message.contains(&format!("<code>{}</code>", order.id)));
    }
}
