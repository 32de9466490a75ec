use anyhow::Context;
use payu_gateway::gateways::PayuClient;
use payu_gateway::PayuConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Connectivity check against the configured PayU environment
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payu_gateway=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = PayuConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        pos_id = config.pos_id,
        "Checking PayU connectivity"
    );

    let client = PayuClient::from_config(&config).context("Failed to build PayU client")?;

    let methods = client
        .get_payment_methods(None)
        .await
        .context("Failed to fetch payment methods")?;

    tracing::info!(
        pay_by_links = methods.pay_by_links.len(),
        enabled = methods.enabled_pay_by_links().count(),
        card_tokens = methods.card_tokens.len(),
        "Payment methods available"
    );

    if let Ok(order_id) = std::env::var("PAYU_CHECK_ORDER_ID") {
        let info = client
            .get_order_info(&order_id)
            .await
            .with_context(|| format!("Failed to fetch order {}", order_id))?;

        match info.first_order() {
            Some(order) => tracing::info!(
                order_id = %order.order_id,
                status = %order.status,
                amount = %order.total_amount,
                currency = %order.currency_code,
                "Order found"
            ),
            None => tracing::warn!(order_id = %order_id, "PayU returned no order"),
        }
    }

    Ok(())
}
