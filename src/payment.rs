use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::GatewayConfig,
    error::{AppError, AppResult},
};

/// A hosted checkout session created at the payment provider. The
/// `reference` correlates webhook callbacks with our `payments` row.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub reference: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
struct CreateSessionBody<'a> {
    order_id: Uuid,
    amount: i64,
    return_url: &'a str,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout(
        &self,
        order_id: Uuid,
        amount: i64,
        return_url: &str,
    ) -> AppResult<CheckoutSession>;
}

/// Client for the provider's hosted checkout API.
pub struct HostedCheckoutGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HostedCheckoutGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HostedCheckoutGateway {
    async fn create_checkout(
        &self,
        order_id: Uuid,
        amount: i64,
        return_url: &str,
    ) -> AppResult<CheckoutSession> {
        let response = self
            .client
            .post(format!("{}/checkout_sessions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CreateSessionBody {
                order_id,
                amount,
                return_url,
            })
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        let session = response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        Ok(session)
    }
}

/// Stands in when no gateway is configured. Issues local references so the
/// rest of the payment flow (webhook included) can be exercised end to end.
pub struct OfflineGateway {
    pub base_url: String,
}

#[async_trait]
impl PaymentGateway for OfflineGateway {
    async fn create_checkout(
        &self,
        order_id: Uuid,
        _amount: i64,
        _return_url: &str,
    ) -> AppResult<CheckoutSession> {
        let reference = format!("local-{}", Uuid::new_v4().simple());
        let url = format!("{}/pay/{}?order={}", self.base_url, reference, order_id);
        Ok(CheckoutSession { reference, url })
    }
}
