// Spot price feed for the origin-network token.
//
// One GET against a CoinGecko-compatible `/simple/price` endpoint. The body
// is `{ "<asset_id>": { "<currency>": <number> } }`; anything else is a
// failed read. Prices are display-only, so f64 is fine here.

use crate::error::ReadError;
use async_trait::async_trait;
use dropwatch_core::config::PriceSource;
use tracing::debug;

#[async_trait]
pub trait PriceReader: Send + Sync {
    /// Current spot price of the configured asset in the configured currency.
    async fn spot_price(&self) -> Result<f64, ReadError>;
}

/// Pull `body[asset_id][currency]` out of a quote response.
pub fn extract_price(
    body: &serde_json::Value,
    asset_id: &str,
    currency: &str,
) -> Result<f64, ReadError> {
    let price = body
        .get(asset_id)
        .and_then(|quote| quote.get(currency))
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ReadError::MissingField(format!("{}.{}", asset_id, currency)))?;

    if !price.is_finite() || price < 0.0 {
        return Err(ReadError::InvalidPrice(price));
    }
    Ok(price)
}

pub struct QuotePriceReader {
    client: reqwest::Client,
    source: PriceSource,
}

impl QuotePriceReader {
    pub fn new(client: reqwest::Client, source: PriceSource) -> Self {
        Self { client, source }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/simple/price", self.source.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PriceReader for QuotePriceReader {
    async fn spot_price(&self) -> Result<f64, ReadError> {
        let url = self.endpoint();
        debug!(url = %url, asset = %self.source.asset_id, "fetching spot price");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", self.source.asset_id.as_str()),
                ("vs_currencies", self.source.currency.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ReadError::Status(response.status().as_u16()));
        }

        let body: serde_json::Value = serde_json::from_str(&response.text().await?)?;
        extract_price(&body, &self.source.asset_id, &self.source.currency)
    }
}
