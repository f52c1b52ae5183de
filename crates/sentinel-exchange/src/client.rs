//! Read-only exchange client.
//!
//! [`ExchangeClient`] is the seam the scheduler depends on; [`BinanceClient`]
//! implements it against the USDⓈ-M futures REST API using two signed
//! endpoints:
//! - `GET /fapi/v2/positionRisk` for the full position snapshot
//! - `GET /fapi/v1/openOrders?symbol=` for resting orders on one symbol

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, trace};

use sentinel_core::{PositionSnapshot, RestingOrder};

use crate::config::ExchangeConfig;
use crate::error::{SourceError, SourceResult};
use crate::signer::RequestSigner;
use crate::types::{decode_list, RawOpenOrder, RawPositionRisk};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const POSITION_RISK_PATH: &str = "/fapi/v2/positionRisk";
const OPEN_ORDERS_PATH: &str = "/fapi/v1/openOrders";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Read access to account positions and resting orders.
pub trait ExchangeClient: Send + Sync {
    /// Full position snapshot, including flat entries.
    fn positions(&self) -> BoxFuture<'_, SourceResult<Vec<PositionSnapshot>>>;

    /// Resting orders for one symbol, in the order the exchange returns them.
    fn open_orders<'a>(&'a self, symbol: &'a str)
        -> BoxFuture<'a, SourceResult<Vec<RestingOrder>>>;
}

/// Signed REST client for the futures API.
pub struct BinanceClient {
    client: Client,
    base_url: Url,
    recv_window_ms: u64,
    signer: RequestSigner,
}

impl BinanceClient {
    pub fn new(config: &ExchangeConfig, signer: RequestSigner) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Client(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SourceError::Client(format!("Invalid base_url {:?}: {e}", config.base_url)))?;

        Ok(Self {
            client,
            base_url,
            recv_window_ms: config.recv_window_ms,
            signer,
        })
    }

    /// Build the signed URL for `path` with `params`.
    ///
    /// The signature covers the encoded query exactly as sent.
    fn signed_url(&self, path: &str, params: &[(&str, &str)], timestamp_ms: i64) -> SourceResult<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| SourceError::Client(format!("Invalid path {path}: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query.extend_pairs(params.iter().copied());
            if self.recv_window_ms > 0 {
                query.append_pair("recvWindow", &self.recv_window_ms.to_string());
            }
            query.append_pair("timestamp", &timestamp_ms.to_string());
        }

        let signature = self.signer.sign(url.query().unwrap_or_default())?;
        url.query_pairs_mut().append_pair("signature", &signature);
        Ok(url)
    }

    async fn signed_get(&self, path: &str, params: &[(&str, &str)]) -> SourceResult<(u16, String)> {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let url = self.signed_url(path, params, timestamp_ms)?;
        trace!(path, "Sending signed request");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.signer.api_key())
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(format!("Failed to read response body: {e}")))?;

        debug!(path, status, bytes = body.len(), "Exchange response received");
        Ok((status, body))
    }

    /// Fetch and decode the position-risk list.
    pub async fn fetch_positions(&self) -> SourceResult<Vec<PositionSnapshot>> {
        let (status, body) = self.signed_get(POSITION_RISK_PATH, &[]).await?;
        decode_list::<RawPositionRisk>(status, &body)?
            .into_iter()
            .map(RawPositionRisk::into_snapshot)
            .collect()
    }

    /// Fetch and decode open orders for `symbol`.
    pub async fn fetch_open_orders(&self, symbol: &str) -> SourceResult<Vec<RestingOrder>> {
        let (status, body) = self
            .signed_get(OPEN_ORDERS_PATH, &[("symbol", symbol)])
            .await?;
        decode_list::<RawOpenOrder>(status, &body)?
            .into_iter()
            .map(RawOpenOrder::into_resting)
            .collect()
    }
}

impl ExchangeClient for BinanceClient {
    fn positions(&self) -> BoxFuture<'_, SourceResult<Vec<PositionSnapshot>>> {
        Box::pin(self.fetch_positions())
    }

    fn open_orders<'a>(
        &'a self,
        symbol: &'a str,
    ) -> BoxFuture<'a, SourceResult<Vec<RestingOrder>>> {
        Box::pin(self.fetch_open_orders(symbol))
    }
}
