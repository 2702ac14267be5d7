//! Asset list service
//!
//! A consumer of the white-box executor: it fetches `/assets` and decodes the
//! JSON body. It never builds its own network layer, so tests hand it an
//! executor over a mock transport and fully control the response.

use crate::error::{FrameworkError, Result};
use crate::executor::{RequestHandle, WhiteBoxExecutor};
use serde::{Deserialize, Serialize};

/// Relative path of the asset listing
pub const ASSETS_PATH: &str = "/assets";

/// One listed asset; numeric fields stay as the decimal strings the API sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Slug, e.g. `bitcoin`
    pub id: String,
    /// Display name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Price change over the last 24 hours, in percent
    #[serde(rename = "changePercent24Hr")]
    pub change_percent_24_hr: String,
    /// Market capitalization in USD
    pub market_cap_usd: String,
    /// Price in USD
    pub price_usd: String,
}

/// Response envelope for [`ASSETS_PATH`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetList {
    /// Assets in the order the API ranks them
    pub data: Vec<Asset>,
}

/// Fetches and decodes the asset list
#[derive(Debug, Clone)]
pub struct AssetService {
    executor: WhiteBoxExecutor,
}

impl AssetService {
    /// Service over an injected executor
    #[must_use]
    pub const fn new(executor: WhiteBoxExecutor) -> Self {
        Self { executor }
    }

    /// Fetch the asset list and pass the decoded result to `on_complete`
    ///
    /// Transport errors are passed through unchanged; an undecodable body
    /// becomes [`FrameworkError::Decode`].
    ///
    /// # Errors
    ///
    /// Returns the executor's pre-dispatch errors (malformed target, no runtime).
    pub fn fetch_assets<F>(&self, on_complete: F) -> Result<RequestHandle>
    where
        F: FnOnce(Result<AssetList>) + Send + 'static,
    {
        self.executor.perform_request(ASSETS_PATH, move |outcome| {
            let decoded = outcome
                .and_then(|payload| serde_json::from_slice(&payload).map_err(FrameworkError::from));
            on_complete(decoded);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    fn mock_asset() -> Asset {
        Asset {
            id: "bitcoin".to_string(),
            name: "Bitcoin".to_string(),
            symbol: "BTC".to_string(),
            change_percent_24_hr: "4.6112912338284003".to_string(),
            market_cap_usd: "1136551580407.9842430".to_string(),
            price_usd: "60867.8140898007".to_string(),
        }
    }

    fn asset_list() -> Vec<u8> {
        serde_json::to_vec(&AssetList {
            data: vec![mock_asset()],
        })
        .unwrap()
    }

    fn service(transport: MockTransport) -> AssetService {
        AssetService::new(WhiteBoxExecutor::new(
            "https://api.coincap.io/v2",
            Arc::new(transport),
        ))
    }

    async fn fetch(service: &AssetService) -> Result<AssetList> {
        let (tx, rx) = oneshot::channel();
        let _handle = service
            .fetch_assets(move |result| {
                let _ = tx.send(result);
            })
            .unwrap();
        rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_fetch_assets_successfully() {
        let transport = MockTransport::with_outcome(Ok(asset_list()));
        let service = service(transport.clone());

        let assets = fetch(&service).await.unwrap();

        assert_eq!(assets.data.len(), 1);
        assert_eq!(assets.data.first(), Some(&mock_asset()));
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://api.coincap.io/v2/assets"
        );
    }

    #[tokio::test]
    async fn test_fetch_assets_failure() {
        let network_error = FrameworkError::NetworkFailure("Something went wrong!".to_string());
        let service = service(MockTransport::with_outcome(Err(network_error.clone())));

        let result = fetch(&service).await;

        assert_eq!(result, Err(network_error));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let service = service(MockTransport::succeeding(b"<html>maintenance</html>"));

        let result = fetch(&service).await;

        assert!(matches!(result, Err(FrameworkError::Decode(_))));
    }

    #[test]
    fn test_decodes_api_field_names() {
        let json = r#"{"data":[{"id":"ethereum","rank":"2","name":"Ethereum","symbol":"ETH",
            "changePercent24Hr":"-1.2","marketCapUsd":"1","priceUsd":"2"}]}"#;
        let list: AssetList = serde_json::from_str(json).unwrap();
        assert_eq!(list.data[0].symbol, "ETH");
        assert_eq!(list.data[0].change_percent_24_hr, "-1.2");
    }
}
