use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;

use crate::accounts::Account;
use crate::cipher::SecretCipher;
use crate::snapshot::{AccountResult, AssetBalance};
use crate::{Error, Result};

use super::error::ExchangeError;
use super::traits::ExchangeAdapter;
use super::REQUEST_TIMEOUT_SECS;

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const ACCOUNT_PATH: &str = "/api/v3/account";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Deserialize)]
struct AccountInfoResponse {
    balances: Vec<RawBalance>,
}

#[derive(Debug, Deserialize)]
struct RawBalance {
    asset: String,
    free: String,
    locked: String,
}

/// Balance provider for Binance spot accounts.
///
/// Signs requests with the account's decrypted API secret using the
/// `timestamp` + HMAC-SHA256 scheme Binance requires for the signed
/// `/api/v3/account` endpoint.
pub struct BinanceAdapter {
    cipher: Arc<SecretCipher>,
    client: Client,
    base_url: String,
}

impl BinanceAdapter {
    pub fn new(cipher: Arc<SecretCipher>) -> Result<Self> {
        Self::with_base_url(cipher, DEFAULT_BASE_URL)
    }

    /// Builds an adapter against a non-default endpoint, used by tests to
    /// point at a local server.
    pub fn with_base_url(cipher: Arc<SecretCipher>, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("HTTP client construction failed: {e}")))?;
        Ok(Self {
            cipher,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn try_fetch(
        &self,
        account: &Account,
    ) -> std::result::Result<Vec<AssetBalance>, ExchangeError> {
        let secret_cipher = account
            .api_secret_cipher
            .as_deref()
            .ok_or(ExchangeError::MissingCredentials)?;
        let api_secret = self
            .cipher
            .decrypt(secret_cipher)
            .map_err(|e| ExchangeError::Credential(e.to_string()))?;

        let query = format!("timestamp={}", Utc::now().timestamp_millis());
        let signature = sign_query(&query, &api_secret)?;
        let url = format!(
            "{}{}?{}&signature={}",
            self.base_url, ACCOUNT_PATH, query, signature
        );

        let response = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", &account.api_key)
            .send()
            .await
            .map_err(ExchangeError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(ExchangeError::from)?;
        if !status.is_success() {
            return Err(ExchangeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let info: AccountInfoResponse = serde_json::from_str(&body)?;
        Ok(collect_nonzero_balances(info.balances))
    }
}

#[async_trait]
impl ExchangeAdapter for BinanceAdapter {
    fn exchange_id(&self) -> &'static str {
        "binance"
    }

    async fn fetch_balances(&self, account: &Account) -> AccountResult {
        match self.try_fetch(account).await {
            Ok(balances) => {
                debug!(
                    "[Exchanges] binance returned {} balances for '{}'",
                    balances.len(),
                    account.name
                );
                AccountResult::Success {
                    account_id: account.id.clone(),
                    account_name: account.name.clone(),
                    exchange: account.exchange.clone(),
                    balances,
                }
            }
            Err(e) => {
                warn!(
                    "[Exchanges] binance fetch failed for '{}': {}",
                    account.name, e
                );
                AccountResult::Failure {
                    account_id: account.id.clone(),
                    account_name: account.name.clone(),
                    exchange: account.exchange.clone(),
                    error_detail: e.to_string(),
                }
            }
        }
    }
}

fn sign_query(query: &str, api_secret: &str) -> std::result::Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .map_err(|e| ExchangeError::ApiRequestFailed(format!("HMAC init failed: {e}")))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Keeps only positions where free or locked amounts are nonzero,
/// preserving the exchange's original decimal strings.
fn collect_nonzero_balances(raw: Vec<RawBalance>) -> Vec<AssetBalance> {
    raw.into_iter()
        .filter(|b| {
            let free = b.free.parse::<f64>().unwrap_or(0.0);
            let locked = b.locked.parse::<f64>().unwrap_or(0.0);
            free + locked > 0.0
        })
        .map(|b| AssetBalance {
            asset: b.asset,
            free: b.free,
            locked: b.locked,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw(asset: &str, free: &str, locked: &str) -> RawBalance {
        RawBalance {
            asset: asset.to_string(),
            free: free.to_string(),
            locked: locked.to_string(),
        }
    }

    fn account_with_secret(cipher: &SecretCipher, secret: Option<&str>) -> Account {
        Account {
            id: "a1".to_string(),
            name: "Main".to_string(),
            exchange: "binance".to_string(),
            api_key: "K1".to_string(),
            api_secret_cipher: secret.map(|s| cipher.encrypt(s).unwrap()),
            passphrase_cipher: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sign_query_matches_known_hmac_vector() {
        // RFC 4231 test case 2.
        let signature = sign_query("what do ya want for nothing?", "Jefe").unwrap();
        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn signatures_are_lowercase_hex() {
        let signature = sign_query("timestamp=1700000000000", "S1").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(signature, signature.to_lowercase());
    }

    #[test]
    fn zero_positions_are_dropped() {
        let balances = collect_nonzero_balances(vec![
            raw("BTC", "0.5", "0"),
            raw("ETH", "0", "0"),
            raw("SOL", "0", "1.25"),
            raw("XRP", "0.00000000", "0.00000000"),
        ]);

        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].asset, "BTC");
        assert_eq!(balances[0].free, "0.5");
        assert_eq!(balances[1].asset, "SOL");
        assert_eq!(balances[1].locked, "1.25");
    }

    #[tokio::test]
    async fn fetch_signs_request_and_filters_balances() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/account"))
            .and(header("X-MBX-APIKEY", "K1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "balances": [
                    { "asset": "BTC", "free": "0.5", "locked": "0" },
                    { "asset": "ETH", "free": "0", "locked": "0" }
                ]
            })))
            .mount(&server)
            .await;

        let cipher = Arc::new(SecretCipher::new("test-server-secret"));
        let adapter = BinanceAdapter::with_base_url(cipher.clone(), &server.uri()).unwrap();
        let account = account_with_secret(&cipher, Some("S1"));

        let result = adapter.fetch_balances(&account).await;
        match result {
            AccountResult::Success { balances, .. } => {
                assert_eq!(balances.len(), 1);
                assert_eq!(balances[0].asset, "BTC");
                assert_eq!(balances[0].free, "0.5");
            }
            other => panic!("expected success, got {other:?}"),
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let timestamp = pairs
            .iter()
            .find(|(k, _)| k == "timestamp")
            .map(|(_, v)| v.clone())
            .unwrap();
        let signature = pairs
            .iter()
            .find(|(k, _)| k == "signature")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(
            signature,
            sign_query(&format!("timestamp={timestamp}"), "S1").unwrap()
        );
    }

    #[tokio::test]
    async fn api_error_becomes_failure_with_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/account"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"code":-2014,"msg":"API-key format invalid."}"#),
            )
            .mount(&server)
            .await;

        let cipher = Arc::new(SecretCipher::new("test-server-secret"));
        let adapter = BinanceAdapter::with_base_url(cipher.clone(), &server.uri()).unwrap();
        let account = account_with_secret(&cipher, Some("S1"));

        let result = adapter.fetch_balances(&account).await;
        match result {
            AccountResult::Failure { error_detail, .. } => {
                assert!(error_detail.contains("HTTP 401"));
                assert!(error_detail.contains("API-key format invalid"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_secret_fails_without_calling_the_exchange() {
        let server = MockServer::start().await;
        let cipher = Arc::new(SecretCipher::new("test-server-secret"));
        let adapter = BinanceAdapter::with_base_url(cipher.clone(), &server.uri()).unwrap();
        let account = account_with_secret(&cipher, None);

        let result = adapter.fetch_balances(&account).await;
        match result {
            AccountResult::Failure { error_detail, .. } => {
                assert_eq!(error_detail, "Missing API credentials");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn undecryptable_secret_becomes_failure() {
        let server = MockServer::start().await;
        let cipher = Arc::new(SecretCipher::new("test-server-secret"));
        let adapter = BinanceAdapter::with_base_url(cipher.clone(), &server.uri()).unwrap();

        let foreign = SecretCipher::new("some-other-secret");
        let mut account = account_with_secret(&cipher, None);
        account.api_secret_cipher = Some(foreign.encrypt("S1").unwrap());

        let result = adapter.fetch_balances(&account).await;
        match result {
            AccountResult::Failure { error_detail, .. } => {
                assert!(error_detail.contains("Credential decryption failed"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
