//! Upstream ledger collaborator.
//!
//! Reports read accounts, movements and payments from the transactions API.
//! Handlers only see the [`LedgerSource`] trait; [`HttpLedgerClient`] is the
//! production implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use payreport_core::calendar::DateRange;
use payreport_core::movement::Movement;
use payreport_core::normatives::BalanceAggregates;
use payreport_core::reports::Commerce;
use payreport_shared::config::UpstreamConfig;
use payreport_shared::types::{AccountId, CommerceId, PageRequest};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const API_PREFIX: &str = "trans-api/api/v1";

/// Errors talking to the upstream ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The request never got a response.
    #[error("Upstream request failed: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("Upstream returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Body did not match the expected shape.
    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),

    /// A page kept failing.
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Attempts made.
        attempts: u32,
        /// Last failure.
        last: Box<UpstreamError>,
    },
}

/// Movements of one account inside a UTC window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementQuery {
    /// Account whose transactions are listed.
    pub account_id: AccountId,
    /// Window start, `YYYY-MM-DD HH:mm:ss` UTC.
    pub start_date: String,
    /// Window end, `YYYY-MM-DD HH:mm:ss` UTC.
    pub end_date: String,
}

impl MovementQuery {
    /// Query for `account_id` over `range`.
    #[must_use]
    pub fn for_range(account_id: AccountId, range: &DateRange) -> Self {
        let (start_date, end_date) = range.to_utc_strings();
        Self {
            account_id,
            start_date,
            end_date,
        }
    }
}

/// Payment class counted by the P41 file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentClass {
    /// Person to person.
    P2p,
    /// Person to commerce.
    P2c,
}

impl PaymentClass {
    const fn path(self) -> &'static str {
        match self {
            Self::P2p => "p2p",
            Self::P2c => "p2c",
        }
    }
}

/// Read access to the ledger.
///
/// `authorization` is the caller's `Authorization` header, forwarded as is.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Commerce by id; `None` when it does not exist.
    async fn find_commerce(
        &self,
        id: &CommerceId,
        authorization: Option<&str>,
    ) -> Result<Option<Commerce>, UpstreamError>;

    /// One page of an account's movements, oldest first.
    async fn movements_page(
        &self,
        query: &MovementQuery,
        page: &PageRequest,
        authorization: Option<&str>,
    ) -> Result<Vec<Movement>, UpstreamError>;

    /// Amounts of every payment of `class` inside `range`.
    async fn payment_amounts(
        &self,
        class: PaymentClass,
        range: &DateRange,
        authorization: Option<&str>,
    ) -> Result<Vec<Decimal>, UpstreamError>;

    /// Account counts and balances of accounts created up to `end`.
    async fn balance_aggregates(
        &self,
        end: DateTime<Utc>,
        authorization: Option<&str>,
    ) -> Result<BalanceAggregates, UpstreamError>;
}

/// How movement pages are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingPolicy {
    /// Rows per page.
    pub page_size: u32,
    /// Attempts per page.
    pub max_retries: u32,
    /// Pause before retry `n` is `n * retry_delay`.
    pub retry_delay: Duration,
}

impl PagingPolicy {
    /// Policy from upstream configuration.
    #[must_use]
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(250),
        }
    }
}

/// Reads every movement matching `query`, page by page.
///
/// Pages are fetched sequentially. A page that keeps failing after
/// `max_retries` attempts aborts the whole read.
pub async fn fetch_all_movements(
    source: &dyn LedgerSource,
    query: &MovementQuery,
    policy: PagingPolicy,
    authorization: Option<&str>,
) -> Result<Vec<Movement>, UpstreamError> {
    let mut movements = Vec::new();
    let mut page = PageRequest::first(policy.page_size);

    loop {
        let batch = fetch_page(source, query, &page, policy, authorization).await?;
        let full_page = batch.len() as u64 >= page.limit();
        let last_id = batch.last().map(|m| m.id.to_string());
        movements.extend(batch);

        match last_id {
            Some(last_id) if full_page => page = page.after(last_id),
            _ => break,
        }
    }

    debug!(
        account_id = %query.account_id,
        count = movements.len(),
        "Fetched movements"
    );
    Ok(movements)
}

async fn fetch_page(
    source: &dyn LedgerSource,
    query: &MovementQuery,
    page: &PageRequest,
    policy: PagingPolicy,
    authorization: Option<&str>,
) -> Result<Vec<Movement>, UpstreamError> {
    let attempts = policy.max_retries.max(1);
    let mut attempt = 1;
    loop {
        match source.movements_page(query, page, authorization).await {
            Ok(batch) => return Ok(batch),
            Err(e) if attempt < attempts => {
                warn!(
                    error = %e,
                    attempt,
                    last_id = ?page.last_id,
                    "Movement page failed, retrying"
                );
                tokio::time::sleep(policy.retry_delay * attempt).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(UpstreamError::RetriesExhausted {
                    attempts,
                    last: Box::new(e),
                });
            }
        }
    }
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// Request body shape of the transactions API.
#[derive(Serialize)]
struct Options<T> {
    options: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MovementPageOptions<'a> {
    #[serde(flatten)]
    query: &'a MovementQuery,
    limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_id: Option<&'a str>,
    order_by: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeOptions {
    start_date: String,
    end_date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndDateOptions {
    end_date: String,
}

#[derive(Deserialize)]
struct PaymentAmount {
    #[serde(default)]
    amount: Decimal,
}

#[derive(Deserialize)]
struct BalanceTotal {
    #[serde(default)]
    total: Decimal,
}

#[derive(Deserialize)]
struct UsersAggregate {
    #[serde(default)]
    users: u64,
    #[serde(default)]
    balances: Vec<BalanceTotal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalBalance {
    #[serde(default)]
    total_amount: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommercesAggregate {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    total_balance: Option<TotalBalance>,
}

/// [`LedgerSource`] over the transactions HTTP API.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    http: reqwest::Client,
    base_uri: String,
}

impl HttpLedgerClient {
    /// Client for the API at `config.data_uri`.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("payreport/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_uri: config.data_uri.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_PREFIX}/{path}", self.base_uri)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        authorization: Option<&str>,
    ) -> Result<reqwest::Response, UpstreamError> {
        let request = match authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        };
        request
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        authorization: Option<&str>,
    ) -> Result<T, UpstreamError> {
        let url = self.url(path);
        debug!(%url, "Calling upstream");
        let response = self
            .send(self.http.post(&url).json(body), authorization)
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl LedgerSource for HttpLedgerClient {
    async fn find_commerce(
        &self,
        id: &CommerceId,
        authorization: Option<&str>,
    ) -> Result<Option<Commerce>, UpstreamError> {
        let url = self.url(&format!("commerces/{id}"));
        debug!(%url, "Calling upstream");
        let response = self.send(self.http.get(&url), authorization).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }

    async fn movements_page(
        &self,
        query: &MovementQuery,
        page: &PageRequest,
        authorization: Option<&str>,
    ) -> Result<Vec<Movement>, UpstreamError> {
        let body = Options {
            options: MovementPageOptions {
                query,
                limit: page.limit(),
                last_id: page.last_id.as_deref(),
                order_by: "ASC",
            },
        };
        self.post("movements/getData", &body, authorization).await
    }

    async fn payment_amounts(
        &self,
        class: PaymentClass,
        range: &DateRange,
        authorization: Option<&str>,
    ) -> Result<Vec<Decimal>, UpstreamError> {
        let (start_date, end_date) = range.to_utc_strings();
        let body = Options {
            options: RangeOptions {
                start_date,
                end_date,
            },
        };
        let payments: Vec<PaymentAmount> = self
            .post(&format!("reports/{}", class.path()), &body, authorization)
            .await?;
        Ok(payments.into_iter().map(|p| p.amount).collect())
    }

    async fn balance_aggregates(
        &self,
        end: DateTime<Utc>,
        authorization: Option<&str>,
    ) -> Result<BalanceAggregates, UpstreamError> {
        let body = Options {
            options: EndDateOptions {
                end_date: end.format(payreport_core::calendar::range::UTC_QUERY_FORMAT).to_string(),
            },
        };

        let (users, commerces) = tokio::try_join!(
            self.post::<_, UsersAggregate>("users/usersAggregate", &body, authorization),
            self.post::<_, CommercesAggregate>("commerces/aggregate", &body, authorization),
        )?;

        Ok(BalanceAggregates {
            users: users.users,
            users_balance: users.balances.first().map(|b| b.total).unwrap_or_default(),
            commerces: commerces.total,
            commerces_balance: commerces
                .total_balance
                .map(|b| b.total_amount)
                .unwrap_or_default(),
        })
    }
}

impl From<UpstreamError> for payreport_shared::AppError {
    fn from(e: UpstreamError) -> Self {
        Self::ExternalService(e.to_string())
    }
}
