//! HTTP implementation of the forecast gateway
//!
//! Endpoints are resolved against `api.base_url`. Reads map a 204, an empty
//! body or a non-success envelope to "no data"; mutations map them to errors.

use crate::error::{GatewayError, GatewayResult};
use crate::types::*;
use crate::{status_path, ForecastGatewayTrait};
use async_trait::async_trait;
use cashflow_config::{ApiConfig, WorkflowStatus};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const LOG_TARGET: &str = "cashflow::gateway";

/// reqwest-backed gateway
#[derive(Debug, Clone)]
pub struct HttpForecastGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpForecastGateway {
    pub fn new(config: &ApiConfig) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.normalized_base_url(),
        })
    }

    /// Build with an existing client, used when the caller shares one pool
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and decode its envelope; `None` for 204 or an empty body
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        req: RequestBuilder,
    ) -> GatewayResult<Option<Envelope<T>>> {
        log::debug!(target: LOG_TARGET, "-> {}", endpoint);
        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::NO_CONTENT {
            log::debug!(target: LOG_TARGET, "<- {} 204 no content", endpoint);
            return Ok(None);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Server { status: status.as_u16(), message });
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Envelope<T>>(&body)
            .map(Some)
            .map_err(|e| GatewayError::Decode(format!("{}: {}", endpoint, e)))
    }

    /// Read a payload, treating every unsuccessful envelope as "no data"
    async fn read<T: DeserializeOwned>(&self, endpoint: &str, req: RequestBuilder) -> GatewayResult<Option<T>> {
        match self.fetch::<T>(endpoint, req).await? {
            Some(envelope) if envelope.is_success() => Ok(envelope.data),
            Some(envelope) => {
                log::warn!(
                    target: LOG_TARGET,
                    "{} answered {} ({}): {}",
                    endpoint,
                    envelope.code,
                    envelope.status,
                    envelope.message.as_deref().unwrap_or("-")
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Send a state-changing request; anything but success is an error
    async fn mutate(&self, endpoint: &str, req: RequestBuilder) -> GatewayResult<()> {
        log::debug!(target: LOG_TARGET, "-> {}", endpoint);
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Server { status: status.as_u16(), message });
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
            Ok(envelope) if !envelope.is_success() => Err(GatewayError::Envelope {
                code: envelope.code,
                status: envelope.status,
                message: envelope.message.unwrap_or_default(),
            }),
            Ok(_) => Ok(()),
            Err(_) => {
                log::debug!(target: LOG_TARGET, "{} returned a non-envelope body, accepting", endpoint);
                Ok(())
            }
        }
    }

    async fn read_page(&self, endpoint: &str, req: RequestBuilder, status: WorkflowStatus) -> GatewayResult<Page<ListingRow>> {
        let mut page = self
            .read::<Page<ListingRow>>(endpoint, req)
            .await?
            .unwrap_or_else(Page::empty)
            .normalized();
        for row in &mut page.content {
            row.status = status;
        }
        Ok(page)
    }
}

#[async_trait]
impl ForecastGatewayTrait for HttpForecastGateway {
    async fn list(&self, status: WorkflowStatus, page: PageRequest) -> GatewayResult<Page<ListingRow>> {
        let endpoint = status_path(status);
        let req = self
            .http
            .get(self.url(endpoint))
            .query(&[("page", page.page), ("size", page.size)]);
        self.read_page(endpoint, req, status).await
    }

    async fn search(
        &self,
        status: WorkflowStatus,
        field: SearchField,
        value: &str,
        page: PageRequest,
    ) -> GatewayResult<Page<ListingRow>> {
        let endpoint = format!("{}/search", status_path(status));
        let req = self.http.get(self.url(&endpoint)).query(&[
            (field.param(), value.to_string()),
            ("page", page.page.to_string()),
            ("size", page.size.to_string()),
        ]);
        self.read_page(&endpoint, req, status).await
    }

    async fn reject(&self, request: &RejectionRequest) -> GatewayResult<()> {
        let req = self.http.post(self.url("rejectAll")).json(request);
        self.mutate("rejectAll", req).await
    }

    async fn authorize_all(&self, ids: &[u64]) -> GatewayResult<()> {
        let endpoint = "pending-list/authorizeAll";
        let req = self.http.post(self.url(endpoint)).json(&ids);
        self.mutate(endpoint, req).await
    }

    async fn authorize(&self, id: u64) -> GatewayResult<()> {
        let endpoint = format!("pending-list/authorize/{}", id);
        let req = self.http.post(self.url(&endpoint));
        self.mutate(&endpoint, req).await
    }

    async fn forecast(&self, id: u64) -> GatewayResult<ForecastEntry> {
        let endpoint = format!("forecasts/{}", id);
        let req = self.http.get(self.url(&endpoint));
        match self.fetch::<ForecastEntry>(&endpoint, req).await? {
            Some(envelope) if !envelope.is_success() => Err(GatewayError::Envelope {
                code: envelope.code,
                status: envelope.status,
                message: envelope.message.unwrap_or_default(),
            }),
            Some(Envelope { data: Some(entry), .. }) => Ok(entry),
            _ => Err(GatewayError::Empty { endpoint }),
        }
    }

    async fn update_forecast(&self, id: u64, entry: &ForecastEntry) -> GatewayResult<()> {
        let endpoint = format!("forecasts/{}", id);
        let req = self.http.put(self.url(&endpoint)).json(entry);
        self.mutate(&endpoint, req).await
    }

    async fn corporates(&self, page: PageRequest) -> GatewayResult<Vec<Corporate>> {
        let endpoint = "corporate/all";
        let req = self
            .http
            .get(self.url(endpoint))
            .query(&[("page", page.page), ("size", page.size)]);
        Ok(self
            .read::<Page<Corporate>>(endpoint, req)
            .await?
            .map(|p| p.content)
            .unwrap_or_default())
    }

    async fn corporates_by_code(&self, code: &str) -> GatewayResult<Vec<Corporate>> {
        let endpoint = format!("corporate/corporate-code/{}", urlencoding::encode(code.trim()));
        let req = self.http.get(self.url(&endpoint));
        Ok(self
            .read::<Page<Corporate>>(&endpoint, req)
            .await?
            .map(|p| p.content)
            .unwrap_or_default())
    }

    async fn corporates_by_name(&self, name: &str) -> GatewayResult<Vec<Corporate>> {
        let endpoint = format!("corporate/corporate-name/{}", urlencoding::encode(name.trim()));
        let req = self.http.get(self.url(&endpoint));
        Ok(self
            .read::<Page<Corporate>>(&endpoint, req)
            .await?
            .map(|p| p.content)
            .unwrap_or_default())
    }

    async fn accounts_by_type(&self, account_type: &str, corporate_id: u64) -> GatewayResult<Vec<AccountOption>> {
        let endpoint = "accounts/by-type";
        let req = self.http.get(self.url(endpoint)).query(&[
            ("accountType", account_type.to_string()),
            ("corporateId", corporate_id.to_string()),
        ]);
        Ok(self.read::<Vec<AccountOption>>(endpoint, req).await?.unwrap_or_default())
    }

    async fn search_accounts(&self, field: AccountSearchField, value: &str) -> GatewayResult<Vec<AccountSummary>> {
        let endpoint = "accounts/search";
        let req = self.http.get(self.url(endpoint)).query(&[(field.param(), value)]);
        Ok(self.read::<Vec<AccountSummary>>(endpoint, req).await?.unwrap_or_default())
    }

    async fn range_summary(
        &self,
        account_number: &str,
        window: Option<DateWindow>,
    ) -> GatewayResult<Option<TransactionSummary>> {
        let endpoint = "transactions/custom-range-summary";
        let (start, end) = match window {
            Some(w) => (w.start.format("%Y-%m-%d").to_string(), w.end.format("%Y-%m-%d").to_string()),
            None => (String::new(), String::new()),
        };
        let req = self.http.get(self.url(endpoint)).query(&[
            ("accountNumber", account_number.to_string()),
            ("startDate", start),
            ("endDate", end),
        ]);
        self.read::<TransactionSummary>(endpoint, req).await
    }
}
