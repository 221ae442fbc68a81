//! Typed gateway to the remote forecasting REST API
//!
//! The back office never computes anything itself: every list, lookup and
//! state transition is a call through [`ForecastGatewayTrait`]. The HTTP
//! implementation lives in [`http`]; tests substitute in-memory gateways.

use async_trait::async_trait;
use cashflow_config::WorkflowStatus;
use std::sync::Arc;

pub mod error;
pub mod http;
pub mod types;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpForecastGateway;
pub use types::{
    AccountOption, AccountSearchField, AccountSummary, BreakdownItem, Corporate, DateWindow,
    Envelope, ForecastEntry, ListingRow, Page, PageRequest, RejectionRequest, SearchField,
    TransactionSummary,
};

/// Gateway reference type
pub type GatewayRef = Arc<dyn ForecastGatewayTrait>;

/// Remote listing path for a workflow status
pub fn status_path(status: WorkflowStatus) -> &'static str {
    match status {
        WorkflowStatus::Pending => "pending-list",
        WorkflowStatus::Rejected => "rejected",
        WorkflowStatus::Review => "review-list",
    }
}

/// Remote account-type name for a form value
///
/// The editor's select uses `internalAccount` / `externalAccount`; the
/// accounts endpoint expects the spelled-out names.
pub fn remote_account_type(form_value: &str) -> String {
    match form_value.trim() {
        "internalAccount" | "internal Account" => "Internal Account".to_string(),
        "externalAccount" | "external Account" => "External Account".to_string(),
        other => other.to_string(),
    }
}

/// Operations offered by the remote forecasting API
///
/// Read operations treat "no data" envelopes as empty results; mutations
/// report every non-success answer as an error.
#[async_trait]
pub trait ForecastGatewayTrait: Send + Sync {
    /// Fetch one page of rows in the given workflow status
    async fn list(&self, status: WorkflowStatus, page: PageRequest) -> GatewayResult<Page<ListingRow>>;

    /// Search rows in the given workflow status by one field
    async fn search(
        &self,
        status: WorkflowStatus,
        field: SearchField,
        value: &str,
        page: PageRequest,
    ) -> GatewayResult<Page<ListingRow>>;

    /// Reject the listed entries with a reason
    async fn reject(&self, request: &RejectionRequest) -> GatewayResult<()>;

    /// Authorize several pending entries
    async fn authorize_all(&self, ids: &[u64]) -> GatewayResult<()>;

    /// Authorize one pending entry, moving it to review
    async fn authorize(&self, id: u64) -> GatewayResult<()>;

    /// Read a forecast entry
    async fn forecast(&self, id: u64) -> GatewayResult<ForecastEntry>;

    /// Overwrite a forecast entry
    async fn update_forecast(&self, id: u64, entry: &ForecastEntry) -> GatewayResult<()>;

    /// Corporate directory page
    async fn corporates(&self, page: PageRequest) -> GatewayResult<Vec<Corporate>>;

    async fn corporates_by_code(&self, code: &str) -> GatewayResult<Vec<Corporate>>;

    async fn corporates_by_name(&self, name: &str) -> GatewayResult<Vec<Corporate>>;

    /// Account numbers of one type owned by a corporate
    async fn accounts_by_type(&self, account_type: &str, corporate_id: u64) -> GatewayResult<Vec<AccountOption>>;

    /// Dashboard account lookup
    async fn search_accounts(&self, field: AccountSearchField, value: &str) -> GatewayResult<Vec<AccountSummary>>;

    /// Balance summary for an account, optionally limited to a window
    async fn range_summary(
        &self,
        account_number: &str,
        window: Option<DateWindow>,
    ) -> GatewayResult<Option<TransactionSummary>>;
}
