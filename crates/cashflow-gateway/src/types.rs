//! Wire types exchanged with the remote forecasting API
//!
//! Every response is wrapped in an [`Envelope`]; paged endpoints carry a
//! [`Page`] inside it. Field names follow the remote camelCase convention.

use cashflow_config::WorkflowStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==================== Envelope ====================

/// `{code, status, message, data}` wrapper used by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub status: String,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            status: "success".to_string(),
            message: None,
            data: Some(data),
        }
    }

    /// `code == 200` and `status == "success"`
    pub fn is_success(&self) -> bool {
        self.code == 200 && self.status.eq_ignore_ascii_case("success")
    }

    /// Payload of a successful envelope, `None` for anything else
    pub fn into_data(self) -> Option<T> {
        if self.is_success() {
            self.data
        } else {
            None
        }
    }
}

/// Paged payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            total_elements: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Unpaginated endpoints omit the totals; a non-empty page then counts as one page
    pub fn normalized(mut self) -> Self {
        if self.total_pages == 0 && !self.content.is_empty() {
            self.total_pages = 1;
        }
        if self.total_elements < self.content.len() as u64 {
            self.total_elements = self.content.len() as u64;
        }
        self
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn first(size: u32) -> Self {
        Self { page: 0, size }
    }
}

// ==================== Listing ====================

/// One row of the pending / rejected / review listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingRow {
    pub id: u64,
    pub reference_no: String,
    pub corporate_code: String,
    pub corporate_name: String,
    pub forecasting_as: String,
    pub entry_type: String,
    pub forecasted_amount: Option<Decimal>,
    pub currency: String,
    pub account_number: String,
    pub value_date: String,
    pub rejection_reason: Option<String>,
    /// Assigned locally from the endpoint the row came from
    #[serde(skip)]
    pub status: WorkflowStatus,
}

/// Field a listing search is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    #[default]
    ReferenceNo,
    CorporateCode,
    CorporateName,
    ForecastingAs,
    EntryType,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::ReferenceNo,
        SearchField::CorporateCode,
        SearchField::CorporateName,
        SearchField::ForecastingAs,
        SearchField::EntryType,
    ];

    /// Query parameter name understood by the remote search endpoints
    pub fn param(&self) -> &'static str {
        match self {
            SearchField::ReferenceNo => "referenceNo",
            SearchField::CorporateCode => "corporateCode",
            SearchField::CorporateName => "corporateName",
            SearchField::ForecastingAs => "forecastingAs",
            SearchField::EntryType => "entryType",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchField::ReferenceNo => "Reference No",
            SearchField::CorporateCode => "Corporate Code",
            SearchField::CorporateName => "Corporate Name",
            SearchField::ForecastingAs => "Forecasting As",
            SearchField::EntryType => "Entry Type",
        }
    }
}

impl std::str::FromStr for SearchField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchField::ALL
            .iter()
            .find(|f| f.param().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Invalid search field: {}", s))
    }
}

/// Body of `POST rejectAll`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionRequest {
    pub rejection_reason: String,
    pub ids: Vec<u64>,
}

// ==================== Forecast entries ====================

/// A forecast entry as read from and written to `forecasts/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub corporate_code: String,
    pub corporate_name: String,
    pub forecasting_as: String,
    pub currency: String,
    pub entry_type: String,
    pub narration: String,
    pub description: String,
    pub mode: String,
    pub beneficiary_payers: String,
    pub account_type: String,
    pub account_number: String,
    pub forecasted_amount: Option<Decimal>,
    pub lock_record: bool,
    pub value_date: String,
    pub recurring_from: String,
    pub recurring_to: String,
    pub recurrence_pattern: String,
}

/// Corporate directory row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Corporate {
    pub id: u64,
    pub corporate_code: String,
    pub corporate_name: String,
}

/// Account number returned by `accounts/by-type`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountOption {
    pub account_number: String,
    pub account_title: Option<String>,
}

// ==================== Dashboard ====================

/// Field an account search is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountSearchField {
    AccountNumber,
    AccountTitle,
}

impl AccountSearchField {
    pub fn param(&self) -> &'static str {
        match self {
            AccountSearchField::AccountNumber => "accountNumber",
            AccountSearchField::AccountTitle => "accountTitle",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountSearchField::AccountNumber => "Account Number",
            AccountSearchField::AccountTitle => "Account Title",
        }
    }
}

impl std::str::FromStr for AccountSearchField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accountNumber" | "1" => Ok(AccountSearchField::AccountNumber),
            "accountTitle" | "2" => Ok(AccountSearchField::AccountTitle),
            _ => Err(format!("Invalid account search field: {}", s)),
        }
    }
}

/// Account row returned by `accounts/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSummary {
    pub id: Option<u64>,
    pub account_number: String,
    pub account_title: String,
    pub account_type: String,
    pub currency: String,
    pub balance: Option<Decimal>,
}

/// Inclusive date window sent as `startDate` / `endDate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One slice of a collection or payment breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakdownItem {
    pub label: String,
    pub amount: Decimal,
}

/// Payload of `transactions/custom-range-summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionSummary {
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    #[serde(alias = "totalCredit")]
    pub total_inflow: Option<Decimal>,
    #[serde(alias = "totalDebit")]
    pub total_outflow: Option<Decimal>,
    pub collections: Vec<BreakdownItem>,
    pub payments: Vec<BreakdownItem>,
}
