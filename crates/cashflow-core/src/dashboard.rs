//! Summary dashboard state and chart data

use crate::error::{CoreError, CoreResult};
use cashflow_gateway::{AccountSearchField, AccountSummary, BreakdownItem, DateWindow, TransactionSummary};
use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const INVALID_DATE: &str = "Please select a valid date.";
pub const RANGE_REQUIRED: &str = "Start and end dates are required when date range is toggled.";
pub const OPTION_REQUIRED: &str = "Please select a search option.";
pub const VALUE_REQUIRED: &str = "Please enter a search value first";

/// Account search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCriteria {
    pub field: AccountSearchField,
    pub value: String,
}

impl AccountCriteria {
    /// Build from raw form inputs
    pub fn parse(field: Option<&str>, value: &str) -> CoreResult<Self> {
        let field = field
            .filter(|f| !f.trim().is_empty())
            .and_then(|f| f.parse::<AccountSearchField>().ok())
            .ok_or_else(|| CoreError::validation(OPTION_REQUIRED))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(CoreError::validation(VALUE_REQUIRED));
        }
        Ok(Self {
            field,
            value: value.to_string(),
        })
    }
}

/// `[date, date + months]`
pub fn forecast_window(date: NaiveDate, months: u32) -> Option<DateWindow> {
    let end = date.checked_add_months(Months::new(months))?;
    Some(DateWindow { start: date, end })
}

/// "January 31, 2026 - July 31, 2026"
pub fn period_label(window: &DateWindow) -> String {
    format!(
        "{} - {}",
        window.start.format("%B %-d, %Y"),
        window.end.format("%B %-d, %Y")
    )
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardState {
    pub criteria: Option<AccountCriteria>,
    pub accounts: Vec<AccountSummary>,
    /// Account the summary belongs to
    pub summary_account: Option<String>,
    pub summary: Option<TransactionSummary>,
    pub window: Option<DateWindow>,
    pub forecast_period: String,
    pub range_toggled: bool,
    pub error: Option<String>,
}

impl DashboardState {
    pub fn first_account(&self) -> Option<&str> {
        self.accounts.first().map(|a| a.account_number.as_str())
    }

    pub fn begin_search(&mut self, criteria: AccountCriteria) {
        self.criteria = Some(criteria);
        self.error = None;
    }

    /// Install search results; an empty list also drops the summary
    pub fn apply_accounts(&mut self, accounts: Vec<AccountSummary>) {
        if accounts.is_empty() {
            self.summary = None;
            self.summary_account = None;
        }
        self.accounts = accounts;
    }

    pub fn apply_summary(&mut self, account_number: &str, summary: TransactionSummary) {
        self.summary_account = Some(account_number.to_string());
        self.summary = Some(summary);
    }

    /// Pick a forecast start date; returns the new window when the date is valid
    pub fn set_forecast_date(&mut self, input: &str, months: u32) -> CoreResult<DateWindow> {
        let window = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|date| forecast_window(date, months));
        match window {
            Some(window) => {
                self.window = Some(window);
                self.forecast_period = period_label(&window);
                Ok(window)
            }
            None => {
                self.forecast_period = INVALID_DATE.to_string();
                Err(CoreError::validation(INVALID_DATE))
            }
        }
    }

    /// Flip the range toggle; returns the window the summary should use
    pub fn toggle_range(&mut self) -> CoreResult<Option<DateWindow>> {
        self.range_toggled = !self.range_toggled;
        if !self.range_toggled {
            return Ok(None);
        }
        match self.window {
            Some(window) => Ok(Some(window)),
            None => {
                self.error = Some(RANGE_REQUIRED.to_string());
                Err(CoreError::validation(RANGE_REQUIRED))
            }
        }
    }
}

// ==================== Charts ====================

/// Chart dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
}

/// Chart data for Chart.js
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub chart_type: String,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

const COLORS: [&str; 8] = [
    "#36A2EB", "#FF6384", "#4BC0C0", "#FFCE56", "#9966FF", "#FF9F40", "#C9CBCF", "#7BC225",
];

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Opening vs closing balance, plus inflow vs outflow when reported
pub fn balance_chart(summary: &TransactionSummary) -> ChartData {
    let mut labels = vec!["Opening Balance".to_string(), "Closing Balance".to_string()];
    let mut data = vec![to_f64(summary.opening_balance), to_f64(summary.closing_balance)];
    if let Some(inflow) = summary.total_inflow {
        labels.push("Inflow".to_string());
        data.push(to_f64(inflow));
    }
    if let Some(outflow) = summary.total_outflow {
        labels.push("Outflow".to_string());
        data.push(to_f64(outflow));
    }
    let background_color = COLORS.iter().take(data.len()).map(|c| c.to_string()).collect();

    ChartData {
        chart_type: "bar".to_string(),
        title: "Balance Summary".to_string(),
        labels,
        datasets: vec![ChartDataset {
            label: "Amount".to_string(),
            data,
            background_color,
        }],
    }
}

/// Doughnut of a collection or payment breakdown; `None` when empty
pub fn breakdown_chart(title: &str, items: &[BreakdownItem]) -> Option<ChartData> {
    if items.is_empty() {
        return None;
    }
    Some(ChartData {
        chart_type: "doughnut".to_string(),
        title: title.to_string(),
        labels: items.iter().map(|i| i.label.clone()).collect(),
        datasets: vec![ChartDataset {
            label: title.to_string(),
            data: items.iter().map(|i| to_f64(i.amount)).collect(),
            background_color: (0..items.len()).map(|i| COLORS[i % COLORS.len()].to_string()).collect(),
        }],
    })
}
