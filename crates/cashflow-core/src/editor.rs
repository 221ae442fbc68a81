//! Entry editor state machine
//!
//! ```text
//! Loading -> Loaded -> Editing -> Submitting -> Saved
//!                         |            |
//!                         v            v
//!                  ValidationFailed  Loaded (update failed)
//! ```
//!
//! Dependent select options are derived from static lookup tables keyed by
//! the forecasting direction and the account type.

use crate::error::{CoreError, CoreResult};
use cashflow_gateway::{AccountOption, Corporate, ForecastEntry};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

// ==================== Lookup tables ====================

/// One `<option>` of a select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

impl SelectOption {
    pub fn new(value: &str, text: &str) -> Self {
        Self {
            value: value.to_string(),
            text: text.to_string(),
        }
    }
}

pub const FORECASTING_AS: [&str; 2] = ["Inward Payment", "Outward Payment"];

pub const ENTRY_TYPES: [(&str, &str); 2] = [("O", "One Time"), ("R", "Recurring")];

pub const ACCOUNT_TYPES: [(&str, &str); 2] = [
    ("internalAccount", "Internal Account"),
    ("externalAccount", "External Account"),
];

pub const RECURRENCE_PATTERNS: [&str; 5] = ["Daily", "Weekly", "Monthly", "Quarterly", "Yearly"];

static MODE_OPTIONS: Lazy<HashMap<&'static str, Vec<SelectOption>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "Inward Payment",
        vec![
            SelectOption::new("accountDeposit", "Account Deposit"),
            SelectOption::new("cash", "Cash"),
        ],
    );
    m.insert(
        "Outward Payment",
        vec![
            SelectOption::new("accountWithdrawal", "Account Withdrawal"),
            SelectOption::new("cash", "Cash"),
        ],
    );
    m
});

static ACCOUNT_OPTIONS: Lazy<HashMap<&'static str, Vec<SelectOption>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "internalAccount",
        vec![
            SelectOption::new("internalAcc001", "Internal Acc 001"),
            SelectOption::new("internalAcc002", "Internal Acc 002"),
        ],
    );
    m.insert(
        "externalAccount",
        vec![
            SelectOption::new("externalAcc001", "External Acc 001"),
            SelectOption::new("externalAcc002", "External Acc 002"),
        ],
    );
    m
});

/// Payment modes offered for a forecasting direction
pub fn mode_options(forecasting_as: &str) -> Vec<SelectOption> {
    MODE_OPTIONS.get(forecasting_as.trim()).cloned().unwrap_or_default()
}

/// Built-in account numbers for an account type
pub fn static_account_options(account_type: &str) -> Vec<SelectOption> {
    ACCOUNT_OPTIONS.get(account_type.trim()).cloned().unwrap_or_default()
}

// ==================== Form model ====================

pub const REQUIRED_FIELDS: [&str; 8] = [
    "corporateCode",
    "forecastingAs",
    "entryType",
    "narration",
    "mode",
    "accountType",
    "accountNumber",
    "forecastedAmount",
];

/// Which date inputs the entry type shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFields {
    /// `O`: value date only
    ValueDate,
    /// `R`: recurring from, to and pattern
    Recurrence,
    Hidden,
}

impl DateFields {
    pub fn for_entry_type(entry_type: &str) -> Self {
        match entry_type.trim() {
            "O" => DateFields::ValueDate,
            "R" => DateFields::Recurrence,
            _ => DateFields::Hidden,
        }
    }
}

/// Editable copy of a forecast entry; every input is kept as typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormModel {
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
    pub forecasted_amount: String,
    pub lock_record: bool,
    pub value_date: String,
    pub recurring_from: String,
    pub recurring_to: String,
    pub recurrence_pattern: String,
}

impl FormModel {
    pub fn empty(default_currency: &str) -> Self {
        Self {
            currency: default_currency.to_string(),
            ..Default::default()
        }
    }

    pub fn from_entry(entry: &ForecastEntry, default_currency: &str) -> Self {
        Self {
            corporate_code: entry.corporate_code.clone(),
            corporate_name: entry.corporate_name.clone(),
            forecasting_as: entry.forecasting_as.clone(),
            currency: if entry.currency.trim().is_empty() {
                default_currency.to_string()
            } else {
                entry.currency.clone()
            },
            entry_type: entry.entry_type.clone(),
            narration: entry.narration.clone(),
            description: entry.description.clone(),
            mode: entry.mode.clone(),
            beneficiary_payers: entry.beneficiary_payers.clone(),
            account_type: entry.account_type.clone(),
            account_number: entry.account_number.clone(),
            forecasted_amount: entry.forecasted_amount.map(|a| a.to_string()).unwrap_or_default(),
            lock_record: entry.lock_record,
            value_date: entry.value_date.clone(),
            recurring_from: entry.recurring_from.clone(),
            recurring_to: entry.recurring_to.clone(),
            recurrence_pattern: entry.recurrence_pattern.clone(),
        }
    }

    /// Set a field by its wire name
    pub fn set(&mut self, name: &str, value: &str) -> CoreResult<()> {
        let slot = match name {
            "corporateCode" => &mut self.corporate_code,
            "corporateName" => &mut self.corporate_name,
            "forecastingAs" => &mut self.forecasting_as,
            "currency" => &mut self.currency,
            "entryType" => &mut self.entry_type,
            "narration" => &mut self.narration,
            "description" => &mut self.description,
            "mode" => &mut self.mode,
            "beneficiaryPayers" => &mut self.beneficiary_payers,
            "accountType" => &mut self.account_type,
            "accountNumber" => &mut self.account_number,
            "forecastedAmount" => &mut self.forecasted_amount,
            "valueDate" => &mut self.value_date,
            "recurringFrom" => &mut self.recurring_from,
            "recurringTo" => &mut self.recurring_to,
            "recurrencePattern" => &mut self.recurrence_pattern,
            "lockRecord" => {
                self.lock_record = matches!(value.trim(), "true" | "on" | "1");
                return Ok(());
            }
            other => return Err(CoreError::validation(format!("Unknown field: {}", other))),
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "corporateCode" => &self.corporate_code,
            "corporateName" => &self.corporate_name,
            "forecastingAs" => &self.forecasting_as,
            "currency" => &self.currency,
            "entryType" => &self.entry_type,
            "narration" => &self.narration,
            "description" => &self.description,
            "mode" => &self.mode,
            "beneficiaryPayers" => &self.beneficiary_payers,
            "accountType" => &self.account_type,
            "accountNumber" => &self.account_number,
            "forecastedAmount" => &self.forecasted_amount,
            "valueDate" => &self.value_date,
            "recurringFrom" => &self.recurring_from,
            "recurringTo" => &self.recurring_to,
            "recurrencePattern" => &self.recurrence_pattern,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Parsed amount; thousands separators are accepted
    pub fn amount(&self) -> Option<Decimal> {
        let cleaned: String = self.forecasted_amount.chars().filter(|c| *c != ',').collect();
        Decimal::from_str(cleaned.trim()).ok()
    }

    /// Required fields that are blank, in display order
    pub fn missing_fields(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|&&name| match name {
                "forecastedAmount" => self.amount().is_none(),
                _ => self.get(name).map(|v| v.trim().is_empty()).unwrap_or(true),
            })
            .map(|name| name.to_string())
            .collect()
    }

    pub fn date_fields(&self) -> DateFields {
        DateFields::for_entry_type(&self.entry_type)
    }

    /// Update payload for `PUT forecasts/{id}`
    pub fn to_entry(&self, id: u64) -> ForecastEntry {
        ForecastEntry {
            id: Some(id),
            corporate_code: self.corporate_code.trim().to_string(),
            corporate_name: self.corporate_name.clone(),
            forecasting_as: self.forecasting_as.clone(),
            currency: self.currency.clone(),
            entry_type: self.entry_type.clone(),
            narration: self.narration.clone(),
            description: self.description.clone(),
            mode: self.mode.clone(),
            beneficiary_payers: self.beneficiary_payers.clone(),
            account_type: self.account_type.clone(),
            account_number: self.account_number.clone(),
            forecasted_amount: self.amount(),
            lock_record: self.lock_record,
            value_date: self.value_date.clone(),
            recurring_from: self.recurring_from.clone(),
            recurring_to: self.recurring_to.clone(),
            recurrence_pattern: self.recurrence_pattern.clone(),
        }
    }
}

// ==================== Editor state ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "missing", rename_all = "snake_case")]
pub enum EditorPhase {
    Loading,
    /// The entry could not be fetched
    Unavailable,
    Loaded,
    Editing,
    Submitting,
    Saved,
    ValidationFailed(Vec<String>),
}

impl EditorPhase {
    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            EditorPhase::Loaded | EditorPhase::Editing | EditorPhase::ValidationFailed(_)
        )
    }
}

/// Follow-up an edit asks the orchestrator for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEffect {
    None,
    /// Direction changed; mode options were recomputed
    ModeOptions,
    /// Account type changed; remote account numbers may be fetched
    AccountNumbers,
}

/// Corporate picker search scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CorporateSearchField {
    CorporateCode,
    CorporateName,
}

impl FromStr for CorporateSearchField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corporateCode" => Ok(CorporateSearchField::CorporateCode),
            "corporateName" => Ok(CorporateSearchField::CorporateName),
            _ => Err(format!("Invalid corporate search field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorState {
    pub id: u64,
    pub phase: EditorPhase,
    pub form: FormModel,
    pub mode_options: Vec<SelectOption>,
    pub account_options: Vec<SelectOption>,
    /// Full corporate directory
    pub directory: Vec<Corporate>,
    /// Rows shown in the corporate picker
    pub corporates: Vec<Corporate>,
    pub corporate_id: Option<u64>,
    default_currency: String,
}

impl EditorState {
    pub fn loading(id: u64, default_currency: &str) -> Self {
        Self {
            id,
            phase: EditorPhase::Loading,
            form: FormModel::empty(default_currency),
            mode_options: Vec::new(),
            account_options: Vec::new(),
            directory: Vec::new(),
            corporates: Vec::new(),
            corporate_id: None,
            default_currency: default_currency.to_string(),
        }
    }

    /// Populate the form from a fetched entry
    pub fn apply_entry(&mut self, entry: &ForecastEntry) {
        self.form = FormModel::from_entry(entry, &self.default_currency);
        self.mode_options = mode_options(&self.form.forecasting_as);
        self.account_options = static_account_options(&self.form.account_type);
        self.keep_current_account_number();
        self.phase = EditorPhase::Loaded;
    }

    pub fn apply_load_failure(&mut self) {
        self.phase = EditorPhase::Unavailable;
    }

    /// Apply one input change
    pub fn edit(&mut self, name: &str, value: &str) -> CoreResult<FieldEffect> {
        if !self.phase.accepts_input() {
            return Err(CoreError::validation("The entry is not ready for editing"));
        }
        self.form.set(name, value)?;
        self.phase = EditorPhase::Editing;

        let effect = match name {
            "forecastingAs" => {
                self.mode_options = mode_options(value);
                if !self.mode_options.iter().any(|o| o.value == self.form.mode) {
                    self.form.mode.clear();
                }
                FieldEffect::ModeOptions
            }
            "accountType" => {
                self.account_options = static_account_options(value);
                if !self.account_options.iter().any(|o| o.value == self.form.account_number) {
                    self.form.account_number.clear();
                }
                FieldEffect::AccountNumbers
            }
            "corporateCode" => {
                self.corporate_id = self.lookup_corporate_id();
                FieldEffect::None
            }
            _ => FieldEffect::None,
        };
        Ok(effect)
    }

    /// Validate and move to `Submitting`, returning the update payload
    pub fn begin_submit(&mut self) -> CoreResult<ForecastEntry> {
        if !self.phase.accepts_input() {
            return Err(CoreError::validation("The entry is not ready to be submitted"));
        }
        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            self.phase = EditorPhase::ValidationFailed(missing.clone());
            return Err(CoreError::MissingFields { fields: missing });
        }
        self.phase = EditorPhase::Submitting;
        Ok(self.form.to_entry(self.id))
    }

    pub fn submit_succeeded(&mut self) {
        self.reset_form();
        self.phase = EditorPhase::Saved;
    }

    pub fn submit_failed(&mut self) {
        self.phase = EditorPhase::Loaded;
    }

    /// Drop every unsaved input
    pub fn reset_form(&mut self) {
        self.form = FormModel::empty(&self.default_currency);
        self.mode_options.clear();
        self.account_options.clear();
        self.corporate_id = None;
    }

    pub fn apply_directory(&mut self, corporates: Vec<Corporate>) {
        self.directory = corporates.clone();
        self.corporates = corporates;
        self.corporate_id = self.lookup_corporate_id().or(self.corporate_id);
    }

    /// Narrow the picker; an empty result list restores nothing
    pub fn apply_corporate_search(&mut self, corporates: Vec<Corporate>) {
        self.corporates = corporates;
    }

    pub fn clear_corporate_search(&mut self) {
        self.corporates = self.directory.clone();
    }

    /// Copy a picked corporate into the form
    pub fn select_corporate(&mut self, id: u64) -> CoreResult<()> {
        let corporate = self
            .corporates
            .iter()
            .chain(self.directory.iter())
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                what: format!("corporate {}", id),
            })?;
        self.corporate_id = Some(corporate.id);
        self.form.corporate_code = corporate.corporate_code;
        self.form.corporate_name = corporate.corporate_name;
        if self.phase.accepts_input() {
            self.phase = EditorPhase::Editing;
        }
        Ok(())
    }

    /// Corporate id and account type, when both are known
    pub fn account_lookup_key(&self) -> Option<(u64, String)> {
        let account_type = self.form.account_type.trim();
        if account_type.is_empty() || self.form.corporate_code.trim().is_empty() {
            return None;
        }
        Some((self.corporate_id?, account_type.to_string()))
    }

    /// Replace the static account numbers with the remote ones, when there are any
    pub fn apply_remote_accounts(&mut self, accounts: &[AccountOption]) {
        if accounts.is_empty() {
            return;
        }
        self.account_options = accounts
            .iter()
            .map(|a| SelectOption::new(&a.account_number, &a.account_number))
            .collect();
        self.keep_current_account_number();
    }

    fn lookup_corporate_id(&self) -> Option<u64> {
        let code = self.form.corporate_code.trim();
        self.directory
            .iter()
            .find(|c| c.corporate_code == code)
            .map(|c| c.id)
    }

    fn keep_current_account_number(&mut self) {
        let current = self.form.account_number.trim();
        if !current.is_empty() && !self.account_options.iter().any(|o| o.value == current) {
            self.account_options.push(SelectOption::new(current, current));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_entry() -> ForecastEntry {
        ForecastEntry {
            id: Some(5),
            corporate_code: "C01".to_string(),
            corporate_name: "Acme".to_string(),
            forecasting_as: "Inward Payment".to_string(),
            entry_type: "O".to_string(),
            narration: "Invoice 42".to_string(),
            mode: "cash".to_string(),
            account_type: "internalAccount".to_string(),
            account_number: "internalAcc001".to_string(),
            forecasted_amount: Some(Decimal::new(250075, 2)),
            value_date: "2026-11-01".to_string(),
            ..Default::default()
        }
    }

    fn loaded(entry: &ForecastEntry) -> EditorState {
        let mut state = EditorState::loading(5, "INR");
        state.apply_entry(entry);
        state
    }

    #[test]
    fn test_lookup_tables() {
        let inward = mode_options("Inward Payment");
        assert_eq!(inward[0], SelectOption::new("accountDeposit", "Account Deposit"));
        assert_eq!(mode_options("Outward Payment")[0].value, "accountWithdrawal");
        assert!(mode_options("Sideways").is_empty());
        assert_eq!(static_account_options("externalAccount").len(), 2);
    }

    #[test]
    fn test_load_derives_options() {
        let state = loaded(&complete_entry());
        assert_eq!(state.phase, EditorPhase::Loaded);
        assert_eq!(state.form.currency, "INR");
        assert_eq!(state.mode_options.len(), 2);
        assert_eq!(state.account_options[0].value, "internalAcc001");
        assert_eq!(state.form.date_fields(), DateFields::ValueDate);
    }

    #[test]
    fn test_unknown_account_number_kept_as_option() {
        let mut entry = complete_entry();
        entry.account_number = "ACC-77".to_string();
        let state = loaded(&entry);
        assert!(state.account_options.iter().any(|o| o.value == "ACC-77"));
    }

    #[test]
    fn test_missing_narration_blocks_submit() {
        let mut entry = complete_entry();
        entry.narration.clear();
        let mut state = loaded(&entry);

        let err = state.begin_submit().unwrap_err();
        assert!(matches!(err, CoreError::MissingFields { ref fields } if fields == &["narration".to_string()]));
        assert_eq!(state.phase, EditorPhase::ValidationFailed(vec!["narration".to_string()]));
    }

    #[test]
    fn test_bad_amount_reported_missing() {
        let mut state = loaded(&complete_entry());
        state.edit("forecastedAmount", "twelve").unwrap();
        assert_eq!(state.form.missing_fields(), vec!["forecastedAmount".to_string()]);

        state.edit("forecastedAmount", "1,200.50").unwrap();
        assert_eq!(state.form.amount(), Some(Decimal::new(120050, 2)));
    }

    #[test]
    fn test_submit_cycle() {
        let mut state = loaded(&complete_entry());
        state.edit("narration", "Invoice 43").unwrap();
        assert_eq!(state.phase, EditorPhase::Editing);

        let entry = state.begin_submit().unwrap();
        assert_eq!(state.phase, EditorPhase::Submitting);
        assert_eq!(entry.id, Some(5));
        assert_eq!(entry.narration, "Invoice 43");
        assert_eq!(entry.forecasted_amount, Some(Decimal::new(250075, 2)));

        state.submit_failed();
        assert_eq!(state.phase, EditorPhase::Loaded);
        state.begin_submit().unwrap();
        state.submit_succeeded();
        assert_eq!(state.phase, EditorPhase::Saved);
        assert!(state.form.narration.is_empty());
        assert_eq!(state.form.currency, "INR");
    }

    #[test]
    fn test_direction_change_recomputes_modes() {
        let mut state = loaded(&complete_entry());
        state.edit("mode", "accountDeposit").unwrap();
        let effect = state.edit("forecastingAs", "Outward Payment").unwrap();
        assert_eq!(effect, FieldEffect::ModeOptions);
        assert_eq!(state.mode_options[0].value, "accountWithdrawal");
        assert!(state.form.mode.is_empty());
    }

    #[test]
    fn test_shared_mode_survives_direction_change() {
        let mut state = loaded(&complete_entry());
        state.edit("forecastingAs", "Outward Payment").unwrap();
        assert_eq!(state.form.mode, "cash");
    }

    #[test]
    fn test_account_type_change() {
        let mut state = loaded(&complete_entry());
        let effect = state.edit("accountType", "externalAccount").unwrap();
        assert_eq!(effect, FieldEffect::AccountNumbers);
        assert!(state.form.account_number.is_empty());
        assert_eq!(state.account_options[1].value, "externalAcc002");
    }

    #[test]
    fn test_entry_type_visibility() {
        assert_eq!(DateFields::for_entry_type("R"), DateFields::Recurrence);
        assert_eq!(DateFields::for_entry_type(""), DateFields::Hidden);
    }

    #[test]
    fn test_input_refused_while_loading() {
        let mut state = EditorState::loading(5, "INR");
        assert!(state.edit("narration", "x").is_err());
        assert!(state.begin_submit().is_err());
    }

    #[test]
    fn test_corporate_picker() {
        let mut state = loaded(&complete_entry());
        state.apply_directory(vec![
            Corporate { id: 1, corporate_code: "C01".to_string(), corporate_name: "Acme".to_string() },
            Corporate { id: 2, corporate_code: "C02".to_string(), corporate_name: "Globex".to_string() },
        ]);
        assert_eq!(state.corporate_id, Some(1));
        assert_eq!(state.account_lookup_key(), Some((1, "internalAccount".to_string())));

        state.apply_corporate_search(vec![state.directory[1].clone()]);
        state.select_corporate(2).unwrap();
        assert_eq!(state.form.corporate_code, "C02");
        assert_eq!(state.form.corporate_name, "Globex");
        assert_eq!(state.corporate_id, Some(2));

        state.clear_corporate_search();
        assert_eq!(state.corporates.len(), 2);
        assert!(state.select_corporate(99).is_err());
    }

    #[test]
    fn test_remote_accounts_replace_static() {
        let mut state = loaded(&complete_entry());
        state.apply_remote_accounts(&[AccountOption {
            account_number: "AC-1".to_string(),
            account_title: None,
        }]);
        let values: Vec<&str> = state.account_options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["AC-1", "internalAcc001"]);

        state.apply_remote_accounts(&[]);
        assert_eq!(state.account_options.len(), 2);
    }

    #[test]
    fn test_lock_record_flag() {
        let mut form = FormModel::empty("INR");
        form.set("lockRecord", "on").unwrap();
        assert!(form.lock_record);
        form.set("lockRecord", "").unwrap();
        assert!(!form.lock_record);
        assert!(form.set("colour", "red").is_err());
    }
}
