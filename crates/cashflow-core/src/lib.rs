//! Back-office view state and workflow orchestration
//!
//! [`Backoffice`] owns the state of the three screens (listing, entry editor,
//! summary dashboard) and drives the remote API through a
//! [`ForecastGatewayTrait`](cashflow_gateway::ForecastGatewayTrait). Every
//! operation ends in a [`Notice`] for the user; errors are logged and never
//! returned to the web layer.
//!
//! State locks are never held while a remote call is in flight. Each logical
//! query has its own [`RequestGeneration`], so a response that arrives after
//! a newer request was issued is dropped instead of overwriting fresher data.

pub mod bulk;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod generation;
pub mod listing;
pub mod notice;
pub mod pagination;
pub mod selection;

#[cfg(test)]
mod mock;

use cashflow_config::{Config, WorkflowStatus};
use cashflow_gateway::{
    remote_account_type, GatewayRef, GatewayResult, ListingRow, Page, PageRequest, SearchField,
};
use dashboard::{AccountCriteria, DashboardState};
use editor::{CorporateSearchField, EditorState, FieldEffect};
use listing::{ActiveSearch, ListingSnapshot, ListingState};
use std::sync::Arc;
use tokio::sync::RwLock;

pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
pub use generation::{RequestGeneration, Ticket};
pub use notice::{Notice, NoticeLevel};

const LOG_TARGET: &str = "cashflow::backoffice";

// ==================== Messages ====================

pub const FETCH_FAILED: &str = "An error occurred while fetching the data.";
pub const SEARCH_VALUE_REQUIRED: &str = "Please enter a search value first";
pub const AUTHORIZED_BULK: &str = "Your data is verified to authorize";
pub const AUTHORIZED_SINGLE: &str = "Your data is ready to review";
pub const AUTHORIZE_FAILED: &str = "An error occurred while authorizing the entry.";
pub const REJECTED: &str = "Entry rejected successfully.";
pub const REJECT_FAILED: &str = "An error occurred while rejecting the entry.";
pub const ENTRY_NOT_LOADED: &str = "The entry is not loaded. Open it from the listing first.";
pub const LOAD_FAILED: &str = "Failed to load the forecast entry.";
pub const UPDATED: &str = "Update successful!";
pub const UPDATE_REFUSED: &str = "Failed to update data";
pub const UPDATE_FAILED: &str = "Error occurred while updating the forecast.";
pub const CORPORATE_FIRST: &str = "Please add corporate code and select an account type first";
pub const DIRECTORY_FAILED: &str = "Error fetching corporate details";
pub const ACCOUNTS_FAILED: &str = "Error occurred while fetching accounts.";
pub const NO_ACCOUNT_DATA: &str = "No data found.";
pub const ACCOUNT_SEARCH_FAILED: &str = "Error fetching data. Please try again later.";
pub const NO_SUMMARY: &str = "No yearly summary data found.";
pub const SUMMARY_FAILED: &str = "Error fetching yearly summary. Please try again later.";

fn no_results(message: impl Into<String>) -> Notice {
    Notice::from_error(&CoreError::no_results(message), FETCH_FAILED)
}

/// Result of submitting the entry editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub notice: Notice,
    /// The update was accepted; the caller should return to the listing
    pub saved: bool,
}

/// Shared back-office service
pub struct Backoffice {
    config: Config,
    gateway: GatewayRef,
    logger: Arc<dyn ErrorLogger>,
    listing: RwLock<ListingState>,
    listing_generation: RequestGeneration,
    editor: RwLock<Option<EditorState>>,
    editor_generation: RequestGeneration,
    directory_generation: RequestGeneration,
    corporate_search_generation: RequestGeneration,
    accounts_generation: RequestGeneration,
    dashboard: RwLock<DashboardState>,
    dashboard_generation: RequestGeneration,
    summary_generation: RequestGeneration,
}

impl Backoffice {
    pub fn new(config: Config, gateway: GatewayRef) -> Self {
        let listing = ListingState::new(config.listing.default_status, config.listing.page_size);
        Self {
            config,
            gateway,
            logger: Arc::new(DefaultErrorLogger),
            listing: RwLock::new(listing),
            listing_generation: RequestGeneration::new(),
            editor: RwLock::new(None),
            editor_generation: RequestGeneration::new(),
            directory_generation: RequestGeneration::new(),
            corporate_search_generation: RequestGeneration::new(),
            accounts_generation: RequestGeneration::new(),
            dashboard: RwLock::new(DashboardState::default()),
            dashboard_generation: RequestGeneration::new(),
            summary_generation: RequestGeneration::new(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All settings as JSON, for the settings page
    pub fn settings(&self) -> serde_json::Value {
        serde_json::json!({
            "server": serde_json::to_value(&self.config.server).unwrap_or_default(),
            "api": serde_json::to_value(&self.config.api).unwrap_or_default(),
            "listing": serde_json::to_value(&self.config.listing).unwrap_or_default(),
            "entry": serde_json::to_value(&self.config.entry).unwrap_or_default(),
            "dashboard": serde_json::to_value(&self.config.dashboard).unwrap_or_default(),
            "logging": serde_json::to_value(&self.config.logging).unwrap_or_default(),
        })
    }

    fn report(&self, operation: &str, error: CoreError, fallback: &str) -> Notice {
        self.logger.log_error(&error, &ErrorContext::new(operation));
        Notice::from_error(&error, fallback)
    }

    // ==================== Listing ====================

    pub async fn listing(&self) -> ListingState {
        self.listing.read().await.clone()
    }

    pub async fn listing_snapshot(&self) -> ListingSnapshot {
        self.listing.read().await.snapshot()
    }

    /// Fetch one page of a status; the status becomes the current one
    pub async fn load_page(&self, status: WorkflowStatus, page: u32, size: u32) -> Option<Notice> {
        let size = size.max(1);
        let (search, ticket) = {
            let mut listing = self.listing.write().await;
            if listing.status != status {
                listing.switch_status(status);
            }
            listing.pagination.size = size;
            (listing.search.clone(), self.listing_generation.issue())
        };

        let mut index = page;
        let mut clamped = false;
        loop {
            let result = self.fetch_rows(status, search.as_ref(), PageRequest::new(index, size)).await;
            let mut listing = self.listing.write().await;
            if !self.listing_generation.is_current(ticket) {
                log::debug!(target: LOG_TARGET, "dropping stale {} page {}", status, index);
                return None;
            }
            match result {
                // The page vanished, e.g. its last row was just authorized
                Ok(rows) if !clamped && rows.is_empty() && rows.total_pages > 0 && index >= rows.total_pages => {
                    index = rows.total_pages - 1;
                    clamped = true;
                }
                Ok(rows) => {
                    log::debug!(
                        target: LOG_TARGET,
                        "{} page {}: {} rows of {}",
                        status,
                        index,
                        rows.content.len(),
                        rows.total_elements
                    );
                    listing.apply_page(index, rows);
                    return None;
                }
                Err(e) => {
                    listing.apply_failure();
                    drop(listing);
                    return Some(self.report("load_page", e.into(), FETCH_FAILED));
                }
            }
        }
    }

    async fn fetch_rows(
        &self,
        status: WorkflowStatus,
        search: Option<&ActiveSearch>,
        page: PageRequest,
    ) -> GatewayResult<Page<ListingRow>> {
        match search {
            Some(s) => self.gateway.search(status, s.field, &s.value, page).await,
            None => self.gateway.list(status, page).await,
        }
    }

    /// Reload the current page of the current status
    pub async fn refresh(&self) -> Option<Notice> {
        let (status, page, size) = self.position().await;
        self.load_page(status, page, size).await
    }

    async fn position(&self) -> (WorkflowStatus, u32, u32) {
        let listing = self.listing.read().await;
        (listing.status, listing.pagination.page, listing.pagination.size)
    }

    /// Show another status from its first page
    pub async fn switch_status(&self, status: WorkflowStatus) -> Option<Notice> {
        let size = {
            let mut listing = self.listing.write().await;
            listing.switch_status(status);
            listing.pagination.size
        };
        log::info!(target: LOG_TARGET, "listing switched to {}", status);
        self.load_page(status, 0, size).await
    }

    /// Next page; nothing is fetched on the last page
    pub async fn next_page(&self) -> Option<Notice> {
        let (status, next, size) = {
            let listing = self.listing.read().await;
            (listing.status, listing.pagination.next_page(), listing.pagination.size)
        };
        match next {
            Some(page) => self.load_page(status, page, size).await,
            None => None,
        }
    }

    /// Previous page; nothing is fetched on page 0
    pub async fn previous_page(&self) -> Option<Notice> {
        let (status, previous, size) = {
            let listing = self.listing.read().await;
            (listing.status, listing.pagination.previous_page(), listing.pagination.size)
        };
        match previous {
            Some(page) => self.load_page(status, page, size).await,
            None => None,
        }
    }

    /// Narrow the current status by one field, from page 0
    pub async fn search(&self, field: SearchField, value: &str) -> Option<Notice> {
        let value = value.trim();
        if value.is_empty() {
            return Some(Notice::error(SEARCH_VALUE_REQUIRED));
        }
        let (status, size) = {
            let mut listing = self.listing.write().await;
            listing.search = Some(ActiveSearch {
                field,
                value: value.to_string(),
            });
            listing.pagination.reset();
            (listing.status, listing.pagination.size)
        };
        if let Some(notice) = self.load_page(status, 0, size).await {
            return Some(notice);
        }

        let listing = self.listing.read().await;
        let ours = listing.search.as_ref().map(|s| s.value == value).unwrap_or(false);
        if ours && listing.loaded && listing.rows.is_empty() {
            return Some(no_results(format!(
                "No matching data found for \"{}\". Please try again with different criteria.",
                value
            )));
        }
        None
    }

    /// Drop the search and show the plain listing again
    pub async fn clear_search(&self) -> Option<Notice> {
        let (status, size) = {
            let mut listing = self.listing.write().await;
            listing.search = None;
            listing.pagination.reset();
            (listing.status, listing.pagination.size)
        };
        self.load_page(status, 0, size).await
    }

    pub async fn toggle_row(&self, id: u64) -> Option<bool> {
        self.listing.write().await.selection.toggle_row(id)
    }

    pub async fn toggle_all(&self, checked: bool) {
        self.listing.write().await.selection.toggle_all(checked);
    }

    /// Authorize every selected row
    pub async fn authorize(&self) -> Notice {
        let selected = self.listing.read().await.selection.selected_ids().to_vec();
        let ids = match bulk::authorize_targets(&selected) {
            Ok(ids) => ids,
            Err(e) => return Notice::from_error(&e, FETCH_FAILED),
        };

        match self.gateway.authorize_all(&ids).await {
            Ok(()) => {
                log::info!(target: LOG_TARGET, "authorized {:?}", ids);
                self.after_action().await;
                Notice::success(AUTHORIZED_BULK)
            }
            Err(e) => self.report("authorize", e.into(), AUTHORIZE_FAILED),
        }
    }

    /// Authorize one row, moving it to review
    pub async fn authorize_single(&self, id: u64) -> Notice {
        match self.gateway.authorize(id).await {
            Ok(()) => {
                log::info!(target: LOG_TARGET, "authorized {}", id);
                self.after_action().await;
                Notice::success(AUTHORIZED_SINGLE)
            }
            Err(e) => self.report("authorize_single", e.into(), AUTHORIZE_FAILED),
        }
    }

    /// Open the reject dialog for one row, or for the bulk selection
    pub async fn open_reject_dialog(&self, single_target: Option<u64>) -> Option<Notice> {
        let mut listing = self.listing.write().await;
        if single_target.is_none() {
            if let Err(e) = bulk::can_open_bulk_reject(listing.selection.selected_ids()) {
                return Some(Notice::from_error(&e, REJECT_FAILED));
            }
        }
        listing.open_reject_dialog(single_target);
        None
    }

    pub async fn cancel_reject_dialog(&self) {
        self.listing.write().await.cancel_reject_dialog();
    }

    /// Reject the dialog's target with a reason
    pub async fn reject(&self, reason: &str) -> Notice {
        let request = {
            let mut listing = self.listing.write().await;
            listing.reject.reason = reason.to_string();
            bulk::rejection_request(reason, listing.reject.single_target, listing.selection.selected_ids())
        };
        let request = match request {
            Ok(request) => request,
            Err(e) => return Notice::from_error(&e, REJECT_FAILED),
        };

        match self.gateway.reject(&request).await {
            Ok(()) => {
                log::info!(target: LOG_TARGET, "rejected {:?}", request.ids);
                self.after_action().await;
                Notice::success(REJECTED)
            }
            Err(e) => {
                self.listing.write().await.cancel_reject_dialog();
                self.report("reject", e.into(), REJECT_FAILED)
            }
        }
    }

    async fn after_action(&self) {
        self.listing.write().await.finish_action();
        if let Some(notice) = self.refresh().await {
            log::warn!(target: LOG_TARGET, "reload after action failed: {}", notice.message);
        }
    }

    // ==================== Entry editor ====================

    /// Editor state when `id` is the open entry
    pub async fn editor(&self, id: u64) -> Option<EditorState> {
        self.editor.read().await.as_ref().filter(|e| e.id == id).cloned()
    }

    async fn with_editor<R>(&self, id: u64, f: impl FnOnce(&mut EditorState) -> R) -> Option<R> {
        let mut guard = self.editor.write().await;
        guard.as_mut().filter(|e| e.id == id).map(f)
    }

    /// Load an entry, then its corporate directory, then its account numbers
    pub async fn load_entry(&self, id: u64) -> Option<Notice> {
        let ticket = self.editor_generation.issue();
        *self.editor.write().await = Some(EditorState::loading(id, &self.config.entry.default_currency));

        let result = self.gateway.forecast(id).await;
        {
            let mut guard = self.editor.write().await;
            if !self.editor_generation.is_current(ticket) {
                log::debug!(target: LOG_TARGET, "dropping stale entry {}", id);
                return None;
            }
            let editor = guard.as_mut().filter(|e| e.id == id)?;
            match result {
                Ok(entry) => editor.apply_entry(&entry),
                Err(e) => {
                    editor.apply_load_failure();
                    drop(guard);
                    return Some(self.report("load_entry", e.into(), LOAD_FAILED));
                }
            }
        }

        if let Some(notice) = self.refresh_directory(id).await {
            return Some(notice);
        }
        self.refresh_account_numbers(id).await
    }

    /// Fetch the corporate directory for the open entry
    pub async fn refresh_directory(&self, id: u64) -> Option<Notice> {
        let ticket = self.directory_generation.issue();
        let page = PageRequest::first(self.config.entry.corporate_page_size);
        let result = self.gateway.corporates(page).await;
        match result {
            Ok(corporates) => {
                let generation = &self.directory_generation;
                self.with_editor(id, |e| {
                    if generation.is_current(ticket) {
                        e.apply_directory(corporates);
                    }
                })
                .await;
                None
            }
            Err(e) => Some(self.report("corporate_directory", e.into(), DIRECTORY_FAILED)),
        }
    }

    async fn refresh_account_numbers(&self, id: u64) -> Option<Notice> {
        let (corporate_id, account_type) = self.with_editor(id, |e| e.account_lookup_key()).await.flatten()?;
        let ticket = self.accounts_generation.issue();
        let result = self
            .gateway
            .accounts_by_type(&remote_account_type(&account_type), corporate_id)
            .await;
        match result {
            Ok(accounts) => {
                let generation = &self.accounts_generation;
                self.with_editor(id, |e| {
                    if generation.is_current(ticket) && e.form.account_type == account_type {
                        e.apply_remote_accounts(&accounts);
                    }
                })
                .await;
                None
            }
            Err(e) => Some(self.report("account_numbers", e.into(), ACCOUNTS_FAILED)),
        }
    }

    /// Change one form input
    pub async fn edit_field(&self, id: u64, name: &str, value: &str) -> Option<Notice> {
        let effect = match self.with_editor(id, |e| e.edit(name, value)).await {
            None => return Some(Notice::error(ENTRY_NOT_LOADED)),
            Some(Err(e)) => return Some(Notice::from_error(&e, ENTRY_NOT_LOADED)),
            Some(Ok(effect)) => effect,
        };
        if effect != FieldEffect::AccountNumbers {
            return None;
        }
        let corporate_missing = self
            .with_editor(id, |e| e.form.corporate_code.trim().is_empty())
            .await
            .unwrap_or(true);
        if corporate_missing {
            return Some(Notice::error(CORPORATE_FIRST));
        }
        self.refresh_account_numbers(id).await
    }

    /// Validate and send the form
    pub async fn submit_entry(&self, id: u64) -> SubmitOutcome {
        let entry = match self.with_editor(id, |e| e.begin_submit()).await {
            None => {
                return SubmitOutcome {
                    notice: Notice::error(ENTRY_NOT_LOADED),
                    saved: false,
                }
            }
            // validation stops here, nothing to log
            Some(Err(e)) => {
                return SubmitOutcome {
                    notice: Notice::from_error(&e, UPDATE_FAILED),
                    saved: false,
                }
            }
            Some(Ok(entry)) => entry,
        };

        match self.gateway.update_forecast(id, &entry).await {
            Ok(()) => {
                log::info!(target: LOG_TARGET, "entry {} updated", id);
                self.with_editor(id, |e| e.submit_succeeded()).await;
                SubmitOutcome {
                    notice: Notice::success(UPDATED),
                    saved: true,
                }
            }
            Err(e) => {
                self.with_editor(id, |e| e.submit_failed()).await;
                let fallback = if e.is_transport() { UPDATE_FAILED } else { UPDATE_REFUSED };
                SubmitOutcome {
                    notice: self.report("submit_entry", e.into(), fallback),
                    saved: false,
                }
            }
        }
    }

    /// Drop the open entry and its unsaved inputs
    pub async fn cancel_entry(&self, id: u64) {
        let mut guard = self.editor.write().await;
        if guard.as_ref().map(|e| e.id == id).unwrap_or(false) {
            if let Some(editor) = guard.as_mut() {
                editor.reset_form();
            }
            *guard = None;
            self.editor_generation.invalidate();
        }
    }

    /// Filter the corporate picker by code or name; a blank term shows everything
    pub async fn search_corporates(&self, id: u64, field: CorporateSearchField, term: &str) -> Option<Notice> {
        let term = term.trim();
        if term.is_empty() {
            self.with_editor(id, |e| e.clear_corporate_search()).await;
            return None;
        }
        let ticket = self.corporate_search_generation.issue();
        let result = match field {
            CorporateSearchField::CorporateCode => self.gateway.corporates_by_code(term).await,
            CorporateSearchField::CorporateName => self.gateway.corporates_by_name(term).await,
        };
        match result {
            Ok(found) => {
                let empty = found.is_empty();
                let generation = &self.corporate_search_generation;
                self.with_editor(id, |e| {
                    if generation.is_current(ticket) {
                        e.apply_corporate_search(found);
                    }
                })
                .await;
                empty.then(|| no_results(format!("No corporates match \"{}\".", term)))
            }
            Err(e) => Some(self.report("search_corporates", e.into(), DIRECTORY_FAILED)),
        }
    }

    /// Copy a corporate into the form and refresh its account numbers
    pub async fn select_corporate(&self, id: u64, corporate_id: u64) -> Option<Notice> {
        match self.with_editor(id, |e| e.select_corporate(corporate_id)).await {
            None => Some(Notice::error(ENTRY_NOT_LOADED)),
            Some(Err(e)) => Some(Notice::from_error(&e, DIRECTORY_FAILED)),
            Some(Ok(())) => self.refresh_account_numbers(id).await,
        }
    }

    // ==================== Dashboard ====================

    pub async fn dashboard(&self) -> DashboardState {
        self.dashboard.read().await.clone()
    }

    /// Look up accounts, then the summary of the first match
    pub async fn search_accounts(&self, field: Option<&str>, value: &str) -> Option<Notice> {
        let criteria = match AccountCriteria::parse(field, value) {
            Ok(criteria) => criteria,
            Err(e) => {
                self.dashboard.write().await.error = Some(e.to_string());
                return Some(Notice::from_error(&e, ACCOUNT_SEARCH_FAILED));
            }
        };
        let ticket = {
            let mut dashboard = self.dashboard.write().await;
            dashboard.begin_search(criteria.clone());
            self.dashboard_generation.issue()
        };

        let result = self.gateway.search_accounts(criteria.field, &criteria.value).await;
        let (account, window) = {
            let mut dashboard = self.dashboard.write().await;
            if !self.dashboard_generation.is_current(ticket) {
                log::debug!(target: LOG_TARGET, "dropping stale account search {:?}", criteria.value);
                return None;
            }
            match result {
                Ok(accounts) if accounts.is_empty() => {
                    dashboard.apply_accounts(Vec::new());
                    dashboard.error = Some(NO_ACCOUNT_DATA.to_string());
                    return Some(no_results(NO_ACCOUNT_DATA));
                }
                Ok(accounts) => {
                    dashboard.apply_accounts(accounts);
                    (dashboard.first_account().map(str::to_string), dashboard.window)
                }
                Err(e) => {
                    dashboard.error = Some(ACCOUNT_SEARCH_FAILED.to_string());
                    drop(dashboard);
                    return Some(self.report("search_accounts", e.into(), ACCOUNT_SEARCH_FAILED));
                }
            }
        };

        match account {
            Some(account) => self.refresh_summary(&account, window).await,
            None => None,
        }
    }

    /// Open a forecast window at `input` and refresh the first account's summary
    pub async fn change_forecast_date(&self, input: &str) -> Option<Notice> {
        let months = self.config.dashboard.forecast_months;
        let (window, account) = {
            let mut dashboard = self.dashboard.write().await;
            match dashboard.set_forecast_date(input, months) {
                Ok(window) => (window, dashboard.first_account().map(str::to_string)),
                Err(e) => return Some(Notice::from_error(&e, SUMMARY_FAILED)),
            }
        };
        match account {
            Some(account) => self.refresh_summary(&account, Some(window)).await,
            None => None,
        }
    }

    /// Switch the summary between the forecast window and all time
    pub async fn toggle_date_range(&self, account_number: Option<&str>) -> Option<Notice> {
        let (window, account) = {
            let mut dashboard = self.dashboard.write().await;
            let account = account_number
                .map(str::to_string)
                .or_else(|| dashboard.first_account().map(str::to_string));
            match dashboard.toggle_range() {
                Ok(window) => (window, account),
                Err(e) => return Some(Notice::from_error(&e, SUMMARY_FAILED)),
            }
        };
        match account {
            Some(account) => self.refresh_summary(&account, window).await,
            None => None,
        }
    }

    async fn refresh_summary(
        &self,
        account_number: &str,
        window: Option<cashflow_gateway::DateWindow>,
    ) -> Option<Notice> {
        let ticket = self.summary_generation.issue();
        let result = self.gateway.range_summary(account_number, window).await;
        let mut dashboard = self.dashboard.write().await;
        if !self.summary_generation.is_current(ticket) {
            log::debug!(target: LOG_TARGET, "dropping stale summary for {}", account_number);
            return None;
        }
        match result {
            Ok(Some(summary)) => {
                dashboard.error = None;
                dashboard.apply_summary(account_number, summary);
                None
            }
            Ok(None) => {
                dashboard.error = Some(NO_SUMMARY.to_string());
                Some(no_results(NO_SUMMARY))
            }
            Err(e) => {
                dashboard.error = Some(SUMMARY_FAILED.to_string());
                drop(dashboard);
                Some(self.report("range_summary", e.into(), SUMMARY_FAILED))
            }
        }
    }
}

// ==================== Tests ====================
