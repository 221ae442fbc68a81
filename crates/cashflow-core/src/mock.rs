//! In-memory gateway for orchestration tests

use async_trait::async_trait;
use cashflow_config::WorkflowStatus;
use cashflow_gateway::{
    AccountOption, AccountSearchField, AccountSummary, Corporate, DateWindow, ForecastEntry,
    ForecastGatewayTrait, GatewayError, GatewayResult, ListingRow, Page, PageRequest,
    RejectionRequest, SearchField, TransactionSummary,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    List(WorkflowStatus, PageRequest),
    Search(WorkflowStatus, SearchField, String),
    Reject(RejectionRequest),
    AuthorizeAll(Vec<u64>),
    Authorize(u64),
    Forecast(u64),
    UpdateForecast(u64, ForecastEntry),
    Corporates(PageRequest),
    CorporatesByCode(String),
    CorporatesByName(String),
    AccountsByType(String, u64),
    SearchAccounts(AccountSearchField, String),
    RangeSummary(String, Option<DateWindow>),
}

/// Calls that can be held open by a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Gated {
    List,
    Forecast,
    RangeSummary,
}

struct Gate {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

pub(crate) struct MockGateway {
    rows: Mutex<HashMap<WorkflowStatus, Vec<ListingRow>>>,
    entries: Mutex<HashMap<u64, ForecastEntry>>,
    directory: Vec<Corporate>,
    calls: Mutex<Vec<Call>>,
    fail_reads: AtomicBool,
    fail_mutations: AtomicBool,
    gates: Mutex<HashMap<Gated, Gate>>,
}

fn row(id: u64, status: WorkflowStatus) -> ListingRow {
    ListingRow {
        id,
        reference_no: format!("REF-{}", id),
        corporate_code: "C01".to_string(),
        corporate_name: "Acme".to_string(),
        forecasting_as: "Inward Payment".to_string(),
        entry_type: "O".to_string(),
        forecasted_amount: Some(Decimal::new(1000 * id as i64, 0)),
        currency: "INR".to_string(),
        status,
        ..Default::default()
    }
}

fn slice(rows: &[ListingRow], page: PageRequest) -> Page<ListingRow> {
    let size = page.size.max(1) as usize;
    let total = rows.len();
    Page {
        content: rows
            .iter()
            .skip(page.page as usize * size)
            .take(size)
            .cloned()
            .collect(),
        total_pages: ((total + size - 1) / size) as u32,
        total_elements: total as u64,
    }
}

fn refused() -> GatewayError {
    GatewayError::Envelope {
        code: 409,
        status: "error".to_string(),
        message: "refused".to_string(),
    }
}

fn unreachable_host() -> GatewayError {
    GatewayError::Server {
        status: 503,
        message: "unavailable".to_string(),
    }
}

impl MockGateway {
    /// Pending rows with ids `1..=count`, nothing else
    pub(crate) fn with_pending(count: u64) -> Self {
        let mut rows = HashMap::new();
        rows.insert(
            WorkflowStatus::Pending,
            (1..=count).map(|id| row(id, WorkflowStatus::Pending)).collect(),
        );
        rows.insert(WorkflowStatus::Rejected, Vec::new());
        rows.insert(WorkflowStatus::Review, Vec::new());
        Self {
            rows: Mutex::new(rows),
            entries: Mutex::new(HashMap::new()),
            directory: vec![
                Corporate {
                    id: 1,
                    corporate_code: "C01".to_string(),
                    corporate_name: "Acme".to_string(),
                },
                Corporate {
                    id: 2,
                    corporate_code: "C02".to_string(),
                    corporate_name: "Globex".to_string(),
                },
            ],
            calls: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn add_rejected(&self, id: u64) {
        let mut rows = self.rows.lock().unwrap();
        rows.entry(WorkflowStatus::Rejected)
            .or_default()
            .push(row(id, WorkflowStatus::Rejected));
    }

    pub(crate) fn put_entry(&self, id: u64, entry: ForecastEntry) {
        self.entries.lock().unwrap().insert(id, entry);
    }

    pub(crate) fn entry(&self, id: u64) -> Option<ForecastEntry> {
        self.entries.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::List(..))).count()
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Hold the next call of `kind` until the returned sender fires
    pub(crate) fn gate_next(&self, kind: Gated) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(
            kind,
            Gate {
                entered: entered_tx,
                release: release_rx,
            },
        );
        (entered_rx, release_tx)
    }

    async fn pass_gate(&self, kind: Gated) {
        let gate = self.gates.lock().unwrap().remove(&kind);
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.await;
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_read(&self) -> GatewayResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unreachable_host());
        }
        Ok(())
    }

    fn check_mutation(&self) -> GatewayResult<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(refused());
        }
        Ok(())
    }

    fn move_rows(&self, ids: &[u64], to: WorkflowStatus, reason: Option<&str>) {
        let mut rows = self.rows.lock().unwrap();
        let pending = rows.entry(WorkflowStatus::Pending).or_default();
        let (moved, kept): (Vec<ListingRow>, Vec<ListingRow>) =
            pending.drain(..).partition(|r| ids.contains(&r.id));
        *pending = kept;
        let target = rows.entry(to).or_default();
        for mut r in moved {
            r.status = to;
            r.rejection_reason = reason.map(str::to_string);
            target.push(r);
        }
    }
}

#[async_trait]
impl ForecastGatewayTrait for MockGateway {
    async fn list(&self, status: WorkflowStatus, page: PageRequest) -> GatewayResult<Page<ListingRow>> {
        self.record(Call::List(status, page));
        self.pass_gate(Gated::List).await;
        self.check_read()?;
        let rows = self.rows.lock().unwrap();
        Ok(slice(rows.get(&status).map(Vec::as_slice).unwrap_or(&[]), page))
    }

    async fn search(
        &self,
        status: WorkflowStatus,
        field: SearchField,
        value: &str,
        page: PageRequest,
    ) -> GatewayResult<Page<ListingRow>> {
        self.record(Call::Search(status, field, value.to_string()));
        self.check_read()?;
        let rows = self.rows.lock().unwrap();
        let matching: Vec<ListingRow> = rows
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(|r| match field {
                SearchField::ReferenceNo => r.reference_no == value,
                SearchField::CorporateCode => r.corporate_code == value,
                SearchField::CorporateName => r.corporate_name == value,
                SearchField::ForecastingAs => r.forecasting_as == value,
                SearchField::EntryType => r.entry_type == value,
            })
            .cloned()
            .collect();
        Ok(slice(&matching, page))
    }

    async fn reject(&self, request: &RejectionRequest) -> GatewayResult<()> {
        self.record(Call::Reject(request.clone()));
        self.check_mutation()?;
        self.move_rows(&request.ids, WorkflowStatus::Rejected, Some(&request.rejection_reason));
        Ok(())
    }

    async fn authorize_all(&self, ids: &[u64]) -> GatewayResult<()> {
        self.record(Call::AuthorizeAll(ids.to_vec()));
        self.check_mutation()?;
        self.move_rows(ids, WorkflowStatus::Review, None);
        Ok(())
    }

    async fn authorize(&self, id: u64) -> GatewayResult<()> {
        self.record(Call::Authorize(id));
        self.check_mutation()?;
        self.move_rows(&[id], WorkflowStatus::Review, None);
        Ok(())
    }

    async fn forecast(&self, id: u64) -> GatewayResult<ForecastEntry> {
        self.record(Call::Forecast(id));
        self.check_read()?;
        // read before holding, so a held call answers with the data of its time
        let found = self.entry(id).ok_or_else(|| GatewayError::Envelope {
            code: 404,
            status: "error".to_string(),
            message: format!("forecast {} not found", id),
        });
        self.pass_gate(Gated::Forecast).await;
        found
    }

    async fn update_forecast(&self, id: u64, entry: &ForecastEntry) -> GatewayResult<()> {
        self.record(Call::UpdateForecast(id, entry.clone()));
        self.check_mutation()?;
        self.put_entry(id, entry.clone());
        Ok(())
    }

    async fn corporates(&self, page: PageRequest) -> GatewayResult<Vec<Corporate>> {
        self.record(Call::Corporates(page));
        self.check_read()?;
        Ok(self.directory.clone())
    }

    async fn corporates_by_code(&self, code: &str) -> GatewayResult<Vec<Corporate>> {
        self.record(Call::CorporatesByCode(code.to_string()));
        Ok(self.directory.iter().filter(|c| c.corporate_code == code).cloned().collect())
    }

    async fn corporates_by_name(&self, name: &str) -> GatewayResult<Vec<Corporate>> {
        self.record(Call::CorporatesByName(name.to_string()));
        Ok(self.directory.iter().filter(|c| c.corporate_name == name).cloned().collect())
    }

    async fn accounts_by_type(&self, account_type: &str, corporate_id: u64) -> GatewayResult<Vec<AccountOption>> {
        self.record(Call::AccountsByType(account_type.to_string(), corporate_id));
        self.check_read()?;
        Ok(vec![AccountOption {
            account_number: format!("AC-{}", corporate_id),
            account_title: None,
        }])
    }

    async fn search_accounts(&self, field: AccountSearchField, value: &str) -> GatewayResult<Vec<AccountSummary>> {
        self.record(Call::SearchAccounts(field, value.to_string()));
        self.check_read()?;
        if value == "AC-404" {
            return Ok(Vec::new());
        }
        Ok(vec![AccountSummary {
            account_number: value.to_string(),
            account_title: "Operating".to_string(),
            ..Default::default()
        }])
    }

    async fn range_summary(
        &self,
        account_number: &str,
        window: Option<DateWindow>,
    ) -> GatewayResult<Option<TransactionSummary>> {
        self.record(Call::RangeSummary(account_number.to_string(), window));
        self.pass_gate(Gated::RangeSummary).await;
        self.check_read()?;
        Ok(Some(TransactionSummary {
            opening_balance: Decimal::new(1000, 0),
            closing_balance: Decimal::new(1200, 0),
            ..Default::default()
        }))
    }
}
