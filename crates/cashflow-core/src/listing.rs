//! Listing view state
//!
//! [`ListingState`] holds the rows of one workflow status, their pagination,
//! the checkbox selection and the reject dialog. Every method is a plain
//! state transition; fetching is left to the orchestrator.

use crate::pagination::PaginationState;
use crate::selection::SelectionState;
use cashflow_config::WorkflowStatus;
use cashflow_gateway::{ListingRow, Page, SearchField};
use serde::{Deserialize, Serialize};

/// Which columns and controls a status shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet {
    /// Row checkboxes and the header toggle
    pub checkboxes: bool,
    /// Authorize all / reject all buttons
    pub bulk_actions: bool,
    /// Per-row authorize and reject icons
    pub row_actions: bool,
    /// Rejection reason column
    pub rejection_reason: bool,
    pub edit_link: bool,
    pub view_link: bool,
}

impl ColumnSet {
    pub fn for_status(status: WorkflowStatus) -> Self {
        match status {
            WorkflowStatus::Pending => Self {
                checkboxes: true,
                bulk_actions: true,
                row_actions: true,
                rejection_reason: false,
                edit_link: true,
                view_link: false,
            },
            WorkflowStatus::Rejected => Self {
                checkboxes: false,
                bulk_actions: false,
                row_actions: false,
                rejection_reason: true,
                edit_link: true,
                view_link: false,
            },
            WorkflowStatus::Review => Self {
                checkboxes: false,
                bulk_actions: false,
                row_actions: false,
                rejection_reason: false,
                edit_link: false,
                view_link: true,
            },
        }
    }
}

/// Field-scoped search currently narrowing the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSearch {
    pub field: SearchField,
    pub value: String,
}

/// Reject dialog state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectDialog {
    pub open: bool,
    /// Row whose reject icon opened the dialog
    pub single_target: Option<u64>,
    pub reason: String,
}

impl RejectDialog {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingState {
    pub status: WorkflowStatus,
    pub rows: Vec<ListingRow>,
    pub pagination: PaginationState,
    pub selection: SelectionState,
    pub columns: ColumnSet,
    pub search: Option<ActiveSearch>,
    pub reject: RejectDialog,
    /// Set once a fetch has come back, successful or not
    pub loaded: bool,
}

impl ListingState {
    pub fn new(status: WorkflowStatus, page_size: u32) -> Self {
        Self {
            status,
            rows: Vec::new(),
            pagination: PaginationState::new(page_size),
            selection: SelectionState::default(),
            columns: ColumnSet::for_status(status),
            search: None,
            reject: RejectDialog::default(),
            loaded: false,
        }
    }

    /// Move to another status: empty rows, no selection, page 0
    pub fn switch_status(&mut self, status: WorkflowStatus) {
        self.status = status;
        self.columns = ColumnSet::for_status(status);
        self.search = None;
        self.reject.reset();
        self.pagination.reset();
        self.replace_rows(Vec::new());
        self.loaded = false;
    }

    /// Install a fetched page; selection starts over
    pub fn apply_page(&mut self, index: u32, page: Page<ListingRow>) {
        self.pagination.apply(index, page.total_pages, page.total_elements);
        self.replace_rows(page.content);
        self.loaded = true;
    }

    /// A failed fetch leaves the listing empty
    pub fn apply_failure(&mut self) {
        self.pagination.apply(0, 0, 0);
        self.replace_rows(Vec::new());
        self.loaded = true;
    }

    /// Bookkeeping after a successful authorize or reject
    pub fn finish_action(&mut self) {
        self.selection.clear();
        self.reject.reset();
    }

    pub fn open_reject_dialog(&mut self, single_target: Option<u64>) {
        self.reject.open = true;
        self.reject.single_target = single_target;
    }

    pub fn cancel_reject_dialog(&mut self) {
        self.reject.open = false;
        self.reject.single_target = None;
    }

    pub fn row(&self, id: u64) -> Option<&ListingRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        ListingSnapshot {
            status: self.status,
            rows: self.rows.clone(),
            page: self.pagination.page,
            total_pages: self.pagination.total_pages,
            total_elements: self.pagination.total_elements,
            selected: self.selection.selected_ids().to_vec(),
            has_next: self.pagination.has_next(),
            has_previous: self.pagination.has_previous(),
        }
    }

    fn replace_rows(&mut self, rows: Vec<ListingRow>) {
        self.selection = SelectionState::for_rows(rows.iter().map(|r| r.id).collect());
        self.rows = rows;
    }
}

/// Serializable view of the listing, served by the JSON endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub status: WorkflowStatus,
    pub rows: Vec<ListingRow>,
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub selected: Vec<u64>,
    pub has_next: bool,
    pub has_previous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(ids: &[u64]) -> Vec<ListingRow> {
        ids.iter()
            .map(|&id| ListingRow {
                id,
                ..Default::default()
            })
            .collect()
    }

    fn page(ids: &[u64], total_pages: u32, total_elements: u64) -> Page<ListingRow> {
        Page {
            content: rows(ids),
            total_pages,
            total_elements,
        }
    }

    #[test]
    fn test_apply_page_resets_selection() {
        let mut state = ListingState::new(WorkflowStatus::Pending, 10);
        state.apply_page(0, page(&[1, 2], 1, 2));
        state.selection.toggle_all(true);

        state.apply_page(0, page(&[3], 1, 1));
        assert!(state.selection.is_empty());
        assert_eq!(state.selection.checked().len(), state.rows.len());
    }

    #[test]
    fn test_switch_status_clears_everything() {
        let mut state = ListingState::new(WorkflowStatus::Pending, 10);
        state.apply_page(2, page(&[1, 2], 3, 25));
        state.selection.toggle_row(1);
        state.open_reject_dialog(Some(2));
        state.reject.reason = "dup".to_string();

        state.switch_status(WorkflowStatus::Rejected);
        assert_eq!(state.pagination.page, 0);
        assert!(state.rows.is_empty());
        assert!(state.selection.is_empty());
        assert_eq!(state.reject, RejectDialog::default());
        assert!(state.columns.rejection_reason);
        assert!(!state.columns.checkboxes);
    }

    #[test]
    fn test_column_sets() {
        let pending = ColumnSet::for_status(WorkflowStatus::Pending);
        assert!(pending.checkboxes && pending.bulk_actions && pending.row_actions);
        let review = ColumnSet::for_status(WorkflowStatus::Review);
        assert!(review.view_link && !review.edit_link && !review.checkboxes);
    }

    #[test]
    fn test_failure_empties_rows() {
        let mut state = ListingState::new(WorkflowStatus::Pending, 10);
        state.apply_page(1, page(&[1], 2, 11));
        state.apply_failure();
        assert!(state.rows.is_empty());
        assert_eq!(state.pagination.total_pages, 0);
        assert!(state.loaded);
    }

    #[test]
    fn test_cancel_dialog_drops_single_target() {
        let mut state = ListingState::new(WorkflowStatus::Pending, 10);
        state.open_reject_dialog(Some(4));
        state.cancel_reject_dialog();
        assert!(!state.reject.open);
        assert_eq!(state.reject.single_target, None);
    }

    #[test]
    fn test_snapshot() {
        let mut state = ListingState::new(WorkflowStatus::Pending, 10);
        state.apply_page(0, page(&[7], 3, 25));
        let snap = state.snapshot();
        assert_eq!(snap.rows.len(), 1);
        assert!(snap.has_next);
        assert!(!snap.has_previous);
        assert_eq!(snap.total_elements, 25);
    }
}
