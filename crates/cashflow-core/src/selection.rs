//! Row selection for bulk actions
//!
//! Two views of the same choice are kept side by side: the ordered list of
//! selected ids sent with a bulk action, and one checkbox flag per row of the
//! displayed page. `checked.len()` always equals the number of rows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    row_ids: Vec<u64>,
    checked: Vec<bool>,
    selected: Vec<u64>,
}

impl SelectionState {
    /// Fresh selection aligned to the given page rows, nothing selected
    pub fn for_rows(row_ids: Vec<u64>) -> Self {
        let checked = vec![false; row_ids.len()];
        Self {
            row_ids,
            checked,
            selected: Vec::new(),
        }
    }

    /// Flip one row; ids not on the page are ignored. Returns the new flag.
    pub fn toggle_row(&mut self, id: u64) -> Option<bool> {
        let index = self.row_ids.iter().position(|&row| row == id)?;
        let now = !self.checked[index];
        self.checked[index] = now;
        if now {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        } else {
            self.selected.retain(|&s| s != id);
        }
        Some(now)
    }

    /// Check or uncheck every row
    pub fn toggle_all(&mut self, checked: bool) {
        self.checked = vec![checked; self.row_ids.len()];
        self.selected = if checked { self.row_ids.clone() } else { Vec::new() };
    }

    /// Unselect everything, keeping the row alignment
    pub fn clear(&mut self) {
        self.toggle_all(false);
    }

    pub fn selected_ids(&self) -> &[u64] {
        &self.selected
    }

    pub fn is_checked(&self, id: u64) -> bool {
        self.row_ids
            .iter()
            .position(|&row| row == id)
            .map(|i| self.checked[i])
            .unwrap_or(false)
    }

    pub fn checked(&self) -> &[bool] {
        &self.checked
    }

    pub fn all_checked(&self) -> bool {
        !self.checked.is_empty() && self.checked.iter().all(|&c| c)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
