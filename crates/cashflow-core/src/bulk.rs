//! Validation of bulk authorize and reject actions

use crate::error::{CoreError, CoreResult};
use cashflow_gateway::RejectionRequest;

pub const SELECT_TO_AUTHORIZE: &str = "Please select items to authorize";
pub const SELECT_TO_REJECT: &str = "Please select rejected item";
pub const REASON_REQUIRED: &str = "Please enter a rejection reason";
pub const TARGET_REQUIRED: &str = "Please select an item to reject";

/// Ids for a bulk authorize
pub fn authorize_targets(selected: &[u64]) -> CoreResult<Vec<u64>> {
    if selected.is_empty() {
        return Err(CoreError::validation(SELECT_TO_AUTHORIZE));
    }
    Ok(selected.to_vec())
}

/// The bulk reject button needs a selection before the dialog opens
pub fn can_open_bulk_reject(selected: &[u64]) -> CoreResult<()> {
    if selected.is_empty() {
        return Err(CoreError::validation(SELECT_TO_REJECT));
    }
    Ok(())
}

/// Build the reject request; a single row target wins over the bulk selection
pub fn rejection_request(reason: &str, single_target: Option<u64>, selected: &[u64]) -> CoreResult<RejectionRequest> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(CoreError::validation(REASON_REQUIRED));
    }
    let ids = match single_target {
        Some(id) => vec![id],
        None if selected.is_empty() => return Err(CoreError::validation(TARGET_REQUIRED)),
        None => selected.to_vec(),
    };
    Ok(RejectionRequest {
        rejection_reason: reason.to_string(),
        ids,
    })
}
