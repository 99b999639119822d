//! # View State
//!
//! Application state for the tracker's front end: the selected tab, the list
//! filters, the report being edited and the acting role.
//!
//! State is never mutated in place. Each user interaction is a [`ViewAction`]
//! and [`reduce`] returns the next state, so a sequence of actions always
//! yields the same resolver inputs.

use serde::{Deserialize, Serialize};

use shared::{Role, StageFilter, WoundReport};

use super::wound_resolver;

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Reports,
    Entry,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub tab: Tab,
    pub search_query: String,
    pub stage_filter: StageFilter,
    /// ID of the report open in the entry form, if any
    pub editing_target: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    SelectTab(Tab),
    SetSearch(String),
    SetStageFilter(StageFilter),
    /// Open a report in the entry form
    BeginEdit(String),
    CancelEdit,
    SetRole(Role),
    /// A report was removed from the store
    ReportDeleted(String),
    ResetFilters,
}

impl ViewState {
    /// Initial state with the configured default filter and role
    pub fn with_defaults(stage_filter: StageFilter, role: Role) -> Self {
        Self {
            stage_filter,
            role,
            ..Self::default()
        }
    }

    /// Resolve the full store with this state's search text and stage filter
    pub fn resolve(&self, all_reports: &[WoundReport]) -> Vec<WoundReport> {
        wound_resolver::resolve(all_reports, &self.search_query, self.stage_filter)
    }
}

/// Compute the state that follows `state` after `action`
pub fn reduce(state: &ViewState, action: ViewAction) -> ViewState {
    let mut next = state.clone();
    match action {
        ViewAction::SelectTab(tab) => next.tab = tab,
        ViewAction::SetSearch(query) => next.search_query = query,
        ViewAction::SetStageFilter(filter) => next.stage_filter = filter,
        ViewAction::BeginEdit(report_id) => {
            next.editing_target = Some(report_id);
            next.tab = Tab::Entry;
        }
        ViewAction::CancelEdit => next.editing_target = None,
        ViewAction::SetRole(role) => next.role = role,
        ViewAction::ReportDeleted(report_id) => {
            if next.editing_target.as_deref() == Some(report_id.as_str()) {
                next.editing_target = None;
            }
        }
        ViewAction::ResetFilters => {
            next.search_query = String::new();
            next.stage_filter = StageFilter::All;
        }
    }
    next
}
