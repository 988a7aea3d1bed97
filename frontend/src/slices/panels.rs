//! UI-transient flags: side navigation, help panel and split panel.

use super::{FleetState, FleetStatePatch, FleetStore};
use crate::store::{ActionKey, ActionSet};

#[derive(Debug, Clone, PartialEq)]
pub struct SideNavState {
    pub is_open: bool,
}

impl Default for SideNavState {
    fn default() -> Self {
        Self { is_open: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelpPanelState {
    pub is_open: bool,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitPanelState {
    pub is_open: bool,
    pub is_hidden: bool,
    pub content: Option<String>,
}

impl Default for SplitPanelState {
    fn default() -> Self {
        Self {
            is_open: false,
            is_hidden: true,
            content: None,
        }
    }
}

/// Fields left `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelpPanelUpdate {
    pub is_open: Option<bool>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitPanelUpdate {
    pub is_open: Option<bool>,
    pub is_hidden: Option<bool>,
    pub content: Option<String>,
}

pub const SIDE_NAV_IS_OPEN: ActionKey<bool> = ActionKey::new("SIDE_NAV_IS_OPEN");
pub const HELP_PANEL_IS_OPEN: ActionKey<bool> = ActionKey::new("HELP_PANEL_IS_OPEN");
pub const UPDATE_HELP_PANEL: ActionKey<HelpPanelUpdate> = ActionKey::new("UPDATE_HELP_PANEL");
pub const SPLIT_PANEL_IS_OPEN: ActionKey<bool> = ActionKey::new("SPLIT_PANEL_IS_OPEN");
pub const UPDATE_SPLIT_PANEL: ActionKey<SplitPanelUpdate> = ActionKey::new("UPDATE_SPLIT_PANEL");

pub fn register(store: &FleetStore) {
    let actions = ActionSet::new()
        .on(SIDE_NAV_IS_OPEN, |_: &FleetState, is_open| FleetStatePatch {
            side_nav: Some(SideNavState { is_open }),
            ..Default::default()
        })
        .on(HELP_PANEL_IS_OPEN, |state: &FleetState, is_open| FleetStatePatch {
            help_panel: Some(HelpPanelState {
                is_open,
                ..state.help_panel.clone()
            }),
            ..Default::default()
        })
        .on(UPDATE_HELP_PANEL, |state: &FleetState, update: HelpPanelUpdate| {
            let current = &state.help_panel;
            FleetStatePatch {
                help_panel: Some(HelpPanelState {
                    is_open: update.is_open.unwrap_or(current.is_open),
                    content: update.content.or_else(|| current.content.clone()),
                }),
                ..Default::default()
            }
        })
        .on(SPLIT_PANEL_IS_OPEN, |state: &FleetState, is_open| FleetStatePatch {
            split_panel: Some(SplitPanelState {
                is_open,
                ..state.split_panel.clone()
            }),
            ..Default::default()
        })
        .on(UPDATE_SPLIT_PANEL, |state: &FleetState, update: SplitPanelUpdate| {
            let current = &state.split_panel;
            FleetStatePatch {
                split_panel: Some(SplitPanelState {
                    is_open: update.is_open.unwrap_or(current.is_open),
                    is_hidden: update.is_hidden.unwrap_or(current.is_hidden),
                    content: update.content.or_else(|| current.content.clone()),
                }),
                ..Default::default()
            }
        });

    store.register(
        actions,
        FleetStatePatch {
            side_nav: Some(SideNavState::default()),
            help_panel: Some(HelpPanelState::default()),
            split_panel: Some(SplitPanelState::default()),
            ..Default::default()
        },
    );
}
