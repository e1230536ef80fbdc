//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::Broker;

/// Dashboard sections reachable from the nav bar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Brokers,
    BrokerOptions,
    Accounts,
    Companies,
    Promotions,
    Contests,
    ChallengeMatrix,
    Rebates,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Brokers => "Brokers",
            Section::BrokerOptions => "Options",
            Section::Accounts => "Accounts",
            Section::Companies => "Companies",
            Section::Promotions => "Promotions",
            Section::Contests => "Contests",
            Section::ChallengeMatrix => "Challenge Matrix",
            Section::Rebates => "Rebates",
        }
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Section currently shown in the main area
    pub section: Section,
    /// Broker the challenge matrix and rebate editors operate on
    pub selected_broker: Option<Broker>,
}

pub type AppStore = Store<AppState>;

pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_section(store: &AppStore, section: Section) {
    *store.section().write() = section;
}

pub fn store_select_broker(store: &AppStore, broker: Option<Broker>) {
    *store.selected_broker().write() = broker;
}
