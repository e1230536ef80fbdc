//! Application Context
//!
//! Shared state provided via Leptos Context API: the per-resource
//! invalidation registry, the blocking overlay, and the unauthorized flag.

use leptos::prelude::*;

use crate::api::Envelope;

/// Server resources a mutation can invalidate
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resource {
    Brokers,
    BrokerOptions,
    Accounts,
    Companies,
    Promotions,
    Contests,
    ChallengeTabs,
    Rebates,
}

/// App-wide signals provided via context.
///
/// Every mutation calls `invalidate(resource)` on success; data-fetching
/// effects subscribe through `version(resource)` and refetch, so the UI
/// always reflects server truth after writes.
#[derive(Clone, Copy)]
pub struct AppContext {
    brokers: RwSignal<u32>,
    broker_options: RwSignal<u32>,
    accounts: RwSignal<u32>,
    companies: RwSignal<u32>,
    promotions: RwSignal<u32>,
    contests: RwSignal<u32>,
    challenge_tabs: RwSignal<u32>,
    rebates: RwSignal<u32>,
    /// Full-screen blocking overlay while a status toggle is in flight
    busy: RwSignal<bool>,
    /// A response came back 401; the shell shows a login-required notice
    unauthorized: RwSignal<bool>,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            brokers: RwSignal::new(0),
            broker_options: RwSignal::new(0),
            accounts: RwSignal::new(0),
            companies: RwSignal::new(0),
            promotions: RwSignal::new(0),
            contests: RwSignal::new(0),
            challenge_tabs: RwSignal::new(0),
            rebates: RwSignal::new(0),
            busy: RwSignal::new(false),
            unauthorized: RwSignal::new(false),
        }
    }

    fn slot(&self, resource: Resource) -> RwSignal<u32> {
        match resource {
            Resource::Brokers => self.brokers,
            Resource::BrokerOptions => self.broker_options,
            Resource::Accounts => self.accounts,
            Resource::Companies => self.companies,
            Resource::Promotions => self.promotions,
            Resource::Contests => self.contests,
            Resource::ChallengeTabs => self.challenge_tabs,
            Resource::Rebates => self.rebates,
        }
    }

    /// Bump after a successful mutation against `resource`
    pub fn invalidate(&self, resource: Resource) {
        self.slot(resource).update(|v| *v += 1);
    }

    /// Tracked read for data-fetching effects
    pub fn version(&self, resource: Resource) -> u32 {
        self.slot(resource).get()
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.unauthorized.get()
    }

    /// Record envelope-level auth state; call on every response
    pub fn note_response(&self, envelope: &Envelope) {
        if envelope.unauthorized {
            self.unauthorized.set(true);
        }
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
