//! UI Components
//!
//! Reusable Leptos components.

mod brokers_page;
mod challenge_matrix;
mod confirm_dialog;
mod filter_bar;
mod filterable_table;
mod modal;
mod pagination_bar;
mod rebate_matrix;
mod resource_page;
mod tab_strip;
mod toast;
mod xform;

pub use brokers_page::BrokersPage;
pub use challenge_matrix::ChallengeMatrix;
pub use confirm_dialog::ConfirmDialog;
pub use filter_bar::FilterBar;
pub use filterable_table::{FilterableTable, RowActionUrls};
pub use modal::Modal;
pub use pagination_bar::PaginationBar;
pub use rebate_matrix::RebateMatrixEditor;
pub use resource_page::{
    accounts_def, broker_options_def, companies_def, contests_def, promotions_def, ResourceDef,
    ResourcePage,
};
pub use tab_strip::ReorderableTabStrip;
pub use toast::{use_toasts, Toast, ToastKind, ToastStack, Toasts};
pub use xform::XForm;
