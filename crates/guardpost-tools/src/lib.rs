//! Tool catalog and dispatcher for the workforce agent.
//!
//! The catalog declares every operation the model may invoke; the dispatcher
//! maps an invocation's name and argument bag to one store query and
//! serializes the result. Dispatch never fails: every error becomes a
//! structured JSON error object fed back to the model.

mod catalog;
mod dispatcher;
mod kind;
mod sql_guard;

pub use catalog::{fixed_catalog, raw_sql_catalog};
pub use dispatcher::{LookbackDefaults, ToolDispatcher};
pub use kind::ToolKind;
pub use sql_guard::validate_select;
