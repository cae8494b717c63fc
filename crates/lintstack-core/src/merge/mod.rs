//! Merging linearized documents
//!
//! Every merger walks the documents in precedence order, lowest first, so a
//! later document's declaration replaces an earlier one.

pub mod rules;
pub mod settings;

pub use rules::{RuleMerge, merge_rules};
pub use settings::{deep_merge_into, merge_env, merge_parser_options, merge_settings};
