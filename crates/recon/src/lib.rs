//! `rollcall-recon`: roster vs. grade-export reconciliation engine.
//!
//! Loaders turn the roster and the export into immutable records, `reconcile`
//! joins them by normalized name, and `report` renders the outcome. No CLI
//! dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod normalize;
pub mod report;
pub mod roster;
pub mod summary;

pub use config::{ExportFormat, ReportFormat, RunConfig, SortOrder};
pub use engine::reconcile;
pub use error::ReconError;
pub use export::{load_export, parse_export};
pub use model::{
    CanonicalKey, ExportRow, ExportTable, LoadWarning, MatchRecord, MatchStatus, ReconResult,
    ReconSummary, RosterEntry, WarningKind,
};
pub use normalize::normalize;
pub use report::{Report, ReportMeta};
pub use roster::{load_roster, parse_roster};
