//! CLI Exit Code Registry
//!
//! Single source of truth for `rollcall` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (discrepancies are reported, not failures)   |
//! | 1    | General error (unspecified, report write failure)    |
//! | 2    | CLI usage error (bad flag values)                    |
//! | 3    | Roster missing, unreadable, or empty                 |
//! | 4    | Export missing, unreadable, bad header, or empty     |
//! | 5    | Run config unreadable or invalid                     |
//! | 6    | Discrepancies found and `--strict` was given         |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments.
pub const EXIT_USAGE: u8 = 2;

/// Roster resource is structurally invalid.
pub const EXIT_INVALID_ROSTER: u8 = 3;

/// Export resource is structurally invalid.
pub const EXIT_INVALID_EXPORT: u8 = 4;

/// `.rollcall.toml` cannot be read, parsed, or validated.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// Missing, unexpected, or ambiguous students under `--strict`.
pub const EXIT_DISCREPANCIES: u8 = 6;
