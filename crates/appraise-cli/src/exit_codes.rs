//! Process exit codes. A graded answer exits with SUCCESS even when the
//! result is a fallback; only setup problems are failures.

pub const SUCCESS: i32 = 0;
pub const COMMAND_FAILED: i32 = 1; // Input file unreadable or not parseable
pub const CONFIG_ERROR: i32 = 2; // Bad config, missing credential, bad arguments
