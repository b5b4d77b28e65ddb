use std::io::Write;

/// Where dry-run output goes. When some, no file writes or mutating network calls should
/// happen. Instead, write what _would_ happen to this sink (stdout for real runs).
pub(crate) type DryRun<'a> = Option<&'a mut (dyn Write + 'static)>;
