//! Standard exit codes for CLI operations
//!
//! These follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - translation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Translation error - the document could not be converted
pub const TRANSLATION_ERROR: i32 = 2;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
