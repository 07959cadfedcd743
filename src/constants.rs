//! Application constants for SupplySync
//!
//! This module contains the batch file markers, readiness defaults,
//! HHT record codes and field widths, and configuration defaults used
//! throughout the application.

use std::time::Duration;

// =============================================================================
// Batch File Format
// =============================================================================

/// Line marking the end of data records in an ARRAY batch file
pub const END_OF_FILE_SENTINEL: &str = "END OF FILE";

/// Separator between fields of a batch data line
pub const RECORD_FIELD_SEPARATOR: char = ',';

/// Minimum number of fields on a batch data line (inventory, stock number, quantity)
pub const MIN_RECORD_FIELDS: usize = 3;

/// Separator between tokens of the trailer line
pub const TRAILER_TOKEN_SEPARATOR: char = ' ';

/// Index of the date token in the trailer line
///
/// Example trailer: `OR+ SUPPLIES DOWNLOADED 01/16/23 AT 1011 ARRAY BATCH# 4607`
pub const TRAILER_DATE_TOKEN_INDEX: usize = 3;

/// Date format of the trailer date token
pub const TRAILER_DATE_FORMAT: &str = "%m/%d/%y";

/// Extension of candidate batch files (matched case-insensitively)
pub const BATCH_FILE_PATTERN: &str = "*.txt";

// =============================================================================
// Readiness Gate
// =============================================================================

/// Number of scans for the sentinel before a batch file is abandoned
pub const DEFAULT_READINESS_ATTEMPTS: u32 = 100;

/// Delay between readiness scans in milliseconds
pub const DEFAULT_READINESS_INTERVAL_MS: u64 = 100;

/// Delay between readiness scans
pub const DEFAULT_READINESS_INTERVAL: Duration = Duration::from_millis(DEFAULT_READINESS_INTERVAL_MS);

// =============================================================================
// HHT Transmission Format
// =============================================================================

/// Record codes defined by the MEDITECH MM HHT interface
pub mod record_codes {
    /// Document header
    pub const DOCUMENT_HEADER: &str = "001";

    /// Inventory group header
    pub const GROUP_HEADER: &str = "050";

    /// Stock line within an inventory group
    pub const STOCK_LINE: &str = "051";

    /// Inventory group trailer
    pub const GROUP_TRAILER: &str = "990";

    /// Document trailer
    pub const DOCUMENT_TRAILER: &str = "999";
}

/// Fixed column widths of the HHT transmission records
pub mod field_widths {
    /// Transmission and transaction dates (YYYYMMDD)
    pub const DATE: usize = 8;

    /// User code in the document header
    pub const HEADER_USER_CODE: usize = 20;

    /// Inventory code in the group header
    pub const INVENTORY_CODE: usize = 10;

    /// Department code in the group header
    pub const DEPARTMENT_CODE: usize = 25;

    /// User code in the group header
    pub const GROUP_USER_CODE: usize = 10;

    /// Stock number in a stock line
    pub const STOCK_NUMBER: usize = 20;

    /// Zero-padded transaction quantity in a stock line
    pub const QUANTITY: usize = 10;

    /// Blank filler closing every stock line
    pub const STOCK_LINE_FILLER: usize = 15;

    /// Zero-padded record counts in group and document trailers
    pub const COUNT: usize = 6;
}

/// Output date format for transmission and transaction dates
pub const TRANSMISSION_DATE_FORMAT: &str = "%Y%m%d";

/// Unix mode for a transmission file created by a rebuild
pub const NEW_TRANSMISSION_FILE_MODE: u32 = 0o644;

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Application directory name under the platform data directory
pub const APP_DIR_NAME: &str = "supply-sync";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "supply-sync.toml";

/// Log file name within the configured log directory
pub const LOG_FILE_NAME: &str = "supply-sync.log";

/// Default user code for the MEDITECH interface
pub const DEFAULT_USER_CODE: &str = "ARRAY.INTM";

/// Default department code for the MEDITECH interface
pub const DEFAULT_DEPARTMENT_CODE: &str = "01.7020";

/// Default directory names under the application directory
pub const DEFAULT_DOWNLOAD_DIR_NAME: &str = "BATCH";
pub const DEFAULT_PROCESSED_DIR_NAME: &str = "PROCESSED";
pub const DEFAULT_UPLOAD_DIR_NAME: &str = "HHT";
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Default transmission file name inside the upload directory
pub const DEFAULT_HHT_FILE_NAME: &str = "SupplySync.hht";

/// Capacity of the notification channel between the watcher thread and the event loop
pub const WATCH_CHANNEL_CAPACITY: usize = 1000;
