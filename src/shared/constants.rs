/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// BATCH LIMITS
// =============================================================================

/// Maximum number of photo ids accepted by a single bulk delete
pub const MAX_BULK_DELETE: u64 = 100;

/// Maximum number of entries accepted by a single reorder request
pub const MAX_REORDER_BATCH: u64 = 200;
