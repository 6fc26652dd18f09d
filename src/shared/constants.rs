/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Authority a report is routed to when the pipeline has nothing better.
/// Never client-supplied: the submitter must not pick the responsible body.
pub const DEFAULT_GOVERNING_BODY: &str = "Municipal";
