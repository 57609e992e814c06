// Application-wide constants

/// Fixed calendar approximations used by the duration grammar
pub mod time {
    pub const SECONDS_PER_MINUTE: u64 = 60;
    pub const SECONDS_PER_HOUR: u64 = 3600;
    pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
    pub const DAYS_PER_MONTH: u64 = 30;
    pub const DAYS_PER_YEAR: u64 = 365;
}

/// Directive keywords accepted inside the `expires` block
pub mod directive {
    pub const MATCH: &str = "match";
    pub const MATCH_HEADER: &str = "match_header";
    pub const MATCH_ARGS: usize = 2;
    pub const MATCH_HEADER_ARGS: usize = 3;
}

/// Default configuration values
pub mod defaults {
    pub const CONFIG_PATH: &str = "gateway.yaml";
    pub const LOG_LEVEL: &str = "info";
    pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB
}

/// Header names the gateway reads or writes
pub mod headers {
    pub const REQUEST_ID: &str = "x-request-id";
}
