pub mod ip_allowlist;
pub mod request_logger;
