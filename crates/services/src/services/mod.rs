pub mod line_api;
pub mod relay;
pub mod reporting;
pub mod storage;
pub mod telegram_api;
pub mod webhook;
