pub mod batch;
pub mod date;
pub mod retry;

pub use batch::{process_batch, process_batch_with_progress, BatchOptions};
pub use date::{format_stage_date, parse_stage_date};
pub use retry::{with_retry, with_timeout, RetryPolicy, TimeoutError};
