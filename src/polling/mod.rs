mod controller;
mod loop_worker;

pub(crate) use controller::PollerController;
pub(crate) use loop_worker::PollContext;
pub use loop_worker::{POLL_INTERVAL_SECS, POLL_TIMEOUT_SECS};
