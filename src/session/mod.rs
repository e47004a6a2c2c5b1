mod controller;
mod state;
mod trend;

pub use controller::{SessionController, StopReport};
pub use state::LiveFeed;
pub use trend::{TrendBuffer, TREND_CAPACITY};

pub(crate) use state::SessionState;
