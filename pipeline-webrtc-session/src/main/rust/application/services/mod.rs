mod ice_gathering;
mod session_negotiator;

pub use ice_gathering::wait_for_ice_gathering_complete;
pub use session_negotiator::{SessionNegotiator, StopOptions};
