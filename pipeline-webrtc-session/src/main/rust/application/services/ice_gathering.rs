use std::time::Duration;

use tokio::sync::watch;

use crate::domain::errors::{Result, SessionError};
use crate::domain::value_objects::IceGatheringState;

/// Wait until ICE gathering reports complete, bounded by `timeout`.
///
/// Resolves without yielding when gathering is already complete. The
/// receiver is consumed, so the subscription ends on every exit path.
pub async fn wait_for_ice_gathering_complete(
    mut state: watch::Receiver<IceGatheringState>,
    timeout: Duration,
) -> Result<()> {
    if state.borrow().is_complete() {
        return Ok(());
    }

    match tokio::time::timeout(timeout, state.wait_for(|s| s.is_complete())).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(_)) => Err(SessionError::PeerConnection(
            "ICE gathering state source closed before completion".to_string(),
        )),
        Err(_) => Err(SessionError::IceGatheringTimeout(timeout)),
    }
}
