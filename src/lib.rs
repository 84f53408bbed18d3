pub mod blocklist;
pub mod channel;
pub mod constants;
pub mod enforcer;
pub mod error;
pub mod logging;
pub mod platform;
#[cfg(test)]
mod test_utils;
pub mod validation;

use crate::blocklist::BlockListStore;
use crate::channel::AppListChannel;
use crate::enforcer::{EnforcerConfig, EnforcerService};
use crate::error::AppError;
use crate::platform::NativeDesktop;
use log::{error, info};
use std::io;
use std::sync::Arc;

/// Run the native host: enforce on a background thread and serve UI calls
/// from stdin until it closes.
pub fn run() -> Result<(), AppError> {
    let store = Arc::new(BlockListStore::new());
    let config = EnforcerConfig::from_env();

    let enforcer = EnforcerService::new(Arc::clone(&store), config);
    let handle = enforcer.start(NativeDesktop::new());

    let app_list = AppListChannel::new(Arc::clone(&store));
    info!("Serving {} on stdin", app_list.name());
    let served = channel::serve_lines(&app_list, io::stdin().lock(), io::stdout().lock());

    // Stop enforcing before exit so disabled windows get their input back
    enforcer.stop();
    if handle.join().is_err() {
        error!("Enforcement thread panicked");
        return Err(AppError::Internal("enforcement thread panicked".into()));
    }

    served
}
