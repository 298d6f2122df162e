//! Platform task spawning.
//!
//! - **native**: `tokio::spawn`; a Tokio runtime must be entered by the caller
//! - **wasm32**: `wasm_bindgen_futures::spawn_local` on the JS event loop

use std::future::Future;

/// Detach a future onto the platform executor.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    drop(tokio::spawn(future));
}

/// Detach a future onto the platform executor.
#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}
