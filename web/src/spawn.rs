use futures_util::task::{LocalFutureObj, LocalSpawn, SpawnError};

/// Runs tasks on the browser's microtask queue.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}
