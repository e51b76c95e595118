use std::rc::Weak;
use std::sync::mpsc;
use std::time::Duration;

use gtk4::glib;

use super::{EditorRuntime, RuntimeInner};
use crate::editor::VideoCropEditor;
use crate::host::NodeHost;

pub(super) const REQUEST_POLL_INTERVAL: Duration = Duration::from_millis(24);

/// Runs a backend request off the main thread and delivers its result to the editor.
///
/// Polling stops once the runtime is dropped; a result that arrives after that is discarded.
pub(super) fn spawn_request<H, T, W, D>(
    runtime: Weak<RuntimeInner<H>>,
    label: &'static str,
    request: W,
    deliver: D,
) where
    H: NodeHost + 'static,
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    D: FnOnce(&mut VideoCropEditor, &mut H, T) + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    let spawned = std::thread::Builder::new()
        .name(format!("vidcrop-{label}"))
        .spawn(move || {
            let _ = tx.send(request());
        });
    if let Err(err) = spawned {
        tracing::error!(label, %err, "failed to spawn request thread");
        return;
    }

    let mut deliver = Some(deliver);
    glib::timeout_add_local(REQUEST_POLL_INTERVAL, move || {
        let Some(inner) = runtime.upgrade() else {
            tracing::debug!(label, "runtime dropped; abandoning request");
            return glib::ControlFlow::Break;
        };
        match rx.try_recv() {
            Ok(result) => {
                if let Some(deliver) = deliver.take() {
                    EditorRuntime { inner }.with_editor(|editor, host| deliver(editor, host, result));
                }
                glib::ControlFlow::Break
            }
            Err(mpsc::TryRecvError::Empty) => glib::ControlFlow::Continue,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!(label, "request thread exited without a result");
                glib::ControlFlow::Break
            }
        }
    });
}
