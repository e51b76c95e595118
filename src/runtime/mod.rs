//! glib main-loop runtime: executes [`EditorEffect`]s and feeds completions back to the editor.

mod canvas;
mod worker;

pub use canvas::{attach_canvas, CanvasNode};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use gtk4::glib;

use crate::asset::{AssetResolver, PreviewGenerator};
use crate::editor::{CropEditor, EditorEffect, TimerId, VideoCropEditor};
use crate::error::EditorResult;
use crate::host::NodeHost;

use self::worker::spawn_request;

struct RuntimeInner<H> {
    editor: RefCell<VideoCropEditor>,
    host: RefCell<H>,
    resolver: Arc<dyn AssetResolver>,
    generator: Arc<dyn PreviewGenerator>,
    timers: RefCell<HashMap<TimerId, glib::SourceId>>,
}

/// Owns an editor and its host on the main thread. Cloning shares the same editor.
pub struct EditorRuntime<H> {
    inner: Rc<RuntimeInner<H>>,
}

impl<H> Clone for EditorRuntime<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: NodeHost + 'static> EditorRuntime<H> {
    pub fn new(
        editor: VideoCropEditor,
        host: H,
        resolver: Arc<dyn AssetResolver>,
        generator: Arc<dyn PreviewGenerator>,
    ) -> EditorResult<Self> {
        if !gtk4::is_initialized_main_thread() {
            gtk4::init()?;
        }
        Ok(Self {
            inner: Rc::new(RuntimeInner {
                editor: RefCell::new(editor),
                host: RefCell::new(host),
                resolver,
                generator,
                timers: RefCell::new(HashMap::new()),
            }),
        })
    }

    /// Runs `f` against the editor and host, then executes the effects it queued.
    pub fn with_editor<R>(&self, f: impl FnOnce(&mut VideoCropEditor, &mut H) -> R) -> R {
        let result = {
            let mut editor = self.inner.editor.borrow_mut();
            let mut host = self.inner.host.borrow_mut();
            f(&mut editor, &mut host)
        };
        self.flush();
        result
    }

    pub fn create(&self) {
        self.with_editor(|editor, host| editor.on_create(host));
    }

    pub fn remove(&self) {
        self.with_editor(|editor, host| editor.on_removed(host));
        let leftover = self.inner.timers.borrow_mut().drain().collect::<Vec<_>>();
        for (_, source) in leftover {
            source.remove();
        }
    }

    pub fn flush(&self) {
        let effects = self.inner.editor.borrow_mut().take_effects();
        for effect in effects {
            self.execute(effect);
        }
    }

    fn downgrade(&self) -> Weak<RuntimeInner<H>> {
        Rc::downgrade(&self.inner)
    }

    fn execute(&self, effect: EditorEffect) {
        match effect {
            EditorEffect::ScheduleTimer { timer, delay } => {
                let weak = self.downgrade();
                let source = glib::timeout_add_local_once(delay, move || {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    inner.timers.borrow_mut().remove(&timer);
                    let runtime = EditorRuntime { inner };
                    runtime.with_editor(|editor, host| editor.on_timer_elapsed(host, timer));
                });
                if let Some(previous) = self.inner.timers.borrow_mut().insert(timer, source) {
                    previous.remove();
                }
            }
            EditorEffect::CancelTimer(timer) => {
                if let Some(source) = self.inner.timers.borrow_mut().remove(&timer) {
                    source.remove();
                }
            }
            EditorEffect::ResolveAsset { ticket, folder } => {
                let resolver = Arc::clone(&self.inner.resolver);
                spawn_request(
                    self.downgrade(),
                    "resolve",
                    move || resolver.resolve(&folder),
                    move |editor, host, result| editor.on_asset_resolved(host, ticket, result),
                );
            }
            EditorEffect::GeneratePreview { folder } => {
                let generator = Arc::clone(&self.inner.generator);
                let requested = folder.clone();
                spawn_request(
                    self.downgrade(),
                    "generate",
                    move || generator.request_preview(&requested),
                    move |editor, _, result| editor.on_preview_generated(&folder, result),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::asset::{preview_asset_ref, AssetResult, GenerationResult, PreviewAsset};
    use crate::geometry::MediaDimensions;
    use crate::host::InMemoryNode;
    use crate::params::ParamName;

    struct StaticBackend;

    impl AssetResolver for StaticBackend {
        fn resolve(&self, folder: &str) -> AssetResult<PreviewAsset> {
            Ok(PreviewAsset::new(
                preview_asset_ref(folder),
                MediaDimensions::new(640, 480),
            ))
        }
    }

    impl PreviewGenerator for StaticBackend {
        fn request_preview(&self, _folder: &str) -> GenerationResult<()> {
            Ok(())
        }
    }

    fn headless_runtime(node: InMemoryNode) -> EditorRuntime<InMemoryNode> {
        let backend = Arc::new(StaticBackend);
        EditorRuntime {
            inner: Rc::new(RuntimeInner {
                editor: RefCell::new(VideoCropEditor::default()),
                host: RefCell::new(node),
                resolver: backend.clone(),
                generator: backend,
                timers: RefCell::new(HashMap::new()),
            }),
        }
    }

    #[test]
    fn initial_load_is_resolved_off_thread_and_delivered_on_main_loop() {
        let context = glib::MainContext::default();
        let _owner = context
            .acquire()
            .expect("default main context should be free");
        let runtime =
            headless_runtime(InMemoryNode::new().with_param(ParamName::InputFolder, "clips"));

        runtime.create();
        assert_eq!(runtime.inner.timers.borrow().len(), 1);

        let deadline = Instant::now() + Duration::from_secs(5);
        while runtime.with_editor(|editor, _| editor.asset().is_none()) {
            assert!(Instant::now() < deadline, "asset was never delivered");
            context.iteration(true);
        }

        runtime.with_editor(|editor, host| {
            assert_eq!(editor.media(), MediaDimensions::new(640, 480));
            assert!(host.redraw_requests() >= 2);
        });
        assert!(runtime.inner.timers.borrow().is_empty());
    }
}
