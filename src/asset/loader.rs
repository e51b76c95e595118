use super::{AssetResult, PreviewAsset};
use crate::geometry::MediaDimensions;

/// Why a load was started; decides what happens when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Initial load after node creation. Failures only log.
    Silent,
    /// Load after an input-folder change. Failures request generation.
    UserTriggered,
    /// Check after a generation request. Never generates again.
    Recheck,
}

impl LoadMode {
    pub const fn generates_on_failure(self) -> bool {
        matches!(self, Self::UserTriggered)
    }
}

/// Identity of one resolve request; completions with an older ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    ticket: LoadTicket,
    folder: String,
    mode: LoadMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Stale,
    Loaded { dimensions: MediaDimensions },
    /// Load failed; `generate` names the folder to generate a preview for, if any.
    Failed { generate: Option<String> },
}

#[derive(Debug, Default)]
pub struct PreviewLoader {
    next_ticket: u64,
    in_flight: Option<InFlight>,
    asset: Option<PreviewAsset>,
}

impl PreviewLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset(&self) -> Option<&PreviewAsset> {
        self.asset.as_ref()
    }

    pub fn dimensions(&self) -> MediaDimensions {
        self.asset
            .as_ref()
            .map(|asset| asset.dimensions)
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn begin(&mut self, folder: impl Into<String>, mode: LoadMode) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        let folder = folder.into();
        if let Some(previous) = self.in_flight.as_ref() {
            tracing::debug!(previous = %previous.folder, folder = %folder, "superseding preview load");
        }
        tracing::debug!(folder = %folder, ?mode, ?ticket, "begin preview load");
        self.in_flight = Some(InFlight {
            ticket,
            folder,
            mode,
        });
        ticket
    }

    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: AssetResult<PreviewAsset>,
    ) -> LoadOutcome {
        let is_current = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.ticket == ticket);
        if !is_current {
            tracing::debug!(?ticket, "dropping stale preview load result");
            return LoadOutcome::Stale;
        }
        let Some(in_flight) = self.in_flight.take() else {
            return LoadOutcome::Stale;
        };

        match result {
            Ok(asset) => {
                let dimensions = asset.dimensions;
                tracing::info!(
                    folder = %in_flight.folder,
                    asset_ref = %asset.asset_ref,
                    width = dimensions.width,
                    height = dimensions.height,
                    "preview asset ready"
                );
                self.asset = Some(asset);
                LoadOutcome::Loaded { dimensions }
            }
            Err(err) => {
                let generate = in_flight.mode.generates_on_failure();
                if in_flight.mode == LoadMode::Silent {
                    tracing::debug!(folder = %in_flight.folder, %err, "no preview available yet");
                } else {
                    tracing::warn!(
                        folder = %in_flight.folder,
                        mode = ?in_flight.mode,
                        %err,
                        "preview load failed"
                    );
                }
                LoadOutcome::Failed {
                    generate: generate.then_some(in_flight.folder),
                }
            }
        }
    }

    pub fn clear(&mut self) {
        if self.asset.is_some() || self.in_flight.is_some() {
            tracing::debug!("clearing preview asset");
        }
        self.asset = None;
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetError;

    fn asset(width: u32, height: u32) -> PreviewAsset {
        PreviewAsset::new(
            "/view?filename=video_preview_input.jpg&type=output",
            MediaDimensions::new(width, height),
        )
    }

    fn not_found() -> AssetError {
        AssetError::Status {
            status: 404,
            body: String::new(),
        }
    }

    #[test]
    fn successful_load_replaces_dimensions() {
        let mut loader = PreviewLoader::new();
        assert_eq!(loader.dimensions(), MediaDimensions::new(1920, 1080));

        let ticket = loader.begin("input", LoadMode::Silent);
        assert!(loader.is_loading());
        assert_eq!(
            loader.complete(ticket, Ok(asset(1280, 720))),
            LoadOutcome::Loaded {
                dimensions: MediaDimensions::new(1280, 720)
            }
        );
        assert!(!loader.is_loading());
        assert_eq!(loader.dimensions(), MediaDimensions::new(1280, 720));
    }

    #[test]
    fn superseded_ticket_is_stale() {
        let mut loader = PreviewLoader::new();
        let first = loader.begin("a", LoadMode::UserTriggered);
        let second = loader.begin("b", LoadMode::UserTriggered);

        assert_eq!(
            loader.complete(first, Ok(asset(640, 480))),
            LoadOutcome::Stale
        );
        assert_eq!(loader.dimensions(), MediaDimensions::default());
        assert_eq!(
            loader.complete(second, Ok(asset(800, 600))),
            LoadOutcome::Loaded {
                dimensions: MediaDimensions::new(800, 600)
            }
        );
    }

    #[test]
    fn clear_drops_asset_and_pending_request() {
        let mut loader = PreviewLoader::new();
        let ticket = loader.begin("a", LoadMode::Silent);
        loader.complete(ticket, Ok(asset(640, 480)));
        let pending = loader.begin("a", LoadMode::UserTriggered);

        loader.clear();
        assert!(loader.asset().is_none());
        assert_eq!(loader.dimensions(), MediaDimensions::default());
        assert_eq!(
            loader.complete(pending, Ok(asset(640, 480))),
            LoadOutcome::Stale
        );
    }

    #[test]
    fn only_user_triggered_failures_request_generation() {
        let mut loader = PreviewLoader::new();

        let silent = loader.begin("clips", LoadMode::Silent);
        assert_eq!(
            loader.complete(silent, Err(not_found())),
            LoadOutcome::Failed { generate: None }
        );

        let user = loader.begin("clips", LoadMode::UserTriggered);
        assert_eq!(
            loader.complete(user, Err(not_found())),
            LoadOutcome::Failed {
                generate: Some("clips".to_string())
            }
        );

        let recheck = loader.begin("clips", LoadMode::Recheck);
        assert_eq!(
            loader.complete(recheck, Err(not_found())),
            LoadOutcome::Failed { generate: None }
        );
    }

    #[test]
    fn failure_keeps_previous_asset() {
        let mut loader = PreviewLoader::new();
        let ticket = loader.begin("a", LoadMode::Silent);
        loader.complete(ticket, Ok(asset(640, 480)));
        let ticket = loader.begin("a", LoadMode::Recheck);
        loader.complete(ticket, Err(not_found()));
        assert_eq!(loader.dimensions(), MediaDimensions::new(640, 480));
    }
}
