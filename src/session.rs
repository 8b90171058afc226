//! Interactive labeling session.
//!
//! The [`Session`] owns the dataset, the label store, the navigator and the
//! measurement engine, and drives a [`Display`]. For each item it decodes
//! and resizes the image, shows it below the help banner, then consumes input
//! events one at a time until the operator labels the item, moves away or
//! ends the session. Every label is written through to the label file
//! immediately; labeled files are transferred once the session is over.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::banner::{self, Banner};
use crate::codec::{self, CodecError};
use crate::config::{ConfigError, SessionConfig};
use crate::constants::{
    COMPLETION_HOLD, COMPLETION_MESSAGE, OVERLAY_PREFIX, SUPPORTED_EXTENSIONS,
};
use crate::dataset::{self, DatasetError};
use crate::display::{Display, DisplayError, InputEvent};
use crate::keybindings::{Action, KeyBindings};
use crate::measure::{MeasurementEngine, TextRenderer};
use crate::model::{DatasetItem, LabelRecord};
use crate::navigation::{Navigator, Outcome, Transition};
use crate::store::{LabelStore, StoreError};
use crate::transfer::{self, TransferFailure, TransferJob, TransferReport};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// How the interactive phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Nothing to label
    Empty,
    /// Operator quit or closed the window
    Terminated,
    /// Every item received a label
    Complete,
    /// Ran past the last item with looping disabled
    Exhausted,
}

/// What a finished session did.
#[derive(Debug)]
pub struct SessionSummary {
    /// Distinct images labeled in this session
    pub labeled: usize,
    /// Images offered for labeling
    pub total: usize,
    pub outcome: SessionOutcome,
    /// Present when a transfer ran
    pub transfer: Option<TransferReport>,
}

/// What the input loop of one item decided.
enum Step {
    Next(Outcome),
    Quit,
}

pub struct Session<D: Display> {
    config: SessionConfig,
    items: Vec<DatasetItem>,
    store: LabelStore,
    display: D,
    navigator: Navigator,
    engine: MeasurementEngine,
    banner: Banner,
    bindings: KeyBindings,
    text: TextRenderer,
}

impl<D: Display> Session<D> {
    /// Open the label store, discover images and drop those already labeled.
    ///
    /// Fails before anything is written if the existing label file is
    /// unreadable.
    pub fn from_config(config: SessionConfig, display: D) -> Result<Self, SessionError> {
        let text = TextRenderer::load(config.measure.font_path.as_deref());
        Self::with_text(config, display, text)
    }

    /// Like [`Session::from_config`] with an already loaded text renderer.
    pub fn with_text(
        config: SessionConfig,
        display: D,
        text: TextRenderer,
    ) -> Result<Self, SessionError> {
        config.ensure_output_dir()?;
        let store = LabelStore::open(&config.output_path)?;
        let discovered = dataset::discover(&config.images_path, SUPPORTED_EXTENSIONS)?;
        let items = dataset::filter_unlabeled(discovered, store.existing());
        log::info!(
            "{} images to label in {:?}",
            items.len(),
            config.images_path
        );
        Ok(Self::new(config, items, store, display, text))
    }

    pub fn new(
        config: SessionConfig,
        items: Vec<DatasetItem>,
        store: LabelStore,
        display: D,
        text: TextRenderer,
    ) -> Self {
        let bindings = KeyBindings::default();
        let legend = if config.show_class_names {
            config.classes.legend()
        } else {
            Vec::new()
        };
        let banner = Banner::new(bindings.help_line(), &legend, text.clone());
        let engine = MeasurementEngine::new(&config.measure, text.clone());
        let navigator = Navigator::new(items.len(), config.looping);
        Self {
            config,
            items,
            store,
            display,
            navigator,
            engine,
            banner,
            bindings,
            text,
        }
    }

    pub fn items(&self) -> &[DatasetItem] {
        &self.items
    }

    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Run the session to its end, persist and transfer.
    ///
    /// Labels assigned before an error are still persisted before the error
    /// is returned.
    pub fn run(&mut self) -> Result<SessionSummary, SessionError> {
        let total = self.items.len();
        if total == 0 {
            log::warn!(
                "No unlabeled images found in {:?}, nothing to do",
                self.config.images_path
            );
            return Ok(SessionSummary {
                labeled: 0,
                total,
                outcome: SessionOutcome::Empty,
                transfer: None,
            });
        }

        let result = self.annotate();
        let labeled = self.store.session_len();

        if labeled > 0 {
            log::info!("Writing data to disk...");
            if let Err(e) = self.store.flush() {
                if result.is_err() {
                    log::error!("Failed to persist labels: {}", e);
                } else {
                    return Err(e.into());
                }
            }
        }
        let outcome = result?;

        let transfer = if self.config.transfer.is_enabled() && labeled > 0 {
            Some(self.transfer())
        } else {
            None
        };

        log::info!(
            "Session ended ({:?}): {} of {} images labeled, labels in {:?}",
            outcome,
            labeled,
            total,
            self.store.path()
        );
        Ok(SessionSummary {
            labeled,
            total,
            outcome,
            transfer,
        })
    }

    fn annotate(&mut self) -> Result<SessionOutcome, SessionError> {
        loop {
            let index = self.navigator.position();
            self.load_item(index)?;
            self.show(index)?;
            self.navigator.await_input();

            match self.await_step()? {
                Step::Next(Outcome::Display(_)) => {}
                Step::Next(Outcome::Complete) => {
                    let frame = banner::message_frame(COMPLETION_MESSAGE, &self.text);
                    self.display.hold(&frame, "THANK YOU", COMPLETION_HOLD)?;
                    return Ok(SessionOutcome::Complete);
                }
                Step::Next(Outcome::Exhausted) => return Ok(SessionOutcome::Exhausted),
                Step::Quit => return Ok(SessionOutcome::Terminated),
            }
        }
    }

    fn load_item(&mut self, index: usize) -> Result<(), SessionError> {
        let item = &self.items[index];
        log::debug!("Showing {:?}", item.path);
        let source = codec::decode(&item.path)?;
        let display = codec::resize(&source, self.config.window_size);
        self.engine.prepare(source.dimensions(), display);
        Ok(())
    }

    fn title(&self, index: usize) -> String {
        format!(
            "current_image: {} | out of {} || Press Escape to terminate labeling session.",
            index + 1,
            self.items.len()
        )
    }

    fn show(&mut self, index: usize) -> Result<(), SessionError> {
        let frame = self.banner.compose(self.engine.frame());
        let title = self.title(index);
        self.display.show(&frame, &title)?;
        Ok(())
    }

    /// Consume events until the current item is left.
    fn await_step(&mut self) -> Result<Step, SessionError> {
        loop {
            let action = match self.display.next_event()? {
                InputEvent::CloseRequested => Action::Quit,
                InputEvent::KeyPressed(key) => self.bindings.action_for(key),
                pointer => {
                    if self.handle_pointer(pointer) {
                        self.show(self.navigator.position())?;
                    }
                    continue;
                }
            };

            if action == Action::Unknown {
                log::warn!("Invalid keystroke...");
                continue;
            }

            match self.navigator.apply(action) {
                Transition::Ignored => {}
                Transition::UndoRequested => {
                    if self.config.measure.enabled && self.engine.undo().is_some() {
                        self.show(self.navigator.position())?;
                    }
                }
                Transition::Moved(outcome) => return Ok(Step::Next(outcome)),
                Transition::Labeled {
                    index,
                    label,
                    outcome,
                } => {
                    self.label(index, label)?;
                    return Ok(Step::Next(outcome));
                }
                Transition::Terminated => return Ok(Step::Quit),
            }
        }
    }

    /// Route a pointer event in window coordinates to the engine.
    fn handle_pointer(&mut self, event: InputEvent) -> bool {
        if !self.config.measure.enabled {
            return false;
        }
        let offset = self.banner.height() as i32;
        let event = event.translated(0, -offset);
        match event.position() {
            Some(p) if p.y < 0 => false,
            _ => self.engine.handle_pointer(event),
        }
    }

    fn label(&mut self, index: usize, label: u8) -> Result<(), SessionError> {
        let item = &self.items[index];
        let measurements = if self.config.measure.enabled {
            self.engine.lines().to_vec()
        } else {
            Vec::new()
        };
        let record = LabelRecord::new(
            item.display_name.clone(),
            label,
            self.config.classes.name(label),
        )
        .with_measurements(measurements);

        let identity = record.identity();
        let previous = self
            .store
            .session()
            .get(&identity)
            .or_else(|| self.store.existing().get(&identity))
            .filter(|old| old.class_name != record.class_name)
            .and_then(|old| self.overlay_path(old));

        self.store.record(record.clone())?;
        log::info!(
            "Labeled: {} out of {} | {}",
            self.navigator.labeled_count(),
            self.items.len(),
            record
        );

        if self.config.save_overlays {
            self.export_overlay(&record);
            if let Some(stale) = previous {
                remove_stale_overlay(&stale);
            }
        }
        Ok(())
    }

    fn overlay_path(&self, record: &LabelRecord) -> Option<PathBuf> {
        let root = self.config.destination.as_ref()?;
        Some(
            root.join(&record.class_name)
                .join(format!("{OVERLAY_PREFIX}{}", record.image_name)),
        )
    }

    fn export_overlay(&self, record: &LabelRecord) {
        let Some(path) = self.overlay_path(record) else {
            return;
        };
        match codec::encode(self.engine.composite(), &path) {
            Ok(()) => log::debug!("Saved overlay {:?}", path),
            Err(e) => log::error!("Failed to save overlay {:?}: {}", path, e),
        }
    }

    fn transfer(&self) -> TransferReport {
        let Some(root) = &self.config.destination else {
            return TransferReport::default();
        };
        let paths: BTreeMap<String, &PathBuf> = self
            .items
            .iter()
            .map(|item| (item.identity(), &item.path))
            .collect();

        let mut report = TransferReport::default();
        let mut jobs = Vec::new();
        for (identity, record) in self.store.session() {
            let Some(source) = paths.get(identity) else {
                continue;
            };
            match TransferJob::into_class_dir(*source, root, &record.class_name) {
                Ok(job) => jobs.push(job),
                Err(error) => {
                    log::warn!("Transfer skipped for {:?}: {}", source, error);
                    report.failed.push(TransferFailure {
                        source: (*source).clone(),
                        error,
                    });
                }
            }
        }

        let mut batch = transfer::run(jobs, self.config.transfer, self.config.workers);
        batch.failed.append(&mut report.failed);
        batch
    }
}

fn remove_stale_overlay(path: &Path) {
    if !path.exists() {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Removed stale overlay {:?}", path),
        Err(e) => log::warn!("Failed to remove stale overlay {:?}: {}", path, e),
    }
}
