//! quicklabel - digit-key image labeling
//!
//! Shows the images of a directory one at a time and assigns each a label
//! from 0 to 9 with a single keystroke. Labels are written through to a CSV
//! or JSON file, so an interrupted session resumes where it left off. An
//! optional measurement mode records mouse-drawn lines with their calibrated
//! lengths, and labeled files can be copied or moved into per-class folders.

pub mod banner;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod display;
pub mod keybindings;
pub mod measure;
pub mod model;
pub mod navigation;
pub mod session;
pub mod store;
pub mod transfer;

pub use config::SessionConfig;
pub use session::{Session, SessionError, SessionOutcome, SessionSummary};
