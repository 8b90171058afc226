//! Copy or move labeled files into class folders after a session.
//!
//! Jobs are fed through a `crossbeam_channel` to a small pool of worker
//! threads. Every job runs to completion on its own; failures are collected
//! into the [`TransferReport`] instead of stopping the batch.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::config::TransferMode;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to create {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copied but failed to remove {path:?}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source has no file name: {path:?}")]
    NoFileName { path: PathBuf },
}

/// One file to transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl TransferJob {
    /// Job placing `source` at `<root>/<class_name>/<file name>`.
    pub fn into_class_dir(
        source: impl Into<PathBuf>,
        root: &Path,
        class_name: &str,
    ) -> Result<Self, TransferError> {
        let source = source.into();
        let name = source
            .file_name()
            .ok_or_else(|| TransferError::NoFileName {
                path: source.clone(),
            })?
            .to_owned();
        Ok(Self {
            destination: root.join(class_name).join(name),
            source,
        })
    }
}

/// A job that did not complete.
#[derive(Debug)]
pub struct TransferFailure {
    pub source: PathBuf,
    pub error: TransferError,
}

/// Outcome of a transfer batch.
#[derive(Debug, Default)]
pub struct TransferReport {
    pub succeeded: usize,
    pub failed: Vec<TransferFailure>,
}

impl TransferReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn absorb(&mut self, source: PathBuf, result: Result<(), TransferError>) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(error) => self.failed.push(TransferFailure { source, error }),
        }
    }
}

/// Run `jobs` with `workers` threads and wait for all of them.
pub fn run(jobs: Vec<TransferJob>, mode: TransferMode, workers: usize) -> TransferReport {
    let mut report = TransferReport::default();
    if jobs.is_empty() || !mode.is_enabled() {
        return report;
    }

    let total = jobs.len();
    let workers = workers.clamp(1, total);
    log::info!(
        "Transferring {} files ({}) with {} worker(s)",
        total,
        mode.verb(),
        workers
    );

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<TransferJob>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    for job in jobs {
        // Receiver is alive until the end of this function
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    thread::scope(|scope| {
        let mut spawned = 0;
        for i in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let spawn = thread::Builder::new()
                .name(format!("transfer-{i}"))
                .spawn_scoped(scope, move || worker_loop(job_rx, result_tx, mode));
            match spawn {
                Ok(_) => spawned += 1,
                Err(e) => log::warn!("Failed to spawn transfer worker {}: {}", i, e),
            }
        }
        if spawned == 0 {
            log::warn!("No transfer workers available, transferring on the calling thread");
            worker_loop(job_rx.clone(), result_tx.clone(), mode);
        }
    });
    drop(result_tx);

    for (source, result) in result_rx.iter() {
        report.absorb(source, result);
    }

    for failure in &report.failed {
        log::warn!("Transfer failed for {:?}: {}", failure.source, failure.error);
    }
    log::info!(
        "Transfer finished: {} succeeded, {} failed",
        report.succeeded,
        report.failed.len()
    );
    report
}

fn worker_loop(
    jobs: Receiver<TransferJob>,
    results: Sender<(PathBuf, Result<(), TransferError>)>,
    mode: TransferMode,
) {
    for job in jobs.iter() {
        let result = transfer_one(&job, mode);
        log::trace!("{} {:?} -> {:?}: {:?}", mode.verb(), job.source, job.destination, result.is_ok());
        if results.send((job.source, result)).is_err() {
            break;
        }
    }
}

fn transfer_one(job: &TransferJob, mode: TransferMode) -> Result<(), TransferError> {
    if let Some(dir) = job.destination.parent() {
        std::fs::create_dir_all(dir).map_err(|source| TransferError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    match mode {
        TransferMode::None => Ok(()),
        TransferMode::Copy => copy(job),
        TransferMode::Move => {
            if std::fs::rename(&job.source, &job.destination).is_ok() {
                return Ok(());
            }
            // Rename fails across filesystems
            copy(job)?;
            std::fs::remove_file(&job.source).map_err(|source| TransferError::Remove {
                path: job.source.clone(),
                source,
            })
        }
    }
}

fn copy(job: &TransferJob) -> Result<(), TransferError> {
    std::fs::copy(&job.source, &job.destination)
        .map(|_| ())
        .map_err(|source| TransferError::Copy {
            from: job.source.clone(),
            to: job.destination.clone(),
            source,
        })
}
