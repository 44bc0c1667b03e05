//! Background inventory worker
//!
//! Runs one font scan at a time on a dedicated thread. The scan state lives
//! on that thread for the whole run; the caller only sees the events sent
//! back over a channel, so nothing is shared while the scan is active.
//! Cancellation is cooperative and takes effect between pages.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use crate::config::InventoryConfig;
use crate::error::{Error, Result};
use crate::pdf::{run, FontDocument, InventoryEvent};
use crate::range::parse_page_range;

/// Cancellation flag shared between the worker thread and its owner
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; calling it again has no further effect
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// What to scan
#[derive(Debug, Clone, Default)]
pub struct InventoryRequest {
    /// PDF file to open on the worker thread
    pub input_path: PathBuf,
    /// Page range expression; `None` scans every page
    pub page_range: Option<String>,
    /// Name decoding and other settings
    pub config: InventoryConfig,
}

struct ActiveRun {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owner of at most one running inventory
///
/// # Example
///
/// ```no_run
/// use pdf_font_inventory::{InventoryEvent, InventoryRequest, InventoryWorker};
/// use std::path::PathBuf;
///
/// let mut worker = InventoryWorker::new();
/// let events = worker
///     .start(InventoryRequest {
///         input_path: PathBuf::from("report.pdf"),
///         ..Default::default()
///     })
///     .expect("worker is idle");
///
/// for event in events {
///     match event {
///         InventoryEvent::Discovered(font) => println!("{}", font.name),
///         InventoryEvent::Completed(catalog) => println!("{} fonts", catalog.len()),
///         _ => {}
///     }
/// }
/// ```
#[derive(Default)]
pub struct InventoryWorker {
    active: Option<ActiveRun>,
}

impl InventoryWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run in the background
    ///
    /// The returned receiver yields `Started`, `Progress` and `Discovered`
    /// events in scan order and then exactly one of `Completed`,
    /// `Cancelled` or `Failed`. The channel closes when the run ends.
    ///
    /// # Errors
    ///
    /// [`Error::RunInProgress`] if the previous run has not finished yet.
    pub fn start(&mut self, request: InventoryRequest) -> Result<Receiver<InventoryEvent>> {
        if self.is_running() {
            return Err(Error::RunInProgress);
        }
        // Reap the finished thread, if any
        self.wait();

        let (sender, receiver) = mpsc::channel();
        let token = CancellationToken::new();
        let worker_token = token.clone();

        let handle = thread::Builder::new()
            .name("font-inventory".to_string())
            .spawn(move || run_request(request, &worker_token, &sender))?;

        self.active = Some(ActiveRun { token, handle });
        Ok(receiver)
    }

    /// Ask the active run, if any, to stop after the current page
    pub fn cancel(&self) {
        if let Some(active) = &self.active {
            active.token.cancel();
        }
    }

    /// Whether a run is still executing
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .map(|active| !active.handle.is_finished())
            .unwrap_or(false)
    }

    /// Block until the active run, if any, has finished
    pub fn wait(&mut self) {
        if let Some(active) = self.active.take() {
            if active.handle.join().is_err() {
                log::error!("Font inventory thread panicked");
            }
        }
    }
}

impl Drop for InventoryWorker {
    fn drop(&mut self) {
        self.cancel();
        self.wait();
    }
}

/// Body of the worker thread
///
/// A dropped receiver means nobody is listening any more; the run is
/// cancelled at the next page.
fn run_request(request: InventoryRequest, token: &CancellationToken, sender: &Sender<InventoryEvent>) {
    let prepared = FontDocument::open(&request.input_path, &request.config).and_then(|document| {
        let pages = parse_page_range(request.page_range.as_deref(), document.page_count())?;
        Ok((document, pages))
    });

    let (document, pages) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            log::error!("Cannot list fonts of {}: {}", request.input_path.display(), e);
            let _ = sender.send(InventoryEvent::Failed(e));
            return;
        }
    };

    let outcome = run(
        &document,
        &pages,
        |event| {
            if sender.send(event).is_err() {
                token.cancel();
            }
        },
        || token.is_cancelled(),
    );

    let _ = sender.send(outcome.into_event());
}
