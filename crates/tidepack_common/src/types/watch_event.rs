use std::{path::PathBuf, time::Duration};

use tidepack_error::Error;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug)]
pub enum WatchEvent {
  Start,
  BundleStart { input: PathBuf },
  BundleEnd { input: PathBuf, output: PathBuf, duration: Duration },
  End,
  /// A rebuild failed, the session keeps watching.
  Error(Error),
  /// The session cannot continue.
  Fatal(Error),
}

/// A long lived session that rebuilds on source changes until the process exits.
pub struct WatchSession {
  rx: UnboundedReceiver<WatchEvent>,
  // Keeps whatever drives the session (file watchers etc.) alive as long as the session.
  _guard: Box<dyn Send>,
}

impl WatchSession {
  pub fn new(rx: UnboundedReceiver<WatchEvent>, guard: impl Send + 'static) -> Self {
    Self { rx, _guard: Box::new(guard) }
  }

  /// Resolves to `None` once the session is over.
  pub async fn next_event(&mut self) -> Option<WatchEvent> {
    self.rx.recv().await
  }
}
