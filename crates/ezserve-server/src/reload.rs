//! Reload-on-change watching.
//!
//! Watches the site root and surfaces content changes to the run loop,
//! which restarts the server generation so startup state (config,
//! template, not-found page) is rebuilt from disk.

use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Start watching a site root recursively.
///
/// The returned watcher must stay alive for events to flow. Access
/// events are filtered out: serving pages reads the watched tree, and
/// those reads must not trigger restarts.
pub(crate) fn watch(root: &Path) -> Result<(RecommendedWatcher, mpsc::Receiver<Event>), notify::Error> {
    let (tx, rx) = mpsc::channel::<Event>(100);

    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            )
        {
            // blocking_send: the callback runs on notify's own thread
            let _ = tx.blocking_send(event);
        }
    })?;

    watcher.watch(root, RecursiveMode::Recursive)?;
    Ok((watcher, rx))
}
