//! Background load and save threads.
//!
//! Runs one session operation on a worker thread and reports progress ticks
//! and the final result over a channel, so the calling thread stays free to
//! drive a UI or call [`LessonSession::cancel`].

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::error::Result;
use crate::progress::ProgressTick;
use crate::session::{LessonSession, Loaded, Outcome};
use crate::types::Document;

/// Message sent from a background operation.
#[derive(Debug)]
pub enum OperationUpdate<T> {
    /// One progress tick, in traversal order.
    Progress(ProgressTick),
    /// The operation finished. Always the last message.
    Complete(Result<T>),
}

/// Spawn a background load.
///
/// The worker shares the session's cancellation token, so
/// `session.cancel()` stops it. The token is reset before this returns;
/// a cancel issued any time after the call is observed by the worker.
pub fn spawn_load(
    session: &LessonSession,
    path: PathBuf,
    sender: Sender<OperationUpdate<Loaded>>,
) -> JoinHandle<()> {
    let begun = session.begin(&path);
    let session = session.clone();
    std::thread::spawn(move || {
        let mut progress = progress_sender(&sender);
        let result = begun.map(|()| session.run_load(&path, &mut progress));
        let _ = sender.send(OperationUpdate::Complete(result));
    })
}

/// Spawn a background save.
///
/// Cancellation works as for [`spawn_load`].
pub fn spawn_save(
    session: &LessonSession,
    document: Arc<Document>,
    path: PathBuf,
    sender: Sender<OperationUpdate<Outcome>>,
) -> JoinHandle<()> {
    let begun = session.begin(&path);
    let session = session.clone();
    std::thread::spawn(move || {
        let mut progress = progress_sender(&sender);
        let result = begun.map(|()| session.run_save(&document, &path, &mut progress));
        let _ = sender.send(OperationUpdate::Complete(result));
    })
}

fn progress_sender<T>(sender: &Sender<OperationUpdate<T>>) -> impl FnMut(ProgressTick) {
    let sender = sender.clone();
    move |tick| {
        sender.send(OperationUpdate::Progress(tick)).ok();
    }
}
