// trimfield/src/commands/replay.rs
//! `replay` command: drive a content session from recorded page events.
//!
//! Input is one JSON object per line, tagged by `event`:
//!
//! ```text
//! {"event":"document","root":{"id":1,"tag":"body","children":[{"id":2,"tag":"textarea"}]}}
//! {"event":"blur","target":2,"value":"  hello  "}
//! {"event":"paste","target":2,"clipboard":" x ","value":"ab","selectionStart":1,"selectionEnd":1}
//! {"event":"mutation","addedNodes":[{"id":3,"tag":"input"}]}
//! {"event":"storage","changes":{"mode":"deny"}}
//! ```
//!
//! Each event produces one JSON report line. Storage events go to an
//! in-memory copy of the store, so a replay never modifies the settings file.

use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::Write;

use trimfield_core::{
    BlurEvent, ContentSession, Element, ElementId, FieldEdit, Items, MemoryStore, MutationRecord,
    PasteEvent, PasteOutcome, SettingsStore,
};

/// A recorded page event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// The page finished loading with this tree.
    Document { root: Element },
    Blur(BlurEvent),
    Paste(PasteEvent),
    Mutation(MutationRecord),
    /// Another context wrote these keys; `null` removes a key.
    Storage { changes: Items },
}

/// The session's answer to one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayReport {
    Document { active: bool, attached: usize },
    Blur { target: ElementId, edit: Option<FieldEdit> },
    Paste { target: ElementId, outcome: PasteOutcome },
    Mutation { attached: usize },
    Storage { notifications: usize, active: bool, attached: usize },
}

/// Replays `input` against a session for `url`, writing one report per event.
pub fn run_replay<W: Write>(
    store: &mut MemoryStore,
    url: &str,
    input: &str,
    writer: &mut W,
) -> Result<Vec<ReplayReport>> {
    let mut session: Option<ContentSession> = None;
    let mut document: Option<Element> = None;
    let mut reports = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let event: ReplayEvent = serde_json::from_str(line)
            .with_context(|| format!("Invalid event on line {}", line_no))?;
        debug!("Replaying line {}: {:?}", line_no, event);

        let report = match event {
            ReplayEvent::Document { root } => {
                let report = match session.as_mut() {
                    None => {
                        let started = ContentSession::start(store, url, &root)?;
                        let report = ReplayReport::Document {
                            active: started.is_active(),
                            attached: started.registry().len(),
                        };
                        session = Some(started);
                        report
                    }
                    Some(active_session) => {
                        // A second snapshot behaves like the whole tree being inserted.
                        let attached = active_session.on_mutations(&[MutationRecord {
                            added_nodes: vec![root.clone()],
                        }]);
                        ReplayReport::Document { active: active_session.is_active(), attached }
                    }
                };
                match document.as_mut() {
                    None => document = Some(root),
                    Some(doc) => doc.children.push(root),
                }
                report
            }
            ReplayEvent::Blur(event) => {
                let session = require_session(&session, line_no)?;
                ReplayReport::Blur { target: event.target, edit: session.on_blur(&event) }
            }
            ReplayEvent::Paste(event) => {
                let session = require_session(&session, line_no)?;
                ReplayReport::Paste { target: event.target, outcome: session.on_paste(&event) }
            }
            ReplayEvent::Mutation(record) => {
                let Some(session) = session.as_mut() else {
                    bail!("Event on line {} arrived before any document event", line_no);
                };
                let attached = session.on_mutations(std::slice::from_ref(&record));
                if let Some(doc) = document.as_mut() {
                    doc.children.extend(record.added_nodes);
                }
                ReplayReport::Mutation { attached }
            }
            ReplayEvent::Storage { changes } => {
                apply_storage_changes(store, changes)?;
                match (session.as_mut(), document.as_ref()) {
                    (Some(session), Some(doc)) => ReplayReport::Storage {
                        notifications: session.process_pending_changes(doc),
                        active: session.is_active(),
                        attached: session.registry().len(),
                    },
                    _ => ReplayReport::Storage { notifications: 0, active: false, attached: 0 },
                }
            }
        };

        serde_json::to_writer(&mut *writer, &report)?;
        writeln!(writer)?;
        reports.push(report);
    }

    Ok(reports)
}

fn require_session(session: &Option<ContentSession>, line_no: usize) -> Result<&ContentSession> {
    match session {
        Some(session) => Ok(session),
        None => bail!("Event on line {} arrived before any document event", line_no),
    }
}

fn apply_storage_changes(store: &mut MemoryStore, changes: Items) -> Result<()> {
    let (removed, updated): (Vec<_>, Vec<_>) = changes.into_iter().partition(|(_, value)| value.is_null());
    if !updated.is_empty() {
        store.set(updated.into_iter().collect())?;
    }
    if !removed.is_empty() {
        let keys: Vec<&str> = removed.iter().map(|(key, _)| key.as_str()).collect();
        store.remove(&keys)?;
    }
    Ok(())
}
