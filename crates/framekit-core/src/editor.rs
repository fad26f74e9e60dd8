//! The editor: single owner of the frame graph and the undo stack.
//!
//! Every mutation funnels through [`Editor::execute`]; no other code path
//! touches a frame. That funneling is what makes undo exact.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::command::Command;
use crate::config::Config;
use crate::error::FrameError;
use crate::frame::Frame;
use crate::graph::FrameGraph;
use crate::oracle::TransformOracle;
use crate::{align::AxisSet, Result};

/// Graph plus UI selection: everything a command may touch.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub graph: FrameGraph,
    pub selected: Option<String>,
}

impl EditorState {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            graph: FrameGraph::new(root),
            selected: None,
        }
    }
}

/// Owns the editor state behind a read-write lock and the command history
/// behind a mutex.
///
/// Locking contract: readers share the read lock and never observe a frame
/// mid-mutation. `execute` clones a state snapshot under the read lock,
/// releases it for the (bounded) oracle waits of the resolve phase, then
/// takes the history mutex followed by the write lock for the apply phase.
/// Undo acquires in the same order, so the two cannot deadlock. Commands
/// re-validate their resolve-time assumptions under the write lock and fail
/// whole if a precondition was invalidated concurrently.
#[derive(Debug)]
pub struct Editor {
    state: RwLock<EditorState>,
    history: Mutex<Vec<Command>>,
    config: Config,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Editor {
    pub fn new(config: Config) -> Self {
        Self {
            state: RwLock::new(EditorState::new(config.root_frame.clone())),
            history: Mutex::new(Vec::new()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn read_state(&self) -> RwLockReadGuard<'_, EditorState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EditorState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<Command>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Execute a command: resolve (oracle, no lock), apply (write lock,
    /// re-validated), then push onto the undo history. On any failure the
    /// state is unchanged and the history is not appended.
    pub fn execute(&self, mut command: Command, oracle: &dyn TransformOracle) -> Result<()> {
        let query = self.config.oracle_query();
        let snapshot = self.read_state().clone();
        command.resolve(&snapshot, oracle, &query)?;

        let mut history = self.lock_history();
        let mut state = self.write_state();
        command.apply(&mut state)?;
        drop(state);

        history.push(command);
        if let Some(cap) = self.config.max_history {
            if history.len() > cap {
                history.remove(0);
            }
        }
        Ok(())
    }

    /// Pop the most recent command and apply its exact inverse. The frame
    /// graph returns to its captured prior field values; the oracle is never
    /// consulted.
    pub fn undo(&self) -> Result<()> {
        let mut history = self.lock_history();
        let command = history.last().cloned().ok_or(FrameError::EmptyHistory)?;

        let mut state = self.write_state();
        command.revert(&mut state)?;
        drop(state);

        history.pop();
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.lock_history().len()
    }

    /// Snapshot of a single frame.
    pub fn frame(&self, name: &str) -> Option<Frame> {
        self.read_state().graph.get(name).ok().cloned()
    }

    /// Snapshot of every frame, sorted by name.
    pub fn frames(&self) -> Vec<Frame> {
        let state = self.read_state();
        let mut frames: Vec<Frame> = state.graph.iter().cloned().collect();
        frames.sort_by(|a, b| a.name.cmp(&b.name));
        frames
    }

    pub fn selected(&self) -> Option<String> {
        self.read_state().selected.clone()
    }

    /// The copy-frame composite of the service surface. Three phases, each
    /// individually atomic, not jointly rolled back:
    ///
    /// 1. `name` absent → create it: a deep copy of `source`'s frame renamed
    ///    to `name` when `source` is in the graph, else a bare identity frame
    ///    parented at `source`, treated as an externally broadcast frame the
    ///    oracle will place once it is live.
    /// 2. `name` present → align it to `source` on all six axes, gated on the
    ///    oracle being able to resolve the transform.
    /// 3. `parent` given and different → absolute-pose-preserving reparent.
    ///
    /// A phase failure stops the remaining phases; earlier phases stay
    /// applied.
    pub fn copy_frame(
        &self,
        name: &str,
        source: &str,
        new_parent: Option<&str>,
        oracle: &dyn TransformOracle,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(FrameError::InvalidArgument {
                field: "name".into(),
            });
        }
        if source.is_empty() {
            return Err(FrameError::InvalidArgument {
                field: "source_name".into(),
            });
        }

        let query = self.config.oracle_query();
        match self.frame(name) {
            None => match self.frame(source) {
                Some(template) => {
                    let mut copy = template;
                    copy.name = name.to_string();
                    self.execute(Command::add(copy), oracle)?;
                }
                None => {
                    // `source` doubles as a parent here: an externally
                    // broadcast frame outside the graph. Creation is
                    // unconditional; only the align and reparent phases are
                    // gated on the oracle.
                    self.execute(Command::add_external(Frame::new(name, source)), oracle)?;
                }
            },
            Some(existing) => {
                if !oracle.can_resolve(&existing.parent, source, &query) {
                    return Err(FrameError::OracleUnavailable {
                        target: existing.parent,
                        source_frame: source.to_string(),
                    });
                }
                self.execute(Command::align(name, source, AxisSet::all()), oracle)?;
            }
        }

        if let Some(parent) = new_parent {
            let current = self
                .frame(name)
                .ok_or_else(|| FrameError::NotFound {
                    name: name.to_string(),
                })?
                .parent;
            if !parent.is_empty() && parent != current {
                self.execute(Command::set_parent(name, parent, true), oracle)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ScriptedOracle;

    #[test]
    fn failed_command_leaves_history_untouched() {
        let editor = Editor::default();
        let oracle = ScriptedOracle::new();

        let err = editor
            .execute(Command::remove("ghost"), &oracle)
            .unwrap_err();
        assert!(matches!(err, FrameError::NotFound { .. }));
        assert_eq!(editor.history_len(), 0);
        assert!(matches!(editor.undo(), Err(FrameError::EmptyHistory)));
    }

    #[test]
    fn history_cap_drops_oldest_entry() {
        let editor = Editor::new(Config {
            max_history: Some(2),
            ..Config::default()
        });
        let oracle = ScriptedOracle::new();

        for name in ["a", "b", "c"] {
            editor
                .execute(Command::add(Frame::new(name, "world")), &oracle)
                .unwrap();
        }
        assert_eq!(editor.history_len(), 2);

        // Only the two newest adds can be undone.
        editor.undo().unwrap();
        editor.undo().unwrap();
        assert!(matches!(editor.undo(), Err(FrameError::EmptyHistory)));
        assert!(editor.frame("a").is_some());
        assert!(editor.frame("c").is_none());
    }

    #[test]
    fn selection_is_undoable() {
        let editor = Editor::default();
        let oracle = ScriptedOracle::new();
        editor
            .execute(Command::add(Frame::new("a", "world")), &oracle)
            .unwrap();

        editor
            .execute(Command::select(Some("a".into())), &oracle)
            .unwrap();
        assert_eq!(editor.selected(), Some("a".to_string()));

        editor.execute(Command::select(None), &oracle).unwrap();
        assert_eq!(editor.selected(), None);

        editor.undo().unwrap();
        assert_eq!(editor.selected(), Some("a".to_string()));
    }
}
