//! Undoable commands over the frame graph.
//!
//! A command runs in three phases so the editor never holds its write lock
//! across a blocking oracle wait:
//!
//! 1. `resolve` validates against a state snapshot and performs every oracle
//!    query, caching the resolved poses inside the variant;
//! 2. `apply` re-validates the cached assumptions against the live state,
//!    mutates, and captures the exact undo snapshot;
//! 3. `revert` restores the captured field values verbatim, with no
//!    recomputation and no oracle.
//!
//! A failed `apply` leaves the state untouched, so a command either fully
//! succeeds or fully fails.

use crate::align::{apply_alignment, AxisSet};
use crate::editor::EditorState;
use crate::error::FrameError;
use crate::frame::{Frame, Pose};
use crate::oracle::{OracleQuery, TransformOracle};
use crate::Result;

/// One undoable unit of change. Each variant carries its request fields plus
/// the prior state it overwrites, filled in during `apply`.
#[derive(Debug, Clone)]
pub enum Command {
    /// Insert (or replace) a frame. `external_parent` admits an
    /// oracle-vouched parent outside the graph; only the copy-frame
    /// composite sets it.
    AddFrame {
        frame: Frame,
        external_parent: bool,
        replaced: Option<Frame>,
    },
    /// Remove a leaf frame, snapshotting it for undo.
    RemoveFrame {
        name: String,
        removed: Option<Frame>,
    },
    /// Overwrite a frame's local pose.
    SetPose {
        name: String,
        pose: Pose,
        prior: Option<Pose>,
    },
    /// Overwrite selected pose components with the oracle-observed pose of
    /// `source` expressed in the frame's parent.
    AlignFrame {
        name: String,
        source: String,
        axes: AxisSet,
        /// Parent the observation was expressed in, and the observed pose.
        resolved: Option<(String, Pose)>,
        prior: Option<Pose>,
    },
    /// Change a frame's parent, optionally preserving its absolute pose by
    /// adopting the oracle-resolved pose in the new parent.
    SetParent {
        name: String,
        parent: String,
        keep_absolute: bool,
        /// Old parent observed at resolve time, and the new local pose.
        resolved: Option<(String, Pose)>,
        prior: Option<(String, Pose)>,
    },
    /// UI selection; no graph effect.
    SelectFrame {
        name: Option<String>,
        prior: Option<Option<String>>,
    },
}

impl Command {
    pub fn add(frame: Frame) -> Self {
        Self::AddFrame {
            frame,
            external_parent: false,
            replaced: None,
        }
    }

    pub(crate) fn add_external(frame: Frame) -> Self {
        Self::AddFrame {
            frame,
            external_parent: true,
            replaced: None,
        }
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Self::RemoveFrame {
            name: name.into(),
            removed: None,
        }
    }

    pub fn set_pose(name: impl Into<String>, pose: Pose) -> Self {
        Self::SetPose {
            name: name.into(),
            pose,
            prior: None,
        }
    }

    pub fn align(name: impl Into<String>, source: impl Into<String>, axes: AxisSet) -> Self {
        Self::AlignFrame {
            name: name.into(),
            source: source.into(),
            axes,
            resolved: None,
            prior: None,
        }
    }

    pub fn set_parent(
        name: impl Into<String>,
        parent: impl Into<String>,
        keep_absolute: bool,
    ) -> Self {
        Self::SetParent {
            name: name.into(),
            parent: parent.into(),
            keep_absolute,
            resolved: None,
            prior: None,
        }
    }

    pub fn select(name: Option<String>) -> Self {
        Self::SelectFrame { name, prior: None }
    }

    /// Variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddFrame { .. } => "add_frame",
            Self::RemoveFrame { .. } => "remove_frame",
            Self::SetPose { .. } => "set_pose",
            Self::AlignFrame { .. } => "align_frame",
            Self::SetParent { .. } => "set_parent",
            Self::SelectFrame { .. } => "select_frame",
        }
    }

    /// Read phase: validate against `state` and perform every oracle query.
    /// Runs without any lock held; `apply` re-checks what matters.
    pub(crate) fn resolve(
        &mut self,
        state: &EditorState,
        oracle: &dyn TransformOracle,
        query: &OracleQuery,
    ) -> Result<()> {
        let graph = &state.graph;
        match self {
            Self::AddFrame {
                frame,
                external_parent,
                ..
            } => {
                let parent_known =
                    frame.parent == graph.root() || graph.contains(&frame.parent);
                if !parent_known && !*external_parent {
                    return Err(FrameError::InvalidParent {
                        name: frame.name.clone(),
                        parent: frame.parent.clone(),
                    });
                }
                Ok(())
            }
            Self::RemoveFrame { name, .. } => {
                graph.get(name)?;
                let children = graph.children_of(name);
                if !children.is_empty() {
                    return Err(FrameError::HasDependents {
                        name: name.clone(),
                        children,
                    });
                }
                Ok(())
            }
            Self::SetPose { name, .. } => graph.get(name).map(|_| ()),
            Self::AlignFrame {
                name,
                source,
                resolved,
                ..
            } => {
                let parent = graph.get(name)?.parent.clone();
                let observed = oracle.resolve(&parent, source, query)?;
                *resolved = Some((parent, observed));
                Ok(())
            }
            Self::SetParent {
                name,
                parent,
                keep_absolute,
                resolved,
                ..
            } => {
                let old_parent = graph.get(name)?.parent.clone();
                if parent != graph.root() && !graph.contains(parent) {
                    return Err(FrameError::InvalidParent {
                        name: name.clone(),
                        parent: parent.clone(),
                    });
                }
                if graph.is_ancestor_or_self(name, parent) {
                    return Err(FrameError::CycleDetected {
                        name: name.clone(),
                        parent: parent.clone(),
                    });
                }
                if *keep_absolute {
                    // The oracle is the authority on the currently broadcast
                    // absolute pose; both chains must be resolvable or the
                    // whole reparent fails.
                    if !oracle.can_resolve(&old_parent, name, query) {
                        return Err(FrameError::OracleUnavailable {
                            target: old_parent,
                            source_frame: name.clone(),
                        });
                    }
                    let new_local = oracle.resolve(parent, name, query)?;
                    *resolved = Some((old_parent, new_local));
                }
                Ok(())
            }
            Self::SelectFrame { name, .. } => {
                if let Some(n) = name {
                    graph.get(n)?;
                }
                Ok(())
            }
        }
    }

    /// Mutation phase: re-validate resolve-time assumptions against the live
    /// state, mutate, and capture the undo snapshot. No oracle access.
    pub(crate) fn apply(&mut self, state: &mut EditorState) -> Result<()> {
        match self {
            Self::AddFrame {
                frame,
                external_parent,
                replaced,
            } => {
                *replaced = state.graph.put(frame.clone(), *external_parent)?;
                Ok(())
            }
            Self::RemoveFrame { name, removed } => {
                *removed = Some(state.graph.remove(name)?);
                Ok(())
            }
            Self::SetPose { name, pose, prior } => {
                *prior = Some(state.graph.set_pose(name, *pose)?);
                Ok(())
            }
            Self::AlignFrame {
                name,
                axes,
                resolved,
                prior,
                ..
            } => {
                let (observed_in, observed) =
                    resolved.as_ref().ok_or_else(|| unresolved("align_frame"))?;
                let current = state.graph.get(name)?.pose;
                let parent_now = &state.graph.get(name)?.parent;
                if parent_now != observed_in {
                    return Err(FrameError::PreconditionInvalidated {
                        reason: format!(
                            "parent of '{name}' changed from '{observed_in}' to '{parent_now}' during alignment"
                        ),
                    });
                }
                let aligned = apply_alignment(name, &current, observed, *axes)?;
                *prior = Some(state.graph.set_pose(name, aligned)?);
                Ok(())
            }
            Self::SetParent {
                name,
                parent,
                keep_absolute,
                resolved,
                prior,
            } => {
                let frame = state.graph.get(name)?;
                let old = (frame.parent.clone(), frame.pose);
                if *keep_absolute {
                    let (seen_parent, _) =
                        resolved.as_ref().ok_or_else(|| unresolved("set_parent"))?;
                    if seen_parent != &old.0 {
                        return Err(FrameError::PreconditionInvalidated {
                            reason: format!(
                                "parent of '{name}' changed from '{seen_parent}' to '{}' during reparent",
                                old.0
                            ),
                        });
                    }
                }
                state.graph.reparent(name, parent)?;
                if let Some((_, new_local)) = resolved {
                    // Infallible from here: reparent already succeeded.
                    let _ = state.graph.set_pose(name, *new_local)?;
                }
                *prior = Some(old);
                Ok(())
            }
            Self::SelectFrame { name, prior } => {
                if let Some(n) = name.as_ref() {
                    state.graph.get(n)?;
                }
                *prior = Some(state.selected.clone());
                state.selected = name.clone();
                Ok(())
            }
        }
    }

    /// Exact inverse from the captured snapshot.
    pub(crate) fn revert(&self, state: &mut EditorState) -> Result<()> {
        match self {
            Self::AddFrame {
                frame, replaced, ..
            } => {
                match replaced {
                    Some(old) => state.graph.restore(old.clone()),
                    None => {
                        state.graph.take(&frame.name).ok_or_else(|| corrupted("add_frame"))?;
                    }
                }
                Ok(())
            }
            Self::RemoveFrame { removed, .. } => {
                let frame = removed.clone().ok_or_else(|| corrupted("remove_frame"))?;
                state.graph.restore(frame);
                Ok(())
            }
            Self::SetPose { name, prior, .. } => {
                let pose = prior.ok_or_else(|| corrupted("set_pose"))?;
                state.graph.set_pose(name, pose).map(|_| ())
            }
            Self::AlignFrame { name, prior, .. } => {
                let pose = prior.ok_or_else(|| corrupted("align_frame"))?;
                state.graph.set_pose(name, pose).map(|_| ())
            }
            Self::SetParent { name, prior, .. } => {
                let (parent, pose) = prior.clone().ok_or_else(|| corrupted("set_parent"))?;
                let frame = state.graph.get_mut(name)?;
                frame.parent = parent;
                frame.pose = pose;
                Ok(())
            }
            Self::SelectFrame { prior, .. } => {
                state.selected = prior.clone().ok_or_else(|| corrupted("select_frame"))?;
                Ok(())
            }
        }
    }
}

fn unresolved(kind: &str) -> FrameError {
    FrameError::PreconditionInvalidated {
        reason: format!("{kind} applied without a resolve phase"),
    }
}

fn corrupted(kind: &str) -> FrameError {
    FrameError::PreconditionInvalidated {
        reason: format!("{kind} undo snapshot missing or stale"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::Axis;
    use crate::config::Config;
    use crate::fixtures::ScriptedOracle;
    use crate::frame::DEFAULT_ROOT;

    fn state_with(frames: &[(&str, &str)]) -> EditorState {
        let mut state = EditorState::new(DEFAULT_ROOT);
        for (name, parent) in frames {
            state.graph.insert(Frame::new(*name, *parent)).unwrap();
        }
        state
    }

    #[test]
    fn apply_rejects_parent_changed_between_resolve_and_apply() {
        let mut state = state_with(&[("a", "world"), ("b", "world"), ("f", "a")]);
        let oracle = ScriptedOracle::new();
        oracle.set("a", "src", Pose::from_position(1.0, 0.0, 0.0));

        let mut cmd = Command::align("f", "src", [Axis::X].into_iter().collect::<AxisSet>());
        cmd.resolve(&state, &oracle, &Config::default().oracle_query())
            .unwrap();

        // Concurrent reparent lands between the phases.
        state.graph.reparent("f", "b").unwrap();

        let err = cmd.apply(&mut state).unwrap_err();
        assert!(matches!(err, FrameError::PreconditionInvalidated { .. }));
        assert_eq!(state.graph.get("f").unwrap().pose, Pose::identity());
    }

    #[test]
    fn set_parent_without_oracle_only_touches_parent_field() {
        let mut state = state_with(&[("a", "world"), ("f", "a")]);
        let oracle = ScriptedOracle::new();

        let mut cmd = Command::set_parent("f", "world", false);
        cmd.resolve(&state, &oracle, &Config::default().oracle_query())
            .unwrap();
        cmd.apply(&mut state).unwrap();

        let f = state.graph.get("f").unwrap();
        assert_eq!(f.parent, "world");
        assert_eq!(f.pose, Pose::identity());

        cmd.revert(&mut state).unwrap();
        assert_eq!(state.graph.get("f").unwrap().parent, "a");
    }

    #[test]
    fn keep_absolute_requires_both_chains() {
        let mut state = state_with(&[("a", "world"), ("f", "a")]);
        let oracle = ScriptedOracle::new();
        // New chain resolvable, old chain not.
        oracle.set("world", "f", Pose::from_position(3.0, 0.0, 0.0));

        let mut cmd = Command::set_parent("f", "world", true);
        let err = cmd
            .resolve(&state, &oracle, &Config::default().oracle_query())
            .unwrap_err();
        assert!(matches!(err, FrameError::OracleUnavailable { .. }));
        assert!(cmd.apply(&mut state).is_err());
        assert_eq!(state.graph.get("f").unwrap().parent, "a");
    }

    #[test]
    fn add_replace_snapshot_round_trips() {
        let mut state = state_with(&[("a", "world")]);
        let displaced = state.graph.get("a").unwrap().clone();

        let mut cmd = Command::add(Frame::with_pose(
            "a",
            "world",
            Pose::from_position(5.0, 0.0, 0.0),
        ));
        cmd.apply(&mut state).unwrap();
        assert_eq!(state.graph.get("a").unwrap().pose.position.x, 5.0);

        cmd.revert(&mut state).unwrap();
        assert_eq!(state.graph.get("a").unwrap(), &displaced);
    }
}
