//! The frame graph: owns the set of frames, enforces name uniqueness and
//! acyclicity, and resolves parent/child lookups.

use hashbrown::HashMap;

use crate::error::FrameError;
use crate::frame::{Frame, Pose};
use crate::Result;

/// Name → frame map rooted at a sentinel frame that is never stored.
///
/// Invariants: keys equal each frame's own `name`; the root sentinel name can
/// never be used by a stored frame; every parent chain reaches the sentinel
/// (or an externally-resolved frame, see [`FrameGraph::put`]) without cycles.
#[derive(Debug, Clone)]
pub struct FrameGraph {
    frames: HashMap<String, Frame>,
    root: String,
}

impl FrameGraph {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            frames: HashMap::new(),
            root: root.into(),
        }
    }

    /// Name of the root sentinel.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.frames.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Frame> {
        self.frames.get(name).ok_or_else(|| FrameError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.values()
    }

    /// Names of frames whose `parent` is `name`.
    pub fn children_of(&self, name: &str) -> Vec<String> {
        let mut children: Vec<String> = self
            .frames
            .values()
            .filter(|f| f.parent == name)
            .map(|f| f.name.clone())
            .collect();
        children.sort();
        children
    }

    /// Parent chain of `name`, nearest first, ending at the root sentinel or
    /// at the first parent not stored in the graph.
    pub fn ancestors(&self, name: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut cursor = match self.frames.get(name) {
            Some(f) => f.parent.clone(),
            None => return chain,
        };
        // Bounded by the frame count; the acyclicity invariant makes the
        // bound unreachable in practice.
        for _ in 0..=self.frames.len() {
            chain.push(cursor.clone());
            if cursor == self.root {
                break;
            }
            match self.frames.get(&cursor) {
                Some(f) => cursor = f.parent.clone(),
                None => break,
            }
        }
        chain
    }

    /// True if `candidate` appears on the parent chain of `name` (or equals it).
    pub fn is_ancestor_or_self(&self, candidate: &str, name: &str) -> bool {
        candidate == name || self.ancestors(name).iter().any(|a| a == candidate)
    }

    /// Insert a new frame. Fails with `AlreadyExists` on a name collision
    /// (including the reserved root name) and `InvalidParent` when the parent
    /// is neither a stored frame nor the root sentinel.
    pub fn insert(&mut self, frame: Frame) -> Result<()> {
        if self.contains(&frame.name) {
            return Err(FrameError::AlreadyExists { name: frame.name });
        }
        self.put(frame, false).map(|_| ())
    }

    /// Insert or replace, returning the displaced frame if any.
    ///
    /// `allow_external_parent` admits a parent that is neither stored nor the
    /// sentinel; only the copy-frame path sets it, for frames parented at an
    /// externally broadcast frame the graph does not own.
    pub(crate) fn put(
        &mut self,
        frame: Frame,
        allow_external_parent: bool,
    ) -> Result<Option<Frame>> {
        if frame.name == self.root {
            return Err(FrameError::AlreadyExists { name: frame.name });
        }
        if frame.name == frame.parent {
            return Err(FrameError::InvalidParent {
                name: frame.name.clone(),
                parent: frame.parent.clone(),
            });
        }
        let parent_known = frame.parent == self.root || self.contains(&frame.parent);
        if !parent_known && !allow_external_parent {
            return Err(FrameError::InvalidParent {
                name: frame.name.clone(),
                parent: frame.parent.clone(),
            });
        }
        // Replacing an existing frame may move it; make sure the new parent
        // does not sit below the frame itself.
        if self.contains(&frame.name) && self.is_ancestor_or_self(&frame.name, &frame.parent) {
            return Err(FrameError::CycleDetected {
                name: frame.name.clone(),
                parent: frame.parent.clone(),
            });
        }
        Ok(self.frames.insert(frame.name.clone(), frame))
    }

    /// Remove a frame. Fails with `HasDependents` while other frames still
    /// reference it as parent; callers remove leaves first.
    pub fn remove(&mut self, name: &str) -> Result<Frame> {
        if !self.contains(name) {
            return Err(FrameError::NotFound {
                name: name.to_string(),
            });
        }
        let children = self.children_of(name);
        if !children.is_empty() {
            return Err(FrameError::HasDependents {
                name: name.to_string(),
                children,
            });
        }
        self.frames
            .remove(name)
            .ok_or_else(|| FrameError::NotFound {
                name: name.to_string(),
            })
    }

    /// Structural half of a reparent: validates and updates only the `parent`
    /// field. Pose handling for `keep_absolute` lives in the SetParent
    /// command, which writes the recomputed local pose separately.
    pub fn reparent(&mut self, name: &str, new_parent: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(FrameError::NotFound {
                name: name.to_string(),
            });
        }
        if new_parent != self.root && !self.contains(new_parent) {
            return Err(FrameError::InvalidParent {
                name: name.to_string(),
                parent: new_parent.to_string(),
            });
        }
        if self.is_ancestor_or_self(name, new_parent) {
            return Err(FrameError::CycleDetected {
                name: name.to_string(),
                parent: new_parent.to_string(),
            });
        }
        if let Some(frame) = self.frames.get_mut(name) {
            frame.parent = new_parent.to_string();
        }
        Ok(())
    }

    pub(crate) fn set_pose(&mut self, name: &str, pose: Pose) -> Result<Pose> {
        let frame = self.frames.get_mut(name).ok_or_else(|| FrameError::NotFound {
            name: name.to_string(),
        })?;
        let prior = frame.pose;
        frame.pose = pose;
        Ok(prior)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut Frame> {
        self.frames.get_mut(name).ok_or_else(|| FrameError::NotFound {
            name: name.to_string(),
        })
    }

    /// Undo-path restore: puts a previously captured frame back verbatim.
    pub(crate) fn restore(&mut self, frame: Frame) {
        self.frames.insert(frame.name.clone(), frame);
    }

    /// Undo-path removal: drops a frame without the dependent check.
    pub(crate) fn take(&mut self, name: &str) -> Option<Frame> {
        self.frames.remove(name)
    }
}
