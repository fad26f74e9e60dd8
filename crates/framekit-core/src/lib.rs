//! framekit-core: a mutable, named tree of spatial coordinate frames edited
//! through an undoable command stack.
//!
//! Every structural change (add, remove, reparent, align, copy) goes through
//! [`Editor::execute`] as a [`Command`], which captures exactly the state it
//! overwrites so [`Editor::undo`] is an exact inverse. Pose-preserving
//! reparents and alignments consult an injected [`TransformOracle`], the
//! live transform service that is the authority on currently broadcast
//! absolute poses, rather than composing local chains by hand.

pub mod align;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod fixtures;
pub mod frame;
pub mod graph;
pub mod oracle;

pub use align::{Axis, AxisSet};
pub use command::Command;
pub use config::Config;
pub use editor::{Editor, EditorState};
pub use error::FrameError;
pub use frame::{Frame, Pose};
pub use graph::FrameGraph;
pub use oracle::{OracleQuery, TransformOracle};

/// Frame-editor result type.
pub type Result<T> = core::result::Result<T, FrameError>;
