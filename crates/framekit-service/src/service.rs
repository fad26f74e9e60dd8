//! The frame service: maps each request onto a core command and translates
//! failures into the numeric error-code contract.

use std::sync::Arc;

use framekit_core::{Command, Editor, Frame, FrameError, TransformOracle};

use crate::messages::{
    decode_mode, Ack, AlignFrameRequest, CopyFrameRequest, EditFrameRequest, GetFrameRequest,
    GetFrameResponse, RemoveFrameRequest, SetFrameRequest, SetParentFrameRequest, ERR_NOT_FOUND,
    ERR_NO_NAME, ERR_NO_PARENT, ERR_NO_SOURCE,
};

/// Transport-agnostic front end over a shared [`Editor`].
///
/// Thread-safe: requests may arrive concurrently; the editor's own locking
/// keeps mutations serialized and reads consistent.
pub struct FrameService {
    editor: Arc<Editor>,
    oracle: Arc<dyn TransformOracle + Send + Sync>,
}

impl FrameService {
    pub fn new(editor: Arc<Editor>, oracle: Arc<dyn TransformOracle + Send + Sync>) -> Self {
        Self { editor, oracle }
    }

    pub fn editor(&self) -> &Arc<Editor> {
        &self.editor
    }

    fn run(&self, command: Command) -> Ack {
        match self.editor.execute(command, self.oracle.as_ref()) {
            Ok(()) => Ack::ok(),
            Err(e) => failed(e),
        }
    }

    /// Align `name` against `source_name` on the axes selected by the mode
    /// bitmask.
    pub fn align_frame(&self, req: &AlignFrameRequest) -> Ack {
        log::info!(
            "align_frame: name='{}' source='{}' mode={:#04x}",
            req.name,
            req.source_name,
            req.mode
        );
        if req.name.is_empty() {
            return rejected(ERR_NO_NAME, "no name given");
        }
        if req.source_name.is_empty() {
            return rejected(ERR_NO_SOURCE, "no source name given");
        }
        if self.editor.frame(&req.name).is_none() {
            return rejected(ERR_NOT_FOUND, format!("frame not found: {}", req.name));
        }
        self.run(Command::align(
            req.name.clone(),
            req.source_name.clone(),
            decode_mode(req.mode),
        ))
    }

    /// Select a frame for editing; an empty name resets the selection.
    pub fn edit_frame(&self, req: &EditFrameRequest) -> Ack {
        log::info!("edit_frame: name='{}'", req.name);
        if req.name.is_empty() {
            return self.run(Command::select(None));
        }
        if self.editor.frame(&req.name).is_none() {
            return rejected(ERR_NOT_FOUND, format!("frame not found: {}", req.name));
        }
        self.run(Command::select(Some(req.name.clone())))
    }

    pub fn get_frame(&self, req: &GetFrameRequest) -> GetFrameResponse {
        log::info!("get_frame: name='{}'", req.name);
        if req.name.is_empty() {
            log::warn!("get_frame rejected: no name given");
            return GetFrameResponse::err(ERR_NO_NAME, "no name given");
        }
        match self.editor.frame(&req.name) {
            Some(frame) => GetFrameResponse::found(&frame),
            None => {
                log::warn!("get_frame rejected: frame not found: {}", req.name);
                GetFrameResponse::err(ERR_NOT_FOUND, format!("frame not found: {}", req.name))
            }
        }
    }

    pub fn remove_frame(&self, req: &RemoveFrameRequest) -> Ack {
        log::info!("remove_frame: name='{}'", req.name);
        if req.name.is_empty() {
            return rejected(ERR_NO_NAME, "no name given");
        }
        if self.editor.frame(&req.name).is_none() {
            return rejected(ERR_NOT_FOUND, format!("frame not found: {}", req.name));
        }
        self.run(Command::remove(req.name.clone()))
    }

    /// Add a frame, or replace it if the name is already taken. An empty
    /// parent defaults to the root frame.
    pub fn set_frame(&self, req: &SetFrameRequest) -> Ack {
        log::info!("set_frame: name='{}' parent='{}'", req.name, req.parent);
        if req.name.is_empty() {
            return rejected(ERR_NO_NAME, "no name given");
        }
        let parent = if req.parent.is_empty() {
            self.editor.config().root_frame.clone()
        } else {
            req.parent.clone()
        };
        self.run(Command::add(Frame::with_pose(
            req.name.clone(),
            parent,
            req.pose.to_pose(),
        )))
    }

    pub fn set_parent_frame(&self, req: &SetParentFrameRequest) -> Ack {
        log::info!(
            "set_parent_frame: name='{}' parent='{}' keep_absolute={}",
            req.name,
            req.parent,
            req.keep_absolute
        );
        if req.name.is_empty() {
            return rejected(ERR_NO_NAME, "no frame name given");
        }
        if req.parent.is_empty() {
            return rejected(ERR_NO_PARENT, "no parent name given");
        }
        self.run(Command::set_parent(
            req.name.clone(),
            req.parent.clone(),
            req.keep_absolute,
        ))
    }

    /// The copy composite: create-or-align, then optionally reparent keeping
    /// the absolute pose. Phases are individually atomic; a later phase's
    /// failure leaves earlier phases applied.
    pub fn copy_frame(&self, req: &CopyFrameRequest) -> Ack {
        log::info!(
            "copy_frame: source='{}' new name='{}' new parent='{}'",
            req.source_name,
            req.name,
            req.parent
        );
        if req.name.is_empty() {
            return rejected(ERR_NO_NAME, "no name given");
        }
        if req.source_name.is_empty() {
            return rejected(ERR_NO_SOURCE, "no source name given");
        }
        let parent = (!req.parent.is_empty()).then_some(req.parent.as_str());
        match self
            .editor
            .copy_frame(&req.name, &req.source_name, parent, self.oracle.as_ref())
        {
            Ok(()) => Ack::ok(),
            Err(e) => failed(e),
        }
    }
}

fn rejected(code: u8, message: impl Into<String>) -> Ack {
    let message = message.into();
    log::warn!("request rejected: {message}");
    Ack::err(code, message)
}

fn failed(e: FrameError) -> Ack {
    log::warn!("command failed ({}): {e}", e.category());
    Ack::err(e.code(), e.to_string())
}
