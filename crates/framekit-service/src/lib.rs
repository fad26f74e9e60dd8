//! framekit-service: the transport-agnostic request/response boundary of the
//! frame editor.
//!
//! Each request maps 1:1 onto a core [`Command`](framekit_core::Command) (or
//! the copy-frame composite); responses carry a numeric `error_code` that is
//! the contract; textual diagnostics are advisory only. Plug these types
//! into whatever transport the host speaks (RPC services, pub/sub, a CLI).

pub mod messages;
pub mod service;

pub use messages::{
    Ack, AlignFrameRequest, CopyFrameRequest, EditFrameRequest, GetFrameRequest,
    GetFrameResponse, PoseMsg, RemoveFrameRequest, SetFrameRequest, SetParentFrameRequest,
    ERR_NOT_FOUND, ERR_NO_NAME, ERR_NO_PARENT, ERR_NO_SOURCE, ERR_OK, ERR_ORACLE,
};
pub use service::FrameService;
