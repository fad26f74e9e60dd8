use std::sync::Arc;

use approx::assert_relative_eq;

use framekit_core::fixtures::ScriptedOracle;
use framekit_core::{Editor, Pose};
use framekit_service::{
    AlignFrameRequest, CopyFrameRequest, EditFrameRequest, FrameService, GetFrameRequest,
    PoseMsg, RemoveFrameRequest, SetFrameRequest, SetParentFrameRequest, ERR_NOT_FOUND,
    ERR_NO_NAME, ERR_NO_SOURCE, ERR_OK, ERR_ORACLE,
};

fn service() -> (FrameService, Arc<ScriptedOracle>) {
    let oracle = Arc::new(ScriptedOracle::new());
    let service = FrameService::new(Arc::new(Editor::default()), oracle.clone());
    (service, oracle)
}

fn set_frame(service: &FrameService, name: &str, parent: &str, position: [f64; 3]) {
    let ack = service.set_frame(&SetFrameRequest {
        name: name.into(),
        parent: parent.into(),
        pose: PoseMsg {
            position,
            ..PoseMsg::default()
        },
    });
    assert_eq!(ack.error_code, ERR_OK, "{}", ack.message);
}

#[test]
fn set_frame_defaults_parent_to_root() {
    let (service, _) = service();
    set_frame(&service, "base", "", [1.0, 0.0, 0.0]);

    let resp = service.get_frame(&GetFrameRequest {
        name: "base".into(),
    });
    assert_eq!(resp.error_code, ERR_OK);
    assert_eq!(resp.name, "base");
    assert_eq!(resp.parent, "world");
    assert_eq!(resp.pose.unwrap().position, [1.0, 0.0, 0.0]);
}

#[test]
fn get_frame_on_unknown_name_returns_code_2_with_no_fields() {
    let (service, _) = service();
    let resp = service.get_frame(&GetFrameRequest {
        name: "ghost".into(),
    });
    assert_eq!(resp.error_code, ERR_NOT_FOUND);
    assert!(resp.name.is_empty());
    assert!(resp.parent.is_empty());
    assert!(resp.pose.is_none());
}

#[test]
fn missing_name_fields_return_code_1() {
    let (service, _) = service();
    assert_eq!(
        service.get_frame(&GetFrameRequest::default()).error_code,
        ERR_NO_NAME
    );
    assert_eq!(
        service
            .remove_frame(&RemoveFrameRequest::default())
            .error_code,
        ERR_NO_NAME
    );
    assert_eq!(
        service.set_frame(&SetFrameRequest::default()).error_code,
        ERR_NO_NAME
    );
    assert_eq!(
        service
            .align_frame(&AlignFrameRequest::default())
            .error_code,
        ERR_NO_NAME
    );
    assert_eq!(
        service.copy_frame(&CopyFrameRequest::default()).error_code,
        ERR_NO_NAME
    );
    assert_eq!(
        service
            .set_parent_frame(&SetParentFrameRequest::default())
            .error_code,
        ERR_NO_NAME
    );
}

#[test]
fn missing_source_name_returns_code_3() {
    let (service, _) = service();
    set_frame(&service, "a", "", [0.0; 3]);

    let ack = service.align_frame(&AlignFrameRequest {
        name: "a".into(),
        source_name: String::new(),
        mode: 0x3f,
    });
    assert_eq!(ack.error_code, ERR_NO_SOURCE);

    let ack = service.copy_frame(&CopyFrameRequest {
        name: "b".into(),
        source_name: String::new(),
        parent: String::new(),
    });
    assert_eq!(ack.error_code, ERR_NO_SOURCE);
}

#[test]
fn set_parent_missing_parent_returns_code_2() {
    let (service, _) = service();
    set_frame(&service, "a", "", [0.0; 3]);

    let ack = service.set_parent_frame(&SetParentFrameRequest {
        name: "a".into(),
        parent: String::new(),
        keep_absolute: false,
    });
    assert_eq!(ack.error_code, 2);
}

#[test]
fn align_mode_bit0_only_moves_x() {
    let (service, oracle) = service();
    set_frame(&service, "f", "", [1.0, 2.0, 3.0]);
    oracle.set("world", "src", Pose::from_position(9.0, 8.0, 7.0));

    let ack = service.align_frame(&AlignFrameRequest {
        name: "f".into(),
        source_name: "src".into(),
        mode: 0b000001,
    });
    assert_eq!(ack.error_code, ERR_OK);

    let pose = service
        .get_frame(&GetFrameRequest { name: "f".into() })
        .pose
        .unwrap();
    assert_eq!(pose.position, [9.0, 2.0, 3.0]);
    assert_eq!(pose.orientation, [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn align_unknown_frame_returns_code_2() {
    let (service, _) = service();
    let ack = service.align_frame(&AlignFrameRequest {
        name: "ghost".into(),
        source_name: "src".into(),
        mode: 1,
    });
    assert_eq!(ack.error_code, ERR_NOT_FOUND);
}

#[test]
fn edit_frame_selects_and_resets() {
    let (service, _) = service();
    set_frame(&service, "a", "", [0.0; 3]);

    let ack = service.edit_frame(&EditFrameRequest { name: "a".into() });
    assert_eq!(ack.error_code, ERR_OK);
    assert_eq!(service.editor().selected(), Some("a".to_string()));

    let ack = service.edit_frame(&EditFrameRequest::default());
    assert_eq!(ack.error_code, ERR_OK);
    assert_eq!(service.editor().selected(), None);

    let ack = service.edit_frame(&EditFrameRequest {
        name: "ghost".into(),
    });
    assert_eq!(ack.error_code, ERR_NOT_FOUND);
}

#[test]
fn copy_frame_without_oracle_reports_code_4() {
    let (service, _) = service();
    set_frame(&service, "a", "", [0.0; 3]);
    set_frame(&service, "b", "", [1.0, 0.0, 0.0]);

    // "b" already exists, so copy means full alignment, which needs the
    // oracle to place "a" relative to b's parent.
    let ack = service.copy_frame(&CopyFrameRequest {
        name: "b".into(),
        source_name: "a".into(),
        parent: String::new(),
    });
    assert_eq!(ack.error_code, ERR_ORACLE);
}

#[test]
fn copy_then_reparent_full_flow() {
    let (service, oracle) = service();
    set_frame(&service, "a", "", [2.0, 0.0, 0.0]);
    set_frame(&service, "b", "a", [1.0, 0.0, 0.0]);

    oracle.set("world", "c", Pose::from_position(3.0, 0.0, 0.0));
    oracle.set("a", "c", Pose::from_position(1.0, 0.0, 0.0));

    // New name: phase 1 duplicates "b" (parent a), phase 3 reparents the
    // copy under world, preserving the absolute pose the oracle reports.
    let ack = service.copy_frame(&CopyFrameRequest {
        name: "c".into(),
        source_name: "b".into(),
        parent: "world".into(),
    });
    assert_eq!(ack.error_code, ERR_OK, "{}", ack.message);

    let resp = service.get_frame(&GetFrameRequest { name: "c".into() });
    assert_eq!(resp.parent, "world");
    assert_relative_eq!(resp.pose.unwrap().position[0], 3.0, epsilon = 1e-12);
}

#[test]
fn remove_then_undo_restores_the_frame() {
    let (service, _) = service();
    set_frame(&service, "a", "", [4.0, 0.0, 0.0]);

    let ack = service.remove_frame(&RemoveFrameRequest { name: "a".into() });
    assert_eq!(ack.error_code, ERR_OK);
    assert_eq!(
        service
            .get_frame(&GetFrameRequest { name: "a".into() })
            .error_code,
        ERR_NOT_FOUND
    );

    service.editor().undo().unwrap();
    let resp = service.get_frame(&GetFrameRequest { name: "a".into() });
    assert_eq!(resp.error_code, ERR_OK);
    assert_eq!(resp.pose.unwrap().position, [4.0, 0.0, 0.0]);
}

#[test]
fn requests_round_trip_through_json() {
    let req: SetFrameRequest = serde_json::from_str(
        r#"{"name":"tool","parent":"","pose":{"position":[0,0,1],"orientation":[0,0,0,1]}}"#,
    )
    .unwrap();
    assert_eq!(req.name, "tool");
    assert_eq!(req.pose.position, [0.0, 0.0, 1.0]);
}
