use std::path::PathBuf;

use planner::error::{exit_codes, Error, JsonError};
use planner::task::Status;

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let label = "Blocked".parse::<Status>().expect_err("unknown status");
    assert_eq!(Error::from(label).exit_code(), exit_codes::USER_ERROR);

    let policy = Error::PendingTaskDelete(7);
    assert_eq!(policy.exit_code(), exit_codes::POLICY_BLOCKED);

    let op = Error::OperationFailed("boom".to_string());
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);

    let corrupt = Error::CorruptStore {
        path: PathBuf::from("tasks.csv"),
        message: "bad row".to_string(),
    };
    assert_eq!(corrupt.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code_and_details() {
    let err = Error::PendingTaskDelete(7);
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::POLICY_BLOCKED);
    assert_eq!(json.kind, "policy_blocked");
    assert!(json.message.contains("Task 7 is still Pending"));
    assert_eq!(json.details, Some(serde_json::json!({ "id": 7 })));

    let plain = JsonError::from(&Error::InvalidConfig("bad".to_string()));
    assert_eq!(plain.kind, "user_error");
    assert_eq!(plain.details, None);

    let failed = JsonError::from(&Error::OperationFailed("boom".to_string()));
    assert_eq!(failed.kind, "operation_failed");
}
