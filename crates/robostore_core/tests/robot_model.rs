use robostore_core::{NewRobot, Robot, RobotUpdate};
use uuid::Uuid;

#[test]
fn robot_serialization_uses_expected_wire_fields() {
    let robot = Robot {
        id: Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap(),
        user_id: "u1".to_string(),
        listing_id: "l1".to_string(),
        name: "Arm".to_string(),
        description: Some("six axis".to_string()),
        created_at: 1_700_000_000,
        updated_at: 1_700_000_360,
    };

    let json = serde_json::to_value(&robot).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["user_id"], "u1");
    assert_eq!(json["listing_id"], "l1");
    assert_eq!(json["name"], "Arm");
    assert_eq!(json["description"], "six axis");
    assert_eq!(json["created_at"], 1_700_000_000_i64);
    assert_eq!(json["updated_at"], 1_700_000_360_i64);

    let decoded: Robot = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, robot);
}

#[test]
fn new_robot_accepts_payload_without_description() {
    let payload = serde_json::json!({
        "listing_id": "l1",
        "user_id": "u1",
        "name": "Arm",
    });

    let new_robot: NewRobot = serde_json::from_value(payload).unwrap();
    assert_eq!(new_robot, NewRobot::new("u1", "l1", "Arm"));
}

#[test]
fn robot_create_copies_request_fields() {
    let robot = Robot::create(NewRobot::new("u1", "l1", "Arm").with_description("gripper"));

    assert_eq!(robot.user_id, "u1");
    assert_eq!(robot.listing_id, "l1");
    assert_eq!(robot.name, "Arm");
    assert_eq!(robot.description.as_deref(), Some("gripper"));
    assert!(robot.validate().is_ok());
}

#[test]
fn update_builder_tracks_description_intent() {
    let set = RobotUpdate::new().description("gripper");
    assert_eq!(set.description, Some(Some("gripper".to_string())));

    let cleared = RobotUpdate::new().clear_description();
    assert_eq!(cleared.description, Some(None));
    assert_eq!(cleared.name, None);
}
