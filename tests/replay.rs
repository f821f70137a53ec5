//! Replay properties of the fold engine over raw historical log shapes.

use pharmalog::{replay, AppState, EventLog, EventMeta, EventRecord, InMemoryLog, Severity};
use serde_json::{json, Value};

fn record(event_type: &str, uuid: &str, timestamp: f64, payload: Value) -> EventRecord {
    EventRecord {
        metadata: EventMeta {
            event_type: event_type.to_string(),
            timestamp,
            uuid: uuid.to_string(),
        },
        payload,
    }
}

fn drug_added(uuid: &str, timestamp: f64, name: &str) -> EventRecord {
    record(
        "DrugAdded",
        uuid,
        timestamp,
        json!({ "drug": name, "drug_details": [] }),
    )
}

#[test]
fn folding_the_empty_sequence_yields_empty_state() {
    assert_eq!(replay(&[]), AppState::default());
}

#[test]
fn out_of_order_append_replays_by_timestamp() {
    let records = vec![
        record(
            "InteractionAdded",
            "int_1",
            3.0,
            json!({ "drug1Id": "drug_1", "drug2Id": "drug_2", "reco": "CONTRE-INDICATION" }),
        ),
        drug_added("drug_2", 2.0, "ASPIRINE"),
        drug_added("drug_1", 1.0, "WARFARINE"),
    ];
    let state = replay(&records);
    assert_eq!(state.drug_count(), 2);
    assert_eq!(state.interaction_count(), 1);
    assert_eq!(
        state.interaction("int_1").unwrap().severity,
        Severity::Severe
    );
}

#[test]
fn timestamp_ties_replay_in_sequence_position() {
    // Add and rename carry the same timestamp; the stable sort must keep the
    // add first so the rename lands.
    let records = vec![
        drug_added("drug_1", 5.0, "WARFARINE"),
        record(
            "DrugUpdated",
            "evt_1",
            5.0,
            json!({ "id": "drug_1", "name": "WARFARINE SODIQUE", "details": [] }),
        ),
    ];
    let state = replay(&records);
    assert_eq!(state.drug("drug_1").unwrap().name, "WARFARINE SODIQUE");
}

#[test]
fn replaying_twice_yields_structurally_equal_states() {
    let records = vec![
        drug_added("drug_1", 1.0, "WARFARINE"),
        drug_added("drug_2", 2.0, "ASPIRINE"),
        record(
            "InteractionAdded",
            "int_1",
            3.0,
            json!({
                "drug1Id": "drug_1",
                "drug2Id": "drug_2",
                "description": ["Risque hémorragique"],
                "reco": "Association DECONSEILLEE",
                "reco_details": ["Surveillance clinique"],
            }),
        ),
        record("DrugDeleted", "evt_1", 4.0, json!({ "drugId": "drug_2" })),
    ];
    assert_eq!(replay(&records), replay(&records));
}

#[test]
fn contre_indication_projects_as_severe() {
    let records = vec![
        drug_added("drug_w", 1.0, "WARFARIN"),
        drug_added("drug_a", 2.0, "ASPIRIN"),
        record(
            "InteractionAdded",
            "int_1",
            3.0,
            json!({
                "drug1Id": "drug_w",
                "drug2Id": "drug_a",
                "reco": "CONTRE-INDICATION absolue en association",
            }),
        ),
    ];
    let state = replay(&records);
    assert_eq!(
        state.interaction("int_1").unwrap().severity,
        Severity::Severe
    );
}

#[test]
fn update_rederives_severity_from_patched_reco() {
    let records = vec![
        drug_added("drug_w", 1.0, "WARFARIN"),
        drug_added("drug_a", 2.0, "ASPIRIN"),
        record(
            "InteractionAdded",
            "int_1",
            3.0,
            json!({
                "drug1Id": "drug_w",
                "drug2Id": "drug_a",
                "reco": "CONTRE-INDICATION",
            }),
        ),
        record(
            "InteractionUpdated",
            "evt_1",
            4.0,
            json!({ "id": "int_1", "reco": "Association DECONSEILLEE" }),
        ),
    ];
    let state = replay(&records);
    assert_eq!(
        state.interaction("int_1").unwrap().severity,
        Severity::Moderate
    );
}

#[test]
fn drug_delete_cascades_regardless_of_event_order() {
    let base = vec![
        drug_added("drug_w", 1.0, "WARFARIN"),
        drug_added("drug_a", 2.0, "ASPIRIN"),
    ];
    let interaction = record(
        "InteractionAdded",
        "int_1",
        3.0,
        json!({ "drug1Id": "drug_w", "drug2Id": "drug_a", "reco": "x" }),
    );
    let delete = record("DrugDeleted", "evt_1", 4.0, json!({ "drugId": "drug_w" }));

    // Interaction added before the delete: removed by the cascade.
    let mut before = base.clone();
    before.push(interaction.clone());
    before.push(delete.clone());
    assert_eq!(replay(&before).interaction_count(), 0);

    // Interaction added after the delete (by timestamp): its name reference
    // no longer resolves, so it fails resolution instead of reappearing.
    let late_interaction = record(
        "InteractionAdded",
        "int_2",
        5.0,
        json!({ "drug_name1": "WARFARIN", "drug_name2": "ASPIRIN", "reco": "x" }),
    );
    let mut after = base.clone();
    after.push(delete);
    after.push(late_interaction);
    let state = replay(&after);
    assert_eq!(state.interaction_count(), 0);
}

#[test]
fn legacy_name_payload_projects_same_interaction_as_id_payload() {
    let base = vec![
        drug_added("drug_w", 1.0, "WARFARINE"),
        drug_added("drug_a", 2.0, "ASPIRINE"),
    ];

    let mut by_id = base.clone();
    by_id.push(record(
        "InteractionAdded",
        "int_1",
        3.0,
        json!({
            "drug1Id": "drug_w",
            "drug2Id": "drug_a",
            "description": "Risque hémorragique majoré",
            "reco": "Association DECONSEILLEE",
        }),
    ));

    let mut by_name = base.clone();
    by_name.push(record(
        "InteractionAdded",
        "int_1",
        3.0,
        json!({
            "drug_name1": "WARFARINE",
            "drug_name2": "ASPIRINE",
            "description": ["Risque", "hémorragique", "majoré"],
            "reco": "Association DECONSEILLEE",
        }),
    ));

    let projected_by_id = replay(&by_id);
    let projected_by_name = replay(&by_name);
    assert_eq!(
        projected_by_id.interaction("int_1"),
        projected_by_name.interaction("int_1")
    );
}

#[test]
fn unresolvable_legacy_name_drops_the_interaction_silently() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let records = vec![
        drug_added("drug_w", 1.0, "WARFARINE"),
        record(
            "InteractionAdded",
            "int_1",
            2.0,
            json!({ "drug_name1": "WARFARINE", "drug_name2": "DISPARUE", "reco": "x" }),
        ),
    ];
    let state = replay(&records);
    assert_eq!(state.interaction_count(), 0);
    assert_eq!(state.drug_count(), 1);
}

#[test]
fn unknown_event_types_are_ignored() {
    let records = vec![
        drug_added("drug_1", 1.0, "WARFARINE"),
        record(
            "DrugRecalled",
            "evt_1",
            2.0,
            json!({ "drugId": "drug_1", "reason": "lot défectueux" }),
        ),
    ];
    let state = replay(&records);
    assert_eq!(state.drug_count(), 1);
    assert!(state.drug("drug_1").is_some());
}

#[test]
fn composition_and_lookup_events_feed_the_derived_caches() {
    let records = vec![
        drug_added("drug_1", 1.0, "DOLIPRANE"),
        record(
            "CompositionChecked",
            "evt_1",
            2.0,
            json!({ "drugId": "drug_1", "count": 4 }),
        ),
        record(
            "DrugFound",
            "evt_2",
            3.0,
            json!({ "drugName": "DOLIPRANE", "data": { "cis": "60234100" }, "error": false }),
        ),
    ];
    let state = replay(&records);
    let composition = state.composition_result("drug_1").unwrap();
    assert_eq!(composition.count, 4);
    assert_eq!(composition.error, None);
    assert_eq!(composition.timestamp, 2.0);
    let lookup = state.lookup_result("DOLIPRANE").unwrap();
    assert!(!lookup.error);
    assert_eq!(lookup.data["cis"], "60234100");
}

#[test]
fn full_historical_dump_replays_through_the_log_abstraction() {
    let json = r#"[
        {
            "metadata": { "event_type": "DrugAdded", "timestamp": 2.0, "uuid": "drug_a" },
            "payload": { "drug": "ASPIRINE", "drug_details": [] }
        },
        {
            "metadata": { "event_type": "DrugAdded", "timestamp": 1.0, "uuid": "drug_w" },
            "payload": { "drug": "WARFARINE", "drug_details": [] }
        },
        {
            "metadata": { "event_type": "InteractionAdded", "timestamp": 3.0, "uuid": "int_1" },
            "payload": {
                "drug_name1": "WARFARINE",
                "drug_name2": "ASPIRINE",
                "description": ["Majoration du risque hémorragique"],
                "reco": "CONTRE-INDICATION"
            }
        }
    ]"#;
    let log = InMemoryLog::from_json(json).unwrap();
    let state = replay(&log.read_all().unwrap());
    assert_eq!(state.drug_count(), 2);
    let interaction = state.interaction("int_1").unwrap();
    assert_eq!(interaction.drug1_id, "drug_w");
    assert_eq!(interaction.drug2_id, "drug_a");
    assert_eq!(interaction.severity, Severity::Severe);
    assert_eq!(interaction.description, "Majoration du risque hémorragique");
}
