use serde_json::json;
use solace_storage::objects::ObjectMeta;

#[test]
fn exported_file_carries_its_url() {
    let meta = ObjectMeta::new(
        "lake-output",
        "us-east-1",
        "exports/job-1/Patient-1.ndjson",
        2048,
        Some("2024-05-01T10:00:00Z".to_string()),
    );

    assert_eq!(
        serde_json::to_value(&meta).unwrap(),
        json!({
            "key": "exports/job-1/Patient-1.ndjson",
            "url": "https://lake-output.s3.us-east-1.amazonaws.com/exports/job-1/Patient-1.ndjson",
            "size": 2048,
            "lastModified": "2024-05-01T10:00:00Z"
        })
    );
}

#[test]
fn unknown_modification_time_is_omitted() {
    let meta = ObjectMeta::new("b", "eu-west-2", "exports/a.ndjson", 0, None);
    let value = serde_json::to_value(&meta).unwrap();
    assert!(value.get("lastModified").is_none());
}
