use infobase::api::{InfobaseApi, RecordFilter};
use infobase::config::InfobaseConfig;
use infobase::error::{InfobaseError, Outcome};
use infobase::model::{ContentType, Metadata, NewRecord, RecordPatch, Timestamp};
use infobase::store::fs::FsBackend;
use infobase::store::StorageBackend;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn open(home: &TempDir) -> InfobaseApi<FsBackend> {
    InfobaseApi::open(home.path(), InfobaseConfig::default())
}

#[test]
fn test_save_and_reopen() {
    let home = TempDir::new().unwrap();

    let mut api = open(&home);
    api.add_record(NewRecord::new("Café notes", "crème brûlée").with_tags(["food"]))
        .unwrap();
    api.add_record(NewRecord::new("Docs", "").with_type(ContentType::Link))
        .unwrap();
    api.save().unwrap();

    let reopened = open(&home);
    assert_eq!(reopened.store().records(), api.store().records());
}

#[test]
fn test_unsaved_changes_are_not_persisted() {
    let home = TempDir::new().unwrap();

    let mut api = open(&home);
    api.add_record(NewRecord::new("Kept", "x")).unwrap();
    api.save().unwrap();
    api.add_record(NewRecord::new("Dropped", "y")).unwrap();

    let reopened = open(&home);
    assert_eq!(reopened.store().len(), 1);
}

#[test]
fn test_file_format() {
    let home = TempDir::new().unwrap();

    let mut metadata = Metadata::new();
    metadata.insert("zeta".into(), json!(1));
    metadata.insert("alpha".into(), json!("two"));
    let mut api = open(&home);
    api.add_record(NewRecord::new("Ünïcode", "text").with_metadata(metadata))
        .unwrap();
    api.save().unwrap();

    let path = home.path().join("information_database.json");
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("[\n  {\n    \"id\": 1,"));
    assert!(raw.contains("Ünïcode"));
    // metadata keys keep insertion order
    assert!(raw.find("\"zeta\"").unwrap() < raw.find("\"alpha\"").unwrap());
}

#[test]
fn test_atomic_write_leaves_no_tmp_files() {
    let home = TempDir::new().unwrap();

    let mut api = open(&home);
    for i in 0..3 {
        api.add_record(NewRecord::new(format!("Record {}", i), "x"))
            .unwrap();
        api.save().unwrap();
    }

    for entry in fs::read_dir(home.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_foreign_content_type_survives_round_trip() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("information_database.json");
    fs::write(
        &path,
        r#"[{"id": 1, "title": "Episode", "content": "", "content_type": "podcast",
             "created_at": "2023-05-06 07:08:09", "updated_at": "2023-05-06 07:08:09"}]"#,
    )
    .unwrap();

    let mut api = open(&home);
    assert_eq!(
        api.store().records()[0].content_type,
        ContentType::Other("podcast".into())
    );
    api.update_record(1, RecordPatch::new().tags(["audio"]))
        .unwrap();
    api.save().unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"content_type\": \"podcast\""));
    assert!(raw.contains("\"created_at\": \"2023-05-06 07:08:09\""));
}

#[test]
fn test_legacy_timestamps_survive_add_and_save() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("information_database.json");
    fs::write(
        &path,
        r#"[{"id": 1, "title": "First", "content": "one",
             "created_at": "2024-01-01 09:00:00", "updated_at": "2024-01-01 09:00:00"},
            {"id": 2, "title": "Second", "content": "two",
             "created_at": "2024-01-01T10:00:00", "updated_at": "2024-01-01 10:00:00"}]"#,
    )
    .unwrap();

    let mut api = open(&home);
    assert_eq!(api.store().len(), 2);
    api.add_record(NewRecord::new("Third", "three")).unwrap();
    api.save().unwrap();

    let reopened = open(&home);
    let titles: Vec<&str> = reopened
        .store()
        .records()
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
    assert_eq!(
        reopened.store().records()[1].created_at,
        Timestamp::Raw("2024-01-01T10:00:00".into())
    );

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"created_at\": \"2024-01-01T10:00:00\""));
    assert!(raw.contains("\"created_at\": \"2024-01-01 09:00:00\""));
}

#[test]
fn test_unreadable_file_is_not_overwritten() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("information_database.json");
    fs::write(&path, "[{\"id\": 1, \"title\": ").unwrap();

    let mut api = open(&home);
    assert!(api.store().is_empty());
    api.add_record(NewRecord::new("New", "x")).unwrap();

    assert!(matches!(api.save(), Err(InfobaseError::Store(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"id\": 1, \"title\": ");
}

#[test]
fn test_missing_directory_is_created_on_save() {
    let home = TempDir::new().unwrap();
    let nested = home.path().join("a").join("b");

    let mut api = InfobaseApi::open(&nested, InfobaseConfig::default());
    api.add_record(NewRecord::new("Deep", "x")).unwrap();
    api.save().unwrap();

    assert!(nested.join("information_database.json").exists());
    assert!(api.store().backend().size().unwrap() > 0);
}

#[test]
fn test_boolean_contract() {
    let home = TempDir::new().unwrap();
    let mut api = open(&home);

    assert!(api.add_record(NewRecord::new("Ok", "x")).succeeded("add"));
    assert!(!api.add_record(NewRecord::new("  ", "x")).succeeded("add"));
    assert!(!api.delete_records(&[42]).succeeded("delete"));
    assert!(api.save().succeeded("save"));

    let listed = api.get_records(&RecordFilter::default()).unwrap();
    assert_eq!(listed.listed_records.len(), 1);
}
