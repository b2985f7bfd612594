//! Authoring → store round-trip: a config written by the authoring tool
//! must load back through the business store unchanged.

use bizchat::authoring::{self, AuthoringInput};
use bizchat::store::BusinessStore;
use tempfile::TempDir;

#[test]
fn authored_config_round_trips_through_the_store() {
    let input = AuthoringInput {
        business_name: "Mario's".into(),
        business_id: "marios-italian".into(),
        location: "123 Main St".into(),
        phone: "555-1234".into(),
        email: String::new(),
        hours: "Mon-Fri 9-5".into(),
        faqs: vec!["Do you deliver?".into()],
    };
    let record = authoring::assemble(&input);

    for label in ["LOCATION:", "HOURS:", "CONTACT:", "FREQUENTLY ASKED QUESTIONS:"] {
        assert!(
            record.system_prompt.contains(label),
            "system prompt missing section {label}"
        );
    }
    assert!(record.system_prompt.contains("Do you deliver?"));

    let tmp = TempDir::new().unwrap();
    let path = authoring::write(tmp.path(), &record).unwrap();
    assert!(path.ends_with("marios-italian/config.json"));

    let store = BusinessStore::load(tmp.path());
    let loaded = store.get("marios-italian").expect("authored config should load");
    assert_eq!(*loaded, record);
}

#[test]
fn writing_twice_overwrites_cleanly() {
    let tmp = TempDir::new().unwrap();
    let mut input = AuthoringInput {
        business_name: "Mario's".into(),
        business_id: "marios-italian".into(),
        ..Default::default()
    };
    authoring::write(tmp.path(), &authoring::assemble(&input)).unwrap();

    input.hours = "Mon-Sun 8-8".into();
    let updated = authoring::assemble(&input);
    authoring::write(tmp.path(), &updated).unwrap();

    let store = BusinessStore::load(tmp.path());
    assert_eq!(store.len(), 1);
    assert!(store
        .get("marios-italian")
        .unwrap()
        .system_prompt
        .contains("Mon-Sun 8-8"));
}
