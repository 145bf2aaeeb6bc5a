use docshim::{
    bson::doc,
    document::{Document, DocumentExt},
    error::DocumentStoreError,
    memory::InMemoryStore,
    query::Filter,
    update::Update,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScheduleDetails {
    days: Vec<String>,
    start_time: String,
    end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Activity {
    #[serde(rename = "_id")]
    name: String,
    description: String,
    schedule_details: ScheduleDetails,
    max_participants: i32,
    participants: Vec<String>,
}

impl Document for Activity {
    fn collection_name() -> &'static str {
        "activities"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Teacher {
    #[serde(rename = "_id")]
    username: String,
    display_name: String,
    password: String,
    role: String,
}

impl Document for Teacher {
    fn collection_name() -> &'static str {
        "teachers"
    }
}

fn art_club() -> Activity {
    Activity {
        name: "Art Club".into(),
        description: "Explore various art techniques".into(),
        schedule_details: ScheduleDetails {
            days: vec!["Thursday".into()],
            start_time: "15:15".into(),
            end_time: "17:00".into(),
        },
        max_participants: 15,
        participants: vec!["amelia@mergington.edu".into()],
    }
}

fn teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            username: "mrodriguez".into(),
            display_name: "Ms. Rodriguez".into(),
            password: "$argon2id$opaque".into(),
            role: "teacher".into(),
        },
        Teacher {
            username: "principal".into(),
            display_name: "Principal Martinez".into(),
            password: "$argon2id$opaque".into(),
            role: "admin".into(),
        },
    ]
}

#[test]
fn typed_round_trip_through_the_store() {
    let mut store = InMemoryStore::new();
    let mut activities = store.typed_collection::<Activity>();

    activities.insert(&art_club()).unwrap();

    let found = activities.find_one(&Filter::new().eq("_id", "Art Club")).unwrap();
    assert_eq!(found, Some(art_club()));
    assert_eq!(activities.count(&Filter::new()).unwrap(), 1);
    assert_eq!(store.list_collections(), vec!["activities"]);
}

#[test]
fn typed_updates_and_cursor() {
    let mut store = InMemoryStore::new();
    let mut activities = store.typed_collection::<Activity>();
    activities.insert(&art_club()).unwrap();

    let result = activities
        .update_one(
            &Filter::new().eq("_id", "Art Club"),
            &Update::new().push("participants", "harper@mergington.edu"),
        )
        .unwrap();
    assert_eq!(result.modified_count, 1);

    let found = activities
        .find(Filter::new().any_of("schedule_details.days", ["Thursday"]))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].participants, vec!["amelia@mergington.edu", "harper@mergington.edu"]);
}

#[test]
fn teacher_accounts_seed_once_and_keep_passwords_opaque() {
    let mut store = InMemoryStore::new();
    let mut accounts = store.typed_collection::<Teacher>();

    assert!(accounts.seed_if_empty(teachers()).unwrap());
    assert!(!accounts.seed_if_empty(teachers()).unwrap());
    assert_eq!(accounts.count(&Filter::new()).unwrap(), 2);

    let admin = accounts.find_one(&Filter::new().eq("role", "admin")).unwrap().unwrap();
    assert_eq!(admin.username, "principal");
    assert_eq!(admin.password, "$argon2id$opaque");
}

#[test]
fn mismatched_stored_shape_surfaces_as_serialization_error() {
    let mut store = InMemoryStore::new();
    let mut accounts = store.typed_collection::<Teacher>();

    {
        use docshim::collection::DocumentCollection;
        accounts.untyped().insert_one(doc! { "_id": "ghost", "role": "teacher" }).unwrap();
    }

    let mut cursor = accounts.find(Filter::new()).unwrap();
    assert!(matches!(cursor.next(), Some(Err(DocumentStoreError::Serialization(_)))));
    assert!(cursor.next().is_none());
}

#[test]
fn json_view_of_typed_documents() {
    let json = art_club().to_json().unwrap();

    assert_eq!(json["_id"], "Art Club");
    assert_eq!(json["schedule_details"]["days"][0], "Thursday");
    assert_eq!(Activity::from_json(json).unwrap(), art_club());
}
