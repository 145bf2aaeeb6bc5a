use docshim::{
    bson::{Bson, Document, doc},
    collection::DocumentCollection,
    memory::{InMemoryCollection, InMemoryStore},
    query::Filter,
    seed::seed_if_empty,
    update::{Update, UpdateResult},
};

fn activity(name: &str, days: &[&str], max_participants: i32, participants: &[&str]) -> Document {
    doc! {
        "_id": name,
        "description": format!("{name} description"),
        "schedule_details": {
            "days": days.to_vec(),
            "start_time": "15:15",
            "end_time": "16:45",
        },
        "max_participants": max_participants,
        "participants": participants.to_vec(),
    }
}

fn activities() -> Vec<Document> {
    vec![
        activity("Chess Club", &["Monday", "Friday"], 12, &["michael@mergington.edu", "daniel@mergington.edu"]),
        activity("Programming Class", &["Tuesday", "Thursday"], 20, &["emma@mergington.edu", "sophia@mergington.edu"]),
        activity("Basketball Team", &["Friday"], 15, &["ava@mergington.edu"]),
        activity("Science Olympiad", &["Thursday"], 18, &["isabella@mergington.edu"]),
        activity("Soccer Team", &["Tuesday", "Thursday"], 25, &[]),
    ]
}

fn seeded() -> InMemoryCollection {
    let mut collection = InMemoryCollection::new();
    assert!(seed_if_empty(&mut collection, activities()).unwrap());
    collection
}

fn ids(documents: impl Iterator<Item = Document>) -> Vec<String> {
    documents
        .map(|document| document.get_str("_id").unwrap().to_string())
        .collect()
}

fn participants(collection: &InMemoryCollection, name: &str) -> Vec<Bson> {
    collection
        .find_one(&Filter::new().eq("_id", name))
        .unwrap()
        .unwrap()
        .get_array("participants")
        .unwrap()
        .clone()
}

#[test]
fn reads_return_isolated_copies() {
    let collection = seeded();
    let filter = Filter::new().eq("_id", "Chess Club");

    let mut copy = collection.find_one(&filter).unwrap().unwrap();
    assert_eq!(copy, activities()[0]);

    copy.insert("max_participants", 99);
    if let Some(Bson::Array(days)) = copy.get_document_mut("schedule_details").unwrap().get_mut("days") {
        days.clear();
    }
    for mut document in collection.find(Filter::new()).unwrap() {
        document.insert("participants", Bson::Array(vec![]));
    }

    assert_eq!(collection.find_one(&filter).unwrap().unwrap(), activities()[0]);
}

#[test]
fn duplicate_identifier_replaces_without_growing() {
    let mut collection = seeded();
    let replacement = activity("Chess Club", &["Sunday"], 30, &[]);

    collection.insert_one(&replacement).unwrap();

    assert_eq!(collection.count_documents(&Filter::new()).unwrap(), 5);
    let names = ids(collection.find(Filter::new()).unwrap());
    assert_eq!(names[0], "Chess Club");
    assert_eq!(collection.find_one(&Filter::new().eq("_id", "Chess Club")).unwrap().unwrap(), replacement);
}

#[test]
fn count_of_everything_is_distinct_identifiers() {
    let mut collection = InMemoryCollection::new();
    assert_eq!(collection.count_documents(&Filter::new()).unwrap(), 0);

    for document in activities().iter().chain(activities().iter()) {
        collection.insert_one(document).unwrap();
    }

    assert_eq!(collection.count_documents(&Filter::new()).unwrap(), 5);
}

#[test]
fn range_filter_is_a_closed_interval() {
    let collection = seeded();
    let filter = Filter::try_from(doc! { "max_participants": { "$gte": 15, "$lte": 20 } }).unwrap();

    assert_eq!(
        ids(collection.find(filter.clone()).unwrap()),
        vec!["Programming Class", "Basketball Team", "Science Olympiad"],
    );
    assert_eq!(collection.count_documents(&filter).unwrap(), 3);
}

#[test]
fn membership_filter_intersects_arrays() {
    let collection = seeded();
    let filter = Filter::try_from(doc! { "schedule_details.days": { "$in": ["Monday"] } }).unwrap();

    assert_eq!(ids(collection.find(filter).unwrap()), vec!["Chess Club"]);

    let weekend_or_friday = Filter::new().any_of("schedule_details.days", ["Friday", "Saturday"]);
    assert_eq!(ids(collection.find(weekend_or_friday).unwrap()), vec!["Chess Club", "Basketball Team"]);
}

#[test]
fn combined_filters() {
    let collection = seeded();
    let filter = Filter::try_from(doc! {
        "schedule_details.days": { "$in": ["Thursday"] },
        "max_participants": { "$lte": 20 },
    })
    .unwrap();

    assert_eq!(ids(collection.find(filter).unwrap()), vec!["Programming Class", "Science Olympiad"]);
}

#[test]
fn push_then_pull_participant() {
    let mut collection = seeded();
    let filter = Filter::try_from(doc! { "_id": "Chess Club" }).unwrap();
    let email = "x@mergington.edu";

    let pushed = collection
        .update_one(&filter, &Update::try_from(doc! { "$push": { "participants": email } }).unwrap())
        .unwrap();
    assert_eq!(pushed.modified_count, 1);
    assert_eq!(participants(&collection, "Chess Club").len(), 3);
    assert_eq!(participants(&collection, "Chess Club").last(), Some(&Bson::from(email)));

    let pulled = collection
        .update_one(&filter, &Update::try_from(doc! { "$pull": { "participants": email } }).unwrap())
        .unwrap();
    assert_eq!(pulled.modified_count, 1);
    assert_eq!(participants(&collection, "Chess Club").len(), 2);

    let before = collection.find_one(&filter).unwrap();
    let missing = collection
        .update_one(&filter, &Update::new().pull("participants", email))
        .unwrap();
    assert_eq!(missing, UpdateResult { matched_count: 1, modified_count: 0 });
    assert_eq!(collection.find_one(&filter).unwrap(), before);
}

#[test]
fn update_without_match_modifies_nothing() {
    let mut collection = seeded();

    let result = collection
        .update_one(
            &Filter::new().eq("_id", "Drama Club"),
            &Update::new().push("participants", "x@mergington.edu"),
        )
        .unwrap();

    assert_eq!(result, UpdateResult::default());
    assert_eq!(
        collection.find(Filter::new()).unwrap().collect::<Vec<_>>(),
        activities(),
    );
}

#[test]
fn update_touches_only_the_first_match() {
    let mut collection = seeded();
    let both = Filter::new().any_of("schedule_details.days", ["Tuesday"]);

    let result = collection
        .update_one(&both, &Update::new().push("participants", "x@mergington.edu"))
        .unwrap();

    assert_eq!(result.modified_count, 1);
    assert_eq!(participants(&collection, "Programming Class").len(), 3);
    assert!(participants(&collection, "Soccer Team").is_empty());
}

#[test]
fn grouping_returns_sorted_distinct_days() {
    let collection = seeded();

    let records = collection.group_distinct("schedule_details.days").collect::<Vec<_>>();

    assert_eq!(
        records,
        vec![
            doc! { "_id": "Friday" },
            doc! { "_id": "Monday" },
            doc! { "_id": "Thursday" },
            doc! { "_id": "Tuesday" },
        ],
    );

    let pipeline = [doc! { "$unwind": "$schedule_details.days" }, doc! { "$group": { "_id": "$schedule_details.days" } }];
    assert_eq!(collection.aggregate(&pipeline).unwrap().collect::<Vec<_>>(), records);
}

#[test]
fn seeding_happens_only_once() {
    let mut store = InMemoryStore::new();

    assert!(seed_if_empty(store.collection_mut("activities"), activities()).unwrap());
    assert!(!seed_if_empty(store.collection_mut("activities"), [activity("Art Club", &["Thursday"], 15, &[])]).unwrap());

    let collection = store.collection("activities").unwrap();
    assert_eq!(collection.count_documents(&Filter::new()).unwrap(), 5);
    assert!(collection.find_one(&Filter::new().eq("_id", "Art Club")).unwrap().is_none());
}
