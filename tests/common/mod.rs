#![allow(dead_code)]

use ousia_finder::{
    Engine, Entity, EntityMeta, Error, ExecutionArguments, IndexMeta, Meta, Order, PageRequest, PartKind,
    PartTree, PersistentProperty, QueryMethod, QueryResult, ResultShape, ReturnType, Sort,
    tree::{OrPart, Part},
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    _meta: Meta,
    pub name: String,
    pub age: i64,
    pub nickname: Option<String>,
    pub city: String,
}

impl Person {
    pub fn new(name: &str, age: i64, nickname: Option<&str>, city: &str) -> Self {
        Self {
            _meta: Meta::default(),
            name: name.to_string(),
            age,
            nickname: nickname.map(str::to_string),
            city: city.to_string(),
        }
    }
}

impl Entity for Person {
    const KIND: &'static str = "Person";

    fn meta(&self) -> &Meta {
        &self._meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self._meta
    }

    fn persistent_properties() -> &'static [PersistentProperty] {
        const PROPERTIES: &[PersistentProperty] = &[
            PersistentProperty::same("name"),
            PersistentProperty::same("age"),
            PersistentProperty::same("nickname"),
            PersistentProperty::new("city", "home_city"),
        ];
        PROPERTIES
    }

    fn index_meta(&self) -> IndexMeta {
        IndexMeta::new()
            .with("name", &self.name)
            .with("age", self.age)
            .with("nickname", &self.nickname)
            .with("home_city", &self.city)
    }
}

/// Narrow read model over `Person` rows.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonName {
    pub name: String,
}

pub async fn seed(engine: &Engine) -> Vec<Person> {
    let mut people = vec![
        Person::new("Ann", 20, None, "Oslo"),
        Person::new("Ann", 15, Some("Annie"), "Oslo"),
        Person::new("Bo", 25, None, "Bergen"),
        Person::new("Cy", 30, Some("C"), "Oslo"),
        Person::new("Di", 40, None, "Bergen"),
    ];
    for person in people.iter_mut() {
        if let Err(err) = engine.save_object(person).await {
            panic!("Error: {:#?}", err);
        }
    }
    people
}

fn method(name: &str, return_type: ReturnType) -> QueryMethod {
    QueryMethod::new(name, return_type)
}

fn ages(people: &[Person]) -> Vec<i64> {
    people.iter().map(|p| p.age).collect()
}

async fn count_all(engine: &Engine) -> u64 {
    let count = engine
        .register::<Person>(method("count", ReturnType::Count), PartTree::count())
        .unwrap();
    count
        .execute(&ExecutionArguments::new())
        .await
        .unwrap()
        .as_count()
        .unwrap()
}

pub async fn check_age_and_name(engine: Engine) {
    let people = seed(&engine).await;

    let query = engine
        .register::<Person>(
            method("findByAgeGreaterThanAndName", ReturnType::List),
            PartTree::find()
                .part("age", PartKind::GreaterThan)
                .part("name", PartKind::SimpleProperty),
        )
        .unwrap();

    let found = query
        .execute(&ExecutionArguments::new().bind(18i64).bind("Ann"))
        .await
        .unwrap()
        .into_list()
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Ann");
    assert_eq!(found[0].age, 20);
    assert_eq!(found[0].id(), people[0].id());
}

pub async fn check_equality_round_trip(engine: Engine) {
    let people = seed(&engine).await;

    let query = engine
        .register::<Person>(
            method("findByName", ReturnType::Single),
            PartTree::find().part("name", PartKind::SimpleProperty),
        )
        .unwrap();

    let found = query
        .execute(&ExecutionArguments::new().bind("Cy"))
        .await
        .unwrap()
        .into_single()
        .unwrap();
    assert_eq!(found.id(), people[3].id());
    assert_eq!(found.created_at(), people[3].created_at());
    assert_eq!(found.nickname.as_deref(), Some("C"));
    assert_eq!(found.city, "Oslo");

    let missing = query
        .execute(&ExecutionArguments::new().bind("Zed"))
        .await
        .unwrap();
    assert!(matches!(missing, QueryResult::Single(None)));
}

pub async fn check_too_few_parameters(engine: Engine) {
    seed(&engine).await;

    let query = engine
        .register::<Person>(
            method("findByAgeGreaterThanAndName", ReturnType::List),
            PartTree::find()
                .part("age", PartKind::GreaterThan)
                .part("name", PartKind::SimpleProperty),
        )
        .unwrap();

    match query.execute(&ExecutionArguments::new().bind(18i64)).await {
        Err(Error::TooFewParameters(name)) => assert_eq!(name, "findByAgeGreaterThanAndName"),
        other => panic!("Error: {:#?}", other),
    }

    // surplus arguments are ignored
    let found = query
        .execute(
            &ExecutionArguments::new()
                .bind(18i64)
                .bind("Ann")
                .bind("extra"),
        )
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(found.len(), 1);
}

pub async fn check_registration_errors(engine: Engine) {
    let distinct = engine.register::<Person>(
        method("findDistinctByName", ReturnType::List),
        PartTree::find()
            .distinct()
            .part("name", PartKind::SimpleProperty),
    );
    assert!(matches!(distinct, Err(Error::Unsupported(_))));

    let or = engine.register::<Person>(
        method("findByNameOrAge", ReturnType::List),
        PartTree::find()
            .part("name", PartKind::SimpleProperty)
            .or()
            .part("age", PartKind::SimpleProperty),
    );
    assert!(matches!(or, Err(Error::Malformed(_))));

    let single_group = engine.register::<Person>(
        method("findByName", ReturnType::List),
        PartTree::find().or_part(OrPart::new().and(Part::new("name", PartKind::SimpleProperty))),
    );
    assert!(single_group.is_ok());

    let unknown = engine.register::<Person>(
        method("findByEmail", ReturnType::List),
        PartTree::find().part("email", PartKind::SimpleProperty),
    );
    assert!(matches!(unknown, Err(Error::UnknownProperty { .. })));

    let paged_count = engine.register::<Person>(
        method("countByName", ReturnType::Page),
        PartTree::count().part("name", PartKind::SimpleProperty),
    );
    assert!(matches!(paged_count, Err(Error::Unsupported(_))));
}

pub async fn check_unsupported_keyword(engine: Engine) {
    seed(&engine).await;

    let query = engine
        .register::<Person>(
            method("findByNameStartingWith", ReturnType::List),
            PartTree::find().part("name", PartKind::StartingWith),
        )
        .unwrap();

    match query.execute(&ExecutionArguments::new().bind("A")).await {
        Err(Error::Unsupported(msg)) => assert!(msg.contains("STARTING_WITH")),
        other => panic!("Error: {:#?}", other),
    }
}

pub async fn check_null_and_range(engine: Engine) {
    seed(&engine).await;

    let no_nickname = engine
        .register::<Person>(
            method("findByNicknameIsNull", ReturnType::List),
            PartTree::find()
                .part("nickname", PartKind::IsNull)
                .order_by_asc("age"),
        )
        .unwrap();
    let found = no_nickname
        .execute(&ExecutionArguments::new())
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(ages(&found), vec![20, 25, 40]);

    let at_least = engine
        .register::<Person>(
            method("findByAgeGreaterThanEqualAndAgeLessThanEqual", ReturnType::List),
            PartTree::find()
                .part("age", PartKind::GreaterThanEqual)
                .part("age", PartKind::LessThanEqual)
                .order_by_asc("age"),
        )
        .unwrap();
    let found = at_least
        .execute(&ExecutionArguments::new().bind(20i64).bind(30i64))
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(ages(&found), vec![20, 25, 30]);
}

pub async fn check_slice(engine: Engine) {
    seed(&engine).await;
    assert_eq!(count_all(&engine).await, 5);

    let query = engine
        .register::<Person>(
            method("findByAgeGreaterThanOrderByAgeAsc", ReturnType::Slice),
            PartTree::find()
                .part("age", PartKind::GreaterThan)
                .order_by_asc("age"),
        )
        .unwrap();
    assert_eq!(query.shape(), ResultShape::Slice);

    // P = 3 over P + 2 matching rows
    let slice = query
        .execute(&ExecutionArguments::new().bind(0i64).page(PageRequest::of(0, 3)))
        .await
        .unwrap()
        .into_slice()
        .unwrap();
    assert_eq!(ages(&slice.content), vec![15, 20, 25]);
    assert!(slice.has_next());
    assert_eq!(slice.next_pageable(), Some(PageRequest::of(1, 3)));

    let last = query
        .execute(&ExecutionArguments::new().bind(0i64).page(PageRequest::of(1, 3)))
        .await
        .unwrap()
        .into_slice()
        .unwrap();
    assert_eq!(ages(&last.content), vec![30, 40]);
    assert!(!last.has_next());

    // P = 3 over exactly P matching rows
    let exact = query
        .execute(&ExecutionArguments::new().bind(20i64).page(PageRequest::of(0, 3)))
        .await
        .unwrap()
        .into_slice()
        .unwrap();
    assert_eq!(exact.content.len(), 3);
    assert!(!exact.has_next());
}

pub async fn check_page(engine: Engine) {
    seed(&engine).await;

    let query = engine
        .register::<Person>(
            method("findByAgeGreaterThan", ReturnType::Page),
            PartTree::find().part("age", PartKind::GreaterThan),
        )
        .unwrap();

    let args = |page| {
        ExecutionArguments::new()
            .bind(0i64)
            .page(PageRequest::of(page, 2).with_sort(Sort::asc("age")))
    };

    let first = query.execute(&args(0)).await.unwrap().into_page().unwrap();
    assert_eq!(ages(&first.content), vec![15, 20]);
    assert_eq!(first.total, 5);
    assert_eq!(first.total_pages(), 3);
    assert!(first.has_next());

    let second = query.execute(&args(1)).await.unwrap().into_page().unwrap();
    assert_eq!(ages(&second.content), vec![25, 30]);
    assert_eq!(second.total, 5);

    let third = query.execute(&args(2)).await.unwrap().into_page().unwrap();
    assert_eq!(ages(&third.content), vec![40]);
    assert_eq!(third.total, 5);
    assert!(!third.has_next());
    assert_eq!(third.pageable, Some(PageRequest::of(2, 2).with_sort(Sort::asc("age"))));
}

pub async fn check_exists_and_count(engine: Engine) {
    seed(&engine).await;

    let exists = engine
        .register::<Person>(
            method("existsByName", ReturnType::Boolean),
            PartTree::exists().part("name", PartKind::SimpleProperty),
        )
        .unwrap();

    let found = exists
        .execute(&ExecutionArguments::new().bind("Bo"))
        .await
        .unwrap();
    assert_eq!(found.as_bool(), Some(true));

    let missing = exists
        .execute(&ExecutionArguments::new().bind("Zed"))
        .await
        .unwrap();
    assert_eq!(missing.as_bool(), Some(false));

    // a far-away page does not hide the match
    let paged = exists
        .execute(
            &ExecutionArguments::new()
                .bind("Bo")
                .page(PageRequest::of(7, 10)),
        )
        .await
        .unwrap();
    assert_eq!(paged.as_bool(), Some(true));

    let count = engine
        .register::<Person>(
            method("countByCity", ReturnType::Count),
            PartTree::count().part("city", PartKind::SimpleProperty),
        )
        .unwrap();
    let oslo = count
        .execute(&ExecutionArguments::new().bind("Oslo"))
        .await
        .unwrap();
    assert_eq!(oslo.as_count(), Some(3));
}

pub async fn check_delete_by_key(engine: Engine) {
    seed(&engine).await;

    let delete = engine
        .register::<Person>(
            method("deleteByCity", ReturnType::Count),
            PartTree::delete().part("city", PartKind::SimpleProperty),
        )
        .unwrap();
    assert_eq!(delete.shape(), ResultShape::DeleteByKey);

    let deleted = delete
        .execute(&ExecutionArguments::new().bind("Bergen"))
        .await
        .unwrap();
    assert_eq!(deleted.as_count(), Some(2));
    assert_eq!(count_all(&engine).await, 3);

    let again = delete
        .execute(&ExecutionArguments::new().bind("Bergen"))
        .await
        .unwrap();
    assert_eq!(again.as_count(), Some(0));
}

pub async fn check_delete_by_entity(engine: Engine) {
    seed(&engine).await;

    let delete = engine
        .register::<Person>(
            method("deleteByNicknameIsNull", ReturnType::List),
            PartTree::delete()
                .part("nickname", PartKind::IsNull)
                .order_by_desc("age"),
        )
        .unwrap();
    assert_eq!(delete.shape(), ResultShape::DeleteByEntity);

    let deleted = delete
        .execute(&ExecutionArguments::new())
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(ages(&deleted), vec![40, 25, 20]);
    assert_eq!(count_all(&engine).await, 2);
}

pub async fn check_keys_and_projection(engine: Engine) {
    let people = seed(&engine).await;

    let keys = engine
        .register::<Person>(
            method("findByCity", ReturnType::Keys),
            PartTree::find().part("city", PartKind::SimpleProperty),
        )
        .unwrap();
    let found = keys
        .execute(&ExecutionArguments::new().bind("Bergen"))
        .await
        .unwrap()
        .into_keys()
        .unwrap();
    let ids: Vec<_> = found.iter().map(|k| k.id).collect();
    assert_eq!(ids, vec![people[2].meta().id, people[4].meta().id]);
    assert!(found.iter().all(|k| k.kind == "Person"));

    let names = engine
        .register_projection::<Person, PersonName>(
            method("findByCityOrderByNameDesc", ReturnType::List),
            PartTree::find()
                .part("city", PartKind::SimpleProperty)
                .order_by_desc("name"),
        )
        .unwrap();
    let found: Vec<String> = names
        .execute(&ExecutionArguments::new().bind("Oslo"))
        .await
        .unwrap()
        .into_list()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(found, vec!["Cy", "Ann", "Ann"]);
}

pub async fn check_sort_and_limit(engine: Engine) {
    seed(&engine).await;

    let query = engine
        .register::<Person>(
            method("findByCityOrderByNameAsc", ReturnType::List),
            PartTree::find()
                .part("city", PartKind::SimpleProperty)
                .order_by_asc("name"),
        )
        .unwrap();

    // ties on name are broken by the call's sort
    let found = query
        .execute(
            &ExecutionArguments::new()
                .bind("Oslo")
                .sort(Sort::by(Order::desc("age"))),
        )
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(ages(&found), vec![20, 15, 30]);

    let unknown = query
        .execute(
            &ExecutionArguments::new()
                .bind("Oslo")
                .sort(Sort::asc("email")),
        )
        .await;
    assert!(matches!(unknown, Err(Error::UnknownProperty { .. })));

    let first = engine
        .register::<Person>(
            method("findFirst2ByAgeGreaterThanOrderByAgeDesc", ReturnType::List),
            PartTree::find()
                .first(2)
                .part("age", PartKind::GreaterThan)
                .order_by_desc("age"),
        )
        .unwrap();
    let found = first
        .execute(&ExecutionArguments::new().bind(0i64))
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(ages(&found), vec![40, 30]);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    _meta: Meta,
    pub label: String,
    pub at: DateTime<Utc>,
}

impl Entity for Event {
    const KIND: &'static str = "Event";

    fn meta(&self) -> &Meta {
        &self._meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self._meta
    }

    fn persistent_properties() -> &'static [PersistentProperty] {
        const PROPERTIES: &[PersistentProperty] =
            &[PersistentProperty::same("label"), PersistentProperty::same("at")];
        PROPERTIES
    }

    fn index_meta(&self) -> IndexMeta {
        IndexMeta::new()
            .with("label", &self.label)
            .with("at", self.at)
    }
}

fn labels(events: &[Event]) -> Vec<&str> {
    events.iter().map(|e| e.label.as_str()).collect()
}

pub async fn check_sub_second_timestamps(engine: Engine) {
    let noon = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let mut events = vec![
        Event {
            label: "half".to_string(),
            at: noon + TimeDelta::milliseconds(500),
            ..Default::default()
        },
        Event {
            label: "micro".to_string(),
            at: noon + TimeDelta::microseconds(123_456),
            ..Default::default()
        },
        Event {
            label: "noon".to_string(),
            at: noon,
            ..Default::default()
        },
        Event {
            label: "milli".to_string(),
            at: noon + TimeDelta::milliseconds(123),
            ..Default::default()
        },
    ];
    for event in events.iter_mut() {
        if let Err(err) = engine.save_object(event).await {
            panic!("Error: {:#?}", err);
        }
    }

    let after = engine
        .register::<Event>(
            method("findByAtGreaterThanOrderByAtAsc", ReturnType::List),
            PartTree::find()
                .part("at", PartKind::GreaterThan)
                .order_by_asc("at"),
        )
        .unwrap();
    let found = after
        .execute(&ExecutionArguments::new().bind(noon))
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(labels(&found), vec!["milli", "micro", "half"]);

    let before = engine
        .register::<Event>(
            method("findByAtLessThanOrderByAtDesc", ReturnType::List),
            PartTree::find()
                .part("at", PartKind::LessThan)
                .order_by_desc("at"),
        )
        .unwrap();
    let found = before
        .execute(&ExecutionArguments::new().bind(noon + TimeDelta::microseconds(123_456)))
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(labels(&found), vec!["milli", "noon"]);

    let exact = engine
        .register::<Event>(
            method("findByAtGreaterThanEqualAndAtLessThanEqual", ReturnType::List),
            PartTree::find()
                .part("at", PartKind::GreaterThanEqual)
                .part("at", PartKind::LessThanEqual),
        )
        .unwrap();
    let found = exact
        .execute(
            &ExecutionArguments::new()
                .bind(noon + TimeDelta::milliseconds(123))
                .bind(noon + TimeDelta::milliseconds(123)),
        )
        .await
        .unwrap()
        .into_list()
        .unwrap();
    assert_eq!(labels(&found), vec!["milli"]);
    assert_eq!(found[0].at, noon + TimeDelta::milliseconds(123));
}
