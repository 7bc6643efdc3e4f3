use super::memory;
use crate::TestRuntime;
use foods_core::FoodRepository;
use foods_core::list_filter::FoodListCriteria;
use foods_core::model::{Contributor, FoodUpdate, NewFood};
use rstest::rstest;
use serde_json::json;

fn new_food(name: &str, email: &str, number_of_purchases: i64) -> NewFood {
    let details = json!({ "image": "https://img.example.com/food.png", "category": "rice" });
    NewFood {
        name: name.to_string(),
        price: 9.99,
        quantity: 10,
        number_of_purchases,
        added_by: Contributor {
            name: Some("Chef".to_string()),
            email: email.to_string(),
        },
        details: details.as_object().cloned().unwrap_or_default(),
    }
}

fn update(name: &str) -> FoodUpdate {
    FoodUpdate {
        name: name.to_string(),
        price: 4.5,
        quantity: 2,
        added_by: None,
        details: json!({ "description": "updated" }).as_object().cloned().unwrap_or_default(),
    }
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn get_no_data_returns_none<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let result = runtime.repo.get(runtime.generate_new_id()).await.unwrap();

    assert!(result.is_none());
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn create_then_get_returns_created_food<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let repo = runtime.repo;

    let created = repo.create(new_food("Pho", "a@example.com", 0)).await.unwrap();

    let found = repo
        .get(created.id.clone())
        .await
        .unwrap()
        .expect("recently created food exists");

    assert_eq!(created, found);
    assert_eq!(Some("rice"), found.details.get("category").and_then(|v| v.as_str()));
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn create_drops_reserved_detail_keys<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let mut food = new_food("Pho", "a@example.com", 0);
    food.details.insert("id".to_string(), json!("spoofed"));
    food.details.insert("numberOfPurchases".to_string(), json!(1000));

    let created = runtime.repo.create(food).await.unwrap();

    assert!(!created.details.contains_key("id"));
    assert!(!created.details.contains_key("numberOfPurchases"));
    assert_eq!(0, created.number_of_purchases);
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn list_filters_by_contributor_and_name<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let repo = runtime.repo;
    repo.create(new_food("Pho", "a@example.com", 0)).await.unwrap();
    repo.create(new_food("Ramen", "a@example.com", 0)).await.unwrap();
    repo.create(new_food("Pho", "b@example.com", 0)).await.unwrap();

    let by_a = repo.list(FoodListCriteria::added_by("a@example.com")).await.unwrap();
    let named_pho = repo.list(FoodListCriteria::named("Pho")).await.unwrap();
    let all = repo.list(FoodListCriteria::all()).await.unwrap();
    let nobody = repo.list(FoodListCriteria::added_by("c@example.com")).await.unwrap();

    assert_eq!(2, by_a.len());
    assert!(by_a.iter().all(|f| f.added_by.as_ref().unwrap().email == "a@example.com"));
    assert_eq!(2, named_pho.len());
    assert!(named_pho.iter().all(|f| f.name == "Pho"));
    assert_eq!(3, all.len());
    assert!(nobody.is_empty());
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn most_purchased_orders_descending_and_limits<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let repo = runtime.repo;
    for (i, purchases) in [5, 1, 9, 0, 3, 7, 2, 8].into_iter().enumerate() {
        repo.create(new_food(&format!("food-{i}"), "a@example.com", purchases))
            .await
            .unwrap();
    }

    let top = repo.list(FoodListCriteria::most_purchased(6)).await.unwrap();

    let counts = top.iter().map(|f| f.number_of_purchases).collect::<Vec<_>>();
    assert_eq!(vec![9, 8, 7, 5, 3, 2], counts);
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn upsert_existing_overwrites_fields_and_keeps_counters<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let repo = runtime.repo;
    let created = repo.create(new_food("Pho", "a@example.com", 4)).await.unwrap();

    let updated = repo.upsert(created.id.clone(), update("Beef Pho")).await.unwrap();

    assert_eq!(created.id, updated.id);
    assert_eq!("Beef Pho", updated.name);
    assert_eq!(2, updated.quantity);
    assert_eq!(4, updated.number_of_purchases);
    assert_eq!(created.added_by, updated.added_by);
    assert_eq!(Some("updated"), updated.details.get("description").and_then(|v| v.as_str()));
    assert_eq!(Some("rice"), updated.details.get("category").and_then(|v| v.as_str()));
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn upsert_missing_inserts_under_given_id<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let id = runtime.generate_new_id();
    let repo = runtime.repo;

    let inserted = repo.upsert(id.clone(), update("Laksa")).await.unwrap();
    let found = repo.get(id.clone()).await.unwrap().expect("upserted food exists");

    assert_eq!(id, inserted.id);
    assert_eq!("Laksa", found.name);
    assert_eq!(0, found.number_of_purchases);
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn delete_removes_food_once<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let repo = runtime.repo;
    let created = repo.create(new_food("Pho", "a@example.com", 0)).await.unwrap();

    let first = repo.delete(created.id.clone()).await.unwrap();
    let second = repo.delete(created.id.clone()).await.unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert!(repo.get(created.id).await.unwrap().is_none());
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn record_purchase_moves_both_counters<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let repo = runtime.repo;
    let created = repo.create(new_food("Pho", "a@example.com", 3)).await.unwrap();

    let after = repo
        .record_purchase(created.id.clone(), 2)
        .await
        .unwrap()
        .expect("food exists");

    assert_eq!(8, after.quantity);
    assert_eq!(4, after.number_of_purchases);
}

#[rstest]
#[case::memory(memory::foods())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::foods()))]
#[tokio::test]
async fn record_purchase_of_missing_food_does_not_insert<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FoodRepository,
{
    let id = runtime.generate_new_id();
    let repo = runtime.repo;

    let result = repo.record_purchase(id.clone(), 1).await.unwrap();

    assert!(result.is_none());
    assert!(repo.get(id).await.unwrap().is_none());
    assert!(repo.list(FoodListCriteria::all()).await.unwrap().is_empty());
}
