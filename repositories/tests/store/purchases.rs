use super::memory;
use crate::TestRuntime;
use foods_core::PurchaseRepository;
use foods_core::model::NewPurchase;
use rstest::rstest;
use serde_json::json;

fn new_purchase<I>(food_id: I, buyer_email: &str) -> NewPurchase<I> {
    NewPurchase {
        food_id,
        quantity: 2,
        buyer_email: buyer_email.to_string(),
        buyer_name: Some("Buyer".to_string()),
        order: json!({ "foodName": "Pho", "buyingDate": "2026-10-16" })
            .as_object()
            .cloned()
            .unwrap_or_default(),
    }
}

#[rstest]
#[case::memory(memory::purchases())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::purchases()))]
#[tokio::test]
async fn list_by_buyer_only_returns_their_purchases<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: PurchaseRepository,
{
    let food_id = runtime.generate_new_id();
    let repo = runtime.repo;

    let mine = repo
        .create(new_purchase(food_id.clone(), "me@example.com"))
        .await
        .unwrap();
    repo.create(new_purchase(food_id.clone(), "other@example.com"))
        .await
        .unwrap();

    let found = repo.list_by_buyer("me@example.com".to_string()).await.unwrap();

    assert_eq!(vec![mine], found);
    assert_eq!(food_id, found[0].food_id);
    assert_eq!(2, found[0].quantity);
}

#[rstest]
#[case::memory(memory::purchases())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::purchases()))]
#[tokio::test]
async fn list_by_buyer_with_no_purchases_is_empty<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: PurchaseRepository,
{
    let found = runtime
        .repo
        .list_by_buyer("nobody@example.com".to_string())
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[rstest]
#[case::memory(memory::purchases())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::purchases()))]
#[tokio::test]
async fn delete_missing_purchase_returns_none<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: PurchaseRepository,
{
    let food_id = runtime.generate_new_id();
    let missing = runtime.generate_new_id();
    let repo = runtime.repo;
    let created = repo
        .create(new_purchase(food_id, "me@example.com"))
        .await
        .unwrap();

    assert!(repo.delete(missing).await.unwrap().is_none());
    assert!(repo.delete(created.id).await.unwrap().is_some());
    assert!(
        repo.list_by_buyer("me@example.com".to_string())
            .await
            .unwrap()
            .is_empty()
    );
}
