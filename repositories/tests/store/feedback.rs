use super::memory;
use crate::TestRuntime;
use foods_core::FeedbackRepository;
use foods_core::model::NewFeedback;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::memory(memory::feedback())]
#[cfg_attr(feature = "mongo-tests", case::mongo(crate::mongo::feedback()))]
#[tokio::test]
async fn created_feedback_is_listed<R>(
    #[future(awt)]
    #[case]
    runtime: TestRuntime<R, R::Id>,
) where
    R: FeedbackRepository,
{
    let repo = runtime.repo;
    assert!(repo.list().await.unwrap().is_empty());

    let content = json!({ "rating": 5, "comment": "great biryani" })
        .as_object()
        .cloned()
        .unwrap_or_default();
    let created = repo.create(NewFeedback::new(content)).await.unwrap();

    let listed = repo.list().await.unwrap();

    assert_eq!(vec![created], listed);
    assert_eq!(Some(5), listed[0].content.get("rating").and_then(|v| v.as_i64()));
}
