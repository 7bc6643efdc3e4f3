use testcontainers_modules::mongo::Mongo;
use testcontainers_modules::testcontainers::ContainerAsync;

mod feedback;
mod foods;
mod purchases;

struct TestRuntime<R, I> {
    _container: Option<ContainerAsync<Mongo>>,
    repo: R,
    new_id_fn: Box<dyn Fn() -> I>,
}

impl<R, I> TestRuntime<R, I> {
    fn new<F>(container: Option<ContainerAsync<Mongo>>, repo: R, new_id_fn: F) -> Self
    where
        F: Fn() -> I + 'static,
    {
        Self {
            _container: container,
            repo,
            new_id_fn: Box::new(new_id_fn),
        }
    }

    fn generate_new_id(&self) -> I {
        (self.new_id_fn)()
    }
}

mod memory {
    use crate::TestRuntime;
    use repositories::memory::{FeedbackRepo, FoodRepo, MemoryId, MemoryStore, PurchaseRepo};

    pub async fn foods() -> TestRuntime<FoodRepo, MemoryId> {
        TestRuntime::new(None, MemoryStore::new().foods(), MemoryId::new)
    }

    pub async fn purchases() -> TestRuntime<PurchaseRepo, MemoryId> {
        TestRuntime::new(None, MemoryStore::new().purchases(), MemoryId::new)
    }

    pub async fn feedback() -> TestRuntime<FeedbackRepo, MemoryId> {
        TestRuntime::new(None, MemoryStore::new().feedback(), MemoryId::new)
    }
}

#[cfg(feature = "mongo-tests")]
mod mongo {
    use crate::TestRuntime;
    use repositories::mongodb::feedback::FeedbackRepo;
    use repositories::mongodb::foods::FoodRepo;
    use repositories::mongodb::purchases::PurchaseRepo;
    use repositories::mongodb::{ConnectionDetails, DocumentId, MongoStore};
    use testcontainers_modules::mongo::Mongo;
    use testcontainers_modules::testcontainers::ContainerAsync;
    use testcontainers_modules::testcontainers::runners::AsyncRunner;

    async fn store() -> (ContainerAsync<Mongo>, MongoStore) {
        let container = Mongo::default().start().await.unwrap();
        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(27017).await.unwrap();

        let store = MongoStore::init(
            ConnectionDetails::Url(format!("mongodb://{host}:{port}/?authSource=admin")),
            "foods_test",
        )
        .await
        .unwrap();

        (container, store)
    }

    pub async fn foods() -> TestRuntime<FoodRepo, DocumentId> {
        let (container, store) = store().await;
        TestRuntime::new(Some(container), store.foods(), DocumentId::new)
    }

    pub async fn purchases() -> TestRuntime<PurchaseRepo, DocumentId> {
        let (container, store) = store().await;
        TestRuntime::new(Some(container), store.purchases(), DocumentId::new)
    }

    pub async fn feedback() -> TestRuntime<FeedbackRepo, DocumentId> {
        let (container, store) = store().await;
        TestRuntime::new(Some(container), store.feedback(), DocumentId::new)
    }
}
