use super::{ArwLock, MemoryId};
use crate::strip_reserved_keys;
use foods_core::FeedbackRepository;
use foods_core::model::{Feedback, NewFeedback};
use foods_core::result::{FeedbackRepoError, RepoResult};

#[derive(Debug, Clone)]
pub struct FeedbackRepo {
    feedback: ArwLock<Vec<Feedback<MemoryId>>>,
}

impl FeedbackRepo {
    pub(super) fn new(feedback: ArwLock<Vec<Feedback<MemoryId>>>) -> Self {
        Self { feedback }
    }
}

impl FeedbackRepository for FeedbackRepo {
    type Id = MemoryId;

    async fn create(&self, new_feedback: NewFeedback) -> RepoResult<Feedback<Self::Id>, FeedbackRepoError> {
        let mut content = new_feedback.content;
        strip_reserved_keys(&mut content);

        let feedback = Feedback {
            id: MemoryId::new(),
            content,
        };
        self.feedback.write().await.push(feedback.clone());
        Ok(feedback)
    }

    async fn list(&self) -> RepoResult<Vec<Feedback<Self::Id>>, FeedbackRepoError> {
        Ok(self.feedback.read().await.clone())
    }
}
