use error_stack::Report;

pub type RepoResult<T, E> = Result<T, Report<E>>;
pub type OptRepoResult<T, E> = Result<Option<T>, Report<E>>;

#[derive(Debug, thiserror::Error)]
pub enum FoodRepoError {
    #[error("failed to get food")]
    Get,
    #[error("failed to list foods")]
    List,
    #[error("failed to create food")]
    Create,
    #[error("failed to update food")]
    Update,
    #[error("failed to delete food")]
    Delete,
    #[error("failed to apply purchase to food inventory")]
    Inventory,
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseRepoError {
    #[error("failed to list purchases")]
    List,
    #[error("failed to create purchase")]
    Create,
    #[error("failed to delete purchase")]
    Delete,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackRepoError {
    #[error("failed to list feedback")]
    List,
    #[error("failed to create feedback")]
    Create,
}

#[derive(Debug, thiserror::Error)]
#[error("payment processor request failed")]
pub struct PaymentError;
