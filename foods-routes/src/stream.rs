use axum::response::{IntoResponse, Response};
use axum_streams::StreamBodyAs;
use serde::Serialize;
use std::marker::PhantomData;

/// A `200 OK` JSON array, written element by element. An empty collection is `[]`.
pub struct StreamingResponse<T> {
    body: StreamBodyAs<'static>,
    _items: PhantomData<T>,
}

impl<T> StreamingResponse<T>
where
    T: Serialize + Send + Sync + 'static,
{
    pub fn ok<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + Sync + 'static,
    {
        Self {
            body: StreamBodyAs::json_array(tokio_stream::iter(items)),
            _items: PhantomData,
        }
    }
}

impl<T> IntoResponse for StreamingResponse<T> {
    fn into_response(self) -> Response {
        self.body.into_response()
    }
}
