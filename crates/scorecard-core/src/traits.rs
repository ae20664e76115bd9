use std::future::Future;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{ApiRequest, ApiResponse};

/// Sends one request and returns its response.
///
/// Decorators implement this by wrapping another `Transport`, so a chain of
/// any depth presents the same contract to callers.
pub trait Transport: Send + Sync {
    fn round_trip(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, AppError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn round_trip(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, AppError>> + Send {
        (**self).round_trip(request)
    }
}

impl<T: Transport> Transport for &T {
    fn round_trip(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, AppError>> + Send {
        (**self).round_trip(request)
    }
}
