use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tablecrud_core::storage::{store_error_to_status_code, StoreError};

pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = if let Some(store_error) = self.0.downcast_ref::<StoreError>() {
            let code = store_error_to_status_code(store_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status_code.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_status() {
        let response = AppError::from(StoreError::AlreadyExists {
            table: "customer".to_string(),
            partition_key: "customer-1".to_string(),
            row_key: "1".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::from(StoreError::Cancelled).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_other_error_is_internal() {
        let response = AppError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
