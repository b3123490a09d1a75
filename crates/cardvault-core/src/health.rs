use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

/// Liveness: the process is up and serving.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness: 200 while the database answers a ping, 503 otherwise.
pub async fn readiness(db: &DatabaseConnection) -> StatusCode {
    match db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_report_live() {
        assert_eq!(healthz().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn should_report_unready_without_database() {
        let status = readiness(&DatabaseConnection::Disconnected).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
