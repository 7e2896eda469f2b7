use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Middleware для логирования HTTP запросов: длительность, размер ответа, статус, метод и путь
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{} {} -> {} | {}ms | body error: {}",
                method,
                path,
                parts.status.as_u16(),
                start.elapsed().as_millis(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let status = parts.status.as_u16();
    let elapsed = start.elapsed().as_millis();
    let size = format_number(bytes.len());
    if parts.status.is_server_error() {
        tracing::error!("{} {} -> {} | {}ms | {} B", method, path, status, elapsed, size);
    } else if parts.status.is_client_error() {
        tracing::warn!("{} {} -> {} | {}ms | {} B", method, path, status, elapsed, size);
    } else {
        tracing::info!("{} {} -> {} | {}ms | {} B", method, path, status, elapsed, size);
    }

    // Новый ответ с прочитанным телом
    Response::from_parts(parts, Body::from(bytes))
}
