use axum::Router;

pub fn create_test_app() -> Router {
    mathdrill_backend_rust::create_app()
}
