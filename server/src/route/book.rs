use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use application::service::{
    CreateBookService, DeleteBookService, GetBookService, UpdateBookService,
};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, CreateBookRequest, DeleteBookRequest, GetBookByIsbnRequest, GetBookRequest,
    UpdateBookRequest,
};
use crate::response::{BookPresenter, BookResponse};

pub trait BookRouter {
    fn route_book(self) -> Self;
}

fn found_or_404(book: Option<BookResponse>) -> Response {
    book.map(BookResponse::into_response)
        .unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
}

impl<D> BookRouter for Router<AppModule<D>>
where
    D: DependOnBookQuery + DependOnBookModifier,
{
    fn route_book(self) -> Self {
        self.route(
            "/api/books",
            get(
                |State(module): State<AppModule<D>>,
                 query: Result<Query<GetBookByIsbnRequest>, QueryRejection>| async move {
                    let Query(req) = query?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().get_book_by_isbn(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .map(found_or_404)
                },
            )
            .post(
                |State(module): State<AppModule<D>>,
                 body: Result<Json<CreateBookRequest>, JsonRejection>| async move {
                    let Json(req) = body?;
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(req)?
                        .handle(|dto| async move { module.database().create_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/api/books/:id",
            get(
                |State(module): State<AppModule<D>>,
                 path: Result<Path<i64>, PathRejection>| async move {
                    let Path(id) = path?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| async move { module.database().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .map(found_or_404)
                },
            )
            .put(
                |State(module): State<AppModule<D>>,
                 path: Result<Path<i64>, PathRejection>,
                 body: Result<Json<UpdateBookRequest>, JsonRejection>| async move {
                    let Path(id) = path?;
                    let Json(req) = body?;
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake((id, req))?
                        .handle(|dto| async move { module.database().update_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .map(found_or_404)
                },
            )
            .delete(
                |State(module): State<AppModule<D>>,
                 path: Result<Path<i64>, PathRejection>| async move {
                    let Path(id) = path?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id))
                        .handle(|dto| async move { module.database().delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use driver::database::InMemoryDatabase;

    use crate::handler::{AppModule, Handler};
    use crate::route::BookRouter;

    fn app() -> Router {
        Router::<AppModule<InMemoryDatabase>>::new()
            .route_book()
            .with_state(AppModule::new(Handler::new(InMemoryDatabase::default())))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("valid request");

        let response = app.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    fn book(title: &str, isbn: &str) -> Value {
        json!({ "title": title, "author": "autor", "isbn": isbn })
    }

    #[tokio::test]
    async fn create_book() {
        let app = app();

        let (status, body) = send(&app, "POST", "/api/books", Some(book("title", "isbn"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(!body["id"].is_null());
        assert_eq!(body["title"], "title");
        assert_eq!(body["author"], "autor");
        assert_eq!(body["isbn"], "isbn");
    }

    #[tokio::test]
    async fn create_empty_book_reports_every_field() {
        let app = app();

        let (status, body) = send(&app, "POST", "/api/books", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn create_reports_only_missing_fields() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/books",
            Some(json!({ "title": "title", "author": "", "isbn": "isbn" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["author must not be empty"] }));
    }

    #[tokio::test]
    async fn create_with_duplicated_isbn() {
        let app = app();
        send(&app, "POST", "/api/books", Some(book("first", "isbn"))).await;

        let (status, body) = send(&app, "POST", "/api/books", Some(book("second", "isbn"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["ISBN already registered"] }));
        let (status, _) = send(&app, "GET", "/api/books/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/books")
            .header("content-type", "application/json")
            .body(Body::from("{\"title\":"))
            .expect("valid request");

        let response = app.oneshot(request).await.expect("router is infallible");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");

        assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn get_book_by_id() {
        let app = app();
        let (_, created) = send(&app, "POST", "/api/books", Some(book("title", "isbn"))).await;

        let (status, body) = send(&app, "GET", &format!("/api/books/{}", created["id"]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);

        let (status, body) = send(&app, "GET", "/api/books/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn get_book_by_isbn() {
        let app = app();
        send(&app, "POST", "/api/books", Some(book("other", "0000"))).await;
        let (_, created) = send(&app, "POST", "/api/books", Some(book("title", "1231324512"))).await;

        let (status, body) = send(&app, "GET", "/api/books?isbn=1231324512", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);

        let (status, _) = send(&app, "GET", "/api/books?isbn=unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_without_isbn_is_bad_request() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/books", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let app = app();

        for (method, body) in [
            ("GET", None),
            ("PUT", Some(book("title", "isbn"))),
            ("DELETE", None),
        ] {
            let (status, body) = send(&app, method, "/api/books/abc", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
            assert_eq!(body["errors"].as_array().map(Vec::len), Some(1), "{method}");
        }
    }

    #[tokio::test]
    async fn whitespace_fields_are_present() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/books",
            Some(json!({ "title": " ", "author": "autor", "isbn": "isbn" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], " ");
    }

    #[tokio::test]
    async fn update_book() {
        let app = app();
        let (_, created) = send(&app, "POST", "/api/books", Some(book("title", "isbn"))).await;
        let uri = format!("/api/books/{}", created["id"]);

        let (status, body) = send(&app, "PUT", &uri, Some(book("new title", "isbn"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
        assert_eq!(body["title"], "new title");

        let (_, stored) = send(&app, "GET", &uri, None).await;
        assert_eq!(stored, body);
    }

    #[tokio::test]
    async fn update_rejections() {
        let app = app();
        send(&app, "POST", "/api/books", Some(book("first", "111"))).await;
        send(&app, "POST", "/api/books", Some(book("second", "222"))).await;

        let (status, _) = send(&app, "PUT", "/api/books/99", Some(book("title", "999"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", "/api/books/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "PUT", "/api/books/2", Some(book("second", "111"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["ISBN already registered"] }));

        let (status, body) = send(&app, "PUT", "/api/books/2", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn delete_book() {
        let app = app();
        send(&app, "POST", "/api/books", Some(book("title", "isbn"))).await;

        let (status, _) = send(&app, "DELETE", "/api/books/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", "/api/books/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "POST", "/api/books", Some(book("again", "isbn"))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
