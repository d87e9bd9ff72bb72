//! End-to-end tests for the books routes through the full HTTP stack.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bookshelf_app::{build_registry, Services};
use bookshelf_authz::{CurrentUser, StaticTokenAuthenticator};
use bookshelf_db::{
    Book, BookId, BookRepository, GenreSet, MemoryBookRepository, NewBook, NewReview,
    PublicationYear, RepositoryError, ReviewId,
};
use bookshelf_kernel::settings::Settings;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "reader-token";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List,
    Create(NewBook, CurrentUser),
    One(String),
    SaveReview(NewReview, CurrentUser, String),
}

/// Records every call and delegates to an in-memory store.
#[derive(Default)]
struct RecordingRepository {
    calls: Mutex<Vec<Call>>,
    inner: MemoryBookRepository,
}

impl RecordingRepository {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BookRepository for RecordingRepository {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        self.record(Call::List);
        self.inner.list().await
    }

    async fn create(&self, book: NewBook, user: &CurrentUser) -> Result<BookId, RepositoryError> {
        self.record(Call::Create(book.clone(), user.clone()));
        self.inner.create(book, user).await
    }

    async fn one(&self, id: &str) -> Result<Book, RepositoryError> {
        self.record(Call::One(id.to_string()));
        self.inner.one(id).await
    }

    async fn save_review(
        &self,
        review: NewReview,
        user: &CurrentUser,
        book_id: &str,
    ) -> Result<ReviewId, RepositoryError> {
        self.record(Call::SaveReview(
            review.clone(),
            user.clone(),
            book_id.to_string(),
        ));
        self.inner.save_review(review, user, book_id).await
    }
}

struct TestApp {
    router: Router,
    repository: Arc<RecordingRepository>,
}

fn reader() -> CurrentUser {
    CurrentUser::new("u-7", "reader")
}

fn test_app() -> TestApp {
    let repository = Arc::new(RecordingRepository::default());
    let authenticator = StaticTokenAuthenticator::new()
        .with_token(TOKEN, reader())
        .unwrap();
    let services = Services {
        repository: repository.clone(),
        authenticator: Arc::new(authenticator),
        genres: GenreSet::new(["Fantasy", "Science Fiction", "Poetry"]),
    };

    let registry = build_registry(&services);
    let router = bookshelf_http::build_router(&registry, &Settings::default());

    TestApp { router, repository }
}

fn book_body() -> Value {
    json!({
        "title": "The Left Hand of Darkness",
        "author": "Ursula K. Le Guin",
        "description": "An envoy on a winter planet",
        "genre": "Science Fiction",
        "publicationYear": 1969
    })
}

impl TestApp {
    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                request = request.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, Some(TOKEN), None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(TOKEN), Some(body)).await
    }

    async fn create_book(&self) -> String {
        let (status, body) = self.post("/api/books", book_body()).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

fn detail_fields(body: &Value) -> Vec<String> {
    body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn unauthenticated_requests_never_reach_the_repository() {
    let app = test_app();
    let requests = [
        ("GET", "/api/books", None),
        ("POST", "/api/books", Some(json!({}))),
        ("GET", "/api/books/genres", None),
        ("GET", "/api/books/7", None),
        ("POST", "/api/books/7/reviews", Some(json!({"review": ""}))),
        ("GET", "/api/books/7/reviews", None),
    ];

    for (method, uri, body) in requests {
        for token in [None, Some("wrong-token")] {
            let (status, response) = app.send(method, uri, token, body.clone()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(response["error"]["code"], "unauthorized");
        }
    }

    assert!(app.repository.calls().is_empty());
}

#[tokio::test]
async fn list_books_returns_repository_contents() {
    let app = test_app();
    let (status, body) = app.get("/api/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let id = app.create_book().await;
    let (status, body) = app.get("/api/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], id);
    assert_eq!(body[0]["title"], "The Left Hand of Darkness");
    assert_eq!(body[0]["publicationYear"], 1969);
}

#[tokio::test]
async fn create_book_calls_repository_once_with_body_and_user() {
    let app = test_app();
    let (status, body) = app.post("/api/books", book_body()).await;

    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let expected = NewBook {
        title: "The Left Hand of Darkness".to_string(),
        author: "Ursula K. Le Guin".to_string(),
        description: "An envoy on a winter planet".to_string(),
        genre: "Science Fiction".to_string(),
        publication_year: PublicationYear::Year(1969),
    };
    assert_eq!(app.repository.calls(), vec![Call::Create(expected, reader())]);
}

#[tokio::test]
async fn create_book_reports_each_missing_field() {
    for field in ["title", "author", "description", "genre", "publicationYear"] {
        let app = test_app();
        let mut body = book_body();
        body.as_object_mut().unwrap().remove(field);

        let (status, response) = app.post("/api/books", body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "missing {field}");
        assert_eq!(response["error"]["code"], "validation_error");
        assert_eq!(detail_fields(&response), vec![field.to_string()]);
        assert_eq!(response["error"]["details"][0]["message"], "Invalid value");
        assert!(app.repository.calls().is_empty());
    }
}

#[tokio::test]
async fn create_book_collects_all_errors() {
    let app = test_app();
    let (status, response) = app
        .post("/api/books", json!({"title": "", "genre": "Cookbooks"}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        detail_fields(&response),
        vec!["title", "author", "description", "genre", "publicationYear"]
    );
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("title: Invalid value, author: Invalid value"));
}

#[tokio::test]
async fn genre_must_belong_to_the_catalog() {
    let app = test_app();
    let mut body = book_body();
    body["genre"] = json!("Cookbooks");

    let (status, response) = app.post("/api/books", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail_fields(&response), vec!["genre"]);

    for genre in ["Fantasy", "Science Fiction", "Poetry"] {
        let mut body = book_body();
        body["genre"] = json!(genre);
        let (status, _) = app.post("/api/books", body).await;
        assert_eq!(status, StatusCode::OK, "{genre}");
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/books")
                .header("authorization", format!("Bearer {TOKEN}"))
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.repository.calls().is_empty());
}

#[tokio::test]
async fn non_object_body_is_a_bad_request() {
    let app = test_app();
    let (status, response) = app.post("/api/books", json!(["title"])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "bad_request");
    assert!(app.repository.calls().is_empty());
}

#[tokio::test]
async fn wrong_typed_fields_are_collected_with_the_rest() {
    let app = test_app();
    let (status, response) = app
        .post("/api/books", json!({"title": 5, "genre": "Fantasy"}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        detail_fields(&response),
        vec!["author", "description", "publicationYear"]
    );
    assert!(app.repository.calls().is_empty());
}

#[tokio::test]
async fn scalar_fields_of_any_type_are_accepted_as_text() {
    let app = test_app();
    for (year, stored) in [(json!(1968.5), json!("1968.5")), (json!(true), json!("true"))] {
        let mut body = book_body();
        body["title"] = json!(5);
        body["publicationYear"] = year;

        let (status, created) = app.post("/api/books", body).await;
        assert_eq!(status, StatusCode::OK, "{created}");

        let id = created["id"].as_str().unwrap();
        let (_, book) = app.get(&format!("/api/books/{id}")).await;
        assert_eq!(book["title"], "5");
        assert_eq!(book["publicationYear"], stored);
    }
}

#[tokio::test]
async fn body_without_content_type_is_validated() {
    let app = test_app();
    let (status, response) = app.send("POST", "/api/books", Some(TOKEN), None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        detail_fields(&response),
        vec!["title", "author", "description", "genre", "publicationYear"]
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/books")
                .header("authorization", format!("Bearer {TOKEN}"))
                .body(Body::from(book_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn trailing_slash_is_served_by_the_server() {
    let app = test_app();
    let response = bookshelf_http::trim_trailing_slash(app.router.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/books/")
                .header("authorization", format!("Bearer {TOKEN}"))
                .header("content-type", "application/json")
                .body(Body::from(book_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.repository.calls().len(), 1);
}

#[tokio::test]
async fn genres_are_returned_unmodified() {
    let app = test_app();
    let (status, body) = app.get("/api/books/genres").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Fantasy", "Science Fiction", "Poetry"]));
    assert!(app.repository.calls().is_empty());
}

#[tokio::test]
async fn get_book_returns_the_stored_book() {
    let app = test_app();
    let id = app.create_book().await;

    let (status, body) = app.get(&format!("/api/books/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["createdBy"], "u-7");
    assert_eq!(body["reviews"], json!([]));
}

#[tokio::test]
async fn missing_book_is_decided_by_the_repository() {
    let app = test_app();
    let (status, body) = app.get("/api/books/7").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(app.repository.calls(), vec![Call::One("7".to_string())]);
}

#[tokio::test]
async fn empty_review_is_rejected() {
    let app = test_app();
    let (status, body) = app
        .post("/api/books/7/reviews", json!({"review": ""}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "review: Invalid value");
    assert_eq!(
        body["error"]["details"],
        json!([{"field": "review", "message": "Invalid value"}])
    );
    assert!(app.repository.calls().is_empty());
}

#[tokio::test]
async fn review_is_saved_for_the_path_book() {
    let app = test_app();
    let id = app.create_book().await;

    let (status, body) = app
        .post(&format!("/api/books/{id}/reviews"), json!({"review": "Great book"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    let review_id = body["reviewId"].as_str().unwrap().to_string();
    assert_eq!(
        app.repository.calls().last(),
        Some(&Call::SaveReview(
            NewReview {
                review: "Great book".to_string()
            },
            reader(),
            id.clone(),
        ))
    );

    let (status, reviews) = app.get(&format!("/api/books/{id}/reviews")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 1);
    assert_eq!(reviews[0]["id"], review_id);
    assert_eq!(reviews[0]["bookId"], id);
    assert_eq!(reviews[0]["review"], "Great book");
    assert_eq!(reviews[0]["username"], "reader");
}

#[tokio::test]
async fn reviewing_a_missing_book_is_not_found() {
    let app = test_app();
    let (status, _) = app
        .post("/api/books/7/reviews", json!({"review": "Great book"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_lists_every_books_route() {
    let app = test_app();
    let (status, spec) = app.send("GET", "/docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    for path in [
        "/api/books",
        "/api/books/genres",
        "/api/books/{id}",
        "/api/books/{id}/reviews",
    ] {
        assert!(spec["paths"][path].is_object(), "{path}");
    }
}
