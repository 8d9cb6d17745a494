//! In-process stub of the PetFriends service.
//!
//! Mirrors the endpoints the client talks to, including the service's
//! quirks: it accepts any age or name, answers 500 for photos on unknown
//! pets and reports auth failures as plain text.
#![allow(clippy::expect_used, dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const VALID_EMAIL: &str = "qa@example.com";
pub const VALID_PASSWORD: &str = "secret";
pub const VALID_KEY: &str = "ea738148a1f19838e1c5d1413877f3691a3731380e733e877b0ae729";
pub const MISSING_PET_ID: &str = "9C4AEC87";

const OWNER: &str = "qa-user";
const OTHER_OWNER: &str = "someone-else";

/// A multipart part as received by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

/// A request as received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub auth_key: Option<String>,
    pub parts: Vec<RecordedPart>,
}

impl RecordedRequest {
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|part| part.name.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
struct StoredPet {
    id: String,
    name: String,
    animal_type: String,
    age: String,
    pet_photo: String,
    owner: &'static str,
}

impl StoredPet {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "animal_type": self.animal_type,
            "age": self.age,
            "pet_photo": self.pet_photo,
            "created_at": "1700000000.123",
            "user_id": self.owner,
        })
    }
}

#[derive(Default)]
struct StubState {
    pets: Vec<StoredPet>,
    next_id: u32,
    requests: Vec<RecordedRequest>,
    delay: Duration,
}

impl StubState {
    fn insert(&mut self, name: &str, animal_type: &str, age: &str, photo: String, owner: &'static str) -> StoredPet {
        self.next_id += 1;
        let pet = StoredPet {
            id: format!("stub-{:04}", self.next_id),
            name: name.to_string(),
            animal_type: animal_type.to_string(),
            age: age.to_string(),
            pet_photo: photo,
            owner,
        };
        self.pets.push(pet.clone());
        pet
    }

    fn own_pet_mut(&mut self, id: &str) -> Option<&mut StoredPet> {
        self.pets.iter_mut().find(|pet| pet.id == id && pet.owner == OWNER)
    }
}

type Shared = Arc<Mutex<StubState>>;

fn lock(state: &Shared) -> MutexGuard<'_, StubState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle for the stub server; shuts it down on drop.
pub struct StubServer {
    base_url: String,
    state: Shared,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubServer {
    /// Spawn a stub that answers immediately.
    pub async fn spawn() -> Self {
        Self::spawn_with_delay(Duration::ZERO).await
    }

    /// Spawn a stub that waits `delay` before answering the key endpoint.
    pub async fn spawn_with_delay(delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");

        let mut state = StubState {
            delay,
            ..StubState::default()
        };
        state.insert("Sharik", "dog", "4", String::new(), OTHER_OWNER);
        let state = Arc::new(Mutex::new(state));

        let app = Router::new()
            .route("/api/key", get(get_key))
            .route("/api/pets", get(list_pets).post(create_pet))
            .route("/api/create_pet_simple", post(create_pet_simple))
            .route("/api/pets/set_photo/{id}", post(set_photo))
            .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
            .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
            .with_state(Arc::clone(&state));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            base_url: format!("http://{addr}/"),
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        lock(&self.state)
            .requests
            .last()
            .cloned()
            .expect("stub received no request")
    }

    /// Adds a pet owned by the test account directly to the store.
    pub fn seed_own_pet(&self, name: &str) -> String {
        lock(&self.state)
            .insert(name, "cat", "2", String::new(), OWNER)
            .id
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let entry = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        content_type: header(request.headers(), "content-type"),
        auth_key: header(request.headers(), "auth_key"),
        parts: Vec::new(),
    };
    lock(&state).requests.push(entry);
    next.run(request).await
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn authorized(headers: &HeaderMap) -> bool {
    header(headers, "auth_key").as_deref() == Some(VALID_KEY)
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        "<h1>Forbidden</h1><p>Please provide 'auth_key' Header</p>",
    )
        .into_response()
}

async fn get_key(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let delay = lock(&state).delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let valid = header(&headers, "email").as_deref() == Some(VALID_EMAIL)
        && header(&headers, "password").as_deref() == Some(VALID_PASSWORD);
    if valid {
        Json(json!({ "key": VALID_KEY })).into_response()
    } else {
        (
            StatusCode::FORBIDDEN,
            "<h1>Forbidden</h1><p>This user wasn't found in database</p>",
        )
            .into_response()
    }
}

async fn list_pets(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let state = lock(&state);
    let pets: Vec<Value> = match query.get("filter").map(String::as_str) {
        None | Some("") => state.pets.iter().map(StoredPet::to_json).collect(),
        Some("my_pets") => state
            .pets
            .iter()
            .filter(|pet| pet.owner == OWNER)
            .map(StoredPet::to_json)
            .collect(),
        Some(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Filter value is incorrect").into_response();
        }
    };
    Json(json!({ "pets": pets })).into_response()
}

#[derive(Default)]
struct ParsedForm {
    text: HashMap<String, String>,
    photo: Option<String>,
}

/// Reads every part, logging it on the current request.
async fn read_form(state: &Shared, mut multipart: Multipart) -> Result<ParsedForm, Response> {
    let mut parsed = ParsedForm::default();
    let mut parts = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err((StatusCode::BAD_REQUEST, err.to_string()).into_response()),
        };
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()).into_response())?;

        parts.push(RecordedPart {
            name: name.clone(),
            file_name: file_name.clone(),
            content_type: content_type.clone(),
            len: data.len(),
        });
        if file_name.is_some() {
            let mime = content_type.unwrap_or_else(|| "application/octet-stream".to_string());
            parsed.photo = Some(format!("data:{mime};base64,<{} bytes>", data.len()));
        } else {
            parsed
                .text
                .insert(name, String::from_utf8_lossy(&data).into_owned());
        }
    }
    if let Some(current) = lock(state).requests.last_mut() {
        current.parts = parts;
    }
    Ok(parsed)
}

fn insert_from_form(state: &Shared, form: &ParsedForm, photo: String) -> Response {
    let (Some(name), Some(animal_type), Some(age)) = (
        form.text.get("name"),
        form.text.get("animal_type"),
        form.text.get("age"),
    ) else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };
    let pet = lock(state).insert(name, animal_type, age, photo, OWNER);
    Json(pet.to_json()).into_response()
}

async fn create_pet(State(state): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let form = match read_form(&state, multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let Some(photo) = form.photo.clone() else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };
    insert_from_form(&state, &form, photo)
}

async fn create_pet_simple(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    match read_form(&state, multipart).await {
        Ok(form) => insert_from_form(&state, &form, String::new()),
        Err(response) => response,
    }
}

async fn set_photo(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let form = match read_form(&state, multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let Some(photo) = form.photo else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };
    let mut state = lock(&state);
    match state.own_pet_mut(&id) {
        Some(pet) => {
            pet.pet_photo = photo;
            Json(pet.to_json()).into_response()
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
    }
}

async fn update_pet(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let mut state = lock(&state);
    let Some(pet) = state.own_pet_mut(&id) else {
        return (StatusCode::BAD_REQUEST, "Pet with this id not found").into_response();
    };
    if let Some(name) = fields.get("name") {
        pet.name.clone_from(name);
    }
    if let Some(animal_type) = fields.get("animal_type") {
        pet.animal_type.clone_from(animal_type);
    }
    if let Some(age) = fields.get("age") {
        pet.age.clone_from(age);
    }
    Json(pet.to_json()).into_response()
}

async fn delete_pet(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let mut state = lock(&state);
    let before = state.pets.len();
    state.pets.retain(|pet| !(pet.id == id && pet.owner == OWNER));
    if state.pets.len() < before {
        StatusCode::OK.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Pet not found").into_response()
    }
}
