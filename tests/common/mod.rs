//! Shared fixtures: a throwaway upstream serving the dataset and images

#![allow(dead_code)]

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use emoji_kitchen_proxy::{
    config::Config,
    storage::MemoryStore,
    web::{AppState, create_app},
};

pub const DATASET: &str = r#"{
    "1f600": [
        {"leftEmoji": "1f600", "rightEmoji": "1f601", "date": "20201001"},
        {"leftEmoji": "2764-fe0f", "rightEmoji": "1f600", "date": "20210831"},
        {"leftEmoji": "1f600", "rightEmoji": "1f602", "date": "20201001"}
    ],
    "1f601": [
        {"leftEmoji": "1f600", "rightEmoji": "1f601", "date": "20201001"}
    ],
    "1f602": [],
    "1f603": [
        {"leftEmoji": "1f600", "rightEmoji": "1f603", "date": "19990101"}
    ],
    "2764-fe0f": [
        {"leftEmoji": "2764-fe0f", "rightEmoji": "1f600", "date": "20210831"}
    ]
}"#;

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

const IMAGES: &[&str] = &[
    "20201001/u1f600/u1f600_u1f601.png",
    "20210831/u2764-ufe0f/u2764-ufe0f_u1f600.png",
];

#[derive(Clone, Default)]
pub struct Upstream {
    pub dataset_hits: Arc<AtomicUsize>,
    pub image_requests: Arc<Mutex<Vec<String>>>,
    pub dataset_status: Arc<Mutex<Option<StatusCode>>>,
}

impl Upstream {
    pub fn dataset_hits(&self) -> usize {
        self.dataset_hits.load(Ordering::SeqCst)
    }

    pub fn image_requests(&self) -> Vec<String> {
        self.image_requests.lock().unwrap().clone()
    }

    pub fn fail_dataset_with(&self, status: StatusCode) {
        *self.dataset_status.lock().unwrap() = Some(status);
    }
}

async fn serve_dataset(State(upstream): State<Upstream>) -> Response {
    upstream.dataset_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = *upstream.dataset_status.lock().unwrap() {
        return (status, "upstream broken").into_response();
    }
    ([(header::CONTENT_TYPE, "application/json")], DATASET).into_response()
}

async fn serve_image(
    State(upstream): State<Upstream>,
    Path((date, dir, file)): Path<(String, String, String)>,
) -> Response {
    let path = format!("{date}/{dir}/{file}");
    upstream.image_requests.lock().unwrap().push(path.clone());

    if IMAGES.contains(&path.as_str()) {
        (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "public, max-age=86400"),
            ],
            PNG_BYTES,
        )
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, "image missing").into_response()
    }
}

/// Start the fake upstream, returning its base URL
pub async fn spawn_upstream(upstream: Upstream) -> String {
    let app = Router::new()
        .route("/emojiData.json", get(serve_dataset))
        .route("/emojikitchen/{date}/{dir}/{file}", get(serve_image))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.upstream.dataset_url = format!("{base_url}/emojiData.json");
    config.upstream.image_base_url = format!("{base_url}/emojikitchen");
    config.upstream.connect_timeout = "2s".to_string();
    config.web.request_timeout = "5s".to_string();
    config
}

/// Router wired to a fresh fake upstream and an inspectable store
pub async fn test_app() -> (Router, Upstream, MemoryStore) {
    let upstream = Upstream::default();
    let base_url = spawn_upstream(upstream.clone()).await;
    let store = MemoryStore::new();

    let state = AppState::with_store(&test_config(&base_url), Arc::new(store.clone())).unwrap();
    (create_app(state), upstream, store)
}

/// Percent-encode every byte of each segment into an absolute path
pub fn encoded_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| {
            let encoded: String = segment.bytes().map(|b| format!("%{b:02X}")).collect();
            format!("/{encoded}")
        })
        .collect()
}
