use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use warp::ws::{Message, WebSocket};
use warp::Filter;

use quote_types::{GameError, ImportError, Quote};

pub mod config;
pub mod game_manager;
pub mod profile_store;
pub mod quote_store;

use crate::game_manager::GameManager;
use crate::profile_store::ProfileStore;
use crate::quote_store::QuoteStore;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddQuoteRequest {
    text: String,
    speaker: String,
    added_by: String,
}

#[derive(Deserialize)]
struct AnswerRequest {
    answer: String,
}

#[derive(Deserialize)]
struct UsernameRequest {
    name: String,
}

pub fn create_routes(
    quotes: Arc<QuoteStore>,
    profiles: Arc<ProfileStore>,
    games: Arc<GameManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let quotes_filter = warp::any().map({
        let quotes = quotes.clone();
        move || quotes.clone()
    });

    let profiles_filter = warp::any().map({
        let profiles = profiles.clone();
        move || profiles.clone()
    });

    let games_filter = warp::any().map({
        let games = games.clone();
        move || games.clone()
    });

    // Health check endpoint
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Live snapshot stream: pushes the quote list on every store change
    let websocket = warp::path!("ws")
        .and(warp::ws())
        .and(quotes_filter.clone())
        .map(|ws: warp::ws::Ws, quotes| {
            ws.on_upgrade(move |socket| handle_snapshot_socket(socket, quotes))
        });

    let list_quotes = warp::path!("quotes")
        .and(warp::get())
        .and(quotes_filter.clone())
        .and_then(handle_list_quotes);

    let add_quote = warp::path!("quotes")
        .and(warp::post())
        .and(warp::body::json())
        .and(quotes_filter.clone())
        .and_then(handle_add_quote);

    let export_quotes = warp::path!("quotes" / "export")
        .and(warp::get())
        .and(quotes_filter.clone())
        .and_then(handle_export);

    let import_quotes = warp::path!("quotes" / "import")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(quotes_filter.clone())
        .and_then(handle_import);

    let delete_quote = warp::path!("quotes" / String)
        .and(warp::delete())
        .and(quotes_filter.clone())
        .and_then(handle_delete_quote);

    let people = warp::path!("people")
        .and(warp::get())
        .and(quotes_filter.clone())
        .and_then(handle_people);

    let person_quotes = warp::path!("people" / String / "quotes")
        .and(warp::get())
        .and(quotes_filter.clone())
        .and_then(handle_person_quotes);

    let game_state = warp::path!("game")
        .and(warp::get())
        .and(games_filter.clone())
        .and_then(handle_game_state);

    let game_start = warp::path!("game" / "start")
        .and(warp::post())
        .and(games_filter.clone())
        .and_then(handle_game_start);

    let game_answer = warp::path!("game" / "answer")
        .and(warp::post())
        .and(warp::body::json())
        .and(games_filter.clone())
        .and_then(handle_game_answer);

    let game_next = warp::path!("game" / "next")
        .and(warp::post())
        .and(games_filter.clone())
        .and_then(handle_game_next);

    let game_end = warp::path!("game" / "end")
        .and(warp::post())
        .and(games_filter.clone())
        .and_then(handle_game_end);

    let profile_get = warp::path!("profile")
        .and(warp::get())
        .and(profiles_filter.clone())
        .and_then(handle_profile_get);

    let profile_put = warp::path!("profile")
        .and(warp::put())
        .and(warp::body::json())
        .and(profiles_filter.clone())
        .and_then(handle_profile_put);

    let profile_delete = warp::path!("profile")
        .and(warp::delete())
        .and(profiles_filter.clone())
        .and_then(handle_profile_delete);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(websocket)
        .or(export_quotes)
        .or(import_quotes)
        .or(list_quotes)
        .or(add_quote)
        .or(delete_quote)
        .or(people)
        .or(person_quotes)
        .or(game_start)
        .or(game_answer)
        .or(game_next)
        .or(game_end)
        .or(game_state)
        .or(profile_get)
        .or(profile_put)
        .or(profile_delete)
        .with(cors)
        .with(warp::log("quotebook"))
}

async fn handle_list_quotes(quotes: Arc<QuoteStore>) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&quotes.list().await))
}

async fn handle_add_quote(
    request: AddQuoteRequest,
    quotes: Arc<QuoteStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match quotes
        .add(&request.text, &request.speaker, &request.added_by)
        .await
    {
        Ok(true) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "status": "ok" })),
            warp::http::StatusCode::CREATED,
        )),
        Ok(false) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({
                "error": "text and speaker must not be empty"
            })),
            warp::http::StatusCode::BAD_REQUEST,
        )),
        Err(err) => {
            tracing::error!("failed to add quote: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "error": err.to_string() })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_delete_quote(
    id: String,
    quotes: Arc<QuoteStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match quotes.delete(&id).await {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "status": "ok" })),
            warp::http::StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!("failed to delete quote {}: {}", id, err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "error": err.to_string() })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_people(quotes: Arc<QuoteStore>) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&quotes.people().await))
}

async fn handle_person_quotes(
    name: String,
    quotes: Arc<QuoteStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&quotes.quotes_by_speaker(&name).await))
}

async fn handle_export(quotes: Arc<QuoteStore>) -> Result<impl warp::Reply, warp::Rejection> {
    let body = quotes.export_snapshot().await;
    let filename = quote_core::export_filename(chrono::Utc::now().date_naive());

    Ok(warp::reply::with_header(
        warp::reply::with_header(body, "content-type", "application/json"),
        "content-disposition",
        format!("attachment; filename=\"{}\"", filename),
    ))
}

async fn handle_import(
    body: warp::hyper::body::Bytes,
    quotes: Arc<QuoteStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let raw = String::from_utf8_lossy(&body);
    match quotes.import_snapshot(&raw).await {
        Ok(count) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "imported": count })),
            warp::http::StatusCode::OK,
        )),
        Err(ImportError::InvalidFormat) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({
                "error": ImportError::InvalidFormat.to_string()
            })),
            warp::http::StatusCode::BAD_REQUEST,
        )),
        Err(ImportError::Persistence(err)) => {
            tracing::error!("import failed to persist: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "error": err.to_string() })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_game_state(games: Arc<GameManager>) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&games.state().await))
}

async fn handle_game_start(games: Arc<GameManager>) -> Result<impl warp::Reply, warp::Rejection> {
    match games.start().await {
        Ok(state) => Ok(warp::reply::with_status(
            warp::reply::json(&state),
            warp::http::StatusCode::OK,
        )),
        Err(err @ GameError::InsufficientData { .. }) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "error": err.to_string() })),
            warp::http::StatusCode::CONFLICT,
        )),
    }
}

async fn handle_game_answer(
    request: AnswerRequest,
    games: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&games.submit_answer(&request.answer).await))
}

async fn handle_game_next(games: Arc<GameManager>) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&games.next_round().await))
}

async fn handle_game_end(games: Arc<GameManager>) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&games.end().await))
}

async fn handle_profile_get(
    profiles: Arc<ProfileStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&profiles.current().await))
}

async fn handle_profile_put(
    request: UsernameRequest,
    profiles: Arc<ProfileStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let name = request.name.trim();
    if name.is_empty() {
        return Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "error": "name must not be empty" })),
            warp::http::StatusCode::BAD_REQUEST,
        ));
    }

    match profiles.set_username(name).await {
        Ok(profile) => Ok(warp::reply::with_status(
            warp::reply::json(&profile),
            warp::http::StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!("failed to save profile: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "error": err.to_string() })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_profile_delete(
    profiles: Arc<ProfileStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match profiles.logout().await {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "status": "ok" })),
            warp::http::StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!("failed to clear profile: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "error": err.to_string() })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Streams the quote list to a client: the current snapshot on connect,
/// then one message per store change, until either side hangs up.
async fn handle_snapshot_socket(socket: WebSocket, quotes: Arc<QuoteStore>) {
    let (mut sink, mut stream) = socket.split();
    let mut updates = quotes.subscribe();

    let initial = updates.borrow().clone();
    if send_snapshot(&mut sink, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if send_snapshot(&mut sink, &snapshot).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(message)) if message.is_close() => break,
                    Some(Ok(_)) => {} // nothing to read from clients
                    Some(Err(_)) | None => break,
                }
            }
        }
    }

    let _ = sink.close().await;
}

async fn send_snapshot(
    sink: &mut SplitSink<WebSocket, Message>,
    quotes: &[Quote],
) -> Result<(), ()> {
    let payload = serde_json::to_string(quotes).map_err(|_| ())?;
    sink.send(Message::text(payload)).await.map_err(|_| ())
}
