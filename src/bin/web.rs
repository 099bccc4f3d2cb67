//! Single binary web server: JSON REST API over the tournament service.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), DATA_DIR (bracket JSON
//! files; unset keeps brackets in memory).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use padel_tournament_web::{
    roster::read_roster, Format, GroupColor, JsonFileStore, MemoryStore, Player, Side,
    TournamentError, TournamentId, TournamentService,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

type AppState = Data<TournamentService>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NewPlayerBody {
    name: String,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    group: Option<GroupColor>,
    #[serde(default)]
    group_order: Option<u32>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: Format,
    #[serde(default)]
    players: Vec<NewPlayerBody>,
}

#[derive(Deserialize)]
struct ImportQuery {
    name: String,
    #[serde(default)]
    format: Format,
}

#[derive(Deserialize)]
struct MoveToGroupBody {
    group: GroupColor,
    #[serde(default)]
    position: usize,
}

#[derive(Deserialize)]
struct ScoreBody {
    side: Side,
    score: i32,
}

#[derive(Deserialize)]
struct RollbackBody {
    round: u32,
    #[serde(default)]
    confirm: bool,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/players/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: Uuid,
}

/// Path segments: tournament id and match id
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

/// Map an engine error to a response: bad input 400, wrong state 409, missing 404,
/// storage failure 500.
fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::Validation(_) => HttpResponse::BadRequest().json(body),
        TournamentError::State(_) => HttpResponse::Conflict().json(body),
        TournamentError::MatchNotFound(_)
        | TournamentError::PlayerNotFound(_)
        | TournamentError::TournamentNotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::Persistence(ref err) => {
            log::error!("Storage failure: {}", err);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: serde::Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a tournament (returns it with id and its empty bracket).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let players = body
        .players
        .into_iter()
        .map(|p| {
            let mut player = Player::new(p.name.trim(), p.rating);
            player.group = p.group;
            player.group_order = p.group_order;
            player
        })
        .collect();
    respond(state.create_tournament(&body.name, body.format, players))
}

/// Create a tournament from a CSV roster (header: name,rating[,group][,group_order]).
#[post("/api/tournaments/import")]
async fn api_import_tournament(state: AppState, query: Query<ImportQuery>, body: String) -> HttpResponse {
    let players = match read_roster(body.as_bytes()) {
        Ok(players) => players,
        Err(e) => return error_response(e.into()),
    };
    respond(state.create_tournament(&query.name, query.format, players))
}

/// Get a tournament and its bracket (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.tournament(path.id))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.delete_tournament(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// Add a player (before the first round only).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<NewPlayerBody>) -> HttpResponse {
    respond(state.add_player(path.id, &body.name, body.rating))
}

/// Remove a player by id (before the first round only).
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    respond(state.remove_player(path.id, path.player_id))
}

/// Move a player within the Americano groups; regenerates the schedule if it exists.
#[put("/api/tournaments/{id}/players/{player_id}/group")]
async fn api_move_player_to_group(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<MoveToGroupBody>,
) -> HttpResponse {
    respond(state.move_player_to_group(path.id, path.player_id, body.group, body.position))
}

/// Generate the next round (Mexicano) or all rounds (Americano).
#[post("/api/tournaments/{id}/rounds/generate")]
async fn api_generate_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.generate_round(path.id))
}

/// Enter one side's score for a match.
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_update_score(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    respond(state.update_score(path.id, path.match_id, body.side, body.score))
}

/// Roll back to an earlier round. Requires `confirm: true`.
#[post("/api/tournaments/{id}/rollback")]
async fn api_rollback(state: AppState, path: Path<TournamentPath>, body: Json<RollbackBody>) -> HttpResponse {
    respond(state.rollback(path.id, body.round, body.confirm))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.standings(path.id))
}

#[get("/api/tournaments/{id}/can-advance")]
async fn api_can_advance(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(
        state
            .can_advance(path.id)
            .map(|can_advance| serde_json::json!({ "canAdvance": can_advance })),
    )
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);

    let service = match std::env::var("DATA_DIR") {
        Ok(dir) => {
            log::info!("Storing tournaments under {}", dir);
            JsonFileStore::open(dir).and_then(TournamentService::new)
        }
        Err(_) => {
            log::info!("DATA_DIR not set; tournaments are kept in memory");
            TournamentService::new(MemoryStore::new())
        }
    }
    .map_err(std::io::Error::other)?;
    let state = Data::new(service);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    // Background task: log every saved snapshot (live views subscribe the same way)
    let mut updates = state.subscribe();
    actix_web::rt::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(event) => log::info!(
                    "Tournament {} saved: {} round {}",
                    event.tournament_id,
                    event.bracket.format(),
                    event.bracket.current_round()
                ),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Update log skipped {} snapshot(s)", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_import_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_move_player_to_group)
            .service(api_generate_round)
            .service(api_update_score)
            .service(api_rollback)
            .service(api_standings)
            .service(api_can_advance)
    })
    .bind(bind)?
    .run()
    .await
}
