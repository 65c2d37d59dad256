//! Single binary web server: JSON API for tournaments, images from /static.
//! Run with: cargo run --bin web
//! Binds 0.0.0.0:8080 by default so a reverse proxy or LAN client can reach it.
//! Override with env: HOST and PORT.

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use drawing_tournament_web::{
    advance_phase, cast_vote, parse_roster, rank_standings, round_name, start_tournament,
    StatEntry, Tournament, TournamentId, TournamentState,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// One live tournament plus its last activity time (for auto-cleanup).
/// Called a session to keep "entry" free for the drawings themselves.
struct TournamentSession {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: every live tournament by id. Sessions idle for 12h are dropped.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentSession>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddEntryBody {
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    image: String,
}

#[derive(Deserialize)]
struct EditEntryBody {
    title: Option<String>,
    author: Option<String>,
}

#[derive(Deserialize)]
struct VoteBody {
    match_id: Uuid,
    winner: Uuid,
}

/// Path segment for /api/tournaments/{id} routes.
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments for /api/tournaments/{id}/entries/{entry_id} routes.
#[derive(Deserialize)]
struct TournamentEntryPath {
    id: TournamentId,
    entry_id: Uuid,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "drawing-tournament-web",
    })
}

/// Browsers ask for this on every visit; answer quietly instead of 404ing.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament; the client keeps the returned id for later requests.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState) -> HttpResponse {
    let tournament = Tournament::new();
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        TournamentSession {
            tournament,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(&g.get(&id).unwrap().tournament)
}

/// Fetch a tournament by id (404 if unknown). Reading counts as activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(session) => {
            session.last_activity = Instant::now();
            HttpResponse::Ok().json(&session.tournament)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Add an entry (tournament must be in Upload).
#[post("/api/tournaments/{id}/entries")]
async fn api_add_entry(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddEntryBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &mut session.tournament;
    let b = body.into_inner();
    match t.add_entry(b.title, b.author, b.image) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Bulk-add entries from a CSV body (headered: title,author,image).
#[post("/api/tournaments/{id}/entries/import")]
async fn api_import_roster(
    state: AppState,
    path: Path<TournamentPath>,
    body: web::Bytes,
) -> HttpResponse {
    let records = match parse_roster(body.as_ref()) {
        Ok(r) => r,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    };
    // Reject bad rows before applying anything.
    if records.iter().any(|r| r.title.trim().is_empty()) {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Roster has a row with an empty title" }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &mut session.tournament;
    for r in records {
        if let Err(e) = t.add_entry(r.title, r.author, r.image) {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
        }
    }
    HttpResponse::Ok().json(t)
}

/// Edit an entry's title and/or author (tournament must be in Upload).
#[put("/api/tournaments/{id}/entries/{entry_id}")]
async fn api_edit_entry(
    state: AppState,
    path: Path<TournamentEntryPath>,
    body: Json<EditEntryBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &mut session.tournament;
    let b = body.into_inner();
    let mut result = Ok(());
    if let Some(title) = b.title {
        result = t.set_entry_title(path.entry_id, title);
    }
    if result.is_ok() {
        if let Some(author) = b.author {
            result = t.set_entry_author(path.entry_id, author);
        }
    }
    match result {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Remove an entry by id (tournament must be in Upload).
#[delete("/api/tournaments/{id}/entries/{entry_id}")]
async fn api_remove_entry(state: AppState, path: Path<TournamentEntryPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &mut session.tournament;
    match t.remove_entry(path.entry_id) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Start the tournament (Upload -> GroupPhase): partition into groups and schedule matches.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &mut session.tournament;
    match start_tournament(t) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Cast a vote: decide one match in the current phase.
#[post("/api/tournaments/{id}/votes")]
async fn api_cast_vote(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<VoteBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &mut session.tournament;
    match cast_vote(t, body.match_id, body.winner) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Advance to the next phase once every match in the current one is decided.
#[post("/api/tournaments/{id}/advance")]
async fn api_advance_phase(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &mut session.tournament;
    match advance_phase(t) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Reset: discard all stage progress, back to Upload with the same entries.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &mut session.tournament;
    match t.reset_tournament() {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// The match currently up for a vote (null once there is none).
#[get("/api/tournaments/{id}/current-match")]
async fn api_current_match(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(session) => {
            session.last_activity = Instant::now();
            HttpResponse::Ok().json(session.tournament.current_match())
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Ranked standings tables: one per group during the group phase, a
/// single table during round robin.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &session.tournament;
    match t.state {
        TournamentState::GroupPhase => {
            let tables: Vec<Vec<StatEntry>> = t
                .groups
                .iter()
                .map(|group| rank_standings(&group.standings))
                .collect();
            HttpResponse::Ok().json(tables)
        }
        TournamentState::RoundRobin => match &t.round_robin {
            Some(stage) => HttpResponse::Ok().json(vec![rank_standings(&stage.standings)]),
            None => HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": "No standings in this phase" })),
        },
        _ => HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "No standings in this phase" })),
    }
}

/// Bracket view: rounds, display names per round, current match, champion.
#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let session = match g.get_mut(&path.id) {
        Some(s) => s,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    session.last_activity = Instant::now();
    let t = &session.tournament;
    match &t.bracket {
        Some(bracket) => {
            let total = bracket.total_rounds();
            let names: Vec<String> = (1..=total).map(|r| round_name(r, total)).collect();
            HttpResponse::Ok().json(serde_json::json!({
                "rounds": bracket.rounds,
                "round_names": names,
                "current": bracket.current,
                "champion": t.champion(),
            }))
        }
        None => HttpResponse::BadRequest().json(serde_json::json!({ "error": "No bracket yet" })),
    }
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
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentSession>::new()));

    // Sweep every 30 minutes for tournaments nobody has touched in 12 hours.
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, session| session.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Dropped {} idle tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_entry)
            .service(api_import_roster)
            .service(api_edit_entry)
            .service(api_remove_entry)
            .service(api_start_tournament)
            .service(api_cast_vote)
            .service(api_advance_phase)
            .service(api_reset_tournament)
            .service(api_current_match)
            .service(api_standings)
            .service(api_bracket)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}
