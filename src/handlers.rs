use crate::booking::BookingOutcome;
use crate::calendar::Availability;
use crate::errors::AppError;
use crate::models::{
    AvailabilityQuery, AvailabilityResponse, MediaEventRequest, PlayerActionRequest,
    PlayerResponse, PrefsResponse, PrefsUpdate, ScrubPhase, ScrubRequest,
};
use crate::prefs::{Preferences, parse_tint};
use crate::state::{AppState, Site};
use crate::storage::persist_prefs;
use crate::ui::INDEX_HTML;
use axum::{
    Form, Json,
    extract::{Query, State},
    response::Html,
};
use chrono::{Duration, NaiveDate};
use tracing::debug;

const MAX_AVAILABILITY_SPAN_DAYS: i64 = 366;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn get_shows(State(state): State<AppState>) -> Html<String> {
    Html(state.shows.load().await.to_html())
}

pub async fn get_prefs(State(state): State<AppState>) -> Json<PrefsResponse> {
    let site = state.site.lock().await;
    Json(prefs_response(&site.prefs))
}

pub async fn update_prefs(
    State(state): State<AppState>,
    Json(update): Json<PrefsUpdate>,
) -> Result<Json<PrefsResponse>, AppError> {
    let tint = match update.tint.as_deref() {
        Some(raw) => Some(
            parse_tint(raw).ok_or_else(|| AppError::bad_request("tint must look like \"r,g,b\""))?,
        ),
        None => None,
    };

    let mut site = state.site.lock().await;
    let before = site.prefs.clone();
    if let Some(tint) = tint {
        site.prefs.set_tint(&tint);
    }
    if let Some(lefty) = update.lefty {
        site.prefs.set_lefty(lefty);
    }
    persist_if_changed(&state, &before, &site).await?;

    Ok(Json(prefs_response(&site.prefs)))
}

fn prefs_response(prefs: &Preferences) -> PrefsResponse {
    PrefsResponse {
        tint: prefs.tint(),
        lefty: prefs.lefty(),
    }
}

pub async fn get_player(State(state): State<AppState>) -> Json<PlayerResponse> {
    let mut site = state.site.lock().await;
    Json(player_response(&mut site))
}

pub async fn player_action(
    State(state): State<AppState>,
    Json(request): Json<PlayerActionRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    let mut guard = state.site.lock().await;
    let before = guard.prefs.clone();
    let site = &mut *guard;

    match request.action.trim() {
        "play" => site.player.play(),
        "pause" => site.player.pause(),
        "toggle" => site.player.toggle_play(),
        "next" => site.player.next(&mut site.prefs),
        "prev" => site.player.prev(&mut site.prefs),
        "mute" => site.player.toggle_mute(&mut site.prefs),
        "hide" => site.player.hide(&mut site.prefs),
        "load" => {
            let index = request
                .index
                .ok_or_else(|| AppError::bad_request("load needs an index"))?;
            let resume = site.player.is_playing();
            site.player.load(index, resume, &mut site.prefs);
        }
        other => {
            return Err(AppError::bad_request(format!("unknown player action '{other}'")));
        }
    }
    debug!(action = %request.action, state = ?site.player.state(), "player action");

    persist_if_changed(&state, &before, &guard).await?;
    Ok(Json(player_response(&mut guard)))
}

pub async fn player_media(
    State(state): State<AppState>,
    Json(event): Json<MediaEventRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    let mut guard = state.site.lock().await;
    let before = guard.prefs.clone();
    let site = &mut *guard;

    match event {
        MediaEventRequest::LoadedMetadata { duration } => site.player.on_loaded_metadata(duration),
        MediaEventRequest::TimeUpdate { current_time } => site.player.on_time_update(current_time),
        MediaEventRequest::Ended => site.player.on_ended(&mut site.prefs),
        MediaEventRequest::PlayRejected => site.player.on_play_rejected(),
    }

    persist_if_changed(&state, &before, &guard).await?;
    Ok(Json(player_response(&mut guard)))
}

pub async fn player_scrub(
    State(state): State<AppState>,
    Json(request): Json<ScrubRequest>,
) -> Json<PlayerResponse> {
    let mut site = state.site.lock().await;
    let player = &mut site.player;

    match request.phase {
        ScrubPhase::Down => player.pointer_down(),
        ScrubPhase::Move => player.pointer_move(request.x, request.bar),
        ScrubPhase::Up => player.pointer_up(),
        ScrubPhase::Leave => player.pointer_leave(),
        ScrubPhase::Click => player.click(request.x, request.bar),
    }

    Json(player_response(&mut site))
}

fn player_response(site: &mut Site) -> PlayerResponse {
    PlayerResponse {
        player: site.player.view(),
        commands: site.player.media_mut().drain(),
    }
}

async fn persist_if_changed(
    state: &AppState,
    before: &Preferences,
    site: &Site,
) -> Result<(), AppError> {
    if &site.prefs != before {
        persist_prefs(&state.data_path, &site.prefs).await?;
    }
    Ok(())
}

pub async fn submit_booking(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Json<BookingOutcome> {
    Json(state.booking.send(&fields).await)
}

pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    if let Some(date) = query.date {
        let status = state.calendar.check(date).await;
        let blackout_dates = if status == Availability::Unavailable {
            vec![date]
        } else {
            Vec::new()
        };
        return Ok(Json(availability_response(status, blackout_dates)));
    }

    let (Some(from), Some(to)) = (query.from, query.to) else {
        return Err(AppError::bad_request("pass either date or from and to"));
    };
    if to < from || to - from > Duration::days(MAX_AVAILABILITY_SPAN_DAYS) {
        return Err(AppError::bad_request("date range is empty or too long"));
    }

    let response = match state.calendar.blackout_dates(from, to).await {
        Ok(days) if days.is_empty() => availability_response(Availability::Available, Vec::new()),
        Ok(days) => availability_response(Availability::Unavailable, days.into_iter().collect()),
        Err(err) => availability_response(Availability::from_error(&err), Vec::new()),
    };
    Ok(Json(response))
}

fn availability_response(
    status: Availability,
    blackout_dates: Vec<NaiveDate>,
) -> AvailabilityResponse {
    AvailabilityResponse {
        status,
        message: status.message().to_string(),
        blackout_dates,
    }
}
