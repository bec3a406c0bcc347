//! Booking API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Booking, BookingCreate, BookingStatus, BookingStatusUpdate};
use crate::db::repository::{BookingRepository, parse_record_id};
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// POST /api/booking/create
///
/// 同一 date+time 槽位已有未取消预订时拒绝（Conflict）。
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<AppResponse<Booking>>> {
    payload.validate()?;
    parse_date(&payload.date)?;

    let repo = BookingRepository::new(state.get_db());
    if repo
        .find_active_slot(&payload.date, &payload.time)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("This time slot is already booked"));
    }

    let now = shared::util::now_millis();
    let booking = repo
        .create(Booking {
            id: None,
            user: parse_record_id("user", &user.id)?,
            name: payload.name,
            phone: payload.phone,
            number_of_people: payload.number_of_people,
            date: payload.date,
            time: payload.time,
            note: payload.note,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(ok_with_message(booking, "Table booked successfully"))
}

/// GET /api/booking/my-bookings
pub async fn my_bookings(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Vec<Booking>>>> {
    let repo = BookingRepository::new(state.get_db());
    let bookings = repo.find_by_user(&user.id).await?;
    Ok(ok(bookings))
}

/// GET /api/booking/bookings (admin)
pub async fn all_bookings(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Booking>>>> {
    let repo = BookingRepository::new(state.get_db());
    let bookings = repo.find_all().await?;
    Ok(ok(bookings))
}

/// PUT /api/booking/update-status/{bookingId} (admin)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(booking_id): Path<String>,
    Json(payload): Json<BookingStatusUpdate>,
) -> AppResult<Json<AppResponse<Booking>>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo.set_status(&booking_id, payload.status).await?;
    Ok(ok_with_message(booking, "Booking status updated"))
}
