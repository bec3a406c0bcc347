//! Booking Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Booking, BookingStatus};
use serde::Serialize;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Non-cancelled booking occupying a date+time slot, if any
    pub async fn find_active_slot(&self, date: &str, time: &str) -> RepoResult<Option<Booking>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE date = $date AND time = $time AND status != 'Cancelled' LIMIT 1",
            )
            .bind(("date", date.to_string()))
            .bind(("time", time.to_string()))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings.into_iter().next())
    }

    /// Create a booking; the slot conflict check lives in the handler
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Bookings made by a user, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Booking>> {
        let user_owned = user_id.to_string();
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_owned))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// All bookings, newest first (admin)
    pub async fn find_all(&self) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Atomic status overwrite
    pub async fn set_status(&self, id: &str, status: BookingStatus) -> RepoResult<Booking> {
        #[derive(Serialize)]
        struct Patch {
            status: BookingStatus,
            updated_at: i64,
        }

        let record_id = parse_record_id(TABLE, id)?;
        let updated: Option<Booking> = self
            .base
            .db()
            .update(record_id)
            .merge(Patch { status, updated_at: now_millis() })
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Booking {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use surrealdb::RecordId;

    fn booking(date: &str, time: &str) -> Booking {
        let now = now_millis();
        Booking {
            id: None,
            user: RecordId::from_table_key("user", "a"),
            name: "Ana".into(),
            phone: "600123123".into(),
            number_of_people: 4,
            date: date.into(),
            time: time.into(),
            note: String::new(),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn cancelled_bookings_do_not_block_the_slot() {
        let db = DbService::memory().await.unwrap();
        let repo = BookingRepository::new(db.db.clone());

        let saved = repo.create(booking("2026-09-01", "20:00")).await.unwrap();
        assert!(repo
            .find_active_slot("2026-09-01", "20:00")
            .await
            .unwrap()
            .is_some());
        // A different slot is free
        assert!(repo
            .find_active_slot("2026-09-01", "21:00")
            .await
            .unwrap()
            .is_none());

        repo.set_status(&saved.id.unwrap().to_string(), BookingStatus::Cancelled)
            .await
            .unwrap();
        assert!(repo
            .find_active_slot("2026-09-01", "20:00")
            .await
            .unwrap()
            .is_none());
    }
}
