use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use crate::{
    config::store::{DbPool, StoreError},
    models::lead_models::{Booking, NewBooking},
    schema::bookings,
};

pub struct BookingRepository {
    pool: DbPool
}

impl BookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // The (date, slot) unique index turns a double booking into SlotTaken
    pub fn create_booking(&self, new_booking: NewBooking) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        match diesel::insert_into(bookings::table)
            .values(&new_booking)
            .execute(&mut conn)
        {
            Ok(_) => Ok(()),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info))
                if info.message().contains("appointment") =>
            {
                Err(StoreError::SlotTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    // Slot labels already taken on `date` (YYYY-MM-DD)
    pub fn booked_slots(&self, date: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.pool.get()?;
        let slots = bookings::table
            .filter(bookings::appointment_date.eq(date))
            .select(bookings::appointment_time)
            .load::<String>(&mut conn)?;
        Ok(slots)
    }

    // Newest first
    pub fn get_all_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let mut conn = self.pool.get()?;
        let bookings_list = bookings::table
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .select(Booking::as_select())
            .load::<Booking>(&mut conn)?;
        Ok(bookings_list)
    }
}
