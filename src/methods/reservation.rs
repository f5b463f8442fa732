use crate::model::{NewReservation, Reservation, ReservationStatus, Vehicle, VehicleStatus};
use crate::schema::{reservations, vehicles};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;

// The desk system this replaces updated the vehicle row and inserted the
// reservation row as two separate writes against two database files. Every
// transition here runs inside a single diesel transaction instead: both rows
// change, or neither does.

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("vehicle not found")]
    VehicleNotFound,
    #[error("vehicle is {}, not available for booking", .0.as_str())]
    VehicleUnavailable(VehicleStatus),
    #[error("reservation not found")]
    ReservationNotFound,
    #[error("reservation is {}; the requested transition is not allowed", .0.as_str())]
    IllegalTransition(ReservationStatus),
    #[error("end date precedes start date")]
    InvalidDates,
    #[error("customer name must not be empty")]
    EmptyCustomerName,
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub customer_name: String,
    pub vehicle_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn rental_price(rate_per_day: f64, start_date: NaiveDate, end_date: NaiveDate) -> f64 {
    // Same-day rentals are charged one full day.
    let days = (end_date - start_date).num_days().max(1);
    days as f64 * rate_per_day
}

fn confirmation_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

pub fn book_vehicle(
    conn: &mut SqliteConnection,
    request: &BookingRequest,
) -> Result<(Reservation, Vehicle), BookingError> {
    book_with_confirmation(conn, request, confirmation_code())
}

fn book_with_confirmation(
    conn: &mut SqliteConnection,
    request: &BookingRequest,
    confirmation: String,
) -> Result<(Reservation, Vehicle), BookingError> {
    if request.customer_name.trim().is_empty() {
        return Err(BookingError::EmptyCustomerName);
    }
    if request.end_date < request.start_date {
        return Err(BookingError::InvalidDates);
    }
    conn.transaction(|conn| {
        let vehicle = vehicles::table
            .find(request.vehicle_id)
            .first::<Vehicle>(conn)
            .optional()?
            .ok_or(BookingError::VehicleNotFound)?;
        if vehicle.status != VehicleStatus::Available {
            return Err(BookingError::VehicleUnavailable(vehicle.status));
        }
        let today = Utc::now().date_naive();
        let next_status = if request.start_date > today {
            VehicleStatus::Upcoming
        } else {
            VehicleStatus::Booked
        };
        let updated_vehicle = diesel::update(vehicles::table.find(vehicle.id))
            .set(vehicles::status.eq(next_status))
            .get_result::<Vehicle>(conn)?;
        let reservation = diesel::insert_into(reservations::table)
            .values(&NewReservation {
                confirmation,
                customer_name: request.customer_name.trim().to_string(),
                vehicle_id: vehicle.id,
                start_date: request.start_date,
                end_date: request.end_date,
                rental_price: rental_price(vehicle.rate_per_day, request.start_date, request.end_date),
                status: ReservationStatus::Booked,
            })
            .get_result::<Reservation>(conn)?;
        Ok((reservation, updated_vehicle))
    })
}

/// Customer collects the vehicle: reservation and vehicle both become Ongoing.
pub fn pick_up(
    conn: &mut SqliteConnection,
    reservation_id: i32,
) -> Result<(Reservation, Vehicle), BookingError> {
    transition(
        conn,
        reservation_id,
        ReservationStatus::Booked,
        ReservationStatus::Ongoing,
        VehicleStatus::Ongoing,
    )
}

/// Vehicle returned: reservation Completed, vehicle back to Available.
pub fn complete(
    conn: &mut SqliteConnection,
    reservation_id: i32,
) -> Result<(Reservation, Vehicle), BookingError> {
    transition(
        conn,
        reservation_id,
        ReservationStatus::Ongoing,
        ReservationStatus::Completed,
        VehicleStatus::Available,
    )
}

/// Cancellation before pick-up: the compensating action that frees the vehicle.
pub fn cancel(
    conn: &mut SqliteConnection,
    reservation_id: i32,
) -> Result<(Reservation, Vehicle), BookingError> {
    transition(
        conn,
        reservation_id,
        ReservationStatus::Booked,
        ReservationStatus::Cancelled,
        VehicleStatus::Available,
    )
}

fn transition(
    conn: &mut SqliteConnection,
    reservation_id: i32,
    expected: ReservationStatus,
    next: ReservationStatus,
    vehicle_next: VehicleStatus,
) -> Result<(Reservation, Vehicle), BookingError> {
    conn.transaction(|conn| {
        let reservation = reservations::table
            .find(reservation_id)
            .first::<Reservation>(conn)
            .optional()?
            .ok_or(BookingError::ReservationNotFound)?;
        if reservation.status != expected {
            return Err(BookingError::IllegalTransition(reservation.status));
        }
        let updated_reservation = diesel::update(reservations::table.find(reservation.id))
            .set(reservations::status.eq(next))
            .get_result::<Reservation>(conn)?;
        let updated_vehicle = diesel::update(vehicles::table.find(reservation.vehicle_id))
            .set(vehicles::status.eq(vehicle_next))
            .get_result::<Vehicle>(conn)?;
        Ok((updated_reservation, updated_vehicle))
    })
}

/// Nightly maintenance: vehicles reserved for a future date were left
/// `Upcoming`; once the start date arrives they are promoted to `Booked`.
pub fn promote_due_upcoming(conn: &mut SqliteConnection) -> QueryResult<usize> {
    let today = Utc::now().date_naive();
    let due_vehicle_ids: Vec<i32> = reservations::table
        .filter(reservations::status.eq(ReservationStatus::Booked))
        .filter(reservations::start_date.le(today))
        .select(reservations::vehicle_id)
        .load(conn)?;
    diesel::update(
        vehicles::table
            .filter(vehicles::id.eq_any(due_vehicle_ids))
            .filter(vehicles::status.eq(VehicleStatus::Upcoming)),
    )
    .set(vehicles::status.eq(VehicleStatus::Booked))
    .execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;
    use chrono::Duration;

    fn booking(vehicle_id: i32, start_offset_days: i64, length_days: i64) -> BookingRequest {
        let start_date = Utc::now().date_naive() + Duration::days(start_offset_days);
        BookingRequest {
            customer_name: String::from("John Doe"),
            vehicle_id,
            start_date,
            end_date: start_date + Duration::days(length_days),
        }
    }

    fn reservation_count(conn: &mut SqliteConnection) -> i64 {
        reservations::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn booking_updates_vehicle_and_inserts_reservation_together() {
        let mut conn = bootstrap::test_connection();
        let (reservation, vehicle) = book_vehicle(&mut conn, &booking(1, 0, 3)).unwrap();

        assert_eq!(vehicle.status, VehicleStatus::Booked);
        assert_eq!(reservation.status, ReservationStatus::Booked);
        assert_eq!(reservation.vehicle_id, 1);
        assert_eq!(reservation.confirmation.len(), 8);
        // Corolla at 50.0/day for three days
        assert_eq!(reservation.rental_price, 150.0);

        let stored: Vehicle = vehicles::table.find(1).first(&mut conn).unwrap();
        assert_eq!(stored.status, VehicleStatus::Booked);
    }

    #[test]
    fn future_booking_marks_vehicle_upcoming() {
        let mut conn = bootstrap::test_connection();
        let (_, vehicle) = book_vehicle(&mut conn, &booking(2, 5, 2)).unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Upcoming);
    }

    #[test]
    fn booked_vehicle_cannot_be_double_booked() {
        let mut conn = bootstrap::test_connection();
        book_vehicle(&mut conn, &booking(3, 0, 1)).unwrap();
        let before = reservation_count(&mut conn);

        let second = book_vehicle(&mut conn, &booking(3, 0, 1));
        assert!(matches!(
            second,
            Err(BookingError::VehicleUnavailable(VehicleStatus::Booked))
        ));
        // the failed attempt must not leave a reservation row behind
        assert_eq!(reservation_count(&mut conn), before);
    }

    #[test]
    fn unknown_vehicle_and_bad_input_are_rejected() {
        let mut conn = bootstrap::test_connection();
        assert!(matches!(
            book_vehicle(&mut conn, &booking(999, 0, 1)),
            Err(BookingError::VehicleNotFound)
        ));

        let mut request = booking(1, 0, 1);
        request.end_date = request.start_date - Duration::days(1);
        assert!(matches!(
            book_vehicle(&mut conn, &request),
            Err(BookingError::InvalidDates)
        ));

        let mut request = booking(1, 0, 1);
        request.customer_name = String::from("   ");
        assert!(matches!(
            book_vehicle(&mut conn, &request),
            Err(BookingError::EmptyCustomerName)
        ));
        assert_eq!(reservation_count(&mut conn), 0);
    }

    #[test]
    fn lifecycle_booked_ongoing_completed() {
        let mut conn = bootstrap::test_connection();
        let (reservation, _) = book_vehicle(&mut conn, &booking(4, 0, 2)).unwrap();

        let (reservation, vehicle) = pick_up(&mut conn, reservation.id).unwrap();
        assert_eq!(reservation.status, ReservationStatus::Ongoing);
        assert_eq!(vehicle.status, VehicleStatus::Ongoing);

        let (reservation, vehicle) = complete(&mut conn, reservation.id).unwrap();
        assert_eq!(reservation.status, ReservationStatus::Completed);
        assert_eq!(vehicle.status, VehicleStatus::Available);

        // the vehicle is free again for the next customer
        book_vehicle(&mut conn, &booking(4, 0, 1)).unwrap();
    }

    #[test]
    fn cancel_frees_the_vehicle() {
        let mut conn = bootstrap::test_connection();
        let (reservation, _) = book_vehicle(&mut conn, &booking(5, 0, 2)).unwrap();

        let (reservation, vehicle) = cancel(&mut conn, reservation.id).unwrap();
        assert_eq!(reservation.status, ReservationStatus::Cancelled);
        assert_eq!(vehicle.status, VehicleStatus::Available);
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let mut conn = bootstrap::test_connection();
        let (reservation, _) = book_vehicle(&mut conn, &booking(6, 0, 2)).unwrap();

        // cannot complete before pick-up
        assert!(matches!(
            complete(&mut conn, reservation.id),
            Err(BookingError::IllegalTransition(ReservationStatus::Booked))
        ));

        let (reservation, _) = pick_up(&mut conn, reservation.id).unwrap();
        // cannot cancel once the car is out
        assert!(matches!(
            cancel(&mut conn, reservation.id),
            Err(BookingError::IllegalTransition(ReservationStatus::Ongoing))
        ));

        assert!(matches!(
            pick_up(&mut conn, 999),
            Err(BookingError::ReservationNotFound)
        ));
    }

    #[test]
    fn due_upcoming_vehicles_are_promoted() {
        let mut conn = bootstrap::test_connection();
        let (_, vehicle) = book_vehicle(&mut conn, &booking(7, 3, 2)).unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Upcoming);

        // start date still in the future, nothing to promote
        assert_eq!(promote_due_upcoming(&mut conn).unwrap(), 0);

        // backdate the reservation to simulate the start date arriving
        diesel::update(reservations::table.filter(reservations::vehicle_id.eq(7)))
            .set(reservations::start_date.eq(Utc::now().date_naive()))
            .execute(&mut conn)
            .unwrap();
        assert_eq!(promote_due_upcoming(&mut conn).unwrap(), 1);

        let stored: Vehicle = vehicles::table.find(7).first(&mut conn).unwrap();
        assert_eq!(stored.status, VehicleStatus::Booked);
    }

    #[test]
    fn failed_reservation_insert_rolls_back_the_vehicle_update() {
        let mut conn = bootstrap::test_connection();
        // occupy a confirmation code so the insert hits the UNIQUE constraint
        let today = Utc::now().date_naive();
        diesel::insert_into(reservations::table)
            .values(&NewReservation {
                confirmation: String::from("TAKEN123"),
                customer_name: String::from("Jane Smith"),
                vehicle_id: 8,
                start_date: today,
                end_date: today,
                rental_price: 110.0,
                status: ReservationStatus::Booked,
            })
            .execute(&mut conn)
            .unwrap();
        let before = reservation_count(&mut conn);

        // fails after the vehicle-status write inside the transaction
        let result = book_with_confirmation(&mut conn, &booking(9, 0, 1), String::from("TAKEN123"));
        assert!(matches!(result, Err(BookingError::Database(_))));

        let stored: Vehicle = vehicles::table.find(9).first(&mut conn).unwrap();
        assert_eq!(stored.status, VehicleStatus::Available);
        assert_eq!(reservation_count(&mut conn), before);
    }

    #[test]
    fn same_day_rental_charges_one_day() {
        let today = Utc::now().date_naive();
        assert_eq!(rental_price(45.0, today, today), 45.0);
        assert_eq!(rental_price(45.0, today, today + Duration::days(4)), 180.0);
    }
}
