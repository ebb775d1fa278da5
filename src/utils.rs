//! Some utility functions

use chrono::{DateTime, TimeZone, Utc};

use crate::reservation::Reservation;
use crate::status::ReservationStatus;

/// A one-line description of a reservation, with times shown in `tz`
pub fn format_reservation<Tz: TimeZone>(reservation: &Reservation, now: DateTime<Utc>, tz: &Tz) -> String {
    let marker = match reservation.status_at(now) {
        ReservationStatus::Scheduled => " ",
        ReservationStatus::StartingSoon => "!",
        ReservationStatus::InProgress => ">",
        ReservationStatus::Completed => "✓",
    };
    let start = reservation.start().with_timezone(tz).naive_local();
    let end = reservation.end().with_timezone(tz).naive_local();
    let coffee = match reservation.coffee_quantity() {
        Some(quantity) => format!("coffee for {}", quantity),
        None if reservation.coffee() => "coffee".to_string(),
        None => "no coffee".to_string(),
    };

    format!("{} {} - {}\t{} {}-{}\t{}\t{}\t[{}] ({})",
        marker,
        reservation.location(), reservation.room(),
        start.format("%a %d %b"), start.format("%H:%M"), end.format("%H:%M"),
        reservation.responsible_person(),
        coffee,
        reservation.status_at(now),
        reservation.id(),
    )
}

/// A debug utility that pretty-prints reservations
pub fn print_reservation_list<'a, I, Tz>(reservations: I, now: DateTime<Utc>, tz: &Tz)
where
    I: IntoIterator<Item = &'a Reservation>,
    Tz: TimeZone,
{
    for reservation in reservations {
        println!("    {}", format_reservation(reservation, now, tz));
        if let Some(description) = reservation.description() {
            println!("        {}", description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::reservation::ReservationDetails;

    #[test]
    fn one_line_description() {
        let reservation = Reservation::new(4i64.into(), ReservationDetails {
            location: "Branch".to_string(),
            room: "Room 203".to_string(),
            start: Utc.with_ymd_and_hms(2024, 11, 19, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 11, 19, 10, 30, 0).unwrap(),
            responsible_person: "Bia".to_string(),
            description: None,
            coffee: true,
            coffee_quantity: Some(6),
        });
        let now = Utc.with_ymd_and_hms(2024, 11, 19, 8, 30, 0).unwrap();
        assert_eq!(
            format_reservation(&reservation, now, &Utc),
            "! Branch - Room 203\tTue 19 Nov 09:00-10:30\tBia\tcoffee for 6\t[Starting Soon] (4)"
        );
    }
}
