//! The reservation form, and its validation
//!
//! A [`ReservationForm`] holds the raw text of every input, exactly as typed.
//! [`ReservationForm::validate`] is a pure function of this text, so it can be run again after every change.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::catalog::Catalog;
use crate::config::{MAX_COFFEE_QUANTITY, MIN_COFFEE_QUANTITY};
use crate::error::{Error, FieldErrors};
use crate::reservation::{Reservation, ReservationDetails};

/// The inputs of the form that can carry a validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Location,
    Room,
    StartDate,
    StartTime,
    EndTime,
    ResponsiblePerson,
    CoffeeQuantity,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Location => "location",
            Field::Room => "room",
            Field::StartDate => "start_date",
            Field::StartTime => "start_time",
            Field::EndTime => "end_time",
            Field::ResponsiblePerson => "responsible_person",
            Field::CoffeeQuantity => "coffee_quantity",
        };
        write!(f, "{}", name)
    }
}

/// A single change made to a form input
#[derive(Clone, Debug, PartialEq)]
pub enum FormEdit {
    /// Picking another location also clears the room
    Location(String),
    Room(String),
    StartDate(String),
    StartTime(String),
    EndTime(String),
    ResponsiblePerson(String),
    Description(String),
    Coffee(bool),
    CoffeeQuantity(String),
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// A draft reservation, as typed in the form
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReservationForm {
    pub location: String,
    pub room: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`, on the same day as `start_time`
    pub end_time: String,
    pub responsible_person: String,
    pub description: String,
    pub coffee: bool,
    pub coffee_quantity: String,
}

impl ReservationForm {
    /// An empty form, used to create a new reservation
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled with an existing reservation, with dates and times shown in `tz`.
    ///
    /// Each instant gets the offset `tz` has at that date, so daylight saving time is accounted for.
    pub fn from_reservation<Tz: TimeZone>(reservation: &Reservation, tz: &Tz) -> Self {
        let start = reservation.start().with_timezone(tz).naive_local();
        let end = reservation.end().with_timezone(tz).naive_local();
        if start.date() != end.date() {
            log::warn!("Reservation {} spans several days, only its start date can be edited", reservation.id());
        }

        Self {
            location: reservation.location().to_string(),
            room: reservation.room().to_string(),
            start_date: start.format(DATE_FORMAT).to_string(),
            start_time: start.format(TIME_FORMAT).to_string(),
            end_time: end.format(TIME_FORMAT).to_string(),
            responsible_person: reservation.responsible_person().to_string(),
            description: reservation.description().unwrap_or_default().to_string(),
            coffee: reservation.coffee(),
            coffee_quantity: reservation.coffee_quantity().map(|q| q.to_string()).unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Location(location) => {
                if location != self.location {
                    self.room.clear();
                }
                self.location = location;
            },
            FormEdit::Room(room) => self.room = room,
            FormEdit::StartDate(date) => self.start_date = date,
            FormEdit::StartTime(time) => self.start_time = time,
            FormEdit::EndTime(time) => self.end_time = time,
            FormEdit::ResponsiblePerson(person) => self.responsible_person = person,
            FormEdit::Description(description) => self.description = description,
            FormEdit::Coffee(coffee) => self.coffee = coffee,
            FormEdit::CoffeeQuantity(quantity) => self.coffee_quantity = quantity,
        }
    }

    /// Check this form. An empty result means it can be submitted.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        require(&mut errors, Field::Location, &self.location, "Location is required");
        require(&mut errors, Field::Room, &self.room, "Room is required");
        require(&mut errors, Field::ResponsiblePerson, &self.responsible_person, "Responsible person is required");

        parse_required(&mut errors, Field::StartDate, &self.start_date, "Start date is required", "Invalid date", parse_date);
        let start = parse_required(&mut errors, Field::StartTime, &self.start_time, "Start time is required", "Invalid time", parse_time);
        let end = parse_required(&mut errors, Field::EndTime, &self.end_time, "End time is required", "Invalid time", parse_time);

        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.insert(Field::EndTime, "End time must be later than start time");
            }
        }

        if self.coffee {
            match self.coffee_quantity.trim().parse::<i64>() {
                Err(_) => errors.insert(Field::CoffeeQuantity, "Coffee quantity must be a whole number"),
                Ok(q) if q < MIN_COFFEE_QUANTITY as i64 => {
                    errors.insert(Field::CoffeeQuantity, format!("Coffee quantity must be at least {}", MIN_COFFEE_QUANTITY))
                },
                Ok(q) if q > MAX_COFFEE_QUANTITY as i64 => {
                    errors.insert(Field::CoffeeQuantity, format!("Coffee quantity must be at most {}", MAX_COFFEE_QUANTITY))
                },
                Ok(_) => (),
            }
        }

        errors
    }

    /// Same as [`Self::validate`], also checking the room is one of the rooms of the selected location
    pub fn validate_in(&self, catalog: &Catalog) -> FieldErrors {
        let mut errors = self.validate();
        let location = self.location.trim();
        let room = self.room.trim();
        if !location.is_empty() && !room.is_empty() && !catalog.room_belongs_to(location, room) {
            errors.insert(Field::Room, format!("{} is not a room of {}", room, location));
        }
        errors
    }

    /// Turn a valid form into the details of a reservation. Dates and times are read in `tz`.
    pub fn to_details<Tz: TimeZone>(&self, catalog: &Catalog, tz: &Tz) -> Result<ReservationDetails, Error> {
        let errors = self.validate_in(catalog);
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        // These have just been validated
        let date = parse_date(&self.start_date).ok_or_else(|| Error::request("invalid start date"))?;
        let start_time = parse_time(&self.start_time).ok_or_else(|| Error::request("invalid start time"))?;
        let end_time = parse_time(&self.end_time).ok_or_else(|| Error::request("invalid end time"))?;

        let coffee_quantity = if self.coffee {
            self.coffee_quantity.trim().parse().ok()
        } else {
            None
        };
        let description = Some(self.description.trim().to_string()).filter(|d| !d.is_empty());

        Ok(ReservationDetails {
            location: self.location.trim().to_string(),
            room: self.room.trim().to_string(),
            start: to_utc(tz, date, start_time)?,
            end: to_utc(tz, date, end_time)?,
            responsible_person: self.responsible_person.trim().to_string(),
            description,
            coffee: self.coffee,
            coffee_quantity,
        })
    }
}

fn require(errors: &mut FieldErrors, field: Field, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

fn parse_required<T>(errors: &mut FieldErrors, field: Field, value: &str, missing: &str, invalid: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    if value.trim().is_empty() {
        errors.insert(field, missing);
        return None;
    }
    let parsed = parse(value);
    if parsed.is_none() {
        errors.insert(field, invalid);
    }
    parsed
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// A local time repeated when clocks go back resolves to its first occurrence.
/// One skipped when clocks go forward is an error.
fn to_utc<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, Error> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::request(format!("{} {} does not exist in this time zone", date, time)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, FixedOffset, LocalResult, NaiveDateTime, Weekday};
    use crate::catalog::tests::sample_catalog;

    /// Central European time: UTC+1, and UTC+2 from the last Sunday of March to the last Sunday of October (01:00 UTC)
    #[derive(Clone, Copy, Debug)]
    struct CentralEurope;

    fn last_sunday(year: i32, month: u32) -> NaiveDate {
        let mut day = NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap().pred_opt().unwrap();
        while day.weekday() != Weekday::Sun {
            day = day.pred_opt().unwrap();
        }
        day
    }

    fn winter_offset() -> FixedOffset { FixedOffset::east_opt(3600).unwrap() }
    fn summer_offset() -> FixedOffset { FixedOffset::east_opt(2 * 3600).unwrap() }

    impl TimeZone for CentralEurope {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            CentralEurope
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(12, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let matching: Vec<FixedOffset> = vec![summer_offset(), winter_offset()].into_iter()
                .filter(|offset| {
                    let utc = *local - Duration::seconds(offset.local_minus_utc() as i64);
                    self.offset_from_utc_datetime(&utc) == *offset
                })
                .collect();
            match matching.as_slice() {
                [offset] => LocalResult::Single(*offset),
                [first, second] => LocalResult::Ambiguous(*first, *second),
                _ => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            let begins = last_sunday(utc.year(), 3).and_hms_opt(1, 0, 0).unwrap();
            let ends = last_sunday(utc.year(), 10).and_hms_opt(1, 0, 0).unwrap();
            if begins <= *utc && *utc < ends {
                summer_offset()
            } else {
                winter_offset()
            }
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn valid_form() -> ReservationForm {
        ReservationForm {
            location: "Headquarters".to_string(),
            room: "Room 101".to_string(),
            start_date: "2024-11-18".to_string(),
            start_time: "14:00".to_string(),
            end_time: "16:00".to_string(),
            responsible_person: "Ana".to_string(),
            description: "Quarterly planning".to_string(),
            coffee: true,
            coffee_quantity: "8".to_string(),
        }
    }

    #[test]
    fn valid_form_has_no_error() {
        assert!(valid_form().validate().is_empty());
        assert!(valid_form().validate_in(&sample_catalog()).is_empty());
    }

    #[test]
    fn required_fields() {
        let form = ReservationForm::new();
        let errors = form.validate();
        for field in &[Field::Location, Field::Room, Field::StartDate, Field::StartTime, Field::EndTime, Field::ResponsiblePerson] {
            assert!(errors.contains(*field), "{} should be required", field);
        }
        // no coffee requested
        assert!(errors.contains(Field::CoffeeQuantity) == false);

        let mut form = valid_form();
        form.responsible_person = "   ".to_string();
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::ResponsiblePerson));
    }

    #[test]
    fn end_must_follow_start() {
        let mut form = valid_form();
        form.end_time = "14:00".to_string();
        assert_eq!(form.validate().get(Field::EndTime), Some("End time must be later than start time"));

        form.end_time = "13:30".to_string();
        let errors = form.validate();
        assert!(errors.contains(Field::EndTime));
        assert!(errors.contains(Field::StartTime) == false);

        form.end_time = "14:01".to_string();
        assert!(form.validate().is_empty());
    }

    #[test]
    fn unparsable_values() {
        let mut form = valid_form();
        form.start_date = "18/11/2024".to_string();
        form.start_time = "2pm".to_string();
        let errors = form.validate();
        assert_eq!(errors.get(Field::StartDate), Some("Invalid date"));
        assert_eq!(errors.get(Field::StartTime), Some("Invalid time"));
    }

    #[test]
    fn coffee_quantity_bounds() {
        let mut form = valid_form();
        for bad in &["0", "-3", "", "two", "51"] {
            form.coffee_quantity = bad.to_string();
            assert!(form.validate().contains(Field::CoffeeQuantity), "{:?} should be rejected", bad);
        }
        for good in &["1", "50", " 12 "] {
            form.coffee_quantity = good.to_string();
            assert!(form.validate().is_empty(), "{:?} should be accepted", good);
        }

        form.coffee = false;
        for whatever in &["0", "-3", "", "two", "51"] {
            form.coffee_quantity = whatever.to_string();
            assert!(form.validate().is_empty());
        }
    }

    #[test]
    fn validation_is_idempotent() {
        let mut form = valid_form();
        form.room.clear();
        form.end_time = "09:00".to_string();
        assert_eq!(form.validate(), form.validate());
    }

    #[test]
    fn room_must_belong_to_location() {
        let mut form = valid_form();
        form.room = "Room 203".to_string();
        assert!(form.validate().is_empty());
        assert!(form.validate_in(&sample_catalog()).contains(Field::Room));
    }

    #[test]
    fn changing_location_clears_room() {
        let mut form = valid_form();
        form.apply(FormEdit::Location("Headquarters".to_string()));
        assert_eq!(form.room, "Room 101");
        form.apply(FormEdit::Location("Branch".to_string()));
        assert_eq!(form.room, "");
    }

    #[test]
    fn details_from_form() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let details = valid_form().to_details(&sample_catalog(), &tz).unwrap();
        assert_eq!(details.start, Utc.with_ymd_and_hms(2024, 11, 18, 17, 0, 0).unwrap());
        assert_eq!(details.end, Utc.with_ymd_and_hms(2024, 11, 18, 19, 0, 0).unwrap());
        assert_eq!(details.coffee_quantity, Some(8));
        assert_eq!(details.description.as_deref(), Some("Quarterly planning"));

        let mut form = valid_form();
        form.coffee = false;
        form.description = "  ".to_string();
        let details = form.to_details(&sample_catalog(), &utc()).unwrap();
        assert_eq!(details.coffee_quantity, None);
        assert_eq!(details.description, None);

        form.room.clear();
        match form.to_details(&sample_catalog(), &utc()) {
            Err(Error::Validation(fields)) => assert!(fields.contains(Field::Room)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn offsets_follow_daylight_saving_time() {
        let mut form = valid_form();
        form.start_date = "2025-07-15".to_string();
        let details = form.to_details(&sample_catalog(), &CentralEurope).unwrap();
        assert_eq!(details.start, Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap());
        assert_eq!(details.end, Utc.with_ymd_and_hms(2025, 7, 15, 14, 0, 0).unwrap());

        form.start_date = "2025-01-15".to_string();
        let details = form.to_details(&sample_catalog(), &CentralEurope).unwrap();
        assert_eq!(details.start, Utc.with_ymd_and_hms(2025, 1, 15, 13, 0, 0).unwrap());

        // Clocks go forward at 02:00 on 2025-03-30
        form.start_date = "2025-03-30".to_string();
        form.start_time = "02:30".to_string();
        form.end_time = "04:00".to_string();
        assert!(form.to_details(&sample_catalog(), &CentralEurope).is_err());

        // Clocks go back at 03:00 on 2025-10-26, 02:30 happens twice
        form.start_date = "2025-10-26".to_string();
        let details = form.to_details(&sample_catalog(), &CentralEurope).unwrap();
        assert_eq!(details.start, Utc.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap());
        assert_eq!(details.end, Utc.with_ymd_and_hms(2025, 10, 26, 3, 0, 0).unwrap());
    }

    #[test]
    fn prefill_uses_the_offset_of_each_date() {
        let mut details = valid_form().to_details(&sample_catalog(), &utc()).unwrap();
        details.start = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap();
        details.end = Utc.with_ymd_and_hms(2025, 7, 15, 14, 0, 0).unwrap();
        let summer = ReservationForm::from_reservation(&Reservation::new(5i64.into(), details.clone()), &CentralEurope);
        assert_eq!((summer.start_date.as_str(), summer.start_time.as_str(), summer.end_time.as_str()), ("2025-07-15", "14:00", "16:00"));

        details.start = Utc.with_ymd_and_hms(2025, 12, 15, 12, 0, 0).unwrap();
        details.end = Utc.with_ymd_and_hms(2025, 12, 15, 14, 0, 0).unwrap();
        let winter = ReservationForm::from_reservation(&Reservation::new(6i64.into(), details), &CentralEurope);
        assert_eq!((winter.start_date.as_str(), winter.start_time.as_str(), winter.end_time.as_str()), ("2025-12-15", "13:00", "15:00"));
    }

    #[test]
    fn prefill_from_reservation() {
        let tz = utc();
        let details = valid_form().to_details(&sample_catalog(), &tz).unwrap();
        let reservation = Reservation::new(3i64.into(), details);
        let form = ReservationForm::from_reservation(&reservation, &tz);
        assert_eq!(form, valid_form());
    }
}
