//! The JSON shapes exchanged with the backend, and their mapping to the types of this crate

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::id::ReservationId;
use crate::reservation::{Reservation, ReservationDetails};

/// A reservation, as listed and returned by the backend
#[derive(Debug, Deserialize)]
pub(crate) struct WireReservation {
    id: ReservationId,
    #[serde(flatten)]
    body: WireReservationBody,
}

/// A reservation without its id, as sent to the backend
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireReservationBody {
    location: String,
    room: String,
    #[serde(serialize_with = "serialize_datetime", deserialize_with = "deserialize_datetime")]
    start_datetime: DateTime<Utc>,
    #[serde(serialize_with = "serialize_datetime", deserialize_with = "deserialize_datetime")]
    end_datetime: DateTime<Utc>,
    responsible_person: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    coffee: bool,
    #[serde(default)]
    coffee_quantity: Option<u32>,
}

impl From<&ReservationDetails> for WireReservationBody {
    fn from(details: &ReservationDetails) -> Self {
        let coffee_quantity = if details.coffee {
            details.coffee_quantity.unwrap_or(0)
        } else {
            0
        };
        Self {
            location: details.location.clone(),
            room: details.room.clone(),
            start_datetime: details.start,
            end_datetime: details.end,
            responsible_person: details.responsible_person.clone(),
            description: Some(details.description.clone().unwrap_or_default()),
            coffee: details.coffee,
            coffee_quantity: Some(coffee_quantity),
        }
    }
}

impl From<WireReservationBody> for ReservationDetails {
    fn from(body: WireReservationBody) -> Self {
        let coffee_quantity = if body.coffee { body.coffee_quantity } else { None };
        Self {
            location: body.location,
            room: body.room,
            start: body.start_datetime,
            end: body.end_datetime,
            responsible_person: body.responsible_person,
            description: body.description.filter(|d| d.trim().is_empty() == false),
            coffee: body.coffee,
            coffee_quantity,
        }
    }
}

impl From<WireReservation> for Reservation {
    fn from(wire: WireReservation) -> Self {
        Reservation::new(wire.id, wire.body.into())
    }
}

fn serialize_datetime<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_datetime(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {:?}", text)))
}

/// Parse an RFC 3339 timestamp. Timestamps without an offset are taken as UTC.
pub(crate) fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_from_backend() {
        let json = r#"{
            "id": 7,
            "location": "Headquarters",
            "room": "Room 101",
            "start_datetime": "2024-11-18T14:00:00",
            "end_datetime": "2024-11-18T16:00:00+01:00",
            "responsible_person": "Ana",
            "description": "",
            "coffee": false,
            "coffee_quantity": 12
        }"#;
        let wire: WireReservation = serde_json::from_str(json).unwrap();
        let reservation = Reservation::from(wire);

        assert_eq!(reservation.id().as_str(), "7");
        assert_eq!(reservation.room(), "Room 101");
        assert_eq!(reservation.start(), Utc.with_ymd_and_hms(2024, 11, 18, 14, 0, 0).unwrap());
        assert_eq!(reservation.end(), Utc.with_ymd_and_hms(2024, 11, 18, 15, 0, 0).unwrap());
        assert_eq!(reservation.description(), None);
        assert_eq!(reservation.coffee_quantity(), None);
    }

    #[test]
    fn missing_optional_fields() {
        let json = r#"{
            "id": "abc",
            "location": "Branch",
            "room": "Room 203",
            "start_datetime": "2024-11-19T09:00:00Z",
            "end_datetime": "2024-11-19T10:30:00Z",
            "responsible_person": "Bia",
            "coffee": true,
            "coffee_quantity": null
        }"#;
        let wire: WireReservation = serde_json::from_str(json).unwrap();
        let reservation = Reservation::from(wire);
        assert_eq!(reservation.description(), None);
        assert!(reservation.coffee());
        assert_eq!(reservation.coffee_quantity(), None);
    }

    #[test]
    fn body_uses_wire_names() {
        let details = ReservationDetails {
            location: "Headquarters".to_string(),
            room: "Auditorium".to_string(),
            start: Utc.with_ymd_and_hms(2024, 11, 20, 15, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 11, 20, 17, 0, 0).unwrap(),
            responsible_person: "Carlos".to_string(),
            description: None,
            coffee: false,
            coffee_quantity: Some(15),
        };
        let value = serde_json::to_value(WireReservationBody::from(&details)).unwrap();
        assert_eq!(value, serde_json::json!({
            "location": "Headquarters",
            "room": "Auditorium",
            "start_datetime": "2024-11-20T15:00:00Z",
            "end_datetime": "2024-11-20T17:00:00Z",
            "responsible_person": "Carlos",
            "description": "",
            "coffee": false,
            "coffee_quantity": 0,
        }));
    }
}
