//! This module provides a client to connect to the reservation REST backend

use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use crate::catalog::{Location, Room};
use crate::config::API_BASE_URL;
use crate::error::{Error, Result};
use crate::id::ReservationId;
use crate::reservation::{Reservation, ReservationDetails};
use crate::traits::ReservationBackend;
use crate::wire::{WireReservation, WireReservationBody};

static LOCATIONS_PATH: &str = "locations";
static ROOMS_PATH: &str = "rooms";
static RESERVATIONS_PATH: &str = "reservas";


/// A [`ReservationBackend`] that fetches its data from a REST server
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self> {
        let mut base_url = Url::parse(url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::request(format!("{} cannot be used as a base URL", base_url)));
        }
        // So that joined paths are appended instead of replacing the last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self{
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the URL currently stored in [`API_BASE_URL`]
    pub fn from_settings() -> Result<Self> {
        let url = API_BASE_URL.lock()
            .map_err(|_| Error::request("API base URL setting is poisoned"))?
            .clone();
        Self::new(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn reservation_url(&self, id: &ReservationId) -> Result<Url> {
        let mut url = self.endpoint(RESERVATIONS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| Error::request(format!("{} cannot be used as a base URL", self.base_url)))?
            .push(id.as_str());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        log::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-2xx answer into an [`Error`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            log::debug!("Unable to read the body of a failed request to {}: {}", url, err);
            String::new()
        },
    };
    let err = Error::from_response(status.as_u16(), status.canonical_reason(), &body);
    log::warn!("Request to {} failed with HTTP status {}: {}", url, status.as_u16(), err.message());
    Err(err)
}

#[async_trait]
impl ReservationBackend for Client {
    async fn get_locations(&self) -> Result<Vec<Location>> {
        self.get_json(LOCATIONS_PATH).await
    }

    async fn get_rooms(&self) -> Result<Vec<Room>> {
        self.get_json(ROOMS_PATH).await
    }

    async fn get_reservations(&self) -> Result<Vec<Reservation>> {
        let wire: Vec<WireReservation> = self.get_json(RESERVATIONS_PATH).await?;
        log::debug!("Fetched {} reservations", wire.len());
        Ok(wire.into_iter().map(Reservation::from).collect())
    }

    async fn create_reservation(&self, details: &ReservationDetails) -> Result<Reservation> {
        let url = self.endpoint(RESERVATIONS_PATH)?;
        log::debug!("POST {}", url);

        let response = self.http
            .post(url)
            .json(&WireReservationBody::from(details))
            .send()
            .await?;
        let response = check_status(response).await?;

        let created: WireReservation = response.json().await?;
        let created = Reservation::from(created);
        log::info!("Created reservation {} ({} at {})", created.id(), created.room(), created.location());
        Ok(created)
    }

    async fn update_reservation(&self, id: &ReservationId, details: &ReservationDetails) -> Result<Reservation> {
        let url = self.reservation_url(id)?;
        log::debug!("PUT {}", url);

        let response = self.http
            .put(url)
            .json(&WireReservationBody::from(details))
            .send()
            .await?;
        let response = check_status(response).await?;

        let updated: WireReservation = response.json().await?;
        log::info!("Updated reservation {}", id);
        Ok(Reservation::from(updated))
    }

    async fn delete_reservation(&self, id: &ReservationId) -> Result<()> {
        let url = self.reservation_url(id)?;
        log::debug!("DELETE {}", url);

        let response = self.http.delete(url).send().await?;
        check_status(response).await?;

        log::info!("Deleted reservation {}", id);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_appended_to_the_base_url() {
        let client = Client::new("http://localhost:8000/api").unwrap();
        assert_eq!(client.endpoint(RESERVATIONS_PATH).unwrap().as_str(), "http://localhost:8000/api/reservas");

        let client = Client::new("http://localhost:8000/api/").unwrap();
        assert_eq!(client.endpoint(ROOMS_PATH).unwrap().as_str(), "http://localhost:8000/api/rooms");
        assert_eq!(client.reservation_url(&ReservationId::from(12i64)).unwrap().as_str(), "http://localhost:8000/api/reservas/12");
    }

    #[test]
    fn invalid_base_urls() {
        assert!(Client::new("not a url").is_err());
        assert!(Client::new("mailto:someone@example.com").is_err());
    }
}
