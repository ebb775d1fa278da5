//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;
use once_cell::sync::Lazy;

/// Environment variable read (once) to initialise [`API_BASE_URL`]
pub const API_BASE_URL_ENV: &str = "RESERVATIONS_API_URL";

/// Base URL used when neither [`API_BASE_URL_ENV`] is set nor [`API_BASE_URL`] is overridden
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// The REST endpoint every [`Client`](crate::client::Client) built with `from_settings` talks to.
/// Feel free to override it when initing this library.
pub static API_BASE_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| {
    let url = std::env::var(API_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    Arc::new(Mutex::new(url))
});

/// How long a success banner stays visible
pub const SUCCESS_BANNER_DELAY: Duration = Duration::from_secs(3);

/// A reservation starting within this window is "starting soon"
pub const STARTING_SOON_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Smallest coffee quantity that can be requested
pub const MIN_COFFEE_QUANTITY: u32 = 1;
/// Largest coffee quantity that can be requested
pub const MAX_COFFEE_QUANTITY: u32 = 50;
