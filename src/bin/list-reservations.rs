use room_reservations::client::Client;
use room_reservations::config::API_BASE_URL_ENV;
use room_reservations::state::LoadState;
use room_reservations::Coordinator;

/// Usage: `list-reservations [SEARCH_TERM [LOCATION]]`
///
/// The backend URL is read from the environment variable named by `API_BASE_URL_ENV`.
#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let search_term = args.next().unwrap_or_default();
    let location = args.next();

    let client = match Client::from_settings() {
        Ok(client) => client,
        Err(err) => {
            log::error!("Invalid backend URL ({}): {}", API_BASE_URL_ENV, err);
            std::process::exit(2);
        },
    };
    println!("Loading reservations from {}...", client.base_url());

    let mut coordinator = Coordinator::new(client);
    if let Err(err) = coordinator.load().await {
        log::error!("Unable to load reservations: {}", err);
        std::process::exit(1);
    }
    debug_assert_eq!(coordinator.state().load, LoadState::Loaded);

    coordinator.set_search_term(search_term);
    coordinator.set_location_filter(location);

    let visible = coordinator.visible_reservations();
    let state = coordinator.state();
    if visible.is_empty() {
        if state.filter.is_active() {
            println!("No reservation matches these filters.");
        } else {
            println!("No reservation yet.");
        }
        return;
    }

    println!("---- {} of {} reservations -----", visible.len(), state.reservations.len());
    room_reservations::utils::print_reservation_list(visible, coordinator.now(), &state.timezone);
}
