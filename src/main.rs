use std::sync::{Arc, Mutex};

use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use chargehive::config::AppConfig;
use chargehive::db;
use chargehive::errors::AppError;
use chargehive::models::NavigationState;
use chargehive::services::api::http::HttpBookingApi;
use chargehive::services::api::BookingApi;
use chargehive::services::session::SqliteSessionStore;
use chargehive::views::{render_page, BookingListView, LoggingTableActions};

const USAGE: &str = "usage: chargehive-bookings [bookings [--just-booked <json>] | login <user-json-or-id> | logout]";

enum Command {
    Bookings { navigation: Option<NavigationState> },
    Login { user_json: String },
    Logout,
}

fn parse_args(args: &[String]) -> Result<Command, AppError> {
    match args.first().map(String::as_str) {
        None | Some("bookings") => {
            let navigation = match args.get(1).map(String::as_str) {
                None => None,
                Some("--just-booked") => {
                    let raw = args
                        .get(2)
                        .ok_or_else(|| AppError::Config(USAGE.to_string()))?;
                    let booking = serde_json::from_str(raw).map_err(|e| {
                        AppError::Config(format!("invalid --just-booked payload: {e}"))
                    })?;
                    Some(NavigationState::just_booked(booking))
                }
                Some(_) => return Err(AppError::Config(USAGE.to_string())),
            };
            Ok(Command::Bookings { navigation })
        }
        Some("login") => {
            let arg = args
                .get(1)
                .ok_or_else(|| AppError::Config(USAGE.to_string()))?;
            // a bare id is shorthand for {"id": "<id>"}
            let user_json = match serde_json::from_str::<serde_json::Value>(arg) {
                Ok(v) if v.is_object() => arg.clone(),
                _ => serde_json::json!({ "id": arg }).to_string(),
            };
            Ok(Command::Login { user_json })
        }
        Some("logout") => Ok(Command::Logout),
        Some(_) => Err(AppError::Config(USAGE.to_string())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let conn = db::init_db(&config.local_storage_path)?;
    let session = SqliteSessionStore::new(Arc::new(Mutex::new(conn)));

    match command {
        Command::Login { user_json } => {
            let id = session.sign_in(&user_json)?;
            println!("Signed in as {id}");
        }
        Command::Logout => {
            if session.sign_out()? {
                println!("Signed out");
            } else {
                println!("Not signed in");
            }
        }
        Command::Bookings { navigation } => {
            tracing::info!(api = %config.booking_api_url, "loading bookings");
            let api: Arc<dyn BookingApi> = Arc::new(HttpBookingApi::new(
                config.booking_api_url.clone(),
                config.booking_api_token.clone(),
                config.request_timeout_secs,
            )?);

            let view = BookingListView::mount(api, &session, navigation, config.display_offset());
            let actions = LoggingTableActions;

            let mut states = view.subscribe();
            while let Some(state) = states.next().await {
                println!("{}", render_page(&state, &actions));
                if state.is_settled() {
                    break;
                }
            }
            view.unmount();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_command_is_bookings() {
        assert!(matches!(
            parse_args(&[]).unwrap(),
            Command::Bookings { navigation: None }
        ));
    }

    #[test]
    fn test_just_booked_payload() {
        let cmd = parse_args(&args(&[
            "bookings",
            "--just-booked",
            r#"{"id":2,"station":"Elm","slotTime":"x","status":"Upcoming"}"#,
        ]))
        .unwrap();
        let Command::Bookings { navigation: Some(nav) } = cmd else {
            panic!("expected navigation state");
        };
        assert!(nav.just_booked);
        assert_eq!(nav.optimistic().map(|b| b.station.as_str()), Some("Elm"));
    }

    #[test]
    fn test_login_bare_id() {
        let Command::Login { user_json } = parse_args(&args(&["login", "u1"])).unwrap() else {
            panic!("expected login");
        };
        assert_eq!(user_json, r#"{"id":"u1"}"#);
    }

    #[test]
    fn test_login_json_object_kept() {
        let raw = r#"{"id":"u1","name":"Ada"}"#;
        let Command::Login { user_json } = parse_args(&args(&["login", raw])).unwrap() else {
            panic!("expected login");
        };
        assert_eq!(user_json, raw);
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            parse_args(&args(&["book"])),
            Err(AppError::Config(_))
        ));
    }
}
