use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::FixedOffset;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use super::table::{BookingTable, TableActions};
use crate::errors::AppError;
use crate::models::{DisplayBooking, NavigationState, Route, UserId};
use crate::services::api::BookingApi;
use crate::services::navigation::Navigator;
use crate::services::session::{current_user_id, SessionStore};
use crate::services::shaping::shape_bookings;

pub const FETCH_FAILED_MESSAGE: &str = "Could not load bookings. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Error(String),
    Ready(Vec<DisplayBooking>),
}

impl ViewState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ViewState::Loading)
    }

    fn from_fetch(result: Result<Vec<DisplayBooking>, AppError>) -> Self {
        match result {
            Ok(bookings) => ViewState::Ready(bookings),
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch bookings");
                ViewState::Error(FETCH_FAILED_MESSAGE.to_string())
            }
        }
    }
}

/// Inputs that decide what the view shows. A new fetch is issued only when
/// these change.
#[derive(Debug, Clone, PartialEq)]
struct FetchKey {
    user_id: Option<UserId>,
    navigation: Option<NavigationState>,
}

/// The "your bookings" view: resolves the signed-in user, loads their bookings
/// once per mount and publishes `Loading`, then `Error` or `Ready`.
///
/// The fetch runs as a tokio task owned by the view. Dropping the view (or
/// calling [`BookingListView::unmount`]) aborts it, and a fetch that settles
/// after that is discarded.
pub struct BookingListView {
    api: Arc<dyn BookingApi>,
    offset: FixedOffset,
    state: Arc<watch::Sender<ViewState>>,
    generation: Arc<AtomicU64>,
    key: FetchKey,
    task: Option<JoinHandle<()>>,
}

impl BookingListView {
    /// Must be called from within a tokio runtime.
    pub fn mount(
        api: Arc<dyn BookingApi>,
        session: &dyn SessionStore,
        navigation: Option<NavigationState>,
        offset: FixedOffset,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        let mut view = Self {
            api,
            offset,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            key: FetchKey {
                user_id: current_user_id(session),
                navigation,
            },
            task: None,
        };
        view.start();
        view
    }

    /// Re-resolves the user and takes the new navigation payload. Fetches
    /// again only if either changed; returns whether it did.
    pub fn update(
        &mut self,
        session: &dyn SessionStore,
        navigation: Option<NavigationState>,
    ) -> bool {
        let key = FetchKey {
            user_id: current_user_id(session),
            navigation,
        };
        if key == self.key {
            return false;
        }
        self.key = key;
        self.start();
        true
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Stream of states, starting with the current one.
    pub fn subscribe(&self) -> WatchStream<ViewState> {
        WatchStream::new(self.state.subscribe())
    }

    /// Waits for the pending fetch, if any, and returns the state it left.
    pub async fn settled(&self) -> ViewState {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(ViewState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    pub fn find_stations(&self, navigator: &dyn Navigator) {
        navigator.navigate(Route::Stations);
    }

    pub fn render(&self, actions: &dyn TableActions) -> String {
        render_page(&self.state.borrow(), actions)
    }

    pub fn unmount(self) {}

    fn start(&mut self) {
        self.stop();
        let generation = self.generation.load(Ordering::SeqCst);

        let Some(user_id) = self.key.user_id.clone() else {
            tracing::debug!("no signed-in user, skipping bookings fetch");
            self.state.send_replace(ViewState::Ready(Vec::new()));
            return;
        };

        self.state.send_replace(ViewState::Loading);

        let api = Arc::clone(&self.api);
        let optimistic = self
            .key
            .navigation
            .as_ref()
            .and_then(|nav| nav.optimistic())
            .cloned();
        let offset = self.offset;
        let state = Arc::downgrade(&self.state);
        let current = Arc::clone(&self.generation);

        self.task = Some(tokio::spawn(async move {
            let result = api
                .get_bookings_for_user(&user_id)
                .await
                .map(|raw| {
                    tracing::debug!(user_id = %user_id, count = raw.len(), "fetched bookings");
                    shape_bookings(&raw, optimistic.as_ref(), &offset)
                })
                .map_err(|e| AppError::FetchFailed(format!("{e:#}")));

            publish(&state, &current, generation, ViewState::from_fetch(result));
        }));
    }

    /// Aborts the in-flight fetch and invalidates anything it might still
    /// publish.
    fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for BookingListView {
    fn drop(&mut self) {
        self.stop();
    }
}

fn publish(
    state: &Weak<watch::Sender<ViewState>>,
    current: &AtomicU64,
    generation: u64,
    next: ViewState,
) {
    let Some(state) = state.upgrade() else {
        tracing::debug!("view unmounted, dropping fetch result");
        return;
    };
    state.send_if_modified(|slot| {
        if current.load(Ordering::SeqCst) != generation {
            tracing::debug!("stale fetch result dropped");
            return false;
        }
        *slot = next;
        true
    });
}

pub fn render_page(state: &ViewState, actions: &dyn TableActions) -> String {
    let mut out = String::from(
        "Your Bookings\nManage and view your charging bookings.\n[Find stations]\n\n",
    );
    match state {
        ViewState::Loading => out.push_str("Loading bookings...\n"),
        ViewState::Error(message) => {
            out.push_str(message);
            out.push('\n');
        }
        ViewState::Ready(bookings) => out.push_str(&BookingTable::new(bookings, actions).render()),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingId;
    use crate::views::table::LoggingTableActions;

    #[test]
    fn test_loading_page_has_no_table() {
        let page = render_page(&ViewState::Loading, &LoggingTableActions);
        assert!(page.starts_with("Your Bookings\n"));
        assert!(page.contains("[Find stations]"));
        assert!(page.contains("Loading bookings..."));
        assert!(!page.contains("Station"));
    }

    #[test]
    fn test_error_page_shows_message_only() {
        let page = render_page(
            &ViewState::Error(FETCH_FAILED_MESSAGE.to_string()),
            &LoggingTableActions,
        );
        assert!(page.contains("[Find stations]"));
        assert!(page.ends_with("Could not load bookings. Please try again later.\n"));
        assert!(!page.contains("Loading"));
        assert!(!page.contains("Station"));
    }

    #[test]
    fn test_ready_page_renders_table() {
        let bookings = vec![DisplayBooking {
            id: BookingId::Number(1),
            user: "You".to_string(),
            station: "Main St".to_string(),
            slot_time: "6/16/2025, 10:00:00 AM (30 mins)".to_string(),
            status: "Upcoming".to_string(),
        }];
        let page = render_page(&ViewState::Ready(bookings), &LoggingTableActions);
        assert!(page.contains("Main St"));
        assert!(page.contains("(30 mins)"));
        assert!(!page.contains("Loading"));
    }

    #[test]
    fn test_settled_states() {
        assert!(!ViewState::Loading.is_settled());
        assert!(ViewState::Ready(vec![]).is_settled());
        assert!(ViewState::Error(String::new()).is_settled());
    }
}
