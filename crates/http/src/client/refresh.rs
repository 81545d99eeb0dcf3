//! Single-flight coordination of refresh-token exchanges
//!
//! When an authenticated call is rejected with 401/403 the client asks the
//! coordinator for a usable access token. Exactly one caller (the leader) runs
//! the exchange; callers arriving while it is in flight park on a oneshot and
//! receive the leader's outcome. A caller whose token was already rotated away
//! by a finished exchange gets the current token back without a new exchange.

use crate::client::error::ClientError;
use crate::client::store::TokenStore;
use crate::types::TokenPair;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// New access token, or the reason the exchange failed
type Outcome = Result<String, String>;

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Outcome>>,
    exchanges: u64,
}

enum Ticket {
    Lead,
    Wait(oneshot::Receiver<Outcome>),
    Rotated(String),
}

/// Refresh coordinator shared by every clone of an authenticated client
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether an exchange is currently running
    pub fn is_refreshing(&self) -> bool {
        self.state().in_flight
    }

    /// Number of callers parked behind the running exchange
    pub fn waiting(&self) -> usize {
        self.state().waiters.len()
    }

    /// Number of exchanges started over the coordinator's lifetime
    pub fn exchanges(&self) -> u64 {
        self.state().exchanges
    }

    /// Obtain an access token to replay a rejected call with
    ///
    /// `stale` is the access token the rejected call carried. `exchange` is
    /// only invoked when this caller ends up leading a new exchange; it
    /// receives the stored refresh token and must return the rotated pair.
    ///
    /// On failure both stored tokens are cleared and every parked caller
    /// receives [`ClientError::RefreshFailed`].
    pub async fn refresh<F, Fut>(
        &self,
        store: &TokenStore,
        stale: Option<&str>,
        exchange: F,
    ) -> Result<String, ClientError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<TokenPair, ClientError>>,
    {
        match self.ticket(store, stale) {
            Ticket::Rotated(token) => {
                debug!("Token already rotated, replaying with current token");
                Ok(token)
            }
            Ticket::Wait(receiver) => {
                debug!("Refresh in flight, waiting for it to settle");
                match receiver.await {
                    Ok(outcome) => outcome.map_err(ClientError::RefreshFailed),
                    Err(_) => Err(ClientError::RefreshFailed(
                        "refresh was abandoned".to_string(),
                    )),
                }
            }
            Ticket::Lead => {
                let lease = Lease {
                    coordinator: self,
                    settled: false,
                };
                let outcome = run_exchange(store, exchange).await;
                lease.settle(outcome.clone());
                outcome.map_err(ClientError::RefreshFailed)
            }
        }
    }

    fn ticket(&self, store: &TokenStore, stale: Option<&str>) -> Ticket {
        let mut state = self.state();

        if state.in_flight {
            let (sender, receiver) = oneshot::channel();
            state.waiters.push(sender);
            return Ticket::Wait(receiver);
        }

        // The leader persists the new pair before clearing `in_flight`, so a
        // rotation that finished before we took the lock is visible here.
        if let Some(current) = store.access_token() {
            if stale != Some(current.as_str()) {
                return Ticket::Rotated(current);
            }
        }

        state.in_flight = true;
        state.exchanges += 1;
        Ticket::Lead
    }

    fn settle(&self, outcome: &Outcome) {
        let waiters = {
            let mut state = self.state();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };

        debug!(waiters = waiters.len(), "Settling parked requests");
        for waiter in waiters {
            // A waiter that went away no longer needs the answer
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Clears the in-flight flag even if the leader's future is dropped mid-exchange
struct Lease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl Lease<'_> {
    fn settle(mut self, outcome: Outcome) {
        self.settled = true;
        self.coordinator.settle(&outcome);
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Refresh leader dropped before the exchange settled");
            self.coordinator
                .settle(&Err("refresh was cancelled".to_string()));
        }
    }
}

async fn run_exchange<F, Fut>(store: &TokenStore, exchange: F) -> Outcome
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<TokenPair, ClientError>>,
{
    let result = match store.refresh_token() {
        Some(refresh_token) => exchange(refresh_token).await,
        None => Err(ClientError::RefreshFailed(
            "no refresh token stored".to_string(),
        )),
    };

    let failure = match result {
        Ok(pair) => match store.store_pair(&pair) {
            Ok(()) => {
                info!("Session tokens rotated");
                return Ok(pair.access_token);
            }
            Err(err) => format!("failed to persist rotated tokens: {err}"),
        },
        Err(ClientError::RefreshFailed(reason)) => reason,
        Err(err) => err.to_string(),
    };

    warn!(reason = %failure, "Token refresh failed, clearing session");
    if let Err(err) = store.clear() {
        warn!(error = %err, "Failed to clear tokens after refresh failure");
    }
    Err(failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn signed_in(access: &str, refresh: &str) -> TokenStore {
        let store = TokenStore::in_memory();
        store
            .store_pair(&TokenPair {
                access_token: access.into(),
                refresh_token: refresh.into(),
            })
            .unwrap();
        store
    }

    async fn unreachable_exchange(_refresh_token: String) -> Result<TokenPair, ClientError> {
        panic!("exchange must not run");
    }

    fn rotated() -> TokenPair {
        TokenPair {
            access_token: "access-2".into(),
            refresh_token: "refresh-2".into(),
        }
    }

    #[tokio::test]
    async fn test_leader_persists_rotated_pair() {
        let store = signed_in("access-1", "refresh-1");
        let coordinator = RefreshCoordinator::new();

        let token = coordinator
            .refresh(&store, Some("access-1"), |refresh_token| async move {
                assert_eq!(refresh_token, "refresh-1");
                Ok(rotated())
            })
            .await
            .unwrap();

        assert_eq!(token, "access-2");
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-2"));
        assert_eq!(coordinator.exchanges(), 1);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn test_rotated_token_skips_exchange() {
        let store = signed_in("access-2", "refresh-2");
        let coordinator = RefreshCoordinator::new();

        let token = coordinator
            .refresh(&store, Some("access-1"), unreachable_exchange)
            .await
            .unwrap();

        assert_eq!(token, "access-2");
        assert_eq!(coordinator.exchanges(), 0);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_and_clears() {
        let store = TokenStore::in_memory();
        store
            .set(crate::client::store::TokenKind::Access, "access-1")
            .unwrap();
        let coordinator = RefreshCoordinator::new();

        let err = coordinator
            .refresh(&store, Some("access-1"), unreachable_exchange)
            .await
            .unwrap_err();

        assert!(err.is_session_expired());
        assert!(!store.has_session());
    }

    #[tokio::test]
    async fn test_waiters_share_the_leaders_outcome() {
        let store = signed_in("access-1", "refresh-1");
        let coordinator = Arc::new(RefreshCoordinator::new());
        let release = Arc::new(Notify::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let leader = {
            let (store, coordinator, release, calls) =
                (store.clone(), coordinator.clone(), release.clone(), calls.clone());
            tokio::spawn(async move {
                coordinator
                    .refresh(&store, Some("access-1"), |_| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        release.notified().await;
                        Ok(rotated())
                    })
                    .await
            })
        };

        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let followers: Vec<_> = (0..3)
            .map(|_| {
                let (store, coordinator, calls) =
                    (store.clone(), coordinator.clone(), calls.clone());
                tokio::spawn(async move {
                    coordinator
                        .refresh(&store, Some("access-1"), |_| async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(rotated())
                        })
                        .await
                })
            })
            .collect();

        while coordinator.waiting() < 3 {
            tokio::task::yield_now().await;
        }
        release.notify_one();

        assert_eq!(leader.await.unwrap().unwrap(), "access-2");
        for follower in followers {
            assert_eq!(follower.await.unwrap().unwrap(), "access-2");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.exchanges(), 1);
    }

    #[tokio::test]
    async fn test_failure_rejects_waiters_and_clears_store() {
        let store = signed_in("access-1", "refresh-1");
        let coordinator = Arc::new(RefreshCoordinator::new());
        let release = Arc::new(Notify::new());

        let leader = {
            let (store, coordinator, release) =
                (store.clone(), coordinator.clone(), release.clone());
            tokio::spawn(async move {
                coordinator
                    .refresh(&store, Some("access-1"), |_| async move {
                        release.notified().await;
                        Err(ClientError::ServerError {
                            status: 500,
                            message: "boom".into(),
                        })
                    })
                    .await
            })
        };

        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let follower = {
            let (store, coordinator) = (store.clone(), coordinator.clone());
            tokio::spawn(async move {
                coordinator
                    .refresh(&store, Some("access-1"), |_| async { Ok(rotated()) })
                    .await
            })
        };

        while coordinator.waiting() < 1 {
            tokio::task::yield_now().await;
        }
        release.notify_one();

        assert!(leader.await.unwrap().unwrap_err().is_session_expired());
        assert!(follower.await.unwrap().unwrap_err().is_session_expired());
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn test_dropped_leader_releases_waiters() {
        let store = signed_in("access-1", "refresh-1");
        let coordinator = Arc::new(RefreshCoordinator::new());

        let leader = {
            let (store, coordinator) = (store.clone(), coordinator.clone());
            tokio::spawn(async move {
                coordinator
                    .refresh(&store, Some("access-1"), |_| async {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok(rotated())
                    })
                    .await
            })
        };

        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let follower = {
            let (store, coordinator) = (store.clone(), coordinator.clone());
            tokio::spawn(async move {
                coordinator
                    .refresh(&store, Some("access-1"), |_| async { Ok(rotated()) })
                    .await
            })
        };

        while coordinator.waiting() < 1 {
            tokio::task::yield_now().await;
        }
        leader.abort();

        let err = follower.await.unwrap().unwrap_err();
        assert!(err.is_session_expired());
        assert!(!coordinator.is_refreshing());
        // Cancellation is not a refresh failure; the session is left alone
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
    }
}
