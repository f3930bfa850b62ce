//! Pairwise album voting.
//!
//! One round: fetch two albums, the user picks a winner, the outcome is
//! posted, and a fresh pair is fetched. The phase machine keeps a second
//! vote for the same pair from being dispatched while the first is in flight.

use crate::api::{AlbumId, ApiError, ComparisonPair, MediaClient, RatingUpdate};
use crate::request::{RequestTracker, Ticket};
use dioxus::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("winner and loser must be different albums")]
    SameAlbum,

    #[error("album {0} is not part of the current pair")]
    NotInPair(AlbumId),

    #[error("no pair is ready for voting")]
    NotReady,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VotePhase {
    /// No pair held and nothing outstanding.
    #[default]
    Idle,
    Loading,
    Ready,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonState {
    phase: VotePhase,
    pair: Option<ComparisonPair>,
    error: Option<String>,
    requests: RequestTracker<()>,
    votes_cast: u64,
    /// The held pair already has a recorded vote.
    pair_spent: bool,
}

impl ComparisonState {
    pub fn phase(&self) -> VotePhase {
        self.phase
    }

    pub fn pair(&self) -> Option<&ComparisonPair> {
        self.pair.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn votes_cast(&self) -> u64 {
        self.votes_cast
    }

    pub fn can_vote(&self) -> bool {
        self.phase == VotePhase::Ready && self.pair.is_some()
    }

    /// Forget the pair and any outstanding request. The request counter keeps
    /// running so responses started before the reset stay stale.
    pub fn reset(&mut self) {
        self.requests.invalidate();
        self.phase = VotePhase::Idle;
        self.pair = None;
        self.pair_spent = false;
        self.error = None;
    }

    pub fn begin_fetch(&mut self) -> Ticket<()> {
        self.phase = VotePhase::Loading;
        self.requests.begin(())
    }

    /// Apply a pair response. Returns false when the response was stale.
    pub fn finish_fetch(
        &mut self,
        ticket: Ticket<()>,
        result: Result<ComparisonPair, ApiError>,
    ) -> bool {
        if !self.requests.complete(&ticket) {
            return false;
        }
        match result {
            Ok(pair) => {
                self.pair = Some(pair);
                self.pair_spent = false;
                self.error = None;
                self.phase = VotePhase::Ready;
            }
            Err(err) => {
                self.error = Some(err.to_string());
                if self.pair_spent {
                    self.pair = None;
                    self.pair_spent = false;
                }
                self.phase = if self.pair.is_some() {
                    VotePhase::Ready
                } else {
                    VotePhase::Idle
                };
            }
        }
        true
    }

    /// Validate a vote against the held pair and move to `Submitting`.
    pub fn begin_vote(
        &mut self,
        winner_id: AlbumId,
        loser_id: AlbumId,
    ) -> Result<RatingUpdate, CompareError> {
        if winner_id == loser_id {
            return Err(CompareError::SameAlbum);
        }
        if self.phase != VotePhase::Ready {
            return Err(CompareError::NotReady);
        }
        let pair = self.pair.as_ref().ok_or(CompareError::NotReady)?;
        for id in [winner_id, loser_id] {
            if !pair.contains(id) {
                return Err(CompareError::NotInPair(id));
            }
        }

        self.phase = VotePhase::Submitting;
        self.error = None;
        Ok(RatingUpdate {
            winner_id,
            loser_id,
        })
    }

    /// Apply the vote outcome. A vote that was abandoned by `reset` is ignored.
    pub fn finish_vote(&mut self, result: Result<(), ApiError>) -> Result<(), CompareError> {
        if self.phase != VotePhase::Submitting {
            return Err(CompareError::NotReady);
        }
        match result {
            Ok(()) => {
                self.votes_cast += 1;
                self.pair_spent = true;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.phase = VotePhase::Ready;
                Err(CompareError::Api(err))
            }
        }
    }
}

/// The two endpoints a voting round needs.
#[allow(async_fn_in_trait)]
pub trait CompareApi {
    async fn fetch_pair(&self) -> Result<ComparisonPair, ApiError>;
    async fn submit_vote(&self, update: RatingUpdate) -> Result<(), ApiError>;
}

impl CompareApi for MediaClient {
    async fn fetch_pair(&self) -> Result<ComparisonPair, ApiError> {
        self.get_comparison_pair().await
    }

    async fn submit_vote(&self, update: RatingUpdate) -> Result<(), ApiError> {
        let response = self.update_rating(update).await?;
        info!(
            winner = %update.winner_id,
            loser = %update.loser_id,
            winner_elo = ?response.winner_new_elo,
            loser_elo = ?response.loser_new_elo,
            "Vote recorded"
        );
        Ok(())
    }
}

/// Somewhere a `ComparisonState` lives: a plain value or a UI signal.
pub trait ComparisonStore {
    fn update<R>(&mut self, f: impl FnOnce(&mut ComparisonState) -> R) -> R;
}

impl ComparisonStore for ComparisonState {
    fn update<R>(&mut self, f: impl FnOnce(&mut ComparisonState) -> R) -> R {
        f(self)
    }
}

impl ComparisonStore for Signal<ComparisonState> {
    fn update<R>(&mut self, f: impl FnOnce(&mut ComparisonState) -> R) -> R {
        self.with_mut(f)
    }
}

/// Load a new pair. Returns whether the response was applied.
pub async fn fetch_pair<A: CompareApi, S: ComparisonStore>(api: &A, store: &mut S) -> bool {
    let ticket = store.update(ComparisonState::begin_fetch);
    let result = api.fetch_pair().await;
    if let Err(err) = &result {
        warn!(error = %err, "Failed to fetch comparison pair");
    }
    let applied = store.update(|state| state.finish_fetch(ticket, result));
    if !applied {
        debug!("Discarded stale comparison pair");
    }
    applied
}

/// Submit a vote and, once accepted, load the next pair.
pub async fn vote<A: CompareApi, S: ComparisonStore>(
    api: &A,
    store: &mut S,
    winner_id: AlbumId,
    loser_id: AlbumId,
) -> Result<(), CompareError> {
    let update = store
        .update(|state| state.begin_vote(winner_id, loser_id))
        .inspect_err(|err| debug!(error = %err, "Vote rejected"))?;

    let result = api.submit_vote(update).await;
    if let Err(err) = &result {
        warn!(error = %err, "Failed to submit vote");
    }
    store.update(|state| state.finish_vote(result))?;

    fetch_pair(api, store).await;
    Ok(())
}
