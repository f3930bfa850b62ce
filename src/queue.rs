//! Playback queue controller.
//!
//! Owns the "now playing" slot and two explicit queues around it:
//!
//! ```text
//! backward (history, most recent first)   current   forward (up next, earliest first)
//!        [B, A]                      <-     C     ->        [D, E]
//! ```
//!
//! The controller is pure state. The audio bridge mirrors it onto the
//! `<audio>` element and feeds media events back in.

use crate::api::TrackId;
use std::collections::VecDeque;
use thiserror::Error;

/// "Previous" restarts the current track once playback is past this point.
pub const RESTART_THRESHOLD_SECS: f64 = 10.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("album has no tracks")]
    EmptyAlbum,

    #[error("start index {index} is out of range for {len} tracks")]
    StartOutOfRange { index: usize, len: usize },
}

/// What a queue operation did, so the audio element can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A different track is current; load its stream.
    Changed,
    /// Same track, rewound to the start.
    Restarted,
    /// Nothing left to play; pause.
    Stopped,
    /// No-op.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackQueue {
    current: Option<TrackId>,
    forward: VecDeque<TrackId>,
    backward: VecDeque<TrackId>,
    position: f64,
    duration: f64,
    volume: f64,
    is_playing: bool,
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self {
            current: None,
            forward: VecDeque::new(),
            backward: VecDeque::new(),
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_playing: false,
        }
    }
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TrackId> {
        self.current
    }

    /// Upcoming tracks, earliest first.
    pub fn forward(&self) -> &VecDeque<TrackId> {
        &self.forward
    }

    /// Played tracks, most recent first.
    pub fn backward(&self) -> &VecDeque<TrackId> {
        &self.backward
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Playback progress in `[0, 1]`, 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn has_next(&self) -> bool {
        self.current.is_some() && !self.forward.is_empty()
    }

    /// Replace both queues from an album's track list, starting at `start`.
    pub fn load_album(&mut self, tracks: &[TrackId], start: usize) -> Result<Transition, QueueError> {
        if tracks.is_empty() {
            return Err(QueueError::EmptyAlbum);
        }
        if start >= tracks.len() {
            return Err(QueueError::StartOutOfRange {
                index: start,
                len: tracks.len(),
            });
        }

        self.current = Some(tracks[start]);
        self.forward = tracks[start + 1..].iter().copied().collect();
        self.backward = tracks[..start].iter().rev().copied().collect();
        self.reset_position();
        self.is_playing = true;
        Ok(Transition::Changed)
    }

    /// Play next. An empty forward queue stops playback without touching the queues.
    pub fn advance(&mut self) -> Transition {
        let Some(previous) = self.current else {
            return Transition::Unchanged;
        };
        let Some(next) = self.forward.pop_front() else {
            self.is_playing = false;
            return Transition::Stopped;
        };

        self.backward.push_front(previous);
        self.current = Some(next);
        self.reset_position();
        Transition::Changed
    }

    /// Play previous, or restart the current track when past the threshold.
    pub fn retreat(&mut self) -> Transition {
        let Some(previous) = self.current else {
            return Transition::Unchanged;
        };
        if self.position > RESTART_THRESHOLD_SECS {
            self.position = 0.0;
            return Transition::Restarted;
        }
        let Some(prior) = self.backward.pop_front() else {
            return Transition::Unchanged;
        };

        self.forward.push_front(previous);
        self.current = Some(prior);
        self.reset_position();
        Transition::Changed
    }

    /// The media element finished the current track.
    ///
    /// With nothing queued the finished track is still recorded in history,
    /// stays current, and playback stops.
    pub fn on_track_ended(&mut self) -> Transition {
        let Some(finished) = self.current else {
            return Transition::Unchanged;
        };
        if self.forward.is_empty() {
            self.backward.push_front(finished);
            self.is_playing = false;
            return Transition::Stopped;
        }
        self.advance()
    }

    /// Jump to `fraction` of the current track. Returns the new position.
    pub fn seek(&mut self, fraction: f64) -> f64 {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.position = self.constrain(fraction * self.duration);
        self.position
    }

    /// Position reported by the media element.
    pub fn sync_position(&mut self, seconds: f64) {
        self.position = self.constrain(seconds);
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            0.0
        };
        self.position = self.constrain(self.position);
    }

    /// Returns the applied level.
    pub fn set_volume(&mut self, level: f64) -> f64 {
        if level.is_finite() {
            self.volume = level.clamp(0.0, 1.0);
        }
        self.volume
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing && self.current.is_some();
    }

    pub fn toggle_playing(&mut self) -> bool {
        self.set_playing(!self.is_playing);
        self.is_playing
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.forward.clear();
        self.backward.clear();
        self.reset_position();
        self.is_playing = false;
    }

    fn reset_position(&mut self) {
        self.position = 0.0;
        self.duration = 0.0;
    }

    /// Clamp into `[0, duration)`; anything goes while the duration is unknown.
    fn constrain(&self, seconds: f64) -> f64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0.0;
        }
        if self.duration > 0.0 && seconds >= self.duration {
            return just_below(self.duration);
        }
        seconds
    }
}

/// Largest f64 strictly less than a positive finite `value`.
fn just_below(value: f64) -> f64 {
    f64::from_bits(value.to_bits() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(raw: &[u32]) -> Vec<TrackId> {
        raw.iter().copied().map(TrackId).collect()
    }

    fn deque(raw: &[u32]) -> VecDeque<TrackId> {
        ids(raw).into_iter().collect()
    }

    const A: TrackId = TrackId(1);
    const B: TrackId = TrackId(2);
    const C: TrackId = TrackId(3);

    #[test]
    fn load_album_splits_around_start() {
        let mut queue = PlaybackQueue::new();
        assert_eq!(queue.load_album(&[A, B, C], 1), Ok(Transition::Changed));
        assert_eq!(queue.current(), Some(B));
        assert_eq!(queue.forward(), &deque(&[3]));
        assert_eq!(queue.backward(), &deque(&[1]));
        assert!(queue.is_playing());
    }

    #[test]
    fn load_album_reverses_history() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&ids(&[1, 2, 3, 4, 5]), 3).unwrap();
        assert_eq!(queue.current(), Some(TrackId(4)));
        assert_eq!(queue.backward(), &deque(&[3, 2, 1]));
        assert_eq!(queue.forward(), &deque(&[5]));
    }

    #[test]
    fn load_album_rejects_bad_input_without_mutating() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B], 0).unwrap();
        let before = queue.clone();

        assert_eq!(queue.load_album(&[], 0), Err(QueueError::EmptyAlbum));
        assert_eq!(
            queue.load_album(&[A, B, C], 3),
            Err(QueueError::StartOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(queue, before);
    }

    #[test]
    fn round_trip_through_advance_and_retreat() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B, C], 1).unwrap();

        assert_eq!(queue.advance(), Transition::Changed);
        assert_eq!(queue.current(), Some(C));
        assert!(queue.forward().is_empty());
        assert_eq!(queue.backward(), &deque(&[2, 1]));

        assert_eq!(queue.retreat(), Transition::Changed);
        assert_eq!(queue.current(), Some(B));
        assert_eq!(queue.forward(), &deque(&[3]));
        assert_eq!(queue.backward(), &deque(&[1]));
    }

    #[test]
    fn advance_resets_position() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B], 0).unwrap();
        queue.set_duration(200.0);
        queue.sync_position(42.0);

        queue.advance();
        assert_eq!(queue.position(), 0.0);
        assert_eq!(queue.duration(), 0.0);
    }

    #[test]
    fn advance_at_end_stops_without_touching_queues() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B], 1).unwrap();
        let backward = queue.backward().clone();

        assert_eq!(queue.advance(), Transition::Stopped);
        assert_eq!(queue.current(), Some(B));
        assert_eq!(queue.backward(), &backward);
        assert!(!queue.is_playing());
    }

    #[test]
    fn navigation_without_current_track_is_noop() {
        let mut queue = PlaybackQueue::new();
        assert_eq!(queue.advance(), Transition::Unchanged);
        assert_eq!(queue.retreat(), Transition::Unchanged);
        assert_eq!(queue.on_track_ended(), Transition::Unchanged);
        assert_eq!(queue, PlaybackQueue::new());
    }

    #[test]
    fn retreat_past_threshold_restarts() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B, C], 1).unwrap();
        queue.set_duration(180.0);
        queue.sync_position(10.5);

        assert_eq!(queue.retreat(), Transition::Restarted);
        assert_eq!(queue.current(), Some(B));
        assert_eq!(queue.position(), 0.0);
        assert_eq!(queue.forward(), &deque(&[3]));
        assert_eq!(queue.backward(), &deque(&[1]));
    }

    #[test]
    fn retreat_exactly_at_threshold_goes_back() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B], 1).unwrap();
        queue.set_duration(180.0);
        queue.sync_position(RESTART_THRESHOLD_SECS);

        assert_eq!(queue.retreat(), Transition::Changed);
        assert_eq!(queue.current(), Some(A));
    }

    #[test]
    fn rapid_retreats_restart_then_go_back() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B], 1).unwrap();
        queue.set_duration(180.0);
        queue.sync_position(95.0);

        assert_eq!(queue.retreat(), Transition::Restarted);
        assert_eq!(queue.retreat(), Transition::Changed);
        assert_eq!(queue.current(), Some(A));
        assert_eq!(queue.forward(), &deque(&[2]));
    }

    #[test]
    fn retreat_with_empty_history_is_noop() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B], 0).unwrap();
        let before = queue.clone();
        assert_eq!(queue.retreat(), Transition::Unchanged);
        assert_eq!(queue, before);
    }

    #[test]
    fn track_end_advances_when_queue_has_more() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B], 0).unwrap();
        assert_eq!(queue.on_track_ended(), Transition::Changed);
        assert_eq!(queue.current(), Some(B));
        assert_eq!(queue.backward(), &deque(&[1]));
        assert!(queue.is_playing());
    }

    #[test]
    fn track_end_on_last_track_records_history() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, B, C], 2).unwrap();

        assert_eq!(queue.on_track_ended(), Transition::Stopped);
        assert_eq!(queue.current(), Some(C));
        assert!(!queue.is_playing());
        assert_eq!(queue.backward(), &deque(&[3, 2, 1]));
        assert!(queue.forward().is_empty());
    }

    #[test]
    fn repeated_track_ids_are_allowed() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A, A, B, A], 0).unwrap();
        queue.advance();
        queue.advance();
        queue.advance();
        assert_eq!(queue.current(), Some(A));
        assert_eq!(queue.backward(), &deque(&[2, 1, 1]));
    }

    #[test]
    fn seek_is_constrained_to_track() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A], 0).unwrap();
        queue.set_duration(200.0);

        assert_eq!(queue.seek(0.25), 50.0);
        assert_eq!(queue.seek(-1.0), 0.0);
        let end = queue.seek(1.0);
        assert!(end < 200.0 && end > 199.9);
        assert_eq!(queue.seek(f64::NAN), 0.0);
    }

    #[test]
    fn seek_without_duration_stays_at_start() {
        let mut queue = PlaybackQueue::new();
        queue.load_album(&[A], 0).unwrap();
        assert_eq!(queue.seek(0.5), 0.0);
    }

    #[test]
    fn volume_is_clamped() {
        let mut queue = PlaybackQueue::new();
        assert_eq!(queue.set_volume(1.7), 1.0);
        assert_eq!(queue.set_volume(-0.2), 0.0);
        assert_eq!(queue.set_volume(0.35), 0.35);
        assert_eq!(queue.set_volume(f64::INFINITY), 0.35);
    }

    #[test]
    fn playing_requires_a_track() {
        let mut queue = PlaybackQueue::new();
        assert!(!queue.toggle_playing());
        queue.load_album(&[A], 0).unwrap();
        assert!(!queue.toggle_playing());
        assert!(queue.toggle_playing());
        queue.clear();
        assert!(!queue.is_playing());
        assert_eq!(queue.current(), None);
    }

    fn album_and_start() -> impl Strategy<Value = (Vec<TrackId>, usize)> {
        prop::collection::vec(0u32..20, 1..40).prop_flat_map(|raw| {
            let len = raw.len();
            (Just(raw.into_iter().map(TrackId).collect::<Vec<_>>()), 0..len)
        })
    }

    proptest! {
        /// Advancing through the rest of the album ends on its last track.
        #[test]
        fn advancing_drains_forward((tracks, start) in album_and_start()) {
            let mut queue = PlaybackQueue::new();
            queue.load_album(&tracks, start).unwrap();
            for _ in 0..(tracks.len() - 1 - start) {
                prop_assert_eq!(queue.advance(), Transition::Changed);
            }
            prop_assert!(queue.forward().is_empty());
            prop_assert_eq!(queue.current(), tracks.last().copied());
        }

        /// Advance followed by retreat at position 0 restores everything.
        #[test]
        fn retreat_undoes_advance((tracks, start) in album_and_start(), steps in 0usize..10) {
            let mut queue = PlaybackQueue::new();
            queue.load_album(&tracks, start).unwrap();
            for _ in 0..steps {
                queue.advance();
            }
            let before = (queue.current(), queue.forward().clone(), queue.backward().clone());

            if queue.advance() == Transition::Changed {
                queue.sync_position(0.0);
                prop_assert_eq!(queue.retreat(), Transition::Changed);
            }
            prop_assert_eq!(before, (queue.current(), queue.forward().clone(), queue.backward().clone()));
        }

        /// Restarting never touches either queue.
        #[test]
        fn restart_keeps_queues((tracks, start) in album_and_start(), position in 10.001f64..600.0) {
            let mut queue = PlaybackQueue::new();
            queue.load_album(&tracks, start).unwrap();
            queue.set_duration(601.0);
            queue.sync_position(position);
            let forward = queue.forward().clone();
            let backward = queue.backward().clone();

            prop_assert_eq!(queue.retreat(), Transition::Restarted);
            prop_assert_eq!(queue.forward(), &forward);
            prop_assert_eq!(queue.backward(), &backward);
            prop_assert_eq!(queue.position(), 0.0);
        }

        /// The three slots always hold exactly the loaded tracks (plus one
        /// extra history entry per end-of-album event).
        #[test]
        fn tracks_are_conserved(
            (tracks, start) in album_and_start(),
            ops in prop::collection::vec(0u8..3, 0..60),
        ) {
            let mut queue = PlaybackQueue::new();
            queue.load_album(&tracks, start).unwrap();
            let mut extra_history = 0;
            for op in ops {
                match op {
                    0 => { queue.advance(); }
                    1 => { queue.retreat(); }
                    _ => {
                        if queue.forward().is_empty() {
                            extra_history += 1;
                        }
                        queue.on_track_ended();
                    }
                }
            }
            let held = 1 + queue.forward().len() + queue.backward().len();
            prop_assert_eq!(held, tracks.len() + extra_history);
        }

        /// Seeking always lands inside the track.
        #[test]
        fn seek_stays_in_bounds(duration in 0.5f64..3600.0, fraction in -2.0f64..2.0) {
            let mut queue = PlaybackQueue::new();
            queue.load_album(&[TrackId(1)], 0).unwrap();
            queue.set_duration(duration);
            let position = queue.seek(fraction);
            prop_assert!(position >= 0.0);
            prop_assert!(position < duration);
        }
    }
}
