//! Audio Manager - mirrors the playback queue onto a single hidden `<audio>` element.
//! The queue stays authoritative; media events are fed back into it.

use crate::api::{MediaClient, TrackId};
use crate::db::AppSettings;
use crate::queue::{PlaybackQueue, QueueError, Transition};
use dioxus::prelude::*;
use tracing::debug;

#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

#[cfg(not(target_arch = "wasm32"))]
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use serde_json::json;

#[cfg(target_arch = "wasm32")]
const AUDIO_ELEMENT_ID: &str = "media-streamer-audio";

/// Seconds of playback between position updates pushed into the queue.
const POSITION_SYNC_INTERVAL: f64 = 0.2;

/// User-facing playback operations. Every operation updates the queue first,
/// then tells the audio element what changed.
#[derive(Clone, Copy, PartialEq)]
pub struct PlayerController {
    pub queue: Signal<PlaybackQueue>,
    pub settings: Signal<AppSettings>,
}

impl PlayerController {
    pub fn new(queue: Signal<PlaybackQueue>, settings: Signal<AppSettings>) -> Self {
        Self { queue, settings }
    }

    pub fn play_album(&mut self, tracks: &[TrackId], start: usize) -> Result<(), QueueError> {
        let transition = self.queue.with_mut(|q| q.load_album(tracks, start))?;
        self.apply(transition);
        Ok(())
    }

    pub fn next(&mut self) {
        let transition = self.queue.with_mut(PlaybackQueue::advance);
        self.apply(transition);
    }

    pub fn previous(&mut self) {
        let transition = self.queue.with_mut(PlaybackQueue::retreat);
        self.apply(transition);
    }

    pub fn track_ended(&mut self) {
        let transition = self.queue.with_mut(PlaybackQueue::on_track_ended);
        self.apply(transition);
    }

    pub fn toggle(&mut self) {
        self.queue.with_mut(PlaybackQueue::toggle_playing);
    }

    /// Seek to `fraction` of the current track.
    pub fn seek(&mut self, fraction: f64) {
        let position = self.queue.with_mut(|q| q.seek(fraction));
        seek_to(position);
    }

    /// Set the level in `[0, 1]` and remember it in the settings.
    pub fn set_volume(&mut self, level: f64) {
        let applied = self.queue.with_mut(|q| q.set_volume(level));
        if (self.settings.peek().volume - applied).abs() > f64::EPSILON {
            self.settings.with_mut(|s| s.volume = applied);
        }
    }

    pub fn clear(&mut self) {
        self.queue.with_mut(PlaybackQueue::clear);
        unload_stream();
    }

    fn stream_url(&self, track_id: TrackId) -> String {
        MediaClient::new(self.settings.peek().api_config()).stream_url(track_id)
    }

    fn apply(&self, transition: Transition) {
        let (current, playing) = {
            let queue = self.queue.peek();
            (queue.current(), queue.is_playing())
        };
        match transition {
            Transition::Changed => {
                if let Some(track_id) = current {
                    let url = self.stream_url(track_id);
                    debug!(track = %track_id, url = %url, "Loading stream");
                    load_stream(&url, playing);
                }
            }
            Transition::Restarted => seek_to(0.0),
            Transition::Stopped => pause_playback(),
            Transition::Unchanged => {}
        }
    }
}

/// Initialize the global audio element once
#[cfg(target_arch = "wasm32")]
pub fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(AUDIO_ELEMENT_ID) {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id(AUDIO_ELEMENT_ID);
    // Stream instead of buffering whole files
    audio.set_attribute("preload", "metadata").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

/// Point the element at a new stream. The source is always reassigned so
/// `loadedmetadata` fires again even for a repeated track.
#[cfg(target_arch = "wasm32")]
fn load_stream(url: &str, autoplay: bool) {
    if let Some(audio) = get_or_create_audio_element() {
        audio.set_src(url);
        audio.set_current_time(0.0);
        if autoplay {
            let _ = audio.play();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn unload_stream() {
    if let Some(audio) = get_or_create_audio_element() {
        let _ = audio.pause();
        let _ = audio.remove_attribute("src");
        audio.load();
    }
}

#[cfg(target_arch = "wasm32")]
fn pause_playback() {
    if let Some(audio) = get_or_create_audio_element() {
        let _ = audio.pause();
    }
}

/// Seek to a specific position in the current track
#[cfg(target_arch = "wasm32")]
pub fn seek_to(position: f64) {
    if let Some(audio) = get_or_create_audio_element() {
        audio.set_current_time(position);
    }
}

// Desktop webview bridge: the same hidden element, driven through `document::eval`.

#[cfg(not(target_arch = "wasm32"))]
const NATIVE_AUDIO_BOOTSTRAP_JS: &str = r#"
(() => {
  if (window.__mediaStreamerAudio) {
    return true;
  }

  const existing = document.getElementById("media-streamer-audio");
  const audio = existing || document.createElement("audio");
  if (!existing) {
    audio.id = "media-streamer-audio";
    audio.preload = "metadata";
    audio.style.display = "none";
    document.body.appendChild(audio);
  }

  const safePlay = async () => {
    try {
      await audio.play();
    } catch (_err) {}
  };

  const bridge = {
    audio,
    endedPending: false,
    apply(cmd) {
      if (!cmd || !cmd.type) return;

      switch (cmd.type) {
        case "load":
          audio.src = cmd.src;
          try {
            audio.currentTime = 0;
          } catch (_err) {}
          bridge.endedPending = false;
          if (cmd.play === true) {
            safePlay();
          }
          break;
        case "play":
          if (audio.paused && audio.src) safePlay();
          break;
        case "pause":
          audio.pause();
          break;
        case "seek":
          if (typeof cmd.position === "number" && Number.isFinite(cmd.position)) {
            try {
              audio.currentTime = Math.max(0, cmd.position);
            } catch (_err) {}
          }
          break;
        case "volume":
          if (typeof cmd.value === "number") {
            audio.volume = Math.max(0, Math.min(1, cmd.value));
          }
          break;
        case "clear":
          audio.pause();
          audio.removeAttribute("src");
          audio.load();
          bridge.endedPending = false;
          break;
      }
    },
    snapshot() {
      const ended = bridge.endedPending;
      bridge.endedPending = false;
      return {
        current_time: Number.isFinite(audio.currentTime) ? audio.currentTime : 0,
        duration: Number.isFinite(audio.duration) ? audio.duration : 0,
        paused: !!audio.paused,
        ended,
      };
    },
  };

  audio.addEventListener("ended", () => {
    bridge.endedPending = true;
  });

  window.__mediaStreamerAudio = bridge;
  return true;
})();
"#;

/// Milliseconds between bridge snapshots on desktop.
#[cfg(not(target_arch = "wasm32"))]
const NATIVE_POLL_MS: u64 = 250;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Deserialize)]
struct NativeAudioSnapshot {
    current_time: f64,
    duration: f64,
    paused: bool,
    ended: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn ensure_native_audio_bridge() {
    let _ = document::eval(NATIVE_AUDIO_BOOTSTRAP_JS);
}

#[cfg(not(target_arch = "wasm32"))]
fn native_audio_command(value: serde_json::Value) {
    ensure_native_audio_bridge();
    let script = format!(
        r#"(function () {{
            const bridge = window.__mediaStreamerAudio;
            if (!bridge) return false;
            bridge.apply({value});
            return true;
        }})();"#
    );
    let _ = document::eval(&script);
}

#[cfg(not(target_arch = "wasm32"))]
async fn native_audio_snapshot() -> Option<NativeAudioSnapshot> {
    let eval = document::eval(
        r#"return (function () {
            const bridge = window.__mediaStreamerAudio;
            if (!bridge) {
              return { current_time: 0, duration: 0, paused: true, ended: false };
            }
            return bridge.snapshot();
        })();"#,
    );
    eval.join::<NativeAudioSnapshot>().await.ok()
}

#[cfg(not(target_arch = "wasm32"))]
async fn native_delay_ms(ms: u64) {
    let script = format!(
        r#"return (async function () {{
            await new Promise(resolve => setTimeout(resolve, {ms}));
            return true;
        }})();"#
    );
    let _ = document::eval(&script).await;
}

#[cfg(not(target_arch = "wasm32"))]
fn load_command(url: &str, autoplay: bool) -> serde_json::Value {
    json!({ "type": "load", "src": url, "play": autoplay })
}

#[cfg(not(target_arch = "wasm32"))]
fn load_stream(url: &str, autoplay: bool) {
    native_audio_command(load_command(url, autoplay));
}

#[cfg(not(target_arch = "wasm32"))]
fn unload_stream() {
    native_audio_command(json!({ "type": "clear" }));
}

#[cfg(not(target_arch = "wasm32"))]
fn pause_playback() {
    native_audio_command(json!({ "type": "pause" }));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn seek_to(position: f64) {
    native_audio_command(json!({ "type": "seek", "position": position }));
}

/// Audio controller - polls the webview element and feeds it back into the queue
#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn AudioController() -> Element {
    let player = use_context::<PlayerController>();
    let queue = player.queue;

    let volume = use_memo(move || queue.read().volume());
    let is_playing = use_memo(move || queue.read().is_playing());

    use_effect(move || {
        ensure_native_audio_bridge();
        let mut player = player;
        let mut queue = queue;

        spawn(async move {
            loop {
                native_delay_ms(NATIVE_POLL_MS).await;

                let Some(snapshot) = native_audio_snapshot().await else {
                    continue;
                };

                let (known_duration, known_position) = {
                    let q = queue.peek();
                    (q.duration(), q.position())
                };
                if snapshot.duration > 0.0 && (snapshot.duration - known_duration).abs() > 0.01 {
                    debug!(duration = snapshot.duration, "Stream metadata loaded");
                    queue.with_mut(|q| q.set_duration(snapshot.duration));
                }
                if !snapshot.paused
                    && (snapshot.current_time - known_position).abs() >= POSITION_SYNC_INTERVAL
                {
                    queue.with_mut(|q| q.sync_position(snapshot.current_time));
                }
                if snapshot.ended {
                    player.track_ended();
                }
            }
        });
    });

    use_effect(move || {
        let kind = if is_playing() { "play" } else { "pause" };
        native_audio_command(json!({ "type": kind }));
    });

    use_effect(move || {
        native_audio_command(json!({ "type": "volume", "value": volume() }));
    });

    rsx! {}
}

/// Audio controller - wires element events into the queue
#[cfg(target_arch = "wasm32")]
#[component]
pub fn AudioController() -> Element {
    let player = use_context::<PlayerController>();
    let queue = player.queue;

    let volume = use_memo(move || queue.read().volume());
    let is_playing = use_memo(move || queue.read().is_playing());

    use_effect(move || {
        let Some(audio) = get_or_create_audio_element() else {
            return;
        };
        let runtime = Runtime::current();

        let mut last_emit = 0.0f64;
        let time_closure = {
            let runtime = runtime.clone();
            let mut queue = queue;
            Closure::wrap(Box::new(move || {
                let _guard = RuntimeGuard::new(runtime.clone());
                if let Some(audio) = get_or_create_audio_element() {
                    let time = audio.current_time();
                    if (time - last_emit).abs() >= POSITION_SYNC_INTERVAL {
                        last_emit = time;
                        queue.with_mut(|q| q.sync_position(time));
                    }
                }
            }) as Box<dyn FnMut()>)
        };
        audio.set_ontimeupdate(Some(time_closure.as_ref().unchecked_ref()));
        time_closure.forget();

        let dur_closure = {
            let runtime = runtime.clone();
            let mut queue = queue;
            Closure::wrap(Box::new(move || {
                let _guard = RuntimeGuard::new(runtime.clone());
                if let Some(audio) = get_or_create_audio_element() {
                    let duration = audio.duration();
                    debug!(duration, "Stream metadata loaded");
                    queue.with_mut(|q| q.set_duration(duration));
                }
            }) as Box<dyn FnMut()>)
        };
        audio.set_onloadedmetadata(Some(dur_closure.as_ref().unchecked_ref()));
        dur_closure.forget();

        let end_closure = {
            let mut player = player;
            Closure::wrap(Box::new(move || {
                let _guard = RuntimeGuard::new(runtime.clone());
                player.track_ended();
            }) as Box<dyn FnMut()>)
        };
        audio.set_onended(Some(end_closure.as_ref().unchecked_ref()));
        end_closure.forget();
    });

    use_effect(move || {
        let playing = is_playing();
        if let Some(audio) = get_or_create_audio_element() {
            if playing {
                if audio.paused() {
                    let _ = audio.play();
                }
            } else if !audio.paused() {
                let _ = audio.pause();
            }
        }
    });

    use_effect(move || {
        let level = volume();
        if let Some(audio) = get_or_create_audio_element() {
            audio.set_volume(level);
        }
    });

    rsx! {}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use dioxus::core::{Runtime, ScopeId, VirtualDom};

    /// Signals need a live runtime; checks run outside of any render so a
    /// failed assertion fails the test.
    fn with_controller<R>(f: impl FnOnce(PlayerController) -> R) -> R {
        let mut dom = VirtualDom::new(|| rsx! {});
        dom.rebuild_in_place();
        dom.in_runtime(|| {
            Runtime::current().in_scope(ScopeId::ROOT, || {
                let queue = Signal::new(PlaybackQueue::new());
                let settings = Signal::new(AppSettings {
                    api_url: "http://media.test:8000".into(),
                    volume: 0.8,
                });
                f(PlayerController::new(queue, settings))
            })
        })
    }

    fn ids(raw: &[u32]) -> Vec<TrackId> {
        raw.iter().copied().map(TrackId).collect()
    }

    #[test]
    fn stream_url_follows_settings() {
        let (url, config) = with_controller(|player| {
            (
                player.stream_url(TrackId(9)),
                player.settings.peek().api_config(),
            )
        });
        assert_eq!(url, "http://media.test:8000/stream/9");
        assert_eq!(config, ApiConfig::new("http://media.test:8000").unwrap());
    }

    #[test]
    fn controls_drive_the_queue() {
        with_controller(|mut player| {
            player.play_album(&ids(&[1, 2, 3]), 1).unwrap();
            assert_eq!(player.queue.peek().current(), Some(TrackId(2)));

            player.next();
            assert_eq!(player.queue.peek().current(), Some(TrackId(3)));

            player.track_ended();
            {
                let queue = player.queue.peek();
                assert!(!queue.is_playing());
                assert_eq!(queue.current(), Some(TrackId(3)));
                assert_eq!(queue.backward().iter().copied().collect::<Vec<_>>(), ids(&[3, 2, 1]));
            }

            // The finished track heads the history, so stepping back replays it.
            player.previous();
            {
                let queue = player.queue.peek();
                assert_eq!(queue.current(), Some(TrackId(3)));
                assert_eq!(queue.forward().iter().copied().collect::<Vec<_>>(), ids(&[3]));
                assert_eq!(queue.backward().iter().copied().collect::<Vec<_>>(), ids(&[2, 1]));
            }

            player.clear();
            assert_eq!(player.queue.peek().current(), None);
        });
    }

    #[test]
    fn previous_late_in_track_restarts_it() {
        let (current, position, forward) = with_controller(|mut player| {
            player.play_album(&ids(&[1, 2]), 1).unwrap();
            player.queue.with_mut(|q| {
                q.set_duration(200.0);
                q.sync_position(42.0);
            });
            player.previous();
            let queue = player.queue.peek();
            (queue.current(), queue.position(), queue.forward().len())
        });
        assert_eq!(current, Some(TrackId(2)));
        assert_eq!(position, 0.0);
        assert_eq!(forward, 0);
    }

    #[test]
    fn volume_is_written_back_to_settings() {
        let (queued, saved) = with_controller(|mut player| {
            player.set_volume(1.7);
            (player.queue.peek().volume(), player.settings.peek().volume)
        });
        assert_eq!(queued, 1.0);
        assert_eq!(saved, 1.0);
    }

    #[test]
    fn desktop_bridge_messages() {
        let command = load_command("http://media.test:8000/stream/4", true);
        assert_eq!(command["type"], "load");
        assert_eq!(command["src"], "http://media.test:8000/stream/4");
        assert_eq!(command["play"], true);

        let snapshot: NativeAudioSnapshot = serde_json::from_str(
            r#"{"current_time": 12.5, "duration": 180.0, "paused": false, "ended": true}"#,
        )
        .unwrap();
        assert_eq!(snapshot.current_time, 12.5);
        assert_eq!(snapshot.duration, 180.0);
        assert!(!snapshot.paused);
        assert!(snapshot.ended);
    }

    #[test]
    fn empty_album_is_rejected() {
        let result = with_controller(|mut player| player.play_album(&[], 0));
        assert_eq!(result, Err(QueueError::EmptyAlbum));
    }
}
