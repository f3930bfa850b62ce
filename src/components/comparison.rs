//! Comparison rounds owned by the app shell.
//! Rounds run as app-lifetime tasks, so leaving the compare page never strands
//! the state in `Loading` or `Submitting`.

use crate::api::{AlbumId, MediaClient};
use crate::compare::{self, ComparisonState, VotePhase};
use crate::db::AppSettings;
use dioxus::core::spawn_forever;
use dioxus::prelude::*;

#[derive(Clone, Copy, PartialEq)]
pub struct ComparisonController {
    pub state: Signal<ComparisonState>,
    settings: Signal<AppSettings>,
}

impl ComparisonController {
    pub fn new(state: Signal<ComparisonState>, settings: Signal<AppSettings>) -> Self {
        Self { state, settings }
    }

    /// Fetch a pair unless one is held or already on its way.
    pub fn ensure_pair(&self) {
        let needs_pair = {
            let state = self.state.peek();
            state.phase() == VotePhase::Idle && state.pair().is_none()
        };
        if needs_pair {
            self.load_pair();
        }
    }

    pub fn load_pair(&self) {
        let client = self.client();
        let mut state = self.state;
        spawn_forever(async move {
            compare::fetch_pair(&client, &mut state).await;
        });
    }

    /// Vote for `winner` over the other album of the held pair.
    pub fn pick(&self, winner: AlbumId) {
        let Some(loser) = self
            .state
            .peek()
            .pair()
            .and_then(|pair| pair.opponent_of(winner))
        else {
            return;
        };
        let client = self.client();
        let mut state = self.state;
        spawn_forever(async move {
            // Failures are kept in the comparison state.
            let _ = compare::vote(&client, &mut state, winner, loser).await;
        });
    }

    pub fn reset(&mut self) {
        self.state.with_mut(ComparisonState::reset);
    }

    fn client(&self) -> MediaClient {
        MediaClient::new(self.settings.peek().api_config())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use dioxus::core::{NoOpMutations, Runtime, ScopeId, VirtualDom};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Clone, Copy)]
    struct PageVisible(Signal<bool>);

    #[component]
    fn Shell(api_url: String) -> Element {
        let settings = use_signal(|| AppSettings {
            api_url,
            volume: 0.8,
        });
        let state = use_signal(ComparisonState::default);
        let visible = use_signal(|| true);
        use_context_provider(|| ComparisonController::new(state, settings));
        use_context_provider(|| PageVisible(visible));
        // Subscribe so every state change wakes the dom.
        let _phase = state.read().phase();

        rsx! {
            if visible() {
                ComparePage {}
            }
        }
    }

    #[component]
    fn ComparePage() -> Element {
        let controller = use_context::<ComparisonController>();
        use_hook(move || controller.ensure_pair());
        rsx! {}
    }

    fn with_shell<R>(dom: &VirtualDom, f: impl FnOnce(ComparisonController, Signal<bool>) -> R) -> R {
        dom.in_runtime(|| {
            Runtime::current().in_scope(ScopeId::APP, || {
                f(
                    consume_context::<ComparisonController>(),
                    consume_context::<PageVisible>().0,
                )
            })
        })
    }

    fn album_json(id: u32) -> serde_json::Value {
        json!({ "album_id": id, "album_name": format!("Album {id}"), "album_rating": 1000.0 })
    }

    async fn settle(dom: &mut VirtualDom, done: impl Fn(&ComparisonState) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if with_shell(dom, |c, _| done(&c.state.peek())) {
                    break;
                }
                dom.wait_for_work().await;
                dom.render_immediate(&mut NoOpMutations);
            }
        })
        .await
        .expect("comparison round did not finish");
    }

    #[tokio::test]
    async fn round_finishes_after_leaving_the_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compare_albums"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "albums": [album_json(5), album_json(9)] }))
                    .set_delay(Duration::from_millis(150)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/update_rating"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(150)))
            .expect(1)
            .mount(&server)
            .await;

        let mut dom = VirtualDom::new_with_props(
            Shell,
            ShellProps {
                api_url: server.uri(),
            },
        );
        dom.rebuild_in_place();
        dom.wait_for_work().await;
        dom.render_immediate(&mut NoOpMutations);

        // Leave while the first pair is loading.
        with_shell(&dom, |c, mut visible| {
            assert_eq!(c.state.peek().phase(), VotePhase::Loading);
            visible.set(false);
        });
        dom.render_immediate(&mut NoOpMutations);
        settle(&mut dom, |s| s.phase() == VotePhase::Ready).await;
        with_shell(&dom, |c, _| assert!(c.state.peek().pair().is_some()));

        // Leave again while the vote is being saved.
        with_shell(&dom, |c, mut visible| {
            visible.set(true);
            c.pick(AlbumId(5));
        });
        dom.render_immediate(&mut NoOpMutations);
        dom.wait_for_work().await;
        dom.render_immediate(&mut NoOpMutations);
        with_shell(&dom, |c, mut visible| {
            assert_eq!(c.state.peek().phase(), VotePhase::Submitting);
            visible.set(false);
        });
        dom.render_immediate(&mut NoOpMutations);
        settle(&mut dom, |s| s.votes_cast() == 1 && s.phase() == VotePhase::Ready).await;
    }
}
