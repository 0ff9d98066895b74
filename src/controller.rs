//! The interaction controller: owns both location fields and their
//! suggestion lists, and turns page events into field updates, geolocation
//! requests and navigation.
//!
//! Everything runs on one task. Geolocation requests and delayed actions are
//! kept as pending futures and deadlines inside [`Controller::run`], so a
//! slow position fix never blocks the handling of later events.

use async_channel::Receiver;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use uuid::Uuid;

use crate::config::{Config, StalePolicy};
use crate::entities::{Endpoint, LocationEndpoint, NavigationRequest};
use crate::error::{geolocation_denied_error, geolocation_unsupported_error, ValidationError};
use crate::fields::{Highlight, LocationFields};
use crate::geolocation::{DenialReason, Gateway, GeolocationPlatform, Outcome, RequestToken};
use crate::search;
use crate::suggestions::SuggestionEngine;
use crate::surface::{Control, ControlState, Navigator, Surface};
use crate::telemetry::track_event;

pub const LOCATION_UPDATED: &str = "Location updated!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Other,
}

/// Which explicit "locate me" control was used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateTrigger {
    PrimaryAction,
    Banner,
}

impl LocateTrigger {
    pub fn control(&self) -> Control {
        match self {
            Self::PrimaryAction => Control::PrimaryAction,
            Self::Banner => Control::LocationBanner,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    Focus { endpoint: Endpoint },
    Blur { endpoint: Endpoint },
    Input { endpoint: Endpoint, text: String },
    KeyPress { endpoint: Endpoint, key: Key },
    SuggestionClick { endpoint: Endpoint, index: usize },
    /// A click anywhere on the page; `inside` names the field whose wrapper
    /// contains the target, if any.
    DocumentClick { inside: Option<Endpoint> },
    Submit,
    Swap,
    Locate { trigger: LocateTrigger },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SuggestionState {
    Hidden,
    Open(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
}

/// What a geolocation request was made for, captured when it was issued.
#[derive(Debug)]
enum Purpose {
    Fill(Endpoint),
    Locate {
        trigger: LocateTrigger,
        original: ControlState,
    },
}

#[derive(Debug)]
struct Resolution {
    token: RequestToken,
    purpose: Purpose,
    outcome: Outcome,
}

#[derive(Debug)]
enum Deferred {
    Refresh(Endpoint),
    Navigate {
        request: NavigationRequest,
        control: Control,
        original: ControlState,
    },
}

#[derive(Debug)]
struct Timer {
    deadline: Instant,
    action: Deferred,
}

pub struct Controller<S: Surface, N: Navigator> {
    config: Config,
    gateway: Gateway,
    engine: SuggestionEngine,
    fields: LocationFields,
    suggestions: HashMap<Endpoint, SuggestionState>,
    controls: HashMap<Control, ControlState>,
    submit: SubmitState,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Resolution>>,
    timers: Vec<Timer>,
    surface: S,
    navigator: N,
}

impl<S: Surface, N: Navigator> Controller<S, N> {
    pub fn new(
        config: Config,
        platform: Rc<dyn GeolocationPlatform>,
        surface: S,
        navigator: N,
    ) -> Self {
        let engine = SuggestionEngine::new(config.suggestion_min_length, config.suggestion_limit);

        Self {
            config,
            gateway: Gateway::new(platform),
            engine,
            fields: LocationFields::new(),
            suggestions: Endpoint::ALL
                .iter()
                .map(|e| (*e, SuggestionState::Hidden))
                .collect(),
            controls: Control::ALL
                .iter()
                .map(|c| (*c, ControlState::idle(c.default_label())))
                .collect(),
            submit: SubmitState::Idle,
            in_flight: FuturesUnordered::new(),
            timers: vec![],
            surface,
            navigator,
        }
    }

    /// Replaces the resting label of a control, e.g. the banner's page text.
    pub fn with_control_label(mut self, control: Control, label: impl Into<String>) -> Self {
        self.controls.insert(control, ControlState::idle(label));
        self
    }

    pub fn fields(&self) -> &LocationFields {
        &self.fields
    }

    pub fn field(&self, endpoint: Endpoint) -> &LocationEndpoint {
        self.fields.get(endpoint)
    }

    pub fn control(&self, control: Control) -> &ControlState {
        &self.controls[&control]
    }

    pub fn suggestions(&self, endpoint: Endpoint) -> &SuggestionState {
        &self.suggestions[&endpoint]
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit
    }

    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Processes events in arrival order until the channel closes, then
    /// finishes outstanding geolocation requests and delayed actions.
    pub async fn run(&mut self, events: Receiver<UiEvent>) {
        let mut open = true;

        loop {
            if !open && self.in_flight.is_empty() && self.timers.is_empty() {
                tracing::debug!("session drained");
                return;
            }

            let deadline = self.next_deadline();

            tokio::select! {
                biased;
                event = events.recv(), if open => match event {
                    Ok(event) => self.handle(event),
                    Err(_) => open = false,
                },
                Some(resolution) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.resolve(resolution)
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_due_timers()
                }
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Focus { endpoint } => self.focus(endpoint),
            UiEvent::Blur { endpoint } => {
                let highlight = self.fields.highlight(endpoint);
                self.surface.set_highlight(endpoint, highlight);
            }
            UiEvent::Input { endpoint, text } => self.input(endpoint, text),
            UiEvent::KeyPress { key: Key::Enter, .. } => self.submit(),
            UiEvent::KeyPress { .. } => {}
            UiEvent::SuggestionClick { endpoint, index } => self.select_suggestion(endpoint, index),
            UiEvent::DocumentClick { inside } => {
                for endpoint in Endpoint::ALL {
                    if inside != Some(endpoint) {
                        self.hide_suggestions(endpoint);
                    }
                }
            }
            UiEvent::Submit => self.submit(),
            UiEvent::Swap => self.swap(),
            UiEvent::Locate { trigger } => self.locate(trigger),
        }
    }

    fn focus(&mut self, endpoint: Endpoint) {
        self.surface.set_highlight(endpoint, Highlight::Valid);

        if endpoint == Endpoint::Start && self.fields.is_placeholder(endpoint) {
            self.request_position(Purpose::Fill(endpoint));
        }
    }

    fn input(&mut self, endpoint: Endpoint, text: String) {
        let length = text.chars().count();
        self.fields.set_from_text(endpoint, text);
        self.timers
            .retain(|timer| !matches!(timer.action, Deferred::Refresh(e) if e == endpoint));

        if length < self.engine.min_length() {
            self.hide_suggestions(endpoint);
        } else if self.config.suggestion_debounce.is_zero() {
            self.refresh_suggestions(endpoint);
        } else {
            self.schedule(self.config.suggestion_debounce, Deferred::Refresh(endpoint));
        }
    }

    fn refresh_suggestions(&mut self, endpoint: Endpoint) {
        let text = self.fields.get(endpoint).entered_text().unwrap_or_default();
        let items = self.engine.query(text);

        if items.is_empty() {
            self.hide_suggestions(endpoint);
            return;
        }

        self.surface.show_suggestions(endpoint, &items);
        self.suggestions.insert(endpoint, SuggestionState::Open(items));
    }

    fn hide_suggestions(&mut self, endpoint: Endpoint) {
        let open = matches!(self.suggestions[&endpoint], SuggestionState::Open(_));

        if open {
            self.suggestions.insert(endpoint, SuggestionState::Hidden);
            self.surface.hide_suggestions(endpoint);
        }
    }

    fn select_suggestion(&mut self, endpoint: Endpoint, index: usize) {
        let choice = match &self.suggestions[&endpoint] {
            SuggestionState::Open(items) => items.get(index).cloned(),
            SuggestionState::Hidden => None,
        };

        let Some(choice) = choice else {
            tracing::debug!(?endpoint, index, "no suggestion at index");
            return;
        };

        self.surface.set_field_text(endpoint, &choice);
        self.fields.set_from_text(endpoint, choice);
        self.hide_suggestions(endpoint);
    }

    fn swap(&mut self) {
        self.fields.swap();

        for endpoint in Endpoint::ALL {
            let text = self.fields.display_text(endpoint).to_string();
            self.surface.set_field_text(endpoint, &text);
        }
    }

    fn submit(&mut self) {
        track_event("Search", "click", "Show Buses");

        if self.submit != SubmitState::Idle {
            tracing::debug!(state = ?self.submit, "search already in progress");
            return;
        }

        self.submit = SubmitState::Validating;

        let query = search::build(
            self.fields.get(Endpoint::Start),
            self.fields.get(Endpoint::End),
        );

        match query {
            Err(err) => {
                tracing::info!(%err, "search rejected");
                self.surface.notify(&err.to_string());
                self.surface.focus(match err {
                    ValidationError::MissingOrigin => Endpoint::Start,
                    ValidationError::MissingDestination => Endpoint::End,
                });
                self.submit = SubmitState::Idle;
            }
            Ok(query) => {
                tracing::info!(from = query.from(), to = query.to(), "searching");
                self.submit = SubmitState::Submitting;

                let control = Control::SearchButton;
                let original = self.control(control).clone();
                self.set_control(control, ControlState::busy(control.busy_label()));
                self.schedule(
                    self.config.submit_delay,
                    Deferred::Navigate {
                        request: query.into_navigation(),
                        control,
                        original,
                    },
                );
            }
        }
    }

    fn locate(&mut self, trigger: LocateTrigger) {
        if trigger == LocateTrigger::PrimaryAction {
            track_event("Location", "click", "Bus Stops Near Me");
        }

        let control = trigger.control();
        let original = self.control(control).clone();

        if !original.enabled {
            tracing::debug!(?control, "location request already in progress");
            return;
        }

        if !self.gateway.is_available() {
            self.surface.notify(&geolocation_unsupported_error().message);
            return;
        }

        self.set_control(control, ControlState::busy(control.busy_label()));
        self.request_position(Purpose::Locate { trigger, original });
    }

    fn request_position(&mut self, purpose: Purpose) {
        let token = Uuid::new_v4();

        if let Purpose::Fill(endpoint) = purpose {
            self.fields.mark_pending(endpoint, token);
        }

        tracing::debug!(%token, ?purpose, "requesting position");

        let request = self.gateway.request_current_position(token);
        self.in_flight.push(
            request
                .map(move |outcome| Resolution {
                    token,
                    purpose,
                    outcome,
                })
                .boxed_local(),
        );
    }

    fn resolve(&mut self, resolution: Resolution) {
        let Resolution {
            token,
            purpose,
            outcome,
        } = resolution;

        match purpose {
            Purpose::Fill(endpoint) => self.resolve_fill(endpoint, token, outcome),
            Purpose::Locate { trigger, original } => {
                self.resolve_locate(trigger, original, outcome)
            }
        }
    }

    fn resolve_fill(&mut self, endpoint: Endpoint, token: RequestToken, outcome: Outcome) {
        let current = self.fields.is_current(endpoint, token);
        self.fields.settle(endpoint, token);

        match outcome {
            Outcome::Resolved { coordinates } => {
                if !current && self.config.stale_policy == StalePolicy::DiscardStale {
                    tracing::debug!(%token, ?endpoint, "discarding stale position");
                    return;
                }

                let text = coordinates.render();
                self.surface.set_field_text(endpoint, &text);
                self.fields.set_from_coordinates(endpoint, coordinates, text);
            }
            Outcome::Denied { reason } => {
                tracing::warn!(%token, ?endpoint, %reason, "could not get location");
            }
        }
    }

    fn resolve_locate(&mut self, trigger: LocateTrigger, original: ControlState, outcome: Outcome) {
        let control = trigger.control();

        match outcome {
            Outcome::Resolved { coordinates } => {
                let request = NavigationRequest::nearby_stops(coordinates);

                match trigger {
                    LocateTrigger::PrimaryAction => self.dispatch(request, control, original),
                    LocateTrigger::Banner => {
                        self.set_control(control, ControlState::busy(LOCATION_UPDATED));
                        self.schedule(
                            self.config.banner_delay,
                            Deferred::Navigate {
                                request: request.param("updated", "true"),
                                control,
                                original,
                            },
                        );
                    }
                }
            }
            Outcome::Denied { reason } => {
                tracing::warn!(?control, %reason, "could not get location");

                let notice = match reason {
                    DenialReason::Unsupported => geolocation_unsupported_error(),
                    DenialReason::Platform(_) => geolocation_denied_error(),
                };
                self.surface.notify(&notice.message);
                self.set_control(control, original);
            }
        }
    }

    fn dispatch(&mut self, request: NavigationRequest, control: Control, original: ControlState) {
        match request.path() {
            Ok(path) => tracing::info!(%path, "navigating"),
            Err(err) => tracing::warn!(%err, "navigating to unrenderable path"),
        }

        self.navigator.navigate(request);
        self.set_control(control, original);

        if control == Control::SearchButton {
            self.submit = SubmitState::Idle;
        }
    }

    fn set_control(&mut self, control: Control, state: ControlState) {
        self.surface.render_control(control, &state);
        self.controls.insert(control, state);
    }

    fn schedule(&mut self, delay: Duration, action: Deferred) {
        self.timers.push(Timer {
            deadline: Instant::now() + delay,
            action,
        });
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|timer| timer.deadline).min()
    }

    fn fire_due_timers(&mut self) {
        let now = Instant::now();
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|timer| timer.deadline <= now);
        self.timers = pending;
        due.sort_by_key(|timer| timer.deadline);

        for timer in due {
            match timer.action {
                Deferred::Refresh(endpoint) => self.refresh_suggestions(endpoint),
                Deferred::Navigate {
                    request,
                    control,
                    original,
                } => self.dispatch(request, control, original),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinates;
    use crate::geolocation::testing::FakePlatform;
    use crate::surface::{Effect, EffectLog};
    use tokio_test::block_on;

    type TestController = Controller<EffectLog, EffectLog>;

    fn controller_with(config: Config, platform: FakePlatform) -> (TestController, Rc<FakePlatform>) {
        let platform = Rc::new(platform);
        let controller = Controller::new(
            config,
            platform.clone(),
            EffectLog::default(),
            EffectLog::default(),
        );

        (controller, platform)
    }

    fn controller(platform: FakePlatform) -> (TestController, Rc<FakePlatform>) {
        controller_with(Config::immediate(), platform)
    }

    fn run(controller: &mut TestController, events: Vec<UiEvent>) {
        let (tx, rx) = async_channel::unbounded();
        for event in events {
            tx.try_send(event).unwrap();
        }
        drop(tx);

        block_on(controller.run(rx));
    }

    fn input(endpoint: Endpoint, text: &str) -> UiEvent {
        UiEvent::Input {
            endpoint,
            text: text.into(),
        }
    }

    fn params(request: &NavigationRequest) -> Vec<(&str, &str)> {
        request
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    const PRIMARY: UiEvent = UiEvent::Locate {
        trigger: LocateTrigger::PrimaryAction,
    };

    #[test]
    fn primary_action_navigates_to_nearby_stops() {
        let (mut c, _) = controller(FakePlatform::resolving(12.9716, 77.5946));

        run(&mut c, vec![PRIMARY]);

        let navigations = c.navigator().navigations();
        assert_eq!(navigations.len(), 1);
        assert_eq!(navigations[0].page, crate::entities::Page::NearbyStops);
        assert_eq!(
            params(navigations[0]),
            vec![("lat", "12.9716"), ("lon", "77.5946")]
        );
        assert!(c.surface().notices().is_empty());
    }

    #[test]
    fn primary_action_denial_restores_the_control() {
        let (mut c, platform) = controller(FakePlatform::denying("User denied Geolocation"));
        let before = c.control(Control::PrimaryAction).clone();

        run(&mut c, vec![PRIMARY]);

        assert_eq!(c.control(Control::PrimaryAction), &before);
        assert!(c.control(Control::PrimaryAction).enabled);
        assert_eq!(c.control(Control::PrimaryAction).opacity, 1.0);
        assert_eq!(
            c.surface().notices(),
            vec!["Unable to get your location. Please enable location services and try again."]
        );
        assert_eq!(
            c.surface().effects[0],
            Effect::Control {
                control: Control::PrimaryAction,
                state: ControlState::busy("Getting Location..."),
            }
        );
        assert!(c.navigator().navigations().is_empty());

        // still clickable afterwards
        platform.push(Ok(Coordinates::new(1.0, 2.0)));
        run(&mut c, vec![PRIMARY]);
        assert_eq!(platform.calls.get(), 2);
        assert_eq!(c.navigator().navigations().len(), 1);
    }

    #[test]
    fn unsupported_platform_alerts_without_touching_the_control() {
        let (mut c, platform) = controller(FakePlatform::unavailable());

        run(&mut c, vec![PRIMARY]);

        assert_eq!(
            c.surface().notices(),
            vec!["Geolocation is not supported by your browser."]
        );
        assert_eq!(c.surface().effects.len(), 1);
        assert_eq!(platform.calls.get(), 0);
        assert!(c.control(Control::PrimaryAction).enabled);
    }

    #[test]
    fn banner_reports_success_then_navigates_with_updated_flag() {
        let (c, _) = controller(FakePlatform::resolving(48.85, 2.35));
        let mut c = c.with_control_label(Control::LocationBanner, "Near Old Town");

        run(
            &mut c,
            vec![UiEvent::Locate {
                trigger: LocateTrigger::Banner,
            }],
        );

        let labels: Vec<&str> = c
            .surface()
            .effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Control { state, .. } => Some(state.label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            labels,
            vec!["Getting your location...", LOCATION_UPDATED, "Near Old Town"]
        );

        let navigations = c.navigator().navigations();
        assert_eq!(
            navigations[0].path().unwrap(),
            "nearby-stops.html?lat=48.85&lon=2.35&updated=true"
        );
    }

    #[test]
    fn focus_fills_start_and_submit_carries_coordinates() {
        let (mut c, _) = controller(FakePlatform::resolving(12.9716, 77.5946));

        run(
            &mut c,
            vec![
                UiEvent::Focus {
                    endpoint: Endpoint::Start,
                },
                input(Endpoint::End, "Museum District"),
            ],
        );
        assert_eq!(
            c.fields().display_text(Endpoint::Start),
            "Current Location (12.9716, 77.5946)"
        );

        run(&mut c, vec![UiEvent::Submit]);

        let navigations = c.navigator().navigations();
        assert_eq!(navigations.len(), 1);
        assert_eq!(
            params(navigations[0]),
            vec![
                ("from", "Current Location (12.9716, 77.5946)"),
                ("to", "Museum District"),
                ("lat", "12.9716"),
                ("lon", "77.5946"),
            ]
        );
        assert!(navigations[0]
            .path()
            .unwrap()
            .starts_with("search-results.html?from=Current+Location"));
        assert_eq!(c.submit_state(), SubmitState::Idle);
        assert_eq!(c.control(Control::SearchButton), &ControlState::idle("Show Buses"));
    }

    #[test]
    fn passive_focus_denial_is_silent() {
        let (mut c, platform) = controller(FakePlatform::denying("timeout"));

        run(
            &mut c,
            vec![UiEvent::Focus {
                endpoint: Endpoint::Start,
            }],
        );

        assert_eq!(platform.calls.get(), 1);
        assert!(!c.field(Endpoint::Start).is_set());
        assert!(c.surface().notices().is_empty());
    }

    #[test]
    fn focus_on_filled_or_end_field_does_not_locate() {
        let (mut c, platform) = controller(FakePlatform::resolving(1.0, 1.0));

        run(
            &mut c,
            vec![
                UiEvent::Focus {
                    endpoint: Endpoint::End,
                },
                input(Endpoint::Start, "Old Town"),
                UiEvent::Focus {
                    endpoint: Endpoint::Start,
                },
            ],
        );

        assert_eq!(platform.calls.get(), 0);
        assert_eq!(c.pending_requests(), 0);
    }

    #[test]
    fn validation_failures_notify_and_focus() {
        let (mut c, _) = controller(FakePlatform::default());

        run(&mut c, vec![input(Endpoint::End, "Airport"), UiEvent::Submit]);
        assert_eq!(
            c.surface().notices(),
            vec!["Please enter or select your starting location"]
        );
        assert!(c
            .surface()
            .effects
            .contains(&Effect::Focus { endpoint: Endpoint::Start }));

        run(
            &mut c,
            vec![
                input(Endpoint::Start, "Old Town"),
                input(Endpoint::End, "Enter destination"),
                UiEvent::Submit,
            ],
        );
        assert_eq!(c.surface().notices()[1], "Please enter your destination");
        assert!(c.navigator().navigations().is_empty());
        assert_eq!(c.submit_state(), SubmitState::Idle);
    }

    #[test]
    fn repeated_submits_while_busy_are_ignored() {
        let (mut c, _) = controller(FakePlatform::default());

        run(
            &mut c,
            vec![
                input(Endpoint::Start, "Old Town"),
                input(Endpoint::End, "City Hall"),
                UiEvent::Submit,
                UiEvent::Submit,
                UiEvent::KeyPress {
                    endpoint: Endpoint::End,
                    key: Key::Enter,
                },
            ],
        );

        let navigations = c.navigator().navigations();
        assert_eq!(navigations.len(), 1);
        assert_eq!(
            navigations[0].path().unwrap(),
            "search-results.html?from=Old+Town&to=City+Hall&lat=&lon="
        );
    }

    #[test]
    fn search_button_is_busy_for_the_submit_delay() {
        let config = Config {
            submit_delay: Duration::from_millis(50),
            ..Config::immediate()
        };
        let (mut c, _) = controller_with(config, FakePlatform::default());
        let started = std::time::Instant::now();

        run(
            &mut c,
            vec![
                input(Endpoint::Start, "Old Town"),
                input(Endpoint::End, "Airport"),
                UiEvent::KeyPress {
                    endpoint: Endpoint::Start,
                    key: Key::Enter,
                },
            ],
        );

        assert!(started.elapsed() >= Duration::from_millis(50));
        let effects = &c.surface().effects;
        assert!(effects.contains(&Effect::Control {
            control: Control::SearchButton,
            state: ControlState::busy("Searching..."),
        }));
        assert_eq!(
            effects.last(),
            Some(&Effect::Control {
                control: Control::SearchButton,
                state: ControlState::idle("Show Buses"),
            })
        );
    }

    #[test]
    fn suggestions_open_select_and_hide() {
        let (mut c, _) = controller(FakePlatform::default());

        run(&mut c, vec![input(Endpoint::End, "PARK")]);
        assert_eq!(
            c.suggestions(Endpoint::End),
            &SuggestionState::Open(vec!["Central Park".into(), "Lake View Park".into()])
        );

        run(
            &mut c,
            vec![UiEvent::SuggestionClick {
                endpoint: Endpoint::End,
                index: 1,
            }],
        );
        assert_eq!(c.suggestions(Endpoint::End), &SuggestionState::Hidden);
        assert_eq!(c.fields().display_text(Endpoint::End), "Lake View Park");
        assert!(c.surface().effects.contains(&Effect::FieldText {
            endpoint: Endpoint::End,
            text: "Lake View Park".into(),
        }));

        run(&mut c, vec![input(Endpoint::End, "zz")]);
        assert_eq!(c.suggestions(Endpoint::End), &SuggestionState::Hidden);

        run(&mut c, vec![input(Endpoint::End, "ar"), input(Endpoint::End, "a")]);
        assert_eq!(c.suggestions(Endpoint::End), &SuggestionState::Hidden);
        assert_eq!(
            c.surface().effects.last(),
            Some(&Effect::HideSuggestions {
                endpoint: Endpoint::End
            })
        );
    }

    #[test]
    fn outside_click_hides_only_other_fields() {
        let (mut c, _) = controller(FakePlatform::default());

        run(
            &mut c,
            vec![
                input(Endpoint::End, "ar"),
                UiEvent::DocumentClick {
                    inside: Some(Endpoint::End),
                },
            ],
        );
        assert!(matches!(c.suggestions(Endpoint::End), SuggestionState::Open(items) if items.len() == 5));

        run(&mut c, vec![UiEvent::DocumentClick { inside: None }]);
        assert_eq!(c.suggestions(Endpoint::End), &SuggestionState::Hidden);
    }

    #[test]
    fn debounced_input_only_queries_the_latest_text() {
        let config = Config {
            suggestion_debounce: Duration::from_millis(30),
            ..Config::immediate()
        };
        let (mut c, _) = controller_with(config, FakePlatform::default());

        run(
            &mut c,
            vec![input(Endpoint::End, "ci"), input(Endpoint::End, "city h")],
        );

        let shown: Vec<&Vec<String>> = c
            .surface()
            .effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::ShowSuggestions { items, .. } => Some(items),
                _ => None,
            })
            .collect();
        assert_eq!(shown, vec![&vec!["City Hall".to_string()]]);
    }

    #[test]
    fn resolution_after_swap_applies_to_the_requesting_field() {
        let (mut c, _) = controller(FakePlatform::resolving(12.9716, 77.5946));

        run(
            &mut c,
            vec![
                input(Endpoint::End, "Museum District"),
                UiEvent::Focus {
                    endpoint: Endpoint::Start,
                },
                UiEvent::Swap,
            ],
        );

        assert_eq!(
            c.field(Endpoint::Start).coordinates(),
            Some(Coordinates::new(12.9716, 77.5946))
        );
        assert!(!c.field(Endpoint::End).is_set());
    }

    #[test]
    fn stale_resolution_is_discarded_when_configured() {
        let config = Config {
            stale_policy: StalePolicy::DiscardStale,
            ..Config::immediate()
        };
        let (mut c, _) = controller_with(config, FakePlatform::resolving(1.0, 2.0));

        run(
            &mut c,
            vec![
                UiEvent::Focus {
                    endpoint: Endpoint::Start,
                },
                input(Endpoint::Start, "Old Town"),
            ],
        );

        assert_eq!(c.fields().display_text(Endpoint::Start), "Old Town");
        assert_eq!(c.field(Endpoint::Start).coordinates(), None);
    }

    #[test]
    fn late_resolution_overwrites_an_edit_by_default() {
        let (mut c, _) = controller(FakePlatform::resolving(1.0, 2.0));

        run(
            &mut c,
            vec![
                UiEvent::Focus {
                    endpoint: Endpoint::Start,
                },
                input(Endpoint::Start, "Old Town"),
            ],
        );

        assert_eq!(
            c.field(Endpoint::Start).coordinates(),
            Some(Coordinates::new(1.0, 2.0))
        );
    }

    #[test]
    fn swap_updates_both_displayed_values() {
        let (mut c, _) = controller(FakePlatform::default());

        run(&mut c, vec![input(Endpoint::Start, "Old Town"), UiEvent::Swap]);

        assert_eq!(
            c.surface().effects[c.surface().effects.len() - 2..],
            [
                Effect::FieldText {
                    endpoint: Endpoint::Start,
                    text: "My Location".into(),
                },
                Effect::FieldText {
                    endpoint: Endpoint::End,
                    text: "Old Town".into(),
                },
            ]
        );
    }

    #[test]
    fn blur_marks_placeholder_fields_invalid() {
        let (mut c, _) = controller(FakePlatform::default());

        run(
            &mut c,
            vec![
                UiEvent::Blur {
                    endpoint: Endpoint::End,
                },
                UiEvent::Focus {
                    endpoint: Endpoint::End,
                },
            ],
        );

        assert_eq!(
            c.surface().effects,
            vec![
                Effect::Highlight {
                    endpoint: Endpoint::End,
                    highlight: Highlight::Invalid,
                },
                Effect::Highlight {
                    endpoint: Endpoint::End,
                    highlight: Highlight::Valid,
                },
            ]
        );
    }
}
