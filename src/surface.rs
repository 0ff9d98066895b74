//! What the controller can do to the page: the presentation side and the
//! navigation side.

use serde::{Deserialize, Serialize};

use crate::entities::{Endpoint, NavigationRequest};
use crate::fields::Highlight;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    SearchButton,
    PrimaryAction,
    LocationBanner,
}

impl Control {
    pub const ALL: [Control; 3] = [
        Control::SearchButton,
        Control::PrimaryAction,
        Control::LocationBanner,
    ];

    pub fn default_label(&self) -> &'static str {
        match self {
            Self::SearchButton => "Show Buses",
            Self::PrimaryAction => "Bus Stops Near Me",
            Self::LocationBanner => "Showing stops near your location",
        }
    }

    pub fn busy_label(&self) -> &'static str {
        match self {
            Self::SearchButton => "Searching...",
            Self::PrimaryAction => "Getting Location...",
            Self::LocationBanner => "Getting your location...",
        }
    }
}

pub const BUSY_OPACITY: f32 = 0.7;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub label: String,
    pub opacity: f32,
    pub enabled: bool,
}

impl ControlState {
    pub fn idle(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            opacity: 1.0,
            enabled: true,
        }
    }

    pub fn busy(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            opacity: BUSY_OPACITY,
            enabled: false,
        }
    }
}

pub trait Surface {
    fn set_field_text(&mut self, endpoint: Endpoint, text: &str);
    fn set_highlight(&mut self, endpoint: Endpoint, highlight: Highlight);
    fn focus(&mut self, endpoint: Endpoint);
    fn show_suggestions(&mut self, endpoint: Endpoint, items: &[String]);
    fn hide_suggestions(&mut self, endpoint: Endpoint);
    fn render_control(&mut self, control: Control, state: &ControlState);
    /// A blocking notice, like `alert()`.
    fn notify(&mut self, message: &str);
}

pub trait Navigator {
    fn navigate(&mut self, request: NavigationRequest);
}

/// A single outward effect, as recorded by [`EffectLog`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    FieldText { endpoint: Endpoint, text: String },
    Highlight { endpoint: Endpoint, highlight: Highlight },
    Focus { endpoint: Endpoint },
    ShowSuggestions { endpoint: Endpoint, items: Vec<String> },
    HideSuggestions { endpoint: Endpoint },
    Control { control: Control, state: ControlState },
    Notice { message: String },
    Navigate { request: NavigationRequest },
}

/// Records every effect in order. Works as both sides of the page.
#[derive(Clone, Debug, Default)]
pub struct EffectLog {
    pub effects: Vec<Effect>,
}

impl EffectLog {
    pub fn notices(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notice { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<&NavigationRequest> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Navigate { request } => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

impl Surface for EffectLog {
    fn set_field_text(&mut self, endpoint: Endpoint, text: &str) {
        self.effects.push(Effect::FieldText {
            endpoint,
            text: text.into(),
        });
    }

    fn set_highlight(&mut self, endpoint: Endpoint, highlight: Highlight) {
        self.effects.push(Effect::Highlight {
            endpoint,
            highlight,
        });
    }

    fn focus(&mut self, endpoint: Endpoint) {
        self.effects.push(Effect::Focus { endpoint });
    }

    fn show_suggestions(&mut self, endpoint: Endpoint, items: &[String]) {
        self.effects.push(Effect::ShowSuggestions {
            endpoint,
            items: items.to_vec(),
        });
    }

    fn hide_suggestions(&mut self, endpoint: Endpoint) {
        self.effects.push(Effect::HideSuggestions { endpoint });
    }

    fn render_control(&mut self, control: Control, state: &ControlState) {
        self.effects.push(Effect::Control {
            control,
            state: state.clone(),
        });
    }

    fn notify(&mut self, message: &str) {
        self.effects.push(Effect::Notice {
            message: message.into(),
        });
    }
}

impl Navigator for EffectLog {
    fn navigate(&mut self, request: NavigationRequest) {
        self.effects.push(Effect::Navigate { request });
    }
}

#[test]
fn effect_log_filters_by_kind() {
    use crate::entities::Page;

    let mut log = EffectLog::default();
    log.notify("first");
    log.focus(Endpoint::End);
    log.navigate(NavigationRequest::new(Page::Help));
    log.notify("second");

    assert_eq!(log.notices(), vec!["first", "second"]);
    assert_eq!(log.navigations().len(), 1);
    assert_eq!(log.drain().len(), 4);
    assert!(log.effects.is_empty());
}

#[test]
fn effects_serialize_with_a_tag() {
    let effect = Effect::HideSuggestions {
        endpoint: Endpoint::End,
    };

    assert_eq!(
        serde_json::to_string(&effect).unwrap(),
        r#"{"effect":"hide_suggestions","endpoint":"end"}"#
    );
}
