use async_trait::async_trait;
use std::env;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};

use wayfinder::entities::{Coordinates, Endpoint, NavigationRequest};
use wayfinder::error::{channel_closed_error, invalid_config_error, invalid_event_error, Error};
use wayfinder::fields::Highlight;
use wayfinder::geolocation::GeolocationPlatform;
use wayfinder::surface::{Control, ControlState, Effect, Navigator, Surface};
use wayfinder::{telemetry, Config, Controller, UiEvent};

/// Position source configured by `WAYFINDER_POSITION`.
enum EnvPlatform {
    Unavailable,
    Denied,
    Fixed(Coordinates),
}

impl EnvPlatform {
    fn from_env() -> Result<Self, Error> {
        let value = match env::var("WAYFINDER_POSITION") {
            Ok(value) => value,
            Err(env::VarError::NotPresent) => return Ok(Self::Unavailable),
            Err(err) => return Err(err.into()),
        };

        if value.trim() == "denied" {
            return Ok(Self::Denied);
        }

        let (lat, lon) = value
            .split_once(',')
            .ok_or_else(|| invalid_config_error(&value))?;
        let lat: f64 = lat.trim().parse().map_err(invalid_config_error)?;
        let lon: f64 = lon.trim().parse().map_err(invalid_config_error)?;

        Ok(Self::Fixed(Coordinates::new(lat, lon)))
    }
}

#[async_trait(?Send)]
impl GeolocationPlatform for EnvPlatform {
    fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    async fn current_position(&self) -> Result<Coordinates, String> {
        match self {
            Self::Fixed(coordinates) => Ok(*coordinates),
            _ => Err("User denied Geolocation".into()),
        }
    }
}

/// Writes every effect to stdout as one JSON line.
struct StdoutPage;

impl StdoutPage {
    fn emit(&self, effect: Effect) {
        match serde_json::to_string(&effect) {
            Ok(line) => println!("{}", line),
            Err(err) => tracing::error!(%err, "could not serialize effect"),
        }
    }
}

impl Surface for StdoutPage {
    fn set_field_text(&mut self, endpoint: Endpoint, text: &str) {
        self.emit(Effect::FieldText {
            endpoint,
            text: text.into(),
        });
    }

    fn set_highlight(&mut self, endpoint: Endpoint, highlight: Highlight) {
        self.emit(Effect::Highlight {
            endpoint,
            highlight,
        });
    }

    fn focus(&mut self, endpoint: Endpoint) {
        self.emit(Effect::Focus { endpoint });
    }

    fn show_suggestions(&mut self, endpoint: Endpoint, items: &[String]) {
        self.emit(Effect::ShowSuggestions {
            endpoint,
            items: items.to_vec(),
        });
    }

    fn hide_suggestions(&mut self, endpoint: Endpoint) {
        self.emit(Effect::HideSuggestions { endpoint });
    }

    fn render_control(&mut self, control: Control, state: &ControlState) {
        self.emit(Effect::Control {
            control,
            state: state.clone(),
        });
    }

    fn notify(&mut self, message: &str) {
        self.emit(Effect::Notice {
            message: message.into(),
        });
    }
}

impl Navigator for StdoutPage {
    fn navigate(&mut self, request: NavigationRequest) {
        self.emit(Effect::Navigate { request });
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    telemetry::init();

    let config = Config::from_env()?;
    let platform = Rc::new(EnvPlatform::from_env()?);
    let mut controller = Controller::new(config, platform, StdoutPage, StdoutPage);

    let (tx, rx) = async_channel::unbounded();

    // one JSON event per line; the session ends at EOF
    let reader = async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await.map_err(invalid_event_error)? {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<UiEvent>(&line) {
                Ok(event) => tx.send(event).await.map_err(|_| channel_closed_error())?,
                Err(err) => {
                    let err: Error = err.into();
                    tracing::warn!(%err, "skipping event");
                }
            }
        }

        Ok::<(), Error>(())
    };

    let (read, ()) = tokio::join!(reader, controller.run(rx));

    read
}
