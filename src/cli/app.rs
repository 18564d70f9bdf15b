//! Main app runner for the listen and auth commands

use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::application::ports::{CaptureError, ResponsePlayer};
use crate::application::{AppContext, Preference, VoiceCommandSession, VoiceCycleOutput};
use crate::domain::preferences::{convert_weight, Units};
use crate::infrastructure::{
    ApiClient, CpalCapture, HttpCommandGateway, NoOpPlayer, RodioPlayer,
};

use super::args::ListenOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Record one voice command and run the command/response cycle
pub async fn run_listen(options: ListenOptions, ctx: &AppContext) -> ExitCode {
    let mut presenter = Presenter::new();

    if !ctx.credentials.is_authenticated().await {
        presenter.error("Not authenticated. Run 'repvox login' first.");
        return ExitCode::from(EXIT_ERROR);
    }

    // Acquire the microphone up front so a missing device fails before
    // anything else happens.
    let capture = match CpalCapture::open() {
        Ok(capture) => capture,
        Err(CaptureError::DeviceUnavailable(msg)) => {
            presenter.error(&format!("Microphone unavailable: {}", msg));
            presenter.info("Check that an input device is connected and accessible.");
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let api = ApiClient::new(ctx.api_url(), Arc::clone(&ctx.credentials));
    let gateway = Arc::new(HttpCommandGateway::new(api));
    let player: Arc<dyn ResponsePlayer> = if options.mute {
        Arc::new(NoOpPlayer::new())
    } else {
        Arc::new(RodioPlayer::new())
    };

    let session = VoiceCommandSession::new(Arc::new(capture), gateway, player);

    // Displayed weights follow the units preference for the whole session
    let (display_units, units_watch) = follow_units(&ctx.units);

    if let Err(e) = session.start_listening().await {
        presenter.error(&e.to_string());
        units_watch.abort();
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.start_spinner("Recording...");
    wait_for_stop(&presenter, options.hold_secs).await;

    presenter.update_spinner("Sending command...");
    let result = session.stop_listening().await;
    let _ = session.close().await;

    let exit = match result {
        Ok(Some(output)) => {
            presenter.spinner_success(&format!("Command sent ({})", output.upload_size));
            let units = *display_units.lock().unwrap();
            present_cycle(&presenter, &output, units);
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(None) => {
            presenter.stop_spinner();
            presenter.info("Nothing was recorded");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    };

    units_watch.abort();
    exit
}

/// Mirror the units preference into a cell the result formatting reads.
/// The subscriber applies the current value immediately, then every change.
fn follow_units(pref: &Preference<Units>) -> (Arc<Mutex<Units>>, JoinHandle<()>) {
    let cell = Arc::new(Mutex::new(pref.get()));
    let cell_clone = Arc::clone(&cell);
    let watch = pref.subscribe(move |units| {
        *cell_clone.lock().unwrap() = *units;
    });
    (cell, watch)
}

/// Block until Enter, Ctrl-C, or the hold timer elapses
async fn wait_for_stop(presenter: &Presenter, hold_secs: Option<u64>) {
    match hold_secs {
        Some(secs) => {
            let started = Instant::now();
            let deadline = tokio::time::sleep(Duration::from_secs(secs));
            tokio::pin!(deadline);
            let mut tick = tokio::time::interval(Duration::from_millis(100));
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tick.tick() => {
                        presenter.update_recording_progress(started.elapsed().as_millis() as u64);
                    }
                }
            }
        }
        None => {
            presenter.update_spinner("Recording... press Enter to stop");
            let mut line = String::new();
            let mut stdin = BufReader::new(tokio::io::stdin());
            tokio::select! {
                _ = stdin.read_line(&mut line) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
    }
}

/// Print one completed cycle: transcription, parsed command, reply
fn present_cycle(presenter: &Presenter, output: &VoiceCycleOutput, units: Units) {
    presenter.key_value("heard", &output.command.transcription);
    presenter.key_value("command", &output.command.kind);

    if let Some(params) = format_parameters(&output.command.parameters, units) {
        presenter.key_value("details", &params);
    }

    presenter.output(&output.command.response);

    if let Some(warning) = output.playback_warning.as_deref() {
        presenter.warn(warning);
    }
}

/// Render command parameters for display, converting weights (stored in kg)
/// into the preferred unit system.
fn format_parameters(params: &Value, units: Units) -> Option<String> {
    let obj = params.as_object()?;
    if obj.is_empty() {
        return None;
    }

    let parts: Vec<String> = obj
        .iter()
        .map(|(key, value)| match (key.as_str(), value.as_f64()) {
            ("weight", Some(kg)) => {
                let shown = convert_weight(kg, Units::Metric, units);
                format!("weight={:.1} {}", shown, units.weight_label())
            }
            _ => format!("{}={}", key, display_value(value)),
        })
        .collect();

    Some(parts.join(", "))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Store a backend access token
pub async fn run_login(token: Option<String>, ctx: &AppContext) -> ExitCode {
    let presenter = Presenter::new();

    let token = match token {
        Some(token) => token,
        None => {
            presenter.output_inline("Token: ");
            let mut line = String::new();
            let mut stdin = BufReader::new(tokio::io::stdin());
            if stdin.read_line(&mut line).await.is_err() {
                presenter.error("Failed to read token from stdin");
                return ExitCode::from(EXIT_ERROR);
            }
            line
        }
    };

    let token = token.trim();
    if token.is_empty() {
        presenter.error("Token must not be empty");
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    if let Err(e) = ctx.credentials.store(token).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.success("Logged in");
    ExitCode::from(EXIT_SUCCESS)
}

/// Discard the stored access token
pub async fn run_logout(ctx: &AppContext) -> ExitCode {
    let presenter = Presenter::new();

    if let Err(e) = ctx.credentials.clear().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.success("Logged out");
    ExitCode::from(EXIT_SUCCESS)
}

/// Show authentication and preference status
pub async fn run_status(ctx: &AppContext) -> ExitCode {
    let presenter = Presenter::new();

    let authenticated = if ctx.credentials.is_authenticated().await {
        "yes"
    } else {
        "no"
    };

    presenter.key_value("authenticated", authenticated);
    presenter.key_value("api_url", ctx.api_url());
    presenter.key_value("theme", ctx.theme.get().as_str());
    presenter.key_value("language", ctx.language.get().as_str());
    presenter.key_value("units", ctx.units.get().as_str());

    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_parameters_converts_weight_to_imperial() {
        let params = json!({"weight": 100.0});
        let shown = format_parameters(&params, Units::Imperial).unwrap();
        assert!(shown.contains("220.5 lbs"), "got: {}", shown);
    }

    #[test]
    fn format_parameters_keeps_metric_weight() {
        let params = json!({"weight": 82.5});
        let shown = format_parameters(&params, Units::Metric).unwrap();
        assert!(shown.contains("82.5 kg"), "got: {}", shown);
    }

    #[test]
    fn format_parameters_renders_plain_fields() {
        let params = json!({"exercise": "bench press", "reps": 8});
        let shown = format_parameters(&params, Units::Metric).unwrap();
        assert!(shown.contains("exercise=bench press"));
        assert!(shown.contains("reps=8"));
    }

    #[test]
    fn format_parameters_empty_object_is_none() {
        assert!(format_parameters(&json!({}), Units::Metric).is_none());
        assert!(format_parameters(&json!(null), Units::Metric).is_none());
    }

    #[tokio::test]
    async fn followed_units_track_preference_changes() {
        let pref = Preference::new(Units::Metric);
        let (cell, watch) = follow_units(&pref);

        // Seeded with the current value before the subscriber runs
        assert_eq!(*cell.lock().unwrap(), Units::Metric);

        pref.set(Units::Imperial);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*cell.lock().unwrap(), Units::Imperial);

        watch.abort();
    }
}
