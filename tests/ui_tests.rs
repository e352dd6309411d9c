//! UI automation tests using egui_kittest and AccessKit
//!
//! The window is driven through its accessibility tree: widgets are found
//! by label, clicked and typed into like a user would.

use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use medibot::assistant::SessionState;
use medibot::integration::MedibotConfig;
use medibot::messages::Message;
use medibot::ui::{AppState, MedibotApp, RUNNING_LABEL, START_LABEL, WELCOME_TEXT};
use std::time::{Duration, Instant};

fn text_only_app() -> MedibotApp {
    MedibotApp::with_state(AppState::new(
        MedibotConfig::default()
            .without_audio_input()
            .without_audio_output(),
    ))
}

fn harness(app: MedibotApp) -> Harness<'static, MedibotApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(800.0, 600.0))
        .build_state(|ctx, app: &mut MedibotApp| app.show(ctx), app)
}

fn wait_until_idle(app: &MedibotApp) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.state().is_running() {
        assert!(Instant::now() < deadline, "session did not finish");
        std::thread::sleep(Duration::from_millis(10));
    }
}

/// The window opens with the welcome line and an enabled start button
#[test]
fn test_initial_window() {
    let mut harness = harness(text_only_app());
    harness.run();

    let _welcome = harness.get_by_label(&format!("Medibot: {}", WELCOME_TEXT));
    let _start = harness.get_by_label(START_LABEL);
    let _title = harness.get_by_label("Medibot Health Assistant");
}

/// Text-only mode shows the command input
#[test]
fn test_text_only_input_exists() {
    let mut harness = harness(text_only_app());
    harness.run();

    let _input = harness.get_by_label("Command input");
    let _send = harness.get_by_label("Send command");
}

/// Messages posted by a session appear in the transcript in order
#[test]
fn test_posted_messages_appear() {
    let app = text_only_app();
    let display = app.state().display_sender();
    display.send(Message::user("what time is it")).unwrap();
    display.send(Message::assistant("The time is 09:05")).unwrap();
    display.send(Message::system("Couldn't open YouTube: no opener")).unwrap();

    let mut harness = harness(app);
    harness.run();

    let _heard = harness.get_by_label("You: what time is it");
    let _reply = harness.get_by_label("Medibot: The time is 09:05");
    let _error = harness.get_by_label("Couldn't open YouTube: no opener");
    assert_eq!(harness.state().state().transcript.len(), 4);
}

/// The start button is relabelled and disabled while a session runs
#[test]
fn test_button_while_running() {
    let app = text_only_app();
    let trigger = app.state().trigger.clone();

    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
    let worker = trigger
        .start(move || {
            let _ = release_rx.recv();
            Err(medibot::MedibotError::SessionError("held open".into()))
        })
        .unwrap();

    let mut harness = harness(app);
    harness.run();

    let _running = harness.get_by_label(RUNNING_LABEL);
    assert!(harness.query_by_label(START_LABEL).is_none());

    release_tx.send(()).unwrap();
    worker.join().unwrap();
    harness.run();

    let _start = harness.get_by_label(START_LABEL);
    assert_eq!(trigger.state(), SessionState::Idle);
}

/// Clicking start runs a typed session through to its farewell
#[test]
fn test_typed_session_from_the_window() {
    let mut harness = harness(text_only_app());
    harness.run();

    harness.get_by_label(START_LABEL).click();
    harness.run();
    assert!(harness.state().state().is_running());

    harness.get_by_label("Command input").focus();
    harness.run();
    harness.get_by_label("Command input").type_text("bye");
    harness.run();
    assert_eq!(harness.state().state().input_text, "bye");

    harness.get_by_label("Send command").click();
    harness.run();

    wait_until_idle(harness.state());
    harness.run();

    let _opening = harness.get_by_label("Medibot: How can I help you today?");
    let _heard = harness.get_by_label("You: bye");
    let _farewell = harness.get_by_label("Medibot: Goodbye! Have a healthy day.");
    let _start = harness.get_by_label(START_LABEL);
}
