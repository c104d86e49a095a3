use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use statmon::core::collectors::{CollectContext, Collector, CollectorSet};
use statmon::core::executor::{BackgroundExecutor, InlineExecutor, TierExecutor};
use statmon::core::scheduler::Tier;
use statmon::core::telemetry::{Field, FieldError, FieldValue, TelemetryBatch};
use statmon::ui::dashboard::{Command, Dashboard, RenderScope};
use statmon::ui::{coalesce, poll_input, Canvas, Input, Key};

use super::support::{dashboard, dashboard_with, options, scripted_set, t, ScriptedCollector};

fn started() -> Dashboard<Canvas> {
    let mut dash = dashboard();
    dash.startup(t(10, 0)).unwrap();
    dash
}

#[test]
fn test_startup_runs_every_tier_and_draws_full_screen() {
    let dash = started();

    for tier in Tier::ALL {
        assert_eq!(dash.scheduler().last_run(tier), Some(t(10, 0)), "{}", tier);
    }
    let canvas = dash.renderer();
    assert!(canvas.row_text(6).contains("Hostname: pi-desk"));
    assert!(canvas.row_text(37).contains("Updates: 3"));
    assert!(canvas.row_text(20).contains("Established"));
    assert_eq!(dash.telemetry().snapshot().display(Field::Ping), "--");
}

#[test]
fn test_startup_warns_about_failed_tier() {
    let collectors = scripted_set().with(ScriptedCollector::new(
        Tier::Daily,
        vec![(Field::UpdateCount, FieldValue::Error(FieldError::Failed))],
    ));
    let mut dash = dashboard_with(collectors);
    // The warning waits for a key before the dashboard is drawn
    dash.renderer_mut().push_keys([Key::Enter]);

    dash.startup(t(10, 0)).unwrap();

    assert_eq!(dash.renderer().pending_keys(), 0);
    assert!(dash.renderer().row_text(37).contains("Updates: ERR"));
}

#[test]
fn test_disabled_fields_are_not_startup_failures() {
    let collectors = scripted_set().with(ScriptedCollector::new(
        Tier::Daily,
        vec![(Field::UpdateCount, FieldValue::Error(FieldError::Disabled))],
    ));
    let mut dash = dashboard_with(collectors);

    // No key queued: a warning would fail on the empty queue
    dash.startup(t(10, 0)).unwrap();

    assert!(dash.renderer().row_text(37).contains("Updates: DISABLED"));
}

#[test]
fn test_repeated_ticks_render_identically() {
    let mut dash = started();

    dash.tick(t(10, 0), Input::None).unwrap();
    let first = dash.renderer().clone();
    dash.tick(t(10, 0), Input::None).unwrap();

    assert!(first == *dash.renderer());
}

#[test]
fn test_coalesced_input_keeps_last_key() {
    assert_eq!(
        coalesce([Key::Char('a'), Key::Char('b'), Key::Char('c')]),
        Input::Key(Key::Char('c'))
    );

    let mut dash = started();
    dash.renderer_mut()
        .push_keys([Key::Char('a'), Key::Char('b'), Key::Char('c')]);
    let input = poll_input(dash.renderer_mut()).unwrap();
    let report = dash.tick(t(10, 0), input).unwrap();

    assert_eq!(report.input, Input::Key(Key::Char('c')));
    assert_eq!(report.command, Command::None);
    assert_eq!(dash.renderer().pending_keys(), 0);
    // Echo is cleared once the tick is done
    assert!(!dash.renderer().contains("Input:"));
}

#[test]
fn test_settings_change_is_shown_when_reopened() {
    let mut dash = started();
    dash.renderer_mut().push_str("30\n\n\ns");

    let report = dash.tick(t(10, 1), Input::Key(Key::Char('i'))).unwrap();

    assert_eq!(report.command, Command::OpenSettings);
    assert_eq!(report.scope, RenderScope::Full);
    assert_eq!(dash.settings().tick_interval_secs, 30);
    assert!(dash.renderer().row_text(38).contains("30"));

    // Reopen and leave without changes
    dash.renderer_mut().push_str("\n\n\n");
    dash.tick(t(10, 1), Input::Key(Key::Char('i'))).unwrap();
    assert_eq!(dash.settings().tick_interval_secs, 30);
    assert_eq!(dash.renderer().pending_keys(), 0);
}

#[test]
fn test_settings_dialog_shows_current_values() {
    let mut dash = started();
    dash.renderer_mut().push_str("30\n\n\ns");
    dash.tick(t(10, 1), Input::Key(Key::Char('i'))).unwrap();

    let mut canvas = Canvas::new();
    canvas.push_str("\n\n\n");
    statmon::ui::dashboard::modals::settings_dialog(&mut canvas, dash.settings(), Duration::ZERO)
        .unwrap();

    assert!(canvas.contains("Current: 30s"));
}

#[test]
fn test_invalid_setting_keeps_previous_value() {
    let mut dash = started();
    dash.renderer_mut().push_str("0\n\n\n");

    dash.tick(t(10, 1), Input::Key(Key::Char('i'))).unwrap();

    assert_eq!(dash.settings(), options().settings);
}

#[test]
fn test_force_update_all_runs_every_tier() {
    let mut dash = started();

    let report = dash.tick(t(10, 2), Input::Key(Key::Char('U'))).unwrap();

    assert_eq!(
        report.applied,
        vec![Tier::Often, Tier::SemiOften, Tier::Daily, Tier::Static]
    );
    assert_eq!(dash.scheduler().last_run(Tier::Static), Some(t(10, 2)));
}

#[test]
fn test_force_update_menu_runs_chosen_tier() {
    let mut dash = started();
    dash.renderer_mut().push_keys([Key::Char('2')]);

    let report = dash.tick(t(10, 2), Input::Key(Key::Char('u'))).unwrap();

    assert_eq!(report.applied, vec![Tier::Often, Tier::Daily]);
    assert_eq!(report.scope, RenderScope::Full);
}

#[test]
fn test_speed_sample_follows_cadence() {
    let semi = ScriptedCollector::new(Tier::SemiOften, Vec::new());
    let contexts = semi.contexts.clone();
    let mut dash = dashboard_with(scripted_set().with(semi));
    dash.startup(t(10, 0)).unwrap();

    for _ in 0..4 {
        dash.tick(t(10, 0), Input::Key(Key::Char('U'))).unwrap();
    }

    // Startup samples, then every fourth run
    let samples: Vec<bool> = contexts.lock().iter().map(|c| c.sample_speed).collect();
    assert_eq!(samples, vec![true, false, false, false, true]);
}

#[test]
fn test_quit_key_stops_loop() {
    let mut dash = started();

    let report = dash.tick(t(10, 3), Input::Key(Key::Char('q'))).unwrap();

    assert!(report.quit);
    assert!(report.applied.is_empty());
    assert!(dash.renderer().row_text(16).contains("_____"));
}

#[test]
fn test_missing_collector_is_skipped() {
    let mut dash = dashboard_with(CollectorSet::new());
    dash.renderer_mut().push_keys([Key::Enter]);
    dash.startup(t(10, 0)).unwrap();

    let report = dash.tick(t(10, 1), Input::None).unwrap();

    assert!(report.applied.is_empty());
    assert!(dash.renderer().row_text(6).contains("Hostname: --"));
}

#[test]
fn test_background_batches_are_applied_on_later_tick() {
    let often = ScriptedCollector::new(Tier::Often, vec![(Field::Time, FieldValue::text("10:05"))]);
    let runs = often.runs.clone();
    let mut dash = Dashboard::new(
        Canvas::new(),
        scripted_set().with(often),
        Box::new(BackgroundExecutor::new().unwrap()),
        options(),
    );

    let mut applied = Vec::new();
    for _ in 0..50 {
        applied.extend(dash.tick(t(10, 5), Input::None).unwrap().applied);
        if applied.contains(&Tier::Often) {
            break;
        }
        thread::sleep(Duration::from_millis(20));
    }

    assert!(applied.contains(&Tier::Often));
    assert!(runs.load(Ordering::SeqCst) >= 1);
    assert_eq!(dash.scheduler().last_run(Tier::Often), Some(t(10, 5)));
}

/// Runs inline but reports the chosen tiers as still running.
struct BusyExecutor {
    inner: InlineExecutor,
    busy: Arc<Mutex<HashSet<Tier>>>,
}

impl TierExecutor for BusyExecutor {
    fn dispatch(&mut self, collector: Arc<dyn Collector>, ctx: CollectContext) {
        self.inner.dispatch(collector, ctx);
    }

    fn completed(&mut self) -> Vec<TelemetryBatch> {
        self.inner.completed()
    }

    fn in_flight(&self, tier: Tier) -> bool {
        self.busy.lock().contains(&tier)
    }
}

#[test]
fn test_forced_tier_in_flight_runs_on_next_tick() {
    let busy = Arc::new(Mutex::new(HashSet::new()));
    let mut dash = Dashboard::new(
        Canvas::new(),
        scripted_set(),
        Box::new(BusyExecutor {
            inner: InlineExecutor::new(),
            busy: busy.clone(),
        }),
        options(),
    );
    dash.startup(t(10, 0)).unwrap();

    busy.lock().insert(Tier::SemiOften);
    let report = dash.tick(t(10, 1), Input::Key(Key::Char('U'))).unwrap();
    assert_eq!(report.applied, vec![Tier::Often, Tier::Daily, Tier::Static]);
    assert_eq!(dash.scheduler().last_run(Tier::SemiOften), Some(t(10, 0)));

    busy.lock().clear();
    let report = dash.tick(t(10, 1), Input::None).unwrap();
    assert_eq!(report.applied, vec![Tier::Often, Tier::SemiOften]);
    assert_eq!(dash.scheduler().last_run(Tier::SemiOften), Some(t(10, 1)));

    let report = dash.tick(t(10, 2), Input::None).unwrap();
    assert_eq!(report.applied, vec![Tier::Often]);
}

#[test]
fn test_ctrl_c_quits_dashboard() {
    let mut dash = started();

    let report = dash.tick(t(10, 3), Input::Key(Key::Interrupt)).unwrap();

    assert_eq!(report.command, Command::Quit);
    assert!(report.quit);
}
