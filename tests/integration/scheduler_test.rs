use statmon::core::scheduler::Tier;
use statmon::ui::dashboard::RenderScope;
use statmon::ui::Input;

use super::support::{dashboard, t};

#[test]
fn test_semi_often_runs_once_interval_elapsed() {
    let mut dash = dashboard();
    dash.scheduler_mut().record_run(Tier::SemiOften, t(9, 45));
    dash.scheduler_mut().record_run(Tier::Daily, t(9, 0));

    let report = dash.tick(t(10, 1), Input::None).unwrap();

    assert_eq!(report.applied, vec![Tier::Often, Tier::SemiOften]);
    assert_eq!(report.scope, RenderScope::Partial(vec![Tier::Often, Tier::SemiOften]));
    assert_eq!(dash.scheduler().last_run(Tier::SemiOften), Some(t(10, 1)));
    assert_eq!(dash.scheduler().last_run(Tier::Daily), Some(t(9, 0)));

    let canvas = dash.renderer();
    assert!(canvas.row_text(20).contains("Internet Access: Established"));
    assert!(canvas.row_text(22).contains("192.168.1.20"));
    // Static and Daily regions were not written
    assert_eq!(canvas.row_text(6), "");
    assert_eq!(canvas.row_text(37), "");
}

#[test]
fn test_quiet_tick_runs_only_often() {
    let mut dash = dashboard();
    dash.scheduler_mut().record_run(Tier::SemiOften, t(10, 0));
    dash.scheduler_mut().record_run(Tier::Daily, t(9, 0));

    let report = dash.tick(t(10, 5), Input::None).unwrap();

    assert_eq!(report.applied, vec![Tier::Often]);
    assert_eq!(dash.scheduler().last_run(Tier::SemiOften), Some(t(10, 0)));
    assert_eq!(dash.renderer().row_text(20), "");
    assert!(dash.renderer().row_text(9).contains("Processes: 112"));
}

#[test]
fn test_semi_often_wraps_past_midnight() {
    let mut dash = dashboard();
    dash.scheduler_mut().record_run(Tier::SemiOften, t(23, 55));

    let report = dash.tick(t(0, 6), Input::None).unwrap();

    assert!(report.applied.contains(&Tier::SemiOften));
    assert_eq!(dash.scheduler().last_run(Tier::SemiOften), Some(t(0, 6)));
}

#[test]
fn test_next_update_prediction_after_run() {
    let mut dash = dashboard();
    dash.scheduler_mut().record_run(Tier::SemiOften, t(9, 45));
    dash.scheduler_mut().record_run(Tier::Daily, t(9, 0));

    dash.tick(t(10, 1), Input::None).unwrap();

    let next = dash.next_update().unwrap();
    assert_eq!(next.tier, Tier::SemiOften);
    assert_eq!(next.minutes, 10);
}
