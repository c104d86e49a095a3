use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use super::commands::{Command, Diagnostic, Outcome};
use super::modals::{self, InfoContext, SettingsOutcome};
use super::render::{echo_input, render, set_activity, DashboardView, RenderScope, Thresholds};
use crate::core::clock::ClockTime;
use crate::core::collectors::{CollectContext, CollectorSet, NOT_CONNECTED};
use crate::core::config::Config;
use crate::core::executor::{executor_for, TierExecutor};
use crate::core::scheduler::{ForcedTiers, NextUpdate, Scheduler, Tier};
use crate::core::settings::Settings;
use crate::core::telemetry::{Field, SharedTelemetry, TelemetryBatch};
use crate::ui::input::{poll_input, Input};
use crate::ui::renderer::Renderer;
use crate::ui::terminal::TerminalRenderer;

const BANNER_PAUSE: Duration = Duration::from_millis(1200);
const STARTUP_ORDER: [Tier; 4] = [Tier::Static, Tier::Daily, Tier::SemiOften, Tier::Often];

/// Dashboard behaviour that does not change while running.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub settings: Settings,
    pub regions: Vec<String>,
    pub thresholds: Thresholds,
    pub test_mode: bool,
    /// How long the saved/canceled banners and goodbye screen stay up
    pub banner_pause: Duration,
    pub version: String,
}

impl DashboardOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            settings: config.settings(),
            regions: config.outbreak_regions.clone(),
            thresholds: Thresholds {
                cpu_temp_celsius: config.cpu_temp_alert_celsius,
                memory_percent: config.memory_alert_percent,
            },
            test_mode: config.test_mode,
            banner_pause: BANNER_PAUSE,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub input: Input,
    pub command: Command,
    /// Tiers whose batches were applied, in order
    pub applied: Vec<Tier>,
    pub scope: RenderScope,
    pub quit: bool,
}

/// The main loop's state: scheduler, telemetry and screen.
pub struct Dashboard<R: Renderer> {
    renderer: R,
    collectors: CollectorSet,
    executor: Box<dyn TierExecutor>,
    scheduler: Scheduler,
    telemetry: SharedTelemetry,
    options: DashboardOptions,
    next: Option<NextUpdate>,
    wifi_connected: bool,
    /// Forced tiers that were still running when forced
    deferred: ForcedTiers,
}

impl<R: Renderer> Dashboard<R> {
    pub fn new(
        renderer: R,
        collectors: CollectorSet,
        executor: Box<dyn TierExecutor>,
        options: DashboardOptions,
    ) -> Self {
        Self {
            renderer,
            collectors,
            executor,
            scheduler: Scheduler::new(&options.settings),
            telemetry: SharedTelemetry::new(),
            options,
            next: None,
            wifi_connected: false,
            deferred: ForcedTiers::none(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn telemetry(&self) -> &SharedTelemetry {
        &self.telemetry
    }

    pub fn settings(&self) -> Settings {
        self.options.settings
    }

    pub fn next_update(&self) -> Option<NextUpdate> {
        self.next
    }

    fn context(&mut self, tier: Tier, now: ClockTime) -> CollectContext {
        CollectContext {
            now,
            test_mode: self.options.test_mode,
            sample_speed: tier == Tier::SemiOften && self.scheduler.take_speed_sample(),
            wifi_connected: self.wifi_connected,
        }
    }

    fn apply(&mut self, batch: TelemetryBatch, now: ClockTime) -> Tier {
        let tier = batch.tier;
        if tier == Tier::SemiOften {
            if let Some(value) = batch.get(Field::WlanIp) {
                self.wifi_connected = !value.is_error() && value.as_text() != Some(NOT_CONNECTED);
            }
        }
        let faults = batch.fault_count();
        if faults > 0 {
            log::warn!("{} tier finished with {} failed field(s)", tier, faults);
        } else {
            log::info!("{} tier finished", tier);
        }
        self.telemetry.apply(batch);
        self.scheduler.record_run(tier, now);
        tier
    }

    /// Run every tier once, in place, showing progress on a boot screen.
    pub fn startup(&mut self, now: ClockTime) -> Result<()> {
        modals::boot_header(&mut self.renderer);
        let mut failed = false;
        for tier in STARTUP_ORDER {
            modals::boot_step_started(&mut self.renderer, tier)?;
            let collector = match self.collectors.get(tier) {
                Ok(collector) => collector,
                Err(e) => {
                    log::warn!("{}", e);
                    modals::boot_step_finished(&mut self.renderer, tier, false)?;
                    failed = true;
                    continue;
                }
            };
            let ctx = self.context(tier, now);
            let batch = collector.collect(&ctx);
            let ok = batch.fault_count() == 0;
            failed |= !ok;
            self.apply(batch, now);
            modals::boot_step_finished(&mut self.renderer, tier, ok)?;
        }
        if failed {
            modals::boot_warning(&mut self.renderer)?;
        }

        self.next = self.scheduler.predict(now);
        self.draw(&RenderScope::Full);
        self.renderer.present()?;
        Ok(())
    }

    fn draw(&mut self, scope: &RenderScope) {
        let state = self.telemetry.read();
        let view = DashboardView {
            telemetry: &*state,
            settings: self.options.settings,
            next: self.next,
            regions: &self.options.regions,
            thresholds: self.options.thresholds,
            version: &self.options.version,
        };
        render(&mut self.renderer, &view, scope);
    }

    fn apply_settings(&mut self, settings: Settings) {
        self.options.settings = settings;
        self.scheduler.apply_settings(&settings);
    }

    /// Carry out one command. Modal commands block here until the dialog
    /// is closed.
    pub fn dispatch(&mut self, command: Command, now: ClockTime) -> Result<Outcome> {
        let pause = self.options.banner_pause;
        let outcome = match command {
            Command::None => Outcome::default(),
            Command::Quit => Outcome::quit(),
            Command::Redraw => Outcome::redraw(),
            Command::ForceUpdateAll => Outcome {
                forced: ForcedTiers::all(),
                ..Outcome::default()
            },
            Command::ForceUpdateMenu => {
                let forced =
                    modals::force_update_menu(&mut self.renderer, self.scheduler.semi_interval_mins())?;
                Outcome {
                    forced,
                    ..Outcome::redraw()
                }
            }
            Command::ShowHelp => {
                modals::help(&mut self.renderer)?;
                Outcome::redraw()
            }
            Command::ShowVersion => {
                modals::version(&mut self.renderer, &self.options.version)?;
                Outcome::redraw()
            }
            Command::OpenSettings => {
                match modals::settings_dialog(&mut self.renderer, self.options.settings, pause)? {
                    SettingsOutcome::Saved(settings) => self.apply_settings(settings),
                    SettingsOutcome::Canceled | SettingsOutcome::Unchanged => {}
                }
                Outcome::redraw()
            }
            Command::Diagnostics => {
                if let Some(diagnostic) = modals::diagnostics_menu(&mut self.renderer)? {
                    self.run_diagnostic(diagnostic, now)?;
                }
                Outcome::redraw()
            }
        };
        Ok(outcome)
    }

    fn run_diagnostic(&mut self, diagnostic: Diagnostic, now: ClockTime) -> Result<()> {
        match diagnostic {
            Diagnostic::StyleTest => modals::style_test(&mut self.renderer),
            Diagnostic::FillScreen => modals::fill_screen(&mut self.renderer),
            Diagnostic::ShowAllInfo => {
                let state = self.telemetry.read();
                let info = InfoContext {
                    telemetry: &*state,
                    scheduler: &self.scheduler,
                    settings: self.options.settings,
                    now,
                    next: self.next,
                    regions: self.options.regions.len(),
                    version: &self.options.version,
                    test_mode: self.options.test_mode,
                };
                modals::show_all_info(&mut self.renderer, &info);
            }
        }
        self.renderer.present()?;
        self.renderer.wait_key()?;
        Ok(())
    }

    /// One pass of the main loop with the clock sampled at `now` and the
    /// already-coalesced `input`.
    pub fn tick(&mut self, now: ClockTime, input: Input) -> Result<TickReport> {
        set_activity(&mut self.renderer, true);
        let key = input.key();
        if let Some(key) = key {
            echo_input(&mut self.renderer, Some(&key.to_string()));
        }
        self.renderer.present()?;

        let command = Command::from_input(input);
        let outcome = self.dispatch(command, now)?;
        if outcome.quit {
            log::info!("Quit requested");
            modals::goodbye(&mut self.renderer, self.options.banner_pause)?;
            return Ok(TickReport {
                input,
                command,
                applied: Vec::new(),
                scope: RenderScope::Partial(Vec::new()),
                quit: true,
            });
        }
        if outcome.full_redraw {
            self.draw(&RenderScope::Full);
            set_activity(&mut self.renderer, true);
            self.renderer.present()?;
        }

        let forced = outcome.forced.union(std::mem::take(&mut self.deferred));
        let plan = self.scheduler.plan(now, forced);
        self.next = plan.next;
        for tier in plan.tiers() {
            if self.executor.in_flight(tier) {
                if forced.contains(tier) {
                    log::info!("Forced {} update deferred, previous run still in flight", tier);
                    self.deferred.insert(tier);
                } else {
                    log::debug!("{} tier still in flight", tier);
                }
                continue;
            }
            let collector = match self.collectors.get(tier) {
                Ok(collector) => collector,
                Err(e) => {
                    log::warn!("{}", e);
                    continue;
                }
            };
            let ctx = self.context(tier, now);
            self.executor.dispatch(collector, ctx);
        }

        let applied: Vec<Tier> = self
            .executor
            .completed()
            .into_iter()
            .map(|batch| self.apply(batch, now))
            .collect();
        if !applied.is_empty() {
            self.next = self.scheduler.predict(now);
        }

        let scope = if outcome.full_redraw {
            RenderScope::Full
        } else {
            RenderScope::for_tiers(&applied)
        };
        self.draw(&scope);
        if key.is_some() {
            echo_input(&mut self.renderer, None);
        }
        set_activity(&mut self.renderer, false);
        self.renderer.present()?;

        Ok(TickReport {
            input,
            command,
            applied,
            scope,
            quit: false,
        })
    }

    /// Sleep, sample input, tick; until the user quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            thread::sleep(Duration::from_secs(self.options.settings.tick_interval_secs));
            let input = poll_input(&mut self.renderer)?;
            let report = self.tick(ClockTime::now(), input)?;
            if report.quit {
                return Ok(());
            }
        }
    }
}

/// Run the dashboard on the terminal until the user quits.
pub fn run_dashboard(config: &Config) -> Result<()> {
    let executor =
        executor_for(config.background_collectors).context("Failed to start collector workers")?;
    let collectors = CollectorSet::from_config(config);
    let renderer = TerminalRenderer::new().context("Failed to initialise terminal")?;

    let mut dashboard = Dashboard::new(
        renderer,
        collectors,
        executor,
        DashboardOptions::from_config(config),
    );
    dashboard.startup(ClockTime::now())?;
    dashboard.run()
}
