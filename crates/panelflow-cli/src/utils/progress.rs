use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use panelflow::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

const SPINNER_TICK_MS: u64 = 80;

/// Terminal view of an `analyze` or `sweep` run.
///
/// Setup phases render as a spinner that settles into a check mark. The sweep's case loop
/// switches to a bar over the angles of attack, and any case whose Gauss-Seidel solve stopped
/// short of the tolerance is printed above the bar as it finishes.
#[derive(Clone)]
pub struct CaseProgress {
    state: Arc<Mutex<RenderState>>,
}

struct RenderState {
    visible: bool,
    phase: Option<&'static str>,
    bar: ProgressBar,
    solved: u64,
    unconverged: Vec<f64>,
}

impl CaseProgress {
    pub fn new() -> Self {
        Self::with_visibility(true)
    }

    fn with_visibility(visible: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(RenderState {
                visible,
                phase: None,
                bar: ProgressBar::hidden(),
                solved: 0,
                unconverged: Vec::new(),
            })),
        }
    }

    pub fn callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);
        Box::new(move |event: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state lock was poisoned; dropping event.");
                return;
            };
            state.apply(event);
        })
    }
}

impl Default for CaseProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    fn apply(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => self.start_phase(name),
            Progress::PhaseFinish => self.finish_phase(),
            Progress::TaskStart { total_steps } => self.start_cases(total_steps),
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(len) = self.bar.length() {
                    self.bar.set_position(len);
                }
            }
            Progress::CaseFinished {
                alpha_deg,
                cl,
                converged,
            } => self.record_case(alpha_deg, cl, converged),
        }
    }

    fn draw_target(&self) -> ProgressDrawTarget {
        if self.visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        }
    }

    fn start_phase(&mut self, name: &'static str) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
        let bar = ProgressBar::with_draw_target(None, self.draw_target())
            .with_style(spinner_style())
            .with_message(name);
        if self.visible {
            bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        self.bar = bar;
        self.phase = Some(name);
    }

    fn start_cases(&mut self, total: u64) {
        self.solved = 0;
        self.unconverged.clear();
        self.bar.disable_steady_tick();
        self.bar.set_style(bar_style());
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn record_case(&mut self, alpha_deg: f64, cl: f64, converged: bool) {
        debug!(alpha_deg, cl, converged, "Case finished.");
        self.solved += 1;
        self.bar
            .set_message(format!("α = {:+.2}°  Cl = {:+.4}", alpha_deg, cl));
        if !converged {
            self.unconverged.push(alpha_deg);
            self.bar
                .println(format!("  ⚠ α = {:+.2}° did not converge", alpha_deg));
        }
    }

    fn finish_phase(&mut self) {
        self.bar.disable_steady_tick();
        let name = self.phase.take().unwrap_or("Done");
        let summary = if self.bar.length().is_some() {
            match self.unconverged.len() {
                0 => format!("✓ {}: {} solved", name, self.solved),
                n => format!("✓ {}: {} solved, {} unconverged", name, self.solved, n),
            }
        } else {
            format!("✓ {}", name)
        };
        self.bar.finish_with_message(summary);
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("[{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
