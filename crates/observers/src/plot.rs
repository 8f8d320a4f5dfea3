//! Convergence plots for solver runs.
//!
//! A [`PlotObserver`] collects one or more named traces while a solver runs
//! and opens an egui window with them afterwards. Solver events that
//! implement [`Plottable`] can be recorded by passing `&mut PlotObserver` as
//! the observer; anything else can be recorded from a closure with
//! [`PlotObserver::record`].

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use mdo_core::Observer;
use mdo_solvers::{equation::newton, mda, optimization::lbfgs};

/// How a [`PlotObserver`] or [`TradespacePlot`](crate::TradespacePlot) is
/// rendered.
///
/// ```ignore
/// obs.show(ShowConfig::new().title("Sellar sweeps").legend().log_y())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShowConfig {
    pub(crate) title: Option<String>,
    pub(crate) legend: bool,
    pub(crate) log_y: bool,
}

impl ShowConfig {
    /// No title, no legend, linear y-axis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn legend(mut self) -> Self {
        self.legend = true;
        self
    }

    /// Plots `log₁₀ y`. Points with `y <= 0` are dropped.
    #[must_use]
    pub fn log_y(mut self) -> Self {
        self.log_y = true;
        self
    }
}

/// A solver event that maps to one x value and `N` trace values.
///
/// Implemented for Newton iterations (residual norm), coupled-analysis
/// sweeps (largest change), and L-BFGS outer iterations (objective and
/// violation).
pub trait Plottable<const N: usize> {
    /// The x value, or `None` to ignore the event.
    fn x(&self) -> Option<f64>;

    /// One value per trace; `None` leaves that trace without a point.
    fn traces(&self) -> [Option<f64>; N];
}

/// A named series of `[x, y]` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

impl Trace {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            points: Vec::new(),
        }
    }

    /// Points ready to draw, transformed to `log₁₀ y` when `log_y` is set.
    fn plot_points(&self, log_y: bool) -> Vec<[f64; 2]> {
        if log_y {
            self.points
                .iter()
                .filter(|[_, y]| *y > 0.0)
                .map(|&[x, y]| [x, y.log10()])
                .collect()
        } else {
            self.points.iter().copied().collect()
        }
    }
}

/// Collects `N` traces during a solve and shows them in a window.
///
/// ```ignore
/// let mut obs = PlotObserver::<1>::new(["Largest change"]);
/// analysis.solve(&design, &mut obs)?;
/// obs.show(ShowConfig::new().title("Gauss–Seidel").log_y())?;
/// ```
///
/// Events without a [`Plottable`] impl go through a closure:
///
/// ```ignore
/// let mut obs = PlotObserver::<2>::new(["y1", "y2"]);
/// analysis.solve(&design, |event: &mda::Event<'_, Vars>| {
///     obs.record(event.sweep as f64, [Some(event.vars.y1), Some(event.vars.y2)]);
///     None
/// })?;
/// ```
#[derive(Debug, Clone)]
pub struct PlotObserver<const N: usize> {
    traces: [Trace; N],
}

impl<const N: usize> PlotObserver<N> {
    #[must_use]
    pub fn new(names: [&str; N]) -> Self {
        Self {
            traces: names.map(Trace::new),
        }
    }

    /// Adds `[x, y]` to every trace whose slot in `values` is `Some(y)`.
    pub fn record(&mut self, x: f64, values: [Option<f64>; N]) {
        for (trace, y) in self.traces.iter_mut().zip(values) {
            if let Some(y) = y {
                trace.points.push([x, y]);
            }
        }
    }

    #[must_use]
    pub fn traces(&self) -> &[Trace; N] {
        &self.traces
    }

    /// Whether no trace has a point yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(|t| t.points.is_empty())
    }

    /// Opens a window with the collected traces and blocks until it closes.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(self, config: ShowConfig) -> Result<(), eframe::Error> {
        let title = config.title.clone().unwrap_or_default();
        let app = TraceApp {
            traces: self.traces.into(),
            config,
        };
        eframe::run_native(
            &title,
            eframe::NativeOptions::default(),
            Box::new(move |_cc| Ok(Box::new(app))),
        )
    }
}

impl<const N: usize, E, A> Observer<E, A> for PlotObserver<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(x) = event.x() {
            self.record(x, event.traces());
        }
        None
    }
}

/// Lets `&mut PlotObserver` be passed by value so it can be shown afterwards.
impl<const N: usize, E, A> Observer<E, A> for &mut PlotObserver<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

#[allow(clippy::cast_precision_loss)]
fn count(n: usize) -> Option<f64> {
    Some(n as f64)
}

impl<const D: usize> Plottable<1> for newton::Event<D> {
    fn x(&self) -> Option<f64> {
        count(self.iter)
    }

    fn traces(&self) -> [Option<f64>; 1] {
        [Some(self.residual_norm())]
    }
}

/// Sweeps of every cyclic block share the x-axis.
impl<C> Plottable<1> for mda::Event<'_, C> {
    fn x(&self) -> Option<f64> {
        count(self.sweep)
    }

    fn traces(&self) -> [Option<f64>; 1] {
        [Some(self.delta)]
    }
}

impl<const D: usize> Plottable<2> for lbfgs::Event<D> {
    fn x(&self) -> Option<f64> {
        count(self.outer)
    }

    fn traces(&self) -> [Option<f64>; 2] {
        [Some(self.objective), Some(self.max_violation)]
    }
}

struct TraceApp {
    traces: Vec<Trace>,
    config: ShowConfig,
}

impl eframe::App for TraceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut plot = Plot::new("traces").x_axis_label("iteration");
            if self.config.legend {
                plot = plot.legend(Legend::default());
            }
            if self.config.log_y {
                plot = plot.y_axis_label("log₁₀");
            }
            plot.show(ui, |plot_ui| {
                for trace in &self.traces {
                    let points = PlotPoints::from(trace.plot_points(self.config.log_y));
                    plot_ui.line(Line::new(points).name(&trace.name));
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn newton_event(iter: usize, residual: f64) -> newton::Event<2> {
        newton::Event {
            iter,
            x: [0.0, 0.0],
            residuals: [residual, -0.5 * residual],
            step_norm: 0.1,
        }
    }

    #[test]
    fn newton_iterations_trace_the_residual_norm() {
        let mut obs = PlotObserver::<1>::new(["Residual"]);
        for (iter, residual) in [(1, 1e-1), (2, -1e-3), (3, 1e-7)] {
            let action: Option<newton::Action> = obs.observe(&newton_event(iter, residual));
            assert!(action.is_none());
        }

        assert_eq!(obs.traces()[0].name, "Residual");
        assert_eq!(
            obs.traces()[0].points,
            vec![[1.0, 1e-1], [2.0, 1e-3], [3.0, 1e-7]]
        );
    }

    #[test]
    fn analysis_sweeps_trace_the_change() {
        let mut obs = PlotObserver::<1>::new(["Change"]);
        let vars = ();
        for (sweep, delta) in [(1, 4.0), (2, 0.25)] {
            let event = mda::Event {
                block: 0,
                sweep,
                delta,
                vars: &vars,
            };
            let _: Option<mda::Action> = obs.observe(&event);
        }
        assert_eq!(obs.traces()[0].points, vec![[1.0, 4.0], [2.0, 0.25]]);
    }

    #[test]
    fn driver_events_plot_objective_and_violation() {
        let mut obs = PlotObserver::<2>::new(["Objective", "Violation"]);
        let event = lbfgs::Event {
            outer: 3,
            x: [1.0, 2.0],
            objective: -4.0,
            constraints: vec![2.5],
            max_violation: 0.5,
            penalty: 50.0,
            inner_iters: 7,
        };

        let _: Option<lbfgs::Action> = obs.observe(&event);

        assert_eq!(obs.traces()[0].points, vec![[3.0, -4.0]]);
        assert_eq!(obs.traces()[1].points, vec![[3.0, 0.5]]);
    }

    #[test]
    fn record_skips_missing_values() {
        let mut obs = PlotObserver::<2>::new(["a", "b"]);
        assert!(obs.is_empty());

        obs.record(1.0, [Some(10.0), None]);
        obs.record(2.0, [None, None]);
        assert_eq!(obs.traces()[0].points, vec![[1.0, 10.0]]);
        assert!(obs.traces()[1].points.is_empty());
        assert!(!obs.is_empty());
    }

    #[test]
    fn log_scale_drops_non_positive_values() {
        let trace = Trace {
            name: "r".into(),
            points: vec![[1.0, 100.0], [2.0, 0.0], [3.0, -1.0], [4.0, 0.01]],
        };
        let logged = trace.plot_points(true);
        assert_eq!(logged.len(), 2);
        assert_relative_eq!(logged[0][1], 2.0);
        assert_relative_eq!(logged[1][1], -2.0);
        assert_eq!(trace.plot_points(false).len(), 4);
    }
}
