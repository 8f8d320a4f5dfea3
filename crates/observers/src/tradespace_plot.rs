//! Scatter view of a tradespace grid.

use eframe::egui::{self, Color32};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};
use mdo_solvers::tradespace::{Grid, Outcome};

use crate::ShowConfig;

/// A tradespace grid laid out for display.
///
/// The row axis runs along x and the column axis along y. Points are drawn in
/// three groups (feasible, infeasible, and failed), each evaluated point is
/// labeled with its objective, and the best feasible point is marked.
///
/// # Example
///
/// ```ignore
/// let grid = tradespace::sweep_unobserved(&model, &problem, base, rows, columns, &config)?;
/// TradespacePlot::new(&grid)
///     .labels("x", "y")
///     .show(ShowConfig::new().title("Paraboloid tradespace").legend())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TradespacePlot {
    feasible: Vec<[f64; 2]>,
    infeasible: Vec<[f64; 2]>,
    failed: Vec<[f64; 2]>,
    objectives: Vec<([f64; 2], f64)>,
    best: Option<[f64; 2]>,
    x_label: String,
    y_label: String,
}

impl TradespacePlot {
    /// Sorts the evaluated points of `grid` into display groups.
    #[must_use]
    pub fn new<const N: usize>(grid: &Grid<N>) -> Self {
        let (across, up) = (grid.rows().index(), grid.columns().index());
        let at = |x: &[f64; N]| [x[across], x[up]];

        let mut plot = Self {
            x_label: format!("x[{across}]"),
            y_label: format!("x[{up}]"),
            ..Self::default()
        };
        for point in grid.points() {
            let position = at(&point.x);
            match point.outcome {
                Outcome::Evaluated {
                    objective,
                    feasible,
                    ..
                } => {
                    if feasible {
                        plot.feasible.push(position);
                    } else {
                        plot.infeasible.push(position);
                    }
                    plot.objectives.push((position, objective));
                }
                Outcome::Failed { .. } => plot.failed.push(position),
            }
        }
        plot.best = grid.best_feasible().map(|p| at(&p.x));
        plot
    }

    /// Names the two axes.
    #[must_use]
    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    /// Opens a blocking egui window showing the grid.
    ///
    /// Blocks until the window is closed by the user. [`ShowConfig::log_y`]
    /// has no effect here.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(self, config: ShowConfig) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions::default();
        let title = config.title.unwrap_or_default();
        let legend = config.legend;

        eframe::run_native(
            &title,
            options,
            Box::new(move |_cc| Ok(Box::new(TradespaceApp { plot: self, legend }))),
        )
    }
}

struct TradespaceApp {
    plot: TradespacePlot,
    legend: bool,
}

impl eframe::App for TradespaceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let data = &self.plot;
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut plot = Plot::new("tradespace_plot")
                .x_axis_label(data.x_label.clone())
                .y_axis_label(data.y_label.clone())
                .data_aspect(1.0);
            if self.legend {
                plot = plot.legend(Legend::default());
            }
            plot.show(ui, |plot_ui| {
                let groups = [
                    ("Feasible", &data.feasible, Color32::from_rgb(60, 160, 90)),
                    ("Infeasible", &data.infeasible, Color32::from_rgb(200, 80, 60)),
                    ("Failed", &data.failed, Color32::GRAY),
                ];
                for (name, positions, color) in groups {
                    let series: PlotPoints = positions.iter().copied().collect();
                    plot_ui.points(Points::new(series).name(name).color(color).radius(4.0));
                }
                for &([x, y], objective) in &data.objectives {
                    plot_ui.text(Text::new(PlotPoint::new(x, y), format!("{objective:.1}")));
                }
                if let Some(best) = data.best {
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![best]))
                            .name("Best feasible")
                            .shape(MarkerShape::Diamond)
                            .color(Color32::GOLD)
                            .radius(8.0),
                    );
                }
            });
        });
    }
}
