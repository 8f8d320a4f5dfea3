//! Reusable observers for coupled analysis and design optimization solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the solvers in `mdo-solvers`.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits for cross-solver observers
//!   ([`HasResidual`], [`HasObjective`], [`HasViolation`], [`HasDesign`],
//!   [`CanStopEarly`])
//! - [`History`]: An in-memory record of the designs a driver visited
//!
//! # Features
//!
//! - `plot`: Enables [`PlotObserver`] for visualizing solver behavior and
//!   [`TradespacePlot`] for drawing a swept grid, both via egui.
//!   This feature adds dependencies on `eframe` and `egui_plot`.
//!
//! [`Observer`]: mdo_core::Observer
//! [`HasResidual`]: traits::HasResidual
//! [`HasObjective`]: traits::HasObjective
//! [`HasViolation`]: traits::HasViolation
//! [`HasDesign`]: traits::HasDesign
//! [`CanStopEarly`]: traits::CanStopEarly

mod history;
pub mod traits;

pub use history::{History, Record};

#[cfg(feature = "plot")]
mod plot;
#[cfg(feature = "plot")]
mod tradespace_plot;

#[cfg(feature = "plot")]
pub use plot::{PlotObserver, Plottable, ShowConfig, Trace};
#[cfg(feature = "plot")]
pub use tradespace_plot::TradespacePlot;
