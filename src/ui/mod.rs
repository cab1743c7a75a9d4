//! Demo host for the board, built on egui/eframe.
//!
//! # Module Organization
//!
//! - `state` - Settings, interaction state and the main BoardApp
//! - `canvas` - Surface lifecycle, panning, zooming, dragging and connecting
//! - `rendering` - Painting the grid frame, components, wires and scale-bar

mod canvas;
mod rendering;
mod state;


pub use state::{BoardApp, BoardSettings};

use crate::component::Component;
use crate::constants::SETTINGS_KEY;
use crate::grid::GridConfig;
use crate::interval::{IntervalPriority, IntervalStrategy};
use eframe::egui;

impl eframe::App for BoardApp {
    /// Persist the settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.settings.to_json() {
            Ok(json) => storage.set_string(SETTINGS_KEY, json),
            Err(err) => log::error!("failed to serialize settings: {}", err),
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

impl BoardApp {
    /// Lays out one frame: toolbar on top, board below.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.drain_changes();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut strategy = self.settings.grid.strategy;
            egui::ComboBox::from_label("Intervals")
                .selected_text(strategy_label(strategy))
                .show_ui(ui, |ui| {
                    for option in [
                        IntervalStrategy::MinMax,
                        IntervalStrategy::Min2,
                        IntervalStrategy::Max2,
                    ] {
                        ui.selectable_value(&mut strategy, option, strategy_label(option));
                    }
                });
            if strategy != self.settings.grid.strategy {
                match self.board.engine().set_strategy(strategy) {
                    Ok(()) => self.settings.grid.strategy = strategy,
                    Err(err) => {
                        log::warn!("strategy change rejected: {}", err);
                        self.interaction.status = Some(err.to_string());
                    }
                }
            }

            ui.separator();
            let mut grid = self.settings.grid.clone();
            ui.checkbox(&mut grid.show_tertiary_x, "Fine x");
            ui.checkbox(&mut grid.show_tertiary_y, "Fine y");
            ui.checkbox(&mut grid.show_x_axis, "x axis");
            ui.checkbox(&mut grid.show_y_axis, "y axis");
            if grid != self.settings.grid {
                self.apply_grid_settings(grid);
            }

            ui.separator();
            ui.checkbox(&mut self.settings.show_scale_bar, "Scale bar");
            ui.checkbox(&mut self.settings.show_contacts, "Contacts");

            ui.separator();
            if ui.button("Add passthrough").clicked() {
                self.add_passthrough_at_center();
            }
            if ui.button("Add wire").clicked() {
                if let Err(err) = self.board.add_component(Component::wire("wire")) {
                    log::warn!("could not add wire: {}", err);
                }
            }
            if ui.button("Reset view").clicked() {
                self.board.engine().set_offset(0.0, 0.0);
                self.board.engine().set_multiplier(1.0);
            }

            ui.separator();
            let engine = self.board.engine();
            ui.label(format!(
                "x{:.3}  {}mm / {}mm",
                engine.multiplier(),
                engine.proper_interval_mm(IntervalPriority::Secondary),
                engine.proper_interval_mm(IntervalPriority::Tertiary),
            ));
            if let Some(status) = &self.interaction.status {
                ui.label(status.as_str());
            }
        });
    }

    /// Pushes edited grid options to the engine, keeping the old ones on failure.
    pub fn apply_grid_settings(&mut self, grid: GridConfig) {
        let next = grid.clone();
        match self.board.engine().update_config(move |config| *config = next) {
            Ok(()) => self.settings.grid = grid,
            Err(err) => {
                log::warn!("grid settings rejected: {}", err);
                self.interaction.status = Some(err.to_string());
            }
        }
    }

    /// Adds a passthrough centered on the visible part of the board.
    pub fn add_passthrough_at_center(&mut self) {
        let (width, height) = self.board.engine().size();
        let (x, y) = self.board.screen_to_mm((width / 2.0, height / 2.0));
        let part = Component::passthrough("passthrough").at((x - 4.0, y - 1.0));
        match self.board.add_component(part) {
            Ok(id) => self.interaction.selected = Some(id),
            Err(err) => log::warn!("could not add passthrough: {}", err),
        }
    }
}

fn strategy_label(strategy: IntervalStrategy) -> &'static str {
    match strategy {
        IntervalStrategy::MinMax => "Smallest + largest",
        IntervalStrategy::Min2 => "Two largest",
        IntervalStrategy::Max2 => "Two smallest",
    }
}
