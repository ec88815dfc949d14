use std::path::PathBuf;

use anyhow::{Context, Result};
use cadence_core::rollup::SeriesPoint;
use cadence_core::task::{MoveDirection, Recurrence};
use cadence_core::{Intent, TrackerService};
use tracing::{info, warn};

use crate::storage::JsonFileGateway;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) data_path: PathBuf,
    pub(crate) chart_days: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("CADENCE_DATA") {
            if !path.trim().is_empty() {
                config.data_path = PathBuf::from(path);
            }
        }
        if let Ok(days) = std::env::var("CADENCE_CHART_DAYS") {
            match days.trim().parse::<u32>() {
                Ok(value) if value > 0 => config.chart_days = value,
                _ => warn!(value = %days, "ignoring invalid CADENCE_CHART_DAYS"),
            }
        }
        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("cadence_tasks.json"),
            chart_days: 7,
        }
    }
}

struct EditSession {
    id: String,
    text: String,
}

struct CadenceApp {
    service: TrackerService,
    snapshot: cadence_core::TrackerSnapshot,
    input: String,
    input_recurrence: Recurrence,
    editing: Option<EditSession>,
    status: String,
}

impl CadenceApp {
    fn new(service: TrackerService) -> Self {
        let snapshot = service.snapshot();
        Self {
            service,
            snapshot,
            input: String::new(),
            input_recurrence: Recurrence::OneTime,
            editing: None,
            status: String::new(),
        }
    }

    fn apply(&mut self, intent: Intent) {
        match self.service.dispatch(intent) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.status.clear();
            }
            Err(err) => {
                warn!(%err, "intent rejected");
                self.status = err.to_string();
            }
        }
    }

    fn submit_new_task(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.apply(Intent::Add {
            text,
            recurrence: self.input_recurrence,
        });
        self.input.clear();
        self.input_recurrence = Recurrence::OneTime;
    }
}

impl eframe::App for CadenceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut pending: Vec<Intent> = Vec::new();
        let mut start_edit: Option<EditSession> = None;
        let mut finished_edit = false;

        egui::TopBottomPanel::top("add_row").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let response =
                    ui.add(egui::TextEdit::singleline(&mut self.input).hint_text("New task"));
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                egui::ComboBox::from_id_salt("recurrence")
                    .selected_text(self.input_recurrence.label())
                    .show_ui(ui, |ui| {
                        for recurrence in Recurrence::ALL {
                            ui.selectable_value(
                                &mut self.input_recurrence,
                                recurrence,
                                recurrence.label(),
                            );
                        }
                    });
                if ui.button("Add").clicked() || submitted {
                    self.submit_new_task();
                }
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Today: {}", self.service.today()));
                if !self.status.is_empty() {
                    ui.separator();
                    ui.colored_label(ui.visuals().warn_fg_color, &self.status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Self {
                snapshot, editing, ..
            } = self;
            egui::ScrollArea::vertical()
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for group in &snapshot.due {
                        if group.tasks.is_empty() {
                            continue;
                        }
                        ui.heading(heading_for(group.recurrence));
                        for (index, task) in group.tasks.iter().enumerate() {
                            ui.horizontal(|ui| {
                                if let Some(session) =
                                    editing.as_mut().filter(|session| session.id == task.id)
                                {
                                    let response = ui.text_edit_singleline(&mut session.text);
                                    let submitted = response.lost_focus()
                                        && ui.input(|i| i.key_pressed(egui::Key::Enter));
                                    if ui.button("Save").clicked() || submitted {
                                        pending.push(Intent::Edit {
                                            id: task.id.clone(),
                                            text: session.text.clone(),
                                        });
                                        finished_edit = true;
                                    }
                                    if ui.button("Cancel").clicked() {
                                        finished_edit = true;
                                    }
                                } else {
                                    ui.label(format!("{}. {}", index + 1, task.text));
                                    if ui.button("Done").clicked() {
                                        pending.push(Intent::Complete {
                                            id: task.id.clone(),
                                        });
                                    }
                                    if ui.small_button("↑").clicked() {
                                        pending.push(Intent::Move {
                                            id: task.id.clone(),
                                            direction: MoveDirection::Up,
                                        });
                                    }
                                    if ui.small_button("↓").clicked() {
                                        pending.push(Intent::Move {
                                            id: task.id.clone(),
                                            direction: MoveDirection::Down,
                                        });
                                    }
                                    if ui.button("Edit").clicked() {
                                        start_edit = Some(EditSession {
                                            id: task.id.clone(),
                                            text: task.text.clone(),
                                        });
                                    }
                                    if ui.button("Delete").clicked() {
                                        pending.push(Intent::Delete {
                                            id: task.id.clone(),
                                        });
                                    }
                                }
                            });
                        }
                        ui.add_space(8.0);
                    }

                    if !snapshot.completed.is_empty() {
                        ui.separator();
                        ui.heading("Completed");
                        for task in &snapshot.completed {
                            ui.horizontal(|ui| {
                                ui.label(
                                    egui::RichText::new(format!(
                                        "{} ({})",
                                        task.text,
                                        task.recurrence.label()
                                    ))
                                    .strikethrough()
                                    .weak(),
                                );
                                if ui.button("Undo").clicked() {
                                    pending.push(Intent::Undo {
                                        id: task.id.clone(),
                                    });
                                }
                            });
                        }
                        ui.add_space(8.0);
                    }

                    ui.separator();
                    ui.heading("Completions");
                    draw_chart(ui, &snapshot.series);
                });
        });

        if finished_edit {
            self.editing = None;
        }
        if start_edit.is_some() {
            self.editing = start_edit;
        }
        for intent in pending {
            self.apply(intent);
        }
    }
}

fn heading_for(recurrence: Recurrence) -> &'static str {
    match recurrence {
        Recurrence::OneTime => "One-time",
        Recurrence::Daily => "Daily",
        Recurrence::Weekly => "Weekly",
        Recurrence::Monthly => "Monthly",
    }
}

fn draw_chart(ui: &mut egui::Ui, series: &[SeriesPoint]) {
    if series.is_empty() {
        ui.weak("No completions recorded yet");
        return;
    }
    let desired = egui::vec2(ui.available_width().max(120.0), 150.0);
    let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
    let rect = response.rect;
    let max_count = series
        .iter()
        .map(|point| point.count)
        .max()
        .unwrap_or(0)
        .max(1) as f32;
    let slot = rect.width() / series.len() as f32;
    let label_band = 16.0;
    let plot_height = rect.height() - label_band;

    for (index, point) in series.iter().enumerate() {
        let left = rect.left() + index as f32 * slot;
        let height = point.count as f32 / max_count * (plot_height - 14.0);
        let bar = egui::Rect::from_min_max(
            egui::pos2(left + slot * 0.2, rect.top() + plot_height - height),
            egui::pos2(left + slot * 0.8, rect.top() + plot_height),
        );
        painter.rect_filled(bar, egui::CornerRadius::same(2), ui.visuals().selection.bg_fill);
        if point.count > 0 {
            painter.text(
                egui::pos2(left + slot * 0.5, bar.top() - 2.0),
                egui::Align2::CENTER_BOTTOM,
                point.count.to_string(),
                egui::FontId::proportional(10.0),
                ui.visuals().strong_text_color(),
            );
        }
        painter.text(
            egui::pos2(left + slot * 0.5, rect.bottom()),
            egui::Align2::CENTER_BOTTOM,
            point.date.format("%m-%d").to_string(),
            egui::FontId::proportional(10.0),
            ui.visuals().weak_text_color(),
        );
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(
        path = %config.data_path.display(),
        chart_days = config.chart_days,
        "starting Cadence"
    );
    let gateway = JsonFileGateway::new(&config.data_path);
    let service = TrackerService::builder()
        .gateway(Box::new(gateway))
        .chart_window(Some(config.chart_days))
        .build()
        .context("failed to initialize tracker service")?;
    let app = CadenceApp::new(service);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([760.0, 680.0]),
        ..Default::default()
    };
    eframe::run_native("Cadence", options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|err| anyhow::anyhow!("{err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_the_local_snapshot() {
        let config = AppConfig::default();
        assert_eq!(config.data_path, PathBuf::from("cadence_tasks.json"));
        assert_eq!(config.chart_days, 7);
    }
}
