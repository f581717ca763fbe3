//! SSC Dashboard Main Application
//! Main window with the toolbar, the dashboard page and the footer.

use crate::config::Config;
use crate::data::DataLoader;
use crate::gui::dashboard::Dashboard;
use crate::gui::widgets::{ERROR_COLOR, TITLE_COLOR};
use egui::{Color32, RichText};
use std::path::PathBuf;
use tracing::{error, info};

/// What the central panel shows for the current dataset.
enum PageState {
    Ready(Box<Dashboard>),
    /// Loading failed; nothing is rendered from a partial table.
    Failed(String),
}

/// Main application window.
pub struct DashboardApp {
    config: Config,
    loader: DataLoader,
    data_path: PathBuf,
    page: PageState,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let data_path = config.data.path.clone();
        let mut app = Self {
            config,
            loader: DataLoader::new(),
            data_path: data_path.clone(),
            page: PageState::Failed(String::new()),
        };
        app.open(data_path);
        app
    }

    /// Load (or reuse) the table at `path` and rebuild every section.
    fn open(&mut self, path: PathBuf) {
        if self.loader.is_cached(&path) {
            info!("Reusing {} from memory", path.display());
        }
        self.page = match self.loader.load(&path) {
            Ok(table) => PageState::Ready(Box::new(Dashboard::new(
                table,
                self.config.data.default_year,
            ))),
            Err(e) => {
                error!("Could not load {}: {}", path.display(), e);
                PageState::Failed(e.to_string())
            }
        };
        self.data_path = path;
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.open(path);
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("📂 Open CSV").clicked() {
                self.handle_browse_csv();
            }

            let file_name = self
                .data_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.data_path.display().to_string());
            let status = match &self.page {
                PageState::Ready(dashboard) => match dashboard.selected_year() {
                    Some(year) => format!(
                        "{} · {} rows · year {}",
                        file_name,
                        dashboard.row_count(),
                        year
                    ),
                    None => format!("{} · {} rows", file_name, dashboard.row_count()),
                },
                PageState::Failed(_) => format!("{} · not loaded", file_name),
            };
            ui.label(RichText::new(status).size(12.0).color(Color32::GRAY));
        });
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.label(
                RichText::new(&self.config.display.title)
                    .size(32.0)
                    .strong()
                    .color(TITLE_COLOR),
            );
            ui.label(RichText::new(&self.config.display.subtitle).size(18.0));
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.show_toolbar(ui);
        });

        if let Some(footer) = &self.config.display.footer {
            egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(footer).size(11.0));
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.show_header(ui);
                    match &mut self.page {
                        PageState::Ready(dashboard) => dashboard.show(ui),
                        PageState::Failed(message) => {
                            ui.add_space(40.0);
                            ui.vertical_centered(|ui| {
                                ui.label(
                                    RichText::new(format!("Error: {}", message))
                                        .size(18.0)
                                        .color(ERROR_COLOR),
                                );
                            });
                        }
                    }
                });
        });
    }
}
