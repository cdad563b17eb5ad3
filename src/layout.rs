use crate::{
    Arguments, CATEGORY, DashboardSession, DashboardView, DashboardWidgets, Error, ExportKind,
    FileExtension, FilterSelection, Info, LocationAxis, MONTH_YEAR, MyStyle, Notification, REGION,
    SALES, SAMPLE_FILE_NAME, SEGMENT, SalesTable, SalesViewError, SalesViewResult, load_bytes,
    load_or_fallback, open_file, parse_date, sample_file_bytes, save_bytes,
};

use chrono::NaiveDate;
use egui::{
    Align, CentralPanel, Color32, Context, Direction, FontId, Frame, Grid, Hyperlink, Layout,
    RichText, ScrollArea, SidePanel, Stroke, TextEdit, TextStyle, TopBottomPanel, Ui, ViewportCommand,
    menu,
    style::Visuals, warn_if_debug_build, widgets,
};
use egui_extras::{Column, TableBuilder};
use polars::prelude::{AnyValue, Column as DataColumn, DataFrame, PolarsResult};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::oneshot::{self, Receiver, error::TryRecvError};
use tracing::error;

/// Result of an asynchronous save: the written path, or `None` if the dialog was cancelled.
pub type SaveResult = SalesViewResult<Option<PathBuf>>;

/// Column-structure reminder shown at the bottom of the side panel.
const FILE_STRUCTURE_NOTE: &str = "\
Please ensure the uploaded file follows this structure:
- Order ID, Order Date, Ship Date, Ship Mode, Customer ID, Customer Name, Segment, \
Country, City, State, Region, Category, Sub-Category, Sales, Quantity, Profit, etc.
- If unsure, download the sample file below for accurate formatting.";

/// Format of the Start Date / End Date inputs.
const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// A user interaction collected while drawing a frame, applied after all panels are drawn.
#[derive(Debug, Clone)]
enum UiAction {
    Open,
    LoadPath(PathBuf),
    LoadBytes { name: String, bytes: Arc<[u8]> },
    DownloadSample,
    Export(ExportKind),
    SetDateRange(NaiveDate, NaiveDate),
    Toggle {
        axis: LocationAxis,
        value: String,
        selected: bool,
    },
    ClearAxis(LocationAxis),
}

/// How bar lengths are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarScale {
    /// Fraction of the column total (pie-chart style shares).
    Total,
    /// Fraction of the largest value (bar / line chart style).
    Max,
}

/// The main application struct for Superstore View.
pub struct SalesViewApp {
    /// The loaded table and the current filter selection.
    session: Option<DashboardSession>,
    /// Tables derived from `session` by the last refresh.
    view: Option<DashboardView>,
    /// Path of the loaded dataset, shown in the bottom panel.
    source: Option<PathBuf>,
    /// Dataset used when nothing is supplied; also the sample file.
    fallback: PathBuf,
    /// Optional Notification window for displaying errors or confirmations.
    notification: Option<Box<dyn Notification>>,
    /// Text of the Start Date / End Date inputs, resynced on every refresh.
    date_inputs: [String; 2],

    /// Tokio runtime for the native dialogs and asynchronous writes.
    runtime: tokio::runtime::Runtime,
    /// Channel for receiving the result of an asynchronous save.
    pipe: Option<Receiver<SaveResult>>,
    /// Active asynchronous tasks.
    tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl SalesViewApp {
    /// Creates the app and loads the dataset named on the command line (or the fallback).
    pub fn new(cc: &eframe::CreationContext<'_>, args: &Arguments) -> SalesViewResult<Self> {
        cc.egui_ctx.set_style_init(Visuals::dark());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let mut app = SalesViewApp {
            session: None,
            view: None,
            source: None,
            fallback: args.fallback.clone(),
            notification: None,
            date_inputs: Default::default(),
            runtime,
            pipe: None,
            tasks: Vec::new(),
        };

        match load_or_fallback(args.path.as_deref(), &args.fallback) {
            Ok(table) => {
                let selection = args.selection(&table);
                let source = args.path.clone().unwrap_or_else(|| args.fallback.clone());
                app.install(table, source, selection);
            }
            Err(err) => app.report_load_error(err),
        }

        Ok(app)
    }

    // --- State transitions ---

    /// Replaces the session with a freshly loaded table and recomputes the view.
    fn install(&mut self, table: SalesTable, source: PathBuf, selection: FilterSelection) {
        tracing::info!("Loaded {source:?}: shape {:?}", table.df().shape());

        self.session = Some(DashboardSession::with_selection(table, selection));
        self.source = Some(source);
        self.notification = Some(Box::new(Info {
            title: "Loaded".to_string(),
            message: "File uploaded successfully!".to_string(),
        }));
        self.recompute();
    }

    /// A failed load ends the session: no partial table is kept.
    fn report_load_error(&mut self, err: SalesViewError) {
        error!("Data loading failed: {err}");

        self.session = None;
        self.view = None;
        self.source = None;
        self.notification = Some(Box::new(Error {
            message: format!("Error loading file: {err}"),
        }));
    }

    /// Runs the filter and aggregation pass for the current selection.
    fn recompute(&mut self) {
        let Some(session) = &mut self.session else {
            self.view = None;
            return;
        };

        match session.refresh() {
            Ok(view) => {
                let selection = session.selection();
                self.date_inputs = [
                    selection.date_start.to_string(),
                    selection.date_end.to_string(),
                ];
                self.view = Some(view);
            }
            Err(err) => {
                error!("Dashboard refresh failed: {err}");
                self.view = None;
                self.notification = Some(Box::new(Error {
                    message: err.to_string(),
                }));
            }
        }
    }

    fn load_path(&mut self, path: PathBuf) {
        match load_or_fallback(Some(&path), &self.fallback) {
            Ok(table) => {
                let selection = FilterSelection::for_table(&table);
                self.install(table, path, selection);
            }
            Err(err) => self.report_load_error(err),
        }
    }

    fn load_dropped_bytes(&mut self, name: String, bytes: &[u8]) {
        let extension = FileExtension::from_path(Path::new(&name));
        match load_bytes(bytes, &extension) {
            Ok(table) => {
                let selection = FilterSelection::for_table(&table);
                self.install(table, PathBuf::from(name), selection);
            }
            Err(err) => self.report_load_error(err),
        }
    }

    /// Applies one collected interaction. Returns `true` if the view must be recomputed.
    fn apply(&mut self, action: UiAction, ctx: &Context) -> bool {
        match action {
            UiAction::Open => {
                // Cancelling the dialog is reported as FileNotFound and ignored.
                if let Ok(path) = self.runtime.block_on(open_file()) {
                    self.load_path(path);
                }
                false
            }
            UiAction::LoadPath(path) => {
                self.load_path(path);
                false
            }
            UiAction::LoadBytes { name, bytes } => {
                self.load_dropped_bytes(name, &bytes);
                false
            }
            UiAction::DownloadSample => {
                match sample_file_bytes(&self.fallback) {
                    Ok(bytes) => self.run_save_future(bytes, SAMPLE_FILE_NAME, ctx),
                    Err(err) => self.notify_error(err),
                }
                false
            }
            UiAction::Export(kind) => {
                let bytes = match &self.view {
                    Some(view) => kind.bytes(view),
                    None => return false,
                };
                match bytes {
                    Ok(bytes) => self.run_save_future(bytes, kind.file_name(), ctx),
                    Err(err) => self.notify_error(err),
                }
                false
            }
            UiAction::SetDateRange(start, end) => match &mut self.session {
                Some(session) => {
                    session.set_date_range(start, end);
                    true
                }
                None => false,
            },
            UiAction::Toggle {
                axis,
                value,
                selected,
            } => match &mut self.session {
                Some(session) => {
                    let mut values = session.selection().values(axis).clone();
                    if selected {
                        values.insert(value);
                    } else {
                        values.remove(&value);
                    }
                    session.set_values(axis, values);
                    true
                }
                None => false,
            },
            UiAction::ClearAxis(axis) => match &mut self.session {
                Some(session) => {
                    session.set_values(axis, Default::default());
                    true
                }
                None => false,
            },
        }
    }

    fn notify_error(&mut self, err: SalesViewError) {
        error!("{err}");
        self.notification = Some(Box::new(Error {
            message: err.to_string(),
        }));
    }

    // --- Notifications and background tasks ---

    /// Checks if a Notification is active and displays it.
    fn check_notification(&mut self, ctx: &Context) {
        if let Some(notification) = &mut self.notification
            && !notification.show(ctx)
        {
            self.notification = None; // Remove closed Notification.
        }
    }

    /// Polls the pending save, if any. Returns `true` while it is still running.
    fn check_save_pending(&mut self) -> bool {
        let Some(mut output) = self.pipe.take() else {
            return false;
        };

        match output.try_recv() {
            Ok(Ok(Some(path))) => {
                self.notification = Some(Box::new(Info {
                    title: "Saved".to_string(),
                    message: format!("Saved to {}", path.display()),
                }));
                false
            }
            Ok(Ok(None)) => false, // Dialog cancelled.
            Ok(Err(err)) => {
                self.notify_error(err);
                false
            }
            Err(TryRecvError::Empty) => {
                // Put the receiver back to check again next frame.
                self.pipe = Some(output);
                true
            }
            Err(TryRecvError::Closed) => {
                self.notify_error(SalesViewError::ChannelReceive(
                    "Save operation terminated without response.".to_string(),
                ));
                false
            }
        }
    }

    /// Spawns the save dialog and write of `bytes` on the runtime.
    fn run_save_future(&mut self, bytes: Vec<u8>, file_name: &str, ctx: &Context) {
        // Before scheduling a new task, drop the finished ones.
        self.tasks.retain(|task| !task.is_finished());

        let (tx, rx) = oneshot::channel::<SaveResult>();
        self.pipe = Some(rx);

        let ctx_clone = ctx.clone();
        let file_name = file_name.to_string();

        let handle = self.runtime.spawn(async move {
            let result = save_bytes(bytes, file_name, ctx_clone.clone()).await;
            if tx.send(result).is_err() {
                error!("Receiver dropped before the save result could be sent.");
            }
            ctx_clone.request_repaint();
        });

        self.tasks.push(handle);
    }

    // --- Panels ---

    fn render_menu(&self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        menu::bar(ui, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open").clicked() {
                        actions.push(UiAction::Open);
                        ui.close_menu();
                    }

                    if ui.button("Download Sample File").clicked() {
                        actions.push(UiAction::DownloadSample);
                        ui.close_menu();
                    }

                    ui.menu_button("About", render_about);

                    if ui.button("Quit").clicked() {
                        ui.ctx().send_viewport_cmd(ViewportCommand::Close);
                    }
                });

                // Add spacing to align theme switch to the right.
                let delta = ui.available_width() - 15.0;
                if delta > 0.0 {
                    ui.add_space(delta);
                    widgets::global_theme_preference_switch(ui);
                }
            });
        });
    }

    fn render_filters(&mut self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        let (Some(session), Some(view)) = (&self.session, &self.view) else {
            ui.label("No data loaded.");
            return;
        };

        let selection = session.selection();
        let (min, max) = session.table().date_bounds();

        // 1. Date window, applied when an input loses focus (Enter or click away).
        ui.heading("Order Date");
        let [start_text, end_text] = &mut self.date_inputs;
        let mut committed = false;
        Grid::new("date_grid").num_columns(2).show(ui, |ui| {
            for (label, text) in [("Start Date", start_text), ("End Date", end_text)] {
                ui.label(label);
                let edit = TextEdit::singleline(text)
                    .hint_text("YYYY-MM-DD")
                    .desired_width(110.0);
                committed |= ui.add(edit).lost_focus();
                ui.end_row();
            }
        });
        if committed {
            let start = parse_date(&self.date_inputs[0], DATE_INPUT_FORMAT);
            let end = parse_date(&self.date_inputs[1], DATE_INPUT_FORMAT);
            match (start, end) {
                (Some(start), Some(end)) => {
                    if (start, end) != (selection.date_start, selection.date_end) {
                        actions.push(UiAction::SetDateRange(start, end));
                    }
                }
                _ => {
                    tracing::warn!("Ignoring date input {:?}", self.date_inputs);
                    self.date_inputs = [
                        selection.date_start.to_string(),
                        selection.date_end.to_string(),
                    ];
                }
            }
        }
        if ui
            .button("Reset dates")
            .on_hover_text(format!("{min} to {max}"))
            .clicked()
        {
            actions.push(UiAction::SetDateRange(min, max));
        }

        ui.separator();

        // 2. Cascading multiselects.
        ui.heading("Choose your filter: ");
        for axis in LocationAxis::ALL {
            let selected = selection.values(axis);
            let options = view.options.values(axis);

            ui.collapsing(axis.label(), |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("{} of {} selected", selected.len(), options.len()));
                    if !selected.is_empty() && ui.small_button("Clear").clicked() {
                        actions.push(UiAction::ClearAxis(axis));
                    }
                });

                ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                    for value in options {
                        let mut checked = selected.contains(value);
                        if ui.checkbox(&mut checked, value.as_str()).changed() {
                            actions.push(UiAction::Toggle {
                                axis,
                                value: value.clone(),
                                selected: checked,
                            });
                        }
                    }
                });
            });
        }
    }

    fn render_note(&self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        ui.separator();

        Frame::default()
            .stroke(Stroke::new(1.0, Color32::GRAY))
            .outer_margin(2.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new("Note:").strong());
                ui.label(FILE_STRUCTURE_NOTE);
            });

        if ui
            .button("Download Sample File")
            .on_hover_text(format!("Save {:?} as {SAMPLE_FILE_NAME}", self.fallback))
            .clicked()
        {
            actions.push(UiAction::DownloadSample);
        }
    }

    fn render_dashboard(&self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        let (Some(session), Some(view)) = (&self.session, &self.view) else {
            ui.centered_and_justified(|ui| {
                ui.label("Drag and drop a CSV, TXT, XLS or XLSX file here.");
            });
            return;
        };

        ui.heading(RichText::new("Sample SuperStore EDA").font(FontId::proportional(26.0)));

        ui.collapsing("Loaded data (first rows)", |ui| {
            render_table(ui, "head", &session.table().df().head(Some(5)));
        });

        ui.label(format!(
            "{} orders in the date window, {} after the location filter. Total sales: ${:.2}",
            view.date_filtered.height(),
            view.filtered.height(),
            view.total_sales
        ));
        ui.separator();

        // Category and region.
        ui.columns(2, |columns| {
            columns[0].heading("Category wise Sales");
            render_bars(&mut columns[0], "category_bars", &view.category, CATEGORY, BarScale::Max);
            columns[0].collapsing("Category_ViewData", |ui| {
                render_table(ui, "category", &view.category);
                download_button(ui, ExportKind::Category, actions);
            });

            columns[1].heading("Region wise Sales");
            render_bars(&mut columns[1], "region_bars", &view.region, REGION, BarScale::Total);
            columns[1].collapsing("Region_ViewData", |ui| {
                render_table(ui, "region", &view.region);
                download_button(ui, ExportKind::Region, actions);
            });
        });
        ui.separator();

        // Time series.
        ui.heading("Time Series Analysis");
        render_bars(ui, "monthly_bars", &view.monthly, MONTH_YEAR, BarScale::Max);
        ui.collapsing("View Data of TimeSeries:", |ui| {
            render_table(ui, "monthly", &view.monthly);
            download_button(ui, ExportKind::TimeSeries, actions);
        });
        ui.separator();

        // Treemap data.
        ui.heading("Hierarchical view of Sales");
        render_table(ui, "hierarchy", &view.hierarchy);
        ui.separator();

        // Segment and category shares.
        ui.columns(2, |columns| {
            columns[0].heading("Segment wise Sales");
            render_bars(&mut columns[0], "segment_bars", &view.segment, SEGMENT, BarScale::Total);

            columns[1].heading("Category wise Sales");
            render_table(&mut columns[1], "category_share", &view.category_share);
        });
        ui.separator();

        // Summary and pivot.
        ui.heading("Month wise Sub-Category Sales Summary");
        ui.collapsing("Summary_Table", |ui| {
            render_table(ui, "summary", &view.summary);
            ui.label(RichText::new("Month wise sub-Category Table").strong());
            render_table(ui, "pivot", &view.sub_category_by_month);
        });
        ui.separator();

        // Scatter data.
        ui.heading("Relationship between Sales and Profits");
        ui.collapsing(format!("Sales, Profit and Quantity ({} points)", view.sales_profit.height()), |ui| {
            render_table(ui, "sales_profit", &view.sales_profit);
        });
        ui.separator();

        ui.collapsing("View Data", |ui| {
            render_table(ui, "preview", &view.preview);
        });

        download_button(ui, ExportKind::Data, actions);
    }
}

// See
// https://github.com/emilk/egui/blob/master/examples/custom_window_frame/src/main.rs

impl eframe::App for SalesViewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Check and display any active Notifications (errors, confirmations).
        self.check_notification(ctx);
        let save_pending = self.check_save_pending();

        let mut actions: Vec<UiAction> = Vec::new();

        // Handle dropped files.
        if let Some(dropped_file) = ctx.input(|i| i.raw.dropped_files.last().cloned()) {
            if let Some(path) = dropped_file.path {
                actions.push(UiAction::LoadPath(path));
            } else if let Some(bytes) = dropped_file.bytes {
                actions.push(UiAction::LoadBytes {
                    name: dropped_file.name,
                    bytes,
                });
            }
        }

        //  | menu_bar            theme |
        //  -----------------------------
        //  |         |                 |
        //  | Filters |    dashboard    |
        //  |         |                 |
        //  -----------------------------
        //  | current file              |

        TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_menu(ui, &mut actions);
        });

        SidePanel::left("side_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    self.render_filters(ui, &mut actions);
                    self.render_note(ui, &mut actions);
                });
            });

        TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.source {
                    Some(path) => ui.label(format!("{path:#?}")),
                    None => ui.label("no file set"),
                };
                if save_pending {
                    ui.spinner();
                }
            });
        });

        // CentralPanel must be added after all other panels in your egui layout!
        CentralPanel::default().show(ctx, |ui| {
            warn_if_debug_build(ui);

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_dashboard(ui, &mut actions);
                });
        });

        // Apply interactions after drawing, then recompute at most once.
        let mut dirty = false;
        for action in actions {
            dirty |= self.apply(action, ctx);
        }
        if dirty {
            self.recompute();
            ctx.request_repaint();
        }
    }
}

// --- Widgets ---

fn render_about(ui: &mut Ui) {
    Frame::default()
        .stroke(Stroke::new(1.0, Color32::GRAY))
        .outer_margin(2.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            let version = env!("CARGO_PKG_VERSION");
            let description = env!("CARGO_PKG_DESCRIPTION");

            Grid::new("about_grid")
                .num_columns(1)
                .spacing([10.0, 4.0])
                .show(ui, |ui| {
                    ui.with_layout(Layout::centered_and_justified(Direction::LeftToRight), |ui| {
                        ui.label(RichText::new("Superstore View").font(FontId::proportional(30.0)));
                    });
                    ui.end_row();

                    ui.label(format!("Version: {version}"));
                    ui.end_row();

                    ui.label(description);
                    ui.end_row();

                    ui.horizontal(|ui| {
                        let url = "https://github.com/pola-rs/polars";
                        ui.label("Powered by ");
                        ui.add(Hyperlink::from_label_and_url("Polars", url))
                            .on_hover_text(url);
                    });
                    ui.end_row();

                    ui.horizontal(|ui| {
                        let url = "https://github.com/emilk/egui";
                        ui.label("Built with ");
                        ui.add(Hyperlink::from_label_and_url("egui", url))
                            .on_hover_text(url);
                    });
                    ui.end_row();
                });
        });
}

fn download_button(ui: &mut Ui, kind: ExportKind, actions: &mut Vec<UiAction>) {
    if ui
        .button(kind.button_label())
        .on_hover_text(format!("Save {kind} as a CSV file"))
        .clicked()
    {
        actions.push(UiAction::Export(kind));
    }
}

/// `(key, Sales)` pairs of an aggregate table.
fn bar_rows(df: &DataFrame, key: &str) -> PolarsResult<Vec<(String, f64)>> {
    let keys = df.column(key)?.str()?;
    let sales = df.column(SALES)?.f64()?;

    Ok(keys
        .iter()
        .zip(sales.iter())
        .map(|(k, v)| (k.unwrap_or("(null)").to_string(), v.unwrap_or(0.0)))
        .collect())
}

/// One labelled bar per row of an aggregate table.
fn render_bars(ui: &mut Ui, id: &str, df: &DataFrame, key: &str, scale: BarScale) {
    let rows = match bar_rows(df, key) {
        Ok(rows) => rows,
        Err(err) => {
            ui.colored_label(Color32::RED, err.to_string());
            return;
        }
    };

    if rows.is_empty() {
        ui.label("No sales in the current selection.");
        return;
    }

    let denominator = match scale {
        BarScale::Total => rows.iter().map(|(_, v)| v).sum::<f64>(),
        BarScale::Max => rows.iter().map(|(_, v)| *v).fold(0.0, f64::max),
    };

    Grid::new(id).num_columns(2).striped(true).show(ui, |ui| {
        for (label, value) in rows {
            let fraction = if denominator > 0.0 {
                (value / denominator) as f32
            } else {
                0.0
            };
            let text = match scale {
                BarScale::Total => format!("${value:.2} ({:.1}%)", fraction * 100.0),
                BarScale::Max => format!("${value:.2}"),
            };

            ui.label(label);
            ui.share_bar(fraction, text);
            ui.end_row();
        }
    });
}

/// Formats one cell and picks its alignment from the column type.
fn cell_text(column: &DataColumn, row_index: usize) -> (String, Layout) {
    let dtype = column.dtype();

    let layout = if dtype.is_float() || dtype.is_integer() {
        Layout::right_to_left(Align::Center)
    } else if dtype.is_date() {
        Layout::centered_and_justified(Direction::LeftToRight)
    } else {
        Layout::left_to_right(Align::Center)
    };

    let text = match column.get(row_index) {
        Ok(AnyValue::Float64(f)) => format!("{f:.2}"),
        Ok(AnyValue::Float32(f)) => format!("{f:.2}"),
        Ok(AnyValue::String(s)) => s.to_string(),
        Ok(AnyValue::Null) => String::new(),
        Ok(any_value) => any_value.to_string(),
        Err(_) => "Error: Value not found".to_string(),
    };

    (text, layout)
}

/// Renders a DataFrame as a striped, resizable `egui_extras` table.
fn render_table(ui: &mut Ui, id: &str, df: &DataFrame) {
    if df.width() == 0 {
        ui.label("(no columns)");
        return;
    }

    let style = ui.style();
    let text_height = TextStyle::Body.resolve(style).size + style.spacing.item_spacing.y;
    let header_height = style.spacing.interact_size.y + 2.0 * style.spacing.item_spacing.y;

    let column = Column::auto().at_least(60.0).resizable(true).clip(true);

    ui.push_id(id, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(320.0)
            .columns(column, df.width())
            .header(header_height, |mut header| {
                for column_name in df.get_column_names() {
                    header.col(|ui| {
                        ui.table_header(column_name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, df.height(), |mut table_row| {
                    let row_index = table_row.index();
                    for column in df.columns() {
                        let (value, layout) = cell_text(column, row_index);
                        table_row.col(|ui| {
                            ui.with_layout(layout.with_main_wrap(false), |ui| {
                                ui.label(value);
                            });
                        });
                    }
                });
            });
    });
}
