//! Main application UI and state management.
//! Handles the problem list, problem detail (notes, code, tests) and review sessions.

use dsa_prep_app::config::{AppConfig, ReviewMode};
use dsa_prep_app::database::{SqliteReviewStore, db};
use dsa_prep_app::export::json::{
    draft_from_url, export_problem_to_path, export_review_states, import_problem,
    parse_slug, restore_review_states,
};
use dsa_prep_app::models::progress::{ProblemProgress, ProblemStatus};
use dsa_prep_app::models::sm2::format_interval;
use dsa_prep_app::models::{
    Catalogue, PatternFilter, Problem, QuizQuestion, QuizSession, Rating, ReviewSession,
    SessionPhase, SessionSummary,
};
use dsa_prep_app::runner::{CodeRunner, ExecutionReport, NodeRunner};
use dsa_prep_app::state::{CustomProblems, Debouncer};
use chrono::{DateTime, Utc};
use eframe::egui;
use rusqlite::Connection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Application screen states
#[derive(Default, PartialEq)]
enum AppScreen {
    #[default]
    Main,
    Problem,
    Review,
}

enum ActiveReview {
    Quiz(QuizSession),
    Flashcards(ReviewSession<SqliteReviewStore>),
}

/// Main application state
pub struct StudyApp {
    show_confirmation_dialog: bool,
    allowed_to_close: bool,

    catalogue: Catalogue,
    custom: CustomProblems,
    custom_changed: Arc<AtomicBool>,
    conn: Arc<Mutex<Connection>>,
    config: AppConfig,

    current_screen: AppScreen,
    current_date_display: String,
    search_query: String,

    selected_problem: Option<String>,
    progress: ProblemProgress,
    notes_text: String,
    notes_writer: Option<Debouncer<(String, String)>>,
    code_text: String,

    runner: Arc<dyn CodeRunner>,
    runner_supported: bool,
    pending_run: Option<Receiver<dsa_prep_app::Result<ExecutionReport>>>,
    last_report: Option<ExecutionReport>,

    review_mode: ReviewMode,
    pattern_filter: PatternFilter,
    review: Option<ActiveReview>,

    import_url: String,
    import_pattern: String,
    show_result_dialog: bool,
    result_message: String,
}

impl eframe::App for StudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.custom_changed.swap(false, Ordering::SeqCst) {
            self.catalogue.set_custom(&self.custom.snapshot());
        }
        self.poll_run(ctx);

        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Problem => self.render_problem_screen(ctx),
            AppScreen::Review => self.render_review_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            // Flush pending notes before the window goes away
                            self.notes_writer = None;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_result_dialog {
            egui::Window::new("Import/Export Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl StudyApp {
    pub fn new(catalogue: Catalogue, custom: CustomProblems, conn: Connection, config: AppConfig) -> Self {
        let custom_changed = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&custom_changed);
        custom.subscribe(move |_| flag.store(true, Ordering::SeqCst));

        let runner: Arc<dyn CodeRunner> =
            Arc::new(NodeRunner::new(config.node_binary(), config.code_timeout()));
        let runner_supported = runner.is_supported();
        if !runner_supported {
            log::info!("No JavaScript runtime found, test runs disabled");
        }

        let import_pattern = catalogue
            .patterns()
            .first()
            .map(|p| p.id.clone())
            .unwrap_or_default();

        Self {
            show_confirmation_dialog: false,
            allowed_to_close: false,
            catalogue,
            custom,
            custom_changed,
            conn: Arc::new(Mutex::new(conn)),
            review_mode: config.default_review_mode,
            config,
            current_screen: AppScreen::Main,
            current_date_display: String::new(),
            search_query: String::new(),
            selected_problem: None,
            progress: ProblemProgress::default(),
            notes_text: String::new(),
            notes_writer: None,
            code_text: String::new(),
            runner,
            runner_supported,
            pending_run: None,
            last_report: None,
            pattern_filter: PatternFilter::All,
            review: None,
            import_url: String::new(),
            import_pattern,
            show_result_dialog: false,
            result_message: String::new(),
        }
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&conn)
    }

    /// Current date on the study clock
    fn now(&self) -> DateTime<Utc> {
        self.with_conn(db::get_current_date).unwrap_or_else(|e| {
            log::warn!("Study clock unavailable: {}", e);
            Utc::now()
        })
    }

    fn show_message(&mut self, message: String) {
        self.result_message = message;
        self.show_result_dialog = true;
    }

    /// Renders the main screen with the problem list
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        let mut action_open: Option<String> = None;
        let mut action_bookmark: Option<String> = None;
        let mut action_next_day = false;
        let mut action_review = false;
        let mut action_import_file = false;
        let mut action_export_history = false;
        let mut action_import_history = false;
        let mut action_draft = false;

        let now = self.now();
        self.current_date_display = now.format("%Y-%m-%d").to_string();
        let all_progress = self.with_conn(db::load_all_progress).unwrap_or_default();
        let stats = self.with_conn(db::progress_stats).unwrap_or_default();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.current_date_display);
                if ui.button("Next Day").clicked() {
                    action_next_day = true;
                }
                ui.separator();
                ui.label(format!(
                    "Solved {} / {} · Attempted {} · Mastered {}",
                    stats.solved,
                    self.catalogue.problems().len(),
                    stats.attempted,
                    stats.mastered
                ));
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Review").clicked() {
                    action_review = true;
                }
                if ui.button("Import Problem File").clicked() {
                    action_import_file = true;
                }
                if ui.button("Export Review History").clicked() {
                    action_export_history = true;
                }
                if ui.button("Import Review History").clicked() {
                    action_import_history = true;
                }
            });

            ui.separator();
            ui.heading("Import From LeetCode URL");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.import_url);
                let selected = self
                    .catalogue
                    .pattern_name(&self.import_pattern)
                    .unwrap_or("Pattern")
                    .to_string();
                egui::ComboBox::from_id_source("import_pattern")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for pattern in self.catalogue.patterns() {
                            ui.selectable_value(
                                &mut self.import_pattern,
                                pattern.id.clone(),
                                &pattern.name,
                            );
                        }
                    });
                if ui.button("Create Draft").clicked() {
                    action_draft = true;
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Search:");
                ui.text_edit_singleline(&mut self.search_query);
            });

            let matches = self.catalogue.search(&self.search_query);

            egui::ScrollArea::vertical()
                .id_source("problems_list")
                .show(ui, |ui| {
                    for pattern in self.catalogue.patterns() {
                        let problems: Vec<&&Problem> =
                            matches.iter().filter(|p| p.pattern == pattern.id).collect();
                        if problems.is_empty() {
                            continue;
                        }
                        ui.heading(format!("{} ({})", pattern.name, problems.len()));
                        for problem in problems {
                            let progress = all_progress.get(&problem.id).cloned().unwrap_or_default();
                            ui.horizontal(|ui| {
                                let star = if progress.bookmarked { "★" } else { "☆" };
                                if ui.button(star).clicked() {
                                    action_bookmark = Some(problem.id.clone());
                                }
                                if ui
                                    .selectable_label(
                                        false,
                                        format!("{} [{}]", problem.title, problem.difficulty.as_str()),
                                    )
                                    .clicked()
                                {
                                    action_open = Some(problem.id.clone());
                                }
                                ui.label(progress.status.as_str());
                            });
                        }
                        ui.add_space(8.0);
                    }
                });
        });

        // Execute deferred actions
        if action_next_day {
            if let Err(e) = self.with_conn(db::advance_day) {
                log::warn!("Failed to advance study clock: {}", e);
            }
        }
        if let Some(id) = action_bookmark {
            if let Err(e) = self.with_conn(|conn| db::toggle_bookmark(conn, &id)) {
                log::warn!("Failed to toggle bookmark for '{}': {}", id, e);
            }
        }
        if let Some(id) = action_open {
            self.open_problem(&id);
        }
        if action_review {
            self.start_review();
        }
        if action_import_file {
            self.handle_import();
        }
        if action_export_history {
            self.handle_export_history();
        }
        if action_import_history {
            self.handle_import_history();
        }
        if action_draft {
            self.handle_draft();
        }
    }

    fn open_problem(&mut self, problem_id: &str) {
        let problem = match self.catalogue.require(problem_id) {
            Ok(problem) => problem,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };
        self.progress = self
            .with_conn(|conn| db::get_progress(conn, problem_id))
            .unwrap_or_default();
        self.notes_text = self.progress.notes.clone();
        self.code_text = self
            .progress
            .code
            .clone()
            .unwrap_or_else(|| problem.starter_code.clone());
        self.last_report = None;

        let conn = Arc::clone(&self.conn);
        // Replacing the writer flushes notes of the previous problem
        self.notes_writer = Some(Debouncer::new(
            self.config.notes_debounce(),
            move |(id, notes): (String, String)| {
                let conn = conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if let Err(e) = db::save_notes(&conn, &id, &notes) {
                    log::warn!("Failed to save notes for '{}': {}", id, e);
                }
            },
        ));

        self.selected_problem = Some(problem_id.to_string());
        self.current_screen = AppScreen::Problem;
    }

    /// Renders a single problem with status, notes, code and test results
    fn render_problem_screen(&mut self, ctx: &egui::Context) {
        let Some(problem) = self
            .selected_problem
            .as_deref()
            .and_then(|id| self.catalogue.get_by_id(id))
            .cloned()
        else {
            self.current_screen = AppScreen::Main;
            return;
        };

        let mut action_status: Option<ProblemStatus> = None;
        let mut action_bookmark = false;
        let mut action_save_code = false;
        let mut action_run = false;
        let mut action_export = false;
        let mut action_back = false;
        let mut notes_changed = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().id_source("problem_detail").show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Back").clicked() {
                        action_back = true;
                    }
                    ui.heading(&problem.title);
                    ui.label(problem.difficulty.as_str());
                    let star = if self.progress.bookmarked { "★" } else { "☆" };
                    if ui.button(star).clicked() {
                        action_bookmark = true;
                    }
                });
                if let Some(url) = &problem.leetcode_url {
                    ui.hyperlink(url);
                }
                ui.label(&problem.description);

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Status:");
                    for status in ProblemStatus::ALL {
                        if ui
                            .selectable_label(self.progress.status == status, status.as_str())
                            .clicked()
                        {
                            action_status = Some(status);
                        }
                    }
                });

                for step in &problem.steps {
                    ui.collapsing(&step.title, |ui| {
                        if !step.hint.is_empty() {
                            ui.label(format!("Hint: {}", step.hint));
                        }
                        if !step.approach.is_empty() {
                            ui.label(&step.approach);
                        }
                        if !step.code.is_empty() {
                            ui.code(&step.code);
                        }
                        if !step.complexity.is_empty() {
                            ui.label(format!("Complexity: {}", step.complexity));
                        }
                    });
                }

                ui.separator();
                ui.heading("Notes");
                notes_changed = ui.text_edit_multiline(&mut self.notes_text).changed();

                ui.separator();
                ui.heading("Solution");
                ui.add(
                    egui::TextEdit::multiline(&mut self.code_text)
                        .code_editor()
                        .desired_rows(12)
                        .desired_width(f32::INFINITY),
                );
                ui.horizontal(|ui| {
                    if ui.button("Save Code").clicked() {
                        action_save_code = true;
                    }
                    if self.runner_supported {
                        let running = self.pending_run.is_some();
                        if ui
                            .add_enabled(!running, egui::Button::new("Run Tests"))
                            .clicked()
                        {
                            action_run = true;
                        }
                        if running {
                            ui.spinner();
                        }
                    } else {
                        ui.label("Running tests needs Node.js on PATH");
                    }
                    if ui.button("Export Problem").clicked() {
                        action_export = true;
                    }
                });

                if let Some(report) = &self.last_report {
                    render_report(ui, report);
                }
            });
        });

        let id = problem.id.clone();
        if notes_changed {
            self.progress.notes = self.notes_text.clone();
            if let Some(writer) = &self.notes_writer {
                writer.push((id.clone(), self.notes_text.clone()));
            }
        }
        if let Some(status) = action_status {
            let now = self.now();
            match self.with_conn(|conn| db::update_status(conn, &id, status, now)) {
                Ok(()) => {
                    self.progress.status = status;
                    self.progress.last_attempted = Some(now);
                }
                Err(e) => log::warn!("Failed to update status for '{}': {}", id, e),
            }
        }
        if action_bookmark {
            match self.with_conn(|conn| db::toggle_bookmark(conn, &id)) {
                Ok(bookmarked) => self.progress.bookmarked = bookmarked,
                Err(e) => log::warn!("Failed to toggle bookmark for '{}': {}", id, e),
            }
        }
        if action_save_code {
            let language = self.progress.language;
            match self.with_conn(|conn| db::save_code(conn, &id, &self.code_text, language)) {
                Ok(()) => self.progress.code = Some(self.code_text.clone()),
                Err(e) => self.show_message(format!("Failed to save code: {}", e)),
            }
        }
        if action_run {
            self.start_run(&problem);
        }
        if action_export {
            self.handle_export_problem(&problem);
        }
        if action_back {
            self.current_screen = AppScreen::Main;
        }
    }

    /// Runs the tests on a worker thread so the UI keeps drawing
    fn start_run(&mut self, problem: &Problem) {
        let (sender, receiver) = mpsc::channel();
        let runner = Arc::clone(&self.runner);
        let code = self.code_text.clone();
        let test_cases = problem.test_cases.clone();
        std::thread::spawn(move || {
            let _ = sender.send(runner.execute(&code, &test_cases));
        });
        self.pending_run = Some(receiver);
        self.last_report = None;
    }

    fn poll_run(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.pending_run else {
            return;
        };
        match receiver.try_recv() {
            Ok(result) => {
                self.pending_run = None;
                self.last_report = Some(result.unwrap_or_else(|e| ExecutionReport {
                    error: Some(e.to_string()),
                    ..Default::default()
                }));
            }
            Err(mpsc::TryRecvError::Empty) => ctx.request_repaint_after(Duration::from_millis(100)),
            Err(mpsc::TryRecvError::Disconnected) => self.pending_run = None,
        }
    }

    fn start_review(&mut self) {
        let now = self.now();
        self.review = Some(match self.review_mode {
            ReviewMode::Quiz => ActiveReview::Quiz(QuizSession::new(
                self.catalogue.quiz_questions(),
                self.pattern_filter.clone(),
            )),
            ReviewMode::Flashcard => ActiveReview::Flashcards(ReviewSession::new(
                self.catalogue.review_cards(),
                self.pattern_filter.clone(),
                SqliteReviewStore::new(Arc::clone(&self.conn)),
                now,
            )),
        });
        self.current_screen = AppScreen::Review;
    }

    /// Renders the review screen for quiz or flashcard mode
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        let now = self.now();
        let mut action_mode: Option<ReviewMode> = None;
        let mut action_filter: Option<PatternFilter> = None;
        let mut action_back = false;

        let filter_text = match &self.pattern_filter {
            PatternFilter::All => "All Patterns".to_string(),
            PatternFilter::Pattern(id) => self.catalogue.pattern_name(id).unwrap_or(id).to_string(),
        };
        let pattern_counts: Vec<(String, String, usize)> = self
            .catalogue
            .patterns()
            .iter()
            .map(|p| (p.id.clone(), p.name.clone(), self.catalogue.card_count_for_pattern(&p.id)))
            .filter(|(_, _, count)| *count > 0)
            .collect();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Back to Main Screen").clicked() {
                    action_back = true;
                }
                if ui
                    .selectable_label(self.review_mode == ReviewMode::Quiz, "Quiz")
                    .clicked()
                {
                    action_mode = Some(ReviewMode::Quiz);
                }
                if ui
                    .selectable_label(self.review_mode == ReviewMode::Flashcard, "Cards")
                    .clicked()
                {
                    action_mode = Some(ReviewMode::Flashcard);
                }
                egui::ComboBox::from_id_source("pattern_filter")
                    .selected_text(filter_text)
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(self.pattern_filter == PatternFilter::All, "All Patterns").clicked() {
                            action_filter = Some(PatternFilter::All);
                        }
                        for (id, name, count) in &pattern_counts {
                            let filter = PatternFilter::Pattern(id.clone());
                            if ui
                                .selectable_label(self.pattern_filter == filter, format!("{} ({})", name, count))
                                .clicked()
                            {
                                action_filter = Some(filter);
                            }
                        }
                    });
            });
            ui.separator();

            match &mut self.review {
                Some(ActiveReview::Quiz(session)) => render_quiz(ui, session),
                Some(ActiveReview::Flashcards(session)) => render_flashcards(ui, session, now),
                None => {
                    ui.label("No review in progress");
                }
            }
        });

        if let Some(mode) = action_mode {
            self.review_mode = mode;
            self.start_review();
        }
        if let Some(filter) = action_filter {
            self.pattern_filter = filter.clone();
            match &mut self.review {
                Some(ActiveReview::Quiz(session)) => session.set_filter(filter),
                Some(ActiveReview::Flashcards(session)) => session.set_filter(filter, now),
                None => {}
            }
        }
        if action_back {
            self.review = None;
            self.current_screen = AppScreen::Main;
        }
    }

    /// Handles problem import from a JSON file
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        match import_problem(&path) {
            Ok(problem) => {
                self.add_custom_problem(problem);
            }
            Err(e) => self.show_message(format!(
                "Import failed: {}\n\nThe file must hold one problem:\n{{\n  \"id\": \"two-sum\",\n  \"title\": \"Two Sum\",\n  \"pattern\": \"array-hashing\",\n  ...\n}}",
                e
            )),
        }
    }

    fn handle_draft(&mut self) {
        // A problem already known under this slug is opened instead of drafted
        let existing = parse_slug(&self.import_url)
            .and_then(|slug| self.catalogue.get_by_slug(&slug).map(|p| p.id.clone()));
        if let Some(id) = existing {
            self.import_url.clear();
            self.open_problem(&id);
            return;
        }
        match draft_from_url(&self.import_url, &self.import_pattern) {
            Ok(problem) => {
                let id = problem.id.clone();
                if self.add_custom_problem(problem) {
                    self.import_url.clear();
                    self.catalogue.set_custom(&self.custom.snapshot());
                    self.open_problem(&id);
                }
            }
            Err(e) => self.show_message(format!(
                "{}\nExample: https://leetcode.com/problems/two-sum/",
                e
            )),
        }
    }

    /// Stores an imported problem unless a built-in one already owns its id.
    fn add_custom_problem(&mut self, problem: Problem) -> bool {
        let is_custom = self.custom.snapshot().iter().any(|p| p.id == problem.id);
        if !is_custom && self.catalogue.get_by_id(&problem.id).is_some() {
            self.show_message(format!(
                "Problem '{}' already exists in the built-in set.",
                problem.id
            ));
            return false;
        }
        if let Err(e) = self.with_conn(|conn| db::save_imported_problem(conn, &problem)) {
            log::warn!("Failed to persist imported problem '{}': {}", problem.id, e);
        }
        self.show_message(format!(
            "Problem '{}' imported with {} flashcards!",
            problem.title,
            problem.flashcards.len()
        ));
        self.custom.add(problem);
        true
    }

    fn handle_export_problem(&mut self, problem: &Problem) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.json", problem.id))
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };
        match export_problem_to_path(problem, &path) {
            Ok(()) => self.show_message(format!("Problem '{}' exported successfully!", problem.title)),
            Err(e) => self.show_message(format!("Export failed: {}", e)),
        }
    }

    fn handle_export_history(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("review-history.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };
        let result = self
            .with_conn(db::load_all_review_states)
            .and_then(|states| export_review_states(&states, &path).map(|()| states.len()));
        match result {
            Ok(count) => self.show_message(format!("Exported review history for {} cards", count)),
            Err(e) => self.show_message(format!("Export failed: {}", e)),
        }
    }

    /// Restores a review history backup into the database
    fn handle_import_history(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };
        let mut store = SqliteReviewStore::new(Arc::clone(&self.conn));
        match restore_review_states(&path, &mut store) {
            Ok(count) => self.show_message(format!("Restored review history for {} cards", count)),
            Err(e) => self.show_message(format!("Import failed: {}", e)),
        }
    }
}

fn render_report(ui: &mut egui::Ui, report: &ExecutionReport) {
    ui.separator();
    if let Some(error) = &report.error {
        ui.colored_label(egui::Color32::LIGHT_RED, error);
    }
    if !report.test_results.is_empty() {
        ui.label(format!(
            "{} / {} tests passed",
            report.passed_count(),
            report.test_results.len()
        ));
    }
    for result in &report.test_results {
        let (color, mark) = if result.passed {
            (egui::Color32::LIGHT_GREEN, "PASS")
        } else {
            (egui::Color32::LIGHT_RED, "FAIL")
        };
        ui.colored_label(color, format!("{} {}", mark, result.description));
        if !result.passed {
            ui.label(format!("  args: {}", result.args));
            ui.label(format!("  expected: {}", result.expected));
            match (&result.actual, &result.error) {
                (_, Some(error)) => ui.label(format!("  error: {}", error)),
                (Some(actual), None) => ui.label(format!("  actual: {}", actual)),
                (None, None) => ui.label("  actual: undefined"),
            };
        }
    }
    if !report.output.is_empty() {
        ui.label("Console:");
        ui.code(&report.output);
    }
}

fn render_progress(ui: &mut egui::Ui, done: usize, total: usize) {
    if total > 0 {
        ui.add(
            egui::ProgressBar::new((done as f32 / total as f32).min(1.0))
                .text(format!("{} completed · {} total", done, total)),
        );
    }
}

fn render_summary(ui: &mut egui::Ui, summary: SessionSummary, quiz: bool) -> bool {
    let mut restart = false;
    ui.vertical_centered(|ui| {
        ui.heading(if quiz { "Quiz Complete!" } else { "Session Complete!" });
        if let Some(score) = summary.score {
            ui.label(format!(
                "Accuracy {}% · Correct {} · Wrong {}",
                score.accuracy_percent().unwrap_or(0),
                score.correct,
                score.wrong()
            ));
        }
        ui.label(format!(
            "You {} {} {}.{}",
            if quiz { "answered" } else { "reviewed" },
            summary.reviewed,
            if quiz { "questions" } else { "cards" },
            if summary.is_great() { " Great work!" } else { " Keep practicing!" }
        ));
        ui.add_space(20.0);
        if ui.button(if quiz { "Retake Quiz" } else { "Review Again" }).clicked() {
            restart = true;
        }
    });
    restart
}

fn render_quiz(ui: &mut egui::Ui, session: &mut QuizSession) {
    let score = session.score();
    ui.horizontal(|ui| {
        ui.label(format!("Questions: {}", session.question_count()));
        ui.separator();
        ui.label(format!("Completed: {}", session.reviewed_count()));
        ui.separator();
        match score.accuracy_percent() {
            Some(accuracy) => ui.label(format!("Accuracy: {}%", accuracy)),
            None => ui.label("Accuracy: -"),
        };
        if session.question_count() > 0 && ui.button("Reshuffle").clicked() {
            session.reshuffle();
        }
    });
    render_progress(ui, session.reviewed_count(), session.question_count());
    ui.add_space(10.0);

    match session.phase() {
        SessionPhase::Empty => {
            ui.heading("No quiz questions available");
            ui.label("No questions found for this filter. Try selecting a different pattern.");
        }
        SessionPhase::Complete => {
            if render_summary(ui, session.summary(), true) {
                session.restart();
            }
        }
        SessionPhase::Presenting | SessionPhase::Revealed => {
            let Some(question) = session.current_question().cloned() else {
                return;
            };
            let selected = session.selected_option();
            let mut action_select: Option<usize> = None;
            let mut action_next = false;

            ui.label(format!(
                "Q {} of {} | {}",
                session.position() + 1,
                session.question_count(),
                question.difficulty.as_str()
            ));
            ui.group(|ui| {
                ui.heading(&question.question);
                ui.add_space(10.0);
                for (idx, option) in question.options.iter().enumerate() {
                    let text = format!("{}. {}", QuizQuestion::option_label(idx), option);
                    match selected {
                        None => {
                            if ui.button(text).clicked() {
                                action_select = Some(idx);
                            }
                        }
                        Some(choice) => {
                            if question.is_correct(idx) {
                                ui.colored_label(egui::Color32::LIGHT_GREEN, text);
                            } else if idx == choice {
                                ui.colored_label(egui::Color32::LIGHT_RED, text);
                            } else {
                                ui.weak(text);
                            }
                        }
                    }
                }
                if selected.is_some() {
                    ui.add_space(10.0);
                    ui.strong("Explanation");
                    ui.label(&question.explanation);
                }
            });

            if selected.is_some() {
                let label = if session.is_last() { "Finish" } else { "Next Question" };
                if ui.button(label).clicked() {
                    action_next = true;
                }
            }

            if let Some(idx) = action_select {
                if let Err(e) = session.select(idx) {
                    log::debug!("Ignored quiz selection: {}", e);
                }
            }
            if action_next {
                if let Err(e) = session.next() {
                    log::debug!("Ignored next: {}", e);
                }
            }
        }
    }
}

fn render_flashcards(
    ui: &mut egui::Ui,
    session: &mut ReviewSession<SqliteReviewStore>,
    now: DateTime<Utc>,
) {
    let stats = session.stats();
    ui.horizontal(|ui| {
        ui.label(format!("Due Today: {}", session.due_count()));
        ui.separator();
        ui.label(format!("Completed: {}", session.reviewed_count()));
        ui.separator();
        ui.label(format!("Day Streak: {}", stats.streak));
    });
    render_progress(ui, session.reviewed_count(), session.due_count());
    ui.add_space(10.0);

    match session.phase() {
        SessionPhase::Empty => {
            ui.heading("All caught up!");
            ui.label("No cards are due for review right now. Come back later or solve more problems.");
        }
        SessionPhase::Complete => {
            if render_summary(ui, session.summary(), false) {
                session.restart(now);
            }
        }
        phase @ (SessionPhase::Presenting | SessionPhase::Revealed) => {
            let Some(card) = session.current_card().cloned() else {
                return;
            };
            let preview = session.preview_intervals();
            let mut action_reveal = false;
            let mut action_rate: Option<Rating> = None;

            ui.label(format!(
                "Card {} of {} | {}",
                session.position() + 1,
                session.due_count(),
                card.problem_title
            ));
            ui.group(|ui| {
                ui.set_min_height(200.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading(&card.front);
                    ui.add_space(20.0);
                    if phase == SessionPhase::Revealed {
                        ui.label(&card.back);
                    } else if ui.button("Show Answer").clicked() {
                        action_reveal = true;
                    }
                    ui.add_space(20.0);
                });
            });

            if phase == SessionPhase::Revealed {
                ui.label("How well did you recall it?");
                ui.horizontal(|ui| {
                    for (i, rating) in Rating::ALL.into_iter().enumerate() {
                        let hint = preview
                            .map(|p| format_interval(p[i]))
                            .unwrap_or_default();
                        if ui.button(format!("{} ({})", rating.label(), hint)).clicked() {
                            action_rate = Some(rating);
                        }
                    }
                });
            }

            // Execute deferred actions
            if action_reveal {
                if let Err(e) = session.reveal() {
                    log::debug!("Ignored reveal: {}", e);
                }
            }
            if let Some(rating) = action_rate {
                if let Err(e) = session.rate(rating, now) {
                    log::debug!("Ignored rating: {}", e);
                }
            }
        }
    }
}
