mod app;
use dsa_prep_app::*;

use app::StudyApp;
use config::{data_dir, load_config};
use database::db::{init_database, load_imported_problems};
use state::CustomProblems;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = data_dir();
    let config = load_config(&data_dir.join("config.toml")).unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        Default::default()
    });

    let db_path = config.database_path(&data_dir);
    log::info!("Using database {:?}", db_path);
    let conn = init_database(&db_path).expect("Failed to initialize database");

    let catalogue = Catalogue::builtin().expect("Bundled problem data is invalid");
    let custom = CustomProblems::new();
    custom.replace_all(load_imported_problems(&conn).unwrap_or_else(|e| {
        log::warn!("Could not load imported problems: {}", e);
        Vec::new()
    }));

    log::info!(
        "Loaded {} problems ({} imported), {} flashcards",
        catalogue.problems().len(),
        custom.snapshot().len(),
        catalogue.review_cards().len()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "DSA Prep",
        options,
        Box::new(|_cc| Ok(Box::new(StudyApp::new(catalogue, custom, conn, config)))),
    )
}
