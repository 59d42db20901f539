// rpick - A random image viewer
// Shows a random picture from a folder tree, with drag-and-drop in and out

mod app;
mod cli;
mod com;
mod dnd;
mod history;
mod i18n;
mod image_loader;
mod picker;
mod scanner;

use anyhow::Result;
use log::info;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args = cli::parse_args()?;

    info!(
        "Starting rpick (language: {:?}, surface: {}x{})",
        args.language, args.surface.width, args.surface.height
    );

    let mut viewer = app::Viewer::new(&args)?;

    // Scan the folder given on the command line right away
    if let Some(folder) = args.folder.clone() {
        viewer.handle(app::Command::Open(Some(folder)))?;
    }

    app::run(viewer, args.interactive)
}
