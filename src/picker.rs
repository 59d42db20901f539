// Folder selection and user notifications
// Native dialogs through rfd, with console fallbacks for headless use

use log::{error, info};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;

/// Source of the folder to browse
pub trait FolderPicker {
    fn select_folder(&mut self, title: &str) -> Option<PathBuf>;
}

/// Native "choose folder" dialog
pub struct DialogPicker;

impl FolderPicker for DialogPicker {
    fn select_folder(&mut self, title: &str) -> Option<PathBuf> {
        FileDialog::new().set_title(title).pick_folder()
    }
}

/// Picker with no UI; only explicit paths can be opened
pub struct NoPicker;

impl FolderPicker for NoPicker {
    fn select_folder(&mut self, _title: &str) -> Option<PathBuf> {
        info!("No folder given and native dialogs are disabled (use --dialogs)");
        None
    }
}

/// Channel for messages the user has to acknowledge
pub trait Notifier {
    fn show_error(&mut self, title: &str, message: &str);
    fn show_info(&mut self, title: &str, message: &str);
}

/// Native message boxes
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn show_error(&mut self, title: &str, message: &str) {
        error!("{}: {}", title, message);
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn show_info(&mut self, title: &str, message: &str) {
        info!("{}: {}", title, message);
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

/// Messages printed to stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_error(&mut self, title: &str, message: &str) {
        error!("{}: {}", title, message);
        eprintln!("[{}] {}", title, message);
    }

    fn show_info(&mut self, title: &str, message: &str) {
        info!("{}: {}", title, message);
        eprintln!("[{}] {}", title, message);
    }
}
