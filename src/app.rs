// Application state module
// Viewer state shared with the drop target, and the command dispatch that
// drives it

use crate::cli::ParsedArgs;
use crate::dnd::drop_target::ImageDropTarget;
use crate::dnd::engine::{
    drag_gesture, Destination, DragEngine, DragOutcome, FolderDropTarget, InputFrame,
    ScriptedEngine,
};
use crate::dnd::session::{begin_drag, deliver_files};
use crate::history::History;
use crate::i18n::{Language, Text};
use crate::image_loader::{format_from_extension, load_image, render_fit, Placement, Surface};
use crate::picker::{
    ConsoleNotifier, DialogNotifier, DialogPicker, FolderPicker, NoPicker, Notifier,
};
use crate::scanner::list_images;
use anyhow::{bail, Context, Result};
use image::{DynamicImage, RgbaImage};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::cell::{Ref, RefCell};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Everything the viewer shows, shared by the dispatcher and the drop target
#[derive(Debug)]
pub struct ViewerState {
    current_image: Option<PathBuf>,
    image_files: Vec<PathBuf>,
    history: History,
    current_folder: Option<PathBuf>,
    pub language: Language,
    pub show_history: bool,
    needs_redraw: bool,
}

impl ViewerState {
    pub fn new(language: Language) -> Self {
        Self {
            current_image: None,
            image_files: Vec::new(),
            history: History::new(),
            current_folder: None,
            language,
            show_history: false,
            needs_redraw: true,
        }
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.current_image.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    #[allow(dead_code)]
    pub fn image_files(&self) -> &[PathBuf] {
        &self.image_files
    }

    pub fn current_folder(&self) -> Option<&Path> {
        self.current_folder.as_deref()
    }

    pub fn text(&self, text: Text) -> &'static str {
        self.language.text(text)
    }

    /// Make `path` current and record it at the end of the history
    pub fn show_image(&mut self, path: PathBuf) {
        self.history.push(path.clone());
        self.current_image = Some(path);
        self.invalidate();
    }

    pub fn set_folder(&mut self, folder: PathBuf, images: Vec<PathBuf>) {
        self.current_folder = Some(folder);
        self.image_files = images;
    }

    /// Show a random image from the scanned folder; `None` if there is none
    pub fn pick_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<PathBuf> {
        self.current_folder.as_ref()?;
        let picked = self.image_files.choose(rng)?.clone();
        self.show_image(picked.clone());
        Some(picked)
    }

    /// Move through the history without changing it
    pub fn navigate(&mut self, forward: bool) -> bool {
        let moved = if forward {
            self.history.forward()
        } else {
            self.history.back()
        }
        .map(Path::to_path_buf);

        match moved {
            Some(path) => {
                self.current_image = Some(path);
                self.invalidate();
                true
            }
            None => false,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    #[allow(dead_code)]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Clear the redraw flag, returning whether it was set
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

/// One user action, the equivalent of a window message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Choose a folder (or ask for one), scan it and show a random image
    Open(Option<PathBuf>),
    Random,
    Back,
    Forward,
    ToggleLanguage,
    ToggleHistory,
    /// Files dragged onto the window from elsewhere
    Drop(Vec<PathBuf>),
    /// Drag the current image out, onto a folder or onto nothing
    Drag(Option<PathBuf>),
    /// Start dragging the current image, then press escape
    CancelDrag,
    Reveal,
    Paint,
    Save(PathBuf),
    Status,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  open [DIR]      choose a folder and show a random image
  r               another random image
  left / right    move through the history
  lang            switch EN/FR
  history         show or hide the history
  drop PATH...    drop files onto the window
  drag [DIR]      drag the current image out (onto DIR, or nowhere)
  cancel-drag     start a drag and press escape
  reveal          open the folder holding the current image
  paint           redraw
  save FILE       save the last drawn frame
  status          print the current image and history
  quit

paths containing spaces go in double quotes";

/// Split an input line into words, keeping double-quoted text together
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        bail!("Unterminated quote in: {}", line);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let mut words = split_words(line)?.into_iter();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<PathBuf> = words.map(PathBuf::from).collect();

        let command = match name.to_lowercase().as_str() {
            "open" | "folder" => Command::Open(rest.into_iter().next()),
            "r" | "random" => Command::Random,
            "left" | "back" => Command::Back,
            "right" | "forward" => Command::Forward,
            "lang" => Command::ToggleLanguage,
            "history" => Command::ToggleHistory,
            "drop" => {
                if rest.is_empty() {
                    bail!("drop needs at least one file");
                }
                Command::Drop(rest)
            }
            "drag" => Command::Drag(rest.into_iter().next()),
            "cancel-drag" => Command::CancelDrag,
            "reveal" => Command::Reveal,
            "paint" => Command::Paint,
            "save" => match rest.into_iter().next() {
                Some(path) => Command::Save(path),
                None => bail!("save needs a file name"),
            },
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("Unknown command: {} (try help)", other),
        };
        Ok(Some(command))
    }
}

/// Whether the dispatch loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The viewer window: owns the state, the registered drop target and the
/// collaborators it calls out to
pub struct Viewer {
    state: Rc<RefCell<ViewerState>>,
    engine: ScriptedEngine,
    picker: Box<dyn FolderPicker>,
    notifier: Box<dyn Notifier>,
    rng: StdRng,
    surface: Surface,
    last_frame: Option<RgbaImage>,
}

impl Viewer {
    /// Create the viewer from command line settings
    pub fn new(args: &ParsedArgs) -> Result<Self> {
        let (picker, notifier): (Box<dyn FolderPicker>, Box<dyn Notifier>) = if args.use_dialogs {
            (Box::new(DialogPicker), Box::new(DialogNotifier))
        } else {
            (Box::new(NoPicker), Box::new(ConsoleNotifier))
        };
        Self::with_parts(args.language, args.surface, args.seed, picker, notifier)
    }

    pub fn with_parts(
        language: Language,
        surface: Surface,
        seed: Option<u64>,
        picker: Box<dyn FolderPicker>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        let state = Rc::new(RefCell::new(ViewerState::new(language)));
        let mut engine = ScriptedEngine::new();
        let target = ImageDropTarget::new(state.clone()).into_com();
        engine
            .register_target(target)
            .context("Failed to register the window as a drop target")?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            state,
            engine,
            picker,
            notifier,
            rng,
            surface,
            last_frame: None,
        })
    }

    pub fn state(&self) -> Ref<'_, ViewerState> {
        self.state.borrow()
    }

    /// Dispatch one command
    pub fn handle(&mut self, command: Command) -> Result<Flow> {
        debug!("Handling {:?}", command);
        match command {
            Command::Open(folder) => self.open_folder(folder)?,
            Command::Random => self.load_random(),
            Command::Back => {
                self.state.borrow_mut().navigate(false);
            }
            Command::Forward => {
                self.state.borrow_mut().navigate(true);
            }
            Command::ToggleLanguage => {
                let mut state = self.state.borrow_mut();
                state.language = state.language.toggled();
                info!("{}", state.text(Text::Title));
                state.invalidate();
            }
            Command::ToggleHistory => {
                let mut state = self.state.borrow_mut();
                state.show_history = !state.show_history;
                state.invalidate();
            }
            Command::Drop(paths) => self.drop_files(paths)?,
            Command::Drag(folder) => {
                self.drag_current(folder)?;
            }
            Command::CancelDrag => {
                self.cancel_drag()?;
            }
            Command::Reveal => self.reveal()?,
            Command::Paint => self.state.borrow_mut().invalidate(),
            Command::Save(path) => self.save_frame(&path)?,
            Command::Status => println!("{}", self.status()),
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn open_folder(&mut self, folder: Option<PathBuf>) -> Result<()> {
        let folder = match folder {
            Some(folder) => folder,
            None => {
                let title = self.state.borrow().text(Text::SelectFolder);
                match self.picker.select_folder(title) {
                    Some(folder) => folder,
                    None => return Ok(()),
                }
            }
        };
        if !folder.is_dir() {
            bail!("Not a folder: {}", folder.display());
        }

        let images = list_images(&folder);
        info!("Loaded {} image(s) from {}", images.len(), folder.display());
        self.state.borrow_mut().set_folder(folder, images);
        self.load_random();
        Ok(())
    }

    fn load_random(&mut self) {
        let picked = self.state.borrow_mut().pick_random(&mut self.rng);
        match picked {
            Some(path) => info!("Random image: {}", path.display()),
            None => {
                let state = self.state.borrow();
                self.notifier
                    .show_info(state.text(Text::InfoTitle), state.text(Text::NoImages));
            }
        }
    }

    fn drop_files(&mut self, paths: Vec<PathBuf>) -> Result<()> {
        self.engine.script(drag_gesture(3), Destination::Window);
        let outcome = deliver_files(&mut self.engine, paths).context("Drop failed")?;
        debug!("Inbound drop finished: {:?}", outcome);
        Ok(())
    }

    /// Path of the current image, without keeping the state borrowed
    fn current_path(&self) -> Option<PathBuf> {
        self.state.borrow().current_image().map(Path::to_path_buf)
    }

    fn drag_current(&mut self, folder: Option<PathBuf>) -> Result<Option<DragOutcome>> {
        let Some(path) = self.current_path() else {
            debug!("Nothing to drag");
            return Ok(None);
        };
        let destination = match folder {
            Some(folder) if folder.is_dir() => {
                Destination::Target(FolderDropTarget::new(&folder).into_com())
            }
            Some(folder) => bail!("Not a folder: {}", folder.display()),
            None => Destination::Nowhere,
        };
        self.engine.script(drag_gesture(3), destination);
        let outcome = begin_drag(&mut self.engine, &path)
            .with_context(|| format!("Could not drag {}", path.display()))?;
        Ok(Some(outcome))
    }

    fn cancel_drag(&mut self) -> Result<Option<DragOutcome>> {
        let Some(path) = self.current_path() else {
            return Ok(None);
        };
        self.engine.script(
            vec![
                InputFrame::held(0, 0),
                InputFrame::held(12, 4),
                InputFrame::escape(20, 8),
            ],
            Destination::Window,
        );
        let outcome = begin_drag(&mut self.engine, &path)
            .with_context(|| format!("Could not drag {}", path.display()))?;
        Ok(Some(outcome))
    }

    fn reveal(&self) -> Result<()> {
        let Some(path) = self.current_path() else {
            return Ok(());
        };
        let folder = path.parent().unwrap_or(Path::new("."));
        open::that(folder).with_context(|| format!("Failed to open {}", folder.display()))
    }

    /// Redraw if something changed since the last paint
    pub fn paint_if_needed(&mut self) -> Option<Placement> {
        if !self.state.borrow_mut().take_redraw() {
            return None;
        }
        self.paint()
    }

    /// Render the current image onto the surface and describe the frame
    pub fn paint(&mut self) -> Option<Placement> {
        let Some(path) = self.current_path() else {
            println!("{}", self.state.borrow().text(Text::DropHint));
            return None;
        };

        let image = match load_image(&path) {
            Ok(image) => image,
            Err(e) => {
                warn!("{}", e);
                let state = self.state.borrow();
                self.notifier
                    .show_error(state.text(Text::ErrorTitle), state.text(Text::LoadFailed));
                return None;
            }
        };

        let (frame, placement) = render_fit(&image, self.surface);
        self.last_frame = Some(frame);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "{} ({}x{} at {},{})",
            name, placement.width, placement.height, placement.x, placement.y
        );
        let state = self.state.borrow();
        if state.show_history {
            println!("{}", state.text(Text::HistoryHeader));
            for entry in state.history().entries() {
                println!("  {}", entry.display());
            }
        }
        Some(placement)
    }

    fn save_frame(&self, path: &Path) -> Result<()> {
        let Some(frame) = &self.last_frame else {
            bail!("Nothing has been drawn yet");
        };
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(format_from_extension)
            .with_context(|| format!("Unsupported output format: {}", path.display()))?;
        DynamicImage::ImageRgba8(frame.clone())
            .to_rgb8()
            .save_with_format(path, format)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        info!("Saved frame to {}", path.display());
        Ok(())
    }

    /// One-line summary of the current image and history position
    pub fn status(&self) -> String {
        let state = self.state.borrow();
        let current = state
            .current_image()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} [{}/{}] folder: {}",
            current,
            if state.history().is_empty() {
                0
            } else {
                state.history().cursor() + 1
            },
            state.history().len(),
            state
                .current_folder()
                .map(|f| f.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        )
    }

    /// Revoke the window's drop target, releasing the engine's reference
    pub fn shutdown(&mut self) {
        if let Some(target) = self.engine.revoke_target() {
            let remaining = target.release();
            debug!("Drop target revoked ({} references left)", remaining);
        }
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Read commands from stdin until `quit` or end of input
pub fn run(mut viewer: Viewer, interactive: bool) -> Result<()> {
    let stdin = io::stdin();
    let prompt = |viewer: &Viewer| -> Result<()> {
        if interactive {
            print!("{}> ", viewer.state().text(Text::Title));
            io::stdout().flush().context("Failed to flush prompt")?;
        }
        Ok(())
    };

    viewer.paint_if_needed();
    prompt(&viewer)?;
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;
        match Command::parse(&line) {
            Ok(Some(command)) => match viewer.handle(command) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => error!("{:#}", e),
            },
            Ok(None) => {}
            Err(e) => eprintln!("{}", e),
        }
        viewer.paint_if_needed();
        prompt(&viewer)?;
    }

    viewer.shutdown();
    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Messages(Rc<RefCell<Vec<String>>>);

    impl Notifier for Messages {
        fn show_error(&mut self, title: &str, message: &str) {
            self.0.borrow_mut().push(format!("{}: {}", title, message));
        }

        fn show_info(&mut self, title: &str, message: &str) {
            self.0.borrow_mut().push(format!("{}: {}", title, message));
        }
    }

    fn viewer() -> (Viewer, Messages) {
        let messages = Messages::default();
        let viewer = Viewer::with_parts(
            Language::En,
            Surface {
                width: 64,
                height: 48,
            },
            Some(3),
            Box::new(NoPicker),
            Box::new(messages.clone()),
        )
        .unwrap();
        (viewer, messages)
    }

    fn write_png(path: &Path) {
        RgbaImage::from_pixel(8, 4, Rgba([0, 128, 255, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("R").unwrap(), Some(Command::Random));
        assert_eq!(
            Command::parse("drop a.png b.jpg").unwrap(),
            Some(Command::Drop(vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]))
        );
        assert_eq!(Command::parse("drag").unwrap(), Some(Command::Drag(None)));
        assert!(Command::parse("drop").is_err());
        assert!(Command::parse("save").is_err());
        assert!(Command::parse("fly").is_err());
    }

    #[test]
    fn quoted_paths_keep_their_spaces() {
        assert_eq!(
            Command::parse(r#"drop "My Pictures/a b.png" c.jpg"#).unwrap(),
            Some(Command::Drop(vec![
                PathBuf::from("My Pictures/a b.png"),
                PathBuf::from("c.jpg")
            ]))
        );
        assert_eq!(
            Command::parse(r#"open "/home/me/Holiday 2024""#).unwrap(),
            Some(Command::Open(Some(PathBuf::from("/home/me/Holiday 2024"))))
        );
        assert!(Command::parse(r#"drag "unfinished"#).is_err());
    }

    #[test]
    fn random_needs_a_folder() {
        let mut state = ViewerState::new(Language::En);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(state.pick_random(&mut rng), None);

        state.set_folder(PathBuf::from("/pics"), vec![PathBuf::from("/pics/a.png")]);
        assert_eq!(state.pick_random(&mut rng), Some(PathBuf::from("/pics/a.png")));
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn navigation_moves_without_truncating() {
        let mut state = ViewerState::new(Language::En);
        state.show_image(PathBuf::from("/a.png"));
        state.show_image(PathBuf::from("/b.png"));
        state.take_redraw();

        assert!(state.navigate(false));
        assert_eq!(state.current_image(), Some(Path::new("/a.png")));
        assert!(state.needs_redraw());
        assert!(!state.navigate(false));
        assert!(state.navigate(true));
        assert!(!state.navigate(true));
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn opening_an_empty_folder_informs_the_user() {
        let dir = tempdir().unwrap();
        let (mut viewer, messages) = viewer();
        viewer
            .handle(Command::Open(Some(dir.path().to_path_buf())))
            .unwrap();
        assert_eq!(
            *messages.0.borrow(),
            vec!["Information: No images found in the folder.".to_string()]
        );
        assert!(viewer.state().current_image().is_none());
    }

    #[test]
    fn open_then_navigate() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("only.png"));
        let (mut viewer, _messages) = viewer();

        viewer
            .handle(Command::Open(Some(dir.path().to_path_buf())))
            .unwrap();
        viewer.handle(Command::Random).unwrap();
        assert_eq!(viewer.state().history().len(), 2);
        assert_eq!(viewer.state().image_files().len(), 1);

        viewer.handle(Command::Back).unwrap();
        assert_eq!(viewer.state().history().cursor(), 0);
        let placement = viewer.paint_if_needed().unwrap();
        assert_eq!(placement.width, 64);
        assert_eq!(placement.height, 32);
        assert!(viewer.paint_if_needed().is_none());
    }

    #[test]
    fn dropped_files_become_current() {
        let dir = tempdir().unwrap();
        let note = dir.path().join("readme.txt");
        let photo = dir.path().join("photo.PNG");
        fs::write(&note, b"hello").unwrap();
        write_png(&photo);
        let (mut viewer, _messages) = viewer();

        viewer
            .handle(Command::Drop(vec![note, photo.clone()]))
            .unwrap();
        assert_eq!(viewer.state().current_image(), Some(photo.as_path()));
        assert_eq!(viewer.state().history().entries(), &[photo]);
    }

    #[test]
    fn dragging_out_copies_into_the_folder() {
        let dir = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let photo = dir.path().join("sky.png");
        write_png(&photo);
        let (mut viewer, _messages) = viewer();
        viewer.state.borrow_mut().show_image(photo.clone());

        let outcome = viewer
            .drag_current(Some(dest.path().to_path_buf()))
            .unwrap();
        assert_eq!(outcome, Some(DragOutcome::Dropped(crate::dnd::format::DropEffect::COPY)));
        assert!(dest.path().join("sky.png").exists());

        assert_eq!(viewer.cancel_drag().unwrap(), Some(DragOutcome::Cancelled));
        // Still one history entry: dragging never touches the state
        assert_eq!(viewer.state().history().len(), 1);
    }

    #[test]
    fn dragging_into_its_own_folder_keeps_the_file() {
        let dir = tempdir().unwrap();
        let photo = dir.path().join("sky.png");
        write_png(&photo);
        let before = fs::read(&photo).unwrap();
        let (mut viewer, _messages) = viewer();
        viewer.state.borrow_mut().show_image(photo.clone());

        let outcome = viewer
            .drag_current(Some(dir.path().to_path_buf()))
            .unwrap();
        assert_eq!(
            outcome,
            Some(DragOutcome::Dropped(crate::dnd::format::DropEffect::NONE))
        );
        assert_eq!(fs::read(&photo).unwrap(), before);
    }

    #[test]
    fn dragging_a_vanished_file_fails_cleanly() {
        let dir = tempdir().unwrap();
        let photo = dir.path().join("gone.png");
        let (mut viewer, _messages) = viewer();
        viewer.state.borrow_mut().show_image(photo);

        assert!(viewer.handle(Command::Drag(None)).is_err());
        assert_eq!(viewer.engine.loops_run(), 0);
    }

    #[test]
    fn undecodable_images_report_a_localized_error() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.jpg");
        fs::write(&broken, b"garbage").unwrap();
        let (mut viewer, messages) = viewer();
        viewer.handle(Command::ToggleLanguage).unwrap();
        viewer.state.borrow_mut().show_image(broken);

        assert!(viewer.paint_if_needed().is_none());
        assert_eq!(
            *messages.0.borrow(),
            vec!["Erreur: Impossible de charger l'image ou image invalide".to_string()]
        );
        // Still usable afterwards
        assert!(viewer.handle(Command::Status).is_ok());
    }

    #[test]
    fn saves_the_last_frame() {
        let dir = tempdir().unwrap();
        let photo = dir.path().join("pic.png");
        write_png(&photo);
        let (mut viewer, _messages) = viewer();
        assert!(viewer.handle(Command::Save(dir.path().join("out.png"))).is_err());

        viewer.handle(Command::Drop(vec![photo])).unwrap();
        viewer.paint_if_needed().unwrap();
        let out = dir.path().join("frame.bmp");
        viewer.handle(Command::Save(out.clone())).unwrap();
        let saved = image::open(&out).unwrap();
        assert_eq!((saved.width(), saved.height()), (64, 48));
        assert!(viewer.handle(Command::Save(dir.path().join("frame.gif"))).is_err());
    }

    #[test]
    fn shutdown_revokes_the_target() {
        let (mut viewer, _messages) = viewer();
        assert!(viewer.engine.has_registered_target());
        viewer.handle(Command::Quit).unwrap();
        viewer.shutdown();
        assert!(!viewer.engine.has_registered_target());
    }
}
