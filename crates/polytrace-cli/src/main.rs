//! polytrace - terminal player and CLI for polygon edge-trace sketches
//!
//! Usage:
//!   polytrace [variant]               Launch the player (default: hexagon-normals)
//!   polytrace play [variant] [-c f]   Same, optionally from a sketch file
//!   polytrace variants                List presets
//!   polytrace render <variant>        Run headless, write one frame
//!   polytrace frames <variant>        Write a PNG sequence
//!   polytrace trace <variant>         JSON dump of the state
//!   polytrace sketch --example        Print an example sketch file
//!   polytrace benchmark [variant]     Steps per second

mod cli;

use std::env;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use ratatui_image::{picker::{Picker, ProtocolType}, protocol::StatefulProtocol, StatefulImage};

use polytrace::Variant;

use cli::{
    cmd_benchmark, cmd_frames, cmd_render, cmd_sketch, cmd_trace, frame_to_svg, load_variant,
    svg_to_image, Loaded, SourceArgs,
};

/// Target frame time of the player loop
const FRAME_TIME: Duration = Duration::from_millis(16);
/// Raster scale of the 800x800 sketch for the terminal image
const IMAGE_SCALE: f32 = 0.75;
const SPEED_FACTOR: f64 = 1.25;
const MAX_SPEED: f64 = 1.0;
const TRAIL_STEP: usize = 10;

/// Application state for the player
struct App {
    /// Running sketch
    loaded: Loaded,
    /// Oscillator whose speed the arrow keys change
    selected: usize,
    /// Should exit
    should_quit: bool,
    /// Image picker for terminal protocol detection
    picker: Picker,
    /// Current rendered image protocol state
    image_state: Option<Box<dyn StatefulProtocol>>,
    /// Flag to indicate image needs re-rendering
    needs_image_update: bool,
    /// Accepted / rejected intersections since the last reset
    accepted: usize,
    rejected: usize,
    /// Last control error, shown in the stats panel
    status: Option<String>,
    /// Smoothed frames per second
    fps: f64,
    last_frame: Instant,
}

impl App {
    fn new(loaded: Loaded) -> Self {
        // Initialize image picker - force Sixel protocol
        let mut picker = Picker::from_termios()
            .unwrap_or_else(|_| Picker::new((8, 16)));
        picker.protocol_type = ProtocolType::Sixel;

        App {
            loaded,
            selected: 0,
            should_quit: false,
            picker,
            image_state: None,
            needs_image_update: true,
            accepted: 0,
            rejected: 0,
            status: None,
            fps: 0.0,
            last_frame: Instant::now(),
        }
    }

    /// One frame: advance (if running) and re-render.
    fn tick(&mut self) {
        if let Some(report) = self.loaded.sim.tick() {
            self.accepted += report.accepted;
            self.rejected += report.rejected;
            self.needs_image_update = true;
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        if dt > 0.0 {
            self.fps = self.fps * 0.9 + (1.0 / dt) * 0.1;
        }
    }

    fn update_image(&mut self) -> Result<(), String> {
        if self.needs_image_update {
            let svg = frame_to_svg(&self.loaded.sim);
            let img = svg_to_image(&svg, IMAGE_SCALE)?;
            self.image_state = Some(self.picker.new_resize_protocol(img));
            self.needs_image_update = false;
        }
        Ok(())
    }

    fn oscillator_count(&self) -> usize {
        self.loaded.sim.oscillators().len()
    }

    fn select(&mut self, index: usize) {
        if index < self.oscillator_count() {
            self.selected = index;
        }
    }

    fn select_next(&mut self) {
        let count = self.oscillator_count();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    fn scale_speed(&mut self, factor: f64) {
        let Some(osc) = self.loaded.sim.oscillators().get(self.selected) else {
            return;
        };
        let speed = (osc.speed() * factor).min(MAX_SPEED);
        self.status = self
            .loaded
            .sim
            .set_speed(self.selected, speed)
            .err()
            .map(|e| e.to_string());
        self.needs_image_update = true;
    }

    fn adjust_trail_length(&mut self, grow: bool) {
        let current = self.loaded.sim.config().trail_length;
        let length = if grow {
            current + TRAIL_STEP
        } else {
            current.saturating_sub(TRAIL_STEP).max(1)
        };
        self.status = self
            .loaded
            .sim
            .set_trail_length(length)
            .err()
            .map(|e| e.to_string());
        self.needs_image_update = true;
    }

    fn reset(&mut self) {
        self.loaded.sim.reset();
        self.accepted = 0;
        self.rejected = 0;
        self.status = None;
        self.needs_image_update = true;
    }

    /// Switch presets, keeping the play and guide flags.
    fn switch_variant(&mut self, forward: bool) {
        let next = match self.loaded.variant {
            Some(v) if forward => v.next(),
            Some(v) => v.prev(),
            None => cli::common::DEFAULT_VARIANT,
        };

        match load_variant(next) {
            Ok(mut loaded) => {
                loaded.sim.set_running(self.loaded.sim.is_running());
                loaded.sim.set_guide_visible(self.loaded.sim.guide_visible());
                self.loaded = loaded;
                self.selected = 0;
                self.accepted = 0;
                self.rejected = 0;
                self.status = None;
                self.needs_image_update = true;
            }
            Err(e) => self.status = Some(e),
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                self.loaded.sim.toggle_running();
            }
            KeyCode::Char('g') => {
                self.loaded.sim.toggle_guide();
                self.needs_image_update = true;
            }
            KeyCode::Char('c') => {
                self.loaded.sim.clear_trails();
                self.needs_image_update = true;
            }
            KeyCode::Char('r') => {
                self.reset();
            }
            KeyCode::Tab => {
                self.select_next();
            }
            KeyCode::Char(d @ '1'..='8') => {
                self.select(d as usize - '1' as usize);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.scale_speed(1.0 / SPEED_FACTOR);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.scale_speed(SPEED_FACTOR);
            }
            KeyCode::Char('[') => {
                self.adjust_trail_length(false);
            }
            KeyCode::Char(']') => {
                self.adjust_trail_length(true);
            }
            KeyCode::Char('n') | KeyCode::Down | KeyCode::Char('j') => {
                self.switch_variant(true);
            }
            KeyCode::Char('p') | KeyCode::Up | KeyCode::Char('k') => {
                self.switch_variant(false);
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    let result = match args.get(1).map(|s| s.as_str()) {
        Some("play") => run_tui(&args[2..]),
        Some("variants") => {
            cmd_variants();
            Ok(())
        }
        Some("render") => cmd_render(&args[2..]),
        Some("frames") => cmd_frames(&args[2..]),
        Some("trace") => cmd_trace(&args[2..]),
        Some("sketch") => cmd_sketch(&args[2..]),
        Some("benchmark") => cmd_benchmark(&args[2..]),
        Some("help") | Some("--help") | Some("-h") => {
            print_usage(&args[0]);
            Ok(())
        }
        // Bare variant name or -c <file>
        Some(_) => run_tui(&args[1..]),
        None => run_tui(&[]),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_variants() {
    println!("Available variants:");
    for variant in Variant::all() {
        let meta = variant.metadata();
        println!("  {:18} {:9} {}", variant.name(), meta.shape_label, meta.description);
    }
}

fn print_usage(prog: &str) {
    eprintln!("polytrace - bouncing edge points, line intersections and fading trails");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} [variant]                      Launch the player", prog);
    eprintln!("  {} play [variant] [-c sketch.yaml]", prog);
    eprintln!("  {} variants", prog);
    eprintln!("  {} render [variant] [-n steps] [-o out.svg] [--png out.png] [--guide]", prog);
    eprintln!("  {} frames [variant] [-n frames] [--every k] [-d dir] [--guide]", prog);
    eprintln!("  {} trace [variant] [-n steps] [--pretty]", prog);
    eprintln!("  {} sketch <sketch.yaml> | --example", prog);
    eprintln!("  {} benchmark [variant] [-n steps]", prog);
    eprintln!();
    eprintln!("Every command that takes a variant also accepts -c <sketch.yaml>.");
    eprintln!();
    eprintln!("Player keys:");
    eprintln!("  space play/pause   g guide   c clear trails   r reset");
    eprintln!("  Tab / 1-8 select point   ←→ / h l speed   [ ] trail length");
    eprintln!("  n / p next / previous preset   q quit");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for engine logging.");
}

fn run_tui(args: &[String]) -> Result<(), String> {
    let mut source = SourceArgs::default();
    let mut i = 0;
    while i < args.len() {
        if !source.accept(args, &mut i)? {
            return Err(format!("Unknown option: {}", args[i]));
        }
        i += 1;
    }

    // Load before touching the terminal so errors print normally
    let loaded = source.load()?;

    // Initialize terminal
    enable_raw_mode().map_err(|e| e.to_string())?;
    stdout().execute(EnterAlternateScreen).map_err(|e| e.to_string())?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))
        .map_err(|e| e.to_string())?;

    let mut app = App::new(loaded);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().map_err(|e| e.to_string())?;
    stdout().execute(LeaveAlternateScreen).map_err(|e| e.to_string())?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<(), String> {
    loop {
        let frame_start = Instant::now();

        app.tick();
        app.update_image()?;

        terminal.draw(|frame| ui(frame, app)).map_err(|_| "Draw error".to_string())?;

        // Whatever is left of the frame budget goes to input
        let wait = FRAME_TIME.saturating_sub(frame_start.elapsed());
        if event::poll(wait).map_err(|e| e.to_string())? {
            if let Event::Key(key) = event::read().map_err(|e| e.to_string())? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let top_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(40),
        ])
        .split(main_layout[0]);

    // Split left sidebar into presets, oscillators and stats
    let sidebar_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Variant::all().len() as u16 + 2),
            Constraint::Min(6),
            Constraint::Length(8),
        ])
        .split(top_layout[0]);

    // Preset list
    let items: Vec<ListItem> = Variant::all()
        .iter()
        .map(|v| ListItem::new(v.name()))
        .collect();

    let mut variant_state = ListState::default();
    variant_state.select(
        app.loaded
            .variant
            .and_then(|current| Variant::all().iter().position(|v| *v == current)),
    );

    let list = List::new(items)
        .block(Block::default()
            .title(" Presets ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)))
        .highlight_style(Style::default()
            .bg(Color::DarkGray)
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD))
        .highlight_symbol("► ");

    frame.render_stateful_widget(list, sidebar_layout[0], &mut variant_state);

    // Oscillators
    let osc_items: Vec<ListItem> = app
        .loaded
        .sim
        .oscillators()
        .iter()
        .enumerate()
        .map(|(i, osc)| {
            ListItem::new(format!(
                "{} e{} t={:.2} v={:.4}",
                i + 1,
                osc.edge,
                osc.position(),
                osc.speed()
            ))
        })
        .collect();

    let mut osc_state = ListState::default();
    osc_state.select(Some(app.selected));

    let osc_list = List::new(osc_items)
        .block(Block::default()
            .title(" Points ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)))
        .highlight_style(Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD))
        .highlight_symbol("► ");

    frame.render_stateful_widget(osc_list, sidebar_layout[1], &mut osc_state);

    // Stats panel
    let sim = &app.loaded.sim;
    let points: usize = sim.trails().iter().map(|t| t.len()).sum();
    let mut stats_text = format!(
        "Step: {}\nTrail: {} pts (len {})\nHits: {} / miss: {}\nFPS: {:.0}",
        sim.steps(),
        points,
        sim.config().trail_length,
        app.accepted,
        app.rejected,
        app.fps
    );
    if let Some(status) = &app.status {
        stats_text.push_str(&format!("\n{}", status));
    }
    let stats = Paragraph::new(stats_text)
        .block(Block::default()
            .title(" Stats ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)))
        .style(Style::default().fg(Color::White));

    frame.render_widget(stats, sidebar_layout[2]);

    let state_label = if sim.is_running() { "playing" } else { "paused" };
    let border_color = if sim.is_running() { Color::Green } else { Color::Yellow };

    // Create inner area for image (accounting for border)
    let image_block = Block::default()
        .title(format!(" {} [{}] ", app.loaded.name, state_label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_area = image_block.inner(top_layout[1]);
    frame.render_widget(image_block, top_layout[1]);

    // Render the image using ratatui-image
    if let Some(ref mut image_state) = app.image_state {
        let image_widget = StatefulImage::new(None);
        frame.render_stateful_widget(image_widget, inner_area, image_state);
    }

    // Help
    let help = Paragraph::new(
        "space play/pause  g guide  c clear  r reset  Tab/1-8 point  ←→ speed\n[ ] trail length  n/p preset  q quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, main_layout[1]);
}
