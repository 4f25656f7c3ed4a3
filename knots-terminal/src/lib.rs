/// Terminal front end for the knot viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use knots_core::{loader, LoadResult, Model, Session, Side, TouchPoint, MODEL_SOURCES};
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

pub mod logging;
pub mod renderer;

pub use logging::{init_logging, LoggingConfig};
pub use renderer::AsciiRenderer;

type Completion = (Side, LoadResult<Model>);

/// Main application struct for terminal rendering
pub struct TerminalApp {
    session: Session<AsciiRenderer>,
    loads: Receiver<Completion>,
    running: bool,
    target_frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Set up the session and start loading both knots from `assets`
    pub fn new(assets: PathBuf, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            session: Session::new(
                AsciiRenderer::new(width as usize, height as usize),
                width as u32,
                height as u32,
            ),
            loads: spawn_loads(assets),
            running: true,
            target_frame_time: Duration::from_millis(1000 / u64::from(target_fps.max(1))),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            self.collect_loads();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Move finished loads into the scene, in whatever order they arrived
    fn collect_loads(&mut self) {
        while let Ok((side, result)) = self.loads.try_recv() {
            self.session.model_loaded(side, result);
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }) => {
                self.running = false;
            }
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                let point = TouchPoint::new(f64::from(column), f64::from(row));
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.session.touch_start(&[point]),
                    MouseEventKind::Drag(MouseButton::Left) => self.session.touch_move(&[point]),
                    MouseEventKind::Up(MouseButton::Left) => self.session.touch_end(),
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                self.session.resize(u32::from(width), u32::from(height));
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.session.render_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.session.renderer_mut().draw(&mut stdout)?;

        // Draw UI overlay
        let status = |side| match self.session.scene().get(side) {
            Some(_) => "ready",
            None => "loading",
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Chiral Knots | FPS: {:.1} | left: {} right: {} | Drag either half to rotate, Q=Quit",
                self.fps,
                status(Side::Left),
                status(Side::Right),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Read both knots on their own threads; completions arrive over a channel
fn spawn_loads(assets: PathBuf) -> Receiver<Completion> {
    let (tx, rx) = mpsc::channel();
    for source in MODEL_SOURCES {
        let tx = tx.clone();
        let root = assets.clone();
        thread::spawn(move || {
            let result = loader::load_from_dir(&root, &source);
            // The viewer may already have quit
            let _ = tx.send((source.side, result));
        });
    }
    rx
}
