//! Full-screen terminal animation shown while the pipeline runs
//!
//! Matrix-style rain in the background, a scrolling ticker tape on the top
//! row, and a status box fed by the pipeline's stage event channel. Runs on
//! the calling thread at roughly 20 fps until the worker signals completion
//! (or the user presses `q`/Esc).

use crossterm::{
    cursor, event, execute, queue,
    style::{Color, Print, SetForegroundColor},
    terminal,
};
use rand::Rng;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tickerlens::pipeline::{Stage, StageEvent, StageStatus};
use tokio::sync::mpsc::UnboundedReceiver;

const FRAME_MS: u64 = 50;
const COMPLETE_FRAMES: u32 = 20;
const PANEL_WIDTH: u16 = 38;
const RAIN_GLYPHS: &[char] = &[
    '0', '1', '$', '%', '#', '+', '-', '=', '<', '>', '|', '~', 'x', 'z',
];
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// One symbol on the ticker tape
pub struct TapeEntry {
    pub symbol: String,
    pub price: Option<f64>,
}

struct RainColumn {
    y: f64,
    speed: f64,
    length: u16,
}

/// Run the animation until `done` is set; drains `events` each frame
pub fn run(
    mut events: UnboundedReceiver<StageEvent>,
    tape: Vec<TapeEntry>,
    done: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = render_loop(&mut events, &tape, &done);

    // Always restore the terminal, even when rendering failed
    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    result
}

fn render_loop(
    events: &mut UnboundedReceiver<StageEvent>,
    tape: &[TapeEntry],
    done: &AtomicBool,
) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let mut rng = rand::thread_rng();
    let (mut width, mut height) = terminal::size()?;

    let mut columns = spawn_columns(&mut rng, width, height);
    let mut status: HashMap<Stage, StageStatus> = HashMap::new();
    let tape_text = tape_text(tape);
    let mut tape_offset: usize = 0;
    let mut frame: u32 = 0;
    let mut complete_countdown: Option<u32> = None;

    loop {
        frame = frame.wrapping_add(1);

        // Terminal may have been resized between frames
        let size = terminal::size()?;
        if size != (width, height) {
            (width, height) = size;
            columns = spawn_columns(&mut rng, width, height);
            queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        }

        while let Ok(event) = events.try_recv() {
            status.insert(event.stage, event.status);
        }

        if user_quit()? {
            return Ok(());
        }

        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        draw_rain(&mut stdout, &mut rng, &mut columns, height)?;
        draw_tape(&mut stdout, &tape_text, tape_offset, width)?;
        draw_panel(
            &mut stdout,
            &status,
            frame,
            width,
            height,
            complete_countdown.is_some(),
        )?;
        stdout.flush()?;

        if frame % 2 == 0 && !tape_text.is_empty() {
            tape_offset = (tape_offset + 1) % (tape_text.chars().count() / 2).max(1);
        }

        match complete_countdown {
            Some(0) => return Ok(()),
            Some(n) => complete_countdown = Some(n - 1),
            None if done.load(Ordering::SeqCst) => {
                // Hold a COMPLETE frame for about a second before exiting
                complete_countdown = Some(COMPLETE_FRAMES);
            }
            None => {}
        }

        std::thread::sleep(Duration::from_millis(FRAME_MS));
    }
}

fn user_quit() -> anyhow::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let event::Event::Key(key) = event::read()? {
            if matches!(
                key.code,
                event::KeyCode::Char('q') | event::KeyCode::Esc
            ) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn spawn_columns(rng: &mut impl Rng, width: u16, height: u16) -> Vec<RainColumn> {
    (0..width)
        .map(|_| RainColumn {
            y: rng.gen_range(0.0..f64::from(height.max(2))),
            speed: rng.gen_range(1.0..3.0),
            length: rng.gen_range(3..10),
        })
        .collect()
}

fn draw_rain(
    stdout: &mut impl Write,
    rng: &mut impl Rng,
    columns: &mut [RainColumn],
    height: u16,
) -> anyhow::Result<()> {
    for (x, column) in columns.iter_mut().enumerate() {
        column.y += column.speed * 0.5;
        if column.y > f64::from(height + column.length) {
            column.y = 0.0;
            column.speed = rng.gen_range(1.0..3.0);
            column.length = rng.gen_range(3..10);
        }

        let head = column.y as i32;
        for segment in 0..column.length {
            let y = head - i32::from(segment);
            // Row 0 belongs to the ticker tape
            if y < 1 || y >= i32::from(height) {
                continue;
            }
            let color = if segment == 0 {
                Color::Green
            } else {
                Color::DarkGreen
            };
            let glyph = RAIN_GLYPHS[rng.gen_range(0..RAIN_GLYPHS.len())];
            queue!(
                stdout,
                cursor::MoveTo(x as u16, y as u16),
                SetForegroundColor(color),
                Print(glyph)
            )?;
        }
    }
    Ok(())
}

fn tape_text(tape: &[TapeEntry]) -> String {
    if tape.is_empty() {
        return String::new();
    }
    let joined: String = tape
        .iter()
        .map(|entry| match entry.price {
            Some(price) => format!("{} {:.2}   ", entry.symbol, price),
            None => format!("{} --   ", entry.symbol),
        })
        .collect();
    // Doubled so the scroll window never runs off the end
    format!("{joined}{joined}")
}

fn draw_tape(
    stdout: &mut impl Write,
    tape_text: &str,
    offset: usize,
    width: u16,
) -> anyhow::Result<()> {
    if tape_text.is_empty() {
        return Ok(());
    }
    let window: String = tape_text
        .chars()
        .skip(offset)
        .take(usize::from(width))
        .collect();
    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print(window)
    )?;
    Ok(())
}

fn stage_glyph(status: Option<StageStatus>, frame: u32) -> char {
    match status {
        None => '\u{00B7}',
        Some(StageStatus::Running) => SPINNER[(frame / 5) as usize % SPINNER.len()],
        Some(StageStatus::Done) => '\u{2713}',
        Some(StageStatus::Skipped) => '\u{2013}',
    }
}

fn draw_panel(
    stdout: &mut impl Write,
    status: &HashMap<Stage, StageStatus>,
    frame: u32,
    width: u16,
    height: u16,
    complete: bool,
) -> anyhow::Result<()> {
    let panel_height = Stage::all().len() as u16 + 4;
    let left = width.saturating_sub(PANEL_WIDTH) / 2;
    let top = height.saturating_sub(panel_height) / 2;
    let inner = usize::from(PANEL_WIDTH) - 2;

    let mut lines = Vec::with_capacity(usize::from(panel_height));
    lines.push(format!("\u{250C}{}\u{2510}", "\u{2500}".repeat(inner)));
    lines.push(format!("\u{2502}{:^inner$}\u{2502}", "T I C K E R L E N S"));
    lines.push(format!("\u{251C}{}\u{2524}", "\u{2500}".repeat(inner)));
    for stage in Stage::all() {
        let glyph = stage_glyph(status.get(&stage).copied(), frame);
        let row = format!(" {glyph}  {}", stage.label());
        lines.push(format!("\u{2502}{row:<inner$}\u{2502}"));
    }
    let footer = if complete { "COMPLETE" } else { "analyzing" };
    lines.push(format!("\u{2514}{footer:\u{2500}^inner$}\u{2518}"));

    for (i, line) in lines.iter().enumerate() {
        queue!(
            stdout,
            cursor::MoveTo(left, top + i as u16),
            SetForegroundColor(if complete { Color::Green } else { Color::White }),
            Print(line)
        )?;
    }
    Ok(())
}
