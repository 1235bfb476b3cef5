/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::name_entry::{NameEntry, NAME_LEN, SUBMIT_SLOT};
use crate::sim::scores::Leaderboard;
use crate::sim::screen::Screen;
use crate::sim::world::SnakeWorld;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap pixels on VTE-based terminals match the cell color
    /// and no horizontal lines show through.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 14, b: 28 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// Normalize bg: Color::Reset → BASE_BG so every cell carries an
    /// explicit background (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Each board cell spans 2 terminal columns so the playfield reads square.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;

const SNAKE_HEAD: Color = Color::Rgb { r: 40, g: 255, b: 170 };
const SNAKE_A: Color = Color::Rgb { r: 220, g: 153, b: 0 };
const SNAKE_B: Color = Color::Rgb { r: 135, g: 84, b: 39 };
const FOOD_FG: Color = Color::Rgb { r: 255, g: 140, b: 20 };
const BORDER_FG: Color = Color::Rgb { r: 110, g: 70, b: 160 };
const TITLE_FG: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const PROMPT_FG: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const HUD_BG: Color = Color::Rgb { r: 30, g: 18, b: 50 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(
        &mut self,
        world: &SnakeWorld,
        screen: Screen,
        board: &Leaderboard,
        editor: &NameEntry,
        round_score: u32,
        pad_connected: bool,
    ) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Screen change → clear for a clean transition
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(screen);
        }

        self.front.clear();

        match screen {
            Screen::Menu => self.compose_menu(board, pad_connected),
            Screen::Playing => self.compose_game(world),
            Screen::Paused => {
                self.compose_game(world);
                self.compose_pause_overlay();
            }
            Screen::GameOver => {
                self.compose_game(world);
                self.compose_game_over(round_score);
            }
            Screen::TopCelebrate => self.compose_celebrate(round_score),
            Screen::EnterScore => self.compose_name_entry(editor, round_score),
            Screen::PostSubmit => self.compose_post_submit(board),
        }

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame.
        // IMPORTANT: Do NOT use ResetColor here — it resets to the terminal's
        // native default, which may differ from BASE_BG and cause line artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell == prev {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &SnakeWorld) {
        let buf_w = self.front.width;

        // ── HUD row ──
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
        }
        let hud = format!(" Score:{:<6}  Length:{:<4}", w.score, w.snake.len());
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // ── Border ──
        let cols = w.width as usize * CELL_W;
        let top = BOARD_ROW - 1;
        let bottom = BOARD_ROW + w.height as usize;
        for x in 0..cols + 2 {
            self.front.set(x, top, Cell::new('─', BORDER_FG, Color::Reset));
            self.front.set(x, bottom, Cell::new('─', BORDER_FG, Color::Reset));
        }
        for gy in 0..w.height as usize {
            let row = BOARD_ROW + gy;
            self.front.set(0, row, Cell::new('│', BORDER_FG, Color::Reset));
            self.front.set(cols + 1, row, Cell::new('│', BORDER_FG, Color::Reset));
        }
        self.front.set(0, top, Cell::new('┌', BORDER_FG, Color::Reset));
        self.front.set(cols + 1, top, Cell::new('┐', BORDER_FG, Color::Reset));
        self.front.set(0, bottom, Cell::new('└', BORDER_FG, Color::Reset));
        self.front.set(cols + 1, bottom, Cell::new('┘', BORDER_FG, Color::Reset));

        // ── Food (the snake is drawn after it, so an occupied cell is
        // simply painted over on the board-full tick) ──
        let col = 1 + w.food.x as usize * CELL_W;
        let row = BOARD_ROW + w.food.y as usize;
        self.front.set(col, row, Cell::new('(', FOOD_FG, Color::Reset));
        self.front.set(col + 1, row, Cell::new(')', FOOD_FG, Color::Reset));

        // ── Snake, head first ──
        for (i, seg) in w.snake.iter().enumerate() {
            let col = 1 + seg.x as usize * CELL_W;
            let row = BOARD_ROW + seg.y as usize;
            let (ch, fg) = if i == 0 {
                ('█', SNAKE_HEAD)
            } else if i % 2 == 1 {
                ('▓', SNAKE_A)
            } else {
                ('▓', SNAKE_B)
            };
            self.front.set(col, row, Cell::new(ch, fg, Color::Reset));
            self.front.set(col + 1, row, Cell::new(ch, fg, Color::Reset));
        }

        // ── Help bar ──
        let help_row = bottom + 2;
        if help_row < self.front.height {
            let help = " Arrows/WASD: steer   P/Start: pause";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_menu(&mut self, board: &Leaderboard, pad_connected: bool) {
        let title = [
            r"  ___                  _    _        ___              _        ",
            r" | _ \_  _  _ __  ___ | |__(_) _ _  / __| _ _   __ _ | |__ ___ ",
            r" |  _/ || || '  \| _ \| / /| || ' \ \__ \| ' \ / _` || / // -_)",
            r" |_|  \_,_||_|_|_|  _/|_\_\|_||_||_||___/|_||_|\__,_||_\_\\___|",
            r"                 |_|                                           ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 1 + i, line, TITLE_FG, Color::Reset);
        }

        self.front.put_str(8, 7, "PRESS START OR ENTER", PROMPT_FG, Color::Reset);
        let pad_note = if pad_connected {
            "Joystick connected"
        } else {
            "Keyboard only (no joystick found)"
        };
        self.front.put_str(8, 8, pad_note, Color::DarkGrey, Color::Reset);

        // ── Leaderboard ──
        self.front.put_str(8, 10, "── HIGH SCORES ──", TITLE_FG, Color::Reset);
        if board.entries().is_empty() {
            self.front.put_str(8, 11, "(no scores yet)", Color::DarkGrey, Color::Reset);
        }
        for (i, entry) in board.entries().iter().enumerate() {
            let row = 11 + i;
            if row >= self.front.height {
                break;
            }
            let line = format!("{:>2}. {}  {:>6}", i + 1, entry.name, entry.score);
            let fg = if i == 0 { TITLE_FG } else { Color::White };
            self.front.put_str(8, row, &line, fg, Color::Reset);
        }

        let quit_row = self.front.height.saturating_sub(2);
        self.front.put_str(8, quit_row, "Q/ESC: quit", Color::DarkGrey, Color::Reset);
    }

    fn compose_pause_overlay(&mut self) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let box_w = 24;
        let box_h = 5;
        let box_x = self.front.width.saturating_sub(box_w) / 2;
        let box_y = BOARD_ROW + 5;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::new(' ', Color::Reset, dim));
            }
        }
        self.front.put_str(box_x + 7, box_y + 1, "─ PAUSED ─", TITLE_FG, dim);
        self.front.put_str(box_x + 2, box_y + 3, "P/Start: resume", PROMPT_FG, dim);
    }

    fn compose_game_over(&mut self, score: u32) {
        let dim = Color::Rgb { r: 40, g: 20, b: 20 };
        let box_w = 30;
        let box_h = 5;
        let box_x = self.front.width.saturating_sub(box_w) / 2;
        let box_y = BOARD_ROW + 5;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::new(' ', Color::Reset, dim));
            }
        }
        self.front.put_str(box_x + 9, box_y + 1, "GAME  OVER", Color::Rgb { r: 255, g: 60, b: 60 }, dim);
        let line = format!("Score: {}", score);
        let lx = box_x + (box_w.saturating_sub(line.len())) / 2;
        self.front.put_str(lx, box_y + 3, &line, Color::White, dim);
    }

    fn compose_celebrate(&mut self, score: u32) {
        let art = [
            "╔══════════════════════════════╗",
            "║     ★  NEW  TOP  SCORE  ★    ║",
            "╚══════════════════════════════╝",
        ];
        let ax = self.front.width.saturating_sub(art[0].chars().count()) / 2;
        for (i, l) in art.iter().enumerate() {
            self.front.put_str(ax, 5 + i, l, TITLE_FG, Color::Reset);
        }
        let line = format!("{} points", score);
        let lx = self.front.width.saturating_sub(line.len()) / 2;
        self.front.put_str(lx, 10, &line, PROMPT_FG, Color::Reset);
    }

    fn compose_name_entry(&mut self, editor: &NameEntry, score: u32) {
        let header = format!("HIGH SCORE!  {} points", score);
        let hx = self.front.width.saturating_sub(header.len()) / 2;
        self.front.put_str(hx, 4, &header, TITLE_FG, Color::Reset);

        self.front.put_str(hx, 6, "Enter your name:", Color::White, Color::Reset);

        // Slots drawn 4 columns apart, then the OK marker.
        let slots_w = NAME_LEN * 4 + 4;
        let base_x = self.front.width.saturating_sub(slots_w) / 2;
        let row = 9;

        let chars = editor.chars();
        for i in 0..NAME_LEN {
            let x = base_x + i * 4;
            let ch = chars[i];
            let selected = editor.cursor() == i;
            let (fg, bg) = if selected {
                (Color::Black, PROMPT_FG)
            } else {
                (Color::White, Color::Reset)
            };
            self.front.set(x, row, Cell::new(ch, fg, bg));
            if selected {
                self.front.set(x, row + 1, Cell::new('▲', PROMPT_FG, Color::Reset));
                self.front.set(x, row - 1, Cell::new('▼', PROMPT_FG, Color::Reset));
            } else {
                self.front.set(x, row + 1, Cell::new('─', Color::DarkGrey, Color::Reset));
            }
        }

        // OK marker
        let ok_x = base_x + SUBMIT_SLOT * 4;
        let ok_selected = editor.cursor() == SUBMIT_SLOT;
        let (fg, bg) = if ok_selected {
            (Color::Black, PROMPT_FG)
        } else {
            (Color::White, Color::Reset)
        };
        self.front.put_str(ok_x, row, "OK", fg, bg);

        let help = "←→ slot  ↑↓ letter  Enter/up-on-OK submit  Esc skip";
        let help_x = self.front.width.saturating_sub(help.chars().count()) / 2;
        self.front.put_str(help_x, 12, help, Color::DarkGrey, Color::Reset);
    }

    fn compose_post_submit(&mut self, board: &Leaderboard) {
        self.front.put_str(8, 3, "── HIGH SCORES ──", TITLE_FG, Color::Reset);
        for (i, entry) in board.entries().iter().enumerate() {
            let row = 4 + i;
            if row >= self.front.height {
                break;
            }
            let line = format!("{:>2}. {}  {:>6}", i + 1, entry.name, entry.score);
            let fg = if i == 0 { TITLE_FG } else { Color::White };
            self.front.put_str(8, row, &line, fg, Color::Reset);
        }
        let row = 5 + board.entries().len();
        self.front.put_str(8, row, "Saved!", PROMPT_FG, Color::Reset);
    }
}
