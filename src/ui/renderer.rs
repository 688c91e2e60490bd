/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Reads the session through its accessors only; owns no game state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use boostsnake::domain::boost::BoostPhase;
use boostsnake::{GameSession, Grid, Phase, Pos};

use super::sliders::{Slider, SliderPanel};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Black;

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer so every cell is re-sent.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
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
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
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

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Centre `s` horizontally on row `y`.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg, Color::Reset);
    }
}

// ── Renderer ──

/// Each grid cell is two terminal columns wide so blocks look square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 1;

const SNAKE_FG: Color = Color::Green;
const FLASH_FG: Color = Color::White;
const FOOD_FG: Color = Color::Red;
const BOOST_FG: Color = Color::Yellow;
const BORDER_FG: Color = Color::DarkGrey;
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };

/// Terminal columns and rows needed for the HUD plus the bordered board.
fn board_extent(grid: &Grid) -> (usize, usize) {
    let w = grid.columns().max(0) as usize * CELL_W + 2;
    let h = BOARD_ROW + grid.rows().max(0) as usize + 2;
    (w, h)
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
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
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &GameSession, panel: &SliderPanel, now: u64) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(session.phase()) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(session.phase());
        }

        self.front.clear();

        match session.phase() {
            Phase::Waiting => self.compose_waiting(session, panel),
            Phase::Playing => self.compose_playing(session, now),
            Phase::GameOver => self.compose_game_over(session, panel),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
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
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_playing(&mut self, s: &GameSession, now: u64) {
        let buf_w = self.front.width;

        // ── HUD row ──
        let boost = if s.any_boost_active() { "BOOST x2" } else { "" };
        let hud = format!(" Score: {:<6} Length: {:<4} {} ", s.score(), s.snake().len(), boost);
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // ── Board ──
        let (need_w, need_h) = board_extent(s.grid());
        if self.front.width < need_w || self.front.height < need_h {
            let mid = self.front.height / 2;
            self.front.put_centered(mid, "Terminal too small", Color::Yellow);
            let size = format!("need {need_w}x{need_h}, have {}x{}", self.front.width, self.front.height);
            self.front.put_centered(mid + 1, &size, Color::DarkGrey);
            return;
        }
        self.compose_border(s);

        for boost in s.boosts() {
            if boost.phase() == BoostPhase::Appearing {
                self.put_block(s, boost.position, '◆', BOOST_FG);
            }
        }
        for food in s.foods() {
            self.put_block(s, food.position, '●', FOOD_FG);
        }

        let snake_fg = if s.is_flashing_visible(now) { FLASH_FG } else { SNAKE_FG };
        for (i, &p) in s.snake().body().iter().enumerate().rev() {
            let ch = if i == 0 { '█' } else { '▓' };
            self.put_block(s, p, ch, snake_fg);
        }
    }

    fn compose_border(&mut self, s: &GameSession) {
        let grid = s.grid();
        let inner_w = grid.columns() as usize * CELL_W;
        let inner_h = grid.rows() as usize;
        let right = inner_w + 1;
        let bottom = BOARD_ROW + inner_h + 1;

        for x in 0..=right {
            let ch = if x == 0 || x == right { '+' } else { '-' };
            self.front.set(x, BOARD_ROW, Cell::new(ch, BORDER_FG, Color::Reset));
            self.front.set(x, bottom, Cell::new(ch, BORDER_FG, Color::Reset));
        }
        for y in BOARD_ROW + 1..bottom {
            self.front.set(0, y, Cell::new('|', BORDER_FG, Color::Reset));
            self.front.set(right, y, Cell::new('|', BORDER_FG, Color::Reset));
        }
    }

    /// Draw one grid cell (two columns) inside the border.
    fn put_block(&mut self, s: &GameSession, p: Pos, ch: char, fg: Color) {
        let (cx, cy) = s.grid().cell_of(p);
        if cx < 0 || cy < 0 {
            return;
        }
        let col = 1 + cx as usize * CELL_W;
        let row = BOARD_ROW + 1 + cy as usize;
        for dx in 0..CELL_W {
            self.front.set(col + dx, row, Cell::new(ch, fg, Color::Reset));
        }
    }

    fn compose_waiting(&mut self, s: &GameSession, panel: &SliderPanel) {
        let mid = self.front.height / 2;
        let top = mid.saturating_sub(6);

        self.front.put_centered(top, "B O O S T   S N A K E", Color::Green);
        self.front.put_centered(top + 2, "Press ENTER to Start or ESC to Exit", Color::White);
        self.front.put_centered(
            top + 3,
            "Arrows/WASD steer   Tab/Up/Down pick setting   Left/Right adjust",
            Color::DarkGrey,
        );

        self.compose_sliders(s, panel, top + 5);
    }

    fn compose_game_over(&mut self, s: &GameSession, panel: &SliderPanel) {
        let mid = self.front.height / 2;
        let top = mid.saturating_sub(7);

        self.front.put_centered(top, "G A M E   O V E R", Color::Red);
        self.front.put_centered(top + 2, &format!("Your Score: {}", s.score()), Color::Yellow);
        self.front.put_centered(top + 3, "Press ENTER to Start or ESC to Exit", Color::White);

        self.compose_sliders(s, panel, top + 5);
    }

    /// Three labelled bars, the selected one highlighted.
    fn compose_sliders(&mut self, s: &GameSession, panel: &SliderPanel, first_row: usize) {
        const BAR_W: usize = 30;
        let settings = s.settings();
        let x0 = self.front.width.saturating_sub(BAR_W + 2) / 2;

        for (i, slider) in Slider::ALL.into_iter().enumerate() {
            let row = first_row + i * 3;
            let selected = slider == panel.selected();
            let label_fg = if selected { Color::Green } else { Color::White };
            let marker = if selected { "▶ " } else { "  " };

            self.front.put_centered(row, &format!("{marker}{}", slider.label()), label_fg);

            let handle = (slider.fraction(&settings) * (BAR_W - 1) as f32).round() as usize;
            self.front.set(x0, row + 1, Cell::new('[', Color::White, Color::Reset));
            for bx in 0..BAR_W {
                let (ch, fg) = if bx == handle { ('█', Color::Green) } else { ('─', Color::DarkGrey) };
                self.front.set(x0 + 1 + bx, row + 1, Cell::new(ch, fg, Color::Reset));
            }
            self.front.set(x0 + 1 + BAR_W, row + 1, Cell::new(']', Color::White, Color::Reset));
            let value = format!(" {}", slider.value(&settings));
            self.front.put_str(x0 + 2 + BAR_W, row + 1, &value, Color::White, Color::Reset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boostsnake::config::TimingConfig;
    use boostsnake::{Command, FrameInput, Settings};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started() -> GameSession {
        let mut s = GameSession::new(Grid::default(), TimingConfig::default(), Settings::default(), StdRng::seed_from_u64(1));
        s.step(FrameInput::command(Command::Start), 0);
        s
    }

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn default_board_extent() {
        assert_eq!(board_extent(&Grid::default()), (82, 33));
    }

    #[test]
    fn small_terminal_shows_notice_instead_of_board() {
        let s = started();
        let mut r = Renderer::new();
        r.front.resize(80, 24);
        r.compose_playing(&s, 0);

        assert!(row_text(&r.front, 12).contains("Terminal too small"));
        assert!(row_text(&r.front, 13).contains("need 82x33, have 80x24"));
        assert_eq!(r.front.get(0, BOARD_ROW).ch, ' ');
    }

    #[test]
    fn exact_fit_draws_full_border() {
        let s = started();
        let mut r = Renderer::new();
        r.front.resize(82, 33);
        r.compose_playing(&s, 0);

        assert_eq!(r.front.get(0, BOARD_ROW).ch, '+');
        assert_eq!(r.front.get(81, BOARD_ROW).ch, '+');
        assert_eq!(r.front.get(81, 32).ch, '+');
        assert!(!(0..33).any(|y| row_text(&r.front, y).contains("too small")));
    }
}
