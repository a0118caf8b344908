use std::time::{SystemTime, UNIX_EPOCH};

use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::config::{CHROME_W, CONTROLS_H, INFO_H, MIN_PANE_WIDTH};
use crate::game::{Cell, Pos, Snapshot};

pub fn draw_game(frame: &mut Frame, snap: &Snapshot) {
    let area = frame.size();

    let well_w = snap.stack.length as u16 + 2;
    let well_h = snap.stack.width as u16 + 2;
    let min_w = (well_w + CHROME_W - 2).max(MIN_PANE_WIDTH);
    if area.width < min_w {
        let msg = Paragraph::new(format!("RESIZE PANE (min width: {})", min_w))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("PANELS"));
        frame.render_widget(msg, area);
        return;
    }

    // Outer "cabinet" frame.
    let cabinet = Block::default()
        .title("CURSED PANELS")
        .border_type(BorderType::Thick)
        .borders(Borders::ALL)
        .title_alignment(Alignment::Left);
    let cabinet_inner = cabinet.inner(area);
    frame.render_widget(cabinet, area);

    let col_rect = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(well_w.max(MIN_PANE_WIDTH - 2)),
            Constraint::Min(0),
        ])
        .split(cabinet_inner)[1];

    let stack = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(INFO_H),
            Constraint::Length(well_h),
            Constraint::Length(CONTROLS_H),
            Constraint::Min(0),
        ])
        .split(col_rect);

    let well_rect = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(well_w),
            Constraint::Min(0),
        ])
        .split(stack[2])[1];

    draw_info(frame, snap, stack[1]);
    draw_playfield(frame, snap, well_rect);
    draw_banner(frame, snap, stack[2]);
    draw_controls(frame, stack[3]);
}

fn draw_playfield(frame: &mut Frame, snap: &Snapshot, play_rect: Rect) {
    let stack = snap.stack;
    let mut lines: Vec<Line> = Vec::with_capacity(stack.width + 2);

    lines.push(Line::raw(format!("┌{}┐", "─".repeat(stack.length))));
    for row in 0..stack.width {
        let mut spans = Vec::with_capacity(stack.length + 2);
        spans.push(Span::raw("│"));
        for col in 0..stack.length {
            let pos = Pos::new(row, col);
            let glyph = match stack.get(pos) {
                Cell::Filled(panel) => panel.symbol(),
                // Empty slots of the boundary column mark the edge.
                Cell::Empty if col + 1 == stack.length => '|',
                Cell::Empty => ' ',
            };
            let text = glyph.to_string();
            if pos == snap.cursor {
                spans.push(Span::styled(text, cursor_style(snap.select)));
            } else {
                spans.push(Span::raw(text));
            }
        }
        spans.push(Span::raw("│"));
        lines.push(Line::from(spans));
    }
    lines.push(Line::raw(format!("└{}┘", "═".repeat(stack.length))));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
    frame.render_widget(paragraph, play_rect);
}

fn draw_banner(frame: &mut Frame, snap: &Snapshot, area: Rect) {
    let text = if snap.game_over {
        "GAME OVER\nAgain? (y/n)"
    } else if snap.paused {
        "PAUSED\np to resume"
    } else {
        return;
    };
    let overlay_w = 20u16.min(area.width);
    let overlay_h = 4u16.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(overlay_w)) / 2,
        y: area.y + (area.height.saturating_sub(overlay_h)) / 2,
        width: overlay_w,
        height: overlay_h,
    };
    let overlay = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(Clear, popup);
    frame.render_widget(overlay, popup);
}

fn cursor_style(select: bool) -> Style {
    if select {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

fn draw_info(frame: &mut Frame, snap: &Snapshot, area: Rect) {
    let status = if snap.game_over {
        "OVER"
    } else if snap.paused {
        "PAUSED"
    } else if snap.select {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        if (millis / 300) % 2 == 0 {
            "SELECT"
        } else {
            "      "
        }
    } else {
        "RUNNING"
    };
    // Columns left before the leading edge hits the boundary.
    let last = snap.stack.length - 1;
    let room = last - snap.stack.leading_edge().unwrap_or(0).min(last);

    let block = Block::default().title("INFO").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let left = Paragraph::new(vec![
        Line::raw(format!("{:<7} {}", "SCORE:", snap.score)),
        Line::raw(format!("{:<7} {:.2}", "SPEED:", snap.rate)),
        Line::raw(format!("{:<7} {}", "STATUS:", status)),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(left, cols[0]);

    let right = Paragraph::new(vec![
        Line::raw(format!("{:<6} {}", "CLEAR:", snap.cleared)),
        Line::raw(format!("{:<6} {}", "CHAIN:", snap.chain)),
        Line::raw(format!("{:<6} {}", "ROOM:", room)),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(right, cols[1]);
}

fn draw_controls(frame: &mut Frame, area: Rect) {
    let block = Block::default().title("CONTROLS").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let left = Paragraph::new(vec![
        Line::raw("arrows move"),
        Line::raw("space select"),
        Line::raw("q/esc quit"),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(left, cols[0]);

    let right = Paragraph::new(vec![
        Line::raw("p pause"),
        Line::raw("y/n again"),
        Line::raw(""),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(right, cols[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::game::state::Mode;
    use crate::game::Stack;

    fn render(snap: &Snapshot, w: u16, h: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal.draw(|frame| draw_game(frame, snap)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..h)
            .map(|y| (0..w).map(|x| buffer.get(x, y).symbol().to_string()).collect())
            .collect()
    }

    fn snapshot(stack: &Stack, mode: Mode) -> Snapshot<'_> {
        Snapshot {
            stack,
            cursor: Pos::new(0, 0),
            select: false,
            paused: mode == Mode::Paused,
            game_over: mode == Mode::GameOver,
            score: 1234,
            rate: 1.5,
            cleared: 9,
            chain: 2,
        }
    }

    #[test]
    fn test_draws_panels_and_edge() {
        let stack = Stack::from_rows(&["AB...", "BA..."]);
        let screen = render(&snapshot(&stack, Mode::Running), 60, 24);
        let text = screen.join("\n");

        assert!(text.contains("CURSED PANELS"));
        assert!(text.contains("SCORE:  1234"));
        assert!(text.contains("│AB  |│"));
        assert!(text.contains("│BA  |│"));
    }

    #[test]
    fn test_game_over_banner() {
        let stack = Stack::from_rows(&["AB...", "BA...", "AB...", "BA..."]);
        let screen = render(&snapshot(&stack, Mode::GameOver), 60, 24);
        let text = screen.join("\n");

        assert!(text.contains("OVER"));
        assert!(text.contains("GAME OVER"));
    }

    #[test]
    fn test_narrow_pane_asks_for_resize() {
        let stack = Stack::from_rows(&["AB..."]);
        let screen = render(&snapshot(&stack, Mode::Running), 30, 10);
        assert!(screen.join("\n").contains("RESIZE"));
    }
}
