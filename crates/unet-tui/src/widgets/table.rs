//! Bordered panels and tables in the cockpit style.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use unet_core::display::NO_DATA;

use crate::theme;

/// Rounded panel with a title.
pub fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// Header row from column names.
pub fn header(columns: &[&'static str]) -> Row<'static> {
    Row::new(
        columns
            .iter()
            .map(|c| Cell::from(*c).style(theme::table_header())),
    )
}

/// A titled table, or a centred "暂无数据" when there are no rows.
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    columns: &[&'static str],
    widths: &[Constraint],
    rows: Vec<Row<'_>>,
    selected: Option<usize>,
) {
    if rows.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Span::styled(NO_DATA, theme::key_hint())).alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let table = Table::new(rows, widths.to_vec())
        .header(header(columns))
        .block(block)
        .style(theme::table_row())
        .row_highlight_style(theme::table_selected());

    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut state);
}
