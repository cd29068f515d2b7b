//! Similar titles panel
//!
//! Right-hand list of titles related to the one being shown, fetched
//! separately from the main record.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::models::SimilarTitle;
use crate::query::QuerySnapshot;
use crate::ui::detail::similar_label;
use crate::ui::Theme;

/// Borrowed view of the similar-titles query plus the list selection
#[derive(Debug, Clone, Copy)]
pub struct SimilarPanel<'a> {
    pub label: &'static str,
    pub snapshot: QuerySnapshot<'a, Vec<SimilarTitle>>,
    pub selected: usize,
    pub focused: bool,
}

impl<'a> SimilarPanel<'a> {
    pub fn new(
        category: &str,
        snapshot: QuerySnapshot<'a, Vec<SimilarTitle>>,
        selected: usize,
    ) -> Self {
        Self {
            label: similar_label(category),
            snapshot,
            selected,
            focused: true,
        }
    }

    pub fn titles(&self) -> &'a [SimilarTitle] {
        self.snapshot.data.map(Vec::as_slice).unwrap_or_default()
    }

    /// First visible row so the selection stays on screen
    fn offset(&self, visible_height: usize) -> usize {
        if visible_height == 0 || self.selected < visible_height {
            0
        } else {
            self.selected + 1 - visible_height
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let titles = self.titles();
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let header = if titles.is_empty() {
            format!(" {} ", self.label)
        } else {
            format!(" {} ({}/{}) ", self.label, self.selected + 1, titles.len())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(header, Theme::title()));

        if titles.is_empty() {
            let (message, style) = if self.snapshot.is_loading || self.snapshot.is_fetching {
                ("⟳ Loading...", Theme::loading())
            } else if self.snapshot.is_error {
                ("Couldn't load similar titles", Theme::error())
            } else {
                ("Nothing similar found", Theme::dimmed())
            };
            let empty = Paragraph::new(message)
                .style(style)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let visible_height = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = titles
            .iter()
            .enumerate()
            .skip(self.offset(visible_height))
            .take(visible_height)
            .map(|(i, title)| render_item(title, i == self.selected))
            .collect();

        let list = List::new(items).block(block).style(Theme::text());
        frame.render_widget(list, area);
    }
}

fn render_item(item: &SimilarTitle, is_selected: bool) -> ListItem<'static> {
    let marker = if is_selected { "▸ " } else { "  " };
    let year = item.year.map(|y| format!(" ({})", y)).unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(
            marker,
            if is_selected {
                Theme::keybind()
            } else {
                Theme::dimmed()
            },
        ),
        Span::styled(
            item.title.clone(),
            if is_selected {
                Theme::list_item_selected()
            } else {
                Theme::text()
            },
        ),
        Span::styled(year, Theme::year()),
        Span::raw(" "),
        Span::styled(
            format!("★ {:.1}", item.vote_average),
            Theme::rating(item.vote_average),
        ),
    ]);

    ListItem::new(line)
}
