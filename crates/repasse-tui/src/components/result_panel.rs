use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use repasse_core::coordinator::{ResultView, LOADING_MESSAGE};
use repasse_core::render::ResultCard;

use crate::component::Component;
use crate::theme::Theme;

/// Shows the current lookup result, its loading placeholder or the failure text.
pub struct ResultPanel {
    view: ResultView,
    theme: Theme,
}

impl ResultPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            view: ResultView::Empty,
            theme,
        }
    }

    pub fn set_view(&mut self, view: &ResultView) {
        if &self.view != view {
            self.view = view.clone();
        }
    }

    fn card_lines(&self, card: &ResultCard) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = card
            .header_rows()
            .map(|row| {
                Line::from(vec![
                    Span::styled(format!("{}: ", row.label), self.theme.header),
                    Span::styled(row.value.clone(), self.theme.normal),
                ])
            })
            .collect();
        lines.push(Line::default());
        lines.extend(card.amount_rows().map(|row| {
            Line::from(vec![
                Span::styled("  • ", self.theme.dimmed),
                Span::styled(format!("{}: ", row.label), self.theme.header),
                Span::styled(row.value.clone(), self.theme.amount),
            ])
        }));
        lines
    }

    fn lines(&self) -> Vec<Line<'static>> {
        match &self.view {
            ResultView::Empty => vec![Line::from(Span::styled(
                "Selecione um município e um período, depois consulte.",
                self.theme.dimmed,
            ))],
            ResultView::Loading => {
                vec![Line::from(Span::styled(LOADING_MESSAGE, self.theme.warning))]
            }
            ResultView::Result(result) => self.card_lines(&ResultCard::from(result)),
            ResultView::Failed(message) => {
                vec![Line::from(Span::styled(message.clone(), self.theme.error))]
            }
        }
    }
}

impl Component for ResultPanel {
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title(Span::styled(" Resultado ", self.theme.header))
            .borders(Borders::ALL)
            .border_style(if focused {
                self.theme.border_focused
            } else {
                self.theme.border
            });

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
