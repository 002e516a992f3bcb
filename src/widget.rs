use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::WidgetRef,
};

use crate::{signal::SignalGet, tracker::UseBreakpoints};

/// One line summary of the current tier and width, e.g. `tablet 1000`.
#[derive(Debug, Clone)]
pub struct TierBadge {
    breakpoints: UseBreakpoints,
    style: Style,
}

impl TierBadge {
    pub fn new(breakpoints: UseBreakpoints) -> Self {
        Self {
            breakpoints,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn label(&self) -> String {
        let width = self.breakpoints.width.get_untracked();
        let tier = self.breakpoints.breakpoints().tier(width);
        format!("{tier} {width}")
    }
}

impl WidgetRef for TierBadge {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_stringn(area.x, area.y, self.label(), area.width as usize, self.style);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::Event;

    use super::*;
    use crate::{
        breakpoints::Breakpoints, environment::create_tracking_scope, tracker::use_breakpoints_with,
        window::Window,
    };

    fn render(badge: &TierBadge, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        badge.render_ref(area, &mut buf);
        buf.content.iter().map(|c| c.symbol()).collect::<String>()
    }

    #[test]
    fn test_renders_tier_and_width() {
        let window = Window::new(1000, 40);
        create_tracking_scope(|| {
            let bp = use_breakpoints_with(&window, Breakpoints::default()).unwrap();
            let badge = TierBadge::new(bp);
            assert_eq!(render(&badge, 20), "tablet 1000         ");

            window.dispatch(&Event::Resize(1200, 40));
            assert_eq!(render(&badge, 20), "unclassified 1200   ");

            window.dispatch(&Event::Resize(300, 40));
            assert_eq!(render(&badge, 8), "mobile 3");
        })
    }
}
