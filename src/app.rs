use fivestar_core::{ChatMessage, ChatWidget, PopupState, PopupUpdate, ProductId};
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Popup regions, filled in as requests resolve
    pub popup: PopupState,
    pub product_id: Option<ProductId>,
    pub backend_url: String,

    // Product panel scroll
    pub product_scroll: u16,

    // Chat state
    pub chat: ChatWidget<Vec<ChatMessage>>,
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub product_area: Option<Rect>,
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(tab_url: &str, backend_url: &str) -> Self {
        let mut popup = PopupState::new();
        popup.url = tab_url.to_string();

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            popup,
            product_id: ProductId::from_url(tab_url),
            backend_url: backend_url.to_string(),
            product_scroll: 0,
            chat: ChatWidget::new(Vec::new()),
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            product_area: None,
            chat_area: None,
        }
    }

    pub fn apply_update(&mut self, update: PopupUpdate) {
        self.popup.apply(update);
    }

    /// Send the chat input; the bot echoes it back.
    pub fn send_chat(&mut self) {
        if self.chat.send(&mut self.chat_input) {
            self.chat_cursor = 0;
            self.scroll_chat_to_bottom();
        }
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
    }

    /// "Loading" with an animated ellipsis
    pub fn loading_text(&self) -> String {
        format!("Loading{}", ".".repeat(self.animation_frame as usize + 1))
    }

    pub fn scroll_down(&mut self) {
        self.product_scroll = self.product_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.product_scroll = self.product_scroll.saturating_sub(1);
    }

    pub fn scroll_chat_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    /// Scroll so the latest chat message is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        // Not rendered yet, nothing to measure against
        if self.chat_height == 0 {
            return;
        }

        let width = self.chat_width.max(1) as usize;
        let total_lines: usize = self
            .chat
            .history()
            .iter()
            .map(|msg| {
                // label line + wrapped content + blank separator
                let wrapped: usize = msg
                    .content
                    .lines()
                    .map(|line| (line.chars().count().max(1) + width - 1) / width)
                    .sum();
                wrapped.max(1) + 2
            })
            .sum();

        self.chat_scroll = (total_lines as u16).saturating_sub(self.chat_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fivestar_core::{BulletRegion, ChatRole, SummaryRegion};

    const PRODUCT_URL: &str = "https://www.amazon.com/dp/B07XJ8C8F5/ref=sr_1_1";

    #[test]
    fn test_new_app_knows_product() {
        let app = App::new(PRODUCT_URL, "http://localhost:8000");
        assert_eq!(app.popup.url, PRODUCT_URL);
        assert_eq!(app.product_id.as_ref().map(|id| id.as_str()), Some("B07XJ8C8F5"));
        assert_eq!(app.popup.pros, BulletRegion::Loading);
    }

    #[test]
    fn test_updates_land_in_their_region() {
        let mut app = App::new(PRODUCT_URL, "http://localhost:8000");
        app.apply_update(PopupUpdate::Title("Echo Dot".to_string()));
        app.apply_update(PopupUpdate::Summary(SummaryRegion::summarizing(vec!["Smart".to_string()])));

        assert_eq!(app.popup.title.as_deref(), Some("Echo Dot"));
        assert_eq!(app.popup.summary.text(), "Smart\n(Summarizing in the background...)");
        assert_eq!(app.popup.quote, "");
    }

    #[test]
    fn test_send_chat_echoes_and_resets_cursor() {
        let mut app = App::new(PRODUCT_URL, "http://localhost:8000");
        app.chat_input = "hello".to_string();
        app.chat_cursor = 5;

        app.send_chat();

        assert_eq!(app.chat_input, "");
        assert_eq!(app.chat_cursor, 0);
        let roles: Vec<ChatRole> = app.chat.history().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Bot]);
    }

    #[test]
    fn test_blank_chat_keeps_input() {
        let mut app = App::new(PRODUCT_URL, "http://localhost:8000");
        app.chat_input = "   ".to_string();
        app.chat_cursor = 3;

        app.send_chat();

        assert_eq!(app.chat_input, "   ");
        assert_eq!(app.chat_cursor, 3);
        assert!(app.chat.history().is_empty());
    }

    #[test]
    fn test_loading_animation_cycles() {
        let mut app = App::new(PRODUCT_URL, "http://localhost:8000");
        assert_eq!(app.loading_text(), "Loading.");
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.loading_text(), "Loading...");
        app.tick_animation();
        assert_eq!(app.loading_text(), "Loading.");
    }
}
