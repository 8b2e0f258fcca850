//! In-game HUD task bar.

use super::{Screen, ScreenBase};

pub const LAYOUT: &str = "HUD/TaskBar";

/// Largest count the email badge displays.
pub const MAX_EMAIL_BADGE: u32 = 99;

#[derive(Debug)]
pub struct TaskBar {
    base: ScreenBase,
}

impl Default for TaskBar {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBar {
    pub fn new() -> Self {
        Self {
            base: ScreenBase::new(LAYOUT),
        }
    }

    /// Update the unread email badge; hidden when there is nothing unread.
    pub fn set_email_count(&mut self, count: u32) {
        self.base.set_text(
            "btnEmail/notification/txtNumber",
            count.min(MAX_EMAIL_BADGE).to_string(),
        );
        self.base
            .set_element_visible("btnEmail/notification", count > 0);
    }
}

impl Screen for TaskBar {
    fn base(&self) -> &ScreenBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ScreenBase {
        &mut self.base
    }
}
