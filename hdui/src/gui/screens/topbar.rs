//! In-game HUD top bar: date, time, speed, account, location and CPU.

use super::{Screen, ScreenBase};
use crate::gui::input::UiAction;

pub const LAYOUT: &str = "HUD/TopBar";

const SPEED_BUTTONS: [&str; 4] = ["btnSpeed0", "btnSpeed1", "btnSpeed2", "btnSpeed3"];
const CPU_FILL: &str = "cpuBar/fill";

#[derive(Debug)]
pub struct TopBar {
    base: ScreenBase,
    speed: u8,
    cpu_usage: f32,
    /// Authored width of the CPU fill bar, captured when the layout attaches.
    cpu_fill_width: Option<f32>,
}

impl Default for TopBar {
    fn default() -> Self {
        Self::new()
    }
}

impl TopBar {
    pub fn new() -> Self {
        Self {
            base: ScreenBase::new(LAYOUT),
            speed: 1,
            cpu_usage: 0.0,
            cpu_fill_width: None,
        }
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn cpu_usage(&self) -> f32 {
        self.cpu_usage
    }

    pub fn set_date(&mut self, day: u32, month: u32, year: i32) {
        self.base
            .set_text("txtDay", format!("{}-{}-{}", day, month, year));
    }

    pub fn set_time(&mut self, hour: u32, minute: u32) {
        self.base
            .set_text("txtTime", format!("{:02}:{:02}", hour, minute));
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed;
        log::debug!("Game speed set to {}", speed);
    }

    pub fn set_account(&mut self, account: &str, balance: i64) {
        self.base.set_text(
            "btnAccount/txtCaption",
            format!("Acc no. {}: {}c", account, balance),
        );
    }

    pub fn set_location(&mut self, name: &str, ip: &str) {
        self.base.set_text("txtLocName", name);
        self.base.set_text("txtLocIP", ip);
    }

    /// Scale the CPU bar fill to `usage`, clamped to 0..1.
    pub fn set_cpu(&mut self, usage: f32) {
        self.cpu_usage = if usage.is_nan() { 0.0 } else { usage.clamp(0.0, 1.0) };
        let Some(full) = self.cpu_fill_width else {
            return;
        };
        let width = full * self.cpu_usage;
        self.base.with_tree(|tree| {
            if let Some(id) = tree.find(CPU_FILL)
                && let Some(node) = tree.get_mut(id)
            {
                node.w = width;
            }
        });
    }

    pub fn set_username(&mut self, name: &str) {
        self.base.set_text("btnUser/txtCaption", name);
    }
}

impl Screen for TopBar {
    fn base(&self) -> &ScreenBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ScreenBase {
        &mut self.base
    }

    fn setup_callbacks(&mut self) {
        for (speed, name) in SPEED_BUTTONS.iter().enumerate() {
            self.base.connect(name, UiAction::SetSpeed(speed as u8));
        }
        self.cpu_fill_width = self
            .base
            .with_tree(|tree| tree.find(CPU_FILL).and_then(|id| tree.get(id)).map(|n| n.w))
            .flatten();
    }

    /// Speed button clicks apply to the bar itself before reaching the host.
    fn update(&mut self, dt: f32) -> Vec<UiAction> {
        let actions = self.base.update(dt);
        for action in &actions {
            if let UiAction::SetSpeed(speed) = *action {
                self.set_speed(speed);
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::input::{ButtonState, MouseButton, UiEvent};
    use crate::gui::screens::testing::layout_dir;

    const LAYOUT_XML: &str = r#"<layout name="TopBar" w="1920" h="64">
        <TextPoint name="txtDay"/>
        <TextPoint name="txtTime"/>
        <ButtonStandard name="btnSpeed0" x="0" w="20" h="20"/>
        <ButtonStandard name="btnSpeed3" x="60" w="20" h="20"/>
        <ButtonStandard name="btnAccount"><TextPoint name="txtCaption"/></ButtonStandard>
        <ButtonStandard name="btnUser"><TextPoint name="txtCaption"/></ButtonStandard>
        <TextPoint name="txtLocName"/>
        <TextPoint name="txtLocIP"/>
        <Container name="cpuBar"><Rectangle name="fill" w="200" h="8"/></Container>
    </layout>"#;

    fn created() -> (tempfile::TempDir, TopBar) {
        let (dir, mut layouts, atlases) = layout_dir(&[("HUD/TopBar.xml", LAYOUT_XML)]);
        let mut bar = TopBar::new();
        bar.create(&mut layouts, &atlases);
        (dir, bar)
    }

    fn text_at(bar: &TopBar, path: &str) -> Option<String> {
        bar.base()
            .with_tree(|tree| tree.find(path).and_then(|id| tree.text(id)).map(str::to_string))
            .flatten()
    }

    #[test]
    fn test_text_formats() {
        let (_dir, mut bar) = created();
        bar.set_date(24, 3, 2010);
        bar.set_time(9, 5);
        bar.set_account("1234", 3000);
        bar.set_location("InterNIC", "458.615.48.651");
        bar.set_username("agent");

        assert_eq!(text_at(&bar, "txtDay").as_deref(), Some("24-3-2010"));
        assert_eq!(text_at(&bar, "txtTime").as_deref(), Some("09:05"));
        assert_eq!(
            text_at(&bar, "btnAccount/txtCaption").as_deref(),
            Some("Acc no. 1234: 3000c")
        );
        assert_eq!(text_at(&bar, "txtLocName").as_deref(), Some("InterNIC"));
        assert_eq!(text_at(&bar, "txtLocIP").as_deref(), Some("458.615.48.651"));
        assert_eq!(text_at(&bar, "btnUser/txtCaption").as_deref(), Some("agent"));
    }

    #[test]
    fn test_cpu_bar_scales_and_clamps() {
        let (_dir, mut bar) = created();
        let fill_width = |bar: &TopBar| {
            bar.base()
                .with_tree(|tree| tree.get(tree.find("cpuBar/fill").unwrap()).unwrap().w)
                .unwrap()
        };

        bar.set_cpu(0.25);
        assert_eq!(fill_width(&bar), 50.0);
        bar.set_cpu(3.0);
        assert_eq!(bar.cpu_usage(), 1.0);
        assert_eq!(fill_width(&bar), 200.0);
        bar.set_cpu(-1.0);
        assert_eq!(fill_width(&bar), 0.0);
    }

    #[test]
    fn test_speed_button_click() {
        let (_dir, mut bar) = created();
        assert_eq!(bar.speed(), 1);

        for state in [ButtonState::Pressed, ButtonState::Released] {
            bar.handle_event(&UiEvent::MouseButton {
                button: MouseButton::Left,
                state,
                x: 65.0,
                y: 5.0,
            });
        }
        assert_eq!(bar.update(0.016), vec![UiAction::SetSpeed(3)]);
        assert_eq!(bar.speed(), 3);
    }
}
