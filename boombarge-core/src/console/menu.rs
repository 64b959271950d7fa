//! Menu set and navigation
//!
//! Bumpers step through the menus on release, Menu-1 jumps home.

use crate::input::{Button, ButtonLatch, Edge, InputState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Menu {
    #[default]
    Status,
    VisualTest,
    Sequence,
    Joysticks,
    Ignitors,
    Fault,
    ArmSystem,
}

impl Menu {
    /// Menus in cycling order
    pub const ALL: [Menu; 7] = [
        Menu::Status,
        Menu::VisualTest,
        Menu::Sequence,
        Menu::Joysticks,
        Menu::Ignitors,
        Menu::Fault,
        Menu::ArmSystem,
    ];

    pub const HOME: Menu = Menu::Status;

    pub fn title(self) -> &'static str {
        match self {
            Menu::Status => "Status",
            Menu::VisualTest => "Visual Test",
            Menu::Sequence => "Sequence",
            Menu::Joysticks => "Joysticks",
            Menu::Ignitors => "Ignitors",
            Menu::Fault => "Fault",
            Menu::ArmSystem => "Arm System",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Menu {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Menu {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Current menu plus the latches of the navigation buttons
#[derive(Debug, Clone, Default)]
pub struct MenuNavigator {
    current: Menu,
    cycle_left: ButtonLatch,
    cycle_right: ButtonLatch,
    home: ButtonLatch,
}

impl MenuNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Menu {
        self.current
    }

    /// Left bumper is down (for highlight)
    pub fn cycle_left_held(&self) -> bool {
        self.cycle_left.is_held()
    }

    pub fn cycle_right_held(&self) -> bool {
        self.cycle_right.is_held()
    }

    /// Apply navigation input; returns the new menu if it changed
    pub fn update(&mut self, input: &InputState) -> Option<Menu> {
        let left = self.cycle_left.update(input.is_pressed(Button::LeftBumper));
        let right = self.cycle_right.update(input.is_pressed(Button::RightBumper));
        let home = self.home.update(input.is_pressed(Button::Menu1));

        let target = if home == Edge::Pressed {
            Menu::HOME
        } else if left == Edge::Released {
            self.current.prev()
        } else if right == Edge::Released {
            self.current.next()
        } else {
            return None;
        };

        if target == self.current {
            return None;
        }
        self.current = target;
        Some(target)
    }
}
