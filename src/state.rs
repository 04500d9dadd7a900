// The two screens of the application
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Screen {
    Welcome, // Introduction with the "Get Started" button
    List,    // Device inventory
}

/// Selects the visible screen. The only transition is Welcome -> List.
#[derive(Debug)]
pub struct ScreenFlow {
    screen: Screen,
    list_activated: bool,
}

impl Default for ScreenFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenFlow {
    pub fn new() -> Self {
        Self {
            screen: Screen::Welcome,
            list_activated: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Moves to the list screen. Does nothing once there.
    pub fn advance(&mut self) {
        if self.screen == Screen::Welcome {
            log::info!("Advancing from Welcome to List.");
            self.screen = Screen::List;
        }
    }

    /// Called every frame the list screen is shown. Returns `true` only on
    /// the first call, which is when the inventory should be requested.
    pub fn activate_list(&mut self) -> bool {
        if self.screen != Screen::List || self.list_activated {
            return false;
        }
        self.list_activated = true;
        true
    }
}
