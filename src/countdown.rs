/// Per-session countdown driven by one-second ticks from the event loop.
///
/// Cancelling is idempotent and a cancelled countdown ignores further ticks,
/// so a tick that races finalization cannot trigger it a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Running,
    Expired,
}

impl Countdown {
    pub fn start(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            active: true,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn tick(&mut self) -> Tick {
        if !self.active {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            Tick::Expired
        } else {
            Tick::Running
        }
    }

    /// Zero-padded `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
