//! Scan gate combining two radio enablement signals
//!
//! Scanning is permitted only while both radios are enabled. Callbacks fire
//! when the combined state crosses that boundary, never for changes that
//! stay on one side of it.

use std::fmt;

/// One of the two gating radios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radio {
    A,
    B,
}

/// Combined enablement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    BothEnabled,
    OnlyRadioA,
    OnlyRadioB,
    NeitherEnabled,
}

impl GateState {
    pub fn from_signals(radio_a: bool, radio_b: bool) -> Self {
        match (radio_a, radio_b) {
            (true, true) => GateState::BothEnabled,
            (true, false) => GateState::OnlyRadioA,
            (false, true) => GateState::OnlyRadioB,
            (false, false) => GateState::NeitherEnabled,
        }
    }

    pub fn is_permitted(&self) -> bool {
        *self == GateState::BothEnabled
    }
}

/// Boundary crossing reported by a signal change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    Permitted,
    Forbidden,
}

pub type GateCallback = Box<dyn FnMut() + Send>;

pub struct ScanGate {
    radio_a: bool,
    radio_b: bool,
    on_permitted: GateCallback,
    on_forbidden: GateCallback,
}

impl ScanGate {
    /// Create a gate from the radios' current status.
    ///
    /// If both are already enabled `on_permitted` fires before this returns.
    pub fn new(radio_a: bool, radio_b: bool, on_permitted: GateCallback, on_forbidden: GateCallback) -> Self {
        let mut gate = Self {
            radio_a,
            radio_b,
            on_permitted,
            on_forbidden,
        };

        let state = gate.state();
        log::info!("Scan gate initialised in state {}", state);
        if state.is_permitted() {
            (gate.on_permitted)();
        }
        gate
    }

    /// Record a new status for one radio.
    ///
    /// Returns the boundary crossing, if any, after its callback has run.
    pub fn set_radio(&mut self, radio: Radio, enabled: bool) -> Option<GateTransition> {
        let before = self.state();
        match radio {
            Radio::A => self.radio_a = enabled,
            Radio::B => self.radio_b = enabled,
        }
        let after = self.state();

        if before == after {
            return None;
        }

        let transition = match (before.is_permitted(), after.is_permitted()) {
            (false, true) => GateTransition::Permitted,
            (true, false) => GateTransition::Forbidden,
            _ => {
                log::debug!("Scan gate {} -> {}", before, after);
                return None;
            }
        };

        log::info!("Scan gate {} -> {} ({:?})", before, after, transition);
        match transition {
            GateTransition::Permitted => (self.on_permitted)(),
            GateTransition::Forbidden => (self.on_forbidden)(),
        }
        Some(transition)
    }

    pub fn set_radio_a(&mut self, enabled: bool) -> Option<GateTransition> {
        self.set_radio(Radio::A, enabled)
    }

    pub fn set_radio_b(&mut self, enabled: bool) -> Option<GateTransition> {
        self.set_radio(Radio::B, enabled)
    }

    pub fn state(&self) -> GateState {
        GateState::from_signals(self.radio_a, self.radio_b)
    }

    pub fn is_permitted(&self) -> bool {
        self.state().is_permitted()
    }
}

impl fmt::Debug for ScanGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanGate")
            .field("radio_a", &self.radio_a)
            .field("radio_b", &self.radio_b)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateState::BothEnabled => "both-enabled",
            GateState::OnlyRadioA => "only-radio-a",
            GateState::OnlyRadioB => "only-radio-b",
            GateState::NeitherEnabled => "neither-enabled",
        };
        write!(f, "{}", name)
    }
}
