//! Motion state machine definition
//!
//! Mode and action are a single value: there is no way to hold a Step
//! mode with an action left over from Tap.

use core::fmt;

use crate::config::Sink;
use crate::traits::Detection;

/// Detection mode of the motion endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    /// Interrupts are ignored
    Disabled,
    /// Pedometer step interrupts
    Step,
    /// Single-tap interrupts
    Tap,
}

impl From<Detection> for MotionMode {
    fn from(d: Detection) -> Self {
        match d {
            Detection::Step => MotionMode::Step,
            Detection::Tap => MotionMode::Tap,
        }
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionMode::Disabled => f.write_str("disabled"),
            MotionMode::Step => f.write_str("step"),
            MotionMode::Tap => f.write_str("tap"),
        }
    }
}

/// Motion endpoint state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// Initial state; interrupts are ignored
    Disabled,
    /// A detection is armed and its events go to `action`
    Armed {
        /// Armed detection
        detection: Detection,
        /// Where event records are written
        action: Sink,
    },
}

/// Commands from the command layer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionCommand {
    /// Arm a detection, replacing any other
    Start {
        /// Detection to arm
        detection: Detection,
        /// Where event records go
        action: Sink,
    },
    /// Disarm
    Stop,
}

impl MotionState {
    /// Current mode
    pub fn mode(&self) -> MotionMode {
        match self {
            MotionState::Disabled => MotionMode::Disabled,
            MotionState::Armed { detection, .. } => (*detection).into(),
        }
    }

    /// Current action, if armed
    pub fn action(&self) -> Option<&Sink> {
        match self {
            MotionState::Disabled => None,
            MotionState::Armed { action, .. } => Some(action),
        }
    }

    /// Check if interrupts produce jobs in this state
    pub fn is_armed(&self) -> bool {
        matches!(self, MotionState::Armed { .. })
    }

    /// Process a command and return the next state
    ///
    /// Step and Tap never stack: starting one while the other is armed
    /// replaces it.
    pub fn transition(self, command: MotionCommand) -> Self {
        match command {
            MotionCommand::Start { detection, action } => {
                MotionState::Armed { detection, action }
            }
            MotionCommand::Stop => MotionState::Disabled,
        }
    }
}

impl Default for MotionState {
    fn default() -> Self {
        MotionState::Disabled
    }
}

/// Published motion state with its generation number
///
/// Every publish bumps the generation, so two snapshots with the same
/// generation always hold the same pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSnapshot {
    /// The (mode, action) pair
    pub state: MotionState,
    /// Publish counter
    pub generation: u32,
}

impl MotionSnapshot {
    /// Boot snapshot
    pub const fn initial() -> Self {
        Self {
            state: MotionState::Disabled,
            generation: 0,
        }
    }
}
