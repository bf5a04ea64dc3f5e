//! AI systems (perception, FSM dispatch, reactions, heading/animation)

pub mod fsm;
pub mod movement;
pub mod perception;
pub mod reactions;

// Re-export all systems
pub use fsm::*;
pub use movement::*;
pub use perception::*;
pub use reactions::*;
