//! Physics simulation module.
//!
//! Kinematics of the two ball carriages (with mechanical stops and stall
//! detection) and of the simulated players' paddles.

mod axis;
mod paddle;

pub use axis::AxisSimulator;
pub use paddle::{PaddleMode, PaddleSimulator};
