//! Testing utilities and harness for flingkit

pub mod frame_driver;
pub mod robot;
pub mod robot_assertions;

pub use frame_driver::*;
pub use robot::*;

pub mod prelude {
    pub use crate::frame_driver::*;
    pub use crate::robot::*;
    pub use crate::robot_assertions;
}
