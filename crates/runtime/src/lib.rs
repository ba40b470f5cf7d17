pub mod event_bus;
pub mod scheduler;
pub mod timer_queue;

pub use event_bus::*;
pub use scheduler::*;
pub use timer_queue::*;
