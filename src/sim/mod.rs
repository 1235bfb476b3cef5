pub mod clock;
pub mod event;
pub mod scores;
pub mod screen;
pub mod step;
pub mod world;
