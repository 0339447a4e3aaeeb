pub mod events;
pub mod schedule;
