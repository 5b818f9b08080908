pub mod calendar;
pub mod formatter;
pub mod message;
