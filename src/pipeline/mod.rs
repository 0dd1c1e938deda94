//! Turns raw backend payloads into display-ready rows. Everything here is
//! synchronous except `view::AppointmentView::load` and the dispatcher.

pub mod calendar;
pub mod clients;
pub mod dashboard;
pub mod dispatch;
pub mod filter;
pub mod format;
pub mod normalize;
pub mod status;
pub mod view;
