//! External delivery channels for visit notifications.

pub mod webhook;
