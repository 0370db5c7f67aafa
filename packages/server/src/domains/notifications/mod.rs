//! Notifications domain - plain SMS messages to a phone number

pub mod activities;
