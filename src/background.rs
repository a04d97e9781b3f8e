/// Background service worker: message relay and lifecycle logging

use crate::browser::{on_installed, on_message};
use crate::messaging::{InstallReason, background_reply};

pub fn start() {
    log::info!("Background script loaded");

    on_message(|message| {
        let reply = background_reply(&message);
        if reply.is_some() {
            log::info!("Button was clicked in popup");
        }
        reply
    });

    on_installed(|details| {
        log::info!("Extension installed/updated: {}", details.reason);
        match details.reason() {
            InstallReason::Install => log::info!("Extension installed for the first time"),
            InstallReason::Update => log::info!("Extension updated"),
            InstallReason::Other(_) => {}
        }
    });
}
