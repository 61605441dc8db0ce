//! Frame handoff monitoring task
//!
//! Watches the panel's tearing-effect line and signals each completed
//! frame handoff. The status watchdog drains against this signal before
//! probing, so a probe cannot collide with an in-flight commit.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::FRAME_DONE;

/// Frame sync task
#[embassy_executor::task]
pub async fn frame_sync_task(mut te: Input<'static>) {
    info!("Frame sync task started");

    loop {
        te.wait_for_rising_edge().await;
        FRAME_DONE.signal(());
    }
}
