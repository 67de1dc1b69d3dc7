//! foot-switch firmware for nRF52840.
//!
//! One cooperative loop, paced by a 500 µs ticker:
//!   1. pet the watchdog
//!   2. if a frame is pending, offer it to the interrupt endpoint; the
//!      sequencer only advances when the write completed
//!   3. with nothing pending, repeat the current frame once the host's
//!      idle interval has passed
//!   4. sample the pedal and advance the debounce clock
//!   5. publish the current frame for GET_REPORT
//!
//! The loop starts only after the first bus reset has calibrated the
//! oscillator.

#![no_std]
#![no_main]

mod board;
mod usb;

use defmt::{debug, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::config::HfclkSource;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::wdt::{self, Watchdog};
use embassy_time::{Duration, Instant, Ticker, Timer};
use foot_switch::config;
use foot_switch::hid::{HidReportFrame, ReportSource};
use foot_switch::pedal;
use foot_switch::{Error, FootSwitch};
use usb::hid_device::{self, PedalWriter, UsbDriver, SHARED_REPORT};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::task]
async fn usb_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);
    info!("foot-switch starting");

    board::enable_cycle_counter();

    let mut wdt_config = wdt::Config::default();
    wdt_config.timeout_ticks = config::WATCHDOG_TIMEOUT_TICKS;
    let mut watchdog = match Watchdog::try_new(p.WDT, wdt_config) {
        Ok((_wdt, [handle])) => handle,
        Err(_) => defmt::panic!("{}", Error::Watchdog),
    };

    let indicator = Output::new(p.P0_06, Level::Low, OutputDrive::Standard);
    let mut pedal_pin = Input::new(p.P0_11, Pull::Up);

    let mut switch = match FootSwitch::new(&config::PEDAL) {
        Ok(switch) => switch,
        Err(e) => defmt::panic!("invalid pedal configuration: {}", e),
    };

    let usb = hid_device::init(p.USBD, indicator);
    let mut writer = usb.writer;
    unwrap!(spawner.spawn(usb_task(usb.device)));

    // Keep the watchdog fed until the host has reset the bus.
    let calibration = loop {
        watchdog.pet();
        match select(hid_device::calibrated().wait(), Timer::after_millis(100)).await {
            Either::First(calibration) => break calibration,
            Either::Second(()) => {}
        }
    };
    info!("Calibrated (deviation {}), entering main loop", calibration.deviation);

    let mut timer =
        board::TimerOverflow::new(Duration::from_micros(config::TIMER_OVERFLOW_PERIOD_US));
    let mut ticker = Ticker::every(Duration::from_micros(config::POLL_INTERVAL_US));
    let mut last_sent = Instant::now();

    loop {
        watchdog.pet();

        if let Some(frame) = switch.pending_frame() {
            if send(&mut writer, frame).await {
                switch.frame_consumed();
                last_sent = Instant::now();
            }
        } else if let Some(idle_ms) = hid_device::device_mode().idle_interval_ms() {
            if last_sent.elapsed() >= Duration::from_millis(idle_ms as u64)
                && send(&mut writer, switch.current_frame()).await
            {
                last_sent = Instant::now();
            }
        }

        if let Some(edge) = switch.poll(pedal::sample(&mut pedal_pin), &mut timer) {
            debug!("Pedal: {}", edge);
        }
        SHARED_REPORT.publish(switch.current_frame());

        ticker.next().await;
    }
}

/// Offer one frame to the interrupt endpoint.
///
/// Returns `true` only if the host took it within the write window.
async fn send(writer: &mut PedalWriter, frame: HidReportFrame) -> bool {
    let write = writer.write(frame.as_bytes());
    let window = Timer::after_millis(config::USB_WRITE_WINDOW_MS);
    match select(write, window).await {
        Either::First(Ok(())) => {
            debug!("Report sent: {=[u8]:x}", frame.as_bytes());
            true
        }
        Either::First(Err(e)) => {
            warn!("USB report write failed: {}", e);
            false
        }
        Either::Second(()) => false,
    }
}
