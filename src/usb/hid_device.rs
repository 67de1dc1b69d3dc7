//! USB HID pedal device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one HID keyboard endpoint plus the control
//! request plumbing shared with the main loop.

use crate::board::{CrystalClock, FrameMeter};
use core::cell::RefCell;
use defmt::info;
use embassy_nrf::gpio::Output;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::{InResponse, OutResponse, Request, RequestType};
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use foot_switch::calibration::{calibrate, target_frame_length, Calibration};
use foot_switch::config;
use foot_switch::control::{
    idle_ms_from_rate, idle_rate_from_ms, DeviceMode, Dispatcher, RequestKind, SetupRequest,
    HID_GET_IDLE, HID_GET_REPORT, HID_SET_IDLE,
};
use foot_switch::shared::SharedReport;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Interrupt endpoint packet size; larger than any report layout.
const MAX_PACKET_SIZE: usize = 8;

pub type PedalWriter = HidWriter<'static, UsbDriver, MAX_PACKET_SIZE>;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static USB_DEVICE_HANDLER: StaticCell<DeviceHandler> = StaticCell::new();
static HID_REQUEST_HANDLER: StaticCell<HidRequests> = StaticCell::new();

/// Last frame published by the main loop; GET_REPORT reads it.
pub static SHARED_REPORT: SharedReport = SharedReport::new(config::PEDAL.layout);

static CONTROL: Mutex<CriticalSectionRawMutex, RefCell<Option<Dispatcher<Output<'static>>>>> =
    Mutex::new(RefCell::new(None));

static CALIBRATED: Signal<CriticalSectionRawMutex, Calibration> = Signal::new();

/// Completes once the oscillator has been calibrated after a bus reset.
pub fn calibrated() -> &'static Signal<CriticalSectionRawMutex, Calibration> {
    &CALIBRATED
}

/// Run one setup request through the dispatcher.
fn dispatch(request: &SetupRequest, response: &mut [u8]) -> usize {
    CONTROL.lock(|cell| match cell.borrow_mut().as_mut() {
        Some(dispatcher) => dispatcher.on_setup_request(request, &SHARED_REPORT, response),
        None => 0,
    })
}

/// Flags last set by the host.
pub fn device_mode() -> DeviceMode {
    CONTROL.lock(|cell| {
        cell.borrow()
            .as_ref()
            .map(|dispatcher| dispatcher.mode())
            .unwrap_or_default()
    })
}

fn setup_from(req: &Request) -> SetupRequest {
    let kind = match req.request_type {
        RequestType::Standard => RequestKind::Standard,
        RequestType::Class => RequestKind::Class,
        RequestType::Vendor => RequestKind::Vendor,
        RequestType::Reserved => RequestKind::Reserved,
    };
    SetupRequest {
        kind,
        request: req.request,
        value: req.value,
        index: req.index,
        length: req.length,
    }
}

/// Bus reset and vendor request hooks.
struct DeviceHandler {
    meter: FrameMeter,
    clock: CrystalClock,
}

impl Handler for DeviceHandler {
    fn reset(&mut self) {
        info!("USB bus reset - calibrating oscillator");
        let target = target_frame_length(config::CALIBRATION_CORE_HZ);
        let meter = &mut self.meter;
        let result = calibrate(&mut self.clock, target, || meter.measure());
        info!(
            "Calibration: committed={} deviation={} (target {})",
            self.clock.value(),
            result.deviation,
            target
        );
        CALIBRATED.signal(result);
    }

    fn suspended(&mut self, suspended: bool) {
        info!("USB suspended={}", suspended);
    }

    fn control_out(&mut self, req: Request, _data: &[u8]) -> Option<OutResponse> {
        if req.request_type != RequestType::Vendor {
            return None;
        }
        dispatch(&setup_from(&req), &mut []);
        Some(OutResponse::Accepted)
    }

    fn control_in<'a>(&'a mut self, req: Request, buf: &'a mut [u8]) -> Option<InResponse<'a>> {
        if req.request_type != RequestType::Vendor {
            return None;
        }
        let n = dispatch(&setup_from(&req), buf);
        Some(InResponse::Accepted(&buf[..n]))
    }
}

/// HID class requests, translated back into setup requests.
struct HidRequests;

impl RequestHandler for HidRequests {
    fn get_report(&mut self, _id: ReportId, buf: &mut [u8]) -> Option<usize> {
        let request = SetupRequest::new(RequestKind::Class, HID_GET_REPORT, 0x0100);
        Some(dispatch(&request, buf))
    }

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        let request = SetupRequest::new(RequestKind::Class, HID_GET_IDLE, 0);
        let mut rate = [0u8; 1];
        dispatch(&request, &mut rate);
        Some(idle_ms_from_rate(rate[0]))
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, duration_ms: u32) {
        let rate = idle_rate_from_ms(duration_ms) as u16;
        let request = SetupRequest::new(RequestKind::Class, HID_SET_IDLE, rate << 8);
        dispatch(&request, &mut []);
    }
}

/// Build result containing the USB device runner and the HID writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub writer: PedalWriter,
}

/// Initialise the USB stack and create the HID pedal device.
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD, indicator: Output<'static>) -> UsbHidDevice {
    CONTROL.lock(|cell| cell.replace(Some(Dispatcher::new(indicator))));

    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 64]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let handler = USB_DEVICE_HANDLER.init(DeviceHandler {
        meter: FrameMeter,
        clock: CrystalClock::default(),
    });
    builder.handler(handler);

    let hid_state = HID_STATE.init(State::new());
    let hid_config = HidConfig {
        report_descriptor: config::PEDAL.layout.descriptor(),
        request_handler: Some(HID_REQUEST_HANDLER.init(HidRequests)),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: MAX_PACKET_SIZE as u16,
    };
    let writer = HidWriter::new(&mut builder, hid_state, hid_config);

    let device = builder.build();

    info!(
        "USB HID pedal initialised ({} byte reports)",
        config::PEDAL.layout.width()
    );

    UsbHidDevice { device, writer }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}
