//! Composite CDC-ACM + generic HID device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral, builds the serial interfaces by hand so line coding
//! requests reach the shared demo state, and attaches one HID interface
//! carrying all three report IDs.

use cdc_hid_demo::channels::KeyboardLedSink;
use cdc_hid_demo::config;
use cdc_hid_demo::control::{
    self, ClassRequest, Direction, Recipient as SetupRecipient, RequestType as SetupRequestType,
    SetupPacket,
};
use cdc_hid_demo::hid::GENERIC_REPORT_DESCRIPTOR;
use cdc_hid_demo::status::DeviceEvent;
use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::{Driver, Endpoint, In, Out};
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::hid::{
    Config as HidConfig, HidReader, HidReaderWriter, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::{InResponse, OutResponse, Recipient, Request, RequestType};
use embassy_usb::driver::Direction as UsbDirection;
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use crate::leds::LedRequests;
use crate::usb::bridge;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// HID endpoint buffer size.
pub const HID_PACKET_SIZE: usize = config::GENERIC_EPSIZE as usize;

const USB_CLASS_CDC: u8 = 0x02;
const USB_CLASS_CDC_DATA: u8 = 0x0A;
const CDC_SUBCLASS_ACM: u8 = 0x02;
const CDC_PROTOCOL_NONE: u8 = 0x00;

const CS_INTERFACE: u8 = 0x24;
const CDC_TYPE_HEADER: u8 = 0x00;
const CDC_TYPE_CALL_MANAGEMENT: u8 = 0x01;
const CDC_TYPE_ACM: u8 = 0x02;
const CDC_TYPE_UNION: u8 = 0x06;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_HANDLER: StaticCell<DemoUsbHandler> = StaticCell::new();
static HID_HANDLER: StaticCell<HidControl> = StaticCell::new();
static DEVICE_EVENTS: Channel<CriticalSectionRawMutex, DeviceEvent, 8> = Channel::new();

/// Bus events waiting for the polling loop.
pub fn device_events() -> &'static Channel<CriticalSectionRawMutex, DeviceEvent, 8> {
    &DEVICE_EVENTS
}

fn push_event(event: DeviceEvent) {
    if DEVICE_EVENTS.try_send(event).is_err() {
        warn!("device event queue full, {} dropped", event);
    }
}

/// Bus state changes and CDC class requests.
struct DemoUsbHandler {
    comm_if: u8,
}

impl DemoUsbHandler {
    /// Recognise a CDC request addressed to the communication interface.
    fn cdc_request(&self, req: &Request) -> Option<ClassRequest> {
        if req.request_type != RequestType::Class
            || req.recipient != Recipient::Interface
            || req.index != u16::from(self.comm_if)
        {
            return None;
        }

        match ClassRequest::decode(&setup_packet(req))? {
            ClassRequest::GetReport | ClassRequest::SetReport => None,
            request => Some(request),
        }
    }
}

impl embassy_usb::Handler for DemoUsbHandler {
    fn enabled(&mut self, enabled: bool) {
        bridge::set_configured(false);
        push_event(if enabled {
            DeviceEvent::Connect
        } else {
            DeviceEvent::Disconnect
        });
    }

    fn reset(&mut self) {
        bridge::set_configured(false);
    }

    fn configured(&mut self, configured: bool) {
        bridge::set_configured(configured);
        push_event(if configured {
            // Endpoints are allocated at build time, so this cannot fail.
            DeviceEvent::ConfigurationChanged { success: true }
        } else {
            DeviceEvent::Connect
        });
    }

    fn control_out(&mut self, req: Request, data: &[u8]) -> Option<OutResponse> {
        let request = self.cdc_request(&req)?;

        let Ok(mut state) = crate::STATE.try_lock() else {
            warn!("state busy, {} rejected", request);
            return Some(OutResponse::Rejected);
        };

        match control::handle_control_out(&mut state, request, data, &mut ()) {
            Ok(()) => Some(OutResponse::Accepted),
            Err(e) => {
                warn!("{} rejected: {}", request, e);
                Some(OutResponse::Rejected)
            }
        }
    }

    fn control_in<'a>(&'a mut self, req: Request, buf: &'a mut [u8]) -> Option<InResponse<'a>> {
        let request = self.cdc_request(&req)?;

        let Ok(mut state) = crate::STATE.try_lock() else {
            warn!("state busy, {} rejected", request);
            return Some(InResponse::Rejected);
        };

        let len = usize::from(req.length).min(buf.len());
        match control::handle_control_in(&mut state, request, &mut buf[..len]) {
            Ok(n) => Some(InResponse::Accepted(&buf[..n])),
            Err(e) => {
                warn!("{} rejected: {}", request, e);
                Some(InResponse::Rejected)
            }
        }
    }
}

/// GET_REPORT / SET_REPORT on the HID interface.
struct HidControl;

impl RequestHandler for HidControl {
    fn get_report(&mut self, _id: ReportId, buf: &mut [u8]) -> Option<usize> {
        let mut state = crate::STATE.try_lock().ok()?;
        control::handle_control_in(&mut state, ClassRequest::GetReport, buf).ok()
    }

    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        let Ok(mut state) = crate::STATE.try_lock() else {
            return OutResponse::Rejected;
        };

        let mut sink = KeyboardLedSink::new(LedRequests);
        match control::handle_control_out(&mut state, ClassRequest::SetReport, data, &mut sink) {
            Ok(()) => OutResponse::Accepted,
            Err(_) => OutResponse::Rejected,
        }
    }
}

fn setup_packet(req: &Request) -> SetupPacket {
    SetupPacket {
        direction: match req.direction {
            UsbDirection::In => Direction::DeviceToHost,
            UsbDirection::Out => Direction::HostToDevice,
        },
        request_type: match req.request_type {
            RequestType::Standard => SetupRequestType::Standard,
            RequestType::Class => SetupRequestType::Class,
            RequestType::Vendor => SetupRequestType::Vendor,
            _ => SetupRequestType::Reserved,
        },
        recipient: match req.recipient {
            Recipient::Device => SetupRecipient::Device,
            Recipient::Interface => SetupRecipient::Interface,
            Recipient::Endpoint => SetupRecipient::Endpoint,
            _ => SetupRecipient::Other,
        },
        request: req.request,
        value: req.value,
        index: req.index,
        length: req.length,
    }
}

/// Build result containing the USB device runner and every data endpoint.
pub struct DemoUsbDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub cdc_in: Endpoint<'static, peripherals::USBD, In>,
    pub cdc_out: Endpoint<'static, peripherals::USBD, Out>,
    pub hid_reader: HidReader<'static, UsbDriver, HID_PACKET_SIZE>,
    pub hid_writer: HidWriter<'static, UsbDriver, HID_PACKET_SIZE>,
}

/// Initialise the USB stack and create the composite device.
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> DemoUsbDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = config::USB_EP0_SIZE;
    // IAD so the host binds both CDC interfaces to one driver.
    usb_config.composite_with_iads = true;
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    // CDC-ACM: communication + data interface pair.
    let mut function = builder.function(USB_CLASS_CDC, CDC_SUBCLASS_ACM, CDC_PROTOCOL_NONE);

    let mut iface = function.interface();
    let comm_if = u8::from(iface.interface_number());
    let data_if = comm_if + 1;
    let mut alt = iface.alt_setting(USB_CLASS_CDC, CDC_SUBCLASS_ACM, CDC_PROTOCOL_NONE, None);
    alt.descriptor(CS_INTERFACE, &[CDC_TYPE_HEADER, 0x10, 0x01]);
    // Supports SET/GET_LINE_CODING and SET_CONTROL_LINE_STATE.
    alt.descriptor(CS_INTERFACE, &[CDC_TYPE_ACM, 0x02]);
    alt.descriptor(CS_INTERFACE, &[CDC_TYPE_UNION, comm_if, data_if]);
    alt.descriptor(CS_INTERFACE, &[CDC_TYPE_CALL_MANAGEMENT, 0x00, data_if]);
    // Serial state notifications are never sent.
    let _notify =
        alt.endpoint_interrupt_in(config::CDC_NOTIFICATION_EPSIZE, config::CDC_NOTIFICATION_POLL_MS);

    let mut iface = function.interface();
    let mut alt = iface.alt_setting(USB_CLASS_CDC_DATA, 0x00, 0x00, None);
    let cdc_out = alt.endpoint_bulk_out(config::CDC_TXRX_EPSIZE as u16);
    let cdc_in = alt.endpoint_bulk_in(config::CDC_TXRX_EPSIZE as u16);
    drop(function);

    let usb_handler = USB_HANDLER.init(DemoUsbHandler { comm_if });
    builder.handler(usb_handler);

    let hid_state = HID_STATE.init(State::new());
    let hid_config = HidConfig {
        report_descriptor: GENERIC_REPORT_DESCRIPTOR,
        request_handler: Some(HID_HANDLER.init(HidControl)),
        poll_ms: config::GENERIC_POLL_MS,
        max_packet_size: config::GENERIC_EPSIZE,
    };
    let hid = HidReaderWriter::<_, HID_PACKET_SIZE, HID_PACKET_SIZE>::new(
        &mut builder,
        hid_state,
        hid_config,
    );
    let (hid_reader, hid_writer) = hid.split();

    let device = builder.build();

    info!("USB composite device initialised (CDC-ACM + generic HID)");

    DemoUsbDevice {
        device,
        cdc_in,
        cdc_out,
        hid_reader,
        hid_writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles enumeration, control requests and suspend/resume.
#[embassy_executor::task]
pub async fn usb_device_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}
