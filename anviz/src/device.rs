//! High-level device interface

use bytes::Bytes;
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use anviz_core::{
    Command, Request, Response, ResponseHeader, Session, SessionState,
    constants::sizes,
    frame::declared_len,
};
use anviz_transport::{TcpTransport, Transport};
use anviz_types::{NetParams, RecordInfo, datetime};

use crate::config::DeviceConfig;
use crate::error::Result;

/// Anviz terminal
///
/// High-level interface for communicating with one Anviz attendance
/// terminal. The TCP connection is opened by the first command and reused
/// for every command after it; a lost connection is reported, never
/// re-established.
///
/// # Examples
///
/// ```no_run
/// use anviz::Device;
///
/// #[tokio::main]
/// async fn main() -> anviz::Result<()> {
///     let mut device = Device::new(1, "192.168.1.218", 5010);
///
///     let now = device.get_datetime().await?;
///     println!("Device clock: {}", now);
///
///     let records = device.get_record_info().await?;
///     println!("{}", records);
///     Ok(())
/// }
/// ```
pub struct Device {
    transport: Box<dyn Transport>,
    session: Session,
}

impl Device {
    /// Create a new device instance (TCP transport, default timeouts)
    pub fn new(device_id: u32, ip: impl Into<String>, port: u16) -> Self {
        Self::with_transport(device_id, Box::new(TcpTransport::new(ip, port)))
    }

    /// Create a device instance from loaded settings
    pub fn from_config(config: &DeviceConfig) -> Self {
        let transport = TcpTransport::new(config.ip_addr.clone(), config.ip_port)
            .with_connect_timeout(config.timeout())
            .with_read_timeout(config.timeout())
            .with_write_timeout(config.timeout());

        Self::with_transport(config.device_id, Box::new(transport))
    }

    /// Create a device instance over an arbitrary transport
    pub fn with_transport(device_id: u32, transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            session: Session::new(device_id),
        }
    }

    /// Device id used in every frame
    pub fn device_id(&self) -> u32 {
        self.session.device_id()
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.session.is_connected() && self.transport.is_connected()
    }

    /// Open the connection unless it is already open
    pub async fn ensure_connected(&mut self) -> Result<()> {
        if self.session.is_connected() {
            return Ok(());
        }

        info!("Connecting to {}...", self.transport.remote_addr());

        self.transport.connect().await?;
        self.session.mark_connected()?;

        info!(
            "Connected to {} (device_id={})",
            self.transport.remote_addr(),
            self.session.device_id()
        );

        Ok(())
    }

    /// Send a command and return the payload of the device's answer
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The connection cannot be established or is lost
    /// - The response does not belong to this request (sentinel, device id, ack)
    /// - The response checksum does not match
    /// - The device reports a non-success status
    pub async fn send_command(&mut self, command: Command, payload: impl Into<Bytes>) -> Result<Bytes> {
        let request = Request::with_payload(self.session.device_id(), command, payload);
        let frame = request.encode()?;

        self.ensure_connected().await?;

        debug!("Sending {}", request);
        self.transport.send(&frame).await?;

        let response = self.receive_response(command).await?;
        debug!("Received {}", response);

        Ok(response.into_payload()?)
    }

    /// Get device information block
    pub async fn get_information(&mut self) -> Result<Bytes> {
        self.send_command(Command::GetInfo, Bytes::new()).await
    }

    /// Write device information block
    pub async fn set_information(&mut self, data: impl Into<Bytes>) -> Result<()> {
        self.send_setting(Command::SetInfo, data.into()).await
    }

    /// Get second device information block
    pub async fn get_information_2(&mut self) -> Result<Bytes> {
        self.send_command(Command::GetInfo2, Bytes::new()).await
    }

    /// Write second device information block
    pub async fn set_information_2(&mut self, data: impl Into<Bytes>) -> Result<()> {
        self.send_setting(Command::SetInfo2, data.into()).await
    }

    /// Read the device clock
    pub async fn get_datetime(&mut self) -> Result<NaiveDateTime> {
        let payload = self.send_command(Command::GetDateTime, Bytes::new()).await?;
        Ok(datetime::decode(&payload)?)
    }

    /// Set the device clock
    pub async fn set_datetime(&mut self, dt: &NaiveDateTime) -> Result<()> {
        let payload = datetime::encode(dt)?;
        self.send_setting(Command::SetDateTime, Bytes::copy_from_slice(&payload))
            .await
    }

    /// Read the network configuration
    pub async fn get_net_params(&mut self) -> Result<NetParams> {
        let payload = self.send_command(Command::GetTcpIpParams, Bytes::new()).await?;
        Ok(NetParams::decode(&payload)?)
    }

    /// Write the network configuration
    pub async fn set_net_params(&mut self, params: &NetParams) -> Result<()> {
        let payload = params.encode();
        self.send_setting(Command::SetTcpIpParams, Bytes::copy_from_slice(&payload))
            .await
    }

    /// Read the storage counters
    pub async fn get_record_info(&mut self) -> Result<RecordInfo> {
        let payload = self.send_command(Command::GetRecordInfo, Bytes::new()).await?;
        Ok(RecordInfo::decode(&payload)?)
    }

    /// Download attendance records
    ///
    /// `args` is passed through unchanged as the command payload.
    pub async fn download_records(&mut self, args: impl Into<Bytes>) -> Result<Bytes> {
        self.send_command(Command::DownloadRecords, args).await
    }

    /// Upload attendance records
    pub async fn upload_records(&mut self, data: impl Into<Bytes>) -> Result<Bytes> {
        self.send_command(Command::UploadRecords, data).await
    }

    /// Download staff information
    ///
    /// `args` is passed through unchanged as the command payload.
    pub async fn download_staff_info(&mut self, args: impl Into<Bytes>) -> Result<Bytes> {
        self.send_command(Command::DownloadStaffInfo, args).await
    }

    /// Upload staff information
    pub async fn upload_staff_info(&mut self, data: impl Into<Bytes>) -> Result<Bytes> {
        self.send_command(Command::UploadStaffInfo, data).await
    }

    /// Read the device serial number
    pub async fn get_serial_number(&mut self) -> Result<Bytes> {
        self.send_command(Command::GetDeviceSn, Bytes::new()).await
    }

    /// Write the device serial number
    pub async fn set_serial_number(&mut self, data: impl Into<Bytes>) -> Result<()> {
        self.send_setting(Command::SetDeviceSn, data.into()).await
    }

    /// Read the device type
    pub async fn get_device_type(&mut self) -> Result<Bytes> {
        self.send_command(Command::GetDeviceType, Bytes::new()).await
    }

    /// Write the device type
    pub async fn set_device_type(&mut self, data: impl Into<Bytes>) -> Result<()> {
        self.send_setting(Command::SetDeviceType, data.into()).await
    }

    // Helper methods

    async fn send_setting(&mut self, command: Command, payload: Bytes) -> Result<()> {
        let reply = self.send_command(command, payload).await?;

        // Set commands are acknowledged with an empty payload
        if !reply.is_empty() {
            warn!("{} acknowledged with {} unexpected bytes", command, reply.len());
        }

        Ok(())
    }

    async fn receive_response(&mut self, command: Command) -> Result<Response> {
        let header = self.transport.read_exact(sizes::RESPONSE_HEADER).await?;
        let header = ResponseHeader::validate(self.session.device_id(), command, &header);

        // The rest of the frame is consumed even for a rejected header so the
        // next response starts on a frame boundary
        let length = two_bytes(&self.transport.read_exact(sizes::LENGTH).await?)?;
        let payload = self.transport.read_exact(declared_len(length)).await?;
        let checksum = two_bytes(&self.transport.read_exact(sizes::CHECKSUM).await?)?;

        Ok(header?.finish(length, payload.freeze(), checksum)?)
    }
}

fn two_bytes(buf: &[u8]) -> anviz_core::Result<[u8; 2]> {
    <[u8; 2]>::try_from(buf).map_err(|_| anviz_core::Error::FrameTooShort {
        expected: 2,
        actual: buf.len(),
    })
}
