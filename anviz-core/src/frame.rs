//! Anviz frame structure and encoding/decoding

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::{debug, trace};

use crate::{
    command::Command,
    constants::{STX, sizes},
    crc,
    error::{Error, Result},
    status::Status,
};

/// Request frame sent to the terminal
///
/// # Frame Structure
///
/// ```text
/// ┌──────┬─────────────┬─────────┬─────────────┬───────────┬───────────┐
/// │ STX  │  Device ID  │ Command │   Length    │  Payload  │   CRC16   │
/// │ 0xA5 │   4 bytes   │ 1 byte  │   2 bytes   │  N bytes  │  2 bytes  │
/// │      │  (BE u32)   │         │  (BE u16)   │           │ (LE u16)  │
/// └──────┴─────────────┴─────────┴─────────────┴───────────┴───────────┘
/// ```
///
/// The checksum covers every byte from STX to the end of the payload.
///
/// # Examples
///
/// ```
/// use anviz_core::{Command, Request};
///
/// let request = Request::new(1, Command::GetDateTime);
/// let encoded = request.encode().unwrap();
/// assert_eq!(&encoded[..], &[0xA5, 0, 0, 0, 1, 0x38, 0, 0, 0x28, 0xCA]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    /// Target device id
    pub device_id: u32,

    /// Command code
    pub command: Command,

    /// Command arguments
    pub payload: Bytes,
}

impl Request {
    /// Create a request with empty payload
    pub fn new(device_id: u32, command: Command) -> Self {
        Self {
            device_id,
            command,
            payload: Bytes::new(),
        }
    }

    /// Create a request with payload
    pub fn with_payload(device_id: u32, command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            device_id,
            command,
            payload: payload.into(),
        }
    }

    /// Encode request to bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload does not fit
    /// the 16-bit length field.
    pub fn encode(&self) -> Result<BytesMut> {
        let len = payload_len(&self.payload)?;

        let mut buf = BytesMut::with_capacity(self.size());
        buf.put_u8(STX);
        buf.put_u32(self.device_id);
        buf.put_u8(self.command.code());
        buf.put_u16(len);
        buf.put_slice(&self.payload);

        let checksum = crc::crc16(&buf);
        buf.put_slice(&checksum);

        trace!("Encoded {}: {}", self, hex::encode(&buf));

        Ok(buf)
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        sizes::REQUEST_PREFIX + sizes::LENGTH + self.payload.len() + sizes::CHECKSUM
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("device_id", &self.device_id)
            .field("command", &self.command)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request[{}](device={}, len={})",
            self.command,
            self.device_id,
            self.payload.len()
        )
    }
}

/// Validated fixed header of a response
///
/// Produced by [`ResponseHeader::validate`] once the first seven bytes of a
/// response are available; turned into a [`Response`] by
/// [`ResponseHeader::finish`] when the rest of the frame has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Responding device id
    pub device_id: u32,

    /// Command being answered
    pub command: Command,

    /// Raw status byte
    pub status: u8,

    raw: [u8; sizes::RESPONSE_HEADER],
}

impl ResponseHeader {
    /// Validate the fixed response header against the request it answers
    ///
    /// Checks the sentinel, the device id and the ack byte. The protocol
    /// does not distinguish between these failures, they all surface as
    /// [`Error::InvalidResponse`].
    pub fn validate(device_id: u32, command: Command, buf: &[u8]) -> Result<Self> {
        if buf.len() < sizes::RESPONSE_HEADER {
            return Err(Error::FrameTooShort {
                expected: sizes::RESPONSE_HEADER,
                actual: buf.len(),
            });
        }

        let mut raw = [0u8; sizes::RESPONSE_HEADER];
        raw.copy_from_slice(&buf[..sizes::RESPONSE_HEADER]);

        let mut cursor = &raw[..];
        let stx = cursor.get_u8();
        let received_id = cursor.get_u32();
        let ack = cursor.get_u8();
        let status = cursor.get_u8();

        if stx != STX || received_id != device_id || ack != command.ack() {
            debug!(
                stx = format!("0x{:02X}", stx),
                device_id = received_id,
                expected_device_id = device_id,
                ack = format!("0x{:02X}", ack),
                expected_ack = format!("0x{:02X}", command.ack()),
                "Rejected response header"
            );
            return Err(Error::InvalidResponse);
        }

        Ok(Self {
            device_id,
            command,
            status,
            raw,
        })
    }

    /// Complete the response with the bytes that follow the header
    ///
    /// `length` is the raw big-endian length field, `checksum` the raw
    /// trailer. The CRC is recomputed over header, length and payload.
    pub fn finish(self, length: [u8; 2], payload: Bytes, checksum: [u8; 2]) -> Result<Response> {
        let declared = declared_len(length);
        if declared != payload.len() {
            return Err(Error::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        let mut frame =
            BytesMut::with_capacity(sizes::RESPONSE_HEADER + sizes::LENGTH + payload.len());
        frame.put_slice(&self.raw);
        frame.put_slice(&length);
        frame.put_slice(&payload);

        let expected = crc::calculate(&frame);
        let received = u16::from_le_bytes(checksum);
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        self.into_response(payload)
    }

    fn into_response(self, payload: Bytes) -> Result<Response> {
        Ok(Response {
            device_id: self.device_id,
            command: self.command,
            status: Status::try_from(self.status)?,
            payload,
        })
    }
}

/// Decode the big-endian payload length field
pub fn declared_len(length: [u8; 2]) -> usize {
    usize::from(u16::from_be_bytes(length))
}

fn payload_len(payload: &[u8]) -> Result<u16> {
    u16::try_from(payload.len()).map_err(|_| Error::PayloadTooLarge {
        size: payload.len(),
        max: sizes::MAX_PAYLOAD,
    })
}

/// Response frame received from the terminal
///
/// # Frame Structure
///
/// ```text
/// ┌──────┬─────────────┬───────┬────────┬──────────┬───────────┬──────────┐
/// │ STX  │  Device ID  │  Ack  │ Status │  Length  │  Payload  │  CRC16   │
/// │ 0xA5 │   4 bytes   │ cmd + │ 1 byte │  2 bytes │  N bytes  │ 2 bytes  │
/// │      │  (BE u32)   │ 0x80  │        │ (BE u16) │           │ (LE u16) │
/// └──────┴─────────────┴───────┴────────┴──────────┴───────────┴──────────┘
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Response {
    /// Responding device id
    pub device_id: u32,

    /// Command being answered
    pub command: Command,

    /// Device-reported outcome
    pub status: Status,

    /// Response payload
    pub payload: Bytes,
}

impl Response {
    /// Create a response
    pub fn new(device_id: u32, command: Command, status: Status, payload: impl Into<Bytes>) -> Self {
        Self {
            device_id,
            command,
            status,
            payload: payload.into(),
        }
    }

    /// Encode response to bytes, as the terminal would send it
    pub fn encode(&self) -> Result<BytesMut> {
        let len = payload_len(&self.payload)?;

        let mut buf = BytesMut::with_capacity(self.size());
        buf.put_u8(STX);
        buf.put_u32(self.device_id);
        buf.put_u8(self.command.ack());
        buf.put_u8(self.status.into());
        buf.put_u16(len);
        buf.put_slice(&self.payload);

        let checksum = crc::crc16(&buf);
        buf.put_slice(&checksum);

        Ok(buf)
    }

    /// Decode a complete response held in memory
    ///
    /// The trailing checksum is verified before anything else, so any
    /// corruption of the frame is reported as [`Error::ChecksumMismatch`].
    ///
    /// # Examples
    ///
    /// ```
    /// use anviz_core::{Command, Response, Status};
    ///
    /// let original = Response::new(7, Command::GetRecordInfo, Status::Success, vec![0u8; 18]);
    /// let encoded = original.encode().unwrap();
    /// let decoded = Response::decode(&encoded, 7, Command::GetRecordInfo).unwrap();
    ///
    /// assert_eq!(decoded.payload.len(), 18);
    /// ```
    pub fn decode(buf: &[u8], device_id: u32, command: Command) -> Result<Self> {
        if buf.len() < sizes::MIN_RESPONSE {
            return Err(Error::FrameTooShort {
                expected: sizes::MIN_RESPONSE,
                actual: buf.len(),
            });
        }

        let (body, trailer) = buf.split_at(buf.len() - sizes::CHECKSUM);
        let expected = crc::calculate(body);
        let received = u16::from_le_bytes([trailer[0], trailer[1]]);
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        let header = ResponseHeader::validate(device_id, command, body)?;

        let (length, payload) = body[sizes::RESPONSE_HEADER..].split_at(sizes::LENGTH);
        let declared = declared_len([length[0], length[1]]);
        if declared != payload.len() {
            return Err(Error::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        header.into_response(Bytes::copy_from_slice(payload))
    }

    /// Check if the device reported success
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Take the payload, failing on a non-success status
    pub fn into_payload(self) -> Result<Bytes> {
        if !self.status.is_success() {
            return Err(Error::Device {
                command: self.command,
                status: self.status,
            });
        }
        Ok(self.payload)
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        sizes::MIN_RESPONSE + self.payload.len()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("device_id", &self.device_id)
            .field("command", &self.command)
            .field("status", &self.status)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response[{}](device={}, status={}, len={})",
            self.command,
            self.device_id,
            self.status,
            self.payload.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const DATETIME_PAYLOAD: [u8; 6] = [24, 3, 15, 10, 30, 0];

    /// Reinterpret an encoded request as the matching success response
    fn as_response(request: &[u8]) -> Vec<u8> {
        let body = &request[..request.len() - sizes::CHECKSUM];
        let mut frame = Vec::with_capacity(body.len() + 3);
        frame.extend_from_slice(&body[..5]);
        frame.push(body[5].wrapping_add(crate::constants::ACK_SUM));
        frame.push(Status::Success.into());
        frame.extend_from_slice(&body[6..]);
        let checksum = crc::crc16(&frame);
        frame.extend_from_slice(&checksum);
        frame
    }

    #[test]
    fn test_request_encode_empty() {
        let encoded = Request::new(1, Command::GetDateTime).encode().unwrap();
        assert_eq!(
            &encoded[..],
            &[0xA5, 0x00, 0x00, 0x00, 0x01, 0x38, 0x00, 0x00, 0x28, 0xCA]
        );
    }

    #[test]
    fn test_request_encode_with_payload() {
        let request = Request::with_payload(0x1234_5678, Command::SetDateTime, DATETIME_PAYLOAD.to_vec());
        let encoded = request.encode().unwrap();

        assert_eq!(encoded.len(), request.size());
        assert_eq!(
            &encoded[..],
            &[
                0xA5, 0x12, 0x34, 0x56, 0x78, 0x39, 0x00, 0x06, 0x18, 0x03, 0x0F, 0x0A, 0x1E,
                0x00, 0xC0, 0x4F
            ]
        );
    }

    #[test]
    fn test_request_payload_limits() {
        let max = Request::with_payload(1, Command::UploadRecords, vec![0u8; sizes::MAX_PAYLOAD]);
        assert_eq!(max.encode().unwrap().len(), sizes::MAX_PAYLOAD + 10);

        let over = Request::with_payload(1, Command::UploadRecords, vec![0u8; sizes::MAX_PAYLOAD + 1]);
        assert!(matches!(
            over.encode(),
            Err(Error::PayloadTooLarge { size, max }) if size == sizes::MAX_PAYLOAD + 1 && max == sizes::MAX_PAYLOAD
        ));
    }

    #[test]
    fn test_header_validate() {
        let header = ResponseHeader::validate(1, Command::GetDateTime, &[0xA5, 0, 0, 0, 1, 0xB8, 0x00])
            .unwrap();
        assert_eq!(header.device_id, 1);
        assert_eq!(header.command, Command::GetDateTime);
        assert_eq!(header.status, 0x00);
    }

    #[test]
    fn test_header_rejects_mismatches() {
        let cases: [[u8; 7]; 3] = [
            [0x5A, 0, 0, 0, 1, 0xB8, 0x00], // sentinel
            [0xA5, 0, 0, 0, 2, 0xB8, 0x00], // device id
            [0xA5, 0, 0, 0, 1, 0x38, 0x00], // ack
        ];
        for header in cases {
            assert!(matches!(
                ResponseHeader::validate(1, Command::GetDateTime, &header),
                Err(Error::InvalidResponse)
            ));
        }
    }

    #[test]
    fn test_header_too_short() {
        assert!(matches!(
            ResponseHeader::validate(1, Command::GetDateTime, &[0xA5, 0, 0]),
            Err(Error::FrameTooShort { expected: 7, actual: 3 })
        ));
    }

    #[test]
    fn test_header_finish() {
        let header = ResponseHeader::validate(1, Command::GetDateTime, &[0xA5, 0, 0, 0, 1, 0xB8, 0x00])
            .unwrap();
        let response = header
            .finish([0x00, 0x06], Bytes::from_static(&DATETIME_PAYLOAD), [0x0F, 0xD9])
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.into_payload().unwrap().as_ref(), &DATETIME_PAYLOAD);
    }

    #[test]
    fn test_header_finish_bad_checksum() {
        let header = ResponseHeader::validate(1, Command::GetDateTime, &[0xA5, 0, 0, 0, 1, 0xB8, 0x00])
            .unwrap();
        let result = header.finish([0x00, 0x06], Bytes::from_static(&DATETIME_PAYLOAD), [0xD9, 0x0F]);

        if let Err(Error::ChecksumMismatch { expected, received }) = result {
            assert_eq!(expected, 0xD90F);
            assert_eq!(received, 0x0FD9);
        } else {
            panic!("Expected ChecksumMismatch error");
        }
    }

    #[test]
    fn test_response_decode_captured() {
        let frame = [
            0xA5, 0x00, 0x00, 0x00, 0x01, 0xB8, 0x00, 0x00, 0x06, 0x18, 0x03, 0x0F, 0x0A, 0x1E,
            0x00, 0x0F, 0xD9,
        ];
        let response = Response::decode(&frame, 1, Command::GetDateTime).unwrap();

        assert_eq!(response.status, Status::Success);
        assert_eq!(response.payload.as_ref(), &DATETIME_PAYLOAD);
    }

    #[test]
    fn test_response_length_mismatch() {
        let mut frame = vec![0xA5, 0, 0, 0, 1, 0xBC, 0x00, 0x00, 0x05, 1, 2, 3];
        let checksum = crc::crc16(&frame);
        frame.extend_from_slice(&checksum);

        assert!(matches!(
            Response::decode(&frame, 1, Command::GetRecordInfo),
            Err(Error::LengthMismatch { declared: 5, actual: 3 })
        ));
    }

    #[test]
    fn test_response_status_rejected() {
        let encoded = Response::new(9, Command::DownloadStaffInfo, Status::NotFound, Bytes::new())
            .encode()
            .unwrap();
        let response = Response::decode(&encoded, 9, Command::DownloadStaffInfo).unwrap();

        assert!(!response.is_success());
        let err = response.into_payload().unwrap_err();
        assert_eq!(err.device_status(), Some(Status::NotFound));
        assert!(matches!(
            err,
            Error::Device { command: Command::DownloadStaffInfo, status: Status::NotFound }
        ));
    }

    #[test]
    fn test_response_unknown_status() {
        let mut frame = vec![0xA5, 0, 0, 0, 1, 0xB8, 0x7F, 0x00, 0x00];
        let checksum = crc::crc16(&frame);
        frame.extend_from_slice(&checksum);

        assert!(matches!(
            Response::decode(&frame, 1, Command::GetDateTime),
            Err(Error::UnknownStatus(0x7F))
        ));
    }

    #[test]
    fn test_response_too_short() {
        assert!(matches!(
            Response::decode(&[0xA5, 0, 0, 0, 1], 1, Command::GetInfo),
            Err(Error::FrameTooShort { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_request_round_trip(
            device_id in any::<u32>(),
            command in proptest::sample::select(Command::ALL.to_vec()),
            payload in proptest::collection::vec(any::<u8>(), 0..1024),
        ) {
            let request = Request::with_payload(device_id, command, payload.clone());
            let frame = as_response(&request.encode().unwrap());

            let response = Response::decode(&frame, device_id, command).unwrap();
            let decoded = response.into_payload().unwrap();
            prop_assert_eq!(decoded.as_ref(), payload.as_slice());

            // Same frame, read piecewise as the transport does
            let header = ResponseHeader::validate(device_id, command, &frame).unwrap();
            let body = &frame[sizes::RESPONSE_HEADER..];
            let length = [body[0], body[1]];
            let len = declared_len(length);
            let payload_bytes = Bytes::copy_from_slice(&body[2..2 + len]);
            let trailer = [body[2 + len], body[3 + len]];
            let response = header.finish(length, payload_bytes, trailer).unwrap();
            prop_assert_eq!(response.payload.as_ref(), payload.as_slice());
        }

        #[test]
        fn prop_response_bit_flip_is_checksum_error(
            device_id in any::<u32>(),
            command in proptest::sample::select(Command::ALL.to_vec()),
            payload in proptest::collection::vec(any::<u8>(), 0..256),
            bit in any::<proptest::sample::Index>(),
        ) {
            let mut frame = Response::new(device_id, command, Status::Success, payload)
                .encode()
                .unwrap();
            let bit = bit.index(frame.len() * 8);
            frame[bit / 8] ^= 1 << (bit % 8);

            let result = Response::decode(&frame, device_id, command);
            prop_assert!(
                matches!(result, Err(Error::ChecksumMismatch { .. })),
                "unexpected result: {:?}",
                result
            );
        }
    }
}
