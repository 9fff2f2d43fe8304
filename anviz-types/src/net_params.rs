//! TCP/IP parameter block
//!
//! 27-byte payload of the get/set TCP/IP parameters commands:
//!
//! ```text
//! offset  size  field
//!  0       4    IPv4 address
//!  4       4    subnet mask
//!  8       6    MAC address
//! 14       4    gateway
//! 18       4    server address
//! 22       1    far flag
//! 23       2    COM value (little-endian)
//! 25       1    mode
//! 26       1    DHCP enabled
//! ```
//!
//! The offsets come from captures of the vendor client and are kept as
//! they are, including the COM field directly after the far flag.

use std::fmt;
use std::net::Ipv4Addr;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, ensure_len};

/// Hardware address of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Network configuration of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetParams {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub mac: MacAddress,
    pub gateway: Ipv4Addr,
    pub server: Ipv4Addr,
    pub far: u8,
    pub com: u16,
    pub mode: u8,
    pub dhcp: u8,
}

impl NetParams {
    /// Encoded size
    pub const SIZE: usize = 27;

    /// Decode the parameter block
    pub fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len(payload, Self::SIZE)?;

        let mut mac = [0u8; 6];
        mac.copy_from_slice(&payload[8..14]);

        Ok(Self {
            ip: ipv4(&payload[0..4]),
            netmask: ipv4(&payload[4..8]),
            mac: MacAddress(mac),
            gateway: ipv4(&payload[14..18]),
            server: ipv4(&payload[18..22]),
            far: payload[22],
            com: LittleEndian::read_u16(&payload[23..25]),
            mode: payload[25],
            dhcp: payload[26],
        })
    }

    /// Encode the parameter block for the set command
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.ip.octets());
        buf[4..8].copy_from_slice(&self.netmask.octets());
        buf[8..14].copy_from_slice(&self.mac.octets());
        buf[14..18].copy_from_slice(&self.gateway.octets());
        buf[18..22].copy_from_slice(&self.server.octets());
        buf[22] = self.far;
        LittleEndian::write_u16(&mut buf[23..25], self.com);
        buf[25] = self.mode;
        buf[26] = self.dhcp;
        buf
    }

    pub fn is_dhcp_enabled(&self) -> bool {
        self.dhcp != 0
    }
}

impl fmt::Display for NetParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Net[ip: {}, mask: {}, gw: {}, mac: {}, server: {}, dhcp: {}]",
            self.ip,
            self.netmask,
            self.gateway,
            self.mac,
            self.server,
            self.is_dhcp_enabled()
        )
    }
}

fn ipv4(bytes: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
}
