//! Replay of captured KNXnet/IP traffic.
//!
//! Reads legacy pcap and pcapng captures with `pcap-parser`, keeps the UDP
//! datagrams to or from the KNXnet/IP port and runs each one through
//! [`Codec::decode_frame`].

use crate::codec::Codec;
use crate::frame::FrameDecodeResult;
use pcap_parser::pcapng::Block as PcapNgBlock;
use pcap_parser::traits::{PcapNGPacketBlock, PcapReaderIterator};
use pcap_parser::{Linktype, PcapBlockOwned, PcapError};
use std::io::{Cursor, Read};
use tracing::{debug, info};

pub const KNXNET_IP_PORT: u16 = 3671;

const READER_CAPACITY: usize = 1 << 16;
const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture format error: {0}")]
    Pcap(String),
}

/// UDP payload of one captured KNXnet/IP datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPayload {
    /// 1-based index of the packet in the capture.
    pub packet_index: u64,
    pub src_port: u16,
    pub dst_port: u16,
    pub payload: Vec<u8>,
}

#[derive(Debug)]
pub struct PayloadReport {
    pub packet_index: u64,
    pub result: FrameDecodeResult,
}

#[derive(Debug, Default)]
pub struct CaptureReport {
    /// Packets seen in the capture, KNX or not.
    pub packets: u64,
    pub payloads: Vec<PayloadReport>,
}

impl CaptureReport {
    pub fn decoded_count(&self) -> usize {
        self.payloads.iter().map(|p| p.result.messages.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.payloads
            .iter()
            .map(|p| p.result.removed.len() + p.result.trailing.iter().count())
            .sum()
    }
}

/// Extract every KNXnet/IP UDP payload from a pcap or pcapng capture.
/// Returns the payloads and the total packet count.
pub fn read_knx_payloads<R: Read>(mut reader: R) -> Result<(Vec<CapturedPayload>, u64), CaptureError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    let input = Cursor::new(magic).chain(reader);
    let mut sink = PayloadSink::default();
    if magic == PCAPNG_MAGIC {
        read_pcapng(input, &mut sink)?;
    } else {
        read_legacy_pcap(input, &mut sink)?;
    }
    Ok((sink.payloads, sink.packets))
}

/// Decode every KNXnet/IP payload of a capture through `codec`.
pub fn replay_capture<R: Read>(codec: &Codec, reader: R) -> Result<CaptureReport, CaptureError> {
    let (payloads, packets) = read_knx_payloads(reader)?;
    let mut report = CaptureReport {
        packets,
        payloads: Vec::with_capacity(payloads.len()),
    };
    for captured in payloads {
        let result = codec.decode_frame(&captured.payload);
        if !result.removed.is_empty() || result.trailing.is_some() {
            debug!(
                packet = captured.packet_index,
                removed = result.removed.len(),
                trailing = result.trailing.is_some(),
                "payload did not fully decode"
            );
        }
        report.payloads.push(PayloadReport {
            packet_index: captured.packet_index,
            result,
        });
    }
    info!(
        packets = report.packets,
        payloads = report.payloads.len(),
        decoded = report.decoded_count(),
        failed = report.failed_count(),
        "capture replayed"
    );
    Ok(report)
}

#[derive(Default)]
struct PayloadSink {
    packets: u64,
    payloads: Vec<CapturedPayload>,
}

impl PayloadSink {
    fn packet(&mut self, linktype: Linktype, frame: &[u8]) {
        self.packets += 1;
        if let Some((src_port, dst_port, payload)) = udp_from_linktype(linktype, frame) {
            if src_port == KNXNET_IP_PORT || dst_port == KNXNET_IP_PORT {
                self.payloads.push(CapturedPayload {
                    packet_index: self.packets,
                    src_port,
                    dst_port,
                    payload: payload.to_vec(),
                });
            }
        }
    }
}

fn pcap_error<I: std::fmt::Debug>(context: &str, e: PcapError<I>) -> CaptureError {
    CaptureError::Pcap(format!("{}: {:?}", context, e))
}

fn read_legacy_pcap<R: Read>(input: R, sink: &mut PayloadSink) -> Result<(), CaptureError> {
    let mut reader = pcap_parser::pcap::LegacyPcapReader::new(READER_CAPACITY, input).map_err(|e| pcap_error("pcap header", e))?;
    let mut linktype = Linktype(1);
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                match block {
                    PcapBlockOwned::LegacyHeader(h) => linktype = h.network,
                    PcapBlockOwned::Legacy(b) => sink.packet(linktype, b.data),
                    PcapBlockOwned::NG(_) => {}
                }
                reader.consume(offset);
            }
            Err(PcapError::Eof) => break,
            Err(PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| pcap_error("pcap refill", e))?;
            }
            Err(e) => return Err(pcap_error("pcap read", e)),
        }
    }
    Ok(())
}

fn read_pcapng<R: Read>(input: R, sink: &mut PayloadSink) -> Result<(), CaptureError> {
    let mut reader = pcap_parser::pcapng::PcapNGReader::new(READER_CAPACITY, input).map_err(|e| pcap_error("pcapng header", e))?;
    let mut if_linktypes: Vec<Linktype> = Vec::new();
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                if let PcapBlockOwned::NG(b) = block {
                    match &b {
                        PcapNgBlock::SectionHeader(_) => if_linktypes.clear(),
                        PcapNgBlock::InterfaceDescription(idb) => if_linktypes.push(idb.linktype),
                        PcapNgBlock::EnhancedPacket(epb) => {
                            let lt = if_linktypes.get(epb.if_id as usize).copied().unwrap_or(Linktype(1));
                            sink.packet(lt, epb.packet_data());
                        }
                        PcapNgBlock::SimplePacket(spb) => {
                            let lt = if_linktypes.first().copied().unwrap_or(Linktype(1));
                            sink.packet(lt, spb.packet_data());
                        }
                        _ => {}
                    }
                }
                reader.consume(offset);
            }
            Err(PcapError::Eof) => break,
            Err(PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| pcap_error("pcapng refill", e))?;
            }
            Err(e) => return Err(pcap_error("pcapng read", e)),
        }
    }
    Ok(())
}

/// Ports and payload of the UDP datagram in `frame`, bounded by the IPv4
/// and UDP length fields so Ethernet padding is not included.
fn udp_from_linktype(linktype: Linktype, frame: &[u8]) -> Option<(u16, u16, &[u8])> {
    let l3 = match linktype.0 {
        1 => ethernet_l3(frame)?,      // DLT_EN10MB
        101 | 228 => frame,            // DLT_RAW, DLT_IPV4
        113 => linux_sll_l3(frame)?,   // DLT_LINUX_SLL
        _ => return None,
    };
    ipv4_udp(l3)
}

fn ethernet_l3(frame: &[u8]) -> Option<&[u8]> {
    if frame.len() < 14 {
        return None;
    }
    let mut off = 12usize;
    let mut ethertype = u16::from_be_bytes([frame[off], frame[off + 1]]);
    off += 2;
    // 802.1Q / 802.1ad tags
    while ethertype == 0x8100 || ethertype == 0x88a8 {
        if frame.len() < off + 4 {
            return None;
        }
        ethertype = u16::from_be_bytes([frame[off + 2], frame[off + 3]]);
        off += 4;
    }
    match ethertype {
        0x0800 => Some(&frame[off..]),
        _ => None,
    }
}

fn linux_sll_l3(frame: &[u8]) -> Option<&[u8]> {
    if frame.len() < 16 {
        return None;
    }
    match u16::from_be_bytes([frame[14], frame[15]]) {
        0x0800 => Some(&frame[16..]),
        _ => None,
    }
}

fn ipv4_udp(l3: &[u8]) -> Option<(u16, u16, &[u8])> {
    if l3.len() < 20 || l3[0] >> 4 != 4 {
        return None;
    }
    let ihl = (l3[0] & 0x0f) as usize * 4;
    let total_len = u16::from_be_bytes([l3[2], l3[3]]) as usize;
    if ihl < 20 || total_len < ihl + 8 || l3[9] != 17 {
        return None;
    }
    let l3 = if total_len <= l3.len() { &l3[..total_len] } else { l3 };
    let udp = l3.get(ihl..)?;
    if udp.len() < 8 {
        return None;
    }
    let src_port = u16::from_be_bytes([udp[0], udp[1]]);
    let dst_port = u16::from_be_bytes([udp[2], udp[3]]);
    let udp_len = u16::from_be_bytes([udp[4], udp[5]]) as usize;
    if udp_len < 8 || udp.len() < udp_len {
        return None;
    }
    Some((src_port, dst_port, &udp[8..udp_len]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ipv4_udp_packet(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
        let udp_len = 8 + payload.len();
        let total = 20 + udp_len;
        let mut p = vec![0x45, 0, (total >> 8) as u8, total as u8, 0, 0, 0, 0, 64, 17, 0, 0, 192, 168, 1, 10, 192, 168, 1, 20];
        p.extend_from_slice(&src_port.to_be_bytes());
        p.extend_from_slice(&dst_port.to_be_bytes());
        p.extend_from_slice(&(udp_len as u16).to_be_bytes());
        p.extend_from_slice(&[0, 0]);
        p.extend_from_slice(payload);
        p
    }

    #[test]
    fn test_ethernet_padding_excluded() {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&[0x08, 0x00]);
        frame.extend(ipv4_udp_packet(50000, KNXNET_IP_PORT, &[1, 2, 3]));
        frame.extend_from_slice(&[0xEE; 10]);
        let (src, dst, payload) = udp_from_linktype(Linktype(1), &frame).expect("udp");
        assert_eq!((src, dst), (50000, KNXNET_IP_PORT));
        assert_eq!(payload, &[1, 2, 3]);
    }

    #[test]
    fn test_vlan_tag_skipped() {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&[0x81, 0x00, 0x00, 0x05, 0x08, 0x00]);
        frame.extend(ipv4_udp_packet(KNXNET_IP_PORT, KNXNET_IP_PORT, &[9]));
        let (_, _, payload) = udp_from_linktype(Linktype(1), &frame).expect("udp");
        assert_eq!(payload, &[9]);
    }

    #[test]
    fn test_non_udp_ignored() {
        let mut packet = ipv4_udp_packet(1, 2, &[0]);
        packet[9] = 6;
        assert!(udp_from_linktype(Linktype(101), &packet).is_none());
    }
}
