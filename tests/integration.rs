//! Integration tests: whole KNXnet/IP messages through the codec façade,
//! stream framing, and the length and leniency guarantees.

use knxcodec::codec::{decode, encode, Codec, CodecError, CodecOptions, Message};
use knxcodec::frame::{encode_compliant, message_extent};
use knxcodec::model::blocks::{ConnectionHeader, ConnectionRequestInformation, ConnectionResponseDataBlock, Hpai, ServiceId};
use knxcodec::model::knxnetip::{
    ConnectionRequest, ConnectionResponse, ConnectionStateRequest, ConnectionStateResponse, DescriptionRequest, DescriptionResponse,
    DeviceConfigurationAck, DeviceConfigurationRequest, DisconnectRequest, DisconnectResponse, SearchRequest, SearchResponse, TunnelingRequest,
    TunnelingResponse, UnknownMessage,
};
use knxcodec::model::{
    Apdu, ApduData, Cemi, CemiPriority, DibDeviceInfo, DibSuppSvcFamilies, GroupValue, KnxAddress, KnxGroupAddress, KnxLayer, KnxMedium,
    KnxNetIpMessage, LData, LDataExtended, LDataFrame, LDataFrameKind, LPollData, ConnectionAckHeader, DeviceStatus,
    ProjectInstallationIdentifier, IpAddress, MacAddress, PropertyHeader, Status,
};
use knxcodec::WireEnum;
use std::net::Ipv4Addr;

/// Tunnelling request carrying `L_Data.req`: group value write of 1 from 1.1.5 to 1/2/3.
const TUNNELING_WRITE: [u8; 21] = [
    0x06, 0x10, 0x04, 0x20, 0x00, 0x15, // header
    0x04, 0x01, 0x05, 0x00, // connection header
    0x11, 0x00, // L_Data.req, no additional information
    0xBC, 0xE0, 0x11, 0x05, 0x0A, 0x03, // control, source, destination
    0x01, 0x00, 0x81, // dataLength, APDU
];

const CONNECTION_STATE_RESPONSE: [u8; 8] = [0x06, 0x10, 0x02, 0x08, 0x00, 0x08, 0x07, 0x00];

fn hpai() -> Hpai {
    Hpai::udp(Ipv4Addr::new(192, 168, 1, 10), 3671)
}

/// Tunnelling request whose link-layer frame is a 50-bit poll data frame.
fn poll_data_tunneling_request() -> KnxNetIpMessage {
    let frame = LDataFrame {
        frame_type: true,
        not_repeated: true,
        priority: CemiPriority::System,
        acknowledge_requested: false,
        error_flag: false,
        kind: LDataFrameKind::PollData(LPollData {
            source_address: KnxAddress::new(1, 1, 5),
            target_address: [0x0A, 0x03],
            number_expected_poll_data: 5,
        }),
    };
    KnxNetIpMessage::TunnelingRequest(TunnelingRequest {
        tunneling_request_data_block: ConnectionHeader {
            communication_channel_id: 1,
            sequence_counter: 6,
        },
        cemi: Cemi::LDataReq(LData::new(frame)),
    })
}

fn device_info() -> DibDeviceInfo {
    let mut info = DibDeviceInfo {
        description_type: 0x01,
        knx_medium: KnxMedium::Tp1,
        device_status: DeviceStatus { program_mode: false },
        knx_address: KnxAddress::new(1, 1, 0),
        project_installation_identifier: ProjectInstallationIdentifier {
            project_number: 0,
            installation_number: 0,
        },
        knx_net_ip_device_serial_number: [0x00, 0xC5, 0x01, 0x02, 0x03, 0x04],
        knx_net_ip_device_multicast_address: IpAddress::from(Ipv4Addr::new(224, 0, 23, 12)),
        knx_net_ip_device_mac_address: MacAddress([0x00, 0x24, 0x6D, 0x01, 0x02, 0x03]),
        device_friendly_name: [0; 30],
    };
    info.set_friendly_name("KNX IP Router");
    info
}

#[test]
fn test_connection_state_response_leaf_is_two_bytes() {
    let leaf = ConnectionStateResponse {
        communication_channel_id: 7,
        status: Status::NoError,
    };
    assert_eq!(encode(&leaf).expect("encode"), vec![0x07, 0x00]);
    let back = decode::<ConnectionStateResponse>(&[0x07, 0x00], ()).expect("decode");
    assert_eq!(back.message, leaf);
    assert_eq!(back.consumed, 2);
}

#[test]
fn test_connection_state_response_message() {
    let codec = Codec::default();
    let decoded = codec.decode_message(&CONNECTION_STATE_RESPONSE).expect("decode");
    match &decoded.message {
        KnxNetIpMessage::ConnectionStateResponse(r) => {
            assert_eq!(r.communication_channel_id, 7);
            assert_eq!(r.status, Status::NoError);
        }
        other => panic!("unexpected variant {:?}", other),
    }
    assert!(decoded.diagnostics.is_empty());
    assert_eq!(codec.encode_message(&decoded.message).expect("encode"), CONNECTION_STATE_RESPONSE);
}

#[test]
fn test_tunneling_request_group_write() {
    let codec = Codec::default();
    let decoded = codec.decode_message(&TUNNELING_WRITE).expect("decode");
    let KnxNetIpMessage::TunnelingRequest(req) = &decoded.message else {
        panic!("expected tunnelling request, got {:?}", decoded.message);
    };
    assert_eq!(req.tunneling_request_data_block.communication_channel_id, 1);
    assert_eq!(req.tunneling_request_data_block.sequence_counter, 5);
    let Cemi::LDataReq(ldata) = &req.cemi else {
        panic!("expected L_Data.req, got {:?}", req.cemi);
    };
    assert!(ldata.additional_information.is_empty());
    let frame = ldata.data_frame.as_extended().expect("extended frame");
    assert!(frame.group_address);
    assert_eq!(frame.hop_count, 6);
    assert_eq!(frame.source_address.to_string(), "1.1.5");
    assert_eq!(
        codec.group_destination(frame).expect("levels"),
        Some(KnxGroupAddress::ThreeLevel {
            main_group: 1,
            middle_group: 2,
            sub_group: 3
        })
    );
    assert_eq!(frame.apdu.group_value(), Some(&GroupValue::new(1, Vec::new())));

    assert_eq!(codec.encode_message(&decoded.message).expect("encode"), TUNNELING_WRITE);
}

#[test]
fn test_tunneling_request_built_from_parts() {
    let apdu = Apdu::data(ApduData::GroupValueWrite(GroupValue::new(1, Vec::new())));
    let frame = LDataExtended {
        group_address: true,
        hop_count: 6,
        extended_frame_format: 0,
        source_address: KnxAddress::new(1, 1, 5),
        destination_address: KnxGroupAddress::ThreeLevel {
            main_group: 1,
            middle_group: 2,
            sub_group: 3,
        }
        .to_bytes()
        .expect("group address"),
        apdu,
    };
    let msg = KnxNetIpMessage::TunnelingRequest(TunnelingRequest {
        tunneling_request_data_block: ConnectionHeader {
            communication_channel_id: 1,
            sequence_counter: 5,
        },
        cemi: Cemi::LDataReq(LData::new(LDataFrame::extended(frame))),
    });
    let bytes = encode(&msg).expect("encode");
    assert_eq!(bytes, TUNNELING_WRITE);
    assert_eq!(msg.length_in_bytes(), bytes.len());
}

#[test]
fn test_search_request() {
    let bytes = [0x06, 0x10, 0x02, 0x01, 0x00, 0x0E, 0x08, 0x01, 0xC0, 0xA8, 0x01, 0x0A, 0x0E, 0x57];
    let decoded = Codec::default().decode_message(&bytes).expect("decode");
    assert_eq!(
        decoded.message,
        KnxNetIpMessage::SearchRequest(SearchRequest {
            hpai_ip_discovery_endpoint: hpai()
        })
    );
    assert_eq!(encode(&decoded.message).expect("encode"), bytes);
}

#[test]
fn test_connection_response_optionals_follow_status() {
    let accepted = [
        0x06, 0x10, 0x02, 0x06, 0x00, 0x14, 0x01, 0x00, 0x08, 0x01, 0xC0, 0xA8, 0x01, 0x0A, 0x0E, 0x57, 0x04, 0x04, 0x11, 0x05,
    ];
    let codec = Codec::default();
    let decoded = codec.decode_message(&accepted).expect("decode");
    let expected = ConnectionResponse::accepted(
        1,
        hpai(),
        ConnectionResponseDataBlock::TunnelConnection {
            knx_address: KnxAddress::new(1, 1, 5),
        },
    );
    assert_eq!(decoded.message, KnxNetIpMessage::ConnectionResponse(expected));
    assert_eq!(codec.encode_message(&decoded.message).expect("encode"), accepted);

    // A failure status carries neither optional block.
    let rejected = [0x06, 0x10, 0x02, 0x06, 0x00, 0x08, 0x01, 0x24];
    let decoded = codec.decode_message(&rejected).expect("decode");
    assert_eq!(
        decoded.message,
        KnxNetIpMessage::ConnectionResponse(ConnectionResponse::rejected(1, Status::NoMoreConnections))
    );
    assert_eq!(codec.encode_message(&decoded.message).expect("encode"), rejected);
}

#[test]
fn test_optional_inconsistent_with_predicate_rejected() {
    let mut bogus = ConnectionResponse::rejected(1, Status::NoMoreConnections);
    bogus.hpai_data_endpoint = Some(hpai());
    let err = encode(&KnxNetIpMessage::ConnectionResponse(bogus)).expect_err("must reject");
    assert!(matches!(err.root_cause(), CodecError::Validation(_)));
    assert!(err.field_path().contains(&"hpaiDataEndpoint"));

    let missing = ConnectionResponse {
        communication_channel_id: 1,
        status: Status::NoError,
        hpai_data_endpoint: None,
        connection_response_data_block: None,
    };
    assert!(encode(&KnxNetIpMessage::ConnectionResponse(missing)).is_err());
}

#[test]
fn test_connection_request_round_trip() {
    let msg = KnxNetIpMessage::ConnectionRequest(ConnectionRequest {
        hpai_discovery_endpoint: hpai(),
        hpai_data_endpoint: hpai(),
        connection_request_information: ConnectionRequestInformation::TunnelConnection {
            knx_layer: KnxLayer::TunnelLinkLayer,
        },
    });
    let bytes = encode(&msg).expect("encode");
    assert_eq!(bytes.len(), 6 + 8 + 8 + 4);
    assert_eq!(&bytes[4..6], &[0x00, 0x1A]);
    assert_eq!(&bytes[22..], &[0x04, 0x04, 0x02, 0x00]);
    assert_eq!(decode::<KnxNetIpMessage>(&bytes, ()).expect("decode").message, msg);
}

#[test]
fn test_description_response_round_trip() {
    let msg = KnxNetIpMessage::DescriptionResponse(DescriptionResponse {
        dib_device_info: device_info(),
        dib_supp_svc_families: DibSuppSvcFamilies {
            description_type: 0x02,
            service_ids: vec![
                ServiceId::KnxNetIpCore { version: 1 },
                ServiceId::KnxNetIpDeviceManagement { version: 1 },
                ServiceId::KnxNetIpTunneling { version: 1 },
            ],
        },
    });
    let bytes = encode(&msg).expect("encode");
    assert_eq!(bytes.len(), 6 + 54 + 8);
    assert_eq!(bytes[6], 54, "device info structure length");
    assert_eq!(bytes[60], 8, "service families structure length");
    let decoded = decode::<KnxNetIpMessage>(&bytes, ()).expect("decode");
    assert_eq!(decoded.message, msg);
    let KnxNetIpMessage::DescriptionResponse(resp) = &decoded.message else {
        panic!("wrong variant");
    };
    assert_eq!(resp.dib_device_info.friendly_name(), "KNX IP Router");
}

#[test]
fn test_device_configuration_request_with_property_read() {
    let bytes = [
        0x06, 0x10, 0x03, 0x10, 0x00, 0x11, 0x04, 0x01, 0x00, 0x00, 0xFC, 0x00, 0x0B, 0x01, 0x35, 0x10, 0x01,
    ];
    let decoded = Codec::default().decode_message(&bytes).expect("decode");
    let cemi = decoded.message.cemi().expect("carries cEMI");
    let Cemi::MPropReadReq(header) = cemi else {
        panic!("expected M_PropRead.req, got {:?}", cemi);
    };
    assert_eq!(header.interface_object_type, 0x000B);
    assert_eq!(header.property_id, 0x35);
    assert_eq!(header.number_of_elements, 1);
    assert_eq!(header.start_index, 1);
    assert_eq!(encode(&decoded.message).expect("encode"), bytes);
}

#[test]
fn test_tunneling_response_and_routing_indication() {
    let msg = KnxNetIpMessage::TunnelingResponse(TunnelingResponse {
        tunneling_response_data_block: ConnectionAckHeader {
            communication_channel_id: 1,
            sequence_counter: 5,
            status: Status::NoError,
        },
    });
    assert_eq!(
        encode(&msg).expect("encode"),
        vec![0x06, 0x10, 0x04, 0x21, 0x00, 0x0A, 0x04, 0x01, 0x05, 0x00]
    );

    let routing = [0x06, 0x10, 0x05, 0x30, 0x00, 0x06];
    let decoded = Codec::default().decode_message(&routing).expect("decode");
    assert_eq!(decoded.message, KnxNetIpMessage::RoutingIndication);
    assert_eq!(encode(&decoded.message).expect("encode"), routing);
}

#[test]
fn test_unknown_message_keeps_body() {
    let bytes = [0x06, 0x10, 0x02, 0x0B, 0x00, 0x09, 0xAA, 0xBB, 0xCC];
    let decoded = Codec::default().decode_message(&bytes).expect("decode");
    let KnxNetIpMessage::UnknownMessage(m) = &decoded.message else {
        panic!("wrong variant");
    };
    assert_eq!(m.unknown_data, vec![0xAA, 0xBB, 0xCC]);
    assert_eq!(encode(&decoded.message).expect("encode"), bytes);
}

#[test]
fn test_unmapped_msg_type_is_error() {
    let bytes = [0x06, 0x10, 0x09, 0x99, 0x00, 0x06];
    let err = Codec::default().decode_message(&bytes).expect_err("unknown type");
    match err.root_cause() {
        CodecError::UnknownVariant { family, discriminator } => {
            assert_eq!(*family, "KnxNetIpMessage");
            assert_eq!(discriminator, "0x0999");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_protocol_version_is_const() {
    let mut bytes = CONNECTION_STATE_RESPONSE;
    bytes[1] = 0x11;
    let err = Codec::default().decode_message(&bytes).expect_err("bad version");
    assert!(matches!(
        err.root_cause(),
        CodecError::ConstMismatch {
            expected: 0x10,
            actual: 0x11
        }
    ));
    assert_eq!(err.field_path(), vec!["protocolVersion"]);
}

#[test]
fn test_reserved_mismatch_is_lenient() {
    // Connection state request whose reserved byte holds 0x01.
    let bytes = [
        0x06, 0x10, 0x02, 0x07, 0x00, 0x10, 0x01, 0x01, 0x08, 0x01, 0xC0, 0xA8, 0x01, 0x0A, 0x0E, 0x57,
    ];
    let decoded = Codec::default().decode_message(&bytes).expect("lenient decode");
    let KnxNetIpMessage::ConnectionStateRequest(req) = &decoded.message else {
        panic!("wrong variant");
    };
    assert_eq!(req.communication_channel_id, 1);
    assert_eq!(req.hpai_control_endpoint, hpai());
    assert_eq!(decoded.diagnostics.len(), 1);
    let diag = decoded.diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(diag.field, "reserved");
    assert_eq!(diag.bit_position, 56);
    assert_eq!((diag.expected, diag.actual), (0x00, 0x01));

    // Re-serializing writes the documented constant.
    let mut fixed = bytes;
    fixed[7] = 0x00;
    assert_eq!(encode(&decoded.message).expect("encode"), fixed);
}

#[test]
fn test_out_of_data_reports_field_path() {
    let truncated = &TUNNELING_WRITE[..19];
    let err = decode::<KnxNetIpMessage>(truncated, ()).expect_err("truncated");
    assert!(matches!(err.root_cause(), CodecError::OutOfData { .. }));
    let path = err.field_path();
    assert_eq!(path.first(), Some(&"TunnelingRequest"));
    assert!(path.contains(&"cemi"));
}

#[test]
fn test_total_length_must_match_body() {
    let bytes = [0x06, 0x10, 0x02, 0x08, 0x00, 0x09, 0x07, 0x00, 0xFF];
    let err = Codec::default().decode_message(&bytes).expect_err("length mismatch");
    assert!(matches!(err, CodecError::LengthMismatch(_)));
}

#[test]
fn test_message_extent() {
    assert_eq!(message_extent(&TUNNELING_WRITE).expect("extent"), 21);
    assert!(matches!(message_extent(&[0x06, 0x10, 0x02]), Err(CodecError::OutOfData { .. })));
    assert!(matches!(
        message_extent(&[0x06, 0x10, 0x02, 0x08, 0x00, 0x03]),
        Err(CodecError::LengthMismatch(_))
    ));
    assert!(matches!(
        message_extent(&TUNNELING_WRITE[..20]),
        Err(CodecError::OutOfData { .. })
    ));
}

#[test]
fn test_decode_frame_skips_bad_messages() {
    let mut stream = Vec::new();
    stream.extend_from_slice(&CONNECTION_STATE_RESPONSE);
    stream.extend_from_slice(&[0x06, 0x10, 0x09, 0x99, 0x00, 0x08, 0x00, 0x00]);
    stream.extend_from_slice(&TUNNELING_WRITE);
    stream.extend_from_slice(&[0x06, 0x10]);

    let codec = Codec::default();
    let result = codec.decode_frame(&stream);
    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[0].byte_range, (0, 8));
    assert_eq!(result.messages[1].byte_range, (16, 37));
    assert_eq!(result.removed.len(), 1);
    assert_eq!(result.removed[0].byte_range, (8, 16));
    assert!(result.removed[0].reason.contains("KnxNetIpMessage"));
    let trailing = result.trailing.as_ref().expect("two stray bytes");
    assert_eq!(trailing.byte_range, (37, 39));

    let mut compliant = CONNECTION_STATE_RESPONSE.to_vec();
    compliant.extend_from_slice(&TUNNELING_WRITE);
    assert_eq!(encode_compliant(&codec, &result).expect("encode"), compliant);
}

#[test]
fn test_max_message_len_enforced() {
    let codec = Codec::new(CodecOptions {
        max_message_len: 10,
        ..CodecOptions::default()
    });
    assert!(codec.decode_message(&CONNECTION_STATE_RESPONSE).is_ok());
    let err = codec.decode_message(&TUNNELING_WRITE).expect_err("too long");
    assert!(matches!(err, CodecError::LengthMismatch(_)));

    let decoded = Codec::default().decode_message(&TUNNELING_WRITE).expect("decode");
    assert!(matches!(codec.encode_message(&decoded.message), Err(CodecError::Validation(_))));
}

#[test]
fn test_group_destination_levels() {
    let decoded = Codec::default().decode_message(&TUNNELING_WRITE).expect("decode");
    let frame = decoded
        .message
        .cemi()
        .and_then(Cemi::data_frame)
        .and_then(LDataFrame::as_extended)
        .expect("extended frame")
        .clone();

    let two = Codec::new(CodecOptions {
        group_address_levels: 2,
        ..CodecOptions::default()
    });
    assert_eq!(two.group_destination(&frame).expect("two levels").map(|g| g.to_string()), Some("1/515".to_string()));
    let free = Codec::new(CodecOptions {
        group_address_levels: 1,
        ..CodecOptions::default()
    });
    assert_eq!(free.group_destination(&frame).expect("free").map(|g| g.to_string()), Some("2563".to_string()));
    let bad = Codec::new(CodecOptions {
        group_address_levels: 4,
        ..CodecOptions::default()
    });
    assert!(matches!(
        bad.group_destination(&frame).map_err(|e| e.root_cause().to_string()),
        Err(ref s) if s.contains("KnxGroupAddress")
    ));

    let mut individual = frame;
    individual.group_address = false;
    assert_eq!(Codec::default().group_destination(&individual).expect("none"), None);
    assert_eq!(individual.destination_individual_address(), KnxAddress::new(0, 10, 3));
}

#[test]
fn test_length_in_bytes_matches_encoding() {
    let messages = vec![
        KnxNetIpMessage::ConnectionStateResponse(ConnectionStateResponse {
            communication_channel_id: 3,
            status: Status::Unknown(0x7F),
        }),
        KnxNetIpMessage::SearchRequest(SearchRequest {
            hpai_ip_discovery_endpoint: hpai(),
        }),
        KnxNetIpMessage::ConnectionResponse(ConnectionResponse::rejected(9, Status::ConnectionTypeNotSupported)),
        KnxNetIpMessage::RoutingIndication,
        poll_data_tunneling_request(),
    ];
    for msg in messages {
        let bytes = encode(&msg).expect("encode");
        assert_eq!(bytes.len(), msg.length_in_bytes(), "{:?}", msg);
        assert_eq!(msg.length_in_bytes() * 8, msg.length_in_bits());
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]) as usize, bytes.len());
    }
}

#[test]
fn test_every_message_type_round_trips() {
    let families = DibSuppSvcFamilies {
        description_type: 0x02,
        service_ids: vec![
            ServiceId::KnxNetIpCore { version: 1 },
            ServiceId::KnxNetIpDeviceManagement { version: 1 },
            ServiceId::KnxNetIpTunneling { version: 2 },
            ServiceId::KnxNetIpRouting { version: 1 },
            ServiceId::KnxNetRemoteLogging { version: 1 },
            ServiceId::KnxNetRemoteConfigurationAndDiagnosis { version: 1 },
            ServiceId::KnxNetObjectServer { version: 1 },
        ],
    };
    let connection = ConnectionHeader {
        communication_channel_id: 4,
        sequence_counter: 0xFE,
    };
    let ack = ConnectionAckHeader {
        communication_channel_id: 4,
        sequence_counter: 0xFE,
        status: Status::OutOfOrderSequenceNumber,
    };
    let messages = vec![
        KnxNetIpMessage::SearchRequest(SearchRequest {
            hpai_ip_discovery_endpoint: hpai(),
        }),
        KnxNetIpMessage::SearchResponse(SearchResponse {
            hpai_control_endpoint: hpai(),
            dib_device_info: device_info(),
            dib_supp_svc_families: families.clone(),
        }),
        KnxNetIpMessage::DescriptionRequest(DescriptionRequest {
            hpai_control_endpoint: hpai(),
        }),
        KnxNetIpMessage::DescriptionResponse(DescriptionResponse {
            dib_device_info: device_info(),
            dib_supp_svc_families: families,
        }),
        KnxNetIpMessage::ConnectionRequest(ConnectionRequest {
            hpai_discovery_endpoint: hpai(),
            hpai_data_endpoint: hpai(),
            connection_request_information: ConnectionRequestInformation::TunnelConnection {
                knx_layer: KnxLayer::TunnelBusmonitor,
            },
        }),
        KnxNetIpMessage::ConnectionRequest(ConnectionRequest {
            hpai_discovery_endpoint: hpai(),
            hpai_data_endpoint: hpai(),
            connection_request_information: ConnectionRequestInformation::DeviceManagement,
        }),
        KnxNetIpMessage::ConnectionResponse(ConnectionResponse::accepted(
            2,
            hpai(),
            ConnectionResponseDataBlock::TunnelConnection {
                knx_address: KnxAddress::new(1, 1, 250),
            },
        )),
        KnxNetIpMessage::ConnectionResponse(ConnectionResponse::accepted(2, hpai(), ConnectionResponseDataBlock::DeviceManagement)),
        KnxNetIpMessage::ConnectionResponse(ConnectionResponse::rejected(2, Status::NoMoreUniqueConnections)),
        KnxNetIpMessage::ConnectionStateRequest(ConnectionStateRequest {
            communication_channel_id: 2,
            hpai_control_endpoint: hpai(),
        }),
        KnxNetIpMessage::ConnectionStateResponse(ConnectionStateResponse {
            communication_channel_id: 2,
            status: Status::DataConnection,
        }),
        KnxNetIpMessage::DisconnectRequest(DisconnectRequest {
            communication_channel_id: 2,
            hpai_control_endpoint: hpai(),
        }),
        KnxNetIpMessage::DisconnectResponse(DisconnectResponse {
            communication_channel_id: 2,
            status: Status::NoError,
        }),
        KnxNetIpMessage::UnknownMessage(UnknownMessage {
            unknown_data: vec![0x01, 0x02],
        }),
        KnxNetIpMessage::DeviceConfigurationRequest(DeviceConfigurationRequest {
            device_configuration_request_data_block: connection,
            cemi: Cemi::MPropReadReq(PropertyHeader {
                interface_object_type: 0x000B,
                object_instance: 1,
                property_id: 0x35,
                number_of_elements: 1,
                start_index: 1,
            }),
        }),
        KnxNetIpMessage::DeviceConfigurationAck(DeviceConfigurationAck {
            device_configuration_ack_data_block: ack,
        }),
        KnxNetIpMessage::TunnelingRequest(TunnelingRequest {
            tunneling_request_data_block: connection,
            cemi: Cemi::MResetInd,
        }),
        poll_data_tunneling_request(),
        KnxNetIpMessage::TunnelingResponse(TunnelingResponse {
            tunneling_response_data_block: ack,
        }),
        KnxNetIpMessage::RoutingIndication,
    ];
    let codec = Codec::default();
    for msg in &messages {
        let bytes = codec.encode_message(msg).expect("encode");
        assert_eq!(bytes.len(), msg.length_in_bytes(), "{:?}", msg);
        assert_eq!(msg.length_in_bits(), bytes.len() * 8, "{:?}", msg);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), msg.msg_type());
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]) as usize, bytes.len());
        let decoded = codec.decode_message(&bytes).expect("decode");
        assert!(decoded.diagnostics.is_empty(), "{:?}", msg);
        assert_eq!(decoded.consumed, bytes.len());
        assert_eq!(&decoded.message, msg);
        assert_eq!(codec.encode_message(&decoded.message).expect("re-encode"), bytes);
    }
}

#[test]
fn test_unknown_status_shadowing_a_named_value_is_refused() {
    assert_eq!(Status::Unknown(0x00).canonical(), Status::NoError);
    assert_eq!(Status::Unknown(0x7F).canonical(), Status::Unknown(0x7F));

    let shadow = KnxNetIpMessage::ConnectionStateResponse(ConnectionStateResponse {
        communication_channel_id: 3,
        status: Status::Unknown(0x00),
    });
    let err = encode(&shadow).expect_err("unknown wrapping NO_ERROR");
    assert!(matches!(err.root_cause(), CodecError::Validation(_)));
    assert_eq!(err.field_path(), vec!["ConnectionStateResponse", "status"]);

    // Without the check this would encode NO_ERROR with no data blocks.
    let shadow = KnxNetIpMessage::ConnectionResponse(ConnectionResponse::rejected(9, Status::Unknown(0x00)));
    let err = encode(&shadow).expect_err("unknown wrapping NO_ERROR");
    assert_eq!(err.field_path(), vec!["ConnectionResponse", "status"]);

    // A value with no name still encodes and comes back unchanged.
    let genuine = KnxNetIpMessage::ConnectionResponse(ConnectionResponse::rejected(9, Status::Unknown(0x7F)));
    let bytes = encode(&genuine).expect("encode");
    assert_eq!(bytes, vec![0x06, 0x10, 0x02, 0x06, 0x00, 0x08, 0x09, 0x7F]);
    assert_eq!(decode::<KnxNetIpMessage>(&bytes, ()).expect("decode").message, genuine);
}

#[test]
fn test_header_length_must_be_six() {
    let mut bytes = CONNECTION_STATE_RESPONSE;
    bytes[0] = 0x07;
    let err = Codec::default().decode_message(&bytes).expect_err("bad header length");
    assert!(matches!(err.root_cause(), CodecError::LengthMismatch(_)));
    assert_eq!(err.field_path(), vec!["headerLength"]);
}

#[test]
fn test_decoded_messages_re_encode_to_their_bytes() {
    let samples: [&[u8]; 6] = [
        &CONNECTION_STATE_RESPONSE,
        &TUNNELING_WRITE,
        &[0x06, 0x10, 0x02, 0x01, 0x00, 0x0E, 0x08, 0x01, 0xC0, 0xA8, 0x01, 0x0A, 0x0E, 0x57],
        &[0x06, 0x10, 0x02, 0x0B, 0x00, 0x09, 0xAA, 0xBB, 0xCC],
        &[0x06, 0x10, 0x04, 0x20, 0x00, 0x13, 0x04, 0x01, 0x06, 0x00, 0x11, 0x00, 0xF0, 0x11, 0x05, 0x0A, 0x03, 0x01, 0x40],
        // Reserved byte set: re-encodes to a different but equivalent message.
        &[0x06, 0x10, 0x02, 0x07, 0x00, 0x10, 0x01, 0x01, 0x08, 0x01, 0xC0, 0xA8, 0x01, 0x0A, 0x0E, 0x57],
    ];
    let codec = Codec::default();
    for data in samples {
        let decoded = codec.decode_message(data).expect("decode");
        let bytes = codec.encode_message(&decoded.message).expect("re-encode");
        assert_eq!(bytes.len(), decoded.message.length_in_bytes());
        if decoded.diagnostics.is_empty() {
            assert_eq!(bytes, &data[..decoded.consumed]);
        } else {
            let again = codec.decode_message(&bytes).expect("decode again");
            assert!(again.diagnostics.is_empty());
            assert_eq!(again.message, decoded.message);
        }
    }
}
