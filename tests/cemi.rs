//! cEMI frames and the link-layer frames inside them.

use knxcodec::codec::{decode, encode, CodecError, Message};
use knxcodec::model::blocks::ConnectionHeader;
use knxcodec::model::knxnetip::TunnelingRequest;
use knxcodec::model::{
    AdditionalInformation, ApduData, Cemi, CemiPriority, CemiRaw, KnxAddress, KnxNetIpMessage, LBusmonInd, LData, LDataFrame, LDataFrameKind,
    LPollData, MFuncProp, MPropData, MPropWriteCon, PropertyHeader,
};

/// Standard group write frame: control 0xBC, 1.1.5 -> 1/2/3, value 1.
const EXTENDED_FRAME: [u8; 9] = [0xBC, 0xE0, 0x11, 0x05, 0x0A, 0x03, 0x01, 0x00, 0x81];

fn decode_cemi(bytes: &[u8]) -> Cemi {
    let decoded = decode::<Cemi>(bytes, bytes.len() as u16).expect("decode cEMI");
    assert_eq!(decoded.consumed, bytes.len());
    decoded.message
}

#[test]
fn test_busmonitor_ack_frame_has_no_crc() {
    // notAckFrame clear: control byte only, no checksum follows.
    let bytes = [0x2B, 0x00, 0xAC];
    let cemi = decode_cemi(&bytes);
    let Cemi::LBusmonInd(ind) = &cemi else {
        panic!("expected bus monitor indication, got {:?}", cemi);
    };
    assert!(!ind.data_frame.not_ack_frame());
    assert_eq!(ind.data_frame.kind, LDataFrameKind::Ack { polling: false });
    assert_eq!(ind.data_frame.priority, CemiPriority::Low);
    assert_eq!(ind.crc, None);
    assert_eq!(encode(&cemi).expect("encode"), bytes);
}

#[test]
fn test_busmonitor_data_frame_has_crc() {
    let mut bytes = vec![0x2B, 0x00];
    bytes.extend_from_slice(&EXTENDED_FRAME);
    bytes.push(0x5A);
    let cemi = decode_cemi(&bytes);
    let Cemi::LBusmonInd(ind) = &cemi else {
        panic!("expected bus monitor indication, got {:?}", cemi);
    };
    assert!(ind.data_frame.not_ack_frame());
    assert_eq!(ind.crc, Some(0x5A));
    assert_eq!(cemi.length_in_bytes(), bytes.len());
    assert_eq!(encode(&cemi).expect("encode"), bytes);
}

#[test]
fn test_busmonitor_crc_must_follow_frame_kind() {
    let ack = LDataFrame {
        frame_type: true,
        not_repeated: true,
        priority: CemiPriority::Low,
        acknowledge_requested: false,
        error_flag: false,
        kind: LDataFrameKind::Ack { polling: false },
    };
    let bad = Cemi::LBusmonInd(LBusmonInd {
        additional_information: Vec::new(),
        data_frame: ack,
        crc: Some(0x00),
    });
    let err = encode(&bad).expect_err("crc on an ack frame");
    assert!(matches!(err.root_cause(), CodecError::Validation(_)));
    assert!(err.field_path().contains(&"crc"));
}

#[test]
fn test_frame_discriminator_cross_product() {
    // (notAckFrame, polling) = (0, 0)
    let frame = decode::<LDataFrame>(&[0xAC], ()).expect("ack").message;
    assert_eq!(frame.kind, LDataFrameKind::Ack { polling: false });

    // (0, 1): still an acknowledgement, and the polling bit survives.
    let frame = decode::<LDataFrame>(&[0xEC], ()).expect("ack with polling").message;
    assert_eq!(frame.kind, LDataFrameKind::Ack { polling: true });
    assert!(frame.polling());
    assert_eq!(encode(&frame).expect("encode"), vec![0xEC]);

    // (1, 0)
    let frame = decode::<LDataFrame>(&EXTENDED_FRAME, ()).expect("extended").message;
    let data = frame.as_extended().expect("extended frame");
    assert_eq!(data.source_address, KnxAddress::new(1, 1, 5));
    assert_eq!(encode(&frame).expect("encode"), EXTENDED_FRAME);

    // (1, 1)
    let bytes = [0xF0, 0x11, 0x05, 0x0A, 0x03, 0x01, 0x40];
    let decoded = decode::<LDataFrame>(&bytes, ()).expect("poll data");
    assert_eq!(decoded.consumed, 7);
    let frame = decoded.message;
    assert_eq!(frame.priority, CemiPriority::System);
    assert_eq!(
        frame.kind,
        LDataFrameKind::PollData(LPollData {
            source_address: KnxAddress::new(1, 1, 5),
            target_address: [0x0A, 0x03],
            number_expected_poll_data: 5,
        })
    );
    assert_eq!(frame.length_in_bits(), 50);
    assert_eq!(encode(&frame).expect("encode"), bytes);
}

#[test]
fn test_additional_information_entries() {
    let mut bytes = vec![0x29, 0x07, 0x04, 0x02, 0x12, 0x34, 0x03, 0x01, 0x85];
    bytes.extend_from_slice(&[0xBC, 0xE0, 0x11, 0x05, 0x0A, 0x03, 0x01, 0x00, 0x80]);
    let cemi = decode_cemi(&bytes);
    let Cemi::LDataInd(ldata) = &cemi else {
        panic!("expected L_Data.ind, got {:?}", cemi);
    };
    assert_eq!(
        ldata.additional_information,
        vec![
            AdditionalInformation::RelativeTimestamp { relative_timestamp: 0x1234 },
            AdditionalInformation::BusmonitorInfo {
                frame_error_flag: true,
                bit_error_flag: false,
                parity_error_flag: false,
                unknown_flag: false,
                lost_flag: false,
                sequence_number: 5,
            },
        ]
    );
    let apdu = &ldata.data_frame.as_extended().expect("extended").apdu;
    assert!(matches!(apdu.kind, knxcodec::model::ApduKind::Data(ApduData::GroupValueWrite(ref v)) if v.data_first_byte == 0));
    assert_eq!(encode(&cemi).expect("encode"), bytes);
}

#[test]
fn test_additional_information_length_is_const() {
    // RelativeTimestamp announces 3 bytes instead of 2.
    let bytes = [0x29, 0x05, 0x04, 0x03, 0x12, 0x34, 0x00, 0xAC];
    let err = decode::<Cemi>(&bytes, bytes.len() as u16).expect_err("bad length");
    assert!(matches!(err.root_cause(), CodecError::ConstMismatch { expected: 2, actual: 3 }));
}

#[test]
fn test_unknown_message_code() {
    let err = decode::<Cemi>(&[0x99, 0x00], 2).expect_err("unmapped code");
    match err.root_cause() {
        CodecError::UnknownVariant { family, discriminator } => {
            assert_eq!(*family, "Cemi");
            assert_eq!(discriminator, "0x99");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_raw_services_keep_rest_of_frame() {
    let bytes = [0x2D, 0x00, 0xAA, 0xBB, 0xCC];
    let cemi = decode_cemi(&bytes);
    assert_eq!(
        cemi,
        Cemi::LRawInd(CemiRaw {
            additional_information: Vec::new(),
            payload: vec![0xAA, 0xBB, 0xCC],
        })
    );
    assert_eq!(encode(&cemi).expect("encode"), bytes);

    let cemi = decode_cemi(&[0xF1]);
    assert_eq!(cemi, Cemi::MResetReq);
    assert_eq!(cemi.length_in_bytes(), 1);
}

#[test]
fn test_property_services() {
    let read_con = [0xFB, 0x00, 0x0B, 0x01, 0x35, 0x10, 0x01, 0x00, 0x05];
    let cemi = decode_cemi(&read_con);
    assert_eq!(
        cemi,
        Cemi::MPropReadCon(MPropData {
            header: PropertyHeader {
                interface_object_type: 0x000B,
                object_instance: 1,
                property_id: 0x35,
                number_of_elements: 1,
                start_index: 1,
            },
            data: vec![0x00, 0x05],
        })
    );
    assert_eq!(encode(&cemi).expect("encode"), read_con);

    let func = [0xF8, 0x00, 0x0B, 0x01, 0x35, 0x01, 0x02];
    let cemi = decode_cemi(&func);
    assert_eq!(
        cemi,
        Cemi::MFuncPropCommandReq(MFuncProp {
            interface_object_type: 0x000B,
            object_instance: 1,
            property_id: 0x35,
            data: vec![0x01, 0x02],
        })
    );
    assert_eq!(encode(&cemi).expect("encode"), func);
}

#[test]
fn test_property_write_confirmation_error_code() {
    let ok = [0xF5, 0x00, 0x0B, 0x01, 0x35, 0x10, 0x01];
    let Cemi::MPropWriteCon(con) = decode_cemi(&ok) else {
        panic!("expected M_PropWrite.con");
    };
    assert_eq!(con.error_code, None);

    // Zero elements signals failure; an error code follows.
    let failed = [0xF5, 0x00, 0x0B, 0x01, 0x35, 0x00, 0x01, 0x07];
    let Cemi::MPropWriteCon(con) = decode_cemi(&failed) else {
        panic!("expected M_PropWrite.con");
    };
    assert_eq!(con.header.number_of_elements, 0);
    assert_eq!(con.error_code, Some(0x07));
    assert_eq!(encode(&Cemi::MPropWriteCon(con)).expect("encode"), failed);

    let inconsistent = MPropWriteCon {
        header: PropertyHeader {
            number_of_elements: 1,
            ..PropertyHeader::default()
        },
        error_code: Some(0x07),
    };
    assert!(encode(&Cemi::MPropWriteCon(inconsistent)).is_err());
}

#[test]
fn test_cemi_size_comes_from_enclosing_message() {
    let msg = KnxNetIpMessage::TunnelingRequest(TunnelingRequest {
        tunneling_request_data_block: ConnectionHeader {
            communication_channel_id: 2,
            sequence_counter: 0,
        },
        cemi: Cemi::LRawReq(CemiRaw {
            additional_information: Vec::new(),
            payload: vec![0xBC, 0xE0, 0x11, 0x05],
        }),
    });
    let bytes = encode(&msg).expect("encode");
    assert_eq!(bytes.len(), 6 + 4 + 2 + 4);
    let decoded = decode::<KnxNetIpMessage>(&bytes, ()).expect("decode");
    assert_eq!(decoded.message, msg);
}

fn extended_frame() -> LDataFrame {
    decode::<LDataFrame>(&EXTENDED_FRAME, ()).expect("extended frame").message
}

fn poll_data_frame() -> LDataFrame {
    LDataFrame {
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
    }
}

fn every_additional_information() -> Vec<AdditionalInformation> {
    vec![
        AdditionalInformation::PlMediumInfo { domain_address: 0x00AB },
        AdditionalInformation::BusmonitorInfo {
            frame_error_flag: false,
            bit_error_flag: true,
            parity_error_flag: false,
            unknown_flag: true,
            lost_flag: false,
            sequence_number: 6,
        },
        AdditionalInformation::RelativeTimestamp { relative_timestamp: 0x1234 },
        AdditionalInformation::TimeDelayUntilSending { delay: 0x0001_0203 },
        AdditionalInformation::ExtendedRelativeTimestamp { relative_timestamp: 0xDEAD_BEEF },
    ]
}

fn assert_cemi_round_trip(cemi: &Cemi) {
    let bytes = encode(cemi).expect("encode");
    assert_eq!(bytes.len(), cemi.length_in_bytes(), "{:?}", cemi);
    assert_eq!(cemi.length_in_bits(), bytes.len() * 8, "{:?}", cemi);
    let decoded = decode::<Cemi>(&bytes, bytes.len() as u16).expect("decode");
    assert!(decoded.diagnostics.is_empty(), "{:?}", cemi);
    assert_eq!(decoded.consumed, bytes.len());
    assert_eq!(&decoded.message, cemi);
    assert_eq!(encode(&decoded.message).expect("re-encode"), bytes);
}

#[test]
fn test_every_cemi_service_round_trips() {
    let info = every_additional_information();
    let header = PropertyHeader {
        interface_object_type: 0x000B,
        object_instance: 1,
        property_id: 0x35,
        number_of_elements: 2,
        start_index: 0x0FFF,
    };
    let ldata = LData {
        additional_information: info.clone(),
        data_frame: extended_frame(),
    };
    let raw = CemiRaw {
        additional_information: info.clone(),
        payload: vec![0x01, 0x02, 0x03],
    };
    let prop = MPropData {
        header,
        data: vec![0x00, 0x05, 0x00, 0x06],
    };
    let func = MFuncProp {
        interface_object_type: 0x0008,
        object_instance: 2,
        property_id: 0x34,
        data: vec![0x7F],
    };
    let services = vec![
        Cemi::LBusmonInd(LBusmonInd {
            additional_information: info.clone(),
            data_frame: extended_frame(),
            crc: Some(0x5A),
        }),
        Cemi::LBusmonInd(LBusmonInd {
            additional_information: Vec::new(),
            data_frame: poll_data_frame(),
            crc: Some(0xA5),
        }),
        Cemi::LDataReq(ldata.clone()),
        Cemi::LDataInd(ldata.clone()),
        Cemi::LDataCon(LData::new(poll_data_frame())),
        Cemi::LRawReq(raw.clone()),
        Cemi::LRawInd(raw.clone()),
        Cemi::LRawCon(CemiRaw::default()),
        Cemi::LPollDataReq(raw.clone()),
        Cemi::LPollDataCon(raw.clone()),
        Cemi::TDataConnectedReq(raw.clone()),
        Cemi::TDataConnectedInd(raw.clone()),
        Cemi::TDataIndividualReq(raw.clone()),
        Cemi::TDataIndividualInd(raw),
        Cemi::MPropReadReq(header),
        Cemi::MPropReadCon(prop.clone()),
        Cemi::MPropWriteReq(prop.clone()),
        Cemi::MPropWriteCon(MPropWriteCon { header, error_code: None }),
        Cemi::MPropWriteCon(MPropWriteCon {
            header: PropertyHeader {
                number_of_elements: 0,
                ..header
            },
            error_code: Some(0x07),
        }),
        Cemi::MPropInfoInd(prop),
        Cemi::MFuncPropCommandReq(func.clone()),
        Cemi::MFuncPropStateReadReq(func.clone()),
        Cemi::MFuncPropCon(func),
        Cemi::MResetReq,
        Cemi::MResetInd,
    ];
    for cemi in &services {
        assert_cemi_round_trip(cemi);
    }
}

#[test]
fn test_poll_data_frame_is_padded_to_whole_bytes() {
    let bytes = [0x11, 0x00, 0xF0, 0x11, 0x05, 0x0A, 0x03, 0x01, 0x40];
    let cemi = Cemi::LDataReq(LData::new(poll_data_frame()));
    assert_eq!(cemi.length_in_bits(), 72);
    assert_eq!(encode(&cemi).expect("encode"), bytes);
    assert_eq!(decode_cemi(&bytes), cemi);

    // Set padding bits are reported and written back as zero.
    let mut dirty = bytes;
    dirty[8] = 0x41;
    let decoded = decode::<Cemi>(&dirty, dirty.len() as u16).expect("lenient decode");
    assert_eq!(decoded.message, cemi);
    let diag = decoded.diagnostics.iter().next().expect("padding diagnostic");
    assert_eq!(diag.field, "padding");
    assert_eq!((diag.expected, diag.actual), (0x00, 0x01));
    assert_eq!(encode(&decoded.message).expect("encode"), bytes);
}

#[test]
fn test_poll_data_inside_tunneling_request_keeps_total_length() {
    let msg = KnxNetIpMessage::TunnelingRequest(TunnelingRequest {
        tunneling_request_data_block: ConnectionHeader {
            communication_channel_id: 1,
            sequence_counter: 9,
        },
        cemi: Cemi::LDataReq(LData::new(poll_data_frame())),
    });
    let bytes = encode(&msg).expect("encode");
    assert_eq!(bytes.len(), 6 + 4 + 9);
    assert_eq!(msg.length_in_bits(), bytes.len() * 8);
    assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]) as usize, bytes.len());
    assert_eq!(decode::<KnxNetIpMessage>(&bytes, ()).expect("decode").message, msg);
}

#[test]
fn test_raw_payload_longer_than_buffer_is_out_of_data() {
    // The enclosing message announces ten bytes, only three are present.
    let err = decode::<Cemi>(&[0x10, 0x00, 0xAA], 10).expect_err("overlong payload");
    assert!(matches!(err.root_cause(), CodecError::OutOfData { .. }));
    assert_eq!(err.field_path(), vec!["LRawReq", "payload"]);
}

#[test]
fn test_cemi_must_fill_its_announced_size() {
    let err = decode::<Cemi>(&[0xF1, 0x00, 0x00], 3).expect_err("trailing bytes");
    assert!(matches!(err.root_cause(), CodecError::LengthMismatch(_)));
}
