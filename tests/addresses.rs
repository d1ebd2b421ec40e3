//! Individual and group address notation and wire layout.

use knxcodec::codec::{decode, encode};
use knxcodec::model::{KnxAddress, KnxGroupAddress};
use knxcodec::AddressParseError;

#[test]
fn test_individual_address_text() {
    let addr: KnxAddress = "1.1.5".parse().expect("parse");
    assert_eq!(addr, KnxAddress::new(1, 1, 5));
    assert_eq!(addr.to_string(), "1.1.5");
    assert_eq!(addr.to_raw(), 0x1105);
    assert_eq!(KnxAddress::from_raw(0xF0FF), KnxAddress::new(15, 0, 255));
    assert_eq!(" 15.15.255 ".parse::<KnxAddress>().expect("trimmed"), KnxAddress::new(15, 15, 255));
}

#[test]
fn test_individual_address_errors() {
    assert!(matches!("1.1".parse::<KnxAddress>(), Err(AddressParseError::Syntax(_))));
    assert!(matches!("1.a.5".parse::<KnxAddress>(), Err(AddressParseError::Syntax(_))));
    assert_eq!(
        "16.1.5".parse::<KnxAddress>(),
        Err(AddressParseError::OutOfRange {
            part: "area",
            value: 16,
            max: 15
        })
    );
    assert!(matches!(
        "1.1.99999999999999999999999".parse::<KnxAddress>(),
        Err(AddressParseError::OutOfRange { part: "device", .. })
    ));
}

#[test]
fn test_individual_address_wire() {
    let addr = KnxAddress::new(1, 1, 5);
    assert_eq!(encode(&addr).expect("encode"), vec![0x11, 0x05]);
    assert_eq!(decode::<KnxAddress>(&[0x11, 0x05], ()).expect("decode").message, addr);
}

#[test]
fn test_group_address_forms() {
    let three: KnxGroupAddress = "1/2/3".parse().expect("three levels");
    assert_eq!(
        three,
        KnxGroupAddress::ThreeLevel {
            main_group: 1,
            middle_group: 2,
            sub_group: 3
        }
    );
    assert_eq!(three.num_levels(), 3);
    assert_eq!(three.to_bytes().expect("bytes"), [0x0A, 0x03]);

    let two: KnxGroupAddress = "1/515".parse().expect("two levels");
    assert_eq!(two.num_levels(), 2);
    assert_eq!(two.to_bytes().expect("bytes"), [0x0A, 0x03]);

    let free: KnxGroupAddress = "2563".parse().expect("free level");
    assert_eq!(free, KnxGroupAddress::FreeLevel { sub_group: 2563 });
    assert_eq!(free.to_bytes().expect("bytes"), [0x0A, 0x03]);

    for text in ["31/7/255", "31/2047", "65535"] {
        let parsed: KnxGroupAddress = text.parse().expect("parse");
        assert_eq!(parsed.to_string(), text);
    }
}

#[test]
fn test_group_address_levels_from_wire() {
    let bytes = [0x0A, 0x03];
    assert_eq!(KnxGroupAddress::from_bytes(bytes, 3).expect("3").to_string(), "1/2/3");
    assert_eq!(KnxGroupAddress::from_bytes(bytes, 2).expect("2").to_string(), "1/515");
    assert_eq!(KnxGroupAddress::from_bytes(bytes, 1).expect("1").to_string(), "2563");
    assert!(KnxGroupAddress::from_bytes(bytes, 0).is_err());
    assert_eq!(decode::<KnxGroupAddress>(&bytes, 3).expect("decode").consumed, 2);
}

#[test]
fn test_group_address_ranges() {
    assert!(matches!(
        "32/0/0".parse::<KnxGroupAddress>(),
        Err(AddressParseError::OutOfRange { part: "main group", .. })
    ));
    assert!(matches!(
        "1/8/0".parse::<KnxGroupAddress>(),
        Err(AddressParseError::OutOfRange { part: "middle group", .. })
    ));
    assert!(matches!(
        "1/2048".parse::<KnxGroupAddress>(),
        Err(AddressParseError::OutOfRange { part: "sub group", .. })
    ));
    assert!("1//2".parse::<KnxGroupAddress>().is_err());

    let bad = KnxGroupAddress::ThreeLevel {
        main_group: 1,
        middle_group: 9,
        sub_group: 0,
    };
    let err = encode(&bad).expect_err("middle group is three bits");
    assert_eq!(err.field_path(), vec!["middleGroup"]);
}
