//! Protocol enumerations and their attribute tables.

use crate::enumeration::{wire_enum, WireEnum};

wire_enum! {
    /// Result code carried by KNXnet/IP responses.
    pub enum Status: u8, width 8 {
        NoError = 0x00 => "NO_ERROR",
        ProtocolTypeNotSupported = 0x01 => "PROTOCOL_TYPE_NOT_SUPPORTED",
        UnsupportedProtocolVersion = 0x02 => "UNSUPPORTED_PROTOCOL_VERSION",
        OutOfOrderSequenceNumber = 0x04 => "OUT_OF_ORDER_SEQUENCE_NUMBER",
        InvalidConnectionId = 0x21 => "INVALID_CONNECTION_ID",
        ConnectionTypeNotSupported = 0x22 => "CONNECTION_TYPE_NOT_SUPPORTED",
        ConnectionOptionNotSupported = 0x23 => "CONNECTION_OPTION_NOT_SUPPORTED",
        NoMoreConnections = 0x24 => "NO_MORE_CONNECTIONS",
        NoMoreUniqueConnections = 0x25 => "NO_MORE_UNIQUE_CONNECTIONS",
        DataConnection = 0x26 => "DATA_CONNECTION",
        KnxConnection = 0x27 => "KNX_CONNECTION",
        TunnellingLayerNotSupported = 0x29 => "TUNNELLING_LAYER_NOT_SUPPORTED",
    }
}

wire_enum! {
    pub enum HostProtocolCode: u8, width 8 {
        Ipv4Udp = 0x01 => "IPV4_UDP",
        Ipv4Tcp = 0x02 => "IPV4_TCP",
    }
}

wire_enum! {
    pub enum KnxMedium: u8, width 8 {
        Reserved1 = 0x01 => "MEDIUM_RESERVED_1",
        Tp1 = 0x02 => "MEDIUM_TP1",
        Pl110 = 0x04 => "MEDIUM_PL110",
        Reserved2 = 0x08 => "MEDIUM_RESERVED_2",
        Rf = 0x10 => "MEDIUM_RF",
        KnxIp = 0x20 => "MEDIUM_KNX_IP",
    }
}

wire_enum! {
    /// Layer requested for a tunnelling connection.
    pub enum KnxLayer: u8, width 8 {
        TunnelLinkLayer = 0x02 => "TUNNEL_LINK_LAYER",
        TunnelRaw = 0x04 => "TUNNEL_RAW",
        TunnelBusmonitor = 0x80 => "TUNNEL_BUSMONITOR",
    }
}

wire_enum! {
    /// Frame priority. All four 2-bit values are named, so a wire read never yields `Unknown`.
    pub enum CemiPriority: u8, width 2 {
        System = 0x0 => "SYSTEM",
        Normal = 0x1 => "NORMAL",
        Urgent = 0x2 => "URGENT",
        Low = 0x3 => "LOW",
    }
}

wire_enum! {
    pub enum AccessLevel: u8, width 4 {
        Level0 = 0x0 => "Level0",
        Level1 = 0x1 => "Level1",
        Level2 = 0x2 => "Level2",
        Level3 = 0x3 => "Level3",
        Level15 = 0xF => "Level15",
    }
}

impl AccessLevel {
    pub fn purpose(self) -> &'static str {
        match self {
            AccessLevel::Level0 => "system manufacturer",
            AccessLevel::Level1 => "manufacturer",
            AccessLevel::Level2 => "end-user",
            AccessLevel::Level3 => "read access",
            AccessLevel::Level15 => "free access",
            AccessLevel::Unknown(_) => "",
        }
    }

    pub fn needs_authentication(self) -> bool {
        match self {
            AccessLevel::Level0 | AccessLevel::Level1 => true,
            AccessLevel::Level2 | AccessLevel::Level3 | AccessLevel::Level15 => false,
            AccessLevel::Unknown(_) => false,
        }
    }
}

wire_enum! {
    /// Property data types (PDT) as used in property descriptions.
    pub enum KnxPropertyDataType: u8, width 6 {
        Control = 0x00 => "PDT_CONTROL",
        Char = 0x01 => "PDT_CHAR",
        UnsignedChar = 0x02 => "PDT_UNSIGNED_CHAR",
        Int = 0x03 => "PDT_INT",
        UnsignedInt = 0x04 => "PDT_UNSIGNED_INT",
        KnxFloat = 0x05 => "PDT_KNX_FLOAT",
        Date = 0x06 => "PDT_DATE",
        Time = 0x07 => "PDT_TIME",
        Long = 0x08 => "PDT_LONG",
        UnsignedLong = 0x09 => "PDT_UNSIGNED_LONG",
        Float = 0x0A => "PDT_FLOAT",
        Double = 0x0B => "PDT_DOUBLE",
        CharBlock = 0x0C => "PDT_CHAR_BLOCK",
        PollGroupSettings = 0x0D => "PDT_POLL_GROUP_SETTINGS",
        ShortCharBlock = 0x0E => "PDT_SHORT_CHAR_BLOCK",
        DateTime = 0x0F => "PDT_DATE_TIME",
        VariableLength = 0x10 => "PDT_VARIABLE_LENGTH",
        Generic01 = 0x11 => "PDT_GENERIC_01",
        Generic02 = 0x12 => "PDT_GENERIC_02",
        Generic03 = 0x13 => "PDT_GENERIC_03",
        Generic04 = 0x14 => "PDT_GENERIC_04",
        Generic05 = 0x15 => "PDT_GENERIC_05",
        Generic06 = 0x16 => "PDT_GENERIC_06",
        Generic07 = 0x17 => "PDT_GENERIC_07",
        Generic08 = 0x18 => "PDT_GENERIC_08",
        Generic09 = 0x19 => "PDT_GENERIC_09",
        Generic10 = 0x1A => "PDT_GENERIC_10",
        Generic11 = 0x1B => "PDT_GENERIC_11",
        Generic12 = 0x1C => "PDT_GENERIC_12",
        Generic13 = 0x1D => "PDT_GENERIC_13",
        Generic14 = 0x1E => "PDT_GENERIC_14",
        Generic15 = 0x1F => "PDT_GENERIC_15",
        Generic16 = 0x20 => "PDT_GENERIC_16",
        Generic17 = 0x21 => "PDT_GENERIC_17",
        Generic18 = 0x22 => "PDT_GENERIC_18",
        Generic19 = 0x23 => "PDT_GENERIC_19",
        Generic20 = 0x24 => "PDT_GENERIC_20",
        Utf8 = 0x2F => "PDT_UTF_8",
        Version = 0x30 => "PDT_VERSION",
        AlarmInfo = 0x31 => "PDT_ALARM_INFO",
        BinaryInformation = 0x32 => "PDT_BINARY_INFORMATION",
        Bitset8 = 0x33 => "PDT_BITSET8",
        Bitset16 = 0x34 => "PDT_BITSET16",
        Enum8 = 0x35 => "PDT_ENUM8",
        Scaling = 0x36 => "PDT_SCALING",
        NeVl = 0x3C => "PDT_NE_VL",
        NeFl = 0x3D => "PDT_NE_FL",
        Function = 0x3E => "PDT_FUNCTION",
        Escape = 0x3F => "PDT_ESCAPE",
    }
}

impl KnxPropertyDataType {
    /// Size of one element in bytes; 0 for variable-length types.
    pub fn size_in_bytes(self) -> u8 {
        use KnxPropertyDataType::*;
        match self {
            Control => 10,
            Char | UnsignedChar => 1,
            Int | UnsignedInt | KnxFloat => 2,
            Date | Time => 3,
            Long | UnsignedLong | Float => 4,
            Double => 8,
            CharBlock => 10,
            PollGroupSettings => 3,
            ShortCharBlock => 5,
            DateTime => 8,
            VariableLength => 0,
            Generic01 => 1,
            Generic02 => 2,
            Generic03 => 3,
            Generic04 => 4,
            Generic05 => 5,
            Generic06 => 6,
            Generic07 => 7,
            Generic08 => 8,
            Generic09 => 9,
            Generic10 => 10,
            Generic11 => 11,
            Generic12 => 12,
            Generic13 => 13,
            Generic14 => 14,
            Generic15 => 15,
            Generic16 => 16,
            Generic17 => 17,
            Generic18 => 18,
            Generic19 => 19,
            Generic20 => 20,
            Utf8 => 0,
            Version => 2,
            AlarmInfo => 6,
            BinaryInformation | Bitset8 => 1,
            Bitset16 => 2,
            Enum8 | Scaling => 1,
            NeVl | NeFl | Function | Escape => 0,
            Unknown(_) => 0,
        }
    }
}

wire_enum! {
    pub enum FirmwareType: u16, width 16 {
        Bcu1System1 = 0x0010 => "BCU_1_SYSTEM_1",
        Bcu2System2 = 0x0020 => "BCU_2_SYSTEM_2",
        System300 = 0x0300 => "SYSTEM_300",
        BimM112 = 0x0700 => "BIM_M112",
        SystemB = 0x07B0 => "SYSTEM_B",
        IrDecoder = 0x0810 => "IR_DECODER",
        Coupler = 0x0910 => "COUPLER",
        None = 0x0AF0 => "NONE",
        MediaCouplerPlTp = 0x1900 => "MEDIA_COUPLER_PL_TP",
        RfBiDirectionalDevices = 0x2000 => "RF_BI_DIRECTIONAL_DEVICES",
        RfUniDirectionalDevices = 0x2100 => "RF_UNI_DIRECTIONAL_DEVICES",
        Bcu1 = 0x3000 => "BCU_1",
        System7 = 0x5700 => "SYSTEM_7",
    }
}

wire_enum! {
    /// Medium nibble of a mask version.
    pub enum DeviceDescriptorMediumType: u8, width 4 {
        Tp1 = 0x0 => "TP1",
        Pl110 = 0x1 => "PL110",
        Rf = 0x2 => "RF",
        Tp0 = 0x3 => "TP0",
        Pl132 = 0x4 => "PL132",
        KnxIp = 0x5 => "KNX_IP",
    }
}

wire_enum! {
    /// Mask versions reported in device descriptor type 0.
    pub enum DeviceDescriptorType0: u16, width 16 {
        Tp1Bcu1System1_0 = 0x0010 => "TP1_BCU_1_SYSTEM_1_0",
        Tp1Bcu1System1_1 = 0x0011 => "TP1_BCU_1_SYSTEM_1_1",
        Tp1Bcu1System1_2 = 0x0012 => "TP1_BCU_1_SYSTEM_1_2",
        Tp1Bcu1System1_3 = 0x0013 => "TP1_BCU_1_SYSTEM_1_3",
        Tp1Bcu2System2_0 = 0x0020 => "TP1_BCU_2_SYSTEM_2_0",
        Tp1Bcu2System2_1 = 0x0021 => "TP1_BCU_2_SYSTEM_2_1",
        Tp1Bcu2System2_5 = 0x0025 => "TP1_BCU_2_SYSTEM_2_5",
        Tp1System300 = 0x0300 => "TP1_SYSTEM_300",
        Tp1BimM112_0 = 0x0700 => "TP1_BIM_M112_0",
        Tp1BimM112_1 = 0x0701 => "TP1_BIM_M112_1",
        Tp1BimM112_5 = 0x0705 => "TP1_BIM_M112_5",
        Tp1SystemB = 0x07B0 => "TP1_SYSTEM_B",
        Tp1IrDecoder0 = 0x0810 => "TP1_IR_DECODER_0",
        Tp1IrDecoder1 = 0x0811 => "TP1_IR_DECODER_1",
        Tp1Coupler0 = 0x0910 => "TP1_COUPLER_0",
        Tp1Coupler1 = 0x0911 => "TP1_COUPLER_1",
        Tp1Coupler2 = 0x0912 => "TP1_COUPLER_2",
        Tp1KnxnetipRouter = 0x091A => "TP1_KNXNETIP_ROUTER",
        Tp1NoneD = 0x0AFD => "TP1_NONE_D",
        Tp1NoneE = 0x0AFE => "TP1_NONE_E",
        Pl110Bcu1_2 = 0x1012 => "PL110_BCU_1_2",
        Pl110Bcu1_3 = 0x1013 => "PL110_BCU_1_3",
        Pl110SystemB = 0x17B0 => "PL110_SYSTEM_B",
        Pl110MediaCouplerPlTp = 0x1900 => "PL110_MEDIA_COUPLER_PL_TP",
        RfBiDirectionalDevices = 0x2010 => "RF_BI_DIRECTIONAL_DEVICES",
        RfUniDirectionalDevices = 0x2110 => "RF_UNI_DIRECTIONAL_DEVICES",
        Tp0Bcu1 = 0x3012 => "TP0_BCU_1",
        Pl132Bcu1 = 0x4012 => "PL132_BCU_1",
        KnxIpSystem7 = 0x5705 => "KNX_IP_SYSTEM7",
    }
}

impl DeviceDescriptorType0 {
    pub fn firmware_type(self) -> FirmwareType {
        use DeviceDescriptorType0::*;
        match self {
            Tp1Bcu1System1_0 | Tp1Bcu1System1_1 | Tp1Bcu1System1_2 | Tp1Bcu1System1_3 => FirmwareType::Bcu1System1,
            Tp1Bcu2System2_0 | Tp1Bcu2System2_1 | Tp1Bcu2System2_5 => FirmwareType::Bcu2System2,
            Tp1System300 => FirmwareType::System300,
            Tp1BimM112_0 | Tp1BimM112_1 | Tp1BimM112_5 => FirmwareType::BimM112,
            Tp1SystemB | Pl110SystemB => FirmwareType::SystemB,
            Tp1IrDecoder0 | Tp1IrDecoder1 => FirmwareType::IrDecoder,
            Tp1Coupler0 | Tp1Coupler1 | Tp1Coupler2 | Tp1KnxnetipRouter => FirmwareType::Coupler,
            Tp1NoneD | Tp1NoneE => FirmwareType::None,
            Pl110Bcu1_2 | Pl110Bcu1_3 => FirmwareType::Bcu1System1,
            Pl110MediaCouplerPlTp => FirmwareType::MediaCouplerPlTp,
            RfBiDirectionalDevices => FirmwareType::RfBiDirectionalDevices,
            RfUniDirectionalDevices => FirmwareType::RfUniDirectionalDevices,
            Tp0Bcu1 | Pl132Bcu1 => FirmwareType::Bcu1,
            KnxIpSystem7 => FirmwareType::System7,
            Unknown(raw) => FirmwareType::Unknown(raw & 0x0FFF),
        }
    }

    pub fn medium_type(self) -> DeviceDescriptorMediumType {
        use DeviceDescriptorType0::*;
        match self {
            Tp1Bcu1System1_0 | Tp1Bcu1System1_1 | Tp1Bcu1System1_2 | Tp1Bcu1System1_3 | Tp1Bcu2System2_0
            | Tp1Bcu2System2_1 | Tp1Bcu2System2_5 | Tp1System300 | Tp1BimM112_0 | Tp1BimM112_1 | Tp1BimM112_5
            | Tp1SystemB | Tp1IrDecoder0 | Tp1IrDecoder1 | Tp1Coupler0 | Tp1Coupler1 | Tp1Coupler2
            | Tp1KnxnetipRouter | Tp1NoneD | Tp1NoneE => DeviceDescriptorMediumType::Tp1,
            Pl110Bcu1_2 | Pl110Bcu1_3 | Pl110SystemB | Pl110MediaCouplerPlTp => DeviceDescriptorMediumType::Pl110,
            RfBiDirectionalDevices | RfUniDirectionalDevices => DeviceDescriptorMediumType::Rf,
            Tp0Bcu1 => DeviceDescriptorMediumType::Tp0,
            Pl132Bcu1 => DeviceDescriptorMediumType::Pl132,
            KnxIpSystem7 => DeviceDescriptorMediumType::KnxIp,
            Unknown(raw) => DeviceDescriptorMediumType::from_wire((raw >> 12) as u64),
        }
    }
}
