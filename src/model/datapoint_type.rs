//! Datapoint main types and subtypes.
//!
//! A datapoint subtype is identified on the wire by `main * 10000 + sub`
//! (`9.001` is 90001). The main type fixes the payload layout; the subtype
//! only adds a unit and a description.

use crate::enumeration::{wire_enum, WireEnum};
use crate::parser::{self, AddressParseError};
use std::str::FromStr;

wire_enum! {
    pub enum KnxDatapointMainType: u16, width 16 {
        DptUnknown = 0 => "DPT_UNKNOWN",
        Dpt1Bit = 1 => "DPT_1_BIT",
        Dpt1BitControlled = 2 => "DPT_1_BIT_CONTROLLED",
        Dpt3BitControlled = 3 => "DPT_3_BIT_CONTROLLED",
        DptCharacter = 4 => "DPT_CHARACTER",
        Dpt8BitUnsignedValue = 5 => "DPT_8_BIT_UNSIGNED_VALUE",
        Dpt8BitSignedValue = 6 => "DPT_8_BIT_SIGNED_VALUE",
        Dpt2ByteUnsignedValue = 7 => "DPT_2_BYTE_UNSIGNED_VALUE",
        Dpt2ByteSignedValue = 8 => "DPT_2_BYTE_SIGNED_VALUE",
        Dpt2ByteFloatValue = 9 => "DPT_2_BYTE_FLOAT_VALUE",
        DptTime = 10 => "DPT_TIME",
        DptDate = 11 => "DPT_DATE",
        Dpt4ByteUnsignedValue = 12 => "DPT_4_BYTE_UNSIGNED_VALUE",
        Dpt4ByteSignedValue = 13 => "DPT_4_BYTE_SIGNED_VALUE",
        Dpt4ByteFloatValue = 14 => "DPT_4_BYTE_FLOAT_VALUE",
        DptEntranceAccess = 15 => "DPT_ENTRANCE_ACCESS",
        DptCharacterString = 16 => "DPT_CHARACTER_STRING",
        DptSceneNumber = 17 => "DPT_SCENE_NUMBER",
        DptSceneControl = 18 => "DPT_SCENE_CONTROL",
        DptDateTime = 19 => "DPT_DATE_TIME",
        Dpt1Byte = 20 => "DPT_1_BYTE",
        Dpt8BitSet = 21 => "DPT_8_BIT_SET",
        Dpt16BitSet = 22 => "DPT_16_BIT_SET",
        Dpt2BitSet = 23 => "DPT_2_BIT_SET",
        Dpt2NibbleSet = 24 => "DPT_2_NIBBLE_SET",
        Dpt8BitSet2 = 25 => "DPT_8_BIT_SET_2",
        Dpt32BitSet = 26 => "DPT_32_BIT_SET",
        DptElectricalEnergy = 27 => "DPT_ELECTRICAL_ENERGY",
        Dpt24TimesChannelActivation = 28 => "DPT_24_TIMES_CHANNEL_ACTIVATION",
        Dpt16BitUnsignedValueAnd8BitEnum = 29 => "DPT_16_BIT_UNSIGNED_VALUE_AND_8_BIT_ENUM",
        DptDatapointTypeVersion = 30 => "DPT_DATAPOINT_TYPE_VERSION",
        DptAlarmInfo = 31 => "DPT_ALARM_INFO",
        Dpt3x2ByteFloatValue = 32 => "DPT_3X_2_BYTE_FLOAT_VALUE",
        DptScalingSpeed = 33 => "DPT_SCALING_SPEED",
        Dpt411ByteCombinedInformation = 34 => "DPT_4_1_1_BYTE_COMBINED_INFORMATION",
        DptMbusAddress = 35 => "DPT_MBUS_ADDRESS",
        Dpt3ByteColourRgb = 36 => "DPT_3_BYTE_COLOUR_RGB",
        DptLanguageCodeIso639_1 = 37 => "DPT_LANGUAGE_CODE_ISO_639_1",
        DptSignedValueWithClassificationAndValidity = 38 => "DPT_SIGNED_VALUE_WITH_CLASSIFICATION_AND_VALIDITY",
        DptPrioritisedModeControl = 39 => "DPT_PRIORITISED_MODE_CONTROL",
        DptConfigurationDiagnostics16Bit = 40 => "DPT_CONFIGURATION_DIAGNOSTICS_16_BIT",
        DptConfigurationDiagnostics8Bit = 41 => "DPT_CONFIGURATION_DIAGNOSTICS_8_BIT",
        DptPositions = 42 => "DPT_POSITIONS",
        DptStatus32Bit = 43 => "DPT_STATUS_32_BIT",
        DptStatus48Bit = 44 => "DPT_STATUS_48_BIT",
        DptConverterStatus = 45 => "DPT_CONVERTER_STATUS",
        DptConverterTestResult = 46 => "DPT_CONVERTER_TEST_RESULT",
        DptBatteryInformation = 47 => "DPT_BATTERY_INFORMATION",
        DptBrightnessColourTemperatureTransition = 48 => "DPT_BRIGHTNESS_COLOUR_TEMPERATURE_TRANSITION",
        DptStatus24Bit = 49 => "DPT_STATUS_24_BIT",
        DptColourRgbw = 50 => "DPT_COLOUR_RGBW",
        DptRelativeControlRgbw = 51 => "DPT_RELATIVE_CONTROL_RGBW",
        DptRelativeControlRgb = 52 => "DPT_RELATIVE_CONTROL_RGB",
        DptF32F32 = 53 => "DPT_F32F32",
        DptF16F16F16F16 = 54 => "DPT_F16F16F16F16",
    }
}

impl KnxDatapointMainType {
    /// (DPT number, description, payload size in bits).
    fn attributes(self) -> (u16, &'static str, u8) {
        use KnxDatapointMainType::*;
        match self {
            DptUnknown => (0, "Unknown Datapoint Type", 0),
            Dpt1Bit => (1, "1-bit", 1),
            Dpt1BitControlled => (2, "1-bit controlled", 2),
            Dpt3BitControlled => (3, "3-bit controlled", 4),
            DptCharacter => (4, "character", 8),
            Dpt8BitUnsignedValue => (5, "8-bit unsigned value", 8),
            Dpt8BitSignedValue => (6, "8-bit signed value", 8),
            Dpt2ByteUnsignedValue => (7, "2-byte unsigned value", 16),
            Dpt2ByteSignedValue => (8, "2-byte signed value", 16),
            Dpt2ByteFloatValue => (9, "2-byte float value", 16),
            DptTime => (10, "time", 24),
            DptDate => (11, "date", 24),
            Dpt4ByteUnsignedValue => (12, "4-byte unsigned value", 32),
            Dpt4ByteSignedValue => (13, "4-byte signed value", 32),
            Dpt4ByteFloatValue => (14, "4-byte float value", 32),
            DptEntranceAccess => (15, "entrance access", 32),
            DptCharacterString => (16, "character string", 112),
            DptSceneNumber => (17, "scene number", 8),
            DptSceneControl => (18, "scene control", 8),
            DptDateTime => (19, "Date Time", 64),
            Dpt1Byte => (20, "1-byte", 8),
            Dpt8BitSet => (21, "8-bit set", 8),
            Dpt16BitSet => (22, "16-bit set", 16),
            Dpt2BitSet => (23, "2-bit set", 2),
            Dpt2NibbleSet => (25, "2-nibble set", 8),
            Dpt8BitSet2 => (26, "8-bit set", 8),
            Dpt32BitSet => (27, "32-bit set", 32),
            DptElectricalEnergy => (29, "electrical energy", 64),
            Dpt24TimesChannelActivation => (30, "24 times channel activation", 24),
            Dpt16BitUnsignedValueAnd8BitEnum => (206, "16-bit unsigned value & 8-bit enum", 24),
            DptDatapointTypeVersion => (217, "datapoint type version", 16),
            DptAlarmInfo => (219, "alarm info", 48),
            Dpt3x2ByteFloatValue => (222, "3x 2-byte float value", 48),
            DptScalingSpeed => (225, "scaling speed", 24),
            Dpt411ByteCombinedInformation => (229, "4-1-1 byte combined information", 48),
            DptMbusAddress => (230, "MBus address", 64),
            Dpt3ByteColourRgb => (232, "3-byte colour RGB", 24),
            DptLanguageCodeIso639_1 => (234, "language code ISO 639-1", 16),
            DptSignedValueWithClassificationAndValidity => (235, "Signed value with classification and validity", 48),
            DptPrioritisedModeControl => (236, "Prioritised Mode Control", 8),
            DptConfigurationDiagnostics16Bit => (237, "configuration/ diagnostics", 16),
            DptConfigurationDiagnostics8Bit => (238, "configuration/ diagnostics", 8),
            DptPositions => (240, "positions", 24),
            DptStatus32Bit => (241, "status", 32),
            DptStatus48Bit => (242, "status", 48),
            DptConverterStatus => (244, "Converter Status", 16),
            DptConverterTestResult => (245, "Converter test result", 48),
            DptBatteryInformation => (246, "Battery Information", 16),
            DptBrightnessColourTemperatureTransition => (249, "brightness colour temperature transition", 48),
            DptStatus24Bit => (250, "status", 24),
            DptColourRgbw => (251, "Colour RGBW", 48),
            DptRelativeControlRgbw => (252, "Relative Control RGBW", 40),
            DptRelativeControlRgb => (254, "Relative Control RGB", 24),
            DptF32F32 => (255, "F32F32", 64),
            DptF16F16F16F16 => (275, "F16F16F16F16", 64),
            Unknown(_) => (0, "", 0),
        }
    }

    pub fn number(self) -> u16 {
        self.attributes().0
    }

    pub fn text(self) -> &'static str {
        self.attributes().1
    }

    pub fn size_in_bits(self) -> u8 {
        self.attributes().2
    }

    /// Main type for a DPT number such as 9; `DptUnknown` when there is none.
    pub fn from_number(number: u16) -> Self {
        Self::MEMBERS
            .iter()
            .copied()
            .find(|m| m.number() == number)
            .unwrap_or(KnxDatapointMainType::DptUnknown)
    }
}

wire_enum! {
    pub enum KnxDatapointType: u32, width 32 {
        DpstSwitch = 10001 => "DPST_Switch",
        DpstBool = 10002 => "DPST_Bool",
        DpstEnable = 10003 => "DPST_Enable",
        DpstRamp = 10004 => "DPST_Ramp",
        DpstAlarm = 10005 => "DPST_Alarm",
        DpstBinaryValue = 10006 => "DPST_BinaryValue",
        DpstStep = 10007 => "DPST_Step",
        DpstUpDown = 10008 => "DPST_UpDown",
        DpstOpenClose = 10009 => "DPST_OpenClose",
        DpstStart = 10010 => "DPST_Start",
        DpstState = 10011 => "DPST_State",
        DpstInvert = 10012 => "DPST_Invert",
        DpstTrigger = 10017 => "DPST_Trigger",
        DpstOccupancy = 10018 => "DPST_Occupancy",
        DpstWindowDoor = 10019 => "DPST_Window_Door",
        DpstDayNight = 10024 => "DPST_DayNight",
        DpstHeatCool = 10100 => "DPST_Heat_Cool",
        DpstSwitchControl = 20001 => "DPST_Switch_Control",
        DpstBoolControl = 20002 => "DPST_Bool_Control",
        DpstControlDimming = 30007 => "DPST_Control_Dimming",
        DpstControlBlinds = 30008 => "DPST_Control_Blinds",
        DpstScaling = 50001 => "DPST_Scaling",
        DpstAngle = 50003 => "DPST_Angle",
        DpstPercentU8 = 50004 => "DPST_Percent_U8",
        DpstValue1Ucount = 50010 => "DPST_Value_1_Ucount",
        DpstPercentV8 = 60001 => "DPST_Percent_V8",
        DpstValue1Count = 60010 => "DPST_Value_1_Count",
        DpstValue2Ucount = 70001 => "DPST_Value_2_Ucount",
        DpstTimePeriodMsec = 70002 => "DPST_TimePeriodMsec",
        DpstBrightness = 70013 => "DPST_Brightness",
        DpstAbsoluteColourTemperature = 70600 => "DPST_Absolute_Colour_Temperature",
        DpstValue2Count = 80001 => "DPST_Value_2_Count",
        DpstPercentV16 = 80010 => "DPST_Percent_V16",
        DpstValueTemp = 90001 => "DPST_Value_Temp",
        DpstValueTempd = 90002 => "DPST_Value_Tempd",
        DpstValueLux = 90004 => "DPST_Value_Lux",
        DpstValueWsp = 90005 => "DPST_Value_Wsp",
        DpstValuePres = 90006 => "DPST_Value_Pres",
        DpstValueHumidity = 90007 => "DPST_Value_Humidity",
        DpstValueAirQuality = 90008 => "DPST_Value_AirQuality",
        DpstValueVolt = 90020 => "DPST_Value_Volt",
        DpstValueCurr = 90021 => "DPST_Value_Curr",
        DpstPower = 90024 => "DPST_Power",
        DpstTimeOfDay = 100001 => "DPST_TimeOfDay",
        DpstDate = 110001 => "DPST_Date",
        DpstValue4Ucount = 120001 => "DPST_Value_4_Ucount",
        DpstValue4Count = 130001 => "DPST_Value_4_Count",
        DpstActiveEnergy = 130010 => "DPST_ActiveEnergy",
        DpstActiveEnergyKwh = 130013 => "DPST_ActiveEnergy_kWh",
        DpstValueElectricCurrent = 140019 => "DPST_Value_Electric_Current",
        DpstValueElectricPotential = 140027 => "DPST_Value_Electric_Potential",
        DpstValuePower = 140056 => "DPST_Value_Power",
        DpstValueCommonTemperature = 140068 => "DPST_Value_Common_Temperature",
        DpstStringAscii = 160000 => "DPST_String_ASCII",
        DpstString8859_1 = 160001 => "DPST_String_8859_1",
        DpstSceneNumber = 170001 => "DPST_SceneNumber",
        DpstSceneControl = 180001 => "DPST_SceneControl",
    }
}

impl KnxDatapointType {
    pub fn text(self) -> &'static str {
        use KnxDatapointType::*;
        match self {
            DpstSwitch => "switch",
            DpstBool => "boolean",
            DpstEnable => "enable",
            DpstRamp => "ramp",
            DpstAlarm => "alarm",
            DpstBinaryValue => "binary value",
            DpstStep => "step",
            DpstUpDown => "up/down",
            DpstOpenClose => "open/close",
            DpstStart => "start/stop",
            DpstState => "state",
            DpstInvert => "invert",
            DpstTrigger => "trigger",
            DpstOccupancy => "occupancy",
            DpstWindowDoor => "window/door",
            DpstDayNight => "day/night",
            DpstHeatCool => "cooling/heating",
            DpstSwitchControl => "switch control",
            DpstBoolControl => "boolean control",
            DpstControlDimming => "dimming control",
            DpstControlBlinds => "blind control",
            DpstScaling => "percentage (0..100%)",
            DpstAngle => "angle (degrees)",
            DpstPercentU8 => "percentage (0..255%)",
            DpstValue1Ucount => "counter pulses (0..255)",
            DpstPercentV8 => "percentage (-128..127%)",
            DpstValue1Count => "counter pulses (-128..127)",
            DpstValue2Ucount => "pulses",
            DpstTimePeriodMsec => "time (ms)",
            DpstBrightness => "brightness (lux)",
            DpstAbsoluteColourTemperature => "absolute colour temperature (K)",
            DpstValue2Count => "pulses difference",
            DpstPercentV16 => "percentage difference (%)",
            DpstValueTemp => "temperature (C)",
            DpstValueTempd => "temperature difference (K)",
            DpstValueLux => "lux (Lux)",
            DpstValueWsp => "speed (m/s)",
            DpstValuePres => "pressure (Pa)",
            DpstValueHumidity => "humidity (%)",
            DpstValueAirQuality => "parts/million (ppm)",
            DpstValueVolt => "voltage (mV)",
            DpstValueCurr => "current (mA)",
            DpstPower => "power (kW)",
            DpstTimeOfDay => "time of day",
            DpstDate => "date",
            DpstValue4Ucount => "counter pulses (unsigned)",
            DpstValue4Count => "counter pulses (signed)",
            DpstActiveEnergy => "active energy (Wh)",
            DpstActiveEnergyKwh => "active energy (kWh)",
            DpstValueElectricCurrent => "electric current (A)",
            DpstValueElectricPotential => "electric potential (V)",
            DpstValuePower => "power (W)",
            DpstValueCommonTemperature => "temperature (C)",
            DpstStringAscii => "Character String (ASCII)",
            DpstString8859_1 => "Character String (ISO 8859-1)",
            DpstSceneNumber => "scene number",
            DpstSceneControl => "scene control",
            Unknown(_) => "",
        }
    }

    pub fn main_number(self) -> u16 {
        (self.value() / 10_000) as u16
    }

    pub fn sub_number(self) -> u16 {
        (self.value() % 10_000) as u16
    }

    pub fn main_type(self) -> KnxDatapointMainType {
        KnxDatapointMainType::from_number(self.main_number())
    }

    /// Looks up `main.sub`; unnamed combinations come back as `Unknown`.
    pub fn from_numbers(main: u16, sub: u16) -> Self {
        Self::from_wire(main as u64 * 10_000 + sub as u64)
    }
}

/// Parses `"9.001"`, `"DPT9.001"` or `"DPST-9-1"`.
impl FromStr for KnxDatapointType {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (main, sub) = parser::parse_datapoint_id(s)?;
        Ok(KnxDatapointType::from_numbers(main, sub))
    }
}
