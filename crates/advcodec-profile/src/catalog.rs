//! Built-in profile definitions.
//!
//! Registration order matters: lookups that can match several profiles
//! return the first one listed in [`profiles`].

use advcodec_wire::{FieldDescriptor, Format, WireType};

use crate::error::Result;
use crate::group::SensorGroup;
use crate::profile::Profile;

/// Service identifiers advertised per sensor group.
pub mod service_ids {
    /// Bluetooth SIG Environmental Sensing service.
    pub const ENVIRONMENTAL: &str = "0000181a-0000-1000-8000-00805f9b34fb";
    pub const AIR_QUALITY: &str = "a5b10002-6d2c-4e1a-9f3b-5c0d8e2a7f10";
    pub const MOTION: &str = "a5b10003-6d2c-4e1a-9f3b-5c0d8e2a7f10";
    pub const AMBIENT: &str = "a5b10004-6d2c-4e1a-9f3b-5c0d8e2a7f10";
    pub const SYSTEM: &str = "a5b10005-6d2c-4e1a-9f3b-5c0d8e2a7f10";
    pub const CURRENT: &str = "a5b10006-6d2c-4e1a-9f3b-5c0d8e2a7f10";
}

/// Reserved identifiers of the group profiles.
pub mod identifiers {
    pub const ENVIRONMENTAL: u16 = 0xFF01;
    pub const AIR_QUALITY: u16 = 0xFF02;
    pub const MOTION: u16 = 0xFF03;
    pub const AMBIENT: u16 = 0xFF04;
    pub const SYSTEM: u16 = 0xFF05;
    pub const CURRENT: u16 = 0xFF06;

    /// Shared by the device-specific and compatibility profiles.
    pub const DEVICE: u16 = 0xFFFF;
}

/// Name of the canonical profile of a group.
pub fn canonical_profile_name(group: SensorGroup) -> Option<&'static str> {
    match group {
        SensorGroup::Environmental => Some("Environmental_Sensors"),
        SensorGroup::AirQuality => Some("Air_Quality_Sensors"),
        SensorGroup::Motion => Some("Motion_Sensors"),
        SensorGroup::Ambient => Some("Ambient_Sensors"),
        SensorGroup::System => Some("System_Sensors"),
        SensorGroup::Current => Some("Current_Sensors"),
        SensorGroup::Unknown => None,
    }
}

/// Device profiles that also carry a group's data, after the canonical one.
pub fn related_profile_names(group: SensorGroup) -> &'static [&'static str] {
    match group {
        SensorGroup::Environmental | SensorGroup::AirQuality => &["Weather_Station"],
        SensorGroup::Ambient => &["ESP32_DevBoard"],
        SensorGroup::System => &["M5Stack_Comprehensive"],
        SensorGroup::Motion | SensorGroup::Current | SensorGroup::Unknown => &[],
    }
}

/// Reserved identifier of a group.
pub fn reserved_identifier(group: SensorGroup) -> Option<u16> {
    match group {
        SensorGroup::Environmental => Some(identifiers::ENVIRONMENTAL),
        SensorGroup::AirQuality => Some(identifiers::AIR_QUALITY),
        SensorGroup::Motion => Some(identifiers::MOTION),
        SensorGroup::Ambient => Some(identifiers::AMBIENT),
        SensorGroup::System => Some(identifiers::SYSTEM),
        SensorGroup::Current => Some(identifiers::CURRENT),
        SensorGroup::Unknown => None,
    }
}

/// Service identifier of a group.
pub fn service_id(group: SensorGroup) -> Option<&'static str> {
    match group {
        SensorGroup::Environmental => Some(service_ids::ENVIRONMENTAL),
        SensorGroup::AirQuality => Some(service_ids::AIR_QUALITY),
        SensorGroup::Motion => Some(service_ids::MOTION),
        SensorGroup::Ambient => Some(service_ids::AMBIENT),
        SensorGroup::System => Some(service_ids::SYSTEM),
        SensorGroup::Current => Some(service_ids::CURRENT),
        SensorGroup::Unknown => None,
    }
}

/// All built-in profiles in registration order.
pub fn profiles() -> Result<Vec<Profile>> {
    Ok(vec![
        m5stack_compact()?,
        generic_sensor()?,
        environmental()?,
        air_quality()?,
        motion()?,
        ambient()?,
        system()?,
        current()?,
        m5stack_comprehensive()?,
        esp32_dev_board()?,
        weather_station()?,
    ])
}

fn field(
    name: &str,
    offset: usize,
    wire_type: WireType,
    scale: f64,
    unit: &str,
) -> FieldDescriptor {
    FieldDescriptor::new(name, offset, wire_type)
        .with_scale(scale)
        .with_unit(unit)
}

fn profile(name: &str, pattern: &str, primary: Format, service_ids: &[&str]) -> Result<Profile> {
    let profile = Profile::new(name, pattern, primary)?;
    Ok(service_ids
        .iter()
        .fold(profile, |profile, id| profile.with_service_id(*id)))
}

// [battery:1][temperature:2][humidity:2][air_quality:2]
fn m5stack_compact() -> Result<Profile> {
    let format = Format::identified(identifiers::DEVICE, 7)
        .with_description("M5Stack compact environmental sensor format")
        .with_fields([
            field("battery", 0, WireType::U8, 1.0, "%"),
            field("temperature", 1, WireType::I16_BE, 0.01, "°C"),
            field("humidity", 3, WireType::U16_BE, 0.01, "%"),
            field("air_quality", 5, WireType::U16_BE, 1.0, "AQI"),
        ]);
    profile(
        "Environmental Sensing",
        "M5Stack",
        format,
        &[service_ids::ENVIRONMENTAL],
    )
}

// [sensor1:f32le][sensor2:f32le]
fn generic_sensor() -> Result<Profile> {
    let format = Format::identified(identifiers::DEVICE, 8)
        .with_description("Generic sensor format")
        .with_fields([
            field("sensor1", 0, WireType::F32_LE, 1.0, ""),
            field("sensor2", 4, WireType::F32_LE, 1.0, ""),
        ]);
    profile("Generic_Sensor", "GenericDevice", format, &[])
}

// [battery:1][temperature:2][humidity:2][pressure:4][altitude:2]
fn environmental() -> Result<Profile> {
    let format = Format::identified(identifiers::ENVIRONMENTAL, 11)
        .with_description("Environmental sensors data format")
        .with_fields([
            field("battery", 0, WireType::U8, 1.0, "%"),
            field("temperature", 1, WireType::I16_BE, 0.01, "°C"),
            field("humidity", 3, WireType::U16_BE, 0.01, "%"),
            field("pressure", 5, WireType::U32_BE, 0.01, "hPa"),
            field("altitude", 9, WireType::I16_BE, 0.1, "m"),
        ]);
    profile(
        "Environmental_Sensors",
        "Environmental",
        format,
        &[service_ids::ENVIRONMENTAL],
    )
}

// [aqi:2][tvoc:2][co2:2][gas_resistance:4]
fn air_quality() -> Result<Profile> {
    let format = Format::identified(identifiers::AIR_QUALITY, 10)
        .with_description("Air quality sensors data format")
        .with_fields([
            field("aqi", 0, WireType::U16_BE, 1.0, "AQI"),
            field("tvoc", 2, WireType::U16_BE, 1.0, "ppb"),
            field("co2", 4, WireType::U16_BE, 1.0, "ppm"),
            field("gas_resistance", 6, WireType::U32_BE, 1.0, "Ohm"),
        ]);
    profile(
        "Air_Quality_Sensors",
        "AirQuality",
        format,
        &[service_ids::AIR_QUALITY],
    )
}

// [accel_x:2][accel_y:2][accel_z:2][gyro_x:2][gyro_y:2][gyro_z:2]
fn motion() -> Result<Profile> {
    let format = Format::identified(identifiers::MOTION, 12)
        .with_description("Motion sensors data format")
        .with_fields([
            field("accel_x", 0, WireType::I16_BE, 0.001, "g"),
            field("accel_y", 2, WireType::I16_BE, 0.001, "g"),
            field("accel_z", 4, WireType::I16_BE, 0.001, "g"),
            field("gyro_x", 6, WireType::I16_BE, 0.1, "dps"),
            field("gyro_y", 8, WireType::I16_BE, 0.1, "dps"),
            field("gyro_z", 10, WireType::I16_BE, 0.1, "dps"),
        ]);
    profile("Motion_Sensors", "Motion", format, &[service_ids::MOTION])
}

// [brightness:2][red:1][green:1][blue:1][white:1]
fn ambient() -> Result<Profile> {
    let format = Format::identified(identifiers::AMBIENT, 6)
        .with_description("Ambient sensors data format")
        .with_fields([
            field("brightness", 0, WireType::U16_BE, 0.01, "lux"),
            field("red", 2, WireType::U8, 1.0, ""),
            field("green", 3, WireType::U8, 1.0, ""),
            field("blue", 4, WireType::U8, 1.0, ""),
            field("white", 5, WireType::U8, 1.0, ""),
        ]);
    profile("Ambient_Sensors", "Ambient", format, &[service_ids::AMBIENT])
}

// [battery_level:1][soc:2][voltage:2][current:2][charging:1]
fn system() -> Result<Profile> {
    let format = Format::identified(identifiers::SYSTEM, 8)
        .with_description("System sensors data format")
        .with_fields([
            field("battery_level", 0, WireType::U8, 1.0, "%"),
            field("soc", 1, WireType::U16_BE, 0.01, "%"),
            field("voltage", 3, WireType::U16_BE, 0.001, "V"),
            field("current", 5, WireType::I16_BE, 0.001, "A"),
            field("charging", 7, WireType::U8, 1.0, ""),
        ]);
    profile("System_Sensors", "System", format, &[service_ids::SYSTEM])
}

// [rms_current:f32be][power:f32be][energy:f32be]
fn current() -> Result<Profile> {
    let format = Format::identified(identifiers::CURRENT, 12)
        .with_description("Current sensors data format")
        .with_fields([
            field("rms_current", 0, WireType::F32_BE, 1.0, "A"),
            field("power", 4, WireType::F32_BE, 1.0, "W"),
            field("energy", 8, WireType::F32_BE, 1.0, "Wh"),
        ]);
    profile("Current_Sensors", "Current", format, &[service_ids::CURRENT])
}

// [battery:1][temperature:2][humidity:2][pressure:2][air_quality:2][acceleration:2][status:1]
fn m5stack_comprehensive() -> Result<Profile> {
    let format = Format::identified(identifiers::DEVICE, 12)
        .with_description("M5Stack comprehensive sensor format")
        .with_fields([
            field("battery", 0, WireType::U8, 1.0, "%"),
            field("temperature", 1, WireType::I16_BE, 0.01, "°C"),
            field("humidity", 3, WireType::U16_BE, 0.01, "%"),
            field("pressure", 5, WireType::U16_BE, 0.1, "hPa"),
            field("air_quality", 7, WireType::U16_BE, 1.0, "AQI"),
            field("acceleration", 9, WireType::U16_BE, 0.001, "g"),
            field("status", 11, WireType::U8, 1.0, ""),
        ]);
    profile(
        "M5Stack_Comprehensive",
        "M5Stack-Full",
        format,
        &[
            service_ids::ENVIRONMENTAL,
            service_ids::AIR_QUALITY,
            service_ids::MOTION,
            service_ids::SYSTEM,
        ],
    )
}

// [temperature:2][humidity:2][brightness:2][motion_detected:1][gpio_status:1]
fn esp32_dev_board() -> Result<Profile> {
    let format = Format::identified(identifiers::DEVICE, 8)
        .with_description("ESP32 development board sensor format")
        .with_fields([
            field("temperature", 0, WireType::I16_BE, 0.01, "°C"),
            field("humidity", 2, WireType::U16_BE, 0.01, "%"),
            field("brightness", 4, WireType::U16_BE, 0.1, "lux"),
            field("motion_detected", 6, WireType::U8, 1.0, ""),
            field("gpio_status", 7, WireType::U8, 1.0, ""),
        ]);
    profile(
        "ESP32_DevBoard",
        "ESP32-Dev",
        format,
        &[service_ids::ENVIRONMENTAL, service_ids::AMBIENT],
    )
}

// [temperature:2][humidity:2][pressure:4][air_quality:2][uv_index:1][wind_speed:1]
fn weather_station() -> Result<Profile> {
    let format = Format::identified(identifiers::DEVICE, 12)
        .with_description("Weather station data format")
        .with_fields([
            field("temperature", 0, WireType::I16_BE, 0.01, "°C"),
            field("humidity", 2, WireType::U16_BE, 0.01, "%"),
            field("pressure", 4, WireType::U32_BE, 0.01, "hPa"),
            field("air_quality", 8, WireType::U16_BE, 1.0, "AQI"),
            field("uv_index", 10, WireType::U8, 0.1, ""),
            field("wind_speed", 11, WireType::U8, 0.1, "m/s"),
        ]);
    profile(
        "Weather_Station",
        "WeatherStation",
        format,
        &[service_ids::ENVIRONMENTAL, service_ids::AIR_QUALITY],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_profile_validates() {
        for profile in profiles().unwrap() {
            profile
                .validate()
                .unwrap_or_else(|err| panic!("{}: {err}", profile.name()));
        }
    }

    #[test]
    fn group_tables_cover_every_known_group() {
        for group in SensorGroup::KNOWN {
            assert!(canonical_profile_name(group).is_some(), "{group}");
            assert!(reserved_identifier(group).is_some(), "{group}");
            assert!(service_id(group).is_some(), "{group}");
        }
        assert!(canonical_profile_name(SensorGroup::Unknown).is_none());
        assert!(related_profile_names(SensorGroup::Unknown).is_empty());
    }

    #[test]
    fn canonical_profiles_use_reserved_identifiers() {
        let all = profiles().unwrap();
        for group in SensorGroup::KNOWN {
            let name = canonical_profile_name(group).unwrap();
            let profile = all.iter().find(|p| p.name() == name).unwrap();
            assert_eq!(Some(profile.identifier()), reserved_identifier(group));
        }
    }

    #[test]
    fn environmental_layout_matches_wire_example() {
        let profile = environmental().unwrap();
        let values = advcodec_wire::DecodedValues::from([
            ("battery".to_string(), 87.0),
            ("temperature".to_string(), 23.45),
        ]);
        let buf = profile.encode(&values);
        assert_eq!(buf.len(), 13);
        assert_eq!(&buf[..5], &[0x01, 0xFF, 0x57, 0x09, 0x29]);
    }
}
