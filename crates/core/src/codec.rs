//! Codec between the raw config record and the semantic profile model.
//!
//! Decoding is total: any parsed record yields a profile. Encoding merges the
//! edited profile back over a previously-read record so the bytes the model
//! has no opinion about (effect speeds, reserved fields, lift-off distance)
//! reach the device unchanged.

use crate::config::{ConfigReport, RgbEffect, CONFIG_WRITE_MAGIC, NUM_DPI_SLOTS};
use crate::convert::{color_from_raw, color_to_raw, dpi_from_raw, dpi_to_raw};
use crate::device::PollingRate;
use crate::profile::{Color, Led, LedMode, LedType, Profile, Resolution};
use tracing::debug;

/// Decode a parsed config record into a profile.
///
/// The slot whose 1-based index matches the record's active-DPI nibble is
/// marked both active and default; the record does not distinguish the two.
/// The report rate is pinned to 1000 Hz — the record carries no
/// documented polling-rate field to read it from.
pub fn decode_profile(config: &ConfigReport) -> Profile {
    let xy_independent = config.xy_independent();

    let mut resolutions = Vec::with_capacity(NUM_DPI_SLOTS);
    for index in 0..NUM_DPI_SLOTS {
        let (mut dpi_x, mut dpi_y) = if xy_independent {
            (
                dpi_from_raw(config.dpi[index * 2]),
                dpi_from_raw(config.dpi[index * 2 + 1]),
            )
        } else {
            let dpi = dpi_from_raw(config.dpi[index]);
            (dpi, dpi)
        };

        if config.slot_disabled(index) {
            // Disabled slots keep stale raw bytes; expose them as 0 DPI.
            dpi_x = 0;
            dpi_y = 0;
        }

        let is_active = index as u8 + 1 == config.active_dpi;
        resolutions.push(Resolution {
            index,
            dpi_x,
            dpi_y,
            is_active,
            is_default: is_active,
            separate_xy: true,
        });
    }

    let mut leds = Vec::with_capacity(NUM_DPI_SLOTS + 1);
    leds.push(decode_body_led(config));
    for index in 1..=NUM_DPI_SLOTS {
        leds.push(Led {
            index,
            led_type: LedType::DpiIndicator,
            mode: LedMode::On,
            color: color_from_raw(config.dpi_color[index - 1]),
            supported_modes: vec![LedMode::On],
        });
    }

    debug!(
        active_dpi = config.active_dpi,
        xy_independent,
        rgb_effect = format_args!("0x{:X}", config.rgb_effect),
        "Decoded config record"
    );

    Profile {
        resolutions,
        leds,
        report_rate: PollingRate::Hz1000,
        supported_report_rates: vec![PollingRate::Hz1000],
        is_active: true,
    }
}

/// Map the effect selector onto the simplified body-LED model.
///
/// All animated effects collapse onto `Cycle` with no color. An unknown
/// selector byte matches nothing and the mode stays at its `Off` default;
/// the firmware ships no such values, so this is not treated as an error.
fn decode_body_led(config: &ConfigReport) -> Led {
    let mut mode = LedMode::Off;
    let mut color = Color::default();

    match RgbEffect::from_byte(config.rgb_effect) {
        Some(RgbEffect::Off) => mode = LedMode::Off,
        Some(RgbEffect::Single) => {
            mode = LedMode::On;
            color = color_from_raw(config.single_color);
        }
        Some(
            RgbEffect::Glorious
            | RgbEffect::Breathing
            | RgbEffect::Breathing7
            | RgbEffect::Tail
            | RgbEffect::Rave
            | RgbEffect::Wave,
        ) => mode = LedMode::Cycle,
        Some(RgbEffect::Breathing1) => {
            mode = LedMode::Breathing;
            color = color_from_raw(config.breathing1_color);
        }
        None => {}
    }

    Led {
        index: 0,
        led_type: LedType::Side,
        mode,
        color,
        supported_modes: vec![LedMode::Off, LedMode::On, LedMode::Cycle, LedMode::Breathing],
    }
}

/// Encode the profile back over `config`, leaving it ready for transmission.
///
/// The XY-independent flag is recomputed from scratch: set iff any slot has
/// distinct nonzero X and Y. (The reference driver tried to restore the flag
/// with `&=` after clearing it, which can never set a cleared bit; the
/// mixed-DPI transition was therefore broken there. See DESIGN.md.)
pub fn encode_profile(profile: &Profile, config: &mut ConfigReport) {
    let xy_independent = profile
        .resolutions
        .iter()
        .any(|r| r.dpi_x != r.dpi_y && r.dpi_x != 0 && r.dpi_y != 0);
    config.set_xy_independent(xy_independent);

    // Start fully disabled; the mask is inverted on the wire.
    config.dpi_enabled = 0xFF;
    for resolution in &profile.resolutions {
        if xy_independent {
            config.dpi[resolution.index * 2] = dpi_to_raw(resolution.dpi_x);
            config.dpi[resolution.index * 2 + 1] = dpi_to_raw(resolution.dpi_y);
        } else {
            config.dpi[resolution.index] = dpi_to_raw(resolution.dpi_x);
        }
        if resolution.dpi_x != 0 && resolution.dpi_y != 0 {
            config.set_slot_enabled(resolution.index, true);
        }
        if resolution.is_active {
            config.active_dpi = resolution.index as u8 + 1;
        }
    }

    encode_body_led(profile.body_led(), config);

    for led in &profile.leds[1..] {
        config.dpi_color[led.index - 1] = color_to_raw(led.color);
    }

    config.config_write = CONFIG_WRITE_MAGIC;

    debug!(
        xy_independent,
        dpi_enabled = format_args!("0b{:08b}", config.dpi_enabled),
        rgb_effect = format_args!("0x{:X}", config.rgb_effect),
        "Encoded config record"
    );
}

/// Map the body-LED mode back to an effect selector.
///
/// `Cycle` always becomes the rainbow-cycle effect and drops the color; the
/// decode mapping is one-to-many, so this direction cannot recover which
/// animated effect the record originally carried.
fn encode_body_led(led: &Led, config: &mut ConfigReport) {
    match led.mode {
        LedMode::Off => config.rgb_effect = RgbEffect::Off as u8,
        LedMode::On => {
            config.rgb_effect = RgbEffect::Single as u8;
            config.single_color = color_to_raw(led.color);
        }
        LedMode::Cycle => config.rgb_effect = RgbEffect::Glorious as u8,
        LedMode::Breathing => {
            config.rgb_effect = RgbEffect::Breathing1 as u8;
            config.breathing1_color = color_to_raw(led.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::testutil::sample_record_bytes;
    use crate::config::XY_INDEPENDENT;

    fn sample_config() -> ConfigReport {
        ConfigReport::from_bytes(&sample_record_bytes()).unwrap()
    }

    #[test]
    fn decode_shared_xy_slots() {
        let profile = decode_profile(&sample_config());

        assert_eq!(profile.resolutions.len(), NUM_DPI_SLOTS);
        assert_eq!(profile.resolutions[0].dpi_x, 800);
        assert_eq!(profile.resolutions[0].dpi_y, 800);
        assert_eq!(profile.resolutions[1].dpi_x, 1600);
        assert_eq!(profile.resolutions[2].dpi_x, 3200);
    }

    #[test]
    fn decode_xy_independent_slots() {
        let mut config = sample_config();
        config.config |= XY_INDEPENDENT;
        config.dpi[0] = dpi_to_raw(800);
        config.dpi[1] = dpi_to_raw(1200);
        config.dpi[2] = dpi_to_raw(1600);
        config.dpi[3] = dpi_to_raw(2400);

        let profile = decode_profile(&config);
        assert_eq!(profile.resolutions[0].dpi_x, 800);
        assert_eq!(profile.resolutions[0].dpi_y, 1200);
        assert_eq!(profile.resolutions[1].dpi_x, 1600);
        assert_eq!(profile.resolutions[1].dpi_y, 2400);
    }

    #[test]
    fn disabled_slot_decodes_as_zero_dpi() {
        let mut config = sample_config();
        // Slot 1 disabled but still carrying a stale raw value.
        config.dpi_enabled |= 1 << 1;
        config.dpi[1] = dpi_to_raw(1600);

        let profile = decode_profile(&config);
        assert_eq!(profile.resolutions[1].dpi_x, 0);
        assert_eq!(profile.resolutions[1].dpi_y, 0);
        assert!(profile.resolutions[1].is_disabled());
    }

    #[test]
    fn exactly_one_slot_active_matching_nibble() {
        let config = sample_config();
        assert_eq!(config.active_dpi, 2);

        let profile = decode_profile(&config);
        let active: Vec<usize> = profile
            .resolutions
            .iter()
            .filter(|r| r.is_active)
            .map(|r| r.index)
            .collect();
        assert_eq!(active, vec![1]); // active_dpi - 1
        assert!(profile.resolutions[1].is_default);
    }

    #[test]
    fn decode_populates_indicator_leds() {
        let profile = decode_profile(&sample_config());

        assert_eq!(profile.leds.len(), NUM_DPI_SLOTS + 1);
        for (slot, led) in profile.leds[1..].iter().enumerate() {
            assert_eq!(led.led_type, LedType::DpiIndicator);
            assert_eq!(led.mode, LedMode::On);
            assert_eq!(led.color.red, 0x10 + slot as u8);
            assert_eq!(led.color.green, 0x20 + slot as u8);
            assert_eq!(led.color.blue, 0x30 + slot as u8);
            assert_eq!(led.supported_modes, vec![LedMode::On]);
        }
    }

    #[test]
    fn decode_single_effect_as_on_with_color() {
        let profile = decode_profile(&sample_config());
        let body = profile.body_led();
        assert_eq!(body.mode, LedMode::On);
        assert_eq!(body.color, Color::new(0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn decode_wave_effect_as_cycle() {
        let mut config = sample_config();
        config.rgb_effect = 0x9;
        let profile = decode_profile(&config);
        assert_eq!(profile.body_led().mode, LedMode::Cycle);
    }

    #[test]
    fn decode_breathing1_effect_with_its_color_field() {
        let mut config = sample_config();
        config.rgb_effect = 0xA;
        let profile = decode_profile(&config);
        let body = profile.body_led();
        assert_eq!(body.mode, LedMode::Breathing);
        assert_eq!(body.color, Color::new(0x11, 0x22, 0x33));
    }

    #[test]
    fn decode_cycle_class_effects() {
        for effect in [0x1u8, 0x3, 0x4, 0x5, 0x7, 0x9] {
            let mut config = sample_config();
            config.rgb_effect = effect;
            let profile = decode_profile(&config);
            assert_eq!(
                profile.body_led().mode,
                LedMode::Cycle,
                "effect 0x{effect:X}"
            );
        }
    }

    #[test]
    fn unknown_effect_leaves_mode_at_default() {
        let mut config = sample_config();
        config.rgb_effect = 0x6; // not in the effect table
        let profile = decode_profile(&config);
        assert_eq!(profile.body_led().mode, LedMode::Off);
    }

    #[test]
    fn decode_pins_report_rate() {
        let profile = decode_profile(&sample_config());
        assert_eq!(profile.report_rate, PollingRate::Hz1000);
        assert_eq!(profile.supported_report_rates, vec![PollingRate::Hz1000]);
        assert!(profile.is_active);
    }

    #[test]
    fn encode_equal_xy_uses_single_byte_layout() {
        let mut config = sample_config();
        let mut profile = decode_profile(&config);
        for r in &mut profile.resolutions {
            if !r.is_disabled() {
                r.dpi_y = r.dpi_x;
            }
        }

        encode_profile(&profile, &mut config);

        assert!(!config.xy_independent());
        assert_eq!(config.dpi[0], dpi_to_raw(800));
        assert_eq!(config.dpi[1], dpi_to_raw(1600));
        assert_eq!(config.dpi[2], dpi_to_raw(3200));
    }

    #[test]
    fn encode_mixed_xy_uses_pair_layout() {
        let mut config = sample_config();
        let mut profile = decode_profile(&config);
        profile.resolutions[0].dpi_x = 800;
        profile.resolutions[0].dpi_y = 1200;

        encode_profile(&profile, &mut config);

        assert!(config.xy_independent());
        assert_eq!(config.dpi[0], dpi_to_raw(800));
        assert_eq!(config.dpi[1], dpi_to_raw(1200));
        // Slot 1 keeps equal X/Y but still moves to the pair layout.
        assert_eq!(config.dpi[2], dpi_to_raw(1600));
        assert_eq!(config.dpi[3], dpi_to_raw(1600));
    }

    /// The reference driver could never set the flag once cleared; a record
    /// read in shared-XY mode must still encode a mixed edit correctly.
    #[test]
    fn mixed_xy_after_shared_record_sets_flag() {
        let mut config = sample_config();
        assert!(!config.xy_independent());

        let mut profile = decode_profile(&config);
        profile.resolutions[2].dpi_y = 6400;

        encode_profile(&profile, &mut config);
        assert!(config.xy_independent());
    }

    #[test]
    fn encode_recomputes_inverted_enable_mask() {
        let mut config = sample_config();
        let mut profile = decode_profile(&config);
        // Disable slot 2, keep 0 and 1.
        profile.resolutions[2].dpi_x = 0;
        profile.resolutions[2].dpi_y = 0;

        encode_profile(&profile, &mut config);

        assert!(!config.slot_disabled(0));
        assert!(!config.slot_disabled(1));
        assert!(config.slot_disabled(2));
        // Slots the profile never enabled stay masked off.
        for slot in 3..8 {
            assert!(config.slot_disabled(slot));
        }
    }

    #[test]
    fn encode_active_slot_nibble() {
        let mut config = sample_config();
        let mut profile = decode_profile(&config);
        profile.set_active_slot(0).unwrap();

        encode_profile(&profile, &mut config);
        assert_eq!(config.active_dpi, 1);
    }

    #[test]
    fn encode_sets_commit_marker() {
        let mut config = sample_config();
        assert_eq!(config.config_write, 0);

        let profile = decode_profile(&config);
        encode_profile(&profile, &mut config);
        assert_eq!(config.config_write, CONFIG_WRITE_MAGIC);
    }

    #[test]
    fn body_led_on_roundtrips_color() {
        let mut config = sample_config();
        let mut profile = decode_profile(&config);
        profile.body_led_mut().mode = LedMode::On;
        profile.body_led_mut().color = Color::new(10, 20, 30);

        encode_profile(&profile, &mut config);
        let back = decode_profile(&config);

        assert_eq!(back.body_led().mode, LedMode::On);
        assert_eq!(back.body_led().color, Color::new(10, 20, 30));
    }

    #[test]
    fn body_led_breathing_roundtrips_color() {
        let mut config = sample_config();
        let mut profile = decode_profile(&config);
        profile.body_led_mut().mode = LedMode::Breathing;
        profile.body_led_mut().color = Color::new(0xDE, 0xAD, 0x00);

        encode_profile(&profile, &mut config);
        assert_eq!(config.rgb_effect, RgbEffect::Breathing1 as u8);

        let back = decode_profile(&config);
        assert_eq!(back.body_led().mode, LedMode::Breathing);
        assert_eq!(back.body_led().color, Color::new(0xDE, 0xAD, 0x00));
    }

    #[test]
    fn body_led_cycle_encodes_rainbow_and_drops_color() {
        let mut config = sample_config();
        config.rgb_effect = RgbEffect::Wave as u8;

        let mut profile = decode_profile(&config);
        assert_eq!(profile.body_led().mode, LedMode::Cycle);
        profile.body_led_mut().color = Color::new(1, 2, 3);

        encode_profile(&profile, &mut config);
        // Wave is unreachable on write; cycle collapses to the rainbow effect.
        assert_eq!(config.rgb_effect, RgbEffect::Glorious as u8);
        // The single-color field was not touched.
        assert_eq!(config.single_color, color_to_raw(Color::new(0xAA, 0xBB, 0xCC)));
    }

    #[test]
    fn encode_indicator_colors() {
        let mut config = sample_config();
        let mut profile = decode_profile(&config);
        profile.indicator_led_mut(0).unwrap().color = Color::new(9, 8, 7);

        encode_profile(&profile, &mut config);
        assert_eq!(config.dpi_color[0], color_to_raw(Color::new(9, 8, 7)));
        // Untouched indicators re-encode their decoded colors.
        assert_eq!(config.dpi_color[1], color_to_raw(Color::new(0x11, 0x21, 0x31)));
    }

    #[test]
    fn encode_preserves_unmodeled_fields() {
        let mut config = sample_config();
        config.glorious_mode = 0x42;
        config.tail_mode = 0x23;
        config.lift_off_distance = 0x2;

        let profile = decode_profile(&config);
        encode_profile(&profile, &mut config);

        assert_eq!(config.glorious_mode, 0x42);
        assert_eq!(config.tail_mode, 0x23);
        assert_eq!(config.lift_off_distance, 0x2);
    }
}
