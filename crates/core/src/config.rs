//! The SinoWealth configuration report: a fixed-layout binary record.
//!
//! The device keeps its whole configuration in one feature report (ID 0x4).
//! The meaningful record is [`CONFIG_LEN`] bytes; the feature-report transfer
//! itself is always [`CONFIG_REPORT_LEN`] bytes with the tail zero-padded.
//! All multi-value bytes are unpacked here with explicit shifts and masks so
//! the layout never depends on in-memory struct representation.
//!
//! Protocol reference: libratbag (MIT), Glorious Model O family.

use crate::error::{Error, Result};

/// Feature report ID carrying the configuration record.
pub const REPORT_ID_CONFIG: u8 = 0x4;
/// Feature report ID carrying short commands.
pub const REPORT_ID_CMD: u8 = 0x5;

/// Command: read the 2-byte firmware revision.
pub const CMD_FIRMWARE_VERSION: u8 = 0x1;
/// Command: latch the config record for a subsequent feature-report read.
pub const CMD_GET_CONFIG: u8 = 0x11;
/// Command reports are always 6 bytes (report ID + command + padding).
pub const CMD_LEN: usize = 6;

/// Full config feature-report transfer length.
pub const CONFIG_REPORT_LEN: usize = 520;
/// Meaningful length of the configuration record.
pub const CONFIG_LEN: usize = 97;

/// Config byte bit: X and Y axes have independent DPI values.
pub const XY_INDEPENDENT: u8 = 0x80;
/// Value the write-flag byte must carry for the device to commit a write.
/// Reads always return 0 here.
pub const CONFIG_WRITE_MAGIC: u8 = 0x7B;

/// DPI slots exposed by the stock software. The record itself has room
/// for [`MAX_DPI_SLOTS`].
pub const NUM_DPI_SLOTS: usize = 6;
/// DPI slots the record layout can physically hold.
pub const MAX_DPI_SLOTS: usize = 8;

// Byte offsets within the record.
const OFF_REPORT_ID: usize = 0;
const OFF_COMMAND_ID: usize = 1;
const OFF_CONFIG_WRITE: usize = 3;
const OFF_CONFIG: usize = 10;
const OFF_DPI_NIBBLES: usize = 11;
const OFF_DPI_ENABLED: usize = 12;
const OFF_DPI: usize = 13;
const OFF_DPI_COLOR: usize = 29;
const OFF_RGB_EFFECT: usize = 53;
const OFF_GLORIOUS_MODE: usize = 54;
const OFF_GLORIOUS_DIRECTION: usize = 55;
const OFF_SINGLE_COLOR: usize = 56;
const OFF_BREATHING_MODE: usize = 59;
const OFF_BREATHING_COLOR_COUNT: usize = 60;
const OFF_BREATHING_COLORS: usize = 61;
const OFF_TAIL_MODE: usize = 82;
const OFF_RAVE_MODE: usize = 83;
const OFF_RAVE_COLORS: usize = 84;
const OFF_WAVE_MODE: usize = 90;
const OFF_BREATHING1_MODE: usize = 91;
const OFF_BREATHING1_COLOR: usize = 92;
const OFF_LIFT_OFF_DISTANCE: usize = 96;

/// A raw RGB triple exactly as stored in the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    fn read(data: &[u8], offset: usize) -> Self {
        Self {
            r: data[offset],
            g: data[offset + 1],
            b: data[offset + 2],
        }
    }

    fn write(&self, data: &mut [u8], offset: usize) {
        data[offset] = self.r;
        data[offset + 1] = self.g;
        data[offset + 2] = self.b;
    }
}

/// RGB lighting effects the firmware knows about.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbEffect {
    Off = 0x0,
    /// Rainbow cycle ("unicorn mode" in the stock software).
    Glorious = 0x1,
    /// Single constant color.
    Single = 0x2,
    /// Breathing through seven user-defined colors.
    Breathing7 = 0x3,
    Tail = 0x4,
    /// Full-RGB breathing.
    Breathing = 0x5,
    Rave = 0x7,
    Wave = 0x9,
    /// Single-color breathing.
    Breathing1 = 0xA,
}

impl RgbEffect {
    /// Decode an effect selector byte. Unknown values yield `None`.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x0 => Some(Self::Off),
            0x1 => Some(Self::Glorious),
            0x2 => Some(Self::Single),
            0x3 => Some(Self::Breathing7),
            0x4 => Some(Self::Tail),
            0x5 => Some(Self::Breathing),
            0x7 => Some(Self::Rave),
            0x9 => Some(Self::Wave),
            0xA => Some(Self::Breathing1),
            _ => None,
        }
    }
}

/// Lift-off distance setting stored at the record's tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftOffDistance {
    Mm2 = 0x1,
    Mm3 = 0x2,
}

impl LiftOffDistance {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x1 => Some(Self::Mm2),
            0x2 => Some(Self::Mm3),
            _ => None,
        }
    }
}

/// The decoded configuration record.
///
/// Field order follows the wire layout. Reserved bytes are kept verbatim so a
/// record read from the device survives an edit-then-write cycle untouched
/// wherever the semantic model has no opinion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigReport {
    pub report_id: u8,
    pub command_id: u8,
    reserved_a: u8,
    /// 0 when read from the device; must be [`CONFIG_WRITE_MAGIC`] on write.
    pub config_write: u8,
    reserved_b: [u8; 6],
    /// Device config flags; bit [`XY_INDEPENDENT`] doubles the DPI stride.
    pub config: u8,
    /// Low nibble of byte 11.
    pub dpi_count: u8,
    /// High nibble of byte 11; 1-based index of the active DPI slot.
    pub active_dpi: u8,
    /// Per-slot disable bitmask. Bit set means the slot is DISABLED.
    pub dpi_enabled: u8,
    /// Raw DPI bytes: one per slot, or X/Y pairs at `2i`/`2i+1` when the
    /// [`XY_INDEPENDENT`] bit is set.
    pub dpi: [u8; 16],
    /// Indicator color shown while the corresponding DPI slot is active.
    pub dpi_color: [Rgb8; MAX_DPI_SLOTS],
    /// Effect selector, see [`RgbEffect`].
    pub rgb_effect: u8,
    /// 0x40 = brightness (constant); 0x1/0x2/0x3 = speed.
    pub glorious_mode: u8,
    pub glorious_direction: u8,
    pub single_color: Rgb8,
    /// 0x40 = brightness (constant); 0x1/0x2/0x3 = speed.
    pub breathing_mode: u8,
    /// Always 7.
    pub breathing_color_count: u8,
    pub breathing_colors: [Rgb8; 7],
    /// 0x10/0x20/0x30/0x40 = brightness; 0x1/0x2/0x3 = speed.
    pub tail_mode: u8,
    /// 0x10/0x20/0x30/0x40 = brightness; 0x1/0x2/0x3 = speed.
    pub rave_mode: u8,
    pub rave_colors: [Rgb8; 2],
    /// 0x10/0x20/0x30/0x40 = brightness; 0x1/0x2/0x3 = speed.
    pub wave_mode: u8,
    /// 0x1/0x2/0x3 = speed.
    pub breathing1_mode: u8,
    pub breathing1_color: Rgb8,
    reserved_c: u8,
    /// See [`LiftOffDistance`].
    pub lift_off_distance: u8,
}

impl ConfigReport {
    /// Parse a record from the leading bytes of a config feature report.
    ///
    /// Fails with [`Error::ReadTooShort`] if fewer than [`CONFIG_LEN`] bytes
    /// are available; the device pads reads to 520 bytes but short transfers
    /// do happen on flaky transports.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < CONFIG_LEN {
            return Err(Error::ReadTooShort {
                needed: CONFIG_LEN,
                actual: data.len(),
            });
        }

        let mut dpi = [0u8; 16];
        dpi.copy_from_slice(&data[OFF_DPI..OFF_DPI + 16]);

        let mut dpi_color = [Rgb8::default(); MAX_DPI_SLOTS];
        for (i, color) in dpi_color.iter_mut().enumerate() {
            *color = Rgb8::read(data, OFF_DPI_COLOR + i * 3);
        }

        let mut breathing_colors = [Rgb8::default(); 7];
        for (i, color) in breathing_colors.iter_mut().enumerate() {
            *color = Rgb8::read(data, OFF_BREATHING_COLORS + i * 3);
        }

        let mut rave_colors = [Rgb8::default(); 2];
        for (i, color) in rave_colors.iter_mut().enumerate() {
            *color = Rgb8::read(data, OFF_RAVE_COLORS + i * 3);
        }

        let mut reserved_b = [0u8; 6];
        reserved_b.copy_from_slice(&data[OFF_CONFIG_WRITE + 1..OFF_CONFIG]);

        let nibbles = data[OFF_DPI_NIBBLES];

        Ok(Self {
            report_id: data[OFF_REPORT_ID],
            command_id: data[OFF_COMMAND_ID],
            reserved_a: data[OFF_COMMAND_ID + 1],
            config_write: data[OFF_CONFIG_WRITE],
            reserved_b,
            config: data[OFF_CONFIG],
            dpi_count: nibbles & 0x0F,
            active_dpi: nibbles >> 4,
            dpi_enabled: data[OFF_DPI_ENABLED],
            dpi,
            dpi_color,
            rgb_effect: data[OFF_RGB_EFFECT],
            glorious_mode: data[OFF_GLORIOUS_MODE],
            glorious_direction: data[OFF_GLORIOUS_DIRECTION],
            single_color: Rgb8::read(data, OFF_SINGLE_COLOR),
            breathing_mode: data[OFF_BREATHING_MODE],
            breathing_color_count: data[OFF_BREATHING_COLOR_COUNT],
            breathing_colors,
            tail_mode: data[OFF_TAIL_MODE],
            rave_mode: data[OFF_RAVE_MODE],
            rave_colors,
            wave_mode: data[OFF_WAVE_MODE],
            breathing1_mode: data[OFF_BREATHING1_MODE],
            breathing1_color: Rgb8::read(data, OFF_BREATHING1_COLOR),
            reserved_c: data[OFF_LIFT_OFF_DISTANCE - 1],
            lift_off_distance: data[OFF_LIFT_OFF_DISTANCE],
        })
    }

    /// Serialize the record into its exact wire layout.
    pub fn to_bytes(&self) -> [u8; CONFIG_LEN] {
        let mut buf = [0u8; CONFIG_LEN];

        buf[OFF_REPORT_ID] = self.report_id;
        buf[OFF_COMMAND_ID] = self.command_id;
        buf[OFF_COMMAND_ID + 1] = self.reserved_a;
        buf[OFF_CONFIG_WRITE] = self.config_write;
        buf[OFF_CONFIG_WRITE + 1..OFF_CONFIG].copy_from_slice(&self.reserved_b);
        buf[OFF_CONFIG] = self.config;
        buf[OFF_DPI_NIBBLES] = (self.active_dpi << 4) | (self.dpi_count & 0x0F);
        buf[OFF_DPI_ENABLED] = self.dpi_enabled;
        buf[OFF_DPI..OFF_DPI + 16].copy_from_slice(&self.dpi);
        for (i, color) in self.dpi_color.iter().enumerate() {
            color.write(&mut buf, OFF_DPI_COLOR + i * 3);
        }
        buf[OFF_RGB_EFFECT] = self.rgb_effect;
        buf[OFF_GLORIOUS_MODE] = self.glorious_mode;
        buf[OFF_GLORIOUS_DIRECTION] = self.glorious_direction;
        self.single_color.write(&mut buf, OFF_SINGLE_COLOR);
        buf[OFF_BREATHING_MODE] = self.breathing_mode;
        buf[OFF_BREATHING_COLOR_COUNT] = self.breathing_color_count;
        for (i, color) in self.breathing_colors.iter().enumerate() {
            color.write(&mut buf, OFF_BREATHING_COLORS + i * 3);
        }
        buf[OFF_TAIL_MODE] = self.tail_mode;
        buf[OFF_RAVE_MODE] = self.rave_mode;
        for (i, color) in self.rave_colors.iter().enumerate() {
            color.write(&mut buf, OFF_RAVE_COLORS + i * 3);
        }
        buf[OFF_WAVE_MODE] = self.wave_mode;
        buf[OFF_BREATHING1_MODE] = self.breathing1_mode;
        self.breathing1_color.write(&mut buf, OFF_BREATHING1_COLOR);
        buf[OFF_LIFT_OFF_DISTANCE - 1] = self.reserved_c;
        buf[OFF_LIFT_OFF_DISTANCE] = self.lift_off_distance;

        buf
    }

    /// Serialize into a full-size transfer buffer: the record in the leading
    /// bytes, zero padding up to [`CONFIG_REPORT_LEN`].
    pub fn to_transfer_buf(&self) -> Vec<u8> {
        let mut buf = vec![0u8; CONFIG_REPORT_LEN];
        buf[..CONFIG_LEN].copy_from_slice(&self.to_bytes());
        buf
    }

    /// Whether the X and Y axes carry independent DPI values.
    pub fn xy_independent(&self) -> bool {
        self.config & XY_INDEPENDENT != 0
    }

    pub fn set_xy_independent(&mut self, independent: bool) {
        if independent {
            self.config |= XY_INDEPENDENT;
        } else {
            self.config &= !XY_INDEPENDENT;
        }
    }

    /// Whether slot `index` is disabled (the bitmask is inverted on the wire).
    pub fn slot_disabled(&self, index: usize) -> bool {
        self.dpi_enabled & (1 << index) != 0
    }

    pub fn set_slot_enabled(&mut self, index: usize, enabled: bool) {
        if enabled {
            self.dpi_enabled &= !(1 << index);
        } else {
            self.dpi_enabled |= 1 << index;
        }
    }
}

/// Build a 6-byte command feature report.
pub fn build_command(command_id: u8) -> [u8; CMD_LEN] {
    let mut buf = [0u8; CMD_LEN];
    buf[0] = REPORT_ID_CMD;
    buf[1] = command_id;
    buf
}
