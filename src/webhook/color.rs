//! Severity to embed colour mapping.

use crate::level::DislogLevel;

pub const RED: u32 = 0xFF0000;
pub const YELLOW: u32 = 0xFFFF00;
pub const PLUM: u32 = 0x5A0D36;
pub const WHITE: u32 = 0xFFFFFF;

/// Embed colour (24-bit RGB) for each level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorMap {
    pub trace: u32,
    pub debug: u32,
    pub info: u32,
    pub warn: u32,
    pub error: u32,
    pub critical: u32,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            trace: PLUM,
            debug: PLUM,
            info: WHITE,
            warn: YELLOW,
            error: RED,
            critical: RED,
        }
    }
}

impl ColorMap {
    pub fn color_for(&self, level: DislogLevel) -> u32 {
        match level {
            DislogLevel::Trace => self.trace,
            DislogLevel::Debug => self.debug,
            DislogLevel::Info => self.info,
            DislogLevel::Warn => self.warn,
            DislogLevel::Error => self.error,
            DislogLevel::Critical => self.critical,
        }
    }

    /// Override the colour for a single level. Values are masked to 24 bits.
    pub fn with(mut self, level: DislogLevel, color: u32) -> Self {
        let color = color & 0xFF_FF_FF;
        let slot = match level {
            DislogLevel::Trace => &mut self.trace,
            DislogLevel::Debug => &mut self.debug,
            DislogLevel::Info => &mut self.info,
            DislogLevel::Warn => &mut self.warn,
            DislogLevel::Error => &mut self.error,
            DislogLevel::Critical => &mut self.critical,
        };
        *slot = color;
        self
    }
}
