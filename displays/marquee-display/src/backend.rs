//! Display backend trait
//!
//! The panel side of the frame buffer: anything that can take one
//! 8-pixel-high page of column bytes (SSD1306, SH1106 and friends over I2C
//! or SPI, or a test double).

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Page or column outside the panel
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// Page-addressed monochrome panel
pub trait DisplayBackend {
    /// Write `data` to `page`, starting at `column`
    ///
    /// Each byte is one column of 8 vertical pixels, LSB on top.
    fn write_page(&mut self, page: u8, column: u8, data: &[u8]) -> Result<(), DisplayError>;

    /// Panel size in pixels (width, height)
    fn pixel_dimensions(&self) -> (u16, u16);

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}
