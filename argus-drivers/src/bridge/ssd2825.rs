//! SSD2825 SPI to MIPI-DSI bridge driver
//!
//! The SSD2825 converts a 4-wire SPI command stream into MIPI-DSI
//! packets. The watchdog path only needs the generic/DCS packet engine;
//! video timing and PLL bring-up happen once at panel attach and are not
//! touched here.
//!
//! # SPI protocol (4-wire mode)
//!
//! Every access is one chip-select frame. The driver owns the CS and D/C
//! lines:
//!
//! - Register writes: CS low, D/C low for the one-byte register index,
//!   D/C high for the 16-bit little-endian value, CS high
//! - Register reads: select the read path via `SPI_READ_CTRL`, then frame
//!   the register index and clock out two bytes
//! - Downstream packets: payload bytes are streamed through the packet
//!   drop register after programming the packet size
//!
//! # Reads from the panel
//!
//! A DCS read turns the DSI bus around. The bridge raises a bit in the
//! interrupt status register once the panel's return data (or the lack
//! of it) has been latched; the return data count register then tells
//! whether the panel acknowledged at all.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::{BridgeError, DsiHostBridge};

/// SSD2825 register addresses
pub mod reg {
    /// Device identification
    pub const DEVICE_ID: u8 = 0xB0;
    /// Bridge configuration
    pub const CONFIGURATION: u8 = 0xB7;
    /// Virtual channel control
    pub const VC_CTRL: u8 = 0xB8;
    /// PLL enable
    pub const PLL_CTRL: u8 = 0xB9;
    /// PLL multiplier/divider configuration
    pub const PLL_CONFIGURATION: u8 = 0xBA;
    /// Clock control
    pub const CLOCK_CTRL: u8 = 0xBB;
    /// Transmit packet size, low word
    pub const PACKET_SIZE_CTRL_1: u8 = 0xBC;
    /// Transmit packet size, high word
    pub const PACKET_SIZE_CTRL_2: u8 = 0xBD;
    /// Transmit packet count
    pub const PACKET_SIZE_CTRL_3: u8 = 0xBE;
    /// Packet payload FIFO
    pub const PACKET_DROP: u8 = 0xBF;
    /// Operation control
    pub const OPERATION_CTRL: u8 = 0xC0;
    /// Maximum return packet size
    pub const MAX_RETURN_SIZE: u8 = 0xC1;
    /// Bytes the panel actually returned
    pub const RETURN_DATA_COUNT: u8 = 0xC2;
    /// Acknowledge and error report from the panel
    pub const ACK_RESPONSE: u8 = 0xC3;
    /// Line control
    pub const LINE_CTRL: u8 = 0xC4;
    /// Interrupt enable
    pub const INTERRUPT_CTRL: u8 = 0xC5;
    /// Latched interrupt status
    pub const INTERRUPT_STATUS: u8 = 0xC6;
    /// DSI error status
    pub const ERROR_STATUS: u8 = 0xC7;
    /// Read path select
    pub const SPI_READ_CTRL: u8 = 0xD4;
    /// Return data FIFO
    pub const READ_DATA: u8 = 0xFF;
}

/// Value written to `SPI_READ_CTRL` to route register reads out over SPI
const SPI_READ_SELECT: u16 = 0x00FA;

/// Configuration register bits
pub const CONF_HS: u16 = 1 << 0;
pub const CONF_CKE: u16 = 1 << 1;
pub const CONF_SLP: u16 = 1 << 2;
pub const CONF_VEN: u16 = 1 << 3;
pub const CONF_HCLK: u16 = 1 << 4;
pub const CONF_CSS: u16 = 1 << 5;
pub const CONF_DCS: u16 = 1 << 6;
pub const CONF_REN: u16 = 1 << 7;
pub const CONF_ECD: u16 = 1 << 8;
pub const CONF_EOT: u16 = 1 << 9;

/// Interrupt status: panel return data latched
const INT_READ_COMPLETE: u16 = 1 << 0;

/// Bridge polling configuration
#[derive(Debug, Clone)]
pub struct Ssd2825Config {
    /// Maximum status polls before a read is declared timed out
    pub read_poll_limit: u8,
    /// Delay between status polls in microseconds
    pub read_poll_interval_us: u32,
}

impl Default for Ssd2825Config {
    fn default() -> Self {
        Self {
            read_poll_limit: 20,
            read_poll_interval_us: 50,
        }
    }
}

/// SSD2825 bridge transport
pub struct Ssd2825<SPI, CS, DC, D> {
    spi: SPI,
    cs: CS,
    dc: DC,
    delay: D,
    config: Ssd2825Config,
}

impl<SPI, CS, DC, D> Ssd2825<SPI, CS, DC, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    D: DelayNs,
{
    /// Create a new bridge transport
    ///
    /// The CS line is released immediately.
    pub fn new(spi: SPI, cs: CS, dc: DC, delay: D, config: Ssd2825Config) -> Self {
        let mut bridge = Self {
            spi,
            cs,
            dc,
            delay,
            config,
        };
        let _ = bridge.cs.set_high();
        bridge
    }

    /// Close a chip-select frame, preserving the frame's own error
    fn end_frame(&mut self, result: Result<(), BridgeError>) -> Result<(), BridgeError> {
        let cs = self.cs.set_high().map_err(|_| BridgeError::Pin);
        result.and(cs)
    }

    fn index_phase(&mut self, index: u8) -> Result<(), BridgeError> {
        self.dc.set_low().map_err(|_| BridgeError::Pin)?;
        self.spi.write(&[index]).map_err(|_| BridgeError::Spi)?;
        self.dc.set_high().map_err(|_| BridgeError::Pin)
    }

    fn reg_write_frame(&mut self, index: u8, value: u16) -> Result<(), BridgeError> {
        self.index_phase(index)?;
        self.spi
            .write(&value.to_le_bytes())
            .map_err(|_| BridgeError::Spi)
    }

    fn reg_read_frame(&mut self, index: u8) -> Result<u16, BridgeError> {
        self.index_phase(index)?;
        let mut buf = [0u8; 2];
        self.spi.read(&mut buf).map_err(|_| BridgeError::Spi)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn packet_frame(&mut self, cmd: u8, params: &[u8]) -> Result<(), BridgeError> {
        self.index_phase(reg::PACKET_DROP)?;
        self.spi.write(&[cmd]).map_err(|_| BridgeError::Spi)?;
        if !params.is_empty() {
            self.spi.write(params).map_err(|_| BridgeError::Spi)?;
        }
        Ok(())
    }

    /// Write a 16-bit bridge register
    pub fn write_reg(&mut self, index: u8, value: u16) -> Result<(), BridgeError> {
        self.cs.set_low().map_err(|_| BridgeError::Pin)?;
        let result = self.reg_write_frame(index, value);
        self.end_frame(result)
    }

    /// Read a 16-bit bridge register
    pub fn read_reg(&mut self, index: u8) -> Result<u16, BridgeError> {
        self.write_reg(reg::SPI_READ_CTRL, SPI_READ_SELECT)?;
        self.cs.set_low().map_err(|_| BridgeError::Pin)?;
        let result = self.reg_read_frame(index);
        let cs = self.cs.set_high().map_err(|_| BridgeError::Pin);
        let value = result?;
        cs?;
        Ok(value)
    }

    /// Read the bridge's device identification register
    pub fn device_id(&mut self) -> Result<u16, BridgeError> {
        self.read_reg(reg::DEVICE_ID)
    }
}

impl<SPI, CS, DC, D> DsiHostBridge for Ssd2825<SPI, CS, DC, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    D: DelayNs,
{
    fn dcs_write(&mut self, cmd: u8, params: &[u8]) -> Result<(), BridgeError> {
        self.write_reg(reg::CONFIGURATION, CONF_DCS | CONF_EOT)?;
        self.write_reg(reg::PACKET_SIZE_CTRL_1, (params.len() + 1) as u16)?;
        self.cs.set_low().map_err(|_| BridgeError::Pin)?;
        let result = self.packet_frame(cmd, params);
        self.end_frame(result)
    }

    fn dcs_read(&mut self, cmd: u8, buf: &mut [u8]) -> Result<usize, BridgeError> {
        self.write_reg(reg::CONFIGURATION, CONF_DCS | CONF_EOT | CONF_REN)?;
        self.write_reg(reg::MAX_RETURN_SIZE, buf.len() as u16)?;
        // Writing the latched status clears it.
        self.write_reg(reg::INTERRUPT_STATUS, 0)?;
        self.write_reg(reg::PACKET_SIZE_CTRL_1, 1)?;
        self.cs.set_low().map_err(|_| BridgeError::Pin)?;
        let sent = self.packet_frame(cmd, &[]);
        self.end_frame(sent)?;

        let mut polls = 0;
        loop {
            let status = self.read_reg(reg::INTERRUPT_STATUS)?;
            if status & INT_READ_COMPLETE != 0 {
                break;
            }
            polls += 1;
            if polls >= self.config.read_poll_limit {
                return Err(BridgeError::ReadTimeout);
            }
            self.delay.delay_us(self.config.read_poll_interval_us);
        }

        let count = self.read_reg(reg::RETURN_DATA_COUNT)? as usize;
        if count == 0 {
            return Err(BridgeError::NoAck);
        }

        let count = count.min(buf.len());
        for chunk in buf[..count].chunks_mut(2) {
            let word = self.read_reg(reg::READ_DATA)?.to_le_bytes();
            chunk[0] = word[0];
            if chunk.len() > 1 {
                chunk[1] = word[1];
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital;

    use crate::bridge::dcs;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum BusByte {
        Cmd(u8),
        Data(u8),
    }

    struct BusState {
        cs_low: bool,
        dc_high: bool,
        written: heapless::Vec<BusByte, 128>,
        reads: heapless::Deque<u8, 64>,
    }

    impl BusState {
        fn new() -> Self {
            Self {
                cs_low: false,
                dc_high: false,
                written: heapless::Vec::new(),
                reads: heapless::Deque::new(),
            }
        }

        fn queue_word(&mut self, word: u16) {
            for byte in word.to_le_bytes() {
                self.reads.push_back(byte).unwrap();
            }
        }
    }

    struct MockSpi<'a>(&'a RefCell<BusState>);

    impl embedded_hal::spi::ErrorType for MockSpi<'_> {
        type Error = Infallible;
    }

    impl SpiBus for MockSpi<'_> {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            let mut state = self.0.borrow_mut();
            assert!(state.cs_low, "SPI read with CS deasserted");
            for slot in words.iter_mut() {
                *slot = state.reads.pop_front().unwrap_or(0);
            }
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            let mut state = self.0.borrow_mut();
            assert!(state.cs_low, "SPI write with CS deasserted");
            for &b in words {
                let tagged = if state.dc_high {
                    BusByte::Data(b)
                } else {
                    BusByte::Cmd(b)
                };
                state.written.push(tagged).unwrap();
            }
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.write(write)?;
            self.read(read)
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            let copy = heapless::Vec::<u8, 64>::from_slice(words).unwrap();
            self.write(&copy)?;
            self.read(words)
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct MockCs<'a>(&'a RefCell<BusState>);

    impl digital::ErrorType for MockCs<'_> {
        type Error = Infallible;
    }

    impl digital::OutputPin for MockCs<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().cs_low = true;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().cs_low = false;
            Ok(())
        }
    }

    struct MockDc<'a>(&'a RefCell<BusState>);

    impl digital::ErrorType for MockDc<'_> {
        type Error = Infallible;
    }

    impl digital::OutputPin for MockDc<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dc_high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dc_high = true;
            Ok(())
        }
    }

    struct MockDelay;

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn bridge(
        state: &RefCell<BusState>,
    ) -> Ssd2825<MockSpi<'_>, MockCs<'_>, MockDc<'_>, MockDelay> {
        Ssd2825::new(
            MockSpi(state),
            MockCs(state),
            MockDc(state),
            MockDelay,
            Ssd2825Config::default(),
        )
    }

    #[test]
    fn test_write_reg_is_index_then_le_data() {
        let state = RefCell::new(BusState::new());
        let mut b = bridge(&state);

        b.write_reg(reg::MAX_RETURN_SIZE, 0x0102).unwrap();

        let s = state.borrow();
        assert_eq!(
            s.written.as_slice(),
            &[
                BusByte::Cmd(reg::MAX_RETURN_SIZE),
                BusByte::Data(0x02),
                BusByte::Data(0x01),
            ]
        );
        // Frame closed again.
        assert!(!s.cs_low);
    }

    #[test]
    fn test_dcs_write_streams_packet_through_drop_register() {
        let state = RefCell::new(BusState::new());
        let mut b = bridge(&state);

        b.dcs_write(0x29, &[]).unwrap();

        let conf = CONF_DCS | CONF_EOT;
        assert_eq!(
            state.borrow().written.as_slice(),
            &[
                BusByte::Cmd(reg::CONFIGURATION),
                BusByte::Data(conf.to_le_bytes()[0]),
                BusByte::Data(conf.to_le_bytes()[1]),
                BusByte::Cmd(reg::PACKET_SIZE_CTRL_1),
                BusByte::Data(0x01),
                BusByte::Data(0x00),
                BusByte::Cmd(reg::PACKET_DROP),
                BusByte::Data(0x29),
            ]
        );
    }

    #[test]
    fn test_dcs_read_happy_path() {
        let state = RefCell::new(BusState::new());
        {
            let mut s = state.borrow_mut();
            s.queue_word(INT_READ_COMPLETE); // status: data latched
            s.queue_word(1); // return count
            s.queue_word(0x009C); // the panel's power mode byte
        }
        let mut b = bridge(&state);

        let mut buf = [0u8; 1];
        let count = b.dcs_read(dcs::GET_POWER_MODE, &mut buf).unwrap();

        assert_eq!(count, 1);
        assert_eq!(buf[0], 0x9C);
    }

    #[test]
    fn test_dcs_read_times_out_when_status_never_latches() {
        let state = RefCell::new(BusState::new());
        let mut b = bridge(&state);

        let mut buf = [0u8; 1];
        let result = b.dcs_read(dcs::GET_POWER_MODE, &mut buf);

        assert_eq!(result, Err(BridgeError::ReadTimeout));
    }

    #[test]
    fn test_dcs_read_zero_return_is_nack() {
        let state = RefCell::new(BusState::new());
        {
            let mut s = state.borrow_mut();
            s.queue_word(INT_READ_COMPLETE);
            s.queue_word(0); // the panel never drove the bus back
        }
        let mut b = bridge(&state);

        let mut buf = [0u8; 1];
        let result = b.dcs_read(dcs::GET_POWER_MODE, &mut buf);

        assert_eq!(result, Err(BridgeError::NoAck));
    }
}
