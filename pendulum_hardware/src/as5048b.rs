use std::time::{Duration, Instant};
use tracing::trace;

use crate::error::{HwError, Result};
use pendulum_traits::{AngleSensor, BoxedError};

/// AS5048B angle register, first of two bytes (MSB then 6-bit LSB).
const ANGLE_REG: u8 = 0xFE;

/// AS5048B 14-bit magnetic rotary encoder on I2C.
pub struct As5048b {
    i2c: rppal::i2c::I2c,
}

impl As5048b {
    pub fn new(bus: u8, addr: u16) -> Result<Self> {
        let mut i2c = rppal::i2c::I2c::with_bus(bus).map_err(|e| HwError::I2c(e.to_string()))?;
        i2c.set_slave_address(addr)
            .map_err(|e| HwError::I2c(e.to_string()))?;
        Ok(Self { i2c })
    }

    /// Read the angle register, retrying bus errors until `timeout`.
    pub fn read_with_timeout(&mut self, timeout: Duration) -> Result<u16> {
        let deadline = Instant::now() + timeout;
        let mut buf = [0u8; 2];
        loop {
            match self.i2c.write_read(&[ANGLE_REG], &mut buf) {
                Ok(()) => {
                    // 8 MSBs in the first byte, 6 LSBs in the second.
                    let raw = (u16::from(buf[0]) << 6) | u16::from(buf[1] & 0x3F);
                    trace!(raw, "as5048b raw read");
                    return Ok(raw);
                }
                Err(e) => {
                    if Instant::now() >= deadline {
                        return Err(HwError::I2c(e.to_string()));
                    }
                    std::thread::sleep(Duration::from_micros(200));
                }
            }
        }
    }
}

impl AngleSensor for As5048b {
    fn read_raw(&mut self, timeout: Duration) -> std::result::Result<u16, BoxedError> {
        self.read_with_timeout(timeout).map_err(|e| {
            tracing::error!("sensor read error: {}", e);
            Box::new(e) as BoxedError
        })
    }
}
