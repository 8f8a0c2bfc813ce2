// Fixed-width readers for radio frame fields
// All multi-byte fields in the KX3 memory protocol are big-endian

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    #[error("Insufficient data: expected {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ElementError>;

fn require(data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(ElementError::InsufficientData {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Read a u16 in big-endian format
pub fn read_u16_be(data: &[u8]) -> Result<u16> {
    require(data, 2)?;
    Ok(u16::from_be_bytes([data[0], data[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_read() {
        assert_eq!(read_u16_be(&[0x0C, 0x40]).unwrap(), 0x0C40);
        assert_eq!(read_u16_be(&[0x02, 0xA2, 0xFF]).unwrap(), 0x02A2);
    }

    #[test]
    fn test_insufficient_data() {
        let data = [0x12];
        assert_eq!(
            read_u16_be(&data),
            Err(ElementError::InsufficientData {
                expected: 2,
                actual: 1
            })
        );
        assert!(read_u16_be(&[]).is_err());
    }
}
