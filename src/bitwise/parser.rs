// Parser combinators using nom for fixed-layout radio frames

use nom::{
    bytes::complete::take,
    error::Error,
    number::complete::{be_i32, be_u16, be_u8},
    IResult,
};

/// Parse a single byte
pub fn parse_u8(input: &[u8]) -> IResult<&[u8], u8> {
    be_u8(input)
}

/// Parse a u16 big-endian
pub fn parse_u16_be(input: &[u8]) -> IResult<&[u8], u16> {
    be_u16(input)
}

/// Parse an i32 big-endian
pub fn parse_i32_be(input: &[u8]) -> IResult<&[u8], i32> {
    be_i32(input)
}

/// Parse a fixed-size byte group
pub fn parse_array<const N: usize>(input: &[u8]) -> IResult<&[u8], [u8; N]> {
    let (input, bytes) = take::<usize, &[u8], Error<&[u8]>>(N)(input)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok((input, out))
}

/// Skip `count` bytes of padding
pub fn skip(count: usize) -> impl Fn(&[u8]) -> IResult<&[u8], ()> {
    move |input: &[u8]| {
        let (input, _) = take::<usize, &[u8], Error<&[u8]>>(count)(input)?;
        Ok((input, ()))
    }
}

/// Sequential field reader that decodes as much of a frame as is present.
///
/// Once a field does not fit, that field and every field after it read as
/// `None`. A later, smaller field is never read from a misaligned position.
#[derive(Debug, Clone)]
pub struct PrefixReader<'a> {
    input: &'a [u8],
    exhausted: bool,
}

impl<'a> PrefixReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            exhausted: false,
        }
    }

    fn field<O, F>(&mut self, parser: F) -> Option<O>
    where
        F: FnOnce(&'a [u8]) -> IResult<&'a [u8], O>,
    {
        if self.exhausted {
            return None;
        }
        match parser(self.input) {
            Ok((rest, value)) => {
                self.input = rest;
                Some(value)
            }
            Err(_) => {
                self.exhausted = true;
                None
            }
        }
    }

    pub fn u8(&mut self) -> Option<u8> {
        self.field(parse_u8)
    }

    pub fn u16_be(&mut self) -> Option<u16> {
        self.field(parse_u16_be)
    }

    pub fn i32_be(&mut self) -> Option<i32> {
        self.field(parse_i32_be)
    }

    pub fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.field(parse_array::<N>)
    }

    pub fn skip(&mut self, count: usize) -> Option<()> {
        self.field(skip(count))
    }

    /// Whether a field has already failed to fit
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers() {
        let data = [0x0C, 0x40, 0x40];
        let (rest, value) = parse_u16_be(&data).unwrap();
        assert_eq!(value, 0x0C40);
        let (rest, len) = parse_u8(rest).unwrap();
        assert_eq!(len, 0x40);
        assert!(rest.is_empty());

        let (_, value) = parse_i32_be(&[0x00, 0x00, 0x00, 0xE5]).unwrap();
        assert_eq!(value, 0xE5);
    }

    #[test]
    fn test_parse_array_and_skip() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        let (rest, group) = parse_array::<5>(&data).unwrap();
        assert_eq!(group, [1, 2, 3, 4, 5]);
        let (rest, ()) = skip(2)(rest).unwrap();
        assert_eq!(rest, &[8]);

        assert!(parse_array::<5>(&data[..4]).is_err());
        assert!(skip(3)(&data[..2]).is_err());
    }

    #[test]
    fn test_prefix_reader_full() {
        let data = [0x0C, 0x00, 0x40, 9, 9, 9, 9, 9];
        let mut reader = PrefixReader::new(&data);
        assert_eq!(reader.u16_be(), Some(0x0C00));
        assert_eq!(reader.u8(), Some(0x40));
        assert_eq!(reader.array::<5>(), Some([9; 5]));
        assert!(!reader.is_exhausted());
        // Nothing left for another field
        assert_eq!(reader.u8(), None);
    }

    #[test]
    fn test_prefix_reader_stops_at_first_gap() {
        // Three bytes left when a five-byte group is requested
        let data = [0x0C, 0x00, 0x40, 1, 2, 3];
        let mut reader = PrefixReader::new(&data);
        assert_eq!(reader.u16_be(), Some(0x0C00));
        assert_eq!(reader.u8(), Some(0x40));
        assert_eq!(reader.array::<5>(), None);
        // A single byte is still available, but it is not at the right offset
        assert_eq!(reader.u8(), None);
        assert!(reader.is_exhausted());
    }
}
