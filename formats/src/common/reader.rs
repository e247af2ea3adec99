use std::io::ErrorKind::UnexpectedEof;
use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::ParserError;
use crate::common::types::{C2Vector, C3Vector, CAaBox};

pub(crate) trait Parseable<T> {
    fn parse<R: Read>(rdr: &mut R) -> Result<T, ParserError>;
}

impl Parseable<C3Vector> for C3Vector {
    fn parse<R: Read>(rdr: &mut R) -> Result<C3Vector, ParserError> {
        Ok(C3Vector {
            x: rdr.read_f32::<LittleEndian>()?,
            y: rdr.read_f32::<LittleEndian>()?,
            z: rdr.read_f32::<LittleEndian>()?,
        })
    }
}

impl Parseable<C2Vector> for C2Vector {
    fn parse<R: Read>(rdr: &mut R) -> Result<C2Vector, ParserError> {
        Ok(C2Vector {
            x: rdr.read_f32::<LittleEndian>()?,
            y: rdr.read_f32::<LittleEndian>()?,
        })
    }
}

impl Parseable<CAaBox> for CAaBox {
    fn parse<R: Read>(rdr: &mut R) -> Result<CAaBox, ParserError> {
        Ok(CAaBox {
            min: C3Vector::parse(rdr)?,
            max: C3Vector::parse(rdr)?,
        })
    }
}

impl Parseable<u8> for u8 {
    fn parse<R: Read>(rdr: &mut R) -> Result<u8, ParserError> {
        Ok(rdr.read_u8()?)
    }
}

impl Parseable<i8> for i8 {
    fn parse<R: Read>(rdr: &mut R) -> Result<i8, ParserError> {
        Ok(rdr.read_i8()?)
    }
}

impl Parseable<u16> for u16 {
    fn parse<R: Read>(rdr: &mut R) -> Result<u16, ParserError> {
        Ok(rdr.read_u16::<LittleEndian>()?)
    }
}

impl Parseable<i16> for i16 {
    fn parse<R: Read>(rdr: &mut R) -> Result<i16, ParserError> {
        Ok(rdr.read_i16::<LittleEndian>()?)
    }
}

impl Parseable<u32> for u32 {
    fn parse<R: Read>(rdr: &mut R) -> Result<u32, ParserError> {
        Ok(rdr.read_u32::<LittleEndian>()?)
    }
}

impl Parseable<f32> for f32 {
    fn parse<R: Read>(rdr: &mut R) -> Result<f32, ParserError> {
        Ok(rdr.read_f32::<LittleEndian>()?)
    }
}

/// Backs the blanket `Parseable<Vec<T>>` impl emitted by `#[derive(Parse)]`: reads
/// `T` values until hitting EOF. Individual array fields are resolved through
/// `M2Reader::resolve_array`'s counted (size, offset) form instead, not through this.
pub(crate) fn read_chunk_array<T: Parseable<T>, R: Read>(rdr: &mut R) -> Result<Vec<T>, ParserError> {
    let mut list = Vec::<T>::new();
    let mut element = T::parse(rdr);
    while element.is_ok() {
        list.push(element?);
        element = T::parse(rdr);
    }

    match element {
        Err(ParserError::IOError(internal)) if internal.kind() == UnexpectedEof => (),
        err => return err.map(|_| Vec::with_capacity(0)),
    };
    Ok(list)
}
