use std::fmt;
use num_enum::TryFromPrimitive;

/// Debug name of the variant, or the raw value in hex when there is none.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Compression ratio `output / input`, 0.0 for an empty input.
pub fn ratio(input_len: usize, output_len: usize) -> f64 {
    if input_len == 0 {
        0.0
    } else {
        output_len as f64 / input_len as f64
    }
}
