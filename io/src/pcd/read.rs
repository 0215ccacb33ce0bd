use std::io::BufRead;

use pcr_common::{FieldKind, PointCloud, PointCloudHeader};

use super::Format;
use crate::{lzf, Error};

/// Parses a PCD stream into a point cloud.
pub fn read_pcd<R: BufRead>(mut reader: R) -> Result<PointCloud, Error> {
    let (header, format, points) = read_header(&mut reader)?;
    let stride = header.stride();
    let expected = points * stride;

    let data = match format {
        Format::Ascii => read_ascii(reader, &header, expected)?,
        Format::Binary => {
            let mut buf = Vec::with_capacity(expected);
            reader.read_to_end(&mut buf)?;
            if buf.len() < expected {
                return Err(Error::BodyTooShort {
                    expected,
                    actual: buf.len(),
                });
            }
            buf.truncate(expected);
            buf
        }
        Format::BinaryCompressed => read_compressed(reader, &header, points)?,
    };

    Ok(PointCloud {
        header,
        points,
        data,
    })
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<(PointCloudHeader, Format, usize), Error> {
    let mut header = PointCloudHeader::default();
    let mut width = None;
    let mut height = None;
    let mut points = None;
    let format;

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(Error::MissingValue("DATA".to_owned()));
        }
        if line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let key = match tokens.next() {
            Some(key) => key,
            None => continue,
        };
        let values: Vec<&str> = tokens.collect();
        if values.is_empty() {
            return Err(Error::MissingValue(key.to_owned()));
        }

        match key {
            "VERSION" => header.version = parse_token(values[0])?,
            "FIELDS" => header.fields = values.iter().map(|&v| v.to_owned()).collect(),
            "SIZE" => {
                header.sizes = { values.iter() }
                    .map(|&v| parse_token(v))
                    .collect::<Result<_, _>>()?;
            }
            "TYPE" => {
                header.kinds = { values.iter() }
                    .map(|&v| {
                        FieldKind::from_type_str(v).ok_or_else(|| Error::InvalidToken(v.to_owned()))
                    })
                    .collect::<Result<_, _>>()?;
            }
            "COUNT" => {
                header.counts = { values.iter() }
                    .map(|&v| parse_token(v))
                    .collect::<Result<_, _>>()?;
            }
            "WIDTH" => width = Some(parse_token(values[0])?),
            "HEIGHT" => height = Some(parse_token(values[0])?),
            "VIEWPOINT" => {
                header.viewpoint = { values.iter() }
                    .map(|&v| parse_token(v))
                    .collect::<Result<_, _>>()?;
            }
            "POINTS" => points = Some(parse_token(values[0])?),
            "DATA" => {
                format = match values[0] {
                    "ascii" => Format::Ascii,
                    "binary" => Format::Binary,
                    "binary_compressed" => Format::BinaryCompressed,
                    other => return Err(Error::UnknownDataFormat(other.to_owned())),
                };
                break;
            }
            other => log::debug!("ignoring unknown header entry {:?}", other),
        }
    }

    if header.fields.len() != header.sizes.len() {
        return Err(Error::ArityMismatch("SIZE"));
    }
    if header.fields.len() != header.kinds.len() {
        return Err(Error::ArityMismatch("TYPE"));
    }
    if header.fields.len() != header.counts.len() {
        return Err(Error::ArityMismatch("COUNT"));
    }

    let points = match points {
        Some(points) => points,
        None => width.unwrap_or(0) * height.unwrap_or(0),
    };
    header.width = width.unwrap_or(points);
    header.height = height.unwrap_or(if points > 0 { 1 } else { 0 });

    Ok((header, format, points))
}

fn parse_token<T: std::str::FromStr>(token: &str) -> Result<T, Error> {
    token
        .parse()
        .map_err(|_| Error::InvalidToken(token.to_owned()))
}

fn push_element(
    kind: FieldKind,
    size: usize,
    token: &str,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    match (kind, size) {
        (FieldKind::Float, 4) => out.extend(parse_token::<f32>(token)?.to_le_bytes()),
        (FieldKind::Float, 8) => out.extend(parse_token::<f64>(token)?.to_le_bytes()),
        (FieldKind::Unsigned, 1) => out.extend(parse_token::<u8>(token)?.to_le_bytes()),
        (FieldKind::Unsigned, 2) => out.extend(parse_token::<u16>(token)?.to_le_bytes()),
        (FieldKind::Unsigned, 4) => out.extend(parse_token::<u32>(token)?.to_le_bytes()),
        (FieldKind::Unsigned, 8) => out.extend(parse_token::<u64>(token)?.to_le_bytes()),
        (FieldKind::Signed, 1) => out.extend(parse_token::<i8>(token)?.to_le_bytes()),
        (FieldKind::Signed, 2) => out.extend(parse_token::<i16>(token)?.to_le_bytes()),
        (FieldKind::Signed, 4) => out.extend(parse_token::<i32>(token)?.to_le_bytes()),
        (FieldKind::Signed, 8) => out.extend(parse_token::<i64>(token)?.to_le_bytes()),
        (kind, size) => {
            return Err(Error::UnsupportedField {
                kind: kind.type_str(),
                size,
            })
        }
    }
    Ok(())
}

fn read_ascii<R: BufRead>(
    reader: R,
    header: &PointCloudHeader,
    expected: usize,
) -> Result<Vec<u8>, Error> {
    let mut data = Vec::with_capacity(expected);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        for i in 0..header.fields.len() {
            for _ in 0..header.counts[i] {
                let token = tokens
                    .next()
                    .ok_or_else(|| Error::InvalidToken(line.clone()))?;
                push_element(header.kinds[i], header.sizes[i], token, &mut data)?;
            }
        }
    }
    if data.len() < expected {
        return Err(Error::BodyTooShort {
            expected,
            actual: data.len(),
        });
    }
    data.truncate(expected);
    Ok(data)
}

/// A compressed body carries two `i32` lengths and an LZF stream whose
/// plain form is field-major; records are re-interleaved here.
fn read_compressed<R: BufRead>(
    mut reader: R,
    header: &PointCloudHeader,
    points: usize,
) -> Result<Vec<u8>, Error> {
    let mut lengths = [0u8; 8];
    reader.read_exact(&mut lengths)?;
    let compressed = i32::from_le_bytes(lengths[..4].try_into().unwrap()) as usize;
    let uncompressed = i32::from_le_bytes(lengths[4..].try_into().unwrap()) as usize;

    let mut buf = vec![0; compressed];
    reader.read_exact(&mut buf)?;

    let plain = lzf::decompress(&buf, uncompressed)?;
    if plain.len() != uncompressed {
        return Err(Error::UncompressedSize {
            expected: uncompressed,
            actual: plain.len(),
        });
    }
    let stride = header.stride();
    if plain.len() < points * stride {
        return Err(Error::BodyTooShort {
            expected: points * stride,
            actual: plain.len(),
        });
    }

    let mut data = vec![0; points * stride];
    let mut field_start = 0;
    let mut offset = 0;
    for i in 0..header.fields.len() {
        let block = header.sizes[i] * header.counts[i];
        for record in 0..points {
            let src = field_start + record * block;
            let dst = record * stride + offset;
            data[dst..dst + block].copy_from_slice(&plain[src..src + block]);
        }
        field_start += block * points;
        offset += block;
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn ascii_cloud() {
        let points: [[f32; 4]; 5] = [
            [0.352, -0.151, -0.106, 0.0],
            [-0.473, 0.292, -0.731, 0.0],
            [0.441, -0.734, 0.854, 2.0],
            [-0.46, -0.277, -0.916, 1.0],
            [0.968, 0.512, -0.998, 1.0],
        ];
        let mut text = String::from(
            "# .PCD v0.7 - Point Cloud Data file format\n\
             VERSION 0.7\n\
             FIELDS x y z label\n\
             SIZE 4 4 4 4\n\
             TYPE F F F U\n\
             COUNT 1 1 1 1\n\
             WIDTH 5\n\
             HEIGHT 1\n\
             VIEWPOINT 0 0 0 1 0 0 0\n\
             POINTS 5\n\
             DATA ascii\n",
        );
        for p in &points {
            text += &format!("{} {} {} {}\n", p[0], p[1], p[2], p[3] as u32);
        }

        let pp = read_pcd(Cursor::new(text)).unwrap();
        assert_eq!(pp.points, 5);
        assert_eq!(pp.header.stride(), 16);

        let vt = pp.vec3_iter().unwrap();
        let lt = pp.uint32_iter("label").unwrap();
        for (i, p) in points.iter().enumerate() {
            let v = vt.vec3_at(i);
            assert_eq!([v.x, v.y, v.z], [p[0], p[1], p[2]]);
            assert_eq!(lt.uint32_at(i), p[3] as u32);
        }
    }

    #[test]
    fn binary_cloud() {
        let header = "VERSION 0.7\nFIELDS x\nSIZE 4\nTYPE F\nCOUNT 1\n\
                      WIDTH 2\nHEIGHT 1\nPOINTS 2\nDATA binary\n";
        let mut raw = header.as_bytes().to_vec();
        raw.extend(1.5f32.to_le_bytes());
        raw.extend((-2.5f32).to_le_bytes());

        let pp = read_pcd(Cursor::new(raw)).unwrap();
        let it = pp.float32_iter("x").unwrap();
        assert_eq!(it.float32_at(0), 1.5);
        assert_eq!(it.float32_at(1), -2.5);
    }

    #[test]
    fn binary_compressed_cloud_is_transposed() {
        // two records of (x: f32, label: u32), stored field-major
        let mut plain = Vec::new();
        plain.extend(1.0f32.to_le_bytes());
        plain.extend(2.0f32.to_le_bytes());
        plain.extend(10u32.to_le_bytes());
        plain.extend(20u32.to_le_bytes());
        let packed = lzf::compress(&plain);

        let header = "VERSION 0.7\nFIELDS x label\nSIZE 4 4\nTYPE F U\nCOUNT 1 1\n\
                      WIDTH 2\nHEIGHT 1\nPOINTS 2\nDATA binary_compressed\n";
        let mut raw = header.as_bytes().to_vec();
        raw.extend((packed.len() as i32).to_le_bytes());
        raw.extend((plain.len() as i32).to_le_bytes());
        raw.extend(&packed);

        let pp = read_pcd(Cursor::new(raw)).unwrap();
        let it = pp.float32_iter("x").unwrap();
        let lt = pp.uint32_iter("label").unwrap();
        assert_eq!(it.float32_at(0), 1.0);
        assert_eq!(lt.uint32_at(0), 10);
        assert_eq!(it.float32_at(1), 2.0);
        assert_eq!(lt.uint32_at(1), 20);
    }

    #[test]
    fn compressed_length_mismatch_is_an_error() {
        let plain = vec![0u8; 8];
        let packed = lzf::compress(&plain);
        let header = "FIELDS x\nSIZE 4\nTYPE F\nCOUNT 1\n\
                      WIDTH 2\nHEIGHT 1\nPOINTS 2\nDATA binary_compressed\n";
        let mut raw = header.as_bytes().to_vec();
        raw.extend((packed.len() as i32).to_le_bytes());
        // declared plain size is larger than the stream decompresses to
        raw.extend(16i32.to_le_bytes());
        raw.extend(&packed);

        match read_pcd(Cursor::new(raw)) {
            Err(Error::UncompressedSize { expected: 16, actual: 8 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn header_errors() {
        let no_value = "VERSION 0.7\nFIELDS\n";
        assert!(matches!(
            read_pcd(Cursor::new(no_value)),
            Err(Error::MissingValue(_)),
        ));

        let arity = "FIELDS x y z\nSIZE 4 4\nTYPE F F F\nCOUNT 1 1 1\n\
                     WIDTH 0\nHEIGHT 0\nPOINTS 0\nDATA binary\n";
        assert!(matches!(
            read_pcd(Cursor::new(arity)),
            Err(Error::ArityMismatch("SIZE")),
        ));

        let mode = "FIELDS x\nSIZE 4\nTYPE F\nCOUNT 1\nPOINTS 0\nDATA sparse\n";
        assert!(matches!(
            read_pcd(Cursor::new(mode)),
            Err(Error::UnknownDataFormat(_)),
        ));
    }

    #[test]
    fn short_binary_body_is_an_error() {
        let header = "FIELDS x\nSIZE 4\nTYPE F\nCOUNT 1\n\
                      WIDTH 2\nHEIGHT 1\nPOINTS 2\nDATA binary\n";
        let mut raw = header.as_bytes().to_vec();
        raw.extend(1.0f32.to_le_bytes());
        assert!(matches!(
            read_pcd(Cursor::new(raw)),
            Err(Error::BodyTooShort {
                expected: 8,
                actual: 4,
            }),
        ));
    }
}
