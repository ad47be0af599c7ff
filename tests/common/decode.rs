// Minimaler Decoder fuer Integrationstests: liest Pool und Attribut-Bloecke
// zurueck, um die geschriebenen Bytes strukturell zu pruefen.
//
// Wird per `include!` eingebunden. Benötigte Imports: keine.

/// Ein gelesener Pool-Eintrag: (Index, Tag-Byte, Payload).
type DecodedEntry = (u16, u8, Vec<u8>);

/// Ein gelesener Attribut-Block: (name_index, Payload).
type DecodedBlock = (u16, Vec<u8>);

#[derive(Debug, Default)]
struct Decoded {
    magic: Option<u32>,
    minor: u16,
    major: u16,
    count_field: u16,
    entries: Vec<DecodedEntry>,
    attribute_count: Option<u16>,
    blocks: Vec<DecodedBlock>,
}

impl Decoded {
    /// Utf8-Eintrag am Index `index` als String (nur fuer ASCII-Namen).
    fn utf8_at(&self, index: u16) -> Option<String> {
        self.entries
            .iter()
            .find(|(i, tag, _)| *i == index && *tag == 1)
            .map(|(_, _, payload)| String::from_utf8_lossy(&payload[2..]).into_owned())
    }

    /// Blocknamen in Schreibreihenfolge.
    fn block_names(&self) -> Vec<String> {
        self.blocks
            .iter()
            .map(|(name, _)| self.utf8_at(*name).unwrap_or_default())
            .collect()
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], String> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(format!("truncated at {} (need {n} bytes)", self.pos));
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u1(&mut self) -> Result<u8, String> {
        Ok(self.take(1)?[0])
    }

    fn u2(&mut self) -> Result<u16, String> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u4(&mut self) -> Result<u32, String> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }
}

/// Payload-Laenge eines Pool-Eintrags nach Tag (JVMS 4.4).
fn payload_len(tag: u8, cursor: &Cursor<'_>) -> Result<usize, String> {
    Ok(match tag {
        1 => {
            let rest = &cursor.data[cursor.pos..];
            if rest.len() < 2 {
                return Err("truncated utf8 length".into());
            }
            2 + u16::from_be_bytes([rest[0], rest[1]]) as usize
        }
        7 | 8 | 16 | 19 | 20 => 2,
        15 => 3,
        3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => 4,
        5 | 6 => 8,
        other => return Err(format!("unknown tag {other}")),
    })
}

/// Dekodiert einen Container.
fn decode_container(data: &[u8], with_header: bool, with_count: bool) -> Result<Decoded, String> {
    let mut cursor = Cursor::new(data);
    let mut decoded = Decoded::default();

    if with_header {
        decoded.magic = Some(cursor.u4()?);
        decoded.minor = cursor.u2()?;
        decoded.major = cursor.u2()?;
    }

    decoded.count_field = cursor.u2()?;
    let mut index: u32 = 1;
    while index < u32::from(decoded.count_field) {
        let tag = cursor.u1()?;
        let len = payload_len(tag, &cursor)?;
        let payload = cursor.take(len)?.to_vec();
        decoded.entries.push((index as u16, tag, payload));
        index += if tag == 5 || tag == 6 { 2 } else { 1 };
    }
    if index != u32::from(decoded.count_field) {
        return Err(format!("pool overran count field: {index}"));
    }

    if with_count {
        decoded.attribute_count = Some(cursor.u2()?);
    }
    while !cursor.is_empty() {
        let name = cursor.u2()?;
        let len = cursor.u4()? as usize;
        let payload = cursor.take(len)?.to_vec();
        decoded.blocks.push((name, payload));
    }
    if let Some(count) = decoded.attribute_count
        && usize::from(count) != decoded.blocks.len()
    {
        return Err(format!("attributes_count {count} but {} blocks", decoded.blocks.len()));
    }
    Ok(decoded)
}

/// Dekodiert einen Container im Default-Layout (ohne Header, ohne Zaehler).
fn decode_bare(data: &[u8]) -> Decoded {
    decode_container(data, false, false).expect("decode")
}
